//! Configuration management module.

use crate::periodic::PeriodicRule;
use crate::request::DraftLimits;
use crate::scope::ScopePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_WILDCARD_SITE: &str = "ALL";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Workflow engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WorkflowConfig {
    pub storage: StorageConfig,
    pub scope: ScopeConfig,
    pub periodic: PeriodicConfig,
    pub limits: LimitsConfig,
}

/// Embedded database settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    pub path: PathBuf,
    /// Delete the database when the last handle is dropped.
    pub temporary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScopeConfig {
    /// Site value that lets a ticketing actor act on every site.
    pub ticketing_wildcard_site: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PeriodicConfig {
    pub leave_type: String,
    /// Cycle for head and PJO-class job levels.
    pub short_cycle_days: u32,
    pub standard_cycle_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_leave_days: u32,
    pub min_nik_len: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("leave-approval.db"),
            temporary: false,
        }
    }
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            ticketing_wildcard_site: DEFAULT_WILDCARD_SITE.to_string(),
        }
    }
}

impl Default for PeriodicConfig {
    fn default() -> Self {
        let rule = PeriodicRule::default();
        Self {
            leave_type: "periodic".to_string(),
            short_cycle_days: rule.short_cycle_days,
            standard_cycle_days: rule.standard_cycle_days,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        let limits = DraftLimits::default();
        Self {
            max_leave_days: limits.max_leave_days,
            min_nik_len: limits.min_nik_len,
        }
    }
}

impl WorkflowConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: WorkflowConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Config for an in-memory database that disappears with the service.
    pub fn temporary() -> Self {
        Self {
            storage: StorageConfig {
                temporary: true,
                ..StorageConfig::default()
            },
            ..Self::default()
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.storage.temporary && self.storage.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation("storage.path is empty".into()));
        }
        if self.scope.ticketing_wildcard_site.trim().is_empty() {
            return Err(ConfigError::Validation(
                "scope.ticketing_wildcard_site is empty".into(),
            ));
        }
        if self.periodic.leave_type.trim().is_empty() {
            return Err(ConfigError::Validation("periodic.leave_type is empty".into()));
        }
        if self.periodic.short_cycle_days == 0 || self.periodic.standard_cycle_days == 0 {
            return Err(ConfigError::Validation(
                "periodic cycle lengths must be positive".into(),
            ));
        }
        if self.limits.max_leave_days == 0 {
            return Err(ConfigError::Validation(
                "limits.max_leave_days must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn scope_policy(&self) -> ScopePolicy {
        ScopePolicy::new(&self.scope.ticketing_wildcard_site)
    }

    pub fn periodic_rule(&self) -> PeriodicRule {
        PeriodicRule {
            short_cycle_days: self.periodic.short_cycle_days,
            standard_cycle_days: self.periodic.standard_cycle_days,
        }
    }

    pub fn draft_limits(&self) -> DraftLimits {
        DraftLimits {
            min_nik_len: self.limits.min_nik_len,
            max_leave_days: self.limits.max_leave_days,
        }
    }

    pub fn sled_config(&self) -> sled::Config {
        sled::Config::new()
            .path(&self.storage.path)
            .temporary(self.storage.temporary)
    }
}
