//! Actors, roles and the visibility predicate shared by listing and authorization
use super::request::LeaveRequest;
use super::status::ApproverRole;
use std::fmt;
use std::str::FromStr;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    #[n(0)]
    HrSite,
    #[n(1)]
    AdminSite,
    #[n(2)]
    Dic,
    #[n(3)]
    PjoSite,
    #[n(4)]
    ManagerHo,
    #[n(5)]
    HrHo,
    #[n(6)]
    HrTicketing,
    #[n(7)]
    SuperAdmin,
}

/// Which request fields an actor's own site/department must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeRule {
    SiteAndDepartment,
    Site,
    // site match, or the configured wildcard site value
    SiteOrWildcard,
    Global,
}

/// The acting user, as supplied by the identity provider for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub site: String,
    pub department: Option<String>,
}

/// Scope evaluation with the deployment's wildcard site value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopePolicy {
    wildcard_site: String,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::HrSite,
        Role::AdminSite,
        Role::Dic,
        Role::PjoSite,
        Role::ManagerHo,
        Role::HrHo,
        Role::HrTicketing,
        Role::SuperAdmin,
    ];

    pub fn scope(&self) -> ScopeRule {
        match self {
            Role::Dic => ScopeRule::SiteAndDepartment,
            Role::HrSite | Role::AdminSite | Role::PjoSite => ScopeRule::Site,
            Role::HrTicketing => ScopeRule::SiteOrWildcard,
            // head office steps see every site
            Role::ManagerHo | Role::HrHo | Role::SuperAdmin => ScopeRule::Global,
        }
    }

    pub fn approver(&self) -> Option<ApproverRole> {
        match self {
            Role::Dic => Some(ApproverRole::Dic),
            Role::PjoSite => Some(ApproverRole::PjoSite),
            Role::ManagerHo => Some(ApproverRole::ManagerHo),
            Role::HrHo => Some(ApproverRole::HrHo),
            _ => None,
        }
    }

    /// Roles allowed to file a request on an employee's behalf.
    pub fn can_file(&self) -> bool {
        matches!(self, Role::HrSite | Role::AdminSite | Role::SuperAdmin)
    }

    pub fn can_ticket(&self) -> bool {
        matches!(self, Role::HrTicketing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::HrSite => "hr_site",
            Role::AdminSite => "admin_site",
            Role::Dic => "dic",
            Role::PjoSite => "pjo_site",
            Role::ManagerHo => "manager_ho",
            Role::HrHo => "hr_ho",
            Role::HrTicketing => "hr_ticketing",
            Role::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == wanted)
            .ok_or_else(|| format!("Invalid role: {}", s))
    }
}

impl Actor {
    pub fn new(id: &str, name: &str, role: Role, site: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            role,
            site: site.to_string(),
            department: None,
        }
    }

    pub fn with_department(mut self, department: &str) -> Self {
        self.department = Some(department.to_string());
        self
    }
}

impl ScopePolicy {
    pub fn new(wildcard_site: &str) -> Self {
        Self {
            wildcard_site: wildcard_site.to_string(),
        }
    }

    pub fn wildcard_site(&self) -> &str {
        &self.wildcard_site
    }

    /// `true` when `request` lies inside `actor`'s scope. Gates both reads and writes.
    pub fn covers(&self, actor: &Actor, request: &LeaveRequest) -> bool {
        let same_site = actor.site == request.employee.site;
        match actor.role.scope() {
            ScopeRule::Global => true,
            ScopeRule::Site => same_site,
            ScopeRule::SiteOrWildcard => same_site || actor.site == self.wildcard_site,
            ScopeRule::SiteAndDepartment => {
                same_site && actor.department.as_deref() == Some(request.employee.department.as_str())
            }
        }
    }

    pub fn visible<'a>(&'a self, actor: &'a Actor) -> impl Fn(&LeaveRequest) -> bool + 'a {
        move |request| self.covers(actor, request)
    }
}

impl Default for ScopePolicy {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_WILDCARD_SITE)
    }
}
