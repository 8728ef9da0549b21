//! Error taxonomy for the leave workflow
use crate::config::ConfigError;
use crate::status::LeaveStatus;

#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum ValidationError {
    #[error("End date is before start date")]
    InvalidDates,
    #[error("Leave period of {0} days exceeds the allowed maximum of {1}")]
    PeriodTooLong(u32, u32),
    #[error("Employee NIK must be at least {0} characters")]
    InvalidNik(usize),
    #[error("Required field '{0}' is missing")]
    MissingField(&'static str),
    #[error("Travel field '{0}' is required for leave with ticket")]
    MissingTravelDetails(&'static str),
    #[error("Rejection notes are required")]
    EmptyRejectionNotes,
    #[error("A booking code is required to mark a ticket as issued")]
    MissingBookingCode,
    #[error("Departure time '{0}' is not a valid HH:MM time")]
    InvalidDepartureTime(String),
    #[error("Local leave has no ticket to issue")]
    TicketsNotApplicable,
}

#[derive(thiserror::Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Actor '{actor}' with role {role} is not authorized: {reason}")]
    UnauthorizedActor {
        actor: String,
        role: String,
        reason: String,
    },
    #[error("Request {request_id} cannot move from {status}: {reason}")]
    InvalidTransition {
        request_id: String,
        status: LeaveStatus,
        reason: String,
    },
    #[error("Request {request_id} was modified concurrently (expected {expected})")]
    Conflict { request_id: String, expected: String },
    #[error("Leave request {0} not found")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(#[from] sled::Error),
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("Identifier error: {0}")]
    Identifier(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Category of a [`WorkflowError`], for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    UnauthorizedActor,
    InvalidTransition,
    Conflict,
    NotFound,
    Storage,
}

pub type Result<T> = std::result::Result<T, WorkflowError>;

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::Validation(_) => ErrorKind::Validation,
            WorkflowError::UnauthorizedActor { .. } => ErrorKind::UnauthorizedActor,
            WorkflowError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            WorkflowError::Conflict { .. } => ErrorKind::Conflict,
            WorkflowError::NotFound(_) => ErrorKind::NotFound,
            WorkflowError::Storage(_)
            | WorkflowError::Encoding(_)
            | WorkflowError::Identifier(_)
            | WorkflowError::Config(_) => ErrorKind::Storage,
        }
    }

    pub(crate) fn unauthorized(
        actor: &crate::scope::Actor,
        reason: impl Into<String>,
    ) -> Self {
        WorkflowError::UnauthorizedActor {
            actor: actor.id.clone(),
            role: actor.role.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_transition(
        request_id: &str,
        status: LeaveStatus,
        reason: impl Into<String>,
    ) -> Self {
        WorkflowError::InvalidTransition {
            request_id: request_id.to_string(),
            status,
            reason: reason.into(),
        }
    }
}

impl From<minicbor::decode::Error> for WorkflowError {
    fn from(value: minicbor::decode::Error) -> Self {
        WorkflowError::Encoding(value.to_string())
    }
}

impl<E: std::fmt::Display> From<minicbor::encode::Error<E>> for WorkflowError {
    fn from(value: minicbor::encode::Error<E>) -> Self {
        WorkflowError::Encoding(value.to_string())
    }
}

impl From<sled::transaction::TransactionError<WorkflowError>> for WorkflowError {
    fn from(value: sled::transaction::TransactionError<WorkflowError>) -> Self {
        match value {
            sled::transaction::TransactionError::Abort(e) => e,
            sled::transaction::TransactionError::Storage(e) => WorkflowError::Storage(e),
        }
    }
}
