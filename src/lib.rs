pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod filter;
pub mod ledger;
pub mod periodic;
pub mod request;
pub mod scope;
pub mod service;
pub mod stats;
pub mod status;
pub mod store;
pub mod ticket;
pub mod utils;

pub use error::{ErrorKind, Result, ValidationError, WorkflowError};
