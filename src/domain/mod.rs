//! Domain layer for the standup analytics engine
//!
//! This module contains the record and metric models, the error taxonomy and
//! the port traits implemented by infrastructure adapters.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
