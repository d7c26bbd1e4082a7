//! Domain errors for the standup analytics engine.

use thiserror::Error;

use super::ports::StoreError;

/// Errors surfaced to callers of the ingestion and query surfaces.
///
/// Adapter failures on optional collaborators (issue tracker, code review,
/// text generation) are recovered inside the services and never appear here.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl DomainError {
    /// Whether the caller sent a request that can never succeed as-is.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed(_) | Self::MissingFields(_))
    }
}
