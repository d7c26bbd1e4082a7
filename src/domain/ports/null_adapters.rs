//! Null adapter implementations.
//!
//! Used when an external collaborator is not configured but the type system
//! requires an implementation of its port.

use async_trait::async_trait;

use super::{CodeReview, GenerationError, IssueTracker, TextGenerator};
use crate::domain::models::{LinkedReview, LinkedTask};

/// An issue tracker that knows no tasks.
#[derive(Debug, Clone, Default)]
pub struct NullIssueTracker;

#[async_trait]
impl IssueTracker for NullIssueTracker {
    async fn member_tasks(&self, _member_id: &str) -> Vec<LinkedTask> {
        Vec::new()
    }
}

/// A code-review service that knows no reviews.
#[derive(Debug, Clone, Default)]
pub struct NullCodeReview;

#[async_trait]
impl CodeReview for NullCodeReview {
    async fn member_reviews(&self, _member_id: &str) -> Vec<LinkedReview> {
        Vec::new()
    }
}

/// A text generator that always fails, forcing the deterministic fallback.
#[derive(Debug, Clone)]
pub struct UnavailableTextGenerator {
    reason: String,
}

impl UnavailableTextGenerator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableTextGenerator {
    fn default() -> Self {
        Self::new("no generative-text backend configured")
    }
}

#[async_trait]
impl TextGenerator for UnavailableTextGenerator {
    async fn invoke(
        &self,
        _prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, GenerationError> {
        Err(GenerationError::NotConfigured(self.reason.clone()))
    }
}
