use async_trait::async_trait;

use crate::domain::models::{LinkedReview, LinkedTask};

/// Issue-tracker port
///
/// Implementations return an empty list when the tracker is unreachable;
/// they never fail. Pagination and de-duplication are the adapter's job.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn member_tasks(&self, member_id: &str) -> Vec<LinkedTask>;
}

/// Code-review port
///
/// Same degrade-to-empty contract as [`IssueTracker`].
#[async_trait]
pub trait CodeReview: Send + Sync {
    async fn member_reviews(&self, member_id: &str) -> Vec<LinkedReview>;
}
