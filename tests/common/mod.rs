//! Common test utilities for integration tests
//!
//! Provides shared fixtures and fixed-answer adapters used across the
//! integration test files.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use standup_pulse::domain::models::{LinkedReview, LinkedTask, ReviewState, StandupRecord};
use standup_pulse::domain::ports::{
    CodeReview, GenerationError, IssueTracker, NullCodeReview, NullIssueTracker, RecordStore,
    TextGenerator, UnavailableTextGenerator,
};
use standup_pulse::{Config, StandupService};
use uuid::Uuid;

/// Issue tracker that returns `count` tasks for every member.
pub struct FixedTracker {
    pub count: usize,
}

#[async_trait]
impl IssueTracker for FixedTracker {
    async fn member_tasks(&self, member_id: &str) -> Vec<LinkedTask> {
        (0..self.count)
            .map(|i| LinkedTask::new(format!("{member_id}-T{i}"), format!("Task {i}"), "In Progress"))
            .collect()
    }
}

/// Code review service that returns `count` open reviews for every member.
pub struct FixedReviews {
    pub count: usize,
}

#[async_trait]
impl CodeReview for FixedReviews {
    async fn member_reviews(&self, member_id: &str) -> Vec<LinkedReview> {
        (0..self.count)
            .map(|i| LinkedReview::new(format!("{member_id}-PR{i}"), format!("Review {i}"), ReviewState::Open))
            .collect()
    }
}

/// Text generator that always answers with the same text.
pub struct CannedGenerator(pub String);

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn invoke(&self, _prompt: &str, _max_tokens: u32, _temperature: f32) -> Result<String, GenerationError> {
        Ok(self.0.clone())
    }
}

/// Setup test logging
///
/// Initializes a tracing subscriber that writes through the test harness.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Service with no external collaborators configured.
pub fn offline_service(store: Arc<dyn RecordStore>) -> StandupService {
    StandupService::new(
        store,
        Arc::new(NullIssueTracker),
        Arc::new(NullCodeReview),
        Arc::new(UnavailableTextGenerator::default()),
        &Config::default(),
    )
}

/// Service whose lookups return `tasks` tasks and `reviews` reviews.
pub fn linked_service(store: Arc<dyn RecordStore>, tasks: usize, reviews: usize) -> StandupService {
    StandupService::new(
        store,
        Arc::new(FixedTracker { count: tasks }),
        Arc::new(FixedReviews { count: reviews }),
        Arc::new(UnavailableTextGenerator::default()),
        &Config::default(),
    )
}

/// Record with a fixed day (`1..=28`) in October 2026.
pub fn record(member_id: &str, day: u32, tasks: usize, blockers: &str) -> StandupRecord {
    StandupRecord {
        id: Uuid::new_v4(),
        member_id: member_id.to_string(),
        timestamp: format!("2026-10-{day:02}T09:00:00.000Z"),
        yesterday: "Worked on the importer".to_string(),
        today: "Continue the importer".to_string(),
        blockers: blockers.to_string(),
        linked_task_refs: (0..tasks).map(|i| format!("T{i}")).collect(),
        linked_review_refs: Vec::new(),
        follow_up_questions: Vec::new(),
        insights: Vec::new(),
    }
}

/// Write `records` straight into `store` under their storage keys.
pub async fn seed(store: &dyn RecordStore, records: &[StandupRecord]) {
    for record in records {
        let body = serde_json::to_vec(record).expect("serialize record");
        store.put(&record.storage_key(), body).await.expect("seed record");
    }
}
