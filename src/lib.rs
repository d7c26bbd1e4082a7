//! Standup Pulse - standup analytics engine
//!
//! Records daily standup submissions, links them to the member's open tasks
//! and reviews, and derives team or member analytics from the stored history:
//! aggregate metrics, trends, rule-based insights, recurring blockers and
//! follow-up questions.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and the port traits
//! - **Service Layer** (`services`): Analytics engine and the standup pipeline
//! - **Infrastructure Layer** (`infrastructure`): Record stores, text generation, config, logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use standup_pulse::domain::ports::{NullCodeReview, NullIssueTracker, UnavailableTextGenerator};
//! use standup_pulse::infrastructure::database::InMemoryRecordStore;
//! use standup_pulse::{AnalyticsQuery, Config, StandupService, StandupSubmission};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = StandupService::new(
//!         Arc::new(InMemoryRecordStore::new()),
//!         Arc::new(NullIssueTracker),
//!         Arc::new(NullCodeReview),
//!         Arc::new(UnavailableTextGenerator::default()),
//!         &Config::default(),
//!     );
//!     service
//!         .submit(StandupSubmission::new("alice", "Fixed login", "Write tests", "None"))
//!         .await?;
//!     let report = service.query(&AnalyticsQuery::team()).await?;
//!     println!("{} standups", report.metrics.standup_count);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    AnalyticsQuery, AnalyticsReport, Config, Insight, InsightKind, Metrics, Priority,
    StandupRecord, StandupSubmission, SubmissionOutcome, TimeWindow, Trend, TrendDirection,
};
pub use domain::ports::{CodeReview, IssueTracker, RecordStore, TextGenerator};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{InsightEngine, QuestionGenerator, StandupService};
