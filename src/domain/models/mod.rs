//! Domain models for standup records and the analytics derived from them.

pub mod analytics;
pub mod config;
pub mod insight;
pub mod metrics;
pub mod scores;
pub mod standup;
pub mod trend;
pub mod work_item;

pub use analytics::{AnalyticsQuery, AnalyticsReport, RecurringBlocker, SubmissionOutcome, TimeWindow};
pub use config::{
    AdapterConfig, Config, InsightThresholds, LlmConfig, LoggingConfig, QuestionConfig,
    ScoringWeights, StoreConfig,
};
pub use insight::{Insight, InsightKind, Priority};
pub use metrics::{BlockerCount, MemberStats, Metrics};
pub use scores::{ConsistencyRating, ConsistencyScore, ProductivityRating, ProductivityScore};
pub use standup::{StandupRecord, StandupSubmission};
pub use trend::{Trend, TrendDirection, TrendMetric, TrendSample};
pub use work_item::{LinkedReview, LinkedTask, ReviewState};
