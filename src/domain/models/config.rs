use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure for standup-pulse
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Record store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Insight rule thresholds
    #[serde(default)]
    pub thresholds: InsightThresholds,

    /// Productivity scoring weights
    #[serde(default)]
    pub scoring: ScoringWeights,

    /// Follow-up question generation
    #[serde(default)]
    pub questions: QuestionConfig,

    /// Issue-tracker and code-review lookups
    #[serde(default)]
    pub adapters: AdapterConfig,

    /// Generative-text backend
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Record store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreConfig {
    /// `SQLite` database URL holding the record objects
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Records fetched concurrently per batch on read paths
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Prior records loaded as context for a new submission
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_database_url() -> String {
    "sqlite:.pulse/pulse.db".to_string()
}

const fn default_batch_size() -> usize {
    25
}

const fn default_history_limit() -> usize {
    10
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            batch_size: default_batch_size(),
            history_limit: default_history_limit(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rotated log files; console only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Number of days to retain logs
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

const fn default_retention_days() -> u32 {
    30
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            retention_days: default_retention_days(),
        }
    }
}

/// Thresholds for the insight rule table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InsightThresholds {
    /// Average linked tasks per member above which load is flagged
    #[serde(default = "default_high_task_load")]
    pub high_task_load: f64,

    /// Average linked reviews per member above which reviews are flagged
    #[serde(default = "default_review_backlog")]
    pub review_backlog: f64,

    /// Occurrences of the top blocker above which it is flagged
    #[serde(default = "default_recurring_blocker_count")]
    pub recurring_blocker_count: usize,

    /// Blocker frequency (percent) above which blockers are flagged
    #[serde(default = "default_blocker_frequency_pct")]
    pub blocker_frequency_pct: f64,
}

const fn default_high_task_load() -> f64 {
    8.0
}

const fn default_review_backlog() -> f64 {
    5.0
}

const fn default_recurring_blocker_count() -> usize {
    3
}

const fn default_blocker_frequency_pct() -> f64 {
    50.0
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            high_task_load: default_high_task_load(),
            review_backlog: default_review_backlog(),
            recurring_blocker_count: default_recurring_blocker_count(),
            blocker_frequency_pct: default_blocker_frequency_pct(),
        }
    }
}

/// Coefficients and bucket bounds for the productivity score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScoringWeights {
    #[serde(default = "default_task_weight")]
    pub task_weight: f64,

    #[serde(default = "default_review_weight")]
    pub review_weight: f64,

    /// Penalty applied to the blockers-per-standup ratio
    #[serde(default = "default_blocker_penalty")]
    pub blocker_penalty: f64,

    /// Scores above this are `High`
    #[serde(default = "default_high_threshold")]
    pub high_threshold: f64,

    /// Scores above this (and not `High`) are `Medium`
    #[serde(default = "default_medium_threshold")]
    pub medium_threshold: f64,
}

const fn default_task_weight() -> f64 {
    2.0
}

const fn default_review_weight() -> f64 {
    1.5
}

const fn default_blocker_penalty() -> f64 {
    10.0
}

const fn default_high_threshold() -> f64 {
    6.0
}

const fn default_medium_threshold() -> f64 {
    3.0
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            task_weight: default_task_weight(),
            review_weight: default_review_weight(),
            blocker_penalty: default_blocker_penalty(),
            high_threshold: default_high_threshold(),
            medium_threshold: default_medium_threshold(),
        }
    }
}

/// Follow-up question generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QuestionConfig {
    /// Upper bound on the generative-text call before falling back
    #[serde(default = "default_question_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_question_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature (0.0 - 1.0)
    #[serde(default = "default_question_temperature")]
    pub temperature: f32,

    /// Hard cap on returned questions (1-5)
    #[serde(default = "default_max_questions")]
    pub max_questions: usize,

    /// Linked tasks and reviews summarized into the prompt
    #[serde(default = "default_context_items")]
    pub context_items: usize,
}

const fn default_question_timeout_secs() -> u64 {
    15
}

const fn default_question_max_tokens() -> u32 {
    500
}

const fn default_question_temperature() -> f32 {
    0.7
}

const fn default_max_questions() -> usize {
    5
}

const fn default_context_items() -> usize {
    5
}

impl Default for QuestionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_question_timeout_secs(),
            max_tokens: default_question_max_tokens(),
            temperature: default_question_temperature(),
            max_questions: default_max_questions(),
            context_items: default_context_items(),
        }
    }
}

impl QuestionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// External work-signal lookup settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdapterConfig {
    /// Per-lookup bound; a slow lookup degrades to an empty list
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,
}

const fn default_lookup_timeout_secs() -> u64 {
    10
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

impl AdapterConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}

/// Anthropic Messages API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LlmConfig {
    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// API key; falls back to `ANTHROPIC_API_KEY`, and question generation
    /// runs on the deterministic fallback when neither is set
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Retries for transient HTTP failures (429, 5xx)
    #[serde(default = "default_llm_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_llm_model() -> String {
    "claude-3-5-haiku-latest".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_llm_max_retries() -> u32 {
    2
}

const fn default_initial_backoff_ms() -> u64 {
    500
}

const fn default_max_backoff_ms() -> u64 {
    4_000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            base_url: default_llm_base_url(),
            api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_llm_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}
