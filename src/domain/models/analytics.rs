//! Request and response payloads for the ingestion and query surfaces.

use serde::{Deserialize, Serialize};

use super::insight::Insight;
use super::metrics::Metrics;
use super::scores::{ConsistencyScore, ProductivityScore};
use super::standup::StandupRecord;
use super::trend::Trend;

/// Inclusive `[from, to]` range over ISO-8601 timestamps.
///
/// Bounds are compared lexicographically, which is ordering-correct for
/// fixed-width UTC timestamps. A bare date such as `2026-10-17` used as `to`
/// sorts before every timestamp on that day, so callers wanting whole days
/// should pass `2026-10-17T23:59:59.999Z` (see [`TimeWindow::days`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: String,
    pub to: String,
}

impl TimeWindow {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Window covering whole calendar days `from_date..=to_date` (`YYYY-MM-DD`).
    pub fn days(from_date: &str, to_date: &str) -> Self {
        Self::new(from_date, format!("{to_date}T23:59:59.999Z"))
    }

    /// Window covering the `days` calendar days ending on `end` (inclusive).
    pub fn trailing_days(end: chrono::NaiveDate, days: u32) -> Self {
        let start = end - chrono::Days::new(u64::from(days.saturating_sub(1)));
        Self::days(
            &start.format("%Y-%m-%d").to_string(),
            &end.format("%Y-%m-%d").to_string(),
        )
    }

    pub fn contains(&self, timestamp: &str) -> bool {
        self.from.as_str() <= timestamp && timestamp <= self.to.as_str()
    }

    /// Number of calendar days spanned, when both bounds start with a date.
    pub fn span_days(&self) -> Option<u32> {
        let parse = |s: &str| chrono::NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d").ok();
        let from = parse(&self.from)?;
        let to = parse(&self.to)?;
        let days = (to - from).num_days() + 1;
        u32::try_from(days).ok()
    }
}

/// A recurring blocker pattern found by prefix matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringBlocker {
    /// Display text, at most 100 characters plus an ellipsis
    pub message: String,
    /// Number of entries sharing the pattern's prefix
    pub occurrences: usize,
}

/// Query surface input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub date_range: Option<TimeWindow>,
}

impl AnalyticsQuery {
    pub fn team() -> Self {
        Self::default()
    }

    pub fn member(member_id: impl Into<String>) -> Self {
        Self {
            member_id: Some(member_id.into()),
            date_range: None,
        }
    }

    pub fn within(mut self, window: TimeWindow) -> Self {
        self.date_range = Some(window);
        self
    }
}

/// Query surface output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub metrics: Metrics,
    pub trends: Vec<Trend>,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<String>,
    pub recurring_blockers: Vec<RecurringBlocker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistency: Option<ConsistencyScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub productivity: Option<ProductivityScore>,
}

/// Ingestion surface output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub record: StandupRecord,
    pub insights: Vec<Insight>,
    pub follow_up_questions: Vec<String>,
    pub metrics_summary: Metrics,
}
