use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity attached to an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        write!(f, "{s}")
    }
}

/// Which rule produced an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    NoData,
    HighTaskLoad,
    ReviewBacklog,
    RecurringBlocker,
    FrequentBlockers,
    RisingBlockers,
    FallingThroughput,
    AllClear,
}

impl InsightKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoData => "no_data",
            Self::HighTaskLoad => "high_task_load",
            Self::ReviewBacklog => "review_backlog",
            Self::RecurringBlocker => "recurring_blocker",
            Self::FrequentBlockers => "frequent_blockers",
            Self::RisingBlockers => "rising_blockers",
            Self::FallingThroughput => "falling_throughput",
            Self::AllClear => "all_clear",
        }
    }
}

/// A rule-derived observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl Insight {
    pub fn new(kind: InsightKind, priority: Priority, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            priority,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
