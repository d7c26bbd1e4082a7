use serde::{Deserialize, Serialize};
use std::fmt;

use super::standup::StandupRecord;

/// Direction of change between an earlier and a more recent window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        };
        write!(f, "{s}")
    }
}

/// Trend of one metric across an ordered record sequence.
///
/// When `sufficient_data` is false the trend is the "insufficient data"
/// sentinel: direction is `Stable` and both averages are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub metric: String,
    pub direction: TrendDirection,
    pub recent_avg: f64,
    pub earlier_avg: f64,
    pub sufficient_data: bool,
}

impl Trend {
    pub fn insufficient(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            direction: TrendDirection::Stable,
            recent_avg: 0.0,
            earlier_avg: 0.0,
            sufficient_data: false,
        }
    }

    pub fn is(&self, metric: TrendMetric, direction: TrendDirection) -> bool {
        self.sufficient_data && self.metric == metric.name() && self.direction == direction
    }
}

/// Built-in per-record metric extractors for trend detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendMetric {
    LinkedTasks,
    LinkedReviews,
    Blockers,
}

impl TrendMetric {
    pub const ALL: [Self; 3] = [Self::LinkedTasks, Self::LinkedReviews, Self::Blockers];

    pub fn name(self) -> &'static str {
        match self {
            Self::LinkedTasks => "linked_tasks",
            Self::LinkedReviews => "linked_reviews",
            Self::Blockers => "blockers",
        }
    }

    pub fn extract(self, record: &StandupRecord) -> f64 {
        self.value(&TrendSample::from(record))
    }

    pub fn value(self, sample: &TrendSample) -> f64 {
        match self {
            Self::LinkedTasks => sample.tasks as f64,
            Self::LinkedReviews => sample.reviews as f64,
            Self::Blockers => {
                if sample.blocker {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// The per-record counts trend detection looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrendSample {
    pub tasks: usize,
    pub reviews: usize,
    pub blocker: bool,
}

impl From<&StandupRecord> for TrendSample {
    fn from(record: &StandupRecord) -> Self {
        Self {
            tasks: record.linked_task_refs.len(),
            reviews: record.linked_review_refs.len(),
            blocker: record.has_blocker(),
        }
    }
}
