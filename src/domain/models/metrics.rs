use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Round half-up to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Aggregated team (or single-member) metrics over a set of records.
///
/// Always derived from the record set; never stored as a source of truth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub standup_count: usize,
    pub active_members: usize,
    pub average_tasks_per_member: f64,
    pub average_prs_per_member: f64,
    /// Share of records reporting a blocker, in `[0, 100]`
    pub blocker_frequency_pct: f64,
    /// At most five entries, highest count first
    pub top_blockers: Vec<BlockerCount>,
    pub per_member_stats: BTreeMap<String, MemberStats>,
}

impl Metrics {
    pub fn is_empty(&self) -> bool {
        self.standup_count == 0
    }

    pub fn top_blocker(&self) -> Option<&BlockerCount> {
        self.top_blockers.first()
    }
}

/// A normalized blocker text and how often it was reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockerCount {
    pub text: String,
    pub count: usize,
}

/// Per-member totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberStats {
    pub standup_count: usize,
    pub total_tasks: usize,
    pub total_prs: usize,
    /// Blocker texts as submitted, oldest first
    pub blockers: Vec<String>,
}
