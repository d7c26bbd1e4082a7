//! Reduces standup records into per-member and team-wide metrics.
//!
//! [`MetricsAccumulator`] is an O(1)-per-record fold, so callers can stream
//! records from the store batch by batch; [`aggregate`] wraps it for slices.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::domain::models::metrics::round2;
use crate::domain::models::{
    BlockerCount, MemberStats, Metrics, StandupRecord, TimeWindow,
};

/// Normalized blocker keys are cut to this many characters.
pub const BLOCKER_KEY_CHARS: usize = 50;

/// Number of entries kept in `Metrics::top_blockers`.
pub const TOP_BLOCKERS: usize = 5;

/// Lowercase and truncate a blocker text into its frequency-table key.
pub fn normalize_blocker(text: &str) -> String {
    text.trim().to_lowercase().chars().take(BLOCKER_KEY_CHARS).collect()
}

/// Aggregate `records`, keeping only those inside `window` when given.
pub fn aggregate(records: &[StandupRecord], window: Option<&TimeWindow>) -> Metrics {
    let mut acc = MetricsAccumulator::new(window.cloned());
    acc.extend(records);
    acc.finish()
}

/// Incremental metrics fold.
#[derive(Debug, Clone, Default)]
pub struct MetricsAccumulator {
    window: Option<TimeWindow>,
    standup_count: usize,
    total_tasks: usize,
    total_prs: usize,
    blocker_records: usize,
    members: BTreeMap<String, MemberStats>,
    blocker_counts: HashMap<String, usize>,
    /// Blocker keys in first-seen order, used to break count ties
    blocker_order: Vec<String>,
}

impl MetricsAccumulator {
    pub fn new(window: Option<TimeWindow>) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    /// Fold one record; records outside the window are ignored.
    ///
    /// Returns whether the record was counted.
    pub fn push(&mut self, record: &StandupRecord) -> bool {
        if let Some(window) = &self.window {
            if !window.contains(&record.timestamp) {
                return false;
            }
        }

        let tasks = record.linked_task_refs.len();
        let prs = record.linked_review_refs.len();

        self.standup_count += 1;
        self.total_tasks += tasks;
        self.total_prs += prs;

        let stats = self.members.entry(record.member_id.clone()).or_default();
        stats.standup_count += 1;
        stats.total_tasks += tasks;
        stats.total_prs += prs;

        if record.has_blocker() {
            self.blocker_records += 1;
            stats.blockers.push(record.blockers.trim().to_string());

            let key = normalize_blocker(&record.blockers);
            let count = self.blocker_counts.entry(key.clone()).or_insert(0);
            if *count == 0 {
                self.blocker_order.push(key);
            }
            *count += 1;
        }

        true
    }

    pub fn extend<'a>(&mut self, records: impl IntoIterator<Item = &'a StandupRecord>) {
        for record in records {
            self.push(record);
        }
    }

    pub fn standup_count(&self) -> usize {
        self.standup_count
    }

    /// Produce the final metrics. Leaves the accumulator usable.
    pub fn finish(&self) -> Metrics {
        let active_members = self.members.len();

        let per_member = |total: usize| {
            if active_members == 0 {
                0.0
            } else {
                round2(total as f64 / active_members as f64)
            }
        };

        let blocker_frequency_pct = if self.standup_count == 0 {
            0.0
        } else {
            round2(self.blocker_records as f64 / self.standup_count as f64 * 100.0).clamp(0.0, 100.0)
        };

        // blocker_order is first-seen order and sort_by is stable.
        let mut top_blockers: Vec<BlockerCount> = self
            .blocker_order
            .iter()
            .map(|key| BlockerCount {
                text: key.clone(),
                count: self.blocker_counts.get(key).copied().unwrap_or(0),
            })
            .collect();
        top_blockers.sort_by(|a, b| b.count.cmp(&a.count));
        top_blockers.truncate(TOP_BLOCKERS);

        debug!(
            standups = self.standup_count,
            active_members,
            distinct_blockers = self.blocker_order.len(),
            "aggregated metrics"
        );

        Metrics {
            standup_count: self.standup_count,
            active_members,
            average_tasks_per_member: per_member(self.total_tasks),
            average_prs_per_member: per_member(self.total_prs),
            blocker_frequency_pct,
            top_blockers,
            per_member_stats: self.members.clone(),
        }
    }
}
