//! Trend detection, recurring-blocker detection and member scoring.
//!
//! All functions are total: empty or degenerate input produces a sentinel
//! ("insufficient data", `Poor`, `No data`) instead of an error.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::debug;

use crate::domain::models::standup::is_reported_blocker;
use crate::domain::models::{
    ConsistencyRating, ConsistencyScore, ProductivityRating, ProductivityScore, RecurringBlocker,
    ScoringWeights, StandupRecord, Trend, TrendDirection, TrendMetric, TrendSample,
};
use crate::services::truncate_with_ellipsis;

/// Minimum number of records before a trend is reported.
pub const MIN_TREND_RECORDS: usize = 6;

/// Records averaged at each end of the sequence.
pub const TREND_WINDOW: usize = 3;

/// `recent > INCREASE_FACTOR * earlier` reads as increasing.
pub const INCREASE_FACTOR: f64 = 1.2;

/// `recent < DECREASE_FACTOR * earlier` reads as decreasing.
pub const DECREASE_FACTOR: f64 = 0.8;

/// Characters compared when grouping blockers into a pattern.
pub const BLOCKER_PREFIX_CHARS: usize = 20;

/// Recurring patterns returned by [`find_recurring_blockers`].
pub const MAX_RECURRING: usize = 3;

/// Display length of a recurring-blocker message.
pub const RECURRING_MESSAGE_CHARS: usize = 100;

/// Consistency is measured against at most this many days.
pub const CONSISTENCY_MAX_DAYS: u32 = 30;

/// Compare the earliest and latest three records of an oldest-first sequence.
///
/// Fewer than [`MIN_TREND_RECORDS`] records yields [`Trend::insufficient`].
pub fn detect_trend<F>(ordered: &[StandupRecord], metric: &str, extractor: F) -> Trend
where
    F: Fn(&StandupRecord) -> f64,
{
    let values: Vec<f64> = ordered.iter().map(extractor).collect();
    trend_from_values(&values, metric)
}

/// [`detect_trend`] over values already extracted, oldest first.
pub fn trend_from_values(values: &[f64], metric: &str) -> Trend {
    if values.len() < MIN_TREND_RECORDS {
        return Trend::insufficient(metric);
    }

    let mean = |group: &[f64]| group.iter().sum::<f64>() / group.len() as f64;

    let earlier_avg = mean(&values[..TREND_WINDOW]);
    let recent_avg = mean(&values[values.len() - TREND_WINDOW..]);

    let direction = if recent_avg > INCREASE_FACTOR * earlier_avg {
        TrendDirection::Increasing
    } else if recent_avg < DECREASE_FACTOR * earlier_avg {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    debug!(metric, earlier_avg, recent_avg, %direction, "detected trend");

    Trend {
        metric: metric.to_string(),
        direction,
        recent_avg,
        earlier_avg,
        sufficient_data: true,
    }
}

/// Run [`detect_trend`] for every built-in metric.
pub fn detect_trends(ordered: &[StandupRecord]) -> Vec<Trend> {
    let samples: Vec<TrendSample> = ordered.iter().map(TrendSample::from).collect();
    detect_sample_trends(&samples)
}

/// [`detect_trends`] over compact per-record samples, oldest first.
pub fn detect_sample_trends(samples: &[TrendSample]) -> Vec<Trend> {
    TrendMetric::ALL
        .iter()
        .map(|metric| {
            let values: Vec<f64> = samples.iter().map(|s| metric.value(s)).collect();
            trend_from_values(&values, metric.name())
        })
        .collect()
}

/// Find blockers that keep coming back.
///
/// Two entries belong to the same pattern when their lowercased texts share
/// the first 20 characters. This is a deliberately coarse prefix match, not
/// deduplication. Each pattern is reported once, represented by its first
/// entry, with `occurrences` = number of entries in the pattern. Patterns are
/// ordered by occurrences (first-seen on ties) and capped at three.
pub fn find_recurring_blockers<S: AsRef<str>>(blocker_texts: &[S]) -> Vec<RecurringBlocker> {
    // prefix -> index into `patterns`, which stays in first-seen order
    let mut groups: HashMap<String, usize> = HashMap::new();
    let mut patterns: Vec<(&str, usize)> = Vec::new();

    for text in blocker_texts.iter().map(AsRef::as_ref) {
        if !is_reported_blocker(text) {
            continue;
        }
        let text = text.trim();
        let prefix: String = text.to_lowercase().chars().take(BLOCKER_PREFIX_CHARS).collect();
        match groups.entry(prefix) {
            Entry::Occupied(slot) => patterns[*slot.get()].1 += 1,
            Entry::Vacant(slot) => {
                slot.insert(patterns.len());
                patterns.push((text, 1));
            }
        }
    }

    let mut recurring: Vec<RecurringBlocker> = patterns
        .into_iter()
        .filter(|(_, occurrences)| *occurrences >= 2)
        .map(|(text, occurrences)| RecurringBlocker {
            message: truncate_with_ellipsis(text, RECURRING_MESSAGE_CHARS),
            occurrences,
        })
        .collect();
    recurring.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
    recurring.truncate(MAX_RECURRING);
    recurring
}

/// Share of expected standups submitted over a window of `window_days`.
///
/// The window is capped at 30 days. A zero-day window rates `Poor`.
pub fn consistency_score(submitted_count: usize, window_days: u32) -> ConsistencyScore {
    let days = window_days.min(CONSISTENCY_MAX_DAYS);
    let rate = if days == 0 {
        0.0
    } else {
        (submitted_count as f64 / f64::from(days) * 100.0).min(100.0)
    };

    ConsistencyScore {
        rate,
        rating: ConsistencyRating::from_rate(rate),
    }
}

/// Weighted productivity score.
///
/// `score = tasks * task_weight + prs * review_weight
///          - (blocker_count / standups) * blocker_penalty`
///
/// `tasks` and `prs` are per-standup averages. Returns `No data` when
/// `standups` is zero.
pub fn productivity_score(
    tasks: f64,
    prs: f64,
    blocker_count: usize,
    standups: usize,
    weights: &ScoringWeights,
) -> ProductivityScore {
    if standups == 0 {
        return ProductivityScore {
            score: None,
            rating: ProductivityRating::NoData,
        };
    }

    let blocker_ratio = blocker_count as f64 / standups as f64;
    let score = tasks * weights.task_weight + prs * weights.review_weight
        - blocker_ratio * weights.blocker_penalty;

    let rating = if score > weights.high_threshold {
        ProductivityRating::High
    } else if score > weights.medium_threshold {
        ProductivityRating::Medium
    } else {
        ProductivityRating::Low
    };

    ProductivityScore {
        score: Some(score),
        rating,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn records_with_tasks(counts: &[usize]) -> Vec<StandupRecord> {
        counts
            .iter()
            .enumerate()
            .map(|(day, &tasks)| StandupRecord {
                id: Uuid::new_v4(),
                member_id: "alice".to_string(),
                timestamp: format!("2026-01-{:02}T09:00:00.000Z", day + 1),
                yesterday: "y".to_string(),
                today: "t".to_string(),
                blockers: "none".to_string(),
                linked_task_refs: (0..tasks).map(|i| format!("T-{i}")).collect(),
                linked_review_refs: vec![],
                follow_up_questions: vec![],
                insights: vec![],
            })
            .collect()
    }

    fn task_trend(counts: &[usize]) -> Trend {
        let records = records_with_tasks(counts);
        detect_trend(&records, "linked_tasks", |r| TrendMetric::LinkedTasks.extract(r))
    }

    #[test]
    fn test_insufficient_data_below_six_records() {
        let trend = task_trend(&[1, 2, 3, 4, 5]);
        assert!(!trend.sufficient_data);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.metric, "linked_tasks");
    }

    #[test]
    fn test_increasing_trend() {
        let trend = task_trend(&[2, 2, 2, 0, 3, 3]);
        assert!(trend.sufficient_data);
        // recent window is the last three: (0 + 3 + 3) / 3
        assert_eq!(trend.recent_avg, 2.0);
        assert_eq!(trend.earlier_avg, 2.0);
        assert_eq!(trend.direction, TrendDirection::Stable);

        let trend = task_trend(&[2, 2, 2, 3, 3, 3]);
        assert_eq!(trend.direction, TrendDirection::Increasing);
    }

    #[test]
    fn test_exact_increase_boundary_is_stable() {
        // 6 == 1.2 * 5
        let trend = task_trend(&[5, 5, 5, 6, 6, 6]);
        assert_eq!(trend.earlier_avg, 5.0);
        assert_eq!(trend.recent_avg, 6.0);
        assert_eq!(trend.direction, TrendDirection::Stable);

        let trend = task_trend(&[5, 5, 5, 6, 6, 7]);
        assert_eq!(trend.direction, TrendDirection::Increasing);
    }

    #[test]
    fn test_exact_decrease_boundary_is_stable() {
        // 4 == 0.8 * 5
        let trend = task_trend(&[5, 5, 5, 4, 4, 4]);
        assert_eq!(trend.direction, TrendDirection::Stable);

        let trend = task_trend(&[5, 5, 5, 4, 4, 3]);
        assert_eq!(trend.direction, TrendDirection::Decreasing);
    }

    #[test]
    fn test_middle_records_are_ignored() {
        let trend = task_trend(&[1, 1, 1, 50, 50, 50, 1, 1, 1]);
        assert_eq!(trend.direction, TrendDirection::Stable);
    }

    #[test]
    fn test_zero_baseline() {
        assert_eq!(task_trend(&[0, 0, 0, 0, 0, 0]).direction, TrendDirection::Stable);
        assert_eq!(task_trend(&[0, 0, 0, 0, 0, 1]).direction, TrendDirection::Increasing);
    }

    #[test]
    fn test_detect_trends_covers_all_metrics() {
        let trends = detect_trends(&records_with_tasks(&[1, 1, 1, 4, 4, 4]));
        let names: Vec<_> = trends.iter().map(|t| t.metric.as_str()).collect();
        assert_eq!(names, vec!["linked_tasks", "linked_reviews", "blockers"]);
        assert!(trends[0].is(TrendMetric::LinkedTasks, TrendDirection::Increasing));
        assert!(trends[2].is(TrendMetric::Blockers, TrendDirection::Stable));
    }

    #[test]
    fn test_sample_trends_match_record_trends() {
        let mut records = records_with_tasks(&[1, 1, 1, 4, 4, 4]);
        for record in records.iter_mut().skip(3) {
            record.blockers = "Flaky CI".to_string();
            record.linked_review_refs = vec!["PR-1".to_string()];
        }
        let samples: Vec<TrendSample> = records.iter().map(TrendSample::from).collect();

        assert_eq!(detect_sample_trends(&samples), detect_trends(&records));
        assert!(detect_sample_trends(&samples)[2].is(TrendMetric::Blockers, TrendDirection::Increasing));
    }

    #[test]
    fn test_recurring_blockers_prefix_match() {
        let texts = [
            "Waiting on the platform team for credentials",
            "waiting on the platform team again",
            "Flaky integration tests",
            "Laptop died",
        ];
        let recurring = find_recurring_blockers(&texts);
        assert_eq!(recurring.len(), 1);
        assert_eq!(recurring[0].message, "Waiting on the platform team for credentials");
        assert_eq!(recurring[0].occurrences, 2);
    }

    #[test]
    fn test_recurring_blockers_ignore_none_and_singletons() {
        let texts = ["None", "none", "", "Unique problem"];
        assert!(find_recurring_blockers(&texts).is_empty());
    }

    #[test]
    fn test_recurring_blockers_ranked_and_capped() {
        let texts = [
            "alpha blocker one", "bravo blocker", "bravo blocker", "charlie", "charlie",
            "charlie", "delta", "delta", "alpha blocker one", "echo", "echo",
        ];
        let recurring = find_recurring_blockers(&texts);
        let messages: Vec<_> = recurring.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["charlie", "alpha blocker one", "bravo blocker"]);
        assert_eq!(recurring[0].occurrences, 3);
    }

    #[test]
    fn test_recurring_blockers_large_input_keeps_first_seen_order() {
        let texts: Vec<String> = (0..12_000)
            .map(|i| format!("blocker group {:03} detail {i}", i % 400))
            .collect();
        let recurring = find_recurring_blockers(&texts);
        let messages: Vec<_> = recurring.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "blocker group 000 detail 0",
                "blocker group 001 detail 1",
                "blocker group 002 detail 2",
            ]
        );
        assert!(recurring.iter().all(|r| r.occurrences == 30));
    }

    #[test]
    fn test_recurring_blocker_message_truncated() {
        let long = "x".repeat(150);
        let recurring = find_recurring_blockers(&[long.clone(), long]);
        assert_eq!(recurring[0].message.chars().count(), RECURRING_MESSAGE_CHARS + 3);
        assert!(recurring[0].message.ends_with("..."));
    }

    #[test]
    fn test_consistency_buckets() {
        assert_eq!(consistency_score(25, 30).rating, ConsistencyRating::Excellent);
        assert_eq!(consistency_score(19, 30).rating, ConsistencyRating::Good);
        assert_eq!(consistency_score(13, 30).rating, ConsistencyRating::Fair);
        assert_eq!(consistency_score(12, 30).rating, ConsistencyRating::Poor);
    }

    #[test]
    fn test_consistency_caps_window_and_rate() {
        // 90-day window measured against 30 days
        let score = consistency_score(30, 90);
        assert_eq!(score.rate, 100.0);
        assert_eq!(consistency_score(12, 10).rate, 100.0);
        assert_eq!(consistency_score(5, 0).rating, ConsistencyRating::Poor);
    }

    #[test]
    fn test_productivity_buckets() {
        let weights = ScoringWeights::default();
        // 3 * 2 + 1 * 1.5 - 0 = 7.5
        let high = productivity_score(3.0, 1.0, 0, 5, &weights);
        assert_eq!(high.score, Some(7.5));
        assert_eq!(high.rating, ProductivityRating::High);

        // 2 * 2 + 0 - (1 / 5) * 10 = 2.0
        let low = productivity_score(2.0, 0.0, 1, 5, &weights);
        assert_eq!(low.rating, ProductivityRating::Low);

        // 2 * 2 + 0 = 4.0
        assert_eq!(productivity_score(2.0, 0.0, 0, 5, &weights).rating, ProductivityRating::Medium);
    }

    #[test]
    fn test_productivity_no_data() {
        let score = productivity_score(10.0, 10.0, 0, 0, &ScoringWeights::default());
        assert_eq!(score.rating, ProductivityRating::NoData);
        assert!(score.score.is_none());
    }

    #[test]
    fn test_productivity_uses_configured_weights() {
        let weights = ScoringWeights {
            task_weight: 1.0,
            review_weight: 1.0,
            blocker_penalty: 0.0,
            high_threshold: 1.5,
            medium_threshold: 0.5,
        };
        assert_eq!(productivity_score(1.0, 1.0, 3, 3, &weights).rating, ProductivityRating::High);
    }
}
