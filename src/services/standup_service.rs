//! Ingestion and query surfaces.
//!
//! Wires the aggregator, pattern detector, insight engine and question
//! generator to the injected ports. Only validation failures and a failed
//! write of the new record reach the caller; every other adapter failure
//! degrades to partial data.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use futures::stream::{self, Stream, StreamExt};
use tracing::{debug, info, instrument, warn};

use super::aggregator::{aggregate, MetricsAccumulator};
use super::insight_engine::InsightEngine;
use super::pattern_detector::{
    consistency_score, detect_sample_trends, detect_trends, find_recurring_blockers,
    productivity_score, CONSISTENCY_MAX_DAYS,
};
use super::question_generator::QuestionGenerator;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::standup::{member_prefix, RECORD_PREFIX};
use crate::domain::models::{
    AdapterConfig, AnalyticsQuery, AnalyticsReport, Config, ConsistencyScore, Metrics,
    ProductivityScore, ScoringWeights, StandupRecord, StandupSubmission, StoreConfig,
    SubmissionOutcome, TimeWindow, TrendSample,
};
use crate::domain::ports::{CodeReview, IssueTracker, RecordStore, TextGenerator};

/// Standup ingestion and analytics service.
pub struct StandupService {
    store: Arc<dyn RecordStore>,
    tracker: Arc<dyn IssueTracker>,
    review: Arc<dyn CodeReview>,
    questions: QuestionGenerator,
    insights: InsightEngine,
    scoring: ScoringWeights,
    store_config: StoreConfig,
    adapters: AdapterConfig,
}

impl StandupService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        tracker: Arc<dyn IssueTracker>,
        review: Arc<dyn CodeReview>,
        generator: Arc<dyn TextGenerator>,
        config: &Config,
    ) -> Self {
        Self {
            store,
            tracker,
            review,
            questions: QuestionGenerator::new(generator, config.questions.clone()),
            insights: InsightEngine::new(config.thresholds.clone()),
            scoring: config.scoring.clone(),
            store_config: config.store.clone(),
            adapters: config.adapters.clone(),
        }
    }

    /// Accept a standup, enrich it and append it to the store.
    #[instrument(skip(self, submission), fields(member_id = %submission.member_id.trim()))]
    pub async fn submit(&self, submission: StandupSubmission) -> DomainResult<SubmissionOutcome> {
        submission.validate()?;
        let member_id = submission.member_id.trim();

        let history = self.member_history(member_id).await;

        let timeout = self.adapters.lookup_timeout();
        let (tasks, reviews) = tokio::join!(
            bounded_lookup("issue tracker", timeout, self.tracker.member_tasks(member_id)),
            bounded_lookup("code review", timeout, self.review.member_reviews(member_id)),
        );

        let draft = StandupRecord::from_submission(&submission, Utc::now())
            .with_linked_tasks(tasks.iter().map(|t| t.id.clone()).collect())
            .with_linked_reviews(reviews.iter().map(|r| r.id.clone()).collect());

        let follow_up_questions = self
            .questions
            .generate_follow_up_questions(&draft, &history, &tasks, &reviews)
            .await;

        let mut series = history;
        series.push(draft.clone());
        let metrics_summary = aggregate(&series, None);
        let trends = detect_trends(&series);
        let insights = self.insights.generate_insights(&metrics_summary, &trends);

        let record = draft
            .with_follow_up_questions(follow_up_questions.clone())
            .with_insights(insights.iter().map(|i| i.message.clone()).collect());

        let key = record.storage_key();
        let body = serde_json::to_vec(&record)?;
        self.store.put(&key, body).await?;

        info!(
            record_id = %record.id,
            key = %key,
            history = series.len() - 1,
            linked_tasks = record.linked_task_refs.len(),
            linked_reviews = record.linked_review_refs.len(),
            "Standup recorded"
        );

        Ok(SubmissionOutcome {
            record,
            insights,
            follow_up_questions,
            metrics_summary,
        })
    }

    /// Build an analytics report for the team or a single member.
    #[instrument(skip(self, query), fields(member_id = ?query.member_id))]
    pub async fn query(&self, query: &AnalyticsQuery) -> DomainResult<AnalyticsReport> {
        let prefix = match &query.member_id {
            Some(member_id) => {
                let member_id = member_id.trim();
                if member_id.is_empty() || member_id.contains('/') {
                    return Err(DomainError::ValidationFailed(format!(
                        "invalid member_id '{member_id}'"
                    )));
                }
                member_prefix(member_id)
            }
            None => RECORD_PREFIX.to_string(),
        };

        let keys = self.list_keys(&prefix).await;
        let mut accumulator = MetricsAccumulator::new(query.date_range.clone());
        let mut digests = Vec::new();

        let mut records = std::pin::pin!(self.fetch_records(keys));
        while let Some(record) = records.next().await {
            if accumulator.push(&record) {
                digests.push(RecordDigest::from(record));
            }
        }

        digests.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        let metrics = accumulator.finish();
        let samples: Vec<TrendSample> = digests.iter().map(|d| d.sample).collect();
        let trends = detect_sample_trends(&samples);
        let insights = self.insights.generate_insights(&metrics, &trends);
        let recommendations = self.insights.generate_recommendations(&metrics, &trends);

        let blocker_texts: Vec<&str> = digests.iter().filter_map(|d| d.blocker.as_deref()).collect();
        let recurring_blockers = find_recurring_blockers(&blocker_texts);

        let (consistency, productivity) = match &query.member_id {
            Some(_) => (
                Some(member_consistency(
                    &digests,
                    query.date_range.as_ref(),
                    Utc::now().date_naive(),
                )),
                Some(self.member_productivity(&metrics)),
            ),
            None => (None, None),
        };

        debug!(
            standups = metrics.standup_count,
            trends = trends.len(),
            insights = insights.len(),
            "Analytics report built"
        );

        Ok(AnalyticsReport {
            metrics,
            trends,
            insights,
            recommendations,
            recurring_blockers,
            consistency,
            productivity,
        })
    }

    /// Newest `history_limit` records of a member, oldest first.
    async fn member_history(&self, member_id: &str) -> Vec<StandupRecord> {
        let mut keys = self.list_keys(&member_prefix(member_id)).await;
        let skip = keys.len().saturating_sub(self.store_config.history_limit);
        keys.drain(..skip);

        let mut history: Vec<StandupRecord> = self.fetch_records(keys).collect().await;
        history.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        history
    }

    async fn list_keys(&self, prefix: &str) -> Vec<String> {
        match self.store.list(prefix).await {
            Ok(objects) => objects.into_iter().map(|o| o.key).collect(),
            Err(e) => {
                warn!(prefix, error = %e, "Failed to list standup records, continuing without history");
                Vec::new()
            }
        }
    }

    /// Fetch records in bounded concurrent batches, preserving key order.
    /// Objects that cannot be read or decoded are skipped.
    fn fetch_records(&self, keys: Vec<String>) -> impl Stream<Item = StandupRecord> + '_ {
        stream::iter(keys)
            .map(move |key| async move { self.fetch_record(&key).await })
            .buffered(self.store_config.batch_size.max(1))
            .filter_map(|record| async move { record })
    }

    async fn fetch_record(&self, key: &str) -> Option<StandupRecord> {
        match self.store.get(key).await {
            Ok(Some(body)) => match serde_json::from_slice(&body) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(key, error = %e, "Skipping malformed standup record");
                    None
                }
            },
            Ok(None) => {
                warn!(key, "Listed standup record disappeared before it was read");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Failed to read standup record");
                None
            }
        }
    }

    fn member_productivity(&self, metrics: &Metrics) -> ProductivityScore {
        let Some(stats) = metrics.per_member_stats.values().next() else {
            return productivity_score(0.0, 0.0, 0, 0, &self.scoring);
        };
        let standups = stats.standup_count.max(1) as f64;
        productivity_score(
            stats.total_tasks as f64 / standups,
            stats.total_prs as f64 / standups,
            stats.blockers.len(),
            stats.standup_count,
            &self.scoring,
        )
    }
}

/// The parts of an in-window record a report still needs after aggregation.
#[derive(Debug)]
struct RecordDigest {
    timestamp: String,
    sample: TrendSample,
    blocker: Option<String>,
}

impl From<StandupRecord> for RecordDigest {
    fn from(record: StandupRecord) -> Self {
        let sample = TrendSample::from(&record);
        let blocker = sample.blocker.then_some(record.blockers);
        Self {
            timestamp: record.timestamp,
            sample,
            blocker,
        }
    }
}

impl RecordDigest {
    fn date(&self) -> &str {
        self.timestamp.get(..10).unwrap_or(&self.timestamp)
    }
}

/// Consistency over the query window, or over the 30 days ending `today`
/// when the query is unbounded. Several submissions on one day count once.
fn member_consistency(
    digests: &[RecordDigest],
    window: Option<&TimeWindow>,
    today: NaiveDate,
) -> ConsistencyScore {
    let window = match window {
        Some(window) => window.clone(),
        None => TimeWindow::trailing_days(today, CONSISTENCY_MAX_DAYS),
    };
    let window_days = window.span_days().unwrap_or(CONSISTENCY_MAX_DAYS);
    let submitted_days: BTreeSet<&str> = digests
        .iter()
        .filter(|d| window.contains(&d.timestamp))
        .map(RecordDigest::date)
        .collect();
    consistency_score(submitted_days.len(), window_days)
}

/// Run an adapter lookup, degrading to an empty list on timeout.
async fn bounded_lookup<T, F>(source: &'static str, timeout: Duration, lookup: F) -> Vec<T>
where
    F: Future<Output = Vec<T>>,
{
    match tokio::time::timeout(timeout, lookup).await {
        Ok(items) => items,
        Err(_) => {
            warn!(source, timeout_secs = timeout.as_secs(), "Lookup timed out, continuing without it");
            Vec::new()
        }
    }
}
