//! Rule-based insights and recommendations.
//!
//! A fixed table of independent rules is evaluated in order. Each rule looks
//! at one metric or trend field and contributes at most one insight and one
//! recommendation. Order only affects display.

use serde_json::json;
use tracing::debug;

use crate::domain::models::{
    Insight, InsightKind, InsightThresholds, Metrics, Priority, Trend, TrendDirection, TrendMetric,
};

/// Recommendation used when no rule produced one.
pub const GENERIC_RECOMMENDATION: &str =
    "Keep submitting daily standups so trends and blockers can be tracked over time.";

/// What a rule inspects.
struct RuleContext<'a> {
    metrics: &'a Metrics,
    trends: &'a [Trend],
    thresholds: &'a InsightThresholds,
}

/// A triggered rule's output.
struct Finding {
    insight: Insight,
    recommendation: Option<String>,
}

type RuleFn = fn(&RuleContext<'_>) -> Option<Finding>;

/// Evaluation order of the rule table. The all-clear rule is handled
/// separately since it depends on whether any of these fired.
const RULES: &[(InsightKind, RuleFn)] = &[
    (InsightKind::NoData, no_data),
    (InsightKind::HighTaskLoad, high_task_load),
    (InsightKind::ReviewBacklog, review_backlog),
    (InsightKind::RecurringBlocker, recurring_blocker),
    (InsightKind::FrequentBlockers, frequent_blockers),
    (InsightKind::RisingBlockers, rising_blockers),
    (InsightKind::FallingThroughput, falling_throughput),
];

fn no_data(ctx: &RuleContext<'_>) -> Option<Finding> {
    ctx.metrics.is_empty().then(|| Finding {
        insight: Insight::new(
            InsightKind::NoData,
            Priority::Low,
            "No standup data available for the selected period.",
        ),
        recommendation: Some(
            "Encourage the team to submit daily standups to start building a baseline.".to_string(),
        ),
    })
}

fn high_task_load(ctx: &RuleContext<'_>) -> Option<Finding> {
    let avg = ctx.metrics.average_tasks_per_member;
    (avg > ctx.thresholds.high_task_load).then(|| Finding {
        insight: Insight::new(
            InsightKind::HighTaskLoad,
            Priority::High,
            format!("High task load: members average {avg:.2} linked tasks."),
        )
        .with_details(json!({
            "average_tasks_per_member": avg,
            "threshold": ctx.thresholds.high_task_load,
        })),
        recommendation: Some(
            "Review task assignments and consider redistributing or deferring lower-priority work."
                .to_string(),
        ),
    })
}

fn review_backlog(ctx: &RuleContext<'_>) -> Option<Finding> {
    let avg = ctx.metrics.average_prs_per_member;
    (avg > ctx.thresholds.review_backlog).then(|| Finding {
        insight: Insight::new(
            InsightKind::ReviewBacklog,
            Priority::Medium,
            format!("Members average {avg:.2} open reviews; prioritize reviews to unblock merges."),
        )
        .with_details(json!({
            "average_prs_per_member": avg,
            "threshold": ctx.thresholds.review_backlog,
        })),
        recommendation: Some(
            "Set aside dedicated review time each day to keep the review queue short.".to_string(),
        ),
    })
}

fn recurring_blocker(ctx: &RuleContext<'_>) -> Option<Finding> {
    let top = ctx.metrics.top_blocker()?;
    (top.count > ctx.thresholds.recurring_blocker_count).then(|| Finding {
        insight: Insight::new(
            InsightKind::RecurringBlocker,
            Priority::High,
            format!("Recurring blocker reported {} times: \"{}\"", top.count, top.text),
        )
        .with_details(json!({ "blocker": top.text, "count": top.count })),
        recommendation: Some(format!(
            "Escalate \"{}\" and assign an owner to resolve it.",
            top.text
        )),
    })
}

fn frequent_blockers(ctx: &RuleContext<'_>) -> Option<Finding> {
    let pct = ctx.metrics.blocker_frequency_pct;
    (pct > ctx.thresholds.blocker_frequency_pct).then(|| Finding {
        insight: Insight::new(
            InsightKind::FrequentBlockers,
            Priority::Medium,
            format!("{pct:.1}% of standups report a blocker."),
        ),
        recommendation: Some(
            "Hold a short blocker triage after standup to clear impediments quickly.".to_string(),
        ),
    })
}

fn find_trend<'a>(trends: &'a [Trend], metric: TrendMetric, direction: TrendDirection) -> Option<&'a Trend> {
    trends.iter().find(|t| t.is(metric, direction))
}

fn rising_blockers(ctx: &RuleContext<'_>) -> Option<Finding> {
    let trend = find_trend(ctx.trends, TrendMetric::Blockers, TrendDirection::Increasing)?;
    Some(Finding {
        insight: Insight::new(
            InsightKind::RisingBlockers,
            Priority::High,
            "Blockers are being reported more often than before.",
        )
        .with_details(json!({
            "earlier_avg": trend.earlier_avg,
            "recent_avg": trend.recent_avg,
        })),
        recommendation: Some(
            "Look for a shared root cause behind recent blockers.".to_string(),
        ),
    })
}

fn falling_throughput(ctx: &RuleContext<'_>) -> Option<Finding> {
    let trend = find_trend(ctx.trends, TrendMetric::LinkedTasks, TrendDirection::Decreasing)?;
    Some(Finding {
        insight: Insight::new(
            InsightKind::FallingThroughput,
            Priority::Low,
            "Fewer tasks are linked to recent standups than earlier ones.",
        )
        .with_details(json!({
            "earlier_avg": trend.earlier_avg,
            "recent_avg": trend.recent_avg,
        })),
        recommendation: None,
    })
}

/// Deterministic insight engine over configured thresholds.
#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
    thresholds: InsightThresholds,
}

impl InsightEngine {
    pub fn new(thresholds: InsightThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &InsightThresholds {
        &self.thresholds
    }

    fn evaluate(&self, metrics: &Metrics, trends: &[Trend]) -> Vec<Finding> {
        let ctx = RuleContext {
            metrics,
            trends,
            thresholds: &self.thresholds,
        };

        let mut findings: Vec<Finding> = RULES
            .iter()
            .filter_map(|(kind, rule)| {
                let finding = rule(&ctx);
                if finding.is_some() {
                    debug!(rule = kind.as_str(), "insight rule triggered");
                }
                finding
            })
            .collect();

        if findings.is_empty() {
            findings.push(Finding {
                insight: Insight::new(
                    InsightKind::AllClear,
                    Priority::Low,
                    format!(
                        "No issues detected across {} standups from {} members.",
                        metrics.standup_count, metrics.active_members
                    ),
                ),
                recommendation: None,
            });
        }

        findings
    }

    /// Insights in rule order. Never empty.
    pub fn generate_insights(&self, metrics: &Metrics, trends: &[Trend]) -> Vec<Insight> {
        self.evaluate(metrics, trends)
            .into_iter()
            .map(|f| f.insight)
            .collect()
    }

    /// Recommendations in rule order, or a single generic one. Never empty.
    pub fn generate_recommendations(&self, metrics: &Metrics, trends: &[Trend]) -> Vec<String> {
        let mut recommendations: Vec<String> = self
            .evaluate(metrics, trends)
            .into_iter()
            .filter_map(|f| f.recommendation)
            .collect();

        if recommendations.is_empty() || metrics.is_empty() {
            recommendations.push(GENERIC_RECOMMENDATION.to_string());
        }

        recommendations
    }
}
