//! `pulse report`: team or member analytics.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::Serialize;

use crate::cli::output::{list_table, output, section, CommandOutput};
use crate::cli::types::ReportArgs;
use crate::domain::models::{AnalyticsQuery, AnalyticsReport, Config, TimeWindow};

#[derive(Debug, Serialize)]
pub struct ReportOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<TimeWindow>,
    #[serde(flatten)]
    pub report: AnalyticsReport,
}

impl CommandOutput for ReportOutput {
    fn to_human(&self) -> String {
        let report = &self.report;
        let scope = match &self.member_id {
            Some(member) => format!("Standup report for {member}"),
            None => "Team standup report".to_string(),
        };
        let mut lines = vec![match &self.date_range {
            Some(window) => format!("{scope} ({} to {})", window.from, window.to),
            None => scope,
        }];

        let m = &report.metrics;
        let mut metrics = list_table(&["metric", "value"]);
        metrics
            .add_row(vec!["standups".to_string(), m.standup_count.to_string()])
            .add_row(vec!["active members".to_string(), m.active_members.to_string()])
            .add_row(vec![
                "tasks per member".to_string(),
                format!("{:.2}", m.average_tasks_per_member),
            ])
            .add_row(vec![
                "reviews per member".to_string(),
                format!("{:.2}", m.average_prs_per_member),
            ])
            .add_row(vec![
                "blocker frequency".to_string(),
                format!("{:.2}%", m.blocker_frequency_pct),
            ]);
        lines.push(String::new());
        lines.push(section("Metrics", &metrics.to_string(), "none"));

        if !m.top_blockers.is_empty() {
            let mut blockers = list_table(&["count", "blocker"]);
            for blocker in &m.top_blockers {
                blockers.add_row(vec![blocker.count.to_string(), blocker.text.clone()]);
            }
            lines.push(String::new());
            lines.push(section("Top blockers", &blockers.to_string(), "none"));
        }

        let mut trends = list_table(&["metric", "direction", "recent", "earlier"]);
        for trend in &report.trends {
            if trend.sufficient_data {
                trends.add_row(vec![
                    trend.metric.clone(),
                    trend.direction.to_string(),
                    format!("{:.2}", trend.recent_avg),
                    format!("{:.2}", trend.earlier_avg),
                ]);
            } else {
                trends.add_row(vec![
                    trend.metric.clone(),
                    "insufficient data".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                ]);
            }
        }
        lines.push(String::new());
        lines.push(section("Trends", &trends.to_string(), "none"));

        let mut insights = list_table(&["priority", "insight"]);
        for insight in &report.insights {
            insights.add_row(vec![insight.priority.to_string(), insight.message.clone()]);
        }
        lines.push(String::new());
        lines.push(section("Insights", &insights.to_string(), "none"));

        let recommendations = report
            .recommendations
            .iter()
            .map(|r| format!("  - {r}"))
            .collect::<Vec<_>>()
            .join("\n");
        lines.push(String::new());
        lines.push(section("Recommendations", &recommendations, "none"));

        let recurring = report
            .recurring_blockers
            .iter()
            .map(|b| format!("  - {} ({}x)", b.message, b.occurrences))
            .collect::<Vec<_>>()
            .join("\n");
        lines.push(String::new());
        lines.push(section("Recurring blockers", &recurring, "none detected"));

        if let Some(consistency) = &report.consistency {
            lines.push(String::new());
            lines.push(format!(
                "Consistency: {:.2}% ({})",
                consistency.rate, consistency.rating
            ));
        }
        if let Some(productivity) = &report.productivity {
            let score = productivity
                .score
                .map_or_else(|| "-".to_string(), |s| format!("{s:.2}"));
            lines.push(format!("Productivity: {score} ({})", productivity.rating));
        }

        lines.join("\n")
    }
}

/// Turn the CLI flags into a query, checking the date bounds.
pub fn build_query(args: &ReportArgs) -> Result<AnalyticsQuery> {
    let mut query = match &args.member {
        Some(member) => AnalyticsQuery::member(member.clone()),
        None => AnalyticsQuery::team(),
    };

    if let (Some(from), Some(to)) = (&args.from, &args.to) {
        let start = parse_day(from)?;
        let end = parse_day(to)?;
        if start > end {
            bail!("--from ({from}) is after --to ({to})");
        }
        query = query.within(TimeWindow::days(from, to));
    }

    Ok(query)
}

fn parse_day(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date '{value}', expected YYYY-MM-DD"))
}

pub async fn execute(args: ReportArgs, config: &Config, json_mode: bool) -> Result<()> {
    let query = build_query(&args)?;
    let service = super::build_service(config).await?;
    let report = service.query(&query).await?;

    output(
        &ReportOutput {
            member_id: query.member_id,
            date_range: query.date_range,
            report,
        },
        json_mode,
    );
    Ok(())
}
