//! `pulse submit`: record a standup and print its follow-up questions.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{list_table, output, section, CommandOutput};
use crate::cli::types::SubmitArgs;
use crate::domain::models::{Config, Insight, Metrics, StandupSubmission, SubmissionOutcome};

#[derive(Debug, Serialize)]
pub struct SubmitOutput {
    pub id: String,
    pub member_id: String,
    pub timestamp: String,
    pub follow_up_questions: Vec<String>,
    pub insights: Vec<Insight>,
    pub metrics_summary: Metrics,
}

impl From<SubmissionOutcome> for SubmitOutput {
    fn from(outcome: SubmissionOutcome) -> Self {
        Self {
            id: outcome.record.id.to_string(),
            member_id: outcome.record.member_id,
            timestamp: outcome.record.timestamp,
            follow_up_questions: outcome.follow_up_questions,
            insights: outcome.insights,
            metrics_summary: outcome.metrics_summary,
        }
    }
}

impl CommandOutput for SubmitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Standup recorded for {} at {} ({})",
            self.member_id, self.timestamp, self.id
        )];

        let questions = self
            .follow_up_questions
            .iter()
            .enumerate()
            .map(|(i, q)| format!("  {}. {q}", i + 1))
            .collect::<Vec<_>>()
            .join("\n");
        lines.push(String::new());
        lines.push(section("Follow-up questions", &questions, "none"));

        let mut table = list_table(&["priority", "insight"]);
        for insight in &self.insights {
            table.add_row(vec![insight.priority.to_string(), insight.message.clone()]);
        }
        lines.push(String::new());
        lines.push(section("Insights", &table.to_string(), "none"));

        let m = &self.metrics_summary;
        lines.push(String::new());
        lines.push(format!(
            "History: {} standup(s), {:.2} tasks and {:.2} reviews per member, blockers in {:.2}%",
            m.standup_count, m.average_tasks_per_member, m.average_prs_per_member, m.blocker_frequency_pct
        ));

        lines.join("\n")
    }
}

pub async fn execute(args: SubmitArgs, config: &Config, json_mode: bool) -> Result<()> {
    let service = super::build_service(config).await?;

    let submission = StandupSubmission::new(args.member, args.yesterday, args.today, args.blockers);
    let outcome = service.submit(submission).await?;

    output(&SubmitOutput::from(outcome), json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{InsightKind, Priority};

    fn sample() -> SubmitOutput {
        SubmitOutput {
            id: "6f1c".to_string(),
            member_id: "alice".to_string(),
            timestamp: "2026-10-17T09:00:00.000Z".to_string(),
            follow_up_questions: vec!["What will you finish first?".to_string()],
            insights: vec![Insight::new(
                InsightKind::AllClear,
                Priority::Low,
                "Team metrics look healthy",
            )],
            metrics_summary: Metrics::default(),
        }
    }

    #[test]
    fn test_human_output_numbers_questions() {
        let text = sample().to_human();
        assert!(text.contains("Standup recorded for alice"));
        assert!(text.contains("  1. What will you finish first?"));
        assert!(text.contains("Team metrics look healthy"));
    }

    #[test]
    fn test_json_output_keeps_field_names() {
        let value = sample().to_json();
        assert_eq!(value["member_id"], "alice");
        assert_eq!(value["follow_up_questions"][0], "What will you finish first?");
        assert_eq!(value["insights"][0]["kind"], "all_clear");
    }
}
