//! Follow-up question generation.
//!
//! The primary path prompts a [`TextGenerator`] for questions about a new
//! standup. Any error, timeout or unusable response resolves to a
//! deterministic fallback, so callers always get between one and five
//! questions.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{extract_json_from_response, truncate_with_ellipsis};
use crate::domain::models::{LinkedReview, LinkedTask, QuestionConfig, StandupRecord};
use crate::domain::ports::TextGenerator;

/// Upper bound on returned questions regardless of configuration.
pub const MAX_QUESTIONS: usize = 5;

/// Blocker text length quoted in fallback questions.
const FALLBACK_BLOCKER_CHARS: usize = 50;

/// Line-scanned questions must be longer than this.
const MIN_QUESTION_CHARS: usize = 10;

const DEFAULT_QUESTIONS: [&str; 3] = [
    "Are there any dependencies on other team members that could slow down today's work?",
    "Is there anything the team could help with or any support you need?",
    "Do you see any risks to meeting your current commitments?",
];

/// Generates contextual follow-up questions for a standup.
pub struct QuestionGenerator {
    generator: Arc<dyn TextGenerator>,
    config: QuestionConfig,
}

impl QuestionGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, config: QuestionConfig) -> Self {
        Self { generator, config }
    }

    fn limit(&self) -> usize {
        self.config.max_questions.clamp(1, MAX_QUESTIONS)
    }

    /// Produce 1 to 5 follow-up questions for `current`.
    ///
    /// `previous` is the member's earlier records, oldest first.
    pub async fn generate_follow_up_questions(
        &self,
        current: &StandupRecord,
        previous: &[StandupRecord],
        linked_tasks: &[LinkedTask],
        linked_reviews: &[LinkedReview],
    ) -> Vec<String> {
        let context = self.build_context(current, previous, linked_tasks, linked_reviews);
        let prompt = build_prompt(&context);

        let call = self
            .generator
            .invoke(&prompt, self.config.max_tokens, self.config.temperature);

        let mut questions = match tokio::time::timeout(self.config.timeout(), call).await {
            Ok(Ok(response)) => parse_questions(&response).unwrap_or_else(|| {
                warn!(
                    member_id = %current.member_id,
                    "Generated response held no usable questions, using fallback"
                );
                fallback_questions(current, linked_tasks, linked_reviews)
            }),
            Ok(Err(e)) => {
                warn!(member_id = %current.member_id, error = %e, "Question generation failed, using fallback");
                fallback_questions(current, linked_tasks, linked_reviews)
            }
            Err(_) => {
                warn!(
                    member_id = %current.member_id,
                    timeout_secs = self.config.timeout_secs,
                    "Question generation timed out, using fallback"
                );
                fallback_questions(current, linked_tasks, linked_reviews)
            }
        };

        questions.truncate(self.limit());
        debug!(count = questions.len(), "follow-up questions ready");
        questions
    }

    /// Summarize the standup and its surroundings for the prompt.
    pub fn build_context(
        &self,
        current: &StandupRecord,
        previous: &[StandupRecord],
        linked_tasks: &[LinkedTask],
        linked_reviews: &[LinkedReview],
    ) -> String {
        let items = self.config.context_items;
        let mut lines = vec![
            format!("Team member: {}", current.member_id),
            format!("Date: {}", current.date()),
            format!("Yesterday: {}", current.yesterday),
            format!("Today: {}", current.today),
            format!("Blockers: {}", current.blockers),
        ];

        if !linked_tasks.is_empty() {
            lines.push(format!("\nLinked tasks ({} total):", linked_tasks.len()));
            lines.extend(linked_tasks.iter().take(items).map(|task| {
                let line = format!("- {}: {} [{}]", task.id, task.title, task.status);
                match &task.priority {
                    Some(priority) => format!("{line} priority {priority}"),
                    None => line,
                }
            }));
        }

        if !linked_reviews.is_empty() {
            lines.push(format!("\nLinked reviews ({} total):", linked_reviews.len()));
            lines.extend(linked_reviews.iter().take(items).map(|review| {
                format!(
                    "- {}: {} [{}, {} comments]",
                    review.id,
                    review.title,
                    review.state.as_str(),
                    review.comment_count
                )
            }));
        }

        if let Some(prior) = previous.iter().rev().find(|r| r.has_blocker()) {
            lines.push(format!(
                "\nMost recent previous blocker ({}): {}",
                prior.date(),
                prior.blockers
            ));
        }

        let mut context = lines.join("\n");
        context.push('\n');
        context
    }
}

fn build_prompt(context: &str) -> String {
    format!(
        r#"You are assisting an engineering team lead who reviews daily standups.

Based on the standup below, write 3 to 5 short, specific follow-up questions
that would help uncover hidden blockers, risks or needs for support.

{context}
Respond with ONLY a JSON array of strings, for example:
["Question one?", "Question two?", "Question three?"]"#
    )
}

/// Parse questions from a generated response.
///
/// Tries a JSON array of strings first (tolerating a fenced code block),
/// then scans for question lines. Returns `None` when nothing usable is found.
pub fn parse_questions(response: &str) -> Option<Vec<String>> {
    let json = extract_json_from_response(response);
    if let Ok(parsed) = serde_json::from_str::<Vec<String>>(&json) {
        let questions: Vec<String> = parsed
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();
        if !questions.is_empty() {
            return Some(questions);
        }
    }

    let scanned: Vec<String> = response
        .lines()
        .map(strip_list_marker)
        .filter(|line| line.ends_with('?') && line.chars().count() > MIN_QUESTION_CHARS)
        .map(str::to_string)
        .collect();

    (!scanned.is_empty()).then_some(scanned)
}

/// Drop a leading `1.`, `2)`, `-`, `*` or `•` marker and surrounding quotes.
fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let without_number = {
        let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        let rest = &line[digits..];
        if digits > 0 && (rest.starts_with('.') || rest.starts_with(')')) {
            &rest[1..]
        } else {
            line
        }
    };
    without_number
        .trim_start_matches(['-', '*', '•'])
        .trim()
        .trim_end_matches(',')
        .trim_matches('"')
        .trim()
}

/// Deterministic questions used whenever generation is unavailable.
///
/// Always returns at least one question.
pub fn fallback_questions(
    current: &StandupRecord,
    linked_tasks: &[LinkedTask],
    linked_reviews: &[LinkedReview],
) -> Vec<String> {
    let mut questions = Vec::new();

    if current.has_blocker() {
        let blocker = truncate_with_ellipsis(current.blockers.trim(), FALLBACK_BLOCKER_CHARS);
        questions.push(format!(
            "What would it take to resolve \"{blocker}\", and who could help?"
        ));
        questions.push(format!(
            "How is \"{blocker}\" affecting your plans for today?"
        ));
    }

    let open_reviews = linked_reviews.iter().filter(|r| r.is_open()).count();
    if open_reviews > 2 {
        questions.push(format!(
            "You have {open_reviews} open reviews. Which should be prioritized to unblock merges?"
        ));
    }

    if linked_tasks.len() > 5 {
        questions.push(format!(
            "With {} linked tasks, which ones are the highest priority this week?",
            linked_tasks.len()
        ));
    }

    if questions.is_empty() {
        questions.extend(DEFAULT_QUESTIONS.iter().map(ToString::to_string));
    }

    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ReviewState, StandupSubmission};
    use crate::domain::ports::{GenerationError, UnavailableTextGenerator};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use mockall::mock;
    use std::time::Duration;

    mock! {
        pub Generator {}

        #[async_trait]
        impl TextGenerator for Generator {
            async fn invoke(
                &self,
                prompt: &str,
                max_tokens: u32,
                temperature: f32,
            ) -> Result<String, GenerationError>;
        }
    }

    struct SlowGenerator;

    #[async_trait]
    impl TextGenerator for SlowGenerator {
        async fn invoke(&self, _: &str, _: u32, _: f32) -> Result<String, GenerationError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(r#"["Never returned?"]"#.to_string())
        }
    }

    fn record(blockers: &str) -> StandupRecord {
        let submission = StandupSubmission::new("alice", "Fixed login bug", "Write tests", blockers);
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        StandupRecord::from_submission(&submission, at)
    }

    fn generator(inner: impl TextGenerator + 'static) -> QuestionGenerator {
        QuestionGenerator::new(Arc::new(inner), QuestionConfig::default())
    }

    #[tokio::test]
    async fn test_uses_generated_json_array() {
        let mut mock = MockGenerator::new();
        mock.expect_invoke()
            .times(1)
            .returning(|_, _, _| Ok(r#"["What is blocking the deploy?", "Who owns the fix?"]"#.to_string()));

        let questions = generator(mock)
            .generate_follow_up_questions(&record("None"), &[], &[], &[])
            .await;
        assert_eq!(
            questions,
            vec!["What is blocking the deploy?", "Who owns the fix?"]
        );
    }

    #[tokio::test]
    async fn test_prompt_carries_context() {
        let mut mock = MockGenerator::new();
        mock.expect_invoke()
            .withf(|prompt, max_tokens, _| {
                prompt.contains("Team member: alice")
                    && prompt.contains("Date: 2026-03-02")
                    && prompt.contains("JSON array")
                    && *max_tokens == 500
            })
            .returning(|_, _, _| Ok(r#"["Anything else blocking you?"]"#.to_string()));

        let questions = generator(mock)
            .generate_follow_up_questions(&record("None"), &[], &[], &[])
            .await;
        assert_eq!(questions.len(), 1);
    }

    #[tokio::test]
    async fn test_failing_generator_falls_back_to_defaults() {
        let mut mock = MockGenerator::new();
        mock.expect_invoke()
            .returning(|_, _, _| Err(GenerationError::Http { status: 503, body: "overloaded".into() }));

        let questions = generator(mock)
            .generate_follow_up_questions(&record("None"), &[], &[], &[])
            .await;
        assert_eq!(questions.len(), 3);
        assert!(questions.iter().all(|q| !q.trim().is_empty()));
    }

    #[tokio::test]
    async fn test_unconfigured_generator_falls_back() {
        let questions = generator(UnavailableTextGenerator::default())
            .generate_follow_up_questions(&record("Waiting on API keys"), &[], &[], &[])
            .await;
        assert_eq!(questions.len(), 2);
        assert!(questions[0].contains("Waiting on API keys"));
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let config = QuestionConfig {
            timeout_secs: 1,
            ..QuestionConfig::default()
        };
        let questions = QuestionGenerator::new(Arc::new(SlowGenerator), config)
            .generate_follow_up_questions(&record("none"), &[], &[], &[])
            .await;
        assert_eq!(questions.len(), 3);
    }

    #[tokio::test]
    async fn test_unparseable_response_falls_back() {
        let mut mock = MockGenerator::new();
        mock.expect_invoke()
            .returning(|_, _, _| Ok("I cannot help with that.".to_string()));

        let questions = generator(mock)
            .generate_follow_up_questions(&record("None"), &[], &[], &[])
            .await;
        assert_eq!(questions.len(), 3);
    }

    #[tokio::test]
    async fn test_output_is_capped_at_five() {
        let mut mock = MockGenerator::new();
        mock.expect_invoke().returning(|_, _, _| {
            Ok(r#"["Q1 is long?", "Q2 is long?", "Q3 is long?", "Q4 is long?", "Q5 is long?", "Q6 is long?", "Q7 is long?"]"#.to_string())
        });

        let questions = generator(mock)
            .generate_follow_up_questions(&record("None"), &[], &[], &[])
            .await;
        assert_eq!(questions.len(), 5);
    }

    #[test]
    fn test_parse_fenced_json() {
        let response = "Here you go:\n```json\n[\"How can we help with CI?\"]\n```";
        assert_eq!(
            parse_questions(response),
            Some(vec!["How can we help with CI?".to_string()])
        );
    }

    #[test]
    fn test_parse_line_scan_strips_markers() {
        let response = "Some questions:\n1. What is blocking the release?\n- Who can review PR 12?\n* ok?\nNot a question.";
        assert_eq!(
            parse_questions(response),
            Some(vec![
                "What is blocking the release?".to_string(),
                "Who can review PR 12?".to_string(),
            ])
        );
    }

    #[test]
    fn test_parse_rejects_empty_array() {
        assert_eq!(parse_questions("[]"), None);
        assert_eq!(parse_questions(r#"["", "  "]"#), None);
    }

    #[test]
    fn test_fallback_blocker_text_is_truncated() {
        let long = "x".repeat(80);
        let questions = fallback_questions(&record(&long), &[], &[]);
        assert_eq!(questions.len(), 2);
        assert!(questions[0].contains(&format!("{}...", "x".repeat(50))));
        assert!(!questions[0].contains(&"x".repeat(51)));
    }

    #[test]
    fn test_fallback_reviews_and_tasks() {
        let reviews: Vec<LinkedReview> = (0..3)
            .map(|i| LinkedReview::new(format!("PR-{i}"), "Change", ReviewState::Open))
            .collect();
        let tasks: Vec<LinkedTask> = (0..6)
            .map(|i| LinkedTask::new(format!("T-{i}"), "Task", "in_progress"))
            .collect();

        let questions = fallback_questions(&record("None"), &tasks, &reviews);
        assert_eq!(questions.len(), 2);
        assert!(questions[0].contains("3 open reviews"));
        assert!(questions[1].contains("6 linked tasks"));
    }

    #[test]
    fn test_fallback_ignores_merged_reviews() {
        let reviews: Vec<LinkedReview> = (0..4)
            .map(|i| LinkedReview::new(format!("PR-{i}"), "Change", ReviewState::Merged))
            .collect();
        let questions = fallback_questions(&record("None"), &[], &reviews);
        assert_eq!(questions.len(), 3);
    }

    #[test]
    fn test_context_includes_most_recent_prior_blocker() {
        let qg = generator(UnavailableTextGenerator::default());
        let mut older = record("Flaky CI");
        older.timestamp = "2026-02-27T09:00:00.000Z".to_string();
        let mut newer = record("VPN outage");
        newer.timestamp = "2026-03-01T09:00:00.000Z".to_string();
        let clear = record("none");

        let tasks: Vec<LinkedTask> = (0..7)
            .map(|i| LinkedTask::new(format!("T-{i}"), "Task", "open"))
            .collect();

        let context = qg.build_context(&record("None"), &[older, newer, clear], &tasks, &[]);
        assert!(context.contains("Most recent previous blocker (2026-03-01): VPN outage"));
        assert!(context.contains("Linked tasks (7 total)"));
        assert!(context.contains("T-4"));
        assert!(!context.contains("T-5"));
    }

    #[test]
    fn test_context_lists_priorities_and_reviews() {
        let qg = generator(UnavailableTextGenerator::default());
        let tasks = vec![
            LinkedTask::new("T-1", "Fix login", "in_progress").with_priority("high"),
            LinkedTask::new("T-2", "Docs", "open"),
        ];
        let reviews = vec![LinkedReview::new("PR-9", "Add retries", ReviewState::Open).with_comments(2)];

        let context = qg.build_context(&record("none"), &[], &tasks, &reviews);
        let lines: Vec<&str> = context.lines().collect();

        assert_eq!(lines[0], "Team member: alice");
        assert_eq!(lines[4], "Blockers: none");
        assert!(lines.contains(&"- T-1: Fix login [in_progress] priority high"));
        assert!(lines.contains(&"- T-2: Docs [open]"));
        assert!(lines.contains(&"Linked reviews (1 total):"));
        assert!(lines.contains(&"- PR-9: Add retries [open, 2 comments]"));
        assert!(!context.contains("Most recent previous blocker"));
        assert!(context.ends_with("comments]\n"));
    }
}
