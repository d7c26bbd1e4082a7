//! Standup submissions and the immutable records built from them.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// Key prefix under which every standup record is stored.
pub const RECORD_PREFIX: &str = "standups/";

/// Returns true when a blocker text reports an actual impediment.
///
/// Blank text and a case-insensitive "none" both mean "no blocker".
pub fn is_reported_blocker(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("none")
}

/// Formats a timestamp in the fixed-width UTC form used for record keys and
/// window comparisons (`2026-10-17T09:30:00.000Z`).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Store prefix holding all records of one member.
pub fn member_prefix(member_id: &str) -> String {
    format!("{RECORD_PREFIX}{member_id}/")
}

/// A standup update as received from the ingestion surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandupSubmission {
    #[serde(default)]
    pub member_id: String,
    #[serde(default)]
    pub yesterday: String,
    #[serde(default)]
    pub today: String,
    #[serde(default)]
    pub blockers: String,
}

impl StandupSubmission {
    pub fn new(
        member_id: impl Into<String>,
        yesterday: impl Into<String>,
        today: impl Into<String>,
        blockers: impl Into<String>,
    ) -> Self {
        Self {
            member_id: member_id.into(),
            yesterday: yesterday.into(),
            today: today.into(),
            blockers: blockers.into(),
        }
    }

    /// Validate that every required field is present.
    ///
    /// All missing fields are reported at once. A member id may not contain
    /// `/` since it becomes a segment of the storage key.
    pub fn validate(&self) -> DomainResult<()> {
        let missing: Vec<&'static str> = [
            ("member_id", &self.member_id),
            ("yesterday", &self.yesterday),
            ("today", &self.today),
            ("blockers", &self.blockers),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(DomainError::MissingFields(missing));
        }

        if self.member_id.contains('/') {
            return Err(DomainError::ValidationFailed(format!(
                "member_id '{}' must not contain '/'",
                self.member_id
            )));
        }

        Ok(())
    }
}

/// An immutable, append-only standup record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandupRecord {
    pub id: Uuid,
    pub member_id: String,
    /// ISO-8601 UTC timestamp, see [`format_timestamp`]
    pub timestamp: String,
    pub yesterday: String,
    pub today: String,
    pub blockers: String,
    #[serde(default)]
    pub linked_task_refs: Vec<String>,
    #[serde(default)]
    pub linked_review_refs: Vec<String>,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
    #[serde(default)]
    pub insights: Vec<String>,
}

impl StandupRecord {
    /// Start a record from a validated submission.
    pub fn from_submission(submission: &StandupSubmission, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            member_id: submission.member_id.trim().to_string(),
            timestamp: format_timestamp(at),
            yesterday: submission.yesterday.trim().to_string(),
            today: submission.today.trim().to_string(),
            blockers: submission.blockers.trim().to_string(),
            linked_task_refs: Vec::new(),
            linked_review_refs: Vec::new(),
            follow_up_questions: Vec::new(),
            insights: Vec::new(),
        }
    }

    pub fn with_linked_tasks(mut self, refs: Vec<String>) -> Self {
        self.linked_task_refs = refs;
        self
    }

    pub fn with_linked_reviews(mut self, refs: Vec<String>) -> Self {
        self.linked_review_refs = refs;
        self
    }

    pub fn with_follow_up_questions(mut self, questions: Vec<String>) -> Self {
        self.follow_up_questions = questions;
        self
    }

    pub fn with_insights(mut self, insights: Vec<String>) -> Self {
        self.insights = insights;
        self
    }

    pub fn has_blocker(&self) -> bool {
        is_reported_blocker(&self.blockers)
    }

    /// Storage key; sorts chronologically within a member prefix.
    pub fn storage_key(&self) -> String {
        format!(
            "{}{}-{}.json",
            member_prefix(&self.member_id),
            self.timestamp,
            self.id
        )
    }

    /// Calendar date part of the timestamp (`YYYY-MM-DD`).
    pub fn date(&self) -> &str {
        self.timestamp.get(..10).unwrap_or(&self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn submission() -> StandupSubmission {
        StandupSubmission::new("alice", "Wrote tests", "Ship parser", "None")
    }

    #[test]
    fn test_validate_accepts_complete_submission() {
        assert!(submission().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_all_missing_fields() {
        let sub = StandupSubmission::new("", "done", "  ", "");
        match sub.validate() {
            Err(DomainError::MissingFields(fields)) => {
                assert_eq!(fields, vec!["member_id", "today", "blockers"]);
            }
            other => panic!("Expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_slash_in_member_id() {
        let sub = StandupSubmission::new("team/alice", "a", "b", "none");
        assert!(matches!(sub.validate(), Err(DomainError::ValidationFailed(_))));
    }

    #[test]
    fn test_reported_blocker() {
        assert!(!is_reported_blocker(""));
        assert!(!is_reported_blocker("   "));
        assert!(!is_reported_blocker("None"));
        assert!(!is_reported_blocker(" NONE "));
        assert!(is_reported_blocker("Waiting on API keys"));
        assert!(is_reported_blocker("none yet, but CI is flaky"));
    }

    #[test]
    fn test_timestamp_format_is_fixed_width() {
        let at = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(format_timestamp(at), "2026-03-04T05:06:07.000Z");
    }

    #[test]
    fn test_storage_key_is_under_member_prefix() {
        let at = Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap();
        let record = StandupRecord::from_submission(&submission(), at);
        let key = record.storage_key();
        assert!(key.starts_with("standups/alice/2026-03-04T09:00:00.000Z-"));
        assert!(key.ends_with(".json"));
        assert_eq!(record.date(), "2026-03-04");
    }

    #[test]
    fn test_record_serde_defaults_missing_lists() {
        let json = r#"{
            "id": "7f0c5f2e-8a77-4e67-9a4a-3f1c2b9e0d11",
            "member_id": "bob",
            "timestamp": "2026-01-01T09:00:00.000Z",
            "yesterday": "x",
            "today": "y",
            "blockers": "none"
        }"#;
        let record: StandupRecord = serde_json::from_str(json).unwrap();
        assert!(record.linked_task_refs.is_empty());
        assert!(record.follow_up_questions.is_empty());
        assert!(!record.has_blocker());
    }
}
