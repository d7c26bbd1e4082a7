//! Objective work signals returned by the issue-tracker and code-review ports.
//!
//! Optional upstream fields are explicit `Option`s; adapters fill them once
//! at the boundary so call sites never inspect raw JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task assigned to a member in the issue tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedTask {
    pub id: String,
    pub title: String,
    /// Upstream status name; defaults to "unknown" when the tracker omits it
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_status() -> String {
    "unknown".to_string()
}

impl LinkedTask {
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: status.into(),
            priority: None,
            updated_at: None,
        }
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }
}

/// Review lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewState {
    #[default]
    Open,
    Draft,
    Merged,
    Closed,
}

impl ReviewState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Draft => "draft",
            Self::Merged => "merged",
            Self::Closed => "closed",
        }
    }
}

/// A code review (pull request) authored by a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedReview {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub state: ReviewState,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviewers: Vec<String>,
}

impl LinkedReview {
    pub fn new(id: impl Into<String>, title: impl Into<String>, state: ReviewState) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            state,
            comment_count: 0,
            created_at: None,
            updated_at: None,
            reviewers: Vec::new(),
        }
    }

    pub fn with_comments(mut self, comment_count: u32) -> Self {
        self.comment_count = comment_count;
        self
    }

    /// Open and draft reviews still need attention.
    pub fn is_open(&self) -> bool {
        matches!(self.state, ReviewState::Open | ReviewState::Draft)
    }
}
