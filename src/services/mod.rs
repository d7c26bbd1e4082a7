//! Service layer: the analytics engine and the standup pipeline built on it.

pub mod aggregator;
pub mod insight_engine;
pub mod pattern_detector;
pub mod question_generator;
pub mod standup_service;

pub use aggregator::{aggregate, MetricsAccumulator};
pub use insight_engine::InsightEngine;
pub use pattern_detector::{
    consistency_score, detect_sample_trends, detect_trend, detect_trends, find_recurring_blockers,
    productivity_score, trend_from_values,
};
pub use question_generator::QuestionGenerator;
pub use standup_service::StandupService;

/// Keep the first `max_chars` characters of `text`, appending "..." when
/// anything was cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Extract the JSON payload from an LLM response.
///
/// Handles fenced code blocks (```json ... ``` or ``` ... ```) and otherwise
/// returns the span from the first opening bracket to the matching last
/// closing bracket, falling back to the trimmed input.
pub fn extract_json_from_response(response: &str) -> String {
    let trimmed = response.trim();

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        let body_start = after_fence.find('\n').map_or(0, |i| i + 1);
        let body = &after_fence[body_start..];
        if let Some(end) = body.find("```") {
            return body[..end].trim().to_string();
        }
    }

    for (open, close) in [('[', ']'), ('{', '}')] {
        if let (Some(start), Some(end)) = (trimmed.find(open), trimmed.rfind(close)) {
            if start < end {
                return trimmed[start..=end].to_string();
            }
        }
    }

    trimmed.to_string()
}
