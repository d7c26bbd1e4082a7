//! Output formatting utilities for the CLI.

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use serde::Serialize;

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Borderless table with upper-cased headers.
pub fn list_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h.to_uppercase()).set_alignment(CellAlignment::Left)),
        );
    table
}

/// Section title followed by its body, or a placeholder when empty.
pub fn section(title: &str, body: &str, empty: &str) -> String {
    if body.trim().is_empty() {
        format!("{title}:\n  {empty}")
    } else {
        format!("{title}:\n{body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_table_headers() {
        let mut table = list_table(&["metric", "value"]);
        table.add_row(vec!["standups", "3"]);
        let rendered = table.to_string();
        assert!(rendered.contains("METRIC"));
        assert!(rendered.contains("standups"));
    }

    #[test]
    fn test_section_placeholder() {
        assert_eq!(section("Trends", "", "none"), "Trends:\n  none");
        assert_eq!(section("Trends", "  a", "none"), "Trends:\n  a");
    }
}
