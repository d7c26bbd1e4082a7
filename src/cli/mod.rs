//! Command-line surface for submitting standups and reading analytics.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use crate::domain::errors::DomainError;

/// Exit code for requests that were rejected as invalid.
pub const EXIT_INVALID: i32 = 2;

/// Print `err` and exit the process.
///
/// Validation failures exit with [`EXIT_INVALID`]; everything else with 1.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    if json {
        let body = serde_json::json!({ "error": format!("{err:#}") });
        eprintln!("{body}");
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(exit_code(&err));
}

fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<DomainError>() {
        Some(domain) if domain.is_validation() => EXIT_INVALID,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_validation_errors_exit_with_two() {
        let err = anyhow::Error::new(DomainError::MissingFields(vec!["today"]));
        assert_eq!(exit_code(&err), EXIT_INVALID);

        let wrapped: anyhow::Result<()> =
            Err(DomainError::ValidationFailed("bad member".into())).context("submit failed");
        assert_eq!(exit_code(&wrapped.unwrap_err()), EXIT_INVALID);
    }

    #[test]
    fn test_other_errors_exit_with_one() {
        let err = anyhow::anyhow!("database unavailable");
        assert_eq!(exit_code(&err), 1);
    }
}
