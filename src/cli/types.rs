//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pulse")]
#[command(about = "Standup analytics: metrics, trends, insights and follow-up questions", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Directory holding config.yaml and local.yaml
    #[arg(long, global = true, default_value = ".pulse", env = "PULSE_CONFIG_DIR")]
    pub config_dir: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a standup and get follow-up questions
    Submit(SubmitArgs),

    /// Show metrics, trends and insights for the team or one member
    Report(ReportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    /// Team member identifier
    #[arg(short, long)]
    pub member: String,

    /// What was done yesterday
    #[arg(short, long)]
    pub yesterday: String,

    /// What is planned for today
    #[arg(short, long)]
    pub today: String,

    /// Current blockers ("None" when there are none)
    #[arg(short, long, default_value = "None")]
    pub blockers: String,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Restrict the report to one member
    #[arg(short, long)]
    pub member: Option<String>,

    /// First day included (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Last day included (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    pub to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_submit() {
        let cli = Cli::try_parse_from([
            "pulse", "submit", "-m", "alice", "-y", "Fixed bug", "-t", "Tests",
        ])
        .unwrap();

        match cli.command {
            Commands::Submit(args) => {
                assert_eq!(args.member, "alice");
                assert_eq!(args.blockers, "None");
            }
            Commands::Report(_) => panic!("expected submit"),
        }
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_report_with_window() {
        let cli = Cli::try_parse_from([
            "pulse", "--json", "report", "--from", "2026-01-01", "--to", "2026-01-31",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Report(args) => {
                assert!(args.member.is_none());
                assert_eq!(args.from.as_deref(), Some("2026-01-01"));
            }
            Commands::Submit(_) => panic!("expected report"),
        }
    }

    #[test]
    fn test_report_window_needs_both_bounds() {
        assert!(Cli::try_parse_from(["pulse", "report", "--from", "2026-01-01"]).is_err());
    }
}
