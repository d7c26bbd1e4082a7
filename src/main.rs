//! Standup Pulse CLI entry point.

use clap::Parser;

use standup_pulse::cli::{commands, Cli, Commands};
use standup_pulse::infrastructure::config::ConfigLoader;
use standup_pulse::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load_from_dir(&cli.config_dir) {
        Ok(config) => config,
        Err(err) => standup_pulse::cli::handle_error(err, cli.json),
    };

    // Held until exit so the file writer flushes.
    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => standup_pulse::cli::handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Submit(args) => commands::submit::execute(args, &config, cli.json).await,
        Commands::Report(args) => commands::report::execute(args, &config, cli.json).await,
    };

    if let Err(err) = result {
        standup_pulse::cli::handle_error(err, cli.json);
    }
}
