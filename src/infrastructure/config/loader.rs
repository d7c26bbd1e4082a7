use std::path::Path;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project-local configuration directory
pub const CONFIG_DIR: &str = ".pulse";

/// Prefix for environment overrides (`PULSE_STORE__BATCH_SIZE=50`)
pub const ENV_PREFIX: &str = "PULSE_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Database URL cannot be empty")]
    EmptyDatabaseUrl,

    #[error("Invalid batch_size: {0}. Must be at least 1")]
    InvalidBatchSize(usize),

    #[error("Invalid max_questions: {0}. Must be between 1 and 5")]
    InvalidMaxQuestions(usize),

    #[error("Invalid temperature: {0}. Must be between 0.0 and 1.0")]
    InvalidTemperature(f32),

    #[error("Invalid {0}: timeout must be at least 1 second")]
    InvalidTimeout(&'static str),

    #[error("Invalid threshold {name}: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error(
        "Invalid scoring thresholds: medium_threshold ({0}) must be less than high_threshold ({1})"
    )]
    InvalidScoringThresholds(f64, f64),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .pulse/config.yaml
    /// 3. .pulse/local.yaml (optional overrides)
    /// 4. Environment variables (PULSE_* prefix, `__` separates sections)
    pub fn load() -> Result<Config> {
        Self::load_from_dir(CONFIG_DIR)
    }

    /// Same as [`ConfigLoader::load`] with the YAML files taken from `dir`
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Config> {
        let dir = dir.as_ref();
        let config: Config = Self::figment(dir)
            .extract()
            .context(format!("Failed to load configuration from {}", dir.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a single file, without environment overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment(dir: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.store.database_url.trim().is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }

        if config.store.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(config.store.batch_size));
        }

        let questions = &config.questions;
        if !(1..=5).contains(&questions.max_questions) {
            return Err(ConfigError::InvalidMaxQuestions(questions.max_questions));
        }

        if !(0.0..=1.0).contains(&questions.temperature) {
            return Err(ConfigError::InvalidTemperature(questions.temperature));
        }

        if questions.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("questions.timeout_secs"));
        }

        if config.adapters.lookup_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("adapters.lookup_timeout_secs"));
        }

        if config.llm.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("llm.request_timeout_secs"));
        }

        let thresholds = &config.thresholds;
        for (name, value) in [
            ("high_task_load", thresholds.high_task_load),
            ("review_backlog", thresholds.review_backlog),
        ] {
            if value < 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }

        if !(0.0..=100.0).contains(&thresholds.blocker_frequency_pct) {
            return Err(ConfigError::InvalidThreshold {
                name: "blocker_frequency_pct",
                value: thresholds.blocker_frequency_pct,
            });
        }

        if config.scoring.medium_threshold >= config.scoring.high_threshold {
            return Err(ConfigError::InvalidScoringThresholds(
                config.scoring.medium_threshold,
                config.scoring.high_threshold,
            ));
        }

        if config.llm.initial_backoff_ms >= config.llm.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.llm.initial_backoff_ms,
                config.llm.max_backoff_ms,
            ));
        }

        Ok(())
    }
}
