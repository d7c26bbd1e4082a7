//! Command implementations and the service wiring they share.

pub mod report;
pub mod submit;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::domain::models::Config;
use crate::domain::ports::{NullCodeReview, NullIssueTracker, TextGenerator, UnavailableTextGenerator};
use crate::infrastructure::claude::AnthropicTextGenerator;
use crate::infrastructure::database::{DatabaseConnection, SqliteRecordStore};
use crate::services::StandupService;

/// Connect the configured store and text generator to a [`StandupService`].
///
/// Without an API key, questions come from the deterministic fallback.
pub async fn build_service(config: &Config) -> Result<StandupService> {
    let db = DatabaseConnection::new(&config.store.database_url)
        .await
        .with_context(|| format!("Failed to open record store at {}", config.store.database_url))?;
    db.migrate().await?;

    let store = Arc::new(SqliteRecordStore::new(db.pool().clone()));

    let generator: Arc<dyn TextGenerator> =
        match AnthropicTextGenerator::resolve_api_key(&config.llm) {
            Some(api_key) => Arc::new(AnthropicTextGenerator::new(&config.llm, api_key)?),
            None => {
                info!("No Anthropic API key configured, using fallback follow-up questions");
                Arc::new(UnavailableTextGenerator::default())
            }
        };

    Ok(StandupService::new(
        store,
        Arc::new(NullIssueTracker),
        Arc::new(NullCodeReview),
        generator,
        config,
    ))
}
