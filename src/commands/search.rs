//! Search command implementation.

use crate::config::Config;
use crate::ecs::{EcsConnection, ItemSearch, Params};
use crate::format::Formatter;
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Executes an item search.
pub struct SearchCommand {
    config: Config,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the search and returns formatted output.
    pub async fn execute(&self, search_index: &str, params: Params) -> Result<String> {
        let client =
            EcsConnection::new(&self.config).context("Failed to create ECS connection")?;

        self.execute_with_client(&client, search_index, params).await
    }

    /// Executes the search with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl ItemSearch,
        search_index: &str,
        params: Params,
    ) -> Result<String> {
        debug!("Search parameters: {:?}", params);

        let results = client
            .item_search(search_index, params)
            .await
            .with_context(|| format!("ItemSearch in {} failed", search_index))?;

        for err in &results.errors {
            warn!("{}: {}", err.code, err.message);
        }

        info!("Found {} items", results.len());

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_results(&results))
    }
}

/// Parses a `Name=Value` request parameter.
pub fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("invalid parameter '{}': expected Name=Value", s)),
    }
}
