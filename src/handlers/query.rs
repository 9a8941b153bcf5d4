//! Query handler for the vault tasks MCP server

use crate::VaultServerHandler;
use crate::formatting;
use crate::tasks::{QueryParser, filter_tasks, read_vault_tasks};
use crate::validation;
use mcp_attr::Result as McpResult;

impl VaultServerHandler {
    /// Handles task queries - parses the query, scans the vault and formats the matches.
    pub async fn handle_query(
        &self,
        query: String,
        exclude_paths: Option<String>,
        full: Option<bool>,
        today: Option<String>,
    ) -> McpResult<String> {
        // Validate everything before touching the vault
        let reference = validation::parse_reference_date_param(today.as_deref())?;
        let exclusions = validation::parse_exclude_paths_param(exclude_paths.as_deref())?;
        let filter = QueryParser::new(reference)
            .parse(&query)
            .map_err(validation::engine_error)?;

        let tasks = read_vault_tasks(&self.vault).map_err(validation::engine_error)?;
        let mut matches = filter_tasks(tasks, &filter);
        formatting::apply_path_exclusions(&mut matches, &exclusions);

        tracing::info!(matches = matches.len(), "query_tasks");
        formatting::format_tasks_json(&matches, full.unwrap_or(false))
            .map_err(validation::output_error)
    }
}
