//! List handler for the vault tasks MCP server

use crate::VaultServerHandler;
use crate::formatting;
use crate::tasks::read_vault_tasks;
use crate::validation;
use mcp_attr::Result as McpResult;

impl VaultServerHandler {
    /// Handles listing every task in the vault, with optional path exclusions.
    pub async fn handle_list(
        &self,
        exclude_paths: Option<String>,
        full: Option<bool>,
    ) -> McpResult<String> {
        let exclusions = validation::parse_exclude_paths_param(exclude_paths.as_deref())?;

        let mut tasks = read_vault_tasks(&self.vault).map_err(validation::engine_error)?;
        formatting::apply_path_exclusions(&mut tasks, &exclusions);

        formatting::format_tasks_json(&tasks, full.unwrap_or(false))
            .map_err(validation::output_error)
    }
}
