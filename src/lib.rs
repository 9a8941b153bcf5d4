//! Vault Tasks Library
//!
//! This library finds checkbox tasks in a vault of markdown notes and
//! filters them with a query language compatible with the Obsidian Tasks
//! plugin. It also provides a Model Context Protocol (MCP) server exposing
//! the queries as tools.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **MCP Layer**: `VaultServerHandler` - Handles MCP protocol communication
//! - **Domain Layer**: `tasks` module - Task extraction, query parsing and filtering
//! - **Vault Layer**: `vault` module - Read-only enumeration of markdown files
//!
//! # Example
//!
//! ```no_run
//! use vault_tasks::query;
//!
//! # fn main() -> vault_tasks::Result<()> {
//! let open_and_urgent = query("/path/to/vault", "not done\npriority is above medium")?;
//! for task in open_and_urgent {
//!     println!("{}:{} {}", task.file_path, task.line_number, task.description);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
pub mod formatting;
mod handlers;
pub mod tasks;
pub mod validation;
mod vault;

use anyhow::Result as AnyResult;
use chrono::NaiveDate;
use mcp_attr::Result as McpResult;
use mcp_attr::server::{McpServer, mcp_server};
use std::path::Path;
use tracing_subscriber::EnvFilter;

// Re-export commonly used types
pub use error::{Error, Result};
pub use tasks::{DateField, Filter, Priority, QueryParser, Task};
pub use vault::Vault;

/// Run a query against every task in the vault
///
/// Relative dates (`today`, `tomorrow`, ...) are resolved against the local
/// current date. An empty result is not an error.
///
/// # Errors
/// [`Error::QueryParse`] or [`Error::InvalidDate`] for a malformed query,
/// [`Error::Io`] when the vault cannot be read
pub fn query(vault_root: impl AsRef<Path>, query_source: &str) -> Result<Vec<Task>> {
    query_at(vault_root, query_source, tasks::local_date_today())
}

/// Like [`query`] with an explicit reference date for relative phrases
pub fn query_at(
    vault_root: impl AsRef<Path>,
    query_source: &str,
    reference: NaiveDate,
) -> Result<Vec<Task>> {
    let filter = QueryParser::new(reference).parse(query_source)?;
    let all = tasks::read_vault_tasks(&Vault::new(vault_root))?;
    Ok(tasks::filter_tasks(all, &filter))
}

/// Every valid task in the vault, in file then line order
pub fn read_all_tasks(vault_root: impl AsRef<Path>) -> Result<Vec<Task>> {
    tasks::read_vault_tasks(&Vault::new(vault_root))
}

/// Install the stderr log subscriber used by the binaries
///
/// Honors `RUST_LOG`; defaults to `warn`. Logs never go to stdout, which
/// carries JSON output and the MCP stdio transport.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// MCP Server handler for vault task queries
///
/// Every tool call re-scans the vault; nothing is cached between calls.
pub struct VaultServerHandler {
    pub(crate) vault: Vault,
}

impl VaultServerHandler {
    /// Create a new handler for the vault at `vault_root`
    ///
    /// # Arguments
    /// * `vault_root` - Directory containing the markdown notes
    ///
    /// # Returns
    /// Result containing the handler, or an error if the directory is missing
    ///
    /// # Example
    /// ```no_run
    /// # use vault_tasks::VaultServerHandler;
    /// # fn main() -> anyhow::Result<()> {
    /// let handler = VaultServerHandler::new("/path/to/vault")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(vault_root: impl AsRef<Path>) -> AnyResult<Self> {
        validation::validate_vault_root(vault_root.as_ref())?;
        Ok(Self {
            vault: Vault::new(vault_root),
        })
    }
}

/// Task queries over an Obsidian vault, using the Obsidian Tasks query syntax.
///
/// Tasks are markdown checkbox lines (`- [ ] Call the bank ⏫ 📅 2025-11-13`) with
/// emoji metadata at the end: priority 🔺 ⏫ 🔼 🔽 ⏬, due 📅, scheduled ⏳, start 🛫,
/// done ✅, created ➕, cancelled ❌.
///
/// Query syntax, one filter per line (lines are ANDed):
/// - `done`, `not done`
/// - `due|scheduled|start|done|created|cancelled before|after|on <date>`
/// - `happens before|after|on <date>` (any of start, scheduled, due)
/// - `has|no <field> date`
/// - `priority is [not|above|below] highest|high|medium|low|lowest|none`
/// - `(filter) AND (filter)`, `(filter) OR (filter)`, `NOT (filter)`
///
/// Dates are `YYYY-MM-DD` or one of: today, tomorrow, yesterday, in one week, in two weeks.
#[mcp_server]
impl McpServer for VaultServerHandler {
    /// **Query tasks**: Find tasks in the vault matching an Obsidian Tasks query.
    /// Returns JSON `{"tasks": [...], "count": N}`.
    #[tool]
    async fn query_tasks(
        &self,
        /// Query: one filter per line (e.g. "not done\nhappens before tomorrow")
        query: String,
        /// Exclude paths: comma-separated path prefixes to leave out (optional)
        exclude_paths: Option<String>,
        /// Full: include unset date fields as null (optional)
        full: Option<bool>,
        /// Today: reference date YYYY-MM-DD for relative dates (optional)
        today: Option<String>,
    ) -> McpResult<String> {
        self.handle_query(query, exclude_paths, full, today).await
    }

    /// **List tasks**: Every task in the vault, unfiltered.
    /// Returns JSON `{"tasks": [...], "count": N}`.
    #[tool]
    async fn list_tasks(
        &self,
        /// Exclude paths: comma-separated path prefixes to leave out (optional)
        exclude_paths: Option<String>,
        /// Full: include unset date fields as null (optional)
        full: Option<bool>,
    ) -> McpResult<String> {
        self.handle_list(exclude_paths, full).await
    }
}
