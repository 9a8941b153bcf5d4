//! Validation helper functions for the CLI and MCP front ends
//!
//! This module contains validation logic for vault paths, path exclusion
//! lists and reference dates, plus the mapping of engine errors onto MCP
//! errors.

use crate::error::Error;
use crate::tasks::{DateResolver, local_date_today};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use mcp_attr::Result as McpResult;
use std::path::Path;

/// Check that the vault root exists and is a directory
///
/// # Arguments
/// * `path` - Vault root given on the command line or via `VAULT_PATH`
pub fn validate_vault_root(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("Vault path does not exist: {}", path.display());
    }
    if !path.is_dir() {
        bail!("Vault path is not a directory: {}", path.display());
    }
    Ok(())
}

/// Split a comma-separated list of path prefixes
///
/// # Arguments
/// * `paths` - e.g. `".claude, archived"`
///
/// # Returns
/// The trimmed, non-empty prefixes, or an error when none are left
pub fn parse_exclude_paths(paths: &str) -> Result<Vec<String>, String> {
    let prefixes: Vec<String> = paths
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    if prefixes.is_empty() {
        return Err(format!(
            "Invalid path filter '{}'. Provide at least one non-empty path, separated by commas",
            paths
        ));
    }
    Ok(prefixes)
}

/// Resolve a reference date override against today
///
/// Accepts anything a query accepts (`2025-11-12`, `tomorrow`, ...).
pub fn parse_reference_date(date_str: &str) -> Result<NaiveDate, Error> {
    DateResolver::new(local_date_today()).resolve(date_str)
}

/// Parse and validate the optional `exclude_paths` tool parameter
pub fn parse_exclude_paths_param(paths: Option<&str>) -> McpResult<Vec<String>> {
    match paths {
        None => Ok(Vec::new()),
        Some(paths) => parse_exclude_paths(paths).map_err(invalid_params),
    }
}

/// Parse and validate the optional `today` tool parameter
pub fn parse_reference_date_param(date_str: Option<&str>) -> McpResult<NaiveDate> {
    match date_str {
        None => Ok(local_date_today()),
        Some(date_str) => parse_reference_date(date_str).map_err(engine_error),
    }
}

/// Map an engine error onto an MCP error
///
/// Query and date errors are the caller's fault (`INVALID_PARAMS`); I/O
/// errors are internal.
pub fn engine_error(err: Error) -> mcp_attr::Error {
    match err {
        Error::QueryParse { .. } | Error::InvalidDate { .. } => invalid_params(err.to_string()),
        Error::Io(_) => mcp_attr::Error::new(mcp_attr::ErrorCode::INTERNAL_ERROR)
            .with_message(format!("Failed to read vault: {}", err), true),
    }
}

/// Map an output serialization failure onto an MCP error
pub fn output_error(err: serde_json::Error) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INTERNAL_ERROR)
        .with_message(format!("Failed to format tasks: {}", err), true)
}

fn invalid_params(message: String) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(message, true)
}
