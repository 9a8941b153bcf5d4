//! Reading vault tasks and applying queries to them

use super::extractor::parse_task_line;
use super::filter::Filter;
use super::query_parser::QueryParser;
use super::task::{Task, local_date_today};
use crate::error::Result;
use crate::vault::Vault;
use chrono::NaiveDate;

/// Read every task from every markdown file in the vault
///
/// Tasks come back in file order, then line order. Any I/O failure aborts
/// the whole read.
pub fn read_vault_tasks(vault: &Vault) -> Result<Vec<Task>> {
    let files = vault.markdown_files()?;
    let mut tasks = Vec::new();

    for file in &files {
        let relative = vault.relative_path(file);
        let content = vault.read(file)?;
        let before = tasks.len();
        tasks.extend(extract_tasks(&content, &relative));
        tracing::debug!(file = %relative, tasks = tasks.len() - before, "scanned file");
    }

    tracing::debug!(
        root = %vault.root().display(),
        files = files.len(),
        tasks = tasks.len(),
        "read vault tasks"
    );
    Ok(tasks)
}

/// Extract the valid tasks of one file's contents
pub fn extract_tasks(content: &str, file_path: &str) -> Vec<Task> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| parse_task_line(line, file_path, index + 1))
        .collect()
}

/// Keep the tasks matching `filter`, in their original order
pub fn filter_tasks(mut tasks: Vec<Task>, filter: &Filter) -> Vec<Task> {
    tasks.retain(|task| filter.matches(task));
    tasks
}

/// Run a query against tasks, resolving relative dates against today
pub fn execute_query(tasks: Vec<Task>, query_source: &str) -> Result<Vec<Task>> {
    execute_query_at(tasks, query_source, local_date_today())
}

/// Run a query against tasks with an explicit reference date
///
/// # Errors
/// A malformed query fails before any task is looked at.
pub fn execute_query_at(
    tasks: Vec<Task>,
    query_source: &str,
    reference: NaiveDate,
) -> Result<Vec<Task>> {
    let filter = QueryParser::new(reference).parse(query_source)?;
    Ok(filter_tasks(tasks, &filter))
}
