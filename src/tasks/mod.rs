//! Task extraction and querying
//!
//! This module contains the query engine, split into submodules:
//! - `task`: Task record, priorities and dated fields
//! - `extractor`: Markdown line to task, via trailing emoji metadata
//! - `date_resolver`: Relative and absolute date tokens
//! - `filter`: Filter tree and its evaluation
//! - `query_parser`: Query text to filter tree
//! - `executor`: Vault scanning and query execution

mod date_resolver;
mod executor;
mod extractor;
mod filter;
mod query_parser;
mod task;

// Re-export all public types
pub use date_resolver::DateResolver;
pub use executor::{
    execute_query, execute_query_at, extract_tasks, filter_tasks, read_vault_tasks,
};
pub use extractor::parse_task_line;
pub use filter::{DateComparison, Filter, PriorityComparison};
pub use query_parser::{QueryParser, parse_query};
pub use task::{DateField, Priority, Task, local_date_today, priority_rank};
