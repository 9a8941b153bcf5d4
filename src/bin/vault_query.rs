//! Standalone CLI for task queries
//!
//! ```text
//! vault-query "not done"
//! vault-query --raw "not done"
//! vault-query --filter .claude,archived "not done" /path/to/vault
//! echo "happens today" | vault-query
//! ```

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use vault_tasks::{formatting, tasks, validation};

/// Query tasks in an Obsidian vault
#[derive(Parser, Debug)]
#[command(name = "vault-query", author, version, about, long_about = None)]
struct Args {
    /// Task query, one filter per line (read from stdin if not provided)
    query: Option<String>,

    /// Path to the vault
    #[arg(env = "VAULT_PATH")]
    vault_path: Option<PathBuf>,

    /// Output in text format instead of JSON
    #[arg(long)]
    raw: bool,

    /// Exclude tasks from files starting with the given path(s), comma-separated
    #[arg(long, value_name = "PATHS")]
    filter: Option<String>,

    /// Include all fields in JSON output, even if null
    #[arg(long)]
    full: bool,

    /// Reference date for relative dates (YYYY-MM-DD); defaults to today
    #[arg(long, value_name = "DATE")]
    today: Option<String>,
}

fn main() -> ExitCode {
    vault_tasks::init_logging();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let query_source = match args.query {
        Some(query) => query,
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read query from stdin")?;
            input.trim().to_string()
        }
    };

    let exclusions = match args.filter.as_deref() {
        Some(paths) => validation::parse_exclude_paths(paths).map_err(anyhow::Error::msg)?,
        None => Vec::new(),
    };

    let Some(vault_path) = args.vault_path else {
        bail!("VAULT_PATH environment variable not set and vault path not provided");
    };
    validation::validate_vault_root(&vault_path)?;

    let reference = match args.today.as_deref() {
        Some(date) => validation::parse_reference_date(date)?,
        None => tasks::local_date_today(),
    };

    let mut results = vault_tasks::query_at(&vault_path, &query_source, reference)?;
    formatting::apply_path_exclusions(&mut results, &exclusions);

    if args.raw {
        if results.is_empty() {
            eprintln!("No tasks found matching query.");
        } else {
            print!("{}", formatting::format_tasks_raw(&results));
            eprintln!("\nFound {} task(s)", results.len());
        }
    } else if results.is_empty() {
        println!("{}", formatting::NO_TASKS_JSON);
    } else {
        println!("{}", formatting::format_tasks_json(&results, args.full)?);
    }

    Ok(())
}
