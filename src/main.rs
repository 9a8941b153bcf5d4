//! Vault Tasks MCP Server - Main Entry Point
//!
//! This is the main entry point for the MCP server application.
//! The actual implementation is in the `vault_tasks` library.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use mcp_attr::server::serve_stdio;
use std::path::PathBuf;
use vault_tasks::VaultServerHandler;

/// Vault Tasks MCP Server - Obsidian Tasks style queries via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the vault root
    #[arg(env = "VAULT_PATH")]
    vault: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Nothing to serve without a vault: show help and exit with error code
    if std::env::args().len() == 1 && std::env::var_os("VAULT_PATH").is_none() {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    vault_tasks::init_logging();

    let args = Args::parse();
    let handler = VaultServerHandler::new(&args.vault)?;
    tracing::info!(vault = %args.vault.display(), "serving vault tasks over stdio");
    serve_stdio(handler).await?;
    Ok(())
}
