//! MCP tool handlers for the vault tasks server
//!
//! Each handler is in a separate file; the `#[tool]` methods in `lib.rs`
//! only forward to them.

pub mod list;
pub mod query;
