//! Error type for the task query engine

use thiserror::Error;

/// Errors surfaced by task extraction and query evaluation
///
/// Lines that are not tasks, or tasks with an empty description, are never
/// errors; they are simply left out of the result.
#[derive(Debug, Error)]
pub enum Error {
    /// A query line (or one of its boolean operands) matched no known phrase
    #[error("Could not parse query line: {line}")]
    QueryParse { line: String },

    /// A date literal was neither a known relative phrase nor `YYYY-MM-DD`
    #[error("Invalid date '{token}'. Use YYYY-MM-DD or one of: today, tomorrow, yesterday, in one week, in two weeks")]
    InvalidDate { token: String },

    /// Vault enumeration or file read failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn query_parse(line: &str) -> Self {
        Error::QueryParse {
            line: line.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
