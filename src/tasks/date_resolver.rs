//! Date token resolution for query filters
//!
//! Only a fixed set of relative phrases is understood. Everything else has to
//! be a literal `YYYY-MM-DD` date.

use crate::error::{Error, Result};
use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// Relative phrases and their offset in days from the reference date
static RELATIVE_DATES: &[(&str, i64)] = &[
    ("today", 0),
    ("tomorrow", 1),
    ("yesterday", -1),
    ("in one week", 7),
    ("in two weeks", 14),
];

static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("iso date pattern"));

/// Resolves date tokens against a fixed reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateResolver {
    reference: NaiveDate,
}

impl DateResolver {
    pub fn new(reference: NaiveDate) -> Self {
        Self { reference }
    }

    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    /// Resolve a relative phrase or a `YYYY-MM-DD` literal
    ///
    /// Matching is case-insensitive and ignores surrounding and repeated
    /// whitespace, so `"In  Two Weeks"` resolves like `"in two weeks"`.
    ///
    /// # Errors
    /// [`Error::InvalidDate`] when the token is neither a known phrase nor a
    /// real calendar date in strict `YYYY-MM-DD` form
    pub fn resolve(&self, token: &str) -> Result<NaiveDate> {
        let normalized = token
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        if let Some((_, offset)) = RELATIVE_DATES
            .iter()
            .find(|(phrase, _)| *phrase == normalized)
        {
            return Ok(self.reference + Duration::days(*offset));
        }

        parse_iso_date(&normalized).ok_or_else(|| Error::InvalidDate {
            token: token.trim().to_string(),
        })
    }
}

/// Strict `YYYY-MM-DD`; chrono alone accepts unpadded fields
fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    if !ISO_DATE_RE.is_match(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}
