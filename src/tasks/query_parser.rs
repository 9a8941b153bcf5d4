//! Query parsing - turns query text into a [`Filter`] tree
//!
//! Each non-blank line of a query is one filter and the lines are implicitly
//! ANDed. A line is either a simple phrase (`not done`, `due before
//! tomorrow`, `priority is above none`, ...) or a boolean expression of
//! parenthesized operands joined by a single kind of keyword:
//!
//! ```text
//! (due after tomorrow) AND (due before in two weeks)
//! ((priority is high) OR (priority is highest)) AND (NOT (done))
//! ```
//!
//! Mixing `AND` and `OR` at one level without parentheses is an error.
//! Nesting depth is only limited by memory.

use super::date_resolver::DateResolver;
use super::filter::{DateComparison, Filter, PriorityComparison};
use super::task::{DateField, Priority};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static STATUS_DONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^done$").expect("status pattern"));

static STATUS_NOT_DONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^not\s+done$").expect("status pattern"));

static DATE_FILTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(due|scheduled|start|done|created|cancelled)\s+(before|after|on)\s+(.+)$")
        .expect("date filter pattern")
});

static HAPPENS_FILTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^happens\s+(before|after|on)\s+(.+)$").expect("happens filter pattern")
});

static PRESENCE_FILTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(has|no)\s+(due|scheduled|start|created|done|cancelled)\s+date$")
        .expect("presence filter pattern")
});

static PRIORITY_FILTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^priority\s+is\s+(?:(not|above|below)\s+)?(highest|high|medium|low|lowest|none)$",
    )
    .expect("priority filter pattern")
});

/// Boolean keyword joining the operands of one expression level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connective {
    And,
    Or,
}

/// Parses query text into filters, resolving date tokens against a
/// reference date
#[derive(Debug, Clone, Copy)]
pub struct QueryParser {
    resolver: DateResolver,
}

impl QueryParser {
    pub fn new(reference: NaiveDate) -> Self {
        Self {
            resolver: DateResolver::new(reference),
        }
    }

    /// Parse a whole multi-line query
    ///
    /// Blank lines are skipped. The result is always a [`Filter::And`] over
    /// the per-line filters, so an empty query matches every task.
    ///
    /// # Errors
    /// The first line that fails to parse aborts the whole query.
    pub fn parse(&self, source: &str) -> Result<Filter> {
        let mut filters = Vec::new();
        for line in source.lines().map(str::trim).filter(|l| !l.is_empty()) {
            filters.push(self.parse_line(line)?);
        }
        tracing::debug!(
            lines = filters.len(),
            reference = %self.resolver.reference(),
            "parsed task query"
        );
        Ok(Filter::And(filters))
    }

    /// Parse a single query line
    pub fn parse_line(&self, line: &str) -> Result<Filter> {
        let line = line.trim();
        LineParser {
            line,
            resolver: &self.resolver,
        }
        .expression(line)
    }
}

/// Parse `source` with dates resolved against `reference`
pub fn parse_query(source: &str, reference: NaiveDate) -> Result<Filter> {
    QueryParser::new(reference).parse(source)
}

/// Parser state for one query line
///
/// Every error carries the full line, not the fragment being parsed.
struct LineParser<'a> {
    line: &'a str,
    resolver: &'a DateResolver,
}

/// One open parenthesis level of a boolean expression
#[derive(Default)]
struct Group {
    operands: Vec<Filter>,
    connective: Option<Connective>,
    negated: bool,
}

impl Group {
    fn negated(negated: bool) -> Self {
        Self {
            negated,
            ..Self::default()
        }
    }

    /// The filter for this level; `None` if it never got an operand
    fn finish(mut self) -> Option<Filter> {
        let filter = match self.connective {
            Some(Connective::And) => Filter::And(self.operands),
            Some(Connective::Or) => Filter::Or(self.operands),
            None => self.operands.pop()?,
        };
        Some(negate(filter, self.negated))
    }
}

fn negate(filter: Filter, negated: bool) -> Filter {
    if negated {
        Filter::Not(Box::new(filter))
    } else {
        filter
    }
}

impl LineParser<'_> {
    fn error(&self) -> Error {
        Error::query_parse(self.line)
    }

    fn expression(&self, text: &str) -> Result<Filter> {
        let text = text.trim();
        if text.starts_with('(') || negated_operand(text).is_some() {
            self.boolean(text)
        } else {
            self.phrase(text)
        }
    }

    /// `operand (KEYWORD operand)*` with a single keyword kind per level
    ///
    /// An operand is `( phrase )`, `( boolean )` or `NOT` followed by one of
    /// those. Open levels are kept on an explicit stack, so nesting depth is
    /// bounded by memory and not by the call stack.
    fn boolean(&self, text: &str) -> Result<Filter> {
        // The outermost level has no parenthesis of its own
        let mut groups = vec![Group::default()];
        let mut rest = text;

        loop {
            rest = rest.trim_start();
            let mut negated = false;
            if let Some(after_not) = negated_operand(rest) {
                negated = true;
                rest = after_not.trim_start();
            }

            let body = rest.strip_prefix('(').ok_or_else(|| self.error())?;
            let inner = body.trim_start();
            if inner.starts_with('(') || negated_operand(inner).is_some() {
                groups.push(Group::negated(negated));
                rest = body;
                continue;
            }

            let close = body.find(')').ok_or_else(|| self.error())?;
            let phrase = &body[..close];
            if phrase.contains('(') {
                return Err(self.error());
            }
            let mut operand = negate(self.phrase(phrase.trim())?, negated);
            rest = &body[close + 1..];

            // Attach the operand, closing every level that ends here
            loop {
                let depth = groups.len();
                let group = groups.last_mut().ok_or_else(|| self.error())?;
                group.operands.push(operand);
                rest = rest.trim_start();

                if let Some(after) = rest.strip_prefix(')') {
                    if depth == 1 {
                        return Err(self.error());
                    }
                    operand = groups
                        .pop()
                        .and_then(Group::finish)
                        .ok_or_else(|| self.error())?;
                    rest = after;
                    continue;
                }

                if rest.is_empty() {
                    if depth > 1 {
                        return Err(self.error());
                    }
                    return groups
                        .pop()
                        .and_then(Group::finish)
                        .ok_or_else(|| self.error());
                }

                let (next, after) = split_connective(rest).ok_or_else(|| self.error())?;
                if group.connective.is_some_and(|current| current != next) {
                    return Err(self.error());
                }
                group.connective = Some(next);
                rest = after;
                break;
            }
        }
    }

    fn phrase(&self, text: &str) -> Result<Filter> {
        if STATUS_DONE_RE.is_match(text) {
            return Ok(Filter::Status { done: true });
        }

        if STATUS_NOT_DONE_RE.is_match(text) {
            return Ok(Filter::Status { done: false });
        }

        if let Some(caps) = DATE_FILTER_RE.captures(text) {
            let field: DateField = caps[1].parse().map_err(|_| self.error())?;
            let comparison = date_comparison(&caps[2]).ok_or_else(|| self.error())?;
            let target = self.resolver.resolve(&caps[3])?;
            return Ok(Filter::Date {
                field,
                comparison,
                target,
            });
        }

        if let Some(caps) = HAPPENS_FILTER_RE.captures(text) {
            let comparison = date_comparison(&caps[1]).ok_or_else(|| self.error())?;
            let target = self.resolver.resolve(&caps[2])?;
            return Ok(Filter::Happens { comparison, target });
        }

        if let Some(caps) = PRESENCE_FILTER_RE.captures(text) {
            let present = caps[1].eq_ignore_ascii_case("has");
            let field: DateField = caps[2].parse().map_err(|_| self.error())?;
            return Ok(Filter::Presence { field, present });
        }

        if let Some(caps) = PRIORITY_FILTER_RE.captures(text) {
            let comparison = match caps.get(1).map(|m| m.as_str().to_ascii_lowercase()) {
                None => PriorityComparison::Is,
                Some(word) if word == "not" => PriorityComparison::IsNot,
                Some(word) if word == "above" => PriorityComparison::Above,
                Some(_) => PriorityComparison::Below,
            };
            let level = if caps[2].eq_ignore_ascii_case("none") {
                None
            } else {
                Some(caps[2].parse::<Priority>().map_err(|_| self.error())?)
            };
            return Ok(Filter::Priority { comparison, level });
        }

        Err(self.error())
    }
}

fn date_comparison(word: &str) -> Option<DateComparison> {
    match word.to_ascii_lowercase().as_str() {
        "before" => Some(DateComparison::Before),
        "after" => Some(DateComparison::After),
        "on" => Some(DateComparison::On),
        _ => None,
    }
}

/// Strip a case-insensitive keyword that ends at whitespace or `(`
fn strip_keyword<'t>(text: &'t str, keyword: &str) -> Option<&'t str> {
    let head = text.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &text[keyword.len()..];
    match rest.chars().next() {
        Some(c) if c.is_whitespace() || c == '(' => Some(rest),
        _ => None,
    }
}

/// `NOT (...)`; the phrase `not done` is not a negated operand
fn negated_operand(text: &str) -> Option<&str> {
    strip_keyword(text, "not").filter(|rest| rest.trim_start().starts_with('('))
}

fn split_connective(text: &str) -> Option<(Connective, &str)> {
    if let Some(rest) = strip_keyword(text, "and") {
        return Some((Connective::And, rest));
    }
    strip_keyword(text, "or").map(|rest| (Connective::Or, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::parse_task_line;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parser() -> QueryParser {
        QueryParser::new(ymd(2025, 11, 12))
    }

    fn line(text: &str) -> Filter {
        parser()
            .parse_line(text)
            .unwrap_or_else(|e| panic!("{:?} failed: {}", text, e))
    }

    fn assert_parse_error(text: &str) {
        match parser().parse(text) {
            Err(Error::QueryParse { line }) => assert!(
                text.lines().any(|l| l.trim() == line),
                "error line {:?} not in query {:?}",
                line,
                text
            ),
            other => panic!("expected parse error for {:?}, got {:?}", text, other),
        }
    }

    #[test]
    fn test_status_phrases() {
        assert_eq!(line("done"), Filter::Status { done: true });
        assert_eq!(line("DONE"), Filter::Status { done: true });
        assert_eq!(line("not done"), Filter::Status { done: false });
        assert_eq!(line("Not   Done"), Filter::Status { done: false });
    }

    #[test]
    fn test_date_phrases() {
        assert_eq!(
            line("due before tomorrow"),
            Filter::Date {
                field: DateField::Due,
                comparison: DateComparison::Before,
                target: ymd(2025, 11, 13),
            }
        );
        assert_eq!(
            line("Scheduled ON 2025-01-05"),
            Filter::Date {
                field: DateField::Scheduled,
                comparison: DateComparison::On,
                target: ymd(2025, 1, 5),
            }
        );
        assert_eq!(
            line("done after yesterday"),
            Filter::Date {
                field: DateField::Done,
                comparison: DateComparison::After,
                target: ymd(2025, 11, 11),
            }
        );
        assert_eq!(
            line("start after in one week"),
            Filter::Date {
                field: DateField::Start,
                comparison: DateComparison::After,
                target: ymd(2025, 11, 19),
            }
        );
    }

    #[test]
    fn test_happens_phrase() {
        assert_eq!(
            line("happens on today"),
            Filter::Happens {
                comparison: DateComparison::On,
                target: ymd(2025, 11, 12),
            }
        );
    }

    #[test]
    fn test_presence_phrases() {
        assert_eq!(
            line("has due date"),
            Filter::Presence {
                field: DateField::Due,
                present: true,
            }
        );
        assert_eq!(
            line("No Scheduled Date"),
            Filter::Presence {
                field: DateField::Scheduled,
                present: false,
            }
        );
        assert_eq!(
            line("has cancelled date"),
            Filter::Presence {
                field: DateField::Cancelled,
                present: true,
            }
        );
    }

    #[test]
    fn test_priority_phrases() {
        assert_eq!(
            line("priority is high"),
            Filter::Priority {
                comparison: PriorityComparison::Is,
                level: Some(Priority::High),
            }
        );
        assert_eq!(
            line("priority is none"),
            Filter::Priority {
                comparison: PriorityComparison::Is,
                level: None,
            }
        );
        assert_eq!(
            line("Priority Is Not Lowest"),
            Filter::Priority {
                comparison: PriorityComparison::IsNot,
                level: Some(Priority::Lowest),
            }
        );
        assert_eq!(
            line("priority is above none"),
            Filter::Priority {
                comparison: PriorityComparison::Above,
                level: None,
            }
        );
        assert_eq!(
            line("priority is below medium"),
            Filter::Priority {
                comparison: PriorityComparison::Below,
                level: Some(Priority::Medium),
            }
        );
    }

    #[test]
    fn test_lines_are_implicitly_anded() {
        let filter = parser().parse("not done\n\n   priority is high  \n").unwrap();
        assert_eq!(
            filter,
            Filter::And(vec![
                Filter::Status { done: false },
                Filter::Priority {
                    comparison: PriorityComparison::Is,
                    level: Some(Priority::High),
                },
            ])
        );
    }

    #[test]
    fn test_empty_query_is_empty_and() {
        assert_eq!(parser().parse("").unwrap(), Filter::And(vec![]));
        assert_eq!(parser().parse("  \n\t\n").unwrap(), Filter::And(vec![]));
    }

    #[test]
    fn test_crlf_lines() {
        let filter = parser().parse("done\r\nhas due date\r\n").unwrap();
        assert!(matches!(filter, Filter::And(ref children) if children.len() == 2));
    }

    #[test]
    fn test_boolean_and_or() {
        assert_eq!(
            line("(due after tomorrow) AND (due before in two weeks)"),
            Filter::And(vec![
                Filter::Date {
                    field: DateField::Due,
                    comparison: DateComparison::After,
                    target: ymd(2025, 11, 13),
                },
                Filter::Date {
                    field: DateField::Due,
                    comparison: DateComparison::Before,
                    target: ymd(2025, 11, 26),
                },
            ])
        );
        assert_eq!(
            line("(done) or (priority is high)"),
            Filter::Or(vec![
                Filter::Status { done: true },
                Filter::Priority {
                    comparison: PriorityComparison::Is,
                    level: Some(Priority::High),
                },
            ])
        );
    }

    #[test]
    fn test_boolean_chain_of_same_keyword() {
        let filter = line("(done) OR (has due date) OR (priority is low)");
        assert!(matches!(filter, Filter::Or(ref children) if children.len() == 3));
    }

    #[test]
    fn test_nested_boolean() {
        let filter = line("((priority is high) OR (priority is highest)) AND (not done)");
        assert_eq!(
            filter,
            Filter::And(vec![
                Filter::Or(vec![
                    Filter::Priority {
                        comparison: PriorityComparison::Is,
                        level: Some(Priority::High),
                    },
                    Filter::Priority {
                        comparison: PriorityComparison::Is,
                        level: Some(Priority::Highest),
                    },
                ]),
                Filter::Status { done: false },
            ])
        );
    }

    #[test]
    fn test_deep_nesting() {
        let mut text = "done".to_string();
        for _ in 0..50 {
            text = format!("({}) AND (has due date)", text);
        }
        let filter = line(&text);
        let mut current = &filter;
        let mut depth = 0;
        while let Filter::And(children) = current {
            assert_eq!(children.len(), 2);
            current = &children[0];
            depth += 1;
        }
        assert_eq!(depth, 50);
        assert_eq!(*current, Filter::Status { done: true });
    }

    #[test]
    fn test_thousands_of_levels_parse_without_recursion() {
        let depth = 20_000;
        let task = parse_task_line("- [x] Filed taxes 📅 2025-04-15", "a.md", 1).unwrap();

        let wrapped = format!("{}done{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(line(&wrapped), Filter::Status { done: true });

        let chained = format!(
            "{}done{}",
            "(".repeat(depth),
            ") AND (has due date)".repeat(depth)
        );
        assert!(line(&chained).matches(&task));

        let negated = format!("{}done{}", "NOT (".repeat(depth), ")".repeat(depth));
        assert!(line(&negated).matches(&task));
        let negated = format!("{}done{}", "NOT (".repeat(depth + 1), ")".repeat(depth + 1));
        assert!(!line(&negated).matches(&task));

        assert_parse_error(&format!("{}done", "(".repeat(depth)));
        assert_parse_error(&format!("done{}", ")".repeat(depth)));
    }

    #[test]
    fn test_single_parenthesized_operand() {
        assert_eq!(line("(done)"), Filter::Status { done: true });
        assert_eq!(line("((not done))"), Filter::Status { done: false });
    }

    #[test]
    fn test_not_operator() {
        assert_eq!(
            line("NOT (done)"),
            Filter::Not(Box::new(Filter::Status { done: true }))
        );
        assert_eq!(
            line("(has due date) AND NOT (priority is none)"),
            Filter::And(vec![
                Filter::Presence {
                    field: DateField::Due,
                    present: true,
                },
                Filter::Not(Box::new(Filter::Priority {
                    comparison: PriorityComparison::Is,
                    level: None,
                })),
            ])
        );
    }

    #[test]
    fn test_unknown_phrases_are_errors() {
        assert_parse_error("priority is purple");
        assert_parse_error("banana");
        assert_parse_error("due whenever today");
        assert_parse_error("has due");
        assert_parse_error("done\nsomething odd\nnot done");
    }

    #[test]
    fn test_parse_error_names_line() {
        match parser().parse("not done\npriority is purple") {
            Err(Error::QueryParse { line }) => assert_eq!(line, "priority is purple"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_malformed_boolean_expressions() {
        assert_parse_error("(done) AND (not done");
        assert_parse_error("(done AND (not done)");
        assert_parse_error("done) AND (not done)");
        assert_parse_error("(done) AND not done");
        assert_parse_error("(done) (not done)");
        assert_parse_error("(done) XOR (not done)");
        assert_parse_error("(done) AND");
        assert_parse_error("()");
        assert_parse_error("(done) AND (has due date) OR (not done)");
        assert_parse_error("(done) ANDNOT (not done)");
    }

    #[test]
    fn test_operand_error_reports_whole_line() {
        match parser().parse("(done) AND (priority is purple)") {
            Err(Error::QueryParse { line }) => {
                assert_eq!(line, "(done) AND (priority is purple)")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_invalid_date_literal() {
        match parser().parse("due before next month") {
            Err(Error::InvalidDate { token }) => assert_eq!(token, "next month"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            parser().parse("(done) OR (happens on 2025-02-30)"),
            Err(Error::InvalidDate { .. })
        ));
    }
}
