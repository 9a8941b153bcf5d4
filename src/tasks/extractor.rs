//! Task extraction from markdown lines
//!
//! A task line looks like `- [ ] Description 🔼 📅 2025-11-13`: an optional
//! list marker, a one-character checkbox, the description, then emoji
//! metadata at the end of the line. Metadata is peeled off the tail one
//! token at a time until nothing more is recognized.

use super::task::{DateField, Priority, Task};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Emoji variant selector that may trail any glyph
const VARIANT_SELECTOR: char = '\u{FE0F}';

/// Priority glyphs, highest first
static PRIORITY_GLYPHS: &[(Priority, &str)] = &[
    (Priority::Highest, "🔺"),
    (Priority::High, "⏫"),
    (Priority::Medium, "🔼"),
    (Priority::Low, "🔽"),
    (Priority::Lowest, "⏬"),
];

/// Accepted glyphs per dated field, in the order tails are tried
static DATE_GLYPHS: &[(DateField, &[&str])] = &[
    (DateField::Done, &["✅"]),
    (DateField::Scheduled, &["⏳", "⌛"]),
    (DateField::Due, &["📅", "📆", "🗓"]),
    (DateField::Start, &["🛫"]),
    (DateField::Created, &["➕"]),
    (DateField::Cancelled, &["❌"]),
];

// Indentation / blockquote, optional list marker, checkbox, whitespace, rest
static TASK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s>]*(?:(?:[-*+]|[0-9]+[.)])\s+)?\[([^\[\]])\]\s+(.*)$")
        .expect("task line pattern")
});

static PRIORITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    let glyphs = alternation(PRIORITY_GLYPHS.iter().map(|(_, glyph)| *glyph));
    Regex::new(&format!("({}){}?$", glyphs, VARIANT_SELECTOR)).expect("priority pattern")
});

static DATE_RES: LazyLock<Vec<(DateField, Regex)>> = LazyLock::new(|| {
    DATE_GLYPHS
        .iter()
        .map(|(field, glyphs)| {
            let pattern = format!(
                r"(?:{}){}?\s*([0-9]{{4}}-[0-9]{{2}}-[0-9]{{2}})$",
                alternation(glyphs.iter().copied()),
                VARIANT_SELECTOR
            );
            (*field, Regex::new(&pattern).expect("date field pattern"))
        })
        .collect()
});

fn alternation<'a>(glyphs: impl Iterator<Item = &'a str>) -> String {
    glyphs.map(regex::escape).collect::<Vec<_>>().join("|")
}

fn priority_for_glyph(glyph: &str) -> Option<Priority> {
    let glyph = glyph.trim_end_matches(VARIANT_SELECTOR);
    PRIORITY_GLYPHS
        .iter()
        .find(|(_, candidate)| *candidate == glyph)
        .map(|(priority, _)| *priority)
}

/// Parse one markdown line into a task
///
/// # Arguments
/// * `line` - The line without its trailing newline
/// * `file_path` - Path of the containing file, relative to the vault root
/// * `line_number` - 1-indexed line number
///
/// # Returns
/// The task, or `None` if the line is not a checkbox line or nothing is left
/// of its description once metadata is removed
pub fn parse_task_line(line: &str, file_path: &str, line_number: usize) -> Option<Task> {
    let caps = TASK_RE.captures(line)?;
    let status = caps.get(1)?.as_str().chars().next()?;
    let content = caps.get(2).map_or("", |m| m.as_str());

    let mut task = Task {
        status,
        description: String::new(),
        priority: None,
        start: None,
        scheduled: None,
        due: None,
        done: None,
        created: None,
        cancelled: None,
        source_line: line.to_string(),
        file_path: file_path.to_string(),
        line_number,
    };
    let description = extract_metadata(content, &mut task);
    task.description = description.to_string();

    if !task.is_valid() {
        tracing::trace!(file_path, line_number, "checkbox line without description");
        return None;
    }
    Some(task)
}

/// Strip trailing metadata tokens from `content`, recording them on `task`
///
/// Returns the trimmed description.
fn extract_metadata<'a>(content: &'a str, task: &mut Task) -> &'a str {
    let mut remaining = content.trim();
    while !remaining.is_empty() {
        match strip_trailing_token(remaining, task) {
            Some(rest) => remaining = rest.trim(),
            None => break,
        }
    }
    remaining
}

/// Remove one not-yet-seen metadata token from the end of `text`
fn strip_trailing_token<'a>(text: &'a str, task: &mut Task) -> Option<&'a str> {
    if task.priority.is_none()
        && let Some(caps) = PRIORITY_RE.captures(text)
    {
        task.priority = priority_for_glyph(caps.get(1)?.as_str());
        return Some(&text[..caps.get(0)?.start()]);
    }

    for (field, re) in DATE_RES.iter() {
        let slot = task.date_mut(*field);
        if slot.is_some() {
            continue;
        }
        if let Some(caps) = re.captures(text)
            && let Ok(date) = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d")
        {
            *slot = Some(date);
            return Some(&text[..caps.get(0)?.start()]);
        }
    }

    None
}
