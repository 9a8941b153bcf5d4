use chrono::{Local, NaiveDate};
use std::str::FromStr;

/// Get the current date in local timezone
pub fn local_date_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Task priority as written with the priority emoji
///
/// A task without a priority emoji has no `Priority` at all
/// (`Option::None`); see [`priority_rank`] for how that compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    Highest,
    High,
    Medium,
    Low,
    Lowest,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "highest" => Ok(Priority::Highest),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            "lowest" => Ok(Priority::Lowest),
            _ => Err(format!(
                "Invalid priority '{}'. Valid options are: highest, high, medium, low, lowest",
                s
            )),
        }
    }
}

/// Rank of a priority in ascending order of importance
///
/// `lowest < low < none < medium < high < highest`. An absent priority sits
/// between `low` and `medium`.
pub fn priority_rank(priority: Option<Priority>) -> u8 {
    match priority {
        Some(Priority::Lowest) => 0,
        Some(Priority::Low) => 1,
        None => 2,
        Some(Priority::Medium) => 3,
        Some(Priority::High) => 4,
        Some(Priority::Highest) => 5,
    }
}

/// The dated fields a task can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    Start,
    Scheduled,
    Due,
    Done,
    Created,
    Cancelled,
}

impl FromStr for DateField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "start" => Ok(DateField::Start),
            "scheduled" => Ok(DateField::Scheduled),
            "due" => Ok(DateField::Due),
            "done" => Ok(DateField::Done),
            "created" => Ok(DateField::Created),
            "cancelled" => Ok(DateField::Cancelled),
            _ => Err(format!(
                "Invalid date field '{}'. Valid options are: start, scheduled, due, done, created, cancelled",
                s
            )),
        }
    }
}

/// A checkbox task recovered from one markdown line
///
/// Status characters follow the Obsidian Tasks convention:
/// - `' '`: open
/// - `'x'`: done
/// - `'/'`: in progress
/// - `'-'`: cancelled
///
/// Anything else is a custom status and counts as not done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Character between the checkbox brackets
    pub status: char,
    /// Text left over once all trailing metadata is stripped
    pub description: String,
    pub priority: Option<Priority>,
    /// 🛫 date
    pub start: Option<NaiveDate>,
    /// ⏳ date
    pub scheduled: Option<NaiveDate>,
    /// 📅 date
    pub due: Option<NaiveDate>,
    /// ✅ date
    pub done: Option<NaiveDate>,
    /// ➕ date
    pub created: Option<NaiveDate>,
    /// ❌ date
    pub cancelled: Option<NaiveDate>,
    /// The line exactly as it appeared in the file
    pub source_line: String,
    /// Path relative to the vault root, `/`-separated
    pub file_path: String,
    /// 1-indexed line number within `file_path`
    pub line_number: usize,
}

impl Task {
    /// Check if the task is marked done (`[x]`)
    pub fn is_done(&self) -> bool {
        self.status == 'x'
    }

    /// A task is only kept when something remains of its description
    pub fn is_valid(&self) -> bool {
        !self.description.trim().is_empty()
    }

    /// Look up one of the dated fields
    pub fn date(&self, field: DateField) -> Option<NaiveDate> {
        match field {
            DateField::Start => self.start,
            DateField::Scheduled => self.scheduled,
            DateField::Due => self.due,
            DateField::Done => self.done,
            DateField::Created => self.created,
            DateField::Cancelled => self.cancelled,
        }
    }

    pub(crate) fn date_mut(&mut self, field: DateField) -> &mut Option<NaiveDate> {
        match field {
            DateField::Start => &mut self.start,
            DateField::Scheduled => &mut self.scheduled,
            DateField::Due => &mut self.due,
            DateField::Done => &mut self.done,
            DateField::Created => &mut self.created,
            DateField::Cancelled => &mut self.cancelled,
        }
    }

    /// The dates the "happens" filter looks at, in start/scheduled/due order
    pub fn happens_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        [self.start, self.scheduled, self.due].into_iter().flatten()
    }
}
