//! Formatting helper functions for the CLI and MCP front ends
//!
//! The query engine returns full task records; everything about how they are
//! shown (labels, hidden null dates, path exclusion) lives here.

use crate::tasks::{DateField, Priority, Task};
use chrono::NaiveDate;
use serde::Serialize;

/// What the CLI prints when no task matches
pub const NO_TASKS_JSON: &str = r#"{"tasks": [], "count": 0}"#;

/// Human readable label for a status character
pub fn status_label(status: char) -> String {
    match status {
        ' ' => "Open".to_string(),
        '/' => "In Progress".to_string(),
        'x' => "Done".to_string(),
        '-' => "Cancelled".to_string(),
        other => format!("Custom ({})", other),
    }
}

/// Human readable label for a priority; tasks without one are "Normal"
pub fn priority_label(priority: Option<Priority>) -> &'static str {
    match priority {
        Some(Priority::Highest) => "Highest",
        Some(Priority::High) => "High",
        Some(Priority::Medium) => "Medium",
        Some(Priority::Low) => "Low",
        Some(Priority::Lowest) => "Lowest",
        None => "Normal",
    }
}

/// Drop tasks whose file path starts with any of `prefixes`
///
/// # Arguments
/// * `tasks` - Tasks to filter, order is kept
/// * `prefixes` - Vault-relative path prefixes (e.g. ".trash", "archive/")
pub fn apply_path_exclusions(tasks: &mut Vec<Task>, prefixes: &[String]) {
    if prefixes.is_empty() {
        return;
    }
    tasks.retain(|task| {
        !prefixes
            .iter()
            .any(|prefix| task.file_path.starts_with(prefix.as_str()))
    });
}

/// JSON view of a task
///
/// Dates are doubly optional: the outer `None` leaves the key out, while
/// `Some(None)` writes an explicit `null` for full output.
#[derive(Debug, Serialize)]
pub struct TaskView<'a> {
    pub status: String,
    pub description: &'a str,
    pub priority: &'static str,
    pub file_path: &'a str,
    pub line_number: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_date: Option<Option<NaiveDate>>,
}

impl<'a> TaskView<'a> {
    /// Build the view of `task`
    ///
    /// # Arguments
    /// * `task` - Task to show
    /// * `full` - Include date fields even when they are not set
    pub fn new(task: &'a Task, full: bool) -> Self {
        let date = |field| match task.date(field) {
            Some(date) => Some(Some(date)),
            None if full => Some(None),
            None => None,
        };
        Self {
            status: status_label(task.status),
            description: &task.description,
            priority: priority_label(task.priority),
            file_path: &task.file_path,
            line_number: task.line_number,
            start_date: date(DateField::Start),
            scheduled_date: date(DateField::Scheduled),
            due_date: date(DateField::Due),
            done_date: date(DateField::Done),
            created_date: date(DateField::Created),
            cancelled_date: date(DateField::Cancelled),
        }
    }
}

#[derive(Serialize)]
struct TaskList<'a> {
    tasks: Vec<TaskView<'a>>,
    count: usize,
}

/// Format tasks as a pretty-printed `{"tasks": [...], "count": N}` document
pub fn format_tasks_json(tasks: &[Task], full: bool) -> serde_json::Result<String> {
    let list = TaskList {
        tasks: tasks.iter().map(|task| TaskView::new(task, full)).collect(),
        count: tasks.len(),
    };
    serde_json::to_string_pretty(&list)
}

/// Format tasks as `[x] description (📅 due, ⏳ scheduled, 🛫 start)` lines
pub fn format_tasks_raw(tasks: &[Task]) -> String {
    let mut result = String::new();
    for task in tasks {
        let marker = if task.is_done() { 'x' } else { ' ' };
        result.push_str(&format!("[{}] {}", marker, task.description));

        let mut dates = Vec::new();
        if let Some(due) = task.due {
            dates.push(format!("📅 {}", due));
        }
        if let Some(scheduled) = task.scheduled {
            dates.push(format!("⏳ {}", scheduled));
        }
        if let Some(start) = task.start {
            dates.push(format!("🛫 {}", start));
        }
        if !dates.is_empty() {
            result.push_str(&format!(" ({})", dates.join(", ")));
        }
        result.push('\n');
    }
    result
}
