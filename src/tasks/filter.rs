//! Filter tree evaluated against tasks

use super::task::{DateField, Priority, Task, priority_rank};
use chrono::NaiveDate;

/// Comparison between a task date and a target date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateComparison {
    Before,
    After,
    On,
}

impl DateComparison {
    pub fn compare(&self, value: NaiveDate, target: NaiveDate) -> bool {
        match self {
            DateComparison::Before => value < target,
            DateComparison::After => value > target,
            DateComparison::On => value == target,
        }
    }
}

/// How a priority filter relates the task's priority to its level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityComparison {
    Is,
    IsNot,
    Above,
    Below,
}

/// A boolean predicate over a task
///
/// Built once per query by the query parser and never mutated afterwards.
/// `None` in a priority level stands for "no priority".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `done` when true, `not done` when false
    Status { done: bool },
    Date {
        field: DateField,
        comparison: DateComparison,
        target: NaiveDate,
    },
    /// Any of start, scheduled or due satisfies the comparison
    Happens {
        comparison: DateComparison,
        target: NaiveDate,
    },
    Priority {
        comparison: PriorityComparison,
        level: Option<Priority>,
    },
    /// `has <field> date` when `present`, `no <field> date` otherwise
    Presence { field: DateField, present: bool },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    /// Check whether `task` satisfies this filter
    ///
    /// Walks the tree with an explicit stack, short-circuiting `And` and
    /// `Or` like `all` / `any` would.
    pub fn matches(&self, task: &Task) -> bool {
        // Combinators being evaluated, with the index of their next child
        let mut pending: Vec<(&Filter, usize)> = Vec::new();
        let mut node = self;

        loop {
            let mut result = match node {
                Filter::And(children) | Filter::Or(children) if !children.is_empty() => {
                    pending.push((node, 1));
                    node = &children[0];
                    continue;
                }
                Filter::Not(child) => {
                    pending.push((node, 0));
                    node = &**child;
                    continue;
                }
                Filter::And(_) => true,
                Filter::Or(_) => false,
                Filter::Status { done } => task.is_done() == *done,
                Filter::Date {
                    field,
                    comparison,
                    target,
                } => task
                    .date(*field)
                    .is_some_and(|value| comparison.compare(value, *target)),
                Filter::Happens { comparison, target } => task
                    .happens_dates()
                    .any(|value| comparison.compare(value, *target)),
                Filter::Priority { comparison, level } => match comparison {
                    PriorityComparison::Is => task.priority == *level,
                    PriorityComparison::IsNot => task.priority != *level,
                    PriorityComparison::Above => {
                        priority_rank(task.priority) > priority_rank(*level)
                    }
                    PriorityComparison::Below => {
                        priority_rank(task.priority) < priority_rank(*level)
                    }
                },
                Filter::Presence { field, present } => task.date(*field).is_some() == *present,
            };

            loop {
                let Some((parent, next)) = pending.pop() else {
                    return result;
                };
                match parent {
                    Filter::Not(_) => result = !result,
                    Filter::And(children) if result && next < children.len() => {
                        pending.push((parent, next + 1));
                        node = &children[next];
                        break;
                    }
                    Filter::Or(children) if !result && next < children.len() => {
                        pending.push((parent, next + 1));
                        node = &children[next];
                        break;
                    }
                    // Short-circuited or out of children: the result stands
                    _ => {}
                }
            }
        }
    }

    /// Move the direct children of a combinator into `into`
    fn take_children(&mut self, into: &mut Vec<Filter>) {
        match self {
            Filter::And(children) | Filter::Or(children) => into.append(children),
            Filter::Not(child) => {
                into.push(std::mem::replace(&mut **child, Filter::And(Vec::new())));
            }
            _ => {}
        }
    }
}

// Deep trees are torn down iteratively
impl Drop for Filter {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut filter) = pending.pop() {
            filter.take_children(&mut pending);
        }
    }
}
