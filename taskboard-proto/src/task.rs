//! Task model and the two board columns.
//!
//! A [`Task`] belongs to exactly one [`Column`] at any time. Column
//! membership is derived from [`Task::completed`] and never stored, so the
//! two columns cannot drift apart from the task list they are computed from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::comment::Comment;

/// Identifier of a task, unique within its owner's task list.
///
/// Ids are assigned by the store: a database sequence for durable stores,
/// or a local counter for the local mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Wraps a raw id value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when text does not parse as an id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid id: {0:?}")]
pub struct ParseIdError(pub String);

impl FromStr for TaskId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ParseIdError(s.to_string()))
    }
}

/// A single task on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Task description, never empty after trimming.
    pub text: String,
    /// Whether the task sits in the done column.
    pub completed: bool,
    /// Comments in insertion order. Append-only.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Task {
    /// Creates a pending task with no comments.
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            comments: Vec::new(),
        }
    }

    /// Returns the column this task is displayed in.
    #[must_use]
    pub const fn column(&self) -> Column {
        Column::of_completed(self.completed)
    }
}

/// One of the two board columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    /// Tasks with `completed = false`.
    Pending,
    /// Tasks with `completed = true`.
    Done,
}

impl Column {
    /// Both columns in display order.
    pub const ALL: [Self; 2] = [Self::Pending, Self::Done];

    /// The `completed` value a task takes when dropped on this column.
    #[must_use]
    pub const fn completed(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Column for a given `completed` flag.
    #[must_use]
    pub const fn of_completed(completed: bool) -> Self {
        if completed { Self::Done } else { Self::Pending }
    }

    /// Column a task currently belongs to.
    #[must_use]
    pub const fn of(task: &Task) -> Self {
        task.column()
    }

    /// The opposite column.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Pending => Self::Done,
            Self::Done => Self::Pending,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Done => write!(f, "Done"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_parses_decimal_text() {
        assert_eq!("42".parse::<TaskId>(), Ok(TaskId::new(42)));
        assert_eq!(" 7 ".parse::<TaskId>(), Ok(TaskId::new(7)));
    }

    #[test]
    fn task_id_rejects_non_numeric_text() {
        assert!("".parse::<TaskId>().is_err());
        assert!("abc".parse::<TaskId>().is_err());
        assert!("1.5".parse::<TaskId>().is_err());
    }

    #[test]
    fn new_task_is_pending_without_comments() {
        let task = Task::new(TaskId::new(0), "buy milk");
        assert!(!task.completed);
        assert!(task.comments.is_empty());
        assert_eq!(task.column(), Column::Pending);
    }

    #[test]
    fn column_follows_completed_flag() {
        let mut task = Task::new(TaskId::new(1), "b");
        task.completed = true;
        assert_eq!(Column::of(&task), Column::Done);
        assert!(Column::Done.completed());
        assert!(!Column::Pending.completed());
    }

    #[test]
    fn other_column_flips() {
        assert_eq!(Column::Pending.other(), Column::Done);
        assert_eq!(Column::Done.other(), Column::Pending);
    }

    #[test]
    fn task_json_omitting_comments_defaults_to_empty() {
        let task: Task = serde_json::from_str(r#"{"id":3,"text":"x","completed":true}"#).unwrap();
        assert_eq!(task.id, TaskId::new(3));
        assert!(task.comments.is_empty());
    }
}
