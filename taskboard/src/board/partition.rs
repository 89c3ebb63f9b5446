//! Derived two-column view of a task list.

use taskboard_proto::task::{Column, Task};

/// Tasks split into the pending and done columns.
///
/// Built by a stable filter over the working set, so each column keeps the
/// working set's order. Every task lands in exactly one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<'a> {
    /// Tasks with `completed = false`.
    pub pending: Vec<&'a Task>,
    /// Tasks with `completed = true`.
    pub done: Vec<&'a Task>,
}

impl<'a> Partition<'a> {
    /// Split `tasks` by their `completed` flag.
    #[must_use]
    pub fn of(tasks: &'a [Task]) -> Self {
        let (done, pending) = tasks.iter().partition(|t| t.completed);
        Self { pending, done }
    }

    /// Tasks in the given column.
    #[must_use]
    pub fn column(&self, column: Column) -> &[&'a Task] {
        match column {
            Column::Pending => &self.pending,
            Column::Done => &self.done,
        }
    }

    /// Total number of tasks across both columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len() + self.done.len()
    }

    /// Whether both columns are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.done.is_empty()
    }
}
