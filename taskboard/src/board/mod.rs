//! Task board state for the signed-in user.
//!
//! [`BoardManager`] owns the working set of tasks, applies mutations
//! through a [`TaskStore`](crate::store::TaskStore), and derives the
//! pending/done [`Partition`] from the working set on demand.

pub mod manager;
pub mod partition;

pub use manager::BoardManager;
pub use partition::Partition;

use std::fmt;

use taskboard_proto::task::TaskId;
use thiserror::Error;

use crate::store::StoreError;

/// Errors returned by board mutations.
///
/// Only [`BoardError::Store`] reflects a failure; the other variants mean
/// the mutation was rejected and nothing changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Task or comment text is empty after trimming.
    #[error("text cannot be empty")]
    TextEmpty,
    /// No task with the given id in the working set.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// The operation requires a signed-in user.
    #[error("not signed in")]
    NotSignedIn,
    /// The store rejected or failed the operation.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl BoardError {
    /// Whether this error is a rejected input rather than a failure.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

/// How the working set is brought up to date after a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SyncPolicy {
    /// Reload the whole working set from the store after every write.
    #[default]
    Refetch,
    /// Apply the record returned by the store to the working set.
    Patch,
}

/// Tuning for a [`BoardManager`].
#[derive(Debug, Clone, Copy)]
pub struct BoardOptions {
    /// Post-write synchronisation strategy.
    pub sync_policy: SyncPolicy,
    /// Capacity of the warning channel.
    pub warning_buffer: usize,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            sync_policy: SyncPolicy::Refetch,
            warning_buffer: 16,
        }
    }
}

/// A store operation that failed and can be retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOp {
    /// Reload of the working set.
    Load,
    /// Task creation.
    AddTask {
        /// Trimmed task text.
        text: String,
    },
    /// Column change (toggle or move).
    SetCompleted {
        /// Target task.
        id: TaskId,
        /// Value to write.
        completed: bool,
    },
    /// Task deletion.
    Delete {
        /// Target task.
        id: TaskId,
    },
    /// Comment creation.
    AddComment {
        /// Target task.
        task_id: TaskId,
        /// Trimmed comment text.
        text: String,
    },
}

impl fmt::Display for PendingOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load => write!(f, "load tasks"),
            Self::AddTask { .. } => write!(f, "add task"),
            Self::SetCompleted { id, completed: true } => write!(f, "complete task {id}"),
            Self::SetCompleted { id, completed: false } => write!(f, "reopen task {id}"),
            Self::Delete { id } => write!(f, "delete task {id}"),
            Self::AddComment { task_id, .. } => write!(f, "comment on task {task_id}"),
        }
    }
}

/// Non-fatal notice emitted when the store fails.
///
/// The UI should show it as a transient banner offering a retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardWarning {
    /// The operation that failed.
    pub op: PendingOp,
    /// Description of the error.
    pub reason: String,
}

impl fmt::Display for BoardWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not {}: {}", self.op, self.reason)
    }
}
