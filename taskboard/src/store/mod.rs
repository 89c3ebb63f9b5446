//! Durable storage for tasks and comments.
//!
//! Defines the [`TaskStore`] trait the board manager reconciles against.
//! Implementations:
//! - [`memory::InMemoryStore`]: process memory, used for tests and demos
//! - [`local::LocalMirrorStore`]: JSON mirror on local disk, ids assigned locally
//! - [`sqlite::SqliteStore`]: relational store with profile joins
//!
//! The backend is picked when the application is composed; the manager
//! never knows which one it talks to.

pub mod local;
pub mod memory;
pub mod sqlite;

use std::time::{SystemTime, UNIX_EPOCH};

use taskboard_proto::comment::Comment;
use taskboard_proto::profile::{Profile, UserId};
use taskboard_proto::task::{Task, TaskId};

pub use local::LocalMirrorStore;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The underlying storage is unreachable or unusable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A write operation failed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// A read operation failed.
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// The targeted record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Persistence contract for the task board.
///
/// Listing returns tasks ordered by creation time, ascending, each with
/// its comments in creation order and authors already resolved to a
/// single [`Author`](taskboard_proto::comment::Author).
pub trait TaskStore: Send + Sync {
    /// List every task owned by `owner`, oldest first.
    fn list_tasks(
        &self,
        owner: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Task>, StoreError>> + Send;

    /// Create a pending task with no comments.
    fn create_task(
        &self,
        owner: &UserId,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Task, StoreError>> + Send;

    /// Set the `completed` flag of a task.
    fn update_task_completed(
        &self,
        id: TaskId,
        completed: bool,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Delete a task together with its comments.
    fn delete_task(
        &self,
        id: TaskId,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Append a comment written by `author` to a task.
    fn create_comment(
        &self,
        task_id: TaskId,
        author: &Profile,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Comment, StoreError>> + Send;
}

/// Returns the current timestamp in milliseconds since epoch.
pub(crate) fn now_ms() -> u64 {
    u64::try_from(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis(),
    )
    .unwrap_or(u64::MAX)
}

fn task_not_found(id: TaskId) -> StoreError {
    StoreError::NotFound(format!("task {id}"))
}
