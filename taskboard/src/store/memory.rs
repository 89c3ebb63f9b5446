//! In-process [`TaskStore`] implementation.

use tokio::sync::Mutex;

use taskboard_proto::comment::{Author, Comment, CommentId};
use taskboard_proto::profile::{Profile, UserId};
use taskboard_proto::task::{Task, TaskId};

use super::{StoreError, TaskStore, task_not_found};

/// A task row with its owner.
#[derive(Debug, Clone)]
struct Row {
    owner: UserId,
    task: Task,
}

#[derive(Debug, Default)]
struct State {
    /// Rows in creation order.
    rows: Vec<Row>,
    next_task_id: i64,
    next_comment_id: i64,
}

/// In-memory implementation of [`TaskStore`].
///
/// Ids come from store-wide sequences starting at 1, like a database
/// serial column. Nothing survives the process.
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Create a new, empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                rows: Vec::new(),
                next_task_id: 1,
                next_comment_id: 1,
            }),
        }
    }

    /// Number of tasks across all owners.
    pub async fn len(&self) -> usize {
        self.state.lock().await.rows.len()
    }

    /// Whether the store holds no tasks at all.
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.rows.is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore for InMemoryStore {
    async fn list_tasks(&self, owner: &UserId) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .state
            .lock()
            .await
            .rows
            .iter()
            .filter(|row| row.owner == *owner)
            .map(|row| row.task.clone())
            .collect())
    }

    async fn create_task(&self, owner: &UserId, text: &str) -> Result<Task, StoreError> {
        let mut state = self.state.lock().await;
        let task = Task::new(TaskId::new(state.next_task_id), text);
        state.next_task_id += 1;
        state.rows.push(Row {
            owner: owner.clone(),
            task: task.clone(),
        });
        drop(state);
        Ok(task)
    }

    async fn update_task_completed(&self, id: TaskId, completed: bool) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let row = state
            .rows
            .iter_mut()
            .find(|row| row.task.id == id)
            .ok_or_else(|| task_not_found(id))?;
        row.task.completed = completed;
        drop(state);
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let before = state.rows.len();
        state.rows.retain(|row| row.task.id != id);
        if state.rows.len() == before {
            return Err(task_not_found(id));
        }
        drop(state);
        Ok(())
    }

    async fn create_comment(
        &self,
        task_id: TaskId,
        author: &Profile,
        text: &str,
    ) -> Result<Comment, StoreError> {
        let mut state = self.state.lock().await;
        let comment_id = CommentId::new(state.next_comment_id);
        let row = state
            .rows
            .iter_mut()
            .find(|row| row.task.id == task_id)
            .ok_or_else(|| task_not_found(task_id))?;
        let comment = Comment::new(comment_id, text, Author::new(author.name.clone()));
        row.task.comments.push(comment.clone());
        state.next_comment_id += 1;
        drop(state);
        Ok(comment)
    }
}
