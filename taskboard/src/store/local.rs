//! Local JSON mirror of the task board.
//!
//! Keeps every owner's tasks in one JSON document on local disk and
//! rewrites it synchronously after each mutation. Ids are assigned here
//! rather than by a database: the next task id is `max(existing) + 1`,
//! restarting at 0 once the mirror is empty. Comment ids follow the same
//! rule within their task.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use taskboard_proto::comment::{Author, Comment, CommentId};
use taskboard_proto::profile::{Profile, UserId};
use taskboard_proto::task::{Task, TaskId};

use super::{StoreError, TaskStore, task_not_found};

/// File name used inside the data directory.
pub const MIRROR_FILE_NAME: &str = "tasks.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MirrorRow {
    owner: UserId,
    task: Task,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MirrorFile {
    #[serde(default)]
    tasks: Vec<MirrorRow>,
}

impl MirrorFile {
    fn next_task_id(&self) -> TaskId {
        TaskId::new(
            self.tasks
                .iter()
                .map(|row| row.task.id.get())
                .max()
                .map_or(0, |max| max + 1),
        )
    }

    fn row_mut(&mut self, id: TaskId) -> Result<&mut MirrorRow, StoreError> {
        self.tasks
            .iter_mut()
            .find(|row| row.task.id == id)
            .ok_or_else(|| task_not_found(id))
    }
}

fn next_comment_id(task: &Task) -> CommentId {
    CommentId::new(
        task.comments
            .iter()
            .map(|c| c.id.get())
            .max()
            .map_or(0, |max| max + 1),
    )
}

/// [`TaskStore`] backed by a JSON file.
pub struct LocalMirrorStore {
    path: PathBuf,
    state: Mutex<MirrorFile>,
}

impl LocalMirrorStore {
    /// Open the mirror at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the file exists but cannot be
    /// read or does not contain a valid mirror document.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                StoreError::Unavailable(format!("corrupt mirror {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => MirrorFile::default(),
            Err(e) => {
                return Err(StoreError::Unavailable(format!(
                    "cannot read {}: {e}",
                    path.display()
                )));
            }
        };
        tracing::debug!(path = %path.display(), tasks = state.tasks.len(), "opened local mirror");
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Open the mirror file inside a data directory.
    ///
    /// # Errors
    ///
    /// See [`open`](Self::open).
    pub fn open_in(data_dir: &Path) -> Result<Self, StoreError> {
        Self::open(data_dir.join(MIRROR_FILE_NAME))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `mutate` to a copy of the state and persist it; the in-memory
    /// state only changes once the file write succeeded.
    fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut MirrorFile) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut state = self.state.lock();
        let mut next = MirrorFile {
            tasks: state.tasks.clone(),
        };
        let out = mutate(&mut next)?;
        self.write_file(&next)?;
        *state = next;
        drop(state);
        Ok(out)
    }

    fn write_file(&self, file: &MirrorFile) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(file)
            .map_err(|e| StoreError::WriteFailed(format!("encode mirror: {e}")))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::WriteFailed(format!("{}: {e}", parent.display())))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .and_then(|()| std::fs::rename(&tmp, &self.path))
            .map_err(|e| StoreError::WriteFailed(format!("{}: {e}", self.path.display())))
    }
}

impl TaskStore for LocalMirrorStore {
    async fn list_tasks(&self, owner: &UserId) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .state
            .lock()
            .tasks
            .iter()
            .filter(|row| row.owner == *owner)
            .map(|row| row.task.clone())
            .collect())
    }

    async fn create_task(&self, owner: &UserId, text: &str) -> Result<Task, StoreError> {
        self.commit(|file| {
            let task = Task::new(file.next_task_id(), text);
            file.tasks.push(MirrorRow {
                owner: owner.clone(),
                task: task.clone(),
            });
            Ok(task)
        })
    }

    async fn update_task_completed(&self, id: TaskId, completed: bool) -> Result<(), StoreError> {
        self.commit(|file| {
            file.row_mut(id)?.task.completed = completed;
            Ok(())
        })
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), StoreError> {
        self.commit(|file| {
            let before = file.tasks.len();
            file.tasks.retain(|row| row.task.id != id);
            if file.tasks.len() == before {
                return Err(task_not_found(id));
            }
            Ok(())
        })
    }

    async fn create_comment(
        &self,
        task_id: TaskId,
        author: &Profile,
        text: &str,
    ) -> Result<Comment, StoreError> {
        self.commit(|file| {
            let task = &mut file.row_mut(task_id)?.task;
            let comment = Comment::new(
                next_comment_id(task),
                text,
                Author::new(author.name.clone()),
            );
            task.comments.push(comment.clone());
            Ok(comment)
        })
    }
}
