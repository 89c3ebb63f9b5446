//! Board manager: the signed-in user's working set and its mutations.
//!
//! Every mutation goes to the store first. The working set only changes
//! after the store confirms, either by reloading everything
//! ([`SyncPolicy::Refetch`]) or by applying the returned record
//! ([`SyncPolicy::Patch`]). A store failure leaves the working set as it
//! was, emits a [`BoardWarning`], and keeps the operation for
//! [`retry`](BoardManager::retry).

use tokio::sync::{mpsc, watch};

use taskboard_proto::comment::Comment;
use taskboard_proto::profile::Profile;
use taskboard_proto::task::{Task, TaskId};

use super::partition::Partition;
use super::{BoardError, BoardOptions, BoardWarning, PendingOp, SyncPolicy};
use crate::store::{StoreError, TaskStore, now_ms};

/// Change to apply to the working set once the store accepted a write.
#[derive(Debug)]
enum Patch {
    Insert(Task),
    SetCompleted(TaskId, bool),
    Remove(TaskId),
    Comment(TaskId, Comment),
}

impl Patch {
    fn apply(self, tasks: &mut Vec<Task>) {
        match self {
            Self::Insert(task) => tasks.push(task),
            Self::SetCompleted(id, completed) => {
                if let Some(task) = tasks.iter_mut().find(|t| t.id == id) {
                    task.completed = completed;
                }
            }
            Self::Remove(id) => tasks.retain(|t| t.id != id),
            Self::Comment(task_id, comment) => {
                if let Some(task) = tasks.iter_mut().find(|t| t.id == task_id) {
                    task.comments.push(comment);
                }
            }
        }
    }
}

impl PendingOp {
    const fn task_id(&self) -> Option<TaskId> {
        match self {
            Self::Load | Self::AddTask { .. } => None,
            Self::SetCompleted { id, .. } | Self::Delete { id } => Some(*id),
            Self::AddComment { task_id, .. } => Some(*task_id),
        }
    }
}

/// Owns the task list of the current identity and keeps it in step with
/// a [`TaskStore`].
pub struct BoardManager<S: TaskStore> {
    store: S,
    /// Identity capability; changes trigger a full reload.
    identity: watch::Receiver<Option<Profile>>,
    /// The identity the working set belongs to.
    owner: Option<Profile>,
    /// Working set in store order (creation time, ascending).
    tasks: Vec<Task>,
    options: BoardOptions,
    /// Last failed store operation.
    pending: Option<PendingOp>,
    last_synced_ms: Option<u64>,
    warning_tx: mpsc::Sender<BoardWarning>,
}

impl<S: TaskStore> BoardManager<S> {
    /// Creates a manager for whichever identity `identity` currently holds.
    ///
    /// The working set starts empty; call [`load`](Self::load) to fetch it.
    /// Returns the manager and a receiver for [`BoardWarning`]s.
    #[must_use]
    pub fn new(
        store: S,
        mut identity: watch::Receiver<Option<Profile>>,
        options: BoardOptions,
    ) -> (Self, mpsc::Receiver<BoardWarning>) {
        let (warning_tx, warning_rx) = mpsc::channel(options.warning_buffer.max(1));
        let owner = identity.borrow_and_update().clone();
        let manager = Self {
            store,
            identity,
            owner,
            tasks: Vec::new(),
            options,
            pending: None,
            last_synced_ms: None,
            warning_tx,
        };
        (manager, warning_rx)
    }

    /// The backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The working set, in creation order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task in the working set.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// The working set split into pending and done columns.
    #[must_use]
    pub fn partition(&self) -> Partition<'_> {
        Partition::of(&self.tasks)
    }

    /// The identity the working set belongs to.
    #[must_use]
    pub const fn identity(&self) -> Option<&Profile> {
        self.owner.as_ref()
    }

    /// The failed operation [`retry`](Self::retry) would run, if any.
    #[must_use]
    pub const fn pending_retry(&self) -> Option<&PendingOp> {
        self.pending.as_ref()
    }

    /// When the working set last matched the store (ms since epoch).
    #[must_use]
    pub const fn last_synced_ms(&self) -> Option<u64> {
        self.last_synced_ms
    }

    /// Picks up an identity change, if one happened.
    ///
    /// On change the working set and any pending retry are discarded and
    /// the new identity's tasks are loaded. Returns `true` if the identity
    /// changed.
    pub async fn refresh_identity(&mut self) -> bool {
        if !self.identity.has_changed().unwrap_or(false) {
            return false;
        }
        let next = self.identity.borrow_and_update().clone();
        tracing::info!(
            from = ?self.owner.as_ref().map(|p| p.id.as_str()),
            to = ?next.as_ref().map(|p| p.id.as_str()),
            "identity changed, discarding working set"
        );
        self.owner = next;
        self.tasks.clear();
        self.pending = None;
        self.last_synced_ms = None;
        // Failures are reported through the warning channel.
        let _ = self.load().await;
        true
    }

    /// Replaces the working set with the owner's tasks from the store.
    ///
    /// With no identity the working set is cleared. On failure the
    /// working set is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] if the store cannot list tasks.
    pub async fn load(&mut self) -> Result<(), BoardError> {
        let Some(owner) = self.owner.as_ref() else {
            self.tasks.clear();
            return Ok(());
        };
        match self.store.list_tasks(&owner.id).await {
            Ok(tasks) => {
                tracing::debug!(owner = %owner.id, count = tasks.len(), "loaded tasks");
                self.tasks = tasks;
                self.last_synced_ms = Some(now_ms());
                if self.pending == Some(PendingOp::Load) {
                    self.pending = None;
                }
                Ok(())
            }
            Err(err) => {
                self.report(PendingOp::Load, &err);
                Err(err.into())
            }
        }
    }

    /// Creates a pending task from `text`.
    ///
    /// # Errors
    ///
    /// [`BoardError::TextEmpty`] if `text` is blank, [`BoardError::NotSignedIn`]
    /// without an identity, [`BoardError::Store`] if the store fails.
    pub async fn add_task(&mut self, text: &str) -> Result<(), BoardError> {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("ignoring empty task");
            return Err(BoardError::TextEmpty);
        }
        self.execute(PendingOp::AddTask {
            text: text.to_string(),
        })
        .await
    }

    /// Flips a task between the pending and done columns.
    ///
    /// # Errors
    ///
    /// [`BoardError::TaskNotFound`] if the task is not in the working set,
    /// [`BoardError::Store`] if the store fails.
    pub async fn toggle_task(&mut self, id: TaskId) -> Result<(), BoardError> {
        let completed = !self.require(id)?.completed;
        self.execute(PendingOp::SetCompleted { id, completed }).await
    }

    /// Moves a task to the column whose `completed` value is `target_completed`.
    ///
    /// Moving a task to the column it is already in writes nothing.
    ///
    /// # Errors
    ///
    /// [`BoardError::TaskNotFound`] if the task is not in the working set,
    /// [`BoardError::Store`] if the store fails.
    pub async fn move_task(&mut self, id: TaskId, target_completed: bool) -> Result<(), BoardError> {
        if self.require(id)?.completed == target_completed {
            tracing::debug!(%id, target_completed, "task already in target column");
            return Ok(());
        }
        self.execute(PendingOp::SetCompleted {
            id,
            completed: target_completed,
        })
        .await
    }

    /// Deletes a task and its comments.
    ///
    /// # Errors
    ///
    /// [`BoardError::TaskNotFound`] if the task is not in the working set,
    /// [`BoardError::Store`] if the store fails.
    pub async fn delete_task(&mut self, id: TaskId) -> Result<(), BoardError> {
        self.require(id)?;
        self.execute(PendingOp::Delete { id }).await
    }

    /// Appends a comment by the current identity to a task.
    ///
    /// # Errors
    ///
    /// [`BoardError::TextEmpty`] if `text` is blank, [`BoardError::NotSignedIn`]
    /// without an identity, [`BoardError::TaskNotFound`] if the task is not
    /// in the working set, [`BoardError::Store`] if the store fails.
    pub async fn add_comment(&mut self, task_id: TaskId, text: &str) -> Result<(), BoardError> {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!(%task_id, "ignoring empty comment");
            return Err(BoardError::TextEmpty);
        }
        if self.owner.is_none() {
            return Err(BoardError::NotSignedIn);
        }
        self.require(task_id)?;
        self.execute(PendingOp::AddComment {
            task_id,
            text: text.to_string(),
        })
        .await
    }

    /// Re-runs the last failed store operation, if any.
    ///
    /// # Errors
    ///
    /// Returns the error of the retried operation.
    pub async fn retry(&mut self) -> Result<(), BoardError> {
        let Some(op) = self.pending.clone() else {
            return Ok(());
        };
        tracing::info!(%op, "retrying");
        self.execute(op).await
    }

    fn require(&self, id: TaskId) -> Result<&Task, BoardError> {
        self.task(id).ok_or_else(|| {
            tracing::debug!(%id, "task not in working set");
            BoardError::TaskNotFound(id)
        })
    }

    async fn execute(&mut self, op: PendingOp) -> Result<(), BoardError> {
        let owner = match (&op, &self.owner) {
            (PendingOp::Load, _) => return self.load().await,
            (_, None) => return Err(BoardError::NotSignedIn),
            (_, Some(owner)) => owner.clone(),
        };

        let result = match &op {
            // Dispatched to `load` above.
            PendingOp::Load => return Ok(()),
            PendingOp::AddTask { text } => self
                .store
                .create_task(&owner.id, text)
                .await
                .map(Patch::Insert),
            PendingOp::SetCompleted { id, completed } => self
                .store
                .update_task_completed(*id, *completed)
                .await
                .map(|()| Patch::SetCompleted(*id, *completed)),
            PendingOp::Delete { id } => self
                .store
                .delete_task(*id)
                .await
                .map(|()| Patch::Remove(*id)),
            PendingOp::AddComment { task_id, text } => self
                .store
                .create_comment(*task_id, &owner, text)
                .await
                .map(|comment| Patch::Comment(*task_id, comment)),
        };

        match result {
            Ok(patch) => {
                if self.pending.as_ref() == Some(&op) {
                    self.pending = None;
                }
                self.sync(patch).await;
                Ok(())
            }
            Err(StoreError::NotFound(what)) if op.task_id().is_some() => {
                // Gone from the store (another session deleted it): resync.
                tracing::debug!(%what, %op, "target missing from store");
                if self.pending.as_ref() == Some(&op) {
                    self.pending = None;
                }
                let _ = self.load().await;
                Err(op
                    .task_id()
                    .map_or(BoardError::Store(StoreError::NotFound(what)), BoardError::TaskNotFound))
            }
            Err(err) => {
                self.report(op, &err);
                Err(err.into())
            }
        }
    }

    async fn sync(&mut self, patch: Patch) {
        match self.options.sync_policy {
            SyncPolicy::Refetch => {
                let _ = self.load().await;
            }
            SyncPolicy::Patch => {
                patch.apply(&mut self.tasks);
                self.last_synced_ms = Some(now_ms());
            }
        }
    }

    fn report(&mut self, op: PendingOp, err: &StoreError) {
        tracing::warn!(%op, error = %err, "store operation failed, state unchanged");
        self.pending = Some(op.clone());
        // Best-effort: a full channel drops the warning.
        let _ = self.warning_tx.try_send(BoardWarning {
            op,
            reason: err.to_string(),
        });
    }
}
