//! SQLite-backed [`TaskStore`].
//!
//! Tasks, comments and author profiles live in separate tables. Comment
//! authors are resolved with a join when listing, and normalised into a
//! single [`Author`] before leaving this module.

use std::collections::HashMap;
use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};

use taskboard_proto::comment::{Author, Comment, CommentId};
use taskboard_proto::profile::{Profile, UserId};
use taskboard_proto::task::{Task, TaskId};

use super::{StoreError, TaskStore, now_ms, task_not_found};

/// File name used inside the data directory.
pub const DATABASE_FILE_NAME: &str = "taskboard.db";

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS profiles (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    text TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tasks_user ON tasks(user_id, created_at);

CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
    author_id TEXT NOT NULL,
    text TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_task ON comments(task_id, created_at);
";

fn read_err(e: &rusqlite::Error) -> StoreError {
    StoreError::ReadFailed(e.to_string())
}

fn write_err(e: &rusqlite::Error) -> StoreError {
    StoreError::WriteFailed(e.to_string())
}

fn timestamp() -> i64 {
    i64::try_from(now_ms()).unwrap_or(i64::MAX)
}

/// [`TaskStore`] backed by a SQLite database.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the database cannot be opened
    /// or the schema cannot be applied.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Unavailable(format!("{}: {e}", parent.display())))?;
        }
        let conn = Connection::open(path)
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", path.display())))?;
        Self::with_connection(conn)
    }

    /// Open the database file inside a data directory.
    ///
    /// # Errors
    ///
    /// See [`open`](Self::open).
    pub fn open_in(data_dir: &Path) -> Result<Self, StoreError> {
        Self::open(&data_dir.join(DATABASE_FILE_NAME))
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the schema cannot be applied.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .and_then(|()| conn.execute_batch(SCHEMA))
            .map_err(|e| StoreError::Unavailable(format!("schema: {e}")))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn task_exists(conn: &Connection, id: TaskId) -> Result<bool, StoreError> {
        conn.query_row("SELECT 1 FROM tasks WHERE id = ?1", params![id.get()], |_| Ok(()))
            .optional()
            .map(|row| row.is_some())
            .map_err(|e| read_err(&e))
    }

    fn query_tasks(conn: &Connection, owner: &UserId) -> Result<Vec<Task>, StoreError> {
        let mut stmt = conn
            .prepare(
                "SELECT id, text, completed FROM tasks
                 WHERE user_id = ?1 ORDER BY created_at, id",
            )
            .map_err(|e| read_err(&e))?;
        let rows = stmt
            .query_map(params![owner.as_str()], |row| {
                Ok(Task {
                    id: TaskId::new(row.get(0)?),
                    text: row.get(1)?,
                    completed: row.get(2)?,
                    comments: Vec::new(),
                })
            })
            .map_err(|e| read_err(&e))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| read_err(&e))
    }

    /// Comments on every task of `owner`, paired with their task id.
    fn query_comments(
        conn: &Connection,
        owner: &UserId,
    ) -> Result<Vec<(i64, Comment)>, StoreError> {
        let mut stmt = conn
            .prepare(
                "SELECT c.task_id, c.id, c.text, p.name
                 FROM comments c
                 JOIN tasks t ON t.id = c.task_id
                 LEFT JOIN profiles p ON p.id = c.author_id
                 WHERE t.user_id = ?1
                 ORDER BY c.created_at, c.id",
            )
            .map_err(|e| read_err(&e))?;
        let rows = stmt
            .query_map(params![owner.as_str()], |row| {
                let name: Option<String> = row.get(3)?;
                Ok((
                    row.get(0)?,
                    Comment::new(
                        CommentId::new(row.get(1)?),
                        row.get::<_, String>(2)?,
                        name.map_or_else(Author::unknown, Author::new),
                    ),
                ))
            })
            .map_err(|e| read_err(&e))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| read_err(&e))
    }
}

impl TaskStore for SqliteStore {
    async fn list_tasks(&self, owner: &UserId) -> Result<Vec<Task>, StoreError> {
        let conn = self.conn.lock();
        let mut tasks = Self::query_tasks(&conn, owner)?;
        let comments = Self::query_comments(&conn, owner)?;
        drop(conn);

        let index: HashMap<i64, usize> = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.get(), i))
            .collect();
        for (task_id, comment) in comments {
            if let Some(&i) = index.get(&task_id) {
                tasks[i].comments.push(comment);
            }
        }
        Ok(tasks)
    }

    async fn create_task(&self, owner: &UserId, text: &str) -> Result<Task, StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO tasks (user_id, text, completed, created_at) VALUES (?1, ?2, 0, ?3)",
            params![owner.as_str(), text, timestamp()],
        )
        .map_err(|e| write_err(&e))?;
        let id = TaskId::new(conn.last_insert_rowid());
        drop(conn);
        Ok(Task::new(id, text))
    }

    async fn update_task_completed(&self, id: TaskId, completed: bool) -> Result<(), StoreError> {
        let changed = self
            .conn
            .lock()
            .execute(
                "UPDATE tasks SET completed = ?1 WHERE id = ?2",
                params![completed, id.get()],
            )
            .map_err(|e| write_err(&e))?;
        if changed == 0 {
            return Err(task_not_found(id));
        }
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), StoreError> {
        let changed = self
            .conn
            .lock()
            .execute("DELETE FROM tasks WHERE id = ?1", params![id.get()])
            .map_err(|e| write_err(&e))?;
        if changed == 0 {
            return Err(task_not_found(id));
        }
        Ok(())
    }

    async fn create_comment(
        &self,
        task_id: TaskId,
        author: &Profile,
        text: &str,
    ) -> Result<Comment, StoreError> {
        let mut conn = self.conn.lock();
        if !Self::task_exists(&conn, task_id)? {
            return Err(task_not_found(task_id));
        }
        let tx = conn.transaction().map_err(|e| write_err(&e))?;
        tx.execute(
            "INSERT INTO profiles (id, name, email) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, email = excluded.email",
            params![author.id.as_str(), author.name, author.email],
        )
        .map_err(|e| write_err(&e))?;
        tx.execute(
            "INSERT INTO comments (task_id, author_id, text, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![task_id.get(), author.id.as_str(), text, timestamp()],
        )
        .map_err(|e| write_err(&e))?;
        let id = CommentId::new(tx.last_insert_rowid());
        tx.commit().map_err(|e| write_err(&e))?;
        drop(conn);
        Ok(Comment::new(id, text, Author::new(author.name.clone())))
    }
}
