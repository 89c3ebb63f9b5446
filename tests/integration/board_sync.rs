//! Integration tests for the board manager against each store backend.
//!
//! Every scenario runs against the in-memory store, the JSON mirror and
//! SQLite, with both sync policies, so the observable behaviour of a
//! board does not depend on how it is stored.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use tokio::sync::watch;

use taskboard::board::{BoardError, BoardManager, BoardOptions, SyncPolicy};
use taskboard::store::{InMemoryStore, LocalMirrorStore, SqliteStore, TaskStore};
use taskboard_proto::comment::Author;
use taskboard_proto::profile::Profile;
use taskboard_proto::task::Column;

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn alice() -> Profile {
    Profile::new("user-1", "Alice", "alice@example.com")
}

fn board<S: TaskStore>(store: S, policy: SyncPolicy) -> BoardManager<S> {
    let (_tx, rx) = watch::channel(Some(alice()));
    let options = BoardOptions {
        sync_policy: policy,
        ..BoardOptions::default()
    };
    BoardManager::new(store, rx, options).0
}

async fn full_scenario<S: TaskStore>(store: S, policy: SyncPolicy) {
    let mut mgr = board(store, policy);
    mgr.load().await.unwrap();
    assert!(mgr.tasks().is_empty());

    // Adding a task grows the pending column by exactly one.
    mgr.add_task("write report").await.unwrap();
    mgr.add_task("  review PR  ").await.unwrap();
    assert_eq!(mgr.partition().pending.len(), 2);
    assert_eq!(mgr.tasks()[1].text, "review PR");

    // Whitespace is rejected without a write.
    assert_eq!(mgr.add_task(" \n\t").await, Err(BoardError::TextEmpty));
    assert_eq!(mgr.tasks().len(), 2);

    // Drop the first task on the done column.
    let report = mgr.tasks()[0].id;
    mgr.move_task(report, Column::Done.completed()).await.unwrap();
    let partition = mgr.partition();
    assert_eq!(partition.done.len(), 1);
    assert_eq!(partition.done[0].id, report);
    assert_eq!(partition.pending.len(), 1);

    // Comment by the signed-in author.
    mgr.add_comment(report, "done on time").await.unwrap();
    let comment = &mgr.task(report).unwrap().comments[0];
    assert_eq!(comment.author, Author::new("Alice"));

    // Reload from the store yields the same working set.
    let before = mgr.tasks().to_vec();
    mgr.load().await.unwrap();
    assert_eq!(mgr.tasks(), before.as_slice());

    // Deleting twice: the second is a no-op.
    mgr.delete_task(report).await.unwrap();
    assert_eq!(
        mgr.delete_task(report).await,
        Err(BoardError::TaskNotFound(report))
    );
    assert_eq!(mgr.tasks().len(), 1);
}

// ===========================================================================
// Backends x policies
// ===========================================================================

#[tokio::test]
async fn memory_refetch() {
    full_scenario(InMemoryStore::new(), SyncPolicy::Refetch).await;
}

#[tokio::test]
async fn memory_patch() {
    full_scenario(InMemoryStore::new(), SyncPolicy::Patch).await;
}

#[tokio::test]
async fn local_mirror_refetch() {
    let dir = tempfile::tempdir().unwrap();
    full_scenario(LocalMirrorStore::open_in(dir.path()).unwrap(), SyncPolicy::Refetch).await;
}

#[tokio::test]
async fn local_mirror_patch() {
    let dir = tempfile::tempdir().unwrap();
    full_scenario(LocalMirrorStore::open_in(dir.path()).unwrap(), SyncPolicy::Patch).await;
}

#[tokio::test]
async fn sqlite_refetch() {
    full_scenario(SqliteStore::open_in_memory().unwrap(), SyncPolicy::Refetch).await;
}

#[tokio::test]
async fn sqlite_patch() {
    full_scenario(SqliteStore::open_in_memory().unwrap(), SyncPolicy::Patch).await;
}

// ===========================================================================
// Durability
// ===========================================================================

#[tokio::test]
async fn sqlite_board_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut mgr = board(SqliteStore::open_in(dir.path()).unwrap(), SyncPolicy::Refetch);
        mgr.add_task("persisted").await.unwrap();
        let id = mgr.tasks()[0].id;
        mgr.toggle_task(id).await.unwrap();
        mgr.add_comment(id, "note").await.unwrap();
    }
    let mut mgr = board(SqliteStore::open_in(dir.path()).unwrap(), SyncPolicy::Refetch);
    mgr.load().await.unwrap();
    assert_eq!(mgr.partition().done.len(), 1);
    assert_eq!(mgr.tasks()[0].comments[0].text, "note");
}

#[tokio::test]
async fn working_set_comes_from_store_order() {
    let store = InMemoryStore::new();
    let owner = alice().id;
    for text in ["first", "second", "third"] {
        store.create_task(&owner, text).await.unwrap();
    }
    let mut mgr = board(store, SyncPolicy::Refetch);
    mgr.load().await.unwrap();
    let texts: Vec<&str> = mgr.tasks().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["first", "second", "third"]);
}
