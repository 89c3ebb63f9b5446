//! Integration tests for the store backends.
//!
//! Checks the contract every [`TaskStore`] shares, then the behaviour
//! specific to the JSON mirror and SQLite.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use taskboard::store::{InMemoryStore, LocalMirrorStore, SqliteStore, StoreError, TaskStore};
use taskboard_proto::profile::{Profile, UserId};
use taskboard_proto::task::TaskId;

fn alice() -> Profile {
    Profile::new("user-1", "Alice", "alice@example.com")
}

async fn contract<S: TaskStore>(store: S) {
    let author = alice();
    let other = UserId::new("user-2");

    let a = store.create_task(&author.id, "a").await.unwrap();
    let b = store.create_task(&author.id, "b").await.unwrap();
    store.create_task(&other, "not yours").await.unwrap();
    assert_ne!(a.id, b.id);
    assert!(!a.completed);
    assert!(a.comments.is_empty());

    let listed = store.list_tasks(&author.id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, a.id);

    store.update_task_completed(b.id, true).await.unwrap();
    let c1 = store.create_comment(a.id, &author, "one").await.unwrap();
    let c2 = store.create_comment(a.id, &author, "two").await.unwrap();
    assert_ne!(c1.id, c2.id);
    assert_eq!(c1.author.name, "Alice");

    let listed = store.list_tasks(&author.id).await.unwrap();
    assert!(listed[1].completed);
    let texts: Vec<&str> = listed[0].comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["one", "two"]);

    store.delete_task(a.id).await.unwrap();
    assert!(matches!(
        store.delete_task(a.id).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.update_task_completed(TaskId::new(12_345), true).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.create_comment(a.id, &author, "late").await,
        Err(StoreError::NotFound(_))
    ));
    assert_eq!(store.list_tasks(&author.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn memory_store_contract() {
    contract(InMemoryStore::new()).await;
}

#[tokio::test]
async fn local_mirror_contract() {
    let dir = tempfile::tempdir().unwrap();
    contract(LocalMirrorStore::open_in(dir.path()).unwrap()).await;
}

#[tokio::test]
async fn sqlite_contract() {
    contract(SqliteStore::open_in_memory().unwrap()).await;
}

#[tokio::test]
async fn local_mirror_ids_follow_max_plus_one() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalMirrorStore::open_in(dir.path()).unwrap();
    let owner = alice().id;
    let ids: Vec<i64> = {
        let mut ids = Vec::new();
        for text in ["a", "b", "c"] {
            ids.push(store.create_task(&owner, text).await.unwrap().id.get());
        }
        ids
    };
    assert_eq!(ids, [0, 1, 2]);

    store.delete_task(TaskId::new(2)).await.unwrap();
    assert_eq!(store.create_task(&owner, "d").await.unwrap().id, TaskId::new(2));

    for id in [0, 1, 2] {
        store.delete_task(TaskId::new(id)).await.unwrap();
    }
    assert_eq!(store.create_task(&owner, "e").await.unwrap().id, TaskId::new(0));
}

#[tokio::test]
async fn local_mirror_failed_write_leaves_state() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the mirror file should be makes the rename fail.
    let path = dir.path().join("tasks.json");
    let store = LocalMirrorStore::open(&path).unwrap();
    store.create_task(&alice().id, "kept").await.unwrap();
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();

    let result = store.create_task(&alice().id, "lost").await;
    assert!(matches!(result, Err(StoreError::WriteFailed(_))));
    assert_eq!(store.list_tasks(&alice().id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn sqlite_file_is_created_in_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested").join("dir");
    let store = SqliteStore::open_in(&nested).unwrap();
    store.create_task(&alice().id, "x").await.unwrap();
    assert!(nested.join("taskboard.db").exists());
}
