//! Integration tests for identity changes.
//!
//! The board observes the identity provider through a watch channel; each
//! sign-in, sign-out and registration must leave it showing exactly the
//! current user's tasks.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use taskboard::board::{BoardError, BoardManager, BoardOptions};
use taskboard::identity::{Credentials, IdentityProvider, LocalIdentityProvider};
use taskboard::store::{InMemoryStore, SqliteStore, TaskStore};
use taskboard_proto::profile::NewProfile;

fn setup<S: TaskStore>(store: S) -> (BoardManager<S>, LocalIdentityProvider) {
    let provider = LocalIdentityProvider::in_memory();
    let (mgr, _warnings) = BoardManager::new(store, provider.subscribe(), BoardOptions::default());
    (mgr, provider)
}

#[tokio::test]
async fn users_see_only_their_own_tasks() {
    let (mut mgr, provider) = setup(InMemoryStore::new());

    provider.login(&Credentials::new("user-1")).unwrap();
    assert!(mgr.refresh_identity().await);
    mgr.add_task("tanaka's task").await.unwrap();

    provider.login(&Credentials::new("sato@example.com")).unwrap();
    assert!(mgr.refresh_identity().await);
    assert!(mgr.tasks().is_empty());
    mgr.add_task("sato's task").await.unwrap();

    provider.login(&Credentials::new("user-1")).unwrap();
    mgr.refresh_identity().await;
    let texts: Vec<&str> = mgr.tasks().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["tanaka's task"]);
}

#[tokio::test]
async fn logout_clears_board_and_blocks_writes() {
    let (mut mgr, provider) = setup(SqliteStore::open_in_memory().unwrap());
    provider.login(&Credentials::new("user-2")).unwrap();
    mgr.refresh_identity().await;
    mgr.add_task("x").await.unwrap();
    let id = mgr.tasks()[0].id;

    provider.logout().unwrap();
    assert!(mgr.refresh_identity().await);
    assert!(mgr.identity().is_none());
    assert!(mgr.tasks().is_empty());
    assert_eq!(mgr.add_task("y").await, Err(BoardError::NotSignedIn));
    assert_eq!(mgr.add_comment(id, "hi").await, Err(BoardError::NotSignedIn));
}

#[tokio::test]
async fn registered_user_starts_with_empty_board() {
    let (mut mgr, provider) = setup(InMemoryStore::new());
    provider.login(&Credentials::new("user-1")).unwrap();
    mgr.refresh_identity().await;
    mgr.add_task("old").await.unwrap();

    let profile = provider
        .register(NewProfile {
            name: "Newcomer".to_string(),
            email: "new@example.com".to_string(),
        })
        .unwrap();
    assert!(mgr.refresh_identity().await);
    assert_eq!(mgr.identity(), Some(&profile));
    assert!(mgr.tasks().is_empty());

    mgr.add_task("mine").await.unwrap();
    let task = mgr.tasks()[0].id;
    mgr.add_comment(task, "first!").await.unwrap();
    assert_eq!(mgr.task(task).unwrap().comments[0].author.name, "Newcomer");
}

#[tokio::test]
async fn failed_login_keeps_board() {
    let (mut mgr, provider) = setup(InMemoryStore::new());
    provider.login(&Credentials::new("user-1")).unwrap();
    mgr.refresh_identity().await;
    mgr.add_task("keep").await.unwrap();

    assert!(provider.login(&Credentials::new("ghost@example.com")).is_err());
    assert!(!mgr.refresh_identity().await);
    assert_eq!(mgr.tasks().len(), 1);
}
