//! Property-based tests for the two-column partition and board operations.
//!
//! Uses proptest to verify:
//! 1. Every task lands in exactly one column, and columns keep list order.
//! 2. Moving a task to the column it is already in changes nothing.
//! 3. Blank task text never changes the board.

use proptest::prelude::*;
use tokio::sync::watch;

use taskboard::board::{BoardManager, BoardOptions, Partition, SyncPolicy};
use taskboard::store::InMemoryStore;
use taskboard_proto::profile::Profile;
use taskboard_proto::task::{Column, Task, TaskId};

/// Strategy for a task list with unique ids and random completion.
fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec((any::<bool>(), "[a-z ]{1,12}"), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (completed, text))| {
                let mut task = Task::new(TaskId::new(i64::try_from(i).unwrap_or(i64::MAX)), text);
                task.completed = completed;
                task
            })
            .collect()
    })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| panic!("runtime: {e}"))
}

fn board(policy: SyncPolicy) -> BoardManager<InMemoryStore> {
    let (_tx, rx) = watch::channel(Some(Profile::new("user-1", "Alice", "a@example.com")));
    let options = BoardOptions {
        sync_policy: policy,
        ..BoardOptions::default()
    };
    BoardManager::new(InMemoryStore::new(), rx, options).0
}

proptest! {
    #[test]
    fn partition_is_total_and_disjoint(tasks in arb_tasks()) {
        let p = Partition::of(&tasks);
        prop_assert_eq!(p.len(), tasks.len());
        for task in &tasks {
            let in_pending = p.pending.iter().any(|t| t.id == task.id);
            let in_done = p.done.iter().any(|t| t.id == task.id);
            prop_assert!(in_pending != in_done);
            prop_assert_eq!(in_done, task.completed);
        }
    }

    #[test]
    fn partition_preserves_relative_order(tasks in arb_tasks()) {
        let p = Partition::of(&tasks);
        for column in Column::ALL {
            let ids: Vec<i64> = p.column(column).iter().map(|t| t.id.get()).collect();
            let mut sorted = ids.clone();
            sorted.sort_unstable();
            prop_assert_eq!(ids, sorted);
        }
    }

    #[test]
    fn move_to_current_column_is_noop(
        flags in prop::collection::vec(any::<bool>(), 1..8),
        pick in any::<prop::sample::Index>(),
        patch in any::<bool>(),
    ) {
        let policy = if patch { SyncPolicy::Patch } else { SyncPolicy::Refetch };
        runtime().block_on(async {
            let mut mgr = board(policy);
            for (i, done) in flags.iter().enumerate() {
                mgr.add_task(&format!("task {i}")).await.unwrap_or_default();
                if *done {
                    let id = mgr.tasks()[i].id;
                    mgr.toggle_task(id).await.unwrap_or_default();
                }
            }
            let task = &mgr.tasks()[pick.index(flags.len())];
            let (id, completed) = (task.id, task.completed);
            let before = mgr.tasks().to_vec();

            mgr.move_task(id, completed).await.unwrap_or_default();
            prop_assert_eq!(mgr.tasks(), before.as_slice());

            mgr.move_task(id, !completed).await.unwrap_or_default();
            let after_first = mgr.tasks().to_vec();
            mgr.move_task(id, !completed).await.unwrap_or_default();
            prop_assert_eq!(mgr.tasks(), after_first.as_slice());
            Ok(())
        })?;
    }

    #[test]
    fn blank_text_never_adds(text in "[ \t\n]{0,8}") {
        runtime().block_on(async {
            let mut mgr = board(SyncPolicy::Refetch);
            mgr.add_task("existing").await.unwrap_or_default();
            let before = mgr.tasks().to_vec();
            prop_assert!(mgr.add_task(&text).await.is_err());
            prop_assert!(mgr.add_comment(before[0].id, &text).await.is_err());
            prop_assert_eq!(mgr.tasks(), before.as_slice());
            Ok(())
        })?;
    }
}
