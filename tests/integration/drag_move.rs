//! Integration tests for drag-and-drop moves between columns.
//!
//! Drives the drag controller the way the UI does and applies the
//! resulting move requests to a board.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use ratatui::layout::{Position, Rect};
use tokio::sync::watch;

use taskboard::board::{BoardManager, BoardOptions};
use taskboard::drag::{DragController, DragSource, DropZone, MoveRequest};
use taskboard::store::InMemoryStore;
use taskboard_proto::drag::DragPayload;
use taskboard_proto::profile::Profile;
use taskboard_proto::task::{Column, TaskId};

fn controller() -> DragController {
    let mut ctl = DragController::new();
    ctl.set_area(Column::Pending, Rect::new(0, 0, 30, 20));
    ctl.set_area(Column::Done, Rect::new(30, 0, 30, 20));
    ctl
}

async fn board_with(texts: &[&str]) -> BoardManager<InMemoryStore> {
    let (_tx, rx) = watch::channel(Some(Profile::new("user-1", "Alice", "a@example.com")));
    let (mut mgr, _w) = BoardManager::new(InMemoryStore::new(), rx, BoardOptions::default());
    for text in texts {
        mgr.add_task(text).await.unwrap();
    }
    mgr
}

async fn apply(mgr: &mut BoardManager<InMemoryStore>, request: MoveRequest) {
    let _ = mgr.move_task(request.task_id, request.target.completed()).await;
}

#[tokio::test]
async fn drop_on_done_moves_only_that_task() {
    let mut mgr = board_with(&["a", "b", "c"]).await;
    let b = mgr.tasks().iter().find(|t| t.text == "b").unwrap().id;

    let mut ctl = controller();
    ctl.begin(DragSource::Card(b));
    ctl.pointer_moved(Position::new(40, 5));
    let request = ctl.release(Position::new(40, 5)).unwrap();
    apply(&mut mgr, request).await;

    let partition = mgr.partition();
    let done: Vec<TaskId> = partition.done.iter().map(|t| t.id).collect();
    assert_eq!(done, [b]);
    assert_eq!(partition.pending.len(), 2);
}

#[tokio::test]
async fn dropping_twice_is_idempotent() {
    let mut mgr = board_with(&["a"]).await;
    let a = mgr.tasks()[0].id;
    let mut ctl = controller();

    for _ in 0..2 {
        ctl.begin(DragSource::Card(a));
        let request = ctl.release(Position::new(45, 3)).unwrap();
        apply(&mut mgr, request).await;
    }
    assert_eq!(mgr.partition().done.len(), 1);
    assert!(mgr.partition().pending.is_empty());
}

#[tokio::test]
async fn drop_back_on_pending_reopens() {
    let mut mgr = board_with(&["a"]).await;
    let a = mgr.tasks()[0].id;
    mgr.toggle_task(a).await.unwrap();

    let mut ctl = controller();
    ctl.begin(DragSource::Card(a));
    let request = ctl.complete(Column::Pending).unwrap();
    apply(&mut mgr, request).await;
    assert!(!mgr.task(a).unwrap().completed);
}

#[tokio::test]
async fn foreign_payload_changes_nothing() {
    let mut mgr = board_with(&["a"]).await;
    let before = mgr.tasks().to_vec();

    let mut zone = DropZone {
        area: Rect::new(0, 0, 10, 10),
        ..DropZone::new(Column::Done)
    };
    zone.drag_over();
    assert_eq!(zone.drop(&DragPayload::from_text("")), None);
    assert_eq!(zone.drop(&DragPayload::from_text("not-an-id")), None);
    assert!(!zone.highlighted);

    // An id that parses but names no task is a no-op too.
    let request = zone.drop(&DragPayload::for_task(TaskId::new(9_999))).unwrap();
    apply(&mut mgr, request).await;
    assert_eq!(mgr.tasks(), before.as_slice());
}

#[tokio::test]
async fn externally_supplied_payloads_go_through_the_controller() {
    let mut mgr = board_with(&["a", "b"]).await;
    let b = mgr.tasks().iter().find(|t| t.text == "b").unwrap().id;
    let before = mgr.tasks().to_vec();

    // Text from outside the board highlights the zone but moves nothing.
    let mut ctl = controller();
    ctl.begin_with(DragPayload::from_text("not-an-id"));
    assert!(ctl.is_dragging());
    assert_eq!(ctl.dragged(), None);
    ctl.pointer_moved(Position::new(40, 5));
    assert!(ctl.zone(Column::Done).highlighted);
    assert!(ctl.release(Position::new(40, 5)).is_none());
    assert!(!ctl.zone(Column::Done).highlighted);
    assert_eq!(mgr.tasks(), before.as_slice());

    // A payload carrying a task id behaves like a card drag.
    ctl.begin_with(DragPayload::for_task(b));
    assert_eq!(ctl.dragged(), Some(b));
    ctl.pointer_moved(Position::new(40, 5));
    let request = ctl.release(Position::new(40, 5)).unwrap();
    assert_eq!(request, MoveRequest { task_id: b, target: Column::Done });
    apply(&mut mgr, request).await;
    assert!(mgr.task(b).unwrap().completed);
    assert_eq!(mgr.tasks().iter().filter(|t| t.completed).count(), 1);
}

#[tokio::test]
async fn comment_panel_drag_never_moves_card() {
    let mgr = board_with(&["a"]).await;
    let a = mgr.tasks()[0].id;

    let mut ctl = controller();
    assert!(!ctl.begin(DragSource::CommentPanel(a)));
    ctl.pointer_moved(Position::new(40, 5));
    assert!(ctl.release(Position::new(40, 5)).is_none());
    assert!(!mgr.task(a).unwrap().completed);
}
