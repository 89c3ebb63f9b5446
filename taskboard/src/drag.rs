//! Moving tasks between columns by dragging.
//!
//! Each column is a [`DropZone`] covering a screen rectangle. A gesture
//! starts on a task card, highlights whichever zone the pointer is over,
//! and ends with a drop that yields a [`MoveRequest`] for the board
//! manager. [`DragController`] runs the whole gesture for both the mouse
//! and the keyboard, so either input path reaches the same transition.

use ratatui::layout::{Position, Rect};

use taskboard_proto::drag::{DragPayload, DropEffect};
use taskboard_proto::task::{Column, TaskId};

/// Where a drag gesture started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    /// A task card; draggable.
    Card(TaskId),
    /// The comment panel nested inside a card. Drags here must not move
    /// the card.
    CommentPanel(TaskId),
}

/// Starts a move gesture from `source`.
///
/// Returns the payload for card drags and `None` for the comment panel.
#[must_use]
pub fn begin_move(source: DragSource) -> Option<DragPayload> {
    match source {
        DragSource::Card(id) => Some(DragPayload::for_task(id)),
        DragSource::CommentPanel(id) => {
            tracing::trace!(%id, "drag from comment panel suppressed");
            None
        }
    }
}

/// A decoded drop: move `task_id` into `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    /// Dragged task.
    pub task_id: TaskId,
    /// Column it was dropped on.
    pub target: Column,
}

/// A column acting as a drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropZone {
    /// Column a drop here moves tasks into.
    pub column: Column,
    /// Screen area of the column.
    pub area: Rect,
    /// Whether a drag is hovering over the zone.
    pub highlighted: bool,
}

impl DropZone {
    /// A zone with no area yet.
    #[must_use]
    pub const fn new(column: Column) -> Self {
        Self {
            column,
            area: Rect::ZERO,
            highlighted: false,
        }
    }

    /// Whether `pointer` lies inside the zone.
    #[must_use]
    pub fn contains(&self, pointer: Position) -> bool {
        self.area.contains(pointer)
    }

    /// The pointer entered or moved over the zone: accept the drop.
    pub const fn drag_over(&mut self) -> DropEffect {
        self.highlighted = true;
        DropEffect::Move
    }

    /// The pointer left the zone or one of its children.
    ///
    /// Highlighting is only cleared when the pointer is really outside the
    /// zone; leaving a child row while staying inside keeps it. An unknown
    /// pointer counts as outside.
    pub fn drag_leave(&mut self, pointer: Option<Position>) {
        if pointer.is_some_and(|p| self.contains(p)) {
            return;
        }
        self.highlighted = false;
    }

    /// Something was dropped on the zone.
    ///
    /// Always clears highlighting. Returns the move to apply when the
    /// payload names a task.
    pub fn drop(&mut self, payload: &DragPayload) -> Option<MoveRequest> {
        self.highlighted = false;
        let Some(task_id) = payload.task_id() else {
            tracing::debug!(data = %payload.data, "drop payload is not a task id");
            return None;
        };
        Some(MoveRequest {
            task_id,
            target: self.column,
        })
    }
}

/// Tracks an in-flight drag across the two column zones.
#[derive(Debug, Clone)]
pub struct DragController {
    zones: [DropZone; 2],
    payload: Option<DragPayload>,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    /// A controller with empty zones and no gesture.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            zones: [DropZone::new(Column::Pending), DropZone::new(Column::Done)],
            payload: None,
        }
    }

    const fn index(column: Column) -> usize {
        match column {
            Column::Pending => 0,
            Column::Done => 1,
        }
    }

    /// The zone of `column`.
    #[must_use]
    pub const fn zone(&self, column: Column) -> &DropZone {
        &self.zones[Self::index(column)]
    }

    /// Updates a zone's screen area after a redraw.
    pub const fn set_area(&mut self, column: Column, area: Rect) {
        self.zones[Self::index(column)].area = area;
    }

    /// Whether a gesture is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.payload.is_some()
    }

    /// The task being dragged, if the payload names one.
    #[must_use]
    pub fn dragged(&self) -> Option<TaskId> {
        self.payload.as_ref().and_then(DragPayload::task_id)
    }

    /// Starts a gesture from `source`. Returns whether a drag began.
    pub fn begin(&mut self, source: DragSource) -> bool {
        self.payload = begin_move(source);
        self.is_dragging()
    }

    /// Starts a gesture from an externally supplied payload.
    pub fn begin_with(&mut self, payload: DragPayload) {
        self.payload = Some(payload);
    }

    /// The pointer moved to `pointer` during a gesture.
    pub fn pointer_moved(&mut self, pointer: Position) {
        if !self.is_dragging() {
            return;
        }
        for zone in &mut self.zones {
            if zone.contains(pointer) {
                zone.drag_over();
            } else if zone.highlighted {
                zone.drag_leave(Some(pointer));
            }
        }
    }

    /// The pointer was released at `pointer`, ending the gesture.
    pub fn release(&mut self, pointer: Position) -> Option<MoveRequest> {
        let payload = self.payload.take()?;
        let mut request = None;
        for zone in &mut self.zones {
            if zone.contains(pointer) {
                request = zone.drop(&payload);
            } else {
                zone.drag_leave(Some(pointer));
            }
        }
        request
    }

    /// Ends the gesture by dropping on `target`, as the keyboard does.
    pub fn complete(&mut self, target: Column) -> Option<MoveRequest> {
        let payload = self.payload.take()?;
        for zone in &mut self.zones {
            zone.drag_leave(None);
        }
        self.zones[Self::index(target)].drop(&payload)
    }

    /// Abandons the gesture and clears highlighting.
    pub fn cancel(&mut self) {
        self.payload = None;
        for zone in &mut self.zones {
            zone.drag_leave(None);
        }
    }
}
