//! Payload carried by a drag gesture.
//!
//! A drag carries exactly one value: the dragged task's id encoded as
//! decimal text. Decoding is lenient about surrounding whitespace and
//! strict about everything else, so a foreign payload never maps to a
//! real task.

use serde::{Deserialize, Serialize};

use crate::task::TaskId;

/// Effect a drag source allows, or a drop target accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropEffect {
    /// The drop is rejected.
    None,
    /// The dragged item moves to the target.
    Move,
}

/// Data attached to an in-flight drag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    /// Plain-text payload.
    pub data: String,
    /// Effect allowed by the source.
    pub effect_allowed: DropEffect,
}

impl DragPayload {
    /// Builds the payload for dragging a task card.
    #[must_use]
    pub fn for_task(id: TaskId) -> Self {
        Self {
            data: encode(id),
            effect_allowed: DropEffect::Move,
        }
    }

    /// Wraps arbitrary text, as received from an external drag source.
    pub fn from_text(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            effect_allowed: DropEffect::Move,
        }
    }

    /// Decodes the dragged task id, if the payload holds one.
    #[must_use]
    pub fn task_id(&self) -> Option<TaskId> {
        decode(&self.data)
    }
}

/// Encodes a task id as drag payload text.
#[must_use]
pub fn encode(id: TaskId) -> String {
    id.to_string()
}

/// Decodes drag payload text into a task id.
///
/// Empty or non-integer text yields `None`.
#[must_use]
pub fn decode(data: &str) -> Option<TaskId> {
    data.parse().ok()
}
