//! Per-task comment panel state.
//!
//! Panels are view state only: whether a task's comments are expanded and
//! what has been typed so far. Nothing here is persisted; submitted text
//! goes to [`BoardManager::add_comment`](crate::board::BoardManager::add_comment).

use std::collections::HashMap;

use taskboard_proto::task::TaskId;

/// Comment panel of one task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPanel {
    /// Whether the comment list is expanded.
    pub visible: bool,
    /// Draft comment.
    pub input: String,
}

impl CommentPanel {
    /// Expands or collapses the panel.
    pub const fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Appends a character to the draft.
    pub fn insert_char(&mut self, c: char) {
        self.input.push(c);
    }

    /// Removes the last character of the draft.
    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Takes the trimmed draft for submission.
    ///
    /// A blank draft is kept as typed and `None` is returned.
    pub fn submit(&mut self) -> Option<String> {
        let text = self.input.trim();
        if text.is_empty() {
            return None;
        }
        let text = text.to_string();
        self.input.clear();
        Some(text)
    }
}

/// Comment panels keyed by task.
#[derive(Debug, Clone, Default)]
pub struct CommentPanels {
    panels: HashMap<TaskId, CommentPanel>,
}

impl CommentPanels {
    /// The panel of `id`, if it was ever touched.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&CommentPanel> {
        self.panels.get(&id)
    }

    /// The panel of `id`, created collapsed and empty on first use.
    pub fn panel_mut(&mut self, id: TaskId) -> &mut CommentPanel {
        self.panels.entry(id).or_default()
    }

    /// Whether the panel of `id` is expanded.
    #[must_use]
    pub fn is_visible(&self, id: TaskId) -> bool {
        self.get(id).is_some_and(|p| p.visible)
    }

    /// Drops panels of tasks that no longer exist.
    pub fn retain(&mut self, mut exists: impl FnMut(TaskId) -> bool) {
        self.panels.retain(|id, _| exists(*id));
    }

    /// Drops every panel.
    pub fn clear(&mut self) {
        self.panels.clear();
    }
}
