//! Shared data model for `taskboard`: tasks, comments, profiles, and the
//! payload carried by a drag gesture between columns.

pub mod comment;
pub mod drag;
pub mod profile;
pub mod task;
