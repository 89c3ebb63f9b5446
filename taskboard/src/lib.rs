//! `taskboard`: terminal task board library.

pub mod app;
pub mod board;
pub mod comments;
pub mod config;
pub mod drag;
pub mod identity;
pub mod store;
pub mod ui;
