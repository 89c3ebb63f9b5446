//! Theme and styling constants for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// Primary foreground color.
pub const FG_PRIMARY: Color = Color::White;

/// Secondary foreground color (dimmed text).
pub const FG_SECONDARY: Color = Color::Gray;

/// Highlight color for focused elements.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Success indicator color.
pub const SUCCESS: Color = Color::Green;

/// Warning banner color.
pub const WARNING: Color = Color::Yellow;

/// Error text color.
pub const ERROR: Color = Color::Red;

/// Border color of a column while a drag hovers over it.
pub const DROP_TARGET: Color = Color::LightMagenta;

/// Title color of the pending column.
pub const PENDING_TITLE: Color = Color::Blue;

/// Title color of the done column.
pub const DONE_TITLE: Color = Color::Green;

/// Title color of the comment panel.
pub const COMMENTS_TITLE: Color = Color::Cyan;

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style (metadata, empty states).
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

/// Bold text style.
#[must_use]
pub fn bold() -> Style {
    Style::default().fg(FG_PRIMARY).add_modifier(Modifier::BOLD)
}

/// Highlighted text style (focused panel borders).
#[must_use]
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Selected item style (in lists).
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Done task text: dimmed and struck through.
#[must_use]
pub fn done_task() -> Style {
    dimmed().add_modifier(Modifier::CROSSED_OUT)
}

/// Border of a column under an active drag.
#[must_use]
pub fn drop_target() -> Style {
    Style::default().fg(DROP_TARGET).add_modifier(Modifier::BOLD)
}

/// Style for the input cursor (bright white, bold).
#[must_use]
pub fn input_cursor() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Style for the status bar background (dark background with white foreground).
#[must_use]
pub fn status_bar_bg() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 50))
}

/// Style for the warning banner in the status bar.
#[must_use]
pub fn warning_banner() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(WARNING)
        .add_modifier(Modifier::BOLD)
}

/// Style for panel titles with a given color (bold).
#[must_use]
pub fn panel_title(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Style for count badges (bold yellow on dark background).
#[must_use]
pub fn count_badge() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .bg(Color::Rgb(30, 30, 50))
        .add_modifier(Modifier::BOLD)
}

/// Style for form error messages.
#[must_use]
pub fn error() -> Style {
    Style::default().fg(ERROR)
}
