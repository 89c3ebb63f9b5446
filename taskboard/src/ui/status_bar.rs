//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, Focus};
use crate::store::TaskStore;

/// Format an epoch-millisecond timestamp with a chrono format string.
#[must_use]
pub fn format_timestamp_ms(ms: u64, format: &str) -> String {
    use chrono::{Local, TimeZone};
    let secs = i64::try_from(ms / 1000).unwrap_or(i64::MAX);
    let nsecs = u32::try_from((ms % 1000) * 1_000_000).unwrap_or(0);
    match Local.timestamp_opt(secs, nsecs) {
        chrono::LocalResult::Single(dt) => dt.format(format).to_string(),
        _ => "??:??".to_string(),
    }
}

/// Render the status bar at the bottom of the screen.
pub fn render<S: TaskStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    if let Some(warning) = &app.banner {
        let banner = Paragraph::new(format!(" {warning} | Ctrl+R: retry")).style(theme::warning_banner());
        frame.render_widget(banner, area);
        return;
    }

    let help_text = match app.focus {
        Focus::TaskInput => "Enter: add | Tab: switch panel | Ctrl+L: logout | Esc: quit",
        Focus::Column(_) => {
            "jk: navigate | Space: toggle | m: move | d: delete | c: comments | i: comment | Esc: quit"
        }
        Focus::CommentInput => "Enter: post | Esc: back",
    };

    let user = app
        .board
        .identity()
        .map_or_else(|| "signed out".to_string(), |p| p.name.clone());
    let (dot_color, synced) = app.board.last_synced_ms().map_or_else(
        || (theme::WARNING, "not synced".to_string()),
        |ms| {
            (
                theme::SUCCESS,
                format!("synced {}", format_timestamp_ms(ms, &app.time_format)),
            )
        },
    );

    let status_line = Line::from(vec![
        Span::styled("taskboard", theme::bold()),
        Span::raw(" | "),
        Span::raw(user),
        Span::raw(" | "),
        Span::styled("●", theme::normal().fg(dot_color)),
        Span::raw(format!(" {synced}")),
        Span::raw(" | "),
        Span::styled(help_text, theme::dimmed()),
    ]);

    let paragraph = Paragraph::new(status_line).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
