//! Comment panel of the selected task.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::theme;
use crate::app::{App, Focus};
use crate::store::TaskStore;

/// Shown when the selected task has no comments.
pub const NO_COMMENTS: &str = "No comments";

/// Render the comment list and draft of the selected task.
///
/// Collapsed panels only show a hint.
pub fn render<S: TaskStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let editing = app.focus == Focus::CommentInput;
    let border_style = if editing {
        theme::highlighted()
    } else {
        theme::normal()
    };
    let block = Block::default()
        .title(Span::styled("Comments", theme::panel_title(theme::COMMENTS_TITLE)))
        .borders(Borders::ALL)
        .border_style(border_style);

    let Some(task) = app.selected_task() else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };
    if !app.comments.is_visible(task.id) {
        let hint = format!("{} comment(s), press c to expand", task.comments.len());
        frame.render_widget(
            Paragraph::new(Span::styled(hint, theme::dimmed())).block(block),
            area,
        );
        return;
    }

    let mut lines: Vec<Line> = if task.comments.is_empty() {
        vec![Line::from(Span::styled(NO_COMMENTS, theme::dimmed()))]
    } else {
        task.comments
            .iter()
            .map(|c| {
                Line::from(vec![
                    Span::styled(c.author.name.as_str(), theme::bold()),
                    Span::raw(": "),
                    Span::raw(c.text.as_str()),
                ])
            })
            .collect()
    };

    let draft = app.comments.get(task.id).map_or("", |p| p.input.as_str());
    let mut input = vec![Span::styled("> ", theme::dimmed()), Span::raw(draft)];
    if editing {
        input.push(Span::styled("_", theme::input_cursor()));
    }
    lines.push(Line::from(input));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
