//! Task input line and the two task columns.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use taskboard_proto::task::{Column, Task};

use super::layout::BoardLayout;
use super::theme;
use crate::app::{App, Focus, column_index};
use crate::store::TaskStore;

/// Shown in a column with no tasks.
pub const EMPTY_COLUMN: &str = "No tasks";

/// Render the new-task input line.
pub fn render_input<S: TaskStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let focused = app.focus == Focus::TaskInput;
    let border_style = if focused {
        theme::highlighted()
    } else {
        theme::normal()
    };
    let mut spans = vec![Span::raw(app.task_input.as_str())];
    if focused {
        spans.push(Span::styled("_", theme::input_cursor()));
    }
    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title("New task")
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(input, area);
}

/// Render both columns, updating each column's scroll state.
pub fn render_columns<S: TaskStore>(frame: &mut Frame, layout: &BoardLayout, app: &mut App<S>) {
    for column in Column::ALL {
        let index = column_index(column);
        let mut state = std::mem::take(&mut app.list_states[index]);
        render_column(frame, layout.column(column), column, app, &mut state);
        app.list_states[index] = state;
    }
}

fn task_line(task: &Task) -> Line<'_> {
    let (checkbox, style) = if task.completed {
        ("[✓]", theme::done_task())
    } else {
        ("[ ]", theme::normal())
    };
    Line::from(vec![
        Span::styled(checkbox, style),
        Span::raw(" "),
        Span::styled(task.text.as_str(), style),
        Span::styled(format!("  💬 {}", task.comments.len()), theme::dimmed()),
    ])
}

fn render_column<S: TaskStore>(
    frame: &mut Frame,
    area: Rect,
    column: Column,
    app: &App<S>,
    state: &mut ListState,
) {
    let tasks = app.column_tasks(column);
    let focused = app.focus == Focus::Column(column);
    let zone = app.drag.zone(column);

    let border_style = if zone.highlighted {
        theme::drop_target()
    } else if focused {
        theme::highlighted()
    } else {
        theme::normal()
    };
    let title_color = match column {
        Column::Pending => theme::PENDING_TITLE,
        Column::Done => theme::DONE_TITLE,
    };
    let title = Line::from(vec![
        Span::styled(column.to_string(), theme::panel_title(title_color)),
        Span::raw(" "),
        Span::styled(format!(" {} ", tasks.len()), theme::count_badge()),
    ]);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    if tasks.is_empty() {
        *state = ListState::default();
        let empty = Paragraph::new(Span::styled(EMPTY_COLUMN, theme::dimmed())).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = tasks.iter().map(|t| ListItem::new(task_line(t))).collect();
    let mut list = List::new(items).block(block);
    if focused {
        list = list.highlight_style(theme::selected());
    }
    // Selection is kept while unfocused so the scroll position holds.
    state.select(Some(app.selected[column_index(column)]));
    frame.render_stateful_widget(list, area, state);
}
