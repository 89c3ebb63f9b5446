//! Sign-in and registration screen.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, LoginField, LoginMode};
use crate::store::TaskStore;

fn field_line<'a>(label: &'a str, value: &'a str, active: bool) -> Line<'a> {
    let label_style = if active {
        theme::highlighted()
    } else {
        theme::dimmed()
    };
    let mut spans = vec![
        Span::styled(format!("{label:>6}: "), label_style),
        Span::raw(value),
    ];
    if active {
        spans.push(Span::styled("_", theme::input_cursor()));
    }
    Line::from(spans)
}

/// Render the login form, centred, with the known users listed below.
pub fn render<S: TaskStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let form = &app.login;
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Fill(1),
        ])
        .split(area);
    let centre = |r: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(50),
                Constraint::Fill(1),
            ])
            .split(r)[1]
    };

    let (title, help) = match form.mode {
        LoginMode::SignIn => ("Sign in", "Enter: sign in | Ctrl+R: register | Esc: quit"),
        LoginMode::Register => (
            "Register",
            "Enter: register | Tab: next field | Ctrl+R: sign in | Esc: quit",
        ),
    };

    let mut lines = vec![field_line(
        "Email",
        &form.email,
        form.field == LoginField::Email,
    )];
    if form.mode == LoginMode::Register {
        lines.push(field_line("Name", &form.name, form.field == LoginField::Name));
    }
    lines.push(Line::raw(""));
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(error.as_str(), theme::error())));
    }
    lines.push(Line::from(Span::styled(help, theme::dimmed())));

    let block = Block::default()
        .title(Span::styled(title, theme::bold()))
        .borders(Borders::ALL)
        .border_style(theme::highlighted());
    frame.render_widget(Paragraph::new(lines).block(block), centre(vertical[1]));

    let users: Vec<Line> = app
        .profiles()
        .into_iter()
        .map(|p| Line::from(Span::styled(format!("{} <{}>", p.name, p.email), theme::dimmed())))
        .collect();
    let block = Block::default().title("Users").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(users).block(block), centre(vertical[2]));
}
