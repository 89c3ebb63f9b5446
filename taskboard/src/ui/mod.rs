//! Terminal UI rendering.

pub mod board_panel;
pub mod comment_panel;
pub mod layout;
pub mod login_panel;
pub mod status_bar;
pub mod theme;

use ratatui::Frame;

use crate::app::{App, Screen};
use crate::store::TaskStore;
use layout::BoardLayout;

/// Main draw function for the entire UI.
///
/// Takes the app mutably so list scroll offsets survive between frames.
pub fn draw<S: TaskStore>(frame: &mut Frame, app: &mut App<S>) {
    let area = frame.area();
    match app.screen {
        Screen::Login => login_panel::render(frame, area, app),
        Screen::Board => {
            let layout = BoardLayout::compute(area);
            board_panel::render_input(frame, layout.input, app);
            board_panel::render_columns(frame, &layout, app);
            comment_panel::render(frame, layout.comments, app);
            status_bar::render(frame, layout.status, app);
        }
    }
}
