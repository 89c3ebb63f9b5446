//! Application state and event handling.
//!
//! Input handling is split in two. `handle_key_event` and
//! `handle_mouse_event` only touch view state and return an [`Action`];
//! [`App::dispatch`] then runs the action against the board manager and
//! the identity provider. Keyboard and mouse moves both end up as
//! [`Action::Move`].

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::widgets::ListState;
use tokio::sync::mpsc;

use taskboard_proto::profile::NewProfile;
use taskboard_proto::task::{Column, Task, TaskId};

use crate::board::{BoardError, BoardManager, BoardWarning};
use crate::comments::CommentPanels;
use crate::drag::{DragController, DragSource, MoveRequest};
use crate::identity::{Credentials, IdentityProvider};
use crate::store::TaskStore;
use crate::ui::layout::BoardLayout;

/// Which screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Sign-in / registration form.
    Login,
    /// The task board.
    Board,
}

/// Which board panel has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// New-task input (default).
    TaskInput,
    /// A task column.
    Column(Column),
    /// Draft comment of the selected task.
    CommentInput,
}

/// Whether the login form signs in or registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    /// Sign in by email or user id.
    SignIn,
    /// Create a new user.
    Register,
}

/// Field of the login form being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    /// Email (or id when signing in).
    Email,
    /// Display name (registration only).
    Name,
}

/// Login / registration form state.
#[derive(Debug, Clone)]
pub struct LoginForm {
    /// Sign in or register.
    pub mode: LoginMode,
    /// Field receiving keystrokes.
    pub field: LoginField,
    /// Email or user id.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Last identity error, shown under the form.
    pub error: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            mode: LoginMode::SignIn,
            field: LoginField::Email,
            email: String::new(),
            name: String::new(),
            error: None,
        }
    }
}

impl LoginForm {
    const fn input_mut(&mut self) -> &mut String {
        match self.field {
            LoginField::Email => &mut self.email,
            LoginField::Name => &mut self.name,
        }
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            LoginMode::SignIn => LoginMode::Register,
            LoginMode::Register => LoginMode::SignIn,
        };
        self.field = LoginField::Email;
        self.error = None;
    }

    fn submit(&self) -> Action {
        match self.mode {
            LoginMode::SignIn => Action::Login(Credentials::new(self.email.trim())),
            LoginMode::Register => Action::Register(NewProfile {
                name: self.name.clone(),
                email: self.email.clone(),
            }),
        }
    }
}

/// Something the user asked for that needs the board or identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Create a task.
    AddTask(String),
    /// Flip a task's column.
    Toggle(TaskId),
    /// Delete a task.
    Delete(TaskId),
    /// Apply a drop.
    Move(MoveRequest),
    /// Comment on a task.
    AddComment {
        /// Target task.
        task_id: TaskId,
        /// Comment text.
        text: String,
    },
    /// Re-run the last failed store operation.
    Retry,
    /// Sign in.
    Login(Credentials),
    /// Register and sign in.
    Register(NewProfile),
    /// Sign out.
    Logout,
}

/// Main application state.
pub struct App<S: TaskStore> {
    /// Board of the signed-in user.
    pub board: BoardManager<S>,
    identity: Arc<dyn IdentityProvider>,
    warnings: mpsc::Receiver<BoardWarning>,
    /// Current screen.
    pub screen: Screen,
    /// Focused board panel.
    pub focus: Focus,
    /// New-task draft.
    pub task_input: String,
    /// Selected row per column, indexed like [`Column::ALL`].
    pub selected: [usize; 2],
    /// Scroll state per column as of the last frame. Mouse rows are
    /// offset by it.
    pub list_states: [ListState; 2],
    /// Last focused column; its selected task owns the comment panel.
    pub comment_column: Column,
    /// Comment panels per task.
    pub comments: CommentPanels,
    /// In-flight drag gesture.
    pub drag: DragController,
    /// Login screen state.
    pub login: LoginForm,
    /// Latest store warning, shown until a retry or reload succeeds.
    pub banner: Option<BoardWarning>,
    /// Format of the last-sync time.
    pub time_format: String,
    /// Geometry of the last drawn frame.
    pub layout: Option<BoardLayout>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

pub(crate) const fn column_index(column: Column) -> usize {
    match column {
        Column::Pending => 0,
        Column::Done => 1,
    }
}

impl<S: TaskStore> App<S> {
    /// Create the application around a board manager and its warning
    /// receiver.
    #[must_use]
    pub fn new(
        board: BoardManager<S>,
        warnings: mpsc::Receiver<BoardWarning>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let screen = if board.identity().is_some() {
            Screen::Board
        } else {
            Screen::Login
        };
        Self {
            board,
            identity,
            warnings,
            screen,
            focus: Focus::TaskInput,
            task_input: String::new(),
            selected: [0, 0],
            list_states: Default::default(),
            comment_column: Column::Pending,
            comments: CommentPanels::default(),
            drag: DragController::new(),
            login: LoginForm::default(),
            banner: None,
            time_format: "%H:%M".to_string(),
            layout: None,
            should_quit: false,
        }
    }

    /// Set the last-sync time format.
    #[must_use]
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    /// Known profiles, for the login screen.
    #[must_use]
    pub fn profiles(&self) -> Vec<taskboard_proto::profile::Profile> {
        self.identity.profiles()
    }

    /// Tasks of `column`, in display order.
    #[must_use]
    pub fn column_tasks(&self, column: Column) -> Vec<&Task> {
        self.board.partition().column(column).to_vec()
    }

    /// The task under the cursor of the focused column, or of the last
    /// focused column while editing a comment.
    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        let column = match self.focus {
            Focus::Column(column) => column,
            Focus::TaskInput | Focus::CommentInput => self.comment_column,
        };
        self.column_tasks(column)
            .get(self.selected[column_index(column)])
            .copied()
    }

    /// Record the frame geometry and update the drop zones.
    pub fn set_viewport(&mut self, area: Rect) {
        let layout = BoardLayout::compute(area);
        for column in Column::ALL {
            self.drag.set_area(column, layout.column(column));
        }
        self.layout = Some(layout);
    }

    /// Handle a key event.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }
        match self.screen {
            Screen::Login => self.handle_login_key(key),
            Screen::Board => self.handle_board_key(key),
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) -> Option<Action> {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => self.should_quit = true,
            (KeyCode::Char('r'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.login.toggle_mode();
            }
            (KeyCode::Tab | KeyCode::BackTab, _) if self.login.mode == LoginMode::Register => {
                self.login.field = match self.login.field {
                    LoginField::Email => LoginField::Name,
                    LoginField::Name => LoginField::Email,
                };
            }
            (KeyCode::Enter, _) => return Some(self.login.submit()),
            (KeyCode::Backspace, _) => {
                self.login.input_mut().pop();
            }
            (KeyCode::Char(c), _) => self.login.input_mut().push(c),
            _ => {}
        }
        None
    }

    fn handle_board_key(&mut self, key: KeyEvent) -> Option<Action> {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) if self.focus == Focus::CommentInput => {
                self.focus = Focus::Column(self.comment_column);
                return None;
            }
            (KeyCode::Esc, _) => {
                if self.drag.is_dragging() {
                    self.drag.cancel();
                } else {
                    self.should_quit = true;
                }
                return None;
            }
            (KeyCode::Char('l'), m) if m.contains(KeyModifiers::CONTROL) => {
                return Some(Action::Logout);
            }
            (KeyCode::Char('r'), m) if m.contains(KeyModifiers::CONTROL) => {
                return Some(Action::Retry);
            }
            (KeyCode::BackTab, _) => {
                self.cycle_focus_backward();
                return None;
            }
            (KeyCode::Tab, _) => {
                self.cycle_focus_forward();
                return None;
            }
            _ => {}
        }

        match self.focus {
            Focus::TaskInput => self.handle_task_input_key(key),
            Focus::Column(column) => self.handle_column_key(column, key),
            Focus::CommentInput => self.handle_comment_input_key(key),
        }
    }

    fn handle_task_input_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter => {
                if self.task_input.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.task_input);
                return Some(Action::AddTask(text));
            }
            KeyCode::Char(c) => self.task_input.push(c),
            KeyCode::Backspace => {
                self.task_input.pop();
            }
            _ => {}
        }
        None
    }

    fn handle_column_key(&mut self, column: Column, key: KeyEvent) -> Option<Action> {
        let len = self.column_tasks(column).len();
        let index = column_index(column);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected[index] = self.selected[index].saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected[index] + 1 < len {
                    self.selected[index] += 1;
                }
                None
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.selected_task().map(|t| Action::Toggle(t.id)),
            KeyCode::Char('d') | KeyCode::Delete => self.selected_task().map(|t| Action::Delete(t.id)),
            KeyCode::Char('m') => {
                let id = self.selected_task()?.id;
                self.drag.begin(DragSource::Card(id));
                self.drag.complete(column.other()).map(Action::Move)
            }
            KeyCode::Char('c') => {
                let id = self.selected_task()?.id;
                self.comments.panel_mut(id).toggle();
                None
            }
            KeyCode::Char('i') => {
                let id = self.selected_task()?.id;
                let panel = self.comments.panel_mut(id);
                panel.visible = true;
                self.comment_column = column;
                self.focus = Focus::CommentInput;
                None
            }
            KeyCode::Char('r') => Some(Action::Retry),
            _ => None,
        }
    }

    fn handle_comment_input_key(&mut self, key: KeyEvent) -> Option<Action> {
        let task_id = self.selected_task()?.id;
        let panel = self.comments.panel_mut(task_id);
        match key.code {
            KeyCode::Enter => {
                let text = panel.submit()?;
                return Some(Action::AddComment { task_id, text });
            }
            KeyCode::Char(c) => panel.insert_char(c),
            KeyCode::Backspace => panel.backspace(),
            _ => {}
        }
        None
    }

    /// Handle a mouse event: press on a card, drag, release over a column.
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Option<Action> {
        if self.screen != Screen::Board {
            return None;
        }
        let layout = self.layout?;
        let pointer = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((column, visible_row)) = layout.row_at(pointer) {
                    let row = visible_row + self.list_states[column_index(column)].offset();
                    let id = self.column_tasks(column).get(row)?.id;
                    self.focus = Focus::Column(column);
                    self.comment_column = column;
                    self.selected[column_index(column)] = row;
                    self.drag.begin(DragSource::Card(id));
                } else if layout.comments.contains(pointer) {
                    let id = self.selected_task()?.id;
                    self.drag.begin(DragSource::CommentPanel(id));
                }
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.drag.pointer_moved(pointer);
                None
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag.release(pointer).map(Action::Move),
            _ => None,
        }
    }

    /// Run `action` and fold the outcome into view state.
    pub async fn dispatch(&mut self, action: Action) {
        match action {
            Action::Login(credentials) => match self.identity.login(&credentials) {
                Ok(_) => self.login = LoginForm::default(),
                Err(e) => self.login.error = Some(e.to_string()),
            },
            Action::Register(profile) => match self.identity.register(profile) {
                Ok(_) => self.login = LoginForm::default(),
                Err(e) => self.login.error = Some(e.to_string()),
            },
            Action::Logout => {
                if let Err(e) = self.identity.logout() {
                    tracing::warn!(error = %e, "logout failed");
                }
            }
            Action::AddTask(text) => {
                let result = self.board.add_task(&text).await;
                Self::log_rejection(result);
            }
            Action::Toggle(id) => {
                let result = self.board.toggle_task(id).await;
                Self::log_rejection(result);
            }
            Action::Delete(id) => {
                let result = self.board.delete_task(id).await;
                Self::log_rejection(result);
            }
            Action::Move(request) => {
                let result = self
                    .board
                    .move_task(request.task_id, request.target.completed())
                    .await;
                Self::log_rejection(result);
            }
            Action::AddComment { task_id, text } => {
                let result = self.board.add_comment(task_id, &text).await;
                Self::log_rejection(result);
            }
            Action::Retry => {
                let result = self.board.retry().await;
                Self::log_rejection(result);
            }
        }
        self.tick().await;
    }

    /// Pick up identity changes and store warnings.
    pub async fn tick(&mut self) {
        if self.board.refresh_identity().await {
            self.comments.clear();
            self.selected = [0, 0];
            self.list_states = Default::default();
            self.focus = Focus::TaskInput;
            self.banner = None;
        }
        self.screen = if self.board.identity().is_some() {
            Screen::Board
        } else {
            Screen::Login
        };

        while let Ok(warning) = self.warnings.try_recv() {
            self.banner = Some(warning);
        }
        if self.board.pending_retry().is_none() {
            self.banner = None;
        }

        let board = &self.board;
        self.comments.retain(|id| board.task(id).is_some());
        for column in Column::ALL {
            let len = board.partition().column(column).len();
            let cursor = &mut self.selected[column_index(column)];
            *cursor = (*cursor).min(len.saturating_sub(1));
        }
    }

    fn log_rejection(result: Result<(), BoardError>) {
        match result {
            Ok(()) => {}
            Err(e) if e.is_rejection() => tracing::debug!(error = %e, "action rejected"),
            // Failures already reached the warning channel.
            Err(_) => {}
        }
    }

    const fn cycle_focus_forward(&mut self) {
        self.focus = match self.focus {
            Focus::TaskInput => Focus::Column(Column::Pending),
            Focus::Column(Column::Pending) => Focus::Column(Column::Done),
            Focus::Column(Column::Done) | Focus::CommentInput => Focus::TaskInput,
        };
        if let Focus::Column(column) = self.focus {
            self.comment_column = column;
        }
    }

    const fn cycle_focus_backward(&mut self) {
        self.focus = match self.focus {
            Focus::TaskInput => Focus::Column(Column::Done),
            Focus::Column(Column::Done) => Focus::Column(Column::Pending),
            Focus::Column(Column::Pending) | Focus::CommentInput => Focus::TaskInput,
        };
        if let Focus::Column(column) = self.focus {
            self.comment_column = column;
        }
    }
}
