//! `taskboard`: terminal task board.
//!
//! Signs a user in, then shows their tasks in a pending and a done column.
//! Configuration via CLI flags, environment variables, or config file
//! (`~/.config/taskboard/config.toml`).
//!
//! ```bash
//! # Default SQLite store under the local data directory
//! cargo run --bin taskboard
//!
//! # Throwaway in-memory board
//! cargo run --bin taskboard -- --backend memory
//!
//! # JSON mirror in a custom directory, patching instead of refetching
//! TASKBOARD_DATA_DIR=/tmp/board cargo run -- --backend local --sync-policy patch
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_appender::non_blocking::WorkerGuard;

use taskboard::app::App;
use taskboard::board::BoardManager;
use taskboard::config::{CliArgs, ClientConfig, StoreBackend};
use taskboard::identity::{IdentityProvider, LocalIdentityProvider};
use taskboard::store::{InMemoryStore, LocalMirrorStore, SqliteStore, TaskStore};
use taskboard::ui;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(backend = ?config.backend, data_dir = %config.data_dir.display(), "taskboard starting");

    let identity: Arc<dyn IdentityProvider> = match config.backend {
        StoreBackend::Memory => Arc::new(LocalIdentityProvider::in_memory()),
        StoreBackend::Local | StoreBackend::Sqlite => Arc::new(
            LocalIdentityProvider::open_in(&config.data_dir).map_err(io::Error::other)?,
        ),
    };

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app against the configured store.
    let result = match config.backend {
        StoreBackend::Memory => run_app(&mut terminal, InMemoryStore::new(), identity, &config).await,
        StoreBackend::Local => match LocalMirrorStore::open_in(&config.data_dir) {
            Ok(store) => run_app(&mut terminal, store, identity, &config).await,
            Err(e) => Err(io::Error::other(e)),
        },
        StoreBackend::Sqlite => match SqliteStore::open_in(&config.data_dir) {
            Ok(store) => run_app(&mut terminal, store, identity, &config).await,
            Err(e) => Err(io::Error::other(e)),
        },
    };

    // Restore terminal.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    tracing::info!("taskboard exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the terminal).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskboard.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
///
/// Each store operation is awaited before the next input is read, so
/// mutations never overlap.
async fn run_app<S: TaskStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    store: S,
    identity: Arc<dyn IdentityProvider>,
    config: &ClientConfig,
) -> io::Result<()> {
    let (mut board, warnings) = BoardManager::new(store, identity.subscribe(), config.board);
    // Failures surface as a banner through the warning channel.
    let _ = board.load().await;
    let mut app = App::new(board, warnings, identity).with_time_format(&config.time_format);

    loop {
        // Step 1: Draw the UI frame and remember its geometry for mouse hits.
        let frame = terminal.draw(|frame| ui::draw(frame, &mut app))?;
        app.set_viewport(frame.area);

        // Step 2: Pick up identity changes and store warnings.
        app.tick().await;

        // Step 3: Poll for terminal input events.
        if event::poll(config.poll_timeout)? {
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key_event(key),
                Event::Mouse(mouse) => app.handle_mouse_event(mouse),
                _ => None,
            };
            if let Some(action) = action {
                app.dispatch(action).await;
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
