//! Movie browser TUI main loop.

/// Browser state types.
pub mod state;
mod tasks;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tracing::instrument;
use wtmdb_api::tmdb::TmdbApi;

use self::state::{BrowserState, Command, FetchMessage, Focus, Move};
use self::tasks::TaskSlots;
use crate::debounce::DEFAULT_DEBOUNCE;
use crate::sort::SortMode;

/// Startup options for [`run_browser`].
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Query typed into the search bar at startup.
    pub initial_query: String,
    /// Initial sort mode.
    pub sort: SortMode,
    /// Quiet period before a typed query is searched.
    pub debounce: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            initial_query: String::new(),
            sort: SortMode::default(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Runs the movie browser until the user quits.
///
/// Must be called inside a tokio runtime; fetches run as spawned tasks.
///
/// # Errors
///
/// Returns an error if terminal setup, drawing, or event handling fails.
#[instrument(skip_all)]
pub async fn run_browser<C>(client: Arc<C>, options: BrowserOptions) -> Result<()>
where
    C: TmdbApi + Send + Sync + 'static,
{
    enable_raw_mode().context("failed to enable raw mode")?;
    let result = run_session(client, options).await;

    // Both steps run even if the session or the other step failed.
    let raw_mode = disable_raw_mode().context("failed to disable raw mode");
    let screen = crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen");
    combine_teardown(result, [raw_mode, screen])
}

/// Enters the alternate screen and runs the event loop until quit.
async fn run_session<C>(client: Arc<C>, options: BrowserOptions) -> Result<()>
where
    C: TmdbApi + Send + Sync + 'static,
{
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let (tx, rx) = mpsc::unbounded_channel();
    let mut tasks = TaskSlots::new(client, tx);
    let mut state = BrowserState::new(&options.initial_query, options.sort, options.debounce);

    let result = run_event_loop(&mut terminal, &mut state, &mut tasks, rx).await;
    tasks.shutdown();
    result
}

/// Merges the session outcome with teardown results.
///
/// The session error wins; the first teardown error is returned otherwise.
/// Teardown errors that cannot be returned are logged.
fn combine_teardown(result: Result<()>, steps: [Result<()>; 2]) -> Result<()> {
    steps.into_iter().fold(result, |acc, step| match (acc, step) {
        (Ok(()), step) => step,
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(later)) => {
            tracing::error!(error = %format!("{later:#}"), "terminal teardown failed");
            Err(e)
        }
    })
}

/// Main event loop.
async fn run_event_loop<C>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    tasks: &mut TaskSlots<C>,
    mut rx: mpsc::UnboundedReceiver<FetchMessage>,
) -> Result<()>
where
    C: TmdbApi + Send + Sync + 'static,
{
    let mut events = EventStream::new();
    let commands = state.start();
    if execute(state, tasks, commands) {
        return Ok(());
    }

    loop {
        let mut columns = 1;
        terminal
            .draw(|frame| {
                columns = ui::draw(frame, state);
            })
            .context("failed to draw TUI")?;
        state.set_grid_columns(columns);

        let deadline = state.debounce_deadline();
        let commands = tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    handle_key(state, key, Instant::now())
                }
                // Resize and other events only need a redraw.
                Some(Ok(_)) => Vec::new(),
                Some(Err(e)) => return Err(e).context("failed to read terminal event"),
                None => vec![Command::Quit],
            },
            Some(message) = rx.recv() => {
                state.apply(message);
                Vec::new()
            }
            () = debounce_elapsed(deadline) => state.tick(Instant::now()),
        };

        if execute(state, tasks, commands) {
            return Ok(());
        }
    }
}

/// Resolves at `deadline`, or never when nothing is pending.
async fn debounce_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending().await,
    }
}

/// Runs `commands`. Returns `true` when the browser should quit.
fn execute<C>(state: &mut BrowserState, tasks: &mut TaskSlots<C>, commands: Vec<Command>) -> bool
where
    C: TmdbApi + Send + Sync + 'static,
{
    for command in commands {
        match command {
            Command::FetchCatalog { id, request } => tasks.spawn_catalog(id, request),
            Command::FetchDetails { id, movie_id } => tasks.spawn_details(id, movie_id),
            Command::CancelDetails => tasks.cancel_details(),
            Command::OpenLink { kind, url } => {
                if let Err(e) = open::that_detached(&url) {
                    tracing::warn!(%url, error = %e, "failed to open link");
                    state.link_failed(kind);
                }
            }
            Command::Quit => return true,
        }
    }
    false
}

/// Routes a key press to the dialog, the search input, or the main screen.
fn handle_key(state: &mut BrowserState, key: KeyEvent, now: Instant) -> Vec<Command> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return vec![Command::Quit];
    }
    if state.is_dialog_open() {
        return handle_dialog_input(state, key.code);
    }
    if state.focus() == Focus::SearchInput {
        return handle_search_input(state, key.code, now);
    }
    handle_normal_input(state, key.code, now)
}

/// Handles key input while the detail dialog is open.
fn handle_dialog_input(state: &mut BrowserState, key: KeyCode) -> Vec<Command> {
    match key {
        KeyCode::Esc | KeyCode::Char('q') => return state.close_details(),
        KeyCode::Tab => state.dialog_tab(false),
        KeyCode::BackTab => state.dialog_tab(true),
        KeyCode::Enter | KeyCode::Char(' ') => return state.activate_dialog(),
        _ => {}
    }
    Vec::new()
}

/// Handles key input in the search field.
fn handle_search_input(state: &mut BrowserState, key: KeyCode, now: Instant) -> Vec<Command> {
    match key {
        KeyCode::Enter => return state.submit(now),
        KeyCode::Backspace => state.input_backspace(now),
        KeyCode::Char(c) => state.input_char(c, now),
        KeyCode::Tab => state.focus_next(false),
        KeyCode::BackTab => state.focus_next(true),
        KeyCode::Esc | KeyCode::Down => {
            if state.movie_count() > 0 {
                state.set_focus(Focus::Results);
            }
        }
        _ => {}
    }
    Vec::new()
}

/// Handles key input on the buttons, sort selector, and card grid.
fn handle_normal_input(state: &mut BrowserState, key: KeyCode, now: Instant) -> Vec<Command> {
    let focus = state.focus();
    match key {
        KeyCode::Char('q') => return vec![Command::Quit],
        KeyCode::Tab => state.focus_next(false),
        KeyCode::BackTab => state.focus_next(true),
        KeyCode::Char('/') => state.set_focus(Focus::SearchInput),
        KeyCode::Char('s') => state.cycle_sort(false),
        KeyCode::Char('S') => state.cycle_sort(true),
        KeyCode::Char('m') => return state.load_more(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            return match focus {
                Focus::SearchButton => state.submit(now),
                Focus::ClearButton => state.clear(now),
                Focus::Results => state.open_selected(),
                Focus::LoadMore => state.load_more(),
                Focus::SortSelect => {
                    state.cycle_sort(false);
                    Vec::new()
                }
                Focus::SearchInput => Vec::new(),
            };
        }
        KeyCode::Left | KeyCode::Char('h') => match focus {
            Focus::SortSelect => state.cycle_sort(true),
            Focus::Results => state.move_cursor(Move::Left),
            _ => {}
        },
        KeyCode::Right | KeyCode::Char('l') => match focus {
            Focus::SortSelect => state.cycle_sort(false),
            Focus::Results => state.move_cursor(Move::Right),
            _ => {}
        },
        KeyCode::Up | KeyCode::Char('k') if focus == Focus::Results => {
            state.move_cursor(Move::Up);
        }
        KeyCode::Down | KeyCode::Char('j') if focus == Focus::Results => {
            state.move_cursor(Move::Down);
        }
        _ => {}
    }
    Vec::new()
}
