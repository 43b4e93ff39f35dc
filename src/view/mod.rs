//! TUI rendering and terminal management (impure shell).
//!
//! The event loop is tick-driven: `event::poll` waits up to one tick for
//! input, and every timer lapse drains worker replies, advances the stream
//! coordinator and re-renders. All blocking work (HTTP, reflow) stays on the
//! worker threads; the loop only shuttles messages.

mod log_pane;
mod search_input;
mod status;

pub use log_pane::LogPane;
pub use search_input::SearchBar;
pub use status::StatusLine;

use crate::config::ResolvedConfig;
use crate::model::{RunId, RunPhase};
use crate::reflow::{ReflowReply, ReflowWorker};
use crate::source::{LogSource, WorkerReply, WorkerRequest};
use crate::stream::StreamCoordinator;
use crate::view_state::{ScrollModel, SearchIndex};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during TUI operations.
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations.
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// How long `event::poll` waits before a timer lapse.
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Run lifecycle probes are cheap but still remote; poll them at the same
/// cadence as logs.
const PHASE_INTERVAL: Duration = Duration::from_millis(5000);

/// Width-triggered reflows are throttled to once per second.
const WIDTH_THROTTLE: Duration = Duration::from_secs(1);

/// Search interaction state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    /// No search active.
    Inactive,
    /// Operator is typing a query.
    Typing {
        /// Query text typed so far.
        query: String,
    },
    /// Query accepted; match navigation is live.
    Active,
}

/// What a handled key asks the event loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Keep running.
    Continue,
    /// Leave the application.
    Quit,
}

/// Application state: the stream, its derived view-state, and the search.
///
/// All methods are synchronous state transitions; the event loop owns the
/// clock and the worker channels.
pub struct AppState {
    coordinator: StreamCoordinator,
    scroll: ScrollModel,
    search: SearchIndex,
    search_mode: SearchMode,
    lines: Vec<String>,
    degraded: bool,
    phase: RunPhase,
    wrap_width: usize,
    last_submitted_len: Option<usize>,
    last_submitted_width: Option<usize>,
    next_width_submit: Option<Instant>,
}

impl AppState {
    /// Fresh state for one run-view.
    pub fn new(config: &ResolvedConfig) -> Self {
        let mut scroll = ScrollModel::new(1, config.overscan);
        if !config.follow {
            scroll.set_follow(false, 0);
        }
        Self {
            coordinator: StreamCoordinator::new(Duration::from_millis(config.poll_interval_ms)),
            scroll,
            search: SearchIndex::new(),
            search_mode: SearchMode::Inactive,
            lines: Vec::new(),
            degraded: false,
            phase: RunPhase::Unknown,
            wrap_width: 0,
            last_submitted_len: None,
            last_submitted_width: None,
            next_width_submit: None,
        }
    }

    /// The stream coordinator.
    pub fn coordinator(&self) -> &StreamCoordinator {
        &self.coordinator
    }

    /// Mutable stream coordinator (event loop plumbing).
    pub fn coordinator_mut(&mut self) -> &mut StreamCoordinator {
        &mut self.coordinator
    }

    /// Wrapped lines currently rendered.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether reflow degraded to a newline-only split.
    pub fn degraded(&self) -> bool {
        self.degraded
    }

    /// Latest known run phase.
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Record a lifecycle probe result.
    pub fn set_phase(&mut self, phase: RunPhase) {
        self.phase = phase;
    }

    /// Scroll state of the log pane.
    pub fn scroll(&self) -> &ScrollModel {
        &self.scroll
    }

    /// Search state.
    pub fn search(&self) -> &SearchIndex {
        &self.search
    }

    /// Current search interaction mode.
    pub fn search_mode(&self) -> &SearchMode {
        &self.search_mode
    }

    /// Whether the search bar occupies screen space.
    pub fn search_bar_visible(&self) -> bool {
        self.search_mode != SearchMode::Inactive
    }

    /// Adopt the terminal geometry for this frame.
    ///
    /// `width`/`height` are the full terminal size; the log pane loses two
    /// columns and two rows to its borders, one row to the status line and
    /// three to the search bar when visible.
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.wrap_width = usize::from(width).saturating_sub(2);
        let search_rows: u16 = if self.search_bar_visible() { 3 } else { 0 };
        let pane_height = height.saturating_sub(1 + search_rows).saturating_sub(2);
        self.scroll
            .set_container_height(usize::from(pane_height), self.lines.len());
    }

    /// Decide whether a reflow submission is due.
    ///
    /// Text-length changes submit immediately; width changes are throttled.
    /// Marks the returned snapshot as submitted.
    pub fn reflow_due(&mut self, now: Instant) -> Option<(Arc<str>, usize)> {
        let text = self.coordinator.buffer_mut().concatenated();
        let len_changed = self.last_submitted_len != Some(text.len());
        let width_changed = self.last_submitted_width != Some(self.wrap_width);

        let due = if len_changed {
            true
        } else if width_changed {
            match self.next_width_submit {
                Some(at) => now >= at,
                None => true,
            }
        } else {
            false
        };
        if !due {
            return None;
        }
        if width_changed && !len_changed {
            self.next_width_submit = Some(now + WIDTH_THROTTLE);
        }
        self.last_submitted_len = Some(text.len());
        self.last_submitted_width = Some(self.wrap_width);
        Some((text, self.wrap_width))
    }

    /// Adopt a finished reflow pass.
    pub fn apply_reflow(&mut self, reply: ReflowReply) {
        self.lines = reply.lines;
        self.degraded = reply.degraded;
        self.scroll.on_row_count_changed(self.lines.len());
        if self.search_mode == SearchMode::Active {
            // The line set changed under the query: rebuild from scratch.
            let query = self.search.query().to_string();
            self.search = SearchIndex::build(&query, &self.lines);
        }
    }

    /// Handle one key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }
        if let SearchMode::Typing { query } = &mut self.search_mode {
            match key.code {
                KeyCode::Esc => {
                    self.search.clear();
                    self.search_mode = SearchMode::Inactive;
                }
                KeyCode::Enter => {
                    self.search = SearchIndex::build(query, &self.lines);
                    self.search_mode = SearchMode::Active;
                    self.center_current_match();
                }
                KeyCode::Backspace => {
                    query.pop();
                }
                KeyCode::Char(c) => query.push(c),
                _ => {}
            }
            return KeyOutcome::Continue;
        }

        let row_count = self.lines.len();
        let page = self.scroll.viewport().container_height as isize;
        match key.code {
            KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Esc => {
                if self.search_mode == SearchMode::Active {
                    self.search.clear();
                    self.search_mode = SearchMode::Inactive;
                } else {
                    return KeyOutcome::Quit;
                }
            }
            KeyCode::Char('/') => {
                self.search_mode = SearchMode::Typing {
                    query: String::new(),
                };
            }
            KeyCode::Char('f') => self.scroll.set_follow(true, row_count),
            KeyCode::Char('n') => {
                if self.search_mode == SearchMode::Active {
                    self.search.next();
                    self.center_current_match();
                }
            }
            KeyCode::Char('N') => {
                if self.search_mode == SearchMode::Active {
                    self.search.previous();
                    self.center_current_match();
                }
            }
            KeyCode::Up => self.scroll.scroll_by(-1, row_count),
            KeyCode::Down => self.scroll.scroll_by(1, row_count),
            KeyCode::PageUp => self.scroll.scroll_by(-page, row_count),
            KeyCode::PageDown => self.scroll.scroll_by(page, row_count),
            KeyCode::Home => self.scroll.scroll_to_top(),
            KeyCode::End => self.scroll.scroll_to_bottom(row_count),
            _ => {}
        }
        KeyOutcome::Continue
    }

    /// Begin streaming with a search query pre-armed (`--search`).
    pub fn arm_search(&mut self, query: String) {
        self.search = SearchIndex::build(&query, &self.lines);
        self.search_mode = SearchMode::Active;
    }

    fn center_current_match(&mut self) {
        if let Some(found) = self.search.current() {
            self.scroll.center_on_row(found.line_index, self.lines.len());
        }
    }
}

/// Main TUI application.
///
/// Generic over backend to support testing with `TestBackend`.
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    state: AppState,
    fetch: crate::source::FetchWorker,
    reflow: ReflowWorker,
    run: RunId,
    next_phase_poll: Instant,
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Wire up the workers and start the stream for `run`.
    pub fn new(
        terminal: Terminal<B>,
        source: Box<dyn LogSource>,
        run: RunId,
        config: &ResolvedConfig,
    ) -> Self {
        let mut state = AppState::new(config);
        let fetch = crate::source::FetchWorker::spawn(source);
        let reflow = ReflowWorker::spawn();

        // The run's phase is unknown until the first probe answers; start
        // polling as if it were live and let the probe flip the terminal bit.
        let now = Instant::now();
        let first = state.coordinator_mut().start(run.clone(), false, now);
        fetch.submit(WorkerRequest::Logs(first));
        fetch.submit(WorkerRequest::Phase {
            epoch: state.coordinator().epoch(),
            run: run.clone(),
        });

        Self {
            terminal,
            state,
            fetch,
            reflow,
            run,
            next_phase_poll: now + PHASE_INTERVAL,
        }
    }

    /// State access for integration tests.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Terminal access for integration tests (buffer inspection with
    /// `TestBackend`).
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Run the event loop until quit.
    pub fn run(&mut self) -> Result<(), TuiError> {
        loop {
            if event::poll(TICK_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.state.handle_key(key) == KeyOutcome::Quit {
                            return Ok(());
                        }
                    }
                    Event::Resize(..) => {}
                    _ => {}
                }
            } else {
                self.on_timer(Instant::now());
            }
            self.render()?;
        }
    }

    /// One timer lapse: drain workers, advance the poll schedule.
    pub fn on_timer(&mut self, now: Instant) {
        self.drain_fetch_replies();

        let terminal_phase = self.state.phase().is_terminal();
        if let Some(request) = self.state.coordinator_mut().on_tick(now) {
            self.fetch.submit(WorkerRequest::Logs(request));
        }

        if !terminal_phase
            && now >= self.next_phase_poll
            && !self.state.coordinator().status().is_terminal()
        {
            self.fetch.submit(WorkerRequest::Phase {
                epoch: self.state.coordinator().epoch(),
                run: self.run.clone(),
            });
            self.next_phase_poll = now + PHASE_INTERVAL;
        }

        if let Some((text, width)) = self.state.reflow_due(now) {
            self.reflow.submit(text, width);
        }
        if let Some(reply) = self.reflow.try_recv() {
            self.state.apply_reflow(reply);
        }
    }

    fn drain_fetch_replies(&mut self) {
        while let Some(reply) = self.fetch.try_recv() {
            match reply {
                WorkerReply::Logs(reply) => {
                    let terminal_phase = self.state.phase().is_terminal();
                    if let Some(refetch) =
                        self.state.coordinator_mut().on_reply(reply, terminal_phase)
                    {
                        self.fetch.submit(WorkerRequest::Logs(refetch));
                    }
                }
                WorkerReply::Phase(reply) => {
                    if reply.epoch != self.state.coordinator().epoch() {
                        continue;
                    }
                    match reply.outcome {
                        Ok(phase) => self.state.set_phase(phase),
                        Err(err) => warn!(%err, "run phase probe failed"),
                    }
                }
            }
        }
    }

    /// Draw one frame.
    pub fn render(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        self.state.set_viewport(size.width, size.height);

        let state = &self.state;
        let run = &self.run;
        self.terminal.draw(|frame| {
            let area = frame.area();
            let search_rows: u16 = if state.search_bar_visible() { 3 } else { 0 };
            let pane = Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height.saturating_sub(1 + search_rows),
            };
            frame.render_widget(LogPane::new(state), pane);

            if search_rows > 0 {
                let search = Rect {
                    x: area.x,
                    y: pane.y + pane.height,
                    width: area.width,
                    height: search_rows.min(area.height.saturating_sub(pane.height)),
                };
                frame.render_widget(SearchBar::new(state), search);
            }

            if area.height > 0 {
                let status = Rect {
                    x: area.x,
                    y: area.y + area.height - 1,
                    width: area.width,
                    height: 1,
                };
                frame.render_widget(StatusLine::new(state, run), status);
            }
        })?;
        Ok(())
    }
}

/// Restores the terminal on drop so every exit path releases raw mode.
struct TerminalGuard;

impl TerminalGuard {
    fn acquire() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        io::stdout().execute(EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = io::stdout().execute(LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Set up the terminal and run the viewer until quit.
pub fn run_with_source(
    source: Box<dyn LogSource>,
    run: RunId,
    initial_search: Option<String>,
    config: &ResolvedConfig,
) -> Result<(), TuiError> {
    let guard = TerminalGuard::acquire()?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    let mut app: TuiApp<CrosstermBackend<Stdout>> = TuiApp::new(terminal, source, run, config);
    if let Some(query) = initial_search {
        app.state.arm_search(query);
    }
    let result = app.run();
    drop(guard);
    result
}

// ===== Tests =====

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod app_state_tests;
