//! TUI rendering and terminal management (impure shell)

mod layout;
mod styles;

pub use layout::{
    render_frame, rows_capacity, split_frame, ColumnSpan, FrameContext, StatusMessage,
    TableLayout, COLUMN_SPACING,
};
pub use styles::{ColorConfig, TableStyles};

use crate::model::{AppError, ListError, Position, RowId};
use crate::state::SortableList;
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Application error
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    list: SortableList,
    styles: TableStyles,
    /// Keyboard cursor (row index).
    cursor: usize,
    /// First visible row.
    scroll: usize,
    message: Option<StatusMessage>,
    /// Layout of the last rendered frame (for mouse hit-testing)
    last_layout: Option<TableLayout>,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen, mouse capture and
    /// focus reporting
    pub fn new(list: SortableList) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(event::EnableMouseCapture)?;
        stdout.execute(event::EnableFocusChange)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self::with_terminal(terminal, list))
    }

    /// Run the main event loop
    ///
    /// Returns when user quits (q or Ctrl+C). Redraws after every event.
    pub fn run(&mut self) -> Result<(), TuiError> {
        const POLL_INTERVAL: Duration = Duration::from_millis(250);

        self.draw()?;

        loop {
            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            if self.handle_event(event::read()?) {
                return Ok(());
            }
            self.draw()?;
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    fn with_terminal(terminal: Terminal<B>, list: SortableList) -> Self {
        Self {
            terminal,
            list,
            styles: TableStyles::new(),
            cursor: 0,
            scroll: 0,
            message: None,
            last_layout: None,
        }
    }

    /// The model.
    pub fn list(&self) -> &SortableList {
        &self.list
    }

    /// Consume the app and hand the model back.
    pub fn into_list(self) -> SortableList {
        self.list
    }

    /// Dispatch one terminal event
    ///
    /// Returns true if app should quit
    fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => return self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                debug!(width, height, "terminal resized");
            }
            Event::FocusLost => {
                let result = self.list.on_drag_cancelled();
                self.report(result);
            }
            _ => {}
        }
        false
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        self.message = None;
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                let result = self.list.on_drag_cancelled();
                self.report(result);
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = usize::from(c as u8 - b'1');
                self.sort_by_column_index(index);
            }
            KeyCode::Char('r') => {
                let result = self.list.restore_manual_order();
                if self.report(result).is_some() {
                    self.message = Some(StatusMessage::Info("manual order restored".into()));
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-1),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.list.len().saturating_sub(1),
            KeyCode::Char('J') => self.move_cursor_row(1),
            KeyCode::Char('K') => self.move_cursor_row(-1),
            KeyCode::Char('d') | KeyCode::Delete => self.remove_cursor_row(),
            _ => {}
        }
        false
    }

    /// Handle a single mouse event
    ///
    /// Left press on the header sorts; on a row it starts a drag. Drag and
    /// release follow the gesture. The wheel moves the cursor.
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let pos = Position::new(mouse.column, mouse.row);
        let Some(layout) = self.last_layout.take() else {
            return;
        };

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.message = None;
                if let Some(column) = layout.column_at(pos) {
                    let result = self.list.on_header_click(column).map(|_| ());
                    self.report(result);
                } else {
                    let result = self.list.on_pointer_down(pos, &layout);
                    if self.report(result) == Some(true) {
                        self.follow_dragged_row();
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let result = self.list.on_pointer_move(pos, &layout);
                self.report(result);
                self.follow_dragged_row();
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let dragged = self.dragged_id();
                let result = self.list.on_pointer_up(pos, &layout);
                if let Some(Some(_)) = self.report(result) {
                    if let Some(index) = dragged.and_then(|id| self.list.store().index_of(&id)) {
                        self.cursor = index;
                    }
                }
            }
            MouseEventKind::ScrollDown => self.move_cursor(1),
            MouseEventKind::ScrollUp => self.move_cursor(-1),
            _ => {}
        }

        self.last_layout = Some(layout);
    }

    /// Render the current frame, keeping the cursor on screen.
    fn draw(&mut self) -> Result<(), TuiError> {
        self.clamp_cursor();

        let size = self.terminal.size()?;
        let (table_area, _) = split_frame(ratatui::layout::Rect::new(0, 0, size.width, size.height));
        let visible = usize::from(rows_capacity(table_area.height)).max(1);
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + visible {
            self.scroll = self.cursor + 1 - visible;
        }

        let ctx = FrameContext {
            list: &self.list,
            cursor: (!self.list.is_empty()).then_some(self.cursor),
            scroll: self.scroll,
            message: self.message.as_ref(),
            styles: &self.styles,
        };
        let mut rendered = None;
        self.terminal.draw(|frame| {
            rendered = Some(render_frame(frame, &ctx));
        })?;
        self.last_layout = rendered;
        Ok(())
    }

    fn sort_by_column_index(&mut self, index: usize) {
        let Some(column) = self.list.store().columns().get(index).map(|c| c.name.clone()) else {
            return;
        };
        let cursor_id = self.cursor_id();
        let result = self.list.on_header_click(&column).map(|_| ());
        if self.report(result).is_some() {
            self.keep_cursor_on(cursor_id);
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let last = self.list.len().saturating_sub(1);
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    /// Keyboard reorder: swap the cursor row one step and keep the cursor on it.
    fn move_cursor_row(&mut self, delta: isize) {
        let Some(id) = self.cursor_id() else {
            return;
        };
        let target = self.cursor.saturating_add_signed(delta);
        let result = self.list.move_row(&id, target);
        if let Some(index) = self.report(result) {
            self.cursor = index;
        }
    }

    fn remove_cursor_row(&mut self) {
        let Some(id) = self.cursor_id() else {
            return;
        };
        let result = self.list.remove_row(&id);
        if let Some(row) = self.report(result) {
            info!(id = %row.id(), "row removed");
            self.message = Some(StatusMessage::Info(format!("removed {}", row.id())));
            self.clamp_cursor();
        }
    }

    fn cursor_id(&self) -> Option<RowId> {
        self.list
            .store()
            .row_at_index(self.cursor)
            .map(|r| r.id().clone())
    }

    fn dragged_id(&self) -> Option<RowId> {
        self.list.drag_session().map(|s| s.dragged_row_id.clone())
    }

    fn follow_dragged_row(&mut self) {
        let index = self
            .list
            .drag_session()
            .and_then(|s| self.list.store().index_of(&s.dragged_row_id));
        if let Some(index) = index {
            self.cursor = index;
        }
    }

    fn keep_cursor_on(&mut self, id: Option<RowId>) {
        if let Some(index) = id.and_then(|id| self.list.store().index_of(&id)) {
            self.cursor = index;
        }
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.list.len().saturating_sub(1));
    }

    /// Log a model error and show it; stale references are dropped quietly.
    fn report<T>(&mut self, result: Result<T, ListError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) if err.is_benign() => {
                debug!(error = %err, "stale row reference ignored");
                None
            }
            Err(err) => {
                error!(error = %err, "list model rejected an event");
                self.message = Some(StatusMessage::Error(err.to_string()));
                None
            }
        }
    }
}

// ===== Test Helpers =====

#[cfg(test)]
impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Create TuiApp for testing without touching the real terminal.
    pub(crate) fn new_for_test(terminal: Terminal<B>, list: SortableList) -> Self {
        let mut app = Self::with_terminal(terminal, list);
        app.styles = TableStyles::with_color_config(ColorConfig::new(false));
        app
    }

    pub(crate) fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

/// Initialize and run the TUI application
///
/// Handles terminal setup, runs the event loop, and restores the terminal on
/// exit. Logging must be initialized by the caller. Returns the model so the
/// caller can inspect the final order.
pub fn run(list: SortableList) -> Result<SortableList, TuiError> {
    let mut app = setup_or_restore(|| TuiApp::new(list), restore_terminal)?;

    let result = app.run();

    // Always restore terminal state
    restore_terminal()?;

    result.map(|()| app.into_list())
}

/// Run `setup`; if it fails part way, run `restore` before returning the
/// setup error.
fn setup_or_restore<T>(
    setup: impl FnOnce() -> Result<T, TuiError>,
    restore: impl FnOnce() -> Result<(), TuiError>,
) -> Result<T, TuiError> {
    setup().map_err(|err| {
        if let Err(restore_err) = restore() {
            error!(error = %restore_err, "failed to restore terminal");
        }
        err
    })
}

/// Restore terminal to normal state
///
/// Disables raw mode, focus reporting and mouse capture, and leaves the
/// alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(event::DisableFocusChange)?;
    io::stdout().execute(event::DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "tui_tests.rs"]
mod tests;
