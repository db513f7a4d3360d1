use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::app::{Command, Controller, PendingKind, PendingToken};
use crate::io::store::KeyValueStore;
use crate::io::watcher::StoreWatcher;
use crate::model::config::{AppConfig, UiConfig};
use crate::model::preferences::ThemePreference;
use crate::model::task::{Task, TaskId};
use crate::ops::reorder::{self, DropPosition};
use crate::ops::task_ops::Outcome;
use crate::util::line_editor::LineEditor;

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new task on the compose line
    Compose,
    EditText,
    EditNotes,
    AddSubtask,
    /// Cursor is inside the selected task's subtask list
    Subtasks,
    /// Picking a drop target for the selected task
    Move,
}

impl Mode {
    /// Modes that hold a line editor and a pending token
    pub fn is_editing(self) -> bool {
        matches!(
            self,
            Mode::Compose | Mode::EditText | Mode::EditNotes | Mode::AddSubtask
        )
    }
}

/// Drag-in-progress: the task being moved and the row it would drop onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveState {
    pub source: TaskId,
    pub target: usize,
}

impl MoveState {
    /// Drop position implied by the target's side of the source
    pub fn natural_position(&self, source_index: usize) -> DropPosition {
        if self.target < source_index {
            DropPosition::Above
        } else {
            DropPosition::Below
        }
    }
}

/// TUI state wrapped around the controller
pub struct App<S: KeyValueStore> {
    pub controller: Controller<S>,
    pub ui: UiConfig,
    pub theme: Theme,
    theme_pref: ThemePreference,
    pub mode: Mode,
    /// Display index of the highlighted task
    pub cursor: usize,
    /// Id under the cursor; the cursor follows it across re-sorts
    pub selected: Option<TaskId>,
    pub subtask_cursor: usize,
    pub editor: LineEditor,
    edit_token: Option<PendingToken>,
    /// Mode to return to when the current edit closes
    return_mode: Mode,
    pub move_state: Option<MoveState>,
    pub show_help: bool,
    pub should_quit: bool,
    /// Wall-clock time shown in the header
    pub now: NaiveDateTime,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(controller: Controller<S>, config: &AppConfig) -> Self {
        let theme_pref = controller.state().theme;
        let mut app = App {
            theme: Theme::new(theme_pref, &config.ui),
            ui: config.ui.clone(),
            theme_pref,
            controller,
            mode: Mode::Navigate,
            cursor: 0,
            selected: None,
            subtask_cursor: 0,
            editor: LineEditor::default(),
            edit_token: None,
            return_mode: Mode::Navigate,
            move_state: None,
            show_help: false,
            should_quit: false,
            now: chrono::Local::now().naive_local(),
        };
        app.selected = app.controller.resolve(0);
        app
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|id| self.controller.tasks().get(id))
    }

    pub fn task_count(&self) -> usize {
        self.controller.tasks().len()
    }

    // -----------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------

    /// Run a command now and bring the view up to date
    pub fn dispatch(&mut self, cmd: Command) -> Outcome {
        let outcome = self.controller.dispatch(cmd);
        self.after_change();
        outcome
    }

    /// Drain anything queued (reloads from the watcher) and resync the view
    pub fn pump(&mut self) {
        self.controller.drain();
        self.after_change();
    }

    fn after_change(&mut self) {
        if !self.controller.take_render() {
            return;
        }
        let pref = self.controller.state().theme;
        if pref != self.theme_pref {
            self.theme_pref = pref;
            self.theme = Theme::new(pref, &self.ui);
        }
        self.sync_cursor();
    }

    /// Keep the cursor on the selected task; if it is gone, stay at the same
    /// row (clamped) and select whatever is there now
    pub fn sync_cursor(&mut self) {
        let tasks = self.controller.tasks();
        match self.selected.and_then(|id| tasks.display_index_of(id)) {
            Some(idx) => self.cursor = idx,
            None => {
                self.cursor = self.cursor.min(tasks.len().saturating_sub(1));
                self.selected = tasks.id_at(self.cursor);
            }
        }
        let subtasks = self.selected_task().map_or(0, |t| t.subtasks.len());
        self.subtask_cursor = self.subtask_cursor.min(subtasks.saturating_sub(1));
        if self.mode == Mode::Subtasks && subtasks == 0 {
            self.mode = Mode::Navigate;
        }
        if let Some(ms) = self.move_state
            && tasks.display_index_of(ms.source).is_none()
        {
            self.move_state = None;
            self.mode = Mode::Navigate;
        }
    }

    pub fn move_cursor_to(&mut self, index: usize) {
        let len = self.task_count();
        if len == 0 {
            return;
        }
        self.cursor = index.min(len - 1);
        self.selected = self.controller.resolve(self.cursor);
        self.subtask_cursor = 0;
    }

    // -----------------------------------------------------------------
    // Line editing
    // -----------------------------------------------------------------

    /// Open an editor for `kind`, prefilled with `initial`. Reloads from disk
    /// wait until the edit closes.
    pub fn begin_edit(&mut self, kind: PendingKind, initial: &str) {
        if let Some(stale) = self.edit_token.take() {
            self.controller.finish(stale);
        }
        self.return_mode = if self.mode.is_editing() {
            self.return_mode
        } else {
            self.mode
        };
        self.editor = LineEditor::with_text(initial);
        self.edit_token = Some(self.controller.begin(kind));
        self.mode = match kind {
            PendingKind::Compose => Mode::Compose,
            PendingKind::EditText(_) => Mode::EditText,
            PendingKind::EditNotes(_) => Mode::EditNotes,
            PendingKind::AddSubtask(_) => Mode::AddSubtask,
        };
    }

    /// Apply the editor's text and close the edit
    pub fn commit_edit(&mut self) {
        let Some(token) = self.edit_token.take() else {
            self.mode = Mode::Navigate;
            return;
        };
        let text = self.editor.take();
        let kind = token.kind();
        let cmd = match kind {
            PendingKind::Compose => Command::Add {
                text,
                priority: None,
            },
            PendingKind::EditText(id) => Command::EditText(id, text),
            PendingKind::EditNotes(id) => Command::SetNotes(id, text),
            PendingKind::AddSubtask(id) => Command::AddSubtask(id, text),
        };
        self.controller.enqueue(cmd);
        self.controller.finish(token);
        self.mode = self.return_mode;
        let outcome = self.controller.drain().into_iter().next();

        match (kind, outcome) {
            (PendingKind::Compose, Some(Outcome::Added(id))) => {
                self.selected = Some(id);
                self.mode = Mode::Navigate;
            }
            (PendingKind::AddSubtask(id), Some(Outcome::Changed)) => {
                self.selected = Some(id);
                let count = self.controller.tasks().get(id).map_or(0, |t| t.subtasks.len());
                self.subtask_cursor = count.saturating_sub(1);
                self.mode = Mode::Subtasks;
            }
            _ => {}
        }
        self.after_change();
    }

    /// Drop the editor's text and close the edit
    pub fn cancel_edit(&mut self) {
        if let Some(token) = self.edit_token.take() {
            if token.kind() == PendingKind::Compose {
                self.controller.enqueue(Command::SetNewTaskPriority(None));
            }
            self.controller.finish(token);
        }
        self.editor.clear();
        self.mode = self.return_mode;
        self.pump();
    }

    // -----------------------------------------------------------------
    // Move mode
    // -----------------------------------------------------------------

    pub fn begin_move(&mut self) {
        if let Some(source) = self.selected {
            self.move_state = Some(MoveState {
                source,
                target: self.cursor,
            });
            self.mode = Mode::Move;
        }
    }

    /// Drop the moving task on the current target. `None` uses the side the
    /// target is on relative to the source.
    pub fn drop_move(&mut self, position: Option<DropPosition>) {
        let Some(ms) = self.move_state.take() else {
            self.mode = Mode::Navigate;
            return;
        };
        self.mode = Mode::Navigate;
        let tasks = self.controller.tasks();
        let (Some(source_index), Some(target)) =
            (tasks.display_index_of(ms.source), tasks.id_at(ms.target))
        else {
            return;
        };
        let position = position.unwrap_or_else(|| ms.natural_position(source_index));
        self.selected = Some(ms.source);
        self.dispatch(Command::Move {
            source: ms.source,
            target,
            position,
        });
    }

    pub fn cancel_move(&mut self) {
        self.move_state = None;
        self.mode = Mode::Navigate;
    }

    /// Where the moving task would land if dropped now, as a display index
    pub fn move_preview(&self) -> Option<usize> {
        let ms = self.move_state?;
        let tasks = self.controller.tasks();
        let source = tasks.display_index_of(ms.source)?;
        reorder::resolve_drop(
            tasks.len(),
            source,
            ms.target,
            ms.natural_position(source),
        )
    }

    /// Move the selected task one row up or down in a single step
    pub fn nudge(&mut self, down: bool) {
        let Some(source) = self.selected else {
            return;
        };
        let target_index = if down {
            self.cursor + 1
        } else {
            match self.cursor.checked_sub(1) {
                Some(i) => i,
                None => return,
            }
        };
        let Some(target) = self.controller.resolve(target_index) else {
            return;
        };
        let position = if down {
            DropPosition::Below
        } else {
            DropPosition::Above
        };
        self.dispatch(Command::Move {
            source,
            target,
            position,
        });
    }

    /// Advance the header clock and expire the notice
    pub fn tick(&mut self, now: Instant, wall: NaiveDateTime) {
        self.now = wall;
        self.controller.expire_notice(now);
        self.after_change();
    }
}

// ---------------------------------------------------------------------------
// Terminal loop
// ---------------------------------------------------------------------------

pub fn run<S: KeyValueStore>(
    controller: Controller<S>,
    config: &AppConfig,
    store_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(controller, config);

    let watcher = match StoreWatcher::start(store_path) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "store watcher unavailable, external changes will not show");
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop<S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
    watcher: Option<&StoreWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }

        if watcher.and_then(StoreWatcher::poll).is_some() {
            app.controller.request_reload();
        }
        app.pump();
        app.tick(Instant::now(), chrono::Local::now().naive_local());
    }
    Ok(())
}
