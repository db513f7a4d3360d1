use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{Command, PendingKind};
use crate::io::store::KeyValueStore;
use crate::tui::app::{App, Mode};

pub(super) fn handle_subtasks<S: KeyValueStore>(app: &mut App<S>, key: KeyEvent) {
    let Some(task) = app.selected_task() else {
        app.mode = Mode::Navigate;
        return;
    };
    let id = task.id;
    let count = task.subtasks.len();

    match key.code {
        KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('q') => {
            app.mode = Mode::Navigate;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.subtask_cursor = (app.subtask_cursor + 1).min(count.saturating_sub(1));
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.subtask_cursor = app.subtask_cursor.saturating_sub(1);
        }
        KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter => {
            app.dispatch(Command::ToggleSubtask(id, app.subtask_cursor));
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            app.dispatch(Command::DeleteSubtask(id, app.subtask_cursor));
        }
        KeyCode::Char('a') | KeyCode::Char('s') => app.begin_edit(PendingKind::AddSubtask(id), ""),
        _ => {}
    }
}
