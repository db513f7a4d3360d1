use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{Command, PendingKind};
use crate::io::store::KeyValueStore;
use crate::model::task::Priority;
use crate::tui::app::{App, Mode};

pub(super) fn handle_navigate<S: KeyValueStore>(app: &mut App<S>, key: KeyEvent) {
    // Help overlay intercepts ? and Esc
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.controller.dismiss_notice(),

        // Cursor
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor_to(app.cursor + 1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor_to(app.cursor.saturating_sub(1)),
        KeyCode::Char('g') | KeyCode::Home => app.move_cursor_to(0),
        KeyCode::Char('G') | KeyCode::End => app.move_cursor_to(usize::MAX),

        // List-level
        KeyCode::Char('a') => app.begin_edit(PendingKind::Compose, ""),
        KeyCode::Char('C') => {
            app.dispatch(Command::ClearCompleted);
        }
        KeyCode::Char('t') => {
            app.dispatch(Command::ToggleTheme);
        }

        // Task-level
        _ => {
            let Some(task) = app.selected_task() else {
                return;
            };
            let id = task.id;
            match key.code {
                KeyCode::Char(' ') | KeyCode::Char('x') => {
                    app.dispatch(Command::ToggleComplete(id));
                }
                KeyCode::Char('d') | KeyCode::Delete => {
                    app.dispatch(Command::Delete(id));
                }
                KeyCode::Char('e') => {
                    let text = task.text.clone();
                    app.begin_edit(PendingKind::EditText(id), &text);
                }
                KeyCode::Char('n') => {
                    let notes = task.notes.clone();
                    app.begin_edit(PendingKind::EditNotes(id), &notes);
                }
                KeyCode::Char('s') => app.begin_edit(PendingKind::AddSubtask(id), ""),
                KeyCode::Char(c @ '1'..='3') => {
                    let priority = match c {
                        '1' => Priority::High,
                        '2' => Priority::Medium,
                        _ => Priority::Low,
                    };
                    app.dispatch(Command::SetPriority(id, priority));
                }
                KeyCode::Char('0') => {
                    app.dispatch(Command::SetPriority(id, Priority::None));
                }
                KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                    if !task.subtasks.is_empty() {
                        app.subtask_cursor = 0;
                        app.mode = Mode::Subtasks;
                    }
                }
                KeyCode::Char('m') => app.begin_move(),
                KeyCode::Char('J') => app.nudge(true),
                KeyCode::Char('K') => app.nudge(false),
                _ => {}
            }
        }
    }
}
