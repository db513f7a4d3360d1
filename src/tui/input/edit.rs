use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Command;
use crate::io::store::KeyValueStore;
use crate::model::task::Priority;
use crate::tui::app::{App, Mode};

pub(super) fn handle_edit<S: KeyValueStore>(app: &mut App<S>, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => app.commit_edit(),
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Tab if app.mode == Mode::Compose => {
            let next = app
                .controller
                .state()
                .new_task_priority
                .unwrap_or(Priority::None)
                .cycle();
            let next = (next != Priority::None).then_some(next);
            app.dispatch(Command::SetNewTaskPriority(next));
        }
        KeyCode::Backspace => app.editor.backspace(),
        KeyCode::Delete => app.editor.delete(),
        KeyCode::Left => app.editor.move_left(),
        KeyCode::Right => app.editor.move_right(),
        KeyCode::Home => app.editor.home(),
        KeyCode::End => app.editor.end(),
        KeyCode::Char('a') if ctrl => app.editor.home(),
        KeyCode::Char('e') if ctrl => app.editor.end(),
        KeyCode::Char('u') if ctrl => app.editor.kill_to_start(),
        KeyCode::Char(c) if !ctrl => app.editor.insert_char(c),
        _ => {}
    }
}
