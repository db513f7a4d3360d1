mod edit;
mod move_mode;
mod navigate;
mod subtasks;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::io::store::KeyValueStore;

use super::app::{App, Mode};

/// Handle a key event in the current mode
pub fn handle_key<S: KeyValueStore>(app: &mut App<S>, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Ctrl-C quits from anywhere; an open edit is dropped
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        if app.mode.is_editing() {
            app.cancel_edit();
        }
        app.should_quit = true;
        return;
    }

    let key = normalize_key(key);
    match app.mode {
        Mode::Navigate => navigate::handle_navigate(app, key),
        Mode::Compose | Mode::EditText | Mode::EditNotes | Mode::AddSubtask => {
            edit::handle_edit(app, key)
        }
        Mode::Subtasks => subtasks::handle_subtasks(app, key),
        Mode::Move => move_mode::handle_move(app, key),
    }
}

/// Handle a bracketed paste event. Only active while a line editor is open.
pub fn handle_paste<S: KeyValueStore>(app: &mut App<S>, text: &str) {
    if app.mode.is_editing() && !text.is_empty() {
        app.editor.insert_str(text);
    }
}

/// Terminals report Shift+letter inconsistently; fold to the uppercase char
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
        && c.is_ascii_lowercase()
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
    }
    key
}
