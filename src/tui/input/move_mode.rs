use crossterm::event::{KeyCode, KeyEvent};

use crate::io::store::KeyValueStore;
use crate::ops::reorder::DropPosition;
use crate::tui::app::App;

pub(super) fn handle_move<S: KeyValueStore>(app: &mut App<S>, key: KeyEvent) {
    let len = app.task_count();
    let Some(ms) = app.move_state.as_mut() else {
        app.cancel_move();
        return;
    };

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            ms.target = (ms.target + 1).min(len.saturating_sub(1));
        }
        KeyCode::Char('k') | KeyCode::Up => ms.target = ms.target.saturating_sub(1),
        KeyCode::Char('g') | KeyCode::Home => ms.target = 0,
        KeyCode::Char('G') | KeyCode::End => ms.target = len.saturating_sub(1),
        KeyCode::Enter | KeyCode::Char('m') => app.drop_move(None),
        KeyCode::Char('[') => app.drop_move(Some(DropPosition::Above)),
        KeyCode::Char(']') => app.drop_move(Some(DropPosition::Below)),
        KeyCode::Esc => app.cancel_move(),
        _ => {}
    }
}
