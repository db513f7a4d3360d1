pub mod detail_view;
pub mod header;
pub mod help_overlay;
mod helpers;
pub mod list_view;
pub mod status_row;

#[cfg(test)]
pub(crate) mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::io::store::KeyValueStore;

use super::app::App;

/// Below this width the detail pane is hidden
const DETAIL_MIN_WIDTH: u16 = 60;

/// Draw the whole screen: header, list (plus details when wide), status row
pub fn render<S: KeyValueStore>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title + clock, separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);

    if chunks[1].width >= DETAIL_MIN_WIDTH {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(chunks[1]);
        list_view::render_list_view(frame, app, panes[0]);
        detail_view::render_detail_view(frame, app, panes[1]);
    } else {
        list_view::render_list_view(frame, app, chunks[1]);
    }

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, frame.area());
    }

    status_row::render_status_row(frame, app, chunks[2]);
}
