use chrono::NaiveDate;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::app::{Command, Controller};
use crate::io::store::MemoryStore;
use crate::model::config::AppConfig;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// App over an in-memory store with the given tasks added in order, the
/// clock pinned to Sunday, October 18, 2026 09:05.
pub fn app_with(texts: &[&str]) -> App<MemoryStore> {
    let config = AppConfig::default();
    let mut controller = Controller::new(MemoryStore::new(), &config);
    for t in texts {
        controller.dispatch(Command::Add {
            text: t.to_string(),
            priority: None,
        });
    }
    let mut app = App::new(controller, &config);
    app.now = NaiveDate::from_ymd_opt(2026, 10, 18)
        .and_then(|d| d.and_hms_opt(9, 5, 0))
        .unwrap();
    app
}
