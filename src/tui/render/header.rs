use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::store::KeyValueStore;
use crate::ops::{clock, summary};
use crate::tui::app::App;
use crate::util::unicode;

/// Title line with the remaining-count title on the left and the clock on
/// the right, then a separator
pub fn render_header<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let title = format!(" {}", summary::title(app.controller.tasks()));
    let date = clock::format_date(&app.now);
    let time = clock::format_time(&app.now, app.ui.clock_24h);
    let right = format!("{}  {} ", date, time);

    let title_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let mut spans = vec![Span::styled(title.clone(), title_style)];

    // Drop the date first, then the whole clock, when space runs out
    let used = unicode::display_width(&title);
    let clock_text = if used + unicode::display_width(&right) < width {
        right
    } else {
        format!("{} ", time)
    };
    let clock_width = unicode::display_width(&clock_text);
    if used + clock_width < width {
        spans.push(Span::styled(
            " ".repeat(width - used - clock_width),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(
            clock_text,
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    let separator = Span::styled(
        "\u{2500}".repeat(width),
        Style::default().fg(app.theme.dim).bg(bg),
    );

    let paragraph =
        Paragraph::new(vec![Line::from(spans), Line::from(separator)]).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
