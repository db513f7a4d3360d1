use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::io::store::KeyValueStore;
use crate::model::task::Priority;
use crate::tui::app::{App, Mode};

use super::helpers::checkbox;

/// Notes and subtasks of the selected task
pub fn render_detail_view<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let base = Style::default().bg(bg);
    let header_style = base.fg(theme.text_bright).add_modifier(Modifier::BOLD);
    let dim = base.fg(theme.dim);

    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(dim)
        .title(Span::styled(" Details ", dim))
        .style(base);

    let Some(task) = app.selected_task() else {
        let paragraph = Paragraph::new(Line::from(Span::styled(" No task selected", dim))).block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(format!(" {}", task.text), header_style)));
    let mut facts = Vec::new();
    if task.priority != Priority::None {
        facts.push(Span::styled(
            format!(" {} priority", task.priority),
            base.fg(theme.priority_color(task.priority)),
        ));
    }
    if task.completed {
        facts.push(Span::styled(" done", dim));
    }
    if !facts.is_empty() {
        lines.push(Line::from(facts));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Notes", header_style)));
    if task.notes.is_empty() {
        lines.push(Line::from(Span::styled(" (none)", dim)));
    } else {
        for note_line in task.notes.lines() {
            lines.push(Line::from(Span::styled(
                format!(" {}", note_line),
                base.fg(theme.text),
            )));
        }
    }
    lines.push(Line::from(""));

    let (done, total) = task.subtask_progress();
    let heading = if total == 0 {
        " Subtasks".to_string()
    } else {
        format!(" Subtasks {}/{}", done, total)
    };
    lines.push(Line::from(Span::styled(heading, header_style)));
    if total == 0 {
        lines.push(Line::from(Span::styled(" (none)", dim)));
    }
    let in_subtasks = app.mode == Mode::Subtasks;
    for (i, sub) in task.subtasks.iter().enumerate() {
        let focused = in_subtasks && i == app.subtask_cursor;
        let row = if focused {
            base.bg(theme.selection_bg)
        } else {
            base
        };
        let text_style = if sub.completed {
            row.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
        } else {
            row.fg(theme.text)
        };
        lines.push(Line::from(vec![
            Span::styled(
                if focused { "\u{25B8}" } else { " " },
                row.fg(theme.highlight),
            ),
            Span::styled(checkbox(sub.completed), row.fg(theme.dim)),
            Span::styled(" ", row),
            Span::styled(sub.text.as_str(), text_style),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
