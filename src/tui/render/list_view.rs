use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::store::KeyValueStore;
use crate::model::task::Task;
use crate::ops::reorder::DropPosition;
use crate::tui::app::{App, Mode};
use crate::util::unicode;

use super::helpers::{checkbox, priority_symbol, spans_width};

/// Render the display-ordered task list
pub fn render_list_view<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let height = area.height as usize;
    let tasks = app.controller.tasks().display_order();

    if tasks.is_empty() {
        let line = Line::from(Span::styled(
            " Nothing to do. Press a to add a task.",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
        return;
    }

    // Keep the row of interest on screen
    let focus = match app.move_state {
        Some(ms) if app.mode == Mode::Move => ms.target,
        _ => app.cursor,
    };
    let scroll = (focus + 1).saturating_sub(height);

    let source_index = app
        .move_state
        .and_then(|ms| app.controller.tasks().display_index_of(ms.source));

    let lines: Vec<Line> = tasks
        .iter()
        .enumerate()
        .skip(scroll)
        .take(height)
        .map(|(i, task)| {
            let marker = row_marker(app, i, source_index);
            task_line(app, task, i == app.cursor, marker, width)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

/// Two-cell gutter: cursor, move source, or drop target indicator
fn row_marker<S: KeyValueStore>(app: &App<S>, index: usize, source: Option<usize>) -> &'static str {
    if app.mode == Mode::Move
        && let (Some(ms), Some(source)) = (app.move_state, source)
    {
        if index == source {
            return "\u{2261} ";
        }
        if index == ms.target {
            return match ms.natural_position(source) {
                DropPosition::Above => "\u{25B2} ",
                DropPosition::Below => "\u{25BC} ",
            };
        }
        return "  ";
    }
    if index == app.cursor { "\u{25B8} " } else { "  " }
}

fn task_line<'a, S: KeyValueStore>(
    app: &App<S>,
    task: &'a Task,
    selected: bool,
    marker: &'static str,
    width: usize,
) -> Line<'a> {
    let theme = &app.theme;
    let bg = if selected { theme.selection_bg } else { theme.background };
    let base = Style::default().bg(bg);

    let text_style = if task.completed {
        base.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
    } else if selected {
        base.fg(theme.text_bright)
    } else {
        base.fg(theme.text)
    };

    let mut suffix = String::new();
    if let (done, total @ 1..) = task.subtask_progress() {
        suffix.push_str(&format!(" {}/{}", done, total));
    }
    if !task.notes.is_empty() {
        suffix.push_str(" \u{270E}");
    }

    let mut spans = vec![
        Span::styled(marker, base.fg(theme.highlight)),
        Span::styled(checkbox(task.completed), base.fg(theme.dim)),
        Span::styled(" ", base),
        Span::styled(
            priority_symbol(task.priority),
            base.fg(theme.priority_color(task.priority)),
        ),
        Span::styled(" ", base),
    ];

    let room = width
        .saturating_sub(spans_width(&spans))
        .saturating_sub(unicode::display_width(&suffix));
    spans.push(Span::styled(
        unicode::truncate_to_width(&task.text, room),
        text_style,
    ));
    spans.push(Span::styled(suffix, base.fg(theme.dim)));

    let used = spans_width(&spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), base));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::*;
    use super::*;
    use crate::app::Command;
    use crate::model::task::Priority;

    fn render(app: &App<crate::io::store::MemoryStore>, w: u16, h: u16) -> String {
        render_to_string(w, h, |frame, area| render_list_view(frame, app, area))
    }

    #[test]
    fn rows_follow_display_order() {
        let mut app = app_with(&["Write report", "Call Sam", "Water plants"]);
        let call = app.controller.resolve(1).unwrap();
        let water = app.controller.resolve(2).unwrap();
        app.dispatch(Command::SetPriority(call, Priority::High));
        app.dispatch(Command::ToggleComplete(water));

        let out = render(&app, 50, 5);
        let rows: Vec<&str> = out.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains("[ ] \u{25CF} Call Sam"));
        assert!(rows[1].contains("[ ] \u{00B7} Write report"));
        assert!(rows[2].contains("[x] \u{00B7} Water plants"));
    }

    #[test]
    fn cursor_row_is_marked() {
        let mut app = app_with(&["a", "b"]);
        app.move_cursor_to(1);
        let out = render(&app, 30, 4);
        let rows: Vec<&str> = out.lines().collect();
        assert!(rows[0].starts_with("  [ ]"));
        assert!(rows[1].starts_with("\u{25B8} [ ]"));
    }

    #[test]
    fn details_suffix_shows_progress_and_notes() {
        let mut app = app_with(&["Trip"]);
        let id = app.selected.unwrap();
        app.dispatch(Command::AddSubtask(id, "passport".into()));
        app.dispatch(Command::AddSubtask(id, "tickets".into()));
        app.dispatch(Command::ToggleSubtask(id, 0));
        app.dispatch(Command::SetNotes(id, "aisle".into()));
        let out = render(&app, 40, 2);
        assert!(out.contains("Trip 1/2 \u{270E}"));
    }

    #[test]
    fn long_text_is_truncated() {
        let app = app_with(&["An extremely long task description that will not fit"]);
        let out = render(&app, 24, 2);
        let row = out.lines().next().unwrap();
        assert!(row.ends_with('\u{2026}'));
        assert!(unicode::display_width(row) <= 24);
    }

    #[test]
    fn move_mode_marks_source_and_target() {
        let mut app = app_with(&["A", "B", "C"]);
        app.begin_move();
        app.move_state.as_mut().unwrap().target = 2;
        let out = render(&app, 30, 4);
        let rows: Vec<&str> = out.lines().collect();
        assert!(rows[0].starts_with("\u{2261} "));
        assert!(rows[2].starts_with("\u{25BC} "));
    }

    #[test]
    fn scrolls_to_keep_cursor_visible() {
        let mut app = app_with(&["t1", "t2", "t3", "t4", "t5"]);
        app.move_cursor_to(4);
        let out = render(&app, 30, 2);
        assert!(!out.contains("t1"));
        assert!(out.contains("t5"));
    }

    #[test]
    fn empty_list_hint() {
        let app = app_with(&[]);
        let out = render(&app, 50, 3);
        assert!(out.contains("Press a to add a task"));
    }
}
