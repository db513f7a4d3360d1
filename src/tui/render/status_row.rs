use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::store::KeyValueStore;
use crate::tui::app::{App, Mode};

use super::helpers::push_right_hint;

/// Render the status row (bottom of screen)
pub fn render_status_row<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let pad = Style::default().bg(bg);
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let hints = app.ui.show_key_hints;

    let mut spans: Vec<Span> = Vec::new();
    let hint = match app.mode {
        Mode::Navigate | Mode::Subtasks => {
            if let Some(notice) = &app.controller.state().notice {
                spans.push(Span::styled(
                    format!(" {}", notice.text),
                    Style::default().fg(app.theme.notice).bg(bg),
                ));
            }
            if app.mode == Mode::Navigate {
                "a add  e edit  space done  m move  ? help "
            } else {
                "space toggle  a add  d delete  Esc back "
            }
        }
        Mode::Compose | Mode::EditText | Mode::EditNotes | Mode::AddSubtask => {
            let label = match app.mode {
                Mode::Compose => match app.controller.state().new_task_priority {
                    Some(p) => format!(" add [{}]: ", p),
                    None => " add: ".to_string(),
                },
                Mode::EditText => " edit: ".to_string(),
                Mode::EditNotes => " notes: ".to_string(),
                _ => " subtask: ".to_string(),
            };
            spans.push(Span::styled(label, dim));
            push_editor_spans(app, &mut spans);
            if app.mode == Mode::Compose {
                "Tab priority  Enter save  Esc cancel "
            } else {
                "Enter save  Esc cancel "
            }
        }
        Mode::Move => {
            let text = app
                .move_state
                .and_then(|ms| app.controller.tasks().get(ms.source))
                .map(|t| t.text.as_str())
                .unwrap_or_default();
            spans.push(Span::styled(" move: ", dim));
            spans.push(Span::styled(
                text.to_string(),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ));
            "[ above  ] below  Enter drop  Esc cancel "
        }
    };

    if hints || app.mode != Mode::Navigate {
        push_right_hint(&mut spans, hint, width, pad, dim);
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(pad);
    frame.render_widget(paragraph, area);
}

/// Editor text with a block cursor at the insertion point
fn push_editor_spans<S: KeyValueStore>(app: &App<S>, spans: &mut Vec<Span>) {
    let bg = app.theme.background;
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let buffer = app.editor.text();
    let (before, after) = buffer.split_at(app.editor.cursor());
    // Stored notes may carry newlines; show them as a visible glyph
    spans.push(Span::styled(before.replace('\n', "\u{21B5}"), text_style));
    spans.push(Span::styled(
        "\u{258C}",
        Style::default().fg(app.theme.highlight).bg(bg),
    ));
    spans.push(Span::styled(after.replace('\n', "\u{21B5}"), text_style));
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::*;
    use super::*;
    use crate::app::{Command, Controller, PendingKind};
    use crate::io::store::MemoryStore;
    use crate::model::config::{AppConfig, TasksConfig};
    use crate::model::task::Priority;

    fn render(app: &App<MemoryStore>) -> String {
        render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn navigate_shows_hints() {
        let app = app_with(&["a"]);
        assert!(render(&app).ends_with("? help"));
    }

    #[test]
    fn hints_can_be_turned_off() {
        let mut app = app_with(&["a"]);
        app.ui.show_key_hints = false;
        assert_eq!(render(&app), "");
    }

    #[test]
    fn compose_prompt_shows_priority_and_cursor() {
        let mut app = app_with(&[]);
        app.begin_edit(PendingKind::Compose, "");
        app.dispatch(Command::SetNewTaskPriority(Some(Priority::High)));
        app.editor.insert_str("milk");
        app.editor.move_left();
        let out = render(&app);
        assert!(out.starts_with(" add [high]: mil\u{258C}k"));
        assert!(out.ends_with("Esc cancel"));
    }

    #[test]
    fn limit_notice_is_shown() {
        let config = AppConfig {
            tasks: TasksConfig { max_tasks: 1 },
            ..Default::default()
        };
        let mut app = App::new(Controller::new(MemoryStore::new(), &config), &config);
        for text in ["one", "two"] {
            app.dispatch(Command::Add {
                text: text.into(),
                priority: None,
            });
        }
        assert!(render(&app).starts_with(" Task limit reached (max 1)"));
        app.controller.dismiss_notice();
        assert!(!render(&app).contains("limit"));
    }

    #[test]
    fn move_prompt_names_task() {
        let mut app = app_with(&["Call Sam"]);
        app.begin_move();
        assert!(render(&app).starts_with(" move: Call Sam"));
    }
}
