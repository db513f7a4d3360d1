use ratatui::text::Span;

use crate::model::task::Priority;
use crate::util::unicode;

pub(super) fn checkbox(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

/// Marker drawn before the task text, colored by priority
pub(super) fn priority_symbol(priority: Priority) -> &'static str {
    match priority {
        Priority::None => "\u{00B7}",
        _ => "\u{25CF}",
    }
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Pad `spans` so `hint` ends flush with the right edge, if it fits
pub(super) fn push_right_hint<'a>(
    spans: &mut Vec<Span<'a>>,
    hint: &'a str,
    width: usize,
    pad_style: ratatui::style::Style,
    hint_style: ratatui::style::Style,
) {
    let content_width = spans_width(spans);
    let hint_width = unicode::display_width(hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), pad_style));
        spans.push(Span::styled(hint, hint_style));
    }
}
