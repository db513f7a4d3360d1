use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate to fit within `max_cells` terminal cells, appending `…` if cut.
/// Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 1 {
        return "\u{2026}".to_string();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut result = String::new();
    for g in s.graphemes(true) {
        let gw = display_width(g);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(g);
    }
    result.push('\u{2026}');
    result
}

/// Next grapheme boundary after `byte_offset`, or `None` at the end.
pub fn next_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset >= s.len() {
        return None;
    }
    let step = s[byte_offset..]
        .graphemes(true)
        .next()
        .map_or(0, |g| g.len());
    Some(byte_offset + step)
}

/// Previous grapheme boundary before `byte_offset`, or `None` at the start.
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset == 0 {
        return None;
    }
    s[..byte_offset]
        .grapheme_indices(true)
        .next_back()
        .map(|(i, _)| i)
}
