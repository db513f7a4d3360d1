use super::unicode::{display_width, next_grapheme_boundary, prev_grapheme_boundary};

/// Single-line text buffer with a grapheme-aware cursor (byte offset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    buffer: String,
    cursor: usize,
}

impl LineEditor {
    /// Start with `text`, cursor at the end
    pub fn with_text(text: &str) -> Self {
        LineEditor {
            buffer: text.to_string(),
            cursor: text.len(),
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cursor position in terminal cells from the start of the buffer
    pub fn cursor_col(&self) -> usize {
        display_width(&self.buffer[..self.cursor])
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Take the buffer contents, leaving the editor empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    pub fn insert_char(&mut self, c: char) {
        // Single-line: newlines become spaces
        let c = if c == '\n' || c == '\r' { ' ' } else { c };
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        let clean = s.replace(['\n', '\r'], " ");
        self.buffer.insert_str(self.cursor, &clean);
        self.cursor += clean.len();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = prev_grapheme_boundary(&self.buffer, self.cursor) {
            self.buffer.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = next_grapheme_boundary(&self.buffer, self.cursor) {
            self.buffer.replace_range(self.cursor..next, "");
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = prev_grapheme_boundary(&self.buffer, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = next_grapheme_boundary(&self.buffer, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.buffer.len();
    }

    /// Delete from the cursor back to the start of the line (Ctrl-U)
    pub fn kill_to_start(&mut self) {
        self.buffer.replace_range(..self.cursor, "");
        self.cursor = 0;
    }
}
