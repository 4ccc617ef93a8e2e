//! Prompt: the single-line input behind every modal question.
//!
//! File names, search queries, replacements, finder queries and line numbers
//! are all typed into a `Prompt`. The cursor is a char offset, so editing
//! multi-byte input never splits a code point.

/// A single-line text input with a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    /// The text typed so far.
    input: String,
    /// Cursor position within the input (char offset).
    cursor: usize,
}

impl Prompt {
    /// An empty prompt.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
        }
    }

    /// A prompt pre-filled with `text`, cursor at the end.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            input: text.to_owned(),
            cursor: text.chars().count(),
        }
    }

    /// The current input text.
    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The cursor position within the input (char offset).
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the input is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, ch: char) {
        let byte_idx = self.char_to_byte(self.cursor);
        self.input.insert(byte_idx, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor position (pasting into a prompt).
    /// Line breaks are dropped; a prompt is one line.
    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars().filter(|&ch| ch != '\n' && ch != '\r') {
            self.insert_char(ch);
        }
    }

    /// Delete the character before the cursor (backspace).
    /// Returns `false` if the cursor is at position 0.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let byte_idx = self.char_to_byte(self.cursor);
        self.input.remove(byte_idx);
        true
    }

    /// Move the cursor one char left. Returns `false` at the start.
    pub const fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Move the cursor one char right. Returns `false` at the end.
    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.input.chars().count() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Empty the input.
    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    /// Take the input out, leaving the prompt empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.input)
    }

    /// Convert a char offset to a byte offset in the input string.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map_or(self.input.len(), |(byte_idx, _)| byte_idx)
    }
}

/// Parse a 1-indexed line number typed into the go-to-line prompt.
///
/// Returns the 0-indexed line, or `None` if the input is not a number in
/// `1..=line_count`.
#[must_use]
pub fn parse_line_number(input: &str, line_count: usize) -> Option<usize> {
    let n: usize = input.trim().parse().ok()?;
    (1..=line_count).contains(&n).then(|| n - 1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
