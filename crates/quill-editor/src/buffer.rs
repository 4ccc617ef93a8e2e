//! Text buffer: the ordered sequence of lines every edit flows through.
//!
//! A `Buffer` wraps a [`ropey::Rope`] and exposes the editor's view of it: a
//! list of lines addressed by `Position` (line, col). Line breaks are stored
//! as `\n` only; the dominant ending of loaded text is remembered so the host
//! can write the file back the way it found it.
//!
//! # Design choices
//!
//! - **ropey** gives O(log n) insert/delete anywhere and cheap, immutable
//!   clones. The clone is what a background search holds on to while the
//!   user keeps typing into the live buffer.
//!
//! - **Only `\n` breaks lines.** The crate is built without ropey's
//!   `cr_lines`/`unicode_lines` features, and incoming text has `\r\n` and
//!   lone `\r` rewritten to `\n`. Column math therefore never has to care
//!   about two-char line endings.
//!
//! - **Out-of-range coordinates clamp, they never panic.** A stray index from
//!   an input handler is folded back into the buffer's shape. Accessors on a
//!   missing line answer "empty".
//!
//! - **There is always at least one line.** An empty rope reports one empty
//!   line, and no delete can remove the last one.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use ropey::{Rope, RopeSlice};

use crate::position::{Position, Range};

// ---------------------------------------------------------------------------
// Line ending detection
// ---------------------------------------------------------------------------

/// Line ending style of loaded text.
///
/// Detected from the first break found. Defaults to `Lf` for new buffers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
    /// `\r`
    Cr,
}

impl LineEnding {
    /// The string representation of this line ending.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// Detect the line ending used by `text`. Returns `Lf` when there is none.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let bytes = text.as_bytes();
        for (i, byte) in bytes.iter().enumerate() {
            match byte {
                b'\n' => return Self::Lf,
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => return Self::CrLf,
                b'\r' => return Self::Cr,
                _ => {}
            }
        }
        Self::Lf
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lf => f.write_str("LF"),
            Self::CrLf => f.write_str("CRLF"),
            Self::Cr => f.write_str("CR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// A line-oriented text buffer backed by a rope.
///
/// The buffer tracks:
///
/// - The text content (via `ropey::Rope`)
/// - The file path it was opened from, if any (the core never touches disk)
/// - Whether the content has changed since the last save
/// - The line ending style to use when the host writes it back
pub struct Buffer {
    rope: Rope,
    path: Option<PathBuf>,
    modified: bool,
    line_ending: LineEnding,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// Create a buffer holding one empty line.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            path: None,
            modified: false,
            line_ending: LineEnding::Lf,
        }
    }

    /// Create a buffer from raw text, as read from a file.
    ///
    /// The line ending style is detected, then every break is stored as `\n`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            line_ending: LineEnding::detect(text),
            rope: Rope::from_str(&normalize_line_breaks(text)),
            path: None,
            modified: false,
        }
    }

    /// Create a buffer from an ordered sequence of lines.
    ///
    /// An empty sequence yields a single empty line.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.push_str(line.as_ref());
        }
        Self {
            rope: Rope::from_str(&normalize_line_breaks(&text)),
            path: None,
            modified: false,
            line_ending: LineEnding::Lf,
        }
    }

    /// Attach a file path (builder style).
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    // -- Text access --------------------------------------------------------

    /// The underlying rope.
    #[inline]
    #[must_use]
    pub const fn rope(&self) -> &Rope {
        &self.rope
    }

    /// An immutable snapshot of the current text. O(1): ropes share their
    /// nodes until one side is edited.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Rope {
        self.rope.clone()
    }

    /// Number of lines. Never less than 1.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total char count, line breaks included.
    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// True when the buffer holds a single empty line.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// The content of a line, without its line break. `None` past the end.
    #[must_use]
    pub fn line(&self, row: usize) -> Option<RopeSlice<'_>> {
        line_content(&self.rope, row)
    }

    /// Number of chars on a line, excluding the break. 0 past the end.
    #[must_use]
    pub fn line_len(&self, row: usize) -> usize {
        self.line(row).map_or(0, |l| l.len_chars())
    }

    /// The text of a line, excluding the break. Empty past the end.
    #[must_use]
    pub fn line_text(&self, row: usize) -> String {
        self.line(row).map(String::from).unwrap_or_default()
    }

    /// Every line as an owned string.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count()).map(|row| self.line_text(row)).collect()
    }

    /// The character at `pos`, if `pos` addresses one (line breaks excluded).
    #[must_use]
    pub fn char_at(&self, pos: Position) -> Option<char> {
        let line = self.line(pos.line)?;
        (pos.col < line.len_chars()).then(|| line.char(pos.col))
    }

    /// All text with lines joined by `\n`.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    /// All text with lines joined by the buffer's line ending. This is what
    /// the host writes on save.
    #[must_use]
    pub fn text_with_line_endings(&self) -> String {
        let text = self.rope.to_string();
        match self.line_ending {
            LineEnding::Lf => text,
            other => text.replace('\n', other.as_str()),
        }
    }

    // -- Coordinates --------------------------------------------------------

    /// Clamp a position into the buffer: the line to the last line, the
    /// column to the line's length (the slot after its last char).
    #[must_use]
    pub fn clamp_position(&self, pos: Position) -> Position {
        let line = pos.line.min(self.line_count() - 1);
        Position::new(line, pos.col.min(self.line_len(line)))
    }

    /// Absolute char index of an already-clamped position.
    fn char_idx(&self, pos: Position) -> usize {
        self.rope.line_to_char(pos.line) + pos.col
    }

    /// The text between two positions, in either order. Both endpoints are
    /// clamped first. Nothing is modified: this is the dry run that tells the
    /// edit log what a delete is about to remove.
    #[must_use]
    pub fn text_in_range(&self, a: Position, b: Position) -> String {
        let range = Range::ordered(self.clamp_position(a), self.clamp_position(b));
        let start = self.char_idx(range.start);
        let end = self.char_idx(range.end);
        self.rope.slice(start..end).to_string()
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `text` at `pos` and return the position just after it.
    ///
    /// `pos` is clamped. Single-line text is spliced into the line; text with
    /// breaks splits the target line, so the line count grows by the number
    /// of breaks. `\r\n` and `\r` in `text` are stored as `\n`.
    pub fn insert_text(&mut self, pos: Position, text: &str) -> Position {
        let pos = self.clamp_position(pos);
        if text.is_empty() {
            return pos;
        }
        let text = normalize_line_breaks(text);
        let idx = self.char_idx(pos);
        self.rope.insert(idx, &text);
        self.modified = true;
        pos.advanced_by(&text)
    }

    /// Delete the text between two positions (in either order) and return
    /// what was removed.
    ///
    /// Endpoints are clamped. Within one line the span is cut out in place;
    /// across lines the start line's prefix and the end line's suffix are
    /// merged and the lines in between disappear.
    pub fn delete_range(&mut self, a: Position, b: Position) -> String {
        let range = Range::ordered(self.clamp_position(a), self.clamp_position(b));
        if range.is_empty() {
            return String::new();
        }
        let start = self.char_idx(range.start);
        let end = self.char_idx(range.end);
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        self.modified = true;
        removed
    }

    // -- Metadata -----------------------------------------------------------

    /// The file path this buffer was opened from, if any.
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Set the file path (after "save as").
    #[inline]
    pub fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    /// True if the buffer changed since it was loaded or last saved.
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Mark the buffer as saved. Called by the host after a successful write.
    #[inline]
    pub const fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// The line ending used by [`text_with_line_endings`](Self::text_with_line_endings).
    #[inline]
    #[must_use]
    pub const fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Override the line ending used on save.
    #[inline]
    pub const fn set_line_ending(&mut self, ending: LineEnding) {
        self.line_ending = ending;
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.line_count())
            .field("chars", &self.len_chars())
            .field("modified", &self.modified)
            .field("line_ending", &self.line_ending)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Line `row` of `rope` without its trailing `\n`. `None` past the end.
pub(crate) fn line_content(rope: &Rope, row: usize) -> Option<RopeSlice<'_>> {
    if row >= rope.len_lines() {
        return None;
    }
    let line = rope.line(row);
    let len = line.len_chars();
    let content = if len > 0 && line.char(len - 1) == '\n' {
        len - 1
    } else {
        len
    };
    Some(line.slice(..content))
}

/// Rewrite `\r\n` and lone `\r` as `\n`. Borrows when there is nothing to do.
pub(crate) fn normalize_line_breaks(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
