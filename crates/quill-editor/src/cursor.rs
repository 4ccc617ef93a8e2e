//! Cursor: position tracking with movement and selection.
//!
//! The `Cursor` tracks a position in a buffer, a sticky column for vertical
//! movement, and an optional selection anchor. Every movement clamps into the
//! buffer's shape, so a cursor can never point at a slot that does not exist.
//!
//! # Sticky column
//!
//! When moving vertically, the cursor remembers the column it was at. If it
//! moves through a short line and then reaches a long line again, it snaps
//! back to the remembered column. Horizontal movement resets the sticky column.
//!
//! # Selection
//!
//! The cursor has an optional `anchor` position. When set, the text between
//! `anchor` and the cursor's current position forms a selection. Extending
//! motions (Shift+Arrow) set the anchor on first use; plain motions drop it.
//! There is no other hidden state: a selection is fully described by the
//! anchor and the cursor.

use crate::buffer::Buffer;
use crate::position::{Position, Range};

/// Lines moved by a page-style jump (Ctrl+Up / Ctrl+Down).
pub const JUMP_LINE_COUNT: usize = 5;

// ---------------------------------------------------------------------------
// Motion
// ---------------------------------------------------------------------------

/// A named cursor movement, as delivered by the host's key translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    /// One char left, wrapping to the end of the previous line.
    Left,
    /// One char right, wrapping to the start of the next line.
    Right,
    Up,
    Down,
    /// Start of the previous whitespace-delimited word.
    WordLeft,
    /// Start of the next whitespace-delimited word.
    WordRight,
    LineStart,
    LineEnd,
    FileStart,
    FileEnd,
    /// [`JUMP_LINE_COUNT`] lines up.
    JumpUp,
    /// [`JUMP_LINE_COUNT`] lines down.
    JumpDown,
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// A cursor in a text buffer.
///
/// Lightweight value type: just a position, a sticky column, and an optional
/// selection anchor. Does not own or reference the buffer; the buffer is
/// passed to movement methods as a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Current position in the buffer.
    pos: Position,

    /// Remembered column for vertical movement.
    sticky_col: usize,

    /// Selection anchor. When `Some`, the region between `anchor` and `pos`
    /// is selected. The anchor stays put while the cursor moves.
    anchor: Option<Position>,
}

impl Cursor {
    /// Create a cursor at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pos: Position::ZERO,
            sticky_col: 0,
            anchor: None,
        }
    }

    /// Create a cursor at a specific position.
    #[must_use]
    pub const fn at(pos: Position) -> Self {
        Self {
            pos,
            sticky_col: pos.col,
            anchor: None,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// Current position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.pos
    }

    /// Current line (0-indexed).
    #[inline]
    #[must_use]
    pub const fn line(&self) -> usize {
        self.pos.line
    }

    /// Current column (0-indexed, char offset).
    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.pos.col
    }

    /// The sticky column (desired column for vertical movement).
    #[inline]
    #[must_use]
    pub const fn sticky_col(&self) -> usize {
        self.sticky_col
    }

    /// The selection anchor, if a selection is active.
    #[inline]
    #[must_use]
    pub const fn anchor(&self) -> Option<Position> {
        self.anchor
    }

    /// True if a selection is active (anchor is set).
    #[inline]
    #[must_use]
    pub const fn has_selection(&self) -> bool {
        self.anchor.is_some()
    }

    /// The selected range, ordered start <= end, if a selection is active.
    #[must_use]
    pub fn selection(&self) -> Option<Range> {
        self.anchor.map(|anchor| normalized_range(anchor, self.pos))
    }

    // -- Selection control --------------------------------------------------

    /// Set the selection anchor at the current position.
    pub const fn set_anchor(&mut self) {
        self.anchor = Some(self.pos);
    }

    /// Set the selection anchor at a specific position.
    pub const fn set_anchor_at(&mut self, pos: Position) {
        self.anchor = Some(pos);
    }

    /// Clear the selection (remove the anchor).
    pub const fn clear_anchor(&mut self) {
        self.anchor = None;
    }

    /// Select the whole buffer: anchor at the origin, cursor at the very end.
    pub fn select_all(&mut self, buf: &Buffer) {
        self.anchor = Some(Position::ZERO);
        let last = buf.line_count() - 1;
        self.pos = Position::new(last, buf.line_len(last));
        self.sticky_col = self.pos.col;
    }

    // -- Direct positioning -------------------------------------------------

    /// Move the cursor to an exact position, clamped to buffer bounds.
    ///
    /// Resets the sticky column. Does **not** affect the selection anchor.
    pub fn set_position(&mut self, pos: Position, buf: &Buffer) {
        self.pos = buf.clamp_position(pos);
        self.sticky_col = self.pos.col;
    }

    /// Move to the start of a line (clamped). Resets sticky column.
    pub fn goto_line(&mut self, line: usize, buf: &Buffer) {
        self.set_position(Position::new(line, 0), buf);
    }

    // -- Motions ------------------------------------------------------------

    /// Apply a motion. With `extend`, the selection anchor is set at the
    /// current position if none exists yet and kept; without it, any
    /// selection is dropped.
    pub fn apply_motion(&mut self, motion: Motion, buf: &Buffer, extend: bool) {
        if extend {
            if self.anchor.is_none() {
                self.set_anchor();
            }
        } else {
            self.clear_anchor();
        }

        match motion {
            Motion::Left => self.move_left(buf),
            Motion::Right => self.move_right(buf),
            Motion::Up => self.move_up(1, buf),
            Motion::Down => self.move_down(1, buf),
            Motion::WordLeft => {
                let target = prev_word_boundary(buf, self.pos);
                self.set_position(target, buf);
            }
            Motion::WordRight => {
                let target = next_word_boundary(buf, self.pos);
                self.set_position(target, buf);
            }
            Motion::LineStart => {
                self.pos.col = 0;
                self.sticky_col = 0;
            }
            Motion::LineEnd => {
                self.pos.col = buf.line_len(self.pos.line);
                self.sticky_col = self.pos.col;
            }
            Motion::FileStart => self.set_position(Position::ZERO, buf),
            Motion::FileEnd => {
                let last = buf.line_count() - 1;
                self.set_position(Position::new(last, buf.line_len(last)), buf);
            }
            Motion::JumpUp => self.move_up(JUMP_LINE_COUNT, buf),
            Motion::JumpDown => self.move_down(JUMP_LINE_COUNT, buf),
        }
    }

    /// One char left. At column 0 wraps to the end of the previous line.
    fn move_left(&mut self, buf: &Buffer) {
        let pos = buf.clamp_position(self.pos);
        self.pos = if pos.col > 0 {
            Position::new(pos.line, pos.col - 1)
        } else if pos.line > 0 {
            Position::new(pos.line - 1, buf.line_len(pos.line - 1))
        } else {
            pos
        };
        self.sticky_col = self.pos.col;
    }

    /// One char right. At the end of a line wraps to the start of the next.
    fn move_right(&mut self, buf: &Buffer) {
        let pos = buf.clamp_position(self.pos);
        self.pos = if pos.col < buf.line_len(pos.line) {
            Position::new(pos.line, pos.col + 1)
        } else if pos.line + 1 < buf.line_count() {
            Position::new(pos.line + 1, 0)
        } else {
            pos
        };
        self.sticky_col = self.pos.col;
    }

    /// Up by `count` lines, keeping the sticky column where the line allows.
    fn move_up(&mut self, count: usize, buf: &Buffer) {
        self.pos.line = self.pos.line.saturating_sub(count);
        self.pos.col = self.sticky_col.min(buf.line_len(self.pos.line));
    }

    /// Down by `count` lines, keeping the sticky column where the line allows.
    fn move_down(&mut self, count: usize, buf: &Buffer) {
        let last_line = buf.line_count() - 1;
        self.pos.line = (self.pos.line + count).min(last_line);
        self.pos.col = self.sticky_col.min(buf.line_len(self.pos.line));
    }

    // -- Clamping -----------------------------------------------------------

    /// Fold the cursor (and anchor) back into buffer bounds after an edit.
    pub fn clamp(&mut self, buf: &Buffer) {
        self.pos = buf.clamp_position(self.pos);
        if let Some(anchor) = &mut self.anchor {
            *anchor = buf.clamp_position(*anchor);
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Selection primitives
// ---------------------------------------------------------------------------

/// Order two positions lexicographically into a range.
#[inline]
#[must_use]
pub fn normalized_range(anchor: Position, cursor: Position) -> Range {
    Range::ordered(anchor, cursor)
}

/// The text covered by `range`.
///
/// Single-line ranges are a slice of the line; multi-line ranges are the
/// first line's suffix, the whole middle lines and the last line's prefix,
/// joined by `\n`.
#[must_use]
pub fn selected_text(buf: &Buffer, range: Range) -> String {
    buf.text_in_range(range.start, range.end)
}

/// Remove the text covered by `range`. Returns the new cursor position (the
/// range start, clamped) and the removed text. History bookkeeping is the
/// caller's job.
pub fn delete_selection(buf: &mut Buffer, range: Range) -> (Position, String) {
    let start = buf.clamp_position(range.start);
    let removed = buf.delete_range(range.start, range.end);
    (start, removed)
}

// ---------------------------------------------------------------------------
// Word boundaries
// ---------------------------------------------------------------------------

/// Start of the next word: skip the rest of the current word, then the
/// whitespace after it. Reaching the end of a line continues on the next
/// line, past its leading whitespace. At the end of a line the cursor goes to
/// the start of the next one.
#[must_use]
pub fn next_word_boundary(buf: &Buffer, pos: Position) -> Position {
    let pos = buf.clamp_position(pos);
    let chars: Vec<char> = buf.line_text(pos.line).chars().collect();
    let last_line = buf.line_count() - 1;

    if pos.col >= chars.len() {
        return if pos.line < last_line {
            Position::new(pos.line + 1, 0)
        } else {
            pos
        };
    }

    let mut col = pos.col;
    while col < chars.len() && !chars[col].is_whitespace() {
        col += 1;
    }
    while col < chars.len() && chars[col].is_whitespace() {
        col += 1;
    }

    if col >= chars.len() && pos.line < last_line {
        let next_line = pos.line + 1;
        let leading = buf
            .line_text(next_line)
            .chars()
            .take_while(|ch| ch.is_whitespace())
            .count();
        return Position::new(next_line, leading);
    }

    Position::new(pos.line, col)
}

/// Start of the previous word: step back over whitespace, then over the word
/// before it. At column 0 the search continues from the end of the previous
/// line.
#[must_use]
pub fn prev_word_boundary(buf: &Buffer, pos: Position) -> Position {
    let mut pos = buf.clamp_position(pos);
    if pos.col == 0 {
        if pos.line == 0 {
            return Position::ZERO;
        }
        pos.line -= 1;
        pos.col = buf.line_len(pos.line);
    }

    let chars: Vec<char> = buf.line_text(pos.line).chars().collect();
    let mut col = pos.col.saturating_sub(1);
    while col > 0 && chars[col].is_whitespace() {
        col -= 1;
    }
    while col > 0 && !chars[col - 1].is_whitespace() {
        col -= 1;
    }
    Position::new(pos.line, col)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_buffer() -> Buffer {
        // "hello"   (5)
        // "world"   (5)
        // "hi"      (2)
        // ""        (0)
        // "goodbye" (7)
        Buffer::from_text("hello\nworld\nhi\n\ngoodbye")
    }

    fn moved(buf: &Buffer, from: Position, motion: Motion) -> Position {
        let mut c = Cursor::at(from);
        c.apply_motion(motion, buf, false);
        c.position()
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn new_at_origin() {
        let c = Cursor::new();
        assert_eq!(c.position(), Position::ZERO);
        assert_eq!(c.sticky_col(), 0);
        assert!(!c.has_selection());
    }

    #[test]
    fn at_specific_position() {
        let c = Cursor::at(Position::new(3, 7));
        assert_eq!(c.line(), 3);
        assert_eq!(c.col(), 7);
        assert_eq!(c.sticky_col(), 7);
    }

    // -- Horizontal movement ------------------------------------------------

    #[test]
    fn left_wraps_to_previous_line_end() {
        let buf = sample_buffer();
        assert_eq!(moved(&buf, Position::new(1, 0), Motion::Left), Position::new(0, 5));
        assert_eq!(moved(&buf, Position::new(1, 3), Motion::Left), Position::new(1, 2));
    }

    #[test]
    fn left_at_origin_stays() {
        let buf = sample_buffer();
        assert_eq!(moved(&buf, Position::ZERO, Motion::Left), Position::ZERO);
    }

    #[test]
    fn right_wraps_to_next_line_start() {
        let buf = sample_buffer();
        assert_eq!(moved(&buf, Position::new(0, 5), Motion::Right), Position::new(1, 0));
        assert_eq!(moved(&buf, Position::new(4, 7), Motion::Right), Position::new(4, 7));
    }

    #[test]
    fn line_start_and_end() {
        let buf = sample_buffer();
        assert_eq!(moved(&buf, Position::new(4, 3), Motion::LineStart), Position::new(4, 0));
        assert_eq!(moved(&buf, Position::new(4, 3), Motion::LineEnd), Position::new(4, 7));
    }

    #[test]
    fn file_start_and_end() {
        let buf = sample_buffer();
        assert_eq!(moved(&buf, Position::new(2, 1), Motion::FileStart), Position::ZERO);
        assert_eq!(moved(&buf, Position::new(2, 1), Motion::FileEnd), Position::new(4, 7));
    }

    // -- Vertical movement --------------------------------------------------

    #[test]
    fn down_clamps_column_to_short_line() {
        let buf = sample_buffer();
        assert_eq!(moved(&buf, Position::new(1, 4), Motion::Down), Position::new(2, 2));
    }

    #[test]
    fn sticky_column_survives_short_lines() {
        let buf = sample_buffer();
        let mut c = Cursor::at(Position::new(0, 4));
        c.apply_motion(Motion::Down, &buf, false);
        c.apply_motion(Motion::Down, &buf, false);
        assert_eq!(c.position(), Position::new(2, 2));
        c.apply_motion(Motion::Down, &buf, false);
        assert_eq!(c.position(), Position::new(3, 0));
        c.apply_motion(Motion::Down, &buf, false);
        assert_eq!(c.position(), Position::new(4, 4));
    }

    #[test]
    fn horizontal_move_resets_sticky() {
        let buf = sample_buffer();
        let mut c = Cursor::at(Position::new(0, 4));
        c.apply_motion(Motion::Left, &buf, false);
        assert_eq!(c.sticky_col(), 3);
    }

    #[test]
    fn up_at_first_line_stays() {
        let buf = sample_buffer();
        assert_eq!(moved(&buf, Position::new(0, 2), Motion::Up), Position::new(0, 2));
    }

    #[test]
    fn jumps_move_five_lines_clamped() {
        let lines: Vec<String> = (0..20).map(|i| format!("line {i}")).collect();
        let buf = Buffer::from_lines(&lines);
        assert_eq!(moved(&buf, Position::new(2, 0), Motion::JumpDown), Position::new(7, 0));
        assert_eq!(moved(&buf, Position::new(18, 0), Motion::JumpDown), Position::new(19, 0));
        assert_eq!(moved(&buf, Position::new(3, 0), Motion::JumpUp), Position::new(0, 0));
    }

    // -- Word motions -------------------------------------------------------

    #[test]
    fn word_right_skips_word_then_spaces() {
        let buf = Buffer::from_lines(["foo  bar baz"]);
        assert_eq!(moved(&buf, Position::new(0, 1), Motion::WordRight), Position::new(0, 5));
        assert_eq!(moved(&buf, Position::new(0, 5), Motion::WordRight), Position::new(0, 9));
    }

    #[test]
    fn word_right_crosses_into_next_line_past_indent() {
        let buf = Buffer::from_lines(["tail", "   next"]);
        assert_eq!(moved(&buf, Position::new(0, 1), Motion::WordRight), Position::new(1, 3));
        assert_eq!(moved(&buf, Position::new(0, 4), Motion::WordRight), Position::new(1, 0));
    }

    #[test]
    fn word_right_at_buffer_end_stays() {
        let buf = Buffer::from_lines(["only"]);
        assert_eq!(moved(&buf, Position::new(0, 4), Motion::WordRight), Position::new(0, 4));
        assert_eq!(moved(&buf, Position::new(0, 1), Motion::WordRight), Position::new(0, 4));
    }

    #[test]
    fn word_left_finds_previous_start() {
        let buf = Buffer::from_lines(["foo  bar baz"]);
        assert_eq!(moved(&buf, Position::new(0, 9), Motion::WordLeft), Position::new(0, 5));
        assert_eq!(moved(&buf, Position::new(0, 7), Motion::WordLeft), Position::new(0, 5));
        assert_eq!(moved(&buf, Position::new(0, 5), Motion::WordLeft), Position::new(0, 0));
    }

    #[test]
    fn word_left_wraps_to_previous_line() {
        let buf = Buffer::from_lines(["one two", "three"]);
        assert_eq!(moved(&buf, Position::new(1, 0), Motion::WordLeft), Position::new(0, 4));
        assert_eq!(moved(&buf, Position::ZERO, Motion::WordLeft), Position::ZERO);
    }

    // -- Selection ----------------------------------------------------------

    #[test]
    fn extending_motion_sets_anchor_once() {
        let buf = sample_buffer();
        let mut c = Cursor::at(Position::new(0, 1));
        c.apply_motion(Motion::Right, &buf, true);
        c.apply_motion(Motion::Right, &buf, true);
        assert_eq!(c.anchor(), Some(Position::new(0, 1)));
        assert_eq!(
            c.selection(),
            Some(Range::ordered(Position::new(0, 1), Position::new(0, 3)))
        );
    }

    #[test]
    fn plain_motion_collapses_selection() {
        let buf = sample_buffer();
        let mut c = Cursor::at(Position::new(0, 1));
        c.apply_motion(Motion::Right, &buf, true);
        c.apply_motion(Motion::Right, &buf, false);
        assert!(!c.has_selection());
    }

    #[test]
    fn backwards_selection_is_normalized() {
        let buf = sample_buffer();
        let mut c = Cursor::at(Position::new(1, 2));
        c.apply_motion(Motion::Up, &buf, true);
        let range = c.selection().unwrap();
        assert_eq!(range.start, Position::new(0, 2));
        assert_eq!(range.end, Position::new(1, 2));
    }

    #[test]
    fn select_all_covers_buffer() {
        let buf = sample_buffer();
        let mut c = Cursor::new();
        c.select_all(&buf);
        let range = c.selection().unwrap();
        assert_eq!(selected_text(&buf, range), "hello\nworld\nhi\n\ngoodbye");
    }

    #[test]
    fn selected_text_single_and_multi_line() {
        let buf = sample_buffer();
        let single = normalized_range(Position::new(0, 4), Position::new(0, 1));
        assert_eq!(selected_text(&buf, single), "ell");
        let multi = normalized_range(Position::new(0, 3), Position::new(2, 1));
        assert_eq!(selected_text(&buf, multi), "lo\nworld\nh");
    }

    #[test]
    fn delete_selection_lands_at_start() {
        let mut buf = sample_buffer();
        let range = normalized_range(Position::new(2, 1), Position::new(0, 3));
        let (pos, removed) = delete_selection(&mut buf, range);
        assert_eq!(pos, Position::new(0, 3));
        assert_eq!(removed, "lo\nworld\nh");
        assert_eq!(buf.line_text(0), "heli");
    }

    // -- Clamping -----------------------------------------------------------

    #[test]
    fn clamp_after_edit() {
        let mut buf = sample_buffer();
        let mut c = Cursor::at(Position::new(4, 6));
        c.set_anchor();
        buf.delete_range(Position::new(1, 0), Position::new(4, 7));
        c.clamp(&buf);
        assert_eq!(c.position(), Position::new(1, 0));
        assert_eq!(c.anchor(), Some(Position::new(1, 0)));
    }

    #[test]
    fn set_position_clamps() {
        let buf = sample_buffer();
        let mut c = Cursor::new();
        c.set_position(Position::new(2, 50), &buf);
        assert_eq!(c.position(), Position::new(2, 2));
        c.goto_line(99, &buf);
        assert_eq!(c.position(), Position::new(4, 0));
    }
}
