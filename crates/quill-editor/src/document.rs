//! Document: a buffer, its cursor and its edit history, mutated together.
//!
//! This is the only place the buffer changes during an editing session. Each
//! mutation describes itself as an [`EditOp`], applies it, then records it, so
//! every change the user makes can be undone. Typing, paste, tab and enter
//! replace an active selection first; that removal is its own recorded op.
//!
//! Nothing here fails: positions are clamped, and an edit with nothing to do
//! is a no-op that returns `false` or `None`.

use tracing::trace;

use crate::buffer::{Buffer, normalize_line_breaks};
use crate::cursor::{self, Cursor, Motion};
use crate::history::{EditOp, History};
use crate::position::Position;

/// Default number of spaces inserted by Tab and removed by Shift+Tab.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// An open document: buffer + cursor + history.
#[derive(Debug)]
pub struct Document {
    buffer: Buffer,
    cursor: Cursor,
    history: History,
    indent_width: usize,
}

impl Document {
    /// Wrap a buffer, cursor at the origin, empty history.
    #[must_use]
    pub const fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            cursor: Cursor::new(),
            history: History::new(),
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }

    /// Build a document from an ordered sequence of lines.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(Buffer::from_lines(lines))
    }

    /// Set the indent width (builder style). Values below 1 become 1.
    #[must_use]
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width.max(1);
        self
    }

    /// Replace the whole document, as when the host opens another file.
    /// History is dropped; the cursor goes to the start of `cursor_row`.
    pub fn reset(&mut self, buffer: Buffer, cursor_row: usize) {
        self.buffer = buffer;
        self.history.clear();
        self.cursor = Cursor::new();
        self.cursor.goto_line(cursor_row, &self.buffer);
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Mutable access for host bookkeeping (path, saved flag). Text edits
    /// made through this bypass history.
    #[inline]
    pub const fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    #[inline]
    #[must_use]
    pub const fn indent_width(&self) -> usize {
        self.indent_width
    }

    pub fn set_indent_width(&mut self, width: usize) {
        self.indent_width = width.max(1);
    }

    // -- Recorded primitives ------------------------------------------------

    /// Insert `text` at `pos` as one recorded op. The cursor moves to the end
    /// of the inserted text and any selection is dropped. `\r\n` and `\r`
    /// are stored as `\n`, in the buffer and in the op.
    pub fn insert_at(&mut self, pos: Position, text: &str) -> Position {
        let pos = self.buffer.clamp_position(pos);
        if text.is_empty() {
            return pos;
        }
        let text = normalize_line_breaks(text);
        let end = self.buffer.insert_text(pos, &text);
        self.history.record(EditOp::insert(pos, text.into_owned()));
        self.cursor.clear_anchor();
        self.cursor.set_position(end, &self.buffer);
        trace!(%pos, %end, "insert");
        end
    }

    /// Delete the span between `a` and `b` (either order) as one recorded op.
    /// The removed text is read first so the op can restore it. The cursor
    /// lands at the span start.
    pub fn delete_span(&mut self, a: Position, b: Position) -> String {
        let range = cursor::normalized_range(
            self.buffer.clamp_position(a),
            self.buffer.clamp_position(b),
        );
        let text = cursor::selected_text(&self.buffer, range);
        if text.is_empty() {
            return text;
        }
        let op = EditOp::delete(range.start, text.as_str());
        let (start, _) = cursor::delete_selection(&mut self.buffer, range);
        self.history.record(op);
        self.cursor.clear_anchor();
        self.cursor.set_position(start, &self.buffer);
        trace!(start = %range.start, end = %range.end, "delete");
        text
    }

    // -- Typing -------------------------------------------------------------

    /// Type one character, replacing any selection.
    pub fn insert_char(&mut self, ch: char) {
        let mut tmp = [0; 4];
        self.insert_text_at_cursor(ch.encode_utf8(&mut tmp));
    }

    /// Paste: insert `text` at the cursor, replacing any selection.
    /// `\r\n` and `\r` are stored as `\n`.
    pub fn insert_text_at_cursor(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.delete_selection();
        self.insert_at(self.cursor.position(), text);
    }

    /// Enter: split the line at the cursor, replacing any selection.
    pub fn insert_newline(&mut self) {
        self.delete_selection();
        self.insert_at(self.cursor.position(), "\n");
    }

    /// Tab: insert `indent_width` spaces at the cursor, replacing any
    /// selection.
    pub fn indent(&mut self) {
        self.delete_selection();
        let spaces = " ".repeat(self.indent_width);
        self.insert_at(self.cursor.position(), &spaces);
    }

    /// Shift+Tab: remove up to `indent_width` leading spaces from the cursor
    /// line. The cursor shifts left with the text. Returns false when the
    /// line has no leading space.
    pub fn dedent(&mut self) -> bool {
        let line = self.cursor.line();
        let removable = self
            .buffer
            .line_text(line)
            .chars()
            .take(self.indent_width)
            .take_while(|&ch| ch == ' ')
            .count();
        if removable == 0 {
            return false;
        }

        let col = self.cursor.col();
        let anchor = self.cursor.anchor();
        self.delete_span(Position::new(line, 0), Position::new(line, removable));
        self.cursor
            .set_position(Position::new(line, col.saturating_sub(removable)), &self.buffer);
        if let Some(anchor) = anchor {
            let shifted = if anchor.line == line {
                Position::new(line, anchor.col.saturating_sub(removable))
            } else {
                anchor
            };
            self.cursor.set_anchor_at(self.buffer.clamp_position(shifted));
        }
        true
    }

    // -- Deleting -----------------------------------------------------------

    /// Backspace: delete the selection, else the char before the cursor, else
    /// join with the previous line. Returns false at the very start.
    pub fn backspace(&mut self) -> bool {
        if self.delete_selection().is_some() {
            return true;
        }
        let pos = self.buffer.clamp_position(self.cursor.position());
        if pos.col > 0 {
            self.delete_span(Position::new(pos.line, pos.col - 1), pos);
            true
        } else if pos.line > 0 {
            let prev = pos.line - 1;
            self.delete_span(Position::new(prev, self.buffer.line_len(prev)), pos);
            true
        } else {
            false
        }
    }

    /// Delete: remove the selection, else the char under the cursor, else
    /// join the next line onto this one. Returns false at the very end.
    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection().is_some() {
            return true;
        }
        let pos = self.buffer.clamp_position(self.cursor.position());
        if pos.col < self.buffer.line_len(pos.line) {
            self.delete_span(pos, Position::new(pos.line, pos.col + 1));
            true
        } else if pos.line + 1 < self.buffer.line_count() {
            self.delete_span(pos, Position::new(pos.line + 1, 0));
            true
        } else {
            false
        }
    }

    /// Remove the active selection as one recorded op and return its text.
    /// `None` when nothing is selected. An empty selection is just dropped.
    pub fn delete_selection(&mut self) -> Option<String> {
        let range = self.cursor.selection()?;
        self.cursor.clear_anchor();
        if range.is_empty() {
            return None;
        }
        Some(self.delete_span(range.start, range.end))
    }

    // -- Clipboard boundary -------------------------------------------------

    /// The selected text, for the host to put on the clipboard.
    #[must_use]
    pub fn extract_selected_text(&self) -> Option<String> {
        let range = self.cursor.selection()?;
        (!range.is_empty()).then(|| cursor::selected_text(&self.buffer, range))
    }

    /// Copy then delete the selection.
    pub fn cut_selection(&mut self) -> Option<String> {
        self.extract_selected_text()?;
        self.delete_selection()
    }

    // -- History ------------------------------------------------------------

    /// Undo the last op. Returns false when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(pos) = self.history.undo(&mut self.buffer) else {
            return false;
        };
        self.cursor.clear_anchor();
        self.cursor.set_position(pos, &self.buffer);
        true
    }

    /// Redo the last undone op. Returns false when there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(pos) = self.history.redo(&mut self.buffer) else {
            return false;
        };
        self.cursor.clear_anchor();
        self.cursor.set_position(pos, &self.buffer);
        true
    }

    // -- Cursor -------------------------------------------------------------

    /// Move the cursor; `extend` grows the selection instead of dropping it.
    pub fn move_cursor(&mut self, motion: Motion, extend: bool) {
        self.cursor.apply_motion(motion, &self.buffer, extend);
    }

    /// Place the cursor at `pos` (clamped), dropping any selection.
    pub fn set_cursor(&mut self, pos: Position) {
        self.cursor.clear_anchor();
        self.cursor.set_position(pos, &self.buffer);
    }

    /// Select the whole buffer.
    pub fn select_all(&mut self) {
        self.cursor.select_all(&self.buffer);
    }

    /// Jump to the start of a 0-indexed line (clamped).
    pub fn goto_line(&mut self, line: usize) {
        self.cursor.clear_anchor();
        self.cursor.goto_line(line, &self.buffer);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Buffer::new())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc_at(lines: &[&str], pos: Position) -> Document {
        let mut doc = Document::from_lines(lines);
        doc.set_cursor(pos);
        doc
    }

    fn undo_all(doc: &mut Document) {
        while doc.undo() {}
    }

    // -- Typing -------------------------------------------------------------

    #[test]
    fn typing_advances_cursor() {
        let mut doc = doc_at(&["ac"], Position::new(0, 1));
        doc.insert_char('b');
        assert_eq!(doc.buffer().lines(), vec!["abc"]);
        assert_eq!(doc.cursor().position(), Position::new(0, 2));
        assert_eq!(doc.history().undo_count(), 1);
    }

    #[test]
    fn typing_over_selection_records_two_ops() {
        let mut doc = doc_at(&["hello world"], Position::new(0, 6));
        doc.move_cursor(Motion::LineEnd, true);
        doc.insert_char('!');
        assert_eq!(doc.buffer().lines(), vec!["hello !"]);
        assert_eq!(doc.history().undo_count(), 2);

        doc.undo();
        assert_eq!(doc.buffer().lines(), vec!["hello "]);
        doc.undo();
        assert_eq!(doc.buffer().lines(), vec!["hello world"]);
    }

    #[test]
    fn backwards_selection_delete_is_recorded_at_start() {
        let mut doc = doc_at(&["abcdef"], Position::new(0, 5));
        doc.move_cursor(Motion::Left, true);
        doc.move_cursor(Motion::Left, true);
        doc.move_cursor(Motion::Left, true);
        assert_eq!(doc.delete_selection().as_deref(), Some("cde"));
        assert_eq!(doc.buffer().lines(), vec!["abf"]);
        doc.undo();
        assert_eq!(doc.buffer().lines(), vec!["abcdef"]);
    }

    #[test]
    fn paste_normalizes_line_breaks() {
        let mut doc = doc_at(&["XY"], Position::new(0, 2));
        doc.insert_text_at_cursor("a\r\nb\rc");
        assert_eq!(doc.buffer().lines(), vec!["XYa", "b", "c"]);
        assert_eq!(doc.cursor().position(), Position::new(2, 1));
        doc.undo();
        assert_eq!(doc.buffer().lines(), vec!["XY"]);
    }

    #[test]
    fn newline_splits_line() {
        let mut doc = doc_at(&["headtail"], Position::new(0, 4));
        doc.insert_newline();
        assert_eq!(doc.buffer().lines(), vec!["head", "tail"]);
        assert_eq!(doc.cursor().position(), Position::new(1, 0));
    }

    // -- Indent -------------------------------------------------------------

    #[test]
    fn indent_inserts_spaces() {
        let mut doc = doc_at(&["x"], Position::ZERO);
        doc.indent();
        assert_eq!(doc.buffer().lines(), vec!["    x"]);
        assert_eq!(doc.cursor().col(), 4);
    }

    #[test]
    fn indent_width_is_configurable() {
        let mut doc = Document::from_lines(["x"]).with_indent_width(2);
        doc.indent();
        assert_eq!(doc.buffer().lines(), vec!["  x"]);
    }

    #[test]
    fn dedent_removes_up_to_width() {
        let mut doc = doc_at(&["      code"], Position::new(0, 8));
        assert!(doc.dedent());
        assert_eq!(doc.buffer().lines(), vec!["  code"]);
        assert_eq!(doc.cursor().col(), 4);
        assert!(doc.dedent());
        assert_eq!(doc.buffer().lines(), vec!["code"]);
        assert_eq!(doc.cursor().col(), 2);
        assert!(!doc.dedent());
    }

    #[test]
    fn dedent_cursor_inside_indent_goes_to_zero() {
        let mut doc = doc_at(&["    x"], Position::new(0, 1));
        doc.dedent();
        assert_eq!(doc.cursor().col(), 0);
        doc.undo();
        assert_eq!(doc.buffer().lines(), vec!["    x"]);
    }

    // -- Backspace / delete -------------------------------------------------

    #[test]
    fn backspace_mid_line() {
        let mut doc = doc_at(&["abc"], Position::new(0, 2));
        assert!(doc.backspace());
        assert_eq!(doc.buffer().lines(), vec!["ac"]);
        assert_eq!(doc.cursor().position(), Position::new(0, 1));
    }

    #[test]
    fn backspace_at_line_start_joins() {
        let mut doc = doc_at(&["ab", "cd"], Position::new(1, 0));
        assert!(doc.backspace());
        assert_eq!(doc.buffer().lines(), vec!["abcd"]);
        assert_eq!(doc.cursor().position(), Position::new(0, 2));
        doc.undo();
        assert_eq!(doc.buffer().lines(), vec!["ab", "cd"]);
    }

    #[test]
    fn backspace_at_origin_is_noop() {
        let mut doc = doc_at(&["ab"], Position::ZERO);
        assert!(!doc.backspace());
        assert!(!doc.history().can_undo());
    }

    #[test]
    fn delete_forward_joins_next_line() {
        let mut doc = doc_at(&["ab", "cd"], Position::new(0, 2));
        assert!(doc.delete_forward());
        assert_eq!(doc.buffer().lines(), vec!["abcd"]);
        assert!(doc.delete_forward());
        assert_eq!(doc.buffer().lines(), vec!["abd"]);
        doc.move_cursor(Motion::FileEnd, false);
        assert!(!doc.delete_forward());
    }

    // -- Clipboard ----------------------------------------------------------

    #[test]
    fn extract_and_cut() {
        let mut doc = doc_at(&["one", "two"], Position::new(0, 1));
        assert_eq!(doc.extract_selected_text(), None);
        doc.move_cursor(Motion::Down, true);
        assert_eq!(doc.extract_selected_text().as_deref(), Some("ne\nt"));
        assert_eq!(doc.cut_selection().as_deref(), Some("ne\nt"));
        assert_eq!(doc.buffer().lines(), vec!["owo"]);
        assert!(!doc.cursor().has_selection());
    }

    #[test]
    fn select_all_then_type_replaces_everything() {
        let mut doc = doc_at(&["a", "b", "c"], Position::ZERO);
        doc.select_all();
        doc.insert_char('z');
        assert_eq!(doc.buffer().lines(), vec!["z"]);
        undo_all(&mut doc);
        assert_eq!(doc.buffer().lines(), vec!["a", "b", "c"]);
    }

    // -- Undo / redo --------------------------------------------------------

    #[test]
    fn undo_redo_restores_cursor() {
        let mut doc = doc_at(&["abc"], Position::new(0, 1));
        doc.insert_char('X');
        assert!(doc.undo());
        assert_eq!(doc.buffer().lines(), vec!["abc"]);
        assert_eq!(doc.cursor().position(), Position::new(0, 1));
        assert!(doc.redo());
        assert_eq!(doc.buffer().lines(), vec!["aXbc"]);
        assert_eq!(doc.cursor().position(), Position::new(0, 2));
        assert!(!doc.redo());
    }

    #[test]
    fn mixed_session_undoes_to_start() {
        let mut doc = doc_at(&["fn main() {", "}"], Position::new(0, 11));
        doc.insert_newline();
        doc.indent();
        doc.insert_text_at_cursor("let x = 1;");
        doc.backspace();
        doc.move_cursor(Motion::LineStart, false);
        doc.delete_forward();
        let edited = doc.buffer().lines();

        undo_all(&mut doc);
        assert_eq!(doc.buffer().lines(), vec!["fn main() {", "}"]);
        while doc.redo() {}
        assert_eq!(doc.buffer().lines(), edited);
    }

    // -- Reset --------------------------------------------------------------

    #[test]
    fn reset_drops_history_and_seeds_cursor() {
        let mut doc = doc_at(&["x"], Position::ZERO);
        doc.insert_char('y');
        doc.reset(Buffer::from_lines(["a", "b", "c"]), 2);
        assert!(!doc.history().can_undo());
        assert_eq!(doc.cursor().position(), Position::new(2, 0));
    }
}
