//! Viewport: maps the buffer onto a bounded, soft-wrapped window.
//!
//! Long logical lines wrap onto several *visual rows* at the pane's text
//! width. The viewport's only mutable state is `top`: the absolute visual row
//! shown first. Everything a renderer needs (which logical lines, how many of
//! their rows are hidden above the pane) is derived from it on demand.
//!
//! # Widths
//!
//! - A tab counts as `tab_width` columns wherever it sits.
//! - Other chars use their terminal width (CJK = 2, combining marks = 0).
//! - An empty line still occupies one row.
//! - A row breaks before a char that would overflow the text width. A char
//!   wider than the whole text width sits alone on its row.
//!
//! # Scrolling
//!
//! ```text
//!   visual rows          pane (height 3)
//!   0  fn main() {
//!   1      let long_li   ← top
//!   2  ne = 1;                          cursor row 3 is inside
//!   3      run();        ← cursor       [top, top + height)
//!   4  }
//! ```
//!
//! The cursor's absolute visual row is the sum of the row counts of every
//! line above it plus its row within its own line. [`update_top`] scrolls the
//! least amount that brings that row into the pane.

use unicode_width::UnicodeWidthChar;

use crate::buffer::Buffer;
use crate::position::Position;

/// Default width of a tab, in columns.
pub const DEFAULT_TAB_WIDTH: usize = 4;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Compute gutter width for line numbers.
///
/// Returns the number of columns needed for right-aligned line numbers plus
/// a separator space:
///
/// | Lines   | Digits | Gutter |
/// |---------|--------|--------|
/// | 1–9     | 1      | 2      |
/// | 10–99   | 2      | 3      |
/// | 100–999 | 3      | 4      |
///
/// Returns 0 when `show_numbers` is false.
#[must_use]
pub fn gutter_width(line_count: usize, show_numbers: bool) -> usize {
    if !show_numbers {
        return 0;
    }
    // At least 1, so ilog10 doesn't panic on 0.
    let n = line_count.max(1);
    n.ilog10() as usize + 2
}

/// Display width of one char: `tab_width` for a tab, the terminal width for
/// anything else.
#[inline]
#[must_use]
pub fn char_width(ch: char, tab_width: usize) -> usize {
    if ch == '\t' {
        tab_width
    } else {
        ch.width().unwrap_or(0)
    }
}

/// Walk `chars` with the wrapping rule and return the visual row (0-based)
/// the last one lands on.
fn wrap_walk<I: Iterator<Item = char>>(chars: I, text_width: usize, tab_width: usize) -> usize {
    let text_width = text_width.max(1);
    let mut row = 0;
    let mut used = 0;
    for ch in chars {
        let w = char_width(ch, tab_width);
        if used > 0 && used + w > text_width {
            row += 1;
            used = w;
        } else {
            used += w;
        }
    }
    row
}

/// Number of visual rows a line occupies at `text_width`. Never less than 1.
#[must_use]
pub fn visual_line_count<I: Iterator<Item = char>>(
    chars: I,
    text_width: usize,
    tab_width: usize,
) -> usize {
    wrap_walk(chars, text_width, tab_width) + 1
}

/// Visual row (within its own line) of the char slot at `col`: the same walk
/// as [`visual_line_count`], stopped after the first `col` chars.
#[must_use]
pub fn visual_row_of_col<I: Iterator<Item = char>>(
    chars: I,
    col: usize,
    text_width: usize,
    tab_width: usize,
) -> usize {
    wrap_walk(chars.take(col), text_width, tab_width)
}

/// Char columns at which each visual row of a line begins. The first entry
/// is always 0, so the result has one entry per row.
#[must_use]
pub fn row_starts<I: Iterator<Item = char>>(chars: I, text_width: usize, tab_width: usize) -> Vec<usize> {
    let text_width = text_width.max(1);
    let mut starts = vec![0];
    let mut used = 0;
    for (col, ch) in chars.enumerate() {
        let w = char_width(ch, tab_width);
        if used > 0 && used + w > text_width {
            starts.push(col);
            used = w;
        } else {
            used += w;
        }
    }
    starts
}

/// The new top row after the cursor moved to visual row `cursor`.
///
/// Above the pane: scroll up so the cursor is the first row. At or past the
/// bottom: scroll down so it is the last row. Otherwise `top` is kept.
#[must_use]
pub const fn update_top(top: usize, cursor: usize, height: usize) -> usize {
    let height = if height == 0 { 1 } else { height };
    if cursor < top {
        cursor
    } else if cursor >= top + height {
        cursor + 1 - height
    } else {
        top
    }
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// The slice of the document a renderer should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleWindow {
    /// First logical line touching the pane.
    pub first_line: usize,
    /// Visual rows of `first_line` hidden above the pane.
    pub skip_rows: usize,
    /// Number of logical lines with at least one row inside the pane.
    pub line_count: usize,
}

/// Scroll state and display configuration of one editor pane.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// First visible visual row (absolute, from the top of the document).
    top: usize,

    /// Pane width in columns, gutter included.
    width: usize,

    /// Pane height in rows.
    height: usize,

    /// Columns per tab.
    tab_width: usize,

    /// Whether a line-number gutter eats into the width.
    line_numbers: bool,
}

impl Viewport {
    /// A viewport of the given pane size with line numbers on and 4-column
    /// tabs.
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            top: 0,
            width,
            height,
            tab_width: DEFAULT_TAB_WIDTH,
            line_numbers: true,
        }
    }

    /// Set the tab width (builder style, minimum 1).
    #[must_use]
    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width.max(1);
        self
    }

    /// Enable or disable the gutter (builder style).
    #[must_use]
    pub const fn with_line_numbers(mut self, show: bool) -> Self {
        self.line_numbers = show;
        self
    }

    // -- Accessors ----------------------------------------------------------

    /// First visible visual row.
    #[inline]
    #[must_use]
    pub const fn top(&self) -> usize {
        self.top
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[inline]
    #[must_use]
    pub const fn tab_width(&self) -> usize {
        self.tab_width
    }

    #[inline]
    #[must_use]
    pub const fn line_numbers(&self) -> bool {
        self.line_numbers
    }

    // -- Configuration ------------------------------------------------------

    /// Set the pane size (host resize event).
    pub const fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    pub fn set_tab_width(&mut self, width: usize) {
        self.tab_width = width.max(1);
    }

    pub const fn set_line_numbers(&mut self, show: bool) {
        self.line_numbers = show;
    }

    /// Set the scroll position directly.
    pub const fn set_top(&mut self, top: usize) {
        self.top = top;
    }

    // -- Geometry -----------------------------------------------------------

    /// Columns available for text once the gutter is taken. Never 0.
    #[must_use]
    pub fn text_width(&self, line_count: usize) -> usize {
        self.width
            .saturating_sub(gutter_width(line_count, self.line_numbers))
            .max(1)
    }

    /// Rows occupied by logical line `row` (0 past the end).
    #[must_use]
    pub fn line_rows(&self, buf: &Buffer, row: usize, text_width: usize) -> usize {
        buf.line(row).map_or(0, |line| {
            visual_line_count(line.chars(), text_width, self.tab_width)
        })
    }

    /// Absolute visual row of `pos`: rows of every line above it plus the
    /// row of its column within its own line.
    #[must_use]
    pub fn cursor_visual_offset(&self, buf: &Buffer, pos: Position) -> usize {
        let pos = buf.clamp_position(pos);
        let text_width = self.text_width(buf.line_count());
        let above: usize = (0..pos.line)
            .map(|row| self.line_rows(buf, row, text_width))
            .sum();
        let within = buf.line(pos.line).map_or(0, |line| {
            visual_row_of_col(line.chars(), pos.col, text_width, self.tab_width)
        });
        above + within
    }

    // -- Scrolling ----------------------------------------------------------

    /// Scroll so the visual row holding `pos` lies within
    /// `[top, top + height)`, then clamp `top` so the pane is not scrolled
    /// past the document's last row. Returns the new top.
    pub fn scroll_to_cursor(&mut self, buf: &Buffer, pos: Position) -> usize {
        let pos = buf.clamp_position(pos);
        let text_width = self.text_width(buf.line_count());
        let height = self.height.max(1);

        let above: usize = (0..pos.line)
            .map(|row| self.line_rows(buf, row, text_width))
            .sum();
        let within = buf.line(pos.line).map_or(0, |line| {
            visual_row_of_col(line.chars(), pos.col, text_width, self.tab_width)
        });
        let cursor = above + within;
        let mut top = update_top(self.top, cursor, height);

        // Only the total height decides the clamp. Stop adding once the rows
        // counted already fill the pane below `top`.
        let needed = top + height;
        let mut total = above;
        for row in pos.line..buf.line_count() {
            total += self.line_rows(buf, row, text_width);
            if total >= needed {
                break;
            }
        }
        if total < needed {
            top = top.min(total.saturating_sub(height));
        }

        self.top = top;
        top
    }

    /// Map `top` back to logical lines for the renderer.
    #[must_use]
    pub fn visible_window(&self, buf: &Buffer) -> VisibleWindow {
        let text_width = self.text_width(buf.line_count());
        let line_total = buf.line_count();

        let mut first_line = 0;
        let mut seen = 0;
        while first_line < line_total {
            let rows = self.line_rows(buf, first_line, text_width);
            if seen + rows > self.top {
                break;
            }
            seen += rows;
            first_line += 1;
        }
        if first_line == line_total {
            return VisibleWindow {
                first_line: line_total - 1,
                skip_rows: 0,
                line_count: 0,
            };
        }

        let skip_rows = self.top - seen;
        let mut remaining = self.height + skip_rows;
        let mut line_count = 0;
        let mut row = first_line;
        while remaining > 0 && row < line_total {
            remaining = remaining.saturating_sub(self.line_rows(buf, row, text_width));
            line_count += 1;
            row += 1;
        }

        VisibleWindow {
            first_line,
            skip_rows,
            line_count,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(text: &str, width: usize) -> usize {
        visual_line_count(text.chars(), width, DEFAULT_TAB_WIDTH)
    }

    // -- gutter_width -------------------------------------------------------

    #[test]
    fn gutter_tracks_digit_count() {
        assert_eq!(gutter_width(1, true), 2);
        assert_eq!(gutter_width(9, true), 2);
        assert_eq!(gutter_width(10, true), 3);
        assert_eq!(gutter_width(999, true), 4);
        assert_eq!(gutter_width(0, true), 2);
        assert_eq!(gutter_width(500, false), 0);
    }

    // -- visual_line_count --------------------------------------------------

    #[test]
    fn empty_line_is_one_row() {
        assert_eq!(rows("", 10), 1);
    }

    #[test]
    fn exact_fit_does_not_wrap() {
        assert_eq!(rows("abcd", 4), 1);
        assert_eq!(rows("abcde", 4), 2);
        assert_eq!(rows("abcdefghi", 4), 3);
    }

    #[test]
    fn tab_counts_as_tab_width() {
        assert_eq!(rows("\t\tx", 6), 2);
        assert_eq!(rows("\tx", 5), 1);
        assert_eq!(visual_line_count("\t\t".chars(), 4, 2), 1);
    }

    #[test]
    fn wide_chars_take_two_columns() {
        assert_eq!(rows("日本語", 4), 2);
        assert_eq!(rows("日本", 4), 1);
    }

    #[test]
    fn over_wide_char_never_makes_an_empty_row() {
        assert_eq!(rows("\tab", 2), 2);
        assert_eq!(rows("日", 1), 1);
    }

    // -- visual_row_of_col --------------------------------------------------

    #[test]
    fn row_of_col_stops_at_cursor() {
        let line = "abcdefghij";
        assert_eq!(visual_row_of_col(line.chars(), 0, 4, 4), 0);
        assert_eq!(visual_row_of_col(line.chars(), 4, 4, 4), 0);
        assert_eq!(visual_row_of_col(line.chars(), 5, 4, 4), 1);
        assert_eq!(visual_row_of_col(line.chars(), 9, 4, 4), 2);
        assert_eq!(visual_row_of_col(line.chars(), 50, 4, 4), 2);
    }

    // -- row_starts ---------------------------------------------------------

    #[test]
    fn row_starts_follow_wrapping() {
        assert_eq!(row_starts("".chars(), 4, 4), vec![0]);
        assert_eq!(row_starts("abcdefghij".chars(), 4, 4), vec![0, 4, 8]);
        assert_eq!(row_starts("ab世cd".chars(), 3, 4), vec![0, 2, 4]);
        for text in ["", "a\tb\tc", "世界世界世", "0123456789abcdef"] {
            assert_eq!(row_starts(text.chars(), 5, 4).len(), rows(text, 5));
        }
    }

    // -- update_top ---------------------------------------------------------

    #[test]
    fn update_top_policy() {
        assert_eq!(update_top(10, 4, 5), 4);
        assert_eq!(update_top(10, 12, 5), 10);
        assert_eq!(update_top(10, 15, 5), 11);
        assert_eq!(update_top(0, 0, 0), 0);
    }

    // -- cursor_visual_offset -----------------------------------------------

    #[test]
    fn offset_sums_wrapped_lines_above() {
        // No gutter, width 4: "abcdefgh" → 2 rows, "" → 1, "xy" → 1.
        let buf = Buffer::from_lines(["abcdefgh", "", "xy"]);
        let vp = Viewport::new(4, 3).with_line_numbers(false);
        assert_eq!(vp.cursor_visual_offset(&buf, Position::new(0, 6)), 1);
        assert_eq!(vp.cursor_visual_offset(&buf, Position::new(1, 0)), 2);
        assert_eq!(vp.cursor_visual_offset(&buf, Position::new(2, 1)), 3);
    }

    #[test]
    fn gutter_narrows_text() {
        let buf = Buffer::from_lines(["abcdef"]);
        let vp = Viewport::new(6, 3);
        assert_eq!(vp.text_width(buf.line_count()), 4);
        assert_eq!(vp.cursor_visual_offset(&buf, Position::new(0, 5)), 1);
    }

    // -- scroll_to_cursor ---------------------------------------------------

    #[test]
    fn scrolls_down_to_last_row() {
        let lines: Vec<String> = (0..50).map(|i| format!("line {i}")).collect();
        let buf = Buffer::from_lines(&lines);
        let mut vp = Viewport::new(80, 10);
        assert_eq!(vp.scroll_to_cursor(&buf, Position::new(25, 0)), 16);
        assert_eq!(vp.scroll_to_cursor(&buf, Position::new(20, 0)), 16);
        assert_eq!(vp.scroll_to_cursor(&buf, Position::new(3, 0)), 3);
    }

    #[test]
    fn clamps_to_document_end() {
        let buf = Buffer::from_lines(["a", "b", "c"]);
        let mut vp = Viewport::new(80, 10);
        vp.set_top(7);
        assert_eq!(vp.scroll_to_cursor(&buf, Position::new(2, 0)), 0);
    }

    #[test]
    fn wrapped_cursor_stays_contained() {
        let long = "x".repeat(40);
        let buf = Buffer::from_lines([long.as_str(), "tail"]);
        let mut vp = Viewport::new(10, 2).with_line_numbers(false);
        for col in 0..=40 {
            let pos = Position::new(0, col);
            let top = vp.scroll_to_cursor(&buf, pos);
            let cursor = vp.cursor_visual_offset(&buf, pos);
            assert!(top <= cursor && cursor < top + 2, "col {col}: top {top}, cursor {cursor}");
        }
    }

    // -- visible_window -----------------------------------------------------

    #[test]
    fn window_maps_top_into_wrapped_line() {
        let buf = Buffer::from_lines(["abcdefgh", "ij", "kl", "mn"]);
        let mut vp = Viewport::new(4, 2).with_line_numbers(false);
        vp.set_top(1);
        assert_eq!(
            vp.visible_window(&buf),
            VisibleWindow {
                first_line: 0,
                skip_rows: 1,
                line_count: 2,
            }
        );
        vp.set_top(3);
        assert_eq!(
            vp.visible_window(&buf),
            VisibleWindow {
                first_line: 2,
                skip_rows: 0,
                line_count: 2,
            }
        );
    }
}
