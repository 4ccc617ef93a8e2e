//! Search: exact substring matching with a bad-character skip table.
//!
//! A [`Searcher`] is built once per query. It compares each window of the
//! text right to left and, on a mismatch, slides the window by the skip
//! distance of the char under the window's last slot (Horspool's variant of
//! Boyer–Moore). On a full match it records the match and jumps past it, so
//! matches never overlap: `"aa"` in `"aaaa"` matches at columns 0 and 2.
//!
//! All columns and lengths are in chars, not bytes.
//!
//! # Background search
//!
//! Large documents are searched off the control thread:
//!
//! ```text
//! editor thread                       search thread
//! ─────────────                       ─────────────
//! snapshot = buffer.snapshot()  ──▶   Searcher::new(query)
//! SearchTask::spawn(query, ..)        search_buffer(snapshot, cancel)
//! (keeps editing the live buffer)     every 1000 lines: cancelled? → stop
//! poll receiver  ◀───────────────     send SearchResults { query, matches }
//! drop results unless query is
//! still the active one
//! ```
//!
//! The snapshot is an immutable rope clone, so the live buffer can change
//! while the search runs. The results then describe a slightly older text,
//! which is why they carry their query and are checked with
//! [`SearchResults::is_current_for`] before use.

use std::borrow::Cow;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use ropey::Rope;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::buffer::{self, Buffer};
use crate::position::Position;

/// Lines searched between two looks at the cancel flag.
pub const CANCEL_CHECK_INTERVAL: usize = 1000;

// ---------------------------------------------------------------------------
// SearchMatch
// ---------------------------------------------------------------------------

/// One occurrence of the pattern: line, column and length, in chars.
///
/// Matches are produced in scan order, which is ascending (line, col).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SearchMatch {
    pub line: usize,
    pub col: usize,
    pub len: usize,
}

impl SearchMatch {
    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize, len: usize) -> Self {
        Self { line, col, len }
    }

    /// Position of the first matched char.
    #[inline]
    #[must_use]
    pub const fn start(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// Position just past the last matched char.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> Position {
        Position::new(self.line, self.col + self.len)
    }
}

// ---------------------------------------------------------------------------
// LineSource
// ---------------------------------------------------------------------------

/// Anything that can be searched line by line.
///
/// Lines are handed out without their line break.
pub trait LineSource {
    fn line_count(&self) -> usize;
    fn line_at(&self, row: usize) -> Cow<'_, str>;
}

impl LineSource for Buffer {
    fn line_count(&self) -> usize {
        Self::line_count(self)
    }

    fn line_at(&self, row: usize) -> Cow<'_, str> {
        self.line(row).map_or(Cow::Borrowed(""), Cow::from)
    }
}

impl LineSource for Rope {
    fn line_count(&self) -> usize {
        self.len_lines()
    }

    fn line_at(&self, row: usize) -> Cow<'_, str> {
        buffer::line_content(self, row).map_or(Cow::Borrowed(""), Cow::from)
    }
}

impl<S: AsRef<str>> LineSource for [S] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_at(&self, row: usize) -> Cow<'_, str> {
        Cow::Borrowed(self.get(row).map_or("", |line| line.as_ref()))
    }
}

impl<S: AsRef<str>> LineSource for Vec<S> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_at(&self, row: usize) -> Cow<'_, str> {
        self.as_slice().line_at(row)
    }
}

impl<S: AsRef<str>, const N: usize> LineSource for [S; N] {
    fn line_count(&self) -> usize {
        N
    }

    fn line_at(&self, row: usize) -> Cow<'_, str> {
        self.as_slice().line_at(row)
    }
}

// ---------------------------------------------------------------------------
// CancelToken
// ---------------------------------------------------------------------------

/// A shared, cooperative cancel flag.
///
/// Cancelling only sets the flag. The search notices at its next check and
/// returns early with no results.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Searcher
// ---------------------------------------------------------------------------

/// A compiled query: the pattern's chars and its bad-character skip table.
#[derive(Debug, Clone)]
pub struct Searcher {
    pattern: Vec<char>,
    /// Shift for chars that occur in the pattern (last char excluded).
    /// Anything else shifts by the full pattern length.
    skip: FxHashMap<char, usize>,
}

impl Searcher {
    /// Build the skip table for `pattern`.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let pattern: Vec<char> = pattern.chars().collect();
        let m = pattern.len();
        let mut skip = FxHashMap::default();
        for (i, &ch) in pattern.iter().enumerate().take(m.saturating_sub(1)) {
            skip.insert(ch, m - 1 - i);
        }
        Self { pattern, skip }
    }

    /// Pattern length in chars.
    #[inline]
    #[must_use]
    pub fn pattern_len(&self) -> usize {
        self.pattern.len()
    }

    /// True for the empty pattern, which matches nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// How far to slide the window when `ch` sits under its last slot.
    #[inline]
    fn shift(&self, ch: char) -> usize {
        self.skip.get(&ch).copied().unwrap_or(self.pattern.len())
    }

    /// Start columns of every non-overlapping match in `text`.
    fn match_cols(&self, text: &[char]) -> Vec<usize> {
        let m = self.pattern.len();
        let mut cols = Vec::new();
        if m == 0 || text.len() < m {
            return cols;
        }

        // `i` is the text index under the window's last slot.
        let mut i = m - 1;
        while i < text.len() {
            let mut matched = 0;
            while matched < m && text[i - matched] == self.pattern[m - 1 - matched] {
                matched += 1;
            }
            if matched == m {
                cols.push(i + 1 - m);
                i += m;
            } else {
                i += self.shift(text[i]).max(1);
            }
        }
        cols
    }

    /// All matches within one line, tagged with `row`.
    #[must_use]
    pub fn search_line(&self, row: usize, text: &str) -> Vec<SearchMatch> {
        if self.is_empty() {
            return Vec::new();
        }
        let chars: Vec<char> = text.chars().collect();
        let len = self.pattern.len();
        self.match_cols(&chars)
            .into_iter()
            .map(|col| SearchMatch::new(row, col, len))
            .collect()
    }

    /// True if `text` contains the pattern at least once.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        !self.search_line(0, text).is_empty()
    }

    /// All matches over every line, in (line, col) order.
    ///
    /// `cancel` is checked every [`CANCEL_CHECK_INTERVAL`] lines; once it is
    /// set the scan stops and returns no matches at all.
    #[must_use]
    pub fn search_buffer<L: LineSource + ?Sized>(
        &self,
        lines: &L,
        cancel: &CancelToken,
    ) -> Vec<SearchMatch> {
        if self.is_empty() {
            return Vec::new();
        }
        let mut matches = Vec::new();
        for row in 0..lines.line_count() {
            if row % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                return Vec::new();
            }
            matches.extend(self.search_line(row, &lines.line_at(row)));
        }
        matches
    }

    /// [`search_buffer`](Self::search_buffer) without a cancel flag.
    #[must_use]
    pub fn search_all<L: LineSource + ?Sized>(&self, lines: &L) -> Vec<SearchMatch> {
        self.search_buffer(lines, &CancelToken::new())
    }
}

// ---------------------------------------------------------------------------
// Background search
// ---------------------------------------------------------------------------

/// Matches from a background search, tagged with the query that made them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResults {
    pub query: String,
    pub matches: Vec<SearchMatch>,
}

impl SearchResults {
    /// The staleness check: results are usable only while their query is
    /// still the active one.
    #[must_use]
    pub fn is_current_for(&self, active_query: &str) -> bool {
        self.query == active_query
    }
}

/// A search running on its own thread over a rope snapshot.
///
/// Results arrive on the channel passed to [`spawn`](Self::spawn). A task
/// that is cancelled before it finishes sends nothing. Dropping the task
/// cancels it and waits for the thread to notice.
pub struct SearchTask {
    query: String,
    cancel: CancelToken,
    handle: Option<JoinHandle<()>>,
}

impl SearchTask {
    /// Start searching `snapshot` for `query`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn(
        query: impl Into<String>,
        snapshot: Rope,
        sender: Sender<SearchResults>,
    ) -> io::Result<Self> {
        let query = query.into();
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let thread_query = query.clone();

        let handle = thread::Builder::new()
            .name("quill-search".into())
            .spawn(move || {
                let matches = Searcher::new(&thread_query).search_buffer(&snapshot, &token);
                if token.is_cancelled() {
                    debug!(query = %thread_query, "background search cancelled");
                    return;
                }
                debug!(query = %thread_query, matches = matches.len(), "background search done");
                // The receiver may be gone if the editor shut down meanwhile.
                let _ = sender.send(SearchResults {
                    query: thread_query,
                    matches,
                });
            })?;

        Ok(Self {
            query,
            cancel,
            handle: Some(handle),
        })
    }

    /// The query this task is searching for.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Ask the thread to stop. Returns immediately.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// True once the thread has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Cancel and wait for the thread to exit. Idempotent.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SearchTask {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for SearchTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchTask")
            .field("query", &self.query)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::mpsc;
    use std::time::Duration;

    fn cols(pattern: &str, text: &str) -> Vec<usize> {
        Searcher::new(pattern)
            .search_line(0, text)
            .into_iter()
            .map(|m| m.col)
            .collect()
    }

    // -- Skip table ---------------------------------------------------------

    #[test]
    fn skip_table_excludes_last_char() {
        let s = Searcher::new("abcb");
        assert_eq!(s.shift('a'), 3);
        assert_eq!(s.shift('b'), 2);
        assert_eq!(s.shift('c'), 1);
        assert_eq!(s.shift('z'), 4);
    }

    #[test]
    fn single_char_pattern_shifts_by_one() {
        let s = Searcher::new("x");
        assert_eq!(s.shift('x'), 1);
        assert_eq!(cols("x", "axbxx"), vec![1, 3, 4]);
    }

    // -- search_line --------------------------------------------------------

    #[test]
    fn finds_all_occurrences() {
        assert_eq!(cols("test", "This is a test line"), vec![10]);
        assert_eq!(cols("ab", "ab ab xab"), vec![0, 3, 7]);
    }

    #[test]
    fn matches_do_not_overlap() {
        let found = Searcher::new("aa").search_line(0, "aaaa");
        assert_eq!(found, vec![SearchMatch::new(0, 0, 2), SearchMatch::new(0, 2, 2)]);
        assert_eq!(cols("aba", "ababa"), vec![0]);
    }

    #[test]
    fn empty_pattern_and_short_text() {
        assert!(cols("", "anything").is_empty());
        assert!(cols("long", "lon").is_empty());
        assert!(cols("x", "").is_empty());
    }

    #[test]
    fn columns_are_chars_not_bytes() {
        assert_eq!(cols("日本", "こんにちは日本語日本"), vec![5, 8]);
        assert_eq!(cols("é", "café é"), vec![3, 5]);
    }

    #[test]
    fn is_match_reports_presence() {
        let s = Searcher::new("needle");
        assert!(s.is_match("haystack with needle"));
        assert!(!s.is_match("haystack"));
    }

    // -- search_buffer ------------------------------------------------------

    #[test]
    fn buffer_scan_orders_by_line_then_col() {
        let lines = ["This is a test line", "Another line", "test case here"];
        let found = Searcher::new("test").search_all(&lines);
        assert_eq!(
            found,
            vec![SearchMatch::new(0, 10, 4), SearchMatch::new(2, 0, 4)]
        );
    }

    #[test]
    fn all_line_sources_agree() {
        let text = "one fish\ntwo fish\nred fish";
        let buf = Buffer::from_text(text);
        let rope = Rope::from_str(text);
        let lines: Vec<String> = text.lines().map(String::from).collect();
        let s = Searcher::new("fish");
        let expected = s.search_all(&lines);
        assert_eq!(expected.len(), 3);
        assert_eq!(s.search_all(&buf), expected);
        assert_eq!(s.search_all(&rope), expected);
        assert_eq!(s.search_all(lines.as_slice()), expected);
    }

    #[test]
    fn match_never_spans_line_break() {
        let buf = Buffer::from_lines(["ab", "cd"]);
        assert!(Searcher::new("bc").search_all(&buf).is_empty());
        assert!(Searcher::new("b\nc").search_all(&buf).is_empty());
    }

    #[test]
    fn cancelled_search_returns_nothing() {
        let lines = vec!["hit"; 10];
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(Searcher::new("hit").search_buffer(&lines, &cancel).is_empty());
    }

    #[test]
    fn match_endpoints() {
        let m = SearchMatch::new(3, 4, 5);
        assert_eq!(m.start(), Position::new(3, 4));
        assert_eq!(m.end(), Position::new(3, 9));
    }

    // -- Background search --------------------------------------------------

    #[test]
    fn task_delivers_results_with_query() {
        let (tx, rx) = mpsc::channel();
        let rope = Rope::from_str("alpha\nbeta alpha\n");
        let mut task = SearchTask::spawn("alpha", rope, tx).unwrap();
        let results = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        task.stop();

        assert_eq!(results.query, "alpha");
        assert_eq!(
            results.matches,
            vec![SearchMatch::new(0, 0, 5), SearchMatch::new(1, 5, 5)]
        );
        assert!(results.is_current_for("alpha"));
        assert!(!results.is_current_for("alph"));
    }

    #[test]
    fn snapshot_is_isolated_from_live_edits() {
        let (tx, rx) = mpsc::channel();
        let mut buf = Buffer::from_lines(["find me"]);
        let task = SearchTask::spawn("find", buf.snapshot(), tx).unwrap();
        buf.delete_range(Position::ZERO, Position::new(0, 7));
        let results = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        drop(task);
        assert_eq!(results.matches, vec![SearchMatch::new(0, 0, 4)]);
    }

    #[test]
    fn stop_is_idempotent() {
        let (tx, _rx) = mpsc::channel();
        let mut task = SearchTask::spawn("x", Rope::from_str("x"), tx).unwrap();
        task.stop();
        task.stop();
        assert!(task.is_finished());
        assert_eq!(task.query(), "x");
    }
}
