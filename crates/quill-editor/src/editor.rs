//! Editor: the session a host drives with named operations.
//!
//! An [`Editor`] owns one [`Document`], its [`Viewport`], the current
//! [`InteractionMode`] and the prompt behind it, the status line, the
//! interactive search state and the replace controller. The host translates
//! its key and resize events into calls on this type, renders from its
//! accessors, and performs the file I/O the editor asks for through
//! [`HostRequest`].
//!
//! Document edits apply only while idle. With a prompt, the help overlay or
//! a replace flow open they are ignored, so the text a replace is stepping
//! through cannot change under it.
//!
//! After every edit or cursor motion the viewport is scrolled so the cursor
//! stays visible, and an active search is run again so its matches describe
//! the current text.
//!
//! # Background search
//!
//! Documents of [`ASYNC_SEARCH_LINES`] lines or more are searched on a worker
//! thread. The host calls [`poll_search_results`](Editor::poll_search_results)
//! from its event loop; results whose query is no longer the active one are
//! dropped there.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, info, warn};

use crate::buffer::Buffer;
use crate::config::EditorConfig;
use crate::cursor::Motion;
use crate::document::Document;
use crate::mode::{InteractionMode, ReplaceStep};
use crate::position::{Position, Range};
use crate::prompt::{self, Prompt};
use crate::replace::{ReplaceController, ReplaceOutcome};
use crate::search::{SearchMatch, SearchResults, SearchTask, Searcher};
use crate::viewport::{Viewport, VisibleWindow};

/// Documents with at least this many lines are searched in the background.
pub const ASYNC_SEARCH_LINES: usize = 10_000;

// ---------------------------------------------------------------------------
// Host boundary
// ---------------------------------------------------------------------------

/// I/O the editor needs the host to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    /// Write the buffer (`Buffer::text_with_line_endings`) to this path,
    /// then report back with [`Editor::finish_save`].
    Save(PathBuf),
    /// Read this file and hand it over with [`Editor::open_document`].
    Open(PathBuf),
    /// Run the file finder with this query.
    Finder(String),
}

/// One line of feedback for the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

// ---------------------------------------------------------------------------
// Search session
// ---------------------------------------------------------------------------

/// The interactive search: active query, its matches, and where the cursor
/// was when the search prompt opened.
#[derive(Debug, Default)]
struct SearchSession {
    query: String,
    matches: Vec<SearchMatch>,
    current: Option<usize>,
    saved_cursor: Position,
    saved_top: usize,
    /// The prompt was submitted while a background search was running;
    /// report the match count when its results arrive.
    report_on_arrival: bool,
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

/// A single-document editing session.
pub struct Editor {
    doc: Document,
    viewport: Viewport,
    mode: InteractionMode,
    prompt: Prompt,
    status: Option<Status>,
    search: SearchSession,
    replace: ReplaceController,
    search_task: Option<SearchTask>,
    results_tx: Sender<SearchResults>,
    results_rx: Receiver<SearchResults>,
    theme: String,
}

impl Editor {
    /// An editor with an empty document and a pane of `width` x `height`.
    #[must_use]
    pub fn new(config: &EditorConfig, width: usize, height: usize) -> Self {
        let (results_tx, results_rx) = mpsc::channel();
        Self {
            doc: Document::default().with_indent_width(config.indent_width),
            viewport: Viewport::new(width, height)
                .with_tab_width(config.tab_width)
                .with_line_numbers(config.line_numbers),
            mode: InteractionMode::Idle,
            prompt: Prompt::new(),
            status: None,
            search: SearchSession::default(),
            replace: ReplaceController::new(),
            search_task: None,
            results_tx,
            results_rx,
            theme: config.theme.clone(),
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.doc
    }

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        self.doc.buffer()
    }

    #[inline]
    #[must_use]
    pub const fn cursor_position(&self) -> Position {
        self.doc.cursor().position()
    }

    /// The active selection, ordered.
    #[must_use]
    pub fn selection(&self) -> Option<Range> {
        self.doc.cursor().selection()
    }

    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The logical lines the renderer should draw.
    #[must_use]
    pub fn visible_window(&self) -> VisibleWindow {
        self.viewport.visible_window(self.doc.buffer())
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> InteractionMode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub const fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    /// The label for the current prompt, `None` when no prompt is open.
    #[must_use]
    pub fn prompt_label(&self) -> Option<String> {
        self.mode.prompt_label(self.doc.buffer().line_count())
    }

    #[inline]
    #[must_use]
    pub const fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// The active search query (empty when none).
    #[inline]
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search.query
    }

    /// Matches to highlight: the replace flow's while it is stepping, the
    /// interactive search's otherwise.
    #[must_use]
    pub fn search_matches(&self) -> &[SearchMatch] {
        if self.replace.current_match().is_some() {
            self.replace.matches()
        } else {
            &self.search.matches
        }
    }

    /// The match the cursor was last moved to.
    #[must_use]
    pub fn current_match(&self) -> Option<SearchMatch> {
        self.replace
            .current_match()
            .or_else(|| self.search.current.and_then(|i| self.search.matches.get(i).copied()))
    }

    #[inline]
    #[must_use]
    pub const fn replace_controller(&self) -> &ReplaceController {
        &self.replace
    }

    /// Theme name from the config, for the renderer.
    #[inline]
    #[must_use]
    pub fn theme(&self) -> &str {
        &self.theme
    }

    // -- Status -------------------------------------------------------------

    fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            is_error: false,
        });
    }

    fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            is_error: true,
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    // -- Editing ------------------------------------------------------------

    /// Edits are ignored outside `Idle`.
    const fn editable(&self) -> bool {
        self.mode.is_idle()
    }

    /// Type a character: into the prompt when one is open, into the
    /// document when idle. Ignored while stepping a replace or showing help.
    pub fn type_char(&mut self, ch: char) {
        match self.mode {
            InteractionMode::Idle => self.insert_char(ch),
            InteractionMode::Saving
            | InteractionMode::Loading
            | InteractionMode::Searching
            | InteractionMode::Finding
            | InteractionMode::GoToLine
            | InteractionMode::Replacing {
                step: ReplaceStep::Find | ReplaceStep::Replacement,
            } => self.prompt_input(ch),
            InteractionMode::Replacing {
                step: ReplaceStep::Confirm,
            }
            | InteractionMode::Help => {}
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        if !self.editable() {
            return;
        }
        self.doc.insert_char(ch);
        self.after_edit();
    }

    /// Paste text from the host clipboard.
    pub fn insert_text_at_cursor(&mut self, text: &str) {
        if !self.editable() {
            return;
        }
        self.doc.insert_text_at_cursor(text);
        self.after_edit();
    }

    pub fn insert_newline(&mut self) {
        if !self.editable() {
            return;
        }
        self.doc.insert_newline();
        self.after_edit();
    }

    pub fn backspace(&mut self) {
        if self.editable() && self.doc.backspace() {
            self.after_edit();
        }
    }

    pub fn delete_forward(&mut self) {
        if self.editable() && self.doc.delete_forward() {
            self.after_edit();
        }
    }

    pub fn indent(&mut self) {
        if !self.editable() {
            return;
        }
        self.doc.indent();
        self.after_edit();
    }

    pub fn dedent(&mut self) {
        if self.editable() && self.doc.dedent() {
            self.after_edit();
        }
    }

    pub fn delete_selection(&mut self) {
        if self.editable() && self.doc.delete_selection().is_some() {
            self.after_edit();
        }
    }

    /// The selected text, for the host to copy to the clipboard.
    #[must_use]
    pub fn extract_selected_text(&self) -> Option<String> {
        self.doc.extract_selected_text()
    }

    /// Remove the selection and hand its text to the host clipboard.
    pub fn cut_selection(&mut self) -> Option<String> {
        if !self.editable() {
            return None;
        }
        let text = self.doc.cut_selection()?;
        self.after_edit();
        Some(text)
    }

    pub fn undo(&mut self) {
        if !self.editable() {
            return;
        }
        if self.doc.undo() {
            self.set_status("Undid change");
            self.after_edit();
        } else {
            self.set_status("Nothing to undo");
        }
    }

    pub fn redo(&mut self) {
        if !self.editable() {
            return;
        }
        if self.doc.redo() {
            self.set_status("Redid change");
            self.after_edit();
        } else {
            self.set_status("Nothing to redo");
        }
    }

    // -- Motion -------------------------------------------------------------

    /// Move the cursor; `extend` grows the selection (Shift held).
    pub fn move_cursor(&mut self, motion: Motion, extend: bool) {
        self.doc.move_cursor(motion, extend);
        self.scroll_to_cursor();
    }

    pub fn select_all(&mut self) {
        self.doc.select_all();
        self.scroll_to_cursor();
    }

    /// Jump to a 0-indexed line.
    pub fn goto_line(&mut self, line: usize) {
        self.doc.goto_line(line);
        self.scroll_to_cursor();
    }

    /// The host's pane changed size.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.viewport.resize(width, height);
        self.scroll_to_cursor();
    }

    fn scroll_to_cursor(&mut self) {
        let pos = self.doc.cursor().position();
        self.viewport.scroll_to_cursor(self.doc.buffer(), pos);
    }

    fn after_edit(&mut self) {
        if !self.search.query.is_empty() {
            self.refresh_search();
        }
        self.scroll_to_cursor();
    }

    // -- Prompts ------------------------------------------------------------

    fn open_prompt(&mut self, mode: InteractionMode, text: &str) {
        self.mode = mode;
        self.prompt = Prompt::with_text(text);
        self.clear_status();
    }

    /// Ask for a file name to save under, pre-filled with the current path.
    pub fn begin_save(&mut self) {
        let current = self
            .doc
            .buffer()
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.open_prompt(InteractionMode::Saving, &current);
    }

    pub fn begin_open(&mut self) {
        self.open_prompt(InteractionMode::Loading, "");
    }

    /// Start an incremental search. Cancelling returns the cursor and the
    /// scroll position to where they are now.
    pub fn begin_search(&mut self) {
        self.search.saved_cursor = self.doc.cursor().position();
        self.search.saved_top = self.viewport.top();
        let previous = self.search.query.clone();
        self.open_prompt(InteractionMode::Searching, &previous);
    }

    pub fn begin_replace(&mut self) {
        self.replace.start();
        self.open_prompt(
            InteractionMode::Replacing {
                step: ReplaceStep::Find,
            },
            "",
        );
    }

    pub fn begin_finder(&mut self) {
        self.open_prompt(InteractionMode::Finding, "");
    }

    pub fn begin_goto_line(&mut self) {
        self.open_prompt(InteractionMode::GoToLine, "");
    }

    /// Show the help overlay, or hide it if shown. Ignored while a prompt or
    /// replace flow is open.
    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            InteractionMode::Idle => InteractionMode::Help,
            InteractionMode::Help => InteractionMode::Idle,
            other => other,
        };
    }

    /// Type into the open prompt. Searching updates matches as you type.
    pub fn prompt_input(&mut self, ch: char) {
        if !self.mode.accepts_text_input() {
            return;
        }
        self.prompt.insert_char(ch);
        self.prompt_changed();
    }

    /// Paste into the open prompt.
    pub fn prompt_paste(&mut self, text: &str) {
        if !self.mode.accepts_text_input() {
            return;
        }
        self.prompt.insert_str(text);
        self.prompt_changed();
    }

    pub fn prompt_backspace(&mut self) {
        if self.mode.accepts_text_input() && self.prompt.backspace() {
            self.prompt_changed();
        }
    }

    pub fn prompt_left(&mut self) {
        self.prompt.move_left();
    }

    pub fn prompt_right(&mut self) {
        self.prompt.move_right();
    }

    fn prompt_changed(&mut self) {
        if self.mode == InteractionMode::Searching {
            self.search.query = self.prompt.input().to_owned();
            if self.search.query.is_empty() {
                self.clear_search_matches();
                self.doc.set_cursor(self.search.saved_cursor);
                self.scroll_to_cursor();
            } else {
                self.refresh_search();
            }
        }
    }

    /// Submit the open prompt. Returns the I/O the host should perform, if
    /// any.
    pub fn prompt_submit(&mut self) -> Option<HostRequest> {
        let input = self.prompt.take();
        match self.mode {
            InteractionMode::Saving => {
                self.mode = InteractionMode::Idle;
                if input.trim().is_empty() {
                    self.set_error("No file name given");
                    return None;
                }
                info!(path = %input, "save requested");
                Some(HostRequest::Save(PathBuf::from(input)))
            }
            InteractionMode::Loading => {
                self.mode = InteractionMode::Idle;
                if input.trim().is_empty() {
                    self.set_error("No file name given");
                    return None;
                }
                info!(path = %input, "open requested");
                Some(HostRequest::Open(PathBuf::from(input)))
            }
            InteractionMode::Finding => {
                self.mode = InteractionMode::Idle;
                Some(HostRequest::Finder(input))
            }
            InteractionMode::Searching => {
                self.mode = InteractionMode::Idle;
                if self.search.query.is_empty() {
                    self.clear_search_matches();
                } else if self.search_task.is_some() {
                    self.search.report_on_arrival = true;
                    self.set_status("Searching...");
                } else {
                    self.report_match_count();
                }
                None
            }
            InteractionMode::Replacing {
                step: ReplaceStep::Find,
            } => {
                let outcome = self.replace.submit_find(&input, &self.doc);
                self.handle_replace_outcome(outcome);
                None
            }
            InteractionMode::Replacing {
                step: ReplaceStep::Replacement,
            } => {
                let outcome = self.replace.submit_replacement(&input, &mut self.doc);
                self.handle_replace_outcome(outcome);
                None
            }
            InteractionMode::GoToLine => {
                self.mode = InteractionMode::Idle;
                let line_count = self.doc.buffer().line_count();
                match prompt::parse_line_number(&input, line_count) {
                    Some(line) => self.goto_line(line),
                    None => self.set_error(format!("Invalid line number: {}", input.trim())),
                }
                None
            }
            InteractionMode::Idle
            | InteractionMode::Help
            | InteractionMode::Replacing {
                step: ReplaceStep::Confirm,
            } => None,
        }
    }

    /// Escape: leave whatever mode is active. A search restores the cursor
    /// and scroll position from before it started. In plain editing this
    /// drops the selection and search highlights.
    pub fn cancel(&mut self) {
        match self.mode {
            InteractionMode::Searching => {
                self.clear_search_matches();
                self.search.query.clear();
                self.doc.set_cursor(self.search.saved_cursor);
                self.viewport.set_top(self.search.saved_top);
            }
            InteractionMode::Replacing { .. } => {
                self.replace.cancel();
                self.set_status("Replace cancelled");
            }
            InteractionMode::Idle => {
                let pos = self.doc.cursor().position();
                self.doc.set_cursor(pos);
                self.clear_search_matches();
                self.search.query.clear();
            }
            InteractionMode::Saving
            | InteractionMode::Loading
            | InteractionMode::Finding
            | InteractionMode::GoToLine
            | InteractionMode::Help => {}
        }
        self.mode = InteractionMode::Idle;
        self.prompt.clear();
    }

    // -- Search navigation --------------------------------------------------

    /// Move to the first match after the cursor, wrapping to the first.
    pub fn next_match(&mut self) {
        let cursor = self.doc.cursor().position();
        let index = self
            .search
            .matches
            .iter()
            .position(|m| m.start() > cursor)
            .or_else(|| (!self.search.matches.is_empty()).then_some(0));
        self.jump_to_search_match(index);
    }

    /// Move to the last match before the cursor, wrapping to the last.
    pub fn prev_match(&mut self) {
        let cursor = self.doc.cursor().position();
        let index = self
            .search
            .matches
            .iter()
            .rposition(|m| m.start() < cursor)
            .or_else(|| self.search.matches.len().checked_sub(1));
        self.jump_to_search_match(index);
    }

    fn jump_to_search_match(&mut self, index: Option<usize>) {
        let Some(i) = index else {
            if self.search.query.is_empty() {
                self.set_status("No search query");
            } else {
                self.set_status("No matches");
            }
            return;
        };
        self.search.current = Some(i);
        let m = self.search.matches[i];
        self.doc.set_cursor(m.start());
        self.scroll_to_cursor();
        self.set_status(format!("Match {} of {}", i + 1, self.search.matches.len()));
    }

    /// During an incremental search, jump to the first match at or after
    /// the cursor position the search started from.
    fn jump_from_search_origin(&mut self) {
        let origin = self.search.saved_cursor;
        let index = self
            .search
            .matches
            .iter()
            .position(|m| m.start() >= origin)
            .or_else(|| (!self.search.matches.is_empty()).then_some(0));
        self.search.current = index;
        let target = index.map_or(origin, |i| self.search.matches[i].start());
        self.doc.set_cursor(target);
        self.scroll_to_cursor();
    }

    fn clear_search_matches(&mut self) {
        if let Some(mut task) = self.search_task.take() {
            task.stop();
        }
        self.search.matches.clear();
        self.search.current = None;
        self.search.report_on_arrival = false;
    }

    fn report_match_count(&mut self) {
        match self.search.matches.len() {
            0 => self.set_status("No matches"),
            n => self.set_status(format!("{n} matches")),
        }
    }

    // -- Background search --------------------------------------------------

    /// Run the active query again: inline for small documents, on a worker
    /// thread for large ones.
    fn refresh_search(&mut self) {
        let query = self.search.query.clone();
        if self.doc.buffer().line_count() >= ASYNC_SEARCH_LINES {
            self.search_async(&query);
        } else {
            let matches = Searcher::new(&query).search_all(self.doc.buffer());
            self.install_matches(matches);
        }
    }

    fn install_matches(&mut self, matches: Vec<SearchMatch>) {
        self.search.matches = matches;
        self.search.current = None;
        if self.mode == InteractionMode::Searching {
            self.jump_from_search_origin();
        }
    }

    /// Make `query` the active query and search a snapshot of the buffer on
    /// a worker thread. A search already in flight is cancelled. If no
    /// thread can be spawned the search runs inline instead.
    pub fn search_async(&mut self, query: &str) {
        query.clone_into(&mut self.search.query);
        if let Some(mut previous) = self.search_task.take() {
            previous.stop();
        }
        if query.is_empty() {
            self.clear_search_matches();
            return;
        }

        let snapshot = self.doc.buffer().snapshot();
        match SearchTask::spawn(query, snapshot, self.results_tx.clone()) {
            Ok(task) => {
                debug!(query, "background search started");
                self.search_task = Some(task);
            }
            Err(err) => {
                warn!(error = %err, "could not spawn search thread, searching inline");
                let matches = Searcher::new(query).search_all(self.doc.buffer());
                self.install_matches(matches);
            }
        }
    }

    /// Drain finished background searches. Returns true if any result was
    /// applied.
    pub fn poll_search_results(&mut self) -> bool {
        let mut applied = false;
        while let Ok(results) = self.results_rx.try_recv() {
            applied |= self.apply_search_results(results);
        }
        if self.search_task.as_ref().is_some_and(SearchTask::is_finished) {
            self.search_task = None;
        }
        applied
    }

    /// Install background results, unless their query is no longer the
    /// active one. Returns whether they were used.
    pub fn apply_search_results(&mut self, results: SearchResults) -> bool {
        if !results.is_current_for(&self.search.query) {
            debug!(stale = %results.query, active = %self.search.query, "dropping stale search results");
            return false;
        }
        self.install_matches(results.matches);
        if std::mem::take(&mut self.search.report_on_arrival) {
            self.report_match_count();
        }
        true
    }

    /// True while a background search is running.
    #[must_use]
    pub fn search_in_flight(&self) -> bool {
        self.search_task.as_ref().is_some_and(|t| !t.is_finished())
    }

    // -- Replace ------------------------------------------------------------

    /// Replace the current match and move to the next.
    pub fn replace_confirm(&mut self) {
        let outcome = self.replace.confirm(&mut self.doc);
        self.handle_replace_outcome(outcome);
    }

    /// Leave the current match and move to the next.
    pub fn replace_skip(&mut self) {
        let outcome = self.replace.skip(&mut self.doc);
        self.handle_replace_outcome(outcome);
    }

    fn handle_replace_outcome(&mut self, outcome: ReplaceOutcome) {
        match outcome {
            ReplaceOutcome::Prompt(step) => {
                self.mode = InteractionMode::Replacing { step };
                self.prompt.clear();
            }
            ReplaceOutcome::Jumped(m) => {
                self.mode = InteractionMode::Replacing {
                    step: ReplaceStep::Confirm,
                };
                let total = self.replace.matches().len();
                let index = self
                    .replace
                    .matches()
                    .iter()
                    .position(|candidate| *candidate == m)
                    .map_or(0, |i| i + 1);
                self.set_status(format!("Replace match {index} of {total}? (confirm / skip)"));
            }
            ReplaceOutcome::NoMatches => {
                self.mode = InteractionMode::Idle;
                self.set_status("No matches");
            }
            ReplaceOutcome::EmptyQuery => {
                self.mode = InteractionMode::Idle;
                self.set_status("Empty search query");
            }
            ReplaceOutcome::Done { replaced } => {
                self.mode = InteractionMode::Idle;
                self.set_status(format!("Done: {replaced} replaced"));
            }
            ReplaceOutcome::Cancelled => {
                self.mode = InteractionMode::Idle;
                self.set_status("Replace cancelled");
            }
            ReplaceOutcome::Ignored => {}
        }
        if !self.search.query.is_empty() {
            self.refresh_search();
        }
        self.scroll_to_cursor();
    }

    // -- Collaborator hooks -------------------------------------------------

    /// Replace the document with text the host read from disk. The cursor
    /// starts at `cursor_row` (0-indexed, clamped), as when jumping to a
    /// grep hit.
    pub fn open_document(&mut self, text: &str, path: Option<PathBuf>, cursor_row: usize) {
        let mut buffer = Buffer::from_text(text);
        if let Some(path) = path {
            buffer.set_path(path);
        }
        let name = buffer
            .path()
            .map_or_else(|| "[new]".to_owned(), |p| p.display().to_string());
        info!(file = %name, lines = buffer.line_count(), "document opened");

        self.doc.reset(buffer, cursor_row);
        self.replace.cancel();
        self.clear_search_matches();
        self.search.query.clear();
        self.mode = InteractionMode::Idle;
        self.prompt.clear();
        self.viewport.set_top(0);
        self.scroll_to_cursor();
        self.set_status(format!("Opened {name}"));
    }

    /// The host finished a save it was asked for. On success the buffer
    /// takes the path and is marked unmodified.
    pub fn finish_save(&mut self, path: PathBuf, result: Result<(), String>) {
        match result {
            Ok(()) => {
                info!(path = %path.display(), "saved");
                self.set_status(format!("Saved {}", path.display()));
                let buffer = self.doc.buffer_mut();
                buffer.set_path(path);
                buffer.mark_saved();
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "save failed");
                self.set_error(format!("Error saving {}: {err}", path.display()));
            }
        }
    }

    /// A collaborator (file I/O, finder, preview renderer) failed. The
    /// message is shown; the document is untouched.
    pub fn report_collaborator_error(&mut self, message: &str) {
        warn!(message, "collaborator error");
        self.set_error(message);
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("doc", &self.doc)
            .field("mode", &self.mode)
            .field("top", &self.viewport.top())
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
