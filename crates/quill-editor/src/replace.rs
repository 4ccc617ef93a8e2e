//! Interactive find/replace, one match at a time.
//!
//! ```text
//!          start            submit_find          submit_replacement
//!   Idle ────────▶ AwaitingFind ───────▶ AwaitingReplacement ───────▶ Stepping
//!    ▲                  │ empty / no match        │ no match           │  ▲
//!    │                  ▼                         ▼                    │  │ confirm / skip
//!    └───────────────── Idle ◀──────────────── Idle ◀── no match left ─┘──┘
//!
//!   cancel: any state ──▶ Idle
//! ```
//!
//! `confirm` replaces the current match with two recorded ops (delete the
//! match, insert the replacement), so each replacement undoes in two steps.
//! Edits shift every later match, so the match list is searched again after
//! each replacement rather than index-advanced. The flow ends when no match
//! is left; it never loops on its own.

use tracing::debug;

use crate::document::Document;
use crate::mode::ReplaceStep;
use crate::position::Position;
use crate::search::{SearchMatch, Searcher};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Where the controller is in the flow.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplaceState {
    #[default]
    Idle,
    AwaitingFind,
    AwaitingReplacement,
    Stepping,
}

/// What a controller call did, for the editor to turn into status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// The flow advanced and now waits for the given prompt.
    Prompt(ReplaceStep),
    /// The cursor was moved to this match, which awaits confirm or skip.
    Jumped(SearchMatch),
    /// The query matches nothing; the flow is over.
    NoMatches,
    /// An empty query was submitted; the flow is over.
    EmptyQuery,
    /// The last match was replaced; the flow is over.
    Done { replaced: usize },
    /// The user cancelled.
    Cancelled,
    /// The call does not apply in the current state.
    Ignored,
}

// ---------------------------------------------------------------------------
// ReplaceController
// ---------------------------------------------------------------------------

/// State machine driving find-all / replace-one-at-a-time.
#[derive(Debug, Default, Clone)]
pub struct ReplaceController {
    state: ReplaceState,
    query: String,
    replacement: String,
    matches: Vec<SearchMatch>,
    current: usize,
    replaced: usize,
}

impl ReplaceController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn state(&self) -> ReplaceState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[inline]
    #[must_use]
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Matches of the query in the current text (empty outside `Stepping`).
    #[inline]
    #[must_use]
    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    /// The match awaiting confirm or skip.
    #[must_use]
    pub fn current_match(&self) -> Option<SearchMatch> {
        match self.state {
            ReplaceState::Stepping => self.matches.get(self.current).copied(),
            _ => None,
        }
    }

    /// The prompt step the editor mode should show, `None` when idle.
    #[must_use]
    pub const fn step(&self) -> Option<ReplaceStep> {
        match self.state {
            ReplaceState::Idle => None,
            ReplaceState::AwaitingFind => Some(ReplaceStep::Find),
            ReplaceState::AwaitingReplacement => Some(ReplaceStep::Replacement),
            ReplaceState::Stepping => Some(ReplaceStep::Confirm),
        }
    }

    // -- Transitions --------------------------------------------------------

    /// Begin a new flow. Any flow in progress is discarded.
    pub fn start(&mut self) -> ReplaceOutcome {
        self.reset();
        self.state = ReplaceState::AwaitingFind;
        ReplaceOutcome::Prompt(ReplaceStep::Find)
    }

    /// Store the query. An empty query, or one that matches nothing, ends
    /// the flow.
    pub fn submit_find(&mut self, query: &str, doc: &Document) -> ReplaceOutcome {
        if self.state != ReplaceState::AwaitingFind {
            return ReplaceOutcome::Ignored;
        }
        if query.is_empty() {
            self.reset();
            return ReplaceOutcome::EmptyQuery;
        }
        if Searcher::new(query).search_all(doc.buffer()).is_empty() {
            debug!(query, "replace: nothing to find");
            self.reset();
            return ReplaceOutcome::NoMatches;
        }
        query.clone_into(&mut self.query);
        self.state = ReplaceState::AwaitingReplacement;
        ReplaceOutcome::Prompt(ReplaceStep::Replacement)
    }

    /// Store the replacement, search once and jump to the first match.
    pub fn submit_replacement(&mut self, replacement: &str, doc: &mut Document) -> ReplaceOutcome {
        if self.state != ReplaceState::AwaitingReplacement {
            return ReplaceOutcome::Ignored;
        }
        replacement.clone_into(&mut self.replacement);
        self.matches = Searcher::new(&self.query).search_all(doc.buffer());
        if self.matches.is_empty() {
            self.reset();
            return ReplaceOutcome::NoMatches;
        }
        debug!(query = %self.query, matches = self.matches.len(), "replace: stepping");
        self.state = ReplaceState::Stepping;
        self.jump_to(0, doc)
    }

    /// Replace the current match, search again, and move to the next match
    /// after the replacement (wrapping to the first). Ends the flow with
    /// `Done` when no match is left.
    ///
    /// If the text under the current match no longer reads as the query
    /// (the document was edited while stepping), nothing is replaced: the
    /// matches are searched again and the cursor moves to the first one at
    /// or after the old position.
    pub fn confirm(&mut self, doc: &mut Document) -> ReplaceOutcome {
        let Some(m) = self.current_match() else {
            return ReplaceOutcome::Ignored;
        };

        if doc.buffer().text_in_range(m.start(), m.end()) != self.query {
            debug!(line = m.line, col = m.col, "replace: match moved, searching again");
            return self.advance_from(m.start(), doc);
        }

        doc.delete_span(m.start(), m.end());
        let end = doc.insert_at(m.start(), &self.replacement);
        self.replaced += 1;
        self.advance_from(end, doc)
    }

    /// Leave the current match alone and move to the next one (wrapping).
    pub fn skip(&mut self, doc: &mut Document) -> ReplaceOutcome {
        if self.current_match().is_none() {
            return ReplaceOutcome::Ignored;
        }
        let next = (self.current + 1) % self.matches.len();
        self.jump_to(next, doc)
    }

    /// Abandon the flow from any state.
    pub fn cancel(&mut self) -> ReplaceOutcome {
        self.reset();
        ReplaceOutcome::Cancelled
    }

    // -- Helpers ------------------------------------------------------------

    /// Search again and jump to the first match at or after `from`
    /// (wrapping to the first). `Done` when nothing is left.
    fn advance_from(&mut self, from: Position, doc: &mut Document) -> ReplaceOutcome {
        self.matches = Searcher::new(&self.query).search_all(doc.buffer());
        if self.matches.is_empty() {
            let replaced = self.replaced;
            debug!(replaced, "replace: done");
            self.reset();
            return ReplaceOutcome::Done { replaced };
        }

        let next = self
            .matches
            .iter()
            .position(|candidate| candidate.start() >= from)
            .unwrap_or(0);
        self.jump_to(next, doc)
    }

    fn jump_to(&mut self, index: usize, doc: &mut Document) -> ReplaceOutcome {
        self.current = index;
        let m = self.matches[index];
        doc.set_cursor(m.start());
        ReplaceOutcome::Jumped(m)
    }

    fn reset(&mut self) {
        self.state = ReplaceState::Idle;
        self.query.clear();
        self.replacement.clear();
        self.matches.clear();
        self.current = 0;
        self.replaced = 0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ready(lines: &[&str], query: &str, replacement: &str) -> (ReplaceController, Document, ReplaceOutcome) {
        let mut doc = Document::from_lines(lines);
        let mut rc = ReplaceController::new();
        rc.start();
        rc.submit_find(query, &doc);
        let outcome = rc.submit_replacement(replacement, &mut doc);
        (rc, doc, outcome)
    }

    // -- Happy path ---------------------------------------------------------

    #[test]
    fn two_step_replace_ends_done() {
        let (mut rc, mut doc, first) = ready(&["foo bar foo"], "foo", "baz");
        assert_eq!(first, ReplaceOutcome::Jumped(SearchMatch::new(0, 0, 3)));
        assert_eq!(rc.state(), ReplaceState::Stepping);

        let second = rc.confirm(&mut doc);
        assert_eq!(doc.buffer().lines(), vec!["baz bar foo"]);
        assert_eq!(rc.matches(), &[SearchMatch::new(0, 8, 3)]);
        assert_eq!(second, ReplaceOutcome::Jumped(SearchMatch::new(0, 8, 3)));
        assert_eq!(doc.cursor().position(), Position::new(0, 8));

        let last = rc.confirm(&mut doc);
        assert_eq!(doc.buffer().lines(), vec!["baz bar baz"]);
        assert_eq!(last, ReplaceOutcome::Done { replaced: 2 });
        assert_eq!(rc.state(), ReplaceState::Idle);
        assert_eq!(rc.step(), None);
    }

    #[test]
    fn each_replacement_undoes_in_two_steps() {
        let (mut rc, mut doc, _) = ready(&["foo bar foo"], "foo", "baz");
        rc.confirm(&mut doc);
        assert_eq!(doc.history().undo_count(), 2);
        doc.undo();
        assert_eq!(doc.buffer().lines(), vec![" bar foo"]);
        doc.undo();
        assert_eq!(doc.buffer().lines(), vec!["foo bar foo"]);
    }

    #[test]
    fn steps_track_prompts() {
        let doc = Document::from_lines(["abc"]);
        let mut rc = ReplaceController::new();
        assert_eq!(rc.start(), ReplaceOutcome::Prompt(ReplaceStep::Find));
        assert_eq!(rc.step(), Some(ReplaceStep::Find));
        assert_eq!(
            rc.submit_find("b", &doc),
            ReplaceOutcome::Prompt(ReplaceStep::Replacement)
        );
        assert_eq!(rc.query(), "b");
        assert_eq!(rc.step(), Some(ReplaceStep::Replacement));
    }

    #[test]
    fn confirm_moves_past_replacement_then_wraps() {
        let (mut rc, mut doc, _) = ready(&["a a", "a"], "a", "aa");
        rc.skip(&mut doc);
        assert_eq!(rc.current_match(), Some(SearchMatch::new(0, 2, 1)));
        // Replace the second "a" on line 0; next match after it is line 1.
        let next = rc.confirm(&mut doc);
        assert_eq!(doc.buffer().lines(), vec!["a aa", "a"]);
        assert_eq!(next, ReplaceOutcome::Jumped(SearchMatch::new(1, 0, 1)));
    }

    #[test]
    fn skip_wraps_around() {
        let (mut rc, mut doc, _) = ready(&["x x"], "x", "y");
        assert_eq!(rc.skip(&mut doc), ReplaceOutcome::Jumped(SearchMatch::new(0, 2, 1)));
        assert_eq!(rc.skip(&mut doc), ReplaceOutcome::Jumped(SearchMatch::new(0, 0, 1)));
        assert_eq!(doc.buffer().lines(), vec!["x x"]);
    }

    #[test]
    fn multiline_replacement() {
        let (mut rc, mut doc, _) = ready(&["a;b"], ";", "\n");
        assert_eq!(rc.confirm(&mut doc), ReplaceOutcome::Done { replaced: 1 });
        assert_eq!(doc.buffer().lines(), vec!["a", "b"]);
    }

    #[test]
    fn confirm_after_edit_only_replaces_real_matches() {
        let (mut rc, mut doc, _) = ready(&["foo bar foo"], "foo", "baz");
        doc.delete_span(Position::new(0, 0), Position::new(0, 1));
        assert_eq!(doc.buffer().lines(), vec!["oo bar foo"]);

        let outcome = rc.confirm(&mut doc);
        assert_eq!(doc.buffer().lines(), vec!["oo bar foo"]);
        assert_eq!(outcome, ReplaceOutcome::Jumped(SearchMatch::new(0, 7, 3)));
        assert_eq!(doc.cursor().position(), Position::new(0, 7));

        assert_eq!(rc.confirm(&mut doc), ReplaceOutcome::Done { replaced: 1 });
        assert_eq!(doc.buffer().lines(), vec!["oo bar baz"]);
    }

    #[test]
    fn confirm_after_last_match_edited_away_is_done() {
        let (mut rc, mut doc, _) = ready(&["x foo"], "foo", "bar");
        doc.delete_span(Position::new(0, 2), Position::new(0, 5));
        assert_eq!(rc.confirm(&mut doc), ReplaceOutcome::Done { replaced: 0 });
        assert_eq!(doc.buffer().lines(), vec!["x "]);
        assert_eq!(rc.state(), ReplaceState::Idle);
    }

    // -- Exits --------------------------------------------------------------

    #[test]
    fn empty_query_exits() {
        let doc = Document::from_lines(["abc"]);
        let mut rc = ReplaceController::new();
        rc.start();
        assert_eq!(rc.submit_find("", &doc), ReplaceOutcome::EmptyQuery);
        assert_eq!(rc.state(), ReplaceState::Idle);
    }

    #[test]
    fn unmatched_query_exits_before_replacement_prompt() {
        let doc = Document::from_lines(["abc"]);
        let mut rc = ReplaceController::new();
        rc.start();
        assert_eq!(rc.submit_find("zzz", &doc), ReplaceOutcome::NoMatches);
        assert_eq!(rc.state(), ReplaceState::Idle);
    }

    #[test]
    fn text_changed_before_replacement_exits() {
        let mut doc = Document::from_lines(["abc"]);
        let mut rc = ReplaceController::new();
        rc.start();
        rc.submit_find("b", &doc);
        doc.select_all();
        doc.delete_selection();
        assert_eq!(rc.submit_replacement("x", &mut doc), ReplaceOutcome::NoMatches);
        assert_eq!(rc.state(), ReplaceState::Idle);
    }

    #[test]
    fn cancel_resets_from_any_state() {
        let (mut rc, _doc, _) = ready(&["foo"], "foo", "bar");
        assert_eq!(rc.cancel(), ReplaceOutcome::Cancelled);
        assert_eq!(rc.state(), ReplaceState::Idle);
        assert!(rc.matches().is_empty());
        assert_eq!(rc.query(), "");
        assert_eq!(rc.replacement(), "");
    }

    #[test]
    fn out_of_order_calls_are_ignored() {
        let mut doc = Document::from_lines(["abc"]);
        let mut rc = ReplaceController::new();
        assert_eq!(rc.submit_find("a", &doc), ReplaceOutcome::Ignored);
        assert_eq!(rc.submit_replacement("x", &mut doc), ReplaceOutcome::Ignored);
        assert_eq!(rc.confirm(&mut doc), ReplaceOutcome::Ignored);
        assert_eq!(rc.skip(&mut doc), ReplaceOutcome::Ignored);
    }
}
