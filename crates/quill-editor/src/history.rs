//! Undo/redo history: one reversible op per mutation.
//!
//! Every mutating call on a [`Document`](crate::document::Document) follows
//! the same protocol:
//!
//! ```text
//! let op = EditOp::delete(pos, buf.text_in_range(a, b)); // 1. describe it
//! buf.delete_range(a, b);                               // 2. apply it
//! history.record(op);                                   // 3. record it
//! ```
//!
//! Recording a fresh op always clears the redo stack. Branching history is
//! not kept: an edit after an undo discards the forward history.
//!
//! Both stacks store ops as they were first applied. Undo applies the
//! inverse of the op it pops; redo re-applies the popped op forward. A
//! multi-line insert or delete is a single op, so it undoes in one step.

use tracing::debug;

use crate::buffer::Buffer;
use crate::position::{Position, Range};

// ---------------------------------------------------------------------------
// EditOp
// ---------------------------------------------------------------------------

/// A single reversible buffer edit.
///
/// `text` may contain line breaks; the span it covers starting at `pos` is
/// [`Range::covering`]. That span is enough to rebuild both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// `text` was inserted at `pos`. Undo = delete it. Redo = insert it.
    Insert { pos: Position, text: String },

    /// `text` was deleted starting at `pos`. Undo = insert it back. Redo =
    /// delete it again.
    Delete { pos: Position, text: String },
}

impl EditOp {
    /// An insertion of `text` at `pos`.
    #[inline]
    #[must_use]
    pub fn insert(pos: Position, text: impl Into<String>) -> Self {
        Self::Insert {
            pos,
            text: text.into(),
        }
    }

    /// A deletion of `text`, which started at `pos`.
    #[inline]
    #[must_use]
    pub fn delete(pos: Position, text: impl Into<String>) -> Self {
        Self::Delete {
            pos,
            text: text.into(),
        }
    }

    /// Where the op happened.
    #[inline]
    #[must_use]
    pub const fn pos(&self) -> Position {
        match self {
            Self::Insert { pos, .. } | Self::Delete { pos, .. } => *pos,
        }
    }

    /// The inserted or deleted text.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Insert { text, .. } | Self::Delete { text, .. } => text,
        }
    }

    /// The same op in the other direction.
    #[must_use]
    pub fn inverse(&self) -> Self {
        match self {
            Self::Insert { pos, text } => Self::delete(*pos, text.clone()),
            Self::Delete { pos, text } => Self::insert(*pos, text.clone()),
        }
    }

    /// Apply this op to `buf` and return where the cursor should land.
    ///
    /// Inserts put the cursor after the new text. Deletes synthesize the span
    /// the text occupies from `pos` and remove it, leaving the cursor at `pos`.
    pub fn apply(&self, buf: &mut Buffer) -> Position {
        match self {
            Self::Insert { pos, text } => buf.insert_text(*pos, text),
            Self::Delete { pos, text } => {
                let span = Range::covering(*pos, text);
                buf.delete_range(span.start, span.end);
                buf.clamp_position(*pos)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Undo/redo history for a buffer.
///
/// Maintains two LIFO stacks: ops that can be undone and ops that can be
/// redone.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<EditOp>,
    redo_stack: Vec<EditOp>,
}

impl History {
    /// Create an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Record an op that was just applied. Clears the redo stack.
    ///
    /// Ops with empty text changed nothing and are dropped.
    pub fn record(&mut self, op: EditOp) {
        if op.text().is_empty() {
            return;
        }
        debug!(?op, undo_depth = self.undo_stack.len() + 1, "edit recorded");
        self.redo_stack.clear();
        self.undo_stack.push(op);
    }

    /// Undo the most recent op. Returns the cursor position to restore, or
    /// `None` if there's nothing to undo.
    pub fn undo(&mut self, buf: &mut Buffer) -> Option<Position> {
        let op = self.undo_stack.pop()?;
        let cursor = op.inverse().apply(buf);
        debug!(?op, "undo");
        self.redo_stack.push(op);
        Some(cursor)
    }

    /// Redo the most recently undone op. Returns the cursor position to
    /// restore, or `None` if there's nothing to redo.
    pub fn redo(&mut self, buf: &mut Buffer) -> Option<Position> {
        let op = self.redo_stack.pop()?;
        let cursor = op.apply(buf);
        debug!(?op, "redo");
        self.undo_stack.push(op);
        Some(cursor)
    }

    /// Drop all history (used when a new document is opened).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// True if there are ops that can be undone.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// True if there are ops that can be redone.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of ops on the undo stack.
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of ops on the redo stack.
    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
