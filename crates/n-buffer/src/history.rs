//! Undo/redo log with chained changes.
//!
//! Every buffer mutation is reported to [`History::commit`] as a [`Change`].
//! A change either opens a new [`Transaction`] or, when its `chain` flag is
//! set, joins the transaction on top of the undo stack. A transaction is the
//! unit of undo:
//!
//! | Source                        | Chain flag on first edit | Later edits |
//! |-------------------------------|--------------------------|-------------|
//! | `x`, `dd`, `p`                | `false`                  | `true`      |
//! | insert session after `i`      | `false`                  | `true`      |
//! | insert session after `c`/`o`  | `true`                   | `true`      |
//! | visual-block replay           | `true`                   | `true`      |
//!
//! ```text
//! buffer.insert(at, "abc")?;
//! buffer.commit(Change::insert(at, "abc", before, after).chained(false));
//! ```

use ropey::Rope;
use tracing::trace;

use crate::position::Point;

// ---------------------------------------------------------------------------
// Edit / Change
// ---------------------------------------------------------------------------

/// One reversible edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// `text` was inserted at `at`.
    Insert { at: Point, text: String },
    /// `text` was removed starting at `at`.
    Remove { at: Point, text: String },
}

/// What a caller reports after touching the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Join the previous transaction instead of opening a new one.
    pub chain: bool,
    pub edit: Edit,
    pub cursor_before: Point,
    pub cursor_after: Point,
}

impl Change {
    /// An insertion of `text` at `at`.
    #[must_use]
    pub fn insert(at: Point, text: &str, cursor_before: Point, cursor_after: Point) -> Self {
        Self {
            chain: false,
            edit: Edit::Insert {
                at,
                text: text.to_string(),
            },
            cursor_before,
            cursor_after,
        }
    }

    /// A removal of `text`, which started at `at`.
    #[must_use]
    pub fn remove(at: Point, text: &str, cursor_before: Point, cursor_after: Point) -> Self {
        Self {
            chain: false,
            edit: Edit::Remove {
                at,
                text: text.to_string(),
            },
            cursor_before,
            cursor_after,
        }
    }

    /// Join the open transaction instead of starting one.
    #[inline]
    #[must_use]
    pub const fn chained(mut self, chain: bool) -> Self {
        self.chain = chain;
        self
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Transaction {
    edits: Vec<Edit>,
    cursor_before: Point,
    cursor_after: Point,
}

impl Transaction {
    fn undo(&self, rope: &mut Rope) {
        for edit in self.edits.iter().rev() {
            match edit {
                Edit::Insert { at, text } => remove_text(rope, *at, text),
                Edit::Remove { at, text } => insert_text(rope, *at, text),
            }
        }
    }

    fn redo(&self, rope: &mut Rope) {
        for edit in &self.edits {
            match edit {
                Edit::Insert { at, text } => insert_text(rope, *at, text),
                Edit::Remove { at, text } => remove_text(rope, *at, text),
            }
        }
    }
}

fn char_index(rope: &Rope, at: Point) -> Option<usize> {
    rope.try_line_to_char(at.line).ok().map(|start| start + at.col)
}

fn insert_text(rope: &mut Rope, at: Point, text: &str) {
    if let Some(idx) = char_index(rope, at) {
        if rope.try_insert(idx, text).is_err() {
            trace!(target: "buffer.history", ?at, "replayed insert out of bounds");
        }
    }
}

fn remove_text(rope: &mut Rope, at: Point, text: &str) {
    if let Some(idx) = char_index(rope, at) {
        let len = text.chars().count();
        if rope.try_remove(idx..idx + len).is_err() {
            trace!(target: "buffer.history", ?at, len, "replayed remove out of bounds");
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Undo and redo stacks. Any new change clears the redo stack.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Transaction>,
    redo_stack: Vec<Transaction>,
}

impl History {
    /// An empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Record a change that has already been applied to the text.
    pub fn commit(&mut self, change: Change) {
        self.redo_stack.clear();
        if change.chain {
            if let Some(top) = self.undo_stack.last_mut() {
                top.edits.push(change.edit);
                top.cursor_after = change.cursor_after;
                return;
            }
        }
        self.undo_stack.push(Transaction {
            edits: vec![change.edit],
            cursor_before: change.cursor_before,
            cursor_after: change.cursor_after,
        });
    }

    /// Revert the newest transaction. Returns the cursor to restore.
    pub fn undo(&mut self, rope: &mut Rope) -> Option<Point> {
        let txn = self.undo_stack.pop()?;
        txn.undo(rope);
        trace!(target: "buffer.history", edits = txn.edits.len(), "undo");
        let cursor = txn.cursor_before;
        self.redo_stack.push(txn);
        Some(cursor)
    }

    /// Re-apply the newest undone transaction. Returns the cursor to restore.
    pub fn redo(&mut self, rope: &mut Rope) -> Option<Point> {
        let txn = self.redo_stack.pop()?;
        txn.redo(rope);
        trace!(target: "buffer.history", edits = txn.edits.len(), "redo");
        let cursor = txn.cursor_after;
        self.undo_stack.push(txn);
        Some(cursor)
    }

    /// There is a transaction to revert.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// There is an undone transaction to reapply.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Transactions on the undo stack.
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Transactions on the redo stack.
    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
