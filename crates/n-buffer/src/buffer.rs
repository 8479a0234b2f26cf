//! Text buffer.
//!
//! A `Buffer` wraps a [`ropey::Rope`] and exposes the operations the editing
//! core relies on:
//!
//! - rune lookup and point arithmetic (`char_at`, `advance`, `retreat`,
//!   `end_point`, `contains`)
//! - raw edits (`insert`, `remove`) that never touch the undo log
//! - [`commit`](Buffer::commit) to report an edit to the [`History`]
//! - per-buffer state the core reads and writes: named [`Marks`] and the
//!   motion column remembered by vertical motions
//!
//! Columns are char offsets. Column `content_len` (one past the last visible
//! char) is a valid point; it addresses the line ending, or the end of the
//! buffer on the last line.

use std::fmt;

use ropey::{Rope, RopeSlice};

use crate::error::BufferError;
use crate::history::{Change, History};
use crate::marks::Marks;
use crate::position::Point;

/// A rope-backed text buffer with its undo log and marks.
pub struct Buffer {
    rope: Rope,
    history: History,
    marks: Marks,
    motion_column: Option<usize>,
    modified: bool,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// An empty buffer: one empty line, no history.
    #[must_use]
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// A buffer holding `text`, unmodified and with no history.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            history: History::new(),
            marks: Marks::new(),
            motion_column: None,
            modified: false,
        }
    }

    // -- Text access --------------------------------------------------------

    /// The underlying rope, for read-only access.
    #[inline]
    #[must_use]
    pub const fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Number of lines. An empty buffer has one (empty) line.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total chars, line breaks included.
    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// True when the buffer holds no text at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// The line including its line ending, if it exists.
    #[must_use]
    pub fn line(&self, line: usize) -> Option<RopeSlice<'_>> {
        (line < self.rope.len_lines()).then(|| self.rope.line(line))
    }

    /// Chars in a line excluding `\n`, `\r\n` or `\r`.
    #[must_use]
    pub fn line_content_len(&self, line: usize) -> Option<usize> {
        self.line(line).map(|rope_line| {
            let total = rope_line.len_chars();
            if total == 0 {
                return 0;
            }
            match rope_line.char(total - 1) {
                '\n' if total >= 2 && rope_line.char(total - 2) == '\r' => total - 2,
                '\n' | '\r' => total - 1,
                _ => total,
            }
        })
    }

    /// [`line_content_len`](Self::line_content_len), with 0 for missing lines.
    #[inline]
    #[must_use]
    pub fn content_len(&self, line: usize) -> usize {
        self.line_content_len(line).unwrap_or(0)
    }

    /// Line content without its ending.
    #[must_use]
    pub fn line_text(&self, line: usize) -> String {
        self.line(line)
            .map(|l| l.slice(..self.content_len(line)).to_string())
            .unwrap_or_default()
    }

    /// Content chars of a line, for column-indexed scans.
    #[must_use]
    pub fn line_chars(&self, line: usize) -> Vec<char> {
        self.line(line)
            .map(|l| l.chars().take(self.content_len(line)).collect())
            .unwrap_or_default()
    }

    /// The char at `pt`. The line ending is returned as `'\n'`; the end of
    /// the buffer has no char.
    #[must_use]
    pub fn char_at(&self, pt: Point) -> Option<char> {
        let idx = self.point_to_char(pt)?;
        if idx >= self.rope.len_chars() {
            return None;
        }
        match self.rope.char(idx) {
            '\r' => Some('\n'),
            ch => Some(ch),
        }
    }

    /// Text in `[start, end)`. `None` if either end is out of bounds.
    #[must_use]
    pub fn text_between(&self, start: Point, end: Point) -> Option<String> {
        let a = self.point_to_char(start)?;
        let b = self.point_to_char(end)?;
        (a <= b).then(|| self.rope.slice(a..b).to_string())
    }

    /// The whole text as one string.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    /// Width of the leading blank run of a line.
    #[must_use]
    pub fn first_non_blank(&self, line: usize) -> usize {
        self.line_chars(line)
            .iter()
            .take_while(|c| **c == ' ' || **c == '\t')
            .count()
    }

    /// The leading blank run of a line.
    #[must_use]
    pub fn indent_of(&self, line: usize) -> String {
        self.line_chars(line)
            .into_iter()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect()
    }

    // -- Point arithmetic ---------------------------------------------------

    /// Absolute char index of a point. Column may equal `content_len` and,
    /// for `\r\n` endings, anything up to the full line length.
    #[must_use]
    pub fn point_to_char(&self, pt: Point) -> Option<usize> {
        let line = self.line(pt.line)?;
        if pt.col > line.len_chars() {
            return None;
        }
        Some(self.rope.line_to_char(pt.line) + pt.col)
    }

    /// The point of char index `idx`, `None` past the end.
    #[must_use]
    pub fn char_to_point(&self, idx: usize) -> Option<Point> {
        if idx > self.rope.len_chars() {
            return None;
        }
        let line = self.rope.char_to_line(idx);
        Some(Point::new(line, idx - self.rope.line_to_char(line)))
    }

    /// True if `pt` addresses a char or an end of line.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.line < self.line_count() && pt.col <= self.content_len(pt.line)
    }

    /// The point one past the last char of the last line.
    #[must_use]
    pub fn end_point(&self) -> Point {
        let last = self.line_count().saturating_sub(1);
        Point::new(last, self.content_len(last))
    }

    /// Move `n` runes forward, crossing line endings as one rune each.
    /// `None` if that runs past the end of the buffer.
    #[must_use]
    pub fn advance(&self, pt: Point, n: usize) -> Option<Point> {
        let mut cur = pt;
        for _ in 0..n {
            if cur.col < self.content_len(cur.line) {
                cur.col += 1;
            } else if cur.line + 1 < self.line_count() {
                cur = Point::new(cur.line + 1, 0);
            } else {
                return None;
            }
        }
        Some(cur)
    }

    /// Move `n` runes backward. `None` if that runs past the start.
    #[must_use]
    pub fn retreat(&self, pt: Point, n: usize) -> Option<Point> {
        let mut cur = pt;
        for _ in 0..n {
            if cur.col > 0 {
                cur.col -= 1;
            } else if cur.line > 0 {
                cur.line -= 1;
                cur.col = self.content_len(cur.line);
            } else {
                return None;
            }
        }
        Some(cur)
    }

    /// Clamp a point to the buffer. With `past_end` the column may equal
    /// `content_len` (insert-mode cursor); otherwise it stays on a char.
    #[must_use]
    pub fn clamp_point(&self, pt: Point, past_end: bool) -> Point {
        let line = pt.line.min(self.line_count().saturating_sub(1));
        let len = self.content_len(line);
        let max = if past_end { len } else { len.saturating_sub(1) };
        Point::new(line, pt.col.min(max))
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `text` at `pt` and return the point just after it. Does not
    /// record history; call [`commit`](Self::commit).
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`] if `pt` is not in the buffer.
    pub fn insert(&mut self, pt: Point, text: &str) -> Result<Point, BufferError> {
        let idx = self
            .point_to_char(pt)
            .ok_or(BufferError::OutOfBounds(pt))?;
        self.rope
            .try_insert(idx, text)
            .map_err(|_| BufferError::OutOfBounds(pt))?;
        self.modified = true;
        self.char_to_point(idx + text.chars().count())
            .ok_or(BufferError::OutOfBounds(pt))
    }

    /// Remove `len` runes starting at `pt` and return them.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`] for a bad start and
    /// [`BufferError::RemoveTooLong`] when the span runs past the end.
    pub fn remove(&mut self, pt: Point, len: usize) -> Result<String, BufferError> {
        let idx = self
            .point_to_char(pt)
            .ok_or(BufferError::OutOfBounds(pt))?;
        let end = idx + len;
        if end > self.rope.len_chars() {
            return Err(BufferError::RemoveTooLong { at: pt, len });
        }
        let removed = self.rope.slice(idx..end).to_string();
        self.rope
            .try_remove(idx..end)
            .map_err(|_| BufferError::RemoveTooLong { at: pt, len })?;
        self.modified = true;
        Ok(removed)
    }

    // -- History ------------------------------------------------------------

    /// Report an applied edit to the undo log.
    pub fn commit(&mut self, change: Change) {
        self.history.commit(change);
    }

    /// Undo one transaction. Returns the cursor to restore.
    pub fn undo(&mut self) -> Option<Point> {
        let cursor = self.history.undo(&mut self.rope)?;
        self.modified = true;
        Some(cursor)
    }

    /// Redo one transaction. Returns the cursor to restore.
    pub fn redo(&mut self) -> Option<Point> {
        let cursor = self.history.redo(&mut self.rope)?;
        self.modified = true;
        Some(cursor)
    }

    /// The undo log.
    #[inline]
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    // -- Auxiliary state ----------------------------------------------------

    /// Marks set with `m`.
    #[inline]
    #[must_use]
    pub const fn marks(&self) -> &Marks {
        &self.marks
    }

    /// Marks, for setting or clearing.
    #[inline]
    pub const fn marks_mut(&mut self) -> &mut Marks {
        &mut self.marks
    }

    /// Display column that `j`/`k` try to return to. `Some(usize::MAX)`
    /// means "end of line" (after `$`).
    #[inline]
    #[must_use]
    pub const fn motion_column(&self) -> Option<usize> {
        self.motion_column
    }

    /// Set or clear the column `j` and `k` aim for.
    #[inline]
    pub const fn set_motion_column(&mut self, col: Option<usize>) {
        self.motion_column = col;
    }

    /// Edited since creation or the last [`mark_saved`](Self::mark_saved).
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clear the modified flag, after the host writes the text out.
    #[inline]
    pub const fn mark_saved(&mut self) {
        self.modified = false;
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
            .field("undo", &self.history.undo_count())
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

    fn p(line: usize, col: usize) -> Point {
        Point::new(line, col)
    }

    // -- Access -------------------------------------------------------------

    #[test]
    fn empty_buffer_has_one_line() {
        let buf = Buffer::new();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.content_len(0), 0);
        assert_eq!(buf.end_point(), p(0, 0));
    }

    #[test]
    fn content_len_strips_endings() {
        let buf = Buffer::from_text("ab\ncd\r\nef\rg");
        assert_eq!(buf.content_len(0), 2);
        assert_eq!(buf.content_len(1), 2);
        assert_eq!(buf.content_len(2), 2);
        assert_eq!(buf.content_len(3), 1);
        assert_eq!(buf.line_content_len(9), None);
    }

    #[test]
    fn char_at_reports_newline() {
        let buf = Buffer::from_text("ab\ncd");
        assert_eq!(buf.char_at(p(0, 1)), Some('b'));
        assert_eq!(buf.char_at(p(0, 2)), Some('\n'));
        assert_eq!(buf.char_at(p(1, 2)), None);
        assert_eq!(buf.char_at(p(5, 0)), None);
    }

    #[test]
    fn text_between_spans_lines() {
        let buf = Buffer::from_text("hello\nworld");
        assert_eq!(buf.text_between(p(0, 3), p(1, 2)).as_deref(), Some("lo\nwo"));
        assert_eq!(buf.text_between(p(1, 2), p(0, 3)), None);
    }

    #[test]
    fn indentation_helpers() {
        let buf = Buffer::from_text("  \tfoo\nbar");
        assert_eq!(buf.first_non_blank(0), 3);
        assert_eq!(buf.indent_of(0), "  \t");
        assert_eq!(buf.first_non_blank(1), 0);
    }

    #[test]
    fn unicode_columns_are_chars() {
        let buf = Buffer::from_text("café ☕");
        assert_eq!(buf.content_len(0), 6);
        assert_eq!(buf.char_at(p(0, 3)), Some('é'));
        assert_eq!(buf.char_at(p(0, 5)), Some('☕'));
    }

    // -- Point arithmetic ---------------------------------------------------

    #[test]
    fn advance_crosses_line_endings() {
        let buf = Buffer::from_text("ab\ncd");
        assert_eq!(buf.advance(p(0, 1), 1), Some(p(0, 2)));
        assert_eq!(buf.advance(p(0, 1), 2), Some(p(1, 0)));
        assert_eq!(buf.advance(p(1, 1), 1), Some(p(1, 2)));
        assert_eq!(buf.advance(p(1, 2), 1), None);
    }

    #[test]
    fn retreat_crosses_line_endings() {
        let buf = Buffer::from_text("ab\ncd");
        assert_eq!(buf.retreat(p(1, 0), 1), Some(p(0, 2)));
        assert_eq!(buf.retreat(p(1, 1), 3), Some(p(0, 1)));
        assert_eq!(buf.retreat(p(0, 0), 1), None);
    }

    #[test]
    fn contains_allows_end_of_line() {
        let buf = Buffer::from_text("abc\nd");
        assert!(buf.contains(p(0, 3)));
        assert!(!buf.contains(p(0, 4)));
        assert!(!buf.contains(p(2, 0)));
    }

    #[test]
    fn clamp_point_modes() {
        let buf = Buffer::from_text("abc\n");
        assert_eq!(buf.clamp_point(p(0, 9), false), p(0, 2));
        assert_eq!(buf.clamp_point(p(0, 9), true), p(0, 3));
        assert_eq!(buf.clamp_point(p(7, 1), false), p(1, 0));
    }

    #[test]
    fn point_char_roundtrip() {
        let buf = Buffer::from_text("one\ntwo\nthree");
        for idx in 0..=buf.len_chars() {
            let pt = buf.char_to_point(idx).unwrap();
            assert_eq!(buf.point_to_char(pt), Some(idx));
        }
    }

    // -- Editing ------------------------------------------------------------

    #[test]
    fn insert_returns_end_point() {
        let mut buf = Buffer::from_text("hd");
        let end = buf.insert(p(0, 1), "ello\nworl").unwrap();
        assert_eq!(end, p(1, 4));
        assert_eq!(buf.contents(), "hello\nworld");
        assert!(buf.is_modified());
    }

    #[test]
    fn insert_out_of_bounds_fails() {
        let mut buf = Buffer::from_text("ab");
        assert_eq!(
            buf.insert(p(0, 5), "x"),
            Err(BufferError::OutOfBounds(p(0, 5)))
        );
        assert_eq!(buf.contents(), "ab");
    }

    #[test]
    fn remove_returns_text() {
        let mut buf = Buffer::from_text("abc\ndef");
        assert_eq!(buf.remove(p(0, 2), 3).unwrap(), "c\nd");
        assert_eq!(buf.contents(), "abef");
    }

    #[test]
    fn remove_past_end_fails() {
        let mut buf = Buffer::from_text("abc");
        assert!(matches!(
            buf.remove(p(0, 1), 5),
            Err(BufferError::RemoveTooLong { .. })
        ));
        assert_eq!(buf.contents(), "abc");
    }

    // -- History ------------------------------------------------------------

    #[test]
    fn commit_then_undo_redo() {
        let mut buf = Buffer::from_text("ac");
        buf.insert(p(0, 1), "b").unwrap();
        buf.commit(Change::insert(p(0, 1), "b", p(0, 1), p(0, 2)));
        assert_eq!(buf.undo(), Some(p(0, 1)));
        assert_eq!(buf.contents(), "ac");
        assert_eq!(buf.redo(), Some(p(0, 2)));
        assert_eq!(buf.contents(), "abc");
    }

    #[test]
    fn marks_and_motion_column() {
        let mut buf = Buffer::new();
        buf.marks_mut().set('q', p(0, 0));
        assert_eq!(buf.marks().get('q'), Some(p(0, 0)));
        buf.set_motion_column(Some(7));
        assert_eq!(buf.motion_column(), Some(7));
    }
}
