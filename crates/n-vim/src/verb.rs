//! The verb catalog.
//!
//! Verbs do the work once the applier has a range. Every edit goes through
//! the [`Editor`] helpers so it lands in the undo log, chained into the
//! action's group after the first one. Verbs that remove text own the
//! register write.
//!
//! Ranges arrive unsorted and in motion terms (an exclusive or inclusive
//! end, a linewise flag on the action). [`Editor::span`] turns that into
//! the text actually covered.

use n_buffer::{Point, Range};
use tracing::trace;

use crate::action::{Action, ActionFlags, InsertKind, MotionKind, ScrollTo, VerbKind};
use crate::apply::{Editor, Replay};
use crate::error::ApplyError;
use crate::mode::Transition;
use crate::register::{Yank, YankType};
use crate::search::{self, SearchDirection, SearchPrompt};

/// A visual-block insert waiting for Esc to replicate itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BlockInsert {
    pub first: usize,
    pub col: usize,
    /// Lines below `first` that get the typed text. Settled when the
    /// session starts, before `c` shortens any of them.
    pub lines: Vec<usize>,
}

/// Longest text a counted paste, shift or insert may build.
pub(crate) const MAX_REPEAT_LEN: usize = 1 << 22;

/// `len` repeated `count` times, if that stays under [`MAX_REPEAT_LEN`].
pub(crate) fn repeat_len(len: usize, count: usize) -> Result<usize, ApplyError> {
    len.checked_mul(count)
        .filter(|&n| n <= MAX_REPEAT_LEN)
        .ok_or(ApplyError::TextTooLong)
}

/// What an operator covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Span {
    /// `[start, stop)`, reported to the register as `yank`.
    Chars {
        start: Point,
        stop: Point,
        yank: YankType,
    },
    /// Whole lines, both ends included.
    Lines { first: usize, last: usize },
}

/// Swap the case of every letter; other chars pass through.
pub(crate) fn flip_case_str(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_uppercase() {
                c.to_lowercase().next().unwrap_or(c)
            } else if c.is_lowercase() {
                c.to_uppercase().next().unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

const fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

// ── Dispatch ─────────────────────────────────────────────────────────────

impl Editor<'_> {
    /// Run the action's verb on `range` (`None` for verbs without a motion).
    pub(crate) fn run_verb(
        &mut self,
        action: &Action,
        range: Option<Range>,
        replay: Option<&Replay>,
    ) -> Result<(), ApplyError> {
        let needed = || range.ok_or(ApplyError::EmptyRange);
        let kind = action.verb.kind;
        match kind {
            VerbKind::Move => {
                if let Some(range) = range {
                    self.move_to(action, range);
                }
            }
            VerbKind::Delete => self.delete(action, needed()?)?,
            VerbKind::Change => self.change(action, needed()?, replay)?,
            VerbKind::Yank => self.yank(action, needed()?)?,
            VerbKind::PasteAfter | VerbKind::PasteBefore => {
                let yank = self.register_yank(action)?;
                self.put(&yank, action.count(), kind == VerbKind::PasteAfter)?;
            }
            VerbKind::PasteReplace => self.replace_paste(action, needed()?)?,
            VerbKind::Indent => self.shift(action, needed()?, true)?,
            VerbKind::Unindent => self.shift(action, needed()?, false)?,
            VerbKind::Join => self.join(needed()?)?,
            VerbKind::FlipCase => self.flip_case(action, needed()?)?,
            VerbKind::Increment => self.increment(action, range, 1)?,
            VerbKind::Decrement => self.increment(action, range, -1)?,
            VerbKind::ReplaceChar => self.replace_char(action, range)?,
            VerbKind::Insert(insert) => self.insert(action, insert, replay)?,
            VerbKind::ReplaceMode => self.begin_insert(action, replay, Transition::EnterReplace),
            VerbKind::Visual(visual) => {
                if !self.vim.mode.is_visual() {
                    self.vim.anchor = self.view.cursor;
                }
                self.transition(Transition::ToggleVisual(visual));
            }
            VerbKind::Normal => self.transition(Transition::Escape),
            VerbKind::SwapAnchor => std::mem::swap(&mut self.vim.anchor, &mut self.view.cursor),
            VerbKind::SetMark => {
                let name = action.verb.arg.ok_or(ApplyError::MotionFailed)?;
                if !self.buf.marks_mut().set(name, self.view.cursor) {
                    return Err(ApplyError::InvalidMark(name));
                }
            }
            VerbKind::Undo => self.undo(action.count(), false)?,
            VerbKind::Redo => self.undo(action.count(), true)?,
            VerbKind::DotRepeat => self.dot_repeat(action, replay)?,
            VerbKind::Scroll(to) => match to {
                ScrollTo::Center => self.view.center_on_cursor(),
                ScrollTo::Top => self.view.top_on_cursor(),
                ScrollTo::Bottom => self.view.bottom_on_cursor(),
            },
            VerbKind::OpenSearch(dir) => self.vim.prompt = Some(SearchPrompt::new(dir)),
            VerbKind::Search(dir) => self.search(dir, action.verb.payload.as_deref())?,
        }

        if kind.uses_selection() && !kind.enters_insert() {
            self.transition(Transition::VerbApplied);
        }
        Ok(())
    }

    fn move_to(&mut self, action: &Action, range: Range) {
        let from = self.view.cursor;
        let kind = action.motion.map(|m| m.kind);
        if self.vim.mode.is_visual() && kind.is_some_and(MotionKind::is_text_object) {
            self.vim.anchor = range.start;
        }
        self.set_cursor(range.end, false);

        if kind.is_some_and(MotionKind::is_page) {
            let to = self.view.cursor.line;
            if to > from.line {
                self.view
                    .scroll_lines(self.buf, isize::try_from(to - from.line).unwrap_or(isize::MAX));
            } else {
                self.view
                    .scroll_lines(self.buf, -isize::try_from(from.line - to).unwrap_or(isize::MAX));
            }
        }
    }
}

// ── Spans and registers ──────────────────────────────────────────────────

impl Editor<'_> {
    /// The text an operator covers.
    ///
    /// An exclusive range loses its end point. When that leaves the end on
    /// a line break the operator stops at the last char before it and the
    /// yank is reported as linewise; a non-word motion starting at or
    /// before the first non-blank becomes fully linewise instead. An
    /// inclusive end on a line break takes the break with it.
    pub(crate) fn span(&self, action: &Action, range: Range) -> Result<Span, ApplyError> {
        let r = range.sorted();
        let last_line = self.buf.line_count().saturating_sub(1);
        if action.is_linewise() {
            return Ok(Span::Lines {
                first: r.start.line.min(last_line),
                last: r.end.line.min(last_line),
            });
        }

        let mut yank = YankType::Char;
        let end = if action.is_exclusive() {
            if r.start == r.end {
                return Err(ApplyError::EmptyRange);
            }
            let end = self.buf.retreat(r.end, 1).ok_or(ApplyError::EmptyRange)?;
            if end.col > 0 && end.col >= self.buf.content_len(end.line) {
                let word = action
                    .motion
                    .is_some_and(|m| matches!(m.kind, MotionKind::WordStart(_)));
                if !word && r.start.col <= self.buf.first_non_blank(r.start.line) {
                    return Ok(Span::Lines {
                        first: r.start.line,
                        last: end.line,
                    });
                }
                yank = YankType::Line;
                end.with_col(end.col - 1)
            } else {
                end
            }
        } else {
            r.end
        };

        let stop = if end.col >= self.buf.content_len(end.line) {
            self.buf
                .advance(end, 1)
                .unwrap_or_else(|| self.buf.end_point())
        } else {
            end.with_col(end.col + 1)
        };
        Ok(Span::Chars {
            start: r.start,
            stop,
            yank,
        })
    }

    /// `[start, stop)` of a span, whole lines without their last break.
    fn span_points(&self, action: &Action, range: Range) -> Result<(Point, Point), ApplyError> {
        Ok(match self.span(action, range)? {
            Span::Chars { start, stop, .. } => (start, stop),
            Span::Lines { first, last } => (
                Point::new(first, 0),
                Point::new(last, self.buf.content_len(last)),
            ),
        })
    }

    fn line_texts(&self, first: usize, last: usize) -> String {
        (first..=last)
            .map(|l| self.buf.line_text(l))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Store removed or yanked text, unless the action writes nowhere.
    pub(crate) fn write_register(&mut self, action: &Action, yank: Yank) {
        if action.flags.contains(ActionFlags::DO_NOT_YANK) {
            return;
        }
        let name = action.register_or_default();
        trace!(target: "vim.apply", register = %name, %yank, "write register");
        self.vim.registers.set(name, yank);
    }

    /// The register the action reads.
    pub(crate) fn register_yank(&self, action: &Action) -> Result<Yank, ApplyError> {
        let name = action.register_or_default();
        self.vim
            .registers
            .get(name)
            .filter(|y| !y.is_empty())
            .cloned()
            .ok_or(ApplyError::EmptyRegister(name))
    }
}

// ── Delete / change / yank ───────────────────────────────────────────────

impl Editor<'_> {
    fn delete(&mut self, action: &Action, range: Range) -> Result<(), ApplyError> {
        match self.span(action, range)? {
            Span::Lines { first, last } => {
                let text = self.delete_lines(first, last)?;
                let line = first.min(self.buf.line_count().saturating_sub(1));
                self.set_cursor(Point::new(line, self.buf.first_non_blank(line)), false);
                self.write_register(action, Yank::Line(text));
            }
            Span::Chars { start, stop, yank } => {
                let text = self.remove_span(start, stop)?;
                self.set_cursor(start, action.flags.contains(ActionFlags::PAST_END));
                self.write_register(action, Yank::new(yank, text));
            }
        }
        Ok(())
    }

    /// Remove whole lines. The last line takes the break before it; the
    /// only line leaves an empty buffer.
    fn delete_lines(&mut self, first: usize, last: usize) -> Result<String, ApplyError> {
        let text = self.line_texts(first, last);
        let count = self.buf.line_count();
        let (start, stop) = if last + 1 < count {
            (Point::new(first, 0), Point::new(last + 1, 0))
        } else if first > 0 {
            (
                Point::new(first - 1, self.buf.content_len(first - 1)),
                self.buf.end_point(),
            )
        } else {
            (Point::ZERO, self.buf.end_point())
        };
        self.remove_span(start, stop)?;
        Ok(text)
    }

    fn change(
        &mut self,
        action: &Action,
        range: Range,
        replay: Option<&Replay>,
    ) -> Result<(), ApplyError> {
        match self.span(action, range)? {
            // `cc`/`S` keep one line with the first line's indent.
            Span::Lines { first, last } => {
                let text = self.line_texts(first, last);
                let indent = self.buf.indent_of(first);
                let start = Point::new(first, 0);
                self.remove_span(start, Point::new(last, self.buf.content_len(last)))?;
                let at = self.insert_text(start, &indent)?;
                self.set_cursor(at, true);
                self.write_register(action, Yank::Line(text));
            }
            Span::Chars { start, stop, yank } => {
                let text = self.remove_span(start, stop)?;
                self.set_cursor(start, true);
                self.write_register(action, Yank::new(yank, text));
            }
        }
        self.begin_insert(action, replay, Transition::EnterInsert);
        Ok(())
    }

    fn yank(&mut self, action: &Action, range: Range) -> Result<(), ApplyError> {
        let r = range.sorted();
        match self.span(action, range)? {
            Span::Lines { first, last } => {
                let text = self.line_texts(first, last);
                self.write_register(action, Yank::Line(text));
                if self.view.cursor.line != first {
                    self.set_cursor(Point::new(first, r.start.col), false);
                }
            }
            Span::Chars { start, stop, yank } => {
                let text = self.buf.text_between(start, stop).unwrap_or_default();
                self.write_register(action, Yank::new(yank, text));
                self.set_cursor(start, false);
            }
        }
        Ok(())
    }
}

// ── Paste ────────────────────────────────────────────────────────────────

impl Editor<'_> {
    /// Paste `yank` `count` times after or before the cursor.
    pub(crate) fn put(&mut self, yank: &Yank, count: usize, after: bool) -> Result<(), ApplyError> {
        let count = count.max(1);
        repeat_len(yank.text().len() + 1, count)?;
        match yank {
            Yank::String(text) => self.put_chars(&text.repeat(count), after),
            Yank::Line(text) => self.put_lines(&vec![text.as_str(); count].join("\n"), after),
            Yank::Block(rows) => self.put_block(rows, count, after),
        }
    }

    fn put_chars(&mut self, text: &str, after: bool) -> Result<(), ApplyError> {
        let c = self.view.cursor;
        let len = self.buf.content_len(c.line);
        let at = if after && len > 0 {
            c.with_col((c.col + 1).min(len))
        } else {
            c
        };
        let end = self.insert_text(at, text)?;
        let cursor = if text.contains('\n') {
            at
        } else {
            self.buf.retreat(end, 1).unwrap_or(at)
        };
        self.set_cursor(cursor, false);
        Ok(())
    }

    fn put_lines(&mut self, body: &str, after: bool) -> Result<(), ApplyError> {
        let line = self.view.cursor.line;
        let target = if !after {
            self.insert_text(Point::new(line, 0), &format!("{body}\n"))?;
            line
        } else if line + 1 < self.buf.line_count() {
            self.insert_text(Point::new(line + 1, 0), &format!("{body}\n"))?;
            line + 1
        } else {
            let eol = Point::new(line, self.buf.content_len(line));
            self.insert_text(eol, &format!("\n{body}"))?;
            line + 1
        };
        self.set_cursor(Point::new(target, self.buf.first_non_blank(target)), false);
        Ok(())
    }

    /// One row per line from the cursor down. Short lines are padded with
    /// spaces, missing lines are added, and empty rows leave their line
    /// alone.
    fn put_block(&mut self, rows: &[String], count: usize, after: bool) -> Result<(), ApplyError> {
        let c = self.view.cursor;
        let col = if after && self.buf.content_len(c.line) > 0 {
            c.col + 1
        } else {
            c.col
        };
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);

        for (i, row) in rows.iter().enumerate() {
            let line = c.line + i;
            if line >= self.buf.line_count() {
                let end = self.buf.end_point();
                self.insert_text(end, "\n")?;
            }
            let len = self.buf.content_len(line);
            let padded = format!("{row:<width$}");
            let mut piece = padded.repeat(count - 1);
            if col < len {
                piece.push_str(&padded);
            } else {
                piece.push_str(row);
                piece.truncate(piece.trim_end().len());
            }
            if piece.is_empty() {
                continue;
            }
            if len < col {
                self.insert_text(Point::new(line, len), &" ".repeat(col - len))?;
            }
            self.insert_text(Point::new(line, col), &piece)?;
        }
        self.set_cursor(Point::new(c.line, col), false);
        Ok(())
    }

    /// Visual `p`: drop the selection without touching the registers, then
    /// paste in its place.
    fn replace_paste(&mut self, action: &Action, range: Range) -> Result<(), ApplyError> {
        let yank = self.register_yank(action)?;
        match self.span(action, range)? {
            Span::Lines { first, last } => {
                let count = self.buf.line_count();
                if first == 0 && last + 1 >= count {
                    repeat_len(yank.text().len() + 1, action.count())?;
                    let text = vec![yank.text(); action.count()].join("\n");
                    let end = self.buf.end_point();
                    self.remove_span(Point::ZERO, end)?;
                    self.insert_text(Point::ZERO, &text)?;
                    self.set_cursor(Point::new(0, self.buf.first_non_blank(0)), false);
                    return Ok(());
                }
                let at_end = last + 1 >= count;
                self.delete_lines(first, last)?;
                let line = if at_end { first - 1 } else { first };
                self.view.cursor = Point::new(line, 0);
                self.put(&Yank::Line(yank.text()), action.count(), at_end)
            }
            Span::Chars { start, stop, .. } => {
                self.remove_span(start, stop)?;
                let len = self.buf.content_len(start.line);
                let after = len > 0 && start.col >= len;
                self.view.cursor = if after { start.with_col(len - 1) } else { start };
                self.put(&yank, action.count(), after)
            }
        }
    }
}

// ── Line and char transforms ─────────────────────────────────────────────

impl Editor<'_> {
    /// One level of indentation per the config.
    pub(crate) fn indent_unit(&self) -> String {
        if self.config.insert_spaces {
            " ".repeat(self.config.tab_width.max(1))
        } else {
            "\t".to_string()
        }
    }

    /// Indent for a line opened below `line`: the same, plus one level
    /// after an opening brace.
    pub(crate) fn open_indent(&self, line: usize) -> String {
        let mut indent = self.buf.indent_of(line);
        if self.buf.line_text(line).trim_end().ends_with('{') {
            indent.push_str(&self.indent_unit());
        }
        indent
    }

    /// `>` and `<`. Empty lines are left alone. A visual selection shifts
    /// by the count; otherwise the count picked the lines.
    fn shift(&mut self, action: &Action, range: Range, right: bool) -> Result<(), ApplyError> {
        let r = range.sorted();
        let last_line = self.buf.line_count().saturating_sub(1);
        let (first, last) = (r.start.line, r.end.line.min(last_line));
        let levels = if action.motion.is_some_and(|m| m.kind == MotionKind::VisualRange) {
            action.count()
        } else {
            1
        };
        let tab = self.config.tab_width.max(1);
        let unit = self.indent_unit();
        repeat_len(unit.len(), levels)?;
        let unit = unit.repeat(levels);

        for line in first..=last {
            let chars = self.buf.line_chars(line);
            if chars.is_empty() {
                continue;
            }
            if right {
                self.insert_text(Point::new(line, 0), &unit)?;
                continue;
            }
            let target = levels.saturating_mul(tab);
            let mut width = 0;
            let mut n = 0;
            for &c in &chars {
                if width >= target {
                    break;
                }
                match c {
                    ' ' => width += 1,
                    '\t' => width += tab - width % tab,
                    _ => break,
                }
                n += 1;
            }
            self.remove_span(Point::new(line, 0), Point::new(line, n))?;
        }
        self.set_cursor(Point::new(first, self.buf.first_non_blank(first)), false);
        Ok(())
    }

    /// `J`: join the range's lines, at least two.
    fn join(&mut self, range: Range) -> Result<(), ApplyError> {
        let r = range.sorted();
        let line = r.start.line;
        let total = self.buf.line_count();
        if line + 1 >= total {
            return Err(ApplyError::MotionFailed);
        }
        let joins = (r.end.line - line).max(1).min(total - 1 - line);

        let mut col = 0;
        for _ in 0..joins {
            let len = self.buf.content_len(line);
            let next = self.buf.line_chars(line + 1);
            let lead = next.iter().take_while(|c| is_blank(**c)).count();
            let ends_blank =
                len > 0 && self.buf.char_at(Point::new(line, len - 1)).is_some_and(is_blank);

            self.remove_span(Point::new(line, len), Point::new(line + 1, lead))?;
            let space = len > 0 && !ends_blank && next.get(lead).is_some_and(|&c| c != ')');
            if space {
                self.insert_text(Point::new(line, len), " ")?;
            }
            col = len;
        }
        self.set_cursor(Point::new(line, col), false);
        Ok(())
    }

    /// `~` moves past what it flipped; `g~` and visual `~` stay at the start.
    fn flip_case(&mut self, action: &Action, range: Range) -> Result<(), ApplyError> {
        let (start, stop) = self.span_points(action, range)?;
        let text = self.buf.text_between(start, stop).unwrap_or_default();
        self.replace_span(start, stop, &flip_case_str(&text))?;
        let tilde = action.motion.is_some_and(|m| m.kind == MotionKind::Right);
        self.set_cursor(if tilde { stop } else { start }, false);
        Ok(())
    }

    /// Ctrl-A / Ctrl-X. In Visual every selected line has its first number
    /// changed.
    fn increment(
        &mut self,
        action: &Action,
        range: Option<Range>,
        sign: i64,
    ) -> Result<(), ApplyError> {
        let amount = i64::try_from(action.count())
            .unwrap_or(i64::MAX)
            .saturating_mul(sign);
        let Some(range) = range else {
            let c = self.view.cursor;
            let at = self.add_to_number(c.line, c.col, amount)?;
            self.set_cursor(at, false);
            return Ok(());
        };

        let r = range.sorted();
        let last_line = self.buf.line_count().saturating_sub(1);
        let mut changed = false;
        for line in r.start.line..=r.end.line.min(last_line) {
            let col = if line == r.start.line && !action.is_linewise() {
                r.start.col
            } else {
                0
            };
            match self.add_to_number(line, col, amount) {
                Ok(_) => changed = true,
                Err(ApplyError::NoNumber) => {}
                Err(e) => return Err(e),
            }
        }
        if !changed {
            return Err(ApplyError::NoNumber);
        }
        self.set_cursor(r.start, false);
        Ok(())
    }

    /// Add `amount` to the number under or after `col`. Returns where the
    /// number starts.
    fn add_to_number(&mut self, line: usize, col: usize, amount: i64) -> Result<Point, ApplyError> {
        let chars = self.buf.line_chars(line);
        let mut start = (col..chars.len())
            .find(|&i| chars[i].is_ascii_digit())
            .ok_or(ApplyError::NoNumber)?;
        while start > 0 && chars[start - 1].is_ascii_digit() {
            start -= 1;
        }
        let end = (start..chars.len())
            .find(|&i| !chars[i].is_ascii_digit())
            .unwrap_or(chars.len());
        let negative = start > 0 && chars[start - 1] == '-';
        let token = if negative { start - 1 } else { start };

        let digits: String = chars[start..end].iter().collect();
        // Only digits, so a failed parse is an overflow.
        let value: i64 = digits.parse().unwrap_or(i64::MAX);
        let value = if negative { -value } else { value };
        let text = value.saturating_add(amount).to_string();

        let at = Point::new(line, token);
        self.replace_span(at, Point::new(line, end), &text)?;
        Ok(at)
    }

    /// `r`: replace `count` chars under the cursor, or every char of the
    /// selection. `r<CR>` swaps the chars for one line break.
    fn replace_char(&mut self, action: &Action, range: Option<Range>) -> Result<(), ApplyError> {
        let ch = action.verb.arg.ok_or(ApplyError::MotionFailed)?;
        if let Some(range) = range {
            if ch == '\n' {
                return Err(ApplyError::MotionFailed);
            }
            let (start, stop) = self.span_points(action, range)?;
            let text = self.buf.text_between(start, stop).unwrap_or_default();
            let fill: String = text
                .chars()
                .map(|c| if matches!(c, '\n' | '\r') { c } else { ch })
                .collect();
            self.replace_span(start, stop, &fill)?;
            self.set_cursor(start, false);
            return Ok(());
        }

        let c = self.view.cursor;
        let count = action.count();
        if c.col.saturating_add(count) > self.buf.content_len(c.line) {
            return Err(ApplyError::MotionFailed);
        }
        let stop = c.with_col(c.col + count);
        if ch == '\n' {
            self.remove_span(c, stop)?;
            let end = self.insert_text(c, "\n")?;
            self.set_cursor(end, false);
        } else {
            let fill: String = std::iter::repeat_n(ch, count).collect();
            self.replace_span(c, stop, &fill)?;
            self.set_cursor(c.with_col(c.col + count - 1), false);
        }
        Ok(())
    }
}

// ── Mode entries, history, search ────────────────────────────────────────

impl Editor<'_> {
    /// `i a I A o O`.
    fn insert(
        &mut self,
        action: &Action,
        kind: InsertKind,
        replay: Option<&Replay>,
    ) -> Result<(), ApplyError> {
        let c = self.view.cursor;
        let len = self.buf.content_len(c.line);
        let mut indented = false;
        let at = match kind {
            InsertKind::Before => c,
            InsertKind::After => c.with_col((c.col + 1).min(len)),
            InsertKind::LineStart => c.with_col(self.buf.first_non_blank(c.line)),
            InsertKind::LineEnd => c.with_col(len),
            InsertKind::OpenBelow => {
                let indent = self.open_indent(c.line);
                indented = !indent.is_empty();
                self.insert_text(c.with_col(len), &format!("\n{indent}"))?
            }
            InsertKind::OpenAbove => {
                let indent = self.buf.indent_of(c.line);
                indented = !indent.is_empty();
                self.insert_text(c.with_col(0), &format!("{indent}\n"))?;
                Point::new(c.line, indent.chars().count())
            }
        };
        self.begin_insert(action, replay, Transition::EnterInsert);
        self.vim.auto_indent = indented;
        self.set_cursor(at, true);
        Ok(())
    }

    /// Start an insert or replace session. The log is kept while `.` is
    /// replaying it.
    pub(crate) fn begin_insert(&mut self, action: &Action, replay: Option<&Replay>, event: Transition) {
        if replay.is_none() {
            self.vim.insert_log.clear();
        }
        let kind = action.verb.kind;
        self.vim.insert_repeat = match kind {
            VerbKind::Insert(_) | VerbKind::ReplaceMode => action.count().saturating_sub(1),
            _ => 0,
        };
        self.vim.insert_opens_line = matches!(
            kind,
            VerbKind::Insert(InsertKind::OpenBelow | InsertKind::OpenAbove)
        );
        self.vim.block_insert = None;
        self.vim.auto_indent = false;
        self.transition(event);
    }

    fn undo(&mut self, count: usize, redo: bool) -> Result<(), ApplyError> {
        self.vim.chain_undo = false;
        for step in 0..count {
            let restored = if redo { self.buf.redo() } else { self.buf.undo() };
            match restored {
                Some(pt) => self.set_cursor(pt, false),
                None if step == 0 => {
                    return Err(if redo {
                        ApplyError::NothingToRedo
                    } else {
                        ApplyError::NothingToUndo
                    });
                }
                None => break,
            }
        }
        Ok(())
    }

    /// A committed `/` or `?`. An empty pattern searches for the last one.
    fn search(&mut self, dir: SearchDirection, pattern: Option<&str>) -> Result<(), ApplyError> {
        let pattern = match pattern.filter(|p| !p.is_empty()) {
            Some(p) => p.to_string(),
            None => self
                .vim
                .search
                .pattern()
                .ok_or(ApplyError::NoPreviousPattern)?
                .to_string(),
        };
        let re = search::compile(&pattern, self.config.ignorecase)
            .map_err(|e| ApplyError::InvalidPattern(e.to_string()))?;
        self.vim.search.set(pattern.clone(), dir);
        let at = search::find(self.buf, &re, self.view.cursor, dir, self.config.wrapscan)
            .ok_or(ApplyError::PatternNotFound(pattern))?;
        self.set_cursor(at, false);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
