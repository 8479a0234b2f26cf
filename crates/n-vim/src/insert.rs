//! The keys of one insert or replace session.
//!
//! Every key that reaches the buffer in Insert or Replace mode is logged,
//! control keys included, so a replay feeds the exact same sequence back
//! through the insert handler. The closing Esc is not logged.
//!
//! The log is replayed for:
//!
//! - `.` after a verb that entered Insert (`ciw`, `o`, `A`, ...)
//! - a count on the insert (`3ix<Esc>`)
//! - visual-block `I`/`A`/`c`, once per remaining line

use std::fmt;

use n_buffer::Point;
use tracing::{debug, trace};

use crate::apply::Editor;
use crate::error::ApplyError;
use crate::key;
use crate::mode::{Mode, Transition};
use crate::motion;
use crate::parser::ParseResult;
use crate::verb;

/// Keys typed in the current or last insert session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertLog {
    keys: Vec<char>,
}

impl InsertLog {
    /// An empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Forget the keys, at the start of a new session.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Log one key that reached the buffer.
    pub fn push(&mut self, key: char) {
        self.keys.push(key);
    }

    /// The logged keys, oldest first.
    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[char] {
        &self.keys
    }

    /// Nothing was typed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of logged keys.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

impl fmt::Display for InsertLog {
    /// Printable form: control keys as `<Esc>`, `<CR>`, `<BS>`, `<Tab>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &k in &self.keys {
            match k {
                key::ENTER | key::NEWLINE => f.write_str("<CR>")?,
                key::TAB => f.write_str("<Tab>")?,
                k if key::is_backspace(k) => f.write_str("<BS>")?,
                k => write!(f, "{k}")?,
            }
        }
        Ok(())
    }
}

// ── Insert and Replace keys ──────────────────────────────────────────────

const fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

impl Editor<'_> {
    /// Handle one key in Insert or Replace mode. `record` logs the key for
    /// replay; replays pass `false`.
    pub(crate) fn input_key(&mut self, key: char, record: bool) -> ParseResult {
        if !self.vim.mode.is_input() {
            return ParseResult::KeyNotHandled;
        }
        let replace = self.vim.mode == Mode::Replace;
        let (outcome, logged) = match key {
            key::ESC => (self.finish_insert(Transition::Escape), false),
            k if key::is_enter(k) && replace => (self.finish_insert(Transition::Newline), false),
            k if key::is_enter(k) => (self.newline(), true),
            k if key::is_backspace(k) => (self.backspace(), true),
            key::TAB => (self.tab(), true),
            k if k.is_control() => return ParseResult::KeyNotHandled,
            k => (self.type_char(k), true),
        };
        if logged && !key::is_enter(key) {
            self.vim.auto_indent = false;
        }
        match outcome {
            Ok(()) => {
                trace!(target: "vim.insert", ?key, cursor = ?self.view.cursor);
                if record && logged {
                    self.vim.insert_log.push(key);
                }
            }
            Err(e) => {
                debug!(target: "vim.insert", ?key, error = %e);
                self.vim.last_error = Some(e);
            }
        }
        ParseResult::Complete
    }

    fn type_text(&mut self, text: &str) -> Result<(), ApplyError> {
        let end = self.insert_text(self.view.cursor, text)?;
        self.view.cursor = end;
        Ok(())
    }

    fn type_char(&mut self, ch: char) -> Result<(), ApplyError> {
        let c = self.view.cursor;
        let len = self.buf.content_len(c.line);
        if self.vim.mode == Mode::Replace && c.col < len {
            let next = c.with_col(c.col + 1);
            self.replace_span(c, next, ch.encode_utf8(&mut [0; 4]))?;
            self.view.cursor = next;
            return Ok(());
        }
        if ch == '}' {
            self.dedent_before(c)?;
        }
        self.type_text(ch.encode_utf8(&mut [0; 4]))
    }

    /// `}` typed after nothing but indent drops one level.
    fn dedent_before(&mut self, c: Point) -> Result<(), ApplyError> {
        let chars = self.buf.line_chars(c.line);
        let before = &chars[..c.col.min(chars.len())];
        if before.is_empty() || !before.iter().all(|&ch| is_blank(ch)) {
            return Ok(());
        }
        let n = if before.last() == Some(&'\t') {
            1
        } else {
            before
                .iter()
                .rev()
                .take(self.config.tab_width.max(1))
                .take_while(|&&ch| ch == ' ')
                .count()
        };
        let start = c.with_col(before.len() - n);
        self.remove_span(start, c)?;
        self.view.cursor = start;
        Ok(())
    }

    /// Break the line, carrying the indent over. A line holding only
    /// auto-indent is emptied first.
    fn newline(&mut self) -> Result<(), ApplyError> {
        let c = self.view.cursor;
        let chars = self.buf.line_chars(c.line);
        let col = c.col.min(chars.len());
        let before: String = chars[..col].iter().collect();

        let mut indent: String = self.buf.indent_of(c.line).chars().take(col).collect();
        if before.trim_end().ends_with('{') {
            indent.push_str(&self.indent_unit());
        }

        let mut at = c;
        if self.vim.auto_indent && col == chars.len() && before.chars().all(is_blank) {
            at = c.with_col(0);
            self.remove_span(at, c)?;
        }
        let end = self.insert_text(at, &format!("\n{indent}"))?;
        self.view.cursor = end;
        self.vim.auto_indent = !indent.is_empty();
        Ok(())
    }

    /// Insert deletes back over line breaks; Replace only moves left.
    fn backspace(&mut self) -> Result<(), ApplyError> {
        let c = self.view.cursor;
        if self.vim.mode == Mode::Replace || c.col > 0 {
            if let Some(col) = c.col.checked_sub(1) {
                let prev = c.with_col(col);
                if self.vim.mode == Mode::Insert {
                    self.remove_span(prev, c)?;
                }
                self.view.cursor = prev;
            }
            return Ok(());
        }
        if c.line > 0 {
            let prev = Point::new(c.line - 1, self.buf.content_len(c.line - 1));
            self.remove_span(prev, c)?;
            self.view.cursor = prev;
        }
        Ok(())
    }

    /// Spaces to the next tab stop, or a tab character.
    fn tab(&mut self) -> Result<(), ApplyError> {
        if !self.config.insert_spaces {
            return self.type_text("\t");
        }
        let width = self.config.tab_width.max(1);
        let col = motion::display_col(self.buf, self.view.cursor, width);
        self.type_text(&" ".repeat(width - col % width))
    }

    /// Close the session: repeat it for a count, copy a block insert down
    /// its lines, then leave for Normal.
    pub(crate) fn finish_insert(&mut self, event: Transition) -> Result<(), ApplyError> {
        let keys = self.vim.insert_log.keys().to_vec();
        let mut repeat = std::mem::take(&mut self.vim.insert_repeat);
        if keys.is_empty() && !self.vim.insert_opens_line {
            repeat = 0;
        }
        let per_run = keys.len() + usize::from(self.vim.insert_opens_line);
        let too_long = verb::repeat_len(per_run, repeat).is_err();
        if too_long {
            repeat = 0;
        }
        for _ in 0..repeat {
            if self.vim.insert_opens_line {
                self.newline()?;
            }
            for &k in &keys {
                self.input_key(k, false);
            }
        }

        let block = self.vim.block_insert.take();
        if let Some(block) = &block {
            if !keys.iter().any(|&k| key::is_enter(k)) {
                for &line in &block.lines {
                    let len = self.buf.content_len(line);
                    if len < block.col {
                        self.insert_text(Point::new(line, len), &" ".repeat(block.col - len))?;
                    }
                    self.view.cursor = Point::new(line, block.col);
                    for &k in &keys {
                        self.input_key(k, false);
                    }
                }
            }
        }

        let c = self.view.cursor;
        let len = self.buf.content_len(c.line);
        if self.vim.auto_indent
            && c.col == len
            && self.buf.line_chars(c.line).iter().all(|&ch| is_blank(ch))
        {
            self.remove_span(Point::new(c.line, 0), c)?;
        }

        self.vim.insert_opens_line = false;
        self.vim.auto_indent = false;
        self.vim.chain_undo = false;
        self.transition(event);
        let c = match block {
            Some(block) => Point::new(block.first, block.col),
            None => {
                let c = self.view.cursor;
                c.with_col(c.col.saturating_sub(1))
            }
        };
        self.set_cursor(c, false);
        debug!(target: "vim.insert", keys = %self.vim.insert_log, repeat, "insert finished");
        if too_long {
            return Err(ApplyError::TextTooLong);
        }
        Ok(())
    }
}
