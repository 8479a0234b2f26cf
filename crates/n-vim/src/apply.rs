//! The action applier.
//!
//! Takes a complete [`Action`] from the parser and carries it out:
//!
//! 1. resolve `count × motion count` steps of the motion into a [`Range`]
//! 2. run the verb on that range (see [`verb`](crate::verb))
//! 3. store the action for `.` if it is repeatable
//!
//! In visual-block mode the block verbs bypass step 1 and run once per
//! covered line instead.

use n_buffer::{Buffer, BufferError, Change, Config, Point, Range, View};
use tracing::debug;

use crate::action::{Action, ActionFlags, InsertKind, Motion, MotionKind, VerbKind};
use crate::error::ApplyError;
use crate::key;
use crate::mode::{Transition, VisualKind};
use crate::motion::{self, MotionCtx};
use crate::register::Yank;
use crate::verb::{self, BlockInsert};
use crate::vim::VimState;
use crate::word;

/// Proof that an action is being applied by `.`.
///
/// Only the applier can make one, so a verb that receives one knows it is
/// inside a repeat.
#[derive(Debug)]
pub struct Replay(());

/// Everything one key may touch.
pub(crate) struct Editor<'a> {
    pub vim: &'a mut VimState,
    pub buf: &'a mut Buffer,
    pub view: &'a mut View,
    pub config: &'a Config,
}

// ── Edits ────────────────────────────────────────────────────────────────

impl Editor<'_> {
    /// Insert text at `at` and log it. Returns the point after the text.
    ///
    /// The first edit of an action opens an undo group unless the action
    /// chains; every later edit joins it.
    pub(crate) fn insert_text(&mut self, at: Point, text: &str) -> Result<Point, ApplyError> {
        if text.is_empty() {
            return Ok(at);
        }
        let before = self.view.cursor;
        let end = self.buf.insert(at, text)?;
        self.buf
            .commit(Change::insert(at, text, before, end).chained(self.vim.chain_undo));
        self.vim.chain_undo = true;
        Ok(end)
    }

    /// Remove `[start, stop)` and log it. Returns the removed text.
    pub(crate) fn remove_span(&mut self, start: Point, stop: Point) -> Result<String, ApplyError> {
        let a = self
            .buf
            .point_to_char(start)
            .ok_or(BufferError::OutOfBounds(start))?;
        let b = self
            .buf
            .point_to_char(stop)
            .ok_or(BufferError::OutOfBounds(stop))?;
        if b <= a {
            return Ok(String::new());
        }
        let before = self.view.cursor;
        let text = self.buf.remove(start, b - a)?;
        self.buf
            .commit(Change::remove(start, &text, before, start).chained(self.vim.chain_undo));
        self.vim.chain_undo = true;
        Ok(text)
    }

    /// Swap `[start, stop)` for `text`, skipping the edit when nothing changes.
    pub(crate) fn replace_span(
        &mut self,
        start: Point,
        stop: Point,
        text: &str,
    ) -> Result<(), ApplyError> {
        if self.buf.text_between(start, stop).as_deref() == Some(text) {
            return Ok(());
        }
        self.remove_span(start, stop)?;
        self.insert_text(start, text)?;
        Ok(())
    }

    /// Move through the mode machine, logging real changes.
    pub(crate) fn transition(&mut self, event: Transition) {
        let next = self.vim.mode.next(event);
        if next != self.vim.mode {
            debug!(target: "vim.mode", from = %self.vim.mode, to = %next, ?event);
            self.vim.mode = next;
        }
    }

    /// Clamp the cursor for the current mode, or one past the end when
    /// `past_end`.
    pub(crate) fn set_cursor(&mut self, pt: Point, past_end: bool) {
        self.view.cursor = self
            .buf
            .clamp_point(pt, past_end || self.vim.mode.cursor_past_end());
    }
}

// ── Applying actions ─────────────────────────────────────────────────────

/// Verbs that run once per line in visual-block mode.
const fn is_block_verb(kind: VerbKind) -> bool {
    matches!(
        kind,
        VerbKind::Yank
            | VerbKind::Delete
            | VerbKind::Change
            | VerbKind::FlipCase
            | VerbKind::ReplaceChar
            | VerbKind::PasteReplace
            | VerbKind::Insert(InsertKind::Before | InsertKind::After)
    )
}

impl Editor<'_> {
    /// Apply a parsed action. `replay` is set when `.` is re-running it.
    ///
    /// # Errors
    ///
    /// Whatever the motion or the verb reports. The buffer keeps any edit
    /// already chained into the current undo group.
    pub(crate) fn apply(&mut self, action: &Action, replay: Option<&Replay>) -> Result<(), ApplyError> {
        debug!(
            target: "vim.apply",
            verb = ?action.verb.kind,
            motion = ?action.motion.map(|m| m.kind),
            count = ?action.count,
            register = ?action.register,
            mode = %self.vim.mode,
            replay = replay.is_some(),
        );
        self.vim.chain_undo = false;
        let stored = (action.flags.contains(ActionFlags::REPEATABLE) && replay.is_none())
            .then(|| self.repeatable(action))
            .flatten();

        let block = self.vim.mode.visual_kind() == Some(VisualKind::Block);
        if block && is_block_verb(action.verb.kind) {
            self.apply_block(action)?;
        } else {
            self.apply_range(action, replay)?;
        }

        if self.vim.mode.is_input() && !action.flags.contains(ActionFlags::CHAIN_UNDO) {
            self.vim.chain_undo = false;
        }
        if let Some(stored) = stored {
            self.vim.last_action = Some(stored);
        }
        Ok(())
    }

    /// The form of `action` that `.` replays. A selection is stored by its
    /// shape so the repeat applies from wherever the cursor is then.
    fn repeatable(&self, action: &Action) -> Option<Action> {
        let mut stored = action.clone();
        let Some(m) = stored
            .motion
            .as_mut()
            .filter(|m| m.kind == MotionKind::VisualRange)
        else {
            return Some(stored);
        };
        let r = Range::new(self.vim.anchor, self.view.cursor).sorted();
        match self.vim.mode.visual_kind()? {
            VisualKind::Char => {
                let lines = r.end.line - r.start.line;
                let cols = if lines == 0 {
                    r.end.col - r.start.col
                } else {
                    r.end.col
                };
                m.kind = MotionKind::VisualExtent { lines, cols };
            }
            VisualKind::Line => {
                m.kind = MotionKind::CurrentLine;
                m.count = None;
                stored.count = Some(r.line_span());
            }
            VisualKind::Block => return None,
        }
        Some(stored)
    }

    fn apply_range(&mut self, action: &Action, replay: Option<&Replay>) -> Result<(), ApplyError> {
        let Some(motion) = action.motion else {
            let result = self.run_verb(action, None, replay);
            if action.verb.kind != VerbKind::Move {
                self.buf.set_motion_column(None);
            }
            return result;
        };

        let mut action = action.clone();
        let range = self.resolve(&mut action, &motion)?;
        self.run_verb(&action, Some(range), replay)?;

        let column = match motion.kind {
            MotionKind::Up | MotionKind::Down if action.verb.kind == VerbKind::Move => {
                self.buf.motion_column()
            }
            MotionKind::LineEnd if action.verb.kind == VerbKind::Move => Some(usize::MAX),
            _ => None,
        };
        self.buf.set_motion_column(column);
        Ok(())
    }

    /// Run the motion `count` times and settle the range's flags.
    fn resolve(&mut self, action: &mut Action, motion: &Motion) -> Result<Range, ApplyError> {
        let cursor = self.view.cursor;
        let verb_pending = action.verb.kind != VerbKind::Move;
        let (count, explicit) = action.total_count();

        // `cw` on a word changes to its end, like `ce`.
        if action.verb.kind == VerbKind::Change {
            if let MotionKind::WordStart(kind) = motion.kind {
                if self.buf.char_at(cursor).is_some_and(|c| !c.is_whitespace()) {
                    action.flags.remove(ActionFlags::EXCLUSIVE);
                    return self.word_end_range(cursor, kind, count);
                }
            }
        }

        if matches!(
            motion.kind,
            MotionKind::RepeatFind | MotionKind::RepeatFindReverse
        ) {
            if let Ok((kind, _)) = motion::effective_find(motion.kind, &self.vim.find) {
                action.flags.set(ActionFlags::EXCLUSIVE, kind.exclusive());
            }
        }

        if motion.kind.is_vertical() && self.buf.motion_column().is_none() {
            let col = motion::display_col(self.buf, cursor, self.config.tab_width);
            self.buf.set_motion_column(Some(col));
        }

        let mut cx = MotionCtx {
            buf: self.buf,
            view: self.view,
            config: self.config,
            mode: self.vim.mode,
            verb_pending,
            anchor: self.vim.anchor,
            find: &mut self.vim.find,
            search: &mut self.vim.search,
        };
        let mut range = Range::point(cursor);
        if motion.kind.takes_count() {
            return motion::evaluate(motion, count, explicit, range, &mut cx);
        }
        let mut first_stop = None;
        let mut step = 0;
        while step < count {
            let next = match motion::evaluate(motion, 1, explicit, range, &mut cx) {
                Ok(next) if next == range => break,
                Ok(next) => next,
                Err(_) if step > 0 && motion.kind.saturates() => break,
                Err(e) => return Err(e),
            };
            range = next;
            match first_stop {
                None => first_stop = Some(next),
                // Back where the first step landed (a wrapping `n`): the
                // stops repeat every `step` steps, so skip the whole laps.
                Some(first) if first == next => {
                    let left = count - step - 1;
                    step = count - left % step - 1;
                }
                Some(_) => {}
            }
            step += 1;
        }
        Ok(range)
    }

    /// `cw`: from the cursor to the end of the `count`th word.
    fn word_end_range(
        &self,
        cursor: Point,
        kind: word::WordKind,
        count: usize,
    ) -> Result<Range, ApplyError> {
        let (_, mut end) =
            word::word_object(self.buf, cursor, kind, true).ok_or(ApplyError::MotionFailed)?;
        for _ in 1..count {
            match word::next_word_end(self.buf, end, kind) {
                Some(next) if next != end => end = next,
                _ => break,
            }
        }
        Ok(Range::new(cursor, end))
    }
}

// ── Visual block ─────────────────────────────────────────────────────────

impl Editor<'_> {
    /// Run a block verb once per line of the rectangle between the anchor
    /// and the cursor. Lines too short to reach the block are skipped.
    fn apply_block(&mut self, action: &Action) -> Result<(), ApplyError> {
        let a = self.vim.anchor;
        let c = self.view.cursor;
        let last_line = self.buf.line_count().saturating_sub(1);
        let (first, last) = (a.line.min(c.line), a.line.max(c.line).min(last_line));
        let (left, right) = (a.col.min(c.col), a.col.max(c.col));
        let kind = action.verb.kind;

        match kind {
            VerbKind::Insert(InsertKind::After) => {
                return self.begin_block_insert(first, last, right + 1, true);
            }
            VerbKind::Insert(_) => return self.begin_block_insert(first, last, left, false),
            VerbKind::ReplaceChar if action.verb.arg == Some('\n') => {
                return Err(ApplyError::MotionFailed);
            }
            _ => {}
        }

        let paste = if kind == VerbKind::PasteReplace {
            Some(self.register_yank(action)?)
        } else {
            None
        };

        let mut rows = Vec::with_capacity(last - first + 1);
        let mut reached = Vec::new();
        for line in first..=last {
            let len = self.buf.content_len(line);
            if left >= len {
                rows.push(String::new());
                continue;
            }
            let start = Point::new(line, left);
            let stop = Point::new(line, right.min(len - 1) + 1);
            let text = self.buf.text_between(start, stop).unwrap_or_default();
            match kind {
                VerbKind::Delete | VerbKind::Change | VerbKind::PasteReplace => {
                    self.remove_span(start, stop)?;
                }
                VerbKind::FlipCase => {
                    self.replace_span(start, stop, &verb::flip_case_str(&text))?;
                }
                VerbKind::ReplaceChar => {
                    let ch = action.verb.arg.ok_or(ApplyError::MotionFailed)?;
                    let fill: String = std::iter::repeat_n(ch, text.chars().count()).collect();
                    self.replace_span(start, stop, &fill)?;
                }
                _ => {}
            }
            rows.push(text);
            reached.push(line);
        }
        if reached.is_empty() && kind != VerbKind::Yank {
            return Err(ApplyError::EmptyRange);
        }

        if matches!(kind, VerbKind::Yank | VerbKind::Delete | VerbKind::Change) {
            self.write_register(action, Yank::Block(rows));
        }
        let past_end = kind == VerbKind::Change;
        self.set_cursor(Point::new(first, left), past_end);

        match kind {
            VerbKind::Change => {
                self.transition(Transition::EnterInsert);
                reached.retain(|&l| l != first);
                self.start_block_session(first, left, reached);
                Ok(())
            }
            VerbKind::PasteReplace => {
                self.transition(Transition::VerbApplied);
                match paste {
                    Some(yank) => self.put(&yank, action.count(), false),
                    None => Ok(()),
                }
            }
            _ => {
                self.transition(Transition::VerbApplied);
                Ok(())
            }
        }
    }

    /// Block `I`/`A`: type on the first line, replicate on Esc. `I` skips
    /// lines that end before the block; `A` pads them.
    fn begin_block_insert(
        &mut self,
        first: usize,
        last: usize,
        col: usize,
        pad: bool,
    ) -> Result<(), ApplyError> {
        let len = self.buf.content_len(first);
        if pad && len < col {
            self.insert_text(Point::new(first, len), &" ".repeat(col - len))?;
        }
        let lines = (first + 1..=last)
            .filter(|&l| pad || self.buf.content_len(l) > col)
            .collect();
        self.transition(Transition::EnterInsert);
        self.set_cursor(Point::new(first, col), true);
        self.start_block_session(first, col, lines);
        Ok(())
    }

    fn start_block_session(&mut self, first: usize, col: usize, lines: Vec<usize>) {
        self.vim.insert_log.clear();
        self.vim.insert_repeat = 0;
        self.vim.insert_opens_line = false;
        self.vim.auto_indent = false;
        self.vim.block_insert = Some(BlockInsert { first, col, lines });
    }
}

// ── Dot-repeat ───────────────────────────────────────────────────────────

impl Editor<'_> {
    /// `.`: run the last repeatable action again from the cursor. A count
    /// replaces the stored one.
    pub(crate) fn dot_repeat(
        &mut self,
        action: &Action,
        replay: Option<&Replay>,
    ) -> Result<(), ApplyError> {
        if replay.is_some() {
            return Err(ApplyError::NestedRepeat);
        }
        let mut last = self
            .vim
            .last_action
            .clone()
            .ok_or(ApplyError::NothingToRepeat)?;
        if let Some(count) = action.count {
            last.count = Some(count);
            if let Some(m) = last.motion.as_mut() {
                m.count = None;
            }
            self.vim.last_action = Some(last.clone());
        }

        let mode = self.vim.mode;
        let token = Replay(());
        self.apply(&last, Some(&token))?;

        if self.vim.mode.is_input() {
            let keys = self.vim.insert_log.keys().to_vec();
            for k in keys {
                self.input_key(k, false);
            }
            self.input_key(key::ESC, false);
        }
        self.vim.mode = mode;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Verb;
    use crate::mode::Mode;
    use crate::register::YankType;
    use crate::word::WordKind;
    use n_buffer::Rect;
    use pretty_assertions::assert_eq;

    fn p(line: usize, col: usize) -> Point {
        Point::new(line, col)
    }

    fn action(verb: VerbKind, motion: Option<MotionKind>, mode: Mode) -> Action {
        Action::new(None, None, Verb::new(verb), motion.map(Motion::new), mode)
    }

    /// Apply one action to `text` with the cursor at `at`.
    fn run(text: &str, at: Point, action: &Action) -> (Result<(), ApplyError>, VimState, Buffer, View) {
        let mut vim = VimState::new();
        let mut buf = Buffer::from_text(text);
        let mut view = View::new(Rect::new(80, 24));
        view.cursor = at;
        let config = Config::default();
        let result = Editor {
            vim: &mut vim,
            buf: &mut buf,
            view: &mut view,
            config: &config,
        }
        .apply(action, None);
        (result, vim, buf, view)
    }

    #[test]
    fn saturating_motion_stops_quietly() {
        let a = Action::new(
            Some(10),
            None,
            Verb::new(VerbKind::Move),
            Some(Motion::new(MotionKind::Right)),
            Mode::Normal,
        );
        let (r, _, _, view) = run("abc", p(0, 0), &a);
        assert_eq!(r, Ok(()));
        assert_eq!(view.cursor, p(0, 2));
    }

    #[test]
    fn insert_session_chains_only_when_flagged() {
        let mut a = action(
            VerbKind::Change,
            Some(MotionKind::WordStart(WordKind::Small)),
            Mode::Normal,
        );
        assert!(a.flags.contains(ActionFlags::CHAIN_UNDO));
        a.flags.remove(ActionFlags::CHAIN_UNDO);

        let (r, mut vim, mut buf, mut view) = run("foo bar", p(0, 0), &a);
        assert_eq!(r, Ok(()));
        let config = Config::default();
        let mut ed = Editor {
            vim: &mut vim,
            buf: &mut buf,
            view: &mut view,
            config: &config,
        };
        ed.input_key('X', true);
        ed.input_key(key::ESC, true);
        assert_eq!(buf.contents(), "X bar");
        assert!(buf.undo().is_some());
        assert_eq!(buf.contents(), " bar");
        assert!(buf.undo().is_some());
        assert_eq!(buf.contents(), "foo bar");
    }

    #[test]
    fn failed_motion_leaves_buffer_alone() {
        let a = action(VerbKind::Delete, Some(MotionKind::Left), Mode::Normal);
        let (r, _, buf, _) = run("abc", p(0, 0), &a);
        assert_eq!(r, Err(ApplyError::MotionFailed));
        assert_eq!(buf.contents(), "abc");
        assert!(!buf.history().can_undo());
    }

    #[test]
    fn non_saturating_repeat_aborts() {
        let a = Action::new(
            Some(5),
            None,
            Verb::new(VerbKind::Move),
            Some(Motion::new(MotionKind::WordBack(WordKind::Small))),
            Mode::Normal,
        );
        let (r, _, _, view) = run("one two", p(0, 4), &a);
        assert_eq!(r, Err(ApplyError::MotionFailed));
        assert_eq!(view.cursor, p(0, 4));
    }

    #[test]
    fn change_word_acts_like_change_end() {
        let a = action(
            VerbKind::Change,
            Some(MotionKind::WordStart(WordKind::Small)),
            Mode::Normal,
        );
        let (r, vim, buf, view) = run("foo bar", p(0, 0), &a);
        assert_eq!(r, Ok(()));
        assert_eq!(buf.contents(), " bar");
        assert_eq!(view.cursor, p(0, 0));
        assert_eq!(vim.mode(), Mode::Insert);
    }

    #[test]
    fn repeatable_actions_are_stored() {
        let a = action(VerbKind::Delete, Some(MotionKind::Right), Mode::Normal);
        let (_, vim, _, _) = run("abc", p(0, 0), &a);
        assert_eq!(vim.last_action.map(|a| a.verb.kind), Some(VerbKind::Delete));

        let a = action(VerbKind::Move, Some(MotionKind::Right), Mode::Normal);
        let (_, vim, _, _) = run("abc", p(0, 0), &a);
        assert_eq!(vim.last_action, None);
    }

    #[test]
    fn vertical_moves_keep_motion_column() {
        let a = action(VerbKind::Move, Some(MotionKind::Down), Mode::Normal);
        let (_, _, buf, view) = run("abcd\nab\nabcd", p(0, 3), &a);
        assert_eq!(view.cursor, p(1, 1));
        assert_eq!(buf.motion_column(), Some(3));
    }

    #[test]
    fn dollar_remembers_line_end() {
        let a = action(VerbKind::Move, Some(MotionKind::LineEnd), Mode::Normal);
        let (_, _, buf, _) = run("abcd", p(0, 0), &a);
        assert_eq!(buf.motion_column(), Some(usize::MAX));
    }

    #[test]
    fn nested_repeat_is_rejected() {
        let mut vim = VimState::new();
        let mut buf = Buffer::from_text("abc");
        let mut view = View::new(Rect::new(80, 24));
        let config = Config::default();
        let mut ed = Editor {
            vim: &mut vim,
            buf: &mut buf,
            view: &mut view,
            config: &config,
        };
        let dot = action(VerbKind::DotRepeat, None, Mode::Normal);
        assert_eq!(ed.dot_repeat(&dot, None), Err(ApplyError::NothingToRepeat));
        assert_eq!(
            ed.dot_repeat(&dot, Some(&Replay(()))),
            Err(ApplyError::NestedRepeat)
        );
    }

    #[test]
    fn block_yank_keeps_short_rows() {
        let mut vim = VimState::new();
        vim.mode = Mode::Visual(VisualKind::Block);
        vim.anchor = p(0, 1);
        let mut buf = Buffer::from_text("abcd\na\nabcd");
        let mut view = View::new(Rect::new(80, 24));
        view.cursor = p(2, 2);
        let config = Config::default();
        let a = action(VerbKind::Yank, Some(MotionKind::VisualRange), vim.mode);
        Editor {
            vim: &mut vim,
            buf: &mut buf,
            view: &mut view,
            config: &config,
        }
        .apply(&a, None)
        .unwrap();
        let yank = vim.registers().get('"').cloned().unwrap();
        assert_eq!(yank.kind(), YankType::Block);
        assert_eq!(
            yank,
            Yank::Block(vec!["bc".into(), String::new(), "bc".into()])
        );
        assert_eq!(view.cursor, p(0, 1));
        assert_eq!(vim.mode(), Mode::Normal);
    }
}
