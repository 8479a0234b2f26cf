//! The motion catalog.
//!
//! A motion computes where a command reaches from the cursor. It reads the
//! buffer and the view and never changes either; the only state it writes
//! is the last find (`f t F T`) and the last search pattern (`* #`).
//!
//! [`evaluate`] takes the range built so far and returns the next one. For
//! most motions the start stays put and only the end moves, so the applier
//! can call it repeatedly for a count. Text objects and the line and
//! selection pseudo-motions replace both ends.
//!
//! Nothing here clamps to a valid cursor position; a motion either lands
//! on a real point or fails, and the applier clamps for the mode.

use n_buffer::view::{char_col_to_display_col, display_col_to_char_col};
use n_buffer::{Buffer, Config, Point, Range, View};

use crate::action::{Motion, MotionKind};
use crate::error::ApplyError;
use crate::find::{FindCharState, FindKind, find_char};
use crate::mode::Mode;
use crate::search::{self, SearchDirection, SearchState};
use crate::text_object;
use crate::word;

/// Everything a motion may look at.
pub struct MotionCtx<'a> {
    pub buf: &'a Buffer,
    pub view: &'a View,
    pub config: &'a Config,
    pub mode: Mode,
    /// An operator is waiting for this motion.
    pub verb_pending: bool,
    /// The other end of the visual selection.
    pub anchor: Point,
    pub find: &'a mut FindCharState,
    pub search: &'a mut SearchState,
}

impl MotionCtx<'_> {
    /// The last column a cursor may reach on `line`.
    fn last_col(&self, line: usize) -> usize {
        let len = self.buf.content_len(line);
        if self.verb_pending || self.mode.cursor_past_end() {
            len
        } else {
            len.saturating_sub(1)
        }
    }

    fn first_non_blank(&self, line: usize) -> Point {
        Point::new(line, self.buf.first_non_blank(line))
    }
}

/// Display column of a point.
#[must_use]
pub fn display_col(buf: &Buffer, pt: Point, tab_width: usize) -> usize {
    buf.line(pt.line)
        .map_or(0, |l| char_col_to_display_col(l.chars(), pt.col, tab_width))
}

/// Evaluate one step of `motion` from `range`.
///
/// `count` is the full count for motions that [take it
/// themselves](MotionKind::takes_count) and 1 otherwise; `explicit` says
/// whether one was typed.
///
/// # Errors
///
/// Any miss: no target, unset mark, no pattern, or a buffer edge.
#[allow(clippy::too_many_lines)]
pub fn evaluate(
    motion: &Motion,
    count: usize,
    explicit: bool,
    range: Range,
    cx: &mut MotionCtx<'_>,
) -> Result<Range, ApplyError> {
    let buf = cx.buf;
    let from = range.end;
    let to = |end: Point| Ok(Range::new(range.start, end));

    match motion.kind {
        // -- Characters -----------------------------------------------------
        MotionKind::Left => {
            if from.col == 0 {
                return Err(ApplyError::MotionFailed);
            }
            to(from.with_col(from.col - 1))
        }
        MotionKind::Right => {
            if from.col >= cx.last_col(from.line) {
                return Err(ApplyError::MotionFailed);
            }
            to(from.with_col(from.col + 1))
        }

        // -- Lines ----------------------------------------------------------
        MotionKind::Up | MotionKind::Down => {
            let line = if motion.kind == MotionKind::Up {
                from.line.checked_sub(1)
            } else {
                Some(from.line + 1).filter(|&l| l < buf.line_count())
            }
            .ok_or(ApplyError::MotionFailed)?;
            let tab = cx.config.tab_width;
            let want = buf
                .motion_column()
                .unwrap_or_else(|| display_col(buf, from, tab));
            let col = if want == usize::MAX {
                cx.last_col(line)
            } else {
                let chars = buf.line_chars(line);
                display_col_to_char_col(chars.into_iter(), want, tab).min(cx.last_col(line))
            };
            to(Point::new(line, col))
        }
        MotionKind::LineStart => to(from.with_col(0)),
        MotionKind::FirstNonBlank => to(cx.first_non_blank(from.line)),
        MotionKind::LineEnd => {
            let line = from.line.saturating_add(count.saturating_sub(1));
            if line >= buf.line_count() {
                return Err(ApplyError::MotionFailed);
            }
            let len = buf.content_len(line);
            if len == 0 && cx.verb_pending {
                return Err(ApplyError::EmptyRange);
            }
            to(Point::new(line, len.saturating_sub(1)))
        }
        MotionKind::BufferStart | MotionKind::BufferEnd => {
            let last = buf.line_count().saturating_sub(1);
            let line = if explicit {
                count.saturating_sub(1).min(last)
            } else if motion.kind == MotionKind::BufferStart {
                0
            } else {
                last
            };
            to(cx.first_non_blank(line))
        }
        MotionKind::CurrentLine => {
            let last = from
                .line
                .saturating_add(count.saturating_sub(1))
                .min(buf.line_count().saturating_sub(1));
            Ok(Range::new(
                from.with_col(0),
                Point::new(last, buf.content_len(last)),
            ))
        }

        // -- Words ----------------------------------------------------------
        MotionKind::WordStart(kind) => {
            match word::next_word_start(buf, from, kind, cx.verb_pending) {
                Some(pt) => to(pt),
                // The last word: an operator reaches the end of the buffer,
                // a bare move stops on the last char.
                None => {
                    let end = buf.end_point();
                    let target = if cx.verb_pending {
                        end
                    } else {
                        end.with_col(cx.last_col(end.line))
                    };
                    if target == from {
                        return Err(ApplyError::MotionFailed);
                    }
                    to(target)
                }
            }
        }
        MotionKind::WordBack(kind) => {
            to(word::prev_word_start(buf, from, kind).ok_or(ApplyError::MotionFailed)?)
        }
        MotionKind::WordEnd(kind) => {
            to(word::next_word_end(buf, from, kind).ok_or(ApplyError::MotionFailed)?)
        }
        MotionKind::WordEndBack(kind) => {
            to(word::prev_word_end(buf, from, kind).ok_or(ApplyError::MotionFailed)?)
        }

        // -- Finds ----------------------------------------------------------
        MotionKind::Find(kind) => {
            let target = motion.arg.ok_or(ApplyError::MotionFailed)?;
            cx.find.set(kind, target);
            to(find_char(buf, from, kind, target, count, false).ok_or(ApplyError::MotionFailed)?)
        }
        MotionKind::RepeatFind | MotionKind::RepeatFindReverse => {
            let (kind, target) = effective_find(motion.kind, cx.find)?;
            to(find_char(buf, from, kind, target, count, true).ok_or(ApplyError::MotionFailed)?)
        }

        // -- Structure ------------------------------------------------------
        MotionKind::MatchPair if explicit => {
            if count > 100 {
                return Err(ApplyError::MotionFailed);
            }
            let line = count.saturating_mul(buf.line_count()).div_ceil(100).saturating_sub(1);
            to(cx.first_non_blank(line))
        }
        MotionKind::MatchPair => {
            to(text_object::match_pair(buf, from).ok_or(ApplyError::MotionFailed)?)
        }
        MotionKind::TextObject { inner } => {
            let key = motion.arg.ok_or(ApplyError::MotionFailed)?;
            let (start, end) =
                text_object::select(buf, from, key, inner, count).ok_or(ApplyError::MotionFailed)?;
            Ok(Range::new(start, end))
        }
        MotionKind::ParagraphForward => {
            let n = buf.line_count();
            let empty = |l: usize| buf.content_len(l) == 0;
            let mut line = from.line;
            while line < n && empty(line) {
                line += 1;
            }
            while line < n && !empty(line) {
                line += 1;
            }
            let target = if line < n {
                Point::new(line, 0)
            } else {
                let end = buf.end_point();
                end.with_col(cx.last_col(end.line))
            };
            if target == from {
                return Err(ApplyError::MotionFailed);
            }
            to(target)
        }
        MotionKind::ParagraphBackward => {
            if from == Point::ZERO {
                return Err(ApplyError::MotionFailed);
            }
            let empty = |l: usize| buf.content_len(l) == 0;
            let mut line = from.line;
            while line > 0 && empty(line) {
                line -= 1;
            }
            while line > 0 && !empty(line) {
                line -= 1;
            }
            to(Point::new(line, 0))
        }

        // -- Search ---------------------------------------------------------
        MotionKind::SearchNext | MotionKind::SearchPrev => {
            let pattern = cx
                .search
                .pattern()
                .ok_or(ApplyError::NoPreviousPattern)?
                .to_string();
            let mut dir = cx.search.direction().unwrap_or(SearchDirection::Forward);
            if motion.kind == MotionKind::SearchPrev {
                dir = dir.opposite();
            }
            to(search_from(cx, &pattern, from, dir)?)
        }
        MotionKind::WordUnderCursor { forward } => {
            let (pattern, start) =
                search::word_pattern(buf, from).ok_or(ApplyError::MotionFailed)?;
            let dir = if forward {
                SearchDirection::Forward
            } else {
                SearchDirection::Backward
            };
            cx.search.set(pattern.clone(), dir);
            to(search_from(cx, &pattern, start, dir)?)
        }

        // -- View -----------------------------------------------------------
        MotionKind::ViewTop | MotionKind::ViewMiddle | MotionKind::ViewBottom => {
            let top = cx.view.scroll.line;
            let bottom = cx.view.bottom_line(buf);
            let last = buf.line_count().saturating_sub(1);
            let off = cx.config.scroll_off.min((bottom - top) / 2);
            let line = match motion.kind {
                MotionKind::ViewTop => {
                    let margin = if top > 0 { off } else { 0 };
                    top.saturating_add(count.saturating_sub(1).max(margin)).min(bottom)
                }
                MotionKind::ViewBottom => {
                    let margin = if bottom < last { off } else { 0 };
                    bottom.saturating_sub(count.saturating_sub(1).max(margin)).max(top)
                }
                _ => top + (bottom - top) / 2,
            };
            to(cx.first_non_blank(line))
        }
        MotionKind::HalfPageDown | MotionKind::PageDown => {
            let last = buf.line_count().saturating_sub(1);
            if from.line >= last {
                return Err(ApplyError::MotionFailed);
            }
            let line = (from.line + page_lines(motion.kind, cx.view)).min(last);
            to(cx.first_non_blank(line))
        }
        MotionKind::HalfPageUp | MotionKind::PageUp => {
            if from.line == 0 {
                return Err(ApplyError::MotionFailed);
            }
            let line = from.line.saturating_sub(page_lines(motion.kind, cx.view));
            to(cx.first_non_blank(line))
        }

        // -- Marks ----------------------------------------------------------
        MotionKind::MarkLine | MotionKind::MarkExact => {
            let name = motion.arg.ok_or(ApplyError::MotionFailed)?;
            let mark = buf.marks().get(name).ok_or(ApplyError::UnsetMark(name))?;
            if mark.line >= buf.line_count() {
                return Err(ApplyError::MotionFailed);
            }
            if motion.kind == MotionKind::MarkLine {
                to(cx.first_non_blank(mark.line))
            } else {
                to(buf.clamp_point(mark, cx.verb_pending))
            }
        }

        // -- Selections -----------------------------------------------------
        MotionKind::VisualRange => Ok(Range::new(cx.anchor, from)),
        MotionKind::VisualExtent { lines, cols } => {
            let line = from.line + lines;
            if line >= buf.line_count() {
                return Err(ApplyError::MotionFailed);
            }
            let col = if lines == 0 { from.col + cols } else { cols };
            let col = col.min(buf.content_len(line).saturating_sub(1));
            Ok(Range::new(from, Point::new(line, col)))
        }
    }
}

/// The find `;` or `,` repeats.
///
/// # Errors
///
/// [`ApplyError::MotionFailed`] when nothing was found before.
pub fn effective_find(
    kind: MotionKind,
    state: &FindCharState,
) -> Result<(FindKind, char), ApplyError> {
    let (last, target) = state.last().ok_or(ApplyError::MotionFailed)?;
    let kind = if kind == MotionKind::RepeatFindReverse {
        last.reversed()
    } else {
        last
    };
    Ok((kind, target))
}

fn search_from(
    cx: &MotionCtx<'_>,
    pattern: &str,
    from: Point,
    dir: SearchDirection,
) -> Result<Point, ApplyError> {
    let re = search::compile(pattern, cx.config.ignorecase)
        .map_err(|e| ApplyError::InvalidPattern(e.to_string()))?;
    search::find(cx.buf, &re, from, dir, cx.config.wrapscan)
        .ok_or_else(|| ApplyError::PatternNotFound(pattern.to_string()))
}

/// Lines a page motion travels.
#[must_use]
pub fn page_lines(kind: MotionKind, view: &View) -> usize {
    let height = view.rect.height.max(1);
    match kind {
        MotionKind::HalfPageDown | MotionKind::HalfPageUp => (height / 2).max(1),
        _ => height.saturating_sub(2).max(1),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::WordKind;
    use n_buffer::Rect;
    use pretty_assertions::assert_eq;

    fn p(line: usize, col: usize) -> Point {
        Point::new(line, col)
    }

    struct Fixture {
        buf: Buffer,
        view: View,
        config: Config,
        find: FindCharState,
        search: SearchState,
    }

    impl Fixture {
        fn new(text: &str) -> Self {
            Self {
                buf: Buffer::from_text(text),
                view: View::new(Rect::new(80, 10)),
                config: Config::default(),
                find: FindCharState::new(),
                search: SearchState::new(),
            }
        }

        fn run(&mut self, motion: Motion, from: Point, verb_pending: bool) -> Result<Range, ApplyError> {
            self.run_count(motion, from, verb_pending, 1, false)
        }

        fn run_count(
            &mut self,
            motion: Motion,
            from: Point,
            verb_pending: bool,
            count: usize,
            explicit: bool,
        ) -> Result<Range, ApplyError> {
            let mut cx = MotionCtx {
                buf: &self.buf,
                view: &self.view,
                config: &self.config,
                mode: Mode::Normal,
                verb_pending,
                anchor: from,
                find: &mut self.find,
                search: &mut self.search,
            };
            evaluate(&motion, count, explicit, Range::point(from), &mut cx)
        }

        fn end(&mut self, kind: MotionKind, from: Point) -> Result<Point, ApplyError> {
            self.run(Motion::new(kind), from, false).map(|r| r.end)
        }
    }

    // -- Characters -----------------------------------------------------------

    #[test]
    fn h_and_l_fail_at_edges() {
        let mut f = Fixture::new("abc");
        assert_eq!(f.end(MotionKind::Left, p(0, 0)), Err(ApplyError::MotionFailed));
        assert_eq!(f.end(MotionKind::Right, p(0, 1)), Ok(p(0, 2)));
        assert_eq!(f.end(MotionKind::Right, p(0, 2)), Err(ApplyError::MotionFailed));
    }

    #[test]
    fn l_under_operator_reaches_line_end() {
        let mut f = Fixture::new("abc");
        let r = f.run(Motion::new(MotionKind::Right), p(0, 2), true).unwrap();
        assert_eq!(r, Range::new(p(0, 2), p(0, 3)));
    }

    // -- Vertical ---------------------------------------------------------------

    #[test]
    fn j_keeps_display_column_across_short_lines() {
        let mut f = Fixture::new("abcdef\nab\nabcdef");
        f.buf.set_motion_column(Some(4));
        assert_eq!(f.end(MotionKind::Down, p(0, 4)), Ok(p(1, 1)));
        assert_eq!(f.end(MotionKind::Down, p(1, 1)), Ok(p(2, 4)));
    }

    #[test]
    fn j_uses_display_columns_for_tabs() {
        let mut f = Fixture::new("\tx\n12345x");
        assert_eq!(f.end(MotionKind::Down, p(0, 1)), Ok(p(1, 4)));
    }

    #[test]
    fn j_after_dollar_goes_to_line_end() {
        let mut f = Fixture::new("ab\nabcd");
        f.buf.set_motion_column(Some(usize::MAX));
        assert_eq!(f.end(MotionKind::Down, p(0, 1)), Ok(p(1, 3)));
    }

    #[test]
    fn k_fails_on_first_line() {
        let mut f = Fixture::new("a\nb");
        assert_eq!(f.end(MotionKind::Up, p(0, 0)), Err(ApplyError::MotionFailed));
        assert_eq!(f.end(MotionKind::Down, p(1, 0)), Err(ApplyError::MotionFailed));
    }

    // -- Line -------------------------------------------------------------------

    #[test]
    fn line_motions() {
        let mut f = Fixture::new("  foo bar");
        assert_eq!(f.end(MotionKind::LineStart, p(0, 5)), Ok(p(0, 0)));
        assert_eq!(f.end(MotionKind::FirstNonBlank, p(0, 5)), Ok(p(0, 2)));
        assert_eq!(f.end(MotionKind::LineEnd, p(0, 0)), Ok(p(0, 8)));
    }

    #[test]
    fn dollar_count_reaches_later_line() {
        let mut f = Fixture::new("a\nbcd\ne");
        let r = f.run_count(Motion::new(MotionKind::LineEnd), p(0, 0), false, 2, true);
        assert_eq!(r.map(|r| r.end), Ok(p(1, 2)));
    }

    #[test]
    fn gg_and_g_with_and_without_count() {
        let mut f = Fixture::new("a\n  b\nc");
        assert_eq!(f.end(MotionKind::BufferEnd, p(0, 0)), Ok(p(2, 0)));
        assert_eq!(f.end(MotionKind::BufferStart, p(2, 0)), Ok(p(0, 0)));
        let r = f.run_count(Motion::new(MotionKind::BufferEnd), p(0, 0), false, 2, true);
        assert_eq!(r.map(|r| r.end), Ok(p(1, 2)));
        let r = f.run_count(Motion::new(MotionKind::BufferStart), p(0, 0), false, 99, true);
        assert_eq!(r.map(|r| r.end), Ok(p(2, 0)));
    }

    #[test]
    fn current_line_spans_count_lines() {
        let mut f = Fixture::new("ab\ncd\nef");
        let r = f.run_count(Motion::new(MotionKind::CurrentLine), p(0, 1), true, 2, true);
        assert_eq!(r, Ok(Range::new(p(0, 0), p(1, 2))));
        let r = f.run_count(Motion::new(MotionKind::CurrentLine), p(2, 0), true, 5, true);
        assert_eq!(r, Ok(Range::new(p(2, 0), p(2, 2))));
    }

    // -- Words --------------------------------------------------------------------

    #[test]
    fn w_on_last_word_depends_on_operator() {
        let mut f = Fixture::new("foo bar");
        let w = Motion::new(MotionKind::WordStart(WordKind::Small));
        assert_eq!(f.run(w, p(0, 4), true).map(|r| r.end), Ok(p(0, 7)));
        assert_eq!(f.run(w, p(0, 4), false).map(|r| r.end), Ok(p(0, 6)));
        assert_eq!(f.run(w, p(0, 6), false), Err(ApplyError::MotionFailed));
    }

    #[test]
    fn word_motions_move() {
        let mut f = Fixture::new("one two");
        assert_eq!(f.end(MotionKind::WordEnd(WordKind::Small), p(0, 0)), Ok(p(0, 2)));
        assert_eq!(f.end(MotionKind::WordBack(WordKind::Small), p(0, 5)), Ok(p(0, 4)));
        assert_eq!(f.end(MotionKind::WordEndBack(WordKind::Small), p(0, 5)), Ok(p(0, 2)));
    }

    // -- Finds ----------------------------------------------------------------------

    #[test]
    fn find_records_state_for_repeat() {
        let mut f = Fixture::new("a,b,c,d");
        let fx = Motion::new(MotionKind::Find(FindKind::Forward)).with_arg(',');
        assert_eq!(f.run(fx, p(0, 0), false).map(|r| r.end), Ok(p(0, 1)));
        assert_eq!(f.end(MotionKind::RepeatFind, p(0, 1)), Ok(p(0, 3)));
        assert_eq!(f.end(MotionKind::RepeatFindReverse, p(0, 3)), Ok(p(0, 1)));
    }

    #[test]
    fn repeat_without_find_fails() {
        let mut f = Fixture::new("abc");
        assert_eq!(f.end(MotionKind::RepeatFind, p(0, 0)), Err(ApplyError::MotionFailed));
    }

    #[test]
    fn find_with_count() {
        let mut f = Fixture::new("a,b,c,d");
        let fx = Motion::new(MotionKind::Find(FindKind::Forward)).with_arg(',');
        let r = f.run_count(fx, p(0, 0), false, 3, true);
        assert_eq!(r.map(|r| r.end), Ok(p(0, 5)));
    }

    // -- Structure ------------------------------------------------------------------

    #[test]
    fn percent_round_trips() {
        let mut f = Fixture::new("(a(b)c)");
        let there = f.end(MotionKind::MatchPair, p(0, 0)).unwrap();
        assert_eq!(there, p(0, 6));
        assert_eq!(f.end(MotionKind::MatchPair, there), Ok(p(0, 0)));
    }

    #[test]
    fn text_object_replaces_both_ends() {
        let mut f = Fixture::new("f(abc)");
        let m = Motion::new(MotionKind::TextObject { inner: true }).with_arg('(');
        assert_eq!(f.run(m, p(0, 3), true), Ok(Range::new(p(0, 2), p(0, 4))));
        let m = Motion::new(MotionKind::TextObject { inner: true }).with_arg('[');
        assert_eq!(f.run(m, p(0, 3), true), Err(ApplyError::MotionFailed));
    }

    #[test]
    fn paragraph_motions() {
        let mut f = Fixture::new("a\nb\n\nc\nd");
        assert_eq!(f.end(MotionKind::ParagraphForward, p(0, 0)), Ok(p(2, 0)));
        assert_eq!(f.end(MotionKind::ParagraphForward, p(2, 0)), Ok(p(4, 0)));
        assert_eq!(f.end(MotionKind::ParagraphBackward, p(4, 0)), Ok(p(2, 0)));
        assert_eq!(f.end(MotionKind::ParagraphBackward, p(2, 0)), Ok(p(0, 0)));
        assert_eq!(f.end(MotionKind::ParagraphBackward, p(0, 0)), Err(ApplyError::MotionFailed));
    }

    // -- Search -----------------------------------------------------------------------

    #[test]
    fn n_without_pattern_fails() {
        let mut f = Fixture::new("abc");
        assert_eq!(f.end(MotionKind::SearchNext, p(0, 0)), Err(ApplyError::NoPreviousPattern));
    }

    #[test]
    fn star_sets_pattern_and_n_repeats() {
        let mut f = Fixture::new("foo x foo y foo");
        let star = MotionKind::WordUnderCursor { forward: true };
        assert_eq!(f.end(star, p(0, 1)), Ok(p(0, 6)));
        assert_eq!(f.search.pattern(), Some(r"\bfoo\b"));
        assert_eq!(f.end(MotionKind::SearchNext, p(0, 6)), Ok(p(0, 12)));
        assert_eq!(f.end(MotionKind::SearchPrev, p(0, 12)), Ok(p(0, 6)));
    }

    #[test]
    fn search_miss_names_pattern() {
        let mut f = Fixture::new("abc");
        f.search.set("zzz".into(), SearchDirection::Forward);
        assert_eq!(
            f.end(MotionKind::SearchNext, p(0, 0)),
            Err(ApplyError::PatternNotFound("zzz".into()))
        );
    }

    #[test]
    fn wrapscan_off_stops_at_end() {
        let mut f = Fixture::new("foo\nbar");
        f.config.wrapscan = false;
        f.search.set("foo".into(), SearchDirection::Forward);
        assert!(f.end(MotionKind::SearchNext, p(1, 0)).is_err());
    }

    // -- View -----------------------------------------------------------------------------

    #[test]
    fn h_m_l_use_visible_lines() {
        let text = (0..30).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut f = Fixture::new(&text);
        f.view.scroll.line = 10;
        assert_eq!(f.end(MotionKind::ViewTop, p(12, 0)), Ok(p(10, 0)));
        assert_eq!(f.end(MotionKind::ViewBottom, p(12, 0)), Ok(p(19, 0)));
        assert_eq!(f.end(MotionKind::ViewMiddle, p(12, 0)), Ok(p(14, 0)));
        let r = f.run_count(Motion::new(MotionKind::ViewTop), p(12, 0), false, 3, true);
        assert_eq!(r.map(|r| r.end), Ok(p(12, 0)));
    }

    #[test]
    fn h_and_l_honor_scroll_off() {
        let text = (0..30).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut f = Fixture::new(&text);
        f.view.scroll.line = 10;
        f.config.scroll_off = 2;
        assert_eq!(f.end(MotionKind::ViewTop, p(15, 0)), Ok(p(12, 0)));
        assert_eq!(f.end(MotionKind::ViewBottom, p(15, 0)), Ok(p(17, 0)));
    }

    #[test]
    fn page_motions() {
        let text = (0..30).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut f = Fixture::new(&text);
        assert_eq!(f.end(MotionKind::HalfPageDown, p(0, 0)), Ok(p(5, 0)));
        assert_eq!(f.end(MotionKind::PageDown, p(0, 0)), Ok(p(8, 0)));
        assert_eq!(f.end(MotionKind::HalfPageUp, p(3, 0)), Ok(p(0, 0)));
        assert_eq!(f.end(MotionKind::PageUp, p(0, 0)), Err(ApplyError::MotionFailed));
    }

    // -- Marks ------------------------------------------------------------------------------

    #[test]
    fn mark_motions() {
        let mut f = Fixture::new("a\n  bcd");
        f.buf.marks_mut().set('x', p(1, 3));
        let line = Motion::new(MotionKind::MarkLine).with_arg('x');
        let exact = Motion::new(MotionKind::MarkExact).with_arg('x');
        assert_eq!(f.run(line, p(0, 0), false).map(|r| r.end), Ok(p(1, 2)));
        assert_eq!(f.run(exact, p(0, 0), false).map(|r| r.end), Ok(p(1, 3)));
        let unset = Motion::new(MotionKind::MarkExact).with_arg('y');
        assert_eq!(f.run(unset, p(0, 0), false), Err(ApplyError::UnsetMark('y')));
    }

    // -- Selections ----------------------------------------------------------------------

    #[test]
    fn visual_extent_replays_shape() {
        let mut f = Fixture::new("abcdef\nabcdef");
        let m = Motion::new(MotionKind::VisualExtent { lines: 0, cols: 2 });
        assert_eq!(f.run(m, p(0, 1), true), Ok(Range::new(p(0, 1), p(0, 3))));
        let m = Motion::new(MotionKind::VisualExtent { lines: 1, cols: 1 });
        assert_eq!(f.run(m, p(0, 4), true), Ok(Range::new(p(0, 4), p(1, 1))));
    }
}
