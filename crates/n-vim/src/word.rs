//! Word scanning for `w`, `b`, `e`, `ge` and their WORD variants.
//!
//! Every point in the buffer is in one of four scan states:
//!
//! | State       | Chars                                   |
//! |-------------|-----------------------------------------|
//! | `InWord`    | letters, digits, `_` (any non-blank for WORDs) |
//! | `InOther`   | other non-blank chars (never for WORDs) |
//! | `InSpace`   | blanks inside a line                    |
//! | `AtNewline` | the line ending                         |
//!
//! A word boundary is a change of state into `InWord` or `InOther`. Line
//! endings are crossed by walking through `AtNewline`; two `AtNewline`
//! points in a row mean an empty line, which counts as a zero-length word.
//!
//! Scans move point by point with [`Buffer::advance`]/[`Buffer::retreat`],
//! so `\r\n` endings are one step like `\n`.

use n_buffer::{Buffer, Point};

/// Small words (`w`) or big WORDs (`W`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordKind {
    Small,
    Big,
}

/// Scanner state of a single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanState {
    InWord,
    InOther,
    InSpace,
    AtNewline,
}

impl ScanState {
    #[inline]
    pub(crate) const fn is_word(self) -> bool {
        matches!(self, Self::InWord | Self::InOther)
    }
}

/// Classify a char.
#[must_use]
pub(crate) fn classify(ch: char, kind: WordKind) -> ScanState {
    if ch == '\n' || ch == '\r' {
        ScanState::AtNewline
    } else if ch.is_whitespace() {
        ScanState::InSpace
    } else if kind == WordKind::Big || ch.is_alphanumeric() || ch == '_' {
        ScanState::InWord
    } else {
        ScanState::InOther
    }
}

/// State at a point, `None` past the end of the buffer.
pub(crate) fn state_at(buf: &Buffer, pt: Point, kind: WordKind) -> Option<ScanState> {
    buf.char_at(pt).map(|ch| classify(ch, kind))
}

/// True for a line with no content.
fn is_empty_line(buf: &Buffer, pt: Point) -> bool {
    pt.col == 0 && buf.content_len(pt.line) == 0
}

// ---------------------------------------------------------------------------
// Forward
// ---------------------------------------------------------------------------

/// `w`: start of the next word. `None` when no word follows.
///
/// With `stop_at_line_end` (a verb is pending) the scan stops at the start
/// of the next line instead of crossing it.
#[must_use]
pub fn next_word_start(
    buf: &Buffer,
    from: Point,
    kind: WordKind,
    stop_at_line_end: bool,
) -> Option<Point> {
    let mut prev = state_at(buf, from, kind)?;
    let mut pt = from;
    loop {
        pt = buf.advance(pt, 1)?;
        let cur = state_at(buf, pt, kind)?;
        if stop_at_line_end && prev == ScanState::AtNewline {
            return Some(pt);
        }
        match cur {
            ScanState::InWord | ScanState::InOther if cur != prev => return Some(pt),
            ScanState::AtNewline if prev == ScanState::AtNewline => return Some(pt),
            _ => {}
        }
        prev = cur;
    }
}

/// `e`: last char of the current or next word. `None` when none follows.
#[must_use]
pub fn next_word_end(buf: &Buffer, from: Point, kind: WordKind) -> Option<Point> {
    let mut pt = buf.advance(from, 1)?;
    let mut cur = state_at(buf, pt, kind)?;
    while !cur.is_word() {
        pt = buf.advance(pt, 1)?;
        cur = state_at(buf, pt, kind)?;
    }
    loop {
        let Some(next) = buf.advance(pt, 1) else {
            return Some(pt);
        };
        if state_at(buf, next, kind) != Some(cur) {
            return Some(pt);
        }
        pt = next;
    }
}

// ---------------------------------------------------------------------------
// Backward
// ---------------------------------------------------------------------------

/// `b`: start of the current or previous word. `None` at the buffer start.
#[must_use]
pub fn prev_word_start(buf: &Buffer, from: Point, kind: WordKind) -> Option<Point> {
    let mut pt = buf.retreat(from, 1)?;
    let mut cur = state_at(buf, pt, kind)?;
    while !cur.is_word() {
        if is_empty_line(buf, pt) {
            return Some(pt);
        }
        let Some(prev) = buf.retreat(pt, 1) else {
            return Some(pt);
        };
        pt = prev;
        cur = state_at(buf, pt, kind)?;
    }
    while let Some(prev) = buf.retreat(pt, 1) {
        if state_at(buf, prev, kind) != Some(cur) {
            break;
        }
        pt = prev;
    }
    Some(pt)
}

/// `ge`: last char of the previous word. `None` when none precedes.
#[must_use]
pub fn prev_word_end(buf: &Buffer, from: Point, kind: WordKind) -> Option<Point> {
    let start = state_at(buf, from, kind).unwrap_or(ScanState::AtNewline);
    let mut pt = from;

    // Leave the word the cursor is in.
    if start.is_word() {
        loop {
            pt = buf.retreat(pt, 1)?;
            if state_at(buf, pt, kind) != Some(start) {
                break;
            }
        }
    } else {
        pt = buf.retreat(pt, 1)?;
    }

    loop {
        let cur = state_at(buf, pt, kind)?;
        if cur.is_word() || (is_empty_line(buf, pt) && pt != from) {
            return Some(pt);
        }
        pt = buf.retreat(pt, 1)?;
    }
}

// ---------------------------------------------------------------------------
// Word objects
// ---------------------------------------------------------------------------

/// Inclusive span of same-state points around `pt`, kept on one line.
fn run_around(buf: &Buffer, pt: Point, kind: WordKind) -> Option<(Point, Point)> {
    let state = state_at(buf, pt, kind)?;
    if state == ScanState::AtNewline {
        return Some((pt, pt));
    }
    let chars = buf.line_chars(pt.line);
    let same = |c: usize| classify(chars[c], kind) == state;
    let mut s = pt.col;
    while s > 0 && same(s - 1) {
        s -= 1;
    }
    let mut e = pt.col;
    while e + 1 < chars.len() && same(e + 1) {
        e += 1;
    }
    Some((pt.with_col(s), pt.with_col(e)))
}

/// `iw`/`aw` (and `iW`/`aW`) as an inclusive `(start, end)`.
///
/// Inner selects the run under the cursor, word or blank. Around adds the
/// trailing blanks of a word, or the leading ones when nothing trails; on
/// blanks it adds the following word.
#[must_use]
pub fn word_object(buf: &Buffer, pt: Point, kind: WordKind, inner: bool) -> Option<(Point, Point)> {
    let (start, end) = run_around(buf, pt, kind)?;
    if inner {
        return Some((start, end));
    }
    let len = buf.content_len(pt.line);
    let state = state_at(buf, pt, kind)?;
    match state {
        ScanState::InWord | ScanState::InOther => {
            let after = end.with_col(end.col + 1);
            if after.col < len && state_at(buf, after, kind) == Some(ScanState::InSpace) {
                let (_, blank_end) = run_around(buf, after, kind)?;
                return Some((start, blank_end));
            }
            if start.col > 0 {
                let before = start.with_col(start.col - 1);
                if state_at(buf, before, kind) == Some(ScanState::InSpace) {
                    let (blank_start, _) = run_around(buf, before, kind)?;
                    return Some((blank_start, end));
                }
            }
            Some((start, end))
        }
        ScanState::InSpace => {
            let after = end.with_col(end.col + 1);
            if after.col < len {
                let (_, word_end) = run_around(buf, after, kind)?;
                return Some((start, word_end));
            }
            Some((start, end))
        }
        ScanState::AtNewline => Some((start, end)),
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

    fn w(text: &str, from: Point) -> Option<Point> {
        next_word_start(&Buffer::from_text(text), from, WordKind::Small, false)
    }

    // -- classify -------------------------------------------------------------

    #[test]
    fn classify_states() {
        assert_eq!(classify('a', WordKind::Small), ScanState::InWord);
        assert_eq!(classify('_', WordKind::Small), ScanState::InWord);
        assert_eq!(classify('.', WordKind::Small), ScanState::InOther);
        assert_eq!(classify('.', WordKind::Big), ScanState::InWord);
        assert_eq!(classify('\t', WordKind::Small), ScanState::InSpace);
        assert_eq!(classify('\n', WordKind::Big), ScanState::AtNewline);
    }

    // -- w / W ------------------------------------------------------------

    #[test]
    fn w_skips_word_and_blanks() {
        assert_eq!(w("hello world", p(0, 0)), Some(p(0, 6)));
        assert_eq!(w("hello world", p(0, 3)), Some(p(0, 6)));
    }

    #[test]
    fn w_stops_at_punctuation() {
        assert_eq!(w("foo.bar", p(0, 0)), Some(p(0, 3)));
        assert_eq!(w("foo.bar", p(0, 3)), Some(p(0, 4)));
    }

    #[test]
    fn big_w_skips_punctuation() {
        let buf = Buffer::from_text("foo.bar baz");
        assert_eq!(
            next_word_start(&buf, p(0, 0), WordKind::Big, false),
            Some(p(0, 8))
        );
    }

    #[test]
    fn w_crosses_lines() {
        assert_eq!(w("foo\n  bar", p(0, 1)), Some(p(1, 2)));
    }

    #[test]
    fn w_stops_on_empty_line() {
        assert_eq!(w("foo\n\nbar", p(0, 0)), Some(p(1, 0)));
        assert_eq!(w("foo\n\nbar", p(1, 0)), Some(p(2, 0)));
    }

    #[test]
    fn w_at_last_word_is_none() {
        assert_eq!(w("foo bar", p(0, 4)), None);
        assert_eq!(w("foo   ", p(0, 0)), None);
    }

    #[test]
    fn w_under_verb_stops_at_next_line() {
        let buf = Buffer::from_text("foo bar  \n  baz");
        assert_eq!(
            next_word_start(&buf, p(0, 4), WordKind::Small, true),
            Some(p(1, 0))
        );
        // Within a line nothing changes.
        assert_eq!(
            next_word_start(&buf, p(0, 0), WordKind::Small, true),
            Some(p(0, 4))
        );
    }

    // -- e ----------------------------------------------------------------

    #[test]
    fn e_moves_to_word_end() {
        let buf = Buffer::from_text("hello world");
        assert_eq!(next_word_end(&buf, p(0, 0), WordKind::Small), Some(p(0, 4)));
        assert_eq!(next_word_end(&buf, p(0, 4), WordKind::Small), Some(p(0, 10)));
    }

    #[test]
    fn e_skips_empty_lines() {
        let buf = Buffer::from_text("a\n\n  bc");
        assert_eq!(next_word_end(&buf, p(0, 0), WordKind::Small), Some(p(2, 3)));
    }

    #[test]
    fn e_at_end_is_none() {
        let buf = Buffer::from_text("abc");
        assert_eq!(next_word_end(&buf, p(0, 2), WordKind::Small), None);
    }

    // -- b ----------------------------------------------------------------

    #[test]
    fn b_moves_to_word_start() {
        let buf = Buffer::from_text("hello world");
        assert_eq!(prev_word_start(&buf, p(0, 8), WordKind::Small), Some(p(0, 6)));
        assert_eq!(prev_word_start(&buf, p(0, 6), WordKind::Small), Some(p(0, 0)));
    }

    #[test]
    fn b_crosses_lines_and_stops_on_empty() {
        let buf = Buffer::from_text("foo\n\n  bar");
        assert_eq!(prev_word_start(&buf, p(2, 2), WordKind::Small), Some(p(1, 0)));
        assert_eq!(prev_word_start(&buf, p(1, 0), WordKind::Small), Some(p(0, 0)));
    }

    #[test]
    fn b_at_start_is_none() {
        let buf = Buffer::from_text("abc");
        assert_eq!(prev_word_start(&buf, p(0, 0), WordKind::Small), None);
    }

    // -- ge ---------------------------------------------------------------

    #[test]
    fn ge_moves_to_previous_word_end() {
        let buf = Buffer::from_text("one two three");
        assert_eq!(prev_word_end(&buf, p(0, 9), WordKind::Small), Some(p(0, 6)));
        assert_eq!(prev_word_end(&buf, p(0, 5), WordKind::Small), Some(p(0, 2)));
    }

    #[test]
    fn ge_crosses_lines() {
        let buf = Buffer::from_text("ab\ncd");
        assert_eq!(prev_word_end(&buf, p(1, 0), WordKind::Small), Some(p(0, 1)));
    }

    #[test]
    fn ge_in_first_word_is_none() {
        let buf = Buffer::from_text("abc def");
        assert_eq!(prev_word_end(&buf, p(0, 2), WordKind::Small), None);
    }

    // -- Word objects -------------------------------------------------------

    #[test]
    fn inner_word_on_word_and_blank() {
        let buf = Buffer::from_text("foo   bar");
        assert_eq!(
            word_object(&buf, p(0, 1), WordKind::Small, true),
            Some((p(0, 0), p(0, 2)))
        );
        assert_eq!(
            word_object(&buf, p(0, 4), WordKind::Small, true),
            Some((p(0, 3), p(0, 5)))
        );
    }

    #[test]
    fn around_word_takes_trailing_blanks() {
        let buf = Buffer::from_text("foo   bar");
        assert_eq!(
            word_object(&buf, p(0, 0), WordKind::Small, false),
            Some((p(0, 0), p(0, 5)))
        );
    }

    #[test]
    fn around_word_falls_back_to_leading_blanks() {
        let buf = Buffer::from_text("foo   bar");
        assert_eq!(
            word_object(&buf, p(0, 7), WordKind::Small, false),
            Some((p(0, 3), p(0, 8)))
        );
    }

    #[test]
    fn around_blank_takes_next_word() {
        let buf = Buffer::from_text("foo   bar baz");
        assert_eq!(
            word_object(&buf, p(0, 4), WordKind::Small, false),
            Some((p(0, 3), p(0, 8)))
        );
    }

    #[test]
    fn big_word_object_spans_punctuation() {
        let buf = Buffer::from_text("x a.b-c y");
        assert_eq!(
            word_object(&buf, p(0, 4), WordKind::Big, true),
            Some((p(0, 2), p(0, 6)))
        );
    }
}
