//! Text objects and the `%` pair match.
//!
//! Text objects select a region by structure rather than by cursor motion.
//! Under an operator they complete the grammar:
//!
//! ```text
//! operator + text-object = action
//! d        + iw          = delete inner word
//! c        + i"          = change inside quotes
//! y        + a(          = yank around parentheses
//! ```
//!
//! Every selector returns an inclusive `(start, end)` pair, or `None` when
//! the object does not exist at the cursor.
//!
//! | Inner    | Around   | Object                          |
//! |----------|----------|---------------------------------|
//! | `iw`     | `aw`     | word (letters, digits, `_`)     |
//! | `iW`     | `aW`     | WORD (non-blank characters)     |
//! | `i"`     | `a"`     | double-quoted string            |
//! | `i'`     | `a'`     | single-quoted string            |
//! | `` i` `` | `` a` `` | backtick-quoted string          |
//! | `i(` `ib`| `a(` `ab`| parenthesized block             |
//! | `i{` `iB`| `a{` `aB`| curly-braced block              |
//! | `i[`     | `a[`     | square-bracketed block          |
//! | `i<`     | `a<`     | angle-bracketed block           |
//! | `ip`     | `ap`     | paragraph (linewise)            |
//!
//! Bracket scans skip delimiters that sit inside a string or comment. That
//! state comes from a forward scan of each line, see [`literal_mask`].

use n_buffer::{Buffer, Point};

use crate::word::{WordKind, word_object};

/// An inclusive span.
pub type Span = (Point, Point);

/// True for keys that may follow `i`/`a`.
#[must_use]
pub const fn is_object_key(key: char) -> bool {
    matches!(
        key,
        'w' | 'W' | 'p' | '"' | '\'' | '`' | '(' | ')' | 'b' | '{' | '}' | 'B' | '[' | ']' | '<' | '>'
    )
}

/// Delimiter pair for a bracket object key.
const fn bracket_for(key: char) -> Option<(char, char)> {
    match key {
        '(' | ')' | 'b' => Some(('(', ')')),
        '{' | '}' | 'B' => Some(('{', '}')),
        '[' | ']' => Some(('[', ']')),
        '<' | '>' => Some(('<', '>')),
        _ => None,
    }
}

/// Select the object named by `key` around `at`.
///
/// `count` grows the object outward: brackets select the `count`th
/// enclosing pair, words and paragraphs take `count` consecutive runs.
#[must_use]
pub fn select(buf: &Buffer, at: Point, key: char, inner: bool, count: usize) -> Option<Span> {
    let count = count.max(1);
    match key {
        'w' => grow_words(buf, at, WordKind::Small, inner, count),
        'W' => grow_words(buf, at, WordKind::Big, inner, count),
        'p' => paragraph_object(buf, at.line, inner, count),
        '"' | '\'' | '`' => quote_object(buf, at, key, inner),
        _ => {
            let (open, close) = bracket_for(key)?;
            let mut pair = bracket_pair(buf, at, open, close)?;
            for _ in 1..count {
                let outside = buf.retreat(pair.0, 1)?;
                pair = bracket_pair(buf, outside, open, close)?;
            }
            if inner {
                inner_bracket(buf, pair)
            } else {
                Some(pair)
            }
        }
    }
}

fn grow_words(buf: &Buffer, at: Point, kind: WordKind, inner: bool, count: usize) -> Option<Span> {
    let (start, mut end) = word_object(buf, at, kind, inner)?;
    for _ in 1..count {
        let next = buf.advance(end, 1)?;
        if next.line != end.line || next.col >= buf.content_len(next.line) {
            break;
        }
        end = word_object(buf, next, kind, inner)?.1;
    }
    Some((start, end))
}

// ---------------------------------------------------------------------------
// Quote objects
// ---------------------------------------------------------------------------

/// Columns of the quote pair on the cursor line.
///
/// Quotes pair left to right: the 1st with the 2nd, the 3rd with the 4th.
/// The pair containing the cursor wins; otherwise the next pair forward.
fn quote_pair(chars: &[char], col: usize, quote: char) -> Option<(usize, usize)> {
    let mut quotes = Vec::new();
    let mut escaped = false;
    for (i, &ch) in chars.iter().enumerate() {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == quote {
            quotes.push(i);
        }
    }
    let pairs = quotes.chunks_exact(2).map(|p| (p[0], p[1]));
    pairs
        .clone()
        .find(|&(open, close)| open <= col && col <= close)
        .or_else(|| pairs.into_iter().find(|&(open, _)| open > col))
}

fn quote_object(buf: &Buffer, at: Point, quote: char, inner: bool) -> Option<Span> {
    let chars = buf.line_chars(at.line);
    let (open, close) = quote_pair(&chars, at.col, quote)?;
    if inner {
        // `""` has nothing inside.
        if close == open + 1 {
            return None;
        }
        return Some((at.with_col(open + 1), at.with_col(close - 1)));
    }
    let mut end = close;
    while end + 1 < chars.len() && chars[end + 1].is_whitespace() {
        end += 1;
    }
    let mut start = open;
    if end == close {
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
    }
    Some((at.with_col(start), at.with_col(end)))
}

// ---------------------------------------------------------------------------
// Literal masks
// ---------------------------------------------------------------------------

/// Per-column flags for one line: `true` where the char sits inside a
/// string, a char literal or a comment.
///
/// `"` and `` ` `` strings honor backslash escapes. `'` opens a literal only
/// when it closes within a char or an escape (`'x'`, `'\n'`), so lifetimes
/// and apostrophes stay code. `//` comments run to the end of the line and
/// `/* */` comments are tracked within the line.
#[must_use]
pub fn literal_mask(chars: &[char]) -> Vec<bool> {
    let mut mask = vec![false; chars.len()];
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '/' if chars.get(i + 1) == Some(&'/') => {
                mask[i..].fill(true);
                break;
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                let mut j = i + 2;
                while j + 1 < chars.len() && !(chars[j] == '*' && chars[j + 1] == '/') {
                    j += 1;
                }
                let end = (j + 2).min(chars.len());
                mask[i..end].fill(true);
                i = end;
            }
            q @ ('"' | '`') => {
                let mut j = i + 1;
                while j < chars.len() && chars[j] != q {
                    j += if chars[j] == '\\' { 2 } else { 1 };
                }
                let end = (j + 1).min(chars.len());
                mask[i..end].fill(true);
                i = end;
            }
            '\'' => {
                let len = match chars.get(i + 1..) {
                    Some(['\\', _, '\'', ..]) => 4,
                    Some([c, '\'', ..]) if *c != '\'' => 3,
                    _ => 1,
                };
                if len > 1 {
                    mask[i..i + len].fill(true);
                }
                i += len;
            }
            _ => i += 1,
        }
    }
    mask
}

/// Lazily computed literal masks, one line at a time.
struct Literals<'a> {
    buf: &'a Buffer,
    line: Option<usize>,
    mask: Vec<bool>,
    enabled: bool,
}

impl<'a> Literals<'a> {
    /// Masking is off when the scan starts inside a literal, so a bracket
    /// in a string still matches its partner in the same string.
    fn new(buf: &'a Buffer, from: Point) -> Self {
        let mut lits = Self {
            buf,
            line: None,
            mask: Vec::new(),
            enabled: true,
        };
        lits.enabled = !lits.is_literal(from);
        lits
    }

    fn is_literal(&mut self, pt: Point) -> bool {
        if !self.enabled {
            return false;
        }
        if self.line != Some(pt.line) {
            self.mask = literal_mask(&self.buf.line_chars(pt.line));
            self.line = Some(pt.line);
        }
        self.mask.get(pt.col).copied().unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// Bracket objects
// ---------------------------------------------------------------------------

/// Backward from `from` (exclusive) to the unmatched `open`.
fn find_open(buf: &Buffer, from: Point, open: char, close: char) -> Option<Point> {
    let mut lits = Literals::new(buf, from);
    let mut depth = 0usize;
    let mut pt = from;
    loop {
        pt = buf.retreat(pt, 1)?;
        if lits.is_literal(pt) {
            continue;
        }
        match buf.char_at(pt) {
            Some(ch) if ch == close => depth += 1,
            Some(ch) if ch == open => {
                if depth == 0 {
                    return Some(pt);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
}

/// Forward from `from` (exclusive) to the matching `close`.
fn find_close(buf: &Buffer, from: Point, open: char, close: char) -> Option<Point> {
    let mut lits = Literals::new(buf, from);
    let mut depth = 0usize;
    let mut pt = from;
    loop {
        pt = buf.advance(pt, 1)?;
        if lits.is_literal(pt) {
            continue;
        }
        match buf.char_at(pt)? {
            ch if ch == open => depth += 1,
            ch if ch == close => {
                if depth == 0 {
                    return Some(pt);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
}

/// The `open`/`close` pair enclosing `at`, or the one whose delimiter is
/// under it.
fn bracket_pair(buf: &Buffer, at: Point, open: char, close: char) -> Option<Span> {
    match buf.char_at(at)? {
        ch if ch == open => Some((at, find_close(buf, at, open, close)?)),
        ch if ch == close => Some((find_open(buf, at, open, close)?, at)),
        _ => {
            let o = find_open(buf, at, open, close)?;
            let c = find_close(buf, o, open, close)?;
            (at < c).then_some((o, c))
        }
    }
}

/// Shrink a bracket pair to its contents.
///
/// An open bracket that ends its line starts the contents on the next
/// line. A close bracket that is the first non-blank of its line ends the
/// contents with the previous line's newline. An empty pair has no inner.
fn inner_bracket(buf: &Buffer, (open, close): Span) -> Option<Span> {
    let mut start = buf.advance(open, 1)?;
    if start.col >= buf.content_len(start.line) && start.line < close.line {
        start = Point::new(start.line + 1, 0);
    }
    let mut end = buf.retreat(close, 1)?;
    if close.line > open.line && close.col <= buf.first_non_blank(close.line) {
        end = Point::new(close.line - 1, buf.content_len(close.line - 1));
    }
    (start <= end && start < close).then_some((start, end))
}

// ---------------------------------------------------------------------------
// Paragraph objects
// ---------------------------------------------------------------------------

fn is_blank(buf: &Buffer, line: usize) -> bool {
    buf.line_chars(line).iter().all(|c| c.is_whitespace())
}

/// Last line of the run of lines with the same blankness as `line`.
fn run_end(buf: &Buffer, line: usize) -> usize {
    let blank = is_blank(buf, line);
    let mut l = line;
    while l + 1 < buf.line_count() && is_blank(buf, l + 1) == blank {
        l += 1;
    }
    l
}

/// `ip`/`ap`: whole lines from the cursor's paragraph (or blank run).
///
/// Around adds the blank lines that follow, or the ones before when the
/// paragraph ends the buffer.
fn paragraph_object(buf: &Buffer, line: usize, inner: bool, count: usize) -> Option<Span> {
    let blank = is_blank(buf, line);
    let mut first = line;
    while first > 0 && is_blank(buf, first - 1) == blank {
        first -= 1;
    }
    let mut last = run_end(buf, line);
    let mut runs = if inner { count } else { count.saturating_mul(2) };
    runs -= 1;
    while runs > 0 && last + 1 < buf.line_count() {
        last = run_end(buf, last + 1);
        runs -= 1;
    }
    if !inner && runs > 0 && !blank {
        while first > 0 && is_blank(buf, first - 1) {
            first -= 1;
        }
    }
    Some((Point::new(first, 0), Point::new(last, buf.content_len(last))))
}

// ---------------------------------------------------------------------------
// Pair match
// ---------------------------------------------------------------------------

/// `%`: the partner of the bracket under the cursor, or of the first
/// bracket after it on the same line.
#[must_use]
pub fn match_pair(buf: &Buffer, at: Point) -> Option<Point> {
    let chars = buf.line_chars(at.line);
    let mask = literal_mask(&chars);
    let in_literal = mask.get(at.col).copied().unwrap_or(false);
    let col = (at.col..chars.len())
        .find(|&c| matches!(chars[c], '(' | ')' | '[' | ']' | '{' | '}') && (in_literal || !mask[c]))?;
    let here = at.with_col(col);
    match chars[col] {
        '(' => find_close(buf, here, '(', ')'),
        '[' => find_close(buf, here, '[', ']'),
        '{' => find_close(buf, here, '{', '}'),
        ')' => find_open(buf, here, '(', ')'),
        ']' => find_open(buf, here, '[', ']'),
        _ => find_open(buf, here, '{', '}'),
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

    fn sel(text: &str, at: Point, key: char, inner: bool) -> Option<Span> {
        select(&Buffer::from_text(text), at, key, inner, 1)
    }

    // -- Words ------------------------------------------------------------

    #[test]
    fn words_grow_with_count() {
        let buf = Buffer::from_text("one two three four");
        assert_eq!(select(&buf, p(0, 0), 'w', false, 2), Some((p(0, 0), p(0, 7))));
        assert_eq!(select(&buf, p(0, 0), 'w', true, 3), Some((p(0, 0), p(0, 6))));
    }

    // -- Quotes -----------------------------------------------------------

    #[test]
    fn inner_and_around_quotes() {
        let text = r#"let s = "hi there";"#;
        assert_eq!(sel(text, p(0, 10), '"', true), Some((p(0, 9), p(0, 16))));
        assert_eq!(sel(text, p(0, 10), '"', false), Some((p(0, 7), p(0, 17))));
    }

    #[test]
    fn quote_before_cursor_pair_uses_next_pair() {
        assert_eq!(sel("x 'ab' y", p(0, 0), '\'', true), Some((p(0, 3), p(0, 4))));
    }

    #[test]
    fn escaped_quote_is_not_a_delimiter() {
        let text = r#""a\"b""#;
        assert_eq!(sel(text, p(0, 1), '"', true), Some((p(0, 1), p(0, 4))));
    }

    #[test]
    fn around_quote_takes_trailing_blanks() {
        assert_eq!(sel(r#"f("a"  )"#, p(0, 3), '"', false), Some((p(0, 2), p(0, 6))));
    }

    #[test]
    fn inner_empty_quotes_fails_around_works() {
        assert_eq!(sel(r#"x = "";"#, p(0, 4), '"', true), None);
        assert_eq!(sel(r#"x = "";"#, p(0, 4), '"', false), Some((p(0, 3), p(0, 5))));
    }

    // -- Brackets ---------------------------------------------------------

    #[test]
    fn inner_and_around_parens() {
        assert_eq!(sel("f(a, b)", p(0, 3), '(', true), Some((p(0, 2), p(0, 5))));
        assert_eq!(sel("f(a, b)", p(0, 3), 'b', false), Some((p(0, 1), p(0, 6))));
    }

    #[test]
    fn cursor_on_delimiter_selects_its_pair() {
        assert_eq!(sel("(a)(b)", p(0, 3), ')', false), Some((p(0, 3), p(0, 5))));
        assert_eq!(sel("(a)(b)", p(0, 2), ')', false), Some((p(0, 0), p(0, 2))));
    }

    #[test]
    fn nested_brackets_and_count() {
        let buf = Buffer::from_text("[a [b [c] d] e]");
        assert_eq!(select(&buf, p(0, 7), '[', false, 1), Some((p(0, 6), p(0, 8))));
        assert_eq!(select(&buf, p(0, 7), '[', false, 2), Some((p(0, 3), p(0, 11))));
        assert_eq!(select(&buf, p(0, 7), '[', true, 3), Some((p(0, 1), p(0, 13))));
        assert_eq!(select(&buf, p(0, 7), '[', false, 4), None);
    }

    #[test]
    fn brackets_inside_strings_are_skipped() {
        let text = r#"f(")", x)"#;
        assert_eq!(sel(text, p(0, 7), '(', false), Some((p(0, 1), p(0, 8))));
    }

    #[test]
    fn brackets_inside_comments_are_skipped() {
        let text = "{ a // }\n}";
        assert_eq!(sel(text, p(0, 2), '{', false), Some((p(0, 0), p(1, 0))));
    }

    #[test]
    fn multiline_inner_block_is_whole_lines() {
        let text = "fn f() {\n    body;\n}";
        assert_eq!(sel(text, p(1, 4), '{', true), Some((p(1, 0), p(1, 9))));
        assert_eq!(sel(text, p(1, 4), 'B', false), Some((p(0, 7), p(2, 0))));
    }

    #[test]
    fn inner_empty_pair_fails_around_works() {
        assert_eq!(sel("f()", p(0, 1), '(', true), None);
        assert_eq!(sel("f()", p(0, 1), '(', false), Some((p(0, 1), p(0, 2))));
        assert_eq!(sel("{\n}", p(0, 0), '{', true), None);
    }

    #[test]
    fn no_enclosing_pair() {
        assert_eq!(sel("abc", p(0, 1), '(', true), None);
        assert_eq!(sel("(a) b", p(0, 4), '(', false), None);
    }

    // -- Paragraphs -------------------------------------------------------

    #[test]
    fn inner_and_around_paragraph() {
        let text = "a\nb\n\n\nc";
        assert_eq!(sel(text, p(1, 0), 'p', true), Some((p(0, 0), p(1, 1))));
        assert_eq!(sel(text, p(1, 0), 'p', false), Some((p(0, 0), p(3, 0))));
    }

    #[test]
    fn around_last_paragraph_takes_blanks_before() {
        let text = "a\n\nc\nd";
        assert_eq!(sel(text, p(2, 0), 'p', false), Some((p(1, 0), p(3, 1))));
    }

    // -- Literal masks ----------------------------------------------------

    #[test]
    fn mask_covers_strings_chars_and_comments() {
        let chars: Vec<char> = r#"a "(" ')' b /* ( */ c // )"#.chars().collect();
        let mask = literal_mask(&chars);
        let masked: String = chars
            .iter()
            .zip(&mask)
            .map(|(c, &m)| if m { '#' } else { *c })
            .collect();
        assert_eq!(masked, "a ### ### b ####### c ####");
    }

    #[test]
    fn lifetimes_are_not_char_literals() {
        let chars: Vec<char> = "&'a (x)".chars().collect();
        assert!(literal_mask(&chars).iter().all(|m| !m));
    }

    // -- % ------------------------------------------------------------------

    #[test]
    fn match_pair_round_trips() {
        let buf = Buffer::from_text("(a(b)c)");
        assert_eq!(match_pair(&buf, p(0, 0)), Some(p(0, 6)));
        assert_eq!(match_pair(&buf, p(0, 6)), Some(p(0, 0)));
        assert_eq!(match_pair(&buf, p(0, 2)), Some(p(0, 4)));
    }

    #[test]
    fn match_pair_scans_forward_on_line() {
        let buf = Buffer::from_text("if x { y }");
        assert_eq!(match_pair(&buf, p(0, 0)), Some(p(0, 9)));
    }

    #[test]
    fn match_pair_across_lines_and_literals() {
        let buf = Buffer::from_text("{\n  \"}\"\n}");
        assert_eq!(match_pair(&buf, p(0, 0)), Some(p(2, 0)));
        assert_eq!(match_pair(&buf, p(2, 0)), Some(p(0, 0)));
    }

    #[test]
    fn match_pair_without_bracket_fails() {
        let buf = Buffer::from_text("abc\n(x)");
        assert_eq!(match_pair(&buf, p(0, 0)), None);
    }
}
