//! Pattern search for `/`, `?`, `n`, `N`, `*` and `#`.
//!
//! Patterns are regular expressions (the `regex` crate syntax), matched one
//! line at a time so a match never spans a line break.
//!
//! # Search flow
//!
//! 1. `/` or `?` opens a [`SearchPrompt`]; keys edit its input
//! 2. Enter commits the pattern as a search verb, which stores it in
//!    [`SearchState`] and jumps to the first match
//! 3. Escape (or backspacing past the start) cancels
//! 4. `n`/`N` repeat the stored pattern in the same/opposite direction
//!
//! `*`/`#` store the word under the cursor as a whole-word pattern.

use n_buffer::{Buffer, Point};
use regex::{Regex, RegexBuilder};

use crate::word::{ScanState, WordKind, classify};

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Search direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum SearchDirection {
    Forward,
    Backward,
}

impl SearchDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    /// Prompt char.
    #[must_use]
    pub const fn prompt(self) -> char {
        match self {
            Self::Forward => '/',
            Self::Backward => '?',
        }
    }
}

// ---------------------------------------------------------------------------
// SearchPrompt
// ---------------------------------------------------------------------------

/// An open `/` or `?` input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPrompt {
    input: String,
    direction: SearchDirection,
}

impl SearchPrompt {
    /// An empty prompt opened by `/` or `?`.
    #[must_use]
    pub const fn new(direction: SearchDirection) -> Self {
        Self {
            input: String::new(),
            direction,
        }
    }

    /// The pattern typed so far.
    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Forward for `/`, backward for `?`.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> SearchDirection {
        self.direction
    }

    /// Append a typed char to the pattern.
    pub fn push(&mut self, ch: char) {
        self.input.push(ch);
    }

    /// Delete the last char. Returns `false` when the input was already
    /// empty, which closes the prompt.
    pub fn backspace(&mut self) -> bool {
        self.input.pop().is_some()
    }

    /// The input, consuming the prompt.
    #[must_use]
    pub fn into_input(self) -> String {
        self.input
    }
}

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// The last committed pattern, for `n`/`N`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    last: Option<(String, SearchDirection)>,
}

impl SearchState {
    /// No search yet, so `n` and `N` fail.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Remember the pattern and direction `n` and `N` repeat.
    pub fn set(&mut self, pattern: String, direction: SearchDirection) {
        self.last = Some((pattern, direction));
    }

    /// The last pattern searched for.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.last.as_ref().map(|(p, _)| p.as_str())
    }

    /// The direction of the last search. `N` runs the other way.
    #[must_use]
    pub fn direction(&self) -> Option<SearchDirection> {
        self.last.as_ref().map(|&(_, d)| d)
    }
}

/// Compile a pattern.
///
/// # Errors
///
/// Returns the regex error for a malformed pattern.
pub fn compile(pattern: &str, ignorecase: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(ignorecase)
        .build()
}

// ---------------------------------------------------------------------------
// Finding
// ---------------------------------------------------------------------------

/// Char columns of every match start on `line`.
fn match_cols(buf: &Buffer, re: &Regex, line: usize) -> Vec<usize> {
    let text = buf.line_text(line);
    let mut cols = Vec::new();
    let mut chars = 0;
    let mut last_byte = 0;
    for m in re.find_iter(&text) {
        chars += text[last_byte..m.start()].chars().count();
        last_byte = m.start();
        cols.push(chars);
    }
    cols
}

/// Next match start strictly after `from`, wrapping to the top when `wrap`.
#[must_use]
pub fn find_forward(buf: &Buffer, re: &Regex, from: Point, wrap: bool) -> Option<Point> {
    let lines = buf.line_count();
    if let Some(&col) = match_cols(buf, re, from.line).iter().find(|&&c| c > from.col) {
        return Some(from.with_col(col));
    }
    for line in from.line + 1..lines {
        if let Some(&col) = match_cols(buf, re, line).first() {
            return Some(Point::new(line, col));
        }
    }
    if !wrap {
        return None;
    }
    for line in 0..=from.line {
        let cols = match_cols(buf, re, line);
        let hit = if line == from.line {
            cols.into_iter().find(|&c| c <= from.col)
        } else {
            cols.first().copied()
        };
        if let Some(col) = hit {
            return Some(Point::new(line, col));
        }
    }
    None
}

/// Previous match start strictly before `from`, wrapping to the bottom
/// when `wrap`.
#[must_use]
pub fn find_backward(buf: &Buffer, re: &Regex, from: Point, wrap: bool) -> Option<Point> {
    let lines = buf.line_count();
    if let Some(&col) = match_cols(buf, re, from.line).iter().rev().find(|&&c| c < from.col) {
        return Some(from.with_col(col));
    }
    for line in (0..from.line).rev() {
        if let Some(&col) = match_cols(buf, re, line).last() {
            return Some(Point::new(line, col));
        }
    }
    if !wrap {
        return None;
    }
    for line in (from.line..lines).rev() {
        let cols = match_cols(buf, re, line);
        let hit = if line == from.line {
            cols.into_iter().rev().find(|&c| c >= from.col)
        } else {
            cols.last().copied()
        };
        if let Some(col) = hit {
            return Some(Point::new(line, col));
        }
    }
    None
}

/// Find in `direction`.
#[must_use]
pub fn find(
    buf: &Buffer,
    re: &Regex,
    from: Point,
    direction: SearchDirection,
    wrap: bool,
) -> Option<Point> {
    match direction {
        SearchDirection::Forward => find_forward(buf, re, from, wrap),
        SearchDirection::Backward => find_backward(buf, re, from, wrap),
    }
}

/// Whole-word pattern for `*`/`#`: the keyword under the cursor, or the
/// first one after it on the line. Returns the pattern and the keyword's
/// start point.
#[must_use]
pub fn word_pattern(buf: &Buffer, at: Point) -> Option<(String, Point)> {
    let chars = buf.line_chars(at.line);
    let is_word = |c: char| classify(c, WordKind::Small) == ScanState::InWord;
    let mut start = (at.col..chars.len()).find(|&c| is_word(chars[c]))?;
    while start > 0 && is_word(chars[start - 1]) {
        start -= 1;
    }
    let end = (start..chars.len())
        .find(|&c| !is_word(chars[c]))
        .unwrap_or(chars.len());
    let word: String = chars[start..end].iter().collect();
    Some((
        format!(r"\b{}\b", regex::escape(&word)),
        at.with_col(start),
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
