//! View: cursor, scroll offset and viewport size.
//!
//! The view owns no text. The editing core mutates `cursor` directly and
//! reads `scroll` and `rect` for view-relative motions (`H`, `M`, `L`,
//! page scrolling, `zz`/`zt`/`zb`).
//!
//! Columns on screen are *display* columns: a tab advances to the next
//! tab stop and a wide (CJK) char takes two cells. The helpers below
//! translate between char columns and display columns.

use unicode_width::UnicodeWidthChar;

use crate::buffer::Buffer;
use crate::position::Point;

// ---------------------------------------------------------------------------
// Display columns
// ---------------------------------------------------------------------------

/// Display column of `char_col` in a line.
///
/// Stops at a line ending or when the chars run out.
#[must_use]
pub fn char_col_to_display_col<I: Iterator<Item = char>>(
    chars: I,
    char_col: usize,
    tab_width: usize,
) -> usize {
    let tab_w = tab_width.max(1);
    let mut display_col = 0;

    for (i, ch) in chars.enumerate() {
        if i >= char_col {
            break;
        }
        match ch {
            '\n' | '\r' => break,
            '\t' => display_col = (display_col / tab_w + 1) * tab_w,
            _ => display_col += ch.width().unwrap_or(0),
        }
    }

    display_col
}

/// The char column whose cell covers `display_col`.
///
/// Past the end of the line this returns the line's char count, so callers
/// clamp the result to the valid cursor range.
#[must_use]
pub fn display_col_to_char_col<I: Iterator<Item = char>>(
    chars: I,
    display_col: usize,
    tab_width: usize,
) -> usize {
    let tab_w = tab_width.max(1);
    let mut col = 0;
    let mut i = 0;

    for ch in chars {
        let next = match ch {
            '\n' | '\r' => break,
            '\t' => (col / tab_w + 1) * tab_w,
            _ => col + ch.width().unwrap_or(0),
        };
        if next > display_col {
            return i;
        }
        col = next;
        i += 1;
    }

    i
}

// ---------------------------------------------------------------------------
// Rect / View
// ---------------------------------------------------------------------------

/// Size of the text area in cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub width: usize,
    pub height: usize,
}

impl Rect {
    /// A `width` by `height` area in cells.
    #[inline]
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// The window onto a buffer.
///
/// `scroll.line` is the first visible line, `scroll.col` the first visible
/// display column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub cursor: Point,
    pub scroll: Point,
    pub rect: Rect,
}

impl View {
    /// A view of `rect`, cursor and scroll at the top.
    #[must_use]
    pub const fn new(rect: Rect) -> Self {
        Self {
            cursor: Point::ZERO,
            scroll: Point::ZERO,
            rect,
        }
    }

    /// Last visible line, given the buffer's length.
    #[must_use]
    pub fn bottom_line(&self, buf: &Buffer) -> usize {
        let last = buf.line_count().saturating_sub(1);
        (self.scroll.line + self.rect.height.saturating_sub(1)).min(last)
    }

    /// Scroll so the cursor sits at least `scroll_off` lines from the top
    /// and bottom edges and inside the horizontal window.
    pub fn follow_cursor(&mut self, buf: &Buffer, scroll_off: usize, tab_width: usize) {
        let height = self.rect.height;
        let width = self.rect.width;
        if height == 0 || width == 0 {
            return;
        }

        // A margin larger than half the window pins the cursor to the middle.
        let off = scroll_off.min(height.saturating_sub(1) / 2);
        let line = self.cursor.line;

        if line < self.scroll.line + off {
            self.scroll.line = line.saturating_sub(off);
        }
        if line + off >= self.scroll.line + height {
            self.scroll.line = line + off + 1 - height;
        }
        let max_top = buf.line_count().saturating_sub(1);
        self.scroll.line = self.scroll.line.min(max_top);

        let display = buf.line(line).map_or(0, |l| {
            char_col_to_display_col(l.chars(), self.cursor.col, tab_width)
        });
        if display < self.scroll.col {
            self.scroll.col = display;
        }
        if display >= self.scroll.col + width {
            self.scroll.col = display + 1 - width;
        }
    }

    /// `zz`: put the cursor line in the middle of the window.
    pub const fn center_on_cursor(&mut self) {
        self.scroll.line = self.cursor.line.saturating_sub(self.rect.height / 2);
    }

    /// `zt`: put the cursor line at the top.
    pub const fn top_on_cursor(&mut self) {
        self.scroll.line = self.cursor.line;
    }

    /// `zb`: put the cursor line at the bottom.
    pub const fn bottom_on_cursor(&mut self) {
        self.scroll.line = (self.cursor.line + 1).saturating_sub(self.rect.height);
    }

    /// Shift the scroll offset by `delta` lines, staying inside the buffer.
    pub fn scroll_lines(&mut self, buf: &Buffer, delta: isize) {
        let max_top = buf.line_count().saturating_sub(1);
        self.scroll.line = self.scroll.line.saturating_add_signed(delta).min(max_top);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
