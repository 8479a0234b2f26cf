//! `f`/`F`/`t`/`T` and their `;`/`,` repeats.
//!
//! Finds never leave the cursor line. The scan starts one char past (or
//! before) the cursor; till-variants then stop one short of the target.

use n_buffer::{Buffer, Point};

/// Which of the four find commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindKind {
    /// `f`
    Forward,
    /// `F`
    Backward,
    /// `t`
    TillForward,
    /// `T`
    TillBackward,
}

impl FindKind {
    /// `f F t T` to their kind.
    #[must_use]
    pub const fn from_key(key: char) -> Option<Self> {
        match key {
            'f' => Some(Self::Forward),
            'F' => Some(Self::Backward),
            't' => Some(Self::TillForward),
            'T' => Some(Self::TillBackward),
            _ => None,
        }
    }

    /// The same find in the other direction, for `,`.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
            Self::TillForward => Self::TillBackward,
            Self::TillBackward => Self::TillForward,
        }
    }

    /// `f` and `t` scan right.
    #[inline]
    #[must_use]
    pub const fn is_forward(self) -> bool {
        matches!(self, Self::Forward | Self::TillForward)
    }

    /// `t` and `T` stop one short of the target.
    #[inline]
    #[must_use]
    pub const fn is_till(self) -> bool {
        matches!(self, Self::TillForward | Self::TillBackward)
    }

    /// Backward finds are exclusive, forward ones inclusive.
    #[inline]
    #[must_use]
    pub const fn exclusive(self) -> bool {
        !self.is_forward()
    }
}

/// The last find, for `;` and `,`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindCharState {
    last: Option<(FindKind, char)>,
}

impl FindCharState {
    /// No find yet, so `;` and `,` fail.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Remember a find for `;` and `,`.
    pub const fn set(&mut self, kind: FindKind, target: char) {
        self.last = Some((kind, target));
    }

    /// The last find and its target char.
    #[must_use]
    pub const fn last(&self) -> Option<(FindKind, char)> {
        self.last
    }
}

/// The `count`th `target` from `from` on its line.
///
/// `repeat` is set for `;`/`,`: a till that would land where it started
/// skips the adjacent target instead of sticking to it.
#[must_use]
pub fn find_char(
    buf: &Buffer,
    from: Point,
    kind: FindKind,
    target: char,
    count: usize,
    repeat: bool,
) -> Option<Point> {
    let chars = buf.line_chars(from.line);
    let skip = usize::from(repeat && kind.is_till());
    let mut col = from.col;
    for _ in 0..count.max(1) {
        col = if kind.is_forward() {
            (col + 1 + skip..chars.len()).find(|&c| chars[c] == target)?
        } else {
            (0..col.checked_sub(skip)?).rev().find(|&c| chars[c] == target)?
        };
    }
    let col = match kind {
        FindKind::TillForward => col - 1,
        FindKind::TillBackward => col + 1,
        _ => col,
    };
    Some(from.with_col(col))
}
