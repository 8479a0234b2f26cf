//! Registers: storage for yanked and deleted text.
//!
//! There is one slot per printable ASCII char, indexed by `ch - ' '`. Every
//! yank, delete and change writes a slot; paste reads one.
//!
//! - **`"`**: the unnamed register. Writes to any other register are
//!   mirrored here.
//! - **`a`–`z` and the other printable chars**: overwrite their own slot.
//! - **`A`–`Z`**: append to the matching lowercase slot.
//! - **`_`**: the black hole. Writes are dropped and reads find nothing.
//!
//! The yank's shape decides how paste behaves:
//!
//! | Yank       | From                 | `p` inserts                  |
//! |------------|----------------------|------------------------------|
//! | `String`   | `x`, `dw`, `v…y`     | inline after the cursor      |
//! | `Line`     | `dd`, `yy`, `V…y`    | whole lines below            |
//! | `Block`    | `^V…y`               | a column, one row per line   |

use std::fmt;

/// Shape of yanked text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum YankType {
    #[default]
    Char,
    Line,
    Block,
}

/// Yanked text with its shape.
///
/// `Line` text has no trailing newline; embedded `\n`s separate lines.
/// `Block` rows may be empty for short lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Yank {
    String(String),
    Line(String),
    Block(Vec<String>),
}

impl Yank {
    /// Build a yank of the given shape from extracted text. Block text is
    /// split on `\n`.
    #[must_use]
    pub fn new(kind: YankType, text: String) -> Self {
        match kind {
            YankType::Char => Self::String(text),
            YankType::Line => Self::Line(text),
            YankType::Block => Self::Block(text.split('\n').map(str::to_string).collect()),
        }
    }

    /// How a paste lays the text out.
    #[must_use]
    pub const fn kind(&self) -> YankType {
        match self {
            Self::String(_) => YankType::Char,
            Self::Line(_) => YankType::Line,
            Self::Block(_) => YankType::Block,
        }
    }

    /// Content as one string; block rows are joined with `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::String(s) | Self::Line(s) => s.clone(),
            Self::Block(rows) => rows.join("\n"),
        }
    }

    /// Nothing to paste.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::String(s) => s.is_empty(),
            Self::Line(_) => false,
            Self::Block(rows) => rows.is_empty(),
        }
    }

    /// `self` followed by `other`, as an uppercase-register write.
    fn append(self, other: Self) -> Self {
        match (self, other) {
            (Self::String(mut a), Self::String(b)) => {
                a.push_str(&b);
                Self::String(a)
            }
            (Self::Block(mut a), Self::Block(b)) => {
                a.extend(b);
                Self::Block(a)
            }
            (a, b) => Self::Line(format!("{}\n{}", a.text(), b.text())),
        }
    }
}

impl fmt::Display for Yank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "c {s:?}"),
            Self::Line(s) => write!(f, "l {s:?}"),
            Self::Block(rows) => write!(f, "b {rows:?}"),
        }
    }
}

// ── Register store ───────────────────────────────────────────────────────

const SLOTS: usize = 95;

/// The unnamed register.
pub const UNNAMED: char = '"';
/// The black-hole register.
pub const BLACK_HOLE: char = '_';

const UNNAMED_SLOT: usize = UNNAMED as usize - ' ' as usize;

#[inline]
fn slot(name: char) -> Option<usize> {
    (' '..='~')
        .contains(&name)
        .then(|| name as usize - ' ' as usize)
}

/// All registers.
#[derive(Debug, Clone)]
pub struct RegisterStore {
    slots: Vec<Option<Yank>>,
}

impl Default for RegisterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterStore {
    /// All registers empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![None; SLOTS],
        }
    }

    /// True if `name` can be written.
    #[must_use]
    pub fn is_valid(name: char) -> bool {
        slot(name).is_some()
    }

    /// Read a register. Uppercase names read their lowercase slot.
    #[must_use]
    pub fn get(&self, name: char) -> Option<&Yank> {
        if name == BLACK_HOLE {
            return None;
        }
        let idx = slot(name.to_ascii_lowercase())?;
        self.slots[idx].as_ref()
    }

    /// Write a register, replacing the previous value. Returns `false` for
    /// names outside printable ASCII.
    pub fn set(&mut self, name: char, yank: Yank) -> bool {
        if name == BLACK_HOLE {
            return true;
        }
        let Some(idx) = slot(name.to_ascii_lowercase()) else {
            return false;
        };
        let value = if name.is_ascii_uppercase() {
            match self.slots[idx].take() {
                Some(old) => old.append(yank),
                None => yank,
            }
        } else {
            yank
        };
        if name != UNNAMED {
            self.slots[UNNAMED_SLOT] = Some(value.clone());
        }
        self.slots[idx] = Some(value);
        true
    }

    /// Every non-empty register in char order, for list views.
    pub fn iter(&self) -> impl Iterator<Item = (char, &Yank)> + '_ {
        self.slots
            .iter()
            .zip(' '..='~')
            .filter_map(|(y, name)| y.as_ref().map(|y| (name, y)))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
