//! Vim-style modes and the transitions between them.
//!
//! The core is always in exactly one [`Mode`]:
//!
//! | Mode         | Cursor limit         | Keys go to          |
//! |--------------|----------------------|---------------------|
//! | Normal       | `0..content_len-1`   | the action parser   |
//! | Insert       | `0..=content_len`    | the buffer          |
//! | Replace      | `0..=content_len`    | the buffer          |
//! | Visual(kind) | `0..content_len-1`   | the action parser   |
//!
//! Transitions are driven by [`Transition`] events:
//!
//! ```text
//!            i a I A o O              v V ^V gv
//!   INSERT <──────────── NORMAL ──────────────────> VISUAL*
//!          ──── Esc ───>   ^   <── Esc / any verb ──
//!                          │
//!   REPLACE <──── R ───────┘ (back on Esc or newline)
//! ```

use std::fmt;

use bitflags::bitflags;

// ---------------------------------------------------------------------------
// VisualKind
// ---------------------------------------------------------------------------

/// Visual sub-mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualKind {
    /// `v`
    Char,
    /// `V`
    Line,
    /// `Ctrl-V` / `gv`
    Block,
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The editing mode. Normal is where every session starts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    /// `R`: typed chars overwrite until Esc.
    Replace,
    Visual(VisualKind),
}

/// Events that move the mode machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Escape,
    /// A line break typed in Replace mode.
    Newline,
    EnterInsert,
    EnterReplace,
    /// `v`/`V`/`^V`: enter, switch, or leave when already in that kind.
    ToggleVisual(VisualKind),
    /// A verb other than a plain move finished.
    VerbApplied,
}

impl Mode {
    /// Status-line name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Replace => "REPLACE",
            Self::Visual(VisualKind::Char) => "VISUAL",
            Self::Visual(VisualKind::Line) => "VISUAL LINE",
            Self::Visual(VisualKind::Block) => "VISUAL BLOCK",
        }
    }

    /// The mode after `event`.
    #[must_use]
    pub const fn next(self, event: Transition) -> Self {
        match (self, event) {
            (_, Transition::Escape)
            | (Self::Replace, Transition::Newline)
            | (Self::Visual(_), Transition::VerbApplied) => Self::Normal,
            (_, Transition::EnterInsert) => Self::Insert,
            (_, Transition::EnterReplace) => Self::Replace,
            (Self::Visual(cur), Transition::ToggleVisual(kind)) => {
                if cur as u8 == kind as u8 {
                    Self::Normal
                } else {
                    Self::Visual(kind)
                }
            }
            (_, Transition::ToggleVisual(kind)) => Self::Visual(kind),
            (mode, Transition::Newline | Transition::VerbApplied) => mode,
        }
    }

    /// True if the cursor may rest one past the last char.
    #[inline]
    #[must_use]
    pub const fn cursor_past_end(self) -> bool {
        matches!(self, Self::Insert | Self::Replace)
    }

    /// True if keys are typed into the buffer.
    #[inline]
    #[must_use]
    pub const fn is_input(self) -> bool {
        matches!(self, Self::Insert | Self::Replace)
    }

    /// Any of `v`, `V` and `Ctrl-V`.
    #[inline]
    #[must_use]
    pub const fn is_visual(self) -> bool {
        matches!(self, Self::Visual(_))
    }

    /// The selection shape, `None` outside Visual.
    #[inline]
    #[must_use]
    pub const fn visual_kind(self) -> Option<VisualKind> {
        match self {
            Self::Visual(kind) => Some(kind),
            _ => None,
        }
    }

    /// The single-bit set for this mode, for key-binding filters.
    #[must_use]
    pub const fn as_set(self) -> ModeSet {
        match self {
            Self::Normal => ModeSet::NORMAL,
            Self::Insert => ModeSet::INSERT,
            Self::Replace => ModeSet::REPLACE,
            Self::Visual(VisualKind::Char) => ModeSet::VISUAL,
            Self::Visual(VisualKind::Line) => ModeSet::VISUAL_LINE,
            Self::Visual(VisualKind::Block) => ModeSet::VISUAL_BLOCK,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// ModeSet
// ---------------------------------------------------------------------------

bitflags! {
    /// A set of modes a key binding is active in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModeSet: u8 {
        const NORMAL       = 1 << 0;
        const INSERT       = 1 << 1;
        const REPLACE      = 1 << 2;
        const VISUAL       = 1 << 3;
        const VISUAL_LINE  = 1 << 4;
        const VISUAL_BLOCK = 1 << 5;

        const ANY_VISUAL = Self::VISUAL.bits()
            | Self::VISUAL_LINE.bits()
            | Self::VISUAL_BLOCK.bits();
        const COMMAND = Self::NORMAL.bits() | Self::ANY_VISUAL.bits();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const V: Mode = Mode::Visual(VisualKind::Char);
    const VL: Mode = Mode::Visual(VisualKind::Line);

    #[test]
    fn display_names() {
        assert_eq!(Mode::Normal.to_string(), "NORMAL");
        assert_eq!(Mode::Replace.to_string(), "REPLACE");
        assert_eq!(VL.to_string(), "VISUAL LINE");
        assert_eq!(Mode::Visual(VisualKind::Block).to_string(), "VISUAL BLOCK");
    }

    #[test]
    fn default_is_normal() {
        assert_eq!(Mode::default(), Mode::Normal);
    }

    // -- Transitions --------------------------------------------------------

    #[test]
    fn escape_always_returns_to_normal() {
        for m in [Mode::Normal, Mode::Insert, Mode::Replace, V, VL] {
            assert_eq!(m.next(Transition::Escape), Mode::Normal);
        }
    }

    #[test]
    fn newline_only_ends_replace() {
        assert_eq!(Mode::Replace.next(Transition::Newline), Mode::Normal);
        assert_eq!(Mode::Insert.next(Transition::Newline), Mode::Insert);
    }

    #[test]
    fn toggle_visual_enters_switches_and_leaves() {
        assert_eq!(Mode::Normal.next(Transition::ToggleVisual(VisualKind::Char)), V);
        assert_eq!(V.next(Transition::ToggleVisual(VisualKind::Line)), VL);
        assert_eq!(VL.next(Transition::ToggleVisual(VisualKind::Line)), Mode::Normal);
    }

    #[test]
    fn verb_application_leaves_visual_only() {
        assert_eq!(V.next(Transition::VerbApplied), Mode::Normal);
        assert_eq!(Mode::Insert.next(Transition::VerbApplied), Mode::Insert);
        assert_eq!(Mode::Normal.next(Transition::VerbApplied), Mode::Normal);
    }

    #[test]
    fn enter_input_modes() {
        assert_eq!(V.next(Transition::EnterInsert), Mode::Insert);
        assert_eq!(Mode::Normal.next(Transition::EnterReplace), Mode::Replace);
    }

    // -- Predicates ---------------------------------------------------------

    #[test]
    fn cursor_past_end_only_for_input_modes() {
        assert!(Mode::Insert.cursor_past_end());
        assert!(Mode::Replace.cursor_past_end());
        assert!(!Mode::Normal.cursor_past_end());
        assert!(!V.cursor_past_end());
    }

    #[test]
    fn visual_kind_accessor() {
        assert_eq!(VL.visual_kind(), Some(VisualKind::Line));
        assert_eq!(Mode::Insert.visual_kind(), None);
    }

    #[test]
    fn mode_sets() {
        assert!(ModeSet::COMMAND.contains(Mode::Normal.as_set()));
        assert!(ModeSet::ANY_VISUAL.contains(VL.as_set()));
        assert!(!ModeSet::COMMAND.contains(Mode::Insert.as_set()));
    }
}
