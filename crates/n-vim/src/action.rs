//! The parsed form of a command: `[count]["reg][count]verb[count]motion`.
//!
//! An [`Action`] pairs a [`Verb`] with an optional [`Motion`]. Plain cursor
//! movement is the [`VerbKind::Move`] verb with a motion, so every key that
//! does something in Normal or Visual mode ends up as one `Action`.

use bitflags::bitflags;

use crate::find::FindKind;
use crate::mode::{Mode, VisualKind};
use crate::register::{BLACK_HOLE, YankType};
use crate::search::SearchDirection;
use crate::word::WordKind;

// ---------------------------------------------------------------------------
// Motion
// ---------------------------------------------------------------------------

/// Every motion the core knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionKind {
    /// `h`
    Left,
    /// `l`, space
    Right,
    /// `k`
    Up,
    /// `j`
    Down,
    /// `w` `W`
    WordStart(WordKind),
    /// `b` `B`
    WordBack(WordKind),
    /// `e` `E`
    WordEnd(WordKind),
    /// `ge` `gE`
    WordEndBack(WordKind),
    /// `0`
    LineStart,
    /// `^`
    FirstNonBlank,
    /// `$`
    LineEnd,
    /// `f` `F` `t` `T`, target in the motion arg.
    Find(FindKind),
    /// `;`
    RepeatFind,
    /// `,`
    RepeatFindReverse,
    /// `%`, or `N%` for the line N percent down the buffer.
    MatchPair,
    /// `i`/`a` + object key in the motion arg.
    TextObject { inner: bool },
    /// `n`
    SearchNext,
    /// `N`
    SearchPrev,
    /// `*` `#`
    WordUnderCursor { forward: bool },
    /// `H`
    ViewTop,
    /// `M`
    ViewMiddle,
    /// `L`
    ViewBottom,
    /// `Ctrl-D`
    HalfPageDown,
    /// `Ctrl-U`
    HalfPageUp,
    /// `Ctrl-F`
    PageDown,
    /// `Ctrl-B`
    PageUp,
    /// `gg`
    BufferStart,
    /// `G`
    BufferEnd,
    /// `}`
    ParagraphForward,
    /// `{`
    ParagraphBackward,
    /// `'x`
    MarkLine,
    /// `` `x ``
    MarkExact,
    /// The doubled operator (`dd`, `yy`, `>>`) and `S`, `Y`, `J`.
    CurrentLine,
    /// The live selection, implied by any verb in Visual mode.
    VisualRange,
    /// A charwise selection's shape, replayed from the cursor by `.`.
    VisualExtent { lines: usize, cols: usize },
}

impl MotionKind {
    /// The motion's end is not part of the range.
    ///
    /// `;`/`,` report inclusive here; their class depends on the find they
    /// repeat and is settled when they run.
    #[must_use]
    pub const fn exclusive(self) -> bool {
        match self {
            Self::Find(kind) => kind.exclusive(),
            Self::Left
            | Self::Right
            | Self::WordStart(_)
            | Self::WordBack(_)
            | Self::LineStart
            | Self::FirstNonBlank
            | Self::SearchNext
            | Self::SearchPrev
            | Self::WordUnderCursor { .. }
            | Self::ParagraphForward
            | Self::ParagraphBackward
            | Self::MarkExact => true,
            _ => false,
        }
    }

    /// Operators act on whole lines. `arg` is the text-object key.
    #[must_use]
    pub const fn linewise(self, arg: Option<char>) -> bool {
        match self {
            Self::TextObject { .. } => matches!(arg, Some('p')),
            Self::Up
            | Self::Down
            | Self::ViewTop
            | Self::ViewMiddle
            | Self::ViewBottom
            | Self::HalfPageDown
            | Self::HalfPageUp
            | Self::PageDown
            | Self::PageUp
            | Self::BufferStart
            | Self::BufferEnd
            | Self::MarkLine
            | Self::CurrentLine => true,
            _ => false,
        }
    }

    /// `j`/`k`: keep the motion column.
    #[inline]
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// `h l j k` stop quietly at the buffer edge once they have moved.
    #[inline]
    #[must_use]
    pub const fn saturates(self) -> bool {
        matches!(self, Self::Left | Self::Right | Self::Up | Self::Down)
    }

    /// The motion reads the count itself and runs once: a line number for
    /// `gg G`, an offset for `H L`, an occurrence for finds, a size for
    /// text objects and line ranges.
    #[must_use]
    pub const fn takes_count(self) -> bool {
        matches!(
            self,
            Self::BufferStart
                | Self::BufferEnd
                | Self::ViewTop
                | Self::ViewMiddle
                | Self::ViewBottom
                | Self::LineEnd
                | Self::Find(_)
                | Self::RepeatFind
                | Self::RepeatFindReverse
                | Self::MatchPair
                | Self::TextObject { .. }
                | Self::MarkLine
                | Self::MarkExact
                | Self::CurrentLine
                | Self::VisualRange
                | Self::VisualExtent { .. }
        )
    }

    /// An `i`/`a` object: the range is the object, not cursor to target.
    #[inline]
    #[must_use]
    pub const fn is_text_object(self) -> bool {
        matches!(self, Self::TextObject { .. })
    }

    /// Page motions also scroll the view.
    #[inline]
    #[must_use]
    pub const fn is_page(self) -> bool {
        matches!(
            self,
            Self::HalfPageDown | Self::HalfPageUp | Self::PageDown | Self::PageUp
        )
    }
}

/// A motion with its own count and argument key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    pub kind: MotionKind,
    pub count: Option<usize>,
    /// Find target, mark name or text-object key.
    pub arg: Option<char>,
}

impl Motion {
    /// A motion with no count and no arg.
    #[must_use]
    pub const fn new(kind: MotionKind) -> Self {
        Self {
            kind,
            count: None,
            arg: None,
        }
    }

    /// Attach the find target, mark name or object key.
    #[must_use]
    pub const fn with_arg(mut self, arg: char) -> Self {
        self.arg = Some(arg);
        self
    }
}

// ---------------------------------------------------------------------------
// Verb
// ---------------------------------------------------------------------------

/// Where an insert verb puts the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertKind {
    /// `i`
    Before,
    /// `a`
    After,
    /// `I`
    LineStart,
    /// `A`
    LineEnd,
    /// `o`
    OpenBelow,
    /// `O`
    OpenAbove,
}

/// `zz` `zt` `zb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollTo {
    Center,
    Top,
    Bottom,
}

/// Every verb the core knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerbKind {
    /// The implicit verb of a bare motion.
    Move,
    Delete,
    Change,
    Yank,
    PasteAfter,
    PasteBefore,
    /// Visual `p`: replace the selection with the register.
    PasteReplace,
    Indent,
    Unindent,
    Join,
    FlipCase,
    Increment,
    Decrement,
    /// `r`, replacement in the verb arg.
    ReplaceChar,
    Insert(InsertKind),
    /// `R`
    ReplaceMode,
    Visual(VisualKind),
    /// Esc in Normal or Visual.
    Normal,
    /// Visual `o`.
    SwapAnchor,
    /// `m`, mark name in the verb arg.
    SetMark,
    Undo,
    Redo,
    /// `.`
    DotRepeat,
    Scroll(ScrollTo),
    /// `/` `?`: open the prompt.
    OpenSearch(SearchDirection),
    /// A committed prompt, pattern in the payload.
    Search(SearchDirection),
}

impl VerbKind {
    /// Stored for `.` when it completes.
    #[must_use]
    pub const fn is_repeatable(self) -> bool {
        matches!(
            self,
            Self::Delete
                | Self::Change
                | Self::PasteAfter
                | Self::PasteBefore
                | Self::PasteReplace
                | Self::Indent
                | Self::Unindent
                | Self::Join
                | Self::FlipCase
                | Self::Increment
                | Self::Decrement
                | Self::ReplaceChar
                | Self::Insert(_)
                | Self::ReplaceMode
        )
    }

    /// The verb ends in Insert or Replace mode.
    #[must_use]
    pub const fn enters_insert(self) -> bool {
        matches!(self, Self::Change | Self::Insert(_) | Self::ReplaceMode)
    }

    /// In Visual mode the verb acts on the selection.
    #[must_use]
    pub const fn uses_selection(self) -> bool {
        matches!(
            self,
            Self::Delete
                | Self::Change
                | Self::Yank
                | Self::PasteAfter
                | Self::PasteBefore
                | Self::PasteReplace
                | Self::Indent
                | Self::Unindent
                | Self::Join
                | Self::FlipCase
                | Self::Increment
                | Self::Decrement
                | Self::ReplaceChar
                | Self::Insert(_)
        )
    }
}

/// A verb with its argument key and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verb {
    pub kind: VerbKind,
    /// Replacement char or mark name.
    pub arg: Option<char>,
    /// Committed search pattern.
    pub payload: Option<String>,
}

impl Verb {
    /// A verb with no arg and no payload.
    #[must_use]
    pub const fn new(kind: VerbKind) -> Self {
        Self {
            kind,
            arg: None,
            payload: None,
        }
    }

    /// Attach the char `r` replaces with or the mark `m` sets.
    #[must_use]
    pub const fn with_arg(mut self, arg: char) -> Self {
        self.arg = Some(arg);
        self
    }

    /// Attach a string payload, the pattern of a committed search.
    #[must_use]
    pub fn with_payload(mut self, payload: String) -> Self {
        self.payload = Some(payload);
        self
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

bitflags! {
    /// How an action treats its range, the undo log and the register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ActionFlags: u8 {
        /// The range end is not included.
        const EXCLUSIVE   = 1 << 0;
        /// Stored for `.`.
        const REPEATABLE  = 1 << 1;
        /// Text typed in the insert session the action opens joins the
        /// action's own undo group.
        const CHAIN_UNDO  = 1 << 2;
        /// Removed text is not written to a register.
        const DO_NOT_YANK = 1 << 3;
        /// The cursor may end one past the last char.
        const PAST_END    = 1 << 4;
    }
}

/// A fully parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// Count typed before the verb (the two counts around `"x` multiply).
    pub count: Option<usize>,
    pub register: Option<char>,
    pub verb: Verb,
    pub motion: Option<Motion>,
    pub yank_type: YankType,
    pub flags: ActionFlags,
}

impl Action {
    /// Build an action and settle its flags from the verb, the motion and
    /// the mode it was typed in.
    #[must_use]
    pub fn new(
        count: Option<usize>,
        register: Option<char>,
        verb: Verb,
        motion: Option<Motion>,
        mode: Mode,
    ) -> Self {
        let mut flags = ActionFlags::empty();
        let mut yank_type = YankType::Char;

        if let Some(m) = motion {
            flags.set(ActionFlags::EXCLUSIVE, m.kind.exclusive());
            // `50%` is a line jump, not a bracket match.
            let percent =
                m.kind == MotionKind::MatchPair && (count.is_some() || m.count.is_some());
            if m.kind.linewise(m.arg) || percent {
                yank_type = YankType::Line;
            }
        }
        match mode.visual_kind() {
            Some(VisualKind::Char) => yank_type = YankType::Char,
            Some(VisualKind::Line) => yank_type = YankType::Line,
            Some(VisualKind::Block) => yank_type = YankType::Block,
            None => {}
        }

        flags.set(ActionFlags::REPEATABLE, verb.kind.is_repeatable());
        flags.set(
            ActionFlags::DO_NOT_YANK,
            register == Some(BLACK_HOLE) || verb.kind == VerbKind::PasteReplace,
        );
        flags.set(ActionFlags::PAST_END, verb.kind.enters_insert());
        flags.set(ActionFlags::CHAIN_UNDO, verb.kind.enters_insert());

        Self {
            count,
            register,
            verb,
            motion,
            yank_type,
            flags,
        }
    }

    /// The overall count, 1 when none was typed.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.unwrap_or(1)
    }

    /// `count × motion count`, and whether either was typed.
    #[must_use]
    pub fn total_count(&self) -> (usize, bool) {
        let motion_count = self.motion.and_then(|m| m.count);
        let explicit = self.count.is_some() || motion_count.is_some();
        (self.count().saturating_mul(motion_count.unwrap_or(1)), explicit)
    }

    /// Operators act on whole lines.
    #[inline]
    #[must_use]
    pub fn is_linewise(&self) -> bool {
        self.yank_type == YankType::Line
    }

    /// The range end is left out.
    #[inline]
    #[must_use]
    pub const fn is_exclusive(&self) -> bool {
        self.flags.contains(ActionFlags::EXCLUSIVE)
    }

    /// The register to write, `"` when none was named.
    #[must_use]
    pub fn register_or_default(&self) -> char {
        self.register.unwrap_or(crate::register::UNNAMED)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn action(verb: VerbKind, motion: MotionKind, mode: Mode) -> Action {
        Action::new(None, None, Verb::new(verb), Some(Motion::new(motion)), mode)
    }

    #[test]
    fn exclusive_and_inclusive_motions() {
        assert!(MotionKind::WordStart(WordKind::Small).exclusive());
        assert!(MotionKind::Find(FindKind::TillBackward).exclusive());
        assert!(!MotionKind::Find(FindKind::Forward).exclusive());
        assert!(!MotionKind::WordEnd(WordKind::Big).exclusive());
        assert!(!MotionKind::TextObject { inner: true }.exclusive());
        assert!(!MotionKind::MatchPair.exclusive());
    }

    #[test]
    fn linewise_motions() {
        assert!(MotionKind::Down.linewise(None));
        assert!(MotionKind::CurrentLine.linewise(None));
        assert!(MotionKind::TextObject { inner: true }.linewise(Some('p')));
        assert!(!MotionKind::TextObject { inner: true }.linewise(Some('w')));
        assert!(!MotionKind::LineEnd.linewise(None));
    }

    #[test]
    fn flags_from_motion() {
        let a = action(VerbKind::Delete, MotionKind::WordStart(WordKind::Small), Mode::Normal);
        assert!(a.is_exclusive());
        assert_eq!(a.yank_type, YankType::Char);
        assert!(a.flags.contains(ActionFlags::REPEATABLE));

        let a = action(VerbKind::Yank, MotionKind::CurrentLine, Mode::Normal);
        assert!(a.is_linewise());
        assert!(!a.flags.contains(ActionFlags::REPEATABLE));
    }

    #[test]
    fn insert_verbs_chain_their_session() {
        let a = action(VerbKind::Change, MotionKind::WordEnd(WordKind::Small), Mode::Normal);
        assert!(a.flags.contains(ActionFlags::CHAIN_UNDO));
        let a = action(VerbKind::Delete, MotionKind::WordEnd(WordKind::Small), Mode::Normal);
        assert!(!a.flags.contains(ActionFlags::CHAIN_UNDO));
    }

    #[test]
    fn counted_percent_is_linewise() {
        let pair = Some(Motion::new(MotionKind::MatchPair));
        let a = Action::new(None, None, Verb::new(VerbKind::Delete), pair, Mode::Normal);
        assert!(!a.is_linewise());
        let a = Action::new(Some(50), None, Verb::new(VerbKind::Delete), pair, Mode::Normal);
        assert!(a.is_linewise());
    }

    #[test]
    fn total_count_saturates() {
        let mut a = action(VerbKind::Delete, MotionKind::WordStart(WordKind::Small), Mode::Normal);
        a.count = Some(usize::MAX);
        if let Some(m) = a.motion.as_mut() {
            m.count = Some(2);
        }
        assert_eq!(a.total_count(), (usize::MAX, true));
    }

    #[test]
    fn visual_mode_decides_yank_type() {
        let a = action(VerbKind::Delete, MotionKind::VisualRange, Mode::Visual(VisualKind::Line));
        assert_eq!(a.yank_type, YankType::Line);
        let a = action(VerbKind::Yank, MotionKind::VisualRange, Mode::Visual(VisualKind::Block));
        assert_eq!(a.yank_type, YankType::Block);
    }

    #[test]
    fn black_hole_and_replace_paste_skip_yank() {
        let a = Action::new(
            None,
            Some('_'),
            Verb::new(VerbKind::Delete),
            Some(Motion::new(MotionKind::Right)),
            Mode::Normal,
        );
        assert!(a.flags.contains(ActionFlags::DO_NOT_YANK));
        let a = action(VerbKind::PasteReplace, MotionKind::VisualRange, Mode::Visual(VisualKind::Char));
        assert!(a.flags.contains(ActionFlags::DO_NOT_YANK));
    }

    #[test]
    fn insert_verbs_allow_past_end() {
        let a = Action::new(None, None, Verb::new(VerbKind::Insert(InsertKind::After)), None, Mode::Normal);
        assert!(a.flags.contains(ActionFlags::PAST_END));
        assert!(a.flags.contains(ActionFlags::REPEATABLE));
    }

    #[test]
    fn counts_multiply() {
        let mut a = action(VerbKind::Delete, MotionKind::WordStart(WordKind::Small), Mode::Normal);
        assert_eq!(a.total_count(), (1, false));
        a.count = Some(2);
        if let Some(m) = a.motion.as_mut() {
            m.count = Some(3);
        }
        assert_eq!(a.total_count(), (6, true));
    }
}
