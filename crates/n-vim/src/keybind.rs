//! Key bindings: which parse handler a key starts in which mode.
//!
//! The table is an ordered list searched front to back; the first entry
//! whose key, modes and verb condition match wins. [`KeyBindTable::bind`]
//! puts new entries at the front, so a host binding shadows a default.
//!
//! One key may carry two entries told apart by [`When`]: `d` starts a
//! delete with no verb pending and completes `dd` with one.

use crate::action::{InsertKind, MotionKind, ScrollTo, VerbKind};
use crate::find::FindKind;
use crate::key;
use crate::mode::{Mode, ModeSet, VisualKind};
use crate::search::SearchDirection;
use crate::word::WordKind;

/// Whether a verb must (not) be pending for the entry to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum When {
    Always,
    NoVerb,
    VerbPending,
}

/// Verbs that take one more key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerbArg {
    /// `r`
    ReplaceChar,
    /// `m`
    SetMark,
    /// `z`
    Scroll,
    /// `g` in verb position: `gg` `ge` `gE` `gv` `g~`
    G,
}

/// Motions that take one more key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionArg {
    Find(FindKind),
    /// `'` (line) or `` ` `` (exact).
    Mark { exact: bool },
    /// `i` / `a` after an operator or in Visual.
    TextObject { inner: bool },
    /// `g` in motion position: `gg` `ge` `gE`
    G,
}

/// What a key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// An operator that waits for a motion (`d c y > <`).
    Operator(VerbKind),
    /// A verb that needs no motion (`u`, `p`, `i`, `.`).
    Verb(VerbKind),
    /// A verb with a fixed motion (`x` = `dl`, `D` = `d$`).
    Command {
        verb: VerbKind,
        motion: Option<MotionKind>,
    },
    VerbArg(VerbArg),
    /// `"`
    Register,
    Motion(MotionKind),
    MotionArg(MotionArg),
    /// The pending operator's own key again (`dd`, `yy`, `>>`).
    RepeatOperator,
}

/// One table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub modes: ModeSet,
    pub when: When,
    pub binding: Binding,
}

impl KeyBind {
    /// A binding for `modes`, active per `when`.
    #[must_use]
    pub const fn new(modes: ModeSet, when: When, binding: Binding) -> Self {
        Self {
            modes,
            when,
            binding,
        }
    }

    const fn applies(&self, mode: Mode, verb_pending: bool) -> bool {
        if !self.modes.contains(mode.as_set()) {
            return false;
        }
        match self.when {
            When::Always => true,
            When::NoVerb => !verb_pending,
            When::VerbPending => verb_pending,
        }
    }
}

/// Ordered key bindings.
#[derive(Debug, Clone)]
pub struct KeyBindTable {
    entries: Vec<(char, KeyBind)>,
}

impl Default for KeyBindTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl KeyBindTable {
    /// A table with no bindings at all.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The first binding for `key` in `mode`.
    #[must_use]
    pub fn lookup(&self, key: char, mode: Mode, verb_pending: bool) -> Option<Binding> {
        self.entries
            .iter()
            .find(|(k, bind)| *k == key && bind.applies(mode, verb_pending))
            .map(|(_, bind)| bind.binding)
    }

    /// Install a binding ahead of every existing one.
    pub fn bind(&mut self, key: char, bind: KeyBind) {
        self.entries.insert(0, (key, bind));
    }

    fn push(&mut self, key: char, modes: ModeSet, when: When, binding: Binding) {
        self.entries.push((key, KeyBind::new(modes, when, binding)));
    }

    /// Number of bindings, across all keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No key is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The stock vim bindings.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn with_defaults() -> Self {
        use Binding::{Command, Motion, MotionArg as MArg, Operator, Verb, VerbArg as VArg};
        use When::{Always, NoVerb, VerbPending};

        const N: ModeSet = ModeSet::NORMAL;
        const VIS: ModeSet = ModeSet::ANY_VISUAL;
        const CMD: ModeSet = ModeSet::COMMAND;

        let mut t = Self::empty();

        // -- Operators and their doubled forms ----------------------------
        for (k, verb) in [
            ('d', VerbKind::Delete),
            ('c', VerbKind::Change),
            ('y', VerbKind::Yank),
            ('>', VerbKind::Indent),
            ('<', VerbKind::Unindent),
        ] {
            t.push(k, CMD, NoVerb, Operator(verb));
            t.push(k, N, VerbPending, Binding::RepeatOperator);
        }
        // `g~~`
        t.push('~', N, VerbPending, Binding::RepeatOperator);

        // -- Normal-mode commands -------------------------------------------
        let cmd = |verb, motion| Command {
            verb,
            motion: Some(motion),
        };
        t.push('x', N, NoVerb, cmd(VerbKind::Delete, MotionKind::Right));
        t.push('X', N, NoVerb, cmd(VerbKind::Delete, MotionKind::Left));
        t.push('D', N, NoVerb, cmd(VerbKind::Delete, MotionKind::LineEnd));
        t.push('C', N, NoVerb, cmd(VerbKind::Change, MotionKind::LineEnd));
        t.push('s', N, NoVerb, cmd(VerbKind::Change, MotionKind::Right));
        t.push('S', N, NoVerb, cmd(VerbKind::Change, MotionKind::CurrentLine));
        t.push('Y', N, NoVerb, cmd(VerbKind::Yank, MotionKind::CurrentLine));
        t.push('J', N, NoVerb, cmd(VerbKind::Join, MotionKind::CurrentLine));
        t.push('~', N, NoVerb, cmd(VerbKind::FlipCase, MotionKind::Right));
        t.push('p', N, NoVerb, Verb(VerbKind::PasteAfter));
        t.push('P', N, NoVerb, Verb(VerbKind::PasteBefore));

        t.push('r', CMD, NoVerb, VArg(VerbArg::ReplaceChar));
        t.push('m', N, NoVerb, VArg(VerbArg::SetMark));
        t.push('z', CMD, NoVerb, VArg(VerbArg::Scroll));
        t.push('g', CMD, NoVerb, VArg(VerbArg::G));
        t.push('g', N, VerbPending, MArg(MotionArg::G));

        for (k, kind) in [
            ('i', InsertKind::Before),
            ('a', InsertKind::After),
            ('I', InsertKind::LineStart),
            ('A', InsertKind::LineEnd),
            ('o', InsertKind::OpenBelow),
            ('O', InsertKind::OpenAbove),
        ] {
            t.push(k, N, NoVerb, Verb(VerbKind::Insert(kind)));
        }
        t.push('R', N, NoVerb, Verb(VerbKind::ReplaceMode));

        t.push('u', N, NoVerb, Verb(VerbKind::Undo));
        t.push(key::CTRL_R, N, NoVerb, Verb(VerbKind::Redo));
        t.push('.', N, NoVerb, Verb(VerbKind::DotRepeat));
        t.push(key::CTRL_A, N, NoVerb, Verb(VerbKind::Increment));
        t.push(key::CTRL_X, N, NoVerb, Verb(VerbKind::Decrement));
        t.push('/', CMD, NoVerb, Verb(VerbKind::OpenSearch(SearchDirection::Forward)));
        t.push('?', CMD, NoVerb, Verb(VerbKind::OpenSearch(SearchDirection::Backward)));

        // -- Visual-mode verbs ----------------------------------------------
        for k in ['x', 'X', 'D', 'd'] {
            t.push(k, VIS, NoVerb, Operator(VerbKind::Delete));
        }
        for k in ['p', 'P'] {
            t.push(k, VIS, NoVerb, Verb(VerbKind::PasteReplace));
        }
        t.push('J', VIS, NoVerb, Operator(VerbKind::Join));
        t.push('~', VIS, NoVerb, Operator(VerbKind::FlipCase));
        t.push('s', VIS, NoVerb, Operator(VerbKind::Change));
        t.push('Y', VIS, NoVerb, Operator(VerbKind::Yank));
        t.push(key::CTRL_A, VIS, NoVerb, Verb(VerbKind::Increment));
        t.push(key::CTRL_X, VIS, NoVerb, Verb(VerbKind::Decrement));
        t.push('o', VIS, NoVerb, Verb(VerbKind::SwapAnchor));
        t.push('I', ModeSet::VISUAL_BLOCK, NoVerb, Verb(VerbKind::Insert(InsertKind::Before)));
        t.push('A', ModeSet::VISUAL_BLOCK, NoVerb, Verb(VerbKind::Insert(InsertKind::After)));

        t.push('v', CMD, NoVerb, Verb(VerbKind::Visual(VisualKind::Char)));
        t.push('V', CMD, NoVerb, Verb(VerbKind::Visual(VisualKind::Line)));
        t.push(key::CTRL_V, CMD, NoVerb, Verb(VerbKind::Visual(VisualKind::Block)));
        t.push(key::ESC, CMD, NoVerb, Verb(VerbKind::Normal));

        t.push('"', CMD, NoVerb, Binding::Register);

        // -- Motions ----------------------------------------------------------
        for (k, kind) in [
            ('h', MotionKind::Left),
            (key::BACKSPACE, MotionKind::Left),
            ('l', MotionKind::Right),
            (' ', MotionKind::Right),
            ('j', MotionKind::Down),
            ('k', MotionKind::Up),
            ('w', MotionKind::WordStart(WordKind::Small)),
            ('W', MotionKind::WordStart(WordKind::Big)),
            ('b', MotionKind::WordBack(WordKind::Small)),
            ('B', MotionKind::WordBack(WordKind::Big)),
            ('e', MotionKind::WordEnd(WordKind::Small)),
            ('E', MotionKind::WordEnd(WordKind::Big)),
            ('0', MotionKind::LineStart),
            ('^', MotionKind::FirstNonBlank),
            ('$', MotionKind::LineEnd),
            (';', MotionKind::RepeatFind),
            (',', MotionKind::RepeatFindReverse),
            ('%', MotionKind::MatchPair),
            ('n', MotionKind::SearchNext),
            ('N', MotionKind::SearchPrev),
            ('*', MotionKind::WordUnderCursor { forward: true }),
            ('#', MotionKind::WordUnderCursor { forward: false }),
            ('H', MotionKind::ViewTop),
            ('M', MotionKind::ViewMiddle),
            ('L', MotionKind::ViewBottom),
            (key::CTRL_D, MotionKind::HalfPageDown),
            (key::CTRL_U, MotionKind::HalfPageUp),
            (key::CTRL_F, MotionKind::PageDown),
            (key::CTRL_B, MotionKind::PageUp),
            ('G', MotionKind::BufferEnd),
            ('}', MotionKind::ParagraphForward),
            ('{', MotionKind::ParagraphBackward),
        ] {
            t.push(k, CMD, Always, Motion(kind));
        }
        for k in ['f', 'F', 't', 'T'] {
            if let Some(kind) = FindKind::from_key(k) {
                t.push(k, CMD, Always, MArg(MotionArg::Find(kind)));
            }
        }
        t.push('\'', CMD, Always, MArg(MotionArg::Mark { exact: false }));
        t.push('`', CMD, Always, MArg(MotionArg::Mark { exact: true }));

        // Text objects: after an operator, or anywhere in Visual.
        t.push('i', N, VerbPending, MArg(MotionArg::TextObject { inner: true }));
        t.push('a', N, VerbPending, MArg(MotionArg::TextObject { inner: false }));
        t.push('i', VIS, Always, MArg(MotionArg::TextObject { inner: true }));
        t.push('a', VIS, Always, MArg(MotionArg::TextObject { inner: false }));

        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VC: Mode = Mode::Visual(VisualKind::Char);

    #[test]
    fn operator_and_its_repeat_share_a_key() {
        let t = KeyBindTable::with_defaults();
        assert_eq!(
            t.lookup('d', Mode::Normal, false),
            Some(Binding::Operator(VerbKind::Delete))
        );
        assert_eq!(t.lookup('d', Mode::Normal, true), Some(Binding::RepeatOperator));
    }

    #[test]
    fn mode_filters_entries() {
        let t = KeyBindTable::with_defaults();
        assert_eq!(
            t.lookup('p', VC, false),
            Some(Binding::Verb(VerbKind::PasteReplace))
        );
        assert_eq!(
            t.lookup('i', VC, false),
            Some(Binding::MotionArg(MotionArg::TextObject { inner: true }))
        );
        assert_eq!(t.lookup('x', Mode::Insert, false), None);
    }

    #[test]
    fn g_depends_on_pending_verb() {
        let t = KeyBindTable::with_defaults();
        assert_eq!(t.lookup('g', Mode::Normal, false), Some(Binding::VerbArg(VerbArg::G)));
        assert_eq!(t.lookup('g', Mode::Normal, true), Some(Binding::MotionArg(MotionArg::G)));
    }

    #[test]
    fn verbs_do_not_match_while_verb_pending() {
        let t = KeyBindTable::with_defaults();
        assert_eq!(t.lookup('u', Mode::Normal, true), None);
        assert_eq!(
            t.lookup('w', Mode::Normal, true),
            Some(Binding::Motion(MotionKind::WordStart(WordKind::Small)))
        );
    }

    #[test]
    fn bind_shadows_default() {
        let mut t = KeyBindTable::with_defaults();
        let before = t.len();
        t.bind(
            'Y',
            KeyBind::new(
                ModeSet::NORMAL,
                When::NoVerb,
                Binding::Command {
                    verb: VerbKind::Yank,
                    motion: Some(MotionKind::LineEnd),
                },
            ),
        );
        assert_eq!(t.len(), before + 1);
        assert_eq!(
            t.lookup('Y', Mode::Normal, false),
            Some(Binding::Command {
                verb: VerbKind::Yank,
                motion: Some(MotionKind::LineEnd)
            })
        );
    }

    #[test]
    fn empty_table_matches_nothing() {
        let t = KeyBindTable::empty();
        assert!(t.is_empty());
        assert_eq!(t.lookup('j', Mode::Normal, false), None);
    }
}
