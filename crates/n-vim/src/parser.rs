//! Incremental command parser.
//!
//! Keys are fed one at a time. The parser walks an explicit [`Stage`]
//! machine over the grammar `[count]["reg][count]verb[count]motion` and
//! reports after every key whether the command is complete, still growing,
//! or dead:
//!
//! ```text
//!            "         reg
//!   Start ───────> Register ────> Start
//!     │ operator                         motion
//!     ├──────────> Motion ─────────────────────────> Complete
//!     │              │ f t F T ' ` i a g    key
//!     │              └──────────> MotionArg ───────> Complete
//!     │ r m z g       key
//!     ├──────────> VerbArg ───────────────────────> Complete / Motion
//!     └ verb / command / motion ──────────────────> Complete
//! ```

use tracing::trace;

use crate::action::{Action, Motion, MotionKind, ScrollTo, Verb, VerbKind};
use crate::key;
use crate::keybind::{Binding, KeyBindTable, MotionArg, VerbArg};
use crate::mode::{Mode, VisualKind};
use crate::register::RegisterStore;
use crate::text_object;
use crate::word::WordKind;

/// What the last key did to the pending command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseResult {
    /// The sequence can never complete; it was dropped.
    Invalid,
    /// The first key of a sequence has no binding.
    KeyNotHandled,
    /// A handler is waiting for its argument key.
    ConsumeAdditionalKey,
    /// A valid prefix.
    InProgress,
    /// An action is ready; see [`ActionParser::take`].
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Start,
    Register,
    VerbArg(VerbArg),
    Motion,
    MotionArg(MotionArg),
}

/// The pending command.
#[derive(Debug, Clone)]
pub struct ActionParser {
    stage: Stage,
    /// Digits being typed.
    digits: Option<usize>,
    count: Option<usize>,
    motion_count: Option<usize>,
    register: Option<char>,
    verb: Option<Verb>,
    /// The key that started the pending operator, for `dd`/`g~~`.
    verb_key: Option<char>,
    keys: String,
    done: Option<Action>,
}

impl Default for ActionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionParser {
    /// A parser waiting for the first key of a command.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stage: Stage::Start,
            digits: None,
            count: None,
            motion_count: None,
            register: None,
            verb: None,
            verb_key: None,
            keys: String::new(),
            done: None,
        }
    }

    /// True when no key of a command has been typed.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys of the pending command, for a status line.
    #[must_use]
    pub fn pending_keys(&self) -> &str {
        &self.keys
    }

    /// Drop the pending command.
    pub fn reset(&mut self) {
        *self = Self {
            done: self.done.take(),
            ..Self::new()
        };
    }

    /// The action completed by the last [`feed`](Self::feed).
    pub fn take(&mut self) -> Option<Action> {
        self.done.take()
    }

    /// Feed one key.
    pub fn feed(&mut self, key: char, mode: Mode, table: &KeyBindTable) -> ParseResult {
        let idle = self.is_idle();
        self.keys.push(key);
        let result = self.step(key, mode, table, idle);
        trace!(target: "vim.parse", ?key, stage = ?self.stage, ?result, pending = %self.keys);
        match result {
            ParseResult::Invalid | ParseResult::KeyNotHandled => self.reset(),
            ParseResult::Complete => {
                self.keys.clear();
                self.reset();
            }
            ParseResult::ConsumeAdditionalKey | ParseResult::InProgress => {}
        }
        result
    }

    fn step(&mut self, key: char, mode: Mode, table: &KeyBindTable, idle: bool) -> ParseResult {
        if key == key::ESC && !idle {
            return ParseResult::Invalid;
        }
        match self.stage {
            Stage::Register => {
                if RegisterStore::is_valid(key) {
                    self.register = Some(key);
                    self.stage = Stage::Start;
                    ParseResult::InProgress
                } else {
                    ParseResult::Invalid
                }
            }
            Stage::VerbArg(arg) => self.verb_arg(arg, key, mode),
            Stage::MotionArg(arg) => self.motion_arg(arg, key, mode),
            Stage::Start | Stage::Motion => self.command_key(key, mode, table, idle),
        }
    }

    fn command_key(&mut self, key: char, mode: Mode, table: &KeyBindTable, idle: bool) -> ParseResult {
        if let Some(digit) = key.to_digit(10) {
            if digit != 0 || self.digits.is_some() {
                let digit = digit as usize;
                self.digits = Some(
                    self.digits
                        .unwrap_or(0)
                        .saturating_mul(10)
                        .saturating_add(digit),
                );
                return ParseResult::InProgress;
            }
        }
        self.fold_digits();

        let verb_pending = self.verb.is_some();
        let Some(binding) = table.lookup(key, mode, verb_pending) else {
            return if idle {
                ParseResult::KeyNotHandled
            } else {
                ParseResult::Invalid
            };
        };

        match binding {
            Binding::Register if !verb_pending => {
                self.stage = Stage::Register;
                ParseResult::InProgress
            }
            Binding::Operator(kind) if !verb_pending => {
                self.verb = Some(Verb::new(kind));
                self.verb_key = Some(key);
                self.verb_needs_motion(mode)
            }
            Binding::Verb(kind) if !verb_pending => self.complete_verb(Verb::new(kind), None, mode),
            Binding::Command { verb, motion } if !verb_pending => {
                self.complete_verb(Verb::new(verb), motion.map(Motion::new), mode)
            }
            Binding::VerbArg(arg) if !verb_pending => {
                self.stage = Stage::VerbArg(arg);
                ParseResult::ConsumeAdditionalKey
            }
            Binding::Motion(kind) => self.complete_motion(Motion::new(kind), mode),
            Binding::MotionArg(arg) => {
                self.stage = Stage::MotionArg(arg);
                ParseResult::ConsumeAdditionalKey
            }
            Binding::RepeatOperator if self.verb_key == Some(key) => {
                self.complete_motion(Motion::new(MotionKind::CurrentLine), mode)
            }
            _ => ParseResult::Invalid,
        }
    }

    /// Typed digits become the verb count before a verb, the motion count
    /// after one. Counts on either side of `"x` multiply.
    fn fold_digits(&mut self) {
        let Some(n) = self.digits.take() else {
            return;
        };
        let slot = if self.verb.is_some() {
            &mut self.motion_count
        } else {
            &mut self.count
        };
        *slot = Some(slot.map_or(n, |c| c.saturating_mul(n)));
    }

    /// An operator waits for its motion, except in Visual where the
    /// selection is the motion.
    fn verb_needs_motion(&mut self, mode: Mode) -> ParseResult {
        if mode.is_visual() {
            let verb = self.verb.take().unwrap_or_else(|| Verb::new(VerbKind::Move));
            return self.complete_verb(verb, None, mode);
        }
        self.stage = Stage::Motion;
        ParseResult::InProgress
    }

    fn verb_arg(&mut self, arg: VerbArg, key: char, mode: Mode) -> ParseResult {
        match arg {
            VerbArg::ReplaceChar => {
                let ch = if key::is_enter(key) { '\n' } else { key };
                if ch.is_control() && ch != '\n' && ch != key::TAB {
                    return ParseResult::Invalid;
                }
                self.complete_verb(Verb::new(VerbKind::ReplaceChar).with_arg(ch), None, mode)
            }
            VerbArg::SetMark => {
                if key.is_ascii_graphic() {
                    self.complete_verb(Verb::new(VerbKind::SetMark).with_arg(key), None, mode)
                } else {
                    ParseResult::Invalid
                }
            }
            VerbArg::Scroll => {
                let to = match key {
                    'z' | '.' => ScrollTo::Center,
                    't' => ScrollTo::Top,
                    'b' | '-' => ScrollTo::Bottom,
                    k if key::is_enter(k) => ScrollTo::Top,
                    _ => return ParseResult::Invalid,
                };
                self.complete_verb(Verb::new(VerbKind::Scroll(to)), None, mode)
            }
            VerbArg::G => match key {
                'g' => self.complete_motion(Motion::new(MotionKind::BufferStart), mode),
                'e' => self.complete_motion(Motion::new(MotionKind::WordEndBack(WordKind::Small)), mode),
                'E' => self.complete_motion(Motion::new(MotionKind::WordEndBack(WordKind::Big)), mode),
                'v' => self.complete_verb(Verb::new(VerbKind::Visual(VisualKind::Block)), None, mode),
                '~' => {
                    self.verb = Some(Verb::new(VerbKind::FlipCase));
                    self.verb_key = Some('~');
                    self.verb_needs_motion(mode)
                }
                _ => ParseResult::Invalid,
            },
        }
    }

    fn motion_arg(&mut self, arg: MotionArg, key: char, mode: Mode) -> ParseResult {
        let motion = match arg {
            MotionArg::Find(kind) => {
                if key.is_control() && key != key::TAB {
                    return ParseResult::Invalid;
                }
                Motion::new(MotionKind::Find(kind)).with_arg(key)
            }
            MotionArg::Mark { exact } => {
                if !key.is_ascii_graphic() {
                    return ParseResult::Invalid;
                }
                let kind = if exact {
                    MotionKind::MarkExact
                } else {
                    MotionKind::MarkLine
                };
                Motion::new(kind).with_arg(key)
            }
            MotionArg::TextObject { inner } => {
                if !text_object::is_object_key(key) {
                    return ParseResult::Invalid;
                }
                Motion::new(MotionKind::TextObject { inner }).with_arg(key)
            }
            MotionArg::G => match key {
                'g' => Motion::new(MotionKind::BufferStart),
                'e' => Motion::new(MotionKind::WordEndBack(WordKind::Small)),
                'E' => Motion::new(MotionKind::WordEndBack(WordKind::Big)),
                _ => return ParseResult::Invalid,
            },
        };
        self.complete_motion(motion, mode)
    }

    fn complete_motion(&mut self, mut motion: Motion, mode: Mode) -> ParseResult {
        self.fold_digits();
        motion.count = self.motion_count.take();
        let verb = self.verb.take().unwrap_or_else(|| Verb::new(VerbKind::Move));
        self.finish(verb, Some(motion), mode)
    }

    fn complete_verb(&mut self, verb: Verb, motion: Option<Motion>, mode: Mode) -> ParseResult {
        self.fold_digits();
        let motion = if mode.is_visual() {
            verb.kind
                .uses_selection()
                .then(|| Motion::new(MotionKind::VisualRange))
        } else {
            motion
        };
        self.finish(verb, motion, mode)
    }

    fn finish(&mut self, verb: Verb, motion: Option<Motion>, mode: Mode) -> ParseResult {
        let action = Action::new(self.count.take(), self.register.take(), verb, motion, mode);
        self.done = Some(action);
        ParseResult::Complete
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
