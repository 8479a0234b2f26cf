//! # n-vim — modal editing core for n-vim
//!
//! Turns keys into edits on an [`n_buffer::Buffer`]. A host owns the
//! buffer, the view and the config and passes them to
//! [`VimState::handle_key`] one key at a time.
//!
//! - **[`keybind`]** — which parse handler a key starts, per mode
//! - **[`parser`]** — the `[count]["reg]verb[count]motion` state machine
//! - **[`action`]** — the parsed command: verb, motion, counts and flags
//! - **[`motion`]** — the motion catalog, pure range computations
//! - **[`verb`]** — the verb catalog: operators, paste, insert, undo
//! - **[`apply`]** — runs an action and implements `.`
//! - **[`mode`]** — the mode state machine
//! - **[`register`]** — named registers
//! - **[`insert`]** — the insert log and Insert/Replace key handling
//! - **[`find`]**, **[`search`]**, **[`word`]**, **[`text_object`]** —
//!   the scanners motions are built on

pub mod action;
pub mod apply;
pub mod error;
pub mod find;
pub mod insert;
pub mod key;
pub mod keybind;
pub mod mode;
pub mod motion;
pub mod parser;
pub mod register;
pub mod search;
pub mod text_object;
pub mod verb;
pub mod vim;
pub mod word;

pub use action::{Action, ActionFlags, InsertKind, Motion, MotionKind, ScrollTo, Verb, VerbKind};
pub use apply::Replay;
pub use error::ApplyError;
pub use find::{FindCharState, FindKind};
pub use insert::InsertLog;
pub use keybind::{Binding, KeyBind, KeyBindTable, When};
pub use mode::{Mode, ModeSet, Transition, VisualKind};
pub use parser::{ActionParser, ParseResult};
pub use register::{RegisterStore, Yank, YankType};
pub use search::{SearchDirection, SearchPrompt, SearchState};
pub use vim::VimState;
pub use word::WordKind;
