//! The per-window editing state and its single entry point.
//!
//! [`VimState::handle_key`] routes each key by what is open:
//!
//! - a `/` or `?` prompt takes every key until Enter or Esc
//! - Insert and Replace mode send keys to the insert handler
//! - Normal and Visual feed the parser, and a complete action is applied
//!
//! Everything that outlives one key lives here: the mode, the pending
//! command, registers, the last find and search, the insert log and the
//! action `.` repeats.

use n_buffer::{Buffer, Config, Point, View};
use tracing::debug;

use crate::action::{Action, Verb, VerbKind};
use crate::apply::Editor;
use crate::error::ApplyError;
use crate::find::FindCharState;
use crate::insert::InsertLog;
use crate::key;
use crate::keybind::{KeyBind, KeyBindTable};
use crate::mode::Mode;
use crate::parser::{ActionParser, ParseResult};
use crate::register::RegisterStore;
use crate::search::{SearchPrompt, SearchState};
use crate::verb::BlockInsert;

/// Modal state for one window. Keys go in through [`handle_key`](Self::handle_key).
#[derive(Debug, Clone)]
pub struct VimState {
    pub(crate) mode: Mode,
    pub(crate) table: KeyBindTable,
    pub(crate) parser: ActionParser,
    /// The next edit joins the open undo group.
    pub(crate) chain_undo: bool,
    pub(crate) last_action: Option<Action>,
    pub(crate) insert_log: InsertLog,
    /// Extra runs of the insert session on Esc (`3ix<Esc>`).
    pub(crate) insert_repeat: usize,
    /// Each extra run starts on a new line (`3o`).
    pub(crate) insert_opens_line: bool,
    /// The cursor line holds only indent the session inserted itself; Esc
    /// or Enter there removes it again.
    pub(crate) auto_indent: bool,
    pub(crate) block_insert: Option<BlockInsert>,
    pub(crate) registers: RegisterStore,
    /// The fixed end of a visual selection.
    pub(crate) anchor: Point,
    pub(crate) find: FindCharState,
    pub(crate) search: SearchState,
    pub(crate) prompt: Option<SearchPrompt>,
    pub(crate) last_error: Option<ApplyError>,
}

impl Default for VimState {
    fn default() -> Self {
        Self::new()
    }
}

impl VimState {
    /// Normal mode, the stock key table and empty registers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            table: KeyBindTable::with_defaults(),
            parser: ActionParser::new(),
            chain_undo: false,
            last_action: None,
            insert_log: InsertLog::new(),
            insert_repeat: 0,
            insert_opens_line: false,
            auto_indent: false,
            block_insert: None,
            registers: RegisterStore::new(),
            anchor: Point::ZERO,
            find: FindCharState::new(),
            search: SearchState::new(),
            prompt: None,
            last_error: None,
        }
    }

    /// Consume one key.
    ///
    /// A failed action still reports [`ParseResult::Complete`]; the error is
    /// kept in [`last_error`](Self::last_error) until the next action.
    pub fn handle_key(
        &mut self,
        view: &mut View,
        buffer: &mut Buffer,
        key: char,
        config: &Config,
    ) -> ParseResult {
        let result = Editor {
            vim: self,
            buf: &mut *buffer,
            view: &mut *view,
            config,
        }
        .handle_key(key);
        view.follow_cursor(buffer, config.scroll_off, config.tab_width);
        result
    }

    /// Install a binding ahead of the existing ones.
    pub fn bind_key(&mut self, key: char, bind: KeyBind) {
        self.table.bind(key, bind);
    }

    /// The current mode, for the host's status line and cursor shape.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Register contents, for `:registers` style listings.
    #[inline]
    #[must_use]
    pub const fn registers(&self) -> &RegisterStore {
        &self.registers
    }

    /// Why the last action failed, if it did.
    #[must_use]
    pub const fn last_error(&self) -> Option<&ApplyError> {
        self.last_error.as_ref()
    }

    /// Keys of the current (or last) insert session.
    #[must_use]
    pub const fn insert_log(&self) -> &InsertLog {
        &self.insert_log
    }

    /// Keys of the command being typed, for a status line.
    #[must_use]
    pub fn pending_keys(&self) -> &str {
        self.parser.pending_keys()
    }

    /// The fixed end of the visual selection. Only meaningful in Visual.
    #[must_use]
    pub const fn anchor(&self) -> Point {
        self.anchor
    }

    /// The open search prompt.
    #[must_use]
    pub const fn prompt(&self) -> Option<&SearchPrompt> {
        self.prompt.as_ref()
    }

    /// The action `.` repeats.
    #[must_use]
    pub const fn last_action(&self) -> Option<&Action> {
        self.last_action.as_ref()
    }
}

// ── Key routing ──────────────────────────────────────────────────────────

impl Editor<'_> {
    fn handle_key(&mut self, key: char) -> ParseResult {
        if self.vim.prompt.is_some() {
            return self.prompt_key(key);
        }
        if self.vim.mode.is_input() {
            return self.input_key(key, true);
        }

        let result = self.vim.parser.feed(key, self.vim.mode, &self.vim.table);
        if result != ParseResult::Complete {
            return result;
        }
        let Some(action) = self.vim.parser.take() else {
            return result;
        };
        let outcome = self.apply(&action, None);
        self.record(outcome)
    }

    fn prompt_key(&mut self, key: char) -> ParseResult {
        match key {
            key::ESC => {
                self.vim.prompt = None;
                ParseResult::Complete
            }
            k if key::is_enter(k) => {
                let Some(prompt) = self.vim.prompt.take() else {
                    return ParseResult::KeyNotHandled;
                };
                let dir = prompt.direction();
                let verb = Verb::new(VerbKind::Search(dir)).with_payload(prompt.into_input());
                let action = Action::new(None, None, verb, None, self.vim.mode);
                let outcome = self.apply(&action, None);
                self.record(outcome)
            }
            k if key::is_backspace(k) => {
                if !self.vim.prompt.as_mut().is_some_and(SearchPrompt::backspace) {
                    self.vim.prompt = None;
                }
                ParseResult::InProgress
            }
            k if k.is_control() => ParseResult::KeyNotHandled,
            k => {
                if let Some(prompt) = self.vim.prompt.as_mut() {
                    prompt.push(k);
                }
                ParseResult::InProgress
            }
        }
    }

    fn record(&mut self, outcome: Result<(), ApplyError>) -> ParseResult {
        match outcome {
            Ok(()) => self.vim.last_error = None,
            Err(e) => {
                debug!(target: "vim.apply", error = %e, "action failed");
                self.vim.last_error = Some(e);
            }
        }
        ParseResult::Complete
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
