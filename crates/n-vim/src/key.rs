//! Key runes with special meaning.
//!
//! Keys arrive as plain `char`s. Control chords are their ASCII control
//! codes (`Ctrl-V` is `'\u{16}'`), so a host maps its own key events down to
//! these before calling `handle_key`.

/// Leaves Insert, Visual and the search prompt.
pub const ESC: char = '\u{1b}';
/// What terminals send for Return.
pub const ENTER: char = '\r';
pub const NEWLINE: char = '\n';
pub const TAB: char = '\t';
/// DEL, the usual Backspace byte. `CTRL_H` is the other one.
pub const BACKSPACE: char = '\u{7f}';
pub const CTRL_H: char = '\u{8}';

pub const CTRL_A: char = '\u{1}';
pub const CTRL_B: char = '\u{2}';
pub const CTRL_D: char = '\u{4}';
pub const CTRL_F: char = '\u{6}';
pub const CTRL_R: char = '\u{12}';
pub const CTRL_U: char = '\u{15}';
pub const CTRL_V: char = '\u{16}';
pub const CTRL_X: char = '\u{18}';

/// `Ctrl-<letter>` for a lowercase ASCII letter.
#[must_use]
pub const fn ctrl(letter: char) -> char {
    ((letter as u8) & 0x1f) as char
}

/// Return, as `\r` or `\n`.
#[inline]
#[must_use]
pub const fn is_enter(key: char) -> bool {
    matches!(key, ENTER | NEWLINE)
}

/// Backspace, as DEL or `Ctrl-H`.
#[inline]
#[must_use]
pub const fn is_backspace(key: char) -> bool {
    matches!(key, BACKSPACE | CTRL_H)
}
