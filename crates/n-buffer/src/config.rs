//! Editing options and the `:set` syntax that changes them.
//!
//! The editing core reads a [`Config`] on every key and never writes it.
//! Hosts build one with [`Config::default`] and adjust it through
//! [`parse_set`] + [`Config::apply`].
//!
//! | Full name    | Abbrev | Type    | Default |
//! |--------------|--------|---------|---------|
//! | `tabstop`    | `ts`   | integer | 4       |
//! | `expandtab`  | `et`   | bool    | true    |
//! | `scrolloff`  | `so`   | integer | 0       |
//! | `wrapscan`   | `ws`   | bool    | true    |
//! | `ignorecase` | `ic`   | bool    | false   |
//!
//! | Syntax           | Effect                |
//! |------------------|-----------------------|
//! | `:set option`    | Enable boolean        |
//! | `:set nooption`  | Disable boolean       |
//! | `:set option!`   | Toggle boolean        |
//! | `:set option?`   | Query current value   |
//! | `:set option=N`  | Assign numeric value  |

use crate::error::OptionError;

/// Options consumed by the editing core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Display width of a tab, and the width of one indent level.
    pub tab_width: usize,
    /// Indent with spaces instead of a tab character.
    pub insert_spaces: bool,
    /// Lines kept visible above and below the cursor.
    pub scroll_off: usize,
    /// Searches wrap around the buffer ends.
    pub wrapscan: bool,
    pub ignorecase: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_width: 4,
            insert_spaces: true,
            scroll_off: 0,
            wrapscan: true,
            ignorecase: false,
        }
    }
}

/// A parsed `:set` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    On(String),
    Off(String),
    Toggle(String),
    Query(String),
    Assign(String, String),
}

/// A boolean option, set with `name` or `noname`.
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    matches!(
        name,
        "expandtab" | "et" | "wrapscan" | "ws" | "ignorecase" | "ic"
    )
}

/// An option that takes `name=N`.
#[must_use]
pub fn is_numeric_option(name: &str) -> bool {
    matches!(name, "tabstop" | "ts" | "scrolloff" | "so")
}

/// Split `:set` arguments on whitespace and parse each one.
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    args.split_whitespace().map(parse_set_arg).collect()
}

/// Parse one `:set` argument.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }
    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_string());
    }
    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }
    // `no` only negates a known boolean; otherwise it is part of the name.
    if let Some(name) = arg.strip_prefix("no") {
        if is_bool_option(name) {
            return SetDirective::Off(name.to_string());
        }
    }
    if is_numeric_option(arg) {
        return SetDirective::Query(arg.to_string());
    }
    SetDirective::On(arg.to_string())
}

impl Config {
    /// Apply a directive. Queries return the formatted value.
    ///
    /// # Errors
    ///
    /// Unknown names, booleans given numbers and numbers given garbage are
    /// rejected without changing anything.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, OptionError> {
        match directive {
            SetDirective::On(name) => self.set_bool(name, |_| true).map(|()| None),
            SetDirective::Off(name) => self.set_bool(name, |_| false).map(|()| None),
            SetDirective::Toggle(name) => self.set_bool(name, |v| !v).map(|()| None),
            SetDirective::Query(name) => self.query(name).map(Some),
            SetDirective::Assign(name, value) => {
                let parsed = value.parse::<usize>().map_err(|_| OptionError::InvalidValue {
                    name: name.clone(),
                    value: value.clone(),
                })?;
                match name.as_str() {
                    "tabstop" | "ts" if parsed > 0 => self.tab_width = parsed,
                    "scrolloff" | "so" => self.scroll_off = parsed,
                    "tabstop" | "ts" => {
                        return Err(OptionError::InvalidValue {
                            name: name.clone(),
                            value: value.clone(),
                        });
                    }
                    _ if is_bool_option(name) => {
                        return Err(OptionError::InvalidValue {
                            name: name.clone(),
                            value: value.clone(),
                        });
                    }
                    _ => return Err(OptionError::Unknown(name.clone())),
                }
                Ok(None)
            }
        }
    }

    fn flag(&mut self, name: &str) -> Result<&mut bool, OptionError> {
        match name {
            "expandtab" | "et" => Ok(&mut self.insert_spaces),
            "wrapscan" | "ws" => Ok(&mut self.wrapscan),
            "ignorecase" | "ic" => Ok(&mut self.ignorecase),
            _ if is_numeric_option(name) => Err(OptionError::NotBoolean(name.to_string())),
            _ => Err(OptionError::Unknown(name.to_string())),
        }
    }

    fn set_bool(&mut self, name: &str, f: impl FnOnce(bool) -> bool) -> Result<(), OptionError> {
        let flag = self.flag(name)?;
        *flag = f(*flag);
        Ok(())
    }

    fn query(&mut self, name: &str) -> Result<String, OptionError> {
        match name {
            "tabstop" | "ts" => Ok(format!("tabstop={}", self.tab_width)),
            "scrolloff" | "so" => Ok(format!("scrolloff={}", self.scroll_off)),
            _ => {
                let value = *self.flag(name)?;
                Ok(format_bool(name, value))
            }
        }
    }
}

/// `name` when set, `noname` when not.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
