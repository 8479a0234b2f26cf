use thiserror::Error;

use crate::position::Point;

/// Errors raised by buffer edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("point {0:?} is outside the buffer")]
    OutOfBounds(Point),

    #[error("cannot remove {len} chars at {at:?}")]
    RemoveTooLong { at: Point, len: usize },
}

/// Errors raised while applying a `:set` directive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unknown option: {0}")]
    Unknown(String),

    #[error("invalid argument: {name}={value}")]
    InvalidValue { name: String, value: String },

    #[error("{0} is not a boolean option")]
    NotBoolean(String),
}
