use n_buffer::BufferError;
use thiserror::Error;

/// Why an action was dropped or a verb gave up.
///
/// Motion errors are raised before anything is touched. Verb errors leave
/// the buffer as it was, apart from edits already chained into the current
/// undo group.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("motion failed")]
    MotionFailed,

    #[error("mark not set: {0}")]
    UnsetMark(char),

    #[error("invalid mark: {0:?}")]
    InvalidMark(char),

    #[error("pattern not found: {0}")]
    PatternNotFound(String),

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("no previous search pattern")]
    NoPreviousPattern,

    #[error("nothing in register {0}")]
    EmptyRegister(char),

    #[error("invalid register: {0:?}")]
    InvalidRegister(char),

    #[error("empty range")]
    EmptyRange,

    #[error("no previous command to repeat")]
    NothingToRepeat,

    #[error("cannot repeat a repeat")]
    NestedRepeat,

    #[error("already at oldest change")]
    NothingToUndo,

    #[error("already at newest change")]
    NothingToRedo,

    #[error("no number under or after the cursor")]
    NoNumber,

    #[error("resulting text too long")]
    TextTooLong,

    #[error(transparent)]
    Buffer(#[from] BufferError),
}
