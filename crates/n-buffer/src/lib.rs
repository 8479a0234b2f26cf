//! # n-buffer — the text side of n-vim
//!
//! Everything the modal editing core reads and mutates but does not own:
//!
//! - **[`position`]** — `Point` (line, col) and directional `Range`
//! - **[`buffer`]** — `Buffer`, a rope with rune-indexed edits, marks and
//!   the vertical-motion column
//! - **[`history`]** — undo/redo transactions with chained changes
//! - **[`view`]** — cursor, scroll offset, viewport and display columns
//! - **[`config`]** — tab width, indent style, scroll-off and `:set`

pub mod buffer;
pub mod config;
pub mod error;
pub mod history;
pub mod marks;
pub mod position;
pub mod view;

pub use buffer::Buffer;
pub use config::Config;
pub use error::{BufferError, OptionError};
pub use history::{Change, Edit, History};
pub use marks::Marks;
pub use position::{Point, Range};
pub use view::{Rect, View};
