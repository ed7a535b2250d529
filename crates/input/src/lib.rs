//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] and keeps the
//! column cursor that turns a plain `Drop` into a concrete column. Nothing here
//! touches the session.

pub mod cursor;
pub mod map;

pub use tui_merge_types as types;

pub use cursor::{ColumnCursor, CursorCommand};
pub use map::{handle_key_event, should_quit};
