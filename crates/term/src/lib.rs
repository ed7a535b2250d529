//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. Views draw into a
//! plain framebuffer which the renderer diffs and flushes to the terminal.
//!
//! - [`fb`]: framebuffer and styles
//! - [`game_view`]: snapshot to framebuffer, pure and unit-tested
//! - [`renderer`]: framebuffer to terminal escape sequences

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_merge_core as core;
pub use tui_merge_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Overlay, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
