//! TUI Merge (workspace facade crate).
//!
//! Re-exports the workspace crates under short paths
//! (`tui_merge::{core, engine, input, term, types}`) and holds the pieces the
//! two binaries share: argument parsing, logging setup and headless replay.

pub mod cli;
pub mod logging;
pub mod sim;

pub use tui_merge_core as core;
pub use tui_merge_engine as engine;
pub use tui_merge_input as input;
pub use tui_merge_term as term;
pub use tui_merge_types as types;
