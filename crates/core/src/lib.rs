//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds every rule of the merge game and no I/O. The same seed
//! and the same sequence of column choices always produce the same game.
//!
//! # Module Structure
//!
//! - [`grid`]: fixed-size column grid, row 0 at the bottom
//! - [`drop`]: landing cell resolution for a dropped block
//! - [`merge`]: the merge law and its fixpoint loop at one cell
//! - [`gravity`]: relocation of blocks left floating by merges
//! - [`pool`]: the set of values new blocks are drawn from
//! - [`milestone`]: pool changes unlocked by reaching a value
//! - [`scoring`]: score and highest-value tracking
//! - [`catalog`]: which block values exist and how they look
//! - [`session`]: one game, driving the full spawn cascade with rollback
//! - [`config`]: JSON game configuration
//! - [`snapshot`]: read-only state for renderers and observers
//!
//! # Game Rules
//!
//! | Rule | Behavior |
//! |------|----------|
//! | Drop | A block lands on the lowest empty row of its column |
//! | Merge | `k` equal neighbors below/left/right fold into `value * 2^k` |
//! | Above | An equal block directly above is reported, never merged |
//! | Gravity | Floating blocks fall one at a time and are re-checked |
//! | Score | Each merge adds its resulting value |
//! | Milestones | Raising the highest value may add or retire pool values |
//! | End | There is no game over; a full grid just rejects spawns |
//!
//! # Example
//!
//! ```
//! use tui_merge_core::Session;
//! use tui_merge_types::BlockValue;
//!
//! let mut session = Session::initialize(4, 7, &[BlockValue::new(2)]).unwrap();
//! session.spawn(0).unwrap();
//! let plan = session.spawn(0).unwrap();
//!
//! assert_eq!(plan.points(), 4);
//! assert_eq!(session.highest_value(), BlockValue::new(4));
//! ```

pub mod catalog;
pub mod config;
pub mod drop;
pub mod error;
pub mod gravity;
pub mod grid;
pub mod merge;
pub mod milestone;
pub mod pool;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use tui_merge_types as types;

pub use catalog::{BlockCatalog, BlockDefinition, StaticCatalog};
pub use config::GameConfig;
pub use drop::DropPath;
pub use error::{ConfigError, EngineError};
pub use grid::Grid;
pub use milestone::{AppliedMilestone, Milestone};
pub use pool::SpawnPool;
pub use rng::SimpleRng;
pub use session::{CascadeStats, PlacementPlan, Session, SessionSummary};
pub use snapshot::{BlockSnapshot, GameSnapshot};
