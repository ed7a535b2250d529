//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data with no game logic, making them usable in any
//! context (core simulation, terminal rendering, headless replay).
//!
//! # Grid Coordinates
//!
//! The grid is addressed as `(column, row)`:
//!
//! - **column**: `0..columns`, left to right
//! - **row**: `0..rows`, **bottom to top** (row 0 is the floor)
//! - New blocks enter at the top row of the chosen column and fall down
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds and only affect presentation; the
//! simulation itself resolves every drop instantly.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed frame interval (~60 FPS) |
//! | `DROP_STEP_MS` | 100 | Time a falling block spends on each row |
//! | `MERGE_FLASH_MS` | 120 | Highlight duration for merged cells |
//!
//! # Examples
//!
//! ```
//! use tui_merge_types::{BlockValue, CellPos, GameAction, GRID_ROWS};
//!
//! let two = BlockValue::new(2);
//! assert_eq!(two.doubled(), Some(BlockValue::new(4)));
//!
//! let pos = CellPos::new(1, 0);
//! assert_eq!(pos.below(), None);
//! assert_eq!(pos.above(), Some(CellPos::new(1, 1)));
//!
//! assert_eq!(GameAction::from_str("drop"), Some(GameAction::Drop));
//! assert_eq!(GRID_ROWS, 7);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default number of rows in a grid.
pub const GRID_ROWS: u8 = 7;

/// Default number of columns in a grid.
pub const DEFAULT_COLUMNS: u8 = 4;

/// Fixed frame interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Time a falling block is shown on each row it passes through.
pub const DROP_STEP_MS: u32 = 100;

/// Flash duration for cells that took part in a merge.
pub const MERGE_FLASH_MS: u32 = 120;


/// The "power level" of a block.
///
/// Equality is plain value equality. Whether a value may appear on the grid is
/// decided by the block catalog, not by this type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockValue(u32);

impl BlockValue {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Double the value, or `None` on overflow.
    pub fn doubled(self) -> Option<Self> {
        self.scaled_by_pow2(1)
    }

    /// Multiply by `2^exp`, or `None` if the result does not fit.
    pub fn scaled_by_pow2(self, exp: u32) -> Option<Self> {
        let factor = 1u32.checked_shl(exp)?;
        self.0.checked_mul(factor).map(Self)
    }
}

impl From<u32> for BlockValue {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for BlockValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cell on the grid
///
/// - `None`: Empty cell
/// - `Some(BlockValue)`: Cell holding a block of that value
pub type Cell = Option<BlockValue>;

/// A grid coordinate, row 0 at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub column: u8,
    pub row: u8,
}

impl CellPos {
    pub const fn new(column: u8, row: u8) -> Self {
        Self { column, row }
    }

    /// Cell directly above. Callers check the upper bound against the grid.
    pub fn above(self) -> Option<Self> {
        self.row.checked_add(1).map(|row| Self { row, ..self })
    }

    /// Cell directly below, `None` on the floor.
    pub fn below(self) -> Option<Self> {
        self.row.checked_sub(1).map(|row| Self { row, ..self })
    }

    pub fn left(self) -> Option<Self> {
        self.column
            .checked_sub(1)
            .map(|column| Self { column, ..self })
    }

    pub fn right(self) -> Option<Self> {
        self.column
            .checked_add(1)
            .map(|column| Self { column, ..self })
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Player actions understood by the frontends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move the column cursor one column left
    MoveLeft,
    /// Move the column cursor one column right
    MoveRight,
    /// Drop the next block into the column under the cursor
    Drop,
    /// Drop the next block straight into the given column
    DropAt(u8),
    /// Start a fresh session
    Restart,
}

impl GameAction {
    /// Parse action from string
    ///
    /// Accepts `moveLeft`, `moveRight`, `drop`, `restart` (case-insensitive)
    /// and `drop:<column>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_merge_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("drop:2"), Some(GameAction::DropAt(2)));
    /// assert_eq!(GameAction::from_str("drop:x"), None);
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        if let Some(column) = lower.strip_prefix("drop:") {
            return column.parse().ok().map(GameAction::DropAt);
        }
        match lower.as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "drop" => Some(GameAction::Drop),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }
}

/// Something that happened to the grid or the session during one spawn.
///
/// Events are emitted in causal order and are all a renderer needs to replay
/// a cascade: placements, value changes, removals, relocations, score deltas
/// and pool changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GridEvent {
    /// A spawned block came to rest.
    Placed { at: CellPos, value: BlockValue },
    /// The block at `at` absorbed `matches` neighbors and changed value.
    Merged {
        at: CellPos,
        from: BlockValue,
        to: BlockValue,
        matches: u8,
    },
    /// A neighbor consumed by a merge was cleared.
    Removed { at: CellPos, value: BlockValue },
    /// Gravity moved a floating block down its column.
    Fell {
        column: u8,
        from_row: u8,
        to_row: u8,
        value: BlockValue,
    },
    /// Points were added to the score.
    Scored { points: u64, total: u64 },
    /// A new highest block value was produced.
    HighestRaised { value: BlockValue },
    /// A milestone fired and changed the spawn pool.
    MilestoneApplied {
        index: usize,
        target: BlockValue,
        added: Vec<BlockValue>,
        removed: Vec<BlockValue>,
    },
    /// An equal block sat directly above a freshly settled cell. It was left
    /// alone; this only happens if gravity was violated beforehand.
    AnomalousMergeAbove { at: CellPos, value: BlockValue },
}
