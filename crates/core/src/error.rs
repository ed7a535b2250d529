//! Error types for the simulation engine and its configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{BlockValue, CellPos};

/// Errors produced by the simulation engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Column index outside `0..columns`. Rejected before any mutation.
    #[error("column {column} is outside 0..{columns}")]
    InvalidColumn { column: usize, columns: u8 },

    /// The column has no empty row left.
    #[error("column {column} is full")]
    ColumnFull { column: u8 },

    /// The spawn pool has no eligible values.
    #[error("spawn pool is empty")]
    EmptyPool,

    /// A value with no catalog entry was about to be placed. For merge
    /// results this includes products that overflow a `u32`.
    #[error("block value {value} has no catalog entry")]
    UnknownBlockValue { value: u64 },

    /// An equal block sat directly above a freshly settled cell.
    #[error("block {value} at {at} has an equal block directly above it")]
    AnomalousMergeAbove { at: CellPos, value: BlockValue },

    /// Grid dimensions must be at least 1x1.
    #[error("grid must be at least 1x1 (got {columns}x{rows})")]
    InvalidDimensions { columns: usize, rows: usize },
}

impl EngineError {
    /// Whether the error aborted a cascade (as opposed to rejecting input).
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::UnknownBlockValue { .. })
    }

    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidColumn { .. } => "invalid_column",
            EngineError::ColumnFull { .. } => "column_full",
            EngineError::EmptyPool => "empty_pool",
            EngineError::UnknownBlockValue { .. } => "unknown_block_value",
            EngineError::AnomalousMergeAbove { .. } => "anomalous_merge_above",
            EngineError::InvalidDimensions { .. } => "invalid_dimensions",
        }
    }
}

/// Errors produced while loading a [`GameConfig`](crate::config::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
