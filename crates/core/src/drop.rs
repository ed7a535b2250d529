//! Drop resolution - where a block entering a column comes to rest
//!
//! Resolution is instant: the grid is written once, at the landing cell. The
//! rows in between are only reported so a renderer can animate the fall.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::grid::Grid;
use crate::types::CellPos;

/// The vertical path of a falling block, from its entry row down to its
/// landing row (both inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DropPath {
    pub column: u8,
    pub from_row: u8,
    pub to_row: u8,
}

impl DropPath {
    pub fn landing(&self) -> CellPos {
        CellPos::new(self.column, self.to_row)
    }

    /// Rows the block passes through, top to bottom, ending at the landing
    /// cell. Can be iterated any number of times.
    pub fn cells(&self) -> impl Iterator<Item = CellPos> + Clone {
        let column = self.column;
        (self.to_row..=self.from_row)
            .rev()
            .map(move |row| CellPos::new(column, row))
    }

    /// Number of rows fallen (0 if the block landed where it started).
    pub fn distance(&self) -> u8 {
        self.from_row - self.to_row
    }
}

/// Landing cell for a block entering `column` at the top row.
///
/// Fails with `InvalidColumn` outside the grid and `ColumnFull` when the top
/// row is taken. The grid is not modified.
pub fn resolve_landing(grid: &Grid, column: usize) -> Result<DropPath, EngineError> {
    let column = checked_column(grid, column)?;
    let entry = CellPos::new(column, grid.top_row());
    if grid.is_occupied(entry) {
        return Err(EngineError::ColumnFull { column });
    }
    Ok(descend(grid, entry))
}

/// Slide down from `start` while the cell below is empty.
///
/// `start` itself is assumed empty (a re-dropped block is lifted out of the
/// grid before calling this), so the block never skips an empty row and
/// never passes through an occupied one.
pub fn descend(grid: &Grid, start: CellPos) -> DropPath {
    let mut row = start.row;
    while row > 0 && grid.is_empty_at(CellPos::new(start.column, row - 1)) {
        row -= 1;
    }
    DropPath {
        column: start.column,
        from_row: start.row,
        to_row: row,
    }
}

pub(crate) fn checked_column(grid: &Grid, column: usize) -> Result<u8, EngineError> {
    if column >= grid.columns() as usize {
        return Err(EngineError::InvalidColumn {
            column,
            columns: grid.columns(),
        });
    }
    Ok(column as u8)
}
