//! Grid module - the column x row occupancy table
//!
//! Each cell is empty or holds one block value. Uses a flat vector in
//! row-major order for cache locality; dimensions are fixed at creation.
//! Coordinates: (column, row) where row 0 is the floor and `rows - 1` the
//! top, where new blocks enter.

use std::fmt;

use arrayvec::ArrayVec;

use crate::types::{BlockValue, Cell, CellPos};

/// Orthogonal neighbor directions, in the order merges scan them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// The game grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    columns: u8,
    rows: u8,
    /// Flat array of cells, row-major order (row * columns + column)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new empty grid. Zero dimensions are raised to 1.
    pub fn new(columns: u8, rows: u8) -> Self {
        let (columns, rows) = (columns.max(1), rows.max(1));
        Self {
            columns,
            rows,
            cells: vec![None; columns as usize * rows as usize],
        }
    }

    /// Build a grid with blocks at the given `(column, row, value)` positions.
    ///
    /// Out-of-bounds entries are ignored. No gravity is applied, which makes
    /// this handy for setting up specific situations in tests and benches.
    pub fn with_blocks(columns: u8, rows: u8, blocks: &[(u8, u8, u32)]) -> Self {
        let mut grid = Self::new(columns, rows);
        for &(column, row, value) in blocks {
            grid.set(CellPos::new(column, row), Some(BlockValue::new(value)));
        }
        grid
    }

    #[inline(always)]
    fn index(&self, pos: CellPos) -> Option<usize> {
        if pos.column >= self.columns || pos.row >= self.rows {
            return None;
        }
        Some(pos.row as usize * self.columns as usize + pos.column as usize)
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Index of the row new blocks enter at.
    pub fn top_row(&self) -> u8 {
        self.rows.saturating_sub(1)
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        self.index(pos).is_some()
    }

    /// Get cell at `pos`. Returns None if out of bounds.
    pub fn get(&self, pos: CellPos) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Value at `pos`, `None` if empty or out of bounds.
    pub fn value_at(&self, pos: CellPos) -> Option<BlockValue> {
        self.get(pos).flatten()
    }

    /// Set cell at `pos`. Returns false if out of bounds.
    pub fn set(&mut self, pos: CellPos, cell: Cell) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Clear the cell at `pos`, returning what it held.
    pub fn take(&mut self, pos: CellPos) -> Cell {
        self.index(pos).and_then(|idx| self.cells[idx].take())
    }

    /// In bounds and empty.
    pub fn is_empty_at(&self, pos: CellPos) -> bool {
        matches!(self.get(pos), Some(None))
    }

    /// In bounds and filled.
    pub fn is_occupied(&self, pos: CellPos) -> bool {
        matches!(self.get(pos), Some(Some(_)))
    }

    /// A column is full once its top row is occupied.
    pub fn is_column_full(&self, column: u8) -> bool {
        self.is_occupied(CellPos::new(column, self.top_row()))
    }

    /// No column can take another block.
    pub fn is_full(&self) -> bool {
        (0..self.columns).all(|column| self.is_column_full(column))
    }

    /// Number of occupied cells in `column`.
    pub fn column_height(&self, column: u8) -> u8 {
        (0..self.rows)
            .filter(|&row| self.is_occupied(CellPos::new(column, row)))
            .count() as u8
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// The in-bounds orthogonal neighbors of `pos`.
    pub fn neighbors(&self, pos: CellPos) -> ArrayVec<(Direction, CellPos), 4> {
        let mut out = ArrayVec::new();
        for dir in Direction::ALL {
            let next = match dir {
                Direction::Up => pos.above(),
                Direction::Down => pos.below(),
                Direction::Left => pos.left(),
                Direction::Right => pos.right(),
            };
            if let Some(next) = next.filter(|&p| self.contains(p)) {
                out.push((dir, next));
            }
        }
        out
    }

    /// Occupied with an empty cell directly below.
    pub fn is_floating(&self, pos: CellPos) -> bool {
        self.is_occupied(pos) && pos.below().is_some_and(|below| self.is_empty_at(below))
    }

    /// No floating cells anywhere.
    pub fn is_settled(&self) -> bool {
        self.positions().all(|pos| !self.is_floating(pos))
    }

    /// Every position, column by column, bottom to top.
    pub fn positions(&self) -> impl Iterator<Item = CellPos> {
        let rows = self.rows;
        (0..self.columns).flat_map(move |column| (0..rows).map(move |row| CellPos::new(column, row)))
    }

    /// Get a reference to the internal cells (row-major, row 0 first)
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }
}

/// Top row first, `.` for empty cells, values right-aligned.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .cells
            .iter()
            .flatten()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(1);
        for row in (0..self.rows).rev() {
            for column in 0..self.columns {
                if column > 0 {
                    f.write_str(" ")?;
                }
                match self.value_at(CellPos::new(column, row)) {
                    Some(v) => write!(f, "{:>width$}", v.get(), width = width)?,
                    None => write!(f, "{:>width$}", ".", width = width)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
