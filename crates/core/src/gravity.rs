//! Gravity resolution - re-dropping blocks left floating by merges
//!
//! Floating cells are found left to right, bottom to top, and relocated one
//! at a time. Relocating the lowest floating cell of a column first means the
//! blocks above it follow on later passes without ever skipping a gap.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::drop::descend;
use crate::grid::Grid;
use crate::types::{BlockValue, CellPos};

/// A block moved down its column by gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relocation {
    pub column: u8,
    pub from_row: u8,
    pub to_row: u8,
    pub value: BlockValue,
}

impl Relocation {
    pub fn landing(&self) -> CellPos {
        CellPos::new(self.column, self.to_row)
    }
}

/// First floating cell in scan order, if any.
pub fn find_floating(grid: &Grid) -> Option<CellPos> {
    grid.positions().find(|&pos| grid.is_floating(pos))
}

/// Relocate the first floating cell, if any, to its landing row.
pub fn settle_one(grid: &mut Grid) -> Option<Relocation> {
    let start = find_floating(grid)?;
    let value = grid.take(start)?;
    let path = descend(grid, start);
    grid.set(path.landing(), Some(value));
    debug!(column = start.column, from = start.row, to = path.to_row, %value, "relocate");
    Some(Relocation {
        column: start.column,
        from_row: start.row,
        to_row: path.to_row,
        value,
    })
}

/// Relocate floating cells until none remain, without merging.
pub fn settle(grid: &mut Grid) -> Vec<Relocation> {
    std::iter::from_fn(|| settle_one(grid)).collect()
}

/// Like [`settle`], restricted to one column.
pub fn settle_column(grid: &mut Grid, column: u8) -> Vec<Relocation> {
    let mut moved = Vec::new();
    let mut write_row = 0u8;
    for row in 0..grid.rows() {
        let pos = CellPos::new(column, row);
        let Some(value) = grid.value_at(pos) else {
            continue;
        };
        if row != write_row {
            grid.take(pos);
            grid.set(CellPos::new(column, write_row), Some(value));
            moved.push(Relocation {
                column,
                from_row: row,
                to_row: write_row,
                value,
            });
        }
        write_row += 1;
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settled_grid_has_nothing_to_do() {
        let mut grid = Grid::with_blocks(3, 7, &[(0, 0, 2), (0, 1, 4), (2, 0, 8)]);
        assert_eq!(find_floating(&grid), None);
        assert!(settle(&mut grid).is_empty());
    }

    #[test]
    fn block_over_a_gap_falls_to_the_floor() {
        let mut grid = Grid::with_blocks(2, 7, &[(1, 3, 16)]);
        let moved = settle(&mut grid);
        assert_eq!(
            moved,
            vec![Relocation {
                column: 1,
                from_row: 3,
                to_row: 0,
                value: BlockValue::new(16)
            }]
        );
        assert!(grid.is_settled());
    }

    #[test]
    fn stack_over_a_gap_falls_bottom_first() {
        let mut grid = Grid::with_blocks(1, 7, &[(0, 0, 2), (0, 2, 4), (0, 3, 8), (0, 5, 16)]);
        let moved = settle(&mut grid);
        let order: Vec<u32> = moved.iter().map(|r| r.value.get()).collect();
        assert_eq!(order, vec![4, 8, 16]);
        assert_eq!(grid.value_at(CellPos::new(0, 1)), Some(BlockValue::new(4)));
        assert_eq!(grid.value_at(CellPos::new(0, 2)), Some(BlockValue::new(8)));
        assert_eq!(grid.value_at(CellPos::new(0, 3)), Some(BlockValue::new(16)));
        assert!(grid.is_settled());
    }

    #[test]
    fn columns_are_scanned_left_to_right() {
        let mut grid = Grid::with_blocks(3, 7, &[(2, 1, 2), (0, 4, 4)]);
        let first = settle_one(&mut grid).unwrap();
        assert_eq!(first.column, 0);
        let second = settle_one(&mut grid).unwrap();
        assert_eq!(second.column, 2);
        assert_eq!(settle_one(&mut grid), None);
    }

    #[test]
    fn settle_column_compacts_one_column_only() {
        let mut grid = Grid::with_blocks(2, 7, &[(0, 2, 2), (0, 5, 4), (1, 3, 8)]);
        let moved = settle_column(&mut grid, 0);
        assert_eq!(moved.len(), 2);
        assert_eq!(grid.value_at(CellPos::new(0, 0)), Some(BlockValue::new(2)));
        assert_eq!(grid.value_at(CellPos::new(0, 1)), Some(BlockValue::new(4)));
        assert!(grid.is_floating(CellPos::new(1, 3)));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn blocks() -> impl Strategy<Value = Vec<(u8, u8, u32)>> {
            prop::collection::vec((0u8..4, 0u8..7, 1u32..=6), 0..20)
                .prop_map(|raw| raw.into_iter().map(|(c, r, e)| (c, r, 1 << e)).collect())
        }

        proptest! {
            #[test]
            fn settle_keeps_every_block_and_column_order(layout in blocks()) {
                let mut grid = Grid::with_blocks(4, 7, &layout);
                let before: Vec<Vec<BlockValue>> = (0..4u8)
                    .map(|c| (0..7u8).filter_map(|r| grid.value_at(CellPos::new(c, r))).collect())
                    .collect();

                let moved = settle(&mut grid);

                prop_assert!(grid.is_settled());
                for relocation in &moved {
                    prop_assert!(relocation.to_row < relocation.from_row);
                }
                for (column, stack) in before.iter().enumerate() {
                    let column = column as u8;
                    prop_assert_eq!(grid.column_height(column) as usize, stack.len());
                    for (row, value) in stack.iter().enumerate() {
                        prop_assert_eq!(grid.value_at(CellPos::new(column, row as u8)), Some(*value));
                    }
                }
            }
        }
    }
}
