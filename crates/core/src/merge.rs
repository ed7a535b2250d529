//! Merge resolution
//!
//! A settled block absorbs every orthogonal neighbor holding the same value.
//! With `k` matching neighbors the block becomes `value * 2^k` and the
//! neighbors are cleared. The block is then checked again with its new value
//! until nothing matches; this runs as a loop, and it terminates because the
//! value strictly grows while the grid only loses blocks.
//!
//! The cell directly above a freshly settled block is always empty under
//! correct gravity. An equal block found there is reported and left alone.

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use crate::catalog::BlockCatalog;
use crate::error::EngineError;
use crate::grid::{Direction, Grid};
use crate::types::{BlockValue, CellPos};

/// One application of the merge law at a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStep {
    pub at: CellPos,
    pub from: BlockValue,
    pub to: BlockValue,
    /// Neighbors that were cleared, in scan order (down, left, right).
    pub consumed: ArrayVec<CellPos, 4>,
}

impl MergeStep {
    pub fn matches(&self) -> u8 {
        self.consumed.len() as u8
    }
}

/// Everything that happened while resolving merges at one cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub steps: Vec<MergeStep>,
    /// Set when an equal block sat directly above the cell.
    pub anomaly: Option<EngineError>,
}

impl MergeOutcome {
    pub fn merged(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Value left at the cell after the last step.
    pub fn final_value(&self) -> Option<BlockValue> {
        self.steps.last().map(|step| step.to)
    }
}

/// Neighbors of `at` holding `value`, split into mergeable ones and an
/// anomalous match above.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborScan {
    pub matches: ArrayVec<CellPos, 4>,
    pub above: Option<CellPos>,
}

/// Find neighbors of `at` equal to `value`. The cell itself is never counted.
pub fn scan_neighbors(grid: &Grid, at: CellPos, value: BlockValue) -> NeighborScan {
    let mut scan = NeighborScan::default();
    for (dir, pos) in grid.neighbors(at) {
        if grid.value_at(pos) != Some(value) {
            continue;
        }
        if dir == Direction::Up {
            scan.above = Some(pos);
        } else {
            scan.matches.push(pos);
        }
    }
    scan
}

/// The merge law: `value * 2^matches`, `None` on overflow.
pub fn merged_value(value: BlockValue, matches: usize) -> Option<BlockValue> {
    value.scaled_by_pow2(matches as u32)
}

/// Resolve merges at `at` until the cell has no equal neighbors.
///
/// Every result value must exist in `catalog`; otherwise this fails with
/// `UnknownBlockValue` before touching the grid for that step. Steps already
/// applied stay applied, so callers that need all-or-nothing semantics must
/// restore their own checkpoint.
pub fn resolve<C: BlockCatalog + ?Sized>(
    grid: &mut Grid,
    catalog: &C,
    at: CellPos,
) -> Result<MergeOutcome, EngineError> {
    let mut outcome = MergeOutcome::default();

    while let Some(value) = grid.value_at(at) {
        let scan = scan_neighbors(grid, at, value);

        if let (Some(_), None) = (scan.above, &outcome.anomaly) {
            let err = EngineError::AnomalousMergeAbove { at, value };
            warn!(%at, %value, error = %err, "equal block above a settled cell, not merging");
            outcome.anomaly = Some(err);
        }

        if scan.matches.is_empty() {
            break;
        }

        let k = scan.matches.len();
        let to = merged_value(value, k)
            .filter(|&v| catalog.exists(v))
            .ok_or(EngineError::UnknownBlockValue {
                value: u64::from(value.get()) << k,
            })?;

        for &pos in &scan.matches {
            grid.take(pos);
        }
        grid.set(at, Some(to));
        debug!(%at, from = %value, %to, matches = k, "merge");

        outcome.steps.push(MergeStep {
            at,
            from: value,
            to,
            consumed: scan.matches,
        });
    }

    Ok(outcome)
}
