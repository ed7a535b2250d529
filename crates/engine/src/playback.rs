//! Playback of a resolved spawn as timed animation stages.
//!
//! | Stage | Duration |
//! |-------|----------|
//! | Fall | `DROP_STEP_MS` per row passed, landing row included |
//! | Flash | `MERGE_FLASH_MS` |
//!
//! Stages play strictly in event order: the spawned block falls, each merge
//! flashes its cells, each gravity relocation falls again.

use std::collections::VecDeque;

use tracing::trace;

use crate::core::PlacementPlan;
use crate::types::{BlockValue, CellPos, GridEvent, DROP_STEP_MS, MERGE_FLASH_MS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// A block moving down `column` from `from_row` to `to_row`.
    Fall {
        column: u8,
        from_row: u8,
        to_row: u8,
        value: BlockValue,
    },
    /// Merge target followed by the cells folded into it.
    Flash { cells: Vec<CellPos> },
}

impl Stage {
    pub fn duration_ms(&self) -> u32 {
        match *self {
            Stage::Fall {
                from_row, to_row, ..
            } => (u32::from(from_row.saturating_sub(to_row)) + 1) * DROP_STEP_MS,
            Stage::Flash { .. } => MERGE_FLASH_MS,
        }
    }
}

/// Turn a plan into its animation stages.
pub fn stages_for(plan: &PlacementPlan) -> Vec<Stage> {
    let mut stages = vec![Stage::Fall {
        column: plan.path.column,
        from_row: plan.path.from_row,
        to_row: plan.path.to_row,
        value: plan.value,
    }];
    let mut removed = Vec::new();
    for event in &plan.events {
        match *event {
            GridEvent::Removed { at, .. } => removed.push(at),
            GridEvent::Merged { at, .. } => {
                let mut cells = vec![at];
                cells.append(&mut removed);
                stages.push(Stage::Flash { cells });
            }
            GridEvent::Fell {
                column,
                from_row,
                to_row,
                value,
            } => stages.push(Stage::Fall {
                column,
                from_row,
                to_row,
                value,
            }),
            _ => {}
        }
    }
    stages
}

/// Frame-driven player for one [`PlacementPlan`] at a time.
#[derive(Debug, Clone, Default)]
pub struct Playback {
    stages: VecDeque<Stage>,
    /// Time spent in the front stage.
    elapsed_ms: u32,
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is playing with `plan`.
    pub fn start(&mut self, plan: &PlacementPlan) {
        self.stages = stages_for(plan).into();
        self.elapsed_ms = 0;
        trace!(stages = self.stages.len(), "playback started");
    }

    /// Advance by `elapsed_ms`. Returns whether the visible frame changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.stages.is_empty() {
            return false;
        }
        let before = self.frame_key();

        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        while let Some(stage) = self.stages.front() {
            let duration = stage.duration_ms();
            if self.elapsed_ms < duration {
                break;
            }
            self.elapsed_ms -= duration;
            self.stages.pop_front();
        }
        if self.stages.is_empty() {
            self.elapsed_ms = 0;
            trace!("playback finished");
        }

        self.frame_key() != before
    }

    /// The block currently falling and the cell it is drawn in.
    pub fn falling(&self) -> Option<(CellPos, BlockValue)> {
        match *self.stages.front()? {
            Stage::Fall {
                column,
                from_row,
                to_row,
                value,
            } => {
                let span = u32::from(from_row.saturating_sub(to_row));
                let rows_passed = (self.elapsed_ms / DROP_STEP_MS).min(span);
                let row = from_row.saturating_sub(rows_passed as u8);
                Some((CellPos::new(column, row), value))
            }
            Stage::Flash { .. } => None,
        }
    }

    /// Cells to highlight this frame.
    pub fn flashing(&self) -> &[CellPos] {
        match self.stages.front() {
            Some(Stage::Flash { cells }) => cells,
            _ => &[],
        }
    }

    pub fn is_idle(&self) -> bool {
        self.stages.is_empty()
    }

    /// Drop all remaining stages.
    pub fn skip(&mut self) {
        self.stages.clear();
        self.elapsed_ms = 0;
    }

    /// Time left until the playback is idle.
    pub fn remaining_ms(&self) -> u32 {
        let total: u32 = self.stages.iter().map(Stage::duration_ms).sum();
        total.saturating_sub(self.elapsed_ms)
    }

    fn frame_key(&self) -> (usize, Option<(CellPos, BlockValue)>) {
        (self.stages.len(), self.falling())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Session;

    fn v(raw: u32) -> BlockValue {
        BlockValue::new(raw)
    }

    fn plan_on_empty_grid() -> PlacementPlan {
        let mut session = Session::initialize(4, 7, &[v(2)]).unwrap();
        session.spawn_scripted(2, v(4)).unwrap()
    }

    #[test]
    fn test_upward_fall_stage_stays_at_start_row() {
        let stage = Stage::Fall {
            column: 1,
            from_row: 2,
            to_row: 5,
            value: v(8),
        };
        assert_eq!(stage.duration_ms(), DROP_STEP_MS);

        let mut playback = Playback::new();
        playback.stages.push_back(stage);
        assert_eq!(playback.falling(), Some((CellPos::new(1, 2), v(8))));
        playback.tick(DROP_STEP_MS - 1);
        assert_eq!(playback.falling(), Some((CellPos::new(1, 2), v(8))));
    }

    #[test]
    fn test_idle_playback_ignores_ticks() {
        let mut playback = Playback::new();
        assert!(playback.is_idle());
        assert!(!playback.tick(1000));
        assert_eq!(playback.falling(), None);
        assert!(playback.flashing().is_empty());
    }

    #[test]
    fn test_block_falls_one_row_per_step() {
        let plan = plan_on_empty_grid();
        let mut playback = Playback::new();
        playback.start(&plan);

        assert_eq!(playback.falling(), Some((CellPos::new(2, 6), v(4))));
        assert_eq!(playback.remaining_ms(), 7 * DROP_STEP_MS);

        assert!(!playback.tick(DROP_STEP_MS - 1));
        assert!(playback.tick(1));
        assert_eq!(playback.falling(), Some((CellPos::new(2, 5), v(4))));

        assert!(playback.tick(5 * DROP_STEP_MS));
        assert_eq!(playback.falling(), Some((CellPos::new(2, 0), v(4))));

        assert!(playback.tick(DROP_STEP_MS));
        assert!(playback.is_idle());
    }

    #[test]
    fn test_merge_flashes_target_and_consumed_cells() {
        let mut session = Session::initialize(4, 7, &[v(2)]).unwrap();
        session.spawn_scripted(0, v(2)).unwrap();
        let plan = session.spawn_scripted(1, v(2)).unwrap();

        let stages = stages_for(&plan);
        assert_eq!(stages.len(), 2);
        assert_eq!(
            stages[1],
            Stage::Flash {
                cells: vec![CellPos::new(1, 0), CellPos::new(0, 0)]
            }
        );

        let mut playback = Playback::new();
        playback.start(&plan);
        playback.tick(stages[0].duration_ms());
        assert_eq!(playback.falling(), None);
        assert_eq!(playback.flashing(), &[CellPos::new(1, 0), CellPos::new(0, 0)]);
        playback.tick(MERGE_FLASH_MS);
        assert!(playback.is_idle());
    }

    #[test]
    fn test_relocations_become_fall_stages() {
        let mut session = Session::initialize(4, 7, &[v(2)]).unwrap();
        session.spawn_scripted(0, v(2)).unwrap();
        let plan = session.spawn_scripted(0, v(2)).unwrap();

        let stages = stages_for(&plan);
        assert!(matches!(stages[1], Stage::Flash { .. }));
        assert_eq!(
            stages[2],
            Stage::Fall {
                column: 0,
                from_row: 1,
                to_row: 0,
                value: v(4)
            }
        );
    }

    #[test]
    fn test_large_tick_skips_several_stages() {
        let mut session = Session::initialize(4, 7, &[v(2)]).unwrap();
        session.spawn_scripted(0, v(2)).unwrap();
        let plan = session.spawn_scripted(0, v(2)).unwrap();

        let mut playback = Playback::new();
        playback.start(&plan);
        let total = playback.remaining_ms();
        assert!(playback.tick(total - 1));
        assert!(!playback.is_idle());
        playback.tick(1);
        assert!(playback.is_idle());
    }

    #[test]
    fn test_skip_clears_everything() {
        let mut playback = Playback::new();
        playback.start(&plan_on_empty_grid());
        playback.skip();
        assert!(playback.is_idle());
        assert_eq!(playback.remaining_ms(), 0);
    }
}
