//! Session module - one game from start to end
//!
//! The session owns the grid, the spawn pool and the score state, and is the
//! only writer of all three. A spawn runs the whole cascade before returning:
//!
//! 1. the block drops to its landing cell (one grid write)
//! 2. merges are resolved at every cell in the work queue
//! 3. the lowest floating block is relocated and its landing cell queued
//! 4. steps 2-3 repeat until the queue is empty and nothing floats
//!
//! If any step fails the session is restored to its state before the spawn,
//! so callers never observe a half-applied cascade.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::catalog::{BlockCatalog, StaticCatalog};
use crate::config::{default_milestones, GameConfig};
use crate::drop::{self, DropPath};
use crate::error::EngineError;
use crate::gravity::{self, Relocation};
use crate::grid::Grid;
use crate::merge;
use crate::milestone::{Milestone, MilestoneEvaluator};
use crate::pool::SpawnPool;
use crate::rng::SimpleRng;
use crate::scoring::ScoreTracker;
use crate::snapshot::{BlockSnapshot, GameSnapshot, UNKNOWN_COLOR};
use crate::types::{BlockValue, CellPos, GridEvent};

/// How much work one cascade took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CascadeStats {
    /// Cells taken off the work queue and checked for merges.
    pub checks: u32,
    /// Merge steps applied.
    pub merges: u32,
    /// Blocks moved by gravity.
    pub relocations: u32,
}

/// Result of a successful spawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementPlan {
    /// Value of the spawned block.
    pub value: BlockValue,
    /// Rows the block falls through, for animation.
    pub path: DropPath,
    /// Everything the cascade did, in order.
    pub events: Vec<GridEvent>,
    pub stats: CascadeStats,
    /// Preview for the following spawn, `None` if the pool is empty.
    pub next_value: Option<BlockValue>,
}

impl PlacementPlan {
    pub fn landing(&self) -> CellPos {
        self.path.landing()
    }

    /// Cells whose value changed through a merge, in event order.
    pub fn merged_cells(&self) -> Vec<CellPos> {
        self.events
            .iter()
            .filter_map(|event| match event {
                GridEvent::Merged { at, .. } => Some(*at),
                _ => None,
            })
            .collect()
    }

    /// Points scored by this spawn.
    pub fn points(&self) -> u64 {
        self.events
            .iter()
            .map(|event| match event {
                GridEvent::Scored { points, .. } => *points,
                _ => 0,
            })
            .sum()
    }
}

/// Final figures reported when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub episode_id: u32,
    pub score: u64,
    pub highest: BlockValue,
    pub spawns: u32,
    pub milestones_reached: usize,
}

/// Everything a spawn may mutate; cloned as the rollback checkpoint.
#[derive(Debug, Clone)]
struct SessionState {
    grid: Grid,
    pool: SpawnPool,
    score: ScoreTracker,
    rng: SimpleRng,
    next: Option<BlockValue>,
    spawns: u32,
}

/// A running game.
#[derive(Debug)]
pub struct Session<C = StaticCatalog> {
    catalog: C,
    config: GameConfig,
    state: SessionState,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
}

impl Session<StaticCatalog> {
    /// Start a session with the default catalog and milestone table.
    pub fn initialize(
        columns: usize,
        rows: usize,
        initial_pool: &[BlockValue],
    ) -> Result<Self, EngineError> {
        let (Ok(c), Ok(r)) = (u8::try_from(columns), u8::try_from(rows)) else {
            return Err(EngineError::InvalidDimensions { columns, rows });
        };
        let config = GameConfig {
            columns: c,
            rows: r,
            initial_pool: initial_pool.to_vec(),
            milestones: default_milestones(),
            ..GameConfig::default()
        };
        Self::from_config(&config)
    }

    /// Start a session using the catalog described by `config`.
    pub fn from_config(config: &GameConfig) -> Result<Self, EngineError> {
        Self::with_catalog(config.build_catalog(), config)
    }
}

impl<C: BlockCatalog> Session<C> {
    /// Start a session with an explicit catalog. `config.catalog` is ignored.
    pub fn with_catalog(catalog: C, config: &GameConfig) -> Result<Self, EngineError> {
        if config.columns == 0 || config.rows == 0 {
            return Err(EngineError::InvalidDimensions {
                columns: config.columns as usize,
                rows: config.rows as usize,
            });
        }
        let state = fresh_state(&catalog, config);
        debug!(
            columns = config.columns,
            rows = config.rows,
            pool = state.pool.len(),
            "session created"
        );
        Ok(Self {
            catalog,
            config: config.clone(),
            state,
            episode_id: 0,
        })
    }

    /// Drop the previewed block into `column` and resolve the cascade.
    ///
    /// Errors leave the session untouched.
    pub fn spawn(&mut self, column: usize) -> Result<PlacementPlan, EngineError> {
        let path = drop::resolve_landing(&self.state.grid, column)?;
        if self.state.pool.is_empty() {
            return Err(EngineError::EmptyPool);
        }
        let checkpoint = self.state.clone();
        let preview = self
            .state
            .next
            .filter(|&value| self.state.pool.contains(value));
        let value = match preview {
            Some(value) => value,
            None => self.state.pool.pick_random(&mut self.state.rng)?,
        };
        self.run_guarded(checkpoint, path, value)
    }

    /// Drop an explicit `value` into `column`, bypassing the preview and the
    /// pool. The value must exist in the catalog.
    pub fn spawn_scripted(
        &mut self,
        column: usize,
        value: BlockValue,
    ) -> Result<PlacementPlan, EngineError> {
        let path = drop::resolve_landing(&self.state.grid, column)?;
        if !self.catalog.exists(value) {
            return Err(EngineError::UnknownBlockValue {
                value: u64::from(value.get()),
            });
        }
        let checkpoint = self.state.clone();
        self.run_guarded(checkpoint, path, value)
    }

    fn run_guarded(
        &mut self,
        checkpoint: SessionState,
        path: DropPath,
        value: BlockValue,
    ) -> Result<PlacementPlan, EngineError> {
        match self.run_cascade(path, value) {
            Ok(plan) => Ok(plan),
            Err(err) => {
                error!(column = path.column, %value, error = %err, "cascade aborted, rolling back");
                self.state = checkpoint;
                Err(err)
            }
        }
    }

    fn run_cascade(
        &mut self,
        path: DropPath,
        value: BlockValue,
    ) -> Result<PlacementPlan, EngineError> {
        let state = &mut self.state;
        let landing = path.landing();
        let mut events = vec![GridEvent::Placed { at: landing, value }];
        let mut stats = CascadeStats::default();

        state.grid.set(landing, Some(value));
        debug!(%landing, %value, "placed");

        let mut cascade = Cascade {
            catalog: &self.catalog,
            milestones: MilestoneEvaluator::new(&self.config.milestones),
            pool: &mut state.pool,
            score: &mut state.score,
            events: &mut events,
            stats: &mut stats,
        };
        let grid = &mut state.grid;
        let mut pending = VecDeque::from([landing]);
        loop {
            while let Some(at) = pending.pop_front() {
                cascade.merge_at(grid, at)?;
            }
            match gravity::settle_one(grid) {
                Some(moved) => {
                    cascade.record_fall(moved);
                    pending.push_back(moved.landing());
                }
                None => break,
            }
        }
        debug_assert!(grid.is_settled());

        state.spawns += 1;
        state.next = state.pool.pick_random(&mut state.rng).ok();
        debug!(
            checks = stats.checks,
            merges = stats.merges,
            relocations = stats.relocations,
            next = ?state.next,
            "cascade settled"
        );

        Ok(PlacementPlan {
            value,
            path,
            events,
            stats,
            next_value: state.next,
        })
    }

    /// Value the next [`spawn`](Self::spawn) will drop, if the pool allows one.
    pub fn next_spawn_value(&self) -> Option<BlockValue> {
        self.state
            .next
            .filter(|&value| self.state.pool.contains(value))
    }

    /// Add values to the spawn pool (unknown values are skipped).
    pub fn add_to_pool(&mut self, values: impl IntoIterator<Item = BlockValue>) -> Vec<BlockValue> {
        let added = self.state.pool.add(values, &self.catalog);
        self.refresh_preview();
        added
    }

    /// Remove values from the spawn pool (absent values are skipped).
    pub fn remove_from_pool(
        &mut self,
        values: impl IntoIterator<Item = BlockValue>,
    ) -> Vec<BlockValue> {
        let removed = self.state.pool.remove(values);
        self.refresh_preview();
        removed
    }

    fn refresh_preview(&mut self) {
        if self.next_spawn_value().is_none() {
            self.state.next = self.state.pool.pick_random(&mut self.state.rng).ok();
        }
    }

    pub fn score(&self) -> u64 {
        self.state.score.score()
    }

    /// Highest value produced by a merge so far (zero before the first).
    pub fn highest_value(&self) -> BlockValue {
        self.state.score.highest()
    }

    /// Pool contents in ascending order.
    pub fn pool_contents(&self) -> Vec<BlockValue> {
        self.state.pool.values().collect()
    }

    pub fn milestone_cursor(&self) -> usize {
        self.state.score.milestone_cursor()
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.config.milestones
    }

    pub fn grid(&self) -> &Grid {
        &self.state.grid
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn spawns(&self) -> u32 {
        self.state.spawns
    }

    /// Every column is full; no spawn can succeed.
    pub fn is_stuck(&self) -> bool {
        self.state.grid.is_full()
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.state.grid
    }

    /// Throw away the current game and start over with the same config.
    pub fn restart(&mut self) {
        self.state = fresh_state(&self.catalog, &self.config);
        self.episode_id = self.episode_id.wrapping_add(1);
        debug!(episode = self.episode_id, "session restarted");
    }

    /// End the session, reporting its final figures.
    pub fn end(self) -> SessionSummary {
        let summary = SessionSummary {
            episode_id: self.episode_id,
            score: self.score(),
            highest: self.highest_value(),
            spawns: self.state.spawns,
            milestones_reached: self.milestone_cursor(),
        };
        debug!(score = summary.score, spawns = summary.spawns, "session ended");
        summary
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        let grid = &self.state.grid;
        out.columns = grid.columns();
        out.rows = grid.rows();
        out.cells.clear();
        out.cells
            .extend(grid.cells().iter().map(|cell| cell.map(|v| self.block_snapshot(v))));
        out.score = self.score();
        out.highest = self.highest_value();
        out.next = self.next_spawn_value().map(|v| self.block_snapshot(v));
        out.pool.clear();
        out.pool.extend(self.state.pool.values());
        out.milestone_cursor = self.milestone_cursor();
        out.milestone_count = self.config.milestones.len();
        out.episode_id = self.episode_id;
        out.spawns = self.state.spawns;
        out.stuck = self.is_stuck();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Render data for `value`, falling back to a neutral color for values
    /// the catalog does not define.
    pub fn block_snapshot(&self, value: BlockValue) -> BlockSnapshot {
        BlockSnapshot {
            value,
            color: self
                .catalog
                .lookup(value)
                .map_or(UNKNOWN_COLOR, |def| def.color),
        }
    }
}

fn fresh_state<C: BlockCatalog + ?Sized>(catalog: &C, config: &GameConfig) -> SessionState {
    let mut pool = SpawnPool::new();
    pool.add(config.initial_pool.iter().copied(), catalog);
    let mut rng = SimpleRng::new(config.seed);
    let next = pool.pick_random(&mut rng).ok();
    SessionState {
        grid: Grid::new(config.columns, config.rows),
        pool,
        score: ScoreTracker::new(),
        rng,
        next,
        spawns: 0,
    }
}

/// Borrowed view of the state a cascade mutates besides the grid.
struct Cascade<'s, C: ?Sized> {
    catalog: &'s C,
    milestones: MilestoneEvaluator<'s>,
    pool: &'s mut SpawnPool,
    score: &'s mut ScoreTracker,
    events: &'s mut Vec<GridEvent>,
    stats: &'s mut CascadeStats,
}

impl<C: BlockCatalog + ?Sized> Cascade<'_, C> {
    fn merge_at(&mut self, grid: &mut Grid, at: CellPos) -> Result<(), EngineError> {
        self.stats.checks += 1;
        let outcome = merge::resolve(grid, self.catalog, at)?;

        if let Some(EngineError::AnomalousMergeAbove { at, value }) = outcome.anomaly {
            self.events.push(GridEvent::AnomalousMergeAbove { at, value });
        }

        for step in outcome.steps {
            self.stats.merges += 1;
            for &pos in &step.consumed {
                self.events.push(GridEvent::Removed {
                    at: pos,
                    value: step.from,
                });
            }
            self.events.push(GridEvent::Merged {
                at: step.at,
                from: step.from,
                to: step.to,
                matches: step.matches(),
            });

            let points = u64::from(step.to.get());
            let total = self.score.add(points);
            self.events.push(GridEvent::Scored { points, total });

            if let Some(applied) =
                self.score
                    .update_highest(step.to, self.milestones, self.pool, self.catalog)
            {
                self.events.push(GridEvent::HighestRaised { value: step.to });
                self.events
                    .extend(applied.into_iter().map(|a| GridEvent::MilestoneApplied {
                        index: a.index,
                        target: a.target,
                        added: a.added,
                        removed: a.removed,
                    }));
            }
        }
        Ok(())
    }

    fn record_fall(&mut self, moved: Relocation) {
        self.stats.relocations += 1;
        self.events.push(GridEvent::Fell {
            column: moved.column,
            from_row: moved.from_row,
            to_row: moved.to_row,
            value: moved.value,
        });
    }
}
