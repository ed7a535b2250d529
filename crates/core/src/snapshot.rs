use serde::{Deserialize, Serialize};

use crate::types::{BlockValue, CellPos};

/// Fallback color for values the catalog cannot describe.
pub const UNKNOWN_COLOR: [u8; 3] = [200, 200, 200];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub value: BlockValue,
    pub color: [u8; 3],
}

/// Read-only view of a session for renderers and observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub columns: u8,
    pub rows: u8,
    /// Row-major, row 0 (the floor) first.
    pub cells: Vec<Option<BlockSnapshot>>,
    pub score: u64,
    pub highest: BlockValue,
    pub next: Option<BlockSnapshot>,
    pub pool: Vec<BlockValue>,
    pub milestone_cursor: usize,
    pub milestone_count: usize,
    pub episode_id: u32,
    pub spawns: u32,
    pub stuck: bool,
}

impl GameSnapshot {
    pub fn cell(&self, pos: CellPos) -> Option<BlockSnapshot> {
        if pos.column >= self.columns || pos.row >= self.rows {
            return None;
        }
        self.cells[pos.row as usize * self.columns as usize + pos.column as usize]
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.cells
            .resize(self.columns as usize * self.rows as usize, None);
        self.score = 0;
        self.highest = BlockValue::default();
        self.next = None;
        self.pool.clear();
        self.milestone_cursor = 0;
        self.spawns = 0;
        self.stuck = false;
    }

    pub fn playable(&self) -> bool {
        !self.stuck
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            columns: crate::types::DEFAULT_COLUMNS,
            rows: crate::types::GRID_ROWS,
            cells: vec![None; crate::types::DEFAULT_COLUMNS as usize * crate::types::GRID_ROWS as usize],
            score: 0,
            highest: BlockValue::default(),
            next: None,
            pool: Vec::new(),
            milestone_cursor: 0,
            milestone_count: 0,
            episode_id: 0,
            spawns: 0,
            stuck: false,
        }
    }
}
