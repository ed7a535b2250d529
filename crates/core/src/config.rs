//! Session configuration, loadable from JSON.
//!
//! ```
//! use tui_merge_core::GameConfig;
//!
//! let config = GameConfig::from_json_str(r#"{ "columns": 5, "seed": 7 }"#).unwrap();
//! assert_eq!(config.columns, 5);
//! assert_eq!(config.rows, 7);
//! assert_eq!(config.seed, 7);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::{BlockDefinition, StaticCatalog, DEFAULT_MAX_EXPONENT};
use crate::error::ConfigError;
use crate::milestone::Milestone;
use crate::types::{BlockValue, DEFAULT_COLUMNS, GRID_ROWS};

/// Values the pool starts with unless configured otherwise.
pub const DEFAULT_INITIAL_POOL: [u32; 6] = [2, 4, 8, 16, 32, 64];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub columns: u8,
    pub rows: u8,
    /// RNG seed for spawn selection.
    pub seed: u32,
    pub initial_pool: Vec<BlockValue>,
    /// Applied in order as the highest value crosses each target.
    pub milestones: Vec<Milestone>,
    /// Block definitions; `None` means powers of two up to `2^24`.
    pub catalog: Option<Vec<BlockDefinition>>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: GRID_ROWS,
            seed: 1,
            initial_pool: DEFAULT_INITIAL_POOL.map(BlockValue::new).to_vec(),
            milestones: default_milestones(),
            catalog: None,
        }
    }
}

/// 128 → +128 −2, 256 → +256 −4, 512 → +512 −8, 1024 → +1024 −16.
pub fn default_milestones() -> Vec<Milestone> {
    [(128, 2), (256, 4), (512, 8), (1024, 16)]
        .into_iter()
        .map(|(target, retire)| Milestone {
            target: BlockValue::new(target),
            add: vec![BlockValue::new(target)],
            remove: vec![BlockValue::new(retire)],
        })
        .collect()
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.warn_on_unordered_milestones();
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the catalog this config describes.
    pub fn build_catalog(&self) -> StaticCatalog {
        match &self.catalog {
            Some(defs) => StaticCatalog::new(defs.iter().cloned()),
            None => StaticCatalog::powers_of_two(DEFAULT_MAX_EXPONENT),
        }
    }

    /// Whether milestone targets never decrease. Not enforced by the engine.
    pub fn milestones_are_ordered(&self) -> bool {
        self.milestones
            .windows(2)
            .all(|pair| pair[0].target <= pair[1].target)
    }

    fn warn_on_unordered_milestones(&self) {
        if !self.milestones_are_ordered() {
            warn!(
                count = self.milestones.len(),
                "milestone targets decrease somewhere; later milestones may fire early"
            );
        }
    }
}
