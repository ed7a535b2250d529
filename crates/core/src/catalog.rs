//! Block catalog - the read-only definition table for block values
//!
//! The catalog answers two questions: may a value exist on the grid at all,
//! and how should it be drawn. The engine only ever asks the first one; the
//! definition itself is for renderers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::BlockValue;

/// Highest exponent in the default catalog (`2^24`).
pub const DEFAULT_MAX_EXPONENT: u32 = 24;

/// Colors cycled through by [`StaticCatalog::powers_of_two`].
const PALETTE: [[u8; 3]; 12] = [
    [238, 228, 218],
    [237, 224, 200],
    [242, 177, 121],
    [245, 149, 99],
    [246, 124, 95],
    [246, 94, 59],
    [237, 207, 114],
    [237, 204, 97],
    [237, 200, 80],
    [237, 197, 63],
    [237, 194, 46],
    [94, 218, 146],
];

/// Rendering data for one block value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockDefinition {
    pub value: BlockValue,
    /// RGB fill color.
    #[serde(default = "default_color")]
    pub color: [u8; 3],
    /// Optional asset name for graphical frontends.
    #[serde(default)]
    pub sprite: Option<String>,
}

fn default_color() -> [u8; 3] {
    PALETTE[0]
}

/// Read-only lookup of block definitions.
pub trait BlockCatalog {
    /// Whether `value` may appear on the grid.
    fn exists(&self, value: BlockValue) -> bool {
        self.lookup(value).is_some()
    }

    /// Rendering definition for `value`.
    fn lookup(&self, value: BlockValue) -> Option<&BlockDefinition>;
}

/// A catalog backed by an ordered map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCatalog {
    definitions: BTreeMap<BlockValue, BlockDefinition>,
}

impl StaticCatalog {
    /// Build a catalog from definitions. Later duplicates replace earlier ones.
    pub fn new(definitions: impl IntoIterator<Item = BlockDefinition>) -> Self {
        Self {
            definitions: definitions
                .into_iter()
                .map(|def| (def.value, def))
                .collect(),
        }
    }

    /// `2^1 ..= 2^max_exponent`, colored from a fixed palette.
    pub fn powers_of_two(max_exponent: u32) -> Self {
        let max_exponent = max_exponent.min(31);
        Self::new((1..=max_exponent).map(|exp| BlockDefinition {
            value: BlockValue::new(1u32 << exp),
            color: PALETTE[(exp as usize - 1) % PALETTE.len()],
            sprite: None,
        }))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// All defined values in ascending order.
    pub fn values(&self) -> impl Iterator<Item = BlockValue> + '_ {
        self.definitions.keys().copied()
    }
}

impl BlockCatalog for StaticCatalog {
    fn exists(&self, value: BlockValue) -> bool {
        self.definitions.contains_key(&value)
    }

    fn lookup(&self, value: BlockValue) -> Option<&BlockDefinition> {
        self.definitions.get(&value)
    }
}

impl Default for BlockDefinition {
    fn default() -> Self {
        Self {
            value: BlockValue::new(2),
            color: default_color(),
            sprite: None,
        }
    }
}
