//! Spawn pool - the values eligible for the next spawned block

use std::collections::BTreeSet;

use crate::catalog::BlockCatalog;
use crate::error::EngineError;
use crate::rng::SimpleRng;
use crate::types::BlockValue;

/// Set of block values that may be spawned next.
///
/// Kept in ascending order so a seeded pick is reproducible regardless of the
/// order values were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnPool {
    values: BTreeSet<BlockValue>,
}

impl SpawnPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert every value that the catalog knows and the pool lacks.
    ///
    /// Unknown values are skipped silently. Returns the values actually added.
    pub fn add<C: BlockCatalog + ?Sized>(
        &mut self,
        values: impl IntoIterator<Item = BlockValue>,
        catalog: &C,
    ) -> Vec<BlockValue> {
        values
            .into_iter()
            .filter(|&value| catalog.exists(value) && self.values.insert(value))
            .collect()
    }

    /// Remove each value that is present. Returns the values actually removed.
    pub fn remove(&mut self, values: impl IntoIterator<Item = BlockValue>) -> Vec<BlockValue> {
        values
            .into_iter()
            .filter(|value| self.values.remove(value))
            .collect()
    }

    /// Uniform choice over the pool.
    pub fn pick_random(&self, rng: &mut SimpleRng) -> Result<BlockValue, EngineError> {
        if self.values.is_empty() {
            return Err(EngineError::EmptyPool);
        }
        let index = rng.next_index(self.values.len());
        self.values
            .iter()
            .nth(index)
            .copied()
            .ok_or(EngineError::EmptyPool)
    }

    pub fn contains(&self, value: BlockValue) -> bool {
        self.values.contains(&value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pool contents in ascending order.
    pub fn values(&self) -> impl Iterator<Item = BlockValue> + '_ {
        self.values.iter().copied()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;

    fn values(raw: &[u32]) -> Vec<BlockValue> {
        raw.iter().copied().map(BlockValue::new).collect()
    }

    #[test]
    fn add_skips_duplicates_and_unknown_values() {
        let catalog = StaticCatalog::powers_of_two(6);
        let mut pool = SpawnPool::new();

        let added = pool.add(values(&[2, 4, 3, 2, 128]), &catalog);
        assert_eq!(added, values(&[2, 4]));
        assert_eq!(pool.len(), 2);

        let added = pool.add(values(&[4, 8]), &catalog);
        assert_eq!(added, values(&[8]));
        assert_eq!(pool.values().collect::<Vec<_>>(), values(&[2, 4, 8]));
    }

    #[test]
    fn remove_ignores_absent_values() {
        let catalog = StaticCatalog::powers_of_two(6);
        let mut pool = SpawnPool::new();
        pool.add(values(&[2, 4]), &catalog);

        let removed = pool.remove(values(&[4, 16, 4]));
        assert_eq!(removed, values(&[4]));
        assert!(pool.contains(BlockValue::new(2)));
        assert!(!pool.contains(BlockValue::new(4)));
    }

    #[test]
    fn pick_from_empty_pool_fails() {
        let pool = SpawnPool::new();
        let mut rng = SimpleRng::new(1);
        assert_eq!(pool.pick_random(&mut rng), Err(EngineError::EmptyPool));
    }

    #[test]
    fn pick_always_returns_a_member() {
        let catalog = StaticCatalog::powers_of_two(6);
        let mut pool = SpawnPool::new();
        pool.add(values(&[2, 8, 32]), &catalog);
        let mut rng = SimpleRng::new(5);
        for _ in 0..100 {
            let v = pool.pick_random(&mut rng).unwrap();
            assert!(pool.contains(v));
        }
    }

    #[test]
    fn pick_ignores_insertion_order() {
        let catalog = StaticCatalog::powers_of_two(6);
        let mut a = SpawnPool::new();
        a.add(values(&[2, 4, 8]), &catalog);
        let mut b = SpawnPool::new();
        b.add(values(&[8, 2, 4]), &catalog);

        let mut rng_a = SimpleRng::new(3);
        let mut rng_b = SimpleRng::new(3);
        for _ in 0..20 {
            assert_eq!(a.pick_random(&mut rng_a), b.pick_random(&mut rng_b));
        }
    }
}
