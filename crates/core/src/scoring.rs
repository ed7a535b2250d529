//! Scoring module - score accumulation and highest-value tracking
//!
//! Every merge adds its result value to the score. When a merge produces a
//! value above the previous highest, the milestone list is advanced; that is
//! the only way milestones fire.

use crate::catalog::BlockCatalog;
use crate::milestone::{AppliedMilestone, MilestoneEvaluator};
use crate::pool::SpawnPool;
use crate::types::BlockValue;

/// Score state for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreTracker {
    score: u64,
    /// Zero until the first merge.
    highest: BlockValue,
    /// Index of the next milestone to apply.
    milestone_cursor: usize,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn highest(&self) -> BlockValue {
        self.highest
    }

    pub fn milestone_cursor(&self) -> usize {
        self.milestone_cursor
    }

    /// Add points, returning the new total.
    pub fn add(&mut self, points: u64) -> u64 {
        self.score = self.score.saturating_add(points);
        self.score
    }

    /// Record a produced value.
    ///
    /// Returns `None` if it does not beat the current highest, otherwise the
    /// milestones that the new highest unlocked (possibly none).
    pub fn update_highest<C: BlockCatalog + ?Sized>(
        &mut self,
        value: BlockValue,
        milestones: MilestoneEvaluator<'_>,
        pool: &mut SpawnPool,
        catalog: &C,
    ) -> Option<Vec<AppliedMilestone>> {
        if value <= self.highest {
            return None;
        }
        self.highest = value;
        Some(milestones.advance(&mut self.milestone_cursor, value, pool, catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::milestone::Milestone;

    #[test]
    fn add_accumulates() {
        let mut tracker = ScoreTracker::new();
        assert_eq!(tracker.add(4), 4);
        assert_eq!(tracker.add(16), 20);
        assert_eq!(tracker.score(), 20);
    }

    #[test]
    fn add_saturates_instead_of_wrapping() {
        let mut tracker = ScoreTracker::new();
        tracker.add(u64::MAX - 1);
        assert_eq!(tracker.add(10), u64::MAX);
    }

    #[test]
    fn highest_only_moves_up() {
        let catalog = StaticCatalog::powers_of_two(10);
        let mut pool = SpawnPool::new();
        let mut tracker = ScoreTracker::new();
        let none = MilestoneEvaluator::new(&[]);

        assert!(tracker
            .update_highest(BlockValue::new(8), none, &mut pool, &catalog)
            .is_some());
        assert!(tracker
            .update_highest(BlockValue::new(4), none, &mut pool, &catalog)
            .is_none());
        assert!(tracker
            .update_highest(BlockValue::new(8), none, &mut pool, &catalog)
            .is_none());
        assert_eq!(tracker.highest(), BlockValue::new(8));
    }

    #[test]
    fn raising_highest_advances_milestones() {
        let catalog = StaticCatalog::powers_of_two(10);
        let list = [Milestone {
            target: BlockValue::new(8),
            add: vec![BlockValue::new(128)],
            remove: vec![],
        }];
        let mut pool = SpawnPool::new();
        let mut tracker = ScoreTracker::new();

        let applied = tracker
            .update_highest(
                BlockValue::new(16),
                MilestoneEvaluator::new(&list),
                &mut pool,
                &catalog,
            )
            .unwrap();
        assert_eq!(applied.len(), 1);
        assert_eq!(tracker.milestone_cursor(), 1);
        assert!(pool.contains(BlockValue::new(128)));
    }
}
