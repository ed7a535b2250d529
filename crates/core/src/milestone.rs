//! Milestones - pool changes unlocked by reaching a block value
//!
//! Milestones form an ordered list consumed through a cursor. Whenever the
//! highest value rises, every milestone from the cursor onward whose target
//! has been reached is applied in order: its additions first, then its
//! removals. The cursor only moves forward, so each milestone fires once.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::BlockCatalog;
use crate::pool::SpawnPool;
use crate::types::BlockValue;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Milestone {
    /// Highest value that triggers this milestone.
    pub target: BlockValue,
    #[serde(default)]
    pub add: Vec<BlockValue>,
    #[serde(default)]
    pub remove: Vec<BlockValue>,
}

/// What a milestone actually changed in the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMilestone {
    pub index: usize,
    pub target: BlockValue,
    pub added: Vec<BlockValue>,
    pub removed: Vec<BlockValue>,
}

/// Walks an ordered milestone list.
#[derive(Debug, Clone, Copy)]
pub struct MilestoneEvaluator<'a> {
    milestones: &'a [Milestone],
}

impl<'a> MilestoneEvaluator<'a> {
    pub fn new(milestones: &'a [Milestone]) -> Self {
        Self { milestones }
    }

    pub fn len(&self) -> usize {
        self.milestones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }

    /// Next milestone not yet applied.
    pub fn pending(&self, cursor: usize) -> Option<&'a Milestone> {
        self.milestones.get(cursor)
    }

    /// Apply every reachable milestone starting at `cursor`, advancing it.
    pub fn advance<C: BlockCatalog + ?Sized>(
        &self,
        cursor: &mut usize,
        highest: BlockValue,
        pool: &mut SpawnPool,
        catalog: &C,
    ) -> Vec<AppliedMilestone> {
        let mut applied = Vec::new();
        while let Some(milestone) = self.milestones.get(*cursor) {
            if highest < milestone.target {
                break;
            }
            let added = pool.add(milestone.add.iter().copied(), catalog);
            let removed = pool.remove(milestone.remove.iter().copied());
            info!(
                index = *cursor,
                target = %milestone.target,
                ?added,
                ?removed,
                "milestone reached"
            );
            applied.push(AppliedMilestone {
                index: *cursor,
                target: milestone.target,
                added,
                removed,
            });
            *cursor += 1;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;

    fn v(raw: u32) -> BlockValue {
        BlockValue::new(raw)
    }

    fn milestone(target: u32, add: &[u32], remove: &[u32]) -> Milestone {
        Milestone {
            target: v(target),
            add: add.iter().copied().map(v).collect(),
            remove: remove.iter().copied().map(v).collect(),
        }
    }

    fn pool_with(raw: &[u32], catalog: &StaticCatalog) -> SpawnPool {
        let mut pool = SpawnPool::new();
        pool.add(raw.iter().copied().map(v), catalog);
        pool
    }

    #[test]
    fn below_target_nothing_happens() {
        let catalog = StaticCatalog::powers_of_two(10);
        let list = [milestone(8, &[128], &[2])];
        let mut pool = pool_with(&[2, 4], &catalog);
        let mut cursor = 0;

        let applied = MilestoneEvaluator::new(&list).advance(&mut cursor, v(4), &mut pool, &catalog);
        assert!(applied.is_empty());
        assert_eq!(cursor, 0);
        assert!(pool.contains(v(2)));
    }

    #[test]
    fn reaching_target_adds_then_removes() {
        let catalog = StaticCatalog::powers_of_two(10);
        let list = [milestone(8, &[128], &[2])];
        let mut pool = pool_with(&[2, 4], &catalog);
        let mut cursor = 0;

        let applied = MilestoneEvaluator::new(&list).advance(&mut cursor, v(8), &mut pool, &catalog);
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].added, vec![v(128)]);
        assert_eq!(applied[0].removed, vec![v(2)]);
        assert_eq!(cursor, 1);
        assert!(pool.contains(v(128)));
        assert!(!pool.contains(v(2)));
    }

    #[test]
    fn jump_applies_several_in_order() {
        let catalog = StaticCatalog::powers_of_two(10);
        let list = [
            milestone(8, &[16], &[]),
            milestone(16, &[], &[16]),
            milestone(64, &[512], &[]),
        ];
        let mut pool = pool_with(&[2], &catalog);
        let mut cursor = 0;

        let applied =
            MilestoneEvaluator::new(&list).advance(&mut cursor, v(32), &mut pool, &catalog);
        let indices: Vec<_> = applied.iter().map(|a| a.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(cursor, 2);
        assert!(!pool.contains(v(16)));
        assert!(!pool.contains(v(512)));
    }

    #[test]
    fn applied_milestones_never_repeat() {
        let catalog = StaticCatalog::powers_of_two(10);
        let list = [milestone(8, &[128], &[])];
        let mut pool = pool_with(&[2], &catalog);
        let mut cursor = 0;
        let evaluator = MilestoneEvaluator::new(&list);

        evaluator.advance(&mut cursor, v(8), &mut pool, &catalog);
        pool.remove([v(128)]);
        let again = evaluator.advance(&mut cursor, v(1024), &mut pool, &catalog);
        assert!(again.is_empty());
        assert!(!pool.contains(v(128)));
    }

    #[test]
    fn out_of_order_target_blocks_later_entries() {
        let catalog = StaticCatalog::powers_of_two(10);
        let list = [milestone(64, &[], &[]), milestone(8, &[256], &[])];
        let mut pool = pool_with(&[2], &catalog);
        let mut cursor = 0;

        let applied = MilestoneEvaluator::new(&list).advance(&mut cursor, v(16), &mut pool, &catalog);
        assert!(applied.is_empty());
        assert_eq!(cursor, 0);
    }

    #[test]
    fn unknown_additions_are_skipped() {
        let catalog = StaticCatalog::powers_of_two(4);
        let list = [milestone(2, &[3, 16, 4096], &[])];
        let mut pool = SpawnPool::new();
        let mut cursor = 0;

        let applied = MilestoneEvaluator::new(&list).advance(&mut cursor, v(2), &mut pool, &catalog);
        assert_eq!(applied[0].added, vec![v(16)]);
    }
}
