//! Property tests for session invariants.
//!
//! Random column sequences are played against sessions with random seeds and
//! pools. After every spawn, successful or not:
//! - the grid is settled and never holds more blocks than it has cells
//! - score and highest value never decrease, milestone cursor never moves back
//! - every block on the grid has a catalog entry
//! - a rejected spawn leaves the snapshot untouched

use proptest::prelude::*;
use tui_merge::core::{BlockCatalog, EngineError, GameConfig, Session};
use tui_merge::types::BlockValue;

fn pool_strategy() -> impl Strategy<Value = Vec<BlockValue>> {
    prop::collection::vec(1u32..=6, 0..4)
        .prop_map(|exps| exps.into_iter().map(|e| BlockValue::new(1 << e)).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn spawns_preserve_core_invariants(
        seed in any::<u32>(),
        columns in 1u8..=6,
        rows in 1u8..=8,
        pool in pool_strategy(),
        drops in prop::collection::vec(0usize..7, 1..120),
    ) {
        let config = GameConfig {
            columns,
            rows,
            seed,
            initial_pool: pool,
            ..GameConfig::default()
        };
        let mut session = Session::from_config(&config).unwrap();
        let capacity = columns as usize * rows as usize;

        let mut score = 0;
        let mut highest = BlockValue::new(0);
        let mut cursor = 0;

        for column in drops {
            let before = session.snapshot();
            match session.spawn(column) {
                Ok(plan) => {
                    prop_assert!(plan.stats.checks >= 1);
                    prop_assert_eq!(session.score(), before.score + plan.points());
                }
                Err(err) => {
                    prop_assert!(!err.is_fatal());
                    prop_assert_eq!(session.snapshot(), before);
                    if column >= columns as usize {
                        let is_invalid_column = matches!(err, EngineError::InvalidColumn { .. });
                        prop_assert!(is_invalid_column);
                    }
                }
            }

            let grid = session.grid();
            prop_assert!(grid.is_settled());
            prop_assert!(grid.occupied_count() <= capacity);
            for value in grid.cells().iter().flatten() {
                prop_assert!(session.catalog().exists(*value));
            }

            prop_assert!(session.score() >= score);
            prop_assert!(session.highest_value() >= highest);
            prop_assert!(session.milestone_cursor() >= cursor);
            score = session.score();
            highest = session.highest_value();
            cursor = session.milestone_cursor();
        }
    }

    #[test]
    fn empty_pool_rejects_every_spawn(
        columns in 1u8..=6,
        drops in prop::collection::vec(0usize..6, 1..20),
    ) {
        let config = GameConfig {
            columns,
            initial_pool: Vec::new(),
            ..GameConfig::default()
        };
        let mut session = Session::from_config(&config).unwrap();
        for column in drops {
            let result = session.spawn(column);
            if column < columns as usize {
                prop_assert_eq!(result.unwrap_err(), EngineError::EmptyPool);
            } else {
                prop_assert!(result.is_err());
            }
        }
        prop_assert_eq!(session.grid().occupied_count(), 0);
    }

    #[test]
    fn same_seed_same_game(
        seed in any::<u32>(),
        drops in prop::collection::vec(0usize..4, 1..60),
    ) {
        let config = GameConfig { seed, ..GameConfig::default() };
        let mut a = Session::from_config(&config).unwrap();
        let mut b = Session::from_config(&config).unwrap();
        for column in drops {
            prop_assert_eq!(a.spawn(column), b.spawn(column));
        }
        prop_assert_eq!(a.snapshot(), b.snapshot());
    }
}

#[test]
fn long_random_game_terminates() {
    let mut session = Session::initialize(4, 7, &[BlockValue::new(2), BlockValue::new(4)]).unwrap();
    let mut spawned = 0;
    for i in 0..10_000usize {
        if session.is_stuck() {
            break;
        }
        if session.spawn((i * 7 + i / 3) % 4).is_ok() {
            spawned += 1;
        }
    }
    assert!(spawned > 0);
    assert!(session.grid().is_settled());
}
