//! Playback of real cascades

use tui_merge::core::Session;
use tui_merge::engine::playback::stages_for;
use tui_merge::engine::{Playback, Stage};
use tui_merge::types::{BlockValue, CellPos, TICK_MS};

fn v(raw: u32) -> BlockValue {
    BlockValue::new(raw)
}

#[test]
fn test_chain_reaction_plays_in_event_order() {
    let mut session = Session::initialize(4, 7, &[v(2)]).unwrap();
    for (column, value) in [(0, 2), (0, 16), (2, 2), (2, 8)] {
        session.spawn_scripted(column, v(value)).unwrap();
    }
    let plan = session.spawn_scripted(1, v(2)).unwrap();

    let stages = stages_for(&plan);
    let shape: Vec<&str> = stages
        .iter()
        .map(|s| match s {
            Stage::Fall { .. } => "fall",
            Stage::Flash { .. } => "flash",
        })
        .collect();
    assert_eq!(shape, vec!["fall", "flash", "fall", "fall", "flash"]);

    assert_eq!(
        stages[1],
        Stage::Flash {
            cells: vec![CellPos::new(1, 0), CellPos::new(0, 0), CellPos::new(2, 0)]
        }
    );
}

#[test]
fn test_fixed_ticks_reach_idle_in_remaining_time() {
    let mut session = Session::initialize(4, 7, &[v(2)]).unwrap();
    session.spawn(0).unwrap();
    let plan = session.spawn(0).unwrap();

    let mut playback = Playback::new();
    playback.start(&plan);
    let total = playback.remaining_ms();

    let mut elapsed = 0;
    let mut frames_changed = 0;
    while !playback.is_idle() {
        if playback.tick(TICK_MS) {
            frames_changed += 1;
        }
        elapsed += TICK_MS;
        assert!(elapsed <= total + TICK_MS);
    }
    assert!(frames_changed > 2);
}

#[test]
fn test_falling_block_stays_inside_the_grid() {
    let mut session = Session::initialize(4, 7, &[v(2), v(4), v(8)]).unwrap();
    let mut playback = Playback::new();
    for column in [3, 3, 1, 0, 3, 2, 2] {
        let plan = session.spawn(column).unwrap();
        playback.start(&plan);
        while !playback.is_idle() {
            if let Some((pos, _)) = playback.falling() {
                assert!(pos.column < 4);
                assert!(pos.row < 7);
            }
            playback.tick(TICK_MS);
        }
    }
}
