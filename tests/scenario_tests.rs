//! Integration tests for the full match / injection / countdown loop

use sumfall::core::{
    Block, BlockSpawner, EngineEvent, GameState, Grid, InjectOutcome, SequentialIds, SimpleRng,
    TickOutcome,
};
use sumfall::types::{BlockId, Difficulty, GameMode, MatchOutcome};

/// Blocks listed as (value, row, col); ids are assigned in order starting at 1.
fn grid_of(cells: &[(u8, u8, u8)]) -> Grid {
    let blocks = cells
        .iter()
        .enumerate()
        .map(|(i, &(value, row, col))| Block {
            id: BlockId(i as u32 + 1),
            value,
            row,
            col,
        })
        .collect();
    Grid::from_blocks(10, 6, blocks).unwrap()
}

fn id_at(game: &GameState, row: u8, col: u8) -> BlockId {
    game.grid().block_at(row, col).unwrap().id
}

#[test]
fn initial_grid_fills_bottom_four_rows() {
    let mut spawner = BlockSpawner::new(SimpleRng::new(2024), SequentialIds::new());
    let grid = Grid::initialize(10, 6, 4, &mut spawner);

    assert_eq!(grid.len(), 24);
    assert!(grid.blocks().iter().all(|b| (6..=9).contains(&b.row)));
    assert!(grid.blocks().iter().all(|b| (1..=9).contains(&b.value)));
    for row in 0..6 {
        for col in 0..6 {
            assert!(grid.block_at(row, col).is_none());
        }
    }
}

#[test]
fn classic_exact_match_scores_removes_and_injects() {
    let mut game = GameState::new(77);
    let grid = grid_of(&[
        (4, 9, 0),
        (5, 9, 1),
        (6, 9, 2),
        (2, 9, 3),
        (3, 8, 0),
        (7, 8, 3),
    ]);
    game.start_from(GameMode::Classic, Difficulty::Medium, grid, 15)
        .unwrap();

    let above_four = id_at(&game, 8, 0);
    let two = id_at(&game, 9, 3);
    let seven = id_at(&game, 8, 3);
    let picks = [id_at(&game, 9, 0), id_at(&game, 9, 1), id_at(&game, 9, 2)];

    assert_eq!(game.toggle(picks[0]), Some(MatchOutcome::Under));
    assert_eq!(game.toggle(picks[1]), Some(MatchOutcome::Under));
    assert_eq!(game.toggle(picks[2]), Some(MatchOutcome::Exact));

    let score_before = game.score();
    let combo_before = game.combo();
    let events = game.advance(250);
    let EngineEvent::MatchResolved(event) = events[0] else {
        panic!("expected a resolved match, got {:?}", events);
    };

    assert_eq!(game.score() - score_before, 30 * (combo_before + 1));
    assert_eq!(event.blocks_removed, 3);
    assert!(event.row_injected);
    for id in picks {
        assert!(!game.grid().contains(id));
    }

    // The 3 above the 4 fell to row 9, then everything moved up one.
    assert_eq!(game.grid().block(above_four).unwrap().row, 8);
    assert_eq!(game.grid().block(two).unwrap().row, 8);
    assert_eq!(game.grid().block(seven).unwrap().row, 7);

    // A fresh bottom row of 6.
    let bottom: Vec<&Block> = game.grid().blocks().iter().filter(|b| b.row == 9).collect();
    assert_eq!(bottom.len(), 6);
    assert!(game.grid().is_gravity_consistent());
    assert_eq!(game.grid().len(), 3 + 6);
}

#[test]
fn injection_with_top_row_occupied_leaves_grid_untouched() {
    let mut cells: Vec<(u8, u8, u8)> = (0..10).map(|row| (5, row, 2)).collect();
    cells.push((1, 9, 0));
    let mut grid = grid_of(&cells);
    let before = grid.clone();

    let mut spawner = BlockSpawner::new(SimpleRng::new(1), SequentialIds::new());
    assert_eq!(grid.inject_row(&mut spawner), InjectOutcome::GameOver);
    assert_eq!(grid, before);
}

#[test]
fn classic_game_over_freezes_the_game() {
    let mut cells: Vec<(u8, u8, u8)> = (0..10).map(|row| (9, row, 0)).collect();
    cells.push((6, 9, 4));
    cells.push((4, 9, 5));
    let mut game = GameState::new(3);
    game.start_from(GameMode::Classic, Difficulty::Fast, grid_of(&cells), 10)
        .unwrap();

    game.toggle(id_at(&game, 9, 4));
    game.toggle(id_at(&game, 9, 5));
    let events = game.advance(250);
    assert!(events.contains(&EngineEvent::GameOver));
    assert!(game.is_game_over());
    assert_eq!(game.score(), 20);

    let snap = game.snapshot();
    assert!(snap.game_over);
    assert!(!snap.playable());
    assert_eq!(game.toggle(id_at(&game, 0, 0)), None);
}

#[test]
fn overshoot_clears_selection_and_combo_after_delay() {
    let mut game = GameState::new(9);
    let grid = grid_of(&[
        (5, 9, 0),
        (5, 9, 1),
        (9, 9, 2),
        (9, 9, 3),
        (9, 9, 4),
        (8, 9, 5),
    ]);
    game.start_from(GameMode::Time, Difficulty::Medium, grid, 10)
        .unwrap();

    // Build a combo first.
    game.toggle(BlockId(1));
    game.toggle(BlockId(2));
    game.advance(250);
    assert_eq!(game.combo(), 1);

    // Climb past the freshly rolled target without ever hitting it.
    let order = if game.target() == 18 {
        [BlockId(3), BlockId(6), BlockId(4)]
    } else {
        [BlockId(3), BlockId(4), BlockId(5)]
    };
    let grid_before = game.grid().clone();
    let mut outcome = None;
    for id in order {
        outcome = game.toggle(id);
        if outcome != Some(MatchOutcome::Under) {
            break;
        }
    }

    assert_eq!(outcome, Some(MatchOutcome::Over));
    assert!(game.is_processing());
    assert!(game.advance(149).is_empty());
    assert_eq!(game.advance(1).as_slice(), &[EngineEvent::OvershootCleared]);
    assert!(game.selection().is_empty());
    assert_eq!(game.combo(), 0);
    assert_eq!(game.grid(), &grid_before);
}

#[test]
fn overshoot_with_fixed_target() {
    let mut game = GameState::new(9);
    let grid = grid_of(&[(9, 9, 0), (8, 9, 1), (1, 9, 2)]);
    game.start_from(GameMode::Classic, Difficulty::Medium, grid, 12)
        .unwrap();
    let grid_before = game.grid().clone();

    assert_eq!(game.toggle(BlockId(1)), Some(MatchOutcome::Under));
    assert_eq!(game.toggle(BlockId(2)), Some(MatchOutcome::Over));
    assert_eq!(game.toggle(BlockId(3)), None);

    game.advance(150);
    assert!(game.selection().is_empty());
    assert_eq!(game.combo(), 0);
    assert_eq!(game.grid(), &grid_before);
    assert!(game.snapshot().playable());
}

#[test]
fn time_mode_injects_after_difficulty_ticks() {
    for difficulty in Difficulty::ALL {
        let mut game = GameState::new(21);
        game.start_from(GameMode::Time, difficulty, grid_of(&[(1, 9, 0)]), 20)
            .unwrap();

        let seconds = difficulty.seconds_per_row();
        let mut injections = 0;
        for _ in 0..seconds {
            if game.tick() == TickOutcome::RowInjected {
                injections += 1;
            }
        }
        assert_eq!(injections, 1, "{:?}", difficulty);
        assert_eq!(game.time_left(), seconds);
        assert_eq!(game.grid().len(), 7);
        assert_eq!(game.grid().block(BlockId(1)).unwrap().row, 8);
    }
}

#[test]
fn time_mode_wall_clock_drives_injection() {
    let mut game = GameState::new(21);
    game.start_from(GameMode::Time, Difficulty::Fast, grid_of(&[(1, 9, 0)]), 20)
        .unwrap();

    let mut injected = 0;
    for _ in 0..(5_000 / 16 + 1) {
        injected += game
            .advance(16)
            .iter()
            .filter(|e| **e == EngineEvent::RowInjected)
            .count();
    }
    assert_eq!(injected, 1);
}

#[test]
fn same_seed_replays_identically() {
    let play = |seed: u32| {
        let mut game = GameState::new(seed);
        game.start(GameMode::Time, Difficulty::Fast);
        for _ in 0..20 {
            game.tick();
        }
        game.snapshot()
    };
    assert_eq!(play(4242), play(4242));
}
