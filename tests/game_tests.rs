mod common;

use common::{
    Panel,
    RecordingBus,
    ScriptedInputs,
    TAP,
    recording_screen,
};
use touchtris::{
    Game,
    GameConfig,
    GameState,
    InputArbiter,
    Intent,
    PieceKind,
    Screen,
    ScoreMarker,
    TouchSample,
    grid::{
        COLS,
        EMPTY,
        Grid,
        ROWS,
    },
    progression::level_color,
    render::{
        BOARD_X,
        BOARD_Y,
        BORDER_PALETTE,
        CELL_SIZE,
        FILL_PALETTE,
        raw,
    },
};

/// Sequence value that spawns an O piece.
const O_SEQUENCE: u32 = 7;

fn fast_config() -> GameConfig {
    GameConfig::default()
        .with_grace_ticks(1)
        .with_drop_threshold(0)
}

fn started(config: GameConfig) -> (Game, InputArbiter, Screen<RecordingBus>) {
    let mut game = Game::new(config);
    let input = InputArbiter::new();
    let mut screen = recording_screen();
    let mut analog = ScriptedInputs::resting();
    analog.push_touch(TAP);
    game.step(&input, &mut analog, &mut screen).unwrap();
    assert_eq!(game.state(), GameState::Playing);
    screen.bus().clear();
    (game, input, screen)
}

/// Tick until the next lock, steering an O piece toward `col`.
fn drop_o_at(game: &mut Game, input: &InputArbiter, screen: &mut Screen<RecordingBus>, col: u8) {
    let locked = game.locked_pieces();
    for _ in 0..200 {
        if let Some(piece) = game.piece() {
            assert_eq!(piece.kind(), PieceKind::O);
            if piece.col() > col {
                input.press(Intent::Left);
            } else if piece.col() < col {
                input.press(Intent::Right);
            }
        }
        input.set_sequence(O_SEQUENCE);
        game.tick(input, 1023, screen).unwrap();
        if game.locked_pieces() > locked {
            return;
        }
    }
    panic!("piece never locked");
}

#[test]
fn start_draws_background_and_level_swatch() {
    let mut game = Game::new(GameConfig::default());
    let input = InputArbiter::new();
    let mut screen = recording_screen();
    let mut analog = ScriptedInputs::resting();

    game.show_title(&mut screen).unwrap();
    game.step(&input, &mut analog, &mut screen).unwrap();
    assert_eq!(game.state(), GameState::AwaitingStart);
    screen.bus().clear();

    analog.push_touch(TAP);
    game.step(&input, &mut analog, &mut screen).unwrap();
    assert_eq!(game.state(), GameState::Playing);

    let regions = screen.bus().regions();
    assert_eq!(regions.len(), 6);
    assert_eq!(regions[5].color, raw(level_color(1)));
}

#[test]
fn resting_piece_falls_one_row_after_the_drop_threshold() {
    let (mut game, input, mut screen) = started(GameConfig::default());
    for _ in 0..24_001 {
        game.tick(&input, 1023, &mut screen).unwrap();
    }
    assert_eq!(game.piece().unwrap().row(), 0);

    game.tick(&input, 1023, &mut screen).unwrap();
    assert_eq!(game.piece().unwrap().row(), 1);
    assert_eq!(game.drop_counter(), 1);
}

#[test]
fn full_joystick_pull_drops_on_the_next_tick() {
    let (mut game, input, mut screen) = started(GameConfig::default());
    game.tick(&input, 50, &mut screen).unwrap();
    assert_eq!(game.piece().unwrap().row(), 0);
    game.tick(&input, 50, &mut screen).unwrap();
    assert_eq!(game.piece().unwrap().row(), 1);
}

#[test]
fn piece_dropped_without_input_locks_on_the_floor() {
    let config = fast_config().with_grace_ticks(3);
    let (mut game, input, mut screen) = started(config);
    input.set_sequence(O_SEQUENCE);

    for _ in 0..13 {
        game.tick(&input, 1023, &mut screen).unwrap();
    }
    let piece = game.piece().unwrap();
    assert_eq!((piece.row(), piece.col()), (12, 4));

    // Grace runs out on the fourth tick spent resting.
    for _ in 0..3 {
        game.tick(&input, 1023, &mut screen).unwrap();
        assert_eq!(game.locked_pieces(), 0);
    }
    assert_eq!(game.grace(), 3);
    input.set_sequence(O_SEQUENCE);
    game.tick(&input, 1023, &mut screen).unwrap();
    assert_eq!(game.locked_pieces(), 1);
    assert_eq!(game.grace(), 0);

    for (row, col) in [(12, 4), (12, 5), (13, 4), (13, 5)] {
        assert_eq!(game.grid().cell_at(row, col), PieceKind::O.id());
    }
    // A fresh piece spawned in the same pass.
    let next = game.piece().unwrap();
    assert_eq!((next.row(), next.col()), (0, 4));
    assert_eq!(game.grid().occupied(), 8);
}

#[test]
fn five_o_pieces_clear_the_bottom_two_rows() {
    let (mut game, input, mut screen) = started(fast_config());

    for col in [0, 2, 4, 6] {
        drop_o_at(&mut game, &input, &mut screen, col);
        assert_eq!(game.progression().lines_in_level(), 0);
    }
    screen.bus().clear();
    drop_o_at(&mut game, &input, &mut screen, 8);

    assert_eq!(game.locked_pieces(), 5);
    assert_eq!(game.progression().lines_in_level(), 2);
    assert_eq!(game.progression().marker(), ScoreMarker { column: 0, row: 4 });
    assert_eq!(game.progression().level(), 1);
    for col in 0..COLS {
        assert_eq!(game.grid().cell_at(12, col), 0);
        assert_eq!(game.grid().cell_at(13, col), 0);
    }
    // Only the freshly spawned piece is left.
    assert_eq!(game.grid().occupied(), 4);

    // Two 2×2 stamps then a full 140-cell redraw precede the new spawn.
    let regions = screen.bus().regions();
    let stamps: Vec<_> = regions.iter().filter(|r| r.count == 4).collect();
    assert_eq!(stamps.len(), 2);
    assert_eq!((stamps[0].x0, stamps[0].y0), (218, 23));
    assert_eq!((stamps[1].x0, stamps[1].y0), (218, 21));
    let outer = regions.iter().filter(|r| r.count == 440).count();
    assert!(outer >= 140);
}

#[test]
fn stacking_in_one_column_ends_the_game() {
    let (mut game, input, mut screen) = started(fast_config());

    for _ in 0..7 {
        drop_o_at(&mut game, &input, &mut screen, 4);
    }
    assert_eq!(game.state(), GameState::GameOver);
    assert_eq!(game.locked_pieces(), 7);
    assert!(game.piece().is_none());
    assert_eq!(game.grid().occupied(), 28);

    // Frozen: no grid mutation and nothing drawn until a restart.
    let frozen = game.grid().clone();
    screen.bus().clear();
    for _ in 0..10 {
        input.press(Intent::Rotate);
        game.tick(&input, 0, &mut screen).unwrap();
    }
    assert_eq!(game.grid(), &frozen);
    assert!(screen.bus().ops.is_empty());
}

#[test]
fn touch_restarts_after_game_over() {
    let (mut game, input, mut screen) = started(fast_config());
    for _ in 0..7 {
        drop_o_at(&mut game, &input, &mut screen, 4);
    }
    assert_eq!(game.state(), GameState::GameOver);

    input.press(Intent::Left);
    let mut analog = ScriptedInputs::resting();
    analog.push_touch(TouchSample { x: 1000, y: 50 });
    game.step(&input, &mut analog, &mut screen).unwrap();
    assert_eq!(game.state(), GameState::GameOver);

    analog.push_touch(TAP);
    game.step(&input, &mut analog, &mut screen).unwrap();
    assert_eq!(game.state(), GameState::Playing);
    assert!(game.grid().is_empty());
    assert_eq!(game.locked_pieces(), 0);
    assert_eq!(game.progression().level(), 1);
    assert!(!input.is_pending(Intent::Left));
    assert_eq!(input.sequence(), InputArbiter::SEQUENCE_START);

    game.step(&input, &mut analog, &mut screen).unwrap();
    assert_eq!(game.piece().unwrap().kind(), PieceKind::I);
}

#[test]
fn illegal_intent_stays_pending_until_a_drop() {
    let config = GameConfig::default().with_drop_threshold(5);
    let (mut game, input, mut screen) = started(config);
    input.set_sequence(O_SEQUENCE);
    game.tick(&input, 1023, &mut screen).unwrap();

    for _ in 0..4 {
        input.press(Intent::Right);
        game.tick(&input, 1023, &mut screen).unwrap();
    }
    let piece = game.piece().unwrap();
    assert_eq!(piece.col(), 8);
    assert_eq!(piece.row(), 0);

    input.press(Intent::Right);
    game.tick(&input, 1023, &mut screen).unwrap();
    assert!(input.is_pending(Intent::Right));

    // Counter reaches the threshold and the drop clears the latch.
    game.tick(&input, 1023, &mut screen).unwrap();
    assert_eq!(game.piece().unwrap().row(), 1);
    assert!(!input.is_pending(Intent::Right));
}

/// Every cell on the panel shows the tone its grid value implies.
fn assert_panel_matches(panel: &Panel, grid: &Grid, tick: usize) {
    for row in 0..ROWS {
        for col in 0..COLS {
            let id = grid.cell_at(row, col);
            let x = BOARD_X + CELL_SIZE * col as u16;
            let y = BOARD_Y + CELL_SIZE * row as u16;
            let border = BORDER_PALETTE[usize::from(id)];
            let fill = if id == EMPTY {
                border
            } else {
                FILL_PALETTE[usize::from(id)]
            };
            for (dx, dy, expected) in [
                (0, 0, border),
                (19, 19, border),
                (1, 18, border),
                (2, 2, fill),
                (10, 9, fill),
                (17, 17, fill),
            ] {
                assert_eq!(
                    panel.pixel(x + dx, y + dy),
                    expected,
                    "tick {tick}: cell ({row}, {col}) holds {id}"
                );
            }
        }
    }
}

#[test]
fn panel_tracks_the_grid_through_random_play() {
    let config = GameConfig::default()
        .with_grace_ticks(2)
        .with_drop_threshold(3);
    for seed in 1..=20u32 {
        let mut game = Game::new(config);
        let input = InputArbiter::new();
        let mut screen = recording_screen();
        let mut panel = Panel::new();
        let mut state = seed.wrapping_mul(0x9E37_79B9) | 1;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state
        };

        assert_eq!(game.poll_start(&input, TAP, &mut screen), Ok(true));
        panel.replay(screen.bus());
        assert_panel_matches(&panel, game.grid(), 0);

        for tick in 1..=1_000 {
            match next() % 8 {
                0 => input.press(Intent::Left),
                1 => input.press(Intent::Right),
                2 => input.press(Intent::Rotate),
                _ => {}
            }
            let joystick = [50, 150, 300, 1023][(next() % 4) as usize];
            game.tick(&input, joystick, &mut screen).unwrap();
            if game.state() != GameState::Playing {
                break;
            }
            panel.replay(screen.bus());
            assert_panel_matches(&panel, game.grid(), tick);
        }
    }
}

#[test]
fn panel_tracks_the_grid_through_a_double_clear() {
    let mut game = Game::new(fast_config());
    let input = InputArbiter::new();
    let mut screen = recording_screen();
    let mut panel = Panel::new();
    assert_eq!(game.poll_start(&input, TAP, &mut screen), Ok(true));

    for col in [0, 2, 4, 6, 8] {
        drop_o_at(&mut game, &input, &mut screen, col);
        panel.replay(screen.bus());
        assert_panel_matches(&panel, game.grid(), game.locked_pieces() as usize);
    }
    assert_eq!(game.progression().lines_in_level(), 2);
}
