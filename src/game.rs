//! The cooperative game loop.
//!
//! [`Game`] owns the board, the live piece, progression and the timing
//! counters. Each [`Game::tick`] is one pass of the loop: grace and lock,
//! spawn or at most one player move, automatic descent, then the drop
//! time base advances. Only cells that changed are redrawn.

use crate::{
    collision,
    config::GameConfig,
    grid::Grid,
    input::{AnalogInputs, InputArbiter, Intent, SoftDrop, TouchSample},
    piece::{Piece, PieceKind},
    progression::Progression,
    render::{DisplayBus, Screen},
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameState {
    /// Waiting for the first touch after power-up.
    AwaitingStart,
    Playing,
    /// A spawn collided. The board is frozen until the next touch.
    GameOver,
}

pub struct Game {
    config: GameConfig,
    state: GameState,
    grid: Grid,
    piece: Option<Piece>,
    progression: Progression,
    grace: u32,
    drop_counter: u32,
    locked: u32,
}

impl Game {
    pub const fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: GameState::AwaitingStart,
            grid: Grid::new(),
            piece: None,
            progression: Progression::new(),
            grace: 0,
            drop_counter: 0,
            locked: 0,
        }
    }

    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    pub const fn state(&self) -> GameState {
        self.state
    }

    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The live piece, if one is falling.
    pub const fn piece(&self) -> Option<Piece> {
        self.piece
    }

    pub const fn progression(&self) -> &Progression {
        &self.progression
    }

    pub const fn grace(&self) -> u32 {
        self.grace
    }

    pub const fn drop_counter(&self) -> u32 {
        self.drop_counter
    }

    /// Pieces locked since the game started.
    pub const fn locked_pieces(&self) -> u32 {
        self.locked
    }

    pub fn show_title<B: DisplayBus>(&self, screen: &mut Screen<B>) -> Result<(), B::Error> {
        screen.draw_title()
    }

    /// Start or restart on a firm enough touch. Returns whether play began.
    pub fn poll_start<B: DisplayBus>(
        &mut self,
        input: &InputArbiter,
        touch: TouchSample,
        screen: &mut Screen<B>,
    ) -> Result<bool, B::Error> {
        if self.state == GameState::Playing {
            return Ok(false);
        }
        let pressure = touch.pressure(self.config.touch_full_scale());
        if pressure <= u32::from(self.config.touch_threshold()) {
            return Ok(false);
        }

        screen.draw_background()?;
        screen.draw_level_color(Progression::new().level_color())?;

        if self.state == GameState::GameOver {
            input.reset();
            info!("restart");
        } else {
            info!("start, pressure {=u32}", pressure);
        }
        self.grid.clear();
        self.piece = None;
        self.progression = Progression::new();
        self.grace = 0;
        self.drop_counter = 0;
        self.locked = 0;
        self.state = GameState::Playing;
        Ok(true)
    }

    /// One pass of the loop with an already sampled joystick axis.
    pub fn tick<B: DisplayBus>(
        &mut self,
        input: &InputArbiter,
        joystick: u16,
        screen: &mut Screen<B>,
    ) -> Result<(), B::Error> {
        if self.state != GameState::Playing {
            return Ok(());
        }

        if let Some(piece) = self.piece {
            if !collision::can_move_down(&self.grid, &piece) {
                self.grace += 1;
                if self.grace > self.config.grace_ticks() {
                    self.lock(screen)?;
                }
            }
        }

        match self.piece {
            None => self.spawn(input, screen)?,
            Some(piece) => {
                let piece = self.shift(piece, input, screen)?;
                self.descend(piece, input, screen)?;
            }
        }

        let bands = self.config.soft_drop();
        let soft = SoftDrop::from_sample(joystick, bands).increment(bands);
        self.drop_counter = self
            .drop_counter
            .saturating_add(self.config.drop_tick())
            .saturating_add(soft);
        Ok(())
    }

    /// Firmware entry point: tick while playing, otherwise wait for a touch.
    pub fn step<B: DisplayBus, A: AnalogInputs>(
        &mut self,
        input: &InputArbiter,
        analog: &mut A,
        screen: &mut Screen<B>,
    ) -> Result<(), B::Error> {
        match self.state {
            GameState::Playing => {
                let joystick = analog.joystick();
                self.tick(input, joystick, screen)
            }
            GameState::AwaitingStart | GameState::GameOver => {
                let touch = analog.touch();
                self.poll_start(input, touch, screen).map(|_| ())
            }
        }
    }

    fn lock<B: DisplayBus>(&mut self, screen: &mut Screen<B>) -> Result<(), B::Error> {
        self.piece = None;
        self.grace = 0;
        self.locked += 1;
        trace!("lock #{=u32}", self.locked);

        let report = self.progression.scan_and_clear(&mut self.grid);
        for mark in report.marks() {
            screen.draw_score_marker(mark)?;
        }
        if report.leveled_up() {
            screen.draw_level_color(self.progression.level_color())?;
        }
        if report.cleared() > 0 {
            screen.draw_full_board(&self.grid)?;
        }
        Ok(())
    }

    fn spawn<B: DisplayBus>(
        &mut self,
        input: &InputArbiter,
        screen: &mut Screen<B>,
    ) -> Result<(), B::Error> {
        let kind = PieceKind::from_sequence(input.sequence());
        let piece = Piece::spawn(kind, self.config.spawn_col());
        if !collision::fits(&self.grid, &piece) {
            self.state = GameState::GameOver;
            warn!(
                "game over at level {=u32} after {=u32} pieces",
                self.progression.level(),
                self.locked
            );
            return screen.draw_instruction();
        }
        collision::place(&mut self.grid, &piece);
        self.piece = Some(piece);
        debug!("spawn {}", kind);
        screen.draw_piece(&piece)
    }

    /// Apply the first pending intent that is legal, in left, right, rotate order.
    fn shift<B: DisplayBus>(
        &mut self,
        piece: Piece,
        input: &InputArbiter,
        screen: &mut Screen<B>,
    ) -> Result<Piece, B::Error> {
        let moves = collision::moves(&self.grid, &piece);
        let (intent, moved) = if moves.left && input.is_pending(Intent::Left) {
            (Intent::Left, piece.moved_left())
        } else if moves.right && input.is_pending(Intent::Right) {
            (Intent::Right, piece.moved_right())
        } else if moves.rotate && input.is_pending(Intent::Rotate) {
            (Intent::Rotate, piece.rotated())
        } else {
            return Ok(piece);
        };
        input.consume(intent);
        self.relocate(piece, moved, screen)?;
        Ok(moved)
    }

    fn descend<B: DisplayBus>(
        &mut self,
        piece: Piece,
        input: &InputArbiter,
        screen: &mut Screen<B>,
    ) -> Result<(), B::Error> {
        let threshold = self.config.drop_threshold_for(self.progression.level());
        if self.drop_counter <= threshold || !collision::can_move_down(&self.grid, &piece) {
            return Ok(());
        }
        self.relocate(piece, piece.moved_down(), screen)?;
        input.clear_all();
        input.advance_sequence();
        self.drop_counter = 0;
        Ok(())
    }

    fn relocate<B: DisplayBus>(
        &mut self,
        from: Piece,
        to: Piece,
        screen: &mut Screen<B>,
    ) -> Result<(), B::Error> {
        screen.erase_piece(&from)?;
        collision::remove(&mut self.grid, &from);
        collision::place(&mut self.grid, &to);
        self.piece = Some(to);
        screen.draw_piece(&to)
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use embedded_graphics::pixelcolor::Rgb565;

    use super::*;

    struct NullBus;

    impl DisplayBus for NullBus {
        type Error = Infallible;

        fn command(&mut self, _opcode: u8, _args: &[u8]) -> Result<(), Infallible> {
            Ok(())
        }

        fn fill(&mut self, _color: Rgb565, _count: u32) -> Result<(), Infallible> {
            Ok(())
        }
    }

    const PRESS: TouchSample = TouchSample { x: 500, y: 0 };

    fn started(config: GameConfig) -> (Game, InputArbiter, Screen<NullBus>) {
        let mut game = Game::new(config);
        let input = InputArbiter::new();
        let mut screen = Screen::new(NullBus);
        assert_eq!(game.poll_start(&input, PRESS, &mut screen), Ok(true));
        (game, input, screen)
    }

    #[test]
    fn light_touch_does_not_start() {
        let mut game = Game::new(GameConfig::default());
        let input = InputArbiter::new();
        let mut screen = Screen::new(NullBus);
        let light = TouchSample { x: 1000, y: 77 };
        assert_eq!(game.poll_start(&input, light, &mut screen), Ok(false));
        assert_eq!(game.state(), GameState::AwaitingStart);
    }

    #[test]
    fn first_tick_spawns_from_sequence() {
        let (mut game, input, mut screen) = started(GameConfig::default());
        input.press(Intent::Left);
        input.press(Intent::Left);
        // 1 + 29 + 29 = 59, 59 % 7 = 3
        game.tick(&input, 1023, &mut screen).unwrap();
        let piece = game.piece().unwrap();
        assert_eq!(piece.kind(), PieceKind::S);
        assert_eq!((piece.row(), piece.col(), piece.orientation()), (0, 4, 0));
        // Nothing moved on the spawn tick.
        assert!(input.is_pending(Intent::Left));
        assert_eq!(game.drop_counter(), 1);
    }

    #[test]
    fn one_intent_per_tick_in_priority_order() {
        let (mut game, input, mut screen) = started(GameConfig::default());
        game.tick(&input, 1023, &mut screen).unwrap();
        input.press(Intent::Rotate);
        input.press(Intent::Right);
        input.press(Intent::Left);

        game.tick(&input, 1023, &mut screen).unwrap();
        assert_eq!(game.piece().unwrap().col(), 3);
        assert!(input.is_pending(Intent::Right));
        assert!(input.is_pending(Intent::Rotate));

        game.tick(&input, 1023, &mut screen).unwrap();
        assert_eq!(game.piece().unwrap().col(), 4);

        game.tick(&input, 1023, &mut screen).unwrap();
        assert_eq!(game.piece().unwrap().orientation(), 1);
        assert!(!input.is_pending(Intent::Rotate));
    }

    #[test]
    fn soft_drop_feeds_the_counter() {
        let config = GameConfig::default().with_drop_threshold(u32::MAX);
        let (mut game, input, mut screen) = started(config);
        game.tick(&input, 50, &mut screen).unwrap();
        game.tick(&input, 150, &mut screen).unwrap();
        game.tick(&input, 300, &mut screen).unwrap();
        game.tick(&input, 900, &mut screen).unwrap();
        assert_eq!(game.drop_counter(), 4 + 24_000 + 500 + 100);
    }

    #[test]
    fn automatic_drop_clears_intents_and_advances_sequence() {
        let config = GameConfig::default().with_drop_threshold(0);
        let (mut game, input, mut screen) = started(config);
        game.tick(&input, 1023, &mut screen).unwrap();
        let spawned = game.piece().unwrap();

        // Blocked at the left wall, so the intent stays latched until the drop.
        let mut wall = game.piece().unwrap();
        while wall.col() > 0 {
            input.press(Intent::Left);
            game.tick(&input, 1023, &mut screen).unwrap();
            wall = game.piece().unwrap();
        }
        let sequence = input.sequence();
        let row = wall.row();
        input.press(Intent::Left);
        game.tick(&input, 1023, &mut screen).unwrap();

        let piece = game.piece().unwrap();
        assert_eq!(piece.kind(), spawned.kind());
        assert_eq!(piece.row(), row + 1);
        assert!(!input.is_pending(Intent::Left));
        assert_eq!(input.sequence(), sequence + 29 + 1);
        assert_eq!(game.drop_counter(), 1);
    }
}
