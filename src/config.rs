//! Game tuning.
//!
//! ```
//! use touchtris::GameConfig;
//!
//! let config = GameConfig::default().with_grace_ticks(4000).with_spawn_col(3);
//! assert_eq!(config.drop_threshold_for(1), 24_000);
//! ```

use crate::grid::COLS;

/// Joystick soft-drop bands. A lower sample means the stick is pulled
/// further; the first cutoff the sample is under picks the increment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SoftDropBands {
    pub full_below: u16,
    pub medium_below: u16,
    pub light_below: u16,
    pub full: u32,
    pub medium: u32,
    pub light: u32,
}

impl SoftDropBands {
    pub const fn new() -> Self {
        Self {
            full_below: 100,
            medium_below: 200,
            light_below: 455,
            full: 24_000,
            medium: 500,
            light: 100,
        }
    }
}

impl Default for SoftDropBands {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GameConfig {
    grace_ticks: u32,
    drop_threshold: u32,
    drop_level_step: u32,
    drop_tick: u32,
    soft_drop: SoftDropBands,
    touch_threshold: u16,
    touch_full_scale: u16,
    spawn_col: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    pub const fn new() -> Self {
        Self {
            grace_ticks: 9000,
            drop_threshold: 24_000,
            drop_level_step: 1166,
            drop_tick: 1,
            soft_drop: SoftDropBands::new(),
            touch_threshold: 100,
            touch_full_scale: 1023,
            spawn_col: 4,
        }
    }

    /// Ticks a piece may rest on something before it locks.
    pub const fn with_grace_ticks(mut self, ticks: u32) -> Self {
        self.grace_ticks = ticks;
        self
    }

    /// Drop threshold at level 1.
    pub const fn with_drop_threshold(mut self, threshold: u32) -> Self {
        self.drop_threshold = threshold;
        self
    }

    /// How much the threshold shrinks per level.
    pub const fn with_drop_level_step(mut self, step: u32) -> Self {
        self.drop_level_step = step;
        self
    }

    pub const fn with_drop_tick(mut self, tick: u32) -> Self {
        self.drop_tick = tick;
        self
    }

    pub const fn with_soft_drop(mut self, bands: SoftDropBands) -> Self {
        self.soft_drop = bands;
        self
    }

    pub const fn with_touch_threshold(mut self, threshold: u16) -> Self {
        self.touch_threshold = threshold;
        self
    }

    pub const fn with_touch_full_scale(mut self, full_scale: u16) -> Self {
        self.touch_full_scale = full_scale;
        self
    }

    /// Spawn column, clamped so the widest orientation-0 footprint fits.
    pub const fn with_spawn_col(mut self, col: u8) -> Self {
        let max = COLS as u8 - 3;
        self.spawn_col = if col > max { max } else { col };
        self
    }

    pub const fn grace_ticks(&self) -> u32 {
        self.grace_ticks
    }

    pub const fn drop_threshold(&self) -> u32 {
        self.drop_threshold
    }

    pub const fn drop_level_step(&self) -> u32 {
        self.drop_level_step
    }

    pub const fn drop_tick(&self) -> u32 {
        self.drop_tick
    }

    pub const fn soft_drop(&self) -> &SoftDropBands {
        &self.soft_drop
    }

    pub const fn touch_threshold(&self) -> u16 {
        self.touch_threshold
    }

    pub const fn touch_full_scale(&self) -> u16 {
        self.touch_full_scale
    }

    pub const fn spawn_col(&self) -> u8 {
        self.spawn_col
    }

    /// `drop_threshold - (level - 1) * drop_level_step`, floored at zero.
    pub const fn drop_threshold_for(&self, level: u32) -> u32 {
        let steps = level.saturating_sub(1);
        self.drop_threshold
            .saturating_sub(steps.saturating_mul(self.drop_level_step))
    }
}
