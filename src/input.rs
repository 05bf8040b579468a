//! Input arbitration between edge-event producers and the game loop.
//!
//! Button handlers only ever call [`InputArbiter::press`]: they latch a sticky
//! intent flag and perturb the piece-sequence accumulator. Everything else is
//! done by the loop. The arbiter is built from atomics so it can live in a
//! `static` shared by both sides.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::config::SoftDropBands;

/// A player intent latched by a button press.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Intent {
    Left,
    Right,
    Rotate,
}

impl Intent {
    /// Amount a press adds to the piece-sequence accumulator.
    pub const fn entropy(self) -> u32 {
        match self {
            Self::Left => 29,
            Self::Right => 33,
            Self::Rotate => 18,
        }
    }
}

pub struct InputArbiter {
    left: AtomicBool,
    right: AtomicBool,
    rotate: AtomicBool,
    sequence: AtomicU32,
}

impl Default for InputArbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl InputArbiter {
    pub const SEQUENCE_START: u32 = 1;

    pub const fn new() -> Self {
        Self {
            left: AtomicBool::new(false),
            right: AtomicBool::new(false),
            rotate: AtomicBool::new(false),
            sequence: AtomicU32::new(Self::SEQUENCE_START),
        }
    }

    fn flag(&self, intent: Intent) -> &AtomicBool {
        match intent {
            Intent::Left => &self.left,
            Intent::Right => &self.right,
            Intent::Rotate => &self.rotate,
        }
    }

    /// Latch `intent`. Safe to call from any context.
    pub fn press(&self, intent: Intent) {
        self.flag(intent).store(true, Ordering::Release);
        self.sequence.fetch_add(intent.entropy(), Ordering::Relaxed);
    }

    pub fn is_pending(&self, intent: Intent) -> bool {
        self.flag(intent).load(Ordering::Acquire)
    }

    /// Clear `intent`, reporting whether it was pending.
    pub fn consume(&self, intent: Intent) -> bool {
        self.flag(intent).swap(false, Ordering::AcqRel)
    }

    pub fn clear_all(&self) {
        self.left.store(false, Ordering::Release);
        self.right.store(false, Ordering::Release);
        self.rotate.store(false, Ordering::Release);
    }

    pub fn sequence(&self) -> u32 {
        self.sequence.load(Ordering::Relaxed)
    }

    pub fn advance_sequence(&self) {
        self.sequence.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_sequence(&self, value: u32) {
        self.sequence.store(value, Ordering::Relaxed);
    }

    /// Clear every flag and restart the sequence accumulator.
    pub fn reset(&self) {
        self.clear_all();
        self.set_sequence(Self::SEQUENCE_START);
    }
}

/// How far the joystick is pulled toward soft drop.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SoftDrop {
    Full,
    Medium,
    Light,
    Resting,
}

impl SoftDrop {
    pub fn from_sample(sample: u16, bands: &SoftDropBands) -> Self {
        if sample < bands.full_below {
            Self::Full
        } else if sample < bands.medium_below {
            Self::Medium
        } else if sample < bands.light_below {
            Self::Light
        } else {
            Self::Resting
        }
    }

    /// Extra drop-counter advance for this band.
    pub fn increment(self, bands: &SoftDropBands) -> u32 {
        match self {
            Self::Full => bands.full,
            Self::Medium => bands.medium,
            Self::Light => bands.light,
            Self::Resting => 0,
        }
    }
}

/// One resistive touch reading: X+ and Y- sampled with the panel driven for Z.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchSample {
    pub x: u16,
    pub y: u16,
}

impl TouchSample {
    /// Untouched panel.
    pub const RELEASED: Self = Self { x: u16::MAX, y: 0 };

    /// `(full_scale - x) + y`.
    pub fn pressure(&self, full_scale: u16) -> u32 {
        u32::from(full_scale.saturating_sub(self.x)) + u32::from(self.y)
    }
}

/// Polled analog sources. Each call blocks for one conversion.
pub trait AnalogInputs {
    /// 10-bit joystick axis sample.
    fn joystick(&mut self) -> u16;

    fn touch(&mut self) -> TouchSample;
}
