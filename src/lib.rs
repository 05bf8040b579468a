//! # touchtris
//!
//! Falling-block puzzle game for a 240×320 ILI9341 touch LCD, an analog
//! joystick and three buttons.
//!
//! The crate is split into a hardware-independent core and optional board
//! support:
//! - **Board model**: 14×10 occupancy grid and the seven table-driven pieces
//! - **Collision**: O(1) move and rotation legality from precomputed probe tables
//! - **Progression**: line clear, score marker stamps and levels
//! - **Input**: atomic intent flags and the piece-sequence accumulator
//! - **Render**: dirty-cell drawing over a raw display command bus
//! - **Game**: the cooperative loop tying it together
//!
//! With the `board` feature the crate also brings up an ESP32-S3 with the
//! display on SPI2, the buttons and the ADC1 joystick and touch panel.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! let peripherals = touchtris::init();
//! let resources = touchtris::split_resources!(peripherals);
//!
//! let mut screen: touchtris::Screen<touchtris::Lcd> = resources.display.into();
//! let buttons: touchtris::Buttons = resources.buttons.into();
//! let mut analog: touchtris::AnalogFrontEnd = resources.analog.into();
//!
//! static INPUT: touchtris::InputArbiter = touchtris::InputArbiter::new();
//! let mut game = touchtris::Game::new(touchtris::GameConfig::default());
//! game.show_title(&mut screen)?;
//! loop {
//!     game.step(&INPUT, &mut analog, &mut screen)?;
//! }
//! ```

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module below.
#[macro_use]
mod fmt;

pub mod collision;
pub mod config;
pub mod game;
pub mod grid;
pub mod input;
pub mod piece;
pub mod progression;
pub mod render;

#[cfg(feature = "board")]
mod analog;
#[cfg(feature = "board")]
mod buttons;
#[cfg(feature = "board")]
mod display;

#[cfg(feature = "board")]
pub use analog::AnalogFrontEnd;
#[cfg(feature = "board")]
pub use buttons::Buttons;
pub use config::{GameConfig, SoftDropBands};
#[cfg(feature = "board")]
pub use display::Lcd;
pub use game::{Game, GameState};
pub use grid::Grid;
pub use input::{AnalogInputs, InputArbiter, Intent, SoftDrop, TouchSample};
pub use piece::{Piece, PieceKind};
pub use progression::{ClearReport, Progression, ScoreMark, ScoreMarker};
pub use render::{DisplayBus, Screen};

#[cfg(feature = "board")]
use esp_hal::{assign_resources, clock::CpuClock};

/// StaticCell helper: allocates a value into a `static` exactly once.
#[cfg(feature = "board")]
#[macro_export]
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write($val);
        x
    }};
}

// ── Pin / peripheral assignments ────────────────────────────────────────────

#[cfg(feature = "board")]
assign_resources! {
    pub Resources<'d> {
        display: DisplayResources<'d> {
            dc: GPIO9,
            cs: GPIO10,
            mosi: GPIO11,
            sck: GPIO12,
            miso: GPIO13,
            rst: GPIO14,
            spi: SPI2,
            dma: DMA_CH0,
        },
        buttons: ButtonResources<'d> {
            rotate: GPIO15,
            left: GPIO16,
            right: GPIO17,
        },
        analog: AnalogResources<'d> {
            joystick: GPIO1,
            touch_yp: GPIO2,
            touch_xm: GPIO4,
            touch_xp: GPIO5,
            touch_ym: GPIO6,
            adc: ADC1,
        },
    }
}

// ── Board initialisation ────────────────────────────────────────────────────

/// Initialise the board and return the raw peripheral set.
///
/// Call this once at the top of your `main`. Then use [`split_resources!`] to
/// break the peripherals into typed resource groups.
#[cfg(feature = "board")]
#[must_use]
pub fn init() -> esp_hal::peripherals::Peripherals {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    esp_hal::init(config)
}

#[cfg(feature = "board")]
impl From<esp_hal::peripherals::Peripherals> for Resources<'_> {
    fn from(peripherals: esp_hal::peripherals::Peripherals) -> Self {
        split_resources!(peripherals)
    }
}
