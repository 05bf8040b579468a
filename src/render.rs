//! Dirty-cell rendering over a raw display command bus.
//!
//! Every primitive is a region write: column address set (`0x2A`), row
//! address set (`0x2B`), memory write (`0x2C`), then one colour repeated
//! `count` times. Board changes are drawn cell by cell; the renderer never
//! reads the grid on its own.

use embedded_graphics::{
    mono_font::{MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::{IntoStorage, Rgb565, raw::RawU16},
    prelude::*,
    primitives::Rectangle,
    text::{Baseline, Text},
};

use crate::{
    grid::{COLS, EMPTY, Grid, ROWS},
    piece::Piece,
    progression::ScoreMark,
};

/// Panel width in pixels.
pub const SCREEN_WIDTH: u16 = 240;
/// Panel height in pixels.
pub const SCREEN_HEIGHT: u16 = 320;

pub const CELL_SIZE: u16 = 20;
/// Pixel origin of cell `(0, 0)`.
pub const BOARD_X: u16 = 20;
pub const BOARD_Y: u16 = 30;

/// Pixels written into a cell's outer window.
pub const CELL_FILL_PIXELS: u32 = 440;
/// Pixels written into a cell's inset window. Empty cells open the window
/// and write nothing.
pub const INSET_FILL_PIXELS: u32 = 324;
/// Pixels written by a full-screen fill.
pub const SCREEN_FILL_PIXELS: u32 = 77_280;
/// Pixels written into the level swatch.
pub const LEVEL_SWATCH_PIXELS: u32 = 462;
const INSET: u16 = 2;

pub const CMD_COLUMN_ADDRESS_SET: u8 = 0x2A;
pub const CMD_ROW_ADDRESS_SET: u8 = 0x2B;
pub const CMD_MEMORY_WRITE: u8 = 0x2C;

/// Outer tier per cell value. Index 0 is the empty-cell tone.
pub const BORDER_PALETTE: [u16; 8] = [
    0x110F, 0x69D6, 0x24BD, 0x053D, 0x05D9, 0x3A96, 0x9135, 0x03D2,
];
/// Inset tier per cell value. Index 0 is the empty-cell tone.
pub const FILL_PALETTE: [u16; 8] = [
    0x110F, 0xAC3F, 0x7D7F, 0x7EBF, 0xAF5D, 0x8CFF, 0xD37C, 0xAEBB,
];

pub const SCREEN_COLOR: u16 = 0x5B57;

/// A fixed window and the number of pixels streamed into it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Frame {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
    pub color: u16,
    pub pixels: u32,
}

const fn frame(x0: u16, y0: u16, x1: u16, y1: u16, color: u16, pixels: u32) -> Frame {
    Frame {
        x0,
        y0,
        x1,
        y1,
        color,
        pixels,
    }
}

/// Nested play-field frames, outermost first.
pub const FRAMES: [Frame; 4] = [
    frame(0x11, 0x21, 0xDE, 0x138, 0x5316, 58_374),
    frame(0x12, 0x20, 0xDD, 0x137, 0x4AF4, 57_810),
    frame(0x13, 0x1F, 0xDC, 0x136, 0x42B2, 57_246),
    frame(0x14, 0x1E, 0xDB, 0x135, 0x110F, 56_682),
];

const LEVEL_SWATCH: (u16, u16, u16, u16) = (20, 5, 40, 25);
const SCORE_ORIGIN: (u16, u16) = (218, 23);
const INSTRUCTION: &str = "tap to start";
const INSTRUCTION_AT: (i32, i32) = (84, 60);

fn rgb(raw: u16) -> Rgb565 {
    Rgb565::from(RawU16::new(raw))
}

/// Raw command/data access to the display controller.
pub trait DisplayBus {
    type Error: core::fmt::Debug;

    /// Send `opcode` followed by its parameter bytes.
    fn command(&mut self, opcode: u8, args: &[u8]) -> Result<(), Self::Error>;

    /// Stream `count` copies of `color`, most significant byte first.
    fn fill(&mut self, color: Rgb565, count: u32) -> Result<(), Self::Error>;
}

impl<T: DisplayBus + ?Sized> DisplayBus for &mut T {
    type Error = T::Error;

    fn command(&mut self, opcode: u8, args: &[u8]) -> Result<(), Self::Error> {
        T::command(self, opcode, args)
    }

    fn fill(&mut self, color: Rgb565, count: u32) -> Result<(), Self::Error> {
        T::fill(self, color, count)
    }
}

/// The game's view of the panel.
pub struct Screen<B> {
    bus: B,
}

impl<B: DisplayBus> Screen<B> {
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn release(self) -> B {
        self.bus
    }

    /// Open the inclusive window `x0..=x1, y0..=y1` and write `count` pixels.
    pub fn fill_window(
        &mut self,
        (x0, y0): (u16, u16),
        (x1, y1): (u16, u16),
        color: Rgb565,
        count: u32,
    ) -> Result<(), B::Error> {
        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.bus.command(CMD_COLUMN_ADDRESS_SET, &[x0h, x0l, x1h, x1l])?;
        self.bus.command(CMD_ROW_ADDRESS_SET, &[y0h, y0l, y1h, y1l])?;
        self.bus.command(CMD_MEMORY_WRITE, &[])?;
        self.bus.fill(color, count)
    }

    /// Draw one board cell. `id` 0 opens the inset window without filling it.
    pub fn draw_cell(&mut self, col: usize, row: usize, id: u8) -> Result<(), B::Error> {
        debug_assert!(row < ROWS && col < COLS);
        let x = BOARD_X + CELL_SIZE * col as u16;
        let y = BOARD_Y + CELL_SIZE * row as u16;
        let id = usize::from(id);
        self.fill_window(
            (x, y),
            (x + CELL_SIZE - 1, y + CELL_SIZE - 1),
            rgb(BORDER_PALETTE[id]),
            CELL_FILL_PIXELS,
        )?;
        let inset = if id == usize::from(EMPTY) {
            0
        } else {
            INSET_FILL_PIXELS
        };
        self.fill_window(
            (x + INSET, y + INSET),
            (x + CELL_SIZE - 1 - INSET, y + CELL_SIZE - 1 - INSET),
            rgb(FILL_PALETTE[id]),
            inset,
        )
    }

    /// Redraw every cell, row by row.
    pub fn draw_full_board(&mut self, grid: &Grid) -> Result<(), B::Error> {
        for (row, cells) in grid.rows().enumerate() {
            for (col, &id) in cells.iter().enumerate() {
                self.draw_cell(col, row, id)?;
            }
        }
        Ok(())
    }

    pub fn draw_piece(&mut self, piece: &Piece) -> Result<(), B::Error> {
        let id = piece.kind().id();
        for (row, col) in piece.occupied_cells() {
            self.draw_cell(usize::from(col), usize::from(row), id)?;
        }
        Ok(())
    }

    pub fn erase_piece(&mut self, piece: &Piece) -> Result<(), B::Error> {
        for (row, col) in piece.occupied_cells() {
            self.draw_cell(usize::from(col), usize::from(row), EMPTY)?;
        }
        Ok(())
    }

    pub fn fill_screen(&mut self, color: Rgb565) -> Result<(), B::Error> {
        self.fill_window(
            (0, 0),
            (SCREEN_WIDTH - 1, SCREEN_HEIGHT - 1),
            color,
            SCREEN_FILL_PIXELS,
        )
    }

    /// Screen colour, then the shaded frames around the play field.
    pub fn draw_background(&mut self) -> Result<(), B::Error> {
        self.fill_screen(rgb(SCREEN_COLOR))?;
        for frame in FRAMES {
            self.fill_window(
                (frame.x0, frame.y0),
                (frame.x1, frame.y1),
                rgb(frame.color),
                frame.pixels,
            )?;
        }
        Ok(())
    }

    /// The level swatch in the top-left corner.
    pub fn draw_level_color(&mut self, color: Rgb565) -> Result<(), B::Error> {
        let (x0, y0, x1, y1) = LEVEL_SWATCH;
        self.fill_window((x0, y0), (x1, y1), color, LEVEL_SWATCH_PIXELS)
    }

    /// A 2×2 stamp, offset left and up from the score origin.
    pub fn draw_score_marker(&mut self, mark: &ScoreMark) -> Result<(), B::Error> {
        let x = SCORE_ORIGIN.0.saturating_sub(mark.marker.column);
        let y = SCORE_ORIGIN.1.saturating_sub(mark.marker.row);
        self.fill_window((x, y), (x + 1, y + 1), mark.color, 4)
    }

    /// Idle screen: plain background and the start prompt.
    pub fn draw_title(&mut self) -> Result<(), B::Error> {
        self.fill_screen(rgb(SCREEN_COLOR))?;
        self.draw_instruction()
    }

    /// "tap to start" with a one-pixel drop shadow.
    pub fn draw_instruction(&mut self) -> Result<(), B::Error> {
        let (x, y) = INSTRUCTION_AT;
        Text::with_baseline(
            INSTRUCTION,
            Point::new(x + 1, y + 1),
            MonoTextStyle::new(&FONT_6X10, Rgb565::BLACK),
            Baseline::Top,
        )
        .draw(self)?;
        Text::with_baseline(
            INSTRUCTION,
            Point::new(x, y),
            MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE),
            Baseline::Top,
        )
        .draw(self)?;
        Ok(())
    }
}

impl<B> OriginDimensions for Screen<B> {
    fn size(&self) -> Size {
        Size::new(u32::from(SCREEN_WIDTH), u32::from(SCREEN_HEIGHT))
    }
}

impl<B: DisplayBus> DrawTarget for Screen<B> {
    type Color = Rgb565;
    type Error = B::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if !bounds.contains(point) {
                continue;
            }
            let (x, y) = (point.x as u16, point.y as u16);
            self.fill_window((x, y), (x, y), color, 1)?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        self.fill_window(
            (area.top_left.x as u16, area.top_left.y as u16),
            (bottom_right.x as u16, bottom_right.y as u16),
            color,
            area.size.width * area.size.height,
        )
    }
}

/// Raw RGB565 value of `color`.
pub fn raw(color: Rgb565) -> u16 {
    color.into_storage()
}
