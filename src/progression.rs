//! Line clearing, the score marker and level progression.

use embedded_graphics::pixelcolor::{Rgb565, raw::RawU16};

use crate::grid::{Grid, ROWS};

/// Level colours, indexed by `(level - 1) % 7`.
pub const LEVEL_PALETTE: [u16; 7] = [0xAEBB, 0xAF5D, 0x7EBF, 0x7D7F, 0x8CFF, 0xAC3F, 0xD37C];

/// Lines per decade: after this many in a level the marker starts a new column.
pub const DECADE: u32 = 10;

pub fn level_color(level: u32) -> Rgb565 {
    let index = (level.max(1) - 1) as usize % LEVEL_PALETTE.len();
    Rgb565::from(RawU16::new(LEVEL_PALETTE[index]))
}

/// Pixel offset of the next score stamp, measured from the top-right corner
/// of the score area.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScoreMarker {
    pub column: u16,
    pub row: u16,
}

/// One 2×2 score stamp to draw.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ScoreMark {
    pub marker: ScoreMarker,
    pub color: Rgb565,
}

/// What one [`Progression::scan_and_clear`] pass did.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ClearReport {
    cleared: usize,
    marks: [Option<ScoreMark>; ROWS],
    leveled_up: bool,
}

impl ClearReport {
    const fn empty() -> Self {
        Self {
            cleared: 0,
            marks: [None; ROWS],
            leveled_up: false,
        }
    }

    pub const fn cleared(&self) -> usize {
        self.cleared
    }

    /// Score stamps in the order they were earned.
    pub fn marks(&self) -> impl Iterator<Item = &ScoreMark> {
        self.marks.iter().flatten()
    }

    pub const fn leveled_up(&self) -> bool {
        self.leveled_up
    }

    fn push(&mut self, mark: ScoreMark) {
        self.marks[self.cleared] = Some(mark);
        self.cleared += 1;
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Progression {
    level: u32,
    lines_in_level: u32,
    marker: ScoreMarker,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    pub const fn new() -> Self {
        Self {
            level: 1,
            lines_in_level: 0,
            marker: ScoreMarker { column: 0, row: 0 },
        }
    }

    pub const fn level(&self) -> u32 {
        self.level
    }

    pub const fn lines_in_level(&self) -> u32 {
        self.lines_in_level
    }

    pub const fn marker(&self) -> ScoreMarker {
        self.marker
    }

    pub fn level_color(&self) -> Rgb565 {
        level_color(self.level)
    }

    /// Remove every full row, top to bottom, and advance the counters once per
    /// removed row.
    pub fn scan_and_clear(&mut self, grid: &mut Grid) -> ClearReport {
        let mut report = ClearReport::empty();
        for row in 0..ROWS {
            if !grid.is_row_full(row) {
                continue;
            }
            grid.collapse_row(row);
            report.push(self.record_line());
            if self.lines_in_level == 0 {
                report.leveled_up = true;
            }
        }
        if report.cleared > 0 {
            info!(
                "cleared {=usize} rows, level {=u32}, {=u32} lines",
                report.cleared, self.level, self.lines_in_level
            );
        }
        report
    }

    fn record_line(&mut self) -> ScoreMark {
        let mark = ScoreMark {
            marker: self.marker,
            color: self.level_color(),
        };
        self.lines_in_level += 1;
        self.marker.row += 2;
        if self.lines_in_level % DECADE == 0 {
            self.marker.column += 2;
            self.marker.row = 0;
        }
        if self.lines_in_level == self.level * DECADE {
            self.level += 1;
            self.lines_in_level = 0;
            info!("level {=u32}", self.level);
        }
        mark
    }
}
