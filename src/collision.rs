//! Movement legality and placement for the live piece.
//!
//! The live piece is written into the grid, so a move only has to look at the
//! cells its target footprint would newly cover. Those *probe* cells are
//! precomputed for every identity, orientation and move at compile time; a
//! check is then a bound comparison against
//! [`ANCHOR_LIMITS`](crate::piece::ANCHOR_LIMITS) plus at most
//! four vacancy lookups.

use crate::{
    grid::{EMPTY, Grid},
    piece::{Footprint, ORIENTATIONS, Piece, SHAPES},
};

/// Cells, relative to the current anchor, that a move newly covers.
#[derive(Clone, Copy)]
struct Probe {
    cells: [(i8, i8); 4],
    len: usize,
}

impl Probe {
    const NONE: Self = Self {
        cells: [(0, 0); 4],
        len: 0,
    };

    fn cells(&self) -> &[(i8, i8)] {
        &self.cells[..self.len]
    }
}

#[derive(Clone, Copy)]
struct Probes {
    left: Probe,
    right: Probe,
    down: Probe,
    rotate: Probe,
}

const fn covers(footprint: &Footprint, row: i8, col: i8) -> bool {
    let mut i = 0;
    while i < 4 {
        if footprint[i].0 as i8 == row && footprint[i].1 as i8 == col {
            return true;
        }
        i += 1;
    }
    false
}

/// Cells of `to` shifted by `(dr, dc)` that `from` does not already cover.
const fn probe(from: &Footprint, to: &Footprint, dr: i8, dc: i8) -> Probe {
    let mut probe = Probe::NONE;
    let mut i = 0;
    while i < 4 {
        let row = to[i].0 as i8 + dr;
        let col = to[i].1 as i8 + dc;
        if !covers(from, row, col) {
            probe.cells[probe.len] = (row, col);
            probe.len += 1;
        }
        i += 1;
    }
    probe
}

static PROBES: [[Probes; ORIENTATIONS]; 7] = {
    let mut table = [[Probes {
        left: Probe::NONE,
        right: Probe::NONE,
        down: Probe::NONE,
        rotate: Probe::NONE,
    }; ORIENTATIONS]; 7];
    let mut kind = 0;
    while kind < 7 {
        let mut orientation = 0;
        while orientation < ORIENTATIONS {
            let from = &SHAPES[kind][orientation];
            let next = &SHAPES[kind][(orientation + 1) % ORIENTATIONS];
            table[kind][orientation] = Probes {
                left: probe(from, from, 0, -1),
                right: probe(from, from, 0, 1),
                down: probe(from, from, 1, 0),
                rotate: probe(from, next, 0, 0),
            };
            orientation += 1;
        }
        kind += 1;
    }
    table
};

fn probes(piece: &Piece) -> &'static Probes {
    &PROBES[piece.kind().index()][piece.orientation() as usize]
}

fn probe_clear(grid: &Grid, piece: &Piece, probe: &Probe) -> bool {
    let row = i16::from(piece.row());
    let col = i16::from(piece.col());
    probe
        .cells()
        .iter()
        .all(|&(dr, dc)| grid.is_vacant(row + i16::from(dr), col + i16::from(dc)))
}

/// Which of the four moves the live piece may make right now.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Moves {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub rotate: bool,
}

pub fn can_move_left(grid: &Grid, piece: &Piece) -> bool {
    piece.col() > 0 && probe_clear(grid, piece, &probes(piece).left)
}

pub fn can_move_right(grid: &Grid, piece: &Piece) -> bool {
    let (_, max_col) = piece.anchor_limit();
    piece.col() < max_col && probe_clear(grid, piece, &probes(piece).right)
}

pub fn can_move_down(grid: &Grid, piece: &Piece) -> bool {
    let (max_row, _) = piece.anchor_limit();
    piece.row() < max_row && probe_clear(grid, piece, &probes(piece).down)
}

/// Rotation keeps the anchor; the next orientation must fit where it stands.
pub fn can_rotate(grid: &Grid, piece: &Piece) -> bool {
    let (max_row, max_col) = piece.rotated().anchor_limit();
    piece.row() <= max_row
        && piece.col() <= max_col
        && probe_clear(grid, piece, &probes(piece).rotate)
}

pub fn moves(grid: &Grid, piece: &Piece) -> Moves {
    Moves {
        left: can_move_left(grid, piece),
        right: can_move_right(grid, piece),
        down: can_move_down(grid, piece),
        rotate: can_rotate(grid, piece),
    }
}

/// Whether the piece could be placed into `grid` as it stands: every cell on
/// the board and empty.
pub fn fits(grid: &Grid, piece: &Piece) -> bool {
    let (max_row, max_col) = piece.anchor_limit();
    piece.row() <= max_row
        && piece.col() <= max_col
        && piece
            .occupied_cells()
            .iter()
            .all(|&(r, c)| grid.cell_at(usize::from(r), usize::from(c)) == EMPTY)
}

/// Write the piece's identity into its cells.
pub fn place(grid: &mut Grid, piece: &Piece) {
    for (r, c) in piece.occupied_cells() {
        grid.set_cell(usize::from(r), usize::from(c), piece.kind().id());
    }
}

/// Empty the piece's cells.
pub fn remove(grid: &mut Grid, piece: &Piece) {
    for (r, c) in piece.occupied_cells() {
        grid.clear_cell(usize::from(r), usize::from(c));
    }
}
