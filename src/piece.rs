//! Piece identities and their per-orientation footprint tables.
//!
//! Every (identity, orientation) pair has its own fixed table of four
//! `(row, col)` offsets from the anchor, the top-left corner of the
//! footprint's bounding box. Shapes with 180° symmetry repeat the same two
//! tables; O repeats one.

use crate::grid::{COLS, ROWS};

/// `(row, col)` offset from a piece's anchor.
pub type Offset = (u8, u8);

/// The four cells a piece covers in one orientation.
pub type Footprint = [Offset; 4];

/// Number of orientations every piece cycles through.
pub const ORIENTATIONS: usize = 4;

/// The seven piece identities. The discriminant is the grid cell value and
/// the palette index.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PieceKind {
    O = 1,
    I = 2,
    Z = 3,
    S = 4,
    J = 5,
    L = 6,
    T = 7,
}

impl PieceKind {
    pub const ALL: [Self; 7] = [
        Self::O,
        Self::I,
        Self::Z,
        Self::S,
        Self::J,
        Self::L,
        Self::T,
    ];

    /// Grid cell value for this identity.
    pub const fn id(self) -> u8 {
        self as u8
    }

    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::O),
            2 => Some(Self::I),
            3 => Some(Self::Z),
            4 => Some(Self::S),
            5 => Some(Self::J),
            6 => Some(Self::L),
            7 => Some(Self::T),
            _ => None,
        }
    }

    /// Identity picked by the piece-sequence accumulator: `(acc % 7) + 1`.
    pub const fn from_sequence(acc: u32) -> Self {
        Self::ALL[(acc % 7) as usize]
    }

    pub(crate) const fn index(self) -> usize {
        self as usize - 1
    }
}

const fn same4(a: Footprint) -> [Footprint; ORIENTATIONS] {
    [a, a, a, a]
}

const fn pair(a: Footprint, b: Footprint) -> [Footprint; ORIENTATIONS] {
    [a, b, a, b]
}

/// Footprints indexed by `[identity - 1][orientation]`.
pub const SHAPES: [[Footprint; ORIENTATIONS]; 7] = [
    // O
    same4([(0, 0), (0, 1), (1, 0), (1, 1)]),
    // I: vertical, horizontal
    pair(
        [(0, 0), (1, 0), (2, 0), (3, 0)],
        [(0, 0), (0, 1), (0, 2), (0, 3)],
    ),
    // Z
    pair(
        [(0, 0), (0, 1), (1, 1), (1, 2)],
        [(0, 1), (1, 0), (1, 1), (2, 0)],
    ),
    // S
    pair(
        [(0, 1), (0, 2), (1, 0), (1, 1)],
        [(0, 0), (1, 0), (1, 1), (2, 1)],
    ),
    // J
    [
        [(0, 1), (1, 1), (2, 0), (2, 1)],
        [(0, 0), (1, 0), (1, 1), (1, 2)],
        [(0, 0), (0, 1), (1, 0), (2, 0)],
        [(0, 0), (0, 1), (0, 2), (1, 2)],
    ],
    // L
    [
        [(0, 0), (1, 0), (2, 0), (2, 1)],
        [(0, 0), (0, 1), (0, 2), (1, 0)],
        [(0, 0), (0, 1), (1, 1), (2, 1)],
        [(0, 2), (1, 0), (1, 1), (1, 2)],
    ],
    // T
    [
        [(0, 1), (1, 0), (1, 1), (1, 2)],
        [(0, 0), (1, 0), (1, 1), (2, 0)],
        [(0, 0), (0, 1), (0, 2), (1, 1)],
        [(0, 1), (1, 0), (1, 1), (2, 1)],
    ],
];

static FOOTPRINTS: [[Footprint; ORIENTATIONS]; 7] = SHAPES;

/// Bounding box `(height, width)` of a footprint.
pub const fn extent(footprint: &Footprint) -> (u8, u8) {
    let mut height = 0;
    let mut width = 0;
    let mut i = 0;
    while i < 4 {
        if footprint[i].0 + 1 > height {
            height = footprint[i].0 + 1;
        }
        if footprint[i].1 + 1 > width {
            width = footprint[i].1 + 1;
        }
        i += 1;
    }
    (height, width)
}

/// Largest legal anchor `(row, col)` for every identity and orientation.
pub const ANCHOR_LIMITS: [[(u8, u8); ORIENTATIONS]; 7] = {
    let mut table = [[(0, 0); ORIENTATIONS]; 7];
    let mut kind = 0;
    while kind < 7 {
        let mut orientation = 0;
        while orientation < ORIENTATIONS {
            let (height, width) = extent(&SHAPES[kind][orientation]);
            table[kind][orientation] = (ROWS as u8 - height, COLS as u8 - width);
            orientation += 1;
        }
        kind += 1;
    }
    table
};

/// The falling piece: identity, orientation and anchor.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Piece {
    kind: PieceKind,
    orientation: u8,
    row: u8,
    col: u8,
}

impl Piece {
    pub const fn new(kind: PieceKind, orientation: u8, row: u8, col: u8) -> Self {
        Self {
            kind,
            orientation: orientation % ORIENTATIONS as u8,
            row,
            col,
        }
    }

    /// A fresh piece at the top of the board in orientation 0.
    pub const fn spawn(kind: PieceKind, col: u8) -> Self {
        Self::new(kind, 0, 0, col)
    }

    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    pub const fn orientation(&self) -> u8 {
        self.orientation
    }

    pub const fn row(&self) -> u8 {
        self.row
    }

    pub const fn col(&self) -> u8 {
        self.col
    }

    pub fn footprint(&self) -> &'static Footprint {
        &FOOTPRINTS[self.kind.index()][self.orientation as usize]
    }

    /// `(height, width)` of the current orientation's bounding box.
    pub fn extent(&self) -> (u8, u8) {
        extent(self.footprint())
    }

    /// Largest anchor `(row, col)` that keeps the current orientation on the board.
    pub const fn anchor_limit(&self) -> (u8, u8) {
        ANCHOR_LIMITS[self.kind.index()][self.orientation as usize]
    }

    /// Absolute `(row, col)` of the four cells the piece covers.
    pub fn occupied_cells(&self) -> [(u8, u8); 4] {
        let footprint = *self.footprint();
        footprint.map(|(dr, dc)| (self.row + dr, self.col + dc))
    }

    pub const fn moved_left(self) -> Self {
        Self {
            col: self.col.saturating_sub(1),
            ..self
        }
    }

    pub const fn moved_right(self) -> Self {
        Self {
            col: self.col + 1,
            ..self
        }
    }

    pub const fn moved_down(self) -> Self {
        Self {
            row: self.row + 1,
            ..self
        }
    }

    /// Next orientation at the same anchor.
    pub const fn rotated(self) -> Self {
        Self::new(self.kind, self.orientation + 1, self.row, self.col)
    }
}
