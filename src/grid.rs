//! The fixed-size occupancy grid.

/// Number of rows on the board.
pub const ROWS: usize = 14;
/// Number of columns on the board.
pub const COLS: usize = 10;
/// Cell value for an unoccupied cell.
pub const EMPTY: u8 = 0;
/// Largest cell value (the highest piece identity).
pub const MAX_ID: u8 = 7;

/// Occupancy grid: `0` is empty, `1..=7` is the identity of the piece that
/// occupies the cell. Row 0 is the top of the board.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    cells: [[u8; COLS]; ROWS],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub const fn new() -> Self {
        Self {
            cells: [[EMPTY; COLS]; ROWS],
        }
    }

    /// Whether `(row, col)` names a cell on the board.
    pub const fn in_bounds(row: i16, col: i16) -> bool {
        row >= 0 && col >= 0 && (row as usize) < ROWS && (col as usize) < COLS
    }

    pub const fn cell_at(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    pub fn set_cell(&mut self, row: usize, col: usize, id: u8) {
        debug_assert!(id <= MAX_ID, "cell value out of range");
        self.cells[row][col] = id;
    }

    pub fn clear_cell(&mut self, row: usize, col: usize) {
        self.cells[row][col] = EMPTY;
    }

    /// In bounds and unoccupied. Off-board cells are never vacant.
    pub const fn is_vacant(&self, row: i16, col: i16) -> bool {
        Self::in_bounds(row, col) && self.cells[row as usize][col as usize] == EMPTY
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|&c| c != EMPTY)
    }

    /// Drop every row above `row` down by one, overwriting `row`, and empty
    /// the top row.
    pub fn collapse_row(&mut self, row: usize) {
        for r in (1..=row).rev() {
            self.cells[r] = self.cells[r - 1];
        }
        self.cells[0] = [EMPTY; COLS];
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        self.cells = [[EMPTY; COLS]; ROWS];
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(|&c| c == EMPTY)
    }

    pub fn row(&self, row: usize) -> &[u8; COLS] {
        &self.cells[row]
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8; COLS]> {
        self.cells.iter()
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().flatten().filter(|&&c| c != EMPTY).count()
    }
}
