//! Pointy-hex coordinate system used by the world crate.
//!
//! Rows are packed vertically at a fraction of the cell size and odd rows are
//! shifted half a cell to the right, which gives even rows one extra valid
//! column. All operations are pure functions of the grid description.

use bubble_barrage_core::{GridCoord, WorldPosition};

/// Vertical spacing between pointy-hex row centers as a fraction of cell size.
const ROW_PACKING_FACTOR: f32 = 0.86;

/// Describes the hex cell layout of the board.
#[derive(Clone, Debug, PartialEq)]
pub struct HexGrid {
    columns: u32,
    rows: u32,
    cell_size: f32,
    origin: WorldPosition,
}

impl HexGrid {
    /// Creates a new hex grid description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, cell_size: f32, origin: WorldPosition) -> Self {
        Self {
            columns,
            rows,
            cell_size,
            origin,
        }
    }

    /// Base number of columns; even rows gain one extra cell.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Diameter of a single cell expressed in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World position of cell (0, 0).
    #[must_use]
    pub const fn origin(&self) -> WorldPosition {
        self.origin
    }

    /// Vertical distance between adjacent row centers in world units.
    #[must_use]
    pub fn row_height(&self) -> f32 {
        self.cell_size * ROW_PACKING_FACTOR
    }

    /// Index of the topmost row, the anchor for ceiling connectivity.
    #[must_use]
    pub const fn top_row(&self) -> i32 {
        self.rows as i32 - 1
    }

    /// Number of valid columns in the provided row.
    #[must_use]
    pub fn row_width(&self, row: i32) -> u32 {
        if is_odd_row(row) {
            self.columns
        } else {
            self.columns + 1
        }
    }

    /// Reports whether the coordinate lies within the parity-aware bounds.
    #[must_use]
    pub fn is_valid(&self, coord: GridCoord) -> bool {
        let row_in_bounds = coord.row() >= 0 && coord.row() < self.rows as i32;
        row_in_bounds && coord.column() >= 0 && coord.column() < self.row_width(coord.row()) as i32
    }

    /// Computes the world position of the provided cell's center.
    ///
    /// Odd rows are offset half a cell to the right.
    #[must_use]
    pub fn grid_to_world(&self, coord: GridCoord) -> WorldPosition {
        let parity_offset = if is_odd_row(coord.row()) {
            self.cell_size * 0.5
        } else {
            0.0
        };
        WorldPosition::new(
            self.origin.x() + coord.column() as f32 * self.cell_size + parity_offset,
            self.origin.y() + coord.row() as f32 * self.row_height(),
        )
    }

    /// Rounds the provided position to the nearest cell coordinate.
    ///
    /// The row resolves first against the packed row height; the resolved
    /// row's parity then decides whether the half-cell offset applies to the
    /// column. Ties round away from zero. The result may be out of bounds and
    /// must be validated before use.
    #[must_use]
    pub fn world_to_grid(&self, position: WorldPosition) -> GridCoord {
        let dx = (position.x() - self.origin.x()) / self.cell_size;
        let dy = (position.y() - self.origin.y()) / self.row_height();
        let row = dy.round() as i32;
        let shifted = if is_odd_row(row) { dx - 0.5 } else { dx };
        GridCoord::new(shifted.round() as i32, row)
    }

    /// Enumerates the valid neighbors of the provided cell.
    ///
    /// Candidates come in the fixed order left, right, upper-left,
    /// upper-right, lower-left, lower-right; the diagonal columns depend on
    /// the row's parity. Candidates outside the grid are filtered out.
    pub fn neighbors(&self, coord: GridCoord) -> impl Iterator<Item = GridCoord> + '_ {
        let column = coord.column();
        let row = coord.row();
        let (diagonal_left, diagonal_right) = if is_odd_row(row) { (0, 1) } else { (-1, 0) };
        let candidates = [
            GridCoord::new(column - 1, row),
            GridCoord::new(column + 1, row),
            GridCoord::new(column + diagonal_left, row + 1),
            GridCoord::new(column + diagonal_right, row + 1),
            GridCoord::new(column + diagonal_left, row - 1),
            GridCoord::new(column + diagonal_right, row - 1),
        ];
        candidates
            .into_iter()
            .filter(|candidate| self.is_valid(*candidate))
    }

    /// Derives the grid that results from appending one row at the top.
    ///
    /// The origin drops one row height so existing coordinates keep their
    /// indices while their derived world positions shift down.
    #[must_use]
    pub fn descended(&self) -> Self {
        Self {
            columns: self.columns,
            rows: self.rows + 1,
            cell_size: self.cell_size,
            origin: WorldPosition::new(self.origin.x(), self.origin.y() - self.row_height()),
        }
    }
}

fn is_odd_row(row: i32) -> bool {
    row.rem_euclid(2) == 1
}
