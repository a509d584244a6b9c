//! Cell-resolution view of a tile grid and the path-code output matrix.
//!
//! Every tile `(i, j)` owns the 2×2 block of cells
//! `(2i + dr, 2j + dc)` for `dr, dc ∈ {0, 1}`.

use serde::{Deserialize, Serialize};

use crate::tile_grid::TileGrid;
use crate::types::{CellCoord, Direction, PlanError, TileCoord};

/// One of the four cells owned by a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// Top-left cell.
    NorthWest,
    /// Top-right cell.
    NorthEast,
    /// Bottom-left cell.
    SouthWest,
    /// Bottom-right cell.
    SouthEast,
}

impl Quadrant {
    /// All quadrants in row-major order.
    pub const ALL: [Self; 4] = [
        Self::NorthWest,
        Self::NorthEast,
        Self::SouthWest,
        Self::SouthEast,
    ];

    /// The two sides of the quadrant lying on the tile's outer border:
    /// `(vertical, horizontal)`.
    #[must_use]
    pub const fn outer_sides(self) -> (Direction, Direction) {
        match self {
            Self::NorthWest => (Direction::North, Direction::West),
            Self::NorthEast => (Direction::North, Direction::East),
            Self::SouthWest => (Direction::South, Direction::West),
            Self::SouthEast => (Direction::South, Direction::East),
        }
    }

    /// `(row, col)` offset of the quadrant inside its tile's 2×2 block.
    #[must_use]
    pub const fn offset(self) -> (usize, usize) {
        match self {
            Self::NorthWest => (0, 0),
            Self::NorthEast => (0, 1),
            Self::SouthWest => (1, 0),
            Self::SouthEast => (1, 1),
        }
    }

    /// The cell this quadrant of `tile` refers to.
    #[must_use]
    pub const fn cell_of(self, tile: TileCoord) -> CellCoord {
        let (dr, dc) = self.offset();
        let origin = tile.origin_cell();
        CellCoord::new(origin.row + dr, origin.col + dc)
    }
}

/// The shape a cell holds in the coverage route.
///
/// Drawn codes connect the midpoints of two of the cell's edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathCode {
    /// The owning tile does not exist.
    Absent,
    /// The tile exists but no path has been drawn yet.
    Empty,
    /// Straight, west to east.
    Horizontal,
    /// Straight, north to south.
    Vertical,
    /// Quarter turn joining the north and east midpoints.
    NorthEast,
    /// Quarter turn joining the north and west midpoints.
    NorthWest,
    /// Quarter turn joining the south and east midpoints.
    SouthEast,
    /// Quarter turn joining the south and west midpoints.
    SouthWest,
}

impl PathCode {
    /// Every drawn code.
    pub const DRAWN: [Self; 6] = [
        Self::Horizontal,
        Self::Vertical,
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    /// The pair of edge midpoints the route passes between, or `None`
    /// for [`Absent`](Self::Absent) and [`Empty`](Self::Empty).
    #[must_use]
    pub const fn exits(self) -> Option<[Direction; 2]> {
        match self {
            Self::Absent | Self::Empty => None,
            Self::Horizontal => Some([Direction::West, Direction::East]),
            Self::Vertical => Some([Direction::North, Direction::South]),
            Self::NorthEast => Some([Direction::North, Direction::East]),
            Self::NorthWest => Some([Direction::North, Direction::West]),
            Self::SouthEast => Some([Direction::South, Direction::East]),
            Self::SouthWest => Some([Direction::South, Direction::West]),
        }
    }

    /// The drawn code joining the midpoints `a` and `b`, in either order.
    ///
    /// Returns `None` when `a == b`.
    #[must_use]
    pub const fn from_exits(a: Direction, b: Direction) -> Option<Self> {
        use Direction::{East, North, South, West};
        match (a, b) {
            (West, East) | (East, West) => Some(Self::Horizontal),
            (North, South) | (South, North) => Some(Self::Vertical),
            (North, East) | (East, North) => Some(Self::NorthEast),
            (North, West) | (West, North) => Some(Self::NorthWest),
            (South, East) | (East, South) => Some(Self::SouthEast),
            (South, West) | (West, South) => Some(Self::SouthWest),
            (North, North) | (South, South) | (East, East) | (West, West) => None,
        }
    }

    /// Whether the route leaves this cell through its `side` midpoint.
    #[must_use]
    pub fn connects(self, side: Direction) -> bool {
        self.exits().is_some_and(|e| e.contains(&side))
    }

    /// Whether the code is a drawn path segment.
    #[must_use]
    pub const fn is_drawn(self) -> bool {
        self.exits().is_some()
    }

    /// Whether the code is a quarter turn.
    #[must_use]
    pub const fn is_turn(self) -> bool {
        matches!(
            self,
            Self::NorthEast | Self::NorthWest | Self::SouthEast | Self::SouthWest
        )
    }
}

/// A read-only 2× refinement of a [`TileGrid`].
#[derive(Debug, Clone, Copy)]
pub struct CellGrid<'a> {
    tiles: &'a TileGrid,
}

impl<'a> CellGrid<'a> {
    /// View `tiles` at cell resolution.
    #[must_use]
    pub const fn new(tiles: &'a TileGrid) -> Self {
        Self { tiles }
    }

    /// The underlying tile grid.
    #[must_use]
    pub const fn tiles(&self) -> &'a TileGrid {
        self.tiles
    }

    /// Number of cell rows (`2n`).
    #[must_use]
    pub const fn rows(&self) -> usize {
        2 * self.tiles.rows()
    }

    /// Number of cell columns (`2m`).
    #[must_use]
    pub const fn cols(&self) -> usize {
        2 * self.tiles.cols()
    }

    /// Whether cell `(x, y)` exists, i.e. its owning tile
    /// `(x / 2, y / 2)` is in bounds and exists.
    #[must_use]
    pub fn cell_exists(&self, x: usize, y: usize) -> bool {
        self.tiles.tile_exists(x / 2, y / 2)
    }

    /// Whether `cell` exists.
    #[must_use]
    pub fn exists(&self, cell: CellCoord) -> bool {
        self.cell_exists(cell.row, cell.col)
    }
}

/// One [`PathCode`] per cell of a [`CellGrid`], row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPathMatrix")]
pub struct PathMatrix {
    rows: usize,
    cols: usize,
    codes: Vec<PathCode>,
}

/// Unchecked serde form of [`PathMatrix`].
#[derive(Deserialize)]
struct RawPathMatrix {
    rows: usize,
    cols: usize,
    codes: Vec<PathCode>,
}

impl TryFrom<RawPathMatrix> for PathMatrix {
    type Error = PlanError;

    fn try_from(raw: RawPathMatrix) -> Result<Self, Self::Error> {
        if raw.rows.checked_mul(raw.cols) != Some(raw.codes.len()) {
            return Err(PlanError::InvalidDimensions(format!(
                "{} path codes for a {}x{} cell grid",
                raw.codes.len(),
                raw.rows,
                raw.cols
            )));
        }
        Ok(Self {
            rows: raw.rows,
            cols: raw.cols,
            codes: raw.codes,
        })
    }
}

impl PathMatrix {
    /// Allocate the matrix for `cells`: [`PathCode::Absent`] where the
    /// cell does not exist, [`PathCode::Empty`] otherwise.
    #[must_use]
    pub fn init(cells: &CellGrid<'_>) -> Self {
        let (rows, cols) = (cells.rows(), cells.cols());
        let codes = (0..rows)
            .flat_map(|x| (0..cols).map(move |y| (x, y)))
            .map(|(x, y)| {
                if cells.cell_exists(x, y) {
                    PathCode::Empty
                } else {
                    PathCode::Absent
                }
            })
            .collect();
        Self { rows, cols, codes }
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of cell columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    const fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.row < self.rows && cell.col < self.cols {
            Some(cell.row * self.cols + cell.col)
        } else {
            None
        }
    }

    /// The code at `cell`; out-of-bounds reads as [`PathCode::Absent`].
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> PathCode {
        self.index(cell)
            .and_then(|i| self.codes.get(i))
            .copied()
            .unwrap_or(PathCode::Absent)
    }

    /// One row of codes.
    ///
    /// Returns an empty slice for an out-of-bounds row.
    #[must_use]
    pub fn row(&self, x: usize) -> &[PathCode] {
        if x < self.rows {
            self.codes
                .get(x * self.cols..(x + 1) * self.cols)
                .unwrap_or_default()
        } else {
            &[]
        }
    }

    /// All cells paired with their codes, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, PathCode)> + '_ {
        self.codes
            .iter()
            .take(self.rows * self.cols)
            .enumerate()
            .map(|(i, &code)| (CellCoord::new(i / self.cols, i % self.cols), code))
    }

    /// How many cells hold `code`.
    #[must_use]
    pub fn count(&self, code: PathCode) -> usize {
        self.codes.iter().filter(|&&c| c == code).count()
    }

    /// Whether every existing cell has been drawn.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.codes.contains(&PathCode::Empty)
    }

    /// Draw `code` into an [`Empty`](PathCode::Empty) cell.
    ///
    /// Each existing cell is written exactly once.
    pub(crate) fn assign(&mut self, cell: CellCoord, code: PathCode) -> Result<(), PlanError> {
        let index = self.index(cell).ok_or_else(|| {
            PlanError::InternalConsistency(format!("cell {cell} is outside the path matrix"))
        })?;
        match (self.codes[index], code.is_drawn()) {
            (PathCode::Empty, true) => {
                self.codes[index] = code;
                Ok(())
            }
            (_, false) => Err(PlanError::InternalConsistency(format!(
                "refusing to write undrawn code {code:?} to cell {cell}"
            ))),
            (current, true) => Err(PlanError::InternalConsistency(format!(
                "cell {cell} already holds {current:?}"
            ))),
        }
    }
}
