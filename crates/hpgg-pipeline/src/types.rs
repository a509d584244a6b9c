//! Shared types for the hpgg coverage planner.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A compass direction on the grid.
///
/// Rows grow toward [`South`](Self::South), columns grow toward
/// [`East`](Self::East).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward row 0.
    North,
    /// Toward the last row.
    South,
    /// Toward the last column.
    East,
    /// Toward column 0.
    West,
}

impl Direction {
    /// All four directions in flag order.
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// `(row, col)` step taken when moving one unit in this direction.
    #[must_use]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::North => (-1, 0),
            Self::South => (1, 0),
            Self::East => (0, 1),
            Self::West => (0, -1),
        }
    }

    /// The single-direction [`Directions`] set.
    #[must_use]
    pub const fn flag(self) -> Directions {
        match self {
            Self::North => Directions::NORTH,
            Self::South => Directions::SOUTH,
            Self::East => Directions::EAST,
            Self::West => Directions::WEST,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        };
        f.write_str(name)
    }
}

bitflags::bitflags! {
    /// A set of compass directions.
    ///
    /// Used for the tree edges leaving a tile: the set's size is the
    /// tile's degree in the spanning skeleton.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Directions: u8 {
        /// Edge toward the tile above.
        const NORTH = 1;
        /// Edge toward the tile below.
        const SOUTH = 1 << 1;
        /// Edge toward the tile to the right.
        const EAST = 1 << 2;
        /// Edge toward the tile to the left.
        const WEST = 1 << 3;
    }
}

impl Directions {
    /// Number of directions in the set (0 to 4).
    #[must_use]
    pub const fn degree(self) -> u32 {
        self.bits().count_ones()
    }

    /// Whether the set contains `direction`.
    #[must_use]
    pub const fn has(self, direction: Direction) -> bool {
        self.contains(direction.flag())
    }

    /// Iterate the contained directions in [`Direction::ALL`] order.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.has(*d))
    }
}

/// Step `(row, col)` one unit toward `direction`, staying inside
/// `rows × cols`.
fn step(
    row: usize,
    col: usize,
    direction: Direction,
    rows: usize,
    cols: usize,
) -> Option<(usize, usize)> {
    let (dr, dc) = direction.offset();
    let row = row.checked_add_signed(dr)?;
    let col = col.checked_add_signed(dc)?;
    (row < rows && col < cols).then_some((row, col))
}

/// Coordinates of a tile in the coarse grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    /// Row index, 0 at the north edge.
    pub row: usize,
    /// Column index, 0 at the west edge.
    pub col: usize,
}

impl TileCoord {
    /// Create a new tile coordinate.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The neighbouring tile toward `direction`, if it lies inside a
    /// `rows × cols` grid.
    #[must_use]
    pub fn neighbor(self, direction: Direction, rows: usize, cols: usize) -> Option<Self> {
        step(self.row, self.col, direction, rows, cols).map(|(row, col)| Self::new(row, col))
    }

    /// The direction leading from `self` to a 4-adjacent `other`.
    ///
    /// Returns `None` when the two tiles are not 4-adjacent.
    #[must_use]
    pub fn direction_to(self, other: Self) -> Option<Direction> {
        Direction::ALL.into_iter().find(|&d| {
            let (dr, dc) = d.offset();
            self.row.checked_add_signed(dr) == Some(other.row)
                && self.col.checked_add_signed(dc) == Some(other.col)
        })
    }

    /// Whether the tile touches the outer border of a `rows × cols` grid.
    #[must_use]
    pub const fn is_border(self, rows: usize, cols: usize) -> bool {
        self.row == 0 || self.col == 0 || self.row + 1 == rows || self.col + 1 == cols
    }

    /// The north-west cell owned by this tile.
    #[must_use]
    pub const fn origin_cell(self) -> CellCoord {
        CellCoord::new(2 * self.row, 2 * self.col)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Coordinates of a cell in the 2× refined grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    /// Row index, 0 at the north edge.
    pub row: usize,
    /// Column index, 0 at the west edge.
    pub col: usize,
}

impl CellCoord {
    /// Create a new cell coordinate.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The tile owning this cell.
    #[must_use]
    pub const fn tile(self) -> TileCoord {
        TileCoord::new(self.row / 2, self.col / 2)
    }

    /// The neighbouring cell toward `direction`, if it lies inside a
    /// `rows × cols` cell grid.
    #[must_use]
    pub fn neighbor(self, direction: Direction, rows: usize, cols: usize) -> Option<Self> {
        step(self.row, self.col, direction, rows, cols).map(|(row, col)| Self::new(row, col))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Text symbol for an existing tile.
pub const TILE_SYMBOL: char = 'x';

/// Text symbol for a hole.
pub const HOLE_SYMBOL: char = '.';

/// A rectangular, row-major boolean matrix of tile existence.
///
/// Unlike [`TileGrid`](crate::TileGrid) this makes no connectivity
/// promise: it is what text parsing and raw input produce before
/// validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct ExistenceMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

/// Unchecked serde form of [`ExistenceMatrix`].
#[derive(Deserialize)]
struct RawMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl TryFrom<RawMatrix> for ExistenceMatrix {
    type Error = PlanError;

    fn try_from(raw: RawMatrix) -> Result<Self, Self::Error> {
        let expected = raw.rows.checked_mul(raw.cols);
        if expected != Some(raw.cells.len()) {
            return Err(PlanError::InvalidDimensions(format!(
                "{} cells for a {}x{} matrix",
                raw.cells.len(),
                raw.rows,
                raw.cols
            )));
        }
        Ok(Self {
            rows: raw.rows,
            cols: raw.cols,
            cells: raw.cells,
        })
    }
}

impl ExistenceMatrix {
    /// A `rows × cols` matrix with every entry set to `value`.
    #[must_use]
    pub fn filled(rows: usize, cols: usize, value: bool) -> Self {
        Self {
            rows,
            cols,
            cells: vec![value; rows * cols],
        }
    }

    /// Build a matrix from nested rows.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidDimensions`] if the rows do not all
    /// have the same length.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, PlanError> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(PlanError::InvalidDimensions(format!(
                "row {i} has {} columns, expected {cols}",
                row.len()
            )));
        }
        let height = rows.len();
        Ok(Self {
            rows: height,
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major index of `coord`, if it is in bounds.
    #[must_use]
    pub const fn index(&self, coord: TileCoord) -> Option<usize> {
        if coord.row < self.rows && coord.col < self.cols {
            Some(coord.row * self.cols + coord.col)
        } else {
            None
        }
    }

    /// Whether the tile at `coord` exists. Out-of-bounds is `false`.
    #[must_use]
    pub fn get(&self, coord: TileCoord) -> bool {
        self.index(coord).is_some_and(|i| self.cells[i])
    }

    /// Set the existence flag at `coord`. Out-of-bounds writes are ignored.
    pub(crate) fn set(&mut self, coord: TileCoord, value: bool) {
        if let Some(i) = self.index(coord) {
            self.cells[i] = value;
        }
    }

    /// Number of existing tiles.
    #[must_use]
    pub fn existing_count(&self) -> usize {
        self.cells.iter().filter(|&&e| e).count()
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| TileCoord::new(row, col)))
    }

    /// Existing tile coordinates in row-major order.
    pub fn existing(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.coords().filter(|&c| self.get(c))
    }

    /// Existing 4-neighbours of `coord`, with the direction leading to each.
    pub fn neighbors(&self, coord: TileCoord) -> impl Iterator<Item = (Direction, TileCoord)> + '_ {
        Direction::ALL.into_iter().filter_map(move |d| {
            coord
                .neighbor(d, self.rows, self.cols)
                .filter(|&n| self.get(n))
                .map(|n| (d, n))
        })
    }

    /// Number of 4-connected components of existing tiles.
    ///
    /// Breadth-first flood fill from every not-yet-visited existing tile.
    #[must_use]
    pub fn components(&self) -> usize {
        let mut visited = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        let mut components = 0;

        for start in self.existing() {
            let Some(start_idx) = self.index(start) else {
                continue;
            };
            if visited[start_idx] {
                continue;
            }
            components += 1;
            visited[start_idx] = true;
            queue.push_back(start);

            while let Some(current) = queue.pop_front() {
                for (_, next) in self.neighbors(current) {
                    if let Some(idx) = self.index(next)
                        && !visited[idx]
                    {
                        visited[idx] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        components
    }

    /// Whether the existing tiles form a single 4-connected component.
    ///
    /// An all-absent matrix is vacuously connected.
    #[must_use]
    pub fn check_connected(&self) -> bool {
        self.components() <= 1
    }

    /// Copy the matrix out as nested rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.cells.chunks(self.cols).map(<[bool]>::to_vec).collect()
    }
}

/// Parses the textual grid format: one row per line, [`TILE_SYMBOL`] for
/// an existing tile and [`HOLE_SYMBOL`] for a hole. Whitespace inside a
/// row is ignored, as are blank lines before the first and after the last
/// row.
impl FromStr for ExistenceMatrix {
    type Err = PlanError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = text.lines().collect();
        let is_blank = |line: &&str| line.trim().is_empty();
        let first = lines.iter().position(|l| !is_blank(l)).unwrap_or(lines.len());
        let last = lines.iter().rposition(|l| !is_blank(l)).map_or(first, |i| i + 1);

        let mut rows = Vec::with_capacity(last - first);
        for (row, line) in lines[first..last].iter().enumerate() {
            let parsed = line
                .chars()
                .filter(|c| !c.is_whitespace())
                .enumerate()
                .map(|(col, symbol)| match symbol {
                    TILE_SYMBOL => Ok(true),
                    HOLE_SYMBOL => Ok(false),
                    other => Err(PlanError::InvalidSymbol {
                        row,
                        col,
                        symbol: other,
                    }),
                })
                .collect::<Result<Vec<bool>, PlanError>>()?;
            rows.push(parsed);
        }
        Self::from_rows(rows)
    }
}

/// Renders rows of space-separated [`TILE_SYMBOL`] / [`HOLE_SYMBOL`].
impl fmt::Display for ExistenceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let line: Vec<String> = (0..self.cols)
                .map(|col| {
                    if self.get(TileCoord::new(row, col)) {
                        TILE_SYMBOL.to_string()
                    } else {
                        HOLE_SYMBOL.to_string()
                    }
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Shape family of a randomly generated grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridCategory {
    /// A full rectangle, no holes.
    #[default]
    Full,
    /// Every hole is carved from the periphery.
    PeripheryHoles,
    /// Half of the hole budget on the periphery, half in the interior.
    Holes,
}

/// Recipe for a randomly generated tile grid.
///
/// Holes are placed periphery first, interior second, then the grid is
/// optionally narrowed. The same config always produces the same grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of tile rows.
    pub rows: usize,
    /// Number of tile columns.
    pub cols: usize,
    /// Holes removed one at a time from the current periphery.
    pub periphery_holes: usize,
    /// Holes removed in one batch from the interior.
    pub interior_holes: usize,
    /// Clear every non-periphery tile after placing holes.
    pub narrow: bool,
    /// Seed for the `ChaCha8` generator driving hole placement.
    pub seed: u64,
}

impl GridConfig {
    /// Default number of tile rows.
    pub const DEFAULT_ROWS: usize = 5;
    /// Default number of tile columns.
    pub const DEFAULT_COLS: usize = 7;
    /// Default periphery hole count.
    pub const DEFAULT_PERIPHERY_HOLES: usize = 5;
    /// Default interior hole count.
    pub const DEFAULT_INTERIOR_HOLES: usize = 3;
    /// Default generator seed.
    pub const DEFAULT_SEED: u64 = 0;

    /// Build a config from a [`GridCategory`] and a total hole budget.
    ///
    /// A non-full category with a zero budget degrades to a full grid;
    /// [`GridCategory::Holes`] splits the budget in two halves (an odd
    /// hole is dropped).
    #[must_use]
    pub const fn for_category(
        rows: usize,
        cols: usize,
        category: GridCategory,
        holes: usize,
        seed: u64,
    ) -> Self {
        let (periphery_holes, interior_holes) = match category {
            GridCategory::Full => (0, 0),
            GridCategory::PeripheryHoles => (holes, 0),
            GridCategory::Holes => (holes / 2, holes / 2),
        };
        Self {
            rows,
            cols,
            periphery_holes,
            interior_holes,
            narrow: false,
            seed,
        }
    }

    /// The category this recipe falls into.
    #[must_use]
    pub const fn category(&self) -> GridCategory {
        match (self.periphery_holes, self.interior_holes) {
            (0, 0) => GridCategory::Full,
            (_, 0) => GridCategory::PeripheryHoles,
            _ => GridCategory::Holes,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: Self::DEFAULT_ROWS,
            cols: Self::DEFAULT_COLS,
            periphery_holes: Self::DEFAULT_PERIPHERY_HOLES,
            interior_holes: Self::DEFAULT_INTERIOR_HOLES,
            narrow: false,
            seed: Self::DEFAULT_SEED,
        }
    }
}

/// How the spanning skeleton is extracted from the tile adjacency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpanningStrategy {
    /// Union-find over edges in lexicographic (row-major, east before
    /// south) order. Deterministic.
    #[default]
    Kruskal,
    /// Union-find over a seeded shuffle of the edges.
    RandomizedKruskal,
    /// Depth-first search tree rooted at the first existing tile.
    DepthFirst,
}

impl fmt::Display for SpanningStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Kruskal => "kruskal",
            Self::RandomizedKruskal => "randomized-kruskal",
            Self::DepthFirst => "depth-first",
        };
        f.write_str(name)
    }
}

/// Configuration for the planning pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Spanning tree extraction strategy.
    pub strategy: SpanningStrategy,
    /// Seed for strategies that draw random numbers.
    pub seed: u64,
}

/// Errors that can occur while building grids or plans.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum PlanError {
    /// The existing tiles would form more than one 4-connected component.
    #[error("tile grid is disconnected ({components} components)")]
    DisconnectedGrid {
        /// Number of components found.
        components: usize,
    },

    /// Ragged input, or an operation needing a tile where none is left.
    #[error("invalid grid dimensions: {0}")]
    InvalidDimensions(String),

    /// A text grid contained an unknown symbol.
    #[error("invalid grid symbol {symbol:?} at row {row}, column {col}")]
    InvalidSymbol {
        /// Row of the offending symbol.
        row: usize,
        /// Column of the offending symbol (whitespace excluded).
        col: usize,
        /// The symbol itself.
        symbol: char,
    },

    /// A skeleton or path code invariant was broken. Always a bug.
    #[error("internal consistency error: {0}")]
    InternalConsistency(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DISCONNECTED: &str = "
        x x x x x x .
        x x x . x x x
        . x x x . . x
        x . x x . x x
        x x . x x x x
    ";

    const DISCONNECTED_2: &str = "
        x x x x . x x
        x . x . x x .
        . x . x x x x
        x x x x x x x
        x . x x x x .
    ";

    const CONNECTED: &str = "
        . . x x x x x
        x x . x x . x
        . x x x . x .
        x x x x x x x
        x x x . x x x
    ";

    // --- Direction tests ---

    #[test]
    fn opposite_is_involution() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_ne!(d.opposite(), d);
        }
    }

    #[test]
    fn offsets_cancel_with_opposite() {
        for d in Direction::ALL {
            let (a, b) = d.offset();
            let (c, e) = d.opposite().offset();
            assert_eq!((a + c, b + e), (0, 0));
        }
    }

    #[test]
    fn directions_degree_and_iteration() {
        let set = Directions::NORTH | Directions::WEST;
        assert_eq!(set.degree(), 2);
        assert!(set.has(Direction::North));
        assert!(!set.has(Direction::East));
        assert_eq!(
            set.directions().collect::<Vec<_>>(),
            vec![Direction::North, Direction::West]
        );
        assert_eq!(Directions::all().degree(), 4);
        assert_eq!(Directions::empty().degree(), 0);
    }

    // --- Coordinate tests ---

    #[test]
    fn tile_neighbor_respects_bounds() {
        let corner = TileCoord::new(0, 0);
        assert_eq!(corner.neighbor(Direction::North, 3, 3), None);
        assert_eq!(corner.neighbor(Direction::West, 3, 3), None);
        assert_eq!(
            corner.neighbor(Direction::South, 3, 3),
            Some(TileCoord::new(1, 0))
        );
        assert_eq!(TileCoord::new(2, 2).neighbor(Direction::East, 3, 3), None);
    }

    #[test]
    fn direction_to_adjacent_and_far() {
        let a = TileCoord::new(1, 1);
        assert_eq!(a.direction_to(TileCoord::new(0, 1)), Some(Direction::North));
        assert_eq!(a.direction_to(TileCoord::new(1, 2)), Some(Direction::East));
        assert_eq!(a.direction_to(TileCoord::new(2, 2)), None);
        assert_eq!(a.direction_to(a), None);
    }

    #[test]
    fn cell_maps_back_to_tile() {
        let tile = TileCoord::new(3, 4);
        let origin = tile.origin_cell();
        assert_eq!(origin, CellCoord::new(6, 8));
        assert_eq!(CellCoord::new(7, 9).tile(), tile);
    }

    // --- ExistenceMatrix tests ---

    #[test]
    fn parse_text_grid() {
        let matrix: ExistenceMatrix = CONNECTED.parse().unwrap();
        assert_eq!(matrix.rows(), 5);
        assert_eq!(matrix.cols(), 7);
        assert!(!matrix.get(TileCoord::new(0, 0)));
        assert!(matrix.get(TileCoord::new(0, 2)));
        assert!(!matrix.get(TileCoord::new(4, 3)));
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let result: Result<ExistenceMatrix, _> = "x x x\nx x".parse();
        assert!(matches!(result, Err(PlanError::InvalidDimensions(_))));
    }

    #[test]
    fn parse_rejects_unknown_symbol() {
        let result: Result<ExistenceMatrix, _> = "x x\nx o".parse();
        assert_eq!(
            result.unwrap_err(),
            PlanError::InvalidSymbol {
                row: 1,
                col: 1,
                symbol: 'o'
            }
        );
    }

    #[test]
    fn parse_empty_text_is_empty_matrix() {
        let matrix: ExistenceMatrix = "\n  \n".parse().unwrap();
        assert_eq!(matrix.rows(), 0);
        assert_eq!(matrix.existing_count(), 0);
        assert!(matrix.check_connected());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let matrix: ExistenceMatrix = CONNECTED.parse().unwrap();
        let text = matrix.to_string();
        assert!(text.starts_with(". . x x x x x\n"));
        let reparsed: ExistenceMatrix = text.parse().unwrap();
        assert_eq!(matrix, reparsed);
    }

    #[test]
    fn disconnected_examples_are_detected() {
        let matrix: ExistenceMatrix = DISCONNECTED.parse().unwrap();
        assert!(!matrix.check_connected());
        assert_eq!(matrix.components(), 2);

        let matrix: ExistenceMatrix = DISCONNECTED_2.parse().unwrap();
        assert!(!matrix.check_connected());
    }

    #[test]
    fn connected_example_is_connected() {
        let matrix: ExistenceMatrix = CONNECTED.parse().unwrap();
        assert!(matrix.check_connected());
        assert_eq!(matrix.components(), 1);
    }

    #[test]
    fn all_absent_is_vacuously_connected() {
        let matrix = ExistenceMatrix::filled(3, 4, false);
        assert_eq!(matrix.components(), 0);
        assert!(matrix.check_connected());
    }

    #[test]
    fn diagonal_tiles_are_not_connected() {
        let matrix = ExistenceMatrix::from_rows(vec![vec![true, false], vec![false, true]]).unwrap();
        assert!(!matrix.check_connected());
    }

    #[test]
    fn to_rows_matches_from_rows() {
        let rows = vec![vec![true, false, true], vec![true, true, true]];
        let matrix = ExistenceMatrix::from_rows(rows.clone()).unwrap();
        assert_eq!(matrix.to_rows(), rows);
    }

    #[test]
    fn deserialize_checks_cell_count() {
        let matrix: ExistenceMatrix =
            serde_json::from_str(r#"{"rows":1,"cols":2,"cells":[true,false]}"#).unwrap();
        assert_eq!(matrix.existing_count(), 1);

        let short = serde_json::from_str::<ExistenceMatrix>(r#"{"rows":2,"cols":2,"cells":[true]}"#);
        assert!(short.is_err());
    }

    // --- Config tests ---

    #[test]
    fn grid_config_defaults() {
        let config = GridConfig::default();
        assert_eq!((config.rows, config.cols), (5, 7));
        assert_eq!(config.periphery_holes, 5);
        assert_eq!(config.interior_holes, 3);
        assert!(!config.narrow);
        assert_eq!(config.category(), GridCategory::Holes);
    }

    #[test]
    fn category_splits_hole_budget() {
        let holes = GridConfig::for_category(6, 6, GridCategory::Holes, 7, 1);
        assert_eq!((holes.periphery_holes, holes.interior_holes), (3, 3));

        let periphery = GridConfig::for_category(6, 6, GridCategory::PeripheryHoles, 4, 1);
        assert_eq!((periphery.periphery_holes, periphery.interior_holes), (4, 0));
        assert_eq!(periphery.category(), GridCategory::PeripheryHoles);

        let degraded = GridConfig::for_category(6, 6, GridCategory::Holes, 0, 1);
        assert_eq!(degraded.category(), GridCategory::Full);
    }

    #[test]
    fn grid_config_serde_round_trip() {
        let config = GridConfig {
            narrow: true,
            seed: 42,
            ..GridConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: GridConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn plan_config_defaults_to_kruskal() {
        assert_eq!(PlanConfig::default().strategy, SpanningStrategy::Kruskal);
        assert_eq!(SpanningStrategy::RandomizedKruskal.to_string(), "randomized-kruskal");
    }

    // --- PlanError tests ---

    #[test]
    fn error_display() {
        assert_eq!(
            PlanError::DisconnectedGrid { components: 2 }.to_string(),
            "tile grid is disconnected (2 components)"
        );
        assert_eq!(
            PlanError::InvalidDimensions("no periphery".to_string()).to_string(),
            "invalid grid dimensions: no periphery"
        );
    }

    #[test]
    fn error_serde_round_trip() {
        let err = PlanError::InternalConsistency("cell visited twice".to_string());
        let json = serde_json::to_string(&err).unwrap();
        let back: PlanError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
