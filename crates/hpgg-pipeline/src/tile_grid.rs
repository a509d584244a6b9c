//! Tile grid: a connected existence matrix with hole placement.
//!
//! A [`TileGrid`] only ever holds a matrix whose existing tiles form one
//! 4-connected component. Every mutation is applied to a scratch copy of
//! the matrix and committed only after the connectivity check passes, so
//! a failing call leaves the grid exactly as it was.

use std::str::FromStr;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::types::{ExistenceMatrix, PlanError, TileCoord};

/// A rectangular grid of tiles whose existing tiles are 4-connected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ExistenceMatrix", into = "ExistenceMatrix")]
pub struct TileGrid {
    matrix: ExistenceMatrix,
}

impl TileGrid {
    /// Create a `rows × cols` grid with every tile present.
    ///
    /// A zero extent yields an empty grid, which is vacuously connected.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::DisconnectedGrid`] if the full rectangle fails
    /// the connectivity check (it never does; the check is shared with the
    /// mutation paths).
    pub fn new(rows: usize, cols: usize) -> Result<Self, PlanError> {
        Self::from_matrix(ExistenceMatrix::filled(rows, cols, true))
    }

    /// Wrap an existence matrix after checking it is connected.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::DisconnectedGrid`] if the existing tiles form
    /// more than one 4-connected component.
    pub fn from_matrix(matrix: ExistenceMatrix) -> Result<Self, PlanError> {
        ensure_connected(&matrix)?;
        Ok(Self { matrix })
    }

    /// Build a grid from nested boolean rows.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidDimensions`] for ragged rows and
    /// [`PlanError::DisconnectedGrid`] for disconnected input.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, PlanError> {
        Self::from_matrix(ExistenceMatrix::from_rows(rows)?)
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.matrix.rows()
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.matrix.cols()
    }

    /// The underlying existence matrix.
    #[must_use]
    pub const fn matrix(&self) -> &ExistenceMatrix {
        &self.matrix
    }

    /// Whether the tile at `coord` exists. Out-of-bounds is `false`.
    #[must_use]
    pub fn exists(&self, coord: TileCoord) -> bool {
        self.matrix.get(coord)
    }

    /// Whether the tile at `(row, col)` exists. Out-of-bounds is `false`.
    #[must_use]
    pub fn tile_exists(&self, row: usize, col: usize) -> bool {
        self.exists(TileCoord::new(row, col))
    }

    /// Number of existing tiles.
    #[must_use]
    pub fn existing_count(&self) -> usize {
        self.matrix.existing_count()
    }

    /// Number of holes (missing tiles).
    #[must_use]
    pub fn hole_count(&self) -> usize {
        self.rows() * self.cols() - self.existing_count()
    }

    /// Existing tiles on the border or next to a hole, row-major.
    #[must_use]
    pub fn periphery(&self) -> Vec<TileCoord> {
        periphery_of(&self.matrix)
    }

    /// Existing tiles whose four neighbours all exist, row-major.
    #[must_use]
    pub fn interior(&self) -> Vec<TileCoord> {
        interior_of(&self.matrix)
    }

    /// Whether the existing tiles are 4-connected.
    ///
    /// Always `true` for a grid built through this type; exposed for
    /// callers that want to re-check a frozen snapshot.
    #[must_use]
    pub fn check_connected(&self) -> bool {
        self.matrix.check_connected()
    }

    /// Remove `count` tiles, one at a time, from the current periphery.
    ///
    /// The periphery is recomputed after each removal and each pick is
    /// uniform over its row-major listing, so a seeded `rng` reproduces
    /// the same holes.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidDimensions`] if the periphery runs out
    /// before `count` holes are placed, and [`PlanError::DisconnectedGrid`]
    /// if the final grid is disconnected. In both cases no hole is kept.
    pub fn add_periphery_holes<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Result<(), PlanError> {
        let mut candidate = self.matrix.clone();
        for placed in 0..count {
            let periphery = periphery_of(&candidate);
            let &hole = periphery.choose(rng).ok_or_else(|| {
                PlanError::InvalidDimensions(format!(
                    "no periphery tile left after placing {placed} of {count} holes"
                ))
            })?;
            candidate.set(hole, false);
        }
        self.commit(candidate, "periphery holes")
    }

    /// Remove up to `count` distinct interior tiles in one batch.
    ///
    /// The interior is computed once, before any removal, and
    /// `min(count, interior.len())` tiles are sampled without replacement.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::DisconnectedGrid`] if the batch disconnects the
    /// grid, which happens when the removed tiles enclose another interior
    /// tile. The grid is left unchanged.
    pub fn add_interior_holes<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Result<(), PlanError> {
        let interior = interior_of(&self.matrix);
        let amount = count.min(interior.len());
        let mut candidate = self.matrix.clone();
        for &hole in interior.choose_multiple(rng, amount) {
            candidate.set(hole, false);
        }
        self.commit(candidate, "interior holes")
    }

    /// Clear every non-periphery tile, leaving a thin ring-like topology.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::DisconnectedGrid`] if the remaining periphery
    /// tiles are not connected. The grid is left unchanged.
    pub fn narrow(&mut self) -> Result<(), PlanError> {
        let mut candidate = self.matrix.clone();
        for tile in interior_of(&self.matrix) {
            candidate.set(tile, false);
        }
        self.commit(candidate, "narrowing")
    }

    /// Replace the matrix with `candidate` if it is connected.
    fn commit(&mut self, candidate: ExistenceMatrix, operation: &str) -> Result<(), PlanError> {
        let removed = self.existing_count() - candidate.existing_count();
        if let Err(err) = ensure_connected(&candidate) {
            log::debug!("{operation}: rejected {removed} removals ({err})");
            return Err(err);
        }
        self.matrix = candidate;
        log::debug!(
            "{operation}: removed {removed} tiles, {} of {} remain",
            self.existing_count(),
            self.rows() * self.cols(),
        );
        Ok(())
    }
}

impl TryFrom<ExistenceMatrix> for TileGrid {
    type Error = PlanError;

    fn try_from(matrix: ExistenceMatrix) -> Result<Self, Self::Error> {
        Self::from_matrix(matrix)
    }
}

impl From<TileGrid> for ExistenceMatrix {
    fn from(grid: TileGrid) -> Self {
        grid.matrix
    }
}

impl FromStr for TileGrid {
    type Err = PlanError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_matrix(text.parse()?)
    }
}

fn ensure_connected(matrix: &ExistenceMatrix) -> Result<(), PlanError> {
    match matrix.components() {
        0 | 1 => Ok(()),
        components => Err(PlanError::DisconnectedGrid { components }),
    }
}

fn is_periphery(matrix: &ExistenceMatrix, tile: TileCoord) -> bool {
    matrix.get(tile)
        && (tile.is_border(matrix.rows(), matrix.cols()) || matrix.neighbors(tile).count() < 4)
}

fn periphery_of(matrix: &ExistenceMatrix) -> Vec<TileCoord> {
    matrix.existing().filter(|&t| is_periphery(matrix, t)).collect()
}

fn interior_of(matrix: &ExistenceMatrix) -> Vec<TileCoord> {
    matrix.existing().filter(|&t| !is_periphery(matrix, t)).collect()
}
