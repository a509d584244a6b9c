//! STC case engine: turns the tree-edge directions of each tile into the
//! path codes of its four cells.
//!
//! The route circumnavigates the spanning skeleton at half-tile offset.
//! Inside a tile each quadrant touches two outer sides, a vertical one
//! `v` and a horizontal one `h`. A tree edge toward `d` lets the route
//! cross the tile border on the `d` side; a missing edge folds the route
//! back toward the sibling quadrant instead. Both exits of a quadrant are
//! therefore fixed by the presence of the edges toward `v` and `h`, and
//! every one of the 16 direction sets is covered by the same rule.

use crate::cell_grid::{CellGrid, PathCode, PathMatrix, Quadrant};
use crate::skeleton::SpanningSkeleton;
use crate::types::{Directions, PlanError};

/// Path code of one quadrant of a tile with tree edges `edges`.
#[must_use]
pub fn quadrant_code(quadrant: Quadrant, edges: Directions) -> PathCode {
    let (v, h) = quadrant.outer_sides();
    let first = if edges.has(v) { v } else { h.opposite() };
    let second = if edges.has(h) { h } else { v.opposite() };
    // `first` is vertical or points away from `h`, `second` is horizontal
    // or points away from `v`; they are never equal.
    PathCode::from_exits(first, second).unwrap_or(PathCode::Empty)
}

/// Path codes of all four quadrants, in [`Quadrant::ALL`] order
/// (NW, NE, SW, SE).
#[must_use]
pub fn quadrant_codes(edges: Directions) -> [PathCode; 4] {
    Quadrant::ALL.map(|q| quadrant_code(q, edges))
}

/// Draw the path codes of every tree node into a fresh [`PathMatrix`].
///
/// # Errors
///
/// Returns [`PlanError::InternalConsistency`] when a node is isolated in a
/// grid of more than one tile, when the skeleton and cell grid disagree
/// on which tiles exist, or when a cell would be written twice.
pub fn resolve(skeleton: &SpanningSkeleton, cells: &CellGrid<'_>) -> Result<PathMatrix, PlanError> {
    let mut matrix = PathMatrix::init(cells);
    let single_tile = skeleton.node_count() == 1;

    for (tile, edges) in skeleton.iter() {
        if edges.is_empty() && !single_tile {
            return Err(PlanError::InternalConsistency(format!(
                "tile {tile} has no tree edges in a grid of {} tiles",
                skeleton.node_count()
            )));
        }
        if !cells.tiles().exists(tile) {
            return Err(PlanError::InternalConsistency(format!(
                "skeleton node {tile} is not an existing tile"
            )));
        }
        for (quadrant, code) in Quadrant::ALL.into_iter().zip(quadrant_codes(edges)) {
            if !code.is_drawn() {
                return Err(PlanError::InternalConsistency(format!(
                    "no path code for {quadrant:?} of tile {tile} with edges {edges:?}"
                )));
            }
            matrix.assign(quadrant.cell_of(tile), code)?;
        }
    }

    if !matrix.is_complete() {
        return Err(PlanError::InternalConsistency(format!(
            "{} existing cells left without a path code",
            matrix.count(PathCode::Empty)
        )));
    }
    log::debug!(
        "resolved {} cells over {} tiles",
        skeleton.node_count() * 4,
        skeleton.node_count()
    );
    Ok(matrix)
}
