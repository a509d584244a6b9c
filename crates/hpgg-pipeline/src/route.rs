//! Route tracing: walk a resolved [`PathMatrix`] and prove it is one
//! closed loop through every existing cell.

use serde::{Deserialize, Serialize};

use crate::cell_grid::{PathCode, PathMatrix};
use crate::types::{CellCoord, Direction, PlanError};

/// The closed coverage route, as cells in visiting order.
///
/// The last cell connects back to the first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(Vec<CellCoord>);

impl Route {
    /// Cells in visiting order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.0
    }

    /// Number of cells on the route.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the route visits no cell (an empty grid).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the route, returning its cells.
    #[must_use]
    pub fn into_cells(self) -> Vec<CellCoord> {
        self.0
    }
}

/// Exit of `code` other than `entered_through`.
fn other_exit(code: PathCode, entered_through: Direction) -> Option<Direction> {
    let [a, b] = code.exits()?;
    if a == entered_through {
        Some(b)
    } else if b == entered_through {
        Some(a)
    } else {
        None
    }
}

fn broken(message: String) -> PlanError {
    PlanError::InternalConsistency(format!("route check failed: {message}"))
}

/// Follow the path codes of `matrix` from its first drawn cell.
///
/// # Errors
///
/// Returns [`PlanError::InternalConsistency`] if a cell is still
/// [`Empty`](PathCode::Empty), an exit leads off the grid or into an
/// absent cell, a neighbour does not share the crossed midpoint, a cell is
/// visited twice, or the loop closes before every drawn cell is visited.
pub fn trace_route(matrix: &PathMatrix) -> Result<Route, PlanError> {
    let empty = matrix.count(PathCode::Empty);
    if empty > 0 {
        return Err(broken(format!("{empty} cells have no path code")));
    }

    let (rows, cols) = (matrix.rows(), matrix.cols());
    let drawn = matrix.iter().filter(|(_, code)| code.is_drawn()).count();
    let Some((start, start_code)) = matrix.iter().find(|(_, code)| code.is_drawn()) else {
        return Ok(Route::default());
    };
    let Some([mut leave, closing]) = start_code.exits() else {
        return Err(broken(format!("start cell {start} is not drawn")));
    };

    let mut visited = vec![false; rows * cols];
    visited[start.row * cols + start.col] = true;
    let mut cells = Vec::with_capacity(drawn);
    cells.push(start);
    let mut current = start;

    loop {
        let next = current
            .neighbor(leave, rows, cols)
            .ok_or_else(|| broken(format!("cell {current} exits {leave} off the grid")))?;
        let code = matrix.get(next);
        if !code.is_drawn() {
            return Err(broken(format!(
                "cell {current} exits {leave} into undrawn cell {next}"
            )));
        }
        let entered = leave.opposite();
        if !code.connects(entered) {
            return Err(broken(format!(
                "cell {next} ({code:?}) does not reciprocate {current} exiting {leave}"
            )));
        }
        if next == start {
            if entered != closing {
                return Err(broken(format!("route re-enters {start} from the wrong side")));
            }
            break;
        }
        let slot = &mut visited[next.row * cols + next.col];
        if *slot {
            return Err(broken(format!("cell {next} visited twice")));
        }
        *slot = true;
        log::trace!("route step {} -> {next} via {leave}", cells.len());
        cells.push(next);

        leave = other_exit(code, entered)
            .ok_or_else(|| broken(format!("cell {next} has no exit besides {entered}")))?;
        current = next;
    }

    if cells.len() != drawn {
        return Err(broken(format!(
            "loop closed after {} of {drawn} cells",
            cells.len()
        )));
    }
    log::debug!("route closes over {} cells", cells.len());
    Ok(Route(cells))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::cell_grid::CellGrid;
    use crate::resolve::resolve;
    use crate::skeleton::SpanningSkeleton;
    use crate::tile_grid::TileGrid;
    use crate::types::SpanningStrategy;

    fn resolved(grid: &TileGrid) -> PathMatrix {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let skeleton = SpanningSkeleton::build(grid, SpanningStrategy::Kruskal, &mut rng).unwrap();
        resolve(&skeleton, &CellGrid::new(grid)).unwrap()
    }

    /// A matrix with only the codes in `drawn` filled in.
    fn hand_drawn(rows: usize, cols: usize, drawn: &[(usize, usize, PathCode)]) -> PathMatrix {
        let tiles = TileGrid::new(rows, cols).unwrap();
        let mut matrix = PathMatrix::init(&CellGrid::new(&tiles));
        for &(r, c, code) in drawn {
            matrix.assign(CellCoord::new(r, c), code).unwrap();
        }
        matrix
    }

    #[test]
    fn single_tile_loop() {
        let matrix = resolved(&TileGrid::new(1, 1).unwrap());
        let route = trace_route(&matrix).unwrap();
        assert_eq!(
            route.cells(),
            &[
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(1, 1),
                CellCoord::new(0, 1),
            ]
        );
    }

    #[test]
    fn full_grid_route_visits_every_cell_once() {
        let grid = TileGrid::new(3, 3).unwrap();
        let route = trace_route(&resolved(&grid)).unwrap();
        assert_eq!(route.len(), 36);
        let mut cells = route.into_cells();
        cells.sort_unstable();
        cells.dedup();
        assert_eq!(cells.len(), 36);
    }

    #[test]
    fn consecutive_cells_are_adjacent() {
        let grid: TileGrid = "
            x x x .
            x . x x
            x x x .
        "
        .parse()
        .unwrap();
        let route = trace_route(&resolved(&grid)).unwrap();
        assert_eq!(route.len(), 4 * grid.existing_count());
        let cells = route.cells();
        for (i, a) in cells.iter().enumerate() {
            let b = cells[(i + 1) % cells.len()];
            assert_eq!(a.row.abs_diff(b.row) + a.col.abs_diff(b.col), 1, "{a} -> {b}");
            assert!(grid.exists(b.tile()));
        }
    }

    #[test]
    fn empty_grid_has_empty_route() {
        let grid = TileGrid::new(0, 0).unwrap();
        let route = trace_route(&resolved(&grid)).unwrap();
        assert!(route.is_empty());
    }

    #[test]
    fn unresolved_cells_are_rejected() {
        let matrix = hand_drawn(1, 1, &[(0, 0, PathCode::SouthEast)]);
        assert!(matches!(
            trace_route(&matrix),
            Err(PlanError::InternalConsistency(_))
        ));
    }

    #[test]
    fn exit_off_grid_is_rejected() {
        let matrix = hand_drawn(
            1,
            1,
            &[
                (0, 0, PathCode::NorthWest),
                (0, 1, PathCode::SouthWest),
                (1, 0, PathCode::NorthEast),
                (1, 1, PathCode::NorthWest),
            ],
        );
        let err = trace_route(&matrix).unwrap_err();
        assert!(err.to_string().contains("off the grid"), "{err}");
    }

    #[test]
    fn non_reciprocal_neighbour_is_rejected() {
        let matrix = hand_drawn(
            1,
            1,
            &[
                (0, 0, PathCode::SouthEast),
                (0, 1, PathCode::Horizontal),
                (1, 0, PathCode::NorthEast),
                (1, 1, PathCode::NorthWest),
            ],
        );
        let err = trace_route(&matrix).unwrap_err();
        assert!(err.to_string().contains("reciprocate"), "{err}");
    }

    #[test]
    fn two_separate_loops_are_rejected() {
        // Two 1x1 loops side by side in a 1x2 grid.
        let matrix = hand_drawn(
            1,
            2,
            &[
                (0, 0, PathCode::SouthEast),
                (0, 1, PathCode::SouthWest),
                (1, 0, PathCode::NorthEast),
                (1, 1, PathCode::NorthWest),
                (0, 2, PathCode::SouthEast),
                (0, 3, PathCode::SouthWest),
                (1, 2, PathCode::NorthEast),
                (1, 3, PathCode::NorthWest),
            ],
        );
        let err = trace_route(&matrix).unwrap_err();
        assert!(err.to_string().contains("loop closed after 4 of 8"), "{err}");
    }

    #[test]
    fn loaded_matrix_errors_instead_of_panicking() {
        let stray = r#"{"rows":0,"cols":0,"codes":["Absent"]}"#;
        assert!(serde_json::from_str::<PathMatrix>(stray).is_err());

        // Well-shaped but broken codes surface through the route check.
        let matrix: PathMatrix =
            serde_json::from_str(r#"{"rows":1,"cols":2,"codes":["Vertical","Absent"]}"#).unwrap();
        let err = trace_route(&matrix).unwrap_err();
        assert!(err.to_string().contains("off the grid"), "{err}");
    }

    #[test]
    fn route_serializes_as_cell_list() {
        let route = trace_route(&resolved(&TileGrid::new(1, 1).unwrap())).unwrap();
        let json = serde_json::to_string(&route).unwrap();
        assert!(json.starts_with("[{\"row\":0,\"col\":0}"));
    }
}
