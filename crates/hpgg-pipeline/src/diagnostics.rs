//! Plan diagnostics: counts, histograms, and timings for one planning run.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cell_grid::{PathCode, PathMatrix};
use crate::route::Route;
use crate::skeleton::SpanningSkeleton;
use crate::tile_grid::TileGrid;

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs)
            .map_err(|_| serde::de::Error::custom("duration seconds must be finite and non-negative"))
    }
}

/// Diagnostics collected from a single planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDiagnostics {
    /// Shape of the input grid.
    pub grid: GridMetrics,
    /// Shape of the spanning skeleton.
    pub skeleton: SkeletonMetrics,
    /// Composition of the traced route.
    pub route: RouteMetrics,
    /// Wall-clock time per stage.
    pub timings: StageTimings,
}

/// Tile counts of the input grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridMetrics {
    /// Tile rows.
    pub rows: usize,
    /// Tile columns.
    pub cols: usize,
    /// Existing tiles.
    pub tiles: usize,
    /// Missing tiles.
    pub holes: usize,
    /// Existing tiles on the border or next to a hole.
    pub periphery: usize,
}

/// Size and degree distribution of the spanning skeleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkeletonMetrics {
    /// Strategy name, as accepted on the command line.
    pub strategy: String,
    /// Tree nodes.
    pub nodes: usize,
    /// Tree edges.
    pub edges: usize,
    /// Node count per degree, indexed 0 to 4.
    pub degree_histogram: [usize; 5],
}

/// Length and shape mix of the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMetrics {
    /// Cells on the closed route.
    pub cells: usize,
    /// Cells crossed in a straight line.
    pub straight: usize,
    /// Cells where the route turns.
    pub turns: usize,
}

/// Wall-clock duration of each stage after the grid is fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimings {
    /// Spanning tree extraction (seconds).
    #[serde(with = "duration_serde")]
    pub skeleton: Duration,
    /// Path code resolution (seconds).
    #[serde(with = "duration_serde")]
    pub resolve: Duration,
    /// Route tracing (seconds).
    #[serde(with = "duration_serde")]
    pub trace: Duration,
}

impl StageTimings {
    /// Sum of all stage durations.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.skeleton + self.resolve + self.trace
    }
}

impl GridMetrics {
    /// Measure `grid`.
    #[must_use]
    pub fn of(grid: &TileGrid) -> Self {
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            tiles: grid.existing_count(),
            holes: grid.hole_count(),
            periphery: grid.periphery().len(),
        }
    }
}

impl SkeletonMetrics {
    /// Measure `skeleton`.
    #[must_use]
    pub fn of(skeleton: &SpanningSkeleton) -> Self {
        Self {
            strategy: skeleton.strategy().to_string(),
            nodes: skeleton.node_count(),
            edges: skeleton.edge_count(),
            degree_histogram: skeleton.degree_histogram(),
        }
    }
}

impl RouteMetrics {
    /// Measure `route` and the path codes it runs through.
    #[must_use]
    pub fn of(route: &Route, path_matrix: &PathMatrix) -> Self {
        let straight =
            path_matrix.count(PathCode::Horizontal) + path_matrix.count(PathCode::Vertical);
        let turns = PathCode::DRAWN
            .into_iter()
            .filter(|c| c.is_turn())
            .map(|c| path_matrix.count(c))
            .sum();
        Self {
            cells: route.len(),
            straight,
            turns,
        }
    }
}

fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

impl PlanDiagnostics {
    /// Gather the metrics of a finished plan.
    #[must_use]
    pub fn collect(
        grid: &TileGrid,
        skeleton: &SpanningSkeleton,
        path_matrix: &PathMatrix,
        route: &Route,
        timings: StageTimings,
    ) -> Self {
        Self {
            grid: GridMetrics::of(grid),
            skeleton: SkeletonMetrics::of(skeleton),
            route: RouteMetrics::of(route, path_matrix),
            timings,
        }
    }

    /// Format diagnostics as a human-readable text report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Coverage Plan Diagnostics\n{}", "=".repeat(60)));
        lines.push(format!(
            "Grid: {}x{} ({} tiles, {} holes, {} on the periphery)",
            self.grid.rows, self.grid.cols, self.grid.tiles, self.grid.holes, self.grid.periphery,
        ));
        lines.push(format!(
            "Skeleton ({}): {} nodes, {} edges",
            self.skeleton.strategy, self.skeleton.nodes, self.skeleton.edges,
        ));
        let histogram: Vec<String> = self
            .skeleton
            .degree_histogram
            .iter()
            .enumerate()
            .map(|(degree, count)| format!("{degree}:{count}"))
            .collect();
        lines.push(format!("  degree histogram  {}", histogram.join("  ")));
        lines.push(format!(
            "Route: {} cells ({} straight, {} turns)",
            self.route.cells, self.route.straight, self.route.turns,
        ));
        lines.push(String::new());

        lines.push(format!("{:<16} {:>10}", "Stage", "Duration"));
        lines.push("-".repeat(28));
        for (name, duration) in [
            ("Skeleton", self.timings.skeleton),
            ("Resolve", self.timings.resolve),
            ("Trace", self.timings.trace),
            ("Total", self.timings.total()),
        ] {
            lines.push(format!("{name:<16} {:>8.3}ms", duration_ms(duration)));
        }

        lines.join("\n")
    }
}
