//! hpgg-pipeline: Spanning-Tree Coverage planning over tile grids (sans-IO).
//!
//! Turns a connected grid of square tiles (with holes) into one closed
//! route through every cell of the 2× refined grid:
//! tile grid -> spanning skeleton -> per-cell path codes -> traced route.
//!
//! This crate has **no I/O dependencies**. It operates on in-memory grids
//! and returns structured data; rendering lives in `hpgg-export` and the
//! command line in `hpgg-bench`.

pub mod cell_grid;
pub mod diagnostics;
pub mod pipeline;
pub mod recipe;
pub mod resolve;
pub mod route;
pub mod skeleton;
pub mod tile_grid;
pub mod types;

pub use cell_grid::{CellGrid, PathCode, PathMatrix, Quadrant};
pub use diagnostics::PlanDiagnostics;
pub use pipeline::{CoveragePlan, Pipeline};
pub use recipe::{generate_grid, generate_grid_with};
pub use resolve::{quadrant_code, quadrant_codes};
pub use route::{Route, trace_route};
pub use skeleton::SpanningSkeleton;
pub use tile_grid::TileGrid;
pub use types::{
    CellCoord, Direction, Directions, ExistenceMatrix, GridCategory, GridConfig, PlanConfig,
    PlanError, SpanningStrategy, TileCoord,
};

/// Plan a coverage route over `grid`.
///
/// # Pipeline steps
///
/// 1. Spanning skeleton over the existing tiles (strategy from `config`)
/// 2. Path code per cell from each tile's tree edges
/// 3. Route tracing, which verifies the codes form a single closed loop
///
/// # Errors
///
/// Returns [`PlanError::InternalConsistency`] if any step breaks the
/// coverage invariants. A [`TileGrid`] is connected by construction, so
/// no other error can occur here.
pub fn plan(grid: TileGrid, config: &PlanConfig) -> Result<CoveragePlan, PlanError> {
    Ok(Pipeline::new(grid, config.clone())
        .build_skeleton()?
        .resolve()?
        .trace()?
        .into_plan())
}
