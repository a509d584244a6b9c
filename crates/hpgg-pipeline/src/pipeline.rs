//! Incremental planning: advance stage-by-stage, inspecting each
//! intermediate result before continuing.
//!
//! ```rust
//! # use hpgg_pipeline::{Pipeline, PlanConfig, PlanError, TileGrid};
//! # fn run() -> Result<(), PlanError> {
//! let grid = TileGrid::new(3, 4)?;
//! let plan = Pipeline::new(grid, PlanConfig::default())
//!     .build_skeleton()?
//!     .resolve()?
//!     .trace()?
//!     .into_plan();
//! assert_eq!(plan.route().len(), 48);
//! # Ok(())
//! # }
//! ```
//!
//! Each stage method consumes `self` and returns the next state, carrying
//! every previously computed intermediate. Only the grid is mutable input;
//! from [`Pending`] onward it is frozen.

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::cell_grid::{CellGrid, PathMatrix};
use crate::diagnostics::{PlanDiagnostics, StageTimings};
use crate::resolve::resolve;
use crate::route::{Route, trace_route};
use crate::skeleton::SpanningSkeleton;
use crate::tile_grid::TileGrid;
use crate::types::{PlanConfig, PlanError};

/// Entry point of the staged planner.
pub struct Pipeline;

impl Pipeline {
    /// Freeze `grid` and start a planning run.
    #[allow(clippy::new_ret_no_self)]
    pub const fn new(grid: TileGrid, config: PlanConfig) -> Pending {
        Pending { config, grid }
    }
}

/// Common surface of every pipeline stage.
pub trait PipelineStage {
    /// Human-readable stage name.
    const NAME: &'static str;
    /// Zero-based position of the stage.
    const INDEX: usize;

    /// The frozen tile grid being planned.
    fn grid(&self) -> &TileGrid;
}

/// Number of pipeline stages, [`Pending`] through [`Traced`].
pub const STAGE_COUNT: usize = 4;

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// The grid and config are stored but nothing is computed yet.
#[must_use = "pipeline stages are consumed by advancing; call .build_skeleton() to continue"]
pub struct Pending {
    config: PlanConfig,
    grid: TileGrid,
}

impl Pending {
    /// The planning configuration.
    #[must_use]
    pub const fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Extract the spanning skeleton, drawing randomness from a
    /// `ChaCha8` generator seeded with `config.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InternalConsistency`] if the extracted edges
    /// do not form a spanning tree.
    pub fn build_skeleton(self) -> Result<Skeletonized, PlanError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.build_skeleton_with(&mut rng)
    }

    /// Extract the spanning skeleton with an injected generator.
    ///
    /// # Errors
    ///
    /// See [`build_skeleton`](Self::build_skeleton).
    pub fn build_skeleton_with<R: Rng + ?Sized>(
        self,
        rng: &mut R,
    ) -> Result<Skeletonized, PlanError> {
        let start = Instant::now();
        let skeleton = SpanningSkeleton::build(&self.grid, self.config.strategy, rng)?;
        let timings = StageTimings {
            skeleton: start.elapsed(),
            ..StageTimings::default()
        };
        Ok(Skeletonized {
            grid: self.grid,
            skeleton,
            timings,
        })
    }
}

// ─────────────────────── Stage 1: Skeletonized ───────────────────────

/// The spanning skeleton has been extracted.
#[must_use = "pipeline stages are consumed by advancing; call .resolve() to continue"]
pub struct Skeletonized {
    grid: TileGrid,
    skeleton: SpanningSkeleton,
    timings: StageTimings,
}

impl Skeletonized {
    /// The spanning skeleton.
    #[must_use]
    pub const fn skeleton(&self) -> &SpanningSkeleton {
        &self.skeleton
    }

    /// Assign a path code to every existing cell.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InternalConsistency`] if the codes cannot be
    /// assigned exactly once per cell.
    pub fn resolve(self) -> Result<Resolved, PlanError> {
        let start = Instant::now();
        let path_matrix = resolve(&self.skeleton, &CellGrid::new(&self.grid))?;
        let mut timings = self.timings;
        timings.resolve = start.elapsed();
        Ok(Resolved {
            grid: self.grid,
            skeleton: self.skeleton,
            path_matrix,
            timings,
        })
    }
}

// ───────────────────────── Stage 2: Resolved ─────────────────────────

/// Every existing cell holds a path code.
#[must_use = "pipeline stages are consumed by advancing; call .trace() to continue"]
pub struct Resolved {
    grid: TileGrid,
    skeleton: SpanningSkeleton,
    path_matrix: PathMatrix,
    timings: StageTimings,
}

impl Resolved {
    /// The resolved path codes.
    #[must_use]
    pub const fn path_matrix(&self) -> &PathMatrix {
        &self.path_matrix
    }

    /// Walk the path codes and check they form one closed loop.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InternalConsistency`] if the route check fails.
    pub fn trace(self) -> Result<Traced, PlanError> {
        let start = Instant::now();
        let route = trace_route(&self.path_matrix)?;
        let mut timings = self.timings;
        timings.trace = start.elapsed();
        Ok(Traced {
            grid: self.grid,
            skeleton: self.skeleton,
            path_matrix: self.path_matrix,
            route,
            timings,
        })
    }
}

// ───────────────────────── Stage 3: Traced ───────────────────────────

/// The route has been traced and verified.
#[must_use = "call .into_plan() to extract the CoveragePlan"]
pub struct Traced {
    grid: TileGrid,
    skeleton: SpanningSkeleton,
    path_matrix: PathMatrix,
    route: Route,
    timings: StageTimings,
}

impl Traced {
    /// The verified route.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Finish the run, collecting diagnostics.
    pub fn into_plan(self) -> CoveragePlan {
        let diagnostics = PlanDiagnostics::collect(
            &self.grid,
            &self.skeleton,
            &self.path_matrix,
            &self.route,
            self.timings,
        );
        log::debug!(
            "plan complete: {} tiles, {} route cells in {:?}",
            diagnostics.grid.tiles,
            diagnostics.route.cells,
            self.timings.total()
        );
        CoveragePlan {
            tiles: self.grid,
            skeleton: self.skeleton,
            path_matrix: self.path_matrix,
            route: self.route,
            diagnostics,
        }
    }
}

macro_rules! impl_stage {
    ($stage:ty, $name:literal, $index:literal) => {
        impl PipelineStage for $stage {
            const NAME: &'static str = $name;
            const INDEX: usize = $index;

            fn grid(&self) -> &TileGrid {
                &self.grid
            }
        }
    };
}

impl_stage!(Pending, "pending", 0);
impl_stage!(Skeletonized, "skeleton", 1);
impl_stage!(Resolved, "resolve", 2);
impl_stage!(Traced, "trace", 3);

/// Every product of a planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoveragePlan {
    tiles: TileGrid,
    skeleton: SpanningSkeleton,
    path_matrix: PathMatrix,
    route: Route,
    diagnostics: PlanDiagnostics,
}

impl CoveragePlan {
    /// The frozen input grid.
    #[must_use]
    pub const fn tiles(&self) -> &TileGrid {
        &self.tiles
    }

    /// The spanning skeleton.
    #[must_use]
    pub const fn skeleton(&self) -> &SpanningSkeleton {
        &self.skeleton
    }

    /// One path code per cell.
    #[must_use]
    pub const fn path_matrix(&self) -> &PathMatrix {
        &self.path_matrix
    }

    /// The closed coverage route.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Metrics and timings of the run.
    #[must_use]
    pub const fn diagnostics(&self) -> &PlanDiagnostics {
        &self.diagnostics
    }
}
