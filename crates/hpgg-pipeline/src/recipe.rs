//! Random grid recipes: turn a [`GridConfig`] into a [`TileGrid`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::tile_grid::TileGrid;
use crate::types::{GridConfig, PlanError};

/// Generate the grid described by `config`, seeding a `ChaCha8` generator
/// from `config.seed`.
///
/// # Errors
///
/// See [`generate_grid_with`].
pub fn generate_grid(config: &GridConfig) -> Result<TileGrid, PlanError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    generate_grid_with(config, &mut rng)
}

/// Generate the grid described by `config` with an injected generator.
///
/// Periphery holes are placed first, one at a time; interior holes follow
/// in a single batch; the grid is narrowed last if requested.
///
/// # Errors
///
/// Returns [`PlanError::InvalidDimensions`] if the periphery runs out of
/// tiles and [`PlanError::DisconnectedGrid`] if a step would disconnect
/// the grid. Nothing is retried.
pub fn generate_grid_with<R: Rng + ?Sized>(
    config: &GridConfig,
    rng: &mut R,
) -> Result<TileGrid, PlanError> {
    let mut grid = TileGrid::new(config.rows, config.cols)?;
    if config.periphery_holes > 0 {
        grid.add_periphery_holes(config.periphery_holes, rng)?;
    }
    if config.interior_holes > 0 {
        grid.add_interior_holes(config.interior_holes, rng)?;
    }
    if config.narrow {
        grid.narrow()?;
    }
    log::debug!(
        "generated {}x{} {:?} grid: {} tiles, {} holes",
        config.rows,
        config.cols,
        config.category(),
        grid.existing_count(),
        grid.hole_count()
    );
    Ok(grid)
}
