//! Property tests for grid mutation, skeleton extraction and coverage.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;

use hpgg_pipeline::{
    CellGrid, GridConfig, PlanConfig, PlanError, SpanningSkeleton, SpanningStrategy, TileCoord,
    TileGrid, generate_grid, plan,
};
use petgraph::unionfind::UnionFind;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn arb_config() -> impl Strategy<Value = GridConfig> {
    (1usize..9, 1usize..9, 0usize..10, 0usize..6, any::<bool>(), any::<u64>()).prop_map(
        |(rows, cols, periphery_holes, interior_holes, narrow, seed)| GridConfig {
            rows,
            cols,
            periphery_holes,
            interior_holes,
            narrow,
            seed,
        },
    )
}

fn arb_strategy() -> impl Strategy<Value = SpanningStrategy> {
    prop_oneof![
        Just(SpanningStrategy::Kruskal),
        Just(SpanningStrategy::RandomizedKruskal),
        Just(SpanningStrategy::DepthFirst),
    ]
}

/// A random existence pattern, cut down to the 4-connected component of
/// its first existing tile.
fn arb_connected_rows() -> impl Strategy<Value = Vec<Vec<bool>>> {
    (1usize..8, 1usize..8)
        .prop_flat_map(|(rows, cols)| {
            proptest::collection::vec(proptest::collection::vec(any::<bool>(), cols), rows)
        })
        .prop_map(keep_first_component)
}

fn keep_first_component(rows: Vec<Vec<bool>>) -> Vec<Vec<bool>> {
    let height = rows.len();
    let width = rows.first().map_or(0, Vec::len);
    let mut kept = vec![vec![false; width]; height];
    let start = (0..height)
        .flat_map(|r| (0..width).map(move |c| (r, c)))
        .find(|&(r, c)| rows[r][c]);
    let Some(start) = start else {
        return kept;
    };

    let mut queue = VecDeque::from([start]);
    kept[start.0][start.1] = true;
    while let Some((r, c)) = queue.pop_front() {
        let candidates = [
            r.checked_sub(1).map(|r| (r, c)),
            (r + 1 < height).then_some((r + 1, c)),
            c.checked_sub(1).map(|c| (r, c)),
            (c + 1 < width).then_some((r, c + 1)),
        ];
        for (nr, nc) in candidates.into_iter().flatten() {
            if rows[nr][nc] && !kept[nr][nc] {
                kept[nr][nc] = true;
                queue.push_back((nr, nc));
            }
        }
    }
    kept
}

proptest! {
    #[test]
    fn generated_grids_are_connected(config in arb_config()) {
        match generate_grid(&config) {
            Ok(grid) => {
                prop_assert!(grid.check_connected());
                prop_assert_eq!(grid.rows(), config.rows);
                prop_assert_eq!(grid.cols(), config.cols);
            }
            Err(err) => prop_assert!(
                matches!(
                    err,
                    PlanError::DisconnectedGrid { .. } | PlanError::InvalidDimensions(_)
                ),
                "unexpected error: {}",
                err
            ),
        }
    }

    #[test]
    fn failed_mutation_leaves_grid_unchanged(
        config in arb_config(),
        holes in 0usize..12,
        seed in any::<u64>(),
    ) {
        let Ok(mut grid) = generate_grid(&config) else {
            return Ok(());
        };
        let before = grid.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let results = [
            grid.add_periphery_holes(holes, &mut rng),
            grid.add_interior_holes(holes, &mut rng),
            grid.narrow(),
        ];
        prop_assert!(grid.check_connected());
        if results.iter().all(Result::is_err) {
            prop_assert_eq!(grid, before);
        }
    }

    #[test]
    fn single_mutation_rolls_back(config in arb_config(), holes in 1usize..12, seed in any::<u64>()) {
        let Ok(mut grid) = generate_grid(&config) else {
            return Ok(());
        };
        let before = grid.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        if grid.add_periphery_holes(holes, &mut rng).is_err() {
            prop_assert_eq!(&grid, &before);
        } else {
            prop_assert!(grid.check_connected());
            prop_assert_eq!(grid.hole_count(), before.hole_count() + holes);
        }
    }

    #[test]
    fn border_tiles_are_periphery(config in arb_config()) {
        let Ok(grid) = generate_grid(&config) else {
            return Ok(());
        };
        let periphery = grid.periphery();
        for tile in grid.matrix().existing() {
            if tile.is_border(grid.rows(), grid.cols()) {
                prop_assert!(periphery.contains(&tile), "{} missing", tile);
            }
        }
        for tile in grid.interior() {
            prop_assert!(!periphery.contains(&tile));
        }
    }

    #[test]
    fn removing_one_surrounded_tile_keeps_connectivity(config in arb_config()) {
        let Ok(grid) = generate_grid(&config) else {
            return Ok(());
        };
        // An interior tile whose diagonal neighbours also exist is ringed by
        // eight tiles, so removing it cannot cut the grid.
        let surrounded = grid.interior().into_iter().filter(|t| {
            grid.tile_exists(t.row - 1, t.col - 1)
                && grid.tile_exists(t.row - 1, t.col + 1)
                && grid.tile_exists(t.row + 1, t.col - 1)
                && grid.tile_exists(t.row + 1, t.col + 1)
        });
        for tile in surrounded {
            let mut rows = grid.matrix().to_rows();
            rows[tile.row][tile.col] = false;
            prop_assert!(TileGrid::from_rows(rows).is_ok(), "removing {} disconnects", tile);
        }
    }

    #[test]
    fn cells_follow_tiles(rows in arb_connected_rows(), x in 0usize..20, y in 0usize..20) {
        let grid = TileGrid::from_rows(rows).unwrap();
        let cells = CellGrid::new(&grid);
        prop_assert_eq!(cells.rows(), 2 * grid.rows());
        prop_assert_eq!(cells.cols(), 2 * grid.cols());
        prop_assert_eq!(cells.cell_exists(x, y), grid.tile_exists(x / 2, y / 2));
    }

    #[test]
    fn skeleton_is_a_spanning_tree(rows in arb_connected_rows(), strategy in arb_strategy(), seed in any::<u64>()) {
        let grid = TileGrid::from_rows(rows).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let skeleton = SpanningSkeleton::build(&grid, strategy, &mut rng).unwrap();

        let nodes: Vec<TileCoord> = grid.matrix().existing().collect();
        prop_assert_eq!(skeleton.nodes(), nodes.as_slice());
        prop_assert_eq!(skeleton.edge_count(), nodes.len().saturating_sub(1));

        let mut sets = UnionFind::<usize>::new(nodes.len());
        for (a, b) in skeleton.edges() {
            prop_assert!(a.direction_to(*b).is_some());
            let ia = nodes.binary_search(a).unwrap();
            let ib = nodes.binary_search(b).unwrap();
            prop_assert!(sets.union(ia, ib), "cycle through {} - {}", a, b);
        }
        for tile in &nodes {
            prop_assert!(skeleton.degree(*tile) <= 4);
        }
    }

    #[test]
    fn route_covers_every_cell_once(rows in arb_connected_rows(), strategy in arb_strategy(), seed in any::<u64>()) {
        let grid = TileGrid::from_rows(rows).unwrap();
        let tiles = grid.existing_count();
        let plan = plan(grid, &PlanConfig { strategy, seed }).unwrap();
        let route = plan.route().cells();
        prop_assert_eq!(route.len(), 4 * tiles);

        let mut sorted = route.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), route.len());

        for (i, a) in route.iter().enumerate() {
            let b = route[(i + 1) % route.len()];
            if route.len() > 1 {
                prop_assert_eq!(a.row.abs_diff(b.row) + a.col.abs_diff(b.col), 1);
            }
            prop_assert!(plan.tiles().exists(a.tile()));
        }
    }
}
