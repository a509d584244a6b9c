//! Integration test: generate a holed grid, plan it, and export every format.

#![allow(clippy::unwrap_used)]

use hpgg_export::{SvgMetadata, path_to_text, plan_to_tikz, tiles_to_text, to_svg};
use hpgg_pipeline::{
    GridConfig, PathCode, PlanConfig, SpanningStrategy, TileGrid, generate_grid, plan,
};

#[test]
fn generated_grid_exports() {
    // Seeds whose holes disconnect the grid are skipped; one must succeed.
    let grid = (0..64)
        .find_map(|seed| {
            generate_grid(&GridConfig {
                seed,
                ..GridConfig::default()
            })
            .ok()
        })
        .unwrap();
    let tiles = grid.existing_count();
    let config = PlanConfig {
        strategy: SpanningStrategy::DepthFirst,
        seed: 3,
    };
    let plan = plan(grid, &config).unwrap();

    let text = tiles_to_text(plan.tiles());
    assert_eq!(text.parse::<TileGrid>().unwrap(), *plan.tiles());

    let paths = path_to_text(plan.path_matrix());
    assert_eq!(paths.lines().count(), 10);
    assert!(paths.lines().all(|l| l.chars().count() == 14));
    let drawn = paths.chars().filter(|c| !matches!(c, ' ' | '\n')).count();
    assert_eq!(drawn, 4 * tiles);
    assert_eq!(plan.path_matrix().count(PathCode::Empty), 0);

    let config_json = serde_json::to_string(&config).unwrap();
    let svg = to_svg(
        &plan,
        &SvgMetadata {
            title: Some("generated"),
            description: None,
            config_json: Some(&config_json),
        },
    );
    assert_eq!(svg.matches("<rect").count(), tiles);
    assert!(svg.contains("id=\"route\""));
    assert!(svg.contains("<title>generated</title>"));
    assert!(svg.contains("DepthFirst"));

    let tikz = plan_to_tikz(&plan);
    assert_eq!(tikz.matches("very thick").count(), tiles);
    assert_eq!(tikz.matches(" -- ").count(), 4 * tiles);
}
