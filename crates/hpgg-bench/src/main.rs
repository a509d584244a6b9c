//! hpgg-bench: CLI tool for grid generation and coverage plan diagnostics.
//!
//! Builds a tile grid (from a seeded recipe or a text file), plans a
//! Spanning-Tree Coverage route over it, and prints the grid, the path
//! matrix, and per-stage diagnostics. Useful for:
//!
//! - Comparing spanning strategies on the same grid
//! - Finding seeds whose hole placement disconnects a grid
//! - Exporting figures (SVG, TikZ) of a plan
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin hpgg-bench -- [OPTIONS]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use hpgg_pipeline::{GridCategory, GridConfig, PlanConfig, PlanDiagnostics, SpanningStrategy, TileGrid};
use log::info;
use serde::Deserialize;

/// Grid generation and coverage planning diagnostics for hpgg.
///
/// Generates or loads a tile grid, plans a closed coverage route over
/// its 2× cell refinement, and prints the result with per-stage
/// timing and count diagnostics.
#[derive(Parser)]
#[command(name = "hpgg-bench", version)]
struct Cli {
    /// Number of tile rows in a generated grid.
    #[arg(long, default_value_t = GridConfig::DEFAULT_ROWS)]
    rows: usize,

    /// Number of tile columns in a generated grid.
    #[arg(long, default_value_t = GridConfig::DEFAULT_COLS)]
    cols: usize,

    /// Hole layout of a generated grid.
    #[arg(long, value_enum, default_value_t = Category::Holes)]
    category: Category,

    /// Total hole budget, split according to `--category`.
    #[arg(long, default_value_t = GridConfig::DEFAULT_PERIPHERY_HOLES + GridConfig::DEFAULT_INTERIOR_HOLES)]
    holes: usize,

    /// Keep only the periphery of the generated grid.
    #[arg(long)]
    narrow: bool,

    /// Seed for hole placement and randomized spanning strategies.
    #[arg(long, default_value_t = GridConfig::DEFAULT_SEED)]
    seed: u64,

    /// Read the grid from a text file (`x` tile, `.` hole) instead of
    /// generating one.
    #[arg(long)]
    grid_file: Option<PathBuf>,

    /// Spanning tree extraction strategy.
    #[arg(long, value_enum, default_value_t = Strategy::Kruskal)]
    strategy: Strategy,

    /// Write SVG output to file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write a TikZ figure to file.
    #[arg(long)]
    tikz: Option<PathBuf>,

    /// Number of planning runs for averaging stage timings.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of the human-readable report.
    #[arg(long)]
    json: bool,

    /// Full configuration as a JSON string: `{"grid": {...}, "plan": {...}}`.
    ///
    /// When provided, all other grid and plan flags are ignored. Either
    /// key may be omitted to use its defaults.
    #[arg(long)]
    config_json: Option<String>,
}

/// Grid category selection.
#[derive(Clone, Copy, ValueEnum)]
enum Category {
    /// Full rectangle, no holes.
    Full,
    /// Holes carved from the periphery only.
    Periphery,
    /// Half the holes on the periphery, half in the interior.
    Holes,
}

/// Spanning strategy selection.
#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    /// Deterministic Kruskal in row-major edge order.
    Kruskal,
    /// Kruskal over a seeded shuffle of the edges.
    RandomizedKruskal,
    /// Depth-first search tree.
    DepthFirst,
}

/// Configuration accepted by `--config-json`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RunConfig {
    grid: GridConfig,
    plan: PlanConfig,
}

/// Build the grid recipe and plan config from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<RunConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    let category = match cli.category {
        Category::Full => GridCategory::Full,
        Category::Periphery => GridCategory::PeripheryHoles,
        Category::Holes => GridCategory::Holes,
    };
    let mut grid = GridConfig::for_category(cli.rows, cli.cols, category, cli.holes, cli.seed);
    grid.narrow = cli.narrow;

    Ok(RunConfig {
        grid,
        plan: PlanConfig {
            strategy: match cli.strategy {
                Strategy::Kruskal => SpanningStrategy::Kruskal,
                Strategy::RandomizedKruskal => SpanningStrategy::RandomizedKruskal,
                Strategy::DepthFirst => SpanningStrategy::DepthFirst,
            },
            seed: cli.seed,
        },
    })
}

/// Load the grid from `--grid-file`, or generate it from the recipe.
fn load_grid(path: Option<&Path>, recipe: &GridConfig) -> Result<TileGrid, String> {
    let Some(path) = path else {
        return hpgg_pipeline::generate_grid(recipe)
            .map_err(|e| format!("Error generating grid (seed {}): {e}", recipe.seed));
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    text.parse()
        .map_err(|e| format!("Error parsing {}: {e}", path.display()))
}

/// Write one export file, reporting the outcome on stderr.
fn write_output(kind: &str, path: &Path, contents: &str) -> Result<(), String> {
    std::fs::write(path, contents)
        .map_err(|e| format!("Error writing {kind} to {}: {e}", path.display()))?;
    eprintln!(
        "{kind} written to {} ({} bytes)",
        path.display(),
        contents.len(),
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let grid = match load_grid(cli.grid_file.as_deref(), &config.grid) {
        Ok(grid) => grid,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        "grid ready: {}x{} with {} tiles",
        grid.rows(),
        grid.cols(),
        grid.existing_count()
    );

    match cli.grid_file {
        Some(ref path) => eprintln!("Grid: {}", path.display()),
        None => eprintln!("Grid: {:?}", config.grid),
    }
    eprintln!("Plan: {:?}", config.plan);
    eprintln!("Runs: {}", cli.runs);
    eprintln!();

    let mut all_diagnostics = Vec::with_capacity(cli.runs);
    let mut first_plan = None;

    for run in 0..cli.runs {
        match hpgg_pipeline::plan(grid.clone(), &config.plan) {
            Ok(plan) => {
                all_diagnostics.push(plan.diagnostics().clone());
                if run == 0 {
                    first_plan = Some(plan);
                }
            }
            Err(e) => {
                eprintln!("Pipeline error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let Some(plan) = first_plan else {
        eprintln!("Pipeline error: no run completed");
        return ExitCode::FAILURE;
    };

    if cli.json {
        match serde_json::to_string_pretty(plan.diagnostics()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing diagnostics: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", hpgg_export::tiles_to_text(plan.tiles()));
        println!("{}", hpgg_export::path_to_text(plan.path_matrix()));
        println!("{}", plan.diagnostics().report());
    }

    // Every requested export is attempted before reporting failure.
    let mut exit = ExitCode::SUCCESS;
    if let Some(ref svg_path) = cli.svg {
        let title = cli
            .grid_file
            .as_deref()
            .and_then(Path::file_stem)
            .and_then(|s| s.to_str())
            .unwrap_or("hpgg");
        let desc = format!("{:?} / {:?}", config.grid, config.plan);
        let config_json = serde_json::to_string(&config.plan).ok();
        let metadata = hpgg_export::SvgMetadata {
            title: Some(title),
            description: Some(&desc),
            config_json: config_json.as_deref(),
        };
        if let Err(msg) = write_output("SVG", svg_path, &hpgg_export::to_svg(&plan, &metadata)) {
            eprintln!("{msg}");
            exit = ExitCode::FAILURE;
        }
    }

    if let Some(ref tikz_path) = cli.tikz
        && let Err(msg) = write_output("TikZ", tikz_path, &hpgg_export::plan_to_tikz(&plan))
    {
        eprintln!("{msg}");
        exit = ExitCode::FAILURE;
    }

    if cli.runs > 1 {
        print_multi_run_summary(&all_diagnostics);
    }

    exit
}

/// Function pointer type for extracting a stage duration from diagnostics.
type StageExtractor = fn(&PlanDiagnostics) -> std::time::Duration;

/// Print aggregated statistics across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(all_diagnostics: &[PlanDiagnostics]) {
    println!();
    println!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    if all_diagnostics.is_empty() {
        println!("Warning: no diagnostics to summarize");
        return;
    }

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.timings.total().as_secs_f64() * 1000.0)
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    println!("Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");

    println!();
    println!("{:<24} {:>12}", "Stage", "Mean (ms)");
    println!("{}", "-".repeat(40));

    let stage_extractors: &[(&str, StageExtractor)] = &[
        ("Skeleton", |d| d.timings.skeleton),
        ("Resolve", |d| d.timings.resolve),
        ("Trace", |d| d.timings.trace),
    ];

    for (name, extractor) in stage_extractors {
        let stage_mean = all_diagnostics
            .iter()
            .map(|d| extractor(d).as_secs_f64() * 1000.0)
            .sum::<f64>()
            / all_diagnostics.len() as f64;
        println!("{name:<24} {stage_mean:>10.3}ms");
    }
}
