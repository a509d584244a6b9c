//! TikZ figure export for LaTeX documents.
//!
//! One tile is one TikZ unit; rows grow downward, so a tile at `(i, j)`
//! spans `(j, -i)` to `(j + 1, -i - 1)`. Coordinates are built from
//! integer quarter units, which keeps the output exact.

use std::fmt::Write;

use hpgg_pipeline::{CellCoord, CoveragePlan, TileGrid};

const FIGURE_BEGIN: &str = r"\begin{figure}
    \centering
    \begin{tikzpicture}
        \tikzstyle{cell} = [draw, thick, minimum size=1cm]

";

const FIGURE_END: &str = r"
    \end{tikzpicture}
    \caption{xxx}
    \label{fig:xxx}
\end{figure}
";

const INDENT: &str = "        ";

/// Format a length given in quarter units (`0.25`).
fn quarters(q: usize) -> String {
    let whole = q / 4;
    match q % 4 {
        0 => whole.to_string(),
        1 => format!("{whole}.25"),
        2 => format!("{whole}.5"),
        _ => format!("{whole}.75"),
    }
}

/// A TikZ point `(x,-y)` from quarter-unit offsets east and south.
fn point(east: usize, south: usize) -> String {
    let y = quarters(south);
    if south == 0 {
        format!("({},{y})", quarters(east))
    } else {
        format!("({},-{y})", quarters(east))
    }
}

fn write_tiles(out: &mut String, tiles: &TileGrid) {
    let _ = writeln!(out, "{INDENT}% Tiles");
    for tile in tiles.matrix().existing() {
        let (x, y) = (4 * tile.col, 4 * tile.row);
        let _ = writeln!(
            out,
            "{INDENT}\\draw[fill=gray!20, draw=black, very thick] {} rectangle {};",
            point(x, y),
            point(x + 4, y + 4),
        );
    }

    let _ = writeln!(out, "\n{INDENT}% Inner cells");
    for tile in tiles.matrix().existing() {
        let origin = tile.origin_cell();
        for (dr, dc) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let (x, y) = (2 * (origin.col + dc), 2 * (origin.row + dr));
            let _ = writeln!(
                out,
                "{INDENT}\\draw[draw=gray, thin] {} rectangle {};",
                point(x, y),
                point(x + 2, y + 2),
            );
        }
    }
}

fn cell_centre(cell: CellCoord) -> String {
    point(2 * cell.col + 1, 2 * cell.row + 1)
}

/// TikZ figure of the tile grid and its cell subdivision.
#[must_use]
pub fn to_tikz(tiles: &TileGrid) -> String {
    let mut out = String::from(FIGURE_BEGIN);
    write_tiles(&mut out, tiles);
    out.push_str(FIGURE_END);
    out
}

/// TikZ figure of a plan: tiles, cells, and the closed route.
#[must_use]
pub fn plan_to_tikz(plan: &CoveragePlan) -> String {
    let mut out = String::from(FIGURE_BEGIN);
    write_tiles(&mut out, plan.tiles());

    let cells = plan.route().cells();
    if !cells.is_empty() {
        let _ = writeln!(out, "\n{INDENT}% Route");
        let points: Vec<String> = cells.iter().map(|&c| cell_centre(c)).collect();
        let _ = writeln!(
            out,
            "{INDENT}\\draw[red, thick] {} -- cycle;",
            points.join(" -- ")
        );
    }

    out.push_str(FIGURE_END);
    out
}
