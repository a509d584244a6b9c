//! Plain-text dumps for terminals and logs.

use hpgg_pipeline::{PathCode, PathMatrix, TileGrid};

/// Box-drawing glyph for one path code.
///
/// Absent cells render as a space and undrawn cells as a middle dot, so an
/// unfinished matrix is easy to spot.
#[must_use]
pub const fn glyph(code: PathCode) -> char {
    match code {
        PathCode::Absent => ' ',
        PathCode::Empty => '·',
        PathCode::Horizontal => '─',
        PathCode::Vertical => '│',
        PathCode::NorthEast => '└',
        PathCode::NorthWest => '┘',
        PathCode::SouthEast => '┌',
        PathCode::SouthWest => '┐',
    }
}

/// The tile grid in its textual input format (`x` tile, `.` hole).
///
/// The output parses back into the same grid.
#[must_use]
pub fn tiles_to_text(tiles: &TileGrid) -> String {
    tiles.matrix().to_string()
}

/// One line of glyphs per cell row.
#[must_use]
pub fn path_to_text(path_matrix: &PathMatrix) -> String {
    let mut out = String::with_capacity(path_matrix.rows() * (path_matrix.cols() * 3 + 1));
    for x in 0..path_matrix.rows() {
        out.extend(path_matrix.row(x).iter().map(|&code| glyph(code)));
        out.push('\n');
    }
    out
}
