//! hpgg-export: Pure format serializers (sans-IO)
//!
//! Renders tile grids and coverage plans as plain text, SVG, and TikZ.
//! Every function returns a `String`; writing it anywhere is the caller's
//! business.

pub mod svg;
pub mod text;
pub mod tikz;

pub use svg::{SvgMetadata, to_svg};
pub use text::{glyph, path_to_text, tiles_to_text};
pub use tikz::{plan_to_tikz, to_tikz};
