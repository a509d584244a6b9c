//! SVG export serializer.
//!
//! Renders a [`CoveragePlan`] with the [`svg`] crate handling document
//! construction, XML escaping, and path data formatting. The document
//! stacks four groups, bottom to top:
//!
//! - `tiles`: one filled square per existing tile
//! - `cells`: the thin 2×2 subdivision of each tile
//! - `skeleton`: the spanning tree, joining tile centres
//! - `route`: the closed coverage route through cell centres
//!
//! Optional [`SvgMetadata`] embeds `<title>`, `<desc>`, and a namespaced
//! `<metadata>` element carrying the plan configuration.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Description, Element, Group, Line, Path, Rectangle, Title};
use svg::node::{Node, Text};

use hpgg_pipeline::{CellCoord, CoveragePlan, TileCoord};

/// Edge length of one cell in SVG user units. A tile is two cells wide.
pub const CELL_SIZE: f64 = 20.0;

/// Metadata to embed in the SVG document.
///
/// All fields are optional. Text values are XML-escaped by the `svg`
/// crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,

    /// Serialized plan configuration, emitted inside `<metadata>` as a
    /// namespaced `<hpgg:plan>` element so exported files can be
    /// reproduced.
    pub config_json: Option<&'a str>,
}

#[allow(clippy::cast_precision_loss)]
fn units(cells: usize) -> f64 {
    cells as f64 * CELL_SIZE
}

/// Centre of a cell in user units.
fn cell_centre(cell: CellCoord) -> (f64, f64) {
    (
        units(cell.col) + CELL_SIZE / 2.0,
        units(cell.row) + CELL_SIZE / 2.0,
    )
}

/// Centre of a tile in user units.
fn tile_centre(tile: TileCoord) -> (f64, f64) {
    (units(2 * tile.col + 1), units(2 * tile.row + 1))
}

/// Build the closed route path data; `None` for an empty route.
fn route_data(plan: &CoveragePlan) -> Option<Data> {
    let cells = plan.route().cells();
    let (first, rest) = cells.split_first()?;
    let mut data = Data::new().move_to(cell_centre(*first));
    for cell in rest {
        data = data.line_to(cell_centre(*cell));
    }
    Some(data.close())
}

/// Serialize a coverage plan into an SVG document string.
#[must_use]
pub fn to_svg(plan: &CoveragePlan, metadata: &SvgMetadata<'_>) -> String {
    let tiles = plan.tiles();
    let width = units(2 * tiles.cols());
    let height = units(2 * tiles.rows());

    let mut doc = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", (0.0, 0.0, width, height));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }
    if let Some(config_json) = metadata.config_json {
        let mut plan_el = Element::new("hpgg:plan");
        plan_el.assign("xmlns:hpgg", "https://hpgg.dev/ns/1");
        plan_el.append(Text::new(config_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(plan_el);
        doc = doc.add(metadata_el);
    }

    let mut tile_group = Group::new()
        .set("id", "tiles")
        .set("fill", "#e6e6e6")
        .set("stroke", "black")
        .set("stroke-width", 2);
    let mut cell_group = Group::new()
        .set("id", "cells")
        .set("fill", "none")
        .set("stroke", "#b0b0b0")
        .set("stroke-width", 0.5);
    for tile in tiles.matrix().existing() {
        let origin = tile.origin_cell();
        tile_group = tile_group.add(
            Rectangle::new()
                .set("x", units(origin.col))
                .set("y", units(origin.row))
                .set("width", units(2))
                .set("height", units(2)),
        );
        cell_group = cell_group
            .add(
                Line::new()
                    .set("x1", units(origin.col + 1))
                    .set("y1", units(origin.row))
                    .set("x2", units(origin.col + 1))
                    .set("y2", units(origin.row + 2)),
            )
            .add(
                Line::new()
                    .set("x1", units(origin.col))
                    .set("y1", units(origin.row + 1))
                    .set("x2", units(origin.col + 2))
                    .set("y2", units(origin.row + 1)),
            );
    }

    let mut skeleton_group = Group::new()
        .set("id", "skeleton")
        .set("stroke", "#c03030")
        .set("stroke-width", 1.5)
        .set("stroke-dasharray", "4 3");
    for &(a, b) in plan.skeleton().edges() {
        let (x1, y1) = tile_centre(a);
        let (x2, y2) = tile_centre(b);
        skeleton_group = skeleton_group.add(
            Line::new()
                .set("x1", x1)
                .set("y1", y1)
                .set("x2", x2)
                .set("y2", y2),
        );
    }

    doc = doc.add(tile_group).add(cell_group).add(skeleton_group);

    if let Some(data) = route_data(plan) {
        doc = doc.add(
            Path::new()
                .set("id", "route")
                .set("d", data)
                .set("fill", "none")
                .set("stroke", "#1f4fbf")
                .set("stroke-width", 2)
                .set("stroke-linejoin", "round"),
        );
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}
