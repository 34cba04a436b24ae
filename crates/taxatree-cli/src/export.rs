//! File export of a rendered tree.
//!
//! The output format follows the file extension: `.svg` draws the
//! chart with right-angled connectors and species labels, `.json`
//! dumps the raw chart payload for external tooling.

use std::path::Path;

use color_eyre::eyre::{bail, Result};
use svg::node::element::{Circle, Group, Line, Rectangle, Text};
use svg::Document;

use taxatree_core::{LayoutOptions, TaxonomyTree};

use crate::chart::ChartData;

const CANVAS_WIDTH: f64 = 1200.0;
const CANVAS_HEIGHT: f64 = 800.0;
const MARGIN_X: f64 = 50.0;
const MARGIN_Y: f64 = 30.0;

/// Room on the right so species labels stay inside the canvas.
const LABEL_GUTTER: f64 = 220.0;

const LABEL_FONT_SIZE: f64 = 10.0;

/// Writes the tree to `path` in the format its extension names.
pub fn write_chart(tree: &TaxonomyTree, options: &LayoutOptions, path: &Path) -> Result<()> {
    let chart = ChartData::build(tree, options);
    match path.extension().and_then(|e| e.to_str()) {
        Some("svg") => write_svg(&chart, path),
        Some("json") => write_json(&chart, path),
        _ => bail!(
            "unsupported output format '{}'; use a .svg or .json path",
            path.display()
        ),
    }
}

fn write_json(chart: &ChartData, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(chart)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn write_svg(chart: &ChartData, path: &Path) -> Result<()> {
    let inner_width = CANVAS_WIDTH - 2.0 * MARGIN_X - LABEL_GUTTER;
    let inner_height = CANVAS_HEIGHT - 2.0 * MARGIN_Y;

    let max_x = chart.nodes.iter().map(|n| n.x).fold(0.0, f64::max);
    let max_y = chart.nodes.iter().map(|n| n.y).fold(0.0, f64::max);

    let scale_x = if max_x <= f64::EPSILON {
        1.0
    } else {
        inner_width / max_x
    };
    let scale_y = if max_y <= f64::EPSILON {
        1.0
    } else {
        inner_height / max_y
    };

    let to_px = |x: f64, y: f64| (MARGIN_X + x * scale_x, MARGIN_Y + y * scale_y);

    let mut document = Document::new()
        .set("width", CANVAS_WIDTH)
        .set("height", CANVAS_HEIGHT)
        .set(
            "viewBox",
            (0, 0, CANVAS_WIDTH as i32, CANVAS_HEIGHT as i32),
        );

    let background = Rectangle::new()
        .set("width", "100%")
        .set("height", "100%")
        .set("fill", "white");
    document = document.add(background);

    let mut tree_group = Group::new().set("id", "tree");

    // Connectors first so markers sit on top of them.
    for connector in &chart.connectors {
        let (px, py) = to_px(connector.x[0], connector.y[0]);
        let (ex, ey) = to_px(connector.x[2], connector.y[2]);

        let drop = Line::new()
            .set("x1", px)
            .set("y1", py)
            .set("x2", px)
            .set("y2", ey)
            .set("stroke", connector_color(chart))
            .set("stroke-width", 1.0);
        tree_group = tree_group.add(drop);

        let run = Line::new()
            .set("x1", px)
            .set("y1", ey)
            .set("x2", ex)
            .set("y2", ey)
            .set("stroke", connector_color(chart))
            .set("stroke-width", 1.0);
        tree_group = tree_group.add(run);
    }

    for node in &chart.nodes {
        let (x, y) = to_px(node.x, node.y);

        let circle = Circle::new()
            .set("cx", x)
            .set("cy", y)
            .set("r", node.size as f64 / 2.0)
            .set("fill", node.color.as_str());
        tree_group = tree_group.add(circle);

        if let Some(label) = &node.label {
            let text_content = svg::node::Text::new(label.replace("<br>", " - "));
            let text = Text::new("")
                .set("x", x + node.size as f64 / 2.0 + 4.0)
                .set("y", y)
                .set("font-size", LABEL_FONT_SIZE)
                .set("font-family", "sans-serif")
                .set("fill", "#1B1F23")
                .set("dominant-baseline", "middle")
                .set("text-anchor", "start")
                .add(text_content);
            tree_group = tree_group.add(text);
        }
    }

    document = document.add(tree_group);

    svg::save(path, &document)?;
    Ok(())
}

fn connector_color(chart: &ChartData) -> &str {
    chart
        .nodes
        .first()
        .map(|n| n.color.as_str())
        .unwrap_or("#2E7D32")
}
