//! Chart payload for the Plotly front end.
//!
//! Converts a merged tree into the flat structure the browser draws:
//! positioned markers, right-angled connectors, and summary counts.
//! The same payload backs the JSON and SVG exports.

use serde::Serialize;
use taxatree_core::{flatten, layout, LayoutOptions, TaxonRank, TaxonomyTree};

/// Marker and connector color, matching the leaf-green theme.
const NODE_COLOR: &str = "#2E7D32";

const SPECIES_MARKER_SIZE: u32 = 8;
const ANCESTOR_MARKER_SIZE: u32 = 6;

/// Everything the renderer needs for one tree.
#[derive(Debug, Serialize)]
pub struct ChartData {
    pub nodes: Vec<ChartNode>,
    pub connectors: Vec<Connector>,
    pub stats: ChartStats,
}

/// One positioned marker.
#[derive(Debug, Serialize)]
pub struct ChartNode {
    pub x: f64,
    pub y: f64,

    /// Hover text, formatted as "Rank: Name".
    pub hover: String,

    /// Inline label. Species only; other ranks are hover-only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    pub color: String,
    pub size: u32,
}

/// A right-angled connector: down from the parent, then across to the
/// child. Three points, drawn as one polyline.
#[derive(Debug, Serialize)]
pub struct Connector {
    pub x: [f64; 3],
    pub y: [f64; 3],
}

/// Summary counts shown alongside the tree.
#[derive(Debug, Serialize)]
pub struct ChartStats {
    pub species: usize,
    pub families: usize,
    pub orders: usize,
}

impl ChartData {
    /// Flattens, lays out, and restyles a tree for rendering.
    ///
    /// The synthetic flat root (id 0) anchors the layout but is not a
    /// taxon: it gets no marker, and edges from it are not drawn.
    pub fn build(tree: &TaxonomyTree, options: &LayoutOptions) -> Self {
        let (nodes, edges) = flatten(tree);
        let positions = layout(&nodes, &edges, options);

        let mut chart_nodes = Vec::with_capacity(nodes.len().saturating_sub(1));
        for node in nodes.iter().skip(1) {
            let position = positions[node.id];
            let species = node.rank == Some(TaxonRank::Species);

            let label = if species {
                if node.common_name.is_empty() {
                    Some(node.name.clone())
                } else {
                    Some(format!("{}<br>{}", node.name, node.common_name))
                }
            } else {
                None
            };

            chart_nodes.push(ChartNode {
                x: position.x,
                y: position.y,
                hover: hover_text(node.rank, &node.name),
                label,
                color: NODE_COLOR.to_string(),
                size: if species {
                    SPECIES_MARKER_SIZE
                } else {
                    ANCESTOR_MARKER_SIZE
                },
            });
        }

        let mut connectors = Vec::new();
        for edge in &edges {
            if edge.parent == 0 {
                continue;
            }
            let parent = positions[edge.parent];
            let child = positions[edge.child];
            connectors.push(Connector {
                x: [parent.x, parent.x, child.x],
                y: [parent.y, child.y, child.y],
            });
        }

        ChartData {
            nodes: chart_nodes,
            connectors,
            stats: ChartStats {
                species: tree.species_count(),
                families: tree.rank_count(TaxonRank::Family),
                orders: tree.rank_count(TaxonRank::Order),
            },
        }
    }
}

fn hover_text(rank: Option<TaxonRank>, name: &str) -> String {
    let rank_name = rank.map(|r| r.display_name()).unwrap_or_default();
    if name.is_empty() {
        rank_name.to_string()
    } else {
        format!("{}: {}", rank_name, name)
    }
}
