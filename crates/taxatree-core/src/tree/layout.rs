//! 2D layout of the flattened tree.
//!
//! Horizontal position is a function of depth alone. Vertical positions
//! come from two walks: a post-order leaf tally, then a depth-first
//! placement pass that packs each subtree's leaves into its own band of
//! the canvas, so sibling subtrees can never overlap.

use serde::{Deserialize, Serialize};

use super::flatten::{Edge, FlatNode};
use crate::config::{DEFAULT_CANVAS_SPAN, DEFAULT_LEVEL_SEPARATION};

/// Tunable spacing for the layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Horizontal distance between consecutive depth levels.
    pub level_separation: f64,

    /// Total vertical span shared by all leaves. The per-leaf step is
    /// `canvas_span / (leaf_count + 1)`, keeping the diagram's vertical
    /// extent constant regardless of tree size.
    pub canvas_span: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            level_separation: DEFAULT_LEVEL_SEPARATION,
            canvas_span: DEFAULT_CANVAS_SPAN,
        }
    }
}

/// A computed node position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Computes a position for every flat node, indexed by flat id.
pub fn layout(nodes: &[FlatNode], edges: &[Edge], options: &LayoutOptions) -> Vec<Position> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let mut children = vec![Vec::new(); nodes.len()];
    for edge in edges {
        children[edge.parent].push(edge.child);
    }

    let mut leaf_counts = vec![0usize; nodes.len()];
    count_leaves(0, &children, &mut leaf_counts);

    let step = options.canvas_span / (leaf_counts[0] as f64 + 1.0);

    let mut positions = vec![Position { x: 0.0, y: 0.0 }; nodes.len()];
    place(
        0,
        0.0,
        step,
        step,
        options.level_separation,
        &children,
        &mut positions,
    );

    positions
}

/// Post-order leaf tally: a childless node counts as one leaf.
fn count_leaves(node: usize, children: &[Vec<usize>], counts: &mut [usize]) {
    if children[node].is_empty() {
        counts[node] = 1;
        return;
    }
    let mut total = 0;
    for &child in &children[node] {
        count_leaves(child, children, counts);
        total += counts[child];
    }
    counts[node] = total;
}

/// Positions `node` at depth `x`, packing its leaves upward from
/// `cursor`, and returns the first free y after this subtree.
///
/// A leaf claims the cursor and advances it one step. An internal node
/// positions each child in order through the running cursor, then
/// settles at the plain mean of its direct children's y values (not
/// leaf-weighted), keeping branch lines centered on their immediate
/// children.
fn place(
    node: usize,
    x: f64,
    cursor: f64,
    step: f64,
    level_separation: f64,
    children: &[Vec<usize>],
    positions: &mut [Position],
) -> f64 {
    if children[node].is_empty() {
        positions[node] = Position { x, y: cursor };
        return cursor + step;
    }

    let mut next = cursor;
    let mut sum = 0.0;
    for &child in &children[node] {
        next = place(
            child,
            x + level_separation,
            next,
            step,
            level_separation,
            children,
            positions,
        );
        sum += positions[child].y;
    }

    positions[node] = Position {
        x,
        y: sum / children[node].len() as f64,
    };
    next
}
