//! Flattening the merged tree into renderer-ready nodes and edges.
//!
//! Taxonomic ids are replaced by a dense 0-based id space assigned in
//! traversal order: a taxon id can in principle repeat across unrelated
//! branches, and the layout engine wants a plain index space anyway.

use serde::Serialize;

use super::TaxonomyTree;
use crate::taxonomy::TaxonRank;

/// A node in the flattened view.
///
/// Id 0 is the synthetic root anchoring the top-level nodes; it carries
/// an empty name and no rank, and renderers skip it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatNode {
    pub id: usize,
    pub name: String,
    pub common_name: String,

    /// None only on the synthetic root.
    pub rank: Option<TaxonRank>,
}

/// A parent → child connection between flat node ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub parent: usize,
    pub child: usize,
}

/// Flattens a tree into pre-order node and edge lists.
///
/// Ids are assigned by a strictly increasing counter in visitation
/// order; an edge is emitted as each child is visited. Siblings keep
/// the arena's insertion order.
pub fn flatten(tree: &TaxonomyTree) -> (Vec<FlatNode>, Vec<Edge>) {
    let mut nodes = Vec::with_capacity(tree.nodes.len() + 1);
    let mut edges = Vec::with_capacity(tree.nodes.len());

    nodes.push(FlatNode {
        id: 0,
        name: String::new(),
        common_name: String::new(),
        rank: None,
    });

    for &root in &tree.roots {
        visit(tree, root, 0, &mut nodes, &mut edges);
    }

    (nodes, edges)
}

fn visit(
    tree: &TaxonomyTree,
    index: usize,
    parent_id: usize,
    nodes: &mut Vec<FlatNode>,
    edges: &mut Vec<Edge>,
) {
    let node = &tree.nodes[index];
    let id = nodes.len();
    nodes.push(FlatNode {
        id,
        name: node.name.clone(),
        common_name: node.common_name.clone(),
        rank: Some(node.rank),
    });
    edges.push(Edge {
        parent: parent_id,
        child: id,
    });

    for &child in &node.children {
        visit(tree, child, id, nodes, edges);
    }
}
