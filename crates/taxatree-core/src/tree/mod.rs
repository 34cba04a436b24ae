//! The merged taxonomy tree.
//!
//! Chains from many observations fold into one arena-backed hierarchy:
//! nodes live in a flat `Vec` and address each other by index, with the
//! top-level kingdoms (or the filter taxon) listed in `roots`. The
//! logical root above the kingdoms is never materialized.

mod flatten;
mod layout;

pub use flatten::{flatten, Edge, FlatNode};
pub use layout::{layout, LayoutOptions, Position};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extract::{AncestryChain, SpeciesLink};
use crate::taxonomy::TaxonRank;

/// Errors surfaced by the explicit tree integrity check.
#[derive(Debug, Error)]
pub enum HierarchyError {
    #[error("integrity violation: {0}")]
    IntegrityViolation(String),
}

/// One node of the merged tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonNode {
    pub taxon_id: u64,

    pub name: String,

    /// Vernacular name. Non-empty only on species nodes.
    pub common_name: String,

    pub rank: TaxonRank,

    pub parent: Option<usize>,

    pub children: Vec<usize>,
}

/// Restricts a merge to the subtree rooted at a single taxon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeFilter {
    pub rank: TaxonRank,
    pub taxon_id: u64,
}

/// The merged taxonomy hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyTree {
    pub nodes: Vec<TaxonNode>,

    /// Indices of the top-level nodes.
    pub roots: Vec<usize>,
}

impl TaxonomyTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges ancestry chains into a single deduplicated tree.
    ///
    /// Each chain's ancestor links are walked in order from kingdom. A
    /// link with an absent id, or whose rank breaks the consecutive
    /// sequence, stops that chain: nothing deeper is placed, including
    /// the species. Only when every ancestor link placed cleanly is the
    /// species attached as a leaf under the deepest placed ancestor.
    ///
    /// With a filter, the chain's link at the filter rank must carry the
    /// filter taxon id or the chain contributes nothing; the matching
    /// node becomes a top-level root and nothing above it is placed. A
    /// filter that matches no chain yields an empty tree, which callers
    /// report as "no results" rather than an error.
    pub fn merge(chains: &[AncestryChain], filter: Option<&TreeFilter>) -> Self {
        let mut tree = Self::new();
        for chain in chains {
            tree.add_chain(chain, filter);
        }
        debug_assert!(tree.check_integrity().is_ok());
        tree
    }

    fn add_chain(&mut self, chain: &AncestryChain, filter: Option<&TreeFilter>) {
        let mut parent: Option<usize> = None;
        let mut placing = filter.is_none();
        let mut expected = Some(TaxonRank::Kingdom);

        for link in &chain.ancestors {
            if expected != Some(link.rank) {
                return;
            }
            expected = link.rank.next();

            let Some(taxon_id) = link.taxon_id else {
                return;
            };

            if let Some(f) = filter {
                if !placing {
                    // Above the filter rank nothing is placed; at the
                    // filter rank the id decides whether the chain
                    // belongs at all.
                    if link.rank != f.rank {
                        continue;
                    }
                    if taxon_id != f.taxon_id {
                        return;
                    }
                    placing = true;
                }
            }

            let index = self.place_child(parent, taxon_id, &link.name, link.rank);
            parent = Some(index);
        }

        if placing {
            self.place_species(parent, &chain.species);
        }
    }

    /// Returns the child of `parent` carrying `taxon_id`, creating it if
    /// absent. Existing names are kept as first written.
    fn place_child(
        &mut self,
        parent: Option<usize>,
        taxon_id: u64,
        name: &str,
        rank: TaxonRank,
    ) -> usize {
        let siblings = match parent {
            Some(p) => &self.nodes[p].children,
            None => &self.roots,
        };
        let existing = siblings
            .iter()
            .copied()
            .find(|&c| self.nodes[c].taxon_id == taxon_id);
        if let Some(index) = existing {
            return index;
        }

        let index = self.nodes.len();
        self.nodes.push(TaxonNode {
            taxon_id,
            name: name.to_string(),
            common_name: String::new(),
            rank,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.nodes[p].children.push(index),
            None => self.roots.push(index),
        }
        index
    }

    /// Places the species leaf, overwriting its name and common name.
    /// The observation's own taxon record is authoritative every time.
    fn place_species(&mut self, parent: Option<usize>, species: &SpeciesLink) {
        let index = self.place_child(parent, species.taxon_id, &species.name, TaxonRank::Species);
        let node = &mut self.nodes[index];
        node.name = species.name.clone();
        node.common_name = species.common_name.clone();
    }

    /// Verifies the structural invariants of the tree.
    ///
    /// Checks parent/child index agreement, per-parent taxon id
    /// uniqueness, single-step rank descent for ancestor nodes, and that
    /// only species carry a common name.
    pub fn check_integrity(&self) -> Result<(), HierarchyError> {
        let violation = |message: String| Err(HierarchyError::IntegrityViolation(message));

        for (index, node) in self.nodes.iter().enumerate() {
            match node.parent {
                Some(p) => {
                    let Some(parent) = self.nodes.get(p) else {
                        return violation(format!("node {index} has dangling parent {p}"));
                    };
                    if !parent.children.contains(&index) {
                        return violation(format!("node {index} missing from parent {p}"));
                    }
                    if node.rank == TaxonRank::Species {
                        if parent.rank >= TaxonRank::Species {
                            return violation(format!(
                                "species node {index} under species node {p}"
                            ));
                        }
                    } else if parent.rank.next() != Some(node.rank) {
                        return violation(format!(
                            "node {index} at rank {} under parent at rank {}",
                            node.rank.display_name(),
                            parent.rank.display_name()
                        ));
                    }
                }
                None => {
                    if !self.roots.contains(&index) {
                        return violation(format!("orphan node {index} is not a root"));
                    }
                }
            }

            let mut seen = HashSet::new();
            for &child in &node.children {
                let Some(child_node) = self.nodes.get(child) else {
                    return violation(format!("node {index} has dangling child {child}"));
                };
                if child_node.parent != Some(index) {
                    return violation(format!("child {child} does not point back to {index}"));
                }
                if !seen.insert(child_node.taxon_id) {
                    return violation(format!(
                        "duplicate taxon id {} under node {index}",
                        child_node.taxon_id
                    ));
                }
            }

            if node.rank != TaxonRank::Species && !node.common_name.is_empty() {
                return violation(format!("non-species node {index} has a common name"));
            }
        }

        let mut seen = HashSet::new();
        for &root in &self.roots {
            let Some(node) = self.nodes.get(root) else {
                return violation(format!("dangling root index {root}"));
            };
            if node.parent.is_some() {
                return violation(format!("root {root} has a parent"));
            }
            if !seen.insert(node.taxon_id) {
                return violation(format!("duplicate taxon id {} among roots", node.taxon_id));
            }
        }

        Ok(())
    }

    /// True when the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of species leaves.
    pub fn species_count(&self) -> usize {
        self.rank_count(TaxonRank::Species)
    }

    /// Number of nodes at the given rank.
    pub fn rank_count(&self, rank: TaxonRank) -> usize {
        self.nodes.iter().filter(|n| n.rank == rank).count()
    }
}
