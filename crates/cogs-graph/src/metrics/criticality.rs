//! Part criticality: how many vehicles depend on each part.
//!
//! A part's score is its degree in the bipartite graph. Every catalog part
//! is ranked, including unused parts with score 0, so the scores always sum
//! to the bipartite edge count.

use serde::Serialize;
use tracing::instrument;

use crate::graph::bipartite::BipartiteGraph;

/// One ranked part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartCriticality {
    pub part: String,
    /// Number of vehicles using the part.
    pub vehicles: usize,
}

/// Rank every part by the number of vehicles using it.
///
/// Sorted descending by score; equal scores keep catalog order.
#[must_use]
#[instrument(skip(bipartite), fields(parts = bipartite.part_count()))]
pub fn part_criticality(bipartite: &BipartiteGraph) -> Vec<PartCriticality> {
    let mut ranked: Vec<PartCriticality> = bipartite
        .part_nodes()
        .iter()
        .map(|&idx| PartCriticality {
            part: bipartite.name(idx).to_string(),
            vehicles: bipartite.degree(idx),
        })
        .collect();

    // Stable sort: ties stay in catalog order.
    ranked.sort_by(|a, b| b.vehicles.cmp(&a.vehicles));
    ranked
}

/// Names of the `n` most critical parts (fewer if the catalog is smaller).
#[must_use]
pub fn top_critical_parts(bipartite: &BipartiteGraph, n: usize) -> Vec<String> {
    part_criticality(bipartite)
        .into_iter()
        .take(n)
        .map(|entry| entry.part)
        .collect()
}

/// Parts no vehicle uses, in catalog order.
#[must_use]
pub fn unused_parts(bipartite: &BipartiteGraph) -> Vec<String> {
    bipartite
        .part_nodes()
        .iter()
        .filter(|&&idx| bipartite.degree(idx) == 0)
        .map(|&idx| bipartite.name(idx).to_string())
        .collect()
}
