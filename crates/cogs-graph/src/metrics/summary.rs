//! Basic structural statistics for either graph.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: size of the graph.
//! - **density**: `2E / (N(N − 1))` for an undirected simple graph. Zero
//!   for graphs with 0 or 1 node.
//! - **component_count**: number of connected components.
//! - **isolated_node_count**: nodes with no edges at all.
//! - **diameter**, **center**, **average_path_length**: unweighted
//!   shortest-path statistics, only reported when the graph is connected.
//!   The center lists the nodes of minimum eccentricity in graph order.
//!
//! An empty graph is reported as not connected.

use std::collections::HashMap;

use petgraph::stable_graph::NodeIndex;
use serde::Serialize;

use crate::graph::bipartite::BipartiteGraph;
use crate::graph::projection::Projection;
use crate::graph::traverse::Adjacency;

// ---------------------------------------------------------------------------
// GraphSummary
// ---------------------------------------------------------------------------

/// Summary statistics for a graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub connected: bool,
    pub component_count: usize,
    pub isolated_node_count: usize,
    /// Longest shortest path. `None` unless connected.
    pub diameter: Option<usize>,
    /// Nodes whose eccentricity equals the radius. Empty unless connected.
    pub center: Vec<String>,
    /// Mean shortest-path length over ordered node pairs. `None` unless
    /// connected; `0.0` for a single node.
    pub average_path_length: Option<f64>,
}

impl GraphSummary {
    /// Summarize the vehicle projection (weights ignored).
    #[must_use]
    pub fn of_projection(projection: &Projection) -> Self {
        let names: Vec<&str> = projection.vehicles().collect();
        summarize(&names, &projection.adjacency())
    }

    /// Summarize the bipartite graph, vehicles and parts together.
    #[must_use]
    pub fn of_bipartite(bipartite: &BipartiteGraph) -> Self {
        let nodes: Vec<NodeIndex> = bipartite
            .vehicle_nodes()
            .iter()
            .chain(bipartite.part_nodes())
            .copied()
            .collect();
        let position: HashMap<NodeIndex, usize> =
            nodes.iter().enumerate().map(|(i, &idx)| (idx, i)).collect();

        let edges = bipartite.graph().edge_indices().filter_map(|edge| {
            let (a, b) = bipartite.graph().edge_endpoints(edge)?;
            Some((*position.get(&a)?, *position.get(&b)?))
        });
        let adjacency = Adjacency::from_edges(nodes.len(), edges);

        let names: Vec<&str> = nodes.iter().map(|&idx| bipartite.name(idx)).collect();
        summarize(&names, &adjacency)
    }
}

#[allow(clippy::cast_precision_loss)]
fn summarize(names: &[&str], adjacency: &Adjacency) -> GraphSummary {
    let n = adjacency.node_count();
    let edge_count = (0..n).map(|v| adjacency.degree(v)).sum::<usize>() / 2;
    let density = if n < 2 {
        0.0
    } else {
        (2 * edge_count) as f64 / (n * (n - 1)) as f64
    };
    let component_count = adjacency.components().len();
    let isolated_node_count = (0..n).filter(|&v| adjacency.degree(v) == 0).count();
    let connected = n > 0 && component_count == 1;

    let mut summary = GraphSummary {
        node_count: n,
        edge_count,
        density,
        connected,
        component_count,
        isolated_node_count,
        diameter: None,
        center: Vec::new(),
        average_path_length: None,
    };
    if !connected {
        return summary;
    }

    // All-pairs BFS; fine for graphs of this size.
    let mut eccentricity = Vec::with_capacity(n);
    let mut path_total = 0usize;
    for source in 0..n {
        let distances = adjacency.distances_from(source);
        let reachable = distances.iter().flatten();
        path_total += reachable.clone().sum::<usize>();
        eccentricity.push(reachable.copied().max().unwrap_or(0));
    }

    let radius = eccentricity.iter().copied().min().unwrap_or(0);
    summary.diameter = eccentricity.iter().copied().max();
    summary.center = eccentricity
        .iter()
        .enumerate()
        .filter(|&(_, &e)| e == radius)
        .map(|(i, _)| names[i].to_string())
        .collect();
    summary.average_path_length = Some(if n < 2 {
        0.0
    } else {
        path_total as f64 / (n * (n - 1)) as f64
    });
    summary
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
