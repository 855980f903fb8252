//! Weighted vehicle-to-vehicle projection of the bipartite graph.
//!
//! # Overview
//!
//! Two vehicles are joined in the projection when they use at least one
//! common part. The edge weight is the number of shared parts and the edge
//! carries the shared part names (catalog order).
//!
//! ## Node Set
//!
//! Every vehicle that still uses at least one part is a node, in catalog
//! order. A vehicle whose parts have all been removed (for example by the
//! cascade simulator) drops out of the projection entirely, while a vehicle
//! with parts that nobody else uses stays as an isolated node.
//!
//! ## Determinism
//!
//! Pairs are visited as `(i, j)` with `i < j` in catalog order, so node
//! indices, edge indices, and edge endpoint order are all reproducible.
//! The graph is undirected; `weight_between(a, b) == weight_between(b, a)`
//! holds by construction.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::{debug, instrument};

use crate::graph::bipartite::BipartiteGraph;
use crate::graph::traverse::Adjacency;

/// Payload of a projected edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedParts {
    /// Number of shared parts. Always ≥ 1.
    pub weight: usize,
    /// Shared part names in catalog order.
    pub parts: Vec<String>,
}

/// Read-only view of one projected edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedEdge {
    /// Endpoint earlier in catalog order.
    pub a: String,
    /// Endpoint later in catalog order.
    pub b: String,
    pub weight: usize,
    pub shared: Vec<String>,
}

/// The weighted vehicle graph.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    /// Undirected graph: nodes = vehicle names, edges = shared parts.
    graph: UnGraph<String, SharedParts>,
    node_map: HashMap<String, NodeIndex>,
}

impl Projection {
    /// Project a bipartite graph onto its vehicles.
    ///
    /// Complexity is O(V² · average degree), which is fine for fleets of
    /// tens of vehicles. With fewer than two vehicles the projection has no
    /// edges.
    #[must_use]
    #[instrument(skip(bipartite), fields(vehicles = bipartite.vehicle_count()))]
    pub fn from_bipartite(bipartite: &BipartiteGraph) -> Self {
        // Sorted part lists per vehicle; vehicles without parts are dropped.
        let members: Vec<(&str, Vec<petgraph::stable_graph::NodeIndex>)> = bipartite
            .vehicle_nodes()
            .iter()
            .map(|&v| (bipartite.name(v), bipartite.sorted_neighbors(v)))
            .filter(|(_, parts)| !parts.is_empty())
            .collect();

        let mut projection = Self::with_vehicles(members.iter().map(|(name, _)| *name));

        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                let shared = sorted_intersection(&members[i].1, &members[j].1);
                if shared.is_empty() {
                    continue;
                }
                let parts: Vec<String> = shared
                    .into_iter()
                    .map(|p| bipartite.name(p).to_string())
                    .collect();
                projection.push_edge(
                    NodeIndex::new(i),
                    NodeIndex::new(j),
                    SharedParts {
                        weight: parts.len(),
                        parts,
                    },
                );
            }
        }

        debug!(
            nodes = projection.vehicle_count(),
            edges = projection.edge_count(),
            "projection built"
        );
        projection
    }

    /// A projection with the given nodes and no edges.
    pub(crate) fn with_vehicles<'a>(vehicles: impl IntoIterator<Item = &'a str>) -> Self {
        let mut projection = Self::default();
        for name in vehicles {
            let idx = projection.graph.add_node(name.to_string());
            projection.node_map.insert(name.to_string(), idx);
        }
        projection
    }

    /// Same nodes as `self`, no edges. Node indices are preserved.
    pub(crate) fn skeleton(&self) -> Self {
        Self::with_vehicles(self.vehicles())
    }

    pub(crate) fn push_edge(&mut self, a: NodeIndex, b: NodeIndex, shared: SharedParts) -> EdgeIndex {
        self.graph.add_edge(a, b, shared)
    }

    /// Subgraph induced by the nodes accepted by `keep`, catalog order kept.
    pub(crate) fn induced(&self, keep: impl Fn(NodeIndex) -> bool) -> Self {
        let kept: Vec<NodeIndex> = self.graph.node_indices().filter(|&idx| keep(idx)).collect();
        let mut sub = Self::with_vehicles(kept.iter().map(|&idx| self.graph[idx].as_str()));

        for edge in self.graph.edge_references() {
            if let (Some(a), Some(b)) = (
                kept.iter().position(|&idx| idx == edge.source()),
                kept.iter().position(|&idx| idx == edge.target()),
            ) {
                sub.push_edge(NodeIndex::new(a), NodeIndex::new(b), edge.weight().clone());
            }
        }
        sub
    }

    /// Read-only view of the underlying graph.
    #[must_use]
    pub const fn graph(&self) -> &UnGraph<String, SharedParts> {
        &self.graph
    }

    /// Number of vehicles (nodes).
    #[must_use]
    pub fn vehicle_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of projected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Return `true` if the projection has no edges.
    #[must_use]
    pub fn is_edgeless(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// Vehicle names in catalog order.
    pub fn vehicles(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_weights().map(String::as_str)
    }

    /// Look up the `NodeIndex` of a vehicle.
    #[must_use]
    pub fn node_index(&self, vehicle: &str) -> Option<NodeIndex> {
        self.node_map.get(vehicle).copied()
    }

    /// Vehicle name of a node.
    #[must_use]
    pub fn vehicle(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// Number of distinct neighbors of a vehicle.
    #[must_use]
    pub fn degree(&self, vehicle: &str) -> Option<usize> {
        self.node_index(vehicle)
            .map(|idx| self.graph.neighbors(idx).count())
    }

    /// Sum of incident edge weights of a vehicle.
    #[must_use]
    pub fn strength(&self, vehicle: &str) -> Option<usize> {
        self.node_index(vehicle).map(|idx| self.strength_of(idx))
    }

    pub(crate) fn strength_of(&self, idx: NodeIndex) -> usize {
        self.graph.edges(idx).map(|edge| edge.weight().weight).sum()
    }

    /// Sum of all edge weights.
    #[must_use]
    pub fn total_weight(&self) -> usize {
        self.graph.edge_weights().map(|shared| shared.weight).sum()
    }

    /// Weight of the edge between two vehicles, if any.
    #[must_use]
    pub fn weight_between(&self, a: &str, b: &str) -> Option<usize> {
        self.shared_between(a, b).map(<[String]>::len)
    }

    /// Shared part names between two vehicles, if they are adjacent.
    #[must_use]
    pub fn shared_between(&self, a: &str, b: &str) -> Option<&[String]> {
        let ia = self.node_index(a)?;
        let ib = self.node_index(b)?;
        let edge = self.graph.find_edge(ia, ib)?;
        Some(self.graph[edge].parts.as_slice())
    }

    /// All edges in emission order.
    #[must_use]
    pub fn edges(&self) -> Vec<ProjectedEdge> {
        self.graph
            .edge_references()
            .map(|edge| {
                let (a, b) = if edge.source() <= edge.target() {
                    (edge.source(), edge.target())
                } else {
                    (edge.target(), edge.source())
                };
                ProjectedEdge {
                    a: self.graph[a].clone(),
                    b: self.graph[b].clone(),
                    weight: edge.weight().weight,
                    shared: edge.weight().parts.clone(),
                }
            })
            .collect()
    }

    /// Connected components as vehicle-name lists, each in catalog order,
    /// ordered by their earliest vehicle.
    #[must_use]
    pub fn components(&self) -> Vec<Vec<String>> {
        self.adjacency()
            .components()
            .into_iter()
            .map(|component| {
                component
                    .into_iter()
                    .map(|i| self.graph[NodeIndex::new(i)].clone())
                    .collect()
            })
            .collect()
    }

    /// Size of the largest connected component; 0 when there are no vehicles.
    #[must_use]
    pub fn giant_component_size(&self) -> usize {
        self.adjacency().giant_component_size()
    }

    pub(crate) fn adjacency(&self) -> Adjacency {
        Adjacency::from_edges(
            self.graph.node_count(),
            self.graph
                .edge_references()
                .map(|edge| (edge.source().index(), edge.target().index())),
        )
    }
}

impl PartialEq for Projection {
    fn eq(&self, other: &Self) -> bool {
        self.vehicles().eq(other.vehicles()) && self.edges() == other.edges()
    }
}

impl Eq for Projection {}

impl Serialize for Projection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Projection", 2)?;
        state.serialize_field("vehicles", &self.vehicles().collect::<Vec<_>>())?;
        state.serialize_field("edges", &self.edges())?;
        state.end()
    }
}

/// Intersection of two sorted slices.
fn sorted_intersection<T: Ord + Copy>(a: &[T], b: &[T]) -> Vec<T> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
