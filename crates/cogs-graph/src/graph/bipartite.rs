//! Bipartite vehicle/part graph construction.
//!
//! # Overview
//!
//! This module turns a [`Catalog`] into a [`petgraph`] undirected graph with
//! two typed node sets. An edge `V - P` means "vehicle V uses part P". There
//! are never vehicle-vehicle or part-part edges.
//!
//! ## Node Order
//!
//! Vehicles are inserted first, in catalog order, followed by parts in
//! catalog order. Node indices therefore sort in catalog order within each
//! side, and every neighbor query below returns names in that order.
//!
//! ## Removal
//!
//! The graph is a [`StableUnGraph`], so removing a part or vehicle keeps the
//! indices of every other node valid. Removal is only offered on copies
//! ([`BipartiteGraph::without_parts`], [`BipartiteGraph::without_vehicles`]);
//! a built graph is never damaged in place by the public API.
//!
//! ## Content Hash
//!
//! [`BipartiteGraph::content_hash`] is a BLAKE3 hash of the node lists and
//! the edge set. Two identically constructed snapshots hash identically.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

use cogs_core::{Catalog, CatalogError};
use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use serde::Serialize;
use tracing::{debug, instrument, warn};

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// A typed node of the bipartite graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum NodeKind {
    Vehicle(String),
    Part(String),
}

impl NodeKind {
    /// The vehicle or part name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Vehicle(name) | Self::Part(name) => name,
        }
    }

    #[must_use]
    pub const fn is_vehicle(&self) -> bool {
        matches!(self, Self::Vehicle(_))
    }

    #[must_use]
    pub const fn is_part(&self) -> bool {
        matches!(self, Self::Part(_))
    }
}

// ---------------------------------------------------------------------------
// BipartiteGraph
// ---------------------------------------------------------------------------

/// The vehicle/part usage graph.
#[derive(Debug, Clone)]
pub struct BipartiteGraph {
    /// Undirected graph: nodes = vehicles and parts, edges = usage.
    graph: StableUnGraph<NodeKind, ()>,
    vehicle_map: HashMap<String, NodeIndex>,
    part_map: HashMap<String, NodeIndex>,
    /// Vehicle nodes in catalog order.
    vehicles: Vec<NodeIndex>,
    /// Part nodes in catalog order.
    parts: Vec<NodeIndex>,
    /// BLAKE3 content hash of the node lists and edge set.
    pub content_hash: String,
}

impl BipartiteGraph {
    /// Build a [`BipartiteGraph`] from a catalog.
    ///
    /// Duplicate usage entries collapse into a single edge.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a vehicle or part name is listed twice,
    /// or if a usage entry references a name missing from the catalog.
    #[instrument(skip(catalog), fields(vehicles = catalog.vehicles.len(), parts = catalog.parts.len()))]
    pub fn from_catalog(catalog: &Catalog) -> Result<Self, CatalogError> {
        let mut graph = StableUnGraph::<NodeKind, ()>::default();
        let mut vehicle_map = HashMap::with_capacity(catalog.vehicles.len());
        let mut part_map = HashMap::with_capacity(catalog.parts.len());
        let mut vehicles = Vec::with_capacity(catalog.vehicles.len());
        let mut parts = Vec::with_capacity(catalog.parts.len());

        // Step 1: vehicle nodes, then part nodes, both in catalog order.
        for name in &catalog.vehicles {
            if vehicle_map.contains_key(name) {
                return Err(CatalogError::DuplicateVehicle(name.clone()));
            }
            let idx = graph.add_node(NodeKind::Vehicle(name.clone()));
            vehicle_map.insert(name.clone(), idx);
            vehicles.push(idx);
        }

        for name in &catalog.parts {
            if part_map.contains_key(name) {
                return Err(CatalogError::DuplicatePart(name.clone()));
            }
            let idx = graph.add_node(NodeKind::Part(name.clone()));
            part_map.insert(name.clone(), idx);
            parts.push(idx);
        }

        // Step 2: usage edges. Unknown names abort the build.
        for (index, usage) in catalog.usages.iter().enumerate() {
            let vehicle = *vehicle_map
                .get(&usage.vehicle)
                .ok_or_else(|| CatalogError::UnknownVehicle {
                    index,
                    vehicle: usage.vehicle.clone(),
                })?;
            let part = *part_map
                .get(&usage.part)
                .ok_or_else(|| CatalogError::UnknownPart {
                    index,
                    part: usage.part.clone(),
                })?;

            // Avoid duplicate edges (petgraph allows them by default).
            if graph.contains_edge(vehicle, part) {
                debug!(vehicle = %usage.vehicle, part = %usage.part, "duplicate usage collapsed");
            } else {
                graph.add_edge(vehicle, part, ());
            }
        }

        let mut built = Self {
            graph,
            vehicle_map,
            part_map,
            vehicles,
            parts,
            content_hash: String::new(),
        };
        built.content_hash = built.compute_content_hash();

        for &idx in &built.vehicles {
            if built.graph.neighbors(idx).next().is_none() {
                warn!(vehicle = built.name(idx), "vehicle uses no parts");
            }
        }

        debug!(
            edges = built.edge_count(),
            hash = %built.content_hash,
            "bipartite graph built"
        );
        Ok(built)
    }

    /// Read-only view of the underlying graph. Every edge joins a vehicle
    /// to a part.
    #[must_use]
    pub const fn graph(&self) -> &StableUnGraph<NodeKind, ()> {
        &self.graph
    }

    /// Number of vehicle nodes.
    #[must_use]
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Number of part nodes.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Number of usage edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Vehicle names in catalog order.
    pub fn vehicle_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.vehicles.iter().map(|&idx| self.name(idx))
    }

    /// Part names in catalog order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.parts.iter().map(|&idx| self.name(idx))
    }

    /// Look up the `NodeIndex` of a vehicle.
    #[must_use]
    pub fn vehicle_index(&self, name: &str) -> Option<NodeIndex> {
        self.vehicle_map.get(name).copied()
    }

    /// Look up the `NodeIndex` of a part.
    #[must_use]
    pub fn part_index(&self, name: &str) -> Option<NodeIndex> {
        self.part_map.get(name).copied()
    }

    /// Return `true` if the part is present in this graph.
    #[must_use]
    pub fn contains_part(&self, name: &str) -> bool {
        self.part_map.contains_key(name)
    }

    /// Vehicle node indices in catalog order.
    #[must_use]
    pub fn vehicle_nodes(&self) -> &[NodeIndex] {
        &self.vehicles
    }

    /// Part node indices in catalog order.
    #[must_use]
    pub fn part_nodes(&self) -> &[NodeIndex] {
        &self.parts
    }

    /// Name of a node. Empty for an index that is not in the graph.
    #[must_use]
    pub fn name(&self, idx: NodeIndex) -> &str {
        self.graph.node_weight(idx).map_or("", NodeKind::name)
    }

    /// Number of edges incident to a node.
    #[must_use]
    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors(idx).count()
    }

    /// Neighbor indices of a node, sorted (catalog order).
    #[must_use]
    pub fn sorted_neighbors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors(idx).collect();
        neighbors.sort_unstable();
        neighbors
    }

    /// Parts used by a vehicle, in catalog order. `None` if the vehicle is absent.
    #[must_use]
    pub fn parts_of(&self, vehicle: &str) -> Option<Vec<&str>> {
        let idx = self.vehicle_index(vehicle)?;
        Some(
            self.sorted_neighbors(idx)
                .into_iter()
                .map(|n| self.name(n))
                .collect(),
        )
    }

    /// Vehicles using a part, in catalog order. `None` if the part is absent.
    #[must_use]
    pub fn vehicles_using(&self, part: &str) -> Option<Vec<&str>> {
        let idx = self.part_index(part)?;
        Some(
            self.sorted_neighbors(idx)
                .into_iter()
                .map(|n| self.name(n))
                .collect(),
        )
    }

    /// Copy of this graph with the named parts removed.
    ///
    /// Returns the copy and the names that were actually present and
    /// removed, in request order. Unknown or repeated names are ignored.
    #[must_use]
    pub fn without_parts<S: AsRef<str>>(&self, parts: &[S]) -> (Self, Vec<String>) {
        let mut copy = self.clone();
        let mut removed = Vec::new();
        for part in parts {
            let name: &str = part.as_ref();
            if copy.remove_part(name) {
                removed.push(name.to_string());
            }
        }
        copy.content_hash = copy.compute_content_hash();
        (copy, removed)
    }

    /// Copy of this graph with the named vehicles removed.
    ///
    /// Returns the copy and the names that were actually removed.
    #[must_use]
    pub fn without_vehicles<S: AsRef<str>>(&self, vehicles: &[S]) -> (Self, Vec<String>) {
        let mut copy = self.clone();
        let mut removed = Vec::new();
        for vehicle in vehicles {
            let name: &str = vehicle.as_ref();
            if let Some(idx) = copy.vehicle_map.remove(name) {
                copy.graph.remove_node(idx);
                copy.vehicles.retain(|&v| v != idx);
                removed.push(name.to_string());
            }
        }
        copy.content_hash = copy.compute_content_hash();
        (copy, removed)
    }

    /// Remove a part node and its edges in place.
    ///
    /// Only for private working copies (the cascade simulator). Returns
    /// `false` if the part is not present. The content hash is left stale.
    pub(crate) fn remove_part(&mut self, part: &str) -> bool {
        let Some(idx) = self.part_map.remove(part) else {
            return false;
        };
        self.graph.remove_node(idx);
        self.parts.retain(|&p| p != idx);
        true
    }

    /// Compute a BLAKE3 hash of both node lists and the edge set.
    fn compute_content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"vehicles\x00");
        for name in self.vehicle_names() {
            hasher.update(name.as_bytes());
            hasher.update(b"\x00");
        }
        hasher.update(b"parts\x00");
        for name in self.part_names() {
            hasher.update(name.as_bytes());
            hasher.update(b"\x00");
        }
        hasher.update(b"usage\x00");
        for &vehicle in &self.vehicles {
            for part in self.sorted_neighbors(vehicle) {
                hasher.update(self.name(vehicle).as_bytes());
                hasher.update(b"\x00");
                hasher.update(self.name(part).as_bytes());
                hasher.update(b"\x00");
            }
        }
        format!("blake3:{}", hasher.finalize())
    }

    /// Every edge as a (vehicle, part) name pair, vehicles in catalog order.
    #[must_use]
    pub fn usage_pairs(&self) -> Vec<(&str, &str)> {
        self.vehicles
            .iter()
            .flat_map(|&vehicle| {
                self.sorted_neighbors(vehicle)
                    .into_iter()
                    .map(move |part| (self.name(vehicle), self.name(part)))
            })
            .collect()
    }

    /// Return `true` if no edge joins two nodes of the same kind.
    #[must_use]
    pub fn is_bipartite(&self) -> bool {
        let vehicles: HashSet<NodeIndex> = self.vehicles.iter().copied().collect();
        self.graph.edge_indices().all(|edge| {
            self.graph
                .edge_endpoints(edge)
                .is_some_and(|(a, b)| vehicles.contains(&a) != vehicles.contains(&b))
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
