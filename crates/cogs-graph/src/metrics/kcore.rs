//! k-core decomposition of the projection.
//!
//! # Overview
//!
//! The core number of a vehicle is the largest `k` such that the vehicle
//! belongs to a subgraph where every vehicle has at least `k` projected
//! neighbors. Edge weights are ignored.
//!
//! ## Algorithm
//!
//! Peeling: take the minimum remaining degree `d`, raise the threshold to
//! `k = max(k, d)`, then remove every vertex whose *current* degree is
//! `≤ k`, cascading as neighbors lose degree. Every vertex removed in a
//! round gets core number `k`. Each round rescans the remaining vertices,
//! so the cost is O(V² + E).
//!
//! The maximum core is the subgraph induced by the vehicles whose core
//! number equals `k_max`; its edges keep their shared-part payload.

use std::collections::BTreeMap;

use petgraph::graph::NodeIndex;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::projection::Projection;

/// Result of a k-core decomposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KCoreResult {
    /// Core number per projection vehicle.
    pub core_numbers: BTreeMap<String, usize>,
    /// Vehicles grouped by core number, each shell in catalog order.
    pub shells: BTreeMap<usize, Vec<String>>,
    /// Largest core number; 0 for an empty projection.
    pub k_max: usize,
    /// Subgraph induced by the vehicles with core number `k_max`.
    pub max_core: Projection,
}

impl KCoreResult {
    /// Core number of a vehicle, if it is in the projection.
    #[must_use]
    pub fn core_number(&self, vehicle: &str) -> Option<usize> {
        self.core_numbers.get(vehicle).copied()
    }
}

/// Compute core numbers and the maximum core of a projection.
#[must_use]
#[instrument(skip(projection), fields(vehicles = projection.vehicle_count()))]
pub fn k_core_decomposition(projection: &Projection) -> KCoreResult {
    let core = peel(projection);
    let k_max = core.iter().copied().max().unwrap_or(0);

    let mut core_numbers = BTreeMap::new();
    let mut shells: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for (i, name) in projection.vehicles().enumerate() {
        core_numbers.insert(name.to_string(), core[i]);
        shells.entry(core[i]).or_default().push(name.to_string());
    }

    let max_core = projection.induced(|idx: NodeIndex| core[idx.index()] == k_max);
    debug!(k_max, max_core = max_core.vehicle_count(), "k-core decomposition done");

    KCoreResult {
        core_numbers,
        shells,
        k_max,
        max_core,
    }
}

/// Core number per node index.
fn peel(projection: &Projection) -> Vec<usize> {
    let adjacency = projection.adjacency();
    let n = adjacency.node_count();

    let mut degree: Vec<usize> = (0..n).map(|v| adjacency.degree(v)).collect();
    let mut removed = vec![false; n];
    let mut queued = vec![false; n];
    let mut core = vec![0; n];
    let mut remaining = n;
    let mut k = 0;

    while remaining > 0 {
        let min_degree = (0..n)
            .filter(|&v| !removed[v])
            .map(|v| degree[v])
            .min()
            .unwrap_or(0);
        k = k.max(min_degree);

        let mut stack: Vec<usize> = (0..n)
            .filter(|&v| !removed[v] && degree[v] <= k)
            .collect();
        for &v in &stack {
            queued[v] = true;
        }

        while let Some(v) = stack.pop() {
            removed[v] = true;
            core[v] = k;
            remaining -= 1;

            for &u in adjacency.neighbors(v) {
                if removed[u] {
                    continue;
                }
                degree[u] -= 1;
                if degree[u] <= k && !queued[u] {
                    queued[u] = true;
                    stack.push(u);
                }
            }
        }
    }

    core
}
