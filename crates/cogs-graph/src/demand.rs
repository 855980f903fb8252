//! Community-based demand prediction.
//!
//! # Overview
//!
//! Within a platform family (a community of at least two vehicles), a part
//! used by at least `threshold × size` members is a *standard* part of that
//! family. A member that lacks a standard part is a likely future buyer of
//! it, so the forecast lists, per vehicle, the standard parts it is missing.
//!
//! Singleton communities have no standard and are left out entirely.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::community::CommunityPartition;
use crate::graph::bipartite::BipartiteGraph;

/// Standard parts per community and missing parts per vehicle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DemandForecast {
    /// Community index → standard parts, catalog order.
    pub standards: BTreeMap<usize, Vec<String>>,
    /// Vehicle → standard parts it lacks, catalog order. Only vehicles
    /// with at least one gap are listed.
    pub suggestions: BTreeMap<String, Vec<String>>,
}

impl DemandForecast {
    /// Total number of suggested (vehicle, part) pairs.
    #[must_use]
    pub fn suggestion_count(&self) -> usize {
        self.suggestions.values().map(Vec::len).sum()
    }
}

/// Predict missing standard parts from a community partition.
///
/// `threshold` is the share of members (in `(0, 1]`) that must use a part
/// for it to become a standard.
#[must_use]
#[allow(clippy::cast_precision_loss)]
#[instrument(skip(bipartite, partition), fields(communities = partition.len()))]
pub fn predict_demand(
    bipartite: &BipartiteGraph,
    partition: &CommunityPartition,
    threshold: f64,
) -> DemandForecast {
    let mut forecast = DemandForecast::default();

    for (index, members) in partition.with_min_size(2) {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for vehicle in members {
            for part in bipartite.parts_of(vehicle).unwrap_or_default() {
                *counts.entry(part).or_default() += 1;
            }
        }

        let required = threshold * members.len() as f64;
        let standard: Vec<&str> = bipartite
            .part_names()
            .filter(|part| counts.get(part).is_some_and(|&c| c as f64 >= required))
            .collect();

        for vehicle in members {
            let owned = bipartite.parts_of(vehicle).unwrap_or_default();
            let missing: Vec<String> = standard
                .iter()
                .filter(|part| !owned.contains(*part))
                .map(|part| (*part).to_string())
                .collect();
            if !missing.is_empty() {
                forecast.suggestions.insert(vehicle.clone(), missing);
            }
        }

        debug!(community = index, standards = standard.len(), "community standards");
        forecast
            .standards
            .insert(index, standard.into_iter().map(str::to_string).collect());
    }

    forecast
}
