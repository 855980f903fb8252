//! Stock consolidation savings.
//!
//! Compares the inventory every vehicle would need if it stocked its own
//! parts (`total_demand`, the sum of vehicle degrees) with the inventory of
//! a shared parts pool (`unique_inventory`, one slot per catalog part).

use serde::Serialize;
use tracing::instrument;

use crate::graph::bipartite::BipartiteGraph;

/// Independent vs pooled inventory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StockSavings {
    /// Σ parts per vehicle.
    pub total_demand: usize,
    /// Number of catalog parts, used or not.
    pub unique_inventory: usize,
    /// `1 − unique_inventory / total_demand`. `None` when there is no demand.
    pub reduction_factor: Option<f64>,
}

impl StockSavings {
    /// Reduction as a percentage, for display.
    #[must_use]
    pub fn reduction_percent(&self) -> Option<f64> {
        self.reduction_factor.map(|r| r * 100.0)
    }
}

/// Compute the consolidation savings of a bipartite graph.
///
/// The reduction can be negative when the catalog lists more parts than
/// the vehicles use in total.
#[must_use]
#[allow(clippy::cast_precision_loss)]
#[instrument(skip(bipartite))]
pub fn stock_savings(bipartite: &BipartiteGraph) -> StockSavings {
    let total_demand: usize = bipartite
        .vehicle_nodes()
        .iter()
        .map(|&idx| bipartite.degree(idx))
        .sum();
    let unique_inventory = bipartite.part_count();

    let reduction_factor =
        (total_demand > 0).then(|| 1.0 - unique_inventory as f64 / total_demand as f64);

    StockSavings {
        total_demand,
        unique_inventory,
        reduction_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogs_core::{Catalog, Usage};

    #[test]
    fn three_vehicles_sharing_one_part() {
        let catalog = Catalog::new(
            ["V1", "V2", "V3"],
            ["P1"],
            vec![
                Usage::new("V1", "P1"),
                Usage::new("V2", "P1"),
                Usage::new("V3", "P1"),
            ],
        );
        let savings = stock_savings(&BipartiteGraph::from_catalog(&catalog).expect("build"));
        assert_eq!(savings.total_demand, 3);
        assert_eq!(savings.unique_inventory, 1);
        let r = savings.reduction_factor.expect("defined");
        assert!((r - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn no_usage_means_no_factor() {
        let catalog = Catalog::new(["V1"], ["P1", "P2"], vec![]);
        let savings = stock_savings(&BipartiteGraph::from_catalog(&catalog).expect("build"));
        assert_eq!(savings.total_demand, 0);
        assert_eq!(savings.unique_inventory, 2);
        assert_eq!(savings.reduction_factor, None);
        assert_eq!(savings.reduction_percent(), None);
    }

    #[test]
    fn unused_parts_can_make_reduction_negative() {
        let catalog = Catalog::new(["V1"], ["P1", "P2", "P3", "P4"], vec![Usage::new("V1", "P1")]);
        let savings = stock_savings(&BipartiteGraph::from_catalog(&catalog).expect("build"));
        assert_eq!(savings.reduction_factor, Some(-3.0));
    }
}
