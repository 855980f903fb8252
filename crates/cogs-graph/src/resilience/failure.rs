//! Single-part failure and supplier collapse.

use serde::Serialize;
use tracing::instrument;

use crate::graph::bipartite::BipartiteGraph;
use crate::graph::projection::Projection;

// ---------------------------------------------------------------------------
// Part failure
// ---------------------------------------------------------------------------

/// Direct impact of losing one part.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartFailure {
    pub part: String,
    /// Vehicles that use the part, in catalog order.
    pub affected: Vec<String>,
    /// `affected / vehicle count`, in `[0, 1]`. Zero for an empty fleet.
    pub severity: f64,
}

/// Vehicles stopped by the failure of `part`.
///
/// Returns `None` if the part is not in the graph.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn part_failure(bipartite: &BipartiteGraph, part: &str) -> Option<PartFailure> {
    let affected: Vec<String> = bipartite
        .vehicles_using(part)?
        .into_iter()
        .map(str::to_string)
        .collect();

    let total = bipartite.vehicle_count();
    let severity = if total == 0 {
        0.0
    } else {
        affected.len() as f64 / total as f64
    };

    Some(PartFailure {
        part: part.to_string(),
        affected,
        severity,
    })
}

// ---------------------------------------------------------------------------
// Supplier collapse
// ---------------------------------------------------------------------------

/// Connectivity of the projection after a set of parts disappears at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollapseImpact {
    /// Requested parts that were present and removed, in request order.
    pub removed: Vec<String>,
    /// Connected components of the damaged projection.
    pub component_count: usize,
    /// Largest component of the damaged projection; 0 if no vehicle remains.
    pub giant_component: usize,
    /// The rebuilt projection.
    pub projection: Projection,
}

/// Remove every part in `parts` simultaneously and measure fragmentation.
///
/// Unknown names are ignored. The input graph is never modified.
#[must_use]
#[instrument(skip(bipartite, parts), fields(requested = parts.len()))]
pub fn supplier_collapse<S: AsRef<str>>(bipartite: &BipartiteGraph, parts: &[S]) -> CollapseImpact {
    let (damaged, removed) = bipartite.without_parts(parts);
    let projection = Projection::from_bipartite(&damaged);

    CollapseImpact {
        removed,
        component_count: projection.components().len(),
        giant_component: projection.giant_component_size(),
        projection,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogs_core::{Catalog, Usage};

    fn bipartite() -> BipartiteGraph {
        let catalog = Catalog::new(
            ["V1", "V2", "V3", "V4"],
            ["Shared", "Left", "Right", "Unused"],
            vec![
                Usage::new("V1", "Shared"),
                Usage::new("V4", "Shared"),
                Usage::new("V1", "Left"),
                Usage::new("V2", "Left"),
                Usage::new("V3", "Right"),
                Usage::new("V4", "Right"),
            ],
        );
        BipartiteGraph::from_catalog(&catalog).expect("build")
    }

    #[test]
    fn failure_reports_affected_vehicles() {
        let failure = part_failure(&bipartite(), "Shared").expect("present");
        assert_eq!(failure.affected, vec!["V1", "V4"]);
        assert!((failure.severity - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn unused_part_has_zero_severity() {
        let failure = part_failure(&bipartite(), "Unused").expect("present");
        assert!(failure.affected.is_empty());
        assert!(failure.severity.abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_part_is_none() {
        assert_eq!(part_failure(&bipartite(), "Ghost"), None);
    }

    #[test]
    fn collapse_splits_the_projection() {
        let graph = bipartite();
        let before = supplier_collapse::<&str>(&graph, &[]);
        assert_eq!(before.component_count, 1);
        assert_eq!(before.giant_component, 4);

        let after = supplier_collapse(&graph, &["Shared", "Ghost"]);
        assert_eq!(after.removed, vec!["Shared"]);
        assert_eq!(after.component_count, 2);
        assert_eq!(after.giant_component, 2);
        assert!(graph.contains_part("Shared"));
    }

    #[test]
    fn total_collapse_leaves_nothing() {
        let after = supplier_collapse(&bipartite(), &["Shared", "Left", "Right"]);
        assert_eq!(after.projection.vehicle_count(), 0);
        assert_eq!(after.component_count, 0);
        assert_eq!(after.giant_component, 0);
    }
}
