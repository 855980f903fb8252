//! Sequential part-failure cascade.
//!
//! # Overview
//!
//! Parts are removed one at a time from a private copy of the bipartite
//! graph. After every effective removal the projection is rebuilt and the
//! surviving network is measured:
//!
//! - `vehicles_remaining`: vehicles that still use at least one part (the
//!   projection's node count);
//! - `giant_component`: size of the largest connected group of vehicles,
//!   `0` once no vehicle remains.
//!
//! Step 0 is the undamaged baseline. A part that is not in the working
//! copy (unknown, or already failed earlier in the sequence) is skipped
//! without producing a step, so the trace always has
//! `1 + effective removals` steps.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::bipartite::BipartiteGraph;
use crate::graph::projection::Projection;
use crate::metrics::criticality::top_critical_parts;

/// State of the network after a number of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CascadeStep {
    /// Number of parts removed so far.
    pub parts_failed: usize,
    /// Vehicles still using at least one part.
    pub vehicles_remaining: usize,
    /// Size of the largest connected component of the projection.
    pub giant_component: usize,
}

/// Full record of a cascade run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeTrace {
    /// Baseline followed by one step per effective removal.
    pub steps: Vec<CascadeStep>,
    /// Parts actually removed, in order.
    pub failed: Vec<String>,
    /// Requested parts that were not present when their turn came.
    pub skipped: Vec<String>,
}

impl CascadeTrace {
    /// The last recorded step.
    #[must_use]
    pub fn final_step(&self) -> Option<&CascadeStep> {
        self.steps.last()
    }

    /// Fraction of the baseline giant component lost by the end of the run.
    /// `None` when the baseline is empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn giant_component_loss(&self) -> Option<f64> {
        let baseline = self.steps.first()?.giant_component;
        let last = self.final_step()?.giant_component;
        (baseline > 0).then(|| 1.0 - last as f64 / baseline as f64)
    }
}

fn measure(graph: &BipartiteGraph, parts_failed: usize) -> CascadeStep {
    let projection = Projection::from_bipartite(graph);
    CascadeStep {
        parts_failed,
        vehicles_remaining: projection.vehicle_count(),
        giant_component: projection.giant_component_size(),
    }
}

/// Fail `parts` in order and record the network after each removal.
///
/// The input graph is never modified.
#[must_use]
#[instrument(skip(bipartite, parts), fields(requested = parts.len()))]
pub fn simulate_cascade<S: AsRef<str>>(bipartite: &BipartiteGraph, parts: &[S]) -> CascadeTrace {
    let mut working = bipartite.clone();
    let mut trace = CascadeTrace {
        steps: vec![measure(&working, 0)],
        ..CascadeTrace::default()
    };

    for part in parts {
        let name: &str = part.as_ref();
        if !working.remove_part(name) {
            debug!(part = name, "part not present, skipped");
            trace.skipped.push(name.to_string());
            continue;
        }

        trace.failed.push(name.to_string());
        let step = measure(&working, trace.failed.len());
        debug!(
            part = name,
            vehicles = step.vehicles_remaining,
            giant = step.giant_component,
            "part failed"
        );
        trace.steps.push(step);
    }

    trace
}

/// Cascade over the `n` most critical parts, most critical first.
#[must_use]
pub fn cascade_of_top(bipartite: &BipartiteGraph, n: usize) -> CascadeTrace {
    simulate_cascade(bipartite, &top_critical_parts(bipartite, n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogs_core::{Catalog, Usage};

    fn bipartite() -> BipartiteGraph {
        // Hub shared by V1..V3, Side shared by V3 and V4, Own used by V4 only.
        let catalog = Catalog::new(
            ["V1", "V2", "V3", "V4"],
            ["Hub", "Side", "Own"],
            vec![
                Usage::new("V1", "Hub"),
                Usage::new("V2", "Hub"),
                Usage::new("V3", "Hub"),
                Usage::new("V3", "Side"),
                Usage::new("V4", "Side"),
                Usage::new("V4", "Own"),
            ],
        );
        BipartiteGraph::from_catalog(&catalog).expect("build")
    }

    fn step(parts_failed: usize, vehicles_remaining: usize, giant_component: usize) -> CascadeStep {
        CascadeStep {
            parts_failed,
            vehicles_remaining,
            giant_component,
        }
    }

    #[test]
    fn removal_sequence_is_traced() {
        let graph = bipartite();
        let trace = simulate_cascade(&graph, &["Hub", "Side", "Own"]);
        assert_eq!(
            trace.steps,
            vec![step(0, 4, 4), step(1, 2, 2), step(2, 1, 1), step(3, 0, 0)]
        );
        assert_eq!(trace.failed, vec!["Hub", "Side", "Own"]);
        assert!(trace.skipped.is_empty());
        assert_eq!(trace.giant_component_loss(), Some(1.0));
    }

    #[test]
    fn absent_and_repeated_parts_are_skipped() {
        let graph = bipartite();
        let trace = simulate_cascade(&graph, &["Nope", "Hub", "Hub"]);
        assert_eq!(trace.steps.len(), 2);
        assert_eq!(trace.failed, vec!["Hub"]);
        assert_eq!(trace.skipped, vec!["Nope", "Hub"]);
    }

    #[test]
    fn input_graph_is_untouched() {
        let graph = bipartite();
        let hash = graph.content_hash.clone();
        let _ = simulate_cascade(&graph, &["Hub", "Side"]);
        assert!(graph.contains_part("Hub"));
        assert_eq!(graph.edge_count(), 6);
        assert_eq!(graph.content_hash, hash);
    }

    #[test]
    fn empty_sequence_is_baseline_only() {
        let trace = simulate_cascade::<&str>(&bipartite(), &[]);
        assert_eq!(trace.steps, vec![step(0, 4, 4)]);
    }

    #[test]
    fn top_parts_fail_in_criticality_order() {
        let trace = cascade_of_top(&bipartite(), 2);
        assert_eq!(trace.failed, vec!["Hub", "Side"]);
        assert_eq!(trace.final_step(), Some(&step(2, 1, 1)));
    }

    #[test]
    fn empty_graph_baseline() {
        let graph = BipartiteGraph::from_catalog(&Catalog::default()).expect("build");
        let trace = simulate_cascade(&graph, &["x"]);
        assert_eq!(trace.steps, vec![step(0, 0, 0)]);
        assert_eq!(trace.giant_component_loss(), None);
    }
}
