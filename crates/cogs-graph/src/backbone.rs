//! Maximum-weight spanning forest ("industry backbone").
//!
//! Kruskal's algorithm with the heaviest edges first keeps, for every
//! connected group of vehicles, the strongest shared-part links that still
//! form a tree. Equal weights are taken in catalog pair order, so the
//! forest is unique for a given catalog.

use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use tracing::{debug, instrument};

use crate::graph::projection::Projection;

/// Maximum spanning forest of a projection.
///
/// Every projection vehicle is kept; only forest edges survive, with their
/// shared-part payload. An edgeless projection yields an empty projection.
#[must_use]
#[instrument(skip(projection), fields(vehicles = projection.vehicle_count(), edges = projection.edge_count()))]
pub fn maximum_spanning_forest(projection: &Projection) -> Projection {
    if projection.is_edgeless() {
        return Projection::default();
    }

    let mut edges: Vec<_> = projection
        .graph()
        .edge_references()
        .map(|edge| {
            let (a, b) = (edge.source(), edge.target());
            (edge.weight().weight, a.min(b), a.max(b), edge.weight())
        })
        .collect();
    edges.sort_by(|x, y| y.0.cmp(&x.0).then_with(|| (x.1, x.2).cmp(&(y.1, y.2))));

    let mut forest = projection.skeleton();
    let mut components = UnionFind::<usize>::new(projection.vehicle_count());
    for (_, a, b, shared) in edges {
        if components.union(a.index(), b.index()) {
            forest.push_edge(a, b, shared.clone());
        }
    }

    debug!(edges = forest.edge_count(), weight = forest.total_weight(), "spanning forest built");
    forest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::BipartiteGraph;
    use cogs_core::{Catalog, Usage};

    fn projection(vehicles: &[&str], usages: &[(&str, &str)]) -> Projection {
        let mut parts: Vec<&str> = usages.iter().map(|(_, p)| *p).collect();
        parts.sort_unstable();
        parts.dedup();
        let catalog = Catalog::new(
            vehicles.iter().copied(),
            parts,
            usages.iter().map(|(v, p)| Usage::new(*v, *p)).collect(),
        );
        Projection::from_bipartite(&BipartiteGraph::from_catalog(&catalog).expect("build"))
    }

    #[test]
    fn keeps_heaviest_links() {
        // A-B weight 2, B-C weight 2, A-C weight 1.
        let p = projection(
            &["A", "B", "C"],
            &[
                ("A", "x"),
                ("B", "x"),
                ("A", "y"),
                ("B", "y"),
                ("B", "z"),
                ("C", "z"),
                ("B", "w"),
                ("C", "w"),
                ("A", "v"),
                ("C", "v"),
            ],
        );
        let forest = maximum_spanning_forest(&p);
        assert_eq!(forest.vehicle_count(), 3);
        assert_eq!(forest.edge_count(), 2);
        assert_eq!(forest.weight_between("A", "B"), Some(2));
        assert_eq!(forest.weight_between("B", "C"), Some(2));
        assert_eq!(forest.weight_between("A", "C"), None);
    }

    #[test]
    fn equal_weights_follow_pair_order() {
        // Triangle of weight-1 edges: (A,B) and (A,C) win over (B,C).
        let p = projection(
            &["A", "B", "C"],
            &[("A", "x"), ("B", "x"), ("A", "y"), ("C", "y"), ("B", "z"), ("C", "z")],
        );
        let forest = maximum_spanning_forest(&p);
        let pairs: Vec<(String, String)> = forest.edges().into_iter().map(|e| (e.a, e.b)).collect();
        assert_eq!(
            pairs,
            vec![
                ("A".to_string(), "B".to_string()),
                ("A".to_string(), "C".to_string()),
            ]
        );
    }

    #[test]
    fn forest_spans_each_component() {
        let p = projection(
            &["A", "B", "C", "D", "E"],
            &[("A", "x"), ("B", "x"), ("C", "y"), ("D", "y"), ("E", "y"), ("E", "solo")],
        );
        let forest = maximum_spanning_forest(&p);
        assert_eq!(forest.vehicle_count(), 5);
        // 5 vehicles in 2 components
        assert_eq!(forest.edge_count(), 3);
        assert_eq!(forest.components().len(), p.components().len());
    }

    #[test]
    fn edgeless_projection_gives_empty_forest() {
        let p = projection(&["A", "B"], &[("A", "x"), ("B", "y")]);
        let forest = maximum_spanning_forest(&p);
        assert_eq!(forest.vehicle_count(), 0);
        assert_eq!(forest.edge_count(), 0);
    }
}
