//! Property-based invariants over random small catalogs.

use std::collections::BTreeSet;

use cogs_core::{Catalog, SegmentClassifier, Usage};
use cogs_graph::backbone::maximum_spanning_forest;
use cogs_graph::community::{detect_communities, modularity};
use cogs_graph::graph::{BipartiteGraph, Projection};
use cogs_graph::metrics::{
    k_core_decomposition, part_criticality, segment_assortativity, stock_savings,
};
use cogs_graph::resilience::simulate_cascade;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Catalogs with up to 10 vehicles and 8 parts. Every third vehicle name
/// carries the premium keyword so both segments show up.
fn arb_catalog() -> impl Strategy<Value = Catalog> {
    (0usize..10, 0usize..8).prop_flat_map(|(vehicles, parts)| {
        let pairs = if vehicles == 0 || parts == 0 {
            Just(Vec::new()).boxed()
        } else {
            prop::collection::vec((0..vehicles, 0..parts), 0..40).boxed()
        };
        pairs.prop_map(move |pairs| {
            let vehicle_names: Vec<String> = (0..vehicles)
                .map(|i| if i % 3 == 0 { format!("Lux {i}") } else { format!("Eco {i}") })
                .collect();
            let part_names: Vec<String> = (0..parts).map(|i| format!("Part {i}")).collect();
            let usages = pairs
                .iter()
                .map(|&(v, p)| Usage::new(vehicle_names[v].clone(), part_names[p].clone()))
                .collect();
            Catalog::new(vehicle_names, part_names, usages)
        })
    })
}

fn build(catalog: &Catalog) -> (BipartiteGraph, Projection) {
    let bipartite = BipartiteGraph::from_catalog(catalog).expect("generated catalogs are closed");
    let projection = Projection::from_bipartite(&bipartite);
    (bipartite, projection)
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn projection_matches_shared_parts(catalog in arb_catalog()) {
        let (bipartite, projection) = build(&catalog);
        let vehicles: Vec<&str> = projection.vehicles().collect();
        for a in &vehicles {
            for b in &vehicles {
                prop_assert_eq!(projection.weight_between(a, b), projection.weight_between(b, a));
                if a == b {
                    continue;
                }
                let pa: BTreeSet<&str> = bipartite.parts_of(a).unwrap_or_default().into_iter().collect();
                let pb: BTreeSet<&str> = bipartite.parts_of(b).unwrap_or_default().into_iter().collect();
                let shared = pa.intersection(&pb).count();
                let expected = (shared > 0).then_some(shared);
                prop_assert_eq!(projection.weight_between(a, b), expected);
            }
        }
    }

    #[test]
    fn criticality_is_sorted_and_sums_to_edges(catalog in arb_catalog()) {
        let (bipartite, _) = build(&catalog);
        let ranked = part_criticality(&bipartite);
        prop_assert_eq!(ranked.len(), bipartite.part_count());
        prop_assert!(ranked.windows(2).all(|w| w[0].vehicles >= w[1].vehicles));
        let total: usize = ranked.iter().map(|e| e.vehicles).sum();
        prop_assert_eq!(total, bipartite.edge_count());
    }

    #[test]
    fn communities_partition_the_projection(catalog in arb_catalog()) {
        let (_, projection) = build(&catalog);
        let partition = detect_communities(&projection);

        let mut seen = BTreeSet::new();
        for members in &partition.communities {
            prop_assert!(!members.is_empty());
            for vehicle in members {
                prop_assert!(seen.insert(vehicle.clone()), "{} in two communities", vehicle);
            }
        }
        let all: BTreeSet<String> = projection.vehicles().map(str::to_string).collect();
        prop_assert_eq!(seen, all);

        if let Some(q) = partition.modularity {
            let singletons: Vec<Vec<String>> =
                projection.vehicles().map(|v| vec![v.to_string()]).collect();
            let q_single = modularity(&projection, &singletons).expect("edges exist");
            prop_assert!(q >= q_single - 1e-12, "q = {}, singletons = {}", q, q_single);
        } else {
            prop_assert!(projection.is_edgeless());
        }
    }

    #[test]
    fn core_numbers_are_bounded_and_max_core_is_valid(catalog in arb_catalog()) {
        let (_, projection) = build(&catalog);
        let result = k_core_decomposition(&projection);

        for (vehicle, &core) in &result.core_numbers {
            prop_assert!(core <= projection.degree(vehicle).expect("projection vehicle"));
        }
        for vehicle in result.max_core.vehicles() {
            prop_assert!(result.max_core.degree(vehicle).expect("core vehicle") >= result.k_max);
        }
        prop_assert_eq!(result.core_numbers.len(), projection.vehicle_count());
    }

    #[test]
    fn assortativity_is_bounded(catalog in arb_catalog()) {
        let (_, projection) = build(&catalog);
        let segments = SegmentClassifier::new(["Lux"]).classify_catalog(&catalog);
        if let Some(r) = segment_assortativity(&projection, &segments, 0.1).coefficient() {
            prop_assert!((-1.0 - 1e-12..=1.0 + 1e-12).contains(&r), "r = {}", r);
        }
    }

    #[test]
    fn forest_has_one_edge_less_than_vehicles_per_component(catalog in arb_catalog()) {
        let (_, projection) = build(&catalog);
        let forest = maximum_spanning_forest(&projection);
        if projection.is_edgeless() {
            prop_assert_eq!(forest.vehicle_count(), 0);
        } else {
            let components = projection.components().len();
            prop_assert_eq!(forest.edge_count(), projection.vehicle_count() - components);
            prop_assert_eq!(forest.components().len(), components);
        }
    }

    #[test]
    fn failing_every_part_empties_the_network(catalog in arb_catalog()) {
        let (bipartite, _) = build(&catalog);
        let trace = simulate_cascade(&bipartite, &catalog.parts);
        prop_assert_eq!(trace.steps.len(), 1 + catalog.parts.len());
        let last = trace.steps.last().expect("baseline");
        prop_assert_eq!(last.giant_component, 0);
        prop_assert_eq!(last.vehicles_remaining, 0);
        prop_assert!(trace.steps.windows(2).all(|w| w[1].vehicles_remaining <= w[0].vehicles_remaining));
    }

    #[test]
    fn stock_demand_equals_edge_count(catalog in arb_catalog()) {
        let (bipartite, _) = build(&catalog);
        let savings = stock_savings(&bipartite);
        prop_assert_eq!(savings.total_demand, bipartite.edge_count());
        prop_assert_eq!(savings.unique_inventory, catalog.parts.len());
        prop_assert_eq!(savings.reduction_factor.is_none(), savings.total_demand == 0);
    }

    #[test]
    fn identical_catalogs_give_identical_results(catalog in arb_catalog()) {
        let (b1, p1) = build(&catalog);
        let (b2, p2) = build(&catalog.clone());
        prop_assert_eq!(&b1.content_hash, &b2.content_hash);
        prop_assert_eq!(&p1, &p2);
        prop_assert_eq!(detect_communities(&p1), detect_communities(&p2));
        prop_assert_eq!(k_core_decomposition(&p1), k_core_decomposition(&p2));
        prop_assert_eq!(maximum_spanning_forest(&p1), maximum_spanning_forest(&p2));
    }
}
