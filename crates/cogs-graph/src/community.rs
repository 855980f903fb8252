//! Greedy modularity community detection on the projection.
//!
//! # Overview
//!
//! Clauset-Newman-Moore agglomeration: every vehicle starts in its own
//! community, and the pair of adjacent communities whose merge raises
//! modularity the most is merged, until no merge has a strictly positive
//! gain. Communities are the platform families of the fleet.
//!
//! ## Modularity
//!
//! ```text
//! Q = Σ_c [ L_c / m − (d_c / 2m)² ]
//! ```
//!
//! `L_c` is the edge weight inside `c`, `d_c` the summed weighted degree of
//! its members and `m` the total edge weight. Merging `a` and `b` changes
//! `Q` by `(2m·w_ab − d_a·d_b) / 2m²`. Projection weights are integers, so
//! the numerator is kept exact in `i64` and candidates are compared without
//! any floating-point noise.
//!
//! ## Determinism
//!
//! A community is identified by the smallest catalog index among its
//! members, and merging `a < b` keeps `a`. Among equal gains the
//! lexicographically smallest `(a, b)` pair merges first. Candidates live
//! in a [`BinaryHeap`]; a merge bumps the surviving community's version so
//! heap entries that refer to an outdated state are discarded lazily when
//! popped.
//!
//! ## Output Order
//!
//! Communities are sorted by size (largest first), then by their earliest
//! member. Members are listed in catalog order.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::projection::Projection;

// ---------------------------------------------------------------------------
// CommunityPartition
// ---------------------------------------------------------------------------

/// A partition of the projection's vehicles into communities.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommunityPartition {
    /// Communities, largest first. Members in catalog order.
    pub communities: Vec<Vec<String>>,
    /// Vehicle → position in `communities`.
    pub assignment: BTreeMap<String, usize>,
    /// Modularity of the partition. `None` when the projection has no edges.
    pub modularity: Option<f64>,
}

impl CommunityPartition {
    /// Number of communities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.communities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    /// Index of the community containing `vehicle`.
    #[must_use]
    pub fn community_of(&self, vehicle: &str) -> Option<usize> {
        self.assignment.get(vehicle).copied()
    }

    /// Communities with at least `min_size` members, with their indices.
    pub fn with_min_size(&self, min_size: usize) -> impl Iterator<Item = (usize, &[String])> + '_ {
        self.communities
            .iter()
            .enumerate()
            .filter(move |(_, members)| members.len() >= min_size)
            .map(|(i, members)| (i, members.as_slice()))
    }
}

// ---------------------------------------------------------------------------
// Merge queue
// ---------------------------------------------------------------------------

/// A candidate merge. Field order drives the heap order: largest gain
/// first, then the smallest `(a, b)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    gain: i64,
    pair: Reverse<(usize, usize)>,
    versions: (u64, u64),
}

struct Agglomeration {
    two_m: i64,
    degree: Vec<i64>,
    /// Inter-community weights, keyed by neighboring community id.
    links: Vec<HashMap<usize, i64>>,
    version: Vec<u64>,
    alive: Vec<bool>,
    heap: BinaryHeap<Candidate>,
    members: UnionFind<usize>,
}

impl Agglomeration {
    fn new(projection: &Projection) -> Self {
        let n = projection.vehicle_count();
        let mut links: Vec<HashMap<usize, i64>> = vec![HashMap::new(); n];
        let mut degree = vec![0i64; n];

        for edge in projection.graph().edge_references() {
            let (a, b) = (edge.source().index(), edge.target().index());
            let w = to_i64(edge.weight().weight);
            *links[a].entry(b).or_default() += w;
            *links[b].entry(a).or_default() += w;
            degree[a] += w;
            degree[b] += w;
        }

        let mut this = Self {
            two_m: degree.iter().sum(),
            degree,
            links,
            version: vec![0; n],
            alive: vec![true; n],
            heap: BinaryHeap::new(),
            members: UnionFind::new(n),
        };
        for a in 0..n {
            let neighbors: Vec<usize> = this.links[a].keys().copied().filter(|&b| a < b).collect();
            for b in neighbors {
                this.push(a, b);
            }
        }
        this
    }

    fn gain(&self, a: usize, b: usize) -> i64 {
        let w_ab = self.links[a].get(&b).copied().unwrap_or(0);
        self.two_m * w_ab - self.degree[a] * self.degree[b]
    }

    fn push(&mut self, a: usize, b: usize) {
        let (a, b) = (a.min(b), a.max(b));
        self.heap.push(Candidate {
            gain: self.gain(a, b),
            pair: Reverse((a, b)),
            versions: (self.version[a], self.version[b]),
        });
    }

    fn is_current(&self, candidate: &Candidate) -> bool {
        let Reverse((a, b)) = candidate.pair;
        self.alive[a]
            && self.alive[b]
            && candidate.versions == (self.version[a], self.version[b])
    }

    /// Pop the best current candidate, if its gain is positive.
    fn next_merge(&mut self) -> Option<(usize, usize, i64)> {
        while let Some(candidate) = self.heap.pop() {
            if !self.is_current(&candidate) {
                continue;
            }
            if candidate.gain <= 0 {
                return None;
            }
            let Reverse((a, b)) = candidate.pair;
            return Some((a, b, candidate.gain));
        }
        None
    }

    /// Merge community `b` into `a` (`a < b`).
    fn merge(&mut self, a: usize, b: usize) {
        self.members.union(a, b);
        self.alive[b] = false;
        self.degree[a] += self.degree[b];

        let absorbed = std::mem::take(&mut self.links[b]);
        self.links[a].remove(&b);
        for (c, w) in absorbed {
            if c == a {
                continue;
            }
            *self.links[a].entry(c).or_default() += w;
            self.links[c].remove(&b);
            *self.links[c].entry(a).or_default() += w;
        }

        self.version[a] += 1;
        let mut neighbors: Vec<usize> = self.links[a].keys().copied().collect();
        neighbors.sort_unstable();
        for c in neighbors {
            self.push(a, c);
        }
    }

    fn run(&mut self) -> usize {
        let mut merges = 0;
        while let Some((a, b, gain)) = self.next_merge() {
            debug!(a, b, gain, "merging communities");
            self.merge(a, b);
            merges += 1;
        }
        merges
    }

    /// Member index lists, each sorted, in no particular order.
    fn groups(&self) -> Vec<Vec<usize>> {
        let labels = self.members.clone().into_labeling();
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (node, root) in labels.into_iter().enumerate() {
            groups.entry(root).or_default().push(node);
        }
        groups.into_values().collect()
    }
}

fn to_i64(weight: usize) -> i64 {
    i64::try_from(weight).unwrap_or(i64::MAX)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Partition the projection by greedy modularity maximization.
///
/// Isolated vehicles end up as singleton communities. An edgeless
/// projection yields one singleton per vehicle and no modularity.
#[must_use]
#[instrument(skip(projection), fields(vehicles = projection.vehicle_count(), edges = projection.edge_count()))]
pub fn detect_communities(projection: &Projection) -> CommunityPartition {
    let mut agglomeration = Agglomeration::new(projection);
    let merges = agglomeration.run();

    let mut groups = agglomeration.groups();
    groups.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a[0].cmp(&b[0])));

    let names: Vec<&str> = projection.vehicles().collect();
    let communities: Vec<Vec<String>> = groups
        .iter()
        .map(|group| group.iter().map(|&i| names[i].to_string()).collect())
        .collect();

    let mut labels = vec![0; names.len()];
    let mut assignment = BTreeMap::new();
    for (c, group) in groups.iter().enumerate() {
        for &i in group {
            labels[i] = c;
            assignment.insert(names[i].to_string(), c);
        }
    }

    let modularity = modularity_of_labels(projection, &labels);
    debug!(merges, communities = communities.len(), ?modularity, "community detection done");

    CommunityPartition {
        communities,
        assignment,
        modularity,
    }
}

/// Modularity of an arbitrary partition given as vehicle-name groups.
///
/// Vehicles not listed in any group are treated as singletons. Returns
/// `None` when the projection has no edges.
#[must_use]
pub fn modularity(projection: &Projection, communities: &[Vec<String>]) -> Option<f64> {
    let n = projection.vehicle_count();
    // Unlisted vehicles get labels past the last group.
    let mut labels: Vec<usize> = (communities.len()..communities.len() + n).collect();
    for (c, members) in communities.iter().enumerate() {
        for name in members {
            if let Some(idx) = projection.node_index(name) {
                labels[idx.index()] = c;
            }
        }
    }
    modularity_of_labels(projection, &labels)
}

#[allow(clippy::cast_precision_loss)]
fn modularity_of_labels(projection: &Projection, labels: &[usize]) -> Option<f64> {
    let m = projection.total_weight();
    if m == 0 {
        return None;
    }

    let mut internal: BTreeMap<usize, usize> = BTreeMap::new();
    let mut degree: BTreeMap<usize, usize> = BTreeMap::new();
    for edge in projection.graph().edge_references() {
        let (a, b) = (edge.source().index(), edge.target().index());
        let w = edge.weight().weight;
        if labels[a] == labels[b] {
            *internal.entry(labels[a]).or_default() += w;
        }
        *degree.entry(labels[a]).or_default() += w;
        *degree.entry(labels[b]).or_default() += w;
    }

    let m = m as f64;
    let q = degree
        .iter()
        .map(|(c, &d)| {
            let l_c = internal.get(c).copied().unwrap_or(0) as f64;
            let share = d as f64 / (2.0 * m);
            l_c / m - share * share
        })
        .sum();
    Some(q)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::BipartiteGraph;
    use cogs_core::{Catalog, Usage};

    /// Each `(a, b)` becomes a dedicated part shared by exactly `a` and `b`.
    fn projection(vehicles: &[&str], edges: &[(&str, &str)]) -> Projection {
        let parts: Vec<String> = (0..edges.len()).map(|i| format!("P{i}")).collect();
        let usages = edges
            .iter()
            .enumerate()
            .flat_map(|(i, (a, b))| [Usage::new(*a, format!("P{i}")), Usage::new(*b, format!("P{i}"))])
            .collect();
        let catalog = Catalog::new(vehicles.iter().map(|v| (*v).to_string()), parts, usages);
        Projection::from_bipartite(&BipartiteGraph::from_catalog(&catalog).expect("build"))
    }

    fn names(group: &[&str]) -> Vec<String> {
        group.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn two_triangles_joined_by_a_bridge() {
        let p = projection(
            &["A", "B", "C", "D", "E", "F"],
            &[
                ("A", "B"),
                ("B", "C"),
                ("A", "C"),
                ("C", "D"),
                ("D", "E"),
                ("E", "F"),
                ("D", "F"),
            ],
        );
        let partition = detect_communities(&p);
        assert_eq!(
            partition.communities,
            vec![names(&["A", "B", "C"]), names(&["D", "E", "F"])]
        );
        assert_eq!(partition.community_of("E"), Some(1));
        let q = partition.modularity.expect("has edges");
        assert!((q - (6.0 / 7.0 - 0.5)).abs() < 1e-12, "q = {q}");
    }

    #[test]
    fn disjoint_pairs_merge_in_pair_order() {
        let p = projection(&["A", "B", "C", "D"], &[("A", "B"), ("C", "D")]);
        let partition = detect_communities(&p);
        assert_eq!(
            partition.communities,
            vec![names(&["A", "B"]), names(&["C", "D"])]
        );
        assert_eq!(partition.modularity, Some(0.5));
    }

    #[test]
    fn edgeless_projection_is_all_singletons() {
        let catalog = Catalog::new(
            ["V1", "V2"],
            ["P1", "P2"],
            vec![Usage::new("V1", "P1"), Usage::new("V2", "P2")],
        );
        let p = Projection::from_bipartite(&BipartiteGraph::from_catalog(&catalog).expect("build"));
        let partition = detect_communities(&p);
        assert_eq!(partition.communities, vec![names(&["V1"]), names(&["V2"])]);
        assert_eq!(partition.modularity, None);
    }

    #[test]
    fn isolated_vehicle_is_a_singleton() {
        let mut catalog = Catalog::new(
            ["A", "B", "Solo"],
            ["P1", "Own"],
            vec![Usage::new("A", "P1"), Usage::new("B", "P1")],
        );
        catalog.usages.push(Usage::new("Solo", "Own"));
        let p = Projection::from_bipartite(&BipartiteGraph::from_catalog(&catalog).expect("build"));
        let partition = detect_communities(&p);
        assert_eq!(partition.communities, vec![names(&["A", "B"]), names(&["Solo"])]);
        assert_eq!(partition.len(), 2);
    }

    #[test]
    fn empty_projection_has_no_communities() {
        let partition = detect_communities(&Projection::default());
        assert!(partition.is_empty());
        assert_eq!(partition.modularity, None);
    }

    #[test]
    fn result_beats_singletons() {
        let p = projection(
            &["A", "B", "C", "D", "E"],
            &[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E"), ("E", "A"), ("A", "C")],
        );
        let partition = detect_communities(&p);
        let singletons: Vec<Vec<String>> = p.vehicles().map(|v| vec![v.to_string()]).collect();
        let q_single = modularity(&p, &singletons).expect("edges");
        let q = partition.modularity.expect("edges");
        assert!(q >= q_single);
        assert_eq!(modularity(&p, &partition.communities), Some(q));
    }

    #[test]
    fn whole_graph_as_one_community_has_zero_modularity() {
        let p = projection(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let all = vec![names(&["A", "B", "C"])];
        let q = modularity(&p, &all).expect("edges");
        assert!(q.abs() < 1e-12);
    }

    #[test]
    fn equal_gain_hub_joins_the_earlier_family() {
        let edges = [("A1", "A2"), ("B1", "B2"), ("Hub", "A1"), ("Hub", "B1")];

        let a_first = projection(&["Hub", "A1", "A2", "B1", "B2"], &edges);
        let partition = detect_communities(&a_first);
        assert_eq!(
            partition.communities,
            vec![names(&["Hub", "A1", "A2"]), names(&["B1", "B2"])]
        );
        // The other grouping is exactly as good; only catalog order decides.
        let other = vec![names(&["Hub", "B1", "B2"]), names(&["A1", "A2"])];
        assert_eq!(modularity(&a_first, &other), partition.modularity);

        let b_first = projection(&["Hub", "B1", "B2", "A1", "A2"], &edges);
        assert_eq!(
            detect_communities(&b_first).communities,
            vec![names(&["Hub", "B1", "B2"]), names(&["A1", "A2"])]
        );
    }

    #[test]
    fn higher_gain_breaks_before_pair_order() {
        let mut heap = BinaryHeap::new();
        heap.push(Candidate { gain: 3, pair: Reverse((0, 1)), versions: (0, 0) });
        heap.push(Candidate { gain: 5, pair: Reverse((2, 3)), versions: (0, 0) });
        heap.push(Candidate { gain: 5, pair: Reverse((1, 4)), versions: (0, 0) });
        let order: Vec<(usize, usize)> =
            std::iter::from_fn(|| heap.pop().map(|c| c.pair.0)).collect();
        assert_eq!(order, vec![(1, 4), (2, 3), (0, 1)]);
    }
}
