//! Bridges and articulation points of the projection.
//!
//! A bridge is a shared-part link whose loss splits a group of vehicles in
//! two; an articulation point is a vehicle whose removal does the same.
//! Both come out of a single iterative Tarjan lowlink DFS.

use serde::Serialize;

use crate::graph::projection::Projection;
use crate::graph::traverse::Adjacency;

/// Single points of failure in the projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CutStructure {
    /// Bridge edges as name pairs, earlier vehicle first, in catalog pair order.
    pub bridges: Vec<(String, String)>,
    /// Articulation vehicles in catalog order.
    pub articulation_points: Vec<String>,
}

/// Find the bridges and articulation points of a projection.
#[must_use]
pub fn cut_structure(projection: &Projection) -> CutStructure {
    let adjacency = projection.adjacency();
    let (bridges, articulation) = lowlink(&adjacency);
    let names: Vec<&str> = projection.vehicles().collect();

    CutStructure {
        bridges: bridges
            .into_iter()
            .map(|(a, b)| (names[a].to_string(), names[b].to_string()))
            .collect(),
        articulation_points: articulation
            .iter()
            .enumerate()
            .filter(|&(_, &is_cut)| is_cut)
            .map(|(i, _)| names[i].to_string())
            .collect(),
    }
}

/// Sorted bridge index pairs and an articulation flag per node.
fn lowlink(adjacency: &Adjacency) -> (Vec<(usize, usize)>, Vec<bool>) {
    let n = adjacency.node_count();
    let mut disc: Vec<Option<usize>> = vec![None; n];
    let mut low = vec![0; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut articulation = vec![false; n];
    let mut bridges = Vec::new();
    let mut time = 0;

    for root in 0..n {
        if disc[root].is_some() {
            continue;
        }
        disc[root] = Some(time);
        low[root] = time;
        time += 1;

        let mut root_children = 0;
        // (node, next neighbor position)
        let mut stack = vec![(root, 0usize)];

        while let Some(top) = stack.last_mut() {
            let (v, next) = *top;
            if let Some(&u) = adjacency.neighbors(v).get(next) {
                top.1 += 1;
                match disc[u] {
                    None => {
                        parent[u] = Some(v);
                        disc[u] = Some(time);
                        low[u] = time;
                        time += 1;
                        if v == root {
                            root_children += 1;
                        }
                        stack.push((u, 0));
                    }
                    Some(d) if parent[v] != Some(u) => low[v] = low[v].min(d),
                    Some(_) => {}
                }
                continue;
            }

            stack.pop();
            let Some(p) = parent[v] else { continue };
            low[p] = low[p].min(low[v]);
            let disc_p = disc[p].unwrap_or(0);
            if low[v] > disc_p {
                bridges.push((p.min(v), p.max(v)));
            }
            if p != root && low[v] >= disc_p {
                articulation[p] = true;
            }
        }

        if root_children > 1 {
            articulation[root] = true;
        }
    }

    bridges.sort_unstable();
    (bridges, articulation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_is_all_bridges() {
        // 0 - 1 - 2
        let adjacency = Adjacency::from_edges(3, [(0, 1), (1, 2)]);
        let (bridges, cut) = lowlink(&adjacency);
        assert_eq!(bridges, vec![(0, 1), (1, 2)]);
        assert_eq!(cut, vec![false, true, false]);
    }

    #[test]
    fn cycle_has_no_cuts() {
        let adjacency = Adjacency::from_edges(4, [(0, 1), (1, 2), (2, 3), (3, 0)]);
        let (bridges, cut) = lowlink(&adjacency);
        assert!(bridges.is_empty());
        assert!(cut.iter().all(|&c| !c));
    }

    #[test]
    fn bowtie_center_is_articulation() {
        // Two triangles sharing node 2.
        let adjacency = Adjacency::from_edges(
            5,
            [(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2)],
        );
        let (bridges, cut) = lowlink(&adjacency);
        assert!(bridges.is_empty());
        assert_eq!(cut, vec![false, false, true, false, false]);
    }

    #[test]
    fn triangle_with_tail_and_isolated_node() {
        // 0-1-2 triangle, 2-3 tail, 4 isolated.
        let adjacency = Adjacency::from_edges(5, [(0, 1), (1, 2), (2, 0), (2, 3)]);
        let (bridges, cut) = lowlink(&adjacency);
        assert_eq!(bridges, vec![(2, 3)]);
        assert_eq!(cut, vec![false, false, true, false, false]);
    }

    #[test]
    fn star_root_with_many_children() {
        let adjacency = Adjacency::from_edges(4, [(0, 1), (0, 2), (0, 3)]);
        let (bridges, cut) = lowlink(&adjacency);
        assert_eq!(bridges.len(), 3);
        assert_eq!(cut, vec![true, false, false, false]);
    }

    #[test]
    fn empty_projection_has_no_cuts() {
        assert_eq!(cut_structure(&Projection::default()), CutStructure::default());
    }
}
