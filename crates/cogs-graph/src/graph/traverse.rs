//! Index-based traversal helpers shared by the analyses.
//!
//! Analyses that walk the graph repeatedly (components, eccentricities,
//! peeling, DFS lowlinks) work on a compact adjacency list indexed `0..n`
//! rather than on petgraph indices, which may have holes in a
//! [`petgraph::stable_graph::StableGraph`] after removals.

use std::collections::VecDeque;

/// Compact undirected adjacency list. Neighbor lists are sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Adjacency {
    neighbors: Vec<Vec<usize>>,
}

impl Adjacency {
    /// Build from a node count and an undirected edge list.
    pub(crate) fn from_edges(node_count: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut neighbors = vec![Vec::new(); node_count];
        for (a, b) in edges {
            if a != b {
                neighbors[a].push(b);
                neighbors[b].push(a);
            }
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }
        Self { neighbors }
    }

    pub(crate) fn node_count(&self) -> usize {
        self.neighbors.len()
    }

    pub(crate) fn neighbors(&self, node: usize) -> &[usize] {
        &self.neighbors[node]
    }

    pub(crate) fn degree(&self, node: usize) -> usize {
        self.neighbors[node].len()
    }

    /// Connected components, each sorted, ordered by smallest member.
    pub(crate) fn components(&self) -> Vec<Vec<usize>> {
        let n = self.node_count();
        let mut visited = vec![false; n];
        let mut components = Vec::new();

        for start in 0..n {
            if visited[start] {
                continue;
            }

            let mut stack = vec![start];
            let mut component = Vec::new();

            while let Some(node) = stack.pop() {
                if visited[node] {
                    continue;
                }
                visited[node] = true;
                component.push(node);

                for &neighbor in self.neighbors(node) {
                    if !visited[neighbor] {
                        stack.push(neighbor);
                    }
                }
            }

            component.sort_unstable();
            components.push(component);
        }

        components
    }

    /// Size of the largest connected component, 0 for an empty graph.
    pub(crate) fn giant_component_size(&self) -> usize {
        self.components().iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Unweighted BFS distances from `source`. `None` = unreachable.
    pub(crate) fn distances_from(&self, source: usize) -> Vec<Option<usize>> {
        let mut dist = vec![None; self.node_count()];
        dist[source] = Some(0);

        let mut queue = VecDeque::from([source]);
        while let Some(node) = queue.pop_front() {
            let next = dist[node].map_or(0, |d| d + 1);
            for &neighbor in self.neighbors(node) {
                if dist[neighbor].is_none() {
                    dist[neighbor] = Some(next);
                    queue.push_back(neighbor);
                }
            }
        }

        dist
    }
}
