//! Minimum-spanning-forest heuristic.

use transport_core::{ActionCosts, LocationId, Problem, RoadGraph, ShortestPathIndex};

use super::{Heuristic, handling_cost};

#[derive(Debug, Clone, Copy)]
struct TreeEdge {
    to: LocationId,
    weight: u32,
    index: usize,
}

/// Routes every unfinished package through a minimum spanning forest of the
/// road graph, read as undirected, and charges each tree edge once no matter
/// how many packages share it.
///
/// The forest is computed with Kruskal's algorithm when the heuristic is
/// built. Packages whose location and target fall in different trees make
/// the state a dead end.
#[derive(Debug, Clone)]
pub struct SpanningTree {
    costs: ActionCosts,
    weights: Vec<u32>,
    /// `parents[root][node]` is the tree edge leading from `node` towards
    /// `root`.
    parents: Vec<Vec<Option<TreeEdge>>>,
}

impl SpanningTree {
    /// Build the forest for `graph`.
    #[must_use]
    pub fn new(graph: &RoadGraph, costs: ActionCosts) -> Self {
        let size = graph.location_count();
        let mut roads: Vec<_> = graph.roads().collect();
        roads.sort_by_key(|road| (road.length(), road.id()));

        let mut components = DisjointSets::new(size);
        let mut adjacency: Vec<Vec<TreeEdge>> = vec![Vec::new(); size];
        let mut weights = Vec::new();
        for road in roads {
            let (a, b) = (road.from(), road.to());
            if !components.union(a.index(), b.index()) {
                continue;
            }
            let index = weights.len();
            weights.push(road.length());
            if let Some(edges) = adjacency.get_mut(a.index()) {
                edges.push(TreeEdge {
                    to: b,
                    weight: road.length(),
                    index,
                });
            }
            if let Some(edges) = adjacency.get_mut(b.index()) {
                edges.push(TreeEdge {
                    to: a,
                    weight: road.length(),
                    index,
                });
            }
        }
        log::debug!(
            "spanning forest over {size} locations keeps {} edges",
            weights.len()
        );

        let parents = graph
            .location_ids()
            .map(|root| root_parents(&adjacency, root))
            .collect();
        Self {
            costs,
            weights,
            parents,
        }
    }

    /// Mark the tree path between `from` and `root`. Returns `None` when the
    /// two lie in different trees.
    fn mark_path(&self, from: LocationId, root: LocationId, marked: &mut [bool]) -> Option<()> {
        let parents = self.parents.get(root.index())?;
        let mut node = from;
        while node != root {
            let edge = (*parents.get(node.index())?)?;
            if let Some(slot) = marked.get_mut(edge.index) {
                *slot = true;
            }
            node = edge.to;
        }
        Some(())
    }
}

/// Parent edges of every node when the forest is rooted at `root`.
fn root_parents(adjacency: &[Vec<TreeEdge>], root: LocationId) -> Vec<Option<TreeEdge>> {
    let mut parents = vec![None; adjacency.len()];
    let mut seen = vec![false; adjacency.len()];
    let mut stack = vec![root];
    if let Some(slot) = seen.get_mut(root.index()) {
        *slot = true;
    }
    while let Some(node) = stack.pop() {
        for edge in adjacency.get(node.index()).into_iter().flatten() {
            let Some(visited) = seen.get_mut(edge.to.index()) else {
                continue;
            };
            if *visited {
                continue;
            }
            *visited = true;
            if let Some(slot) = parents.get_mut(edge.to.index()) {
                *slot = Some(TreeEdge {
                    to: node,
                    weight: edge.weight,
                    index: edge.index,
                });
            }
            stack.push(edge.to);
        }
    }
    parents
}

impl Heuristic for SpanningTree {
    fn estimate(&self, problem: &Problem, _paths: &ShortestPathIndex) -> Option<u64> {
        let mut marked = vec![false; self.weights.len()];
        for package in problem.unfinished_packages() {
            let from = problem.effective_location(package)?;
            self.mark_path(from, package.target(), &mut marked)?;
        }
        let drive: u64 = self
            .weights
            .iter()
            .zip(&marked)
            .filter(|(_, is_marked)| **is_marked)
            .map(|(weight, _)| u64::from(*weight))
            .sum();
        Some(drive.saturating_add(handling_cost(problem, self.costs)))
    }
}

/// Union-find over location indices with path halving.
#[derive(Debug)]
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while let Some(&parent) = self.parent.get(node) {
            if parent == node {
                break;
            }
            let grandparent = self.parent.get(parent).copied().unwrap_or(parent);
            if let Some(slot) = self.parent.get_mut(node) {
                *slot = grandparent;
            }
            node = grandparent;
        }
        node
    }

    /// Join the sets of `a` and `b`; false when already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return false;
        }
        if let Some(slot) = self.parent.get_mut(root_a) {
            *slot = root_b;
        }
        true
    }
}
