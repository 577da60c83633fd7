//! All-pairs shortest paths over the road network.
//!
//! One Dijkstra pass per source location, weighted by road length. The index
//! is computed once per problem and shared read-only by every planner.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use thiserror::Error;

use crate::{LocationId, Road, RoadGraph, RoadId};

/// A target location cannot be reached from a source location.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no road path from {from} to {to}")]
pub struct UnreachableError {
    /// Start of the requested path.
    pub from: LocationId,
    /// End of the requested path.
    pub to: LocationId,
}

/// A concrete shortest path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShortestPath {
    /// Roads in driving order; empty when source and target coincide.
    pub roads: Vec<RoadId>,
    /// Sum of road lengths.
    pub distance: u64,
}

/// Precomputed shortest distances and predecessor roads for every ordered
/// pair of locations.
#[derive(Debug, Clone)]
pub struct ShortestPathIndex {
    size: usize,
    distances: Vec<Option<u64>>,
    predecessors: Vec<Option<RoadId>>,
    roads: Vec<Road>,
}

impl ShortestPathIndex {
    /// Run Dijkstra from every location of `graph`.
    #[must_use]
    pub fn new(graph: &RoadGraph) -> Self {
        let size = graph.location_count();
        let cells = size.saturating_mul(size);
        let mut index = Self {
            size,
            distances: vec![None; cells],
            predecessors: vec![None; cells],
            roads: graph.roads().cloned().collect(),
        };
        for source in graph.location_ids() {
            index.run_from(graph, source);
        }
        log::debug!("computed shortest paths for {size} locations");
        index
    }

    fn run_from(&mut self, graph: &RoadGraph, source: LocationId) {
        let mut queue = BinaryHeap::new();
        self.set_distance(source, source, 0);
        queue.push(Reverse((0_u64, source)));
        while let Some(Reverse((distance, at))) = queue.pop() {
            if self.distance(source, at).is_some_and(|best| distance > best) {
                continue;
            }
            for road in graph.outgoing(at) {
                let candidate = distance.saturating_add(u64::from(road.length()));
                let improves = self
                    .distance(source, road.to())
                    .is_none_or(|known| candidate < known);
                // Self-loops never improve on the zero diagonal.
                if improves {
                    self.set_distance(source, road.to(), candidate);
                    self.set_predecessor(source, road.to(), road.id());
                    queue.push(Reverse((candidate, road.to())));
                }
            }
        }
    }

    fn cell(&self, from: LocationId, to: LocationId) -> Option<usize> {
        if from.index() >= self.size || to.index() >= self.size {
            return None;
        }
        from.index()
            .checked_mul(self.size)
            .and_then(|row| row.checked_add(to.index()))
    }

    fn set_distance(&mut self, from: LocationId, to: LocationId, distance: u64) {
        if let Some(slot) = self
            .cell(from, to)
            .and_then(|cell| self.distances.get_mut(cell))
        {
            *slot = Some(distance);
        }
    }

    fn set_predecessor(&mut self, from: LocationId, to: LocationId, road: RoadId) {
        if let Some(slot) = self
            .cell(from, to)
            .and_then(|cell| self.predecessors.get_mut(cell))
        {
            *slot = Some(road);
        }
    }

    /// Shortest distance from `from` to `to`; `Some(0)` on the diagonal and
    /// `None` when unreachable.
    #[must_use]
    pub fn distance(&self, from: LocationId, to: LocationId) -> Option<u64> {
        self.cell(from, to)
            .and_then(|cell| self.distances.get(cell).copied().flatten())
    }

    /// Shortest distance, treating an unreachable pair as an error.
    ///
    /// # Errors
    ///
    /// Returns [`UnreachableError`] when no road path exists.
    pub fn require_distance(
        &self,
        from: LocationId,
        to: LocationId,
    ) -> Result<u64, UnreachableError> {
        self.distance(from, to).ok_or(UnreachableError { from, to })
    }

    /// Roads of a shortest path from `from` to `to`, in driving order.
    ///
    /// Returns `None` when `to` is unreachable and an empty path when the
    /// locations coincide.
    #[must_use]
    pub fn path(&self, from: LocationId, to: LocationId) -> Option<ShortestPath> {
        let distance = self.distance(from, to)?;
        let mut roads = Vec::new();
        let mut at = to;
        while at != from {
            let road_id = self
                .cell(from, at)
                .and_then(|cell| self.predecessors.get(cell).copied().flatten())?;
            let road = self.roads.get(road_id.index())?;
            roads.push(road_id);
            at = road.from();
        }
        roads.reverse();
        Some(ShortestPath { roads, distance })
    }

    /// Shortest path, treating an unreachable pair as an error.
    ///
    /// # Errors
    ///
    /// Returns [`UnreachableError`] when no road path exists.
    pub fn require_path(
        &self,
        from: LocationId,
        to: LocationId,
    ) -> Result<ShortestPath, UnreachableError> {
        self.path(from, to).ok_or(UnreachableError { from, to })
    }

    /// Number of locations covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// True when the graph had no locations.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PetrolStation;
    use geo::Coord;
    use rstest::{fixture, rstest};

    /// A -5-> B -5-> C, plus A -20-> C and a self-loop on B.
    #[fixture]
    fn detour() -> (RoadGraph, [LocationId; 3]) {
        let mut graph = RoadGraph::default();
        let ids = ["A", "B", "C"].map(|name| {
            graph
                .add_location(name, Coord { x: 0, y: 0 }, PetrolStation::NotApplicable)
                .expect("location")
        });
        let [a, b, c] = ids;
        graph.add_road("A-B", a, b, 5).expect("road");
        graph.add_road("B-C", b, c, 5).expect("road");
        graph.add_road("A-C", a, c, 20).expect("road");
        graph.add_road("B-B", b, b, 3).expect("self-loop");
        (graph, ids)
    }

    #[rstest]
    fn prefers_the_shorter_two_hop_route(detour: (RoadGraph, [LocationId; 3])) {
        let (graph, [a, b, c]) = detour;
        let index = ShortestPathIndex::new(&graph);
        assert_eq!(index.distance(a, c), Some(10));
        let path = index.path(a, c).expect("reachable");
        let hops: Vec<_> = path
            .roads
            .iter()
            .filter_map(|road| graph.road(*road))
            .map(|road| (road.from(), road.to()))
            .collect();
        assert_eq!(hops, vec![(a, b), (b, c)]);
    }

    #[rstest]
    fn diagonal_is_zero_despite_self_loops(detour: (RoadGraph, [LocationId; 3])) {
        let (graph, [_, b, _]) = detour;
        let index = ShortestPathIndex::new(&graph);
        assert_eq!(index.distance(b, b), Some(0));
        assert_eq!(index.path(b, b), Some(ShortestPath::default()));
    }

    #[rstest]
    fn reverse_direction_is_unreachable(detour: (RoadGraph, [LocationId; 3])) {
        let (graph, [a, _, c]) = detour;
        let index = ShortestPathIndex::new(&graph);
        assert_eq!(index.distance(c, a), None);
        assert_eq!(
            index.require_path(c, a),
            Err(UnreachableError { from: c, to: a })
        );
    }

    #[rstest]
    fn unknown_locations_have_no_distance(detour: (RoadGraph, [LocationId; 3])) {
        let (graph, [a, _, _]) = detour;
        let index = ShortestPathIndex::new(&graph);
        assert_eq!(index.len(), 3);
        assert_eq!(index.distance(a, LocationId::new(3)), None);
    }
}
