//! Directed road network stored as an adjacency list.

use std::collections::HashMap;
use std::sync::Arc;

use geo::Coord;

use super::{LocationId, ProblemError, RoadId};

/// Whether a location sells fuel.
///
/// Domains without fuel leave every location as [`PetrolStation::NotApplicable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PetrolStation {
    /// Vehicles may refuel here.
    Enabled,
    /// The location has no petrol station.
    Disabled,
    /// The domain does not model fuel.
    #[default]
    NotApplicable,
}

/// A node of the road network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    name: Arc<str>,
    position: Coord<i32>,
    petrol_station: PetrolStation,
}

impl Location {
    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display position. Search never reads it.
    #[must_use]
    pub const fn position(&self) -> Coord<i32> {
        self.position
    }

    /// Petrol station flag.
    #[must_use]
    pub const fn petrol_station(&self) -> PetrolStation {
        self.petrol_station
    }

    /// True when vehicles may refuel at this location.
    #[must_use]
    pub fn has_petrol_station(&self) -> bool {
        self.petrol_station == PetrolStation::Enabled
    }
}

/// A directed edge of the road network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Road {
    id: RoadId,
    name: Arc<str>,
    from: LocationId,
    to: LocationId,
    length: u32,
    fuel_cost: Option<u32>,
}

impl Road {
    /// Identifier of this road.
    #[must_use]
    pub const fn id(&self) -> RoadId {
        self.id
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source location.
    #[must_use]
    pub const fn from(&self) -> LocationId {
        self.from
    }

    /// Destination location.
    #[must_use]
    pub const fn to(&self) -> LocationId {
        self.to
    }

    /// Length, which is also the cost of driving the road.
    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }

    /// Fuel consumed by driving the road; defaults to its length.
    #[must_use]
    pub fn fuel_cost(&self) -> u32 {
        self.fuel_cost.unwrap_or(self.length)
    }
}

/// Directed road network with at most one road per ordered location pair.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use transport_core::{PetrolStation, RoadGraph};
///
/// # fn main() -> Result<(), transport_core::ProblemError> {
/// let mut graph = RoadGraph::default();
/// let a = graph.add_location("A", Coord { x: 0, y: 0 }, PetrolStation::NotApplicable)?;
/// let b = graph.add_location("B", Coord { x: 1, y: 0 }, PetrolStation::NotApplicable)?;
/// graph.add_road("A-B", a, b, 5)?;
/// assert!(graph.road_between(a, b).is_some());
/// assert!(graph.road_between(b, a).is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoadGraph {
    locations: Vec<Location>,
    roads: Vec<Road>,
    outgoing: Vec<Vec<RoadId>>,
    by_name: HashMap<Arc<str>, LocationId>,
}

impl RoadGraph {
    /// Add a location and return its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ProblemError::DuplicateLocation`] when the name is taken.
    pub fn add_location(
        &mut self,
        name: &str,
        position: Coord<i32>,
        petrol_station: PetrolStation,
    ) -> Result<LocationId, ProblemError> {
        if self.by_name.contains_key(name) {
            return Err(ProblemError::DuplicateLocation { name: name.into() });
        }
        let id = LocationId::new(self.locations.len());
        let name: Arc<str> = name.into();
        self.by_name.insert(Arc::clone(&name), id);
        self.locations.push(Location {
            name,
            position,
            petrol_station,
        });
        self.outgoing.push(Vec::new());
        Ok(id)
    }

    /// Add a directed road whose fuel cost equals its length.
    ///
    /// # Errors
    ///
    /// Fails when either endpoint is unknown or a road between the same
    /// ordered pair already exists.
    pub fn add_road(
        &mut self,
        name: &str,
        from: LocationId,
        to: LocationId,
        length: u32,
    ) -> Result<RoadId, ProblemError> {
        self.insert_road(name, from, to, length, None)
    }

    /// Add a directed road with an explicit fuel cost.
    ///
    /// # Errors
    ///
    /// Same as [`RoadGraph::add_road`].
    pub fn add_fuel_road(
        &mut self,
        name: &str,
        from: LocationId,
        to: LocationId,
        length: u32,
        fuel_cost: u32,
    ) -> Result<RoadId, ProblemError> {
        self.insert_road(name, from, to, length, Some(fuel_cost))
    }

    fn insert_road(
        &mut self,
        name: &str,
        from: LocationId,
        to: LocationId,
        length: u32,
        fuel_cost: Option<u32>,
    ) -> Result<RoadId, ProblemError> {
        let from_name = self.require(from)?.name.clone();
        let to_name = self.require(to)?.name.clone();
        if self.road_between(from, to).is_some() {
            return Err(ProblemError::DuplicateRoad {
                from: from_name,
                to: to_name,
            });
        }
        let id = RoadId::new(self.roads.len());
        self.roads.push(Road {
            id,
            name: name.into(),
            from,
            to,
            length,
            fuel_cost,
        });
        if let Some(edges) = self.outgoing.get_mut(from.index()) {
            edges.push(id);
        }
        Ok(id)
    }

    fn require(&self, id: LocationId) -> Result<&Location, ProblemError> {
        self.location(id)
            .ok_or(ProblemError::UnknownLocation { location: id })
    }

    /// Look up a location.
    #[must_use]
    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id.index())
    }

    /// Resolve a location by name.
    #[must_use]
    pub fn location_id(&self, name: &str) -> Option<LocationId> {
        self.by_name.get(name).copied()
    }

    /// Name of a location, or `"?"` for an id from another graph.
    #[must_use]
    pub fn location_name(&self, id: LocationId) -> &str {
        self.location(id).map_or("?", Location::name)
    }

    /// Look up a road.
    #[must_use]
    pub fn road(&self, id: RoadId) -> Option<&Road> {
        self.roads.get(id.index())
    }

    /// Number of locations.
    #[must_use]
    pub const fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Iterate over all location ids in index order.
    pub fn location_ids(&self) -> impl Iterator<Item = LocationId> + '_ {
        (0..self.locations.len()).map(LocationId::new)
    }

    /// Iterate over all roads in insertion order.
    pub fn roads(&self) -> impl Iterator<Item = &Road> + '_ {
        self.roads.iter()
    }

    /// Iterate over the roads leaving `location`.
    pub fn outgoing(&self, location: LocationId) -> impl Iterator<Item = &Road> + '_ {
        self.outgoing
            .get(location.index())
            .into_iter()
            .flatten()
            .filter_map(|road| self.road(*road))
    }

    /// The road from `from` to `to`, if one exists.
    #[must_use]
    pub fn road_between(&self, from: LocationId, to: LocationId) -> Option<&Road> {
        self.outgoing(from).find(|road| road.to == to)
    }

    /// True when every road consumes exactly its length in fuel.
    #[must_use]
    pub fn fuel_costs_match_lengths(&self) -> bool {
        self.roads
            .iter()
            .all(|road| road.fuel_cost.is_none_or(|cost| cost == road.length))
    }
}
