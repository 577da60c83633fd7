//! Validated construction of [`Problem`] instances.

use std::collections::HashSet;
use std::sync::Arc;

use geo::Coord;

use super::{
    Fuel, LocationId, Package, PackageId, PetrolStation, Problem, ProblemError, RoadGraph, RoadId,
    Vehicle, VehicleId,
};

/// Where a package starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Lying at a location.
    At(LocationId),
    /// Loaded in a vehicle.
    In(VehicleId),
}

/// Description of a vehicle to add to a [`ProblemBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleSpec {
    name: Arc<str>,
    location: Option<LocationId>,
    target: Option<LocationId>,
    capacity: u32,
    fuel: Option<Fuel>,
    ready_loading: bool,
}

impl VehicleSpec {
    /// A vehicle at `location` with `capacity` free units and no target.
    #[must_use]
    pub fn new(name: &str, location: LocationId, capacity: u32) -> Self {
        Self {
            name: name.into(),
            location: Some(location),
            target: None,
            capacity,
            fuel: None,
            ready_loading: true,
        }
    }

    /// A vehicle with no location yet.
    #[must_use]
    pub fn unplaced(name: &str, capacity: u32) -> Self {
        Self {
            location: None,
            ..Self::new(name, LocationId::new(0), capacity)
        }
    }

    /// Require the vehicle to finish at `target`.
    #[must_use]
    pub const fn with_target(mut self, target: LocationId) -> Self {
        self.target = Some(target);
        self
    }

    /// Give the vehicle a fuel tank.
    #[must_use]
    pub const fn with_fuel(mut self, fuel: Fuel) -> Self {
        self.fuel = Some(fuel);
        self
    }

    /// Set the ready-loading flag.
    #[must_use]
    pub const fn with_ready_loading(mut self, ready_loading: bool) -> Self {
        self.ready_loading = ready_loading;
        self
    }
}

/// Description of a package to add to a [`ProblemBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    name: Arc<str>,
    placement: Placement,
    target: LocationId,
    size: u32,
}

impl PackageSpec {
    /// A unit-sized package lying at `location`.
    #[must_use]
    pub fn at(name: &str, location: LocationId, target: LocationId) -> Self {
        Self {
            name: name.into(),
            placement: Placement::At(location),
            target,
            size: 1,
        }
    }

    /// A unit-sized package already loaded in `vehicle`.
    #[must_use]
    pub fn carried(name: &str, vehicle: VehicleId, target: LocationId) -> Self {
        Self {
            name: name.into(),
            placement: Placement::In(vehicle),
            target,
            size: 1,
        }
    }

    /// Override the package size.
    #[must_use]
    pub const fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }
}

/// Incrementally assembles a [`Problem`], validating every reference.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use transport_core::{PackageSpec, PetrolStation, ProblemBuilder, VehicleSpec};
///
/// # fn main() -> Result<(), transport_core::ProblemError> {
/// let mut builder = ProblemBuilder::new("p01");
/// let a = builder.add_location("A", Coord { x: 0, y: 0 }, PetrolStation::NotApplicable)?;
/// let b = builder.add_location("B", Coord { x: 5, y: 0 }, PetrolStation::NotApplicable)?;
/// builder.add_road("A-B", a, b, 5)?;
/// builder.add_vehicle(VehicleSpec::new("truck-1", a, 1))?;
/// builder.add_package(PackageSpec::at("package-1", a, b))?;
/// let problem = builder.build()?;
/// assert!(!problem.is_goal());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProblemBuilder {
    name: Arc<str>,
    graph: RoadGraph,
    vehicles: Vec<VehicleSpec>,
    packages: Vec<PackageSpec>,
}

impl ProblemBuilder {
    /// Start an empty problem.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Start from an existing road network.
    #[must_use]
    pub fn with_graph(name: &str, graph: RoadGraph) -> Self {
        Self {
            name: name.into(),
            graph,
            ..Self::default()
        }
    }

    /// See [`RoadGraph::add_location`].
    ///
    /// # Errors
    ///
    /// Propagates graph validation failures.
    pub fn add_location(
        &mut self,
        name: &str,
        position: Coord<i32>,
        petrol_station: PetrolStation,
    ) -> Result<LocationId, ProblemError> {
        self.graph.add_location(name, position, petrol_station)
    }

    /// See [`RoadGraph::add_road`].
    ///
    /// # Errors
    ///
    /// Propagates graph validation failures.
    pub fn add_road(
        &mut self,
        name: &str,
        from: LocationId,
        to: LocationId,
        length: u32,
    ) -> Result<RoadId, ProblemError> {
        self.graph.add_road(name, from, to, length)
    }

    /// See [`RoadGraph::add_fuel_road`].
    ///
    /// # Errors
    ///
    /// Propagates graph validation failures.
    pub fn add_fuel_road(
        &mut self,
        name: &str,
        from: LocationId,
        to: LocationId,
        length: u32,
        fuel_cost: u32,
    ) -> Result<RoadId, ProblemError> {
        self.graph.add_fuel_road(name, from, to, length, fuel_cost)
    }

    /// Road network assembled so far.
    #[must_use]
    pub const fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    /// Register a vehicle.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate name or an unknown location.
    pub fn add_vehicle(&mut self, spec: VehicleSpec) -> Result<VehicleId, ProblemError> {
        if self.vehicles.iter().any(|v| v.name == spec.name) {
            return Err(ProblemError::DuplicateVehicle { name: spec.name });
        }
        for location in spec.location.iter().chain(spec.target.iter()) {
            self.require_location(*location)?;
        }
        let id = VehicleId::new(self.vehicles.len());
        self.vehicles.push(spec);
        Ok(id)
    }

    /// Register a package.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate name or an unknown location or vehicle.
    pub fn add_package(&mut self, spec: PackageSpec) -> Result<PackageId, ProblemError> {
        if self.packages.iter().any(|p| p.name == spec.name) {
            return Err(ProblemError::DuplicatePackage { name: spec.name });
        }
        self.require_location(spec.target)?;
        match spec.placement {
            Placement::At(location) => self.require_location(location)?,
            Placement::In(vehicle) => {
                if self.vehicles.get(vehicle.index()).is_none() {
                    return Err(ProblemError::UnknownVehicle { vehicle });
                }
            }
        }
        let id = PackageId::new(self.packages.len());
        self.packages.push(spec);
        Ok(id)
    }

    fn require_location(&self, location: LocationId) -> Result<(), ProblemError> {
        self.graph
            .location(location)
            .map(|_| ())
            .ok_or(ProblemError::UnknownLocation { location })
    }

    /// Finish the problem, loading carried packages into their vehicles.
    ///
    /// # Errors
    ///
    /// Fails when a vehicle's initial load exceeds its capacity or its fuel
    /// exceeds its tank.
    pub fn build(self) -> Result<Problem, ProblemError> {
        let mut vehicles = Vec::with_capacity(self.vehicles.len());
        let mut seen = HashSet::new();
        for (index, spec) in self.vehicles.into_iter().enumerate() {
            let id = VehicleId::new(index);
            let carried: Vec<(PackageId, u32)> = self
                .packages
                .iter()
                .enumerate()
                .filter(|(_, package)| package.placement == Placement::In(id))
                .map(|(package_index, package)| (PackageId::new(package_index), package.size))
                .collect();
            let load = carried.iter().map(|(_, size)| *size).sum::<u32>();
            let free_capacity =
                spec.capacity
                    .checked_sub(load)
                    .ok_or_else(|| ProblemError::CapacityExceeded {
                        vehicle: Arc::clone(&spec.name),
                        load,
                        capacity: spec.capacity,
                    })?;
            seen.extend(carried.iter().map(|(package, _)| *package));
            vehicles.push(Vehicle {
                id,
                name: spec.name,
                location: spec.location,
                target: spec.target,
                free_capacity,
                max_capacity: spec.capacity,
                fuel: spec.fuel,
                ready_loading: spec.ready_loading,
                packages: carried.into_iter().map(|(package, _)| package).collect(),
            });
        }
        let packages = self
            .packages
            .into_iter()
            .enumerate()
            .map(|(index, spec)| Package {
                id: PackageId::new(index),
                name: spec.name,
                location: match spec.placement {
                    Placement::At(location) => Some(location),
                    Placement::In(_) => None,
                },
                target: spec.target,
                size: spec.size,
            })
            .collect::<Vec<_>>();
        log::debug!(
            "built problem {} with {} vehicles, {} packages ({} carried)",
            self.name,
            vehicles.len(),
            packages.len(),
            seen.len()
        );
        Ok(Problem {
            name: self.name,
            graph: Arc::new(self.graph),
            vehicles,
            packages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn builder() -> (ProblemBuilder, LocationId, LocationId) {
        let mut builder = ProblemBuilder::new("fixture");
        let a = builder
            .add_location("A", Coord { x: 0, y: 0 }, PetrolStation::NotApplicable)
            .expect("A");
        let b = builder
            .add_location("B", Coord { x: 1, y: 0 }, PetrolStation::NotApplicable)
            .expect("B");
        builder.add_road("A-B", a, b, 5).expect("road");
        (builder, a, b)
    }

    #[rstest]
    fn carried_packages_reduce_free_capacity(builder: (ProblemBuilder, LocationId, LocationId)) {
        let (mut builder, a, b) = builder;
        let truck = builder
            .add_vehicle(VehicleSpec::new("truck", a, 4))
            .expect("vehicle");
        let package = builder
            .add_package(PackageSpec::carried("p", truck, b).with_size(3))
            .expect("package");
        let problem = builder.build().expect("problem");

        let vehicle = problem.vehicle(truck).expect("truck exists");
        assert_eq!(vehicle.free_capacity(), 1);
        assert_eq!(vehicle.packages(), &[package]);
        assert_eq!(problem.package(package).and_then(Package::location), None);
        assert_eq!(
            problem
                .package(package)
                .and_then(|p| problem.effective_location(p)),
            Some(a)
        );
    }

    #[rstest]
    fn overloaded_vehicle_is_rejected(builder: (ProblemBuilder, LocationId, LocationId)) {
        let (mut builder, a, b) = builder;
        let truck = builder
            .add_vehicle(VehicleSpec::new("truck", a, 1))
            .expect("vehicle");
        builder
            .add_package(PackageSpec::carried("p", truck, b).with_size(2))
            .expect("package");
        let err = builder.build().expect_err("overloaded");
        assert!(matches!(err, ProblemError::CapacityExceeded { load: 2, .. }));
    }

    #[rstest]
    fn duplicate_names_are_rejected(builder: (ProblemBuilder, LocationId, LocationId)) {
        let (mut builder, a, b) = builder;
        builder
            .add_vehicle(VehicleSpec::new("truck", a, 1))
            .expect("vehicle");
        let err = builder
            .add_vehicle(VehicleSpec::new("truck", b, 1))
            .expect_err("duplicate vehicle");
        assert!(matches!(err, ProblemError::DuplicateVehicle { .. }));

        builder
            .add_package(PackageSpec::at("p", a, b))
            .expect("package");
        let err = builder
            .add_package(PackageSpec::at("p", b, a))
            .expect_err("duplicate package");
        assert!(matches!(err, ProblemError::DuplicatePackage { .. }));
    }

    #[rstest]
    fn unknown_references_are_rejected(builder: (ProblemBuilder, LocationId, LocationId)) {
        let (mut builder, a, _) = builder;
        let ghost = VehicleId::new(9);
        let err = builder
            .add_package(PackageSpec::carried("p", ghost, a))
            .expect_err("unknown vehicle");
        assert_eq!(err, ProblemError::UnknownVehicle { vehicle: ghost });
    }

    #[rstest]
    fn goal_requires_vehicle_targets(builder: (ProblemBuilder, LocationId, LocationId)) {
        let (mut builder, a, b) = builder;
        let truck = builder
            .add_vehicle(VehicleSpec::new("truck", a, 1).with_target(b))
            .expect("vehicle");
        let problem = builder.build().expect("problem");
        assert!(!problem.is_goal());

        let moved = problem
            .vehicle(truck)
            .map(|vehicle| problem.with_vehicle(vehicle.with_location(b)))
            .expect("truck exists");
        assert!(moved.is_goal());
        assert!(!problem.is_goal(), "updates never touch the original");
    }
}
