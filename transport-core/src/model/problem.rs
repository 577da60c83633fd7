//! Immutable snapshot of a transport problem.

use std::sync::Arc;

use super::{LocationId, Package, PackageId, RoadGraph, Vehicle, VehicleId};

/// Road network, vehicles, and packages at one instant.
///
/// The graph is shared between snapshots; vehicles and packages are copied
/// on every update, so a `Problem` handed to a planner is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub(crate) name: Arc<str>,
    pub(crate) graph: Arc<RoadGraph>,
    pub(crate) vehicles: Vec<Vehicle>,
    pub(crate) packages: Vec<Package>,
}

impl Problem {
    /// Problem name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared road network.
    #[must_use]
    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    /// All vehicles in id order.
    #[must_use]
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// All packages in id order.
    #[must_use]
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Look up a vehicle.
    #[must_use]
    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id.index())
    }

    /// Look up a package.
    #[must_use]
    pub fn package(&self, id: PackageId) -> Option<&Package> {
        self.packages.get(id.index())
    }

    /// Resolve a vehicle by name.
    #[must_use]
    pub fn vehicle_id(&self, name: &str) -> Option<VehicleId> {
        self.vehicles
            .iter()
            .find(|vehicle| vehicle.name() == name)
            .map(Vehicle::id)
    }

    /// Resolve a package by name.
    #[must_use]
    pub fn package_id(&self, name: &str) -> Option<PackageId> {
        self.packages
            .iter()
            .find(|package| package.name() == name)
            .map(Package::id)
    }

    /// Packages not yet resting at their target, carried ones included.
    pub fn unfinished_packages(&self) -> impl Iterator<Item = &Package> + '_ {
        self.packages.iter().filter(|package| !package.is_delivered())
    }

    /// Packages lying at `location`.
    pub fn packages_at(&self, location: LocationId) -> impl Iterator<Item = &Package> + '_ {
        self.packages
            .iter()
            .filter(move |package| package.location == Some(location))
    }

    /// The vehicle carrying `package`, if any.
    #[must_use]
    pub fn carrier_of(&self, package: PackageId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.carries(package))
    }

    /// Location of a package, following its carrier while it is loaded.
    #[must_use]
    pub fn effective_location(&self, package: &Package) -> Option<LocationId> {
        package
            .location
            .or_else(|| self.carrier_of(package.id).and_then(Vehicle::location))
    }

    /// Every package is delivered and every vehicle with a target stands on it.
    #[must_use]
    pub fn is_goal(&self) -> bool {
        self.packages.iter().all(Package::is_delivered)
            && self.vehicles.iter().all(Vehicle::at_target)
    }

    /// A copy with the vehicle of the same id replaced.
    #[must_use]
    pub fn with_vehicle(&self, vehicle: Vehicle) -> Self {
        let mut next = self.clone();
        next.replace_vehicle(vehicle);
        next
    }

    /// A copy with the package of the same id replaced.
    #[must_use]
    pub fn with_package(&self, package: Package) -> Self {
        let mut next = self.clone();
        next.replace_package(package);
        next
    }

    pub(crate) fn replace_vehicle(&mut self, vehicle: Vehicle) {
        if let Some(slot) = self.vehicles.get_mut(vehicle.id.index()) {
            *slot = vehicle;
        }
    }

    pub(crate) fn replace_package(&mut self, package: Package) {
        if let Some(slot) = self.packages.get_mut(package.id.index()) {
            *slot = package;
        }
    }
}
