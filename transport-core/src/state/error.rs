//! Structural failures when applying an action.

use thiserror::Error;

use crate::{LocationId, PackageId, RoadId, VehicleId};

/// An action violated a capacity, fuel, or placement invariant.
///
/// Generated actions never trigger these; seeing one from a planner means the
/// generator and the transition rules disagree.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ApplyError {
    /// The acting vehicle does not exist.
    #[error("unknown {vehicle}")]
    UnknownVehicle {
        /// Vehicle named by the action.
        vehicle: VehicleId,
    },
    /// The package does not exist.
    #[error("unknown {package}")]
    UnknownPackage {
        /// Package named by the action.
        package: PackageId,
    },
    /// The road does not exist or does not join the stated locations.
    #[error("{road} does not join the requested locations")]
    UnknownRoad {
        /// Road named by the action.
        road: RoadId,
    },
    /// The vehicle is elsewhere or unplaced.
    #[error("{vehicle} is not at {location}")]
    VehicleNotAt {
        /// Acting vehicle.
        vehicle: VehicleId,
        /// Location the action expected.
        location: LocationId,
    },
    /// The package is not lying at the pick-up location.
    #[error("{package} is not at {location}")]
    PackageNotAt {
        /// Package named by the action.
        package: PackageId,
        /// Location the action expected.
        location: LocationId,
    },
    /// Loading would push free capacity below zero.
    #[error("{package} does not fit into {vehicle}")]
    InsufficientCapacity {
        /// Acting vehicle.
        vehicle: VehicleId,
        /// Package that does not fit.
        package: PackageId,
    },
    /// The vehicle does not carry the package it tries to drop.
    #[error("{vehicle} does not carry {package}")]
    NotCarried {
        /// Acting vehicle.
        vehicle: VehicleId,
        /// Package named by the action.
        package: PackageId,
    },
    /// The tank holds less fuel than the road needs.
    #[error("{vehicle} needs {required} fuel but has {available}")]
    InsufficientFuel {
        /// Acting vehicle.
        vehicle: VehicleId,
        /// Fuel the road consumes.
        required: u32,
        /// Fuel in the tank.
        available: u32,
    },
    /// Refuelling away from an enabled petrol station.
    #[error("{location} has no petrol station")]
    NoPetrolStation {
        /// Location of the refuel attempt.
        location: LocationId,
    },
    /// Refuelling a vehicle without a tank.
    #[error("{vehicle} has no fuel tank")]
    NoFuelTank {
        /// Acting vehicle.
        vehicle: VehicleId,
    },
}
