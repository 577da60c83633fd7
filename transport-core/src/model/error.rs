//! Errors raised while assembling a [`crate::Problem`].

use std::sync::Arc;

use thiserror::Error;

use super::{LocationId, VehicleId};

/// Errors returned when a problem description violates model invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProblemError {
    /// Two locations share the same name.
    #[error("location `{name}` is defined more than once")]
    DuplicateLocation {
        /// Offending location name.
        name: Arc<str>,
    },
    /// A referenced location id does not exist in the graph.
    #[error("unknown {location}")]
    UnknownLocation {
        /// Identifier that failed to resolve.
        location: LocationId,
    },
    /// A referenced location name does not exist in the graph.
    #[error("unknown location `{name}`")]
    UnknownLocationName {
        /// Name that failed to resolve.
        name: Arc<str>,
    },
    /// A second road was added between the same ordered pair of locations.
    #[error("a road from `{from}` to `{to}` already exists")]
    DuplicateRoad {
        /// Name of the source location.
        from: Arc<str>,
        /// Name of the destination location.
        to: Arc<str>,
    },
    /// Two vehicles share the same name.
    #[error("vehicle `{name}` is defined more than once")]
    DuplicateVehicle {
        /// Offending vehicle name.
        name: Arc<str>,
    },
    /// A referenced vehicle id does not exist.
    #[error("unknown {vehicle}")]
    UnknownVehicle {
        /// Identifier that failed to resolve.
        vehicle: VehicleId,
    },
    /// A referenced vehicle name does not exist.
    #[error("unknown vehicle `{name}`")]
    UnknownVehicleName {
        /// Name that failed to resolve.
        name: Arc<str>,
    },
    /// Two packages share the same name.
    #[error("package `{name}` is defined more than once")]
    DuplicatePackage {
        /// Offending package name.
        name: Arc<str>,
    },
    /// The packages loaded into a vehicle exceed its capacity.
    #[error("vehicle `{vehicle}` carries load {load} above its capacity {capacity}")]
    CapacityExceeded {
        /// Vehicle name.
        vehicle: Arc<str>,
        /// Total size of the carried packages.
        load: u32,
        /// Maximum capacity of the vehicle.
        capacity: u32,
    },
    /// A vehicle's current fuel is above its tank size.
    #[error("vehicle `{vehicle}` has fuel {current} above its maximum {max}")]
    FuelExceedsCapacity {
        /// Vehicle name.
        vehicle: Arc<str>,
        /// Declared current fuel.
        current: u32,
        /// Declared maximum fuel.
        max: u32,
    },
    /// A package was placed neither at a location nor in a vehicle, or in both.
    #[error("package `{name}` must be placed either at a location or in a vehicle")]
    AmbiguousPlacement {
        /// Package name.
        name: Arc<str>,
    },
}
