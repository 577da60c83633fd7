//! Immutable problem model: road network, vehicles, and packages.

mod builder;
mod error;
mod graph;
mod ids;
mod package;
mod problem;
mod vehicle;

pub use builder::{PackageSpec, Placement, ProblemBuilder, VehicleSpec};
pub use error::ProblemError;
pub use graph::{Location, PetrolStation, Road, RoadGraph};
pub use ids::{LocationId, PackageId, RoadId, VehicleId};
pub use package::Package;
pub use problem::Problem;
pub use vehicle::{Fuel, Vehicle};
