//! Core model and search primitives for the Transport planning engine.
//!
//! A [`Problem`] describes a directed road network, a fleet of vehicles with
//! package capacity and optional fuel tanks, and packages with delivery
//! targets. Planners walk the space of immutable [`PlanState`]s, using the
//! [`ActionGenerator`] to enumerate successors and the
//! [`ShortestPathIndex`] for distances, and return a [`Plan`].
//!
//! Structural defects surface as [`PlanError`]; running out of search space
//! or being cancelled yields `Ok(None)` or the best plan found so far.

#![forbid(unsafe_code)]

mod cancel;
#[cfg(feature = "serde")]
mod document;
mod domain;
mod generator;
mod model;
mod plan;
mod planner;
mod shortest_path;
mod state;
mod tracker;

pub use cancel::CancellationToken;
#[cfg(feature = "serde")]
pub use document::{
    LocationDocument, PackageDocument, PlanDocument, ProblemDocument, RoadDocument, StepDocument,
    VehicleDocument,
};
pub use domain::{Action, ActionCosts, ActionKind, Domain};
pub use generator::ActionGenerator;
pub use model::{
    Fuel, Location, LocationId, Package, PackageId, PackageSpec, PetrolStation, Placement, Problem,
    ProblemBuilder, ProblemError, Road, RoadGraph, RoadId, Vehicle, VehicleId, VehicleSpec,
};
pub use plan::{Plan, ScheduledAction};
pub use planner::{PlanError, Planner};
pub use shortest_path::{ShortestPath, ShortestPathIndex, UnreachableError};
pub use state::{ApplyError, PlanState, StateFingerprint};
pub use tracker::BestPlanTracker;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
