//! Facade crate for the Transport planning engine.
//!
//! This crate re-exports the problem model, plan states and planner trait
//! and exposes the planner families behind feature flags.
//!
//! ```
//! # #[cfg(all(feature = "solver-search", feature = "test-support"))]
//! # {
//! use transport_planner::{Domain, ForwardAstarPlanner, Planner};
//!
//! let fixture = transport_planner::test_support::single_road_problem();
//! let plan = ForwardAstarPlanner::default().plan(&Domain::sequential(), &fixture.problem)?;
//! assert_eq!(plan.map(|plan| plan.total_cost()), Some(7));
//! # }
//! # Ok::<(), transport_planner::PlanError>(())
//! ```

#![forbid(unsafe_code)]

pub use transport_core::{
    Action, ActionCosts, ActionGenerator, ActionKind, ApplyError, BestPlanTracker,
    CancellationToken, Domain, Fuel, Location, LocationId, Package, PackageId, PackageSpec,
    PetrolStation, Placement, Plan, PlanError, PlanState, Planner, Problem, ProblemBuilder,
    ProblemError, Road, RoadGraph, RoadId, ScheduledAction, ShortestPath, ShortestPathIndex,
    StateFingerprint, UnreachableError, Vehicle, VehicleId, VehicleSpec,
};

#[cfg(feature = "serde")]
pub use transport_core::{PlanDocument, ProblemDocument};

#[cfg(feature = "test-support")]
pub use transport_core::test_support;

#[cfg(feature = "solver-search")]
pub use transport_solver_search::{
    AstarConfig, BreadthFirstConfig, BreadthFirstPlanner, ForwardAstarPlanner, HeuristicKind,
    WeightedAstarConfig, WeightedAstarPlanner,
};

#[cfg(feature = "solver-randomized")]
pub use transport_solver_randomized::{
    BacktrackPlanner, RandomizedConfig, RestartPlanner, RestartStrategy,
};
