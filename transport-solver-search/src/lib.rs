//! Systematic search planners for the Transport domain.
//!
//! [`ForwardAstarPlanner`] runs A* over immutable plan states with one of the
//! [`HeuristicKind`] estimates. [`WeightedAstarPlanner`] wraps the same search
//! in a weight-annealing loop that produces a quick first plan and then
//! tightens it. [`BreadthFirstPlanner`] is a simple reference, mainly useful
//! for checking the others on small problems.
//!
//! All planners implement [`transport_core::Planner`], observe their
//! cancellation token once per expanded state, and return the best plan found
//! so far when cancelled.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod astar;
mod bfs;
pub mod heuristic;
mod key;
mod search;
mod weighted;

pub use astar::{AstarConfig, ForwardAstarPlanner};
pub use bfs::{BreadthFirstConfig, BreadthFirstPlanner};
pub use heuristic::{Heuristic, HeuristicKind, UnknownHeuristicError};
pub use weighted::{WeightedAstarConfig, WeightedAstarPlanner};
