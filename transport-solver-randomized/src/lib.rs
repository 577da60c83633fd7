//! Randomized anytime planners for the Transport domain.
//!
//! [`RestartPlanner`] plays complete trials from the initial problem over and
//! over, each trial handing one package at a time to one vehicle, and keeps
//! the cheapest plan. [`BacktrackPlanner`] explores the same kind of
//! assignments depth first. Both draw every random choice from a `ChaCha8`
//! generator seeded by [`RandomizedConfig::seed`], so a given seed and
//! problem always yield the same plan.
//!
//! The planners run until cancelled or until their trial budget is spent,
//! and then return the best plan found.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod backtrack;
mod choice;
mod config;
mod partial;
mod restart;
mod route;

pub use backtrack::BacktrackPlanner;
pub use config::RandomizedConfig;
pub use restart::{RestartPlanner, RestartStrategy, UnknownStrategyError};
