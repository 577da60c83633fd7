//! Immutable search states.
//!
//! A [`PlanState`] pairs a problem snapshot with the actions that produced
//! it. History is a shared reverse-linked list, so expanding a state costs
//! one node per successor rather than a copy of the whole plan.

use std::sync::Arc;

use crate::{Action, Plan, Problem};

mod error;
mod fingerprint;
mod transition;

pub use error::ApplyError;
pub use fingerprint::StateFingerprint;

#[derive(Debug)]
struct HistoryNode {
    action: Action,
    previous: Option<Arc<HistoryNode>>,
}

/// A problem snapshot plus the action history that reached it.
///
/// # Examples
///
/// ```
/// use transport_core::{Domain, PlanState};
/// # use geo::Coord;
/// # use transport_core::{PackageSpec, PetrolStation, ProblemBuilder, VehicleSpec};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let mut builder = ProblemBuilder::new("p");
/// # let a = builder.add_location("A", Coord { x: 0, y: 0 }, PetrolStation::NotApplicable)?;
/// # let b = builder.add_location("B", Coord { x: 1, y: 0 }, PetrolStation::NotApplicable)?;
/// # builder.add_road("A-B", a, b, 5)?;
/// # let truck = builder.add_vehicle(VehicleSpec::new("truck", a, 1))?;
/// # let package = builder.add_package(PackageSpec::at("p", a, b))?;
/// # let problem = builder.build()?;
/// let domain = Domain::sequential();
/// let start = PlanState::new(problem.clone());
/// let loaded = start.apply(&domain.build_pick_up(truck, a, package))?;
/// assert_eq!(loaded.total_cost(), 1);
/// assert_eq!(start.total_cost(), 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PlanState {
    problem: Problem,
    history: Option<Arc<HistoryNode>>,
    total_cost: u64,
    depth: usize,
}

impl PlanState {
    /// The initial state of `problem` with an empty history.
    #[must_use]
    pub const fn new(problem: Problem) -> Self {
        Self {
            problem,
            history: None,
            total_cost: 0,
            depth: 0,
        }
    }

    /// Replay `actions` from `problem`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ApplyError`] hit along the way.
    pub fn replay<'a, I>(problem: Problem, actions: I) -> Result<Self, ApplyError>
    where
        I: IntoIterator<Item = &'a Action>,
    {
        actions
            .into_iter()
            .try_fold(Self::new(problem), |state, action| state.apply(action))
    }

    /// Apply `action`, returning the successor state.
    ///
    /// `self` is left untouched whether or not the action applies.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError`] when the action breaks a capacity, fuel, or
    /// placement invariant.
    pub fn apply(&self, action: &Action) -> Result<Self, ApplyError> {
        let problem = transition::transition(&self.problem, action)?;
        Ok(Self {
            problem,
            history: Some(Arc::new(HistoryNode {
                action: *action,
                previous: self.history.clone(),
            })),
            total_cost: self.total_cost.saturating_add(u64::from(action.cost())),
            depth: self.depth.saturating_add(1),
        })
    }

    /// Current snapshot.
    #[must_use]
    pub const fn problem(&self) -> &Problem {
        &self.problem
    }

    /// Accumulated cost (and time) of the history.
    #[must_use]
    pub const fn total_cost(&self) -> u64 {
        self.total_cost
    }

    /// Number of actions applied so far.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Every package delivered and every vehicle with a target on it.
    #[must_use]
    pub fn is_goal(&self) -> bool {
        self.problem.is_goal()
    }

    /// Most recent action.
    #[must_use]
    pub fn last_action(&self) -> Option<&Action> {
        self.history.as_deref().map(|node| &node.action)
    }

    /// Actions from newest to oldest.
    pub fn actions_rev(&self) -> impl Iterator<Item = &Action> + '_ {
        std::iter::successors(self.history.as_deref(), |node| node.previous.as_deref())
            .map(|node| &node.action)
    }

    /// Actions in execution order.
    #[must_use]
    pub fn actions(&self) -> Vec<Action> {
        let mut actions: Vec<Action> = self.actions_rev().copied().collect();
        actions.reverse();
        actions
    }

    /// The history as a [`Plan`].
    #[must_use]
    pub fn to_plan(&self) -> Plan {
        Plan::new(self.actions())
    }

    /// Canonical key of the snapshot, ignoring history.
    #[must_use]
    pub fn fingerprint(&self) -> StateFingerprint {
        StateFingerprint::of(&self.problem)
    }
}

impl Drop for PlanState {
    fn drop(&mut self) {
        // Unlink uniquely owned history iteratively; long plans would
        // otherwise recurse once per node.
        let mut next = self.history.take();
        while let Some(node) = next {
            next = match Arc::try_unwrap(node) {
                Ok(mut owned) => owned.previous.take(),
                Err(_) => None,
            };
        }
    }
}
