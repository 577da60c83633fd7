//! Planner abstraction shared by every search strategy.

use thiserror::Error;

use crate::{
    Action, ApplyError, CancellationToken, Domain, Plan, Problem, ShortestPathIndex,
    UnreachableError,
};

/// Defects detected while planning.
///
/// Search outcomes such as "no plan" or "cancelled early" are not errors;
/// planners report them as `Ok(None)`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// An action the planner generated itself failed to apply.
    #[error("generated action {action:?} could not be applied: {source}")]
    InvalidTransition {
        /// The rejected action.
        action: Action,
        /// Why it was rejected.
        #[source]
        source: ApplyError,
    },
    /// A location the planner must reach has no road path to it.
    #[error(transparent)]
    Unreachable(#[from] UnreachableError),
    /// Every package is delivered, yet the goal still does not hold and no
    /// vehicle has a target left to drive to.
    #[error("no unfinished packages remain but the goal is not reached")]
    NoUnfinishedPackages,
}

/// A strategy that turns a problem into a plan.
///
/// `plan` runs synchronously on the calling thread. Another thread may call
/// [`Planner::cancel`] at any time; the planner then returns the best plan it
/// has found, or `Ok(None)`. Cancellation is permanent: a planner cancelled
/// before `plan` starts, or during an earlier run, returns immediately.
pub trait Planner: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Token observed by this planner.
    fn cancellation_token(&self) -> &CancellationToken;

    /// Plan using a precomputed shortest-path index for `problem`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] on structural defects only.
    fn plan_with_paths(
        &self,
        domain: &Domain,
        problem: &Problem,
        paths: &ShortestPathIndex,
    ) -> Result<Option<Plan>, PlanError>;

    /// Plan from scratch, computing the shortest-path index first.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] on structural defects only.
    fn plan(&self, domain: &Domain, problem: &Problem) -> Result<Option<Plan>, PlanError> {
        let paths = ShortestPathIndex::new(problem.graph());
        self.plan_with_paths(domain, problem, &paths)
    }

    /// Ask the planner to stop. Idempotent and thread-safe.
    fn cancel(&self) {
        self.cancellation_token().cancel();
    }
}
