//! Randomized depth-first backtracking.

use std::ops::ControlFlow;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use transport_core::{
    BestPlanTracker, CancellationToken, Domain, Plan, PlanError, PlanState, Planner, Problem,
    ShortestPathIndex,
};

use crate::choice::{self, VehicleChoice};
use crate::config::{Exploration, RandomizedConfig};
use crate::partial::{Absorption, PartialPlanner};
use crate::route::{apply_all, drive_to_targets};

const NAME: &str = "backtrack-around-path-nearby";

/// Depth-first search over package and vehicle assignments.
///
/// At every state the unfinished packages are tried in random order. For
/// each package its serving vehicles are tried one after another, each drawn
/// by the nearest-vehicle coin toss and then removed, and every resulting
/// partial plan is explored before the next choice is tried. Branches that
/// already cost as much as the best plan are cut. A search that runs to
/// completion therefore returns the same cost for every seed. Partial plans
/// pick up packages along and around the route, as in
/// [`crate::RestartStrategy::AroundPathNearby`].
///
/// The search ends when every branch is explored, on cancellation, or after
/// [`RandomizedConfig::max_trials`] visited states.
#[derive(Debug, Clone)]
pub struct BacktrackPlanner {
    config: RandomizedConfig,
    token: CancellationToken,
}

impl BacktrackPlanner {
    /// Planner with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RandomizedConfig::default())
    }

    /// Planner with explicit configuration.
    #[must_use]
    pub fn with_config(config: RandomizedConfig) -> Self {
        Self {
            config,
            token: CancellationToken::new(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &RandomizedConfig {
        &self.config
    }
}

impl Default for BacktrackPlanner {
    fn default() -> Self {
        Self::new()
    }
}

struct Descent<'a> {
    domain: &'a Domain,
    paths: &'a ShortestPathIndex,
    token: &'a CancellationToken,
    max_states: Option<u64>,
    rng: ChaCha8Rng,
    exploration: Exploration,
    tracker: BestPlanTracker,
    visited: u64,
}

impl Descent<'_> {
    fn descend(&mut self, state: &PlanState) -> Result<ControlFlow<()>, PlanError> {
        if self.token.is_cancelled() {
            log::info!(
                "backtracking cancelled after {} states, best cost {:?}",
                self.visited,
                self.tracker.best().map(Plan::total_cost)
            );
            return Ok(ControlFlow::Break(()));
        }
        if self.max_states.is_some_and(|max| self.visited >= max) {
            return Ok(ControlFlow::Break(()));
        }
        self.visited = self.visited.saturating_add(1);
        self.exploration.after_trials(self.visited);

        if state.is_goal() {
            self.tracker.offer_state(state);
            return Ok(ControlFlow::Continue(()));
        }
        if state.total_cost() >= self.tracker.bound() {
            return Ok(ControlFlow::Continue(()));
        }

        let problem = state.problem();
        let options = choice::assignments(problem, self.paths);
        if options.is_empty() {
            if problem.unfinished_packages().next().is_some() {
                log::debug!("dead end with unfinished packages nobody can serve");
                return Ok(ControlFlow::Continue(()));
            }
            let actions = drive_to_targets(self.domain, problem, self.paths)?;
            return match apply_all(state, &actions) {
                Some(next) => self.descend(&next),
                None => Ok(ControlFlow::Continue(())),
            };
        }

        let partial = PartialPlanner {
            domain: self.domain,
            problem,
            paths: self.paths,
            absorption: Absorption::AroundPath,
        };
        let mut packages = options;
        packages.shuffle(&mut self.rng);
        for option in &packages {
            let Some(package) = problem.package(option.package) else {
                continue;
            };
            let mut untried = option.vehicles.clone();
            while let Some(vehicle) = choice::choose_vehicle(
                &mut self.rng,
                VehicleChoice::CoinToss(self.exploration.probability()),
                problem,
                self.paths,
                package,
                &untried,
            ) {
                untried.retain(|candidate| *candidate != vehicle);
                let actions = partial.build(vehicle, package.id())?;
                if actions.is_empty() {
                    continue;
                }
                if let Some(next) = apply_all(state, &actions)
                    && self.descend(&next)?.is_break()
                {
                    return Ok(ControlFlow::Break(()));
                }
            }
        }
        Ok(ControlFlow::Continue(()))
    }
}

impl Planner for BacktrackPlanner {
    fn name(&self) -> &str {
        NAME
    }

    fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    fn plan_with_paths(
        &self,
        domain: &Domain,
        problem: &Problem,
        paths: &ShortestPathIndex,
    ) -> Result<Option<Plan>, PlanError> {
        log::info!(
            "{} planning {} with seed {}",
            self.name(),
            problem.name(),
            self.config.seed
        );
        if let Some(package) = choice::oversized_package(problem) {
            log::warn!("{package} does not fit into any placed vehicle; no plan exists");
            return Ok(None);
        }
        let mut descent = Descent {
            domain,
            paths,
            token: &self.token,
            max_states: self.config.max_trials,
            rng: ChaCha8Rng::seed_from_u64(self.config.seed),
            exploration: Exploration::new(&self.config),
            tracker: BestPlanTracker::new(),
            visited: 0,
        };
        let flow = descent.descend(&PlanState::new(problem.clone()))?;
        if flow.is_continue() {
            log::info!(
                "{} explored every branch in {} states",
                self.name(),
                descent.visited
            );
        }
        Ok(descent.tracker.into_best())
    }
}
