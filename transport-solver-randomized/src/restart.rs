//! Randomized restart planners.

use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use transport_core::{
    Action, BestPlanTracker, CancellationToken, Domain, Plan, PlanError, PlanState, Planner,
    Problem, ShortestPathIndex,
};

use crate::choice::{self, VehicleChoice};
use crate::config::{Exploration, RandomizedConfig};
use crate::partial::{Absorption, PartialPlanner};
use crate::route::{apply_all, drive_to_targets};

/// Exploration used by [`RestartStrategy::OnPathNearby`], which never decays.
const NEARBY_EXPLORATION: f64 = 0.1;

/// How a restart trial picks its next package and vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RestartStrategy {
    /// Uniform vehicle, then a uniform package it can serve; on-route
    /// pick-ups only.
    OnPath,
    /// Uniform package, nearest vehicle with a fixed small chance of a
    /// uniform one; on-route pick-ups only.
    OnPathNearby,
    /// Uniform package, nearest vehicle with a decaying chance of a uniform
    /// one; packages near the route are moved closer too.
    #[default]
    AroundPathNearby,
    /// Uniform package, vehicle drawn with probability falling off with its
    /// distance to the package; packages near the route are moved closer too.
    AroundPathDistribution,
}

impl RestartStrategy {
    /// Every strategy in declaration order.
    pub const ALL: [Self; 4] = [
        Self::OnPath,
        Self::OnPathNearby,
        Self::AroundPathNearby,
        Self::AroundPathDistribution,
    ];

    /// Stable kebab-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::OnPath => "on-path",
            Self::OnPathNearby => "on-path-nearby",
            Self::AroundPathNearby => "around-path-nearby",
            Self::AroundPathDistribution => "around-path-distribution",
        }
    }

    const fn absorption(self) -> Absorption {
        match self {
            Self::OnPath | Self::OnPathNearby => Absorption::OnPath,
            Self::AroundPathNearby | Self::AroundPathDistribution => Absorption::AroundPath,
        }
    }

    const fn exploration(self, config: &RandomizedConfig) -> Exploration {
        match self {
            Self::OnPathNearby => Exploration::fixed(NEARBY_EXPLORATION),
            Self::OnPath | Self::AroundPathNearby | Self::AroundPathDistribution => {
                Exploration::new(config)
            }
        }
    }
}

impl fmt::Display for RestartStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an unknown restart strategy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown restart strategy `{name}`; expected one of on-path, on-path-nearby, around-path-nearby, around-path-distribution")]
pub struct UnknownStrategyError {
    /// The rejected name.
    pub name: String,
}

impl FromStr for RestartStrategy {
    type Err = UnknownStrategyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownStrategyError {
                name: value.to_owned(),
            })
    }
}

/// Anytime planner that builds complete plans from scratch over and over.
///
/// Each trial starts from the initial problem and repeatedly hands one
/// package to one vehicle as a partial plan until the goal holds, the trial
/// costs as much as the best plan so far, or an action is rejected. Cheaper
/// plans replace the best one. Trials continue until the planner is
/// cancelled or [`RandomizedConfig::max_trials`] is reached.
///
/// # Examples
///
/// ```
/// use transport_core::{Domain, Planner};
/// use transport_core::test_support::single_road_problem;
/// use transport_solver_randomized::{RandomizedConfig, RestartPlanner, RestartStrategy};
///
/// let fixture = single_road_problem();
/// let planner = RestartPlanner::with_config(
///     RestartStrategy::AroundPathNearby,
///     RandomizedConfig::default().with_max_trials(10),
/// );
/// let plan = planner.plan(&Domain::sequential(), &fixture.problem)?;
/// assert_eq!(plan.map(|plan| plan.total_cost()), Some(7));
/// # Ok::<(), transport_core::PlanError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RestartPlanner {
    name: String,
    strategy: RestartStrategy,
    config: RandomizedConfig,
    token: CancellationToken,
}

impl RestartPlanner {
    /// Planner with the default configuration.
    #[must_use]
    pub fn new(strategy: RestartStrategy) -> Self {
        Self::with_config(strategy, RandomizedConfig::default())
    }

    /// Planner with explicit configuration.
    #[must_use]
    pub fn with_config(strategy: RestartStrategy, config: RandomizedConfig) -> Self {
        Self {
            name: format!("restart-{strategy}"),
            strategy,
            config,
            token: CancellationToken::new(),
        }
    }

    /// Active strategy.
    #[must_use]
    pub const fn strategy(&self) -> RestartStrategy {
        self.strategy
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &RandomizedConfig {
        &self.config
    }

    /// Play one trial from `start`, returning the goal state it reached.
    fn trial(
        &self,
        context: &Trial<'_>,
        rng: &mut ChaCha8Rng,
        exploration: f64,
        bound: u64,
        start: PlanState,
    ) -> Result<Option<PlanState>, PlanError> {
        let mut state = start;
        loop {
            if state.is_goal() {
                return Ok(Some(state));
            }
            if state.total_cost() >= bound {
                return Ok(None);
            }
            let next_actions = self.next_actions(context, rng, exploration, &state)?;
            let Some(actions) = next_actions.filter(|actions| !actions.is_empty()) else {
                log::debug!("trial stalled with unfinished packages nobody can serve");
                return Ok(None);
            };
            let Some(next) = apply_all(&state, &actions) else {
                return Ok(None);
            };
            state = next;
        }
    }

    fn next_actions(
        &self,
        context: &Trial<'_>,
        rng: &mut ChaCha8Rng,
        exploration: f64,
        state: &PlanState,
    ) -> Result<Option<Vec<Action>>, PlanError> {
        let problem = state.problem();
        let options = choice::assignments(problem, context.paths);
        if options.is_empty() {
            if problem.unfinished_packages().next().is_some() {
                return Ok(None);
            }
            return drive_to_targets(context.domain, problem, context.paths).map(Some);
        }
        let picked = match self.strategy {
            RestartStrategy::OnPath => choice::choose_vehicle_first(rng, &options),
            RestartStrategy::OnPathNearby | RestartStrategy::AroundPathNearby => {
                choice::choose_package_first(
                    rng,
                    VehicleChoice::CoinToss(exploration),
                    problem,
                    context.paths,
                    &options,
                )
            }
            RestartStrategy::AroundPathDistribution => choice::choose_package_first(
                rng,
                VehicleChoice::Distance,
                problem,
                context.paths,
                &options,
            ),
        };
        let Some((package, vehicle)) = picked else {
            return Ok(None);
        };
        let partial = PartialPlanner {
            domain: context.domain,
            problem,
            paths: context.paths,
            absorption: self.strategy.absorption(),
        };
        partial.build(vehicle, package).map(Some)
    }
}

impl Default for RestartPlanner {
    fn default() -> Self {
        Self::new(RestartStrategy::default())
    }
}

/// Inputs shared by every trial of one planning run.
struct Trial<'a> {
    domain: &'a Domain,
    paths: &'a ShortestPathIndex,
}

impl Planner for RestartPlanner {
    fn name(&self) -> &str {
        &self.name
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
        let start = PlanState::new(problem.clone());
        let mut tracker = BestPlanTracker::new();
        if start.is_goal() {
            tracker.offer_state(&start);
            return Ok(tracker.into_best());
        }
        if let Some(package) = choice::oversized_package(problem) {
            log::warn!("{package} does not fit into any placed vehicle; no plan exists");
            return Ok(None);
        }

        let context = Trial { domain, paths };
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let mut exploration = self.strategy.exploration(&self.config);
        let mut trials = 0_u64;
        loop {
            if self.token.is_cancelled() {
                log::info!(
                    "{} cancelled after {trials} trials, returning best plan with cost {:?}",
                    self.name(),
                    tracker.best().map(Plan::total_cost)
                );
                break;
            }
            if self.config.max_trials.is_some_and(|max| trials >= max) {
                log::info!("{} finished {trials} trials", self.name());
                break;
            }
            let outcome = self.trial(
                &context,
                &mut rng,
                exploration.probability(),
                tracker.bound(),
                start.clone(),
            )?;
            if let Some(goal) = outcome {
                tracker.offer_state(&goal);
            }
            trials = trials.saturating_add(1);
            exploration.after_trials(trials);
        }
        Ok(tracker.into_best())
    }
}
