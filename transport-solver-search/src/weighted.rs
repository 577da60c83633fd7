//! Weighted A* with annealing.

use transport_core::{
    BestPlanTracker, CancellationToken, Domain, Plan, PlanError, Planner, Problem,
    ShortestPathIndex,
};

use crate::heuristic::HeuristicKind;
use crate::search::{SearchContext, SearchOutcome, SearchParams, search};

/// Configuration for [`WeightedAstarPlanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedAstarConfig {
    /// Heuristic multiplied by the weight.
    pub heuristic: HeuristicKind,
    /// Weight of the first round. Values below one are treated as one.
    pub initial_weight: u64,
    /// Log progress every this many expansions; zero disables it.
    pub log_interval: u64,
}

impl Default for WeightedAstarConfig {
    fn default() -> Self {
        Self {
            heuristic: HeuristicKind::NearestVehicle,
            initial_weight: 400,
            log_interval: 10_000,
        }
    }
}

/// Repeated A* searches with a shrinking heuristic weight.
///
/// Each round runs a fresh search with `f = g + weight * h` that stops at
/// its first plan. The weight is then halved, rounding up, and the next
/// round only keeps states cheaper than the best plan so far. The final
/// round runs with weight one to completion. Cancellation between or during
/// rounds returns the best plan found.
#[derive(Debug, Clone)]
pub struct WeightedAstarPlanner {
    name: String,
    config: WeightedAstarConfig,
    token: CancellationToken,
}

impl WeightedAstarPlanner {
    /// Planner with default configuration and the given heuristic.
    #[must_use]
    pub fn new(heuristic: HeuristicKind) -> Self {
        Self::with_config(WeightedAstarConfig {
            heuristic,
            ..WeightedAstarConfig::default()
        })
    }

    /// Planner with explicit configuration.
    #[must_use]
    pub fn with_config(config: WeightedAstarConfig) -> Self {
        Self {
            name: format!("weighted-astar-{}", config.heuristic),
            config,
            token: CancellationToken::new(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &WeightedAstarConfig {
        &self.config
    }
}

impl Default for WeightedAstarPlanner {
    fn default() -> Self {
        Self::with_config(WeightedAstarConfig::default())
    }
}

/// Weight of the round after one run with `weight`.
pub(crate) const fn next_weight(weight: u64) -> u64 {
    let halved = weight.div_ceil(2);
    if halved == 0 { 1 } else { halved }
}

impl WeightedAstarPlanner {
    /// Search rounds from `initial_weight` down to one, sharing `tracker`.
    fn anneal(
        &self,
        context: &SearchContext<'_>,
        initial_weight: u64,
        tracker: &mut BestPlanTracker,
    ) -> Result<(), PlanError> {
        let mut weight = initial_weight;
        loop {
            log::debug!("weighted search round with weight {weight}");
            let params = SearchParams {
                weight,
                stop_at_first: weight > 1,
            };
            let outcome = search(context, params, tracker)?;
            if outcome == SearchOutcome::Cancelled || self.token.is_cancelled() {
                log::info!(
                    "{} cancelled at weight {weight}, returning best plan with cost {:?}",
                    self.name(),
                    tracker.best().map(Plan::total_cost)
                );
                return Ok(());
            }
            if weight == 1 {
                return Ok(());
            }
            weight = next_weight(weight);
        }
    }
}

impl Planner for WeightedAstarPlanner {
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
        log::info!("{} planning {}", self.name(), problem.name());
        let heuristic = self.config.heuristic.instantiate(problem, domain);
        let context = SearchContext {
            domain,
            problem,
            paths,
            heuristic: heuristic.as_ref(),
            token: &self.token,
            log_interval: self.config.log_interval,
        };
        let mut tracker = BestPlanTracker::new();
        self.anneal(&context, self.config.initial_weight.max(1), &mut tracker)?;
        Ok(tracker.into_best())
    }
}
