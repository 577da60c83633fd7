//! Breadth-first reference planner.

use std::collections::{HashMap, VecDeque};

use transport_core::{
    ActionGenerator, BestPlanTracker, CancellationToken, Domain, Plan, PlanError, PlanState,
    Planner, Problem, ShortestPathIndex,
};

use crate::key::SearchKey;

/// Configuration for [`BreadthFirstPlanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BreadthFirstConfig {
    /// Keep searching after the first plan until no cheaper one can exist.
    pub exhaustive: bool,
}

/// Level-by-level search over the action generator.
///
/// In first-goal mode it returns the plan with the fewest actions. In
/// exhaustive mode it revisits a state whenever it is reached more cheaply
/// and stops only when every open state costs at least as much as the best
/// plan, which makes it the cost-optimal reference on small problems.
#[derive(Debug, Clone, Default)]
pub struct BreadthFirstPlanner {
    config: BreadthFirstConfig,
    token: CancellationToken,
}

impl BreadthFirstPlanner {
    /// Planner returning the first plan found.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Planner searching until the cheapest plan is proven.
    #[must_use]
    pub fn exhaustive() -> Self {
        Self::with_config(BreadthFirstConfig { exhaustive: true })
    }

    /// Planner with explicit configuration.
    #[must_use]
    pub fn with_config(config: BreadthFirstConfig) -> Self {
        Self {
            config,
            token: CancellationToken::new(),
        }
    }
}

impl Planner for BreadthFirstPlanner {
    fn name(&self) -> &str {
        if self.config.exhaustive {
            "bfs-exhaustive"
        } else {
            "bfs"
        }
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
        let generator = ActionGenerator::new(domain, paths, problem);
        let mut tracker = BestPlanTracker::new();
        let start = PlanState::new(problem.clone());
        if start.is_goal() {
            tracker.offer_state(&start);
            return Ok(tracker.into_best());
        }

        let mut best_g: HashMap<SearchKey, u64> = HashMap::new();
        best_g.insert(SearchKey::of(&start), 0);
        let mut queue = VecDeque::from([start]);
        while let Some(state) = queue.pop_front() {
            if self.token.is_cancelled() {
                log::info!("{} cancelled with {} states queued", self.name(), queue.len());
                break;
            }
            let g = state.total_cost();
            if g >= tracker.bound()
                || best_g
                    .get(&SearchKey::of(&state))
                    .is_some_and(|&known| known < g)
            {
                continue;
            }
            for action in generator.generate(&state) {
                let next = state
                    .apply(&action)
                    .map_err(|source| PlanError::InvalidTransition { action, source })?;
                let cost = next.total_cost();
                if cost >= tracker.bound() {
                    continue;
                }
                if next.is_goal() {
                    tracker.offer_state(&next);
                    if !self.config.exhaustive {
                        return Ok(tracker.into_best());
                    }
                    continue;
                }
                let key = SearchKey::of(&next);
                if best_g.get(&key).is_some_and(|&known| known <= cost) {
                    continue;
                }
                best_g.insert(key, cost);
                queue.push_back(next);
            }
        }
        Ok(tracker.into_best())
    }
}
