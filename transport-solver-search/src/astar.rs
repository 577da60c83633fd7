//! Forward A* over plan states.

use transport_core::{
    BestPlanTracker, CancellationToken, Domain, Plan, PlanError, Planner, Problem,
    ShortestPathIndex,
};

use crate::heuristic::HeuristicKind;
use crate::search::{SearchContext, SearchOutcome, SearchParams, search};

/// Configuration for [`ForwardAstarPlanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AstarConfig {
    /// Goal-distance estimate guiding the search.
    pub heuristic: HeuristicKind,
    /// Return as soon as the first plan is found.
    pub stop_at_first: bool,
    /// Log progress every this many expansions; zero disables it.
    pub log_interval: u64,
}

impl Default for AstarConfig {
    fn default() -> Self {
        Self {
            heuristic: HeuristicKind::default(),
            stop_at_first: false,
            log_interval: 10_000,
        }
    }
}

/// Classic A* with a pluggable [`HeuristicKind`].
///
/// With [`HeuristicKind::AdmissibleLeg`] the returned plan is the cheapest
/// one reachable through the action generator. Other heuristics usually
/// find plans faster but may return costlier ones.
///
/// # Examples
///
/// ```
/// use transport_core::{Domain, Planner, test_support::single_road_problem};
/// use transport_solver_search::ForwardAstarPlanner;
///
/// let fixture = single_road_problem();
/// let planner = ForwardAstarPlanner::default();
/// let plan = planner
///     .plan(&Domain::sequential(), &fixture.problem)?
///     .expect("the package can be delivered");
/// assert_eq!(plan.total_cost(), 7);
/// # Ok::<(), transport_core::PlanError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ForwardAstarPlanner {
    name: String,
    config: AstarConfig,
    token: CancellationToken,
}

impl ForwardAstarPlanner {
    /// Planner with default configuration and the given heuristic.
    #[must_use]
    pub fn new(heuristic: HeuristicKind) -> Self {
        Self::with_config(AstarConfig {
            heuristic,
            ..AstarConfig::default()
        })
    }

    /// Planner with explicit configuration.
    #[must_use]
    pub fn with_config(config: AstarConfig) -> Self {
        Self {
            name: format!("astar-{}", config.heuristic),
            config,
            token: CancellationToken::new(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &AstarConfig {
        &self.config
    }
}

impl Default for ForwardAstarPlanner {
    fn default() -> Self {
        Self::with_config(AstarConfig::default())
    }
}

impl Planner for ForwardAstarPlanner {
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
        let outcome = search(
            &context,
            SearchParams {
                weight: 1,
                stop_at_first: self.config.stop_at_first,
            },
            &mut tracker,
        )?;
        if outcome == SearchOutcome::Cancelled {
            log::info!(
                "{} cancelled, returning best plan with cost {:?}",
                self.name(),
                tracker.best().map(Plan::total_cost)
            );
        }
        Ok(tracker.into_best())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use transport_core::test_support::{
        SingleRoad, TriangleCycle, grid_problem, single_road_problem, triangle_cycle_problem,
    };
    use transport_core::{ActionKind, PlanState};

    #[fixture]
    fn single_road() -> SingleRoad {
        single_road_problem()
    }

    #[fixture]
    fn triangle() -> TriangleCycle {
        triangle_cycle_problem()
    }

    #[rstest]
    fn delivers_along_the_single_road(single_road: SingleRoad) {
        let domain = Domain::sequential();
        let plan = ForwardAstarPlanner::default()
            .plan(&domain, &single_road.problem)
            .expect("no defect")
            .expect("plan");
        let road = single_road.problem.graph().road(single_road.road).expect("road");
        assert_eq!(
            plan.actions(),
            [
                domain.build_pick_up(single_road.vehicle, single_road.a, single_road.package),
                domain.build_drive(single_road.vehicle, road),
                domain.build_drop(single_road.vehicle, single_road.b, single_road.package),
            ]
        );
        assert_eq!(plan.total_cost(), 7);
    }

    #[rstest]
    #[case(HeuristicKind::PackageDistance)]
    #[case(HeuristicKind::SpanningTree)]
    #[case(HeuristicKind::NearestObject)]
    #[case(HeuristicKind::AdmissibleLeg)]
    #[case(HeuristicKind::NearestVehicle)]
    fn never_drives_the_full_triangle(triangle: TriangleCycle, #[case] heuristic: HeuristicKind) {
        let plan = ForwardAstarPlanner::new(heuristic)
            .plan(&Domain::sequential(), &triangle.problem)
            .expect("no defect")
            .expect("plan");
        let drives = plan
            .actions()
            .iter()
            .filter(|action| matches!(action.kind(), ActionKind::Drive { .. }))
            .count();
        assert!(drives < 3, "{heuristic} drove the full cycle: {plan:?}");
        let end = PlanState::replay(triangle.problem.clone(), plan.actions()).expect("replay");
        assert!(end.is_goal());
    }

    #[rstest]
    fn cancelled_before_start_returns_nothing(single_road: SingleRoad) {
        let planner = ForwardAstarPlanner::default();
        planner.cancel();
        let plan = planner
            .plan(&Domain::sequential(), &single_road.problem)
            .expect("no defect");
        assert!(plan.is_none());
    }

    #[rstest]
    fn goal_problem_yields_an_empty_plan() {
        let problem = grid_problem(2, 2, 1, 0);
        let plan = ForwardAstarPlanner::default()
            .plan(&Domain::sequential(), &problem)
            .expect("no defect")
            .expect("plan");
        assert!(plan.is_empty());
    }

    #[rstest]
    fn name_mentions_the_heuristic() {
        let planner = ForwardAstarPlanner::new(HeuristicKind::SpanningTree);
        assert_eq!(planner.name(), "astar-spanning-tree");
        assert_eq!(
            ForwardAstarPlanner::default().name(),
            "astar-admissible-leg"
        );
    }

    #[rstest]
    fn grid_plans_replay_to_the_goal() {
        let problem = grid_problem(3, 3, 2, 3);
        let plan = ForwardAstarPlanner::new(HeuristicKind::PackageDistance)
            .plan(&Domain::sequential(), &problem)
            .expect("no defect")
            .expect("plan");
        let end = PlanState::replay(problem, plan.actions()).expect("replay");
        assert!(end.is_goal());
        assert_eq!(end.total_cost(), plan.total_cost());
    }
}
