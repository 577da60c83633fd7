//! Property-based tests for the randomized planners.
//!
//! # Invariants tested
//!
//! - **Determinism:** the same seed and problem always give the same plan.
//! - **Validity:** every plan replays to a goal state with the reported cost.
//! - **Anytime monotonicity:** a longer run never returns a costlier plan
//!   than a shorter run with the same seed.


use proptest::prelude::*;
use transport_core::{Domain, PlanState, Planner};
use transport_solver_randomized::{
    BacktrackPlanner, RandomizedConfig, RestartPlanner, RestartStrategy,
};

use proptest_support::{build, small_problem};

fn planners(config: RandomizedConfig) -> Vec<Box<dyn Planner>> {
    let mut planners: Vec<Box<dyn Planner>> = RestartStrategy::ALL
        .into_iter()
        .map(|strategy| Box::new(RestartPlanner::with_config(strategy, config)) as Box<dyn Planner>)
        .collect();
    planners.push(Box::new(BacktrackPlanner::with_config(config)));
    planners
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn same_seed_same_plan(seed in small_problem(), rng_seed in any::<u64>()) {
        let problem = build(&seed);
        let domain = Domain::sequential();
        let config = RandomizedConfig::default().with_seed(rng_seed).with_max_trials(20);
        for (first, second) in planners(config).into_iter().zip(planners(config)) {
            let left = first.plan(&domain, &problem).expect("no defect");
            let right = second.plan(&domain, &problem).expect("no defect");
            prop_assert_eq!(left, right, "{} is not deterministic", first.name());
        }
    }

    #[test]
    fn plans_replay_to_the_goal(seed in small_problem()) {
        let problem = build(&seed);
        let domain = Domain::sequential();
        for planner in planners(RandomizedConfig::default().with_max_trials(20)) {
            let Some(plan) = planner.plan(&domain, &problem).expect("no defect") else {
                continue;
            };
            let end = PlanState::replay(problem.clone(), plan.actions())
                .expect("plan replays");
            prop_assert!(end.is_goal(), "{} plan misses the goal", planner.name());
            prop_assert_eq!(end.total_cost(), plan.total_cost());
        }
    }

    #[test]
    fn longer_runs_never_get_worse(seed in small_problem()) {
        let problem = build(&seed);
        let domain = Domain::sequential();
        let short = planners(RandomizedConfig::default().with_max_trials(5));
        let long = planners(RandomizedConfig::default().with_max_trials(40));
        for (quick, thorough) in short.into_iter().zip(long) {
            let quick_plan = quick.plan(&domain, &problem).expect("no defect");
            let thorough_plan = thorough.plan(&domain, &problem).expect("no defect");
            if let (Some(early), Some(late)) = (quick_plan, thorough_plan) {
                prop_assert!(
                    late.total_cost() <= early.total_cost(),
                    "{} got worse with more trials",
                    quick.name()
                );
            }
        }
    }
}
