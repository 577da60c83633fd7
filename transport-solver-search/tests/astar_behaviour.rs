//! Behavioural tests for the A* planners using rstest-bdd.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use transport_core::test_support::{single_road_problem, triangle_cycle_problem};
use transport_core::{Domain, Plan, PlanError, PlanState, Planner, Problem};
use transport_solver_search::{ForwardAstarPlanner, HeuristicKind, WeightedAstarPlanner};

#[derive(Default)]
struct PlannerWorld {
    problem: RefCell<Option<Problem>>,
    planner: RefCell<Option<Box<dyn Planner>>>,
    result: RefCell<Option<Result<Option<Plan>, PlanError>>>,
}

#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
impl PlannerWorld {
    fn plan(&self) -> Plan {
        self.result
            .borrow()
            .clone()
            .expect("planner should have run")
            .expect("planning should not fail")
            .expect("a plan should be found")
    }
}

#[fixture]
fn world() -> PlannerWorld {
    PlannerWorld::default()
}

fn heuristic(name: &str) -> HeuristicKind {
    name.trim_matches('"')
        .parse()
        .unwrap_or_else(|err| panic!("{err}"))
}

#[given("the single road problem")]
fn given_single_road(world: &PlannerWorld) {
    world.problem.replace(Some(single_road_problem().problem));
}

#[given("the triangle cycle problem")]
fn given_triangle(world: &PlannerWorld) {
    world.problem.replace(Some(triangle_cycle_problem().problem));
}

#[given("an A* planner using the {name} heuristic")]
fn given_astar(world: &PlannerWorld, name: String) {
    world
        .planner
        .replace(Some(Box::new(ForwardAstarPlanner::new(heuristic(&name)))));
}

#[given("a weighted A* planner using the {name} heuristic")]
fn given_weighted(world: &PlannerWorld, name: String) {
    world
        .planner
        .replace(Some(Box::new(WeightedAstarPlanner::new(heuristic(&name)))));
}

#[given("the planner has been cancelled")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn given_cancelled(world: &PlannerWorld) {
    world
        .planner
        .borrow()
        .as_ref()
        .expect("planner should be configured")
        .cancel();
}

#[when("the planner plans")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn when_plans(world: &PlannerWorld) {
    let problem = world.problem.borrow();
    let planner = world.planner.borrow();
    let result = planner
        .as_ref()
        .expect("planner should be configured")
        .plan(
            &Domain::sequential(),
            problem.as_ref().expect("problem should be configured"),
        );
    world.result.replace(Some(result));
}

#[then("the plan picks up, drives, and drops")]
fn then_pick_drive_drop(world: &PlannerWorld) {
    let plan = world.plan();
    let kinds: Vec<(bool, bool, bool)> = plan
        .actions()
        .iter()
        .map(|action| (action.is_pick_up(), action.is_drive(), action.is_drop()))
        .collect();
    assert_eq!(
        kinds,
        vec![(true, false, false), (false, true, false), (false, false, true)]
    );
}

#[then("the plan costs {cost:u64}")]
fn then_costs(world: &PlannerWorld, cost: u64) {
    assert_eq!(world.plan().total_cost(), cost);
}

#[then("the plan drives at most {limit:usize} roads")]
fn then_drives_at_most(world: &PlannerWorld, limit: usize) {
    let drives = world
        .plan()
        .actions()
        .iter()
        .filter(|action| action.is_drive())
        .count();
    assert!(drives <= limit, "plan drives {drives} roads");
}

#[then("the plan reaches the goal")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_reaches_goal(world: &PlannerWorld) {
    let plan = world.plan();
    let problem = world.problem.borrow().clone().expect("problem");
    let end = PlanState::replay(problem, plan.actions()).expect("plan replays");
    assert!(end.is_goal());
}

#[then("no plan is returned")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_no_plan(world: &PlannerWorld) {
    let result = world.result.borrow().clone().expect("planner should have run");
    assert_eq!(result, Ok(None));
}

#[scenario(path = "tests/features/astar.feature", index = 0)]
fn single_road_delivery(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/astar.feature", index = 1)]
fn triangle_without_cycle(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/astar.feature", index = 2)]
fn cancelled_before_planning(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/astar.feature", index = 3)]
fn weighted_annealing(world: PlannerWorld) {
    let _ = world;
}
