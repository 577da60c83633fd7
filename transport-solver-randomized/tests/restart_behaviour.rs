//! Behavioural tests for the randomized planners using rstest-bdd.

use std::cell::RefCell;
use std::thread;
use std::time::Duration;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use transport_core::test_support::{detour_problem, grid_problem, single_road_problem};
use transport_core::{Domain, Plan, PlanError, PlanState, Planner, Problem};
use transport_solver_randomized::{
    BacktrackPlanner, RandomizedConfig, RestartPlanner, RestartStrategy,
};

#[derive(Default)]
struct PlannerWorld {
    problem: RefCell<Option<Problem>>,
    planner: RefCell<Option<Box<dyn Planner>>>,
    result: RefCell<Option<Result<Option<Plan>, PlanError>>>,
    repeat: RefCell<Option<Result<Option<Plan>, PlanError>>>,
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

    fn problem(&self) -> Problem {
        self.problem
            .borrow()
            .clone()
            .expect("problem should be configured")
    }

    fn run(&self) -> Result<Option<Plan>, PlanError> {
        let problem = self.problem();
        let planner = self.planner.borrow();
        planner
            .as_ref()
            .expect("planner should be configured")
            .plan(&Domain::sequential(), &problem)
    }
}

#[fixture]
fn world() -> PlannerWorld {
    PlannerWorld::default()
}

fn strategy(name: &str) -> RestartStrategy {
    name.trim_matches('"')
        .parse()
        .unwrap_or_else(|err| panic!("{err}"))
}

#[given("the single road problem")]
fn given_single_road(world: &PlannerWorld) {
    world.problem.replace(Some(single_road_problem().problem));
}

#[given("the detour problem")]
fn given_detour(world: &PlannerWorld) {
    world.problem.replace(Some(detour_problem().problem));
}

#[given(
    "a {width:usize} by {height:usize} grid with {vehicles:usize} trucks and {packages:usize} packages"
)]
fn given_grid(world: &PlannerWorld, width: usize, height: usize, vehicles: usize, packages: usize) {
    world
        .problem
        .replace(Some(grid_problem(width, height, vehicles, packages)));
}

#[given("a restart planner using the {name} strategy limited to {trials:u64} trials")]
fn given_bounded_restart(world: &PlannerWorld, name: String, trials: u64) {
    let config = RandomizedConfig::default().with_max_trials(trials);
    world.planner.replace(Some(Box::new(RestartPlanner::with_config(
        strategy(&name),
        config,
    ))));
}

#[given("an unbounded restart planner using the {name} strategy")]
fn given_unbounded_restart(world: &PlannerWorld, name: String) {
    world
        .planner
        .replace(Some(Box::new(RestartPlanner::new(strategy(&name)))));
}

#[given("a backtracking planner")]
fn given_backtracking(world: &PlannerWorld) {
    world.planner.replace(Some(Box::new(BacktrackPlanner::new())));
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
fn when_plans(world: &PlannerWorld) {
    let result = world.run();
    world.result.replace(Some(result));
}

#[when("the planner runs twice")]
fn when_runs_twice(world: &PlannerWorld) {
    let first = world.run();
    let second = world.run();
    world.result.replace(Some(first));
    world.repeat.replace(Some(second));
}

#[when("the planner runs for {millis:u64} milliseconds and is cancelled")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn when_runs_until_cancelled(world: &PlannerWorld, millis: u64) {
    let problem = world.problem();
    let guard = world.planner.borrow();
    let planner: &dyn Planner = guard
        .as_ref()
        .expect("planner should be configured")
        .as_ref();
    let result = thread::scope(|scope| {
        let handle = scope.spawn(|| planner.plan(&Domain::sequential(), &problem));
        thread::sleep(Duration::from_millis(millis));
        planner.cancel();
        handle.join().expect("planner thread should not panic")
    });
    world.result.replace(Some(result));
}

#[then("the plan costs {cost:u64}")]
fn then_costs(world: &PlannerWorld, cost: u64) {
    assert_eq!(world.plan().total_cost(), cost);
}

#[then("both plans are identical")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_identical(world: &PlannerWorld) {
    let second = world.repeat.borrow().clone().expect("second run");
    assert_eq!(second, Ok(Some(world.plan())));
}

#[then("the plan reaches the goal")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_reaches_goal(world: &PlannerWorld) {
    let plan = world.plan();
    let end = PlanState::replay(world.problem(), plan.actions()).expect("plan replays");
    assert!(end.is_goal());
    assert_eq!(end.total_cost(), plan.total_cost());
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

#[scenario(path = "tests/features/restart.feature", index = 0)]
fn single_road_delivery(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/restart.feature", index = 1)]
fn seeded_runs_repeat(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/restart.feature", index = 2)]
fn cancelled_before_planning(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/restart.feature", index = 3)]
fn cancelled_while_running(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/restart.feature", index = 4)]
fn backtracking_detour(world: PlannerWorld) {
    let _ = world;
}
