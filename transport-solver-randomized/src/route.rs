//! Turning road sequences into drive actions.

use transport_core::{
    Action, Domain, Fuel, Location, LocationId, PackageId, PlanError, PlanState, Problem, Road,
    RoadGraph, RoadId, ShortestPathIndex, UnreachableError, Vehicle, VehicleId,
};

/// Records the actions of one vehicle, topping up its tank at petrol
/// stations when the next road would otherwise run it dry.
pub(crate) struct ActionWriter<'a> {
    domain: &'a Domain,
    graph: &'a RoadGraph,
    vehicle: VehicleId,
    fuel: Option<Fuel>,
    actions: Vec<Action>,
}

impl<'a> ActionWriter<'a> {
    pub(crate) fn new(domain: &'a Domain, graph: &'a RoadGraph, vehicle: &Vehicle) -> Self {
        Self {
            domain,
            graph,
            vehicle: vehicle.id(),
            fuel: vehicle.fuel(),
            actions: Vec::new(),
        }
    }

    pub(crate) fn drive(&mut self, road: &Road) {
        if self.domain.fuel_enabled() {
            self.refuel_before(road);
            self.fuel = self.fuel.and_then(|tank| tank.burned(road.fuel_cost()));
        }
        self.actions.push(self.domain.build_drive(self.vehicle, road));
    }

    fn refuel_before(&mut self, road: &Road) {
        let Some(tank) = self.fuel else {
            return;
        };
        let station = self
            .graph
            .location(road.from())
            .is_some_and(Location::has_petrol_station);
        if station && !tank.is_full() && tank.current() < road.fuel_cost() {
            self.actions
                .push(self.domain.build_refuel(self.vehicle, road.from()));
            self.fuel = Some(tank.refilled());
        }
    }

    pub(crate) fn pick_up(&mut self, location: LocationId, package: PackageId) {
        self.actions
            .push(self.domain.build_pick_up(self.vehicle, location, package));
    }

    pub(crate) fn drop(&mut self, location: LocationId, package: PackageId) {
        self.actions
            .push(self.domain.build_drop(self.vehicle, location, package));
    }

    pub(crate) fn finish(self) -> Vec<Action> {
        self.actions
    }
}

/// Locations visited along a chain of shortest paths, with the roads
/// between them. `stops` is always one longer than `roads`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Route {
    pub(crate) stops: Vec<LocationId>,
    pub(crate) roads: Vec<RoadId>,
}

impl Route {
    /// Concatenate the shortest paths `start -> waypoints[0] -> ...`.
    pub(crate) fn through(
        paths: &ShortestPathIndex,
        graph: &RoadGraph,
        start: LocationId,
        waypoints: &[LocationId],
    ) -> Result<Self, PlanError> {
        let mut route = Self {
            stops: vec![start],
            roads: Vec::new(),
        };
        let mut from = start;
        for &to in waypoints {
            let leg = paths.require_path(from, to)?;
            for road_id in leg.roads {
                let road = graph
                    .road(road_id)
                    .ok_or(UnreachableError { from, to })?;
                route.roads.push(road_id);
                route.stops.push(road.to());
            }
            from = to;
        }
        Ok(route)
    }

    /// Last stop of the route.
    pub(crate) fn end(&self) -> Option<LocationId> {
        self.stops.last().copied()
    }
}

/// Drive every vehicle that still has a target to it along shortest paths.
///
/// Used once no package is left to serve.
///
/// # Errors
///
/// [`PlanError::Unreachable`] when a target cannot be reached and
/// [`PlanError::NoUnfinishedPackages`] when no vehicle can be moved towards
/// its target although the goal does not hold.
pub(crate) fn drive_to_targets(
    domain: &Domain,
    problem: &Problem,
    paths: &ShortestPathIndex,
) -> Result<Vec<Action>, PlanError> {
    let graph = problem.graph();
    let mut actions = Vec::new();
    for vehicle in problem.vehicles().iter().filter(|vehicle| !vehicle.at_target()) {
        let (Some(here), Some(target)) = (vehicle.location(), vehicle.target()) else {
            continue;
        };
        let route = Route::through(paths, graph, here, &[target])?;
        let mut writer = ActionWriter::new(domain, graph, vehicle);
        for road in route.roads.iter().filter_map(|road_id| graph.road(*road_id)) {
            writer.drive(road);
        }
        actions.extend(writer.finish());
    }
    if actions.is_empty() {
        return Err(PlanError::NoUnfinishedPackages);
    }
    Ok(actions)
}

/// Apply `actions` one after another.
///
/// On rejection the failing action is logged and `None` returned; the
/// trial that produced them is abandoned.
pub(crate) fn apply_all(state: &PlanState, actions: &[Action]) -> Option<PlanState> {
    actions
        .iter()
        .try_fold(state.clone(), |current, action| {
            current.apply(action).map_err(|err| (*action, err))
        })
        .inspect_err(|(action, err)| log::debug!("abandoning trial, {action:?} rejected: {err}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use transport_core::test_support::{fuel_line_problem, single_road_problem};
    use transport_core::{ActionKind, PetrolStation, ProblemBuilder, VehicleSpec};

    #[rstest]
    fn route_concatenates_legs() {
        let fixture = fuel_line_problem(2, 10);
        let [l0, l1, l2] = fixture.locations;
        let paths = ShortestPathIndex::new(fixture.problem.graph());
        let route = Route::through(&paths, fixture.problem.graph(), l1, &[l0, l2])
            .expect("connected line");
        assert_eq!(route.stops, vec![l1, l0, l1, l2]);
        assert_eq!(route.roads.len(), 3);
        assert_eq!(route.end(), Some(l2));
    }

    #[rstest]
    fn writer_refuels_at_stations_when_the_tank_runs_low() {
        let fixture = fuel_line_problem(2, 3);
        let [l0, l1, l2] = fixture.locations;
        let graph = fixture.problem.graph();
        let vehicle = fixture.problem.vehicle(fixture.vehicle).expect("vehicle");
        let domain = Domain::with_fuel();
        let mut writer = ActionWriter::new(&domain, graph, vehicle);
        for (from, to) in [(l0, l1), (l1, l2)] {
            writer.drive(graph.road_between(from, to).expect("road"));
        }
        let actions = writer.finish();
        assert_eq!(actions.len(), 3);
        assert!(matches!(
            actions.get(1).map(Action::kind),
            Some(ActionKind::Refuel { location }) if *location == l1
        ));
        let end = PlanState::replay(fixture.problem.clone(), &actions).expect("fuel suffices");
        assert_eq!(end.total_cost(), 14);
    }

    #[rstest]
    fn vehicles_are_driven_home() {
        let fixture = single_road_problem();
        let (a, b) = (fixture.a, fixture.b);
        let mut builder = ProblemBuilder::with_graph("home", fixture.problem.graph().clone());
        builder
            .add_vehicle(VehicleSpec::new("truck", a, 1).with_target(b))
            .expect("truck");
        let problem = builder.build().expect("problem");
        let paths = ShortestPathIndex::new(problem.graph());

        let actions = drive_to_targets(&Domain::sequential(), &problem, &paths).expect("route");
        let end = PlanState::replay(problem, &actions).expect("replay");
        assert!(end.is_goal());
        assert_eq!(end.total_cost(), 5);
    }

    #[rstest]
    fn nothing_to_do_without_a_goal_is_a_defect() {
        let mut builder = ProblemBuilder::new("stuck");
        let a = builder
            .add_location("A", geo::Coord { x: 0, y: 0 }, PetrolStation::NotApplicable)
            .expect("A");
        builder
            .add_vehicle(VehicleSpec::unplaced("ghost", 1).with_target(a))
            .expect("ghost");
        let problem = builder.build().expect("problem");
        let paths = ShortestPathIndex::new(problem.graph());
        assert_eq!(
            drive_to_targets(&Domain::sequential(), &problem, &paths),
            Err(PlanError::NoUnfinishedPackages)
        );
    }
}
