//! Successor generation with capacity, cycle, and detour pruning.

use crate::{
    Action, Domain, LocationId, Package, PackageId, PlanState, Problem, ShortestPathIndex, Vehicle,
    VehicleId,
};

/// Enumerates the actions worth trying from a [`PlanState`].
///
/// Rules, in order:
///
/// 1. A carried package whose vehicle stands on its target is dropped and
///    nothing else is generated.
/// 2. Right after a drive only the driving vehicle may act.
/// 3. Pick-ups load unfinished packages that fit, skipping packages the
///    vehicle dropped since its last drive or could simply have kept.
/// 4. Drops are not generated right after a pick-up, nor at a location
///    where the package was picked up earlier in the plan.
/// 5. Refuels fill a partly empty tank at a petrol station.
/// 6. Drives follow outgoing roads, never revisiting a location of the
///    vehicle's current drive run and never extending a run that a shorter
///    path already beats.
#[derive(Debug, Clone, Copy)]
pub struct ActionGenerator<'a> {
    domain: &'a Domain,
    paths: &'a ShortestPathIndex,
    prune_detours: bool,
}

#[derive(Debug)]
struct DriveRun {
    visited: Vec<LocationId>,
    start: LocationId,
    driven: u64,
}

impl<'a> ActionGenerator<'a> {
    /// Create a generator for `problem`.
    ///
    /// Detour pruning compares road lengths, so it is switched off when fuel
    /// is tracked and some road burns a different amount than its length.
    #[must_use]
    pub fn new(domain: &'a Domain, paths: &'a ShortestPathIndex, problem: &Problem) -> Self {
        let prune_detours = !domain.fuel_enabled() || problem.graph().fuel_costs_match_lengths();
        Self {
            domain,
            paths,
            prune_detours,
        }
    }

    /// Domain the actions are built with.
    #[must_use]
    pub const fn domain(&self) -> &'a Domain {
        self.domain
    }

    /// Legal next actions, grouped as pick-ups, drops, refuels, then drives.
    #[must_use]
    pub fn generate(&self, state: &PlanState) -> Vec<Action> {
        let problem = state.problem();
        if let Some(drop) = self.deliverable_drop(problem) {
            return vec![drop];
        }
        let last = state.last_action();
        let active = last.filter(|action| action.is_drive()).map(Action::vehicle);
        let after_pick_up = last.is_some_and(Action::is_pick_up);
        let actors: Vec<(&Vehicle, LocationId)> = problem
            .vehicles()
            .iter()
            .filter(|vehicle| active.is_none_or(|id| id == vehicle.id()))
            .filter_map(|vehicle| vehicle.location().map(|location| (vehicle, location)))
            .collect();

        let mut actions = Vec::new();
        for (vehicle, location) in &actors {
            self.pick_ups(state, vehicle, *location, &mut actions);
        }
        if !after_pick_up {
            for (vehicle, location) in &actors {
                self.drops(state, vehicle, *location, &mut actions);
            }
        }
        for (vehicle, location) in &actors {
            self.refuel(problem, vehicle, *location, &mut actions);
        }
        for (vehicle, location) in &actors {
            self.drives(state, vehicle, *location, &mut actions);
        }
        actions
    }

    fn deliverable_drop(&self, problem: &Problem) -> Option<Action> {
        problem.vehicles().iter().find_map(|vehicle| {
            let location = vehicle.location()?;
            vehicle
                .packages()
                .iter()
                .filter_map(|package| problem.package(*package))
                .find(|package| package.target() == location)
                .map(|package| self.domain.build_drop(vehicle.id(), location, package.id()))
        })
    }

    fn pick_ups(
        &self,
        state: &PlanState,
        vehicle: &Vehicle,
        location: LocationId,
        out: &mut Vec<Action>,
    ) {
        let problem = state.problem();
        let candidates: Vec<&Package> = problem
            .packages_at(location)
            .filter(|package| !package.is_delivered())
            .filter(|package| package.size() <= vehicle.free_capacity())
            .collect();
        if candidates.is_empty() {
            return;
        }
        let recently_dropped = dropped_since_last_drive(state, vehicle.id());
        for package in candidates {
            if recently_dropped.contains(&package.id())
                || is_needless_repickup(state, vehicle, package)
            {
                continue;
            }
            out.push(
                self.domain
                    .build_pick_up(vehicle.id(), location, package.id()),
            );
        }
    }

    fn drops(
        &self,
        state: &PlanState,
        vehicle: &Vehicle,
        location: LocationId,
        out: &mut Vec<Action>,
    ) {
        for package in vehicle.packages() {
            if was_picked_up_at(state, *package, location) {
                continue;
            }
            out.push(self.domain.build_drop(vehicle.id(), location, *package));
        }
    }

    fn refuel(
        &self,
        problem: &Problem,
        vehicle: &Vehicle,
        location: LocationId,
        out: &mut Vec<Action>,
    ) {
        if !self.domain.fuel_enabled() {
            return;
        }
        let at_station = problem
            .graph()
            .location(location)
            .is_some_and(crate::Location::has_petrol_station);
        let needs_fuel = vehicle.fuel().is_some_and(|tank| !tank.is_full());
        if at_station && needs_fuel {
            out.push(self.domain.build_refuel(vehicle.id(), location));
        }
    }

    fn drives(
        &self,
        state: &PlanState,
        vehicle: &Vehicle,
        location: LocationId,
        out: &mut Vec<Action>,
    ) {
        let run = drive_run(state, vehicle.id(), location);
        for road in state.problem().graph().outgoing(location) {
            if run.visited.contains(&road.to()) {
                continue;
            }
            if self.domain.fuel_enabled()
                && vehicle
                    .fuel()
                    .is_some_and(|tank| tank.current() < road.fuel_cost())
            {
                continue;
            }
            if self.prune_detours {
                let through = run.driven.saturating_add(u64::from(road.length()));
                let beaten = self
                    .paths
                    .distance(run.start, road.to())
                    .is_some_and(|shortest| shortest < through);
                if beaten {
                    continue;
                }
            }
            out.push(self.domain.build_drive(vehicle.id(), road));
        }
    }
}

/// Locations of the vehicle's trailing uninterrupted drive run, ignoring
/// other vehicles' actions.
fn drive_run(state: &PlanState, vehicle: VehicleId, location: LocationId) -> DriveRun {
    let mut run = DriveRun {
        visited: vec![location],
        start: location,
        driven: 0,
    };
    for action in state
        .actions_rev()
        .filter(|action| action.vehicle() == vehicle)
    {
        let crate::ActionKind::Drive { from, .. } = *action.kind() else {
            break;
        };
        run.visited.push(from);
        run.start = from;
        run.driven = run.driven.saturating_add(u64::from(action.cost()));
    }
    run
}

fn dropped_since_last_drive(state: &PlanState, vehicle: VehicleId) -> Vec<PackageId> {
    state
        .actions_rev()
        .filter(|action| action.vehicle() == vehicle)
        .take_while(|action| !action.is_drive())
        .filter(|action| action.is_drop())
        .filter_map(Action::package)
        .collect()
}

fn was_picked_up_at(state: &PlanState, package: PackageId, location: LocationId) -> bool {
    state.actions_rev().any(|action| {
        action.is_pick_up()
            && action.package() == Some(package)
            && action.location_after() == location
    })
}

/// True when `vehicle` dropped `package` earlier, nobody touched it since,
/// and the vehicle always had room to keep carrying it.
fn is_needless_repickup(state: &PlanState, vehicle: &Vehicle, package: &Package) -> bool {
    let problem = state.problem();
    let mut free = vehicle.free_capacity();
    let mut min_free = free;
    for action in state.actions_rev() {
        if action.package() == Some(package.id()) {
            return action.vehicle() == vehicle.id()
                && action.is_drop()
                && min_free >= package.size();
        }
        if action.vehicle() != vehicle.id() {
            continue;
        }
        let Some(size) = action
            .package()
            .and_then(|other| problem.package(other))
            .map(Package::size)
        else {
            continue;
        };
        free = if action.is_pick_up() {
            free.saturating_add(size)
        } else {
            free.saturating_sub(size)
        };
        min_free = min_free.min(free);
    }
    false
}
