//! Partial plans: serve one package and take along what lies on the way.
//!
//! The chosen vehicle drives the shortest path to the chosen package and on
//! to its target. Carried packages whose target is on that route are dropped
//! there. Other unfinished packages lying on the route are loaded, nearest
//! first, when their target is further along and the vehicle has room for
//! the whole stretch in between. With [`Absorption::AroundPath`] packages
//! whose target is off the route are also loaded and left at the later stop
//! closest to their target, provided that stop is strictly closer than where
//! they were picked up.

use transport_core::{
    Action, Domain, LocationId, Package, PackageId, PlanError, Problem, ShortestPathIndex, Vehicle,
    VehicleId,
};

use crate::route::{ActionWriter, Route};

/// Which extra packages a partial plan may take along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Absorption {
    /// Only packages whose target lies further along the route.
    OnPath,
    /// Also packages that end up closer to their target.
    AroundPath,
}

/// Per-stop loading schedule of one vehicle along a route.
struct Schedule {
    pick_ups: Vec<Vec<PackageId>>,
    drops: Vec<Vec<PackageId>>,
    /// Free capacity after handling stop `i`, while driving to `i + 1`.
    free: Vec<u32>,
}

impl Schedule {
    fn new(stops: usize, free_capacity: u32) -> Self {
        Self {
            pick_ups: vec![Vec::new(); stops],
            drops: vec![Vec::new(); stops],
            free: vec![free_capacity; stops],
        }
    }

    fn drop_at(&mut self, stop: usize, package: &Package) {
        if let Some(slot) = self.drops.get_mut(stop) {
            slot.push(package.id());
        }
        for free in self.free.iter_mut().skip(stop) {
            *free = free.saturating_add(package.size());
        }
    }

    /// Whether `package` fits on board from stop `from` until it is dropped
    /// at stop `to`.
    fn fits(&self, from: usize, to: usize, size: u32) -> bool {
        self.free
            .iter()
            .skip(from)
            .take(to.saturating_sub(from))
            .all(|free| *free >= size)
    }

    fn carry(&mut self, from: usize, to: usize, package: &Package) {
        if let Some(slot) = self.pick_ups.get_mut(from) {
            slot.push(package.id());
        }
        if let Some(slot) = self.drops.get_mut(to) {
            slot.push(package.id());
        }
        for free in self
            .free
            .iter_mut()
            .skip(from)
            .take(to.saturating_sub(from))
        {
            *free = free.saturating_sub(package.size());
        }
    }

    fn last_event(&self) -> Option<usize> {
        self.pick_ups
            .iter()
            .zip(&self.drops)
            .rposition(|(pick_ups, drops)| !pick_ups.is_empty() || !drops.is_empty())
    }
}

/// Everything needed to build a partial plan from one snapshot.
pub(crate) struct PartialPlanner<'a> {
    pub(crate) domain: &'a Domain,
    pub(crate) problem: &'a Problem,
    pub(crate) paths: &'a ShortestPathIndex,
    pub(crate) absorption: Absorption,
}

impl PartialPlanner<'_> {
    /// Actions that let `vehicle` deliver `package`.
    ///
    /// Returns an empty list when either id is unknown or the vehicle is
    /// unplaced.
    ///
    /// # Errors
    ///
    /// [`PlanError::Unreachable`] when the route cannot be driven.
    pub(crate) fn build(
        &self,
        vehicle: VehicleId,
        package: PackageId,
    ) -> Result<Vec<Action>, PlanError> {
        let (Some(truck), Some(chosen)) =
            (self.problem.vehicle(vehicle), self.problem.package(package))
        else {
            return Ok(Vec::new());
        };
        let Some(start) = truck.location() else {
            return Ok(Vec::new());
        };
        let waypoints: Vec<LocationId> = chosen
            .location()
            .into_iter()
            .chain(std::iter::once(chosen.target()))
            .collect();
        let route = Route::through(self.paths, self.problem.graph(), start, &waypoints)?;

        let mut schedule = Schedule::new(route.stops.len(), truck.free_capacity());
        self.unload_carried(truck, &route, &mut schedule);
        if let Some(at) = chosen.location() {
            let pick_up = route.stops.iter().position(|stop| *stop == at);
            let last = route.stops.len().saturating_sub(1);
            if let Some(from) = pick_up {
                schedule.carry(from, last, chosen);
            }
        }
        self.absorb(start, chosen.id(), &route, &mut schedule);
        Ok(self.write(truck, &route, &schedule))
    }

    fn unload_carried(&self, truck: &Vehicle, route: &Route, schedule: &mut Schedule) {
        for package in truck
            .packages()
            .iter()
            .filter_map(|id| self.problem.package(*id))
        {
            if let Some(stop) = route.stops.iter().position(|at| *at == package.target()) {
                schedule.drop_at(stop, package);
            }
        }
    }

    fn absorb(&self, start: LocationId, chosen: PackageId, route: &Route, schedule: &mut Schedule) {
        let mut candidates: Vec<(u64, &Package, usize)> = self
            .problem
            .unfinished_packages()
            .filter(|package| package.id() != chosen)
            .filter_map(|package| {
                let at = package.location()?;
                let stop = route.stops.iter().position(|here| *here == at)?;
                let distance = self.paths.distance(start, at)?;
                Some((distance, package, stop))
            })
            .collect();
        candidates.sort_by_key(|(distance, package, _)| (*distance, package.id()));

        for (_, package, from) in candidates {
            let Some(to) = self.drop_stop(route, from, package) else {
                continue;
            };
            if schedule.fits(from, to, package.size()) {
                schedule.carry(from, to, package);
            }
        }
    }

    /// Where a package loaded at stop `from` would be left.
    fn drop_stop(&self, route: &Route, from: usize, package: &Package) -> Option<usize> {
        let later = || route.stops.iter().enumerate().skip(from.saturating_add(1));
        let on_route = later()
            .rev()
            .find(|(_, stop)| **stop == package.target())
            .map(|(index, _)| index);
        if on_route.is_some() || self.absorption == Absorption::OnPath {
            return on_route;
        }
        let remaining = |stop: LocationId| {
            self.paths
                .distance(stop, package.target())
                .unwrap_or(u64::MAX)
        };
        let origin = route.stops.get(from).copied().map_or(u64::MAX, remaining);
        later()
            .map(|(index, stop)| (remaining(*stop), index))
            .min()
            .filter(|(distance, _)| *distance < origin)
            .map(|(_, index)| index)
    }

    fn write(&self, truck: &Vehicle, route: &Route, schedule: &Schedule) -> Vec<Action> {
        let graph = self.problem.graph();
        let mut writer = ActionWriter::new(self.domain, graph, truck);
        let Some(last) = schedule.last_event() else {
            return Vec::new();
        };
        let stops = route.stops.iter().zip(&schedule.drops).zip(&schedule.pick_ups);
        for (index, ((stop, drops), pick_ups)) in stops.enumerate().take(last.saturating_add(1)) {
            for package in drops {
                writer.drop(*stop, *package);
            }
            for package in pick_ups {
                writer.pick_up(*stop, *package);
            }
            if index < last
                && let Some(road) = route.roads.get(index).and_then(|id| graph.road(*id))
            {
                writer.drive(road);
            }
        }
        writer.finish()
    }
}
