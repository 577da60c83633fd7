//! Heuristics built purely from shortest-path distances.

use transport_core::{ActionCosts, LocationId, Package, Problem, ShortestPathIndex, Vehicle};

use super::{Heuristic, handling_cost};

/// Where an unfinished package currently is.
enum Whereabouts {
    Lying(LocationId),
    Carried(LocationId),
}

fn whereabouts(problem: &Problem, package: &Package) -> Option<Whereabouts> {
    package.location().map_or_else(
        || {
            problem
                .carrier_of(package.id())
                .and_then(Vehicle::location)
                .map(Whereabouts::Carried)
        },
        |location| Some(Whereabouts::Lying(location)),
    )
}

/// Shortest distance from any placed vehicle to `location`.
fn nearest_vehicle(
    problem: &Problem,
    paths: &ShortestPathIndex,
    location: LocationId,
) -> Option<u64> {
    problem
        .vehicles()
        .iter()
        .filter_map(Vehicle::location)
        .filter_map(|vehicle| paths.distance(vehicle, location))
        .min()
}

/// Sums, for each unfinished package, the distance from where it is to its
/// target.
#[derive(Debug, Clone, Copy)]
pub struct PackageDistance {
    costs: ActionCosts,
}

impl PackageDistance {
    /// Create the heuristic with the given handling costs.
    #[must_use]
    pub const fn new(costs: ActionCosts) -> Self {
        Self { costs }
    }
}

impl Heuristic for PackageDistance {
    fn estimate(&self, problem: &Problem, paths: &ShortestPathIndex) -> Option<u64> {
        let mut drive = 0_u64;
        for package in problem.unfinished_packages() {
            let from = match whereabouts(problem, package)? {
                Whereabouts::Lying(location) | Whereabouts::Carried(location) => location,
            };
            drive = drive.saturating_add(paths.distance(from, package.target())?);
        }
        Some(drive.saturating_add(handling_cost(problem, self.costs)))
    }
}

/// Like [`PackageDistance`], but a waiting package also adds the distance
/// from the closest vehicle or other waiting package.
#[derive(Debug, Clone, Copy)]
pub struct NearestObject {
    costs: ActionCosts,
}

impl NearestObject {
    /// Create the heuristic with the given handling costs.
    #[must_use]
    pub const fn new(costs: ActionCosts) -> Self {
        Self { costs }
    }
}

impl Heuristic for NearestObject {
    fn estimate(&self, problem: &Problem, paths: &ShortestPathIndex) -> Option<u64> {
        let waiting: Vec<&Package> = problem
            .unfinished_packages()
            .filter(|package| package.location().is_some())
            .collect();
        let mut drive = 0_u64;
        for package in problem.unfinished_packages() {
            match whereabouts(problem, package)? {
                Whereabouts::Carried(location) => {
                    drive = drive.saturating_add(paths.distance(location, package.target())?);
                }
                Whereabouts::Lying(location) => {
                    let to_target = paths.distance(location, package.target())?;
                    let other_packages = waiting
                        .iter()
                        .filter(|other| other.id() != package.id())
                        .filter_map(|other| other.location())
                        .filter_map(|other| paths.distance(other, location));
                    let nearest = nearest_vehicle(problem, paths, location)
                        .into_iter()
                        .chain(other_packages)
                        .min()
                        .unwrap_or(0);
                    drive = drive.saturating_add(to_target).saturating_add(nearest);
                }
            }
        }
        Some(drive.saturating_add(handling_cost(problem, self.costs)))
    }
}

/// Per vehicle, the longest leg among its carried packages; per waiting
/// package, its own leg plus the distance from the nearest vehicle.
#[derive(Debug, Clone, Copy)]
pub struct NearestVehicle {
    costs: ActionCosts,
}

impl NearestVehicle {
    /// Create the heuristic with the given handling costs.
    #[must_use]
    pub const fn new(costs: ActionCosts) -> Self {
        Self { costs }
    }
}

impl Heuristic for NearestVehicle {
    fn estimate(&self, problem: &Problem, paths: &ShortestPathIndex) -> Option<u64> {
        let mut drive = 0_u64;
        for vehicle in problem.vehicles() {
            let Some(location) = vehicle.location() else {
                continue;
            };
            let mut longest = 0_u64;
            for package in vehicle.packages() {
                let target = problem.package(*package)?.target();
                longest = longest.max(paths.distance(location, target)?);
            }
            drive = drive.saturating_add(longest);
        }
        for package in problem.unfinished_packages() {
            let Some(location) = package.location() else {
                continue;
            };
            let to_target = paths.distance(location, package.target())?;
            let nearest = nearest_vehicle(problem, paths, location)?;
            drive = drive.saturating_add(to_target).saturating_add(nearest);
        }
        Some(drive.saturating_add(handling_cost(problem, self.costs)))
    }
}

/// Handling costs plus the single longest drive some vehicle still has to
/// make.
///
/// Each leg is a lower bound on one vehicle's remaining driving: a waiting
/// package needs some vehicle to reach it and carry it to its target, a
/// carried package needs its carrier to reach the target, and a vehicle with
/// a target must end there. Every action also pays for itself at most once,
/// so the estimate never exceeds the cheapest remaining plan.
#[derive(Debug, Clone, Copy)]
pub struct AdmissibleLeg {
    costs: ActionCosts,
}

impl AdmissibleLeg {
    /// Create the heuristic with the given handling costs.
    #[must_use]
    pub const fn new(costs: ActionCosts) -> Self {
        Self { costs }
    }
}

impl Heuristic for AdmissibleLeg {
    fn estimate(&self, problem: &Problem, paths: &ShortestPathIndex) -> Option<u64> {
        let mut longest = 0_u64;
        for package in problem.unfinished_packages() {
            let leg = match whereabouts(problem, package)? {
                Whereabouts::Carried(location) => paths.distance(location, package.target())?,
                Whereabouts::Lying(location) => {
                    let to_target = paths.distance(location, package.target())?;
                    nearest_vehicle(problem, paths, location)?.saturating_add(to_target)
                }
            };
            longest = longest.max(leg);
        }
        for vehicle in problem.vehicles() {
            if let (Some(location), Some(target)) = (vehicle.location(), vehicle.target()) {
                longest = longest.max(paths.distance(location, target)?);
            }
        }
        Some(longest.saturating_add(handling_cost(problem, self.costs)))
    }
}
