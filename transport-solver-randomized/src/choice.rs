//! Package and vehicle selection for randomized trials.

use std::collections::BTreeSet;

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use transport_core::{Package, PackageId, Problem, ShortestPathIndex, Vehicle, VehicleId};

/// An unfinished package and the vehicles able to serve it, in id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Assignment {
    pub(crate) package: PackageId,
    pub(crate) vehicles: Vec<VehicleId>,
}

/// How a vehicle is picked once the package is fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum VehicleChoice {
    /// Uniform with the given probability, otherwise the nearest vehicle.
    CoinToss(f64),
    /// Weighted by inverse distance to the package.
    Distance,
}

/// Vehicles that can take `package` from the current snapshot.
///
/// A carried package can only be finished by its carrier. A lying package
/// needs a placed vehicle with room for it that can reach the package and
/// from there the target.
pub(crate) fn serving_vehicles(
    problem: &Problem,
    paths: &ShortestPathIndex,
    package: &Package,
) -> Vec<VehicleId> {
    let Some(at) = package.location() else {
        return problem
            .carrier_of(package.id())
            .filter(|carrier| {
                carrier
                    .location()
                    .is_some_and(|here| paths.distance(here, package.target()).is_some())
            })
            .map(Vehicle::id)
            .into_iter()
            .collect();
    };
    if paths.distance(at, package.target()).is_none() {
        return Vec::new();
    }
    problem
        .vehicles()
        .iter()
        .filter(|vehicle| vehicle.free_capacity() >= package.size())
        .filter(|vehicle| {
            vehicle
                .location()
                .is_some_and(|here| paths.distance(here, at).is_some())
        })
        .map(Vehicle::id)
        .collect()
}

/// Every unfinished package that some vehicle can serve right now.
pub(crate) fn assignments(problem: &Problem, paths: &ShortestPathIndex) -> Vec<Assignment> {
    problem
        .unfinished_packages()
        .filter_map(|package| {
            let vehicles = serving_vehicles(problem, paths, package);
            (!vehicles.is_empty()).then_some(Assignment {
                package: package.id(),
                vehicles,
            })
        })
        .collect()
}

/// A lying package too large for every placed vehicle, if any.
pub(crate) fn oversized_package(problem: &Problem) -> Option<PackageId> {
    let largest = problem
        .vehicles()
        .iter()
        .filter(|vehicle| vehicle.location().is_some())
        .map(Vehicle::max_capacity)
        .max()
        .unwrap_or(0);
    problem
        .unfinished_packages()
        .find(|package| package.location().is_some() && package.size() > largest)
        .map(Package::id)
}

/// Pick a package uniformly, then a vehicle for it according to `choice`.
pub(crate) fn choose_package_first<R: Rng + ?Sized>(
    rng: &mut R,
    choice: VehicleChoice,
    problem: &Problem,
    paths: &ShortestPathIndex,
    options: &[Assignment],
) -> Option<(PackageId, VehicleId)> {
    let option = options.choose(rng)?;
    let package = problem.package(option.package)?;
    let vehicle = choose_vehicle(rng, choice, problem, paths, package, &option.vehicles)?;
    Some((option.package, vehicle))
}

/// Pick a vehicle uniformly among those serving anything, then one of its
/// packages uniformly.
pub(crate) fn choose_vehicle_first<R: Rng + ?Sized>(
    rng: &mut R,
    options: &[Assignment],
) -> Option<(PackageId, VehicleId)> {
    let vehicles: Vec<VehicleId> = options
        .iter()
        .flat_map(|option| option.vehicles.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let vehicle = *vehicles.choose(rng)?;
    let packages: Vec<PackageId> = options
        .iter()
        .filter(|option| option.vehicles.contains(&vehicle))
        .map(|option| option.package)
        .collect();
    let package = *packages.choose(rng)?;
    Some((package, vehicle))
}

/// Pick one of `vehicles` to serve `package`.
pub(crate) fn choose_vehicle<R: Rng + ?Sized>(
    rng: &mut R,
    choice: VehicleChoice,
    problem: &Problem,
    paths: &ShortestPathIndex,
    package: &Package,
    vehicles: &[VehicleId],
) -> Option<VehicleId> {
    match choice {
        VehicleChoice::CoinToss(exploration) => {
            if rng.gen_range(0.0..1.0) < exploration {
                vehicles.choose(rng).copied()
            } else {
                nearest_vehicle(problem, paths, package, vehicles)
            }
        }
        VehicleChoice::Distance => {
            let weights: Vec<f64> = vehicles
                .iter()
                .map(|vehicle| inverse_distance(approach(problem, paths, package, *vehicle)))
                .collect();
            let distribution = WeightedIndex::new(&weights).ok()?;
            vehicles.get(distribution.sample(rng)).copied()
        }
    }
}

/// The vehicle of `vehicles` closest to `package`; ties go to the lower id.
pub(crate) fn nearest_vehicle(
    problem: &Problem,
    paths: &ShortestPathIndex,
    package: &Package,
    vehicles: &[VehicleId],
) -> Option<VehicleId> {
    vehicles
        .iter()
        .copied()
        .min_by_key(|vehicle| (approach(problem, paths, package, *vehicle), *vehicle))
}

/// Driving distance from `vehicle` to `package`; zero for its carrier and
/// `u64::MAX` when unreachable.
fn approach(
    problem: &Problem,
    paths: &ShortestPathIndex,
    package: &Package,
    vehicle: VehicleId,
) -> u64 {
    let here = problem.vehicle(vehicle).and_then(Vehicle::location);
    match (here, package.location()) {
        (Some(from), Some(to)) => paths.distance(from, to).unwrap_or(u64::MAX),
        (Some(_), None) => 0,
        (None, _) => u64::MAX,
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "selection weights are inverse distances"
)]
fn inverse_distance(distance: u64) -> f64 {
    let clamped = f64::from(u32::try_from(distance).unwrap_or(u32::MAX));
    1.0 / (clamped + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};
    use transport_core::{PackageSpec, PetrolStation, ProblemBuilder, VehicleSpec};

    struct Line {
        problem: Problem,
        near: VehicleId,
        far: VehicleId,
        small: VehicleId,
        package: PackageId,
    }

    /// `L0 - L1 - L2 - L3` both ways with unit roads; package of size 2 at
    /// `L2` bound for `L3`.
    #[fixture]
    fn line() -> Line {
        let mut builder = ProblemBuilder::new("line");
        let [l0, l1, l2, l3] = [0, 1, 2, 3].map(|x| {
            builder
                .add_location(&format!("L{x}"), Coord { x, y: 0 }, PetrolStation::NotApplicable)
                .expect("location")
        });
        for (from, to) in [(l0, l1), (l1, l2), (l2, l3)] {
            builder.add_road(&format!("{from}>{to}"), from, to, 1).expect("road");
            builder.add_road(&format!("{to}>{from}"), to, from, 1).expect("road");
        }
        let far = builder
            .add_vehicle(VehicleSpec::new("far", l0, 2))
            .expect("far");
        let near = builder
            .add_vehicle(VehicleSpec::new("near", l1, 2))
            .expect("near");
        let small = builder
            .add_vehicle(VehicleSpec::new("small", l2, 1))
            .expect("small");
        let package = builder
            .add_package(PackageSpec::at("box", l2, l3).with_size(2))
            .expect("box");
        Line {
            problem: builder.build().expect("problem"),
            near,
            far,
            small,
            package,
        }
    }

    #[rstest]
    fn only_vehicles_with_room_serve_a_lying_package(line: Line) {
        let paths = ShortestPathIndex::new(line.problem.graph());
        let package = line.problem.package(line.package).expect("package");
        let vehicles = serving_vehicles(&line.problem, &paths, package);
        assert_eq!(vehicles, vec![line.far, line.near]);
        assert!(!vehicles.contains(&line.small));
    }

    #[rstest]
    fn nearest_vehicle_prefers_the_shorter_approach(line: Line) {
        let paths = ShortestPathIndex::new(line.problem.graph());
        let package = line.problem.package(line.package).expect("package");
        let nearest = nearest_vehicle(&line.problem, &paths, package, &[line.far, line.near]);
        assert_eq!(nearest, Some(line.near));
    }

    #[rstest]
    fn coin_toss_without_exploration_is_greedy(line: Line) {
        let paths = ShortestPathIndex::new(line.problem.graph());
        let package = line.problem.package(line.package).expect("package");
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            let chosen = choose_vehicle(
                &mut rng,
                VehicleChoice::CoinToss(0.0),
                &line.problem,
                &paths,
                package,
                &[line.far, line.near],
            );
            assert_eq!(chosen, Some(line.near));
        }
    }

    #[rstest]
    fn distance_weighting_favours_the_near_vehicle(line: Line) {
        let paths = ShortestPathIndex::new(line.problem.graph());
        let package = line.problem.package(line.package).expect("package");
        let mut rng = ChaCha8Rng::seed_from_u64(2017);
        let near_picks = (0..300)
            .filter_map(|_| {
                choose_vehicle(
                    &mut rng,
                    VehicleChoice::Distance,
                    &line.problem,
                    &paths,
                    package,
                    &[line.far, line.near],
                )
            })
            .filter(|vehicle| *vehicle == line.near)
            .count();
        // Weights 1/3 and 1/2 give the near vehicle three fifths.
        assert!((140..=220).contains(&near_picks), "{near_picks}");
    }

    #[rstest]
    fn vehicle_first_choice_only_pairs_serving_vehicles(line: Line) {
        let paths = ShortestPathIndex::new(line.problem.graph());
        let options = assignments(&line.problem, &paths);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (package, vehicle) = choose_vehicle_first(&mut rng, &options).expect("choice");
        assert_eq!(package, line.package);
        assert_ne!(vehicle, line.small);
    }

    #[rstest]
    fn oversized_packages_are_reported(line: Line) {
        assert_eq!(oversized_package(&line.problem), None);
        let mut builder = ProblemBuilder::new("tiny");
        let a = builder
            .add_location("A", Coord { x: 0, y: 0 }, PetrolStation::NotApplicable)
            .expect("A");
        let b = builder
            .add_location("B", Coord { x: 1, y: 0 }, PetrolStation::NotApplicable)
            .expect("B");
        builder.add_road("A-B", a, b, 1).expect("road");
        builder
            .add_vehicle(VehicleSpec::new("van", a, 1))
            .expect("van");
        let crate_id = builder
            .add_package(PackageSpec::at("crate", a, b).with_size(3))
            .expect("crate");
        let problem = builder.build().expect("problem");
        assert_eq!(oversized_package(&problem), Some(crate_id));
    }
}
