//! Small hand-built problems shared by unit, property, and behaviour tests.

use geo::Coord;

use crate::{
    Fuel, LocationId, PackageId, PackageSpec, PetrolStation, Problem, ProblemBuilder, RoadId,
    VehicleId, VehicleSpec,
};

/// `A -5-> B`, one unit-capacity truck and one package at `A` bound for `B`.
#[derive(Debug, Clone)]
pub struct SingleRoad {
    /// The problem.
    pub problem: Problem,
    /// Start location.
    pub a: LocationId,
    /// Target location.
    pub b: LocationId,
    /// The only road.
    pub road: RoadId,
    /// The only vehicle.
    pub vehicle: VehicleId,
    /// The only package.
    pub package: PackageId,
}

/// Build [`SingleRoad`].
#[must_use]
pub fn single_road_problem() -> SingleRoad {
    let mut builder = ProblemBuilder::new("single-road");
    let a = location(&mut builder, "A", 0, 0, PetrolStation::NotApplicable);
    let b = location(&mut builder, "B", 5, 0, PetrolStation::NotApplicable);
    let road = builder.add_road("A-B", a, b, 5).expect("road A-B");
    let vehicle = builder
        .add_vehicle(VehicleSpec::new("truck-1", a, 1))
        .expect("truck-1");
    let package = builder
        .add_package(PackageSpec::at("package-1", a, b))
        .expect("package-1");
    SingleRoad {
        problem: builder.build().expect("single-road problem"),
        a,
        b,
        road,
        vehicle,
        package,
    }
}

/// Directed cycle `A -> B -> C -> A` with equal lengths and a package from
/// `A` to `C`.
#[derive(Debug, Clone)]
pub struct TriangleCycle {
    /// The problem.
    pub problem: Problem,
    /// `[A, B, C]`.
    pub locations: [LocationId; 3],
    /// Truck starting at `A`.
    pub vehicle: VehicleId,
    /// Package from `A` to `C`.
    pub package: PackageId,
}

/// Build [`TriangleCycle`] with roads of length 4.
#[must_use]
pub fn triangle_cycle_problem() -> TriangleCycle {
    let mut builder = ProblemBuilder::new("triangle-cycle");
    let a = location(&mut builder, "A", 0, 0, PetrolStation::NotApplicable);
    let b = location(&mut builder, "B", 4, 0, PetrolStation::NotApplicable);
    let c = location(&mut builder, "C", 2, 3, PetrolStation::NotApplicable);
    for (name, from, to) in [("A-B", a, b), ("B-C", b, c), ("C-A", c, a)] {
        builder.add_road(name, from, to, 4).expect("cycle road");
    }
    let vehicle = builder
        .add_vehicle(VehicleSpec::new("truck-1", a, 1))
        .expect("truck-1");
    let package = builder
        .add_package(PackageSpec::at("package-1", a, c))
        .expect("package-1");
    TriangleCycle {
        problem: builder.build().expect("triangle problem"),
        locations: [a, b, c],
        vehicle,
        package,
    }
}

/// `start -5-> via -5-> end` next to a direct `start -20-> end` road.
#[derive(Debug, Clone)]
pub struct Detour {
    /// The problem.
    pub problem: Problem,
    /// Where the truck and package start.
    pub start: LocationId,
    /// Middle of the short route.
    pub via: LocationId,
    /// Package target.
    pub end: LocationId,
    /// Truck starting at `start`.
    pub vehicle: VehicleId,
    /// Package from `start` to `end`.
    pub package: PackageId,
}

/// Build [`Detour`].
#[must_use]
pub fn detour_problem() -> Detour {
    let mut builder = ProblemBuilder::new("detour");
    let start = location(&mut builder, "A", 0, 0, PetrolStation::NotApplicable);
    let via = location(&mut builder, "B", 1, 1, PetrolStation::NotApplicable);
    let end = location(&mut builder, "C", 2, 0, PetrolStation::NotApplicable);
    builder.add_road("A-B", start, via, 5).expect("A-B");
    builder.add_road("B-C", via, end, 5).expect("B-C");
    builder.add_road("A-C", start, end, 20).expect("A-C");
    let vehicle = builder
        .add_vehicle(VehicleSpec::new("truck-1", start, 1))
        .expect("truck-1");
    let package = builder
        .add_package(PackageSpec::at("package-1", start, end))
        .expect("package-1");
    Detour {
        problem: builder.build().expect("detour problem"),
        start,
        via,
        end,
        vehicle,
        package,
    }
}

/// Three locations on a two-way line with a petrol station in the middle.
#[derive(Debug, Clone)]
pub struct FuelLine {
    /// The problem.
    pub problem: Problem,
    /// `[L0, L1, L2]`; only `L1` sells fuel.
    pub locations: [LocationId; 3],
    /// Truck at `L0` with a full tank.
    pub vehicle: VehicleId,
    /// Package from `L0` to `L2`.
    pub package: PackageId,
}

/// Build [`FuelLine`] with roads of `road_length` and a tank of `tank`.
#[must_use]
pub fn fuel_line_problem(road_length: u32, tank: u32) -> FuelLine {
    let mut builder = ProblemBuilder::new("fuel-line");
    let l0 = location(&mut builder, "L0", 0, 0, PetrolStation::Disabled);
    let l1 = location(&mut builder, "L1", 1, 0, PetrolStation::Enabled);
    let l2 = location(&mut builder, "L2", 2, 0, PetrolStation::Disabled);
    for (from, to) in [(l0, l1), (l1, l0), (l1, l2), (l2, l1)] {
        let name = format!("{from}-{to}");
        builder.add_road(&name, from, to, road_length).expect("line road");
    }
    let fuel = Fuel::new(tank, tank).expect("full tank");
    let vehicle = builder
        .add_vehicle(VehicleSpec::new("truck-1", l0, 1).with_fuel(fuel))
        .expect("truck-1");
    let package = builder
        .add_package(PackageSpec::at("package-1", l0, l2))
        .expect("package-1");
    FuelLine {
        problem: builder.build().expect("fuel line problem"),
        locations: [l0, l1, l2],
        vehicle,
        package,
    }
}

/// A `width` x `height` grid of two-way roads with deterministic vehicle
/// and package placement.
///
/// Road lengths vary between 1 and 3. Vehicle `i` has capacity `1 + i % 2`.
#[must_use]
pub fn grid_problem(width: usize, height: usize, vehicles: usize, packages: usize) -> Problem {
    let mut builder = ProblemBuilder::new(&format!("grid-{width}x{height}"));
    let mut ids = Vec::with_capacity(width.saturating_mul(height));
    for y in 0..height {
        for x in 0..width {
            let station = if (x + y) % 4 == 0 {
                PetrolStation::Enabled
            } else {
                PetrolStation::Disabled
            };
            let position = Coord {
                x: i32::try_from(x).unwrap_or(i32::MAX),
                y: i32::try_from(y).unwrap_or(i32::MAX),
            };
            let id = builder
                .add_location(&format!("{x}-{y}"), position, station)
                .expect("grid location");
            ids.push(id);
        }
    }
    let at = |x: usize, y: usize| ids.get(y * width + x).copied();
    for y in 0..height {
        for x in 0..width {
            let length = 1 + u32::try_from((x * 3 + y) % 3).unwrap_or(0);
            let here = at(x, y).expect("grid cell");
            for there in [at(x + 1, y).filter(|_| x + 1 < width), at(x, y + 1)]
                .into_iter()
                .flatten()
            {
                builder.add_road(&format!("{here}>{there}"), here, there, length).expect("road");
                builder.add_road(&format!("{there}>{here}"), there, here, length).expect("road");
            }
        }
    }
    let count = ids.len();
    for i in 0..vehicles {
        let start = ids.get((i * 7) % count).copied().expect("vehicle cell");
        let capacity = 1 + u32::try_from(i % 2).unwrap_or(0);
        builder
            .add_vehicle(VehicleSpec::new(&format!("truck-{i}"), start, capacity))
            .expect("vehicle");
    }
    for j in 0..packages {
        let from = (j * 3 + 1) % count;
        let mut to = (j * 5 + 2) % count;
        if to == from {
            to = (to + 1) % count;
        }
        let (Some(from), Some(to)) = (ids.get(from).copied(), ids.get(to).copied()) else {
            continue;
        };
        builder
            .add_package(PackageSpec::at(&format!("package-{j}"), from, to))
            .expect("package");
    }
    builder.build().expect("grid problem")
}

fn location(
    builder: &mut ProblemBuilder,
    name: &str,
    x: i32,
    y: i32,
    station: PetrolStation,
) -> LocationId {
    builder
        .add_location(name, Coord { x, y }, station)
        .expect("fixture location")
}
