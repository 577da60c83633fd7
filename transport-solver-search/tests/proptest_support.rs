//! Strategies producing small, always solvable transport problems.

use geo::Coord;
use proptest::prelude::*;
use transport_core::{
    PackageSpec, PetrolStation, Problem, ProblemBuilder, ProblemError, VehicleSpec,
};

/// Ingredients of a problem on a ring of locations with optional chords.
///
/// Vehicles are `(location, capacity)` and packages `(location, target)`;
/// every package has size one, so any vehicle can carry it.
#[derive(Debug, Clone)]
pub struct SmallProblem {
    /// Edge lengths around the ring.
    pub ring: Vec<u32>,
    /// Extra edges as `(from, to, length)`.
    pub chords: Vec<(usize, usize, u32)>,
    /// Vehicles as `(location, capacity)`.
    pub vehicles: Vec<(usize, u32)>,
    /// Packages as `(location, target)`.
    pub packages: Vec<(usize, usize)>,
}

/// At most six locations, two vehicles, and two packages.
pub fn small_problem() -> impl Strategy<Value = SmallProblem> {
    (2_usize..=6).prop_flat_map(|size| {
        (
            prop::collection::vec(1_u32..=6, size),
            prop::collection::vec((0..size, 0..size, 1_u32..=12), 0..=4),
            prop::collection::vec((0..size, 1_u32..=2), 1..=2),
            prop::collection::vec((0..size, 0..size), 1..=2),
        )
            .prop_map(|(ring, chords, vehicles, packages)| SmallProblem {
                ring,
                chords,
                vehicles,
                packages,
            })
    })
}

/// Build the problem described by `seed`.
#[expect(
    clippy::expect_used,
    clippy::indexing_slicing,
    reason = "strategy indices are generated within bounds"
)]
pub fn build(seed: &SmallProblem) -> Problem {
    let mut builder = ProblemBuilder::new("small");
    let ids: Vec<_> = (0..seed.ring.len())
        .map(|i| {
            builder
                .add_location(&format!("L{i}"), Coord { x: 0, y: 0 }, PetrolStation::NotApplicable)
                .expect("location")
        })
        .collect();
    for (i, length) in seed.ring.iter().enumerate() {
        let (from, to) = (ids[i], ids[(i + 1) % ids.len()]);
        builder
            .add_road(&format!("ring-{i}"), from, to, *length)
            .expect("ring road");
    }
    for (n, (from, to, length)) in seed.chords.iter().enumerate() {
        // Chords duplicating an existing road are skipped.
        if let Err(err) =
            builder.add_road(&format!("chord-{n}"), ids[*from], ids[*to], *length)
        {
            assert!(matches!(err, ProblemError::DuplicateRoad { .. }), "{err}");
        }
    }
    for (i, (location, capacity)) in seed.vehicles.iter().enumerate() {
        builder
            .add_vehicle(VehicleSpec::new(&format!("truck-{i}"), ids[*location], *capacity))
            .expect("vehicle");
    }
    for (i, (location, target)) in seed.packages.iter().enumerate() {
        builder
            .add_package(PackageSpec::at(&format!("package-{i}"), ids[*location], ids[*target]))
            .expect("package");
    }
    builder.build().expect("problem")
}
