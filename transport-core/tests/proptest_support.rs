//! Strategies building small random transport problems.

use geo::Coord;
use proptest::prelude::*;
use transport_core::{
    LocationId, PackageSpec, PetrolStation, Problem, ProblemBuilder, ProblemError, RoadGraph,
    VehicleSpec,
};

/// Raw ingredients of a strongly connected road graph.
#[derive(Debug, Clone)]
pub struct GraphSeed {
    pub ring: Vec<u32>,
    pub chords: Vec<(usize, usize, u32)>,
}

/// A ring over 2..=6 locations plus up to eight random chords.
pub fn graph_seed() -> impl Strategy<Value = GraphSeed> {
    (2_usize..=6).prop_flat_map(|size| {
        (
            prop::collection::vec(1_u32..=9, size),
            prop::collection::vec((0..size, 0..size, 1_u32..=20), 0..=8),
        )
            .prop_map(|(ring, chords)| GraphSeed { ring, chords })
    })
}

/// Populate `builder` with the graph described by `seed`.
pub fn add_graph(builder: &mut ProblemBuilder, seed: &GraphSeed) -> Vec<LocationId> {
    let ids: Vec<LocationId> = (0..seed.ring.len())
        .map(|i| {
            builder
                .add_location(
                    &format!("L{i}"),
                    Coord { x: 0, y: 0 },
                    PetrolStation::NotApplicable,
                )
                .expect("location")
        })
        .collect();
    for (i, length) in seed.ring.iter().enumerate() {
        let from = ids[i];
        let to = ids[(i + 1) % ids.len()];
        if from != to {
            builder
                .add_road(&format!("ring-{i}"), from, to, *length)
                .expect("ring road");
        }
    }
    for (n, (from, to, length)) in seed.chords.iter().enumerate() {
        // Duplicates of an existing ordered pair are skipped.
        if let Err(err) =
            builder.add_road(&format!("chord-{n}"), ids[*from], ids[*to], *length)
        {
            assert!(matches!(err, ProblemError::DuplicateRoad { .. }), "{err}");
        }
    }
    ids
}

/// Build a standalone graph from `seed`.
pub fn build_graph(seed: &GraphSeed) -> RoadGraph {
    let mut builder = ProblemBuilder::new("graph");
    add_graph(&mut builder, seed);
    builder.graph().clone()
}

/// Ingredients of a small problem: vehicles as (location, capacity) and
/// packages as (location, target, size), all as indices into the ring.
#[derive(Debug, Clone)]
pub struct ProblemSeed {
    pub graph: GraphSeed,
    pub vehicles: Vec<(usize, u32)>,
    pub packages: Vec<(usize, usize, u32)>,
}

/// At most two vehicles and two packages on a random connected graph.
pub fn problem_seed() -> impl Strategy<Value = ProblemSeed> {
    graph_seed().prop_flat_map(|graph| {
        let size = graph.ring.len();
        (
            Just(graph),
            prop::collection::vec((0..size, 1_u32..=2), 1..=2),
            prop::collection::vec((0..size, 0..size, 1_u32..=2), 1..=2),
        )
            .prop_map(|(graph, vehicles, packages)| ProblemSeed {
                graph,
                vehicles,
                packages,
            })
    })
}

/// Build the problem described by `seed`.
pub fn build_problem(seed: &ProblemSeed) -> Problem {
    let mut builder = ProblemBuilder::new("random");
    let ids = add_graph(&mut builder, &seed.graph);
    for (i, (location, capacity)) in seed.vehicles.iter().enumerate() {
        builder
            .add_vehicle(VehicleSpec::new(&format!("truck-{i}"), ids[*location], *capacity))
            .expect("vehicle");
    }
    for (i, (location, target, size)) in seed.packages.iter().enumerate() {
        builder
            .add_package(
                PackageSpec::at(&format!("package-{i}"), ids[*location], ids[*target])
                    .with_size(*size),
            )
            .expect("package");
    }
    builder.build().expect("problem")
}
