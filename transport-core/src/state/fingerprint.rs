//! History-free identity of a search state.

use crate::{LocationId, PackageId, Problem};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct VehicleKey {
    location: Option<LocationId>,
    free_capacity: u32,
    fuel: Option<u32>,
    carried: Box<[PackageId]>,
}

/// Canonical key of a problem snapshot.
///
/// Two states reached by different action sequences share a fingerprint when
/// every vehicle has the same position, capacity, fuel, and carried set, and
/// every package lies at the same place. Closed sets key on this instead of
/// the full [`crate::PlanState`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateFingerprint {
    vehicles: Box<[VehicleKey]>,
    packages: Box<[Option<LocationId>]>,
}

impl StateFingerprint {
    /// Derive the fingerprint of `problem`.
    #[must_use]
    pub fn of(problem: &Problem) -> Self {
        let vehicles = problem
            .vehicles()
            .iter()
            .map(|vehicle| {
                let mut carried = vehicle.packages().to_vec();
                carried.sort_unstable();
                VehicleKey {
                    location: vehicle.location(),
                    free_capacity: vehicle.free_capacity(),
                    fuel: vehicle.fuel().map(crate::Fuel::current),
                    carried: carried.into_boxed_slice(),
                }
            })
            .collect();
        let packages = problem
            .packages()
            .iter()
            .map(crate::Package::location)
            .collect();
        Self { vehicles, packages }
    }
}
