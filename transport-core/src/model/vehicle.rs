//! Vehicles and their fuel tanks.

use std::sync::Arc;

use super::{LocationId, PackageId, VehicleId};

/// Fuel level of a vehicle in a fuel-aware domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fuel {
    current: u32,
    max: u32,
}

impl Fuel {
    /// Build a fuel level; `None` when `current` exceeds `max`.
    #[must_use]
    pub const fn new(current: u32, max: u32) -> Option<Self> {
        if current > max {
            None
        } else {
            Some(Self { current, max })
        }
    }

    /// Fuel left in the tank.
    #[must_use]
    pub const fn current(self) -> u32 {
        self.current
    }

    /// Tank size.
    #[must_use]
    pub const fn max(self) -> u32 {
        self.max
    }

    /// True when the tank is full.
    #[must_use]
    pub const fn is_full(self) -> bool {
        self.current == self.max
    }

    /// The tank after burning `amount`, or `None` when it runs dry.
    #[must_use]
    pub const fn burned(self, amount: u32) -> Option<Self> {
        match self.current.checked_sub(amount) {
            Some(current) => Some(Self {
                current,
                max: self.max,
            }),
            None => None,
        }
    }

    /// A full tank of the same size.
    #[must_use]
    pub const fn refilled(self) -> Self {
        Self {
            current: self.max,
            max: self.max,
        }
    }
}

/// A capacity-limited vehicle.
///
/// `free_capacity` shrinks on pick-up and grows on drop; it always stays in
/// `0..=max_capacity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    pub(crate) id: VehicleId,
    pub(crate) name: Arc<str>,
    pub(crate) location: Option<LocationId>,
    pub(crate) target: Option<LocationId>,
    pub(crate) free_capacity: u32,
    pub(crate) max_capacity: u32,
    pub(crate) fuel: Option<Fuel>,
    pub(crate) ready_loading: bool,
    pub(crate) packages: Vec<PackageId>,
}

impl Vehicle {
    /// Identifier within the owning problem.
    #[must_use]
    pub const fn id(&self) -> VehicleId {
        self.id
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current location; `None` while the vehicle is unplaced.
    #[must_use]
    pub const fn location(&self) -> Option<LocationId> {
        self.location
    }

    /// Location the vehicle must finish at, if any.
    #[must_use]
    pub const fn target(&self) -> Option<LocationId> {
        self.target
    }

    /// Remaining package capacity.
    #[must_use]
    pub const fn free_capacity(&self) -> u32 {
        self.free_capacity
    }

    /// Package capacity when empty.
    #[must_use]
    pub const fn max_capacity(&self) -> u32 {
        self.max_capacity
    }

    /// Fuel tank, absent in domains without fuel.
    #[must_use]
    pub const fn fuel(&self) -> Option<Fuel> {
        self.fuel
    }

    /// Loading readiness flag carried through from the problem description.
    #[must_use]
    pub const fn ready_loading(&self) -> bool {
        self.ready_loading
    }

    /// Carried packages in loading order.
    #[must_use]
    pub fn packages(&self) -> &[PackageId] {
        &self.packages
    }

    /// True when `package` is in the carry list.
    #[must_use]
    pub fn carries(&self, package: PackageId) -> bool {
        self.packages.contains(&package)
    }

    /// True when the vehicle has no target or stands on it.
    #[must_use]
    pub fn at_target(&self) -> bool {
        self.target.is_none() || self.target == self.location
    }

    /// A copy standing at `location`.
    #[must_use]
    pub fn with_location(&self, location: LocationId) -> Self {
        Self {
            location: Some(location),
            ..self.clone()
        }
    }

    /// A copy with the given target.
    #[must_use]
    pub fn with_target(&self, target: Option<LocationId>) -> Self {
        Self {
            target,
            ..self.clone()
        }
    }

    /// A copy with the given fuel tank.
    #[must_use]
    pub fn with_fuel(&self, fuel: Option<Fuel>) -> Self {
        Self {
            fuel,
            ..self.clone()
        }
    }

    /// A copy with `package` appended to the carry list, or `None` when it
    /// does not fit.
    pub(crate) fn with_loaded(&self, package: PackageId, size: u32) -> Option<Self> {
        let free_capacity = self.free_capacity.checked_sub(size)?;
        let mut packages = self.packages.clone();
        packages.push(package);
        Some(Self {
            free_capacity,
            packages,
            ..self.clone()
        })
    }

    /// A copy with `package` removed from the carry list, or `None` when it
    /// is not carried or the capacity would overflow.
    pub(crate) fn with_unloaded(&self, package: PackageId, size: u32) -> Option<Self> {
        let position = self.packages.iter().position(|p| *p == package)?;
        let free_capacity = self
            .free_capacity
            .checked_add(size)
            .filter(|free| *free <= self.max_capacity)?;
        let mut packages = self.packages.clone();
        packages.remove(position);
        Some(Self {
            free_capacity,
            packages,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn truck() -> Vehicle {
        Vehicle {
            id: VehicleId::new(0),
            name: "truck-1".into(),
            location: Some(LocationId::new(0)),
            target: None,
            free_capacity: 3,
            max_capacity: 3,
            fuel: Fuel::new(10, 20),
            ready_loading: true,
            packages: Vec::new(),
        }
    }

    #[rstest]
    fn loading_consumes_capacity(truck: Vehicle) {
        let loaded = truck.with_loaded(PackageId::new(4), 2).expect("fits");
        assert_eq!(loaded.free_capacity(), 1);
        assert!(loaded.carries(PackageId::new(4)));
        assert!(loaded.with_loaded(PackageId::new(5), 2).is_none());
    }

    #[rstest]
    fn unloading_requires_the_package(truck: Vehicle) {
        assert!(truck.with_unloaded(PackageId::new(4), 1).is_none());
        let loaded = truck.with_loaded(PackageId::new(4), 2).expect("fits");
        let unloaded = loaded.with_unloaded(PackageId::new(4), 2).expect("carried");
        assert_eq!(unloaded, truck);
    }

    #[rstest]
    #[case(10, Some(0))]
    #[case(11, None)]
    fn burning_fuel_cannot_go_negative(#[case] amount: u32, #[case] left: Option<u32>) {
        let tank = Fuel::new(10, 20).expect("valid tank");
        assert_eq!(tank.burned(amount).map(Fuel::current), left);
        assert!(tank.refilled().is_full());
    }

    #[rstest]
    fn vehicles_without_targets_are_always_at_target(truck: Vehicle) {
        assert!(truck.at_target());
        assert!(!truck.with_target(Some(LocationId::new(1))).at_target());
    }
}
