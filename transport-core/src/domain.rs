//! Sequential transport domain: action factory and action costs.

use crate::{LocationId, PackageId, Road, RoadId, VehicleId};

/// Fixed costs of the non-drive actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionCosts {
    /// Cost of loading a package.
    pub pick_up: u32,
    /// Cost of unloading a package.
    pub drop: u32,
    /// Cost of filling a tank.
    pub refuel: u32,
}

impl Default for ActionCosts {
    fn default() -> Self {
        Self {
            pick_up: 1,
            drop: 1,
            refuel: 10,
        }
    }
}

/// What an [`Action`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "kebab-case"))]
pub enum ActionKind {
    /// Drive along a road.
    Drive {
        /// Road driven.
        road: RoadId,
        /// Where the drive starts.
        from: LocationId,
        /// Where the drive ends.
        to: LocationId,
        /// Fuel burned, when the domain tracks fuel.
        fuel: Option<u32>,
    },
    /// Load a package lying at the vehicle's location.
    PickUp {
        /// Location of the vehicle and package.
        location: LocationId,
        /// Package loaded.
        package: PackageId,
    },
    /// Unload a carried package.
    Drop {
        /// Location the package is left at.
        location: LocationId,
        /// Package unloaded.
        package: PackageId,
    },
    /// Fill the tank at a petrol station.
    Refuel {
        /// Petrol station location.
        location: LocationId,
    },
}

/// A single step of a plan performed by one vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    vehicle: VehicleId,
    kind: ActionKind,
    cost: u32,
}

impl Action {
    /// Vehicle performing the action.
    #[must_use]
    pub const fn vehicle(&self) -> VehicleId {
        self.vehicle
    }

    /// What the action does.
    #[must_use]
    pub const fn kind(&self) -> &ActionKind {
        &self.kind
    }

    /// Cost contributed to the plan.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Duration on the timeline. Sequential actions last as long as they cost.
    #[must_use]
    pub const fn duration(&self) -> u32 {
        self.cost
    }

    /// True for [`ActionKind::Drive`].
    #[must_use]
    pub const fn is_drive(&self) -> bool {
        matches!(self.kind, ActionKind::Drive { .. })
    }

    /// True for [`ActionKind::PickUp`].
    #[must_use]
    pub const fn is_pick_up(&self) -> bool {
        matches!(self.kind, ActionKind::PickUp { .. })
    }

    /// True for [`ActionKind::Drop`].
    #[must_use]
    pub const fn is_drop(&self) -> bool {
        matches!(self.kind, ActionKind::Drop { .. })
    }

    /// True for [`ActionKind::Refuel`].
    #[must_use]
    pub const fn is_refuel(&self) -> bool {
        matches!(self.kind, ActionKind::Refuel { .. })
    }

    /// Package loaded or unloaded by this action.
    #[must_use]
    pub const fn package(&self) -> Option<PackageId> {
        match self.kind {
            ActionKind::PickUp { package, .. } | ActionKind::Drop { package, .. } => Some(package),
            ActionKind::Drive { .. } | ActionKind::Refuel { .. } => None,
        }
    }

    /// Location the vehicle stands at once the action completes.
    #[must_use]
    pub const fn location_after(&self) -> LocationId {
        match self.kind {
            ActionKind::Drive { to, .. } => to,
            ActionKind::PickUp { location, .. }
            | ActionKind::Drop { location, .. }
            | ActionKind::Refuel { location } => location,
        }
    }
}

/// Factory for sequential transport actions.
///
/// # Examples
///
/// ```
/// use transport_core::{Domain, LocationId, PackageId, VehicleId};
///
/// let domain = Domain::sequential();
/// let drop = domain.build_drop(VehicleId::new(0), LocationId::new(1), PackageId::new(0));
/// assert_eq!(drop.cost(), 1);
/// assert!(!domain.fuel_enabled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Domain {
    costs: ActionCosts,
    fuel_enabled: bool,
}

impl Domain {
    /// Sequential domain without fuel and with default costs.
    #[must_use]
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Sequential domain that tracks fuel and allows refuelling.
    #[must_use]
    pub fn with_fuel() -> Self {
        Self {
            fuel_enabled: true,
            ..Self::default()
        }
    }

    /// Replace the action costs.
    #[must_use]
    pub const fn with_costs(mut self, costs: ActionCosts) -> Self {
        self.costs = costs;
        self
    }

    /// Action costs in use.
    #[must_use]
    pub const fn costs(&self) -> ActionCosts {
        self.costs
    }

    /// True when drives burn fuel and refuelling is available.
    #[must_use]
    pub const fn fuel_enabled(&self) -> bool {
        self.fuel_enabled
    }

    /// Drive `vehicle` along `road`; costs the road length.
    #[must_use]
    pub fn build_drive(&self, vehicle: VehicleId, road: &Road) -> Action {
        Action {
            vehicle,
            kind: ActionKind::Drive {
                road: road.id(),
                from: road.from(),
                to: road.to(),
                fuel: self.fuel_enabled.then(|| road.fuel_cost()),
            },
            cost: road.length(),
        }
    }

    /// Load `package` at `location`.
    #[must_use]
    pub const fn build_pick_up(
        &self,
        vehicle: VehicleId,
        location: LocationId,
        package: PackageId,
    ) -> Action {
        Action {
            vehicle,
            kind: ActionKind::PickUp { location, package },
            cost: self.costs.pick_up,
        }
    }

    /// Unload `package` at `location`.
    #[must_use]
    pub const fn build_drop(
        &self,
        vehicle: VehicleId,
        location: LocationId,
        package: PackageId,
    ) -> Action {
        Action {
            vehicle,
            kind: ActionKind::Drop { location, package },
            cost: self.costs.drop,
        }
    }

    /// Refuel at `location`.
    #[must_use]
    pub const fn build_refuel(&self, vehicle: VehicleId, location: LocationId) -> Action {
        Action {
            vehicle,
            kind: ActionKind::Refuel { location },
            cost: self.costs.refuel,
        }
    }
}
