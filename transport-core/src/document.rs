//! JSON interchange forms of problems and plans.
//!
//! Documents refer to entities by name; converting into a [`Problem`] resolves
//! every name and runs the usual builder validation.

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::{
    ActionKind, Fuel, LocationId, PackageId, PackageSpec, PetrolStation, Plan, Problem,
    ProblemBuilder, ProblemError, VehicleSpec,
};

/// A problem described by names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDocument {
    /// Problem name.
    pub name: String,
    /// Locations of the road network.
    pub locations: Vec<LocationDocument>,
    /// Directed roads.
    pub roads: Vec<RoadDocument>,
    /// Fleet.
    pub vehicles: Vec<VehicleDocument>,
    /// Packages to deliver.
    pub packages: Vec<PackageDocument>,
}

/// A location entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDocument {
    /// Unique name.
    pub name: String,
    /// Display x coordinate.
    #[serde(default)]
    pub x: i32,
    /// Display y coordinate.
    #[serde(default)]
    pub y: i32,
    /// Petrol station flag.
    #[serde(default)]
    pub petrol_station: PetrolStation,
}

/// A road entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadDocument {
    /// Optional name; defaults to `from-to`.
    #[serde(default)]
    pub name: Option<String>,
    /// Source location name.
    pub from: String,
    /// Destination location name.
    pub to: String,
    /// Road length.
    pub length: u32,
    /// Fuel burned when it differs from the length.
    #[serde(default)]
    pub fuel_cost: Option<u32>,
}

/// A vehicle entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDocument {
    /// Unique name.
    pub name: String,
    /// Starting location name; `None` leaves the vehicle unplaced.
    #[serde(default)]
    pub location: Option<String>,
    /// Location the vehicle must finish at.
    #[serde(default)]
    pub target: Option<String>,
    /// Maximum package capacity.
    pub capacity: u32,
    /// Fuel tank, for fuel-aware problems.
    #[serde(default)]
    pub fuel: Option<Fuel>,
    /// Ready-loading flag.
    #[serde(default = "default_ready_loading")]
    pub ready_loading: bool,
}

/// A package entry; exactly one of `location` and `vehicle` must be set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDocument {
    /// Unique name.
    pub name: String,
    /// Location the package lies at.
    #[serde(default)]
    pub location: Option<String>,
    /// Vehicle the package is loaded in.
    #[serde(default)]
    pub vehicle: Option<String>,
    /// Delivery target name.
    pub target: String,
    /// Capacity units occupied.
    #[serde(default = "default_size")]
    pub size: u32,
}

const fn default_ready_loading() -> bool {
    true
}

const fn default_size() -> u32 {
    1
}

impl ProblemDocument {
    /// True when any vehicle declares a fuel tank.
    #[must_use]
    pub fn uses_fuel(&self) -> bool {
        self.vehicles.iter().any(|vehicle| vehicle.fuel.is_some())
    }

    /// Resolve names and build the problem.
    ///
    /// # Errors
    ///
    /// Returns [`ProblemError`] for unknown names, duplicates, overloaded
    /// vehicles, or ambiguous package placement.
    pub fn into_problem(self) -> Result<Problem, ProblemError> {
        let mut builder = ProblemBuilder::new(&self.name);
        for location in &self.locations {
            builder.add_location(
                &location.name,
                Coord {
                    x: location.x,
                    y: location.y,
                },
                location.petrol_station,
            )?;
        }
        let resolve = |builder: &ProblemBuilder, name: &str| {
            builder
                .graph()
                .location_id(name)
                .ok_or_else(|| ProblemError::UnknownLocationName { name: name.into() })
        };
        for road in &self.roads {
            let from = resolve(&builder, &road.from)?;
            let to = resolve(&builder, &road.to)?;
            let name = road
                .name
                .clone()
                .unwrap_or_else(|| format!("{}-{}", road.from, road.to));
            match road.fuel_cost {
                Some(fuel_cost) => builder.add_fuel_road(&name, from, to, road.length, fuel_cost)?,
                None => builder.add_road(&name, from, to, road.length)?,
            };
        }
        let mut vehicle_names = Vec::with_capacity(self.vehicles.len());
        for vehicle in &self.vehicles {
            let mut spec = match &vehicle.location {
                Some(location) => {
                    VehicleSpec::new(&vehicle.name, resolve(&builder, location)?, vehicle.capacity)
                }
                None => VehicleSpec::unplaced(&vehicle.name, vehicle.capacity),
            };
            if let Some(target) = &vehicle.target {
                spec = spec.with_target(resolve(&builder, target)?);
            }
            if let Some(fuel) = vehicle.fuel {
                if fuel.current() > fuel.max() {
                    return Err(ProblemError::FuelExceedsCapacity {
                        vehicle: vehicle.name.as_str().into(),
                        current: fuel.current(),
                        max: fuel.max(),
                    });
                }
                spec = spec.with_fuel(fuel);
            }
            let id = builder.add_vehicle(spec.with_ready_loading(vehicle.ready_loading))?;
            vehicle_names.push((vehicle.name.as_str(), id));
        }
        for package in &self.packages {
            let target = resolve(&builder, &package.target)?;
            let spec = match (&package.location, &package.vehicle) {
                (Some(location), None) => {
                    PackageSpec::at(&package.name, resolve(&builder, location)?, target)
                }
                (None, Some(vehicle)) => {
                    let id = vehicle_names
                        .iter()
                        .find(|(name, _)| name == vehicle)
                        .map(|(_, id)| *id)
                        .ok_or_else(|| ProblemError::UnknownVehicleName {
                            name: vehicle.as_str().into(),
                        })?;
                    PackageSpec::carried(&package.name, id, target)
                }
                _ => {
                    return Err(ProblemError::AmbiguousPlacement {
                        name: package.name.as_str().into(),
                    });
                }
            };
            builder.add_package(spec.with_size(package.size))?;
        }
        builder.build()
    }
}

impl From<&Problem> for ProblemDocument {
    fn from(problem: &Problem) -> Self {
        let graph = problem.graph();
        let name_of = |id: LocationId| graph.location_name(id).to_owned();
        Self {
            name: problem.name().to_owned(),
            locations: graph
                .location_ids()
                .filter_map(|id| graph.location(id))
                .map(|location| LocationDocument {
                    name: location.name().to_owned(),
                    x: location.position().x,
                    y: location.position().y,
                    petrol_station: location.petrol_station(),
                })
                .collect(),
            roads: graph
                .roads()
                .map(|road| RoadDocument {
                    name: Some(road.name().to_owned()),
                    from: name_of(road.from()),
                    to: name_of(road.to()),
                    length: road.length(),
                    fuel_cost: (road.fuel_cost() != road.length()).then(|| road.fuel_cost()),
                })
                .collect(),
            vehicles: problem
                .vehicles()
                .iter()
                .map(|vehicle| VehicleDocument {
                    name: vehicle.name().to_owned(),
                    location: vehicle.location().map(name_of),
                    target: vehicle.target().map(name_of),
                    capacity: vehicle.max_capacity(),
                    fuel: vehicle.fuel(),
                    ready_loading: vehicle.ready_loading(),
                })
                .collect(),
            packages: problem
                .packages()
                .iter()
                .map(|package| PackageDocument {
                    name: package.name().to_owned(),
                    location: package.location().map(name_of),
                    vehicle: problem
                        .carrier_of(package.id())
                        .map(|vehicle| vehicle.name().to_owned()),
                    target: name_of(package.target()),
                    size: package.size(),
                })
                .collect(),
        }
    }
}

/// One plan step described by names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum StepDocument {
    /// Drive along a road.
    Drive {
        /// Vehicle name.
        vehicle: String,
        /// Start location name.
        from: String,
        /// End location name.
        to: String,
        /// Step cost.
        cost: u32,
    },
    /// Load a package.
    PickUp {
        /// Vehicle name.
        vehicle: String,
        /// Location name.
        location: String,
        /// Package name.
        package: String,
        /// Step cost.
        cost: u32,
    },
    /// Unload a package.
    Drop {
        /// Vehicle name.
        vehicle: String,
        /// Location name.
        location: String,
        /// Package name.
        package: String,
        /// Step cost.
        cost: u32,
    },
    /// Fill the tank.
    Refuel {
        /// Vehicle name.
        vehicle: String,
        /// Location name.
        location: String,
        /// Step cost.
        cost: u32,
    },
}

/// A plan described by names, ready for output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDocument {
    /// Problem the plan solves.
    pub problem: String,
    /// Sum of step costs.
    pub total_cost: u64,
    /// Steps in execution order.
    pub steps: Vec<StepDocument>,
}

impl PlanDocument {
    /// Describe `plan` using the names of `problem`.
    #[must_use]
    pub fn new(plan: &Plan, problem: &Problem) -> Self {
        let graph = problem.graph();
        let location = |id: LocationId| graph.location_name(id).to_owned();
        let package = |id: PackageId| {
            problem
                .package(id)
                .map_or_else(|| id.to_string(), |p| p.name().to_owned())
        };
        let steps = plan
            .actions()
            .iter()
            .map(|action| {
                let vehicle = problem
                    .vehicle(action.vehicle())
                    .map_or_else(|| action.vehicle().to_string(), |v| v.name().to_owned());
                let cost = action.cost();
                match *action.kind() {
                    ActionKind::Drive { from, to, .. } => StepDocument::Drive {
                        vehicle,
                        from: location(from),
                        to: location(to),
                        cost,
                    },
                    ActionKind::PickUp {
                        location: at,
                        package: id,
                    } => StepDocument::PickUp {
                        vehicle,
                        location: location(at),
                        package: package(id),
                        cost,
                    },
                    ActionKind::Drop {
                        location: at,
                        package: id,
                    } => StepDocument::Drop {
                        vehicle,
                        location: location(at),
                        package: package(id),
                        cost,
                    },
                    ActionKind::Refuel { location: at } => StepDocument::Refuel {
                        vehicle,
                        location: location(at),
                        cost,
                    },
                }
            })
            .collect();
        Self {
            problem: problem.name().to_owned(),
            total_cost: plan.total_cost(),
            steps,
        }
    }
}
