//! Effects of each action kind on a problem snapshot.

use crate::{Action, ActionKind, ApplyError, LocationId, Problem, Vehicle};

pub(super) fn transition(problem: &Problem, action: &Action) -> Result<Problem, ApplyError> {
    let vehicle = problem
        .vehicle(action.vehicle())
        .ok_or(ApplyError::UnknownVehicle {
            vehicle: action.vehicle(),
        })?;
    match *action.kind() {
        ActionKind::Drive {
            road,
            from,
            to,
            fuel,
        } => drive(problem, vehicle, road, from, to, fuel),
        ActionKind::PickUp { location, package } => {
            require_at(vehicle, location)?;
            let parcel = problem
                .package(package)
                .ok_or(ApplyError::UnknownPackage { package })?;
            if parcel.location() != Some(location) {
                return Err(ApplyError::PackageNotAt { package, location });
            }
            let loaded =
                vehicle
                    .with_loaded(package, parcel.size())
                    .ok_or(ApplyError::InsufficientCapacity {
                        vehicle: vehicle.id(),
                        package,
                    })?;
            let mut next = problem.clone();
            next.replace_package(parcel.with_location(None));
            next.replace_vehicle(loaded);
            Ok(next)
        }
        ActionKind::Drop { location, package } => {
            require_at(vehicle, location)?;
            let parcel = problem
                .package(package)
                .ok_or(ApplyError::UnknownPackage { package })?;
            let unloaded =
                vehicle
                    .with_unloaded(package, parcel.size())
                    .ok_or(ApplyError::NotCarried {
                        vehicle: vehicle.id(),
                        package,
                    })?;
            let mut next = problem.clone();
            next.replace_package(parcel.with_location(Some(location)));
            next.replace_vehicle(unloaded);
            Ok(next)
        }
        ActionKind::Refuel { location } => {
            require_at(vehicle, location)?;
            let has_station = problem
                .graph()
                .location(location)
                .is_some_and(crate::Location::has_petrol_station);
            if !has_station {
                return Err(ApplyError::NoPetrolStation { location });
            }
            let tank = vehicle.fuel().ok_or(ApplyError::NoFuelTank {
                vehicle: vehicle.id(),
            })?;
            Ok(problem.with_vehicle(vehicle.with_fuel(Some(tank.refilled()))))
        }
    }
}

fn drive(
    problem: &Problem,
    vehicle: &Vehicle,
    road: crate::RoadId,
    from: LocationId,
    to: LocationId,
    fuel: Option<u32>,
) -> Result<Problem, ApplyError> {
    require_at(vehicle, from)?;
    let joins = problem
        .graph()
        .road(road)
        .is_some_and(|r| r.from() == from && r.to() == to);
    if !joins {
        return Err(ApplyError::UnknownRoad { road });
    }
    let mut moved = vehicle.with_location(to);
    if let (Some(required), Some(tank)) = (fuel, vehicle.fuel()) {
        let burned = tank.burned(required).ok_or(ApplyError::InsufficientFuel {
            vehicle: vehicle.id(),
            required,
            available: tank.current(),
        })?;
        moved = moved.with_fuel(Some(burned));
    }
    Ok(problem.with_vehicle(moved))
}

fn require_at(vehicle: &Vehicle, location: LocationId) -> Result<(), ApplyError> {
    if vehicle.location() == Some(location) {
        Ok(())
    } else {
        Err(ApplyError::VehicleNotAt {
            vehicle: vehicle.id(),
            location,
        })
    }
}
