//! Parking spot domain entity

use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::vehicle::{Vehicle, VehicleClass, VehicleId};
use crate::shared::errors::{ParkingError, ParkingResult};

/// Spot identifier. The number is unique within one facility and is the
/// ordinal printed in ticket labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpotId(u32);

impl SpotId {
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    pub fn number(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parking-spot-{}", self.0)
    }
}

/// Single-occupancy spot for exactly one vehicle class.
///
/// The occupant lives behind a mutex; "is it free" and "take it" happen in the
/// same critical section. The occupancy flag is derived from the occupant, so
/// the two can never disagree.
#[derive(Debug)]
pub struct ParkingSpot {
    id: SpotId,
    supported_class: VehicleClass,
    occupant: Mutex<Option<Vehicle>>,
}

impl ParkingSpot {
    pub fn new(id: SpotId, supported_class: VehicleClass) -> Self {
        Self {
            id,
            supported_class,
            occupant: Mutex::new(None),
        }
    }

    pub fn id(&self) -> SpotId {
        self.id
    }

    pub fn supported_class(&self) -> VehicleClass {
        self.supported_class
    }

    pub fn can_accommodate(&self, class: VehicleClass) -> bool {
        self.supported_class == class
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.lock().is_some()
    }

    /// Snapshot of the parked vehicle, if any.
    pub fn parked_vehicle(&self) -> Option<Vehicle> {
        self.occupant.lock().clone()
    }

    /// Park `vehicle` here.
    ///
    /// Fails with `AlreadyOccupied` when another vehicle holds the spot and
    /// with `InvalidVehicle` when the vehicle's class is not the spot's class.
    pub fn occupy(&self, vehicle: &Vehicle) -> ParkingResult<()> {
        let mut occupant = self.occupant.lock();
        if occupant.is_some() {
            return Err(ParkingError::AlreadyOccupied {
                spot: self.id.to_string(),
            });
        }
        if !self.can_accommodate(vehicle.class()) {
            return Err(ParkingError::InvalidVehicle(format!(
                "{} vehicle {} cannot park in {} spot {}",
                vehicle.class(),
                vehicle.registration(),
                self.supported_class,
                self.id
            )));
        }
        *occupant = Some(vehicle.clone());
        debug!(spot = %self.id, vehicle_id = %vehicle.id(), "Spot occupied");
        Ok(())
    }

    /// Free the spot, returning the vehicle that was parked.
    pub fn release(&self) -> ParkingResult<Vehicle> {
        let mut occupant = self.occupant.lock();
        let vehicle = occupant.take().ok_or_else(|| ParkingError::AlreadyEmpty {
            spot: self.id.to_string(),
        })?;
        debug!(spot = %self.id, vehicle_id = %vehicle.id(), "Spot released");
        Ok(vehicle)
    }

    /// Free the spot only if `vehicle_id` is the one parked here.
    ///
    /// A different occupant means the presented ticket does not belong to
    /// this spot; the spot is left untouched and `InvalidTicket` is returned.
    pub fn release_vehicle(&self, vehicle_id: VehicleId) -> ParkingResult<Vehicle> {
        let mut occupant = self.occupant.lock();
        match occupant.as_ref() {
            None => Err(ParkingError::AlreadyEmpty {
                spot: self.id.to_string(),
            }),
            Some(parked) if parked.id() != vehicle_id => Err(ParkingError::InvalidTicket(
                format!("{} is held by a different vehicle", self.id),
            )),
            Some(_) => {
                let vehicle = occupant.take().ok_or_else(|| ParkingError::AlreadyEmpty {
                    spot: self.id.to_string(),
                })?;
                debug!(spot = %self.id, vehicle_id = %vehicle_id, "Spot released");
                Ok(vehicle)
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
