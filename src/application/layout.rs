//! Facility construction from configuration
//!
//! Builds `floors` levels numbered from 1, each with the configured spot
//! count per class in [`VehicleClass::ALL`] order, plus the gates. Spot
//! numbers come from one sequence per facility and run across floors.

use std::sync::Arc;

use tracing::info;

use crate::config::{FacilityConfig, MAX_SPOTS_PER_FLOOR};
use crate::domain::facility::ParkingFacility;
use crate::domain::floor::ParkingFloor;
use crate::domain::gate::{EntryGate, ExitGate};
use crate::domain::spot::{ParkingSpot, SpotId};
use crate::domain::vehicle::VehicleClass;
use crate::shared::clock::SharedClock;
use crate::shared::errors::{ParkingError, ParkingResult};
use crate::shared::id::IdSequence;

pub fn build_facility(config: &FacilityConfig, clock: SharedClock) -> ParkingResult<ParkingFacility> {
    let ids = IdSequence::new();

    let floors = (1..=config.floors)
        .map(|level| build_floor(level, config, &ids).map(Arc::new))
        .collect::<ParkingResult<Vec<_>>>()?;

    let entry_gates = (0..config.entry_gates)
        .map(|_| Arc::new(EntryGate::new(true).with_clock(clock.clone())))
        .collect();
    let exit_gates = (0..config.exit_gates)
        .map(|_| Arc::new(ExitGate::new(true).with_clock(clock.clone())))
        .collect();

    let mut facility = ParkingFacility::new(config.open).with_clock(clock);
    facility.assign_floors(floors)?;
    facility.assign_entry_gates(entry_gates)?;
    facility.assign_exit_gates(exit_gates)?;

    info!(
        facility_id = %facility.id(),
        floors = config.floors,
        spots = ids.peek() - 1,
        entry_gates = config.entry_gates,
        exit_gates = config.exit_gates,
        "Facility built"
    );

    Ok(facility)
}

fn build_floor(level: u32, config: &FacilityConfig, ids: &IdSequence) -> ParkingResult<ParkingFloor> {
    let total = config.spots_per_floor.total();
    if total > MAX_SPOTS_PER_FLOOR {
        return Err(ParkingError::InvalidAssignment(format!(
            "{} spots on floor level {}, at most {} allowed",
            total, level, MAX_SPOTS_PER_FLOOR
        )));
    }

    let mut floor = ParkingFloor::new(level);
    let mut spots = Vec::with_capacity(total as usize);
    for class in VehicleClass::ALL {
        for _ in 0..config.spots_per_floor.count(class) {
            spots.push(Arc::new(ParkingSpot::new(SpotId::new(ids.next()), class)));
        }
    }
    floor.assign_spots(spots)?;
    Ok(floor)
}
