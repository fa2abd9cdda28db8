//! Occupancy snapshot

use serde::{Deserialize, Serialize};

use crate::domain::floor::{ParkingFloor, UnavailabilityReason};
use crate::domain::vehicle::VehicleClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassOccupancy {
    pub class: VehicleClass,
    pub free: usize,
    pub total: usize,
}

impl ClassOccupancy {
    pub fn occupied(&self) -> usize {
        self.total - self.free
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorOccupancy {
    pub level: u32,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<UnavailabilityReason>,
    pub classes: Vec<ClassOccupancy>,
}

impl FloorOccupancy {
    pub(crate) fn of(floor: &ParkingFloor) -> Self {
        let availability = floor.floor_availability();
        let classes = VehicleClass::ALL
            .iter()
            .map(|&class| ClassOccupancy {
                class,
                free: floor.available_spot_count(Some(class)),
                total: floor.spot_count(Some(class)),
            })
            .filter(|c| c.total > 0)
            .collect();

        Self {
            level: floor.level(),
            is_available: availability.is_available,
            reason: availability.reason,
            classes,
        }
    }

    pub fn free(&self) -> usize {
        self.classes.iter().map(|c| c.free).sum()
    }

    pub fn total(&self) -> usize {
        self.classes.iter().map(|c| c.total).sum()
    }
}

/// Point-in-time free/total counts per floor and class.
///
/// Each spot is read independently, so under concurrent traffic the counts
/// may not add up to a single consistent instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyReport {
    pub is_open: bool,
    pub floors: Vec<FloorOccupancy>,
}

impl OccupancyReport {
    pub fn free(&self) -> usize {
        self.floors.iter().map(FloorOccupancy::free).sum()
    }

    pub fn total(&self) -> usize {
        self.floors.iter().map(FloorOccupancy::total).sum()
    }

    /// Free spots of `class` across all floors, regardless of floor status
    pub fn free_for(&self, class: VehicleClass) -> usize {
        self.floors
            .iter()
            .flat_map(|f| f.classes.iter())
            .filter(|c| c.class == class)
            .map(|c| c.free)
            .sum()
    }
}
