//! Parking floor domain entity

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::spot::{ParkingSpot, SpotId};
use crate::domain::vehicle::VehicleClass;
use crate::shared::errors::{ParkingError, ParkingResult};

/// Unique floor identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FloorId(Uuid);

impl FloorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FloorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FloorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a floor has been taken out of service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailabilityReason {
    UnderMaintenance,
    Full,
    Reserved,
    Closed,
}

impl fmt::Display for UnavailabilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnderMaintenance => write!(f, "Under maintenance"),
            Self::Full => write!(f, "Full"),
            Self::Reserved => write!(f, "Reserved"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

/// Administrative availability of a floor. Independent of spot occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorAvailability {
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<UnavailabilityReason>,
}

impl FloorAvailability {
    pub fn available() -> Self {
        Self {
            is_available: true,
            reason: None,
        }
    }

    pub fn unavailable(reason: Option<UnavailabilityReason>) -> Self {
        Self {
            is_available: false,
            reason,
        }
    }
}

impl Default for FloorAvailability {
    fn default() -> Self {
        Self::available()
    }
}

/// Parking floor entity
#[derive(Debug)]
pub struct ParkingFloor {
    id: FloorId,
    /// Level number, 1-based. Level 1 prints as `A` on tickets.
    level: u32,
    availability: RwLock<FloorAvailability>,
    spots: Vec<Arc<ParkingSpot>>,
}

impl ParkingFloor {
    pub fn new(level: u32) -> Self {
        Self {
            id: FloorId::new(),
            level,
            availability: RwLock::new(FloorAvailability::available()),
            spots: Vec::new(),
        }
    }

    /// Floor that starts out of service
    pub fn unavailable(level: u32, reason: Option<UnavailabilityReason>) -> Self {
        let floor = Self::new(level);
        *floor.availability.write() = FloorAvailability::unavailable(reason);
        floor
    }

    pub fn id(&self) -> FloorId {
        self.id
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn spots(&self) -> &[Arc<ParkingSpot>] {
        &self.spots
    }

    pub fn spot(&self, id: SpotId) -> Option<&Arc<ParkingSpot>> {
        self.spots.iter().find(|s| s.id() == id)
    }

    pub fn floor_availability(&self) -> FloorAvailability {
        *self.availability.read()
    }

    pub fn is_available(&self) -> bool {
        self.availability.read().is_available
    }

    /// Open or close the floor. The reason is dropped when opening.
    pub fn set_availability(&self, is_available: bool, reason: Option<UnavailabilityReason>) {
        let next = if is_available {
            FloorAvailability::available()
        } else {
            FloorAvailability::unavailable(reason)
        };
        *self.availability.write() = next;
    }

    fn matches(spot: &ParkingSpot, filter: Option<VehicleClass>) -> bool {
        filter.map_or(true, |class| spot.can_accommodate(class))
    }

    /// Free spots, optionally limited to one class, in roster order.
    ///
    /// The result is a snapshot: a returned spot may be taken by the time the
    /// caller tries to occupy it, and `occupy` re-checks under the spot lock.
    pub fn available_spots(&self, filter: Option<VehicleClass>) -> Vec<Arc<ParkingSpot>> {
        self.spots
            .iter()
            .filter(|s| !s.is_occupied() && Self::matches(s, filter))
            .cloned()
            .collect()
    }

    pub fn first_available_spot(&self, filter: Option<VehicleClass>) -> Option<Arc<ParkingSpot>> {
        self.spots
            .iter()
            .find(|s| !s.is_occupied() && Self::matches(s, filter))
            .cloned()
    }

    pub fn available_spot_count(&self, filter: Option<VehicleClass>) -> usize {
        self.spots
            .iter()
            .filter(|s| !s.is_occupied() && Self::matches(s, filter))
            .count()
    }

    /// Total spots on the floor, optionally limited to one class.
    pub fn spot_count(&self, filter: Option<VehicleClass>) -> usize {
        self.spots.iter().filter(|s| Self::matches(s, filter)).count()
    }

    /// Replace the spot roster wholesale.
    ///
    /// Fails with `InvalidAssignment` if the roster lists the same spot id
    /// twice; the current roster is kept in that case.
    pub fn assign_spots(&mut self, spots: Vec<Arc<ParkingSpot>>) -> ParkingResult<()> {
        let mut seen = HashSet::with_capacity(spots.len());
        for spot in &spots {
            if !seen.insert(spot.id()) {
                return Err(ParkingError::InvalidAssignment(format!(
                    "{} listed twice on floor level {}",
                    spot.id(),
                    self.level
                )));
            }
        }
        self.spots = spots;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vehicle::Vehicle;

    fn spot(n: u32, class: VehicleClass) -> Arc<ParkingSpot> {
        Arc::new(ParkingSpot::new(SpotId::new(n), class))
    }

    fn mixed_floor() -> ParkingFloor {
        let mut floor = ParkingFloor::new(1);
        floor
            .assign_spots(vec![
                spot(1, VehicleClass::LightMotorVehicle),
                spot(2, VehicleClass::TwoWheeler),
                spot(3, VehicleClass::LightMotorVehicle),
                spot(4, VehicleClass::ElectricVehicle),
            ])
            .unwrap();
        floor
    }

    #[test]
    fn new_floor_is_available_and_empty() {
        let floor = ParkingFloor::new(2);
        assert_eq!(floor.level(), 2);
        assert_eq!(floor.floor_availability(), FloorAvailability::available());
        assert!(floor.spots().is_empty());
        assert!(floor.first_available_spot(None).is_none());
    }

    #[test]
    fn available_spots_filters_by_class_in_order() {
        let floor = mixed_floor();
        let lmv: Vec<u32> = floor
            .available_spots(Some(VehicleClass::LightMotorVehicle))
            .iter()
            .map(|s| s.id().number())
            .collect();
        assert_eq!(lmv, vec![1, 3]);
        assert_eq!(floor.available_spots(None).len(), 4);
        assert_eq!(floor.available_spot_count(Some(VehicleClass::HeavyMotorVehicle)), 0);
    }

    #[test]
    fn occupied_spots_are_skipped() {
        let floor = mixed_floor();
        let car = Vehicle::new(VehicleClass::LightMotorVehicle, "A1");
        floor.spots()[0].occupy(&car).unwrap();

        let first = floor
            .first_available_spot(Some(VehicleClass::LightMotorVehicle))
            .unwrap();
        assert_eq!(first.id().number(), 3);
        assert_eq!(floor.available_spot_count(Some(VehicleClass::LightMotorVehicle)), 1);
        assert_eq!(floor.available_spot_count(None), 3);
        assert_eq!(floor.spot_count(Some(VehicleClass::LightMotorVehicle)), 2);
    }

    #[test]
    fn availability_is_independent_of_occupancy() {
        let floor = mixed_floor();
        floor.set_availability(false, Some(UnavailabilityReason::UnderMaintenance));
        let availability = floor.floor_availability();
        assert!(!availability.is_available);
        assert_eq!(availability.reason, Some(UnavailabilityReason::UnderMaintenance));
        assert_eq!(floor.available_spot_count(None), 4);

        floor.set_availability(true, Some(UnavailabilityReason::Full));
        assert_eq!(floor.floor_availability(), FloorAvailability::available());
    }

    #[test]
    fn assign_spots_replaces_roster() {
        let mut floor = mixed_floor();
        floor
            .assign_spots(vec![spot(10, VehicleClass::HeavyMotorVehicle)])
            .unwrap();
        assert_eq!(floor.spots().len(), 1);
        assert!(floor.spot(SpotId::new(10)).is_some());
        assert!(floor.spot(SpotId::new(1)).is_none());
    }

    #[test]
    fn assign_spots_rejects_duplicates() {
        let mut floor = mixed_floor();
        let dup = spot(7, VehicleClass::TwoWheeler);
        let err = floor.assign_spots(vec![dup.clone(), dup]).unwrap_err();
        assert!(matches!(err, ParkingError::InvalidAssignment(_)));
        assert_eq!(floor.spots().len(), 4);
    }

    #[test]
    fn unavailable_constructor() {
        let floor = ParkingFloor::unavailable(3, Some(UnavailabilityReason::Closed));
        assert!(!floor.is_available());
        assert_eq!(floor.floor_availability().reason, Some(UnavailabilityReason::Closed));
    }
}
