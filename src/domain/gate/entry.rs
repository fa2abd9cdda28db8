//! Entry gate: spot allocation and ticket issuance

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::model::{GateId, OperationalFlag};
use crate::domain::floor::ParkingFloor;
use crate::domain::spot::ParkingSpot;
use crate::domain::ticket::Ticket;
use crate::domain::vehicle::Vehicle;
use crate::shared::clock::{system_clock, SharedClock};
use crate::shared::errors::{ParkingError, ParkingResult};

#[derive(Debug)]
pub struct EntryGate {
    id: GateId,
    operational: OperationalFlag,
    clock: SharedClock,
}

impl EntryGate {
    pub fn new(is_operational: bool) -> Self {
        Self {
            id: GateId::new(),
            operational: OperationalFlag::new(is_operational),
            clock: system_clock(),
        }
    }

    /// Use `clock` for entry timestamps.
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn id(&self) -> GateId {
        self.id
    }

    pub fn is_operational(&self) -> bool {
        self.operational.get()
    }

    pub fn set_operational(&self, is_operational: bool) {
        self.operational.set(is_operational);
        info!(gate_id = %self.id, is_operational, "Entry gate status changed");
    }

    /// Park `vehicle` on `floor` and issue its ticket.
    ///
    /// The spot is claimed under its own lock; if another caller wins the
    /// race for a candidate, the next free spot of the same class is tried.
    /// Should the ticket fail to build, the claimed spot is released before
    /// the error is returned. The gate's own operational flag is not checked
    /// here; facility queries skip non-operational gates.
    pub fn register_entry(
        &self,
        vehicle: &Vehicle,
        floor: &Arc<ParkingFloor>,
    ) -> ParkingResult<Ticket> {
        vehicle.validate()?;

        let spot = self.claim_spot(vehicle, floor)?;

        let issued = Ticket::builder()
            .vehicle(vehicle.clone())
            .floor(floor.clone())
            .spot(spot.clone())
            .issue_at(self.clock.now());

        match issued {
            Ok(ticket) => {
                info!(
                    gate_id = %self.id,
                    ticket_id = %ticket.id(),
                    registration = vehicle.registration(),
                    class = %vehicle.class(),
                    spot = %ticket.spot_label(),
                    "Vehicle entry registered"
                );
                Ok(ticket)
            }
            Err(e) => {
                warn!(
                    gate_id = %self.id,
                    spot = %spot.id(),
                    error = %e,
                    "Ticket issue failed, releasing spot"
                );
                if let Err(release_err) = spot.release_vehicle(vehicle.id()) {
                    error!(
                        spot = %spot.id(),
                        error = %release_err,
                        "Failed to release spot after ticket issue failure"
                    );
                }
                Err(e)
            }
        }
    }

    fn claim_spot(
        &self,
        vehicle: &Vehicle,
        floor: &ParkingFloor,
    ) -> ParkingResult<Arc<ParkingSpot>> {
        let class = vehicle.class();
        for spot in floor.available_spots(Some(class)) {
            match spot.occupy(vehicle) {
                Ok(()) => return Ok(spot),
                Err(e) if e.is_contention() => {
                    debug!(spot = %spot.id(), "Spot taken concurrently, trying next");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
        Err(ParkingError::NoSpotAvailable { class })
    }
}

impl Default for EntryGate {
    fn default() -> Self {
        Self::new(true)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::spot::SpotId;
    use crate::domain::vehicle::VehicleClass;
    use crate::shared::clock::ManualClock;
    use chrono::{TimeZone, Utc};

    fn floor(level: u32, classes: &[VehicleClass]) -> Arc<ParkingFloor> {
        let mut floor = ParkingFloor::new(level);
        let spots = classes
            .iter()
            .enumerate()
            .map(|(i, c)| Arc::new(ParkingSpot::new(SpotId::new(i as u32 + 1), *c)))
            .collect();
        floor.assign_spots(spots).unwrap();
        Arc::new(floor)
    }

    #[test]
    fn gate_operational_flag() {
        let gate = EntryGate::new(true);
        assert!(gate.is_operational());
        gate.set_operational(false);
        assert!(!gate.is_operational());
        assert!(!EntryGate::new(false).is_operational());
    }

    #[test]
    fn entry_issues_ticket_for_matching_spot() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let gate = EntryGate::default().with_clock(Arc::new(ManualClock::new(start)));
        let floor = floor(
            1,
            &[VehicleClass::TwoWheeler, VehicleClass::LightMotorVehicle],
        );
        let car = Vehicle::new(VehicleClass::LightMotorVehicle, "KA01AB1234");

        let ticket = gate.register_entry(&car, &floor).unwrap();

        assert_eq!(ticket.vehicle(), &car);
        assert_eq!(ticket.spot().id(), SpotId::new(2));
        assert_eq!(ticket.spot().supported_class(), car.class());
        assert_eq!(ticket.spot_label().as_str(), "A2");
        assert_eq!(ticket.entry_time(), start);
        assert!(ticket.spot().is_occupied());
        assert_eq!(ticket.spot().parked_vehicle(), Some(car));
        assert!(Arc::ptr_eq(ticket.floor(), &floor));
    }

    #[test]
    fn entry_without_matching_spot_names_class() {
        let gate = EntryGate::default();
        let floor = floor(1, &[VehicleClass::LightMotorVehicle]);
        let truck = Vehicle::new(VehicleClass::HeavyMotorVehicle, "KA01HM1234");

        let err = gate.register_entry(&truck, &floor).unwrap_err();

        assert_eq!(
            err,
            ParkingError::NoSpotAvailable {
                class: VehicleClass::HeavyMotorVehicle
            }
        );
        assert!(err.to_string().contains("HMV"));
        assert!(!floor.spots()[0].is_occupied());
    }

    #[test]
    fn entry_fills_spots_in_order_then_fails() {
        let gate = EntryGate::default();
        let floor = floor(2, &[VehicleClass::TwoWheeler, VehicleClass::TwoWheeler]);

        let a = gate
            .register_entry(&Vehicle::new(VehicleClass::TwoWheeler, "TW1"), &floor)
            .unwrap();
        let b = gate
            .register_entry(&Vehicle::new(VehicleClass::TwoWheeler, "TW2"), &floor)
            .unwrap();
        assert_eq!(a.spot_label().as_str(), "B1");
        assert_eq!(b.spot_label().as_str(), "B2");

        let err = gate
            .register_entry(&Vehicle::new(VehicleClass::TwoWheeler, "TW3"), &floor)
            .unwrap_err();
        assert!(matches!(err, ParkingError::NoSpotAvailable { .. }));
    }

    #[test]
    fn invalid_vehicle_is_rejected_before_allocation() {
        let gate = EntryGate::default();
        let floor = floor(1, &[VehicleClass::LightMotorVehicle]);
        let err = gate
            .register_entry(&Vehicle::new(VehicleClass::LightMotorVehicle, ""), &floor)
            .unwrap_err();
        assert!(matches!(err, ParkingError::InvalidVehicle(_)));
        assert!(!floor.spots()[0].is_occupied());
    }

    #[test]
    fn failed_ticket_issue_releases_spot() {
        // Level 27 has no label letter, so the ticket cannot be built.
        let gate = EntryGate::default();
        let floor = floor(27, &[VehicleClass::ElectricVehicle]);
        let ev = Vehicle::new(VehicleClass::ElectricVehicle, "KA01EV1234");

        let err = gate.register_entry(&ev, &floor).unwrap_err();

        assert!(matches!(err, ParkingError::TicketIssue(_)));
        assert!(!floor.spots()[0].is_occupied());
        assert_eq!(floor.available_spot_count(Some(VehicleClass::ElectricVehicle)), 1);
    }
}
