//! Parking facility aggregate
//!
//! Registry of floors and gates plus the `park_vehicle` / `process_exit`
//! wrappers callers use instead of driving gates directly.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::occupancy::{FloorOccupancy, OccupancyReport};
use crate::domain::events::{
    EntryRejectedEvent, EventMessage, EventSink, ParkingEvent, VehicleExitedEvent,
    VehicleParkedEvent,
};
use crate::domain::floor::ParkingFloor;
use crate::domain::gate::{EntryGate, ExitGate, GateId};
use crate::domain::ticket::{Ticket, LABELLED_LEVELS};
use crate::domain::vehicle::{Vehicle, VehicleClass};
use crate::shared::clock::{system_clock, SharedClock};
use crate::shared::errors::{GateKind, ParkingError, ParkingResult};

/// Unique facility identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacilityId(Uuid);

impl FacilityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FacilityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FacilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Top-level aggregate: floors, entry gates and exit gates.
///
/// Rosters are assigned at startup through `&mut self` and read-only after
/// the facility is shared. All per-vehicle state lives in spots and tickets.
#[derive(Debug)]
pub struct ParkingFacility {
    id: FacilityId,
    open: AtomicBool,
    floors: Vec<Arc<ParkingFloor>>,
    entry_gates: Vec<Arc<EntryGate>>,
    exit_gates: Vec<Arc<ExitGate>>,
    clock: SharedClock,
    events: Option<Arc<dyn EventSink>>,
}

impl ParkingFacility {
    pub fn new(is_open: bool) -> Self {
        Self {
            id: FacilityId::new(),
            open: AtomicBool::new(is_open),
            floors: Vec::new(),
            entry_gates: Vec::new(),
            exit_gates: Vec::new(),
            clock: system_clock(),
            events: None,
        }
    }

    /// Clock used to timestamp published events and their envelopes
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn id(&self) -> FacilityId {
        self.id
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
        info!(facility_id = %self.id, "Facility opened");
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        info!(facility_id = %self.id, "Facility closed");
    }

    pub fn floors(&self) -> &[Arc<ParkingFloor>] {
        &self.floors
    }

    pub fn entry_gates(&self) -> &[Arc<EntryGate>] {
        &self.entry_gates
    }

    pub fn exit_gates(&self) -> &[Arc<ExitGate>] {
        &self.exit_gates
    }

    // ── Roster assignment ──────────────────────────────────────

    /// Replace the floor roster wholesale.
    ///
    /// Rejects rosters where a floor level has no label letter, two floors
    /// share an id or a level, or a spot id appears on more than one floor.
    /// The current roster is kept on failure.
    pub fn assign_floors(&mut self, floors: Vec<Arc<ParkingFloor>>) -> ParkingResult<()> {
        let mut ids = HashSet::with_capacity(floors.len());
        let mut levels = HashSet::with_capacity(floors.len());
        let mut spots = HashSet::new();

        for floor in &floors {
            if !LABELLED_LEVELS.contains(&floor.level()) {
                return Err(ParkingError::InvalidAssignment(format!(
                    "floor level {} is outside {}..={}",
                    floor.level(),
                    LABELLED_LEVELS.start(),
                    LABELLED_LEVELS.end()
                )));
            }
            if !ids.insert(floor.id()) {
                return Err(ParkingError::InvalidAssignment(format!(
                    "floor {} listed twice",
                    floor.id()
                )));
            }
            if !levels.insert(floor.level()) {
                return Err(ParkingError::InvalidAssignment(format!(
                    "more than one floor at level {}",
                    floor.level()
                )));
            }
            for spot in floor.spots() {
                if !spots.insert(spot.id()) {
                    return Err(ParkingError::InvalidAssignment(format!(
                        "{} is shared between floors",
                        spot.id()
                    )));
                }
            }
        }

        debug!(facility_id = %self.id, floors = floors.len(), "Floors assigned");
        self.floors = floors;
        Ok(())
    }

    pub fn assign_entry_gates(&mut self, gates: Vec<Arc<EntryGate>>) -> ParkingResult<()> {
        ensure_unique_gates(gates.iter().map(|g| g.id()), GateKind::Entry)?;
        debug!(facility_id = %self.id, gates = gates.len(), "Entry gates assigned");
        self.entry_gates = gates;
        Ok(())
    }

    pub fn assign_exit_gates(&mut self, gates: Vec<Arc<ExitGate>>) -> ParkingResult<()> {
        ensure_unique_gates(gates.iter().map(|g| g.id()), GateKind::Exit)?;
        debug!(facility_id = %self.id, gates = gates.len(), "Exit gates assigned");
        self.exit_gates = gates;
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────

    /// Floors that are administratively available and, when a class is
    /// given, have at least one free spot of that class. Registration order.
    pub fn available_floors(&self, filter: Option<VehicleClass>) -> Vec<Arc<ParkingFloor>> {
        self.floors
            .iter()
            .filter(|f| Self::floor_accepts(f, filter))
            .cloned()
            .collect()
    }

    pub fn available_floor(&self, filter: Option<VehicleClass>) -> Option<Arc<ParkingFloor>> {
        self.floors
            .iter()
            .find(|f| Self::floor_accepts(f, filter))
            .cloned()
    }

    fn floor_accepts(floor: &ParkingFloor, filter: Option<VehicleClass>) -> bool {
        floor.is_available()
            && filter.map_or(true, |class| floor.first_available_spot(Some(class)).is_some())
    }

    pub fn available_entry_gate(&self) -> Option<Arc<EntryGate>> {
        self.entry_gates
            .iter()
            .find(|g| g.is_operational())
            .cloned()
    }

    pub fn available_exit_gate(&self) -> Option<Arc<ExitGate>> {
        self.exit_gates
            .iter()
            .find(|g| g.is_operational())
            .cloned()
    }

    pub fn occupancy(&self) -> OccupancyReport {
        OccupancyReport {
            is_open: self.is_open(),
            floors: self.floors.iter().map(|f| FloorOccupancy::of(f)).collect(),
        }
    }

    // ── Entry / exit ───────────────────────────────────────────

    /// Park `vehicle` on the first floor with a free spot of its class,
    /// through the first operational entry gate.
    ///
    /// If the chosen floor's last matching spot is taken concurrently before
    /// the gate claims it, the next qualifying floor is tried.
    pub fn park_vehicle(&self, vehicle: &Vehicle) -> ParkingResult<Ticket> {
        let result = self.try_park(vehicle);

        match &result {
            Ok(ticket) => self.publish(ParkingEvent::VehicleParked(VehicleParkedEvent {
                ticket_id: ticket.id().to_string(),
                registration: vehicle.registration().to_string(),
                class: vehicle.class(),
                spot_label: ticket.spot_label().to_string(),
                floor_level: ticket.floor().level(),
                timestamp: ticket.entry_time(),
            })),
            Err(e) => {
                warn!(
                    facility_id = %self.id,
                    registration = vehicle.registration(),
                    class = %vehicle.class(),
                    error = %e,
                    "Entry rejected"
                );
                self.publish(ParkingEvent::EntryRejected(EntryRejectedEvent {
                    registration: vehicle.registration().to_string(),
                    class: vehicle.class(),
                    reason: e.to_string(),
                    timestamp: self.clock.now(),
                }));
            }
        }

        result
    }

    fn try_park(&self, vehicle: &Vehicle) -> ParkingResult<Ticket> {
        self.ensure_open()?;

        let class = vehicle.class();
        let floors = self.available_floors(Some(class));
        if floors.is_empty() {
            return Err(ParkingError::NoFloorAvailable { class });
        }

        let gate = self
            .available_entry_gate()
            .ok_or(ParkingError::NoGateAvailable(GateKind::Entry))?;

        for floor in &floors {
            match gate.register_entry(vehicle, floor) {
                Err(ParkingError::NoSpotAvailable { .. }) => {
                    debug!(level = floor.level(), %class, "Floor filled up, trying next");
                    continue;
                }
                other => return other,
            }
        }

        Err(ParkingError::NoSpotAvailable { class })
    }

    /// Settle `ticket` through the first operational exit gate.
    pub fn process_exit<'t>(&self, ticket: &'t mut Ticket) -> ParkingResult<&'t Ticket> {
        self.ensure_open()?;

        let gate = self
            .available_exit_gate()
            .ok_or(ParkingError::NoGateAvailable(GateKind::Exit))?;

        let ticket = gate.register_exit(ticket)?;

        if let (Some(exit_time), Some(fee)) = (ticket.exit_time(), ticket.fee()) {
            self.publish(ParkingEvent::VehicleExited(VehicleExitedEvent {
                ticket_id: ticket.id().to_string(),
                registration: ticket.vehicle().registration().to_string(),
                class: ticket.vehicle().class(),
                spot_label: ticket.spot_label().to_string(),
                hours: fee.hours,
                price: fee.total,
                timestamp: exit_time,
            }));
        }

        Ok(ticket)
    }

    fn ensure_open(&self) -> ParkingResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(ParkingError::FacilityClosed(self.id.to_string()))
        }
    }

    fn publish(&self, event: ParkingEvent) {
        if let Some(events) = &self.events {
            events.publish(EventMessage::new(event, self.clock.now()));
        }
    }
}

impl Default for ParkingFacility {
    fn default() -> Self {
        Self::new(true)
    }
}

fn ensure_unique_gates(
    ids: impl Iterator<Item = GateId>,
    kind: GateKind,
) -> ParkingResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ParkingError::InvalidAssignment(format!(
                "{} gate {} listed twice",
                kind, id
            )));
        }
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────
