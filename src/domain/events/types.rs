//! Parking events
//!
//! Facts the facility broadcasts after a successful entry or exit, or when
//! an entry is turned away.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::vehicle::VehicleClass;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ParkingEvent {
    VehicleParked(VehicleParkedEvent),
    VehicleExited(VehicleExitedEvent),
    EntryRejected(EntryRejectedEvent),
}

impl ParkingEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            ParkingEvent::VehicleParked(_) => "vehicle_parked",
            ParkingEvent::VehicleExited(_) => "vehicle_exited",
            ParkingEvent::EntryRejected(_) => "entry_rejected",
        }
    }

    pub fn registration(&self) -> &str {
        match self {
            ParkingEvent::VehicleParked(e) => &e.registration,
            ParkingEvent::VehicleExited(e) => &e.registration,
            ParkingEvent::EntryRejected(e) => &e.registration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleParkedEvent {
    pub ticket_id: String,
    pub registration: String,
    pub class: VehicleClass,
    pub spot_label: String,
    pub floor_level: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleExitedEvent {
    pub ticket_id: String,
    pub registration: String,
    pub class: VehicleClass,
    pub spot_label: String,
    pub hours: i64,
    pub price: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRejectedEvent {
    pub registration: String,
    pub class: VehicleClass,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

/// Event envelope as delivered to subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub published_at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: ParkingEvent,
}

impl EventMessage {
    /// `published_at` comes from the publisher's clock.
    pub fn new(event: ParkingEvent, published_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            published_at,
            event,
        }
    }
}

/// Outlet the facility publishes into. Implemented by the application's
/// event bus.
pub trait EventSink: std::fmt::Debug + Send + Sync {
    fn publish(&self, message: EventMessage);
}
