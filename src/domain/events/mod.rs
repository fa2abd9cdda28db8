//! Domain events
//!
//! Event types that represent facts about what happened in the facility.
//! The broadcast implementation lives in `application::events`.

pub mod types;

pub use types::{
    EntryRejectedEvent, EventMessage, EventSink, ParkingEvent, VehicleExitedEvent,
    VehicleParkedEvent,
};
