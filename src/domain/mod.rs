//! Parking domain: spots, floors, tickets, gates, fees and the facility
//! aggregate that ties them together.

pub mod events;
pub mod facility;
pub mod floor;
pub mod gate;
pub mod spot;
pub mod tariff;
pub mod ticket;
pub mod vehicle;

// Re-export commonly used types
pub use events::{EventMessage, EventSink, ParkingEvent};
pub use facility::{OccupancyReport, ParkingFacility};
pub use floor::{FloorAvailability, ParkingFloor, UnavailabilityReason};
pub use gate::{EntryGate, ExitGate, GateId};
pub use spot::{ParkingSpot, SpotId};
pub use tariff::{billable_hours, FeeBreakdown, FeeSchedule};
pub use ticket::{SpotLabel, Ticket, TicketId, TicketStatus};
pub use vehicle::{Vehicle, VehicleClass, VehicleId};
