//! Parking floor aggregate
//!
//! A floor owns an ordered roster of spots and answers availability queries
//! over it.

pub mod model;

pub use model::{FloorAvailability, FloorId, ParkingFloor, UnavailabilityReason};
