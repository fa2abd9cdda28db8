//! Facility aggregate and occupancy reporting

pub mod model;
pub mod occupancy;

pub use model::{FacilityId, ParkingFacility};
pub use occupancy::{ClassOccupancy, FloorOccupancy, OccupancyReport};
