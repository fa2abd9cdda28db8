//! Vehicle aggregate
//!
//! Vehicle identity and the closed set of vehicle classes that drive spot
//! compatibility and fees.

pub mod model;

pub use model::{Vehicle, VehicleClass, VehicleId};
