//! Parking fee schedule

pub mod model;

pub use model::{billable_hours, FeeBreakdown, FeeRate, FeeSchedule, BASE_HOURS};
