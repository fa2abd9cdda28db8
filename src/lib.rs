//! # Parking Facility
//!
//! Spot allocation and ticket lifecycle engine for a multi-floor parking
//! facility.
//!
//! ## Architecture
//!
//! - **domain**: Spots, floors, tickets, gates, the fee schedule and the
//!   facility aggregate
//! - **application**: Layout construction, ticket DTOs and the event bus
//! - **shared**: Error types, clock and identifier sequence
//! - **config**: TOML configuration
//! - **simulation**: Concurrent entry/exit run used by the binaries
//!
//! ```rust,no_run
//! use parking_facility::{build_facility, system_clock, AppConfig, Vehicle, VehicleClass};
//!
//! let config = AppConfig::default();
//! let facility = build_facility(&config.facility, system_clock()).unwrap();
//! let mut ticket = facility
//!     .park_vehicle(&Vehicle::new(VehicleClass::LightMotorVehicle, "KA01AB1234"))
//!     .unwrap();
//! facility.process_exit(&mut ticket).unwrap();
//! println!("{}", ticket);
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod shared;
pub mod simulation;

pub use config::{default_config_path, AppConfig};

pub use application::{build_facility, create_event_bus, EventBus, SharedEventBus, TicketView};
pub use domain::{ParkingFacility, Ticket, Vehicle, VehicleClass};
pub use shared::{system_clock, ManualClock, ParkingError, ParkingResult, SharedClock};
