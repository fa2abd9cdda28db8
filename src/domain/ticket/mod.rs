//! Parking ticket aggregate
//!
//! A ticket spans the parked interval: issued at entry, completed at exit.

pub mod model;

pub use model::{SpotLabel, Ticket, TicketBuilder, TicketId, TicketStatus, LABELLED_LEVELS};
