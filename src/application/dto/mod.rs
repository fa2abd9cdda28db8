//! Data transfer objects

pub mod ticket;

pub use ticket::TicketView;
