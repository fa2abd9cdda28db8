//! Entry and exit gates
//!
//! Gates are stateless request handlers apart from their operational flag:
//! the entry gate claims a spot and issues a ticket, the exit gate prices the
//! stay, settles the ticket and frees the spot.

pub mod entry;
pub mod exit;
pub mod model;

pub use entry::EntryGate;
pub use exit::ExitGate;
pub use model::{GateId, OperationalFlag};
