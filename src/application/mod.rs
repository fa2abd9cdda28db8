pub mod dto;
pub mod events;
pub mod layout;

// Re-export key types for convenience
pub use dto::TicketView;
pub use events::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use layout::build_facility;
