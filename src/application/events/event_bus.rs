//! Event bus for broadcasting parking events to subscribers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::domain::events::{EventMessage, EventSink};

const DEFAULT_CAPACITY: usize = 1024;

/// Event bus for broadcasting events to all subscribers
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            subscriber_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn publish(&self, message: EventMessage) {
        let event_type = message.event.event_type();
        let registration = message.event.registration().to_string();

        match self.sender.send(message) {
            Ok(count) => {
                debug!(event_type, %registration, subscribers = count, "Event published");
            }
            Err(_) => {
                debug!(event_type, %registration, "Event published (no subscribers)");
            }
        }
    }

    pub fn subscribe(&self) -> EventSubscriber {
        let receiver = self.sender.subscribe();
        let count = self.subscriber_count.fetch_add(1, Ordering::SeqCst) + 1;
        info!(total = count, "New event subscriber");

        EventSubscriber {
            receiver,
            subscriber_count: self.subscriber_count.clone(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriber_count.load(Ordering::SeqCst)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventBus {
    fn publish(&self, message: EventMessage) {
        EventBus::publish(self, message);
    }
}

/// Event subscriber that receives events from the bus
pub struct EventSubscriber {
    receiver: broadcast::Receiver<EventMessage>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventSubscriber {
    /// Next message, skipping over any the subscriber lagged behind on.
    /// `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(msg) => return Some(msg),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(missed = count, "Subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return None;
                }
            }
        }
    }

    /// Next message if one is already queued.
    pub fn try_recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.try_recv() {
                Ok(msg) => return Some(msg),
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    warn!(missed = count, "Subscriber lagged");
                    continue;
                }
                Err(_) => return None,
            }
        }
    }
}

impl Drop for EventSubscriber {
    fn drop(&mut self) {
        let prev = self.subscriber_count.fetch_sub(1, Ordering::SeqCst);
        info!(remaining = prev.saturating_sub(1), "Event subscriber disconnected");
    }
}

/// Shared event bus type
pub type SharedEventBus = Arc<EventBus>;

/// Create a shared event bus
pub fn create_event_bus(capacity: usize) -> SharedEventBus {
    Arc::new(EventBus::with_capacity(capacity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::events::{EntryRejectedEvent, ParkingEvent};
    use crate::domain::vehicle::VehicleClass;

    fn rejected(reg: &str) -> EventMessage {
        let now = Utc::now();
        let event = ParkingEvent::EntryRejected(EntryRejectedEvent {
            registration: reg.to_string(),
            class: VehicleClass::TwoWheeler,
            reason: "full".to_string(),
            timestamp: now,
        });
        EventMessage::new(event, now)
    }

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(rejected("TW1"));

        assert_eq!(a.recv().await.unwrap().event.registration(), "TW1");
        assert_eq!(b.recv().await.unwrap().event.registration(), "TW1");

        drop(b);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_dropped() {
        let bus = EventBus::new();
        bus.publish(rejected("TW1"));

        let mut late = bus.subscribe();
        assert!(late.try_recv().is_none());
    }

    #[tokio::test]
    async fn lagging_subscriber_skips_ahead() {
        let bus = EventBus::with_capacity(2);
        let mut sub = bus.subscribe();
        for reg in ["TW1", "TW2", "TW3"] {
            bus.publish(rejected(reg));
        }

        assert_eq!(sub.recv().await.unwrap().event.registration(), "TW2");
        assert_eq!(sub.recv().await.unwrap().event.registration(), "TW3");
    }

    #[tokio::test]
    async fn recv_ends_when_bus_dropped() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();
        drop(bus);
        assert!(sub.recv().await.is_none());
    }

    #[test]
    fn bus_works_as_facility_sink() {
        let bus = create_event_bus(8);
        let mut sub = bus.subscribe();
        let sink: Arc<dyn EventSink> = bus.clone();
        sink.publish(rejected("TW9"));
        assert_eq!(sub.try_recv().unwrap().event.event_type(), "entry_rejected");
    }
}
