//! In-process domain event bus.
//!
//! Services publish [`DomainEvent`]s after a change commits. Every event is
//! logged; subscribers (tests, future projections) receive it over a tokio
//! broadcast channel. Publishing never fails: with no subscribers the event
//! is only logged.

use tokio::sync::broadcast;

use websale_core::events::DomainEvent;

const CHANNEL_CAPACITY: usize = 100;

/// Fan-out of domain events to in-process subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Log and broadcast an event.
    pub fn publish(&self, event: DomainEvent) {
        tracing::info!(event = event.name(), payload = ?event, "Domain event");
        // Err only means nobody is listening.
        let _ = self.tx.send(event);
    }

    /// Receive every event published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
