//! Event sink adapters.

use crate::events::AuctionEvent;
use crate::ports::outbound::EventSink;
use parking_lot::RwLock;
use tracing::{info, warn};

/// Records every published event in order.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<AuctionEvent>>,
}

impl InMemoryEventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events so far.
    #[must_use]
    pub fn events(&self) -> Vec<AuctionEvent> {
        self.events.read().clone()
    }

    /// Number of events recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// True if nothing was published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Events whose name matches `name`.
    #[must_use]
    pub fn named(&self, name: &str) -> Vec<AuctionEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.name() == name)
            .cloned()
            .collect()
    }
}

impl EventSink for InMemoryEventLog {
    fn publish(&self, event: &AuctionEvent) {
        self.events.write().push(event.clone());
    }
}

/// Writes each event as a JSON `tracing` record under target `auction_events`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn publish(&self, event: &AuctionEvent) {
        match serde_json::to_string(event) {
            Ok(payload) => info!(target: "auction_events", event = event.name(), %payload),
            Err(e) => warn!(target: "auction_events", event = event.name(), error = %e, "event not serializable"),
        }
    }
}

/// Publishes to several sinks in order.
#[derive(Default)]
pub struct FanoutEventSink {
    sinks: Vec<std::sync::Arc<dyn EventSink>>,
}

impl FanoutEventSink {
    /// Create a fan-out over `sinks`.
    #[must_use]
    pub fn new(sinks: Vec<std::sync::Arc<dyn EventSink>>) -> Self {
        Self { sinks }
    }
}

impl EventSink for FanoutEventSink {
    fn publish(&self, event: &AuctionEvent) {
        for sink in &self.sinks {
            sink.publish(event);
        }
    }
}
