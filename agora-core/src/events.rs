use crate::identity::Identity;
use crate::money::Amount;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{error, info};

/// Notifications published as observable side effects of committed
/// operations. Aborted operations publish nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketEvent {
    ProductCreated {
        product_id: u64,
        vendor: Identity,
        name: String,
        unit_price: Amount,
    },
    DiscountCreated {
        discount_id: u64,
        product_id: u64,
        vendor: Identity,
    },
    OrderCreated {
        order_id: u64,
        buyer: Identity,
        total: Amount,
        shipping_address: String,
    },
    OrderApproved {
        order_id: u64,
        approver: Identity,
        approvals: u64,
    },
    OrderFulfilled {
        order_id: u64,
    },
}

/// Sink for market events, consumed by external monitoring.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: MarketEvent);
}

/// Sink that renders each event as JSON through the tracing pipeline.
pub struct LogSink;

impl EventSink for LogSink {
    fn publish(&self, event: MarketEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => info!(target: "agora::events", "{}", payload),
            Err(e) => error!(target: "agora::events", "failed to encode event: {}", e),
        }
    }
}

/// Sink that buffers events in memory so tests can assert on them.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<MarketEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MarketEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: MarketEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_preserves_order() {
        let sink = RecordingSink::new();
        sink.publish(MarketEvent::OrderFulfilled { order_id: 1 });
        sink.publish(MarketEvent::OrderFulfilled { order_id: 2 });

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], MarketEvent::OrderFulfilled { order_id: 1 });
        assert_eq!(events[1], MarketEvent::OrderFulfilled { order_id: 2 });
    }

    #[test]
    fn log_sink_accepts_any_event() {
        LogSink.publish(MarketEvent::OrderFulfilled { order_id: 3 });
    }

    #[test]
    fn events_serialize_with_tag() {
        let event = MarketEvent::OrderFulfilled { order_id: 7 };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"ORDER_FULFILLED\""));
    }
}
