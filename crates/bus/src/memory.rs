//! In-memory message bus for tests and demos.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use protocol::{OrderEvent, Topic};
use tokio::sync::mpsc;

use crate::{BusError, MessageBus, Subscription};

/// In-memory bus implementation.
///
/// Fans each publish out to every live subscriber of the topic. A publish
/// with no subscribers succeeds and drops the message, matching a broker
/// with no consumer groups attached. Closed subscriptions are pruned on
/// the next publish.
#[derive(Clone, Default)]
pub struct InMemoryBus {
    topics: Arc<Mutex<HashMap<Topic, Vec<mpsc::UnboundedSender<OrderEvent>>>>>,
}

impl InMemoryBus {
    /// Creates a new bus with no subscriptions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live subscribers for a topic.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.topics
            .lock()
            .expect("bus lock poisoned")
            .get(&topic)
            .map(|senders| senders.iter().filter(|s| !s.is_closed()).count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl MessageBus for InMemoryBus {
    async fn publish(&self, topic: Topic, event: OrderEvent) -> Result<(), BusError> {
        let mut topics = self.topics.lock().expect("bus lock poisoned");
        if let Some(senders) = topics.get_mut(&topic) {
            senders.retain(|sender| sender.send(event.clone()).is_ok());
        }
        Ok(())
    }

    fn subscribe(&self, topic: Topic) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.topics
            .lock()
            .expect("bus lock poisoned")
            .entry(topic)
            .or_default()
            .push(tx);
        rx
    }
}
