//! Fire-and-forget publishing.

use std::sync::Arc;

use protocol::{OrderEvent, Topic};

use crate::MessageBus;

/// Publishes saga events without letting send failures into the protocol.
///
/// The send result never decides a saga outcome: a failed publish is
/// logged and counted, and the caller proceeds as if it had succeeded.
/// Delivery retries are the broker's concern.
#[derive(Clone)]
pub struct SagaPublisher {
    bus: Arc<dyn MessageBus>,
}

impl SagaPublisher {
    /// Creates a publisher over the given bus.
    pub fn new(bus: Arc<dyn MessageBus>) -> Self {
        Self { bus }
    }

    /// Publishes `event` to `topic`, swallowing any bus failure.
    pub async fn publish(&self, topic: Topic, event: OrderEvent) {
        let saga_id = event.saga_id();
        tracing::info!(%topic, %saga_id, "publishing saga event");

        if let Err(error) = self.bus.publish(topic, event).await {
            metrics::counter!("saga_publish_failures_total").increment(1);
            tracing::error!(%topic, %saga_id, %error, "publish failed, message dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBus;
    use crate::{BusError, MessageBus, Subscription};
    use async_trait::async_trait;
    use common::{SagaId, UserId};
    use protocol::OrderSnapshot;

    struct FailingBus;

    #[async_trait]
    impl MessageBus for FailingBus {
        async fn publish(&self, topic: Topic, _event: OrderEvent) -> Result<(), BusError> {
            Err(BusError::PublishFailed {
                topic,
                reason: "broker unreachable".to_string(),
            })
        }

        fn subscribe(&self, _topic: Topic) -> Subscription {
            let (_tx, rx) = tokio::sync::mpsc::unbounded_channel();
            rx
        }
    }

    fn event() -> OrderEvent {
        OrderEvent::new(OrderSnapshot::new(SagaId::new(), UserId::new(1), vec![]))
    }

    #[tokio::test]
    async fn publishes_to_subscribers() {
        let bus = InMemoryBus::new();
        let mut sub = bus.subscribe(Topic::OrderStart);

        let publisher = SagaPublisher::new(Arc::new(bus));
        publisher.publish(Topic::OrderStart, event()).await;

        assert!(sub.recv().await.is_some());
    }

    #[tokio::test]
    async fn swallows_publish_failures() {
        let publisher = SagaPublisher::new(Arc::new(FailingBus));
        // Must not panic or propagate the error.
        publisher.publish(Topic::OrderStart, event()).await;
    }
}
