//! Inventory slice of the protocol graph.

use bus::publisher::SagaPublisher;
use protocol::{OrderEvent, Route, Topic, route_for};

use crate::handler::InventoryHandler;
use crate::store::InventoryStore;

/// Handler steps the inventory service dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryStep {
    /// Decrement stock for a new order.
    Commit,
    /// Restore stock after a downstream failure.
    Compensate,
}

/// Static routing table: incoming topic → step → outgoing topic by outcome.
///
/// A failed commit routes straight to the Order failure terminal because
/// no downstream step has run. Compensation forwards to the terminal on
/// either outcome; a rollback failure must not stall the chain.
pub const ROUTES: &[Route<InventoryStep>] = &[
    Route {
        incoming: Topic::OrderStart,
        step: InventoryStep::Commit,
        on_success: Some(Topic::InventoryCommitOk),
        on_failure: Some(Topic::InventoryCommitFail),
    },
    Route {
        incoming: Topic::CartCommitFail,
        step: InventoryStep::Compensate,
        on_success: Some(Topic::InventoryCompensateDone),
        on_failure: Some(Topic::InventoryCompensateDone),
    },
    Route {
        incoming: Topic::CartCompensateDone,
        step: InventoryStep::Compensate,
        on_success: Some(Topic::InventoryCompensateDone),
        on_failure: Some(Topic::InventoryCompensateDone),
    },
];

/// Dispatches inventory-bound messages and forwards handler resolutions.
pub struct InventoryRouter<S> {
    handler: InventoryHandler<S>,
    publisher: SagaPublisher,
}

impl<S: InventoryStore> InventoryRouter<S> {
    /// Creates a router over a handler and a publisher.
    pub fn new(handler: InventoryHandler<S>, publisher: SagaPublisher) -> Self {
        Self { handler, publisher }
    }

    /// Topics this service subscribes to.
    pub fn topics() -> Vec<Topic> {
        ROUTES.iter().map(|route| route.incoming).collect()
    }

    /// Routes one inbound message.
    pub async fn dispatch(&self, topic: Topic, event: OrderEvent) {
        let Some(route) = route_for(ROUTES, topic) else {
            tracing::warn!(%topic, "no inventory route for topic, dropping message");
            return;
        };

        tracing::info!(%topic, saga_id = %event.saga_id(), "inventory event received");
        metrics::counter!("saga_messages_total", "service" => "inventory").increment(1);

        let resolution = match route.step {
            InventoryStep::Commit => self.handler.commit(event).await,
            InventoryStep::Compensate => self.handler.compensate(event).await,
        };

        if let Some(next) = route.next_topic(&resolution) {
            self.publisher.publish(next, resolution.into_event()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InventoryRecord;
    use crate::store::InMemoryInventoryStore;
    use bus::MessageBus;
    use bus::memory::InMemoryBus;
    use common::{Money, SagaId, UserId};
    use protocol::{OrderItem, OrderSnapshot, StepStatus};
    use std::sync::Arc;

    fn table_route(topic: Topic) -> Route<InventoryStep> {
        route_for(ROUTES, topic).unwrap()
    }

    #[test]
    fn routing_table_matches_protocol_graph() {
        let commit = table_route(Topic::OrderStart);
        assert_eq!(commit.step, InventoryStep::Commit);
        assert_eq!(commit.on_success, Some(Topic::InventoryCommitOk));
        assert_eq!(commit.on_failure, Some(Topic::InventoryCommitFail));

        for topic in [Topic::CartCommitFail, Topic::CartCompensateDone] {
            let compensate = table_route(topic);
            assert_eq!(compensate.step, InventoryStep::Compensate);
            assert_eq!(compensate.on_success, Some(Topic::InventoryCompensateDone));
            assert_eq!(compensate.on_failure, Some(Topic::InventoryCompensateDone));
        }
    }

    #[tokio::test]
    async fn dispatch_forwards_commit_success() {
        let store = InMemoryInventoryStore::new();
        store.seed(InventoryRecord::new("INV-001", 10)).await;

        let inner = InMemoryBus::new();
        let mut ok_sub = inner.subscribe(Topic::InventoryCommitOk);
        let bus: Arc<dyn MessageBus> = Arc::new(inner);
        let router = InventoryRouter::new(
            InventoryHandler::new(store),
            SagaPublisher::new(bus),
        );

        let event = OrderEvent::new(OrderSnapshot::new(
            SagaId::new(),
            UserId::new(1),
            vec![OrderItem::new("INV-001", 2, Money::from_cents(100))],
        ));
        router.dispatch(Topic::OrderStart, event).await;

        let forwarded = ok_sub.recv().await.unwrap();
        assert_eq!(
            forwarded.order.saga_status.inventory,
            StepStatus::Successful
        );
    }

    #[tokio::test]
    async fn dispatch_routes_commit_failure_to_order_terminal() {
        let store = InMemoryInventoryStore::new();

        let inner = InMemoryBus::new();
        let mut fail_sub = inner.subscribe(Topic::InventoryCommitFail);
        let bus: Arc<dyn MessageBus> = Arc::new(inner);
        let router = InventoryRouter::new(
            InventoryHandler::new(store),
            SagaPublisher::new(bus),
        );

        let event = OrderEvent::new(OrderSnapshot::new(
            SagaId::new(),
            UserId::new(1),
            vec![OrderItem::new("INV-404", 1, Money::from_cents(100))],
        ));
        router.dispatch(Topic::OrderStart, event).await;

        let forwarded = fail_sub.recv().await.unwrap();
        assert_eq!(forwarded.order.saga_status.inventory, StepStatus::Failed);
    }
}
