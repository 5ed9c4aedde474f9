//! Cart slice of the protocol graph.

use bus::publisher::SagaPublisher;
use protocol::{OrderEvent, Route, Topic, route_for};

use crate::handler::CartHandler;
use crate::store::CartStore;

/// Handler steps the cart service dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartStep {
    /// Deactivate the cart for a reserved order.
    Commit,
    /// Reactivate the cart after a payment failure.
    Compensate,
}

/// Static routing table: incoming topic → step → outgoing topic by outcome.
pub const ROUTES: &[Route<CartStep>] = &[
    Route {
        incoming: Topic::InventoryCommitOk,
        step: CartStep::Commit,
        on_success: Some(Topic::CartCommitOk),
        on_failure: Some(Topic::CartCommitFail),
    },
    Route {
        incoming: Topic::PaymentCommitFail,
        step: CartStep::Compensate,
        on_success: Some(Topic::CartCompensateDone),
        on_failure: Some(Topic::CartCompensateDone),
    },
];

/// Dispatches cart-bound messages and forwards handler resolutions.
pub struct CartRouter<S> {
    handler: CartHandler<S>,
    publisher: SagaPublisher,
}

impl<S: CartStore> CartRouter<S> {
    /// Creates a router over a handler and a publisher.
    pub fn new(handler: CartHandler<S>, publisher: SagaPublisher) -> Self {
        Self { handler, publisher }
    }

    /// Topics this service subscribes to.
    pub fn topics() -> Vec<Topic> {
        ROUTES.iter().map(|route| route.incoming).collect()
    }

    /// Routes one inbound message.
    pub async fn dispatch(&self, topic: Topic, event: OrderEvent) {
        let Some(route) = route_for(ROUTES, topic) else {
            tracing::warn!(%topic, "no cart route for topic, dropping message");
            return;
        };

        tracing::info!(%topic, saga_id = %event.saga_id(), "cart event received");
        metrics::counter!("saga_messages_total", "service" => "cart").increment(1);

        let resolution = match route.step {
            CartStep::Commit => self.handler.commit(event).await,
            CartStep::Compensate => self.handler.compensate(event).await,
        };

        if let Some(next) = route.next_topic(&resolution) {
            self.publisher.publish(next, resolution.into_event()).await;
        }
    }
}
