//! Payment slice of the protocol graph.

use bus::publisher::SagaPublisher;
use protocol::{OrderEvent, Route, Topic, route_for};

use crate::handler::PaymentHandler;
use crate::store::PaymentStore;

/// Handler steps the payment service dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStep {
    /// Capture a payment for a cleared cart.
    Commit,
    /// Release a previously captured payment.
    Compensate,
}

/// Static routing table: incoming topic → step → outgoing topic by outcome.
///
/// Payment is the last forward step, so no in-protocol topic feeds its
/// compensate handler; `payment-compensate` is an operator re-entry
/// point. A released payment still routes to Cart's compensate topic so
/// the rest of the chain unwinds.
pub const ROUTES: &[Route<PaymentStep>] = &[
    Route {
        incoming: Topic::CartCommitOk,
        step: PaymentStep::Commit,
        on_success: Some(Topic::PaymentCommitOk),
        on_failure: Some(Topic::PaymentCommitFail),
    },
    Route {
        incoming: Topic::PaymentCompensate,
        step: PaymentStep::Compensate,
        on_success: Some(Topic::PaymentCommitFail),
        on_failure: Some(Topic::PaymentCommitFail),
    },
];

/// Dispatches payment-bound messages and forwards handler resolutions.
pub struct PaymentRouter<S> {
    handler: PaymentHandler<S>,
    publisher: SagaPublisher,
}

impl<S: PaymentStore> PaymentRouter<S> {
    /// Creates a router over a handler and a publisher.
    pub fn new(handler: PaymentHandler<S>, publisher: SagaPublisher) -> Self {
        Self { handler, publisher }
    }

    /// Topics this service subscribes to.
    pub fn topics() -> Vec<Topic> {
        ROUTES.iter().map(|route| route.incoming).collect()
    }

    /// Routes one inbound message.
    pub async fn dispatch(&self, topic: Topic, event: OrderEvent) {
        let Some(route) = route_for(ROUTES, topic) else {
            tracing::warn!(%topic, "no payment route for topic, dropping message");
            return;
        };

        tracing::info!(%topic, saga_id = %event.saga_id(), "payment event received");
        metrics::counter!("saga_messages_total", "service" => "payment").increment(1);

        let resolution = match route.step {
            PaymentStep::Commit => self.handler.commit(event).await,
            PaymentStep::Compensate => self.handler.compensate(event).await,
        };

        if let Some(next) = route.next_topic(&resolution) {
            self.publisher.publish(next, resolution.into_event()).await;
        }
    }
}
