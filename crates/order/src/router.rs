//! Order slice of the protocol graph: the two terminal routes.

use protocol::{OrderEvent, Route, Topic, route_for};

use crate::directory::UserDirectory;
use crate::handler::{OrderError, OrderHandler};
use crate::store::OrderStore;

/// Handler steps the order service dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStep {
    /// Record a successful saga.
    ApplyCompleted,
    /// Record a failed (compensated) saga.
    ApplyFailed,
}

/// Static routing table. Terminals never forward, so every route has no
/// outgoing topic: the chain ends here.
pub const ROUTES: &[Route<OrderStep>] = &[
    Route {
        incoming: Topic::PaymentCommitOk,
        step: OrderStep::ApplyCompleted,
        on_success: None,
        on_failure: None,
    },
    Route {
        incoming: Topic::InventoryCommitFail,
        step: OrderStep::ApplyFailed,
        on_success: None,
        on_failure: None,
    },
    Route {
        incoming: Topic::InventoryCompensateDone,
        step: OrderStep::ApplyFailed,
        on_success: None,
        on_failure: None,
    },
];

/// Dispatches terminal messages to the order handler.
pub struct OrderRouter<S, D> {
    handler: OrderHandler<S, D>,
}

impl<S: OrderStore, D: UserDirectory> OrderRouter<S, D> {
    /// Creates a router over an order handler.
    pub fn new(handler: OrderHandler<S, D>) -> Self {
        Self { handler }
    }

    /// Topics this service subscribes to.
    pub fn topics() -> Vec<Topic> {
        ROUTES.iter().map(|route| route.incoming).collect()
    }

    /// Routes one inbound terminal message.
    ///
    /// Unlike the mid-chain services this returns an error: a terminal
    /// for an unknown saga is a protocol violation the host must see,
    /// never a resolution to forward.
    pub async fn dispatch(&self, topic: Topic, event: OrderEvent) -> Result<(), OrderError> {
        let Some(route) = route_for(ROUTES, topic) else {
            tracing::warn!(%topic, "no order route for topic, dropping message");
            return Ok(());
        };

        tracing::info!(%topic, saga_id = %event.saga_id(), "order terminal received");
        metrics::counter!("saga_messages_total", "service" => "order").increment(1);

        match route.step {
            OrderStep::ApplyCompleted => self.handler.apply_completed(event).await,
            OrderStep::ApplyFailed => self.handler.apply_failed(event).await,
        }
    }
}
