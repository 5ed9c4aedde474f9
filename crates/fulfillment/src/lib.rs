//! Fulfillment host.
//!
//! Binds the four service routers to the message bus. Each service
//! subscribes to the topics its routing table names and runs one worker
//! task per topic; workers live until the bus drops the subscription.
//! Services share nothing but the bus.

use std::sync::Arc;

use async_trait::async_trait;
use bus::MessageBus;
use cart::{CartRouter, CartStore};
use inventory::{InventoryRouter, InventoryStore};
use order::{OrderRouter, OrderStore, UserDirectory};
use payment::{PaymentRouter, PaymentStore};
use protocol::{OrderEvent, Topic};
use tokio::task::JoinHandle;

pub mod config;

pub use config::Config;

/// A service endpoint the host can bind to the bus.
///
/// Erases the concrete router types so the host can treat all four
/// services uniformly when subscribing and spawning workers.
#[async_trait]
pub trait ServiceRouter: Send + Sync + 'static {
    /// Service name, used in logs.
    fn service(&self) -> &'static str;

    /// Topics the service consumes.
    fn topics(&self) -> Vec<Topic>;

    /// Handles one inbound message.
    async fn dispatch(&self, topic: Topic, event: OrderEvent);
}

#[async_trait]
impl<S: InventoryStore + 'static> ServiceRouter for InventoryRouter<S> {
    fn service(&self) -> &'static str {
        "inventory"
    }

    fn topics(&self) -> Vec<Topic> {
        Self::topics()
    }

    async fn dispatch(&self, topic: Topic, event: OrderEvent) {
        InventoryRouter::dispatch(self, topic, event).await;
    }
}

#[async_trait]
impl<S: CartStore + 'static> ServiceRouter for CartRouter<S> {
    fn service(&self) -> &'static str {
        "cart"
    }

    fn topics(&self) -> Vec<Topic> {
        Self::topics()
    }

    async fn dispatch(&self, topic: Topic, event: OrderEvent) {
        CartRouter::dispatch(self, topic, event).await;
    }
}

#[async_trait]
impl<S: PaymentStore + 'static> ServiceRouter for PaymentRouter<S> {
    fn service(&self) -> &'static str {
        "payment"
    }

    fn topics(&self) -> Vec<Topic> {
        Self::topics()
    }

    async fn dispatch(&self, topic: Topic, event: OrderEvent) {
        PaymentRouter::dispatch(self, topic, event).await;
    }
}

#[async_trait]
impl<S: OrderStore + 'static, D: UserDirectory + 'static> ServiceRouter for OrderRouter<S, D> {
    fn service(&self) -> &'static str {
        "order"
    }

    fn topics(&self) -> Vec<Topic> {
        Self::topics()
    }

    async fn dispatch(&self, topic: Topic, event: OrderEvent) {
        // Terminal updates for sagas this ledger never started are
        // protocol violations; they end up in the host log, not back
        // on the bus.
        if let Err(error) = OrderRouter::dispatch(self, topic, event).await {
            metrics::counter!("saga_protocol_violations_total").increment(1);
            tracing::error!(%topic, %error, "order terminal rejected");
        }
    }
}

/// Subscribes a service to all its topics and spawns one worker per
/// topic. Workers exit when the bus closes their subscription.
pub fn spawn_service(
    bus: &Arc<dyn MessageBus>,
    router: Arc<dyn ServiceRouter>,
) -> Vec<JoinHandle<()>> {
    router
        .topics()
        .into_iter()
        .map(|topic| {
            let mut subscription = bus.subscribe(topic);
            let router = Arc::clone(&router);
            tracing::info!(service = router.service(), %topic, "subscribed");
            tokio::spawn(async move {
                while let Some(event) = subscription.recv().await {
                    router.dispatch(topic, event).await;
                }
                tracing::debug!(service = router.service(), %topic, "subscription closed");
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bus::memory::InMemoryBus;
    use inventory::{InMemoryInventoryStore, InventoryHandler};
    use std::collections::HashSet;

    #[tokio::test]
    async fn spawn_service_subscribes_every_route_topic() {
        let inner = InMemoryBus::new();
        let bus: Arc<dyn MessageBus> = Arc::new(inner.clone());
        let router = InventoryRouter::new(
            InventoryHandler::new(InMemoryInventoryStore::new()),
            bus::publisher::SagaPublisher::new(Arc::clone(&bus)),
        );

        let handles = spawn_service(&bus, Arc::new(router));
        assert_eq!(
            handles.len(),
            InventoryRouter::<InMemoryInventoryStore>::topics().len()
        );

        let topics: HashSet<Topic> = InventoryRouter::<InMemoryInventoryStore>::topics()
            .into_iter()
            .collect();
        for topic in topics {
            assert_eq!(inner.subscriber_count(topic), 1);
        }
    }
}
