//! Fulfillment demo entry point.
//!
//! Wires all four services onto one in-process bus, seeds the ledgers
//! and drives two sagas end to end: one that completes and one that is
//! refused at payment and compensated back out.

use std::sync::Arc;
use std::time::Duration;

use bus::MessageBus;
use bus::memory::InMemoryBus;
use bus::publisher::SagaPublisher;
use cart::{CartHandler, CartItem, CartRecord, CartRouter, InMemoryCartStore};
use common::{Money, SagaId, UserId};
use fulfillment::{Config, ServiceRouter, spawn_service};
use inventory::{InMemoryInventoryStore, InventoryHandler, InventoryRecord, InventoryRouter};
use order::{InMemoryOrderStore, InMemoryUserDirectory, OrderHandler, OrderRouter, OrderStore, PlaceOrder};
use payment::{InMemoryPaymentStore, PaymentHandler, PaymentRouter};
use protocol::OrderItem;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Polls the order ledger until the saga reaches a terminal status.
async fn await_terminal(store: &InMemoryOrderStore, saga_id: SagaId) {
    for _ in 0..100 {
        if let Ok(Some(record)) = store.find_by_saga_id(saga_id).await
            && record.is_terminal()
        {
            tracing::info!(%saga_id, status = %record.saga_status, "saga reached terminal");
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    tracing::error!(%saga_id, "saga never reached a terminal status");
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Bus and ledgers
    let bus: Arc<dyn MessageBus> = Arc::new(InMemoryBus::new());
    let inventory_store = InMemoryInventoryStore::new();
    let cart_store = InMemoryCartStore::new();
    let payment_store = InMemoryPaymentStore::new();
    let order_store = InMemoryOrderStore::new();
    let directory = InMemoryUserDirectory::new();

    inventory_store.seed(InventoryRecord::new("INV-001", 10)).await;
    inventory_store.seed(InventoryRecord::new("INV-002", 4)).await;
    directory.register(UserId::new(1), "Alice").await;
    directory.register(UserId::new(99_999), "Mallory").await;
    for user in [UserId::new(1), UserId::new(99_999)] {
        cart_store
            .seed(CartRecord::new(user, vec![CartItem::new("INV-001", 1)]))
            .await;
    }

    // 4. Bind the four services to the bus
    let routers: Vec<Arc<dyn ServiceRouter>> = vec![
        Arc::new(InventoryRouter::new(
            InventoryHandler::new(inventory_store.clone()),
            SagaPublisher::new(Arc::clone(&bus)),
        )),
        Arc::new(CartRouter::new(
            CartHandler::new(cart_store.clone()),
            SagaPublisher::new(Arc::clone(&bus)),
        )),
        Arc::new(PaymentRouter::new(
            PaymentHandler::new(payment_store.clone(), config.denied_users.clone()),
            SagaPublisher::new(Arc::clone(&bus)),
        )),
        Arc::new(OrderRouter::new(OrderHandler::new(
            order_store.clone(),
            directory.clone(),
            SagaPublisher::new(Arc::clone(&bus)),
        ))),
    ];
    for router in routers {
        spawn_service(&bus, router);
    }

    let orders = OrderHandler::new(
        order_store.clone(),
        directory,
        SagaPublisher::new(Arc::clone(&bus)),
    );

    // 5. A saga that completes
    let completed = orders
        .start(PlaceOrder::new(
            UserId::new(1),
            vec![OrderItem::new("INV-001", 3, Money::from_cents(2700))],
        ))
        .await
        .expect("place order");
    await_terminal(&order_store, completed).await;

    // 6. A saga refused at payment and compensated
    let compensated = orders
        .start(PlaceOrder::new(
            UserId::new(99_999),
            vec![OrderItem::new("INV-002", 2, Money::from_cents(1200))],
        ))
        .await
        .expect("place order");
    await_terminal(&order_store, compensated).await;

    for saga_id in [completed, compensated] {
        let record = order_store
            .find_by_saga_id(saga_id)
            .await
            .expect("order lookup")
            .expect("order exists");
        println!(
            "saga {saga_id}: status {}, payment code {:?}, total {:?}",
            record.saga_status, record.payment_code, record.total_price
        );
    }
}
