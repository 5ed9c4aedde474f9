//! Order step handler: saga start and the two terminal updates.

use bus::publisher::SagaPublisher;
use chrono::Utc;
use common::{SagaId, StoreError, UserId};
use protocol::{OrderEvent, OrderItem, OrderSnapshot, Topic};
use thiserror::Error;

use crate::directory::{DirectoryError, UserDirectory};
use crate::model::OrderRecord;
use crate::store::OrderStore;

/// Failures of the order handler.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Pre-saga validation: the referenced user does not exist. The order
    /// is not persisted and no message is emitted.
    #[error("user '{0}' is not found")]
    UserNotFound(UserId),

    /// The directory could not be consulted.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// A terminal update arrived for a saga this service never started.
    /// This is a protocol violation and is surfaced, never dropped.
    #[error("order not found for saga '{0}'")]
    NotFound(SagaId),

    /// The ledger write failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A request to place a new order.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    /// The ordering user.
    pub user_id: UserId,

    /// Ordered line items.
    pub order_items: Vec<OrderItem>,
}

impl PlaceOrder {
    /// Creates a place-order request.
    pub fn new(user_id: UserId, order_items: Vec<OrderItem>) -> Self {
        Self {
            user_id,
            order_items,
        }
    }
}

/// Starts sagas and records their terminal outcome.
pub struct OrderHandler<S, D> {
    store: S,
    directory: D,
    publisher: SagaPublisher,
}

impl<S: OrderStore, D: UserDirectory> OrderHandler<S, D> {
    /// Creates a handler over the order ledger, the user directory and
    /// the saga publisher.
    pub fn new(store: S, directory: D, publisher: SagaPublisher) -> Self {
        Self {
            store,
            directory,
            publisher,
        }
    }

    /// Places an order and starts its saga.
    ///
    /// Validates the user first; a missing user fails locally without
    /// persisting the order or emitting any message. On success the
    /// order is stored with an unset status triple and the snapshot is
    /// published to the inventory commit topic.
    pub async fn start(&self, command: PlaceOrder) -> Result<SagaId, OrderError> {
        let user = self
            .directory
            .find(command.user_id)
            .await?
            .ok_or(OrderError::UserNotFound(command.user_id))?;

        let record = OrderRecord::new(SagaId::new(), user.user_id, command.order_items.clone());
        let saga_id = record.saga_id;
        self.store.save(record).await?;

        metrics::counter!("saga_started_total").increment(1);
        tracing::info!(%saga_id, user_id = %user.user_id, "order placed, starting saga");

        let snapshot = OrderSnapshot::new(saga_id, user.user_id, command.order_items);
        self.publisher
            .publish(Topic::OrderStart, OrderEvent::new(snapshot))
            .await;

        Ok(saga_id)
    }

    /// Success terminal: records the payment code, the captured total and
    /// the final status triple. No outgoing message.
    pub async fn apply_completed(&self, event: OrderEvent) -> Result<(), OrderError> {
        let mut record = self.find(event.saga_id()).await?;

        record.payment_code = event.order.payment_code.clone();
        record.total_price = event.order.total_price;
        record.saga_status = event.order.saga_status;
        record.update_date = Utc::now();
        self.store.save(record).await?;

        metrics::counter!("saga_completed_total").increment(1);
        tracing::info!(saga_id = %event.saga_id(), "saga completed");
        Ok(())
    }

    /// Failure terminal: records the final status triple. No outgoing
    /// message.
    pub async fn apply_failed(&self, event: OrderEvent) -> Result<(), OrderError> {
        let mut record = self.find(event.saga_id()).await?;

        record.saga_status = event.order.saga_status;
        record.update_date = Utc::now();
        self.store.save(record).await?;

        metrics::counter!("saga_failed_total").increment(1);
        let status = event.order.saga_status;
        if status.inventory.needs_operator()
            || status.cart.needs_operator()
            || status.payment.needs_operator()
        {
            tracing::warn!(saga_id = %event.saga_id(), %status, "saga failed with a stuck rollback");
        } else {
            tracing::info!(saga_id = %event.saga_id(), %status, "saga failed");
        }
        Ok(())
    }

    async fn find(&self, saga_id: SagaId) -> Result<OrderRecord, OrderError> {
        self.store
            .find_by_saga_id(saga_id)
            .await?
            .ok_or(OrderError::NotFound(saga_id))
    }
}
