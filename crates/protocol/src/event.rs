//! The event envelope carried on every topic.

use chrono::{DateTime, Utc};
use common::{InventoryCode, Money, PaymentCode, SagaId, UserId};
use serde::{Deserialize, Serialize};

use crate::status::SagaStatus;

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Stock-keeping code of the ordered product.
    pub inventory_code: InventoryCode,

    /// Quantity ordered.
    pub quantity: u32,

    /// Price per unit.
    pub price: Money,
}

impl OrderItem {
    /// Creates a new order item.
    pub fn new(inventory_code: impl Into<InventoryCode>, quantity: u32, price: Money) -> Self {
        Self {
            inventory_code: inventory_code.into(),
            quantity,
            price,
        }
    }

    /// Returns the line total (price × quantity).
    pub fn line_total(&self) -> Money {
        self.price.multiply(self.quantity)
    }
}

/// The shared, evolving view of one business transaction.
///
/// Created once at order placement with a fresh [`SagaId`], enriched
/// field-by-field as it passes each service (fields are added, never
/// removed), and dead once the Order service applies a terminal update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    /// Correlation key, assigned once at order start.
    pub saga_id: SagaId,

    /// Owner of the order and of the cart being cleared.
    pub user_id: UserId,

    /// Ordered sequence of line items.
    pub order_items: Vec<OrderItem>,

    /// Set by the Payment service on its first commit.
    pub payment_code: Option<PaymentCode>,

    /// Set by the Payment service; exact sum of price × quantity.
    pub total_price: Option<Money>,

    /// When the order was placed.
    pub insert_date: DateTime<Utc>,

    /// Bumped by whichever service last touched the snapshot.
    pub update_date: DateTime<Utc>,

    /// Per-step outcomes, filled in as the saga progresses.
    pub saga_status: SagaStatus,
}

impl OrderSnapshot {
    /// Creates the initial snapshot for a freshly placed order.
    pub fn new(saga_id: SagaId, user_id: UserId, order_items: Vec<OrderItem>) -> Self {
        let now = Utc::now();
        Self {
            saga_id,
            user_id,
            order_items,
            payment_code: None,
            total_price: None,
            insert_date: now,
            update_date: now,
            saga_status: SagaStatus::unset(),
        }
    }
}

/// The unit of communication between services.
///
/// Carried by value on every message; there are no separate headers —
/// correlation lives inside the order snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    /// The order snapshot this message describes.
    pub order: OrderSnapshot,
}

impl OrderEvent {
    /// Wraps an order snapshot in an envelope.
    pub fn new(order: OrderSnapshot) -> Self {
        Self { order }
    }

    /// Returns the correlation key of the envelope.
    pub fn saga_id(&self) -> SagaId {
        self.order.saga_id
    }
}
