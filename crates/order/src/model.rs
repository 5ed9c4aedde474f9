//! Order ledger entity.

use chrono::{DateTime, Utc};
use common::{Money, PaymentCode, SagaId, UserId};
use protocol::{OrderItem, SagaStatus};
use uuid::Uuid;

/// The durable record of one order and its saga outcome.
///
/// Keyed by a storage-generated id; looked up for terminal updates by
/// `saga_id`, which downstream services carry as the only correlation key.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    /// Storage key.
    pub id: Uuid,

    /// Correlation key shared with every other service.
    pub saga_id: SagaId,

    /// The ordering user.
    pub user_id: UserId,

    /// Ordered line items.
    pub order_items: Vec<OrderItem>,

    /// Copied from the snapshot when the saga completes.
    pub payment_code: Option<PaymentCode>,

    /// Copied from the snapshot when the saga completes.
    pub total_price: Option<Money>,

    /// Per-step outcomes; the durable record of how the saga ended.
    pub saga_status: SagaStatus,

    /// When the order was placed.
    pub insert_date: DateTime<Utc>,

    /// Last time the record was touched.
    pub update_date: DateTime<Utc>,
}

impl OrderRecord {
    /// Creates a freshly placed order with an unset status triple.
    pub fn new(saga_id: SagaId, user_id: UserId, order_items: Vec<OrderItem>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            saga_id,
            user_id,
            order_items,
            payment_code: None,
            total_price: None,
            saga_status: SagaStatus::unset(),
            insert_date: now,
            update_date: now,
        }
    }

    /// Returns true once a terminal update has been applied.
    ///
    /// The order ledger is only written at placement and at the two
    /// terminals, so any set status means the saga has ended.
    pub fn is_terminal(&self) -> bool {
        self.saga_status.inventory.is_set()
    }
}
