//! Payment ledger entities.

use chrono::{DateTime, Utc};
use common::{InventoryCode, Money, PaymentCode, UserId};
use protocol::OrderItem;

/// One line of a payment, copied from the order's line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentItem {
    /// Stock-keeping code of the paid product.
    pub inventory_code: InventoryCode,

    /// Quantity paid for.
    pub quantity: u32,

    /// Price per unit at capture time.
    pub price: Money,

    /// Whether the line is still live.
    pub active: bool,

    /// Last time this line was touched.
    pub update_date: DateTime<Utc>,
}

impl From<&OrderItem> for PaymentItem {
    fn from(item: &OrderItem) -> Self {
        Self {
            inventory_code: item.inventory_code.clone(),
            quantity: item.quantity,
            price: item.price,
            active: true,
            update_date: Utc::now(),
        }
    }
}

/// A captured payment, keyed by its code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecord {
    /// Business key; assigned on first commit and reused on compensation.
    pub code: PaymentCode,

    /// The paying user.
    pub user_id: UserId,

    /// Whether the payment is live. A compensated payment is kept but
    /// deactivated.
    pub active: bool,

    /// Exact sum of price × quantity over the line items. Computed once
    /// per commit and never recomputed on compensation.
    pub total_price: Money,

    /// When the payment was first captured.
    pub insert_date: DateTime<Utc>,

    /// Last time the payment was touched.
    pub update_date: DateTime<Utc>,

    /// Payment lines.
    pub items: Vec<PaymentItem>,
}

impl PaymentRecord {
    /// Builds an active payment from an order's line items, computing the
    /// total and stamping insert/update dates.
    pub fn capture(code: PaymentCode, user_id: UserId, order_items: &[OrderItem]) -> Self {
        let now = Utc::now();
        let total_price = order_items.iter().map(OrderItem::line_total).sum();
        Self {
            code,
            user_id,
            active: true,
            total_price,
            insert_date: now,
            update_date: now,
            items: order_items.iter().map(PaymentItem::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_computes_exact_total() {
        let items = vec![
            OrderItem::new("INV-001", 3, Money::from_cents(1000)),
            OrderItem::new("INV-002", 2, Money::from_cents(2550)),
        ];
        let payment = PaymentRecord::capture(PaymentCode::generate(), UserId::new(1), &items);

        assert_eq!(payment.total_price, Money::from_cents(3 * 1000 + 2 * 2550));
        assert!(payment.active);
        assert_eq!(payment.items.len(), 2);
        assert_eq!(payment.insert_date, payment.update_date);
    }
}
