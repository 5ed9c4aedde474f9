//! Cart ledger entities.

use chrono::{DateTime, Utc};
use common::{InventoryCode, UserId};

/// One line of a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    /// Stock-keeping code of the carted product.
    pub inventory_code: InventoryCode,

    /// Quantity in the cart.
    pub quantity: u32,

    /// Whether the line is still live.
    pub active: bool,

    /// Last time this line was touched.
    pub update_date: DateTime<Utc>,
}

impl CartItem {
    /// Creates an active cart line with the current timestamp.
    pub fn new(inventory_code: impl Into<InventoryCode>, quantity: u32) -> Self {
        Self {
            inventory_code: inventory_code.into(),
            quantity,
            active: true,
            update_date: Utc::now(),
        }
    }
}

/// A user's cart, keyed by the owning user.
///
/// Invariant: the cart's `active` flag and all of its items' flags are
/// always flipped together in one atomic save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRecord {
    /// The owning user; the cart's business key.
    pub user_id: UserId,

    /// Whether the cart is live.
    pub active: bool,

    /// Last time the cart was touched.
    pub update_date: DateTime<Utc>,

    /// Cart lines.
    pub items: Vec<CartItem>,
}

impl CartRecord {
    /// Creates an active cart with the given lines.
    pub fn new(user_id: UserId, items: Vec<CartItem>) -> Self {
        Self {
            user_id,
            active: true,
            update_date: Utc::now(),
            items,
        }
    }

    /// Flips the cart and every item to `active`, stamping all update
    /// dates with one timestamp.
    pub fn set_active(&mut self, active: bool) {
        let now = Utc::now();
        self.active = active;
        self.update_date = now;
        for item in &mut self.items {
            item.active = active;
            item.update_date = now;
        }
    }
}
