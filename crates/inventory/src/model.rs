//! Stock ledger entity.

use chrono::{DateTime, Utc};
use common::InventoryCode;

/// One stock line, keyed by its unique code.
///
/// `quantity` is unsigned: a commit that would drive it negative is
/// rejected before anything is persisted, and a rollback only ever adds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRecord {
    /// Unique stock-keeping code.
    pub code: InventoryCode,

    /// Units on hand.
    pub quantity: u32,

    /// Last time this line was touched.
    pub update_date: DateTime<Utc>,
}

impl InventoryRecord {
    /// Creates a stock line with the current timestamp.
    pub fn new(code: impl Into<InventoryCode>, quantity: u32) -> Self {
        Self {
            code: code.into(),
            quantity,
            update_date: Utc::now(),
        }
    }
}
