//! Inventory ledger storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{InventoryCode, StoreError};
use tokio::sync::RwLock;

use crate::model::InventoryRecord;

/// Durable store for the stock ledger.
///
/// `save_all` must be atomic: either every record in the batch is
/// persisted or none is. The handler relies on this to guarantee that a
/// multi-item order never applies partially.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Returns the records whose codes appear in `codes`. Unknown codes
    /// are simply absent from the result; the caller compares sizes.
    async fn find_by_codes(&self, codes: &[InventoryCode])
    -> Result<Vec<InventoryRecord>, StoreError>;

    /// Persists the batch atomically.
    async fn save_all(&self, records: Vec<InventoryRecord>) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct InMemoryInventoryState {
    records: HashMap<InventoryCode, InventoryRecord>,
    fail_on_save: bool,
}

/// In-memory inventory store for tests and demos.
#[derive(Clone, Default)]
pub struct InMemoryInventoryStore {
    state: Arc<RwLock<InMemoryInventoryState>>,
}

impl InMemoryInventoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a stock line.
    pub async fn seed(&self, record: InventoryRecord) {
        self.state
            .write()
            .await
            .records
            .insert(record.code.clone(), record);
    }

    /// Returns the current quantity for a code, if the code exists.
    pub async fn quantity_of(&self, code: &InventoryCode) -> Option<u32> {
        self.state
            .read()
            .await
            .records
            .get(code)
            .map(|record| record.quantity)
    }

    /// Makes every subsequent `save_all` fail. Used to exercise the
    /// rollback-failed path.
    pub async fn set_fail_on_save(&self, fail: bool) {
        self.state.write().await.fail_on_save = fail;
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn find_by_codes(
        &self,
        codes: &[InventoryCode],
    ) -> Result<Vec<InventoryRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(codes
            .iter()
            .filter_map(|code| state.records.get(code).cloned())
            .collect())
    }

    async fn save_all(&self, records: Vec<InventoryRecord>) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.fail_on_save {
            return Err(StoreError::new("inventory save rejected"));
        }
        for record in records {
            state.records.insert(record.code.clone(), record);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn find_by_codes_skips_unknown() {
        let store = InMemoryInventoryStore::new();
        store.seed(InventoryRecord::new("INV-001", 10)).await;

        let found = store
            .find_by_codes(&["INV-001".into(), "INV-404".into()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code.as_str(), "INV-001");
    }

    #[tokio::test]
    async fn save_all_replaces_records() {
        let store = InMemoryInventoryStore::new();
        store.seed(InventoryRecord::new("INV-001", 10)).await;

        store
            .save_all(vec![InventoryRecord::new("INV-001", 7)])
            .await
            .unwrap();

        assert_eq!(store.quantity_of(&"INV-001".into()).await, Some(7));
    }

    #[tokio::test]
    async fn fail_on_save_leaves_records_untouched() {
        let store = InMemoryInventoryStore::new();
        store.seed(InventoryRecord::new("INV-001", 10)).await;
        store.set_fail_on_save(true).await;

        let result = store.save_all(vec![InventoryRecord::new("INV-001", 7)]).await;
        assert!(result.is_err());
        assert_eq!(store.quantity_of(&"INV-001".into()).await, Some(10));
    }
}
