//! Order ledger storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{SagaId, StoreError};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::model::OrderRecord;

/// Durable store for the order ledger.
///
/// Implementations must index by both the storage id and the saga id so
/// that terminal updates during compensation are O(1) lookups, not scans.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Finds an order by its saga correlation key. `Ok(None)` means this
    /// service never started that saga.
    async fn find_by_saga_id(&self, saga_id: SagaId) -> Result<Option<OrderRecord>, StoreError>;

    /// Persists an order atomically, inserting or replacing.
    async fn save(&self, order: OrderRecord) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct InMemoryOrderState {
    records: HashMap<Uuid, OrderRecord>,
    by_saga: HashMap<SagaId, Uuid>,
    fail_on_save: bool,
}

/// In-memory order store for tests and demos.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<InMemoryOrderState>>,
}

impl InMemoryOrderStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.records.len()
    }

    /// Makes every subsequent `save` fail.
    pub async fn set_fail_on_save(&self, fail: bool) {
        self.state.write().await.fail_on_save = fail;
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn find_by_saga_id(&self, saga_id: SagaId) -> Result<Option<OrderRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .by_saga
            .get(&saga_id)
            .and_then(|id| state.records.get(id))
            .cloned())
    }

    async fn save(&self, order: OrderRecord) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.fail_on_save {
            return Err(StoreError::new("order save rejected"));
        }
        state.by_saga.insert(order.saga_id, order.id);
        state.records.insert(order.id, order);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::UserId;

    #[tokio::test]
    async fn save_and_find_by_saga_id() {
        let store = InMemoryOrderStore::new();
        let record = OrderRecord::new(SagaId::new(), UserId::new(1), vec![]);
        let saga_id = record.saga_id;

        store.save(record).await.unwrap();

        let found = store.find_by_saga_id(saga_id).await.unwrap().unwrap();
        assert_eq!(found.saga_id, saga_id);
        assert_eq!(store.order_count().await, 1);
    }

    #[tokio::test]
    async fn find_unknown_saga_is_none() {
        let store = InMemoryOrderStore::new();
        assert!(store.find_by_saga_id(SagaId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_replaces_existing_record() {
        let store = InMemoryOrderStore::new();
        let mut record = OrderRecord::new(SagaId::new(), UserId::new(1), vec![]);
        let saga_id = record.saga_id;

        store.save(record.clone()).await.unwrap();
        record.saga_status.inventory = protocol::StepStatus::Successful;
        store.save(record).await.unwrap();

        let found = store.find_by_saga_id(saga_id).await.unwrap().unwrap();
        assert_eq!(
            found.saga_status.inventory,
            protocol::StepStatus::Successful
        );
        assert_eq!(store.order_count().await, 1);
    }
}
