//! Payment ledger storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{PaymentCode, StoreError};
use tokio::sync::RwLock;

use crate::model::PaymentRecord;

/// Durable store for the payment ledger.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Finds a payment by its code. `Ok(None)` means no such payment,
    /// distinct from a storage failure.
    async fn find_by_code(&self, code: &PaymentCode) -> Result<Option<PaymentRecord>, StoreError>;

    /// Persists a payment and its items atomically.
    async fn save(&self, payment: PaymentRecord) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    payments: HashMap<PaymentCode, PaymentRecord>,
    fail_on_save: bool,
}

/// In-memory payment store for tests and demos.
#[derive(Clone, Default)]
pub struct InMemoryPaymentStore {
    state: Arc<RwLock<InMemoryPaymentState>>,
}

impl InMemoryPaymentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the payment with the given code.
    pub async fn payment_of(&self, code: &PaymentCode) -> Option<PaymentRecord> {
        self.state.read().await.payments.get(code).cloned()
    }

    /// Returns the number of stored payments.
    pub async fn payment_count(&self) -> usize {
        self.state.read().await.payments.len()
    }

    /// Makes every subsequent `save` fail.
    pub async fn set_fail_on_save(&self, fail: bool) {
        self.state.write().await.fail_on_save = fail;
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn find_by_code(&self, code: &PaymentCode) -> Result<Option<PaymentRecord>, StoreError> {
        Ok(self.state.read().await.payments.get(code).cloned())
    }

    async fn save(&self, payment: PaymentRecord) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.fail_on_save {
            return Err(StoreError::new("payment save rejected"));
        }
        state.payments.insert(payment.code.clone(), payment);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::UserId;

    #[tokio::test]
    async fn save_and_find_by_code() {
        let store = InMemoryPaymentStore::new();
        let payment = PaymentRecord::capture(PaymentCode::generate(), UserId::new(1), &[]);
        let code = payment.code.clone();

        store.save(payment).await.unwrap();

        assert!(store.find_by_code(&code).await.unwrap().is_some());
        assert_eq!(store.payment_count().await, 1);
    }

    #[tokio::test]
    async fn find_unknown_code_is_none() {
        let store = InMemoryPaymentStore::new();
        let result = store.find_by_code(&PaymentCode::generate()).await.unwrap();
        assert!(result.is_none());
    }
}
