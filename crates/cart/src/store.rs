//! Cart ledger storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{StoreError, UserId};
use tokio::sync::RwLock;

use crate::model::CartRecord;

/// Durable store for the cart ledger.
///
/// `save` persists the cart and all of its items in one atomic write,
/// which is what keeps the cart/item `active` flags in lockstep.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Finds a user's cart. `Ok(None)` means no cart exists, which is
    /// distinct from a storage failure.
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<CartRecord>, StoreError>;

    /// Persists a cart atomically.
    async fn save(&self, cart: CartRecord) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct InMemoryCartState {
    carts: HashMap<UserId, CartRecord>,
    fail_on_save: bool,
    saves_remaining_before_failure: Option<u32>,
}

/// In-memory cart store for tests and demos.
#[derive(Clone, Default)]
pub struct InMemoryCartStore {
    state: Arc<RwLock<InMemoryCartState>>,
}

impl InMemoryCartStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a cart.
    pub async fn seed(&self, cart: CartRecord) {
        self.state.write().await.carts.insert(cart.user_id, cart);
    }

    /// Returns a copy of a user's cart.
    pub async fn cart_of(&self, user_id: UserId) -> Option<CartRecord> {
        self.state.read().await.carts.get(&user_id).cloned()
    }

    /// Makes every subsequent `save` fail.
    pub async fn set_fail_on_save(&self, fail: bool) {
        self.state.write().await.fail_on_save = fail;
    }

    /// Allows `count` more saves to succeed, then fails the rest. Used to
    /// let a commit through and fail the later compensation.
    pub async fn fail_after_saves(&self, count: u32) {
        self.state.write().await.saves_remaining_before_failure = Some(count);
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<CartRecord>, StoreError> {
        Ok(self.state.read().await.carts.get(&user_id).cloned())
    }

    async fn save(&self, cart: CartRecord) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.fail_on_save {
            return Err(StoreError::new("cart save rejected"));
        }
        if let Some(remaining) = state.saves_remaining_before_failure.as_mut() {
            if *remaining == 0 {
                return Err(StoreError::new("cart save rejected"));
            }
            *remaining -= 1;
        }
        state.carts.insert(cart.user_id, cart);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CartItem;

    #[tokio::test]
    async fn find_by_user_distinguishes_missing_cart() {
        let store = InMemoryCartStore::new();
        assert!(store.find_by_user(UserId::new(1)).await.unwrap().is_none());

        store
            .seed(CartRecord::new(UserId::new(1), vec![CartItem::new("INV-001", 2)]))
            .await;
        assert!(store.find_by_user(UserId::new(1)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn fail_after_saves_counts_down() {
        let store = InMemoryCartStore::new();
        store.fail_after_saves(1).await;

        let cart = CartRecord::new(UserId::new(1), vec![]);
        assert!(store.save(cart.clone()).await.is_ok());
        assert!(store.save(cart).await.is_err());
    }
}
