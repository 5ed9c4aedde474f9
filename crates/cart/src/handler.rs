//! Cart step handler: commit and compensate.

use common::{StoreError, UserId};
use protocol::{OrderEvent, StepResolution, StepStatus};
use thiserror::Error;

use crate::store::CartStore;

/// Failures local to a cart step.
#[derive(Debug, Error)]
pub enum CartError {
    /// The user has no cart.
    #[error("cart for user '{0}' not found")]
    NotFound(UserId),

    /// The ledger write failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Deactivates and reactivates a user's cart as the saga progresses.
pub struct CartHandler<S> {
    store: S,
}

impl<S: CartStore> CartHandler<S> {
    /// Creates a handler over the given ledger store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Forward step: deactivate the cart now that its contents are ordered.
    pub async fn commit(&self, mut event: OrderEvent) -> StepResolution {
        match self.flip(&event, false).await {
            Ok(()) => {
                event.order.saga_status.cart = StepStatus::Successful;
                StepResolution::Success(event)
            }
            Err(error) => {
                metrics::counter!("saga_step_failures_total", "service" => "cart").increment(1);
                tracing::error!(saga_id = %event.saga_id(), %error, "cart commit failed");
                event.order.saga_status.cart = StepStatus::Failed;
                StepResolution::Failure(event)
            }
        }
    }

    /// Compensating step: reactivate the cart after a downstream failure.
    pub async fn compensate(&self, mut event: OrderEvent) -> StepResolution {
        match self.flip(&event, true).await {
            Ok(()) => {
                event.order.saga_status.cart = StepStatus::RolledBack;
                StepResolution::Success(event)
            }
            Err(error) => {
                metrics::counter!("saga_step_failures_total", "service" => "cart").increment(1);
                tracing::warn!(
                    saga_id = %event.saga_id(),
                    %error,
                    "cart rollback failed, cart needs manual reconciliation"
                );
                event.order.saga_status.cart = StepStatus::RollbackFailed;
                StepResolution::Failure(event)
            }
        }
    }

    async fn flip(&self, event: &OrderEvent, active: bool) -> Result<(), CartError> {
        let user_id = event.order.user_id;
        tracing::info!(saga_id = %event.saga_id(), %user_id, active, "updating cart");

        let mut cart = self
            .store
            .find_by_user(user_id)
            .await?
            .ok_or(CartError::NotFound(user_id))?;

        cart.set_active(active);
        self.store.save(cart).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CartItem, CartRecord};
    use crate::store::InMemoryCartStore;
    use common::SagaId;
    use protocol::OrderSnapshot;

    fn order_event(user_id: u64) -> OrderEvent {
        OrderEvent::new(OrderSnapshot::new(SagaId::new(), UserId::new(user_id), vec![]))
    }

    async fn handler_with_cart(user_id: u64) -> (CartHandler<InMemoryCartStore>, InMemoryCartStore) {
        let store = InMemoryCartStore::new();
        store
            .seed(CartRecord::new(
                UserId::new(user_id),
                vec![CartItem::new("INV-001", 2), CartItem::new("INV-002", 1)],
            ))
            .await;
        (CartHandler::new(store.clone()), store)
    }

    #[tokio::test]
    async fn commit_deactivates_cart_and_items() {
        let (handler, store) = handler_with_cart(1).await;

        let resolution = handler.commit(order_event(1)).await;

        assert!(resolution.is_success());
        assert_eq!(
            resolution.into_event().order.saga_status.cart,
            StepStatus::Successful
        );
        let cart = store.cart_of(UserId::new(1)).await.unwrap();
        assert!(!cart.active);
        assert!(cart.items.iter().all(|item| !item.active));
    }

    #[tokio::test]
    async fn commit_fails_when_cart_missing() {
        let store = InMemoryCartStore::new();
        let handler = CartHandler::new(store);

        let resolution = handler.commit(order_event(1)).await;

        assert!(!resolution.is_success());
        assert_eq!(
            resolution.into_event().order.saga_status.cart,
            StepStatus::Failed
        );
    }

    #[tokio::test]
    async fn compensate_reactivates_cart_and_items() {
        let (handler, store) = handler_with_cart(1).await;

        handler.commit(order_event(1)).await;
        let resolution = handler.compensate(order_event(1)).await;

        assert!(resolution.is_success());
        assert_eq!(
            resolution.into_event().order.saga_status.cart,
            StepStatus::RolledBack
        );
        let cart = store.cart_of(UserId::new(1)).await.unwrap();
        assert!(cart.active);
        assert!(cart.items.iter().all(|item| item.active));
    }

    #[tokio::test]
    async fn compensate_store_failure_is_rollback_failed() {
        let (handler, store) = handler_with_cart(1).await;
        store.set_fail_on_save(true).await;

        let resolution = handler.compensate(order_event(1)).await;

        assert!(!resolution.is_success());
        assert_eq!(
            resolution.into_event().order.saga_status.cart,
            StepStatus::RollbackFailed
        );
    }
}
