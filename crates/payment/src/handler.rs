//! Payment step handler: commit and compensate.

use chrono::Utc;
use common::{PaymentCode, StoreError, UserId};
use protocol::{OrderEvent, StepResolution, StepStatus};
use thiserror::Error;

use crate::model::PaymentRecord;
use crate::store::PaymentStore;

/// Failures local to a payment step.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Standing business rule: this user may not pay, regardless of saga
    /// state.
    #[error("payments are not allowed for user '{0}'")]
    NotAllowed(UserId),

    /// The payment to compensate does not exist; compensation presumes a
    /// prior successful commit.
    #[error("payment '{0}' not found")]
    NotFound(PaymentCode),

    /// The snapshot carries no payment code to compensate.
    #[error("order has no payment code")]
    MissingCode,

    /// The ledger write failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Captures and releases payments for orders.
pub struct PaymentHandler<S> {
    store: S,
    denied_users: Vec<UserId>,
}

impl<S: PaymentStore> PaymentHandler<S> {
    /// Creates a handler over the given ledger store and denylist.
    pub fn new(store: S, denied_users: Vec<UserId>) -> Self {
        Self {
            store,
            denied_users,
        }
    }

    /// Forward step: capture a payment for the order.
    ///
    /// Reuses the snapshot's payment code when one is present (a re-entry
    /// for the same saga), otherwise mints a fresh one. On success the
    /// code and computed total are copied back onto the snapshot for the
    /// Order service to record.
    pub async fn commit(&self, mut event: OrderEvent) -> StepResolution {
        match self.capture(&event).await {
            Ok(payment) => {
                event.order.payment_code = Some(payment.code);
                event.order.total_price = Some(payment.total_price);
                event.order.saga_status.payment = StepStatus::Successful;
                StepResolution::Success(event)
            }
            Err(error) => {
                metrics::counter!("saga_step_failures_total", "service" => "payment").increment(1);
                tracing::error!(saga_id = %event.saga_id(), %error, "payment commit failed");
                event.order.saga_status.payment = StepStatus::Failed;
                StepResolution::Failure(event)
            }
        }
    }

    /// Compensating step: deactivate a previously captured payment.
    ///
    /// The stored total is left as committed; a released payment keeps
    /// the amount it was captured for.
    pub async fn compensate(&self, mut event: OrderEvent) -> StepResolution {
        match self.release(&event).await {
            Ok(payment) => {
                event.order.payment_code = Some(payment.code);
                event.order.total_price = Some(payment.total_price);
                event.order.saga_status.payment = StepStatus::RolledBack;
                StepResolution::Success(event)
            }
            Err(error) => {
                metrics::counter!("saga_step_failures_total", "service" => "payment").increment(1);
                tracing::warn!(
                    saga_id = %event.saga_id(),
                    %error,
                    "payment rollback failed, payment needs manual reconciliation"
                );
                event.order.saga_status.payment = StepStatus::RollbackFailed;
                StepResolution::Failure(event)
            }
        }
    }

    async fn capture(&self, event: &OrderEvent) -> Result<PaymentRecord, PaymentError> {
        let user_id = event.order.user_id;
        if self.denied_users.contains(&user_id) {
            return Err(PaymentError::NotAllowed(user_id));
        }

        let code = event
            .order
            .payment_code
            .clone()
            .unwrap_or_else(PaymentCode::generate);

        tracing::info!(saga_id = %event.saga_id(), %user_id, %code, "capturing payment");

        let payment = PaymentRecord::capture(code, user_id, &event.order.order_items);
        self.store.save(payment.clone()).await?;
        Ok(payment)
    }

    async fn release(&self, event: &OrderEvent) -> Result<PaymentRecord, PaymentError> {
        let code = event
            .order
            .payment_code
            .clone()
            .ok_or(PaymentError::MissingCode)?;

        tracing::info!(saga_id = %event.saga_id(), %code, "releasing payment");

        let mut payment = self
            .store
            .find_by_code(&code)
            .await?
            .ok_or(PaymentError::NotFound(code))?;

        payment.active = false;
        payment.update_date = Utc::now();
        self.store.save(payment.clone()).await?;
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryPaymentStore;
    use common::{Money, SagaId};
    use protocol::{OrderItem, OrderSnapshot};

    fn order_event(user_id: u64, items: Vec<OrderItem>) -> OrderEvent {
        OrderEvent::new(OrderSnapshot::new(SagaId::new(), UserId::new(user_id), items))
    }

    fn sample_items() -> Vec<OrderItem> {
        vec![
            OrderItem::new("INV-001", 3, Money::from_cents(1000)),
            OrderItem::new("INV-002", 2, Money::from_cents(2550)),
        ]
    }

    fn handler(store: InMemoryPaymentStore) -> PaymentHandler<InMemoryPaymentStore> {
        PaymentHandler::new(store, vec![UserId::new(99_999)])
    }

    #[tokio::test]
    async fn commit_assigns_code_and_exact_total() {
        let store = InMemoryPaymentStore::new();
        let resolution = handler(store.clone())
            .commit(order_event(1, sample_items()))
            .await;

        assert!(resolution.is_success());
        let event = resolution.into_event();
        assert_eq!(event.order.saga_status.payment, StepStatus::Successful);
        assert_eq!(event.order.total_price, Some(Money::from_cents(8100)));

        let code = event.order.payment_code.unwrap();
        let stored = store.payment_of(&code).await.unwrap();
        assert!(stored.active);
        assert_eq!(stored.total_price, Money::from_cents(8100));
    }

    #[tokio::test]
    async fn commit_reuses_snapshot_payment_code() {
        let store = InMemoryPaymentStore::new();
        let code = PaymentCode::generate();

        let mut event = order_event(1, sample_items());
        event.order.payment_code = Some(code.clone());

        let resolution = handler(store.clone()).commit(event).await;

        assert_eq!(resolution.into_event().order.payment_code, Some(code.clone()));
        assert!(store.payment_of(&code).await.is_some());
        assert_eq!(store.payment_count().await, 1);
    }

    #[tokio::test]
    async fn commit_rejects_denylisted_user() {
        let store = InMemoryPaymentStore::new();
        let resolution = handler(store.clone())
            .commit(order_event(99_999, sample_items()))
            .await;

        assert!(!resolution.is_success());
        let event = resolution.into_event();
        assert_eq!(event.order.saga_status.payment, StepStatus::Failed);
        assert!(event.order.payment_code.is_none());
        assert_eq!(store.payment_count().await, 0);
    }

    #[tokio::test]
    async fn compensate_deactivates_without_recomputing_total() {
        let store = InMemoryPaymentStore::new();
        let h = handler(store.clone());

        let committed = h.commit(order_event(1, sample_items())).await.into_event();
        let code = committed.order.payment_code.clone().unwrap();

        // Items on the snapshot no longer matter for the stored total.
        let mut compensating = order_event(1, vec![]);
        compensating.order.payment_code = Some(code.clone());

        let resolution = h.compensate(compensating).await;

        assert!(resolution.is_success());
        assert_eq!(
            resolution.into_event().order.saga_status.payment,
            StepStatus::RolledBack
        );
        let stored = store.payment_of(&code).await.unwrap();
        assert!(!stored.active);
        assert_eq!(stored.total_price, Money::from_cents(8100));
    }

    #[tokio::test]
    async fn compensate_unknown_code_is_rollback_failed() {
        let store = InMemoryPaymentStore::new();
        let mut event = order_event(1, vec![]);
        event.order.payment_code = Some(PaymentCode::generate());

        let resolution = handler(store).compensate(event).await;

        assert!(!resolution.is_success());
        assert_eq!(
            resolution.into_event().order.saga_status.payment,
            StepStatus::RollbackFailed
        );
    }

    #[tokio::test]
    async fn compensate_without_code_is_rollback_failed() {
        let store = InMemoryPaymentStore::new();
        let resolution = handler(store).compensate(order_event(1, vec![])).await;

        assert!(!resolution.is_success());
        assert_eq!(
            resolution.into_event().order.saga_status.payment,
            StepStatus::RollbackFailed
        );
    }
}
