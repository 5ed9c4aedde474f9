//! Inventory step handler: commit and compensate.

use chrono::Utc;
use common::{InventoryCode, StoreError};
use protocol::{OrderEvent, StepResolution, StepStatus};
use thiserror::Error;

use crate::store::InventoryStore;

/// Failures local to an inventory step.
///
/// These never cross a topic boundary; the handler converts them into a
/// step status plus a resolution for the router.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// One or more ordered codes have no stock line. Partial application
    /// is not permitted, so any unknown code aborts the whole step.
    #[error("requested {requested} inventory records, found {found}")]
    NotFound { requested: usize, found: usize },

    /// Stock would go negative.
    #[error("insufficient stock for '{code}': requested {requested}, available {available}")]
    InsufficientStock {
        code: InventoryCode,
        requested: u32,
        available: u32,
    },

    /// The ledger write failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Direction of a stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Adjustment {
    Commit,
    Rollback,
}

/// Validates and applies stock adjustments for one order.
pub struct InventoryHandler<S> {
    store: S,
}

impl<S: InventoryStore> InventoryHandler<S> {
    /// Creates a handler over the given ledger store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Forward step: decrement stock by the ordered quantities.
    ///
    /// The whole batch is validated before any record is persisted, so a
    /// failure leaves every stock line untouched.
    pub async fn commit(&self, mut event: OrderEvent) -> StepResolution {
        match self.adjust(&event, Adjustment::Commit).await {
            Ok(()) => {
                event.order.saga_status.inventory = StepStatus::Successful;
                StepResolution::Success(event)
            }
            Err(error) => {
                metrics::counter!("saga_step_failures_total", "service" => "inventory")
                    .increment(1);
                tracing::error!(saga_id = %event.saga_id(), %error, "inventory commit failed");
                event.order.saga_status.inventory = StepStatus::Failed;
                StepResolution::Failure(event)
            }
        }
    }

    /// Compensating step: add the ordered quantities back.
    ///
    /// Restoring stock cannot go negative by construction, so no stock
    /// ceiling is checked. The chain is forwarded even when the rollback
    /// itself fails; that outcome needs an operator, not a retry.
    pub async fn compensate(&self, mut event: OrderEvent) -> StepResolution {
        match self.adjust(&event, Adjustment::Rollback).await {
            Ok(()) => {
                event.order.saga_status.inventory = StepStatus::RolledBack;
                StepResolution::Success(event)
            }
            Err(error) => {
                metrics::counter!("saga_step_failures_total", "service" => "inventory")
                    .increment(1);
                tracing::warn!(
                    saga_id = %event.saga_id(),
                    %error,
                    "inventory rollback failed, stock needs manual reconciliation"
                );
                event.order.saga_status.inventory = StepStatus::RollbackFailed;
                StepResolution::Failure(event)
            }
        }
    }

    async fn adjust(&self, event: &OrderEvent, adjustment: Adjustment) -> Result<(), InventoryError> {
        let requested: Vec<(InventoryCode, u32)> = event
            .order
            .order_items
            .iter()
            .map(|item| (item.inventory_code.clone(), item.quantity))
            .collect();

        // Lookup is by distinct code, so an order repeating a code yields
        // fewer records than lines and fails the size comparison below.
        let mut codes: Vec<InventoryCode> = Vec::with_capacity(requested.len());
        for (code, _) in &requested {
            if !codes.contains(code) {
                codes.push(code.clone());
            }
        }

        tracing::info!(
            saga_id = %event.saga_id(),
            items = requested.len(),
            ?adjustment,
            "adjusting stock"
        );

        let mut found = self.store.find_by_codes(&codes).await?;
        let found_len = found.len();
        if found_len != requested.len() {
            return Err(InventoryError::NotFound {
                requested: requested.len(),
                found: found_len,
            });
        }

        let now = Utc::now();
        for record in &mut found {
            let quantity = requested
                .iter()
                .find(|(code, _)| *code == record.code)
                .map(|(_, quantity)| *quantity)
                .ok_or(InventoryError::NotFound {
                    requested: requested.len(),
                    found: found_len,
                })?;

            record.quantity = match adjustment {
                Adjustment::Commit => record.quantity.checked_sub(quantity).ok_or(
                    InventoryError::InsufficientStock {
                        code: record.code.clone(),
                        requested: quantity,
                        available: record.quantity,
                    },
                )?,
                Adjustment::Rollback => record.quantity.saturating_add(quantity),
            };
            record.update_date = now;
        }

        self.store.save_all(found).await?;
        Ok(())
    }
}
