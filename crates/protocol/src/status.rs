//! Per-step saga status model.

use serde::{Deserialize, Serialize};

/// Outcome of one saga step, tracked per service on the order snapshot.
///
/// Step transitions:
/// ```text
/// NotStarted ──┬──► Successful ──► RolledBack
///              │                └► RollbackFailed
///              └──► Failed
/// ```
///
/// `NotStarted` is explicit rather than an absent/null value so that a
/// snapshot always carries a well-formed status triple. Once a step is
/// `Failed` it is never retried by the protocol; failure either skips to
/// the failure terminal or triggers upstream compensation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    /// The step has not been attempted.
    #[default]
    NotStarted,

    /// The forward action committed.
    Successful,

    /// The forward action failed; no ledger mutation persisted.
    Failed,

    /// The compensating action undid a prior commit.
    RolledBack,

    /// The compensating action itself failed. Requires operator attention.
    RollbackFailed,
}

impl StepStatus {
    /// Returns true once the step has been attempted.
    pub fn is_set(&self) -> bool {
        !matches!(self, StepStatus::NotStarted)
    }

    /// Returns true if this outcome leaves the ledger in a state an
    /// operator must reconcile by hand.
    pub fn needs_operator(&self) -> bool {
        matches!(self, StepStatus::RollbackFailed)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::NotStarted => "NOT_STARTED",
            StepStatus::Successful => "SUCCESSFUL",
            StepStatus::Failed => "FAILED",
            StepStatus::RolledBack => "ROLLED_BACK",
            StepStatus::RollbackFailed => "ROLLBACK_FAILED",
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The status triple an external observer uses to reconstruct saga outcome.
///
/// All three start `NotStarted` at order creation, are filled strictly
/// left-to-right on the forward path, and are overwritten with rollback
/// outcomes on the compensating path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SagaStatus {
    /// Outcome of the inventory step.
    pub inventory: StepStatus,
    /// Outcome of the cart step.
    pub cart: StepStatus,
    /// Outcome of the payment step.
    pub payment: StepStatus,
}

impl SagaStatus {
    /// Returns a fresh triple with no step attempted.
    pub fn unset() -> Self {
        Self::default()
    }

    /// Returns true if every step committed.
    pub fn is_completed(&self) -> bool {
        self.inventory == StepStatus::Successful
            && self.cart == StepStatus::Successful
            && self.payment == StepStatus::Successful
    }
}

impl std::fmt::Display for SagaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "inventory={} cart={} payment={}",
            self.inventory, self.cart, self.payment
        )
    }
}
