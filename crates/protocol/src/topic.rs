//! Topic vocabulary of the fulfillment choreography.

use serde::{Deserialize, Serialize};

/// The closed set of topics the protocol publishes and subscribes on.
///
/// Forward chain:
/// ```text
/// order-start-ext ─► inventory-commit-ok ─► cart-commit-ok ─► payment-commit-ok
///   (Inventory)          (Cart)                (Payment)         (Order: completed)
/// ```
///
/// Failure and compensation chain:
/// ```text
/// inventory-commit-fail ──────────────────────────► Order: failed
/// cart-commit-fail / payment-commit-fail ─► upstream compensate
/// cart-compensate-done ─► Inventory compensate
/// inventory-compensate-done ─► Order: failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    /// Order placed; consumed by Inventory's commit handler.
    #[serde(rename = "order-start-ext")]
    OrderStart,

    /// Inventory committed; consumed by Cart's commit handler.
    InventoryCommitOk,

    /// Cart committed; consumed by Payment's commit handler.
    CartCommitOk,

    /// Payment committed; consumed by Order as the success terminal.
    PaymentCommitOk,

    /// Inventory commit failed; consumed by Order as the failure terminal
    /// (no downstream step ever ran, so nothing needs compensating).
    InventoryCommitFail,

    /// Cart commit failed; consumed by Inventory's compensate handler.
    CartCommitFail,

    /// Payment commit failed; consumed by Cart's compensate handler.
    PaymentCommitFail,

    /// Cart compensation finished; consumed by Inventory's compensate handler.
    CartCompensateDone,

    /// Inventory compensation finished; consumed by Order as the failure
    /// terminal.
    InventoryCompensateDone,

    /// Operator re-entry into Payment's compensate handler. Nothing in the
    /// protocol emits to this topic.
    PaymentCompensate,
}

impl Topic {
    /// All topics, in forward-then-compensation order.
    pub const ALL: [Topic; 10] = [
        Topic::OrderStart,
        Topic::InventoryCommitOk,
        Topic::CartCommitOk,
        Topic::PaymentCommitOk,
        Topic::InventoryCommitFail,
        Topic::CartCommitFail,
        Topic::PaymentCommitFail,
        Topic::CartCompensateDone,
        Topic::InventoryCompensateDone,
        Topic::PaymentCompensate,
    ];

    /// Returns the wire name of the topic.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::OrderStart => "order-start-ext",
            Topic::InventoryCommitOk => "inventory-commit-ok",
            Topic::CartCommitOk => "cart-commit-ok",
            Topic::PaymentCommitOk => "payment-commit-ok",
            Topic::InventoryCommitFail => "inventory-commit-fail",
            Topic::CartCommitFail => "cart-commit-fail",
            Topic::PaymentCommitFail => "payment-commit-fail",
            Topic::CartCompensateDone => "cart-compensate-done",
            Topic::InventoryCompensateDone => "inventory-compensate-done",
            Topic::PaymentCompensate => "payment-compensate",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_are_unique() {
        let mut names: Vec<_> = Topic::ALL.iter().map(|t| t.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Topic::ALL.len());
    }

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(Topic::OrderStart.to_string(), "order-start-ext");
        assert_eq!(
            Topic::InventoryCompensateDone.to_string(),
            "inventory-compensate-done"
        );
    }

    #[test]
    fn test_serde_names_match_wire_names() {
        for topic in Topic::ALL {
            let json = serde_json::to_string(&topic).unwrap();
            assert_eq!(json, format!("\"{}\"", topic.as_str()));
        }
    }
}
