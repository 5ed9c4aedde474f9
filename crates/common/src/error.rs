//! Shared storage error.

use thiserror::Error;

/// A failed write or read against a service's durable ledger.
///
/// Every ledger trait reports failures with this opaque type; the owning
/// handler converts it into a step outcome, so the concrete storage engine
/// never leaks across a topic boundary.
#[derive(Debug, Clone, Error)]
#[error("ledger store error: {0}")]
pub struct StoreError(String);

impl StoreError {
    /// Creates a store error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_displays_message() {
        let err = StoreError::new("disk full");
        assert_eq!(err.to_string(), "ledger store error: disk full");
    }
}
