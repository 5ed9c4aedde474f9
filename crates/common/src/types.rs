use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation key for one saga run.
///
/// Assigned exactly once by the Order service when an order is placed.
/// Every service looks up or creates its local record by this key, never
/// by another service's storage-generated identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SagaId(Uuid);

impl SagaId {
    /// Creates a new random saga ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a saga ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SagaId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SagaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for SagaId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<SagaId> for Uuid {
    fn from(id: SagaId) -> Self {
        id.0
    }
}

/// Customer identity as known to the user directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Creates a user ID from a raw value.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Stock-keeping code identifying an inventory record.
///
/// Also the business key of order, cart and payment line items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryCode(String);

impl InventoryCode {
    /// Creates a new inventory code from a string.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InventoryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for InventoryCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for InventoryCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for InventoryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Business key of a payment record.
///
/// Assigned by the Payment service on first commit and reused when the
/// same payment is compensated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentCode(String);

impl PaymentCode {
    /// Mints a fresh unique payment code.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates a payment code from an existing string.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaymentCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PaymentCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PaymentCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saga_id_new_creates_unique_ids() {
        let id1 = SagaId::new();
        let id2 = SagaId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn saga_id_from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        let id = SagaId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
    }

    #[test]
    fn saga_id_serialization_roundtrip() {
        let id = SagaId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: SagaId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn user_id_display_is_raw_value() {
        assert_eq!(UserId::new(42).to_string(), "42");
    }

    #[test]
    fn inventory_code_string_conversion() {
        let code = InventoryCode::new("INV-001");
        assert_eq!(code.as_str(), "INV-001");

        let code2: InventoryCode = "INV-002".into();
        assert_eq!(code2.as_str(), "INV-002");
    }

    #[test]
    fn payment_code_generate_is_unique() {
        let c1 = PaymentCode::generate();
        let c2 = PaymentCode::generate();
        assert_ne!(c1, c2);
    }
}
