//! Shared types for the order fulfillment choreography.
//!
//! This crate provides the identifier newtypes, the money type and the
//! storage error shared by every service crate. Nothing here carries
//! business logic — services only agree on these vocabulary types.

pub mod error;
pub mod money;
pub mod types;

pub use error::StoreError;
pub use money::Money;
pub use types::{InventoryCode, PaymentCode, SagaId, UserId};
