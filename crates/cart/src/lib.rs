//! Cart service for the fulfillment choreography.
//!
//! Owns the cart ledger. The forward step deactivates a user's cart once
//! the order's stock has been reserved; the compensating step reactivates
//! it. Either compensation outcome forwards to Inventory's compensate
//! topic, the only upstream step that has already committed.

pub mod handler;
pub mod model;
pub mod router;
pub mod store;

pub use handler::{CartError, CartHandler};
pub use model::{CartItem, CartRecord};
pub use router::{CartRouter, CartStep, ROUTES};
pub use store::{CartStore, InMemoryCartStore};
