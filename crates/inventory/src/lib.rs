//! Inventory service for the fulfillment choreography.
//!
//! Owns the stock ledger. On the forward path it decrements stock for an
//! order; on the compensating path it restores it. Failure of the commit
//! skips straight to the Order failure terminal, because no downstream
//! step has run yet.

pub mod handler;
pub mod model;
pub mod router;
pub mod store;

pub use handler::{InventoryError, InventoryHandler};
pub use model::InventoryRecord;
pub use router::{InventoryRouter, InventoryStep, ROUTES};
pub use store::{InMemoryInventoryStore, InventoryStore};
