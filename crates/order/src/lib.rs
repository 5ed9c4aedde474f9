//! Order service for the fulfillment choreography.
//!
//! Starts every saga and records its outcome. `start` validates the user
//! against the directory, persists the order with an unset status triple
//! and publishes the first forward message. The router only ever applies
//! the two terminal updates; the Order service never re-enters the
//! forward chain.

pub mod directory;
pub mod handler;
pub mod model;
pub mod router;
pub mod store;

pub use directory::{DirectoryError, InMemoryUserDirectory, UserDirectory, UserRecord};
pub use handler::{OrderError, OrderHandler, PlaceOrder};
pub use model::OrderRecord;
pub use router::{OrderRouter, OrderStep, ROUTES};
pub use store::{InMemoryOrderStore, OrderStore};
