//! Payment service for the fulfillment choreography.
//!
//! Owns the payment ledger. The forward step captures a payment for the
//! order, assigning the payment code and computing the total price that
//! the Order service will record on completion. The compensating step
//! deactivates a previously captured payment. Both failure paths route to
//! Cart's compensate topic.

pub mod handler;
pub mod model;
pub mod router;
pub mod store;

pub use handler::{PaymentError, PaymentHandler};
pub use model::{PaymentItem, PaymentRecord};
pub use router::{PaymentRouter, PaymentStep, ROUTES};
pub use store::{InMemoryPaymentStore, PaymentStore};
