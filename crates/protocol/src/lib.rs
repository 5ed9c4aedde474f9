//! Shared saga protocol for the order fulfillment choreography.
//!
//! This crate defines everything the four services agree on:
//! - the event envelope and order snapshot carried on every message
//! - the per-step status model
//! - the topic vocabulary
//! - the routing-table primitives that make the protocol graph data
//!
//! The services themselves (handlers, ledgers, routers) live in their own
//! crates and depend on this one.

pub mod event;
pub mod route;
pub mod status;
pub mod topic;

pub use event::{OrderEvent, OrderItem, OrderSnapshot};
pub use route::{Route, StepResolution, route_for};
pub use status::{SagaStatus, StepStatus};
pub use topic::Topic;
