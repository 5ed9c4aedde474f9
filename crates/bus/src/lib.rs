//! Message bus abstraction for the fulfillment choreography.
//!
//! The protocol assumes a durable, at-least-once, topic-addressed bus.
//! This crate provides the [`MessageBus`] trait the services are written
//! against, an in-memory implementation for tests and demos, and the
//! [`SagaPublisher`] wrapper that logs and swallows publish failures —
//! saga decisions are made from ledger writes, never from send results.

pub mod memory;
pub mod publisher;

use async_trait::async_trait;
use protocol::{OrderEvent, Topic};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors raised by a bus implementation.
#[derive(Debug, Error)]
pub enum BusError {
    /// The broker rejected or lost the publish.
    #[error("publish to '{topic}' failed: {reason}")]
    PublishFailed { topic: Topic, reason: String },
}

/// Receiving half of a topic subscription.
pub type Subscription = mpsc::UnboundedReceiver<OrderEvent>;

/// Topic-addressed publish/subscribe.
///
/// Delivery is at-least-once with no ordering assumed across topics.
/// Implementations must be safe to share across worker tasks.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Publishes an event to every subscriber of `topic`.
    async fn publish(&self, topic: Topic, event: OrderEvent) -> Result<(), BusError>;

    /// Registers a new subscriber for `topic`.
    fn subscribe(&self, topic: Topic) -> Subscription;
}
