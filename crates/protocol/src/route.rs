//! Routing-table primitives.
//!
//! Each service publishes its slice of the protocol graph as a `const`
//! table of [`Route`]s. A router only dispatches: it finds the route for
//! an incoming topic, runs the handler step, and forwards the handler's
//! resolution to the topic the table names for that outcome. All business
//! validation lives in the handlers.

use crate::event::OrderEvent;
use crate::topic::Topic;

/// What a step handler hands back to its router.
///
/// The handler has already converted any internal failure into a status
/// update on the snapshot; the resolution only selects the outgoing edge.
#[derive(Debug, Clone, PartialEq)]
pub enum StepResolution {
    /// The step achieved its goal (commit applied, or rollback applied).
    Success(OrderEvent),

    /// The step failed; the snapshot carries the failure status.
    Failure(OrderEvent),
}

impl StepResolution {
    /// Returns true for the success arm.
    pub fn is_success(&self) -> bool {
        matches!(self, StepResolution::Success(_))
    }

    /// Unwraps the enriched event.
    pub fn into_event(self) -> OrderEvent {
        match self {
            StepResolution::Success(event) | StepResolution::Failure(event) => event,
        }
    }
}

/// One row of a per-service routing table.
///
/// `S` is the service's own step discriminant (commit, compensate,
/// terminal update). An outgoing topic of `None` means the edge is a
/// terminal: nothing is forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route<S> {
    /// Topic this route consumes.
    pub incoming: Topic,

    /// Handler step the route dispatches to.
    pub step: S,

    /// Where a successful resolution is forwarded.
    pub on_success: Option<Topic>,

    /// Where a failed resolution is forwarded.
    pub on_failure: Option<Topic>,
}

impl<S: Copy> Route<S> {
    /// Selects the outgoing topic for a resolution.
    pub fn next_topic(&self, resolution: &StepResolution) -> Option<Topic> {
        if resolution.is_success() {
            self.on_success
        } else {
            self.on_failure
        }
    }
}

/// Looks up the route consuming `topic` in a service's table.
pub fn route_for<S: Copy>(table: &[Route<S>], topic: Topic) -> Option<Route<S>> {
    table.iter().copied().find(|route| route.incoming == topic)
}
