//! Aggregate root abstraction.

use crate::event::DomainEvent;

/// Trait for aggregate roots that record the events produced by commands.
///
/// Aggregates are persisted as whole snapshots; the recorded events describe
/// what a command changed and are drained by the application layer once the
/// command has been handled.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> &str;

    /// Returns uncommitted events produced by command handling.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Removes and returns the uncommitted events.
    fn take_uncommitted_events(&mut self) -> Vec<Self::Event>;
}
