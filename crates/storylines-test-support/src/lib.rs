//! Shared test mocks and utilities for StoryLines.

mod clock;
mod ids;
mod rng;
mod store;

pub use clock::{FixedClock, fixed_clock};
pub use ids::SequenceIdGenerator;
pub use rng::{MockRng, SequenceRng};
pub use store::{FailingSnapshotStore, InMemorySnapshotStore};
