//! StoryLines: AI-assisted drafting.
//!
//! The text generation service is an external collaborator behind
//! [`generator::TextGenerator`]. At most one request runs at a time, and
//! results are applied to the library only once they arrive.

pub mod gate;
pub mod generator;
pub mod service;

pub use gate::{BusyGate, BusyGuard};
pub use generator::{TextGenerator, UnconfiguredGenerator};
pub use service::{Assistant, DraftScenes, RefineScene};
