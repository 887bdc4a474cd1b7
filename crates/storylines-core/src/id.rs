//! Identifier generation.
//!
//! Entity ids are opaque strings so that ids written by older versions of the
//! application (`p1`, `s-1718000000000`) keep working. New ids carry a short
//! prefix naming the entity kind.

use uuid::Uuid;

/// Abstraction over id generation for deterministic tests.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh identifier starting with `prefix`.
    fn next_id(&self, prefix: &str) -> String;
}

/// Production id generator backed by random UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", Uuid::new_v4().simple())
    }
}
