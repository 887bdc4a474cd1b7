//! Test id generator: predictable ids for assertions.

use std::sync::atomic::{AtomicU64, Ordering};

use storylines_core::id::IdGenerator;

/// Produces `"<prefix>-1"`, `"<prefix>-2"`, ... from one shared counter.
#[derive(Debug, Default)]
pub struct SequenceIdGenerator {
    next: AtomicU64,
}

impl SequenceIdGenerator {
    /// Creates a generator whose first id ends in `1`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn next_id(&self, prefix: &str) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{prefix}-{n}")
    }
}
