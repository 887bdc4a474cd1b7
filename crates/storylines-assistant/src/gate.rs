//! Single-flight gate for assistant requests.

use std::sync::atomic::{AtomicBool, Ordering};

use storylines_core::error::DomainError;

/// Admits one request at a time.
#[derive(Debug, Default)]
pub struct BusyGate {
    busy: AtomicBool,
}

/// Holds the gate closed; reopens it when dropped, whatever the outcome of
/// the request.
#[derive(Debug)]
pub struct BusyGuard<'a> {
    busy: &'a AtomicBool,
}

impl BusyGate {
    /// Creates an open gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the gate for the lifetime of the returned guard.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Conflict` if another request holds the gate.
    pub fn try_acquire(&self) -> Result<BusyGuard<'_>, DomainError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BusyGuard { busy: &self.busy })
            .map_err(|_| DomainError::Conflict("an assistant request is already running".to_owned()))
    }

    /// Returns `true` while a request holds the gate.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_conflicts_until_guard_drops() {
        // Arrange
        let gate = BusyGate::new();

        // Act
        let guard = gate.try_acquire().unwrap();
        let second = gate.try_acquire();

        // Assert
        assert!(matches!(second, Err(DomainError::Conflict(_))));
        assert!(gate.is_busy());
        drop(guard);
        assert!(!gate.is_busy());
        assert!(gate.try_acquire().is_ok());
    }
}
