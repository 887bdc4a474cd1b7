//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An aggregate (a book) was not found.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(String),

    /// An entity inside an aggregate was not found.
    #[error("{kind} not found: {id}")]
    EntityNotFound {
        /// The kind of entity, e.g. `"scene"` or `"plotline"`.
        kind: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// The operation conflicts with work already in progress.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An external collaborator (e.g. the text generation service) failed.
    #[error("external service error: {0}")]
    External(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for an `EntityNotFound` error.
    #[must_use]
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::EntityNotFound {
            kind,
            id: id.into(),
        }
    }

    /// Returns `true` if this error means an entity of `kind` no longer
    /// exists.
    #[must_use]
    pub fn is_stale_reference(&self, kind: &str) -> bool {
        matches!(self, Self::EntityNotFound { kind: missing, .. } if *missing == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_not_found_message_names_kind_and_id() {
        let err = DomainError::not_found("scene", "s-1");

        assert_eq!(err.to_string(), "scene not found: s-1");
        assert!(err.is_stale_reference("scene"));
        assert!(!err.is_stale_reference("plotline"));
    }

    #[test]
    fn test_validation_is_not_a_stale_reference() {
        assert!(!DomainError::Validation("bad".into()).is_stale_reference("scene"));
    }
}
