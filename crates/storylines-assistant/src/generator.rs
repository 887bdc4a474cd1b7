//! The text generation seam.

use async_trait::async_trait;
use storylines_board::domain::model::SceneDraft;
use storylines_core::error::DomainError;

/// External service that writes prose.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Writes a continuation of the scene. The caller appends it.
    async fn continue_scene(&self, title: &str, content: &str) -> Result<String, DomainError>;

    /// Splits free text into titled scene drafts, in reading order.
    async fn split_into_scenes(&self, text: &str) -> Result<Vec<SceneDraft>, DomainError>;
}

/// Generator used when no service is configured. Every call fails.
#[derive(Debug, Default)]
pub struct UnconfiguredGenerator;

const NOT_CONFIGURED: &str = "text generation is not configured";

#[async_trait]
impl TextGenerator for UnconfiguredGenerator {
    async fn continue_scene(&self, _title: &str, _content: &str) -> Result<String, DomainError> {
        Err(DomainError::External(NOT_CONFIGURED.to_owned()))
    }

    async fn split_into_scenes(&self, _text: &str) -> Result<Vec<SceneDraft>, DomainError> {
        Err(DomainError::External(NOT_CONFIGURED.to_owned()))
    }
}
