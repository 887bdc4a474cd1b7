//! Assistant flows: refine a scene, draft scenes from pasted text.

use std::sync::Arc;

use storylines_board::application::command_handlers::{handle_add_scenes, handle_update_scene};
use storylines_board::application::library::Library;
use storylines_board::domain::commands::{AddScenes, UpdateScene};
use storylines_board::domain::events::BoardEvent;
use storylines_board::domain::model::ScenePatch;
use storylines_core::clock::Clock;
use storylines_core::error::DomainError;
use storylines_core::id::IdGenerator;
use storylines_core::repository::SnapshotStore;
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::gate::BusyGate;
use crate::generator::TextGenerator;

/// Command to extend a scene with generated prose.
#[derive(Debug, Clone)]
pub struct RefineScene {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning book.
    pub book_id: String,
    /// The scene to extend.
    pub scene_id: String,
}

/// Command to turn pasted text into new scenes.
#[derive(Debug, Clone)]
pub struct DraftScenes {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning book.
    pub book_id: String,
    /// The plotline that receives the drafts.
    pub plotline_id: String,
    /// The text to split.
    pub text: String,
}

/// Runs assistant requests against the shared library.
///
/// The library lock is never held while the generator is working, so the
/// author can keep editing; results are applied to whatever the library
/// looks like when they arrive.
pub struct Assistant {
    generator: Arc<dyn TextGenerator>,
    gate: BusyGate,
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("busy", &self.gate.is_busy())
            .finish_non_exhaustive()
    }
}

impl Assistant {
    /// Creates an assistant backed by `generator`.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            gate: BusyGate::new(),
        }
    }

    /// Returns `true` while a request is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Appends a generated continuation to a scene.
    ///
    /// The continuation is joined to the scene's content as it is when the
    /// response arrives. If the scene was deleted meanwhile, the response is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Conflict` while another request runs,
    /// `DomainError::AggregateNotFound` for unknown books and
    /// `DomainError::External` if the generator fails. The library is left
    /// untouched on error.
    pub async fn refine_scene(
        &self,
        command: &RefineScene,
        library: &Mutex<Library>,
        clock: &dyn Clock,
        store: &dyn SnapshotStore,
    ) -> Result<Vec<BoardEvent>, DomainError> {
        let _guard = self.gate.try_acquire()?;

        let (title, content) = {
            let library = library.lock().await;
            match library.book(&command.book_id)?.scene(&command.scene_id) {
                Some(scene) => (scene.title.clone(), scene.content.clone()),
                None => {
                    debug!(correlation_id = %command.correlation_id, scene_id = %command.scene_id, "Refine requested for missing scene");
                    return Ok(Vec::new());
                }
            }
        };

        let continuation = self
            .generator
            .continue_scene(&title, &content)
            .await
            .inspect_err(|e| {
                error!(correlation_id = %command.correlation_id, error = %e, "Scene refinement failed");
            })?;

        let mut library = library.lock().await;
        let current = library
            .book(&command.book_id)
            .ok()
            .and_then(|book| book.scene(&command.scene_id))
            .map(|scene| scene.content.clone());
        let Some(current) = current else {
            info!(correlation_id = %command.correlation_id, scene_id = %command.scene_id, "Scene gone before refinement arrived; discarding");
            return Ok(Vec::new());
        };

        let update = UpdateScene {
            correlation_id: command.correlation_id,
            book_id: command.book_id.clone(),
            scene_id: command.scene_id.clone(),
            patch: ScenePatch::content(format!("{current}\n\n{continuation}")),
        };
        let events = handle_update_scene(&update, &mut library, clock, store).await?;
        info!(correlation_id = %command.correlation_id, scene_id = %command.scene_id, "Refined scene");
        Ok(events)
    }

    /// Splits pasted text into scenes and appends them to the end of the
    /// board, in order, on one plotline.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Conflict` while another request runs,
    /// `DomainError::AggregateNotFound` / `DomainError::EntityNotFound` for
    /// unknown books or plotlines and `DomainError::External` if the
    /// generator fails. The library is left untouched on error.
    pub async fn draft_scenes(
        &self,
        command: &DraftScenes,
        library: &Mutex<Library>,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
        store: &dyn SnapshotStore,
    ) -> Result<Vec<BoardEvent>, DomainError> {
        let _guard = self.gate.try_acquire()?;

        {
            let library = library.lock().await;
            let book = library.book(&command.book_id)?;
            if book.plotline(&command.plotline_id).is_none() {
                return Err(DomainError::not_found("plotline", command.plotline_id.clone()));
            }
        }

        let drafts = self
            .generator
            .split_into_scenes(&command.text)
            .await
            .inspect_err(|e| {
                error!(correlation_id = %command.correlation_id, error = %e, "Scene drafting failed");
            })?;
        if drafts.is_empty() {
            debug!(correlation_id = %command.correlation_id, "Generator returned no drafts");
            return Ok(Vec::new());
        }

        let mut library = library.lock().await;
        let add = AddScenes {
            correlation_id: command.correlation_id,
            book_id: command.book_id.clone(),
            plotline_id: command.plotline_id.clone(),
            drafts,
        };
        handle_add_scenes(&add, &mut library, clock, ids, store).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use storylines_board::domain::model::SceneDraft;
    use storylines_test_support::{InMemorySnapshotStore, SequenceIdGenerator, fixed_clock};
    use tokio::sync::Notify;

    use crate::generator::UnconfiguredGenerator;

    const BOOK: &str = "book-1";

    /// Answers from a script; optionally parks each call until released.
    #[derive(Default)]
    struct ScriptedGenerator {
        continuation: String,
        drafts: Vec<SceneDraft>,
        hold: bool,
        started: Notify,
        release: Notify,
    }

    impl ScriptedGenerator {
        fn continuing(text: &str) -> Self {
            Self {
                continuation: text.to_owned(),
                ..Self::default()
            }
        }

        fn held(text: &str) -> Self {
            Self {
                continuation: text.to_owned(),
                hold: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn continue_scene(&self, _title: &str, _content: &str) -> Result<String, DomainError> {
            if self.hold {
                self.started.notify_one();
                self.release.notified().await;
            }
            Ok(self.continuation.clone())
        }

        async fn split_into_scenes(&self, _text: &str) -> Result<Vec<SceneDraft>, DomainError> {
            Ok(self.drafts.clone())
        }
    }

    fn library(ids: &SequenceIdGenerator) -> Mutex<Library> {
        Mutex::new(Library::with_default_book(&fixed_clock(), ids))
    }

    fn refine(scene_id: &str) -> RefineScene {
        RefineScene {
            correlation_id: Uuid::new_v4(),
            book_id: BOOK.into(),
            scene_id: scene_id.into(),
        }
    }

    async fn content_of(library: &Mutex<Library>, scene_id: &str) -> Option<String> {
        library
            .lock()
            .await
            .book(BOOK)
            .unwrap()
            .scene(scene_id)
            .map(|s| s.content.clone())
    }

    #[tokio::test]
    async fn test_refine_scene_appends_continuation() {
        // Arrange
        let ids = SequenceIdGenerator::new();
        let library = library(&ids);
        let store = InMemorySnapshotStore::new();
        let assistant = Assistant::new(Arc::new(ScriptedGenerator::continuing("More.")));

        // Act
        let events = assistant
            .refine_scene(&refine("s2"), &library, &fixed_clock(), &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(events.len(), 1);
        assert_eq!(
            content_of(&library, "s2").await.unwrap(),
            "הנבל מתכנן משהו...\n\nMore."
        );
        assert_eq!(store.save_count(), 1);
        assert!(!assistant.is_busy());
    }

    #[tokio::test]
    async fn test_refine_appends_to_content_edited_while_waiting() {
        // Arrange
        let ids = SequenceIdGenerator::new();
        let library = library(&ids);
        let store = InMemorySnapshotStore::new();
        let generator = Arc::new(ScriptedGenerator::held("More."));
        let assistant = Assistant::new(generator.clone());
        let clock = fixed_clock();

        // Act
        let refine_request = refine("s2");
        let request = assistant.refine_scene(&refine_request, &library, &clock, &store);
        let edit = async {
            generator.started.notified().await;
            library
                .lock()
                .await
                .book_mut(BOOK)
                .unwrap()
                .update_scene("s2", ScenePatch::content("Edited".into()), Uuid::new_v4(), &clock)
                .unwrap();
            generator.release.notify_one();
        };
        let (result, ()) = tokio::join!(request, edit);

        // Assert
        result.unwrap();
        assert_eq!(content_of(&library, "s2").await.unwrap(), "Edited\n\nMore.");
    }

    #[tokio::test]
    async fn test_refine_discards_result_for_deleted_scene() {
        // Arrange
        let ids = SequenceIdGenerator::new();
        let library = library(&ids);
        let store = InMemorySnapshotStore::new();
        let generator = Arc::new(ScriptedGenerator::held("More."));
        let assistant = Assistant::new(generator.clone());
        let clock = fixed_clock();

        // Act
        let refine_request = refine("s2");
        let request = assistant.refine_scene(&refine_request, &library, &clock, &store);
        let delete = async {
            generator.started.notified().await;
            library
                .lock()
                .await
                .book_mut(BOOK)
                .unwrap()
                .delete_scene("s2", Uuid::new_v4(), &clock)
                .unwrap();
            generator.release.notify_one();
        };
        let (result, ()) = tokio::join!(request, delete);

        // Assert
        assert!(result.unwrap().is_empty());
        assert_eq!(store.save_count(), 0);
        assert!(content_of(&library, "s2").await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_request_is_rejected_while_busy() {
        // Arrange
        let ids = SequenceIdGenerator::new();
        let library = library(&ids);
        let store = InMemorySnapshotStore::new();
        let generator = Arc::new(ScriptedGenerator::held("More."));
        let assistant = Assistant::new(generator.clone());
        let clock = fixed_clock();

        // Act
        let first_request = refine("s1");
        let first = assistant.refine_scene(&first_request, &library, &clock, &store);
        let second = async {
            generator.started.notified().await;
            let result = assistant
                .refine_scene(&refine("s3"), &library, &clock, &store)
                .await;
            generator.release.notify_one();
            result
        };
        let (first, second) = tokio::join!(first, second);

        // Assert
        assert_eq!(first.unwrap().len(), 1);
        assert!(matches!(second, Err(DomainError::Conflict(_))));
        assert!(!assistant.is_busy());
    }

    #[tokio::test]
    async fn test_generator_failure_leaves_library_untouched_and_clears_gate() {
        // Arrange
        let ids = SequenceIdGenerator::new();
        let library = library(&ids);
        let before = library.lock().await.to_snapshot().unwrap();
        let store = InMemorySnapshotStore::new();
        let assistant = Assistant::new(Arc::new(UnconfiguredGenerator));

        // Act
        let result = assistant
            .refine_scene(&refine("s1"), &library, &fixed_clock(), &store)
            .await;

        // Assert
        assert!(matches!(result, Err(DomainError::External(_))));
        assert_eq!(library.lock().await.to_snapshot().unwrap(), before);
        assert_eq!(store.save_count(), 0);
        assert!(!assistant.is_busy());
    }

    #[tokio::test]
    async fn test_draft_scenes_appends_in_order() {
        // Arrange
        let ids = SequenceIdGenerator::new();
        let library = library(&ids);
        let store = InMemorySnapshotStore::new();
        let generator = ScriptedGenerator {
            drafts: vec![
                SceneDraft {
                    title: "Arrival".into(),
                    content: "They land.".into(),
                },
                SceneDraft {
                    title: "Storm".into(),
                    content: "Rain.".into(),
                },
            ],
            ..ScriptedGenerator::default()
        };
        let assistant = Assistant::new(Arc::new(generator));
        let command = DraftScenes {
            correlation_id: Uuid::new_v4(),
            book_id: BOOK.into(),
            plotline_id: "p2".into(),
            text: "They land. Rain.".into(),
        };

        // Act
        let events = assistant
            .draft_scenes(&command, &library, &fixed_clock(), &ids, &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(events.len(), 2);
        let library = library.lock().await;
        let tail: Vec<(&str, &str, usize)> = library.book(BOOK).unwrap().scenes()[3..]
            .iter()
            .map(|s| (s.title.as_str(), s.plotline_id.as_str(), s.position))
            .collect();
        assert_eq!(tail, vec![("Arrival", "p2", 3), ("Storm", "p2", 4)]);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_draft_scenes_for_unknown_plotline_is_rejected() {
        let ids = SequenceIdGenerator::new();
        let library = library(&ids);
        let store = InMemorySnapshotStore::new();
        let assistant = Assistant::new(Arc::new(ScriptedGenerator::default()));
        let command = DraftScenes {
            correlation_id: Uuid::new_v4(),
            book_id: BOOK.into(),
            plotline_id: "gone".into(),
            text: "Anything".into(),
        };

        let result = assistant
            .draft_scenes(&command, &library, &fixed_clock(), &ids, &store)
            .await;

        assert!(matches!(result, Err(DomainError::EntityNotFound { .. })));
        assert!(!assistant.is_busy());
    }
}
