//! Shared application state.

use std::sync::Arc;

use storylines_assistant::Assistant;
use storylines_board::application::library::Library;
use storylines_core::clock::Clock;
use storylines_core::id::IdGenerator;
use storylines_core::repository::SnapshotStore;
use storylines_core::rng::DeterministicRng;
use tokio::sync::Mutex;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The library; every mutation runs under this lock.
    pub library: Arc<Mutex<Library>>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Id source for new entities.
    pub ids: Arc<dyn IdGenerator>,
    /// Randomness for plotline colors.
    pub rng: Arc<Mutex<Box<dyn DeterministicRng>>>,
    /// Where the library is saved.
    pub store: Arc<dyn SnapshotStore>,
    /// AI drafting assistant.
    pub assistant: Arc<Assistant>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        library: Library,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        rng: Box<dyn DeterministicRng>,
        store: Arc<dyn SnapshotStore>,
        assistant: Assistant,
    ) -> Self {
        Self {
            library: Arc::new(Mutex::new(library)),
            clock,
            ids,
            rng: Arc::new(Mutex::new(rng)),
            store,
            assistant: Arc::new(assistant),
        }
    }
}
