//! StoryLines API server entry point.
//!
//! The server ships without a text generation backend: `refine` and
//! `drafts` answer `502 Bad Gateway` until a `TextGenerator` implementation
//! is passed to `Assistant::new` below in place of `UnconfiguredGenerator`.

use std::sync::Arc;

use storylines_api::config::AppConfig;
use storylines_api::error::AppError;
use storylines_api::state::AppState;
use storylines_assistant::{Assistant, UnconfiguredGenerator};
use storylines_board::application::library::load_library;
use storylines_core::clock::SystemClock;
use storylines_core::id::UuidIdGenerator;
use storylines_core::rng::SystemRng;
use storylines_store::FileSnapshotStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting StoryLines API server");

    let config = AppConfig::from_env()?;
    let addr = config.socket_addr()?;

    let store = Arc::new(FileSnapshotStore::new(&config.data_dir));
    let clock = Arc::new(SystemClock);
    let ids = Arc::new(UuidIdGenerator);
    let library = load_library(store.as_ref(), clock.as_ref(), ids.as_ref()).await;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        books = library.books().len(),
        "Library ready"
    );

    let app_state = AppState::new(
        library,
        clock,
        ids,
        Box::new(SystemRng::new()),
        store,
        // Swap in a real TextGenerator to enable AI-assisted writing.
        Assistant::new(Arc::new(UnconfiguredGenerator)),
    );
    let app = storylines_api::app(app_state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
