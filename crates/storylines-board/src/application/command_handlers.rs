//! Command handlers for the Board context.
//!
//! Each handler looks up the book, runs the domain operation, drains the
//! recorded events and saves the library when anything changed. References to
//! scenes or plotlines that no longer exist are treated as no-ops here, since
//! the board may still show an entity another action already removed.

use storylines_core::aggregate::AggregateRoot;
use storylines_core::clock::Clock;
use storylines_core::error::DomainError;
use storylines_core::id::IdGenerator;
use storylines_core::repository::SnapshotStore;
use storylines_core::rng::DeterministicRng;
use tracing::{debug, info};
use uuid::Uuid;

use super::library::{Library, persist};
use crate::domain::aggregates::Book;
use crate::domain::commands::{
    AddPlotline, AddScene, AddScenes, CreateBook, DeleteBook, DeletePlotline, DeleteScene,
    EditNotes, MoveScene, RecolorPlotline, RenamePlotline, RetitleBook, UpdateScene,
};
use crate::domain::events::BoardEvent;

/// Swallows `EntityNotFound` for the given entity kind.
fn ignore_missing(
    result: Result<(), DomainError>,
    kind: &'static str,
    correlation_id: Uuid,
) -> Result<(), DomainError> {
    match result {
        Err(err) if err.is_stale_reference(kind) => {
            debug!(%correlation_id, error = %err, "Ignoring command for missing entity");
            Ok(())
        }
        other => other,
    }
}

/// Drains the book's events and saves the library if there are any.
async fn commit(
    library: &mut Library,
    book_id: &str,
    store: &dyn SnapshotStore,
) -> Result<Vec<BoardEvent>, DomainError> {
    let events = library.book_mut(book_id)?.take_uncommitted_events();
    if !events.is_empty() {
        persist(library, store).await;
    }
    Ok(events)
}

/// Handles the `CreateBook` command and returns the new book id.
pub async fn handle_create_book(
    command: &CreateBook,
    library: &mut Library,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    store: &dyn SnapshotStore,
) -> String {
    let book_id = library.create_book(command.title.clone(), clock, ids);
    info!(correlation_id = %command.correlation_id, %book_id, "Created book");
    persist(library, store).await;
    book_id
}

/// Appends a fully built book (e.g. an imported backup) and returns its id.
pub async fn handle_append_book(
    book: Book,
    correlation_id: Uuid,
    library: &mut Library,
    store: &dyn SnapshotStore,
) -> String {
    let book_id = book.id.clone();
    library.append_book(book);
    info!(%correlation_id, %book_id, "Appended book");
    persist(library, store).await;
    book_id
}

/// Handles the `DeleteBook` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown books and
/// `DomainError::Validation` when deleting the last book.
pub async fn handle_delete_book(
    command: &DeleteBook,
    library: &mut Library,
    store: &dyn SnapshotStore,
) -> Result<(), DomainError> {
    library.delete_book(&command.book_id)?;
    info!(correlation_id = %command.correlation_id, book_id = %command.book_id, "Deleted book");
    persist(library, store).await;
    Ok(())
}

/// Handles the `RetitleBook` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown books.
pub async fn handle_retitle_book(
    command: &RetitleBook,
    library: &mut Library,
    clock: &dyn Clock,
    store: &dyn SnapshotStore,
) -> Result<Vec<BoardEvent>, DomainError> {
    library
        .book_mut(&command.book_id)?
        .retitle(command.title.clone(), command.correlation_id, clock);
    info!(correlation_id = %command.correlation_id, book_id = %command.book_id, "Retitled book");
    commit(library, &command.book_id, store).await
}

/// Handles the `AddPlotline` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown books.
pub async fn handle_add_plotline(
    command: &AddPlotline,
    library: &mut Library,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    rng: &mut dyn DeterministicRng,
    store: &dyn SnapshotStore,
) -> Result<Vec<BoardEvent>, DomainError> {
    let plotline_id = library.book_mut(&command.book_id)?.add_plotline(
        command.name.clone(),
        command.correlation_id,
        clock,
        ids,
        rng,
    );
    info!(correlation_id = %command.correlation_id, book_id = %command.book_id, %plotline_id, "Added plotline");
    commit(library, &command.book_id, store).await
}

/// Handles the `RenamePlotline` command. Unknown plotlines are ignored.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown books.
pub async fn handle_rename_plotline(
    command: &RenamePlotline,
    library: &mut Library,
    clock: &dyn Clock,
    store: &dyn SnapshotStore,
) -> Result<Vec<BoardEvent>, DomainError> {
    let result = library.book_mut(&command.book_id)?.rename_plotline(
        &command.plotline_id,
        command.name.clone(),
        command.correlation_id,
        clock,
    );
    ignore_missing(result, "plotline", command.correlation_id)?;
    commit(library, &command.book_id, store).await
}

/// Handles the `RecolorPlotline` command. Unknown plotlines are ignored.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown books.
pub async fn handle_recolor_plotline(
    command: &RecolorPlotline,
    library: &mut Library,
    clock: &dyn Clock,
    store: &dyn SnapshotStore,
) -> Result<Vec<BoardEvent>, DomainError> {
    let result = library.book_mut(&command.book_id)?.recolor_plotline(
        &command.plotline_id,
        command.color.clone(),
        command.correlation_id,
        clock,
    );
    ignore_missing(result, "plotline", command.correlation_id)?;
    commit(library, &command.book_id, store).await
}

/// Handles the `DeletePlotline` command. Unknown plotlines and the last
/// plotline of a book are left alone.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown books.
pub async fn handle_delete_plotline(
    command: &DeletePlotline,
    library: &mut Library,
    clock: &dyn Clock,
    store: &dyn SnapshotStore,
) -> Result<Vec<BoardEvent>, DomainError> {
    let result = library.book_mut(&command.book_id)?.delete_plotline(
        &command.plotline_id,
        command.correlation_id,
        clock,
    );
    match ignore_missing(result, "plotline", command.correlation_id) {
        Err(DomainError::Validation(reason)) => {
            debug!(correlation_id = %command.correlation_id, plotline_id = %command.plotline_id, %reason, "Kept last plotline");
        }
        other => other?,
    }
    let events = commit(library, &command.book_id, store).await?;
    if !events.is_empty() {
        info!(correlation_id = %command.correlation_id, book_id = %command.book_id, plotline_id = %command.plotline_id, "Deleted plotline");
    }
    Ok(events)
}

/// Handles the `AddScene` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown books and
/// `DomainError::EntityNotFound` for unknown plotlines.
pub async fn handle_add_scene(
    command: &AddScene,
    library: &mut Library,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    store: &dyn SnapshotStore,
) -> Result<Vec<BoardEvent>, DomainError> {
    let scene_id = library.book_mut(&command.book_id)?.add_scene(
        &command.plotline_id,
        command.at_position,
        command.correlation_id,
        clock,
        ids,
    )?;
    info!(correlation_id = %command.correlation_id, book_id = %command.book_id, %scene_id, "Added scene");
    commit(library, &command.book_id, store).await
}

/// Handles the `AddScenes` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown books and
/// `DomainError::EntityNotFound` for unknown plotlines.
pub async fn handle_add_scenes(
    command: &AddScenes,
    library: &mut Library,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    store: &dyn SnapshotStore,
) -> Result<Vec<BoardEvent>, DomainError> {
    let created = library.book_mut(&command.book_id)?.add_scenes(
        &command.plotline_id,
        command.drafts.clone(),
        command.correlation_id,
        clock,
        ids,
    )?;
    info!(correlation_id = %command.correlation_id, book_id = %command.book_id, count = created.len(), "Added scenes");
    commit(library, &command.book_id, store).await
}

/// Handles the `MoveScene` command. Unknown scenes are ignored.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown books and
/// `DomainError::EntityNotFound` for unknown target plotlines.
pub async fn handle_move_scene(
    command: &MoveScene,
    library: &mut Library,
    clock: &dyn Clock,
    store: &dyn SnapshotStore,
) -> Result<Vec<BoardEvent>, DomainError> {
    let result = library.book_mut(&command.book_id)?.move_scene(
        &command.scene_id,
        command.target_index,
        &command.target_plotline_id,
        command.correlation_id,
        clock,
    );
    ignore_missing(result, "scene", command.correlation_id)?;
    let events = commit(library, &command.book_id, store).await?;
    if !events.is_empty() {
        info!(
            correlation_id = %command.correlation_id,
            book_id = %command.book_id,
            scene_id = %command.scene_id,
            target_index = command.target_index,
            "Moved scene"
        );
    }
    Ok(events)
}

/// Handles the `UpdateScene` command. Unknown scenes are ignored.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown books.
pub async fn handle_update_scene(
    command: &UpdateScene,
    library: &mut Library,
    clock: &dyn Clock,
    store: &dyn SnapshotStore,
) -> Result<Vec<BoardEvent>, DomainError> {
    let result = library.book_mut(&command.book_id)?.update_scene(
        &command.scene_id,
        command.patch.clone(),
        command.correlation_id,
        clock,
    );
    ignore_missing(result, "scene", command.correlation_id)?;
    commit(library, &command.book_id, store).await
}

/// Handles the `DeleteScene` command. Unknown scenes are ignored.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown books.
pub async fn handle_delete_scene(
    command: &DeleteScene,
    library: &mut Library,
    clock: &dyn Clock,
    store: &dyn SnapshotStore,
) -> Result<Vec<BoardEvent>, DomainError> {
    let result = library.book_mut(&command.book_id)?.delete_scene(
        &command.scene_id,
        command.correlation_id,
        clock,
    );
    ignore_missing(result, "scene", command.correlation_id)?;
    let events = commit(library, &command.book_id, store).await?;
    if !events.is_empty() {
        info!(correlation_id = %command.correlation_id, book_id = %command.book_id, scene_id = %command.scene_id, "Deleted scene");
    }
    Ok(events)
}

/// Handles the `EditNotes` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown books and the
/// validation or not-found error of the edit itself.
pub async fn handle_edit_notes(
    command: &EditNotes,
    library: &mut Library,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    store: &dyn SnapshotStore,
) -> Result<Vec<BoardEvent>, DomainError> {
    library.book_mut(&command.book_id)?.edit_notes(
        command.edit.clone(),
        command.correlation_id,
        clock,
        ids,
    )?;
    info!(
        correlation_id = %command.correlation_id,
        book_id = %command.book_id,
        section = command.edit.section(),
        "Edited notes"
    );
    commit(library, &command.book_id, store).await
}
