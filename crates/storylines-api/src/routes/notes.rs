//! Routes for world-building notes.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use storylines_board::application::command_handlers;
use storylines_board::domain::commands::{self, NotesEdit};
use storylines_core::error::DomainError;
use storylines_worldbuilding::QuestionnaireKind;
use storylines_worldbuilding::export::{entry_file_name, render_entry};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{CommandResponse, attachment_headers};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /{book_id}/notes
#[instrument(skip(state, edit))]
async fn edit_notes(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    Json(edit): Json<NotesEdit>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::EditNotes {
        correlation_id: Uuid::new_v4(),
        book_id,
        edit,
    };

    info!(
        correlation_id = %command.correlation_id,
        section = command.edit.section(),
        "handling edit_notes command"
    );

    let mut library = state.library.lock().await;
    let events = command_handlers::handle_edit_notes(
        &command,
        &mut library,
        state.clock.as_ref(),
        state.ids.as_ref(),
        state.store.as_ref(),
    )
    .await?;

    Ok(Json(CommandResponse::from_events(&events)))
}

/// GET /{book_id}/notes/{kind}/{entry_id}/export
#[instrument(skip(state))]
async fn export_entry(
    State(state): State<AppState>,
    Path((book_id, kind, entry_id)): Path<(String, QuestionnaireKind, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let library = state.library.lock().await;
    let entry = library
        .book(&book_id)?
        .notes()
        .entry(kind, &entry_id)
        .ok_or_else(|| DomainError::not_found("questionnaire entry", entry_id.clone()))?;

    let headers = attachment_headers("text/plain; charset=utf-8", &entry_file_name(kind, entry))?;
    Ok((headers, render_entry(kind, entry)))
}

/// Returns the router for world-building notes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{book_id}/notes", post(edit_notes))
        .route(
            "/{book_id}/notes/{kind}/{entry_id}/export",
            get(export_entry),
        )
}
