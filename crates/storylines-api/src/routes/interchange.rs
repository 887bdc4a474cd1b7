//! Routes for file interchange: manuscript and backup downloads, backup
//! import.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use storylines_board::application::command_handlers;
use storylines_interchange::backup::{backup_file_name, export_backup, import_backup};
use storylines_interchange::manuscript::{manuscript_file_name, render_manuscript};
use tracing::{info, instrument};
use uuid::Uuid;

use super::board::VisibleQuery;
use super::books::CreatedBookResponse;
use super::{attachment_headers, visible_filter};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /{book_id}/export/manuscript
#[instrument(skip(state))]
async fn export_manuscript(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    Query(query): Query<VisibleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let visible = visible_filter(query.visible.as_deref());
    let library = state.library.lock().await;
    let book = library.book(&book_id)?;

    let headers = attachment_headers(
        "text/plain; charset=utf-8",
        &manuscript_file_name(book.title()),
    )?;
    Ok((headers, render_manuscript(book, visible.as_deref())))
}

/// GET /{book_id}/export/backup
#[instrument(skip(state))]
async fn export_book_backup(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let library = state.library.lock().await;
    let book = library.book(&book_id)?;

    let headers = attachment_headers("application/json", &backup_file_name(book.title()))?;
    Ok((headers, export_backup(book)?))
}

/// POST /import
///
/// The body is the raw backup file.
#[instrument(skip(state, body))]
async fn import_book(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<CreatedBookResponse>), ApiError> {
    let correlation_id = Uuid::new_v4();
    info!(%correlation_id, bytes = body.len(), "handling import_book command");

    let book = import_backup(&body, state.clock.as_ref(), state.ids.as_ref())?;

    let mut library = state.library.lock().await;
    let book_id =
        command_handlers::handle_append_book(book, correlation_id, &mut library, state.store.as_ref())
            .await;

    Ok((StatusCode::CREATED, Json(CreatedBookResponse { book_id })))
}

/// Returns the router for file interchange.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/import", post(import_book))
        .route("/{book_id}/export/manuscript", get(export_manuscript))
        .route("/{book_id}/export/backup", get(export_book_backup))
}
