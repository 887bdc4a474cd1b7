//! Routes for AI-assisted writing.
//!
//! Both requests hold the library lock only while reading or applying, never
//! while the generator runs. A second request while one is in flight gets
//! `409 Conflict`.

use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use storylines_assistant::{DraftScenes, RefineScene};
use tracing::{info, instrument};
use uuid::Uuid;

use super::CommandResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /{book_id}/drafts.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftScenesRequest {
    /// The plotline that receives the new scenes.
    pub plotline_id: String,
    /// Free text to split into scenes.
    pub text: String,
}

/// POST /{book_id}/scenes/{scene_id}/refine
#[instrument(skip(state))]
async fn refine_scene(
    State(state): State<AppState>,
    Path((book_id, scene_id)): Path<(String, String)>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = RefineScene {
        correlation_id: Uuid::new_v4(),
        book_id,
        scene_id,
    };

    info!(correlation_id = %command.correlation_id, "handling refine_scene command");

    let events = state
        .assistant
        .refine_scene(
            &command,
            &state.library,
            state.clock.as_ref(),
            state.store.as_ref(),
        )
        .await?;

    Ok(Json(CommandResponse::from_events(&events)))
}

/// POST /{book_id}/drafts
#[instrument(skip(state, request))]
async fn draft_scenes(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    Json(request): Json<DraftScenesRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = DraftScenes {
        correlation_id: Uuid::new_v4(),
        book_id,
        plotline_id: request.plotline_id,
        text: request.text,
    };

    info!(correlation_id = %command.correlation_id, "handling draft_scenes command");

    let events = state
        .assistant
        .draft_scenes(
            &command,
            &state.library,
            state.clock.as_ref(),
            state.ids.as_ref(),
            state.store.as_ref(),
        )
        .await?;

    Ok(Json(CommandResponse::from_events(&events)))
}

/// Returns the router for AI-assisted writing.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{book_id}/scenes/{scene_id}/refine", post(refine_scene))
        .route("/{book_id}/drafts", post(draft_scenes))
}
