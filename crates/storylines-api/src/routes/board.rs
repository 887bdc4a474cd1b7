//! Routes for the board: plotlines, scenes and the two read views.

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use storylines_board::application::command_handlers;
use storylines_board::application::query_handlers::{self, BoardView, ManuscriptView};
use storylines_board::domain::commands;
use storylines_board::domain::model::ScenePatch;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{CommandResponse, visible_filter};
use crate::error::ApiError;
use crate::state::AppState;

/// Query string accepted by the manuscript views.
#[derive(Debug, Default, Deserialize)]
pub struct VisibleQuery {
    /// Comma-separated plotline ids to include; every plotline when absent.
    pub visible: Option<String>,
}

/// Request body for POST /{book_id}/plotlines.
#[derive(Debug, Default, Deserialize)]
pub struct AddPlotlineRequest {
    /// Display name; the default plotline name is used when absent.
    #[serde(default)]
    pub name: Option<String>,
}

/// Request body for PATCH /{book_id}/plotlines/{plotline_id}.
#[derive(Debug, Default, Deserialize)]
pub struct EditPlotlineRequest {
    /// New display name, if it changes.
    #[serde(default)]
    pub name: Option<String>,
    /// New color, if it changes.
    #[serde(default)]
    pub color: Option<String>,
}

/// Request body for POST /{book_id}/scenes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSceneRequest {
    /// The plotline that owns the new scene.
    pub plotline_id: String,
    /// Reading-order slot to insert at; appends when absent.
    #[serde(default)]
    pub at_position: Option<usize>,
}

/// Request body for POST /{book_id}/scenes/{scene_id}/move.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveSceneRequest {
    /// Reading-order slot the scene is dropped on.
    pub target_index: usize,
    /// The plotline row the scene is dropped into.
    pub target_plotline_id: String,
}

/// GET /{book_id}/board
#[instrument(skip(state))]
async fn get_board(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<Json<BoardView>, ApiError> {
    let library = state.library.lock().await;
    Ok(Json(query_handlers::get_board(&library, &book_id)?))
}

/// GET /{book_id}/manuscript
#[instrument(skip(state))]
async fn get_manuscript(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    Query(query): Query<VisibleQuery>,
) -> Result<Json<ManuscriptView>, ApiError> {
    let visible = visible_filter(query.visible.as_deref());
    let library = state.library.lock().await;
    Ok(Json(query_handlers::get_manuscript(
        &library,
        &book_id,
        visible.as_deref(),
    )?))
}

/// POST /{book_id}/plotlines
#[instrument(skip(state, request))]
async fn add_plotline(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    Json(request): Json<AddPlotlineRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::AddPlotline {
        correlation_id: Uuid::new_v4(),
        book_id,
        name: request.name,
    };

    info!(correlation_id = %command.correlation_id, "handling add_plotline command");

    let mut library = state.library.lock().await;
    let mut rng = state.rng.lock().await;
    let events = command_handlers::handle_add_plotline(
        &command,
        &mut library,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &mut **rng,
        state.store.as_ref(),
    )
    .await?;

    Ok(Json(CommandResponse::from_events(&events)))
}

/// PATCH /{book_id}/plotlines/{plotline_id}
///
/// Name and color may be changed together; each is applied as its own
/// command under one correlation id.
#[instrument(skip(state, request))]
async fn edit_plotline(
    State(state): State<AppState>,
    Path((book_id, plotline_id)): Path<(String, String)>,
    Json(request): Json<EditPlotlineRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let correlation_id = Uuid::new_v4();
    info!(%correlation_id, "handling edit_plotline command");

    let mut library = state.library.lock().await;
    let mut events = Vec::new();
    if let Some(name) = request.name {
        let command = commands::RenamePlotline {
            correlation_id,
            book_id: book_id.clone(),
            plotline_id: plotline_id.clone(),
            name,
        };
        events.extend(
            command_handlers::handle_rename_plotline(
                &command,
                &mut library,
                state.clock.as_ref(),
                state.store.as_ref(),
            )
            .await?,
        );
    }
    if let Some(color) = request.color {
        let command = commands::RecolorPlotline {
            correlation_id,
            book_id,
            plotline_id,
            color,
        };
        events.extend(
            command_handlers::handle_recolor_plotline(
                &command,
                &mut library,
                state.clock.as_ref(),
                state.store.as_ref(),
            )
            .await?,
        );
    }

    Ok(Json(CommandResponse::from_events(&events)))
}

/// DELETE /{book_id}/plotlines/{plotline_id}
#[instrument(skip(state))]
async fn delete_plotline(
    State(state): State<AppState>,
    Path((book_id, plotline_id)): Path<(String, String)>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::DeletePlotline {
        correlation_id: Uuid::new_v4(),
        book_id,
        plotline_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_plotline command");

    let mut library = state.library.lock().await;
    let events = command_handlers::handle_delete_plotline(
        &command,
        &mut library,
        state.clock.as_ref(),
        state.store.as_ref(),
    )
    .await?;

    Ok(Json(CommandResponse::from_events(&events)))
}

/// POST /{book_id}/scenes
#[instrument(skip(state, request))]
async fn add_scene(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    Json(request): Json<AddSceneRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::AddScene {
        correlation_id: Uuid::new_v4(),
        book_id,
        plotline_id: request.plotline_id,
        at_position: request.at_position,
    };

    info!(correlation_id = %command.correlation_id, "handling add_scene command");

    let mut library = state.library.lock().await;
    let events = command_handlers::handle_add_scene(
        &command,
        &mut library,
        state.clock.as_ref(),
        state.ids.as_ref(),
        state.store.as_ref(),
    )
    .await?;

    Ok(Json(CommandResponse::from_events(&events)))
}

/// PATCH /{book_id}/scenes/{scene_id}
#[instrument(skip(state, scene_patch))]
async fn update_scene(
    State(state): State<AppState>,
    Path((book_id, scene_id)): Path<(String, String)>,
    Json(scene_patch): Json<ScenePatch>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::UpdateScene {
        correlation_id: Uuid::new_v4(),
        book_id,
        scene_id,
        patch: scene_patch,
    };

    info!(correlation_id = %command.correlation_id, "handling update_scene command");

    let mut library = state.library.lock().await;
    let events = command_handlers::handle_update_scene(
        &command,
        &mut library,
        state.clock.as_ref(),
        state.store.as_ref(),
    )
    .await?;

    Ok(Json(CommandResponse::from_events(&events)))
}

/// DELETE /{book_id}/scenes/{scene_id}
#[instrument(skip(state))]
async fn delete_scene(
    State(state): State<AppState>,
    Path((book_id, scene_id)): Path<(String, String)>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::DeleteScene {
        correlation_id: Uuid::new_v4(),
        book_id,
        scene_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_scene command");

    let mut library = state.library.lock().await;
    let events = command_handlers::handle_delete_scene(
        &command,
        &mut library,
        state.clock.as_ref(),
        state.store.as_ref(),
    )
    .await?;

    Ok(Json(CommandResponse::from_events(&events)))
}

/// POST /{book_id}/scenes/{scene_id}/move
#[instrument(skip(state, request))]
async fn move_scene(
    State(state): State<AppState>,
    Path((book_id, scene_id)): Path<(String, String)>,
    Json(request): Json<MoveSceneRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::MoveScene {
        correlation_id: Uuid::new_v4(),
        book_id,
        scene_id,
        target_index: request.target_index,
        target_plotline_id: request.target_plotline_id,
    };

    info!(correlation_id = %command.correlation_id, "handling move_scene command");

    let mut library = state.library.lock().await;
    let events = command_handlers::handle_move_scene(
        &command,
        &mut library,
        state.clock.as_ref(),
        state.store.as_ref(),
    )
    .await?;

    Ok(Json(CommandResponse::from_events(&events)))
}

/// Returns the router for the board.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{book_id}/board", get(get_board))
        .route("/{book_id}/manuscript", get(get_manuscript))
        .route("/{book_id}/plotlines", post(add_plotline))
        .route(
            "/{book_id}/plotlines/{plotline_id}",
            patch(edit_plotline).delete(delete_plotline),
        )
        .route("/{book_id}/scenes", post(add_scene))
        .route(
            "/{book_id}/scenes/{scene_id}",
            patch(update_scene).delete(delete_scene),
        )
        .route("/{book_id}/scenes/{scene_id}/move", post(move_scene))
}
