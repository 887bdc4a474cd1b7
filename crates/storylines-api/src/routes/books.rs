//! Routes for the library: listing, creating, retitling and deleting books.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use storylines_board::application::query_handlers::{self, BookSummaryView};
use storylines_board::application::command_handlers;
use storylines_board::domain::aggregates::Book;
use storylines_board::domain::commands;
use tracing::{info, instrument};
use uuid::Uuid;

use super::CommandResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBookRequest {
    /// Title of the new book; a default is used when absent.
    #[serde(default)]
    pub title: Option<String>,
}

/// Response body for POST / and POST /import.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBookResponse {
    /// The new book id.
    pub book_id: String,
}

/// Request body for PUT /{book_id}/title.
#[derive(Debug, Deserialize)]
pub struct RetitleBookRequest {
    /// The new title.
    pub title: String,
}

/// GET /
async fn list_books(State(state): State<AppState>) -> Json<Vec<BookSummaryView>> {
    let library = state.library.lock().await;
    Json(query_handlers::list_books(&library))
}

/// POST /
#[instrument(skip(state, request))]
async fn create_book(
    State(state): State<AppState>,
    Json(request): Json<CreateBookRequest>,
) -> (StatusCode, Json<CreatedBookResponse>) {
    let command = commands::CreateBook {
        correlation_id: Uuid::new_v4(),
        title: request.title,
    };

    info!(correlation_id = %command.correlation_id, "handling create_book command");

    let mut library = state.library.lock().await;
    let book_id = command_handlers::handle_create_book(
        &command,
        &mut library,
        state.clock.as_ref(),
        state.ids.as_ref(),
        state.store.as_ref(),
    )
    .await;

    (StatusCode::CREATED, Json(CreatedBookResponse { book_id }))
}

/// GET /{book_id}
#[instrument(skip(state))]
async fn get_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let library = state.library.lock().await;
    Ok(Json(library.book(&book_id)?.clone()))
}

/// DELETE /{book_id}
#[instrument(skip(state))]
async fn delete_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let command = commands::DeleteBook {
        correlation_id: Uuid::new_v4(),
        book_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_book command");

    let mut library = state.library.lock().await;
    command_handlers::handle_delete_book(&command, &mut library, state.store.as_ref()).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /{book_id}/title
#[instrument(skip(state, request))]
async fn retitle_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    Json(request): Json<RetitleBookRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::RetitleBook {
        correlation_id: Uuid::new_v4(),
        book_id,
        title: request.title,
    };

    info!(correlation_id = %command.correlation_id, "handling retitle_book command");

    let mut library = state.library.lock().await;
    let events = command_handlers::handle_retitle_book(
        &command,
        &mut library,
        state.clock.as_ref(),
        state.store.as_ref(),
    )
    .await?;

    Ok(Json(CommandResponse::from_events(&events)))
}

/// Returns the router for the library.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{book_id}", get(get_book).delete(delete_book))
        .route("/{book_id}/title", put(retitle_book))
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::routes::testing::{send, test_app_state};

    #[tokio::test]
    async fn test_list_books_returns_sample_library() {
        // Arrange
        let app = router().with_state(test_app_state());

        // Act
        let (status, json) = send(app, "GET", "/", None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let books = json.as_array().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0]["id"], "book-1");
        assert_eq!(books[0]["sceneCount"], 3);
    }

    #[tokio::test]
    async fn test_create_book_returns_201_and_appends_to_library() {
        // Arrange
        let state = test_app_state();
        let app = router().with_state(state.clone());

        // Act
        let (status, json) = send(app, "POST", "/", Some(json!({ "title": "Sequel" }))).await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        let book_id = json["bookId"].as_str().unwrap().to_owned();
        let library = state.library.lock().await;
        assert_eq!(library.books().len(), 2);
        assert_eq!(library.book(&book_id).unwrap().title(), "Sequel");
    }

    #[tokio::test]
    async fn test_get_unknown_book_returns_404() {
        // Arrange
        let app = router().with_state(test_app_state());

        // Act
        let (status, json) = send(app, "GET", "/book-404", None).await;

        // Assert
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "aggregate_not_found");
    }

    #[tokio::test]
    async fn test_get_book_returns_full_document() {
        let app = router().with_state(test_app_state());

        let (status, json) = send(app, "GET", "/book-1", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["plotlines"].as_array().unwrap().len(), 2);
        assert_eq!(json["scenes"][0]["plotlineId"], "p1");
    }

    #[tokio::test]
    async fn test_retitle_book_returns_one_event() {
        // Arrange
        let state = test_app_state();
        let app = router().with_state(state.clone());

        // Act
        let (status, json) =
            send(app, "PUT", "/book-1/title", Some(json!({ "title": "Renamed" }))).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["eventIds"].as_array().unwrap().len(), 1);
        assert_eq!(
            state.library.lock().await.book("book-1").unwrap().title(),
            "Renamed"
        );
    }

    #[tokio::test]
    async fn test_delete_last_book_returns_400() {
        // Arrange
        let app = router().with_state(test_app_state());

        // Act
        let (status, json) = send(app, "DELETE", "/book-1", None).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_delete_book_returns_204_when_others_remain() {
        // Arrange
        let state = test_app_state();
        let created = router().with_state(state.clone());
        let (_, json) = send(created, "POST", "/", Some(json!({}))).await;
        let book_id = json["bookId"].as_str().unwrap().to_owned();
        let app = router().with_state(state.clone());

        // Act
        let (status, _) = send(app, "DELETE", &format!("/{book_id}"), None).await;

        // Assert
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(state.library.lock().await.books().len(), 1);
    }
}
