//! Route modules, one per area of the book.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use storylines_board::domain::events::BoardEvent;
use storylines_core::error::DomainError;
use storylines_core::event::DomainEvent;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub mod assistant;
pub mod board;
pub mod books;
pub mod health;
pub mod interchange;
pub mod notes;

/// Response body returned after a command is successfully handled.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    /// IDs of the domain events produced. Empty when the command changed
    /// nothing.
    pub event_ids: Vec<Uuid>,
    /// IDs of the entities the command created.
    pub created_ids: Vec<String>,
}

impl CommandResponse {
    /// Summarizes the events of one command.
    #[must_use]
    pub fn from_events(events: &[BoardEvent]) -> Self {
        Self {
            event_ids: events.iter().map(|e| e.metadata().event_id).collect(),
            created_ids: events
                .iter()
                .filter_map(BoardEvent::created_id)
                .map(str::to_owned)
                .collect(),
        }
    }
}

/// Largest request body accepted under `/api/v1/books`.
///
/// Portraits travel inline as data URLs, so a backup or an image edit easily
/// exceeds axum's 2 MB default.
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Every route under `/api/v1/books`.
pub fn books_router() -> Router<AppState> {
    Router::new()
        .merge(books::router())
        .merge(board::router())
        .merge(notes::router())
        .merge(interchange::router())
        .merge(assistant::router())
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
}

/// Parses a comma-separated plotline filter. An absent filter shows every
/// plotline; an empty one shows none.
pub(crate) fn visible_filter(raw: Option<&str>) -> Option<Vec<String>> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .collect()
    })
}

/// Headers for a downloadable body. The file name may contain any Unicode
/// text; it is sent RFC 5987 encoded.
pub(crate) fn attachment_headers(
    content_type: &'static str,
    file_name: &str,
) -> Result<[(HeaderName, HeaderValue); 2], ApiError> {
    let encoded = utf8_percent_encode(file_name, NON_ALPHANUMERIC);
    let disposition = HeaderValue::from_str(&format!("attachment; filename*=UTF-8''{encoded}"))
        .map_err(|e| DomainError::Infrastructure(format!("invalid download file name: {e}")))?;
    Ok([
        (CONTENT_TYPE, HeaderValue::from_static(content_type)),
        (CONTENT_DISPOSITION, disposition),
    ])
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use storylines_assistant::{Assistant, TextGenerator, UnconfiguredGenerator};
    use storylines_board::application::library::Library;
    use storylines_test_support::{
        InMemorySnapshotStore, MockRng, SequenceIdGenerator, fixed_clock,
    };
    use tower::ServiceExt;

    use crate::state::AppState;

    /// State holding the sample library (`book-1` with plotlines `p1`, `p2`
    /// and scenes `s1`..`s3`) and an in-memory store.
    pub(crate) fn test_app_state() -> AppState {
        app_state_with(Arc::new(UnconfiguredGenerator))
    }

    pub(crate) fn app_state_with(generator: Arc<dyn TextGenerator>) -> AppState {
        let clock = fixed_clock();
        let ids = SequenceIdGenerator::new();
        let library = Library::with_default_book(&clock, &ids);
        AppState::new(
            library,
            Arc::new(clock),
            Arc::new(ids),
            Box::new(MockRng),
            Arc::new(InMemorySnapshotStore::new()),
            Assistant::new(generator),
        )
    }

    /// Sends one request through `app` and returns the status and the body
    /// parsed as JSON (`Null` for empty or non-JSON bodies).
    pub(crate) async fn send(
        app: axum::Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_filter_splits_and_trims() {
        assert_eq!(
            visible_filter(Some("p1, p2,,")),
            Some(vec!["p1".to_owned(), "p2".to_owned()])
        );
        assert_eq!(visible_filter(Some("")), Some(Vec::new()));
        assert_eq!(visible_filter(None), None);
    }

    #[test]
    fn test_attachment_headers_encode_unicode_file_names() {
        let [(_, content_type), (_, disposition)] =
            attachment_headers("text/plain; charset=utf-8", "ספר 1.txt").unwrap();

        assert_eq!(content_type, "text/plain; charset=utf-8");
        assert_eq!(
            disposition,
            "attachment; filename*=UTF-8''%D7%A1%D7%A4%D7%A8%201%2Etxt"
        );
    }
}
