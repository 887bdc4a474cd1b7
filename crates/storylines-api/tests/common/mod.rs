//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use storylines_assistant::{Assistant, TextGenerator, UnconfiguredGenerator};
use storylines_board::application::library::load_library;
use storylines_store::FileSnapshotStore;
use storylines_test_support::{SequenceIdGenerator, SequenceRng, fixed_clock};
use tower::ServiceExt;

use storylines_api::state::AppState;

/// Build the full app over a real `FileSnapshotStore` in `data_dir`, with a
/// fixed clock and predictable ids. The library is loaded from disk exactly as
/// `main.rs` does, so two apps built on one directory behave like a restart.
pub async fn build_test_app(data_dir: &Path) -> Router {
    build_test_app_with_generator(data_dir, Arc::new(UnconfiguredGenerator)).await
}

/// Same as [`build_test_app`] with a custom text generator.
pub async fn build_test_app_with_generator(
    data_dir: &Path,
    generator: Arc<dyn TextGenerator>,
) -> Router {
    let clock = Arc::new(fixed_clock());
    let ids = Arc::new(SequenceIdGenerator::new());
    let store = Arc::new(FileSnapshotStore::new(data_dir));
    let library = load_library(store.as_ref(), clock.as_ref(), ids.as_ref()).await;
    let app_state = AppState::new(
        library,
        clock,
        ids,
        Box::new(SequenceRng::new(vec![200, 120, 40])),
        store,
        Assistant::new(generator),
    );
    storylines_api::app(app_state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}

/// Send a request with a JSON body and return the response.
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "POST", uri, body).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the body as text.
pub async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, String::from_utf8(body_bytes.to_vec()).unwrap())
}

/// Send a POST request with a raw text body and return the response.
pub async fn post_text(app: Router, uri: &str, body: String) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    send(app, request).await
}
