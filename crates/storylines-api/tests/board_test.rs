//! Integration tests for editing a board through the full router.

mod common;

use axum::http::StatusCode;
use serde_json::json;

fn scene_ids(book: &serde_json::Value) -> Vec<String> {
    book["scenes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap().to_owned())
        .collect()
}

#[tokio::test]
async fn test_fresh_data_dir_starts_with_sample_book() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path()).await;

    let (status, json) = common::get_json(app, "/api/v1/books").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["id"], "book-1");
    assert_eq!(json[0]["title"], "הספר הראשון שלי");
    assert_eq!(json[0]["plotlineCount"], 2);
    assert_eq!(json[0]["completedCount"], 1);
}

#[tokio::test]
async fn test_board_edits_survive_restart() {
    let dir = tempfile::tempdir().unwrap();

    // POST /api/v1/books/book-1/plotlines
    let app = common::build_test_app(dir.path()).await;
    let (status, json) = common::post_json(
        app.clone(),
        "/api/v1/books/book-1/plotlines",
        &json!({ "name": "Romance" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let plotline_id = json["createdIds"][0].as_str().unwrap().to_owned();

    // POST /api/v1/books/book-1/scenes at the front of the board
    let (status, json) = common::post_json(
        app.clone(),
        "/api/v1/books/book-1/scenes",
        &json!({ "plotlineId": plotline_id, "atPosition": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let scene_id = json["createdIds"][0].as_str().unwrap().to_owned();

    // POST /api/v1/books/book-1/scenes/s1/move to the end
    let (status, _) = common::post_json(
        app,
        "/api/v1/books/book-1/scenes/s1/move",
        &json!({ "targetIndex": 99, "targetPlotlineId": "p2" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // GET after restart: state was read back from disk
    let app = common::build_test_app(dir.path()).await;
    let (status, book) = common::get_json(app, "/api/v1/books/book-1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["plotlines"][2]["name"], "Romance");
    assert_eq!(book["plotlines"][2]["color"], "hsl(200, 70%, 50%)");
    assert_eq!(scene_ids(&book), vec![scene_id.as_str(), "s2", "s3", "s1"]);
    let positions: Vec<u64> = book["scenes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["position"].as_u64().unwrap())
        .collect();
    assert_eq!(positions, vec![0, 1, 2, 3]);
    assert_eq!(book["scenes"][3]["plotlineId"], "p2");
}

#[tokio::test]
async fn test_board_view_reflects_scene_update() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path()).await;

    let (status, _) = common::send_json(
        app.clone(),
        "PATCH",
        "/api/v1/books/book-1/scenes/s2",
        &json!({ "isCompleted": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, board) = common::get_json(app, "/api/v1/books/book-1/board").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["rows"][1]["plotlineId"], "p2");
    assert_eq!(board["rows"][1]["slots"][1]["scene"]["isCompleted"], true);
}

#[tokio::test]
async fn test_legacy_project_is_migrated_on_startup() {
    let dir = tempfile::tempdir().unwrap();
    let legacy = json!({
        "plotlines": [{ "id": "a", "name": "Main", "color": "#fff" }],
        "scenes": [
            { "id": "x", "plotlineId": "a", "title": "Second", "content": "", "position": 4 },
            { "id": "y", "plotlineId": "a", "title": "First", "content": "", "position": 1 }
        ],
        "characters": []
    });
    std::fs::write(
        dir.path().join("storylines_project_data_v2.json"),
        legacy.to_string(),
    )
    .unwrap();
    let app = common::build_test_app(dir.path()).await;

    let (status, books) = common::get_json(app.clone(), "/api/v1/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books.as_array().unwrap().len(), 1);
    assert_eq!(books[0]["title"], "הספר הראשון שלי");

    let book_id = books[0]["id"].as_str().unwrap();
    let (_, manuscript) =
        common::get_json(app, &format!("/api/v1/books/{book_id}/manuscript")).await;
    assert_eq!(manuscript["entries"][0]["title"], "First");
    assert_eq!(manuscript["entries"][1]["title"], "Second");
}
