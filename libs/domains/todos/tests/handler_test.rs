//! Handler tests for the Todos domain
//!
//! These exercise only the domain router (no CORS, request ids or
//! fallbacks from the app crate):
//! - Request decoding and validation
//! - Response shape and status codes
//! - Error responses

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_todos::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use test_utils::{TestDataBuilder, TestDatabase};
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn memory_app() -> Router {
    router(Arc::new(TodoService::new(InMemoryTodoRepository::new())))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn expect_bad_request(app: Router, request: Request<Body>) -> String {
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["code"], 400);
    assert_eq!(body["error"], "INVALID_ARGUMENT");
    body["message"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_todo_handler_returns_201() {
    let builder = TestDataBuilder::from_test_name("handler_create_201");
    let app = memory_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "description": builder.description("create") }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: TodoResponse = json_body(response.into_body()).await;
    assert_eq!(body.todo.description, builder.description("create"));
    assert!(!body.todo.completed);
}

#[tokio::test]
async fn test_create_uses_camel_case_timestamps() {
    let app = memory_app();

    let response = app
        .oneshot(json_request("POST", "/", json!({ "description": "shape" })))
        .await
        .unwrap();
    let body: Value = json_body(response.into_body()).await;

    let todo = &body["todo"];
    assert!(todo["createdAt"].is_string());
    assert!(todo["updatedAt"].is_string());
    assert!(todo.get("created_at").is_none());
}

#[tokio::test]
async fn test_create_rejects_explicit_null_description() {
    let message =
        expect_bad_request(memory_app(), json_request("POST", "/", json!({ "description": null })))
            .await;
    assert_eq!(message, "description is required");
}

#[tokio::test]
async fn test_create_rejects_unknown_fields() {
    expect_bad_request(
        memory_app(),
        json_request("POST", "/", json!({ "description": "x", "priority": 1 })),
    )
    .await;
}

#[tokio::test]
async fn test_update_rejects_wrong_completed_type() {
    let app = memory_app();
    app.clone()
        .oneshot(json_request("POST", "/", json!({ "description": "typed" })))
        .await
        .unwrap();

    let message = expect_bad_request(
        app,
        json_request("PUT", "/1", json!({ "completed": "yes" })),
    )
    .await;
    assert_eq!(message, "completed must be a boolean");
}

#[tokio::test]
async fn test_non_numeric_path_id_is_bad_request() {
    let message = expect_bad_request(memory_app(), get("/abc")).await;
    assert_eq!(message, "id must be an integer");

    let request = Request::builder()
        .method("DELETE")
        .uri("/0")
        .body(Body::empty())
        .unwrap();
    let message = expect_bad_request(memory_app(), request).await;
    assert_eq!(message, "id must be a positive integer");
}

#[tokio::test]
async fn test_get_missing_todo_is_not_found() {
    let response = memory_app().oneshot(get("/42")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(body["message"], "Todo with ID 42 not found");
}

#[tokio::test]
async fn test_completed_filter_must_be_boolean() {
    let message = expect_bad_request(memory_app(), get("/?completed=maybe")).await;
    assert_eq!(message, "completed must be a boolean");
}

#[tokio::test]
async fn test_page_limit_bounds() {
    let message = expect_bad_request(memory_app(), get("/page?limit=0")).await;
    assert_eq!(message, "limit must be between 1 and 100");

    let message = expect_bad_request(memory_app(), get("/page?limit=101")).await;
    assert_eq!(message, "limit must be between 1 and 100");

    expect_bad_request(memory_app(), get("/page?page=first")).await;
}

#[tokio::test]
async fn test_search_requires_term() {
    let message = expect_bad_request(memory_app(), get("/search")).await;
    assert_eq!(message, "q is required");

    let message = expect_bad_request(memory_app(), get("/search?q=%20%20")).await;
    assert_eq!(message, "q cannot be empty");
}

#[tokio::test]
async fn test_handlers_over_sql_repository() {
    let db = TestDatabase::sqlite().await;
    let service = Arc::new(TodoService::new(SqlTodoRepository::new(db.connection())));
    let app = router(service);
    let builder = TestDataBuilder::from_test_name("handler_sql");

    for description in builder.descriptions(3) {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/", json!({ "description": description })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/2", json!({ "completed": true })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/stats")).await.unwrap();
    let stats: TodoStats = json_body(response.into_body()).await;
    assert_eq!(
        stats,
        TodoStats {
            total: 3,
            completed: 1,
            incomplete: 2
        }
    );

    let response = app.clone().oneshot(get("/page?page=1&limit=2")).await.unwrap();
    let page: TodoPage = json_body(response.into_body()).await;
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.todos.len(), 2);
    assert_eq!(page.todos[0].description, builder.description("2"));

    let request = Request::builder()
        .method("DELETE")
        .uri("/2")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get("/?completed=true")).await.unwrap();
    let body: TodoListResponse = json_body(response.into_body()).await;
    assert!(body.todos.is_empty());
}

#[tokio::test]
async fn test_undecodable_path_id_is_structured_bad_request() {
    let requests = [
        get("/%FF"),
        json_request("PUT", "/%FF", json!({ "completed": true })),
        Request::builder()
            .method("DELETE")
            .uri("/%FF")
            .body(Body::empty())
            .unwrap(),
    ];

    for request in requests {
        let response = memory_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["content-type"], "application/json");

        let body: Value = json_body(response.into_body()).await;
        assert_eq!(body["code"], 400);
        assert_eq!(body["error"], "INVALID_ARGUMENT");
        assert!(body["message"].as_str().unwrap().contains("UTF-8"));
    }
}

#[tokio::test]
async fn test_page_far_past_the_end_over_sql() {
    let db = TestDatabase::sqlite().await;
    let app = router(Arc::new(TodoService::new(SqlTodoRepository::new(db.connection()))));

    app.clone()
        .oneshot(json_request("POST", "/", json!({ "description": "only" })))
        .await
        .unwrap();

    let response = app
        .oneshot(get("/page?page=9223372036854775807&limit=100"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page: TodoPage = json_body(response.into_body()).await;
    assert!(page.todos.is_empty());
    assert_eq!(page.total, 1);
    assert_eq!(page.page, 9_223_372_036_854_775_807);
}
