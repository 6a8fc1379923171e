use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use std::sync::Arc;

use crate::error::TodoResult;
use crate::models::{
    CreateTodoRequest, DeleteTodoRequest, ListParams, PageParams, SearchParams, TodoListResponse,
    TodoPage, TodoResponse, TodoStats, UpdateTodoBody,
};
use crate::repository::TodoRepository;
use crate::service::TodoService;

/// Query strings carry everything as text; turn the two boolean spellings
/// into JSON booleans and leave anything else as a string for the validator
/// to reject.
fn query_flag(raw: String) -> Value {
    match raw.as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw),
    }
}

/// List todos, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "todos",
    params(ListParams),
    responses(
        (status = 200, description = "List of todos", body = TodoListResponse),
        (status = 400, description = "Invalid filter", body = axum_helpers::ErrorResponse),
        (status = 500, description = "Internal server error", body = axum_helpers::ErrorResponse)
    )
)]
pub async fn list_todos<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> TodoResult<Json<TodoListResponse>> {
    let Query(params) = query?;

    let todos = match params.completed {
        Some(raw) => service.list_by_status(Some(query_flag(raw))).await?,
        None => service.list().await?,
    };

    Ok(Json(TodoListResponse { todos }))
}

/// Create a new todo
#[utoipa::path(
    post,
    path = "",
    tag = "todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = TodoResponse),
        (status = 400, description = "Invalid request", body = axum_helpers::ErrorResponse),
        (status = 500, description = "Internal server error", body = axum_helpers::ErrorResponse)
    )
)]
pub async fn create_todo<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> TodoResult<impl IntoResponse> {
    let Json(request) = payload?;
    let todo = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(TodoResponse { todo })))
}

/// Get a todo by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "todos",
    params(
        ("id" = i32, Path, description = "Todo ID")
    ),
    responses(
        (status = 200, description = "Todo found", body = TodoResponse),
        (status = 400, description = "Invalid todo ID", body = axum_helpers::ErrorResponse),
        (status = 404, description = "Todo not found", body = axum_helpers::ErrorResponse),
        (status = 500, description = "Internal server error", body = axum_helpers::ErrorResponse)
    )
)]
pub async fn get_todo<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    path: Result<Path<String>, PathRejection>,
) -> TodoResult<Json<TodoResponse>> {
    let Path(id) = path?;
    let todo = service.get(Some(Value::String(id))).await?;
    Ok(Json(TodoResponse { todo }))
}

/// Update a todo's description and/or completion state
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "todos",
    params(
        ("id" = i32, Path, description = "Todo ID")
    ),
    request_body = UpdateTodoBody,
    responses(
        (status = 200, description = "Todo updated", body = TodoResponse),
        (status = 400, description = "Invalid request", body = axum_helpers::ErrorResponse),
        (status = 404, description = "Todo not found", body = axum_helpers::ErrorResponse),
        (status = 500, description = "Internal server error", body = axum_helpers::ErrorResponse)
    )
)]
pub async fn update_todo<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateTodoBody>, JsonRejection>,
) -> TodoResult<Json<TodoResponse>> {
    let Path(id) = path?;
    let Json(body) = payload?;
    let todo = service.update(body.with_id(Value::String(id))).await?;
    Ok(Json(TodoResponse { todo }))
}

/// Permanently delete a todo
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "todos",
    params(
        ("id" = i32, Path, description = "Todo ID")
    ),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 400, description = "Invalid todo ID", body = axum_helpers::ErrorResponse),
        (status = 404, description = "Todo not found", body = axum_helpers::ErrorResponse),
        (status = 500, description = "Internal server error", body = axum_helpers::ErrorResponse)
    )
)]
pub async fn delete_todo<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    path: Result<Path<String>, PathRejection>,
) -> TodoResult<StatusCode> {
    let Path(id) = path?;
    service
        .delete(DeleteTodoRequest {
            id: Some(Value::String(id)),
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Todo counts by completion state
#[utoipa::path(
    get,
    path = "/stats",
    tag = "todos",
    responses(
        (status = 200, description = "Todo counts", body = TodoStats),
        (status = 500, description = "Internal server error", body = axum_helpers::ErrorResponse)
    )
)]
pub async fn todo_stats<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
) -> TodoResult<Json<TodoStats>> {
    Ok(Json(service.stats().await?))
}

/// One page of todos, newest first
#[utoipa::path(
    get,
    path = "/page",
    tag = "todos",
    params(PageParams),
    responses(
        (status = 200, description = "Page of todos", body = TodoPage),
        (status = 400, description = "Invalid page parameters", body = axum_helpers::ErrorResponse),
        (status = 500, description = "Internal server error", body = axum_helpers::ErrorResponse)
    )
)]
pub async fn page_todos<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> TodoResult<Json<TodoPage>> {
    let Query(params) = query?;
    Ok(Json(service.page(params).await?))
}

/// Search todo descriptions (case-insensitive)
#[utoipa::path(
    get,
    path = "/search",
    tag = "todos",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching todos", body = TodoListResponse),
        (status = 400, description = "Missing or empty search term", body = axum_helpers::ErrorResponse),
        (status = 500, description = "Internal server error", body = axum_helpers::ErrorResponse)
    )
)]
pub async fn search_todos<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> TodoResult<Json<TodoListResponse>> {
    let Query(params) = query?;
    let todos = service.search(params.q.map(Value::String)).await?;
    Ok(Json(TodoListResponse { todos }))
}
