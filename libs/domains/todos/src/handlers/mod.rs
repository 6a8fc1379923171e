mod rest;

use axum::{Router, routing::get};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{
    CreateTodoRequest, PageParams, Todo, TodoListResponse, TodoPage, TodoResponse, TodoStats,
    UpdateTodoBody,
};
use crate::repository::TodoRepository;
use crate::service::TodoService;

/// OpenAPI documentation for the Todos REST API
#[derive(OpenApi)]
#[openapi(
    paths(
        rest::list_todos,
        rest::create_todo,
        rest::get_todo,
        rest::update_todo,
        rest::delete_todo,
        rest::todo_stats,
        rest::page_todos,
        rest::search_todos,
    ),
    components(
        schemas(
            Todo,
            CreateTodoRequest,
            UpdateTodoBody,
            PageParams,
            TodoResponse,
            TodoListResponse,
            TodoStats,
            TodoPage,
            axum_helpers::ErrorResponse
        )
    ),
    tags(
        (name = "todos", description = "Todo item operations")
    )
)]
pub struct TodosApiDoc;

/// Create the router for the todos REST API.
///
/// Routes are relative; mount it with `.nest("/todos", router(service))`.
pub fn router<R: TodoRepository + 'static>(service: Arc<TodoService<R>>) -> Router {
    Router::new()
        .route("/", get(rest::list_todos).post(rest::create_todo))
        .route("/stats", get(rest::todo_stats))
        .route("/page", get(rest::page_todos))
        .route("/search", get(rest::search_todos))
        .route(
            "/{id}",
            get(rest::get_todo)
                .put(rest::update_todo)
                .delete(rest::delete_todo),
        )
        .with_state(service)
}
