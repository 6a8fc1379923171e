//! gRPC adapter tests, calling the generated service trait directly.

use domain_todos::{InMemoryTodoRepository, TodoService};
use rpc::todo::todo_service_server::TodoService as TodoServiceRpc;
use rpc::todo::{
    CreateTodoRequest, DeleteTodoRequest, GetTodosRequest, Todo, UpdateTodoRequest,
};
use std::sync::Arc;
use todos_server::TodosGrpcService;
use tonic::{Code, Request};

fn service() -> TodosGrpcService<InMemoryTodoRepository> {
    TodosGrpcService::new(Arc::new(TodoService::new(InMemoryTodoRepository::new())))
}

async fn create(service: &TodosGrpcService<InMemoryTodoRepository>, description: &str) -> Todo {
    service
        .create_todo(Request::new(CreateTodoRequest {
            description: description.to_string(),
        }))
        .await
        .unwrap()
        .into_inner()
        .todo
        .unwrap()
}

#[tokio::test]
async fn test_create_and_list() {
    let service = service();
    let first = create(&service, "A").await;
    let second = create(&service, " B ").await;

    assert!(!first.completed);
    assert_eq!(first.created_at, first.updated_at);
    assert!(first.created_at.ends_with('Z'));
    assert_eq!(second.description, "B");

    let todos = service
        .get_todos(Request::new(GetTodosRequest {}))
        .await
        .unwrap()
        .into_inner()
        .todos;
    let descriptions: Vec<&str> = todos.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(descriptions, ["B", "A"]);
}

#[tokio::test]
async fn test_update_completion() {
    let service = service();
    let todo = create(&service, "Buy groceries").await;

    let updated = service
        .update_todo(Request::new(UpdateTodoRequest {
            id: todo.id,
            description: None,
            completed: Some(true),
        }))
        .await
        .unwrap()
        .into_inner()
        .todo
        .unwrap();

    assert!(updated.completed);
    assert_eq!(updated.description, "Buy groceries");
    assert_eq!(updated.created_at, todo.created_at);

    let created = grpc_client::conversions::rfc3339_to_datetime(&updated.created_at).unwrap();
    let changed = grpc_client::conversions::rfc3339_to_datetime(&updated.updated_at).unwrap();
    assert!(changed > created);
}

#[tokio::test]
async fn test_error_codes() {
    let service = service();

    let status = service
        .create_todo(Request::new(CreateTodoRequest {
            description: "   ".to_string(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(status.message(), "description cannot be empty");

    let status = service
        .update_todo(Request::new(UpdateTodoRequest {
            id: 999999,
            description: None,
            completed: None,
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = service
        .update_todo(Request::new(UpdateTodoRequest {
            id: 999999,
            description: Some("x".to_string()),
            completed: None,
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
    assert!(status.message().contains("999999"));

    let status = service
        .delete_todo(Request::new(DeleteTodoRequest { id: 0 }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn test_delete_twice_is_not_found() {
    let service = service();
    let todo = create(&service, "Temporary").await;

    service
        .delete_todo(Request::new(DeleteTodoRequest { id: todo.id }))
        .await
        .unwrap();

    let status = service
        .delete_todo(Request::new(DeleteTodoRequest { id: todo.id }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
    assert_eq!(status.message(), format!("Todo with ID {} not found", todo.id));
}
