//! gRPC adapter for the todo service
//!
//! Proto requests are handed to the domain service as raw values so both
//! transports share one validator and one set of error messages.

use domain_todos::{
    CreateTodoRequest, DeleteTodoRequest, Todo, TodoRepository, TodoService, UpdateTodoRequest,
};
use grpc_client::conversions::datetime_to_rfc3339;
use rpc::todo::todo_service_server::TodoService as TodoServiceRpc;
use rpc::todo::{
    CreateTodoResponse, DeleteTodoResponse, GetTodosRequest, GetTodosResponse,
    UpdateTodoResponse,
};
use serde_json::Value;
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::instrument;

pub struct TodosGrpcService<R>
where
    R: TodoRepository + 'static,
{
    service: Arc<TodoService<R>>,
}

impl<R> TodosGrpcService<R>
where
    R: TodoRepository + 'static,
{
    pub fn new(service: Arc<TodoService<R>>) -> Self {
        Self { service }
    }
}

fn todo_to_proto(todo: Todo) -> rpc::todo::Todo {
    rpc::todo::Todo {
        id: todo.id,
        description: todo.description,
        completed: todo.completed,
        created_at: datetime_to_rfc3339(todo.created_at),
        updated_at: datetime_to_rfc3339(todo.updated_at),
    }
}

#[tonic::async_trait]
impl<R> TodoServiceRpc for TodosGrpcService<R>
where
    R: TodoRepository + 'static,
{
    #[instrument(skip_all)]
    async fn get_todos(
        &self,
        _request: Request<GetTodosRequest>,
    ) -> Result<Response<GetTodosResponse>, Status> {
        let todos = self.service.list().await?;

        Ok(Response::new(GetTodosResponse {
            todos: todos.into_iter().map(todo_to_proto).collect(),
        }))
    }

    #[instrument(skip_all)]
    async fn create_todo(
        &self,
        request: Request<rpc::todo::CreateTodoRequest>,
    ) -> Result<Response<CreateTodoResponse>, Status> {
        let req = request.into_inner();

        let todo = self
            .service
            .create(CreateTodoRequest {
                description: Some(Value::String(req.description)),
            })
            .await?;

        Ok(Response::new(CreateTodoResponse {
            todo: Some(todo_to_proto(todo)),
        }))
    }

    #[instrument(skip_all, fields(id = request.get_ref().id))]
    async fn update_todo(
        &self,
        request: Request<rpc::todo::UpdateTodoRequest>,
    ) -> Result<Response<UpdateTodoResponse>, Status> {
        let req = request.into_inner();

        let todo = self
            .service
            .update(UpdateTodoRequest {
                id: Some(Value::from(req.id)),
                description: req.description.map(Value::String),
                completed: req.completed.map(Value::Bool),
            })
            .await?;

        Ok(Response::new(UpdateTodoResponse {
            todo: Some(todo_to_proto(todo)),
        }))
    }

    #[instrument(skip_all, fields(id = request.get_ref().id))]
    async fn delete_todo(
        &self,
        request: Request<rpc::todo::DeleteTodoRequest>,
    ) -> Result<Response<DeleteTodoResponse>, Status> {
        let req = request.into_inner();

        self.service
            .delete(DeleteTodoRequest {
                id: Some(Value::from(req.id)),
            })
            .await?;

        Ok(Response::new(DeleteTodoResponse {}))
    }
}
