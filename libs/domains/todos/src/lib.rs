//! Todos Domain
//!
//! The transport-neutral core of the todo service, plus its REST adapter.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │  REST handlers │ gRPC    │  ← Adapters pass raw requests through
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │       TodoService        │  ← Validation, error classification
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │      TodoRepository      │  ← SQL (SeaORM) or in-memory
//! └──────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_todos::{SqlTodoRepository, TodoService};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite://todo.db?mode=rwc").await?;
//!
//! let repository = SqlTodoRepository::new(db);
//! let service = TodoService::new(repository);
//! let todos = service.list().await?;
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod repository;
pub mod service;
pub mod sql;
pub mod validation;

// Re-export commonly used types
pub use error::{ErrorKind, RepositoryError, TodoError, TodoResult};
pub use handlers::{TodosApiDoc, router};
pub use memory::InMemoryTodoRepository;
pub use models::{
    CreateTodoRequest, DeleteTodoRequest, NewTodo, PageParams, Todo, TodoChanges, TodoPage,
    TodoListResponse, TodoResponse, TodoStats, UpdateTodoBody, UpdateTodoRequest,
};
pub use repository::TodoRepository;
pub use service::TodoService;
pub use sql::SqlTodoRepository;
pub use validation::ValidationError;
