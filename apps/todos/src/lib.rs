//! Todo Service
//!
//! One process serving the same todo operations over REST and gRPC.
//!
//! ## Architecture
//!
//! ```text
//! HTTP client                  gRPC client
//!   ↓ (JSON, /api/todos)         ↓ (todo.TodoService, Zstd)
//! domain_todos::router         TodosGrpcService (grpc.rs)
//!   ↘                          ↙
//!        TodoService (domain core)
//!              ↓
//!   SqlTodoRepository | InMemoryTodoRepository
//! ```
//!
//! ## Modules
//!
//! - `config`: environment-driven configuration
//! - `grpc`: gRPC adapter over the domain service
//! - `openapi`: combined OpenAPI document
//! - `server`: storage wiring, router assembly, server lifecycle

pub mod config;
pub mod grpc;
pub mod openapi;
pub mod server;

// Re-export for convenience
pub use config::{Config, StorageConfig};
pub use grpc::TodosGrpcService;
pub use server::{Readiness, RunningServers, build_router, run, start};
