//! Protobuf messages and tonic client/server stubs for `todo.TodoService`.
//!
//! The bindings under `gen/` are generated from `proto/todo.proto` and checked
//! in, so building the workspace does not need `protoc`.

#[allow(clippy::all)]
pub mod r#gen;

pub use r#gen::todo;
