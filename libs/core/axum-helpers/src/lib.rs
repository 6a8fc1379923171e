//! # Axum Helpers
//!
//! Shared building blocks for the HTTP side of the todo service.
//!
//! ## Modules
//!
//! - **[`server`]**: Router assembly, health checks, graceful shutdown
//! - **[`http`]**: HTTP middleware (CORS, security headers)
//! - **[`errors`]**: Structured error responses with error codes
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{ShutdownCoordinator, create_router, serve_router};
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let api_routes = Router::new(); // Add your routes
//!     let router = create_router::<ApiDoc>(api_routes, "http://localhost:3000")?;
//!
//!     let (coordinator, _rx) = ShutdownCoordinator::new();
//!     let shutdown = coordinator.clone();
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     tokio::spawn(async move { coordinator.wait_for_signal().await });
//!     serve_router(listener, router, shutdown.wait_for_shutdown()).await
//! }
//! ```

// Domain modules
pub mod errors;
pub mod http;
pub mod server;

// Re-export server types
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_router, health_router,
    run_health_checks, serve_router, shutdown_signal, with_request_timeout,
};

// Re-export HTTP middleware
pub use http::{create_cors_layer, parse_allowed_origins, security_headers};

// Re-export error types
pub use errors::{AppError, ErrorCode, ErrorResponse};
