//! Server infrastructure module.
//!
//! This module provides:
//! - Router assembly with OpenAPI documentation
//! - Health and readiness helpers
//! - Graceful shutdown coordination
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{ShutdownCoordinator, create_router, health_router, serve_router};
//! use core_config::app_info;
//!
//! let router = create_router::<ApiDoc>(api_routes, "http://localhost:3000")?
//!     .merge(health_router(app_info!()));
//!
//! let (coordinator, _rx) = ShutdownCoordinator::new();
//! serve_router(listener, router, coordinator.wait_for_shutdown()).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

// Re-export commonly used types and functions
pub use app::{create_router, serve_router, with_request_timeout};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
