//! # gRPC Helpers
//!
//! Shared plumbing for the todo gRPC server and its clients:
//!
//! - **Server**: env-based [`server::ServerConfig`], health registration
//!   (`grpc.health.v1.Health`), `x-request-id` propagation
//! - **Channel**: client channel creation with HTTP/2 tuning
//! - **Interceptors**: request-id injection for outgoing calls
//! - **Conversions**: RFC 3339 timestamps for protobuf string fields
//!
//! ## Quick Start
//!
//! ```ignore
//! use grpc_client::server::{GrpcServer, ServerConfig, create_health_service, request_id_layer};
//! use rpc::todo::todo_service_server::{TodoServiceServer, SERVICE_NAME};
//! use tonic::transport::Server;
//!
//! let config = ServerConfig::from_env()?;
//! let (health_reporter, health_service) = create_health_service();
//! GrpcServer::setup_health(&health_reporter, &[SERVICE_NAME]).await;
//!
//! Server::builder()
//!     .layer(request_id_layer())
//!     .add_service(health_service)
//!     .add_service(TodoServiceServer::new(my_impl))
//!     .serve(config.socket_addr()?)
//!     .await?;
//! ```

pub mod channel;
pub mod conversions;
pub mod error;
pub mod interceptors;
pub mod server;

// Re-export main types and functions for convenience
pub use channel::{ChannelConfig, create_channel, create_channel_with_config};
pub use error::{GrpcError, GrpcResult};
pub use interceptors::TracingInterceptor;
