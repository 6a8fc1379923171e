//! gRPC Server Builder
//!
//! ```ignore
//! use grpc_client::server::{GrpcServer, ServerConfig, create_health_service, request_id_layer};
//! use rpc::todo::todo_service_server::{TodoServiceServer, SERVICE_NAME};
//! use tonic::codec::CompressionEncoding;
//! use tonic::transport::Server;
//!
//! let config = ServerConfig::from_env()?;
//! let (health_reporter, health_service) = create_health_service();
//!
//! GrpcServer::setup_health(&health_reporter, &[SERVICE_NAME]).await;
//! GrpcServer::log_startup(&config, &[SERVICE_NAME]);
//!
//! Server::builder()
//!     .layer(request_id_layer())
//!     .add_service(health_service)
//!     .add_service(
//!         TodoServiceServer::new(my_impl)
//!             .accept_compressed(CompressionEncoding::Zstd)
//!             .send_compressed(CompressionEncoding::Zstd),
//!     )
//!     .serve(config.socket_addr()?)
//!     .await?;
//! ```

mod builder;
mod config;

pub use builder::{GrpcServer, RequestIdLayer, create_health_service, request_id_layer};
pub use config::ServerConfig;
