//! gRPC server utilities.

use super::config::ServerConfig;
use tonic_health::server::HealthReporter;
use tower::{
    ServiceBuilder,
    layer::util::{Identity, Stack},
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::info;

/// Layer stack installed by [`request_id_layer`]
pub type RequestIdLayer =
    Stack<PropagateRequestIdLayer, Stack<SetRequestIdLayer<MakeRequestUuid>, Identity>>;

/// Assign an `x-request-id` to calls that arrive without one and echo it
/// back in the response headers.
///
/// ```ignore
/// Server::builder()
///     .layer(request_id_layer())
///     .add_service(service)
/// ```
pub fn request_id_layer() -> ServiceBuilder<RequestIdLayer> {
    ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
}

/// Helpers shared by gRPC server binaries.
pub struct GrpcServer;

impl GrpcServer {
    /// Log server startup information.
    pub fn log_startup(config: &ServerConfig, service_names: &[&str]) {
        info!(
            addr = %config.addr_string(),
            services = ?service_names,
            compression = config.enable_compression,
            max_message_size = config.max_message_size,
            "gRPC server starting"
        );
    }

    /// Mark services as serving.
    ///
    /// The empty service name is marked too; it is what generic health
    /// probes query.
    pub async fn setup_health(health_reporter: &HealthReporter, service_names: &[&str]) {
        for service_name in service_names {
            health_reporter
                .set_service_status(*service_name, tonic_health::ServingStatus::Serving)
                .await;
        }

        health_reporter
            .set_service_status("", tonic_health::ServingStatus::Serving)
            .await;

        info!(services = ?service_names, "Services marked as serving");
    }

    /// Mark services as not serving, ahead of shutdown.
    pub async fn mark_not_serving(health_reporter: &HealthReporter, service_names: &[&str]) {
        for service_name in service_names.iter().copied().chain([""]) {
            health_reporter
                .set_service_status(service_name, tonic_health::ServingStatus::NotServing)
                .await;
        }
    }
}

// Re-export health_reporter for convenience
pub use tonic_health::server::health_reporter as create_health_service;
