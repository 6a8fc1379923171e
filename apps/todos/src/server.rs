//! Storage wiring, router assembly and server lifecycle
//!
//! HTTP and gRPC listeners run side by side and share one
//! [`ShutdownCoordinator`]: a signal, or either server exiting, drains both.

use axum::{Router, extract::State, middleware, response::IntoResponse, routing::get};
use axum_helpers::{
    HealthCheckFuture, ShutdownCoordinator, create_router, health_router, run_health_checks,
    serve_router, with_request_timeout,
};
use database::sql::{
    DatabaseConnection, check_health, connect_from_config_with_retry, run_migrations,
};
use domain_todos::{InMemoryTodoRepository, SqlTodoRepository, TodoRepository, TodoService};
use eyre::WrapErr;
use grpc_client::server::{GrpcServer, ServerConfig as GrpcConfig, create_health_service, request_id_layer};
use migration::Migrator;
use rpc::todo::todo_service_server::{SERVICE_NAME, TodoServiceServer};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::codec::CompressionEncoding;
use tonic::transport::Server;
use tracing::{info, warn};

use crate::config::{Config, StorageConfig};
use crate::grpc::TodosGrpcService;
use crate::openapi::ApiDoc;

/// What `/ready` has to verify
#[derive(Clone)]
pub enum Readiness {
    /// Nothing external to check
    Always,
    Database(DatabaseConnection),
}

async fn ready_handler(State(readiness): State<Readiness>) -> impl IntoResponse {
    let mut checks: Vec<(&str, HealthCheckFuture)> = Vec::new();

    if let Readiness::Database(db) = &readiness {
        checks.push((
            "database",
            Box::pin(async move { check_health(db).await.map_err(|e| e.to_string()) }),
        ));
    }

    run_health_checks(checks).await
}

/// Full HTTP application: `/api/todos`, docs, `/health`, `/ready` and `/metrics`.
pub fn build_router<R>(
    config: &Config,
    service: Arc<TodoService<R>>,
    readiness: Readiness,
) -> eyre::Result<Router>
where
    R: TodoRepository + 'static,
{
    let api_routes = Router::new().nest("/todos", domain_todos::router(service));

    let router = create_router::<ApiDoc>(api_routes, &config.cors_allowed_origin)?
        .merge(health_router(config.app))
        .merge(
            Router::new()
                .route("/ready", get(ready_handler))
                .with_state(readiness),
        )
        .route("/metrics", get(observability::metrics_handler));

    Ok(with_request_timeout(router, config.request_timeout)
        .layer(middleware::from_fn(observability::metrics_middleware)))
}

async fn serve_grpc<R, F>(
    config: GrpcConfig,
    request_timeout: Duration,
    service: Arc<TodoService<R>>,
    listener: TcpListener,
    shutdown: F,
) -> Result<(), tonic::transport::Error>
where
    R: TodoRepository + 'static,
    F: Future<Output = ()> + Send,
{
    let (health_reporter, health_service) = create_health_service();
    GrpcServer::setup_health(&health_reporter, &[SERVICE_NAME]).await;

    let mut todos = TodoServiceServer::new(TodosGrpcService::new(service))
        .max_decoding_message_size(config.max_message_size)
        .max_encoding_message_size(config.max_message_size);
    if config.enable_compression {
        todos = todos
            .accept_compressed(CompressionEncoding::Zstd)
            .send_compressed(CompressionEncoding::Zstd);
    }

    GrpcServer::log_startup(&config, &[SERVICE_NAME]);

    let drain = async {
        shutdown.await;
        GrpcServer::mark_not_serving(&health_reporter, &[SERVICE_NAME]).await;
    };

    Server::builder()
        .timeout(request_timeout)
        .layer(request_id_layer())
        .add_service(health_service)
        .add_service(todos)
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), drain)
        .await
}

/// Handle to both servers once they are listening.
pub struct RunningServers {
    pub http_addr: SocketAddr,
    pub grpc_addr: SocketAddr,
    pub shutdown: ShutdownCoordinator,
    handle: JoinHandle<eyre::Result<()>>,
}

impl RunningServers {
    /// Wait until both servers have drained.
    pub async fn wait(self) -> eyre::Result<()> {
        self.handle.await.wrap_err("Server task failed")?
    }

    /// Trigger shutdown and wait for both servers to drain.
    pub async fn stop(self) -> eyre::Result<()> {
        self.shutdown.shutdown();
        self.wait().await
    }
}

/// Bind both listeners and start serving in the background.
///
/// Ports of 0 bind ephemeral ports; the bound addresses are returned.
pub async fn start<R>(
    config: &Config,
    service: Arc<TodoService<R>>,
    readiness: Readiness,
    shutdown: ShutdownCoordinator,
) -> eyre::Result<RunningServers>
where
    R: TodoRepository + 'static,
{
    let router = build_router(config, Arc::clone(&service), readiness)?;

    let http_listener = TcpListener::bind(config.http.address())
        .await
        .wrap_err_with(|| format!("Failed to bind HTTP listener on {}", config.http.address()))?;
    let grpc_listener = TcpListener::bind(config.grpc.socket_addr()?)
        .await
        .wrap_err_with(|| format!("Failed to bind gRPC listener on {}", config.grpc.addr_string()))?;

    let http_addr = http_listener.local_addr()?;
    let grpc_addr = grpc_listener.local_addr()?;

    let http = {
        let coordinator = shutdown.clone();
        let signal = shutdown.wait_for_shutdown();
        async move {
            let result = serve_router(http_listener, router, signal).await;
            coordinator.shutdown();
            result.wrap_err("HTTP server error")
        }
    };

    let grpc = {
        let coordinator = shutdown.clone();
        let signal = shutdown.wait_for_shutdown();
        let grpc_config = config.grpc.clone().with_port(grpc_addr.port());
        let request_timeout = config.request_timeout;
        async move {
            let result =
                serve_grpc(grpc_config, request_timeout, service, grpc_listener, signal).await;
            coordinator.shutdown();
            result.wrap_err("gRPC server error")
        }
    };

    let handle = tokio::spawn(async move {
        let (http, grpc) = tokio::join!(http, grpc);
        http.and(grpc)
    });

    info!(%http_addr, %grpc_addr, "Todo service listening");

    Ok(RunningServers {
        http_addr,
        grpc_addr,
        shutdown,
        handle,
    })
}

/// Run the service until SIGINT/SIGTERM.
pub async fn run(config: Config) -> eyre::Result<()> {
    observability::init_metrics().wrap_err("Failed to install metrics recorder")?;

    info!(
        name = config.app.name,
        version = config.app.version,
        environment = ?config.environment,
        "Starting todo service"
    );

    let coordinator = ShutdownCoordinator::default();
    let signals = coordinator.clone();
    tokio::spawn(async move { signals.wait_for_signal().await });

    let result = match config.storage.clone() {
        StorageConfig::Memory => {
            warn!("Using in-memory storage; todos are lost on exit");
            let service = Arc::new(TodoService::new(InMemoryTodoRepository::new()));
            start(&config, service, Readiness::Always, coordinator)
                .await?
                .wait()
                .await
        }
        StorageConfig::Sql(sql) => {
            info!(backend = ?sql.backend(), "Connecting to database");
            let db = connect_from_config_with_retry(sql, None)
                .await
                .wrap_err("Failed to connect to database")?;

            if config.run_migrations {
                run_migrations::<Migrator>(&db, config.app.name)
                    .await
                    .wrap_err("Failed to run database migrations")?;
            }

            let service = Arc::new(TodoService::new(SqlTodoRepository::new(db.clone())));
            let result = start(&config, service, Readiness::Database(db.clone()), coordinator)
                .await?
                .wait()
                .await;

            info!("Closing database connections");
            if let Err(e) = db.close().await {
                warn!(error = %e, "Failed to close database connections");
            }

            result
        }
    };

    info!("Todo service shutdown complete");
    result
}
