//! Configuration for the todo service

use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, env_parse, server::ServerConfig};
use database::sql::SqlConfig;
use std::time::Duration;

pub use core_config::Environment;

/// `DATABASE_URL` value that selects the process-local store
pub const MEMORY_DATABASE_URL: &str = "memory://";

const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Where todos are kept
#[derive(Clone, Debug)]
pub enum StorageConfig {
    Sql(SqlConfig),
    Memory,
}

impl StorageConfig {
    fn from_sql_config(sql: SqlConfig) -> Self {
        if sql.url.trim() == MEMORY_DATABASE_URL {
            StorageConfig::Memory
        } else {
            StorageConfig::Sql(sql)
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub http: ServerConfig,
    pub grpc: grpc_client::server::ServerConfig,
    pub storage: StorageConfig,
    pub run_migrations: bool,
    /// Comma-separated list of allowed CORS origins
    pub cors_allowed_origin: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let http = ServerConfig::from_env()?;
        let grpc = grpc_client::server::ServerConfig::from_env()?;
        let storage = StorageConfig::from_sql_config(SqlConfig::from_env()?);

        let run_migrations = env_parse("RUN_MIGRATIONS", "true")?;
        let cors_allowed_origin = env_or_default("CORS_ALLOWED_ORIGIN", DEFAULT_CORS_ALLOWED_ORIGIN);
        let request_timeout = Duration::from_secs(env_parse("REQUEST_TIMEOUT_SECS", "30")?);

        Ok(Self {
            app: app_info!(),
            environment,
            http,
            grpc,
            storage,
            run_migrations,
            cors_allowed_origin,
            request_timeout,
        })
    }

    /// In-memory storage on ephemeral local ports.
    pub fn for_local_testing() -> Self {
        Self {
            app: app_info!(),
            environment: Environment::Development,
            http: ServerConfig::new("127.0.0.1", 0),
            grpc: grpc_client::server::ServerConfig::new()
                .with_host("127.0.0.1")
                .with_port(0),
            storage: StorageConfig::Memory,
            run_migrations: false,
            cors_allowed_origin: DEFAULT_CORS_ALLOWED_ORIGIN.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}
