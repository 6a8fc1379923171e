//! SQL connection management for the todo service.
//!
//! Connects to PostgreSQL or SQLite through SeaORM (the backend is picked
//! from the URL scheme), retries the initial connection with exponential
//! backoff, runs migrations and answers health probes.
//!
//! # Features
//!
//! - `config` (default) - load [`sql::SqlConfig`] with `core_config::FromEnv`
//!
//! # Example
//!
//! ```ignore
//! use database::sql::{self, SqlConfig};
//! use migration::Migrator;
//!
//! let config = SqlConfig::new("sqlite://todo.db?mode=rwc");
//! let db = sql::connect_from_config_with_retry(config, None).await?;
//! sql::run_migrations::<Migrator>(&db, "todos").await?;
//! sql::check_health(&db).await?;
//! ```

pub mod common;
pub mod sql;

pub use common::{DatabaseError, DatabaseResult};
