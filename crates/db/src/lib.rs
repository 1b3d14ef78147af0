//! Database layer with `SeaORM` entities and EPF stores.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Implementations of the core persistence ports
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{InMemoryStore, SeaOrmLedgerStore, SeaOrmRangeConfigStore};

use std::time::Duration;

use hrledger_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection from the `database` configuration section.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    Database::connect(options).await
}
