//! Database layer with `SeaORM` entities and the wallet repository.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for wallets, operations, and users
//! - The `WalletRepository` implementing the atomic-apply protocol
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{ApplyOperationInput, WalletError, WalletRepository};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use walletd_shared::config::DatabaseConfig;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a connection pool sized from configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with_config(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections);
    Database::connect(options).await
}
