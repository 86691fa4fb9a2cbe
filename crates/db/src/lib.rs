//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! The connection is an explicitly owned object handed to each repository
//! at construction; nothing here reaches for ambient global state.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AdminRepository, EntitlementRepository, ExpenseRepository, ProductRepository, SaleRepository,
    SubscriptionRepository, ToolRepository, UserRepository,
};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options.max_connections(max_connections);

    let db = Database::connect(options).await?;
    tracing::debug!(max_connections, "Database pool established");
    Ok(db)
}
