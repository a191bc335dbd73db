//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! The repositories own atomicity: every balance mutation and every gated
//! campaign save runs inside one database transaction holding a row-level
//! lock on the funding account.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{AccountRepository, CampaignRepository, LedgerRepository};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
