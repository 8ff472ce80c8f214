//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - The `accounts` entity definition
//! - The ledger repository (balance reads and atomic mutations)
//! - Database migrations and the connection helper

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{BalanceSnapshot, LedgerError, LedgerRepository, TransferOutcome};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
