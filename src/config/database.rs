//! Database configuration module.
//!
//! Handles the `SQLite` connection and creates the tables straight from the
//! entity definitions with `Schema::create_table_from_entity`, so the schema
//! always matches the Rust structs.

use crate::entities::{Bill, Receipt};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::info;

/// Connects to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    info!("Connecting to bill database");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates the `bills` and `receipts` tables if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut bill_table = schema.create_table_from_entity(Bill);
    let mut receipt_table = schema.create_table_from_entity(Receipt);

    db.execute(builder.build(bill_table.if_not_exists())).await?;
    db.execute(builder.build(receipt_table.if_not_exists())).await?;

    Ok(())
}
