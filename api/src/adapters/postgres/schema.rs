//! Schema bootstrap
//!
//! The DDL is idempotent, so running it against an existing database is a no-op.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};

const SCHEMA_SQL: &str = include_str!("../../../migrations/001_crm_schema.sql");

/// Create the CRM tables and indexes if they do not exist yet
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute_unprepared(SCHEMA_SQL).await?;
    tracing::info!("Database schema is up to date");
    Ok(())
}
