//! PostgreSQL persistence for the story-writing entities.
//!
//! - [`models`] -- row structs and request DTOs.
//! - [`repositories`] -- zero-sized `XxxRepo` structs; every query on owned
//!   data takes the requesting user explicitly.
//! - [`ownership`] -- visibility predicates and reference checks.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod ownership;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to prove the pool can reach the server.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
