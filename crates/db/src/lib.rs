//! Persistence for SlotBook.
//!
//! The HTTP layer only sees [`store::SlotStore`]. The SQL lives in
//! [`repositories`] and the table definition in [`schema`].

pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

pub mod mock;

use std::time::Duration;

use eyre::{Result, WrapErr};
use sqlx::{Pool, Postgres, postgres::PgPoolOptions};
use tracing::debug;

pub type DbPool = Pool<Postgres>;

/// Opens a PostgreSQL pool of at most `max_connections` connections.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool> {
    debug!(max_connections, "Opening PostgreSQL pool");
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .wrap_err("Failed to connect to PostgreSQL")
}
