use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use slotbook_api::{ApiState, config::ApiConfig};
use slotbook_db::{
    create_pool,
    schema::initialize_database,
    store::{MemorySlotStore, PgSlotStore, SlotStore},
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    slotbook_api::init_tracing(config.log_level)?;

    // Pick the slot store
    let (store, storage): (Arc<dyn SlotStore>, &'static str) = match &config.database_url {
        Some(database_url) => {
            let db_pool = create_pool(database_url, config.max_connections).await?;
            initialize_database(&db_pool).await?;
            info!("Connected to PostgreSQL");
            (Arc::new(PgSlotStore::new(db_pool)), "postgres")
        }
        None => {
            warn!("DATABASE_URL is not set; slots are kept in memory and lost on restart");
            (Arc::new(MemorySlotStore::new()), "memory")
        }
    };

    let state = ApiState::new(store, storage)
        .with_admin_password_hash(config.admin_password_hash.clone())
        .wrap_err("ADMIN_PASSWORD_HASH is not a valid argon2 hash; generate one with hash-password")?;

    // Start API server
    slotbook_api::start_server(config, state).await?;

    Ok(())
}
