use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use slotbook_db::schema::initialize_database;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load environment variables
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL environment variable must be set")?;

    info!("Connecting to database...");
    let db_pool = slotbook_db::create_pool(&database_url, 1).await?;

    initialize_database(&db_pool).await?;
    info!("Database schema is up to date.");

    Ok(())
}
