use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Needed for the uuid equality operator inside the exclusion constraint
    sqlx::query("CREATE EXTENSION IF NOT EXISTS btree_gist;")
        .execute(pool)
        .await?;

    // Create time_slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            service_id UUID NOT NULL,
            technician_id UUID NULL,
            start_time TIMESTAMP WITH TIME ZONE NOT NULL,
            end_time TIMESTAMP WITH TIME ZONE NOT NULL,
            is_available BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time),
            CONSTRAINT no_technician_overlap EXCLUDE USING gist (
                technician_id WITH =,
                tstzrange(start_time, end_time) WITH &&
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    const INDEXES: [&str; 3] = [
        "CREATE INDEX IF NOT EXISTS idx_time_slots_service_start ON time_slots(service_id, start_time)",
        "CREATE INDEX IF NOT EXISTS idx_time_slots_technician_id ON time_slots(technician_id)",
        "CREATE INDEX IF NOT EXISTS idx_time_slots_available ON time_slots(service_id) WHERE is_available",
    ];
    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
