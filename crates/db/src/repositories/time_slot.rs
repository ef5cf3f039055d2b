use crate::models::DbTimeSlot;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const SLOT_COLUMNS: &str =
    "id, service_id, technician_id, start_time, end_time, is_available, created_at, updated_at";

pub async fn create_time_slot(
    pool: &Pool<Postgres>,
    service_id: Uuid,
    technician_id: Option<Uuid>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<DbTimeSlot> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let time_slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        INSERT INTO time_slots (id, service_id, technician_id, start_time, end_time, is_available, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, TRUE, $6, $6)
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(service_id)
    .bind(technician_id)
    .bind(start_time)
    .bind(end_time)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(time_slot)
}

pub async fn get_time_slot_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTimeSlot>> {
    let time_slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM time_slots
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(time_slot)
}

pub async fn time_slot_exists(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (SELECT 1 FROM time_slots WHERE id = $1)
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Available slots for a service whose window intersects `[start, end]`.
pub async fn get_available_time_slots(
    pool: &Pool<Postgres>,
    service_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<DbTimeSlot>> {
    let time_slots = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM time_slots
        WHERE service_id = $1
          AND is_available = TRUE
          AND end_time > $2
          AND start_time <= $3
        ORDER BY start_time ASC, id ASC
        "#
    ))
    .bind(service_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(time_slots)
}

pub async fn get_time_slots(
    pool: &Pool<Postgres>,
    service_id: Option<Uuid>,
) -> Result<Vec<DbTimeSlot>> {
    let time_slots = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM time_slots
        WHERE ($1::uuid IS NULL OR service_id = $1)
        ORDER BY start_time ASC, id ASC
        "#
    ))
    .bind(service_id)
    .fetch_all(pool)
    .await?;

    Ok(time_slots)
}

/// Flips an available slot to reserved in a single statement.
///
/// Returns `None` when the slot is missing or was already reserved; the
/// caller tells the two apart with [`time_slot_exists`].
pub async fn reserve_time_slot(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTimeSlot>> {
    let time_slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        UPDATE time_slots
        SET is_available = FALSE, updated_at = $2
        WHERE id = $1 AND is_available = TRUE
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(time_slot)
}

/// Marks a slot available again. Leaves `updated_at` alone if it already was.
pub async fn release_time_slot(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTimeSlot>> {
    let time_slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        UPDATE time_slots
        SET is_available = TRUE,
            updated_at = CASE WHEN is_available THEN updated_at ELSE $2 END
        WHERE id = $1
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(time_slot)
}
