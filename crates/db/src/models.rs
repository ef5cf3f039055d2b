use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slotbook_core::models::time_slot::TimeSlot;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlot {
    pub id: Uuid,
    pub service_id: Uuid,
    pub technician_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbTimeSlot> for TimeSlot {
    fn from(row: DbTimeSlot) -> Self {
        TimeSlot {
            id: row.id,
            start: row.start_time,
            end: row.end_time,
            service_id: row.service_id,
            technician_id: row.technician_id,
            is_available: row.is_available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
