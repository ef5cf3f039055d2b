use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotbook_core::{
    errors::{SlotError, SlotResult},
    models::time_slot::{NewTimeSlot, TimeSlot},
};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{SlotStore, already_reserved, not_found};
use crate::{DbPool, repositories::time_slot};

/// SQLSTATE raised by the `no_technician_overlap` exclusion constraint.
const EXCLUSION_VIOLATION: &str = "23P01";

#[derive(Debug, Clone)]
pub struct PgSlotStore {
    pool: DbPool,
}

impl PgSlotStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Distinguishes a missing slot from one that lost the reservation race.
    async fn missing_or_conflict(&self, id: Uuid) -> SlotError {
        match time_slot::time_slot_exists(&self.pool, id).await {
            Ok(true) => {
                warn!(%id, "Rejected reservation of an already reserved slot");
                already_reserved(id)
            }
            Ok(false) => not_found(id),
            Err(e) => SlotError::Database(e),
        }
    }
}

fn is_exclusion_violation(err: &eyre::Report) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .and_then(|e| e.code())
        .is_some_and(|code| code == EXCLUSION_VIOLATION)
}

#[async_trait]
impl SlotStore for PgSlotStore {
    async fn create_slot(&self, new_slot: NewTimeSlot) -> SlotResult<TimeSlot> {
        new_slot.validate()?;

        let row = time_slot::create_time_slot(
            &self.pool,
            new_slot.service_id,
            new_slot.technician_id,
            new_slot.start,
            new_slot.end,
        )
        .await
        .map_err(|e| {
            if is_exclusion_violation(&e) {
                warn!(technician_id = ?new_slot.technician_id, "Technician already has an overlapping slot");
                SlotError::Conflict("Technician already has a slot in that window".to_string())
            } else {
                SlotError::Database(e)
            }
        })?;

        debug!(id = %row.id, service_id = %row.service_id, "Created time slot");
        Ok(row.into())
    }

    async fn get_slot(&self, id: Uuid) -> SlotResult<TimeSlot> {
        time_slot::get_time_slot_by_id(&self.pool, id)
            .await?
            .map(TimeSlot::from)
            .ok_or_else(|| not_found(id))
    }

    async fn list_available(
        &self,
        service_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SlotResult<Vec<TimeSlot>> {
        let rows = time_slot::get_available_time_slots(&self.pool, service_id, start, end).await?;
        debug!(%service_id, count = rows.len(), "Listed available time slots");
        Ok(rows.into_iter().map(TimeSlot::from).collect())
    }

    async fn list_slots(&self, service_id: Option<Uuid>) -> SlotResult<Vec<TimeSlot>> {
        let rows = time_slot::get_time_slots(&self.pool, service_id).await?;
        Ok(rows.into_iter().map(TimeSlot::from).collect())
    }

    async fn reserve(&self, id: Uuid) -> SlotResult<TimeSlot> {
        match time_slot::reserve_time_slot(&self.pool, id).await? {
            Some(row) => {
                debug!(%id, "Reserved time slot");
                Ok(row.into())
            }
            None => Err(self.missing_or_conflict(id).await),
        }
    }

    async fn release(&self, id: Uuid) -> SlotResult<TimeSlot> {
        let row = time_slot::release_time_slot(&self.pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        debug!(%id, "Released time slot");
        Ok(row.into())
    }
}
