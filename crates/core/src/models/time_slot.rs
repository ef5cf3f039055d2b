use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{SlotError, SlotResult};

/// A bookable window for one service type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub service_id: Uuid,
    pub technician_id: Option<Uuid>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeSlot {
    /// Builds a fresh, available slot from a validated creation request.
    pub fn from_new(new_slot: NewTimeSlot) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            start: new_slot.start,
            end: new_slot.end,
            service_id: new_slot.service_id,
            technician_id: new_slot.technician_id,
            is_available: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Slots are half-open `[start, end)` and the query window `[start, end]`
    /// is closed, so a query ending on the slot start still matches.
    pub fn intersects(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start <= end && self.end > start
    }

    /// True when both slots have the same technician and their windows overlap.
    pub fn clashes_with(&self, other: &NewTimeSlot) -> bool {
        match (self.technician_id, other.technician_id) {
            (Some(mine), Some(theirs)) if mine == theirs => {
                self.start < other.end && other.start < self.end
            }
            _ => false,
        }
    }
}

/// Input for creating a slot. Used directly as the admin request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub service_id: Uuid,
    #[serde(default)]
    pub technician_id: Option<Uuid>,
}

impl NewTimeSlot {
    pub fn validate(&self) -> SlotResult<()> {
        if self.start >= self.end {
            return Err(SlotError::Validation(format!(
                "Slot start ({}) must be before its end ({})",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

/// Query parameters for `GET /api/slots/available`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub service_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AvailabilityQuery {
    pub fn validate(&self) -> SlotResult<()> {
        if self.start > self.end {
            return Err(SlotError::Validation(
                "Query start must not be after query end".to_string(),
            ));
        }
        Ok(())
    }
}

/// Query parameters for the admin slot listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSlotsQuery {
    pub service_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotListResponse {
    pub slots: Vec<TimeSlot>,
}
