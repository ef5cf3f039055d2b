//! # Availability Store
//!
//! [`SlotStore`] is the seam between the HTTP layer and persistence. The API
//! holds an `Arc<dyn SlotStore>` and never reaches for a global client.
//!
//! Two implementations ship with the crate:
//!
//! - [`postgres::PgSlotStore`] for production, backed by the `time_slots` table
//! - [`memory::MemorySlotStore`] for running without a database and for tests
//!
//! Both guarantee that a slot is handed out at most once: `reserve` only
//! succeeds against a slot that is currently available, and every other
//! attempt gets [`SlotError::Conflict`](slotbook_core::errors::SlotError::Conflict).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotbook_core::{
    errors::{SlotError, SlotResult},
    models::time_slot::{NewTimeSlot, TimeSlot},
};
use uuid::Uuid;

pub use memory::MemorySlotStore;
pub use postgres::PgSlotStore;

#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Persists a new slot. It starts out available.
    async fn create_slot(&self, new_slot: NewTimeSlot) -> SlotResult<TimeSlot>;

    async fn get_slot(&self, id: Uuid) -> SlotResult<TimeSlot>;

    /// Available slots for `service_id` intersecting `[start, end]`, earliest first.
    async fn list_available(
        &self,
        service_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SlotResult<Vec<TimeSlot>>;

    /// Every slot regardless of availability, earliest first.
    async fn list_slots(&self, service_id: Option<Uuid>) -> SlotResult<Vec<TimeSlot>>;

    /// Marks the slot unavailable. Fails with `Conflict` if it already was.
    async fn reserve(&self, id: Uuid) -> SlotResult<TimeSlot>;

    /// Marks the slot available. Releasing a free slot returns it unchanged.
    async fn release(&self, id: Uuid) -> SlotResult<TimeSlot>;
}

pub(crate) fn not_found(id: Uuid) -> SlotError {
    SlotError::NotFound(format!("Time slot with ID {} not found", id))
}

pub(crate) fn already_reserved(id: Uuid) -> SlotError {
    SlotError::Conflict(format!("Time slot {} is already reserved", id))
}
