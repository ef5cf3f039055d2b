use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use slotbook_core::{
    errors::SlotResult,
    models::time_slot::{NewTimeSlot, TimeSlot},
};
use uuid::Uuid;

use crate::store::SlotStore;

// Mock store for handler tests
mock! {
    pub SlotStore {}

    #[async_trait]
    impl SlotStore for SlotStore {
        async fn create_slot(&self, new_slot: NewTimeSlot) -> SlotResult<TimeSlot>;

        async fn get_slot(&self, id: Uuid) -> SlotResult<TimeSlot>;

        async fn list_available(
            &self,
            service_id: Uuid,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> SlotResult<Vec<TimeSlot>>;

        async fn list_slots(&self, service_id: Option<Uuid>) -> SlotResult<Vec<TimeSlot>>;

        async fn reserve(&self, id: Uuid) -> SlotResult<TimeSlot>;

        async fn release(&self, id: Uuid) -> SlotResult<TimeSlot>;
    }
}
