#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use slotbook_api::{ApiState, middleware::auth::hash_password};
use slotbook_core::models::time_slot::{NewTimeSlot, TimeSlot};
use slotbook_db::{
    mock::repositories::MockSlotStore,
    store::{MemorySlotStore, SlotStore},
};
use uuid::Uuid;

pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 3, 14, hour, 0, 0).unwrap()
}

pub fn new_slot(service_id: Uuid, start: u32, end: u32) -> NewTimeSlot {
    NewTimeSlot {
        start: at(start),
        end: at(end),
        service_id,
        technician_id: None,
    }
}

pub fn slot(service_id: Uuid, start: u32, end: u32) -> TimeSlot {
    TimeSlot::from_new(new_slot(service_id, start, end))
}

/// Server over a real in-memory store. The store handle is returned so tests
/// can seed and inspect it directly.
pub fn memory_server(admin_protected: bool) -> (TestServer, MemorySlotStore) {
    let store = MemorySlotStore::new();
    let hash = admin_protected.then(|| hash_password(ADMIN_PASSWORD).unwrap());
    let state = ApiState::new(Arc::new(store.clone()) as Arc<dyn SlotStore>, "memory")
        .with_admin_password_hash(hash)
        .unwrap();

    let server = TestServer::new(slotbook_api::app(Arc::new(state))).unwrap();
    (server, store)
}

/// Server over a mockall store with admin auth disabled.
pub fn mock_server(store: MockSlotStore) -> TestServer {
    let state = ApiState::new(Arc::new(store), "mock");
    TestServer::new(slotbook_api::app(Arc::new(state))).unwrap()
}
