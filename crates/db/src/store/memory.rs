use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotbook_core::{
    errors::{SlotError, SlotResult},
    models::time_slot::{NewTimeSlot, TimeSlot},
};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{SlotStore, already_reserved, not_found};

/// Process-local slots. Contents are lost on restart.
#[derive(Debug, Clone, Default)]
pub struct MemorySlotStore {
    slots: Arc<RwLock<HashMap<Uuid, TimeSlot>>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted(mut slots: Vec<TimeSlot>) -> Vec<TimeSlot> {
    slots.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
    slots
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn create_slot(&self, new_slot: NewTimeSlot) -> SlotResult<TimeSlot> {
        new_slot.validate()?;

        let mut slots = self.slots.write().await;
        if let Some(existing) = slots.values().find(|slot| slot.clashes_with(&new_slot)) {
            warn!(existing = %existing.id, "Technician already has an overlapping slot");
            return Err(SlotError::Conflict(format!(
                "Technician already has slot {} in that window",
                existing.id
            )));
        }

        let slot = TimeSlot::from_new(new_slot);
        debug!(id = %slot.id, service_id = %slot.service_id, "Created time slot");
        slots.insert(slot.id, slot.clone());
        Ok(slot)
    }

    async fn get_slot(&self, id: Uuid) -> SlotResult<TimeSlot> {
        self.slots
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn list_available(
        &self,
        service_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SlotResult<Vec<TimeSlot>> {
        let slots = self.slots.read().await;
        let available = slots
            .values()
            .filter(|slot| slot.service_id == service_id)
            .filter(|slot| slot.is_available)
            .filter(|slot| slot.intersects(start, end))
            .cloned()
            .collect();
        Ok(sorted(available))
    }

    async fn list_slots(&self, service_id: Option<Uuid>) -> SlotResult<Vec<TimeSlot>> {
        let slots = self.slots.read().await;
        let matching = slots
            .values()
            .filter(|slot| service_id.is_none_or(|id| slot.service_id == id))
            .cloned()
            .collect();
        Ok(sorted(matching))
    }

    async fn reserve(&self, id: Uuid) -> SlotResult<TimeSlot> {
        let mut slots = self.slots.write().await;
        let slot = slots.get_mut(&id).ok_or_else(|| not_found(id))?;
        if !slot.is_available {
            warn!(%id, "Rejected reservation of an already reserved slot");
            return Err(already_reserved(id));
        }

        slot.is_available = false;
        slot.updated_at = Utc::now();
        debug!(%id, "Reserved time slot");
        Ok(slot.clone())
    }

    async fn release(&self, id: Uuid) -> SlotResult<TimeSlot> {
        let mut slots = self.slots.write().await;
        let slot = slots.get_mut(&id).ok_or_else(|| not_found(id))?;
        if !slot.is_available {
            slot.is_available = true;
            slot.updated_at = Utc::now();
            debug!(%id, "Released time slot");
        }
        Ok(slot.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 1, hour, 0, 0).unwrap()
    }

    fn new_slot(service_id: Uuid, start: u32, end: u32) -> NewTimeSlot {
        NewTimeSlot {
            start: at(start),
            end: at(end),
            service_id,
            technician_id: None,
        }
    }

    #[tokio::test]
    async fn test_created_slot_is_available() {
        let store = MemorySlotStore::new();
        let service_id = Uuid::new_v4();

        let slot = store.create_slot(new_slot(service_id, 9, 11)).await.unwrap();

        assert!(slot.is_available);
        assert_eq!(store.get_slot(slot.id).await.unwrap(), slot);
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_window() {
        let store = MemorySlotStore::new();

        let result = store.create_slot(new_slot(Uuid::new_v4(), 11, 9)).await;

        assert!(matches!(result, Err(SlotError::Validation(_))));
        assert!(store.list_slots(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_technician_overlap() {
        let store = MemorySlotStore::new();
        let service_id = Uuid::new_v4();
        let technician_id = Some(Uuid::new_v4());

        let mut first = new_slot(service_id, 9, 11);
        first.technician_id = technician_id;
        store.create_slot(first).await.unwrap();

        let mut overlapping = new_slot(service_id, 10, 12);
        overlapping.technician_id = technician_id;
        let result = store.create_slot(overlapping).await;
        assert!(matches!(result, Err(SlotError::Conflict(_))));

        // Back-to-back slots are fine
        let mut adjacent = new_slot(service_id, 11, 12);
        adjacent.technician_id = technician_id;
        store.create_slot(adjacent).await.unwrap();

        // Unassigned slots may overlap anything
        store.create_slot(new_slot(service_id, 9, 11)).await.unwrap();
        store.create_slot(new_slot(service_id, 9, 11)).await.unwrap();

        assert_eq!(store.list_slots(Some(service_id)).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_reserve_then_release_restores_availability() {
        let store = MemorySlotStore::new();
        let slot = store
            .create_slot(new_slot(Uuid::new_v4(), 9, 11))
            .await
            .unwrap();

        let reserved = store.reserve(slot.id).await.unwrap();
        assert!(!reserved.is_available);
        assert!(!store.get_slot(slot.id).await.unwrap().is_available);

        let released = store.release(slot.id).await.unwrap();
        assert!(released.is_available);
        assert!(store.get_slot(slot.id).await.unwrap().is_available);
    }

    #[tokio::test]
    async fn test_reserve_twice_conflicts() {
        let store = MemorySlotStore::new();
        let slot = store
            .create_slot(new_slot(Uuid::new_v4(), 9, 11))
            .await
            .unwrap();

        store.reserve(slot.id).await.unwrap();
        let second = store.reserve(slot.id).await;

        assert!(matches!(second, Err(SlotError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_release_of_free_slot_is_a_no_op() {
        let store = MemorySlotStore::new();
        let slot = store
            .create_slot(new_slot(Uuid::new_v4(), 9, 11))
            .await
            .unwrap();

        let released = store.release(slot.id).await.unwrap();

        assert_eq!(released, slot);
    }

    #[tokio::test]
    async fn test_unknown_slot_is_not_found() {
        let store = MemorySlotStore::new();
        let id = Uuid::new_v4();

        assert!(matches!(store.get_slot(id).await, Err(SlotError::NotFound(_))));
        assert!(matches!(store.reserve(id).await, Err(SlotError::NotFound(_))));
        assert!(matches!(store.release(id).await, Err(SlotError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_available_filters_and_sorts() {
        let store = MemorySlotStore::new();
        let service_id = Uuid::new_v4();
        let other_service = Uuid::new_v4();

        let late = store.create_slot(new_slot(service_id, 15, 17)).await.unwrap();
        let early = store.create_slot(new_slot(service_id, 8, 10)).await.unwrap();
        let middle = store.create_slot(new_slot(service_id, 11, 13)).await.unwrap();
        let reserved = store.create_slot(new_slot(service_id, 12, 14)).await.unwrap();
        store.reserve(reserved.id).await.unwrap();
        store.create_slot(new_slot(other_service, 9, 11)).await.unwrap();
        // Outside the query window
        store.create_slot(new_slot(service_id, 20, 22)).await.unwrap();

        let available = store
            .list_available(service_id, at(7), at(18))
            .await
            .unwrap();

        let ids: Vec<Uuid> = available.iter().map(|slot| slot.id).collect();
        assert_eq!(ids, vec![early.id, middle.id, late.id]);
        assert!(available.iter().all(|slot| slot.is_available));
        assert!(available.windows(2).all(|pair| pair[0].start <= pair[1].start));
    }

    #[tokio::test]
    async fn test_list_available_includes_partial_overlap() {
        let store = MemorySlotStore::new();
        let service_id = Uuid::new_v4();
        let slot = store.create_slot(new_slot(service_id, 9, 12)).await.unwrap();

        let available = store
            .list_available(service_id, at(11), at(11) + Duration::days(1))
            .await
            .unwrap();

        assert_eq!(available, vec![slot]);
    }

    #[rstest]
    #[case(9, 9, 1)]
    #[case(8, 9, 1)]
    #[case(8, 8, 0)]
    #[case(12, 12, 0)]
    #[case(11, 13, 1)]
    #[case(12, 14, 0)]
    #[tokio::test]
    async fn test_list_available_window_edges(
        #[case] query_start: u32,
        #[case] query_end: u32,
        #[case] expected: usize,
    ) {
        let store = MemorySlotStore::new();
        let service_id = Uuid::new_v4();
        store.create_slot(new_slot(service_id, 9, 12)).await.unwrap();

        let available = store
            .list_available(service_id, at(query_start), at(query_end))
            .await
            .unwrap();

        assert_eq!(available.len(), expected);
    }

    #[tokio::test]
    async fn test_wider_window_never_returns_fewer_slots() {
        let store = MemorySlotStore::new();
        let service_id = Uuid::new_v4();
        for (start, end) in [(6, 8), (9, 12), (12, 13), (15, 18)] {
            store.create_slot(new_slot(service_id, start, end)).await.unwrap();
        }

        for start in 5..=19 {
            for end in start..=19 {
                let narrow = store
                    .list_available(service_id, at(start), at(end))
                    .await
                    .unwrap();
                let wider = store
                    .list_available(service_id, at(start.saturating_sub(1)), at(end + 1))
                    .await
                    .unwrap();

                assert!(
                    narrow.iter().all(|slot| wider.contains(slot)),
                    "[{start}, {end}] matched a slot the wider window lost"
                );
            }
        }
    }

    #[tokio::test]
    async fn test_list_slots_includes_reserved() {
        let store = MemorySlotStore::new();
        let service_id = Uuid::new_v4();
        let free = store.create_slot(new_slot(service_id, 9, 10)).await.unwrap();
        let taken = store.create_slot(new_slot(service_id, 10, 11)).await.unwrap();
        store.reserve(taken.id).await.unwrap();
        store.create_slot(new_slot(Uuid::new_v4(), 9, 10)).await.unwrap();

        let slots = store.list_slots(Some(service_id)).await.unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].id, free.id);
        assert_eq!(slots[1].id, taken.id);
        assert!(!slots[1].is_available);

        assert_eq!(store.list_slots(None).await.unwrap().len(), 3);
    }

    #[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
    async fn test_concurrent_reservations_admit_exactly_one() {
        let store = MemorySlotStore::new();
        let slot = store
            .create_slot(new_slot(Uuid::new_v4(), 9, 11))
            .await
            .unwrap();
        let id = slot.id;

        let attempts: Vec<_> = (0..32)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.reserve(id).await })
            })
            .collect();

        let mut successes = 0;
        let mut conflicts = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => successes += 1,
                Err(SlotError::Conflict(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {:?}", e),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 31);
    }
}
