//! # Slot Handlers
//!
//! Thin wrappers over [`SlotStore`](slotbook_db::store::SlotStore). Each
//! handler validates its input and then issues exactly one store call.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use slotbook_core::models::time_slot::{
    AvailabilityQuery, ListSlotsQuery, NewTimeSlot, SlotListResponse, TimeSlot,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Creates a new, available slot.
///
/// ```text
/// POST /api/slots
/// ```
#[axum::debug_handler]
pub async fn create_slot(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<NewTimeSlot>,
) -> Result<(StatusCode, Json<TimeSlot>), AppError> {
    let slot = state.store.create_slot(payload).await?;
    info!(id = %slot.id, service_id = %slot.service_id, start = %slot.start, "Slot created");

    Ok((StatusCode::CREATED, Json(slot)))
}

#[axum::debug_handler]
pub async fn get_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimeSlot>, AppError> {
    let slot = state.store.get_slot(id).await?;
    Ok(Json(slot))
}

/// Lists free slots for a service within a time window.
///
/// ```text
/// GET /api/slots/available?service_id=<uuid>&start=<rfc3339>&end=<rfc3339>
/// ```
///
/// Timestamps must be URL encoded. A raw `+` offset decodes to a space and
/// the query is rejected, so send `Z` or `%2B00:00`.
///
/// # Errors
///
/// * `SlotError::Validation` - `start` is after `end`
/// * `SlotError::Database` - Database error
#[axum::debug_handler]
pub async fn list_available(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<SlotListResponse>, AppError> {
    query.validate()?;

    let slots = state
        .store
        .list_available(query.service_id, query.start, query.end)
        .await?;

    Ok(Json(SlotListResponse { slots }))
}

/// Admin view of every slot, reserved ones included.
#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListSlotsQuery>,
) -> Result<Json<SlotListResponse>, AppError> {
    let slots = state.store.list_slots(query.service_id).await?;
    Ok(Json(SlotListResponse { slots }))
}

#[axum::debug_handler]
pub async fn reserve_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimeSlot>, AppError> {
    let slot = state.store.reserve(id).await?;
    info!(%id, "Slot reserved by admin");
    Ok(Json(slot))
}

#[axum::debug_handler]
pub async fn release_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimeSlot>, AppError> {
    let slot = state.store.release(id).await?;
    info!(%id, "Slot released by admin");
    Ok(Json(slot))
}
