use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use slotbook_core::models::{
    booking::{BookingConfirmation, BookingRequest},
    time_slot::TimeSlot,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Books a slot for a customer.
///
/// The payload is checked before the store is touched; a rejected payload
/// never reserves anything. A slot that is already taken comes back as 409.
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingConfirmation>), AppError> {
    payload.validate()?;

    let slot = state.store.reserve(payload.slot_id).await?;
    info!(slot_id = %slot.id, start = %slot.start, "Slot booked");

    let confirmation = BookingConfirmation {
        slot,
        customer_name: payload.customer_name.trim().to_string(),
        confirmed_at: Utc::now(),
    };

    Ok((StatusCode::CREATED, Json(confirmation)))
}

/// Cancels a booking by putting its slot back on offer.
#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    Path(slot_id): Path<Uuid>,
) -> Result<Json<TimeSlot>, AppError> {
    let slot = state.store.release(slot_id).await?;
    info!(%slot_id, "Booking cancelled");
    Ok(Json(slot))
}
