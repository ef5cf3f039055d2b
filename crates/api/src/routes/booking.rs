use axum::{
    Router,
    middleware,
    routing::{delete, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers, middleware::auth};

pub fn routes(state: Arc<ApiState>) -> Router<Arc<ApiState>> {
    let public = Router::new().route("/api/bookings", post(handlers::booking::create_booking));

    let admin = Router::new()
        .route(
            "/api/bookings/:slot_id",
            delete(handlers::booking::cancel_booking),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::require_admin));

    public.merge(admin)
}
