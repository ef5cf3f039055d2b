use axum::{
    Router,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers, middleware::auth};

pub fn routes(state: Arc<ApiState>) -> Router<Arc<ApiState>> {
    let public = Router::new()
        .route(
            "/api/slots/available",
            get(handlers::slot::list_available),
        )
        .route("/api/slots/:id", get(handlers::slot::get_slot));

    let admin = Router::new()
        .route(
            "/api/slots",
            post(handlers::slot::create_slot).get(handlers::slot::list_slots),
        )
        .route("/api/slots/:id/reserve", post(handlers::slot::reserve_slot))
        .route("/api/slots/:id/release", post(handlers::slot::release_slot))
        .route_layer(middleware::from_fn_with_state(state, auth::require_admin));

    public.merge(admin)
}
