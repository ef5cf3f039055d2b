//! # Error Handling Middleware
//!
//! Maps [`SlotError`] onto HTTP status codes and a JSON body of the form
//! `{"error": "<message>"}` so every handler fails the same way.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use slotbook_core::errors::SlotError;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use slotbook_api::middleware::error_handling::AppError;
/// use slotbook_core::errors::SlotError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(AppError(SlotError::NotFound("slot".to_string())));
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub SlotError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            SlotError::NotFound(_) => StatusCode::NOT_FOUND,
            SlotError::Validation(_) => StatusCode::BAD_REQUEST,
            SlotError::Conflict(_) => StatusCode::CONFLICT,
            SlotError::Authentication(_) => StatusCode::UNAUTHORIZED,
            SlotError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SlotError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server errors keep their details in the log, not in the response
        let message = if self.0.is_server_error() {
            error!(error = ?self.0, "Request failed");
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<SlotError> for AppError {
    fn from(err: SlotError) -> Self {
        AppError(err)
    }
}

/// Wraps the eyre error in a SlotError::Database variant.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(SlotError::Database(err))
    }
}

/// Maps a SlotError to an HTTP response
pub fn map_error(err: SlotError) -> Response {
    AppError(err).into_response()
}
