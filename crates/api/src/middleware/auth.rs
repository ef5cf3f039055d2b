//! # Authentication Module
//!
//! Guards the administrative endpoints (slot creation, manual reserve and
//! release, booking cancellation) behind a single shared password.
//!
//! The password is never stored in clear text. Operators generate an Argon2
//! hash with the `hash-password` binary and set it as `ADMIN_PASSWORD_HASH`.
//! Requests present the clear password in the `x-admin-password` header.

use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use eyre::Result;
use slotbook_core::errors::SlotError;
use tracing::warn;

use crate::{ApiState, middleware::error_handling::AppError};

/// Header carrying the admin password.
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Hashes a password using the Argon2 algorithm
///
/// A fresh random salt is generated for every call and the result is a PHC
/// string (algorithm, version, parameters, salt and hash).
///
/// # Example
///
/// ```rust
/// let hashed = slotbook_api::middleware::auth::hash_password("hunter2").unwrap();
/// assert!(hashed.starts_with("$argon2"));
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

fn parse_hash(password_hash: &str) -> Result<PasswordHash<'_>> {
    PasswordHash::new(password_hash).map_err(|e| eyre::eyre!("Invalid admin password hash: {}", e))
}

/// Fails unless `password_hash` is a PHC string argon2 can verify against.
pub fn check_admin_password_hash(password_hash: &str) -> Result<()> {
    parse_hash(password_hash).map(|_| ())
}

/// Checks `password` against a stored PHC hash.
///
/// Returns an error only when the stored hash itself is malformed.
pub fn verify_admin_password(password_hash: &str, password: &str) -> Result<bool> {
    let parsed_hash = parse_hash(password_hash)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Middleware rejecting admin requests without a valid password.
///
/// When no hash is configured the guard lets everything through.
pub async fn require_admin(
    State(state): State<Arc<ApiState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(password_hash) = state.admin_password_hash.clone() else {
        return Ok(next.run(request).await);
    };

    let password = request
        .headers()
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| SlotError::Authentication("Missing admin credentials".to_string()))?;

    // Argon2 is CPU bound
    let verified =
        tokio::task::spawn_blocking(move || verify_admin_password(&password_hash, &password))
            .await
            .map_err(|e| SlotError::Internal(Box::new(e)))?
            .map_err(|e| SlotError::Internal(e.into()))?;

    if !verified {
        warn!(path = %request.uri().path(), "Rejected admin request with wrong password");
        return Err(AppError(SlotError::Authentication(
            "Invalid admin password".to_string(),
        )));
    }

    Ok(next.run(request).await)
}
