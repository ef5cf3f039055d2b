mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;
use slotbook_api::{
    ApiState,
    middleware::{
        auth::{check_admin_password_hash, hash_password, verify_admin_password},
        error_handling::{AppError, map_error},
    },
};
use slotbook_core::errors::SlotError;
use slotbook_db::store::MemorySlotStore;

use common::{ADMIN_PASSWORD, memory_server};

#[rstest]
#[case(SlotError::NotFound("slot".to_string()), StatusCode::NOT_FOUND)]
#[case(SlotError::Validation("end before start".to_string()), StatusCode::BAD_REQUEST)]
#[case(SlotError::Conflict("already reserved".to_string()), StatusCode::CONFLICT)]
#[case(SlotError::Authentication("no password".to_string()), StatusCode::UNAUTHORIZED)]
#[case(SlotError::Database(eyre::eyre!("connection refused")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(SlotError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] err: SlotError, #[case] expected: StatusCode) {
    assert_eq!(map_error(err).status(), expected);
}

#[test]
fn test_eyre_report_maps_to_database_error() {
    let err: AppError = eyre::eyre!("pool closed").into();
    assert!(matches!(err.0, SlotError::Database(_)));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_password_hash_round_trip() {
    let hash = hash_password(ADMIN_PASSWORD).unwrap();

    assert!(hash.starts_with("$argon2"));
    assert!(verify_admin_password(&hash, ADMIN_PASSWORD).unwrap());
    assert!(!verify_admin_password(&hash, "not the password").unwrap());
}

#[test]
fn test_hashes_are_salted() {
    let first = hash_password(ADMIN_PASSWORD).unwrap();
    let second = hash_password(ADMIN_PASSWORD).unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_malformed_hash_is_an_error() {
    assert!(verify_admin_password("plain-text", ADMIN_PASSWORD).is_err());
}

#[test]
fn test_state_rejects_malformed_admin_hash() {
    let state = ApiState::new(Arc::new(MemorySlotStore::new()), "memory")
        .with_admin_password_hash(Some("not-a-phc-string".to_string()));

    let err = state.err().expect("malformed hash is rejected");
    assert!(err.to_string().contains("Invalid admin password hash"));
}

#[test]
fn test_state_accepts_valid_or_missing_admin_hash() {
    let hash = hash_password(ADMIN_PASSWORD).unwrap();
    assert!(check_admin_password_hash(&hash).is_ok());

    let protected = ApiState::new(Arc::new(MemorySlotStore::new()), "memory")
        .with_admin_password_hash(Some(hash))
        .unwrap();
    assert!(protected.is_admin_protected());

    let open = ApiState::new(Arc::new(MemorySlotStore::new()), "memory")
        .with_admin_password_hash(None)
        .unwrap();
    assert!(!open.is_admin_protected());
}

#[tokio::test]
async fn test_health_reports_storage_backend() {
    let (server, _store) = memory_server(true);

    // Health stays public even when admin auth is on
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");

    let response = server.get("/version").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["name"], "slotbook-api");
    assert!(body["version"].as_str().is_some());
}
