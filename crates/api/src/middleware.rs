/// Admin password hashing and the admin guard
pub mod auth;
/// Error to HTTP response mapping
pub mod error_handling;
