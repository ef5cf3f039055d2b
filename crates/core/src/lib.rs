//! Domain types shared by the SlotBook crates.
//!
//! Nothing in here touches the network or the database. The `db` crate
//! persists these types and the `api` crate moves them over HTTP.

pub mod errors;
pub mod models;
