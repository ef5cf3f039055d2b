/// Customer booking endpoints
pub mod booking;
/// Liveness and version endpoints
pub mod health;
/// Slot administration and availability endpoints
pub mod slot;
