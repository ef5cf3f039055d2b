/// Customer booking handlers
pub mod booking;
/// Slot administration and availability lookups
pub mod slot;
