use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{SlotError, SlotResult};
use crate::models::time_slot::TimeSlot;

const MAX_NAME_LEN: usize = 200;
const MAX_NOTES_LEN: usize = 1000;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+\-() ]{7,20}$").expect("phone regex is valid"));

/// What a customer submits when booking a slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub slot_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl BookingRequest {
    /// Field checks only. Whether the slot exists or is free is the store's call.
    pub fn validate(&self) -> SlotResult<()> {
        let name = self.customer_name.trim();
        if name.is_empty() {
            return Err(SlotError::Validation("Customer name is required".to_string()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(SlotError::Validation(format!(
                "Customer name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }

        if !EMAIL_RE.is_match(self.customer_email.trim()) {
            return Err(SlotError::Validation(format!(
                "Invalid email address: {}",
                self.customer_email
            )));
        }

        if let Some(phone) = &self.customer_phone {
            if !PHONE_RE.is_match(phone.trim()) {
                return Err(SlotError::Validation(format!("Invalid phone number: {}", phone)));
            }
        }

        if let Some(notes) = &self.notes {
            if notes.chars().count() > MAX_NOTES_LEN {
                return Err(SlotError::Validation(format!(
                    "Notes must be at most {} characters",
                    MAX_NOTES_LEN
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub slot: TimeSlot,
    pub customer_name: String,
    pub confirmed_at: DateTime<Utc>,
}
