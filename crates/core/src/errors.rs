use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl SlotError {
    /// Errors the caller cannot fix by changing the request.
    pub fn is_server_error(&self) -> bool {
        matches!(self, SlotError::Database(_) | SlotError::Internal(_))
    }
}

pub type SlotResult<T> = Result<T, SlotError>;
