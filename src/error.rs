//! Larder Error Types
//!
//! Centralized error handling for the storage, speech and HTTP layers.

use thiserror::Error;

/// Central error type for Larder
#[derive(Error, Debug)]
pub enum LarderError {
    #[error("Speech transcription error: {0}")]
    Speech(String),

    /// Input rejected before touching storage (missing fields, out of range values)
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Hash(#[from] bcrypt::BcryptError),

    /// Blocking storage task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type alias for Larder operations
pub type LarderResult<T> = Result<T, LarderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_facing_messages_are_bare() {
        let err = LarderError::Validation("Please fill in all fields.".to_string());
        assert_eq!(err.to_string(), "Please fill in all fields.");

        let err = LarderError::Speech("timeout".to_string());
        assert_eq!(err.to_string(), "Speech transcription error: timeout");
    }

    #[tokio::test]
    async fn test_panicked_task_converts() {
        let join = tokio::task::spawn_blocking(|| panic!("storage blew up")).await;
        let err: LarderError = join.unwrap_err().into();
        assert!(matches!(err, LarderError::Task(_)));
    }
}
