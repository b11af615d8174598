// ============================
// crates/secrets-lib/src/error.rs
// ============================
//! Central error type.
//!
//! The HTTP surface deliberately flattens every failure into a redirect to
//! an anonymous-accessible page, so `AppError` never reaches the client.
//! Its job is to carry enough context for structured logging and to let the
//! router pick a log level: expected failures (bad credentials, duplicate
//! username, a failed provider exchange) are normal control flow and are
//! never logged as errors.
use thiserror::Error;
use uuid::Uuid;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("username already taken: {0}")]
    DuplicateUsername(String),

    #[error("provider identity already linked: {0}")]
    DuplicateProviderId(String),

    #[error("user not found: {0}")]
    UserNotFound(Uuid),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("OAuth exchange failed: {0}")]
    OAuth(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this failure is part of normal control flow.
    ///
    /// Expected failures are surfaced only as a redirect and logged below
    /// error level; everything else indicates a store or provider problem.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            AppError::InvalidCredentials
                | AppError::DuplicateUsername(_)
                | AppError::DuplicateProviderId(_)
                | AppError::InvalidInput(_)
                | AppError::OAuth(_)
        )
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}
