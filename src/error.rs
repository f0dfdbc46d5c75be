//! Unified error types.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum DeskError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl DeskError {
    /// Whether this failure means the session is no longer accepted by the server.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            DeskError::Http(HttpError::Unauthorized) | DeskError::Auth(AuthError::NotAuthenticated)
        )
    }
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout")]
    Timeout,
}

/// Why a session may not be used.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Token expired")]
    TokenExpired,
}

/// A failed user-triggered action, as shown to the user.
///
/// None of these are retried. `Fetch` is only logged; `Submit` and `Cancel`
/// are routed to the foreground error channel using their `Display` text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionFailure {
    #[error("Could not fetch ticker: {0}")]
    Fetch(String),

    #[error("Could not submit order: {0}")]
    Submit(String),

    #[error("Could not cancel order: {0}")]
    Cancel(String),
}

impl ActionFailure {
    pub fn fetch(err: &DeskError) -> Self {
        ActionFailure::Fetch(err.to_string())
    }

    pub fn submit(err: &DeskError) -> Self {
        ActionFailure::Submit(err.to_string())
    }

    pub fn cancel(err: &DeskError) -> Self {
        ActionFailure::Cancel(err.to_string())
    }
}
