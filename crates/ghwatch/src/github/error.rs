//! GitHub API error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur when interacting with the GitHub API.
///
/// A 404 from a state lookup is not an error: the oracle maps it to an
/// absent state before it ever becomes a `GitHubError`.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Transport-level failure (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body did not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded. Resets at {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    /// Token missing, invalid, or lacking the required scope.
    #[error("Authentication required")]
    AuthRequired,

    /// A command operand could not be parsed into a target.
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// A user-level operation was requested while the users capability is off.
    #[error("User operations are disabled: {0}")]
    UsersDisabled(String),
}

impl GitHubError {
    /// Build an API error from a status code and response body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::AuthRequired => Some(401),
            _ => None,
        }
    }
}

/// Check if an error indicates a rate limit (retryable).
pub fn is_rate_limit_error(err: &GitHubError) -> bool {
    match err {
        GitHubError::RateLimited { .. } => true,
        GitHubError::Api { status: 429, .. } => true,
        _ => false,
    }
}

/// Get a short error message suitable for display.
pub fn short_error_message(err: &GitHubError) -> String {
    match err {
        GitHubError::Http(msg) => {
            let first = msg.lines().next().unwrap_or(msg);
            format!("Network error: {}", first)
        }
        GitHubError::Json(_) => "JSON parse error".to_string(),
        GitHubError::Api { status, message } => {
            if message.chars().count() > 50 {
                let truncated: String = message.chars().take(47).collect();
                format!("HTTP {}: {}...", status, truncated)
            } else {
                format!("HTTP {}: {}", status, message)
            }
        }
        GitHubError::RateLimited { .. } => "Rate limited".to_string(),
        GitHubError::AuthRequired => "Authentication required".to_string(),
        GitHubError::InvalidTarget(target) => format!("Invalid target: {}", target),
        GitHubError::UsersDisabled(what) => format!("User operations disabled: {}", what),
    }
}

/// Result type for GitHub operations.
pub type Result<T> = std::result::Result<T, GitHubError>;
