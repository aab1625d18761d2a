use thiserror::Error;

use crate::applications::lifecycle::TransitionError;
use crate::session::store::SessionStoreError;

/// Client-level error type.
/// Every controller operation returns `Result<T, ClientError>`; nothing is retried.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected locally, before any request was issued.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid status change: {0}")]
    Transition(#[from] TransitionError),

    /// 401/403 from the API. The session has already been torn down when this is returned.
    #[error("Unauthorized (status {status})")]
    Unauthorized { status: u16, detail: Option<String> },

    #[error("API error (status {status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Service { status: u16, detail: Option<String> },

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Session storage error: {0}")]
    Storage(#[from] SessionStoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Text shown to the user for a failed action.
    ///
    /// Server-provided detail wins; transport and decode failures fall back to
    /// the operation's generic message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Io(e) => format!("Could not read file: {e}"),
            ClientError::Transition(e) => e.to_string(),
            ClientError::Unauthorized { detail, .. } => detail
                .clone()
                .unwrap_or_else(|| "Your session has expired. Please log in again.".to_string()),
            ClientError::Service {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ClientError::Service { detail: None, .. }
            | ClientError::Transport(_)
            | ClientError::Decode(_)
            | ClientError::Storage(_) => fallback.to_string(),
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::Unauthorized { .. })
    }

    /// True for errors raised before any network call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::Validation(_) | ClientError::Transition(_) | ClientError::Io(_)
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized { status, .. } | ClientError::Service { status, .. } => {
                Some(*status)
            }
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
