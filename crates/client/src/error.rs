//! Client-side error taxonomy.
//!
//! Store actions never panic on a failed call: they record the message in
//! their `error` field and hand the [`ClientError`] back so the view can
//! show a toast.

use chatpilot_shared::ApiError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// A form field failed validation; nothing was sent.
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    /// Credentials were rejected or an auth flow failed.
    #[error("{0}")]
    Auth(String),

    /// A refresh failed; the previously loaded data is still shown.
    #[error("{0}")]
    StaleData(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ClientError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ClientError::Validation {
            field,
            message: message.into(),
        }
    }

    /// The offending form field, for inline display.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ClientError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api(ApiError::NotFound(_)))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
