//! Shared error types and the backend response envelope.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Envelope a backend may wrap its payloads in.
///
/// `{ "success": true, "data": ... }` on success, `{ "success": false,
/// "message": "..." }` (or `error`) on failure. Clients unwrap `data` and
/// surface `message`/`error` as the user-facing failure text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T = serde_json::Value> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Attempt to pull a user-facing message out of an error body.
/// Prefers `message`, falls back to `error`.
pub fn try_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|field| parsed.get(*field).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

/// API error type for client-side use
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The transport could not complete the exchange.
    #[error("Network error: {0}")]
    Network(String),
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String },
    /// No handler exists for the request signature (mock mode).
    #[error("Mock data not found for {0}")]
    NotFound(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

impl ApiError {
    /// Build an HTTP error from a status and raw body, using the
    /// server-supplied message when there is one.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = try_error_message(body)
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        ApiError::Http { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
