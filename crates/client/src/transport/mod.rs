//! Request dispatch.
//!
//! Every call the stores make goes through a [`Transport`]. Two exist:
//!
//! - [`MockTransport`]: answers from the in-memory fixture table after an
//!   artificial delay. Used during development and in tests.
//! - [`HttpTransport`]: talks to the real backend with `reqwest`.
//!
//! The variant is chosen once at startup by
//! [`AppConfig::transport`](crate::config::AppConfig::transport); call sites
//! never branch on it.

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::MockTransport;

use chatpilot_shared::{request_key, ApiError, Method};
use serde_json::Value;

/// One outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    /// Session token attached as `Authorization: Bearer ...`.
    pub bearer: Option<String>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            bearer: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }

    /// `"{METHOD} {path}"`
    pub fn key(&self) -> String {
        request_key(self.method, &self.path)
    }
}

/// Strategy for turning a [`Request`] into a JSON payload.
///
/// Implementations return the unwrapped payload on success. Failures are
/// already normalized to an [`ApiError`] carrying a user-facing message.
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn request(&self, request: Request) -> Result<Value, ApiError>;
}
