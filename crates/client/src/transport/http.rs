//! Real HTTP transport.

use std::time::Duration;

use chatpilot_shared::{ApiError, ApiResponse, Method};
use reqwest::Client;
use serde_json::Value;

use super::{Request, Transport};

/// Sends requests to the backend at `base_url`. No retries.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if self.base_url.is_empty() {
            if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            }
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client(timeout: Duration) -> Client {
    Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        crate::log_warn!("Falling back to default HTTP client: {}", e);
        Client::new()
    })
}

// The browser's fetch decides timeouts.
#[cfg(target_arch = "wasm32")]
fn build_client(_timeout: Duration) -> Client {
    Client::new()
}

/// Strip the `{ success, data, message }` envelope if the backend used one.
pub(crate) fn unwrap_envelope(status: u16, payload: Value) -> Result<Value, ApiError> {
    let is_envelope = payload.get("success").is_some_and(Value::is_boolean)
        && payload.get("data").is_some();
    if !is_envelope {
        return Ok(payload);
    }
    let envelope: ApiResponse =
        serde_json::from_value(payload).map_err(|e| ApiError::Deserialize(e.to_string()))?;
    if envelope.success {
        return Ok(envelope.data);
    }
    let message = [envelope.message, envelope.error]
        .into_iter()
        .flatten()
        .find(|m| !m.trim().is_empty())
        .unwrap_or_else(|| "Request failed".to_string());
    Err(ApiError::Http { status, message })
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
impl Transport for HttpTransport {
    async fn request(&self, request: Request) -> Result<Value, ApiError> {
        let url = self.url(&request.path);
        let mut rb = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        if let Some(token) = &request.bearer {
            rb = rb.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            rb = rb.json(body);
        }

        let resp = rb.send().await.map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let is_success = resp.status().is_success();
        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;

        if !is_success {
            crate::log_warn!("{} {} -> HTTP {}", request.method, request.path, status);
            return Err(ApiError::from_response(status, &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        let payload: Value =
            serde_json::from_str(&text).map_err(|e| ApiError::Deserialize(e.to_string()))?;
        unwrap_envelope(status, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn url_joins_base_and_path() {
        let t = HttpTransport::new("http://localhost:3001/", Duration::from_secs(1));
        assert_eq!(t.url("/api/status"), "http://localhost:3001/api/status");
        assert_eq!(t.url("api/qr"), "http://localhost:3001/api/qr");
        assert_eq!(t.url("https://other/x"), "https://other/x");

        let relative = HttpTransport::new("", Duration::from_secs(1));
        assert_eq!(relative.url("api/qr"), "/api/qr");
    }

    #[test]
    fn envelope_is_unwrapped_only_when_present() {
        let raw = json!([{ "id": "1" }]);
        assert_eq!(unwrap_envelope(200, raw.clone()).unwrap(), raw);

        let wrapped = json!({ "success": true, "data": { "qrImage": "x" } });
        assert_eq!(unwrap_envelope(200, wrapped).unwrap(), json!({ "qrImage": "x" }));

        let failed = json!({ "success": false, "data": null, "error": "Session expired" });
        assert_eq!(
            unwrap_envelope(200, failed).unwrap_err(),
            ApiError::Http { status: 200, message: "Session expired".into() }
        );

        let blank = json!({ "success": false, "data": null, "message": " " });
        assert_eq!(unwrap_envelope(200, blank).unwrap_err().to_string(), "Request failed");
    }

    #[tokio::test]
    async fn sends_bearer_and_unwraps_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/status"))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "status": "disconnected" }
            })))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&server.uri(), Duration::from_secs(5));
        let payload = transport
            .request(Request::new(Method::Get, "/api/status").with_bearer(Some("tok-1".into())))
            .await
            .unwrap();
        assert_eq!(payload, json!({ "status": "disconnected" }));
    }

    #[tokio::test]
    async fn non_success_uses_server_message_or_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/messages"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&server.uri(), Duration::from_secs(5));
        let err = transport
            .request(Request::new(Method::Post, "/api/auth/login").with_body(json!({})))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Http { status: 401, message: "Invalid credentials".into() });

        let err = transport
            .request(Request::new(Method::Get, "/api/messages"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status 500");
    }
}
