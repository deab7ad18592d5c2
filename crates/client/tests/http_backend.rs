//! Stores running over the real HTTP transport against a wiremock server.

use std::sync::Arc;
use std::time::Duration;

use chatpilot_client::config::API_TIMEOUT;
use chatpilot_client::storage::MemoryStorage;
use chatpilot_client::{ApiClient, AppStores, ClientError, HttpTransport};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn stores(server: &MockServer) -> AppStores {
    let transport = Arc::new(HttpTransport::new(&server.uri(), API_TIMEOUT));
    AppStores::new(
        ApiClient::new(transport),
        Arc::new(MemoryStorage::new()),
        Duration::from_secs(3),
    )
}

#[tokio::test]
async fn rejected_login_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Account locked" })))
        .mount(&server)
        .await;

    let stores = stores(&server);
    let err = stores
        .auth
        .login("admin@chatpilot.com", "admin123")
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::Auth("Account locked".into()));
    assert_eq!(stores.auth.error().as_deref(), Some("Account locked"));
}

#[tokio::test]
async fn session_token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ops@example.com", "password": "hunter22" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "token": "real-token",
                "user": { "id": "9", "name": "Ops", "email": "ops@example.com", "role": "admin" }
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/messages"))
        .and(header("authorization", "Bearer real-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let stores = stores(&server);
    stores
        .auth
        .login("ops@example.com", "hunter22")
        .await
        .unwrap();
    assert!(stores.auth.is_admin());

    let messages = stores.dashboard.fetch_messages().await.unwrap();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn server_error_without_body_names_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let stores = stores(&server);
    let err = stores.dashboard.fetch_status().await.unwrap_err();
    assert_eq!(
        err,
        ClientError::StaleData("Failed to fetch status: Request failed with status 503".into())
    );
}
