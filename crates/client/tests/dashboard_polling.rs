//! Dashboard store polling and refresh behaviour on the mock responder.

use std::sync::Arc;
use std::time::Duration;

use chatpilot_client::config::POLLING_INTERVAL;
use chatpilot_client::fixtures::{MOCK_QR_IMAGE, SEEDED_ADMIN};
use chatpilot_client::storage::MemoryStorage;
use chatpilot_client::{ApiClient, AppStores, ClientError, MockTransport};
use chatpilot_shared::{endpoints, ConnectionStatus, Method, Role};

fn stores() -> (AppStores, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new().with_delay(Duration::ZERO));
    let stores = AppStores::new(
        ApiClient::new(transport.clone()),
        Arc::new(MemoryStorage::new()),
        POLLING_INTERVAL,
    );
    (stores, transport)
}

#[tokio::test]
async fn admin_sees_qr_code_in_status() {
    let (stores, transport) = stores();
    let session = stores
        .auth
        .login(SEEDED_ADMIN.email, SEEDED_ADMIN.password)
        .await
        .unwrap();
    assert_eq!(session.role(), Role::Admin);

    let status = stores.dashboard.fetch_status().await.unwrap();
    assert_eq!(
        status,
        ConnectionStatus::QrNeeded {
            qr_image: Some(MOCK_QR_IMAGE.to_string())
        }
    );
    assert_eq!(transport.calls(Method::Get, endpoints::QR), 1);
}

#[tokio::test(start_paused = true)]
async fn double_start_polls_once_per_interval() {
    let (stores, transport) = stores();
    stores.dashboard.start_polling();
    stores.dashboard.start_polling();

    tokio::time::sleep(POLLING_INTERVAL + Duration::from_millis(100)).await;
    assert_eq!(transport.calls(Method::Get, endpoints::MESSAGES), 1);
    for n in 2..=4 {
        tokio::time::sleep(POLLING_INTERVAL).await;
        assert_eq!(transport.calls(Method::Get, endpoints::MESSAGES), n);
        assert_eq!(transport.calls(Method::Get, endpoints::STATUS), n);
    }
}

#[tokio::test(start_paused = true)]
async fn stop_polling_means_no_more_requests() {
    let (stores, transport) = stores();
    stores.dashboard.start_polling();
    tokio::time::sleep(POLLING_INTERVAL + Duration::from_millis(100)).await;
    assert_eq!(transport.calls(Method::Get, endpoints::MESSAGES), 1);

    stores.dashboard.stop_polling();
    tokio::time::sleep(POLLING_INTERVAL * 10).await;
    assert_eq!(transport.calls(Method::Get, endpoints::MESSAGES), 1);
    assert!(!stores.dashboard.is_polling());
}

#[tokio::test(start_paused = true)]
async fn polling_failure_keeps_previous_messages() {
    let (stores, transport) = stores();
    stores.dashboard.fetch_messages().await.unwrap();
    let before = stores.dashboard.messages();

    transport.remove_response(Method::Get, endpoints::MESSAGES);
    stores.dashboard.start_polling();
    tokio::time::sleep(POLLING_INTERVAL + Duration::from_millis(100)).await;

    assert_eq!(stores.dashboard.messages(), before);
    assert!(stores
        .dashboard
        .error()
        .is_some_and(|e| e.contains("GET /api/messages")));
    // Status still refreshed on the same tick.
    assert!(stores.dashboard.status().needs_qr());
}

#[tokio::test]
async fn direct_fetch_failure_is_stale_data() {
    let (stores, transport) = stores();
    stores.dashboard.fetch_providers().await.unwrap();
    transport.set_response(Method::Get, endpoints::API_SETTINGS, serde_json::json!("nope"));

    let err = stores.dashboard.fetch_providers().await.unwrap_err();
    assert!(matches!(err, ClientError::StaleData(_)));
    assert_eq!(stores.dashboard.providers().len(), 2);
}

#[tokio::test]
async fn login_token_reaches_dashboard_requests() {
    let (stores, _) = stores();
    stores
        .auth
        .login(SEEDED_ADMIN.email, SEEDED_ADMIN.password)
        .await
        .unwrap();
    assert_eq!(
        stores.queries.api().token().as_deref(),
        Some("mock-jwt-token-1")
    );
}
