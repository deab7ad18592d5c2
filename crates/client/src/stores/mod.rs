//! Application state containers.
//!
//! Each store is an explicit, cheaply cloneable handle created once at the
//! application root and handed to views through the Dioxus context. Views
//! read snapshots through typed getters and call action methods; they
//! learn about changes through [`ChangeNotifier::subscribe`].

use std::sync::Arc;
use std::time::Duration;

use crate::api_client::ApiClient;
use crate::config::AppConfig;
use crate::storage::{self, KeyValueStore};

pub mod auth;
pub mod dashboard;
pub mod events;
pub mod query;

pub use auth::{AuthPhase, AuthState, AuthStore, PersistedAuth, STORAGE_KEY};
pub use dashboard::{DashboardState, DashboardStore};
pub use events::ChangeNotifier;
pub use query::{Query, QueryClient, QueryState};

/// Every store the application root provides. All of them share one
/// [`ApiClient`], so the session token set by the auth store is sent by
/// the dashboard and query requests too.
#[derive(Debug, Clone)]
pub struct AppStores {
    pub auth: AuthStore,
    pub dashboard: DashboardStore,
    pub queries: QueryClient,
}

impl AppStores {
    pub fn new(api: ApiClient, storage: Arc<dyn KeyValueStore>, polling_interval: Duration) -> Self {
        Self {
            auth: AuthStore::new(api.clone(), storage),
            dashboard: DashboardStore::new(api.clone(), polling_interval),
            queries: QueryClient::new(api),
        }
    }

    /// Transport from configuration, platform storage for the session.
    pub fn from_config(config: &AppConfig) -> Self {
        let api = ApiClient::new(config.transport());
        Self::new(api, storage::platform_storage(), config.polling_interval)
    }
}
