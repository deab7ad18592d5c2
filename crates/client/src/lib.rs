//! ChatPilot client
//!
//! Client-side state layer for the ChatPilot admin dashboard: the request
//! client with its mock responder, the auth and dashboard stores, query
//! cells and the polling task. The Dioxus shell (provider, routes, pages)
//! is behind the `ui` feature.

#[macro_use]
pub mod logging;

pub mod api_client;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod forms;
pub mod storage;
pub mod stores;
pub mod task;
pub mod transport;

#[cfg(feature = "ui")]
pub mod app;
#[cfg(feature = "ui")]
pub mod components;
#[cfg(feature = "ui")]
pub mod hooks;
#[cfg(feature = "ui")]
pub mod routes;
#[cfg(feature = "ui")]
pub mod views;

pub use api_client::ApiClient;
pub use config::AppConfig;
pub use error::{ClientError, Result};
pub use stores::{AppStores, AuthStore, DashboardStore, QueryClient};
pub use task::TaskHandle;
pub use transport::{HttpTransport, MockTransport, Transport};

#[cfg(feature = "ui")]
pub use routes::Route;
