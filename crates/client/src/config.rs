//! Client configuration from environment variables.

use std::sync::Arc;
use std::time::Duration;

use crate::transport::{HttpTransport, MockTransport, Transport};

/// How often the dashboard re-fetches status and messages.
pub const POLLING_INTERVAL: Duration = Duration::from_millis(3000);

/// Upper bound on a single HTTP exchange (native targets).
pub const API_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Deployment environment; picks the default service URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Environment::Development => "http://localhost:3001",
            Environment::Production => "https://api.yourdomain.com",
        }
    }

    pub fn default_ws_url(&self) -> &'static str {
        match self {
            Environment::Development => "ws://localhost:3001",
            Environment::Production => "wss://ws.yourdomain.com",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub environment: Environment,
    pub base_url: String,
    /// Socket endpoint for a future realtime channel. Not dialed yet.
    pub ws_url: String,
    pub use_mock: bool,
    pub polling_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            base_url: environment.default_base_url().to_string(),
            ws_url: environment.default_ws_url().to_string(),
            use_mock: true,
            polling_interval: POLLING_INTERVAL,
            request_timeout: API_TIMEOUT,
        }
    }

    /// Build configuration from the environment.
    ///
    /// Environment variables:
    /// - `CHATPILOT_ENV`: "development" | "production" (default: "development")
    /// - `CHATPILOT_API_URL`: overrides the environment's API base URL
    /// - `CHATPILOT_WS_URL`: overrides the environment's socket URL
    /// - `CHATPILOT_USE_MOCK`: "true" | "false" (default: "true")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = lookup("CHATPILOT_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();
        let mut config = Self::for_environment(environment);

        if let Some(url) = lookup("CHATPILOT_API_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(url) = lookup("CHATPILOT_WS_URL").filter(|v| !v.trim().is_empty()) {
            config.ws_url = url.trim().to_string();
        }
        if let Some(flag) = lookup("CHATPILOT_USE_MOCK") {
            config.use_mock = !matches!(
                flag.trim().to_lowercase().as_str(),
                "false" | "0" | "no" | "off"
            );
        }
        config
    }

    /// The request transport this configuration selects. Called once at startup.
    pub fn transport(&self) -> Arc<dyn Transport> {
        if self.use_mock {
            crate::log_info!("Using mock transport");
            Arc::new(MockTransport::new())
        } else {
            crate::log_info!("Using HTTP transport against {}", self.base_url);
            Arc::new(HttpTransport::new(&self.base_url, self.request_timeout))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_development_with_mock() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.base_url, "http://localhost:3001");
        assert_eq!(config.ws_url, "ws://localhost:3001");
        assert!(config.use_mock);
        assert_eq!(config.polling_interval, Duration::from_secs(3));
    }

    #[test]
    fn production_switches_both_urls() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CHATPILOT_ENV", "Production"),
            ("CHATPILOT_USE_MOCK", "false"),
        ]));
        assert_eq!(config.base_url, "https://api.yourdomain.com");
        assert_eq!(config.ws_url, "wss://ws.yourdomain.com");
        assert!(!config.use_mock);
    }

    #[test]
    fn explicit_urls_override_environment() {
        let config = AppConfig::from_lookup(lookup(&[
            ("CHATPILOT_API_URL", "http://10.0.0.5:8080/"),
            ("CHATPILOT_WS_URL", " "),
        ]));
        assert_eq!(config.base_url, "http://10.0.0.5:8080");
        assert_eq!(config.ws_url, "ws://localhost:3001");
    }
}
