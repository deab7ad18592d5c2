//! Generic query cells with stale-but-available refetch.
//!
//! A [`Query`] caches one endpoint's decoded payload. Every successful
//! mutation made through [`QueryClient::mutate`] bumps a generation counter
//! and marks all queries stale; a stale query keeps serving its old data
//! until it is fetched again.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chatpilot_shared::{ApiError, MessageResponse};
use futures_channel::mpsc::UnboundedReceiver;
use serde::de::DeserializeOwned;

use crate::api_client::ApiClient;
use crate::error::{ClientError, Result};
use crate::stores::events::ChangeNotifier;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<String>,
    fetched_generation: Option<u64>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
            fetched_generation: None,
        }
    }
}

/// Shared entry point for queries and mutations. Clones share the
/// invalidation generation.
#[derive(Clone)]
pub struct QueryClient {
    api: ApiClient,
    generation: Arc<AtomicU64>,
    notifier: Arc<ChangeNotifier>,
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("generation", &self.generation())
            .finish()
    }
}

impl QueryClient {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            generation: Arc::new(AtomicU64::new(0)),
            notifier: Arc::new(ChangeNotifier::new()),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// A new, empty cell for `GET path`.
    pub fn query<T>(&self, path: impl Into<String>) -> Query<T>
    where
        T: DeserializeOwned + Clone,
    {
        Query {
            client: self.clone(),
            path: path.into(),
            state: Arc::new(RwLock::new(QueryState::default())),
        }
    }

    /// Await a typed [`ApiClient`] mutation. On success every query
    /// becomes stale.
    pub async fn mutate<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, ApiError>>,
    {
        let response = call.await.map_err(|e| {
            crate::log_warn!("Mutation failed: {}", e);
            ClientError::from(e)
        })?;
        self.invalidate_all();
        Ok(response)
    }

    /// A mutation answered with `{ "message": ... }`; returns the message
    /// for a success toast.
    pub async fn mutate_message<F>(&self, call: F) -> Result<String>
    where
        F: Future<Output = std::result::Result<MessageResponse, ApiError>>,
    {
        let ack = self.mutate(call).await?;
        Ok(ack.message)
    }

    pub fn invalidate_all(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        crate::log_debug!("Queries invalidated (generation {})", generation);
        self.notifier.notify();
    }

    /// Fires on invalidation and on any query state change.
    pub fn subscribe(&self) -> UnboundedReceiver<()> {
        self.notifier.subscribe()
    }
}

/// One endpoint's cached payload.
#[derive(Clone)]
pub struct Query<T> {
    client: QueryClient,
    path: String,
    state: Arc<RwLock<QueryState<T>>>,
}

impl<T> std::fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query").field("path", &self.path).finish()
    }
}

impl<T> Query<T>
where
    T: DeserializeOwned + Clone,
{
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> QueryState<T> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state().data
    }

    /// Never fetched, or fetched before the last invalidation.
    pub fn is_stale(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .fetched_generation
            != Some(self.client.generation())
    }

    /// Fetch unconditionally. On failure previous data stays available and
    /// the error is [`ClientError::StaleData`]; with nothing cached the
    /// transport error is returned as is.
    pub async fn fetch(&self) -> Result<T> {
        let generation = self.client.generation();
        self.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        match self.client.api.get_json::<T>(&self.path).await {
            Ok(data) => {
                self.update(|s| {
                    s.data = Some(data.clone());
                    s.is_loading = false;
                    s.fetched_generation = Some(generation);
                });
                Ok(data)
            }
            Err(e) => {
                crate::log_warn!("Query {} failed: {}", self.path, e);
                let message = e.to_string();
                let mut had_data = false;
                self.update(|s| {
                    s.is_loading = false;
                    s.error = Some(message.clone());
                    had_data = s.data.is_some();
                });
                if had_data {
                    Err(ClientError::StaleData(message))
                } else {
                    Err(e.into())
                }
            }
        }
    }

    /// Cached data when fresh, a fetch otherwise.
    pub async fn ensure(&self) -> Result<T> {
        if !self.is_stale() {
            if let Some(data) = self.data() {
                return Ok(data);
            }
        }
        self.fetch().await
    }

    fn update(&self, f: impl FnOnce(&mut QueryState<T>)) {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut state);
        }
        self.client.notifier.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use chatpilot_shared::{
        endpoints, BotSettings, Language, Message, Method, UpdateProfileRequest, UserProfile,
    };
    use std::time::Duration;

    fn client() -> (QueryClient, Arc<MockTransport>) {
        let mock = Arc::new(MockTransport::new().with_delay(Duration::ZERO));
        (QueryClient::new(ApiClient::new(mock.clone())), mock)
    }

    #[tokio::test]
    async fn ensure_uses_cache_until_invalidated() {
        let (queries, mock) = client();
        let messages = queries.query::<Vec<Message>>(endpoints::MESSAGES);
        assert!(messages.is_stale());

        messages.ensure().await.unwrap();
        messages.ensure().await.unwrap();
        assert_eq!(mock.calls(Method::Get, endpoints::MESSAGES), 1);

        queries.invalidate_all();
        assert!(messages.is_stale());
        messages.ensure().await.unwrap();
        assert_eq!(mock.calls(Method::Get, endpoints::MESSAGES), 2);
    }

    #[tokio::test]
    async fn mutation_returns_message_and_invalidates() {
        let (queries, _) = client();
        let settings = queries.query::<BotSettings>(endpoints::BOT_SETTINGS);
        settings.fetch().await.unwrap();
        let before = queries.generation();

        let update = BotSettings {
            language: Language::En,
            ..BotSettings::default()
        };
        let message = queries
            .mutate_message(queries.api().save_bot_settings(&update))
            .await
            .unwrap();
        assert!(!message.is_empty());
        assert_eq!(queries.generation(), before + 1);
        assert!(settings.is_stale());
        assert!(settings.data().is_some());
    }

    #[tokio::test]
    async fn failed_refetch_serves_stale_data() {
        let (queries, mock) = client();
        let messages = queries.query::<Vec<Message>>(endpoints::MESSAGES);
        messages.fetch().await.unwrap();

        mock.remove_response(Method::Get, endpoints::MESSAGES);
        let err = messages.fetch().await.unwrap_err();
        assert!(matches!(err, ClientError::StaleData(_)));
        let state = messages.state();
        assert_eq!(state.data.map(|m| m.len()), Some(3));
        assert!(state.error.is_some());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn failed_first_fetch_is_not_found() {
        let (queries, _) = client();
        let missing = queries.query::<serde_json::Value>("/api/nowhere");
        let err = missing.fetch().await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn profile_update_invalidates_profile_query() {
        let (queries, mock) = client();
        let profile = queries.query::<UserProfile>(endpoints::USER_PROFILE);
        profile.ensure().await.unwrap();

        let update = UpdateProfileRequest {
            name: "Renamed".into(),
            email: "admin@chatpilot.com".into(),
        };
        queries.mutate(queries.api().update_profile(&update)).await.unwrap();
        assert_eq!(mock.calls(Method::Put, endpoints::USER_PROFILE), 1);
        assert!(profile.is_stale());
    }

    #[tokio::test]
    async fn failed_mutation_keeps_generation() {
        let (queries, mock) = client();
        mock.remove_response(Method::Post, endpoints::API_SETTINGS);
        let err = queries
            .mutate_message(queries.api().save_providers(&[]))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(queries.generation(), 0);
    }
}
