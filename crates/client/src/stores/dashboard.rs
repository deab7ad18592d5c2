//! Remote-derived dashboard state and its polling task.

use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};
use std::time::Duration;

use chatpilot_shared::{primary_provider, ApiError, BotSettings, ConnectionStatus, Message, ProviderConfig};
use chrono::{DateTime, Utc};
use futures_channel::mpsc::UnboundedReceiver;

use crate::api_client::ApiClient;
use crate::error::{ClientError, Result};
use crate::stores::events::ChangeNotifier;
use crate::task::{self, TaskHandle};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub status: ConnectionStatus,
    /// Newest first, as the server sent them.
    pub messages: Vec<Message>,
    pub providers: Vec<ProviderConfig>,
    pub bot_settings: Option<BotSettings>,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    in_flight: usize,
}

impl DashboardState {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn active_provider(&self) -> Option<&ProviderConfig> {
        primary_provider(&self.providers)
    }
}

struct DashboardInner {
    api: ApiClient,
    interval: Duration,
    state: RwLock<DashboardState>,
    poller: Mutex<Option<TaskHandle>>,
    notifier: ChangeNotifier,
}

/// Cache of connection status, messages and settings.
///
/// Each fetch replaces its slice wholesale. A failed fetch records the
/// error and leaves the previous slice in place.
#[derive(Clone)]
pub struct DashboardStore {
    inner: Arc<DashboardInner>,
}

impl std::fmt::Debug for DashboardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardStore")
            .field("interval", &self.inner.interval)
            .field("polling", &self.is_polling())
            .finish()
    }
}

impl DashboardStore {
    pub fn new(api: ApiClient, interval: Duration) -> Self {
        Self {
            inner: Arc::new(DashboardInner {
                api,
                interval,
                state: RwLock::new(DashboardState::default()),
                poller: Mutex::new(None),
                notifier: ChangeNotifier::new(),
            }),
        }
    }

    pub fn state(&self) -> DashboardState {
        self.read(DashboardState::clone)
    }

    pub fn status(&self) -> ConnectionStatus {
        self.read(|s| s.status.clone())
    }

    pub fn messages(&self) -> Vec<Message> {
        self.read(|s| s.messages.clone())
    }

    pub fn providers(&self) -> Vec<ProviderConfig> {
        self.read(|s| s.providers.clone())
    }

    pub fn active_provider(&self) -> Option<ProviderConfig> {
        self.read(|s| s.active_provider().cloned())
    }

    pub fn bot_settings(&self) -> Option<BotSettings> {
        self.read(|s| s.bot_settings.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.read(DashboardState::is_loading)
    }

    pub fn error(&self) -> Option<String> {
        self.read(|s| s.error.clone())
    }

    pub fn set_error(&self, error: Option<String>) {
        self.update(|s| s.error = error);
    }

    pub fn clear_error(&self) {
        self.set_error(None);
    }

    pub fn subscribe(&self) -> UnboundedReceiver<()> {
        self.inner.notifier.subscribe()
    }

    // --- Fetches ---

    /// Fetch the connection status. When a QR code is needed the image is
    /// fetched too and stored inside the status.
    pub async fn fetch_status(&self) -> Result<ConnectionStatus> {
        self.begin();
        let mut status = match self.inner.api.connection_status().await {
            Ok(status) => status,
            Err(e) => return Err(self.fail("status", e)),
        };

        if let ConnectionStatus::QrNeeded { qr_image: None } = &status {
            match self.inner.api.qr_code().await {
                Ok(qr) => status = ConnectionStatus::QrNeeded { qr_image: Some(qr.qr_image) },
                Err(e) => {
                    crate::log_warn!("Failed to fetch QR code: {}", e);
                    // Keep showing the last code we had.
                    let previous = self.read(|s| s.status.qr_image().map(str::to_string));
                    status = ConnectionStatus::QrNeeded { qr_image: previous };
                    self.update(|s| s.error = Some(format!("Failed to fetch QR code: {e}")));
                }
            }
        }

        let result = status.clone();
        self.finish(|s| s.status = status);
        Ok(result)
    }

    pub async fn fetch_messages(&self) -> Result<Vec<Message>> {
        self.begin();
        match self.inner.api.messages().await {
            Ok(messages) => {
                let result = messages.clone();
                self.finish(|s| s.messages = messages);
                Ok(result)
            }
            Err(e) => Err(self.fail("messages", e)),
        }
    }

    pub async fn fetch_providers(&self) -> Result<Vec<ProviderConfig>> {
        self.begin();
        match self.inner.api.providers().await {
            Ok(providers) => {
                let result = providers.clone();
                self.finish(|s| s.providers = providers);
                Ok(result)
            }
            Err(e) => Err(self.fail("API settings", e)),
        }
    }

    pub async fn fetch_bot_settings(&self) -> Result<BotSettings> {
        self.begin();
        match self.inner.api.bot_settings().await {
            Ok(settings) => {
                let result = settings.clone();
                self.finish(|s| s.bot_settings = Some(settings));
                Ok(result)
            }
            Err(e) => Err(self.fail("bot settings", e)),
        }
    }

    /// Load every slice once. Returns the first failure, if any.
    pub async fn refresh_all(&self) -> Result<()> {
        let (status, messages, providers) = futures_util::join!(
            self.fetch_status(),
            self.fetch_messages(),
            self.fetch_providers()
        );
        status?;
        messages?;
        providers?;
        Ok(())
    }

    // --- Polling ---

    /// Poll messages and status every interval, starting one interval from
    /// now. Any poller already running is cancelled first.
    pub fn start_polling(&self) {
        let mut poller = self.inner.poller.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = poller.take() {
            previous.cancel();
        }

        let weak: Weak<DashboardInner> = Arc::downgrade(&self.inner);
        let handle = task::spawn_interval(self.inner.interval, move || {
            let weak = weak.clone();
            async move {
                let Some(inner) = weak.upgrade() else {
                    return false;
                };
                let store = DashboardStore { inner };
                // Failures are recorded in the store.
                let _ = store.fetch_messages().await;
                let _ = store.fetch_status().await;
                true
            }
        });
        *poller = Some(handle);
        crate::log_debug!("Dashboard polling started ({:?})", self.inner.interval);
    }

    /// Cancel the poller. Requests already in flight still land.
    pub fn stop_polling(&self) {
        let previous = self
            .inner
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = previous {
            handle.cancel();
            crate::log_debug!("Dashboard polling stopped");
        }
    }

    pub fn is_polling(&self) -> bool {
        self.inner
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|h| !h.is_cancelled())
    }

    // --- Internals ---

    fn read<T>(&self, f: impl FnOnce(&DashboardState) -> T) -> T {
        f(&self.inner.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn update(&self, f: impl FnOnce(&mut DashboardState)) {
        {
            let mut state = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut state);
        }
        self.inner.notifier.notify();
    }

    fn begin(&self) {
        self.update(|s| s.in_flight += 1);
    }

    fn finish(&self, f: impl FnOnce(&mut DashboardState)) {
        self.update(|s| {
            f(s);
            s.in_flight = s.in_flight.saturating_sub(1);
            s.last_updated = Some(Utc::now());
        });
    }

    fn fail(&self, what: &str, err: ApiError) -> ClientError {
        let message = format!("Failed to fetch {what}: {err}");
        crate::log_error!("{}", message);
        self.update(|s| {
            s.in_flight = s.in_flight.saturating_sub(1);
            s.error = Some(message.clone());
        });
        ClientError::StaleData(message)
    }
}
