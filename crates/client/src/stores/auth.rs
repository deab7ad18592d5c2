//! Authentication state with durable persistence.
//!
//! Only `{user, token, isAuthenticated}` (plus the token's `issuedAt`) is
//! written to storage; loading and error flags live in memory. Concurrent `login` calls are not
//! de-duplicated: whichever resolves last decides the state.

use std::sync::{Arc, PoisonError, RwLock};

use chatpilot_shared::{
    ApiError, LoginRequest, RegisterRequest, Role, Session, User,
};
use chrono::{DateTime, Utc};
use futures_channel::mpsc::UnboundedReceiver;
use serde::{Deserialize, Serialize};

use crate::api_client::ApiClient;
use crate::error::{ClientError, Result};
use crate::forms::{self, RegisterForm};
use crate::storage::{self, KeyValueStore};
use crate::stores::events::ChangeNotifier;

pub const STORAGE_KEY: &str = "auth-store";

/// Presentation state of the auth flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPhase {
    Anonymous,
    Authenticating,
    Authenticated(Session),
    /// Shown as anonymous, with the error surfaced until cleared.
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub session: Option<Session>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// A login or registration is in flight.
    authenticating: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(Session::role)
    }

    pub fn phase(&self) -> AuthPhase {
        if let Some(session) = &self.session {
            AuthPhase::Authenticated(session.clone())
        } else if self.authenticating {
            AuthPhase::Authenticating
        } else if let Some(error) = &self.error {
            AuthPhase::Failed(error.clone())
        } else {
            AuthPhase::Anonymous
        }
    }
}

/// The persisted subset of [`AuthState`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAuth {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
}

impl PersistedAuth {
    fn into_session(self) -> Option<Session> {
        match (self.is_authenticated, self.user, self.token) {
            (true, Some(user), Some(token)) if !token.is_empty() => Some(Session {
                user,
                token,
                issued_at: self.issued_at.unwrap_or_else(Utc::now),
            }),
            _ => None,
        }
    }
}

struct AuthInner {
    api: ApiClient,
    storage: Arc<dyn KeyValueStore>,
    state: RwLock<AuthState>,
    notifier: ChangeNotifier,
}

/// Process-wide authentication store. Clones share state.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<AuthInner>,
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("state", &self.state())
            .finish()
    }
}

impl AuthStore {
    /// Create the store and rehydrate any persisted session.
    pub fn new(api: ApiClient, storage: Arc<dyn KeyValueStore>) -> Self {
        let store = Self {
            inner: Arc::new(AuthInner {
                api,
                storage,
                state: RwLock::new(AuthState::default()),
                notifier: ChangeNotifier::new(),
            }),
        };
        store.restore();
        store
    }

    /// Reload the session from storage. Returns whether one was found.
    pub fn restore(&self) -> bool {
        let session = storage::load::<PersistedAuth>(self.inner.storage.as_ref(), STORAGE_KEY)
            .and_then(PersistedAuth::into_session);
        let found = session.is_some();
        if let Some(session) = &session {
            crate::log_debug!("Restored session for {}", session.user.email);
        }
        self.inner.api.set_token(session.as_ref().map(|s| s.token.clone()));
        self.update(|s| s.session = session);
        found
    }

    // --- Getters ---

    pub fn state(&self) -> AuthState {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.read(|s| s.session.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.read(|s| s.user().cloned())
    }

    pub fn token(&self) -> Option<String> {
        self.read(|s| s.token().map(str::to_string))
    }

    pub fn role(&self) -> Option<Role> {
        self.read(AuthState::role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(AuthState::is_authenticated)
    }

    pub fn is_loading(&self) -> bool {
        self.read(|s| s.is_loading)
    }

    pub fn error(&self) -> Option<String> {
        self.read(|s| s.error.clone())
    }

    pub fn phase(&self) -> AuthPhase {
        self.read(AuthState::phase)
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn subscribe(&self) -> UnboundedReceiver<()> {
        self.inner.notifier.subscribe()
    }

    // --- Actions ---

    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        if let Err(e) = forms::validate_login(email, password) {
            return Err(self.reject(e));
        }
        self.begin_authenticating();

        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.inner.api.login(&req).await {
            Ok(resp) => {
                let session = Session::issue(resp.user, resp.token);
                crate::log_info!("Logged in as {} ({})", session.user.email, session.role().as_str());
                self.establish(session.clone());
                Ok(session)
            }
            Err(e) => Err(self.fail_authentication(e, "Login failed")),
        }
    }

    /// Register and sign in as the new account.
    pub async fn register(&self, form: &RegisterForm) -> Result<Session> {
        if let Err(e) = form.validate() {
            return Err(self.reject(e));
        }
        self.begin_authenticating();

        let req = RegisterRequest {
            name: form.name.trim().to_string(),
            email: form.email.clone(),
            password: form.password.clone(),
        };
        match self.inner.api.register(&req).await {
            Ok(resp) => {
                let session = Session::issue(resp.user, resp.token);
                crate::log_info!("Registered {}", session.user.email);
                self.establish(session.clone());
                Ok(session)
            }
            Err(e) => Err(self.fail_authentication(e, "Registration failed")),
        }
    }

    /// Drop the session locally. Never touches the network.
    pub fn logout(&self) {
        self.inner.storage.remove(STORAGE_KEY);
        self.inner.api.set_token(None);
        self.update(|s| {
            s.session = None;
            s.error = None;
            s.is_loading = false;
            s.authenticating = false;
        });
        crate::log_info!("Logged out");
    }

    /// Ask the backend to send a reset link. Only the loading flag changes.
    pub async fn reset_password(&self, email: &str) -> Result<()> {
        if let Err(e) = forms::validate_email(email) {
            self.update(|s| s.error = Some(e.to_string()));
            return Err(e);
        }
        self.update(|s| {
            s.is_loading = true;
            s.error = None;
        });
        let result = self.inner.api.reset_password(email).await;
        match result {
            Ok(ack) => {
                crate::log_debug!("Reset password for {}: {}", email, ack.message);
                self.update(|s| s.is_loading = false);
                Ok(())
            }
            Err(e) => {
                let message = server_message(&e).unwrap_or_else(|| "Reset password failed".to_string());
                crate::log_warn!("Reset password failed: {}", e);
                self.update(|s| {
                    s.is_loading = false;
                    s.error = Some(message.clone());
                });
                Err(ClientError::Auth(message))
            }
        }
    }

    /// Replace the signed-in user's details (e.g. after a profile edit).
    pub fn set_user(&self, user: User) {
        let mut persisted = None;
        self.update(|s| {
            if let Some(session) = s.session.as_mut() {
                session.user = user;
                persisted = Some(session.clone());
            }
        });
        if let Some(session) = persisted {
            self.persist(&session);
        }
    }

    pub fn set_loading(&self, loading: bool) {
        self.update(|s| s.is_loading = loading);
    }

    pub fn set_error(&self, error: Option<String>) {
        self.update(|s| s.error = error);
    }

    pub fn clear_error(&self) {
        self.set_error(None);
    }

    // --- Internals ---

    fn read<T>(&self, f: impl FnOnce(&AuthState) -> T) -> T {
        f(&self.inner.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn update(&self, f: impl FnOnce(&mut AuthState)) {
        {
            let mut state = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut state);
        }
        self.inner.notifier.notify();
    }

    fn begin_authenticating(&self) {
        self.update(|s| {
            s.is_loading = true;
            s.authenticating = true;
            s.error = None;
        });
    }

    fn establish(&self, session: Session) {
        self.inner.api.set_token(Some(session.token.clone()));
        self.persist(&session);
        self.update(|s| {
            s.session = Some(session);
            s.is_loading = false;
            s.authenticating = false;
            s.error = None;
        });
    }

    /// Rejected credentials sign the current user out as well.
    fn reject(&self, err: ClientError) -> ClientError {
        crate::log_debug!("Rejected before sending: {}", err);
        self.clear_session(err.to_string());
        err
    }

    fn fail_authentication(&self, err: ApiError, fallback: &str) -> ClientError {
        crate::log_warn!("{}: {}", fallback, err);
        let message = server_message(&err).unwrap_or_else(|| fallback.to_string());
        self.clear_session(message.clone());
        match err {
            ApiError::Http { .. } => ClientError::Auth(message),
            other => ClientError::Api(other),
        }
    }

    fn clear_session(&self, error: String) {
        self.inner.storage.remove(STORAGE_KEY);
        self.inner.api.set_token(None);
        self.update(|s| {
            s.session = None;
            s.is_loading = false;
            s.authenticating = false;
            s.error = Some(error);
        });
    }

    fn persist(&self, session: &Session) {
        let persisted = PersistedAuth {
            user: Some(session.user.clone()),
            token: Some(session.token.clone()),
            is_authenticated: true,
            issued_at: Some(session.issued_at),
        };
        if !storage::save(self.inner.storage.as_ref(), STORAGE_KEY, &persisted) {
            crate::log_warn!("Could not persist session");
        }
    }
}

/// The message a server sent with a rejection, if any.
fn server_message(err: &ApiError) -> Option<String> {
    match err {
        ApiError::Http { message, .. } if !message.trim().is_empty() => Some(message.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{SEEDED_ADMIN, SEEDED_USER};
    use crate::storage::MemoryStorage;
    use crate::transport::MockTransport;
    use std::time::Duration;

    fn store_with(storage: Arc<MemoryStorage>) -> AuthStore {
        let mock = Arc::new(MockTransport::new().with_delay(Duration::ZERO));
        AuthStore::new(ApiClient::new(mock), storage)
    }

    fn store() -> AuthStore {
        store_with(Arc::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn seeded_user_logs_in_with_user_role() {
        let auth = store();
        let session = auth.login(SEEDED_USER.email, SEEDED_USER.password).await.unwrap();
        assert_eq!(session.role(), Role::User);
        assert!(!auth.is_admin());
        assert_eq!(auth.api().token(), Some(session.token.clone()));
        assert!(matches!(auth.phase(), AuthPhase::Authenticated(_)));
    }

    #[tokio::test]
    async fn wrong_password_fails_with_invalid_credentials() {
        let auth = store();
        let err = auth.login(SEEDED_ADMIN.email, "wrong-password").await.unwrap_err();
        assert_eq!(err, ClientError::Auth("Invalid credentials".into()));
        assert!(!auth.is_authenticated());
        assert!(!auth.is_loading());
        assert_eq!(auth.phase(), AuthPhase::Failed("Invalid credentials".into()));

        auth.clear_error();
        assert_eq!(auth.phase(), AuthPhase::Anonymous);
    }

    #[tokio::test]
    async fn failed_login_clears_previous_session() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = store_with(storage.clone());
        auth.login(SEEDED_ADMIN.email, SEEDED_ADMIN.password).await.unwrap();

        auth.login(SEEDED_ADMIN.email, "nope-nope").await.unwrap_err();
        assert!(!auth.is_authenticated());
        assert!(!storage.exists(STORAGE_KEY));
        assert_eq!(auth.api().token(), None);
    }

    #[tokio::test]
    async fn persisted_shape_excludes_flags() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = store_with(storage.clone());
        auth.login(SEEDED_ADMIN.email, SEEDED_ADMIN.password).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&storage.load_raw(STORAGE_KEY).unwrap()).unwrap();
        let mut keys: Vec<&str> = raw.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["isAuthenticated", "issuedAt", "token", "user"]);
        assert_eq!(raw["token"], "mock-jwt-token-1");
    }

    #[tokio::test]
    async fn malformed_credentials_sign_out_current_user() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = store_with(storage.clone());
        auth.login(SEEDED_ADMIN.email, SEEDED_ADMIN.password).await.unwrap();

        let err = auth.login(SEEDED_ADMIN.email, "abc").await.unwrap_err();
        assert_eq!(err.field(), Some("password"));
        assert!(!auth.is_authenticated());
        assert!(!storage.exists(STORAGE_KEY));
        assert_eq!(auth.api().token(), None);
        assert_eq!(auth.error(), Some(err.to_string()));
    }

    #[test]
    fn plain_string_token_restores_without_issued_at() {
        let storage = Arc::new(MemoryStorage::new());
        storage.save_raw(
            STORAGE_KEY,
            r#"{"user":{"id":"1","name":"Admin User","email":"admin@chatpilot.com","role":"admin"},"token":"mock-jwt-token-1","isAuthenticated":true}"#,
        );
        let auth = store_with(storage);
        assert!(auth.is_admin());
        assert_eq!(auth.token().as_deref(), Some("mock-jwt-token-1"));
    }

    #[tokio::test]
    async fn reset_password_only_toggles_loading() {
        let auth = store();
        auth.reset_password("someone@example.com").await.unwrap();
        assert!(!auth.is_loading());
        assert!(!auth.is_authenticated());
        assert_eq!(auth.error(), None);
    }

    #[tokio::test]
    async fn set_user_updates_persisted_copy() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = store_with(storage.clone());
        let session = auth.login(SEEDED_ADMIN.email, SEEDED_ADMIN.password).await.unwrap();

        auth.set_user(User {
            name: "Renamed".into(),
            ..session.user
        });
        let reloaded = store_with(storage);
        assert_eq!(reloaded.user().unwrap().name, "Renamed");
    }

    #[test]
    fn manual_flags_do_not_touch_session() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = store_with(storage.clone());
        auth.set_loading(true);
        auth.set_error(Some("Upload failed".into()));
        assert!(auth.is_loading());
        assert_eq!(auth.phase(), AuthPhase::Failed("Upload failed".into()));
        assert!(!storage.exists(STORAGE_KEY));

        auth.set_loading(false);
        auth.clear_error();
        assert_eq!(auth.state(), AuthState::default());
    }

    #[tokio::test]
    async fn actions_notify_subscribers() {
        let auth = store();
        let mut changes = auth.subscribe();
        auth.logout();
        assert_eq!(changes.try_next().unwrap(), Some(()));
    }

    #[test]
    fn incomplete_persisted_state_is_ignored() {
        let storage = Arc::new(MemoryStorage::new());
        storage.save_raw(
            STORAGE_KEY,
            r#"{"user":null,"token":null,"isAuthenticated":true}"#,
        );
        let auth = store_with(storage);
        assert!(!auth.is_authenticated());
    }
}
