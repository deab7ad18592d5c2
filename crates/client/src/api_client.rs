//! Typed API client over a [`Transport`].

use std::sync::{Arc, PoisonError, RwLock};

use base64::Engine;
use chatpilot_shared::{
    endpoints, AccountStatus, AdminUser, ApiError, BotSettings, ChangePasswordRequest,
    ConnectionStatus, KnowledgeDocument, LoginRequest, LoginResponse, Message, MessageResponse,
    Method, ProviderConfig, QrCode, RegisterRequest, RegisterResponse, ResetPasswordRequest,
    UpdateProfileRequest, UpdateUserStatusRequest, UploadDocumentRequest, UploadDocumentResponse,
    UserProfile,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::transport::{Request, Transport};

/// Client for the dashboard API. Cheap to clone; clones share the
/// transport and the session token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Set (or clear) the bearer token sent with every request.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Issue a raw request and return the payload untouched.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let mut request = Request::new(method, path).with_bearer(self.token());
        request.body = body;
        self.transport.request(request).await
    }

    pub async fn get_json<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        let payload = self.request(Method::Get, path, None).await?;
        decode(payload)
    }

    /// POST/PUT with a JSON body.
    pub async fn send_json<TReq: Serialize, TRes: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Deserialize(e.to_string()))?;
        let payload = self.request(method, path, Some(body)).await?;
        decode(payload)
    }

    pub async fn delete_json<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        let payload = self.request(Method::Delete, path, None).await?;
        decode(payload)
    }

    // --- Auth ---

    pub async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.send_json(Method::Post, endpoints::LOGIN, req).await
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.send_json(Method::Post, endpoints::REGISTER, req).await
    }

    pub async fn reset_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let req = ResetPasswordRequest {
            email: email.to_string(),
        };
        self.send_json(Method::Post, endpoints::RESET_PASSWORD, &req)
            .await
    }

    // --- Dashboard ---

    pub async fn connection_status(&self) -> Result<ConnectionStatus, ApiError> {
        self.get_json(endpoints::STATUS).await
    }

    pub async fn qr_code(&self) -> Result<QrCode, ApiError> {
        self.get_json(endpoints::QR).await
    }

    pub async fn messages(&self) -> Result<Vec<Message>, ApiError> {
        self.get_json(endpoints::MESSAGES).await
    }

    // --- Settings ---

    pub async fn providers(&self) -> Result<Vec<ProviderConfig>, ApiError> {
        self.get_json(endpoints::API_SETTINGS).await
    }

    pub async fn save_providers(
        &self,
        providers: &[ProviderConfig],
    ) -> Result<MessageResponse, ApiError> {
        self.send_json(Method::Post, endpoints::API_SETTINGS, &providers)
            .await
    }

    pub async fn bot_settings(&self) -> Result<BotSettings, ApiError> {
        self.get_json(endpoints::BOT_SETTINGS).await
    }

    pub async fn save_bot_settings(
        &self,
        settings: &BotSettings,
    ) -> Result<MessageResponse, ApiError> {
        self.send_json(Method::Post, endpoints::BOT_SETTINGS, settings)
            .await
    }

    // --- Knowledge base ---

    pub async fn knowledge_documents(&self) -> Result<Vec<KnowledgeDocument>, ApiError> {
        self.get_json(endpoints::KNOWLEDGE_LIST).await
    }

    pub async fn upload_document(
        &self,
        file_name: &str,
        contents: &[u8],
    ) -> Result<UploadDocumentResponse, ApiError> {
        let req = UploadDocumentRequest {
            file_name: file_name.to_string(),
            content: base64::engine::general_purpose::STANDARD.encode(contents),
        };
        self.send_json(Method::Post, endpoints::KNOWLEDGE_UPLOAD, &req)
            .await
    }

    pub async fn delete_document(&self, id: &str) -> Result<MessageResponse, ApiError> {
        self.delete_json(&endpoints::knowledge_document(id)).await
    }

    // --- Profile ---

    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.get_json(endpoints::USER_PROFILE).await
    }

    pub async fn update_profile(
        &self,
        update: &UpdateProfileRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.send_json(Method::Put, endpoints::USER_PROFILE, update)
            .await
    }

    pub async fn change_password(
        &self,
        req: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.send_json(Method::Put, endpoints::USER_PASSWORD, req)
            .await
    }

    // --- Admin ---

    pub async fn admin_users(&self) -> Result<Vec<AdminUser>, ApiError> {
        self.get_json(endpoints::ADMIN_USERS).await
    }

    pub async fn set_user_status(
        &self,
        user_id: &str,
        status: AccountStatus,
    ) -> Result<MessageResponse, ApiError> {
        let req = UpdateUserStatusRequest { status };
        self.send_json(Method::Put, &endpoints::admin_user_status(user_id), &req)
            .await
    }
}

fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, ApiError> {
    serde_json::from_value(payload).map_err(|e| ApiError::Deserialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use std::time::Duration;

    fn client() -> (ApiClient, Arc<MockTransport>) {
        let mock = Arc::new(MockTransport::new().with_delay(Duration::ZERO));
        (ApiClient::new(mock.clone()), mock)
    }

    #[tokio::test]
    async fn every_page_call_has_a_fixture() {
        let (api, _) = client();
        assert!(api.connection_status().await.unwrap().needs_qr());
        assert!(!api.qr_code().await.unwrap().qr_image.is_empty());
        assert_eq!(api.messages().await.unwrap().len(), 3);
        assert_eq!(api.providers().await.unwrap().len(), 2);
        assert_eq!(api.bot_settings().await.unwrap().language, chatpilot_shared::Language::Id);
        assert_eq!(api.knowledge_documents().await.unwrap().len(), 3);
        assert_eq!(api.profile().await.unwrap().id, "1");
        assert_eq!(api.admin_users().await.unwrap().len(), 3);

        let ack = api.set_user_status("3", AccountStatus::Active).await.unwrap();
        assert_eq!(ack.message, "status updated");
        let ack = api.delete_document("2").await.unwrap();
        assert_eq!(ack.message, "deleted");
        let uploaded = api.upload_document("notes.txt", b"hello").await.unwrap();
        assert_eq!(uploaded.id, "4");
        let ack = api
            .change_password(&ChangePasswordRequest {
                current_password: "admin123".into(),
                new_password: "admin456".into(),
            })
            .await
            .unwrap();
        assert_eq!(ack.message, "password updated");
    }

    #[tokio::test]
    async fn token_is_shared_between_clones() {
        let (api, _) = client();
        let other = api.clone();
        api.set_token(Some("abc".into()));
        assert_eq!(other.token().as_deref(), Some("abc"));
        other.set_token(None);
        assert_eq!(api.token(), None);
    }

    #[tokio::test]
    async fn shape_mismatch_is_a_deserialize_error() {
        let (api, mock) = client();
        mock.set_response(Method::Get, endpoints::MESSAGES, serde_json::json!({ "oops": 1 }));
        assert!(matches!(api.messages().await, Err(ApiError::Deserialize(_))));
    }
}
