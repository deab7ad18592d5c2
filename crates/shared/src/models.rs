//! Shared data models for the ChatPilot dashboard and its backend API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Identity ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// The authenticated identity held by the client for the current login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: User,
    /// Bearer token handed out by the auth endpoints.
    pub token: String,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    pub fn issue(user: User, token: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
            issued_at: Utc::now(),
        }
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }
}

// --- Auth requests/responses ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResetPasswordRequest {
    pub email: String,
}

/// Generic `{ "message": "..." }` acknowledgement returned by mutations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

// --- Messaging bot connection ---

/// Link state of the messaging account the bot drives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    /// The account must be paired by scanning a QR code.
    /// `qr_image` is filled in from `GET /api/qr`.
    QrNeeded {
        #[serde(rename = "qrImage", default, skip_serializing_if = "Option::is_none")]
        qr_image: Option<String>,
    },
    Connected {
        #[serde(rename = "lastConnected")]
        last_connected_at: DateTime<Utc>,
    },
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected { .. })
    }

    pub fn needs_qr(&self) -> bool {
        matches!(self, ConnectionStatus::QrNeeded { .. })
    }

    pub fn qr_image(&self) -> Option<&str> {
        match self {
            ConnectionStatus::QrNeeded { qr_image } => qr_image.as_deref(),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "Disconnected",
            ConnectionStatus::QrNeeded { .. } => "Scan QR Code",
            ConnectionStatus::Connected { .. } => "Connected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QrCode {
    pub qr_image: String,
}

// --- Messages ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryState {
    Sent,
    Delivered,
    Read,
    Failed,
}

/// A conversation message as delivered by the backend. Never mutated
/// client-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(rename = "message")]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "status")]
    pub delivery_state: DeliveryState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_model: Option<String>,
}

impl Message {
    /// Case-insensitive match on the body, plain match on the sender number.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim();
        term.is_empty()
            || self.body.to_lowercase().contains(&term.to_lowercase())
            || self.from.contains(term)
    }

    /// Short relative age such as "5m ago", measured against `now`.
    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        let mins = (now - self.timestamp).num_minutes();
        if mins < 1 {
            "Just now".to_string()
        } else if mins < 60 {
            format!("{mins}m ago")
        } else if mins < 60 * 24 {
            format!("{}h ago", mins / 60)
        } else {
            format!("{}d ago", mins / (60 * 24))
        }
    }
}

// --- AI providers ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Gemini,
    Openai,
    Qrog,
}

impl ProviderId {
    pub const ALL: [ProviderId; 3] = [ProviderId::Gemini, ProviderId::Openai, ProviderId::Qrog];

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "Google Gemini",
            ProviderId::Openai => "OpenAI",
            ProviderId::Qrog => "Qrog AI",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub provider: ProviderId,
    pub api_key: String,
    /// 1 is the highest priority. Collisions are not rejected.
    pub priority: u32,
}

impl ProviderConfig {
    /// The key with everything after the first eight characters hidden.
    pub fn redacted_key(&self) -> String {
        let visible: String = self.api_key.chars().take(8).collect();
        format!("{visible}...")
    }
}

/// Append a provider at the lowest priority (`len + 1`).
pub fn add_provider(
    providers: &[ProviderConfig],
    provider: ProviderId,
    api_key: impl Into<String>,
) -> Vec<ProviderConfig> {
    let mut updated = providers.to_vec();
    updated.push(ProviderConfig {
        provider,
        api_key: api_key.into(),
        priority: providers.len() as u32 + 1,
    });
    updated
}

/// Drop the provider at `index`; other priorities are left as they are.
pub fn remove_provider(providers: &[ProviderConfig], index: usize) -> Vec<ProviderConfig> {
    providers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, p)| p.clone())
        .collect()
}

/// Change one provider's priority. Another provider may end up sharing it.
pub fn set_provider_priority(
    providers: &[ProviderConfig],
    index: usize,
    priority: u32,
) -> Vec<ProviderConfig> {
    let mut updated = providers.to_vec();
    if let Some(p) = updated.get_mut(index) {
        p.priority = priority.max(1);
    }
    updated
}

/// The provider tried first: the first one listed with priority 1.
pub fn primary_provider(providers: &[ProviderConfig]) -> Option<&ProviderConfig> {
    providers.iter().find(|p| p.priority == 1)
}

// --- Bot settings ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Id,
    En,
    Ms,
    Zh,
    Ar,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Id,
        Language::En,
        Language::Ms,
        Language::Zh,
        Language::Ar,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Language::Id => "Bahasa Indonesia",
            Language::En => "English",
            Language::Ms => "Bahasa Malaysia",
            Language::Zh => "中文",
            Language::Ar => "العربية",
        }
    }
}

pub const DEFAULT_PROMPT: &str = "You are a helpful customer service assistant. Please respond politely and professionally to customer inquiries.

Guidelines:
- Always greet customers warmly
- Listen to their concerns carefully
- Provide clear and helpful information
- If you cannot help, offer to connect them with a human agent
- Keep responses concise but complete
- Maintain a friendly and professional tone

Remember to personalize your responses based on the customer's needs and context.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BotSettings {
    pub prompt_template: String,
    pub language: Language,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            prompt_template: DEFAULT_PROMPT.to_string(),
            language: Language::default(),
        }
    }
}

// --- Profile ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// --- Admin ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Suspended,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
}

impl AdminUser {
    /// Case-insensitive search over name and email, optionally narrowed to one status.
    pub fn matches(&self, term: &str, status: Option<AccountStatus>) -> bool {
        let term = term.trim().to_lowercase();
        let matches_term = term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self.email.to_lowercase().contains(&term);
        matches_term && status.map_or(true, |s| s == self.status)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateUserStatusRequest {
    pub status: AccountStatus,
}

// --- Knowledge base ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Txt,
    Csv,
    Other,
}

impl DocumentKind {
    pub fn from_file_name(file_name: &str) -> Self {
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => DocumentKind::Pdf,
            "txt" => DocumentKind::Txt,
            "csv" => DocumentKind::Csv,
            _ => DocumentKind::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Txt => "TXT",
            DocumentKind::Csv => "CSV",
            DocumentKind::Other => "DOC",
        }
    }
}

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeDocument {
    pub id: String,
    pub file_name: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

impl KnowledgeDocument {
    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_file_name(&self.file_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadDocumentRequest {
    pub file_name: String,
    /// Base64 encoded file contents.
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadDocumentResponse {
    pub id: String,
    pub file_name: String,
}

/// Human readable size, e.g. `2 MB` or `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_status_wire_format() {
        let status: ConnectionStatus = serde_json::from_str(r#"{"status":"qr_needed"}"#).unwrap();
        assert_eq!(status, ConnectionStatus::QrNeeded { qr_image: None });

        let status: ConnectionStatus = serde_json::from_str(
            r#"{"status":"connected","lastConnected":"2024-01-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert!(status.is_connected());
        assert_eq!(status.qr_image(), None);
    }

    #[test]
    fn message_reads_original_field_names() {
        let json = r#"{
            "id": "1",
            "from": "+6281234567890",
            "to": "+6281234567891",
            "message": "Hello, I need help",
            "timestamp": "2024-01-01T10:00:00Z",
            "status": "read",
            "aiProvider": "gemini"
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.body, "Hello, I need help");
        assert_eq!(msg.delivery_state, DeliveryState::Read);
        assert_eq!(msg.ai_provider.as_deref(), Some("gemini"));
        assert!(msg.response.is_none());
        assert!(msg.matches("NEED help"));
        assert!(msg.matches("62812345"));
        assert!(!msg.matches("pricing"));
    }

    #[test]
    fn redacted_key_keeps_prefix_only() {
        let p = ProviderConfig {
            provider: ProviderId::Openai,
            api_key: "sk-1234567890abcdef".to_string(),
            priority: 1,
        };
        assert_eq!(p.redacted_key(), "sk-12345...");
    }

    #[test]
    fn provider_edits_follow_list_order() {
        let list = add_provider(&[], ProviderId::Gemini, "g-key");
        let list = add_provider(&list, ProviderId::Openai, "o-key");
        assert_eq!(list[1].priority, 2);

        // Collisions are allowed; the first listed priority-1 provider wins.
        let list = set_provider_priority(&list, 1, 1);
        assert_eq!(primary_provider(&list).unwrap().provider, ProviderId::Gemini);

        let list = remove_provider(&list, 0);
        assert_eq!(list.len(), 1);
        assert_eq!(primary_provider(&list).unwrap().provider, ProviderId::Openai);
    }

    #[test]
    fn file_size_and_kind() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(51200), "50 KB");
        assert_eq!(format_file_size(2048576), "1.95 MB");
        assert_eq!(DocumentKind::from_file_name("Policy.PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_file_name("notes"), DocumentKind::Other);
    }

    #[test]
    fn admin_user_filter() {
        let user = AdminUser {
            id: "3".into(),
            name: "Bob Wilson".into(),
            email: "bob@example.com".into(),
            role: Role::User,
            status: AccountStatus::Suspended,
        };
        assert!(user.matches("bob", None));
        assert!(user.matches("", Some(AccountStatus::Suspended)));
        assert!(!user.matches("bob", Some(AccountStatus::Active)));
    }
}
