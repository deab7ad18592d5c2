//! Canned responses served by [`MockTransport`](crate::transport::MockTransport).
//!
//! Keys are request signatures (`"GET /api/status"`). A path segment written
//! as `:name` matches any single segment, so `"PUT /api/admin/user/:id/status"`
//! answers for every user id. Payloads are shaped like the real backend's.

use std::collections::HashMap;

use chatpilot_shared::{
    endpoints, request_key, ApiError, LoginRequest, Method, RegisterRequest, Role,
};
use serde_json::{json, Value};

/// An account the mock login accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededAccount {
    pub id: &'static str,
    pub name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub role: Role,
}

pub const SEEDED_ADMIN: SeededAccount = SeededAccount {
    id: "1",
    name: "Admin",
    email: "admin@chatpilot.com",
    password: "admin123",
    role: Role::Admin,
};

pub const SEEDED_USER: SeededAccount = SeededAccount {
    id: "2",
    name: "Demo User",
    email: "user@chatpilot.com",
    password: "user123",
    role: Role::User,
};

pub const SEEDED_ACCOUNTS: [SeededAccount; 2] = [SEEDED_ADMIN, SEEDED_USER];

/// Exact, case-sensitive match on both email and password.
pub fn find_seeded_account(email: &str, password: &str) -> Option<&'static SeededAccount> {
    SEEDED_ACCOUNTS
        .iter()
        .find(|a| a.email == email && a.password == password)
}

pub type Responder = fn(Option<&Value>) -> Result<Value, ApiError>;

#[derive(Debug, Clone)]
pub enum MockEntry {
    Static(Value),
    /// Computed from the request body.
    Dynamic(Responder),
}

impl MockEntry {
    pub fn respond(&self, body: Option<&Value>) -> Result<Value, ApiError> {
        match self {
            MockEntry::Static(value) => Ok(value.clone()),
            MockEntry::Dynamic(responder) => responder(body),
        }
    }
}

/// Request signature -> canned response.
#[derive(Debug, Clone, Default)]
pub struct MockTable {
    entries: HashMap<String, MockEntry>,
}

impl MockTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, method: Method, path: &str, entry: MockEntry) {
        self.entries.insert(request_key(method, path), entry);
    }

    pub fn insert_static(&mut self, method: Method, path: &str, value: Value) {
        self.insert(method, path, MockEntry::Static(value));
    }

    pub fn remove(&mut self, method: Method, path: &str) -> Option<MockEntry> {
        self.entries.remove(&request_key(method, path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact key first, then `:param` patterns.
    pub fn lookup(&self, method: Method, path: &str) -> Option<&MockEntry> {
        if let Some(entry) = self.entries.get(&request_key(method, path)) {
            return Some(entry);
        }
        let prefix = format!("{method} ");
        self.entries.iter().find_map(|(key, entry)| {
            let pattern = key.strip_prefix(&prefix)?;
            path_matches(pattern, path).then_some(entry)
        })
    }
}

fn path_matches(pattern: &str, path: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('/').collect();
    let path: Vec<&str> = path.split('/').collect();
    pattern.len() == path.len()
        && pattern
            .iter()
            .zip(&path)
            .all(|(p, s)| (p.starts_with(':') && !s.is_empty()) || p == s)
}

fn parse_body<T: serde::de::DeserializeOwned>(body: Option<&Value>) -> Result<T, ApiError> {
    let body = body.ok_or_else(|| ApiError::Http {
        status: 400,
        message: "Missing request body".to_string(),
    })?;
    serde_json::from_value(body.clone()).map_err(|e| ApiError::Http {
        status: 400,
        message: format!("Malformed request body: {e}"),
    })
}

fn login(body: Option<&Value>) -> Result<Value, ApiError> {
    let req: LoginRequest = parse_body(body)?;
    let account = find_seeded_account(&req.email, &req.password).ok_or(ApiError::Http {
        status: 401,
        message: "Invalid credentials".to_string(),
    })?;
    Ok(json!({
        "token": format!("mock-jwt-token-{}", account.id),
        "user": {
            "id": account.id,
            "name": account.name,
            "email": account.email,
            "role": account.role,
        }
    }))
}

// Never checks for an existing email; every registration becomes a `user`.
fn register(body: Option<&Value>) -> Result<Value, ApiError> {
    let req: RegisterRequest = parse_body(body)?;
    let id = uuid::Uuid::new_v4().to_string();
    Ok(json!({
        "message": "success",
        "token": format!("mock-jwt-token-{id}"),
        "user": {
            "id": id,
            "name": req.name,
            "email": req.email,
            "role": Role::User,
        }
    }))
}

pub const MOCK_QR_IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// The development fixture set.
pub fn default_table() -> MockTable {
    let mut t = MockTable::empty();

    // Auth
    t.insert(Method::Post, endpoints::LOGIN, MockEntry::Dynamic(login));
    t.insert(Method::Post, endpoints::REGISTER, MockEntry::Dynamic(register));
    t.insert_static(
        Method::Post,
        endpoints::RESET_PASSWORD,
        json!({ "message": "reset link sent" }),
    );

    // Dashboard
    t.insert_static(Method::Get, endpoints::STATUS, json!({ "status": "qr_needed" }));
    t.insert_static(Method::Get, endpoints::QR, json!({ "qrImage": MOCK_QR_IMAGE }));
    t.insert_static(
        Method::Get,
        endpoints::MESSAGES,
        json!([
            {
                "id": "3",
                "from": "+6281234567893",
                "to": "+6281234567891",
                "message": "Can you help me with pricing?",
                "timestamp": "2024-01-01T12:00:00Z",
                "status": "delivered"
            },
            {
                "id": "2",
                "from": "+6281234567892",
                "to": "+6281234567891",
                "message": "What are your business hours?",
                "response": "We are open Monday to Friday, 9am to 5pm.",
                "timestamp": "2024-01-01T11:00:00Z",
                "status": "read",
                "aiProvider": "openai",
                "aiModel": "gpt-4o-mini"
            },
            {
                "id": "1",
                "from": "+6281234567890",
                "to": "+6281234567891",
                "message": "Hello, I need help",
                "response": "Hello! How can I help you today?",
                "timestamp": "2024-01-01T10:00:00Z",
                "status": "read",
                "aiProvider": "gemini",
                "aiModel": "gemini-1.5-flash"
            }
        ]),
    );

    // Settings
    t.insert_static(
        Method::Get,
        endpoints::API_SETTINGS,
        json!([
            { "provider": "gemini", "apiKey": "mock-gemini-key", "priority": 1 },
            { "provider": "openai", "apiKey": "mock-openai-key", "priority": 2 }
        ]),
    );
    t.insert_static(Method::Post, endpoints::API_SETTINGS, json!({ "message": "saved" }));
    t.insert_static(
        Method::Get,
        endpoints::BOT_SETTINGS,
        json!({
            "promptTemplate": "You are a helpful customer service assistant. Please respond politely and professionally to customer inquiries.",
            "language": "id"
        }),
    );
    t.insert_static(Method::Post, endpoints::BOT_SETTINGS, json!({ "message": "saved" }));

    // Knowledge base
    t.insert_static(
        Method::Get,
        endpoints::KNOWLEDGE_LIST,
        json!([
            { "id": "1", "fileName": "company-policy.pdf", "size": 2048576, "uploadedAt": "2024-01-01T10:00:00Z" },
            { "id": "2", "fileName": "faq.txt", "size": 51200, "uploadedAt": "2024-01-01T11:00:00Z" },
            { "id": "3", "fileName": "pricing.csv", "size": 10240, "uploadedAt": "2024-01-01T12:00:00Z" }
        ]),
    );
    t.insert_static(
        Method::Post,
        endpoints::KNOWLEDGE_UPLOAD,
        json!({ "id": "4", "fileName": "new-document.pdf" }),
    );
    t.insert_static(
        Method::Delete,
        &endpoints::knowledge_document(":id"),
        json!({ "message": "deleted" }),
    );

    // Profile
    t.insert_static(
        Method::Get,
        endpoints::USER_PROFILE,
        json!({ "id": "1", "name": "Admin", "email": "admin@chatpilot.com" }),
    );
    t.insert_static(Method::Put, endpoints::USER_PROFILE, json!({ "message": "updated" }));
    t.insert_static(
        Method::Put,
        endpoints::USER_PASSWORD,
        json!({ "message": "password updated" }),
    );

    // Admin
    t.insert_static(
        Method::Get,
        endpoints::ADMIN_USERS,
        json!([
            { "id": "1", "name": "Admin", "email": "admin@chatpilot.com", "role": "admin", "status": "active" },
            { "id": "2", "name": "Jane Smith", "email": "jane@example.com", "role": "user", "status": "active" },
            { "id": "3", "name": "Bob Wilson", "email": "bob@example.com", "role": "user", "status": "suspended" }
        ]),
    );
    t.insert_static(
        Method::Put,
        &endpoints::admin_user_status(":id"),
        json!({ "message": "status updated" }),
    );

    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_accounts_match_exactly() {
        assert_eq!(find_seeded_account("admin@chatpilot.com", "admin123"), Some(&SEEDED_ADMIN));
        assert_eq!(find_seeded_account("user@chatpilot.com", "user123"), Some(&SEEDED_USER));
        assert!(find_seeded_account("Admin@chatpilot.com", "admin123").is_none());
        assert!(find_seeded_account("admin@chatpilot.com", "user123").is_none());
    }

    #[test]
    fn pattern_keys_match_one_segment() {
        let table = default_table();
        assert!(table.lookup(Method::Put, "/api/admin/user/42/status").is_some());
        assert!(table.lookup(Method::Put, "/api/admin/user//status").is_none());
        assert!(table.lookup(Method::Get, "/api/admin/user/42/status").is_none());
        assert!(table.lookup(Method::Delete, "/api/knowledge/7").is_some());
    }

    #[test]
    fn login_rejects_unknown_credentials() {
        let err = login(Some(&json!({ "email": "x@y.com", "password": "secret1" }))).unwrap_err();
        assert_eq!(err, ApiError::Http { status: 401, message: "Invalid credentials".into() });
    }

    #[test]
    fn register_echoes_name_as_user_role() {
        let body = json!({ "name": "Sam", "email": "sam@example.com", "password": "hunter22" });
        let resp = register(Some(&body)).unwrap();
        assert_eq!(resp["user"]["name"], "Sam");
        assert_eq!(resp["user"]["role"], "user");
        assert!(resp["token"].as_str().unwrap().starts_with("mock-jwt-token-"));
    }
}
