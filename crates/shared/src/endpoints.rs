//! Logical endpoints of the dashboard API and the request signature they
//! are keyed by.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const LOGIN: &str = "/api/auth/login";
pub const REGISTER: &str = "/api/auth/register";
pub const RESET_PASSWORD: &str = "/api/auth/reset-password";

pub const STATUS: &str = "/api/status";
pub const QR: &str = "/api/qr";
pub const MESSAGES: &str = "/api/messages";

pub const API_SETTINGS: &str = "/api/settings/api";
pub const BOT_SETTINGS: &str = "/api/settings/bot";

pub const KNOWLEDGE_LIST: &str = "/api/knowledge/list";
pub const KNOWLEDGE_UPLOAD: &str = "/api/knowledge/upload";

pub const USER_PROFILE: &str = "/api/user/profile";
pub const USER_PASSWORD: &str = "/api/user/password";

pub const ADMIN_USERS: &str = "/api/admin/users";

pub fn knowledge_document(id: &str) -> String {
    format!("/api/knowledge/{id}")
}

pub fn admin_user_status(id: &str) -> String {
    format!("/api/admin/user/{id}/status")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// Whether the request changes server state.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `"{METHOD} {path}"`, the key the mock table is indexed by.
pub fn request_key(method: Method, path: &str) -> String {
    format!("{method} {path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_key_format() {
        assert_eq!(request_key(Method::Get, STATUS), "GET /api/status");
        assert_eq!(
            request_key(Method::Put, &admin_user_status("2")),
            "PUT /api/admin/user/2/status"
        );
        assert!(Method::Delete.is_mutation());
        assert!(!Method::Get.is_mutation());
    }
}
