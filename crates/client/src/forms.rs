//! Form validation run before any request is sent.

use chatpilot_shared::{DocumentKind, MAX_UPLOAD_BYTES};

use crate::error::{ClientError, Result};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_NAME_LEN: usize = 2;

/// A deliberately loose email check: `local@domain.tld` with no spaces.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

pub fn validate_email(email: &str) -> Result<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ClientError::validation("email", "Invalid email address"))
    }
}

fn validate_password(field: &'static str, password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClientError::validation(
            field,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

pub fn validate_login(email: &str, password: &str) -> Result<()> {
    validate_email(email)?;
    validate_password("password", password)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().chars().count() < MIN_NAME_LEN {
            return Err(ClientError::validation(
                "name",
                format!("Name must be at least {MIN_NAME_LEN} characters"),
            ));
        }
        validate_email(&self.email)?;
        validate_password("password", &self.password)?;
        if self.password != self.confirm_password {
            return Err(ClientError::validation(
                "confirm_password",
                "Passwords don't match",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ChangePasswordForm {
    pub fn validate(&self) -> Result<()> {
        if self.current_password.is_empty() {
            return Err(ClientError::validation(
                "current_password",
                "Current password is required",
            ));
        }
        validate_password("new_password", &self.new_password)?;
        if self.new_password != self.confirm_password {
            return Err(ClientError::validation(
                "confirm_password",
                "New passwords do not match",
            ));
        }
        Ok(())
    }
}

/// Knowledge-base uploads: PDF, TXT or CSV up to 10 MiB.
pub fn validate_upload(file_name: &str, size: u64) -> Result<()> {
    if DocumentKind::from_file_name(file_name) == DocumentKind::Other {
        return Err(ClientError::validation(
            "file",
            "Supported formats: PDF, TXT, CSV",
        ));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(ClientError::validation("file", "Max 10MB per file"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("admin@chatpilot.com"));
        assert!(is_valid_email("a.b+c@sub.example.co"));
        assert!(!is_valid_email("admin@chatpilot"));
        assert!(!is_valid_email("@chatpilot.com"));
        assert!(!is_valid_email("admin chat@pilot.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn login_needs_six_char_password() {
        let err = validate_login("admin@chatpilot.com", "12345").unwrap_err();
        assert_eq!(err.field(), Some("password"));
        assert!(validate_login("admin@chatpilot.com", "123456").is_ok());
    }

    #[test]
    fn register_checks_fields_in_order() {
        let mut form = RegisterForm {
            name: "S".into(),
            email: "sam@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
        };
        assert_eq!(form.validate().unwrap_err().field(), Some("name"));

        form.name = "Sam".into();
        assert_eq!(form.validate().unwrap_err().field(), Some("confirm_password"));

        form.confirm_password = "secret1".into();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn change_password_rules() {
        let form = ChangePasswordForm {
            current_password: "old-pass".into(),
            new_password: "newpass".into(),
            confirm_password: "newpass".into(),
        };
        assert!(form.validate().is_ok());

        let short = ChangePasswordForm {
            new_password: "abc".into(),
            confirm_password: "abc".into(),
            ..form.clone()
        };
        assert_eq!(short.validate().unwrap_err().field(), Some("new_password"));
    }

    #[test]
    fn upload_rules() {
        assert!(validate_upload("faq.txt", 1024).is_ok());
        assert!(validate_upload("deck.pptx", 1024).is_err());
        assert!(validate_upload("huge.pdf", MAX_UPLOAD_BYTES + 1).is_err());
    }
}
