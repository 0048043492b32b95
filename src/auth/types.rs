//! Credentials and wire payloads for the login and register endpoints. These
//! carry passwords, tokens and face images, so their `Debug` output is redacted
//! and they must never be logged.

use crate::session::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

const REDACTED: &str = "[REDACTED]";

/// What the login form collects.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &REDACTED)
            .finish()
    }
}

/// What the registration form collects. New accounts default to `student`.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Default for RegistrationDetails {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            password: String::new(),
            role: Role::Student,
        }
    }
}

impl fmt::Debug for RegistrationDetails {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RegistrationDetails")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &REDACTED)
            .field("role", &self.role)
            .finish()
    }
}

/// Form contents for either flow kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Login(LoginCredentials),
    Register(RegistrationDetails),
}

impl Credentials {
    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            Self::Login(credentials) => &credentials.email,
            Self::Register(details) => &details.email,
        }
    }
}

#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub image: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &REDACTED)
            .field("image_len", &self.image.len())
            .finish()
    }
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub image: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RegisterRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &REDACTED)
            .field("role", &self.role)
            .field("image_len", &self.image.len())
            .finish()
    }
}

/// Successful `/login` body. `role` is kept as the raw tag; unknown tags still
/// route to the student dashboard.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LoginResponse")
            .field("access_token", &REDACTED)
            .field("role", &self.role)
            .finish()
    }
}

/// Error body returned by the backend; either key may carry the reason.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub(crate) fn reason(self) -> Option<String> {
        self.error
            .or(self.message)
            .map(|reason| reason.trim().to_string())
            .filter(|reason| !reason.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_request_uses_camel_case_keys() -> anyhow::Result<()> {
        let request = RegisterRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "Aa1!aaaa".to_string(),
            role: Role::Hr,
            image: "data:image/jpeg;base64,AAAA".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&request)?,
            json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": "Aa1!aaaa",
                "role": "hr",
                "image": "data:image/jpeg;base64,AAAA"
            })
        );
        Ok(())
    }

    #[test]
    fn login_response_role_is_optional() -> anyhow::Result<()> {
        let response: LoginResponse = serde_json::from_value(json!({ "access_token": "xyz" }))?;
        assert_eq!(response.access_token, "xyz");
        assert_eq!(response.role, None);
        Ok(())
    }

    #[test]
    fn debug_output_hides_secrets() {
        let credentials = LoginCredentials::new("a@b.com", "Sup3r$ecret");
        let response = LoginResponse {
            access_token: "xyz-token".to_string(),
            role: Some("hr".to_string()),
        };

        assert!(!format!("{credentials:?}").contains("Sup3r$ecret"));
        assert!(!format!("{response:?}").contains("xyz-token"));
    }

    #[test]
    fn error_body_prefers_error_key() -> anyhow::Result<()> {
        let body: ErrorBody = serde_json::from_value(json!({
            "error": " Email already exists ",
            "message": "ignored"
        }))?;
        assert_eq!(body.reason().as_deref(), Some("Email already exists"));

        let body: ErrorBody = serde_json::from_value(json!({ "message": "" }))?;
        assert_eq!(body.reason(), None);
        Ok(())
    }
}
