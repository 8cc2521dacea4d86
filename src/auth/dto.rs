use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::error::{AppError, FieldError};

pub const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Request body for user registration. Fields are optional so that a
/// missing field is reported as a validation message, not a decode error.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Registration input that passed validation.
#[derive(Debug)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login input that passed validation.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, AppError> {
        let mut errors = Vec::new();

        let username = self.username.unwrap_or_default().trim().to_string();
        if username.is_empty() {
            errors.push(FieldError::body("username", "Username is required"));
        }

        let email = normalize_email(self.email.as_deref().unwrap_or_default());
        if !is_valid_email(&email) {
            errors.push(FieldError::body("email", "Please include a valid email"));
        }

        let password = self.password.unwrap_or_default();
        if password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::body(
                "password",
                "Password must be 6 or more characters",
            ));
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        Ok(Registration {
            username,
            email,
            password,
        })
    }
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials, AppError> {
        let mut errors = Vec::new();

        let email = normalize_email(self.email.as_deref().unwrap_or_default());
        if !is_valid_email(&email) {
            errors.push(FieldError::body("email", "Please include a valid email"));
        }
        if self.password.is_none() {
            errors.push(FieldError::body("password", "Password is required"));
        }

        match self.password {
            Some(password) if errors.is_empty() => Ok(Credentials { email, password }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub token: String,
}

impl AuthResponse {
    pub fn new(user: User, token: String) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            token,
        }
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(err: AppError) -> Vec<String> {
        match err {
            AppError::Validation(errors) => errors.into_iter().filter_map(|e| e.path).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@x.com"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("no-at.com"));
        assert!(!is_valid_email("a b@x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn register_normalizes_email_and_username() {
        let reg = RegisterRequest {
            username: Some("  alice ".into()),
            email: Some(" A@X.com ".into()),
            password: Some("secret1".into()),
        }
        .validate()
        .expect("valid");
        assert_eq!(reg.username, "alice");
        assert_eq!(reg.email, "a@x.com");
        assert_eq!(reg.password, "secret1");
    }

    #[test]
    fn register_reports_every_bad_field() {
        let err = RegisterRequest {
            username: Some("   ".into()),
            email: Some("nope".into()),
            password: Some("12345".into()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(paths(err), vec!["username", "email", "password"]);
    }

    #[test]
    fn register_accepts_six_character_password() {
        let req = RegisterRequest {
            username: Some("bob".into()),
            email: Some("b@x.com".into()),
            password: Some("123456".into()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn register_with_missing_fields_is_a_validation_error() {
        let err = RegisterRequest::default().validate().unwrap_err();
        assert_eq!(paths(err).len(), 3);
    }

    #[test]
    fn login_requires_password_presence_only() {
        let ok = LoginRequest {
            email: Some("a@x.com".into()),
            password: Some(String::new()),
        }
        .validate();
        assert!(ok.is_ok());

        let err = LoginRequest {
            email: Some("a@x.com".into()),
            password: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(paths(err), vec!["password"]);
    }

    #[test]
    fn auth_response_uses_underscore_id() {
        let json = serde_json::to_value(AuthResponse {
            id: Uuid::nil(),
            username: "alice".into(),
            email: "a@x.com".into(),
            token: "t".into(),
        })
        .unwrap();
        assert_eq!(json["_id"], Uuid::nil().to_string());
        assert_eq!(json["token"], "t");
        assert!(json.get("password_hash").is_none());
    }
}
