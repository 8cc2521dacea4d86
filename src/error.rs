//! Request-level error type and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Which unique identity column a duplicate registration collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    Username,
    Email,
    Unknown,
}

impl IdentityField {
    fn message(self) -> &'static str {
        match self {
            IdentityField::Username => "Username already exists",
            IdentityField::Email => "Email already exists",
            IdentityField::Unknown => "User already exists",
        }
    }

    fn path(self) -> Option<&'static str> {
        match self {
            IdentityField::Username => Some("username"),
            IdentityField::Email => Some("email"),
            IdentityField::Unknown => None,
        }
    }
}

/// Errors raised at the storage boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated on {0:?}")]
    Duplicate(IdentityField),

    #[error("referenced user does not exist")]
    UnknownUser,

    #[error("database error: {0}")]
    Unavailable(#[from] sqlx::Error),
}

/// One field-level validation message, shaped like express-validator output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub location: &'static str,
}

impl FieldError {
    pub fn body(path: &str, msg: &str) -> Self {
        Self {
            msg: msg.to_string(),
            path: Some(path.to_string()),
            location: "body",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("{}", .0.message())]
    DuplicateIdentity(IdentityField),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Not authorized")]
    Unauthenticated,

    #[error("storage failure: {0}")]
    Storage(StoreError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(field) => AppError::DuplicateIdentity(field),
            StoreError::UnknownUser => AppError::Unauthenticated,
            other => AppError::Storage(other),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateIdentity(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AppError::Validation(errors) => json!({ "errors": errors }),
            AppError::DuplicateIdentity(field) => {
                let err = FieldError {
                    msg: field.message().to_string(),
                    path: field.path().map(str::to_string),
                    location: "body",
                };
                json!({ "errors": [err] })
            }
            AppError::InvalidCredentials | AppError::Unauthenticated => {
                json!({ "message": self.to_string() })
            }
            AppError::Storage(_) | AppError::Internal(_) => {
                error!(error = %self, "request failed");
                json!({ "message": "Server Error" })
            }
        };
        (status, Json(body)).into_response()
    }
}
