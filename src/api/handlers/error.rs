use crate::{api::types::ErrorResponse, auth::AuthError};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const UNAUTHORIZED: &str = "Unauthorized";
pub const INVALID_TOKEN: &str = "Invalid token";
pub const EMAIL_TAKEN: &str = "Email already registered";
pub const INVALID_BODY: &str = "Invalid request body";
pub const SERVER_ERROR: &str = "Server error";
pub const NOT_FOUND: &str = "Not found";
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";

/// Error returned by handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(message) => Self::new(StatusCode::BAD_REQUEST, message),
            AuthError::InvalidCredentials => {
                Self::new(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS)
            }
            AuthError::Unauthorized => Self::new(StatusCode::UNAUTHORIZED, UNAUTHORIZED),
            AuthError::InvalidToken(err) => {
                debug!("Rejected session token: {err}");
                Self::new(StatusCode::UNAUTHORIZED, INVALID_TOKEN)
            }
            AuthError::Conflict => Self::new(StatusCode::CONFLICT, EMAIL_TAKEN),
            AuthError::Storage(err) => {
                error!("Storage failure: {err}");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", err.code()),
                )
            }
            AuthError::Unexpected(err) => {
                error!("Unexpected failure: {err}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        Self::new(StatusCode::BAD_REQUEST, INVALID_BODY)
    }
}

/// Router fallback for unknown paths.
pub async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, NOT_FOUND)
}

/// Router fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
