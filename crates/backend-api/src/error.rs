use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use huddle_auth::AuthError;
use huddle_chats::ChatError;
use serde::Serialize;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        if error.is_internal() {
            error!(error = ?error, "auth backend error");
            return Self::internal_server_error("internal error");
        }

        debug!(error = %error, "rejected credentials");
        Self::unauthorized(error.to_string())
    }
}

impl From<ChatError> for ApiError {
    fn from(error: ChatError) -> Self {
        match error {
            ChatError::Validation { message } => Self::bad_request(message),
            ChatError::Authentication(err) => Self::from(err),
            ChatError::Forbidden { reason } => Self::forbidden(reason),
            err @ ChatError::NotFound { .. } => Self::not_found(err.to_string()),
            ChatError::Store { message } => Self::internal_server_error(message),
        }
    }
}
