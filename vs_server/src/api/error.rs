//! API error response.
//!
//! Every domain error carries an [`ErrorClass`]; this module turns the class into
//! a status code and the client-safe message into a JSON `{"error": ...}` body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use vidshare::{
    AuthError, EngagementError, ErrorClass, channels::ChannelError,
};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error returned by every handler
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
}

/// HTTP status for an error class
pub fn status_for(class: ErrorClass) -> StatusCode {
    match class {
        ErrorClass::Conflict => StatusCode::CONFLICT,
        ErrorClass::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorClass::NotFound => StatusCode::NOT_FOUND,
        ErrorClass::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        ErrorClass::BadRequest => StatusCode::BAD_REQUEST,
        ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = status_for(err.class());
        if status.is_server_error() {
            tracing::error!(error = %err, "Auth operation failed");
        }
        Self::new(status, err.client_message())
    }
}

impl From<EngagementError> for ApiError {
    fn from(err: EngagementError) -> Self {
        let status = status_for(err.class());
        if status.is_server_error() {
            tracing::error!(error = %err, "Engagement operation failed");
        }
        Self::new(status, err.client_message())
    }
}

impl From<ChannelError> for ApiError {
    fn from(err: ChannelError) -> Self {
        let status = status_for(err.class());
        if status.is_server_error() {
            tracing::error!(error = %err, "Channel operation failed");
        }
        Self::new(status, err.client_message())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::bad_request(errors.to_string())
    }
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
