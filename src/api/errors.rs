//! API Error Handling
//!
//! Maps service outcomes onto HTTP status codes and the failure envelope.

use super::models::ApiResponse;
use crate::errors::{ServiceError, ServiceStatus};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

/// Failed API call, tagged with the request it belongs to
#[derive(Debug)]
pub struct ApiError {
    pub status: ServiceStatus,
    pub message: String,
    pub request_id: String,
}

impl ApiError {
    pub fn bad_request(request_id: String, message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::ValidationError,
            message: message.into(),
            request_id,
        }
    }

    pub fn from_service(request_id: String, error: ServiceError) -> Self {
        Self {
            status: error.status(),
            message: error.message().to_string(),
            request_id,
        }
    }
}

pub fn status_code(status: ServiceStatus) -> StatusCode {
    match status {
        ServiceStatus::Success => StatusCode::OK,
        ServiceStatus::NotFound => StatusCode::NOT_FOUND,
        ServiceStatus::ValidationError => StatusCode::BAD_REQUEST,
        ServiceStatus::Conflict => StatusCode::CONFLICT,
        ServiceStatus::Unauthorized => StatusCode::UNAUTHORIZED,
        ServiceStatus::Forbidden => StatusCode::FORBIDDEN,
        ServiceStatus::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.request_id, self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_code(self.status);
        if status.is_server_error() {
            tracing::warn!(request_id = %self.request_id, message = %self.message, "Request failed");
        } else {
            tracing::debug!(request_id = %self.request_id, status = %self.status, message = %self.message, "Request rejected");
        }

        (status, Json(ApiResponse::<()>::failure(self.message))).into_response()
    }
}
