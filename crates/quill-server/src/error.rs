use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use quill_core::error::AppError;

use crate::dto::ErrorResponse;

/// Wrapper so we can implement `IntoResponse` for `AppError`.
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self.0 {
            AppError::ConfigError(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::NothingToExport => (StatusCode::BAD_REQUEST, "nothing_to_export"),
            AppError::ScrapeInProgress => (StatusCode::CONFLICT, "scrape_in_progress"),
            AppError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
            e if e.is_transport() || e.ends_pagination() => {
                (StatusCode::BAD_GATEWAY, "upstream_error")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.0.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}
