use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Error returned to HTTP clients. The body never carries the underlying
/// cause; handlers log it before converting.
#[derive(Debug, Clone)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn fetch_failed(category: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Failed to fetch {category}"),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failed_message() {
        let err = AppError::fetch_failed("traffic data");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Failed to fetch traffic data");
    }

    #[test]
    fn test_not_found_status() {
        let err = AppError::not_found("Not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
