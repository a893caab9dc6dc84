use crate::error::AgrocastError;
use axum::{
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            field: None,
            retry_after: None,
        }
    }
}

impl IntoResponse for AgrocastError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AgrocastError::NoData { .. } => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("Not found", "No sensor data found for the specified field"),
            ),
            AgrocastError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("Not found", format!("{} not found", what)),
            ),
            AgrocastError::InvalidInput { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    field: Some(field.clone()),
                    ..ErrorResponse::new("Invalid input", message.clone())
                },
            ),
            AgrocastError::RateLimited { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorResponse {
                    retry_after: Some(*retry_after_secs),
                    ..ErrorResponse::new(
                        "Rate limit exceeded",
                        format!(
                            "Too many requests. Please try again after {} seconds.",
                            retry_after_secs
                        ),
                    )
                },
            ),
            _ => {
                tracing::error!(error = ?self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error", "An internal error occurred"),
                )
            }
        };

        let retry_after = body.retry_after;
        let mut response = (status, Json(body)).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}
