//! REST endpoint handlers and shared response types

pub mod battles;
pub mod players;
pub mod stats;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::{Deserialize, Serialize};

/// Query parameters shared by windowed endpoints
#[derive(Debug, Default, Deserialize)]
pub struct WindowParams {
    pub days: Option<i64>,
}

impl WindowParams {
    /// `days` if given, which must be positive
    pub fn days(&self) -> Result<Option<i64>, ApiError> {
        match self.days {
            Some(days) if days <= 0 => Err(ApiError::bad_request(format!(
                "days must be positive, got {}",
                days
            ))),
            other => Ok(other),
        }
    }

    pub fn days_or(&self, default: i64) -> Result<i64, ApiError> {
        Ok(self.days()?.unwrap_or(default))
    }
}

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    /// Item count for list responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data, total: None }
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(data: Vec<T>) -> Self {
        let total = data.len();
        Self {
            data,
            total: Some(total),
        }
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: &'static str,
    #[serde(skip)]
    status: StatusCode,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "NOT_FOUND",
            status: StatusCode::NOT_FOUND,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "BAD_REQUEST",
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
