//! Shared response envelope for API handlers.
//!
//! Every response body is an object with at least `success`. Successful
//! single-entity responses carry `data`; list responses add `total`.
//! Failures are rendered by [`crate::error::AppError`] with `success: false`.

use serde::Serialize;

/// Standard `{ "success": true, "message"?, "data"?, "total"? }` envelope.
///
/// ```ignore
/// Ok(Json(ApiResponse::list(items, total)))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

impl<T: Serialize> ApiResponse<T> {
    /// A successful response carrying `data`.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            total: None,
        }
    }

    /// A successful list response carrying one page and the unpaged count.
    pub fn list(data: T, total: i64) -> Self {
        Self {
            total: Some(total),
            ..Self::data(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// A successful response with only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            total: None,
        }
    }
}
