//! The `{success, ...}` envelopes returned by every endpoint.

use serde::{Deserialize, Serialize};

use crate::dto::BlogDto;

/// `{success, blog}` - a single blog, or any blog-shaped payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogResponse<T = BlogDto> {
    pub success: bool,
    pub blog: T,
}

impl<T> BlogResponse<T> {
    pub fn ok(blog: T) -> Self {
        Self {
            success: true,
            blog,
        }
    }
}

/// `{success, blogs}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogListResponse {
    pub success: bool,
    pub blogs: Vec<BlogDto>,
}

impl BlogListResponse {
    pub fn ok(blogs: Vec<BlogDto>) -> Self {
        Self {
            success: true,
            blogs,
        }
    }
}

/// `{success: true}` with nothing else to report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Failure envelope. `error` is omitted for plain not-found responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

/// Machine-readable failure description. Never carries internal error text;
/// the `X-Request-ID` response header correlates a failure with server logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn bare() -> Self {
        Self {
            success: false,
            error: None,
        }
    }

    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(ErrorDetail {
                code: code.into(),
                message: None,
            }),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        if let Some(detail) = self.error.as_mut() {
            detail.message = Some(message.into());
        }
        self
    }

    // Common error constructors
    pub fn not_found() -> Self {
        Self::bare()
    }

    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_code(code).with_message(message)
    }

    pub fn internal_error() -> Self {
        Self::with_code("internal_error")
    }
}
