//! Error types for the gateway crate.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use catalog_core::StoreError;

/// Errors that can occur during gateway request handling.
///
/// Every variant is terminal for its request and renders as a plain-text
/// body with the matching status code.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// A store operation rejected the request.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The item path segment is not an integer.
    #[error("invalid product id {0:?}")]
    InvalidId(String),

    /// The request body is not a product payload.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The path matched but the method is not served on it.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// A response body could not be serialized.
    #[error("failed to encode response: {0}")]
    Encoding(#[source] serde_json::Error),
}

impl GatewayError {
    /// HTTP status this error renders with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            GatewayError::Store(StoreError::IdMismatch { .. })
            | GatewayError::InvalidId(_)
            | GatewayError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::Store(_) | GatewayError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal details stay in the logs.
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self {
            GatewayError::Store(StoreError::NotFound(_)) => "Product not found",
            GatewayError::Store(StoreError::IdMismatch { .. }) => {
                "ID in the URL and the Body do not match"
            }
            GatewayError::InvalidId(_) => "Invalid Product Id",
            GatewayError::InvalidBody(_) => "Invalid request Body",
            GatewayError::MethodNotAllowed => "Method Not Allowed",
            GatewayError::Store(_) | GatewayError::Encoding(_) => "Internal Server Error",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), self.public_message()).into_response()
    }
}
