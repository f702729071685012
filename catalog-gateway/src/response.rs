//! JSON response writer.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::error::GatewayError;

/// Content type declared on every successful body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Serialize `value` and wrap it in a response with the given status.
///
/// # Errors
/// Returns [`GatewayError::Encoding`] if serialization fails. The failure is
/// logged before it is returned.
pub fn json<T>(status: StatusCode, value: &T) -> Result<Response, GatewayError>
where
    T: Serialize + ?Sized,
{
    let body = serde_json::to_vec(value).map_err(|e| {
        error!(error = %e, status = %status, "failed to encode response body");
        GatewayError::Encoding(e)
    })?;
    Ok((
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
        body,
    )
        .into_response())
}
