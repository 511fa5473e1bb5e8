//! # Extraction Helpers
//!
//! Map axum rejections and malformed path segments to [`AppError`] so every
//! failure leaves the service as a JSON error body.

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::Json;
use serde::de::DeserializeOwned;
use skillcert_core::CredentialId;

use crate::error::AppError;

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body that may be omitted entirely.
///
/// An empty (or all-whitespace) body yields `T::default()`. Anything else
/// must carry a JSON content type and deserialize into `T`, otherwise
/// [`AppError::BadRequest`].
pub fn extract_optional_json<T>(headers: &HeaderMap, body: &Bytes) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    if !has_json_content_type(headers) {
        return Err(AppError::BadRequest(
            "Expected request with `Content-Type: application/json`".into(),
        ));
    }
    extract_json(Json::from_bytes(body))
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .is_some_and(|mime| {
            mime.eq_ignore_ascii_case("application/json")
                || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
}

/// Parse a credential identifier from a path segment.
pub fn parse_credential_id(raw: &str) -> Result<CredentialId, AppError> {
    raw.parse()
        .map_err(|e: skillcert_core::ValidationError| AppError::BadRequest(e.to_string()))
}
