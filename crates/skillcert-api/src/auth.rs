//! # Authentication & Caller Identity
//!
//! Two layers:
//!
//! - **Bearer gate**: when `AUTH_TOKEN` is configured, every `/v1` request
//!   must carry `Authorization: Bearer <token>`. Comparison is constant-time.
//! - **Caller principal**: mutating handlers read the acting principal from
//!   the `x-principal` header via the [`Caller`] extractor. The lifecycle
//!   controller decides what that principal may do.
//!
//! The header is trusted as-is once the bearer gate passes. Deployments that
//! expose the service to untrusted callers must put a proxy in front that
//! sets `x-principal` from its own authentication.

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use skillcert_core::Principal;
use subtle::ConstantTimeEq;

use crate::error::{AppError, ErrorBody, ErrorDetail};

/// Header carrying the acting principal.
pub const PRINCIPAL_HEADER: &str = "x-principal";

// ── Caller ──────────────────────────────────────────────────────────────────

/// The principal on whose behalf a request acts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub Principal);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(PRINCIPAL_HEADER)
            .ok_or_else(|| AppError::Unauthorized(format!("missing {PRINCIPAL_HEADER} header")))?;
        let principal = value
            .to_str()
            .map_err(|_| AppError::BadRequest(format!("{PRINCIPAL_HEADER} header is not valid UTF-8")))?
            .trim();
        if principal.is_empty() {
            return Err(AppError::Unauthorized(format!("empty {PRINCIPAL_HEADER} header")));
        }
        Ok(Caller(Principal::new(principal)))
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Constant-time comparison of bearer tokens.
///
/// Walks the longer of the two inputs, padding the shorter with zeros, and
/// folds the length check into the same [`subtle::Choice`], so a length
/// mismatch takes as long as a content mismatch.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    let mut equal = (provided.len() as u64).ct_eq(&(expected.len() as u64));
    for i in 0..provided.len().max(expected.len()) {
        let a = provided.get(i).copied().unwrap_or(0);
        let b = expected.get(i).copied().unwrap_or(0);
        equal &= a.ct_eq(&b);
    }
    equal.into()
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Reject requests without the configured bearer token.
///
/// When `AuthConfig.token` is `None`, every request passes.
pub async fn auth_middleware(request: Request, next: Next) -> Response {
    let expected = request
        .extensions()
        .get::<AuthConfig>()
        .and_then(|c| c.token.clone());

    let Some(expected) = expected else {
        return next.run(request).await;
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(value) => match value.strip_prefix("Bearer ") {
            Some(provided) if constant_time_token_eq(provided, &expected) => next.run(request).await,
            Some(_) => {
                tracing::warn!("authentication failed: invalid bearer token");
                unauthorized_response("invalid bearer token")
            }
            None => {
                tracing::warn!("authentication failed: non-Bearer authorization scheme");
                unauthorized_response("authorization header must use Bearer scheme")
            }
        },
        None => {
            tracing::warn!("authentication failed: missing authorization header");
            unauthorized_response("missing authorization header")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
