//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps lifecycle errors from skillcert-state to HTTP status codes and
//! returns JSON bodies carrying a machine-readable code. Internal failures
//! (ownership ledger, exhausted identifier space) are logged but never
//! described to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use skillcert_state::CredentialError;
use thiserror::Error;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "ALREADY_REVOKED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// A lifecycle operation was rejected.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Request body or path could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid bearer token, or no caller principal (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found outside the lifecycle controller (404).
    #[error("not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Credential(err) => (credential_status(err), err.code()),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        }
    }

    fn is_internal(&self) -> bool {
        self.status_and_code().0.is_server_error()
    }
}

fn credential_status(err: &CredentialError) -> StatusCode {
    match err {
        CredentialError::NotFound(_) => StatusCode::NOT_FOUND,
        CredentialError::Forbidden { .. } | CredentialError::NotAuthorizedIssuer(_) => {
            StatusCode::FORBIDDEN
        }
        CredentialError::AlreadyAuthorized(_)
        | CredentialError::NotAuthorized(_)
        | CredentialError::AlreadyRevoked(_) => StatusCode::CONFLICT,
        CredentialError::InvalidPrincipal(_)
        | CredentialError::InvalidHolder(_)
        | CredentialError::EmptySkillName
        | CredentialError::InvalidValidityPeriod { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        CredentialError::IdentifierSpaceExhausted => StatusCode::SERVICE_UNAVAILABLE,
        CredentialError::IdentifierInUse(_) | CredentialError::Ledger(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if self.is_internal() {
            tracing::error!(error = %self, "internal server error");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use skillcert_core::{CredentialId, Principal};
    use skillcert_state::LedgerError;

    #[test]
    fn lifecycle_errors_map_to_statuses() {
        let cases = [
            (
                CredentialError::NotFound(CredentialId::new(9)),
                StatusCode::NOT_FOUND,
            ),
            (
                CredentialError::Forbidden {
                    caller: Principal::new("mallory"),
                    action: "authorize issuers",
                },
                StatusCode::FORBIDDEN,
            ),
            (
                CredentialError::NotAuthorizedIssuer(Principal::new("acme")),
                StatusCode::FORBIDDEN,
            ),
            (
                CredentialError::AlreadyAuthorized(Principal::new("acme")),
                StatusCode::CONFLICT,
            ),
            (
                CredentialError::NotAuthorized(Principal::new("acme")),
                StatusCode::CONFLICT,
            ),
            (
                CredentialError::AlreadyRevoked(CredentialId::new(1)),
                StatusCode::CONFLICT,
            ),
            (
                CredentialError::InvalidHolder(Principal::new("0x0")),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (CredentialError::EmptySkillName, StatusCode::UNPROCESSABLE_ENTITY),
            (
                CredentialError::InvalidValidityPeriod { secs: 0 },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                CredentialError::IdentifierInUse(CredentialId::new(1)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                CredentialError::Ledger(LedgerError::Unavailable("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let code = err.code();
            let (status, mapped_code) = AppError::from(err).status_and_code();
            assert_eq!(status, expected);
            assert_eq!(mapped_code, code);
        }
    }

    #[test]
    fn transport_errors_map_to_statuses() {
        assert_eq!(
            AppError::BadRequest("x".into()).status_and_code(),
            (StatusCode::BAD_REQUEST, "BAD_REQUEST")
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).status_and_code(),
            (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_and_code(),
            (StatusCode::NOT_FOUND, "NOT_FOUND")
        );
    }

    #[tokio::test]
    async fn ledger_failure_message_is_hidden() {
        let err = AppError::from(CredentialError::Ledger(LedgerError::Unavailable(
            "connection refused to 10.0.0.7".into(),
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error.code, "LEDGER_ERROR");
        assert!(!body.error.message.contains("10.0.0.7"));
    }

    #[tokio::test]
    async fn client_error_message_is_descriptive() {
        let err = AppError::from(CredentialError::AlreadyRevoked(CredentialId::new(4)));
        let response = err.into_response();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error.code, "ALREADY_REVOKED");
        assert!(body.error.message.contains('4'));
    }
}
