//! # Credential Mint, Verification, and Revocation
//!
//! ## Endpoints
//!
//! - `POST /v1/credentials`: Mint a credential. The caller is the issuer.
//! - `GET /v1/credentials/:id`: Stored record, without validity.
//! - `GET /v1/credentials/:id/verify`: Live validity plus the record.
//! - `GET /v1/credentials/:id/expired`: Expiry check alone.
//! - `GET /v1/credentials/:id/owner`: Owner per the ownership ledger.
//! - `POST /v1/credentials/:id/revoke`: Revoke (issuer or administrator).

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use skillcert_core::{CredentialId, Principal, Timestamp};
use skillcert_state::{CredentialRecord, MintRequest, Verification};

use crate::auth::Caller;
use crate::error::AppError;
use crate::extractors::{extract_json, extract_optional_json, parse_credential_id};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for revocation.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RevokeRequest {
    #[serde(default)]
    pub reason: String,
}

/// Response from the expiry endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExpiryResponse {
    pub id: CredentialId,
    pub expired: bool,
    pub expires_at: Timestamp,
}

/// Response from the owner endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct OwnerResponse {
    pub id: CredentialId,
    pub owner: Principal,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the credentials router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/credentials", post(mint))
        .route("/v1/credentials/:id", get(get_credential))
        .route("/v1/credentials/:id/verify", get(verify))
        .route("/v1/credentials/:id/expired", get(expired))
        .route("/v1/credentials/:id/owner", get(owner))
        .route("/v1/credentials/:id/revoke", post(revoke))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/credentials
async fn mint(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Result<Json<MintRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CredentialRecord>), AppError> {
    let req = extract_json(body)?;
    let id = state.controller.mint(&caller, req)?;
    let record = state.controller.credential(id)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /v1/credentials/:id
async fn get_credential(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CredentialRecord>, AppError> {
    let id = parse_credential_id(&id)?;
    Ok(Json(state.controller.credential(id)?))
}

/// GET /v1/credentials/:id/verify
async fn verify(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Verification>, AppError> {
    let id = parse_credential_id(&id)?;
    Ok(Json(state.controller.verify(id)?))
}

/// GET /v1/credentials/:id/expired
async fn expired(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExpiryResponse>, AppError> {
    let id = parse_credential_id(&id)?;
    let expired = state.controller.is_expired(id)?;
    let expires_at = state.controller.credential(id)?.expires_at;
    Ok(Json(ExpiryResponse {
        id,
        expired,
        expires_at,
    }))
}

/// GET /v1/credentials/:id/owner
async fn owner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OwnerResponse>, AppError> {
    let id = parse_credential_id(&id)?;
    let owner = state
        .controller
        .owner_of(id)
        .ok_or_else(|| AppError::NotFound(format!("no owner recorded for credential {id}")))?;
    Ok(Json(OwnerResponse { id, owner }))
}

/// POST /v1/credentials/:id/revoke
///
/// The body may be empty, in which case the reason is recorded as empty.
/// A non-empty body that is not a valid [`RevokeRequest`] is rejected
/// before anything is revoked.
async fn revoke(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CredentialRecord>, AppError> {
    let id = parse_credential_id(&id)?;
    let RevokeRequest { reason } = extract_optional_json(&headers, &body)?;
    state.controller.revoke_credential(&caller, id, &reason)?;
    Ok(Json(state.controller.credential(id)?))
}
