//! # Issuer Administration
//!
//! ## Endpoints
//!
//! - `POST /v1/issuers`: Authorize an issuer (administrator only).
//! - `GET /v1/issuers`: List every issuer ever authorized.
//! - `GET /v1/issuers/:issuer`: One issuer's registry entry.
//! - `DELETE /v1/issuers/:issuer`: Revoke an issuer (administrator only).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use skillcert_core::Principal;
use skillcert_state::IssuerEntry;

use crate::auth::Caller;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Request body for issuer authorization.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthorizeIssuerRequest {
    /// Principal to authorize.
    pub issuer: Principal,
    /// Institution display name.
    pub label: String,
}

/// Build the issuers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/issuers", post(authorize_issuer).get(list_issuers))
        .route("/v1/issuers/:issuer", get(get_issuer).delete(revoke_issuer))
}

/// POST /v1/issuers
async fn authorize_issuer(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Result<Json<AuthorizeIssuerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IssuerEntry>), AppError> {
    let req = extract_json(body)?;
    state
        .controller
        .authorize_issuer(&caller, &req.issuer, &req.label)?;
    let entry = state
        .controller
        .issuer(&req.issuer)
        .ok_or_else(|| AppError::NotFound(format!("issuer {}", req.issuer)))?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /v1/issuers
async fn list_issuers(State(state): State<AppState>) -> Json<Vec<IssuerEntry>> {
    Json(state.controller.issuers())
}

/// GET /v1/issuers/:issuer
async fn get_issuer(
    State(state): State<AppState>,
    Path(issuer): Path<String>,
) -> Result<Json<IssuerEntry>, AppError> {
    state
        .controller
        .issuer(&Principal::new(issuer.clone()))
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("issuer {issuer}")))
}

/// DELETE /v1/issuers/:issuer
async fn revoke_issuer(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(issuer): Path<String>,
) -> Result<Json<IssuerEntry>, AppError> {
    let issuer = Principal::new(issuer);
    state.controller.revoke_issuer(&caller, &issuer)?;
    state
        .controller
        .issuer(&issuer)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("issuer {issuer}")))
}
