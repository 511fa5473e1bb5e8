//! # Holder Portfolios
//!
//! - `GET /v1/holders/:holder/credentials`: Credential ids received by a
//!   holder, in mint order, revoked ones included. Unknown holders get an
//!   empty list.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use skillcert_core::{CredentialId, Principal};

use crate::state::AppState;

/// Response for a holder portfolio.
#[derive(Debug, Serialize, Deserialize)]
pub struct HolderCredentials {
    pub holder: Principal,
    pub credentials: Vec<CredentialId>,
}

/// Build the holders router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/holders/:holder/credentials", get(holder_credentials))
}

/// GET /v1/holders/:holder/credentials
async fn holder_credentials(
    State(state): State<AppState>,
    Path(holder): Path<String>,
) -> Json<HolderCredentials> {
    let holder = Principal::new(holder);
    let credentials = state.controller.holder_credentials(&holder);
    Json(HolderCredentials {
        holder,
        credentials,
    })
}
