//! # skillcert-api: HTTP Service for the Skill Credential Registry
//!
//! Exposes the lifecycle controller over JSON/HTTP.
//!
//! ## API Surface
//!
//! | Prefix                 | Module                    | Domain                 |
//! |------------------------|---------------------------|------------------------|
//! | `/v1/issuers/*`        | [`routes::issuers`]       | Issuer authorization   |
//! | `/v1/credentials/*`    | [`routes::credentials`]   | Mint, verify, revoke   |
//! | `/v1/holders/*`        | [`routes::holders`]       | Holder portfolios      |
//! | `/v1/events`           | [`routes::events`]        | Notification feed      |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware → Handler
//! ```
//!
//! Mutating handlers take the acting principal from the `x-principal`
//! header (see [`auth::Caller`]).

pub mod auth;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the auth middleware
/// so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    let api = Router::new()
        .merge(routes::issuers::router())
        .merge(routes::credentials::router())
        .merge(routes::holders::router())
        .merge(routes::events::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
