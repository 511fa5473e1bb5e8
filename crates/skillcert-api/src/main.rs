//! # skillcert-api: Binary Entry Point
//!
//! Starts the Axum HTTP server. Configuration comes from `PORT`,
//! `AUTH_TOKEN`, `ADMIN_PRINCIPAL`, and `LOG_FORMAT` (`text` or `json`).

use skillcert_api::state::{AppConfig, AppState, LogFormat};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let builder = tracing_subscriber::fmt().with_env_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    );
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();
    init_tracing(config.as_ref().map(|c| c.log_format).unwrap_or_default());

    let config = config.map_err(|e| {
        tracing::error!("Configuration error: {e}");
        e
    })?;
    if config.auth_token.is_none() {
        tracing::warn!("AUTH_TOKEN not set; bearer authentication is disabled");
    }

    let port = config.port;
    tracing::info!(administrator = %config.administrator, "skill credential registry starting");
    let app = skillcert_api::app(AppState::new(config));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("skillcert API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
