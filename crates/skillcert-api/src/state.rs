//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor. The lifecycle controller does its own locking, so
//! `AppState` is a bundle of `Arc`s and clones cheaply per request.

use std::sync::Arc;

use skillcert_core::Principal;
use skillcert_state::{FanoutSink, LifecycleController, MemorySink, TracingSink};
use thiserror::Error;

/// Error building [`AppConfig`] from the environment.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `ADMIN_PRINCIPAL` is unset or null.
    #[error("ADMIN_PRINCIPAL must be set to a non-null principal")]
    MissingAdministrator,
    /// `PORT` is not a valid port number.
    #[error("PORT is not a valid port number: {0:?}")]
    InvalidPort(String),
    /// `LOG_FORMAT` is neither `text` nor `json`.
    #[error("LOG_FORMAT must be \"text\" or \"json\", got {0:?}")]
    InvalidLogFormat(String),
}

/// Log output format for the server binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event, for log shippers.
    Json,
}

/// Application configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Shared bearer token. If `None`, the bearer gate is disabled.
    pub auth_token: Option<String>,
    /// Registry administrator.
    pub administrator: Principal,
    /// Log output format.
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("administrator", &self.administrator)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    /// A config for `administrator` with the default port and no bearer gate.
    pub fn new(administrator: Principal) -> Self {
        Self {
            port: 8080,
            auth_token: None,
            administrator,
            log_format: LogFormat::Text,
        }
    }

    /// Read `PORT`, `AUTH_TOKEN`, `ADMIN_PRINCIPAL`, and `LOG_FORMAT` from
    /// the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let administrator = lookup("ADMIN_PRINCIPAL")
            .map(|v| Principal::new(v.trim()))
            .filter(|p| !p.is_null())
            .ok_or(ConfigError::MissingAdministrator)?;
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 8080,
        };
        let auth_token = lookup("AUTH_TOKEN").filter(|t| !t.is_empty());
        let log_format = match lookup("LOG_FORMAT") {
            None => LogFormat::Text,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "" | "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => return Err(ConfigError::InvalidLogFormat(raw)),
            },
        };
        Ok(Self {
            port,
            auth_token,
            administrator,
            log_format,
        })
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The credential lifecycle controller.
    pub controller: Arc<LifecycleController>,
    /// Ordered log of every lifecycle notification, served at `/v1/events`.
    pub events: Arc<MemorySink>,
    /// Application configuration.
    pub config: AppConfig,
}

impl AppState {
    /// A fresh, empty registry administered by `config.administrator`.
    ///
    /// Notifications go to both the tracing log and the event feed.
    pub fn new(config: AppConfig) -> Self {
        let events = Arc::new(MemorySink::new());
        let sink = FanoutSink::new()
            .with(Arc::new(TracingSink))
            .with(events.clone());
        let controller = LifecycleController::builder(config.administrator.clone())
            .sink(Arc::new(sink))
            .build();
        Self::with_controller(config, Arc::new(controller), events)
    }

    /// Wrap an existing controller. `events` should be one of the sinks the
    /// controller delivers to.
    pub fn with_controller(
        config: AppConfig,
        controller: Arc<LifecycleController>,
        events: Arc<MemorySink>,
    ) -> Self {
        Self {
            controller,
            events,
            config,
        }
    }
}
