//! # Notifications
//!
//! Fire-and-forget events emitted by the lifecycle controller after each
//! successful mutation. Sinks are invoked while the controller still holds
//! its write lock, so a reader never observes a mutation whose notification
//! has not been delivered.
//!
//! Sinks must therefore be fast and must not call back into the controller.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use skillcert_core::{CredentialId, Principal};

/// A lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    /// An issuer was authorized by the administrator.
    InstitutionAuthorized {
        /// The authorized issuer.
        issuer: Principal,
        /// Institution display name.
        label: String,
    },
    /// An issuer's authorization was revoked.
    InstitutionRevoked {
        /// The revoked issuer.
        issuer: Principal,
    },
    /// A credential was minted.
    CertificateMinted {
        /// New credential identifier.
        id: CredentialId,
        /// Recipient.
        holder: Principal,
        /// Minting issuer.
        issuer: Principal,
        /// Attested skill.
        skill_name: String,
    },
    /// A credential was revoked.
    CertificateRevoked {
        /// The revoked credential.
        id: CredentialId,
        /// Reason given by the revoker.
        reason: String,
    },
}

impl Notification {
    /// Event name, matching the serialized `event` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InstitutionAuthorized { .. } => "institution_authorized",
            Self::InstitutionRevoked { .. } => "institution_revoked",
            Self::CertificateMinted { .. } => "certificate_minted",
            Self::CertificateRevoked { .. } => "certificate_revoked",
        }
    }
}

/// Destination for lifecycle notifications.
pub trait NotificationSink: Send + Sync {
    /// Deliver one notification.
    fn emit(&self, notification: &Notification);
}

/// Logs every notification as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn emit(&self, notification: &Notification) {
        match notification {
            Notification::InstitutionAuthorized { issuer, label } => {
                tracing::info!(event = notification.name(), %issuer, %label, "institution authorized");
            }
            Notification::InstitutionRevoked { issuer } => {
                tracing::info!(event = notification.name(), %issuer, "institution revoked");
            }
            Notification::CertificateMinted {
                id,
                holder,
                issuer,
                skill_name,
            } => {
                tracing::info!(
                    event = notification.name(),
                    credential_id = %id,
                    %holder,
                    %issuer,
                    %skill_name,
                    "certificate minted"
                );
            }
            Notification::CertificateRevoked { id, reason } => {
                tracing::info!(event = notification.name(), credential_id = %id, %reason, "certificate revoked");
            }
        }
    }
}

/// Keeps every notification in delivery order.
#[derive(Debug, Default)]
pub struct MemorySink {
    log: Mutex<Vec<Notification>>,
}

impl MemorySink {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notification delivered so far.
    pub fn events(&self) -> Vec<Notification> {
        self.log.lock().clone()
    }

    /// Notifications delivered after the first `offset`.
    pub fn since(&self, offset: usize) -> Vec<Notification> {
        self.log.lock().iter().skip(offset).cloned().collect()
    }

    /// Number of notifications delivered.
    pub fn len(&self) -> usize {
        self.log.lock().len()
    }

    /// Whether nothing has been delivered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for MemorySink {
    fn emit(&self, notification: &Notification) {
        self.log.lock().push(notification.clone());
    }
}

/// Delivers each notification to several sinks, in order.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl FanoutSink {
    /// A fan-out with no targets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target sink.
    pub fn with(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl std::fmt::Debug for FanoutSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl NotificationSink for FanoutSink {
    fn emit(&self, notification: &Notification) {
        for sink in &self.sinks {
            sink.emit(notification);
        }
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for Arc<S> {
    fn emit(&self, notification: &Notification) {
        (**self).emit(notification);
    }
}
