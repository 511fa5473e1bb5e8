//! # Authorization Registry
//!
//! Tracks which issuer identities may mint credentials, and under which
//! institution label they were authorized.
//!
//! ```text
//!   (unknown) ──authorize──▶ AUTHORIZED ──revoke──▶ REVOKED
//!                               ▲                      │
//!                               └──────authorize───────┘
//! ```
//!
//! Entries are never deleted. Revoking an issuer only flips its flag; the
//! credentials it already minted are untouched and become invalid through
//! the live authorization check in `verify`.
//!
//! Administrator gating happens in the lifecycle controller. The registry
//! itself enforces only the per-issuer preconditions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use skillcert_core::{Principal, Timestamp};

use crate::error::CredentialError;

/// Authorization state of one issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerEntry {
    /// The issuing principal.
    pub issuer: Principal,
    /// Institution display name given at the most recent authorization.
    pub label: String,
    /// Whether the issuer may currently mint.
    pub authorized: bool,
    /// When the issuer was most recently authorized.
    pub authorized_at: Timestamp,
    /// When the issuer was most recently revoked, if ever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<Timestamp>,
}

/// Registry of issuer authorization flags.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationRegistry {
    entries: BTreeMap<Principal, IssuerEntry>,
}

impl AuthorizationRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Authorize `issuer` under `label`.
    ///
    /// Re-authorizing a revoked issuer is allowed and replaces its label.
    ///
    /// # Errors
    ///
    /// - [`CredentialError::InvalidPrincipal`] if `issuer` is null.
    /// - [`CredentialError::AlreadyAuthorized`] if `issuer` is currently authorized.
    pub fn authorize(
        &mut self,
        issuer: &Principal,
        label: &str,
        at: Timestamp,
    ) -> Result<(), CredentialError> {
        if issuer.is_null() {
            return Err(CredentialError::InvalidPrincipal(issuer.clone()));
        }
        if self.is_authorized(issuer) {
            return Err(CredentialError::AlreadyAuthorized(issuer.clone()));
        }
        self.entries.insert(
            issuer.clone(),
            IssuerEntry {
                issuer: issuer.clone(),
                label: label.to_string(),
                authorized: true,
                authorized_at: at,
                revoked_at: None,
            },
        );
        Ok(())
    }

    /// Revoke `issuer`'s authorization.
    ///
    /// # Errors
    ///
    /// [`CredentialError::NotAuthorized`] if `issuer` was never authorized or
    /// is already revoked.
    pub fn revoke(&mut self, issuer: &Principal, at: Timestamp) -> Result<(), CredentialError> {
        match self.entries.get_mut(issuer) {
            Some(entry) if entry.authorized => {
                entry.authorized = false;
                entry.revoked_at = Some(at);
                Ok(())
            }
            _ => Err(CredentialError::NotAuthorized(issuer.clone())),
        }
    }

    /// Whether `issuer` may currently mint.
    pub fn is_authorized(&self, issuer: &Principal) -> bool {
        self.entries.get(issuer).is_some_and(|e| e.authorized)
    }

    /// The label `issuer` was last authorized under, revoked or not.
    pub fn label(&self, issuer: &Principal) -> Option<&str> {
        self.entries.get(issuer).map(|e| e.label.as_str())
    }

    /// Look up an issuer's full entry.
    pub fn entry(&self, issuer: &Principal) -> Option<&IssuerEntry> {
        self.entries.get(issuer)
    }

    /// All known issuers, ordered by principal.
    pub fn entries(&self) -> impl Iterator<Item = &IssuerEntry> {
        self.entries.values()
    }

    /// Rebuild from persisted entries. Returns the first duplicate principal
    /// as `Err`.
    pub(crate) fn from_entries(entries: Vec<IssuerEntry>) -> Result<Self, Principal> {
        let mut map = BTreeMap::new();
        for entry in entries {
            let issuer = entry.issuer.clone();
            if map.insert(issuer.clone(), entry).is_some() {
                return Err(issuer);
            }
        }
        Ok(Self { entries: map })
    }
}
