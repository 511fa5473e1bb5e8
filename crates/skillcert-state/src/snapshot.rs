//! # Ledger Snapshots
//!
//! Serializable image of everything the lifecycle controller owns: the
//! administrator, allocator cursor, issuer registry, credential records, and
//! holder index. Used by the CLI to persist state between invocations.
//!
//! Restoring validates the image so that a hand-edited file cannot break
//! identifier uniqueness or the holder index.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use skillcert_core::{CredentialId, Principal};

use crate::allocator::IdAllocator;
use crate::credential::CredentialRecord;
use crate::error::SnapshotError;
use crate::registry::{AuthorizationRegistry, IssuerEntry};
use crate::store::{HolderEntry, HolderIndex};

/// Point-in-time image of a controller's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// The administrator principal.
    pub administrator: Principal,
    /// Identifier the allocator hands out next. `None` once exhausted.
    pub next_credential_id: Option<CredentialId>,
    /// Every issuer ever authorized.
    pub issuers: Vec<IssuerEntry>,
    /// Every credential record, ordered by identifier.
    pub credentials: Vec<CredentialRecord>,
    /// Holder portfolios.
    pub holders: Vec<HolderEntry>,
}

impl LedgerSnapshot {
    /// An empty ledger administered by `administrator`.
    pub fn empty(administrator: Principal) -> Self {
        Self {
            administrator,
            next_credential_id: IdAllocator::new().peek(),
            issuers: Vec::new(),
            credentials: Vec::new(),
            holders: Vec::new(),
        }
    }
}

/// Validated pieces of a snapshot, ready to be installed in a controller.
pub(crate) struct RestoredState {
    pub administrator: Principal,
    pub allocator: IdAllocator,
    pub registry: AuthorizationRegistry,
    pub credentials: Vec<CredentialRecord>,
    pub holders: HolderIndex,
}

/// Check a snapshot's internal consistency and split it into parts.
pub(crate) fn validate(snapshot: LedgerSnapshot) -> Result<RestoredState, SnapshotError> {
    if snapshot.administrator.is_null() {
        return Err(SnapshotError::NullAdministrator);
    }

    let registry =
        AuthorizationRegistry::from_entries(snapshot.issuers).map_err(SnapshotError::DuplicateIssuer)?;

    let cursor = snapshot.next_credential_id;
    let mut by_id: HashMap<CredentialId, &CredentialRecord> =
        HashMap::with_capacity(snapshot.credentials.len());
    for record in &snapshot.credentials {
        if record.id.get() == 0 {
            return Err(SnapshotError::ZeroCredentialId);
        }
        if by_id.insert(record.id, record).is_some() {
            return Err(SnapshotError::DuplicateCredential(record.id));
        }
        // An exhausted allocator has handed out every id.
        if cursor.is_some_and(|next| record.id >= next) {
            return Err(SnapshotError::AllocatorBehind {
                id: record.id,
                cursor,
            });
        }
        if record.skill_name.trim().is_empty() {
            return Err(SnapshotError::EmptySkillName(record.id));
        }
        if record.expires_at <= record.issued_at {
            return Err(SnapshotError::InvalidExpiry(record.id));
        }
        let revocation_consistent = if record.active {
            record.revoked_at.is_none() && record.revocation_reason.is_none()
        } else {
            record.revoked_at.is_some() && record.revocation_reason.is_some()
        };
        if !revocation_consistent {
            return Err(SnapshotError::InconsistentRevocation(record.id));
        }
    }

    let mut indexed = HashSet::new();
    for entry in &snapshot.holders {
        for id in &entry.credentials {
            let record = by_id.get(id).ok_or_else(|| {
                SnapshotError::InconsistentHolderIndex(format!(
                    "{} lists unknown credential {id}",
                    entry.holder
                ))
            })?;
            if record.holder != entry.holder {
                return Err(SnapshotError::InconsistentHolderIndex(format!(
                    "credential {id} is held by {}, not {}",
                    record.holder, entry.holder
                )));
            }
            if !indexed.insert(*id) {
                return Err(SnapshotError::InconsistentHolderIndex(format!(
                    "credential {id} is indexed more than once"
                )));
            }
        }
    }
    if indexed.len() != by_id.len() {
        return Err(SnapshotError::InconsistentHolderIndex(format!(
            "{} credentials stored but {} indexed",
            by_id.len(),
            indexed.len()
        )));
    }

    Ok(RestoredState {
        administrator: snapshot.administrator,
        allocator: IdAllocator::resume(cursor),
        registry,
        credentials: snapshot.credentials,
        holders: HolderIndex::from_entries(snapshot.holders),
    })
}
