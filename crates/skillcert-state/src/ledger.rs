//! # Ownership Ledger
//!
//! The ledger that tracks who holds each credential object lives outside
//! this crate. The lifecycle controller touches it exactly once per
//! credential, at mint, to register the initial holder. Transfers are the
//! ledger's own business.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use skillcert_core::{CredentialId, Principal};

use crate::error::LedgerError;

/// Seam to the external ownership ledger.
pub trait OwnershipLedger: Send + Sync {
    /// Register `holder` as the initial owner of `id`.
    fn assign(&self, holder: &Principal, id: CredentialId) -> Result<(), LedgerError>;

    /// Current owner of `id`, if the ledger knows it.
    fn owner_of(&self, id: CredentialId) -> Option<Principal>;
}

/// In-memory ledger. Refuses to assign the same credential twice.
#[derive(Debug, Default)]
pub struct MemoryOwnershipLedger {
    owners: RwLock<BTreeMap<CredentialId, Principal>>,
}

impl MemoryOwnershipLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted `(credential, owner)` pairs.
    pub fn from_owners(owners: impl IntoIterator<Item = (CredentialId, Principal)>) -> Self {
        Self {
            owners: RwLock::new(owners.into_iter().collect()),
        }
    }

    /// All `(credential, owner)` pairs, ordered by credential.
    pub fn owners(&self) -> Vec<(CredentialId, Principal)> {
        self.owners
            .read()
            .iter()
            .map(|(id, owner)| (*id, owner.clone()))
            .collect()
    }
}

impl OwnershipLedger for MemoryOwnershipLedger {
    fn assign(&self, holder: &Principal, id: CredentialId) -> Result<(), LedgerError> {
        let mut owners = self.owners.write();
        if let Some(owner) = owners.get(&id) {
            return Err(LedgerError::AlreadyAssigned {
                id,
                owner: owner.clone(),
            });
        }
        owners.insert(id, holder.clone());
        Ok(())
    }

    fn owner_of(&self, id: CredentialId) -> Option<Principal> {
        self.owners.read().get(&id).cloned()
    }
}

impl<L: OwnershipLedger + ?Sized> OwnershipLedger for std::sync::Arc<L> {
    fn assign(&self, holder: &Principal, id: CredentialId) -> Result<(), LedgerError> {
        (**self).assign(holder, id)
    }

    fn owner_of(&self, id: CredentialId) -> Option<Principal> {
        (**self).owner_of(id)
    }
}
