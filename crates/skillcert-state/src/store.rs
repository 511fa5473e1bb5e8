//! # Credential Store and Holder Index
//!
//! [`CredentialStore`] is the seam to the durable record store. The
//! lifecycle controller owns exactly one store and serializes all access to
//! it behind its own lock, so implementations need no interior locking.
//!
//! [`HolderIndex`] maps each holder to the credentials they received, in
//! mint order. It is append-only: revocation never removes an entry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use skillcert_core::{CredentialId, Principal};

use crate::credential::CredentialRecord;

/// Keyed storage for credential records.
///
/// There is no delete: a record lives from mint until teardown.
pub trait CredentialStore: Send + Sync + std::fmt::Debug {
    /// Insert or overwrite the record stored under `record.id`.
    fn put(&mut self, record: CredentialRecord);

    /// Fetch a record by identifier.
    fn get(&self, id: CredentialId) -> Option<CredentialRecord>;

    /// Whether a record exists for `id`.
    fn exists(&self, id: CredentialId) -> bool {
        self.get(id).is_some()
    }

    /// Number of stored records.
    fn len(&self) -> usize;

    /// Whether the store holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every record, ordered by identifier.
    fn records(&self) -> Vec<CredentialRecord>;
}

/// In-memory [`CredentialStore`] ordered by identifier.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    records: BTreeMap<CredentialId, CredentialRecord>,
}

impl MemoryCredentialStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn put(&mut self, record: CredentialRecord) {
        self.records.insert(record.id, record);
    }

    fn get(&self, id: CredentialId) -> Option<CredentialRecord> {
        self.records.get(&id).cloned()
    }

    fn exists(&self, id: CredentialId) -> bool {
        self.records.contains_key(&id)
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn records(&self) -> Vec<CredentialRecord> {
        self.records.values().cloned().collect()
    }
}

/// One holder's portfolio, as persisted in snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderEntry {
    /// The holder.
    pub holder: Principal,
    /// Credentials received, in mint order.
    pub credentials: Vec<CredentialId>,
}

/// Append-only index from holder to credential identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolderIndex {
    portfolios: BTreeMap<Principal, Vec<CredentialId>>,
}

impl HolderIndex {
    /// An empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `holder` received `id`.
    pub fn append(&mut self, holder: &Principal, id: CredentialId) {
        self.portfolios.entry(holder.clone()).or_default().push(id);
    }

    /// The holder's credentials in mint order. Empty for unknown holders.
    pub fn credentials_of(&self, holder: &Principal) -> &[CredentialId] {
        self.portfolios.get(holder).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Persisted form, ordered by holder.
    pub fn entries(&self) -> Vec<HolderEntry> {
        self.portfolios
            .iter()
            .map(|(holder, ids)| HolderEntry {
                holder: holder.clone(),
                credentials: ids.clone(),
            })
            .collect()
    }

    pub(crate) fn from_entries(entries: Vec<HolderEntry>) -> Self {
        let mut index = Self::new();
        for entry in entries {
            index
                .portfolios
                .entry(entry.holder)
                .or_default()
                .extend(entry.credentials);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillcert_core::{SkillLevel, Timestamp};

    fn record(id: u64) -> CredentialRecord {
        let issued = Timestamp::from_epoch_secs(0).unwrap();
        CredentialRecord {
            id: CredentialId::new(id),
            skill_name: "Rust".into(),
            issuer_label: "Acme Academy".into(),
            holder: Principal::new("holder"),
            issuer: Principal::new("acme"),
            issued_at: issued,
            expires_at: Timestamp::from_epoch_secs(100).unwrap(),
            level: SkillLevel::Beginner,
            active: true,
            revoked_at: None,
            revocation_reason: None,
        }
    }

    #[test]
    fn put_get_exists() {
        let mut store = MemoryCredentialStore::new();
        assert!(store.is_empty());
        assert!(!store.exists(CredentialId::new(1)));
        store.put(record(1));
        assert!(store.exists(CredentialId::new(1)));
        assert_eq!(store.get(CredentialId::new(1)), Some(record(1)));
        assert_eq!(store.get(CredentialId::new(2)), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn put_overwrites_same_id() {
        let mut store = MemoryCredentialStore::new();
        store.put(record(1));
        let mut revoked = record(1);
        revoked.active = false;
        store.put(revoked);
        assert_eq!(store.len(), 1);
        assert!(!store.get(CredentialId::new(1)).unwrap().active);
    }

    #[test]
    fn records_are_ordered_by_id() {
        let mut store = MemoryCredentialStore::new();
        for id in [3, 1, 2] {
            store.put(record(id));
        }
        let ids: Vec<u64> = store.records().iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn holder_index_preserves_order() {
        let mut index = HolderIndex::new();
        let h = Principal::new("h");
        index.append(&h, CredentialId::new(5));
        index.append(&Principal::new("other"), CredentialId::new(6));
        index.append(&h, CredentialId::new(7));
        assert_eq!(
            index.credentials_of(&h),
            &[CredentialId::new(5), CredentialId::new(7)]
        );
    }

    #[test]
    fn unknown_holder_has_empty_portfolio() {
        let index = HolderIndex::new();
        assert!(index.credentials_of(&Principal::new("nobody")).is_empty());
    }

    #[test]
    fn entries_roundtrip_through_from_entries() {
        let mut index = HolderIndex::new();
        index.append(&Principal::new("a"), CredentialId::new(1));
        index.append(&Principal::new("b"), CredentialId::new(2));
        index.append(&Principal::new("a"), CredentialId::new(3));
        let rebuilt = HolderIndex::from_entries(index.entries());
        assert_eq!(rebuilt, index);
    }
}
