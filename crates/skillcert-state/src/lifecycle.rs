//! # Lifecycle Controller
//!
//! Orchestrates issuer authorization, mint, verification, and revocation
//! over the allocator, registry, store, holder index, and ownership ledger.
//!
//! ## Credential lifecycle
//!
//! ```text
//!   mint ──▶ ACTIVE ──revoke_credential──▶ REVOKED (terminal)
//! ```
//!
//! Validity is not a stored state. `verify` recomputes it on every call from
//! the active flag, the clock, and the issuer's *current* authorization, so a
//! credential turns invalid when its issuer is deauthorized or its expiry
//! passes, without any write to the record.
//!
//! ## Concurrency
//!
//! All owned state sits behind one `RwLock`. Mutations hold the write lock
//! from precondition checks through notification delivery; queries hold the
//! read lock. A reader therefore sees each mutation entirely or not at all.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use skillcert_core::{Clock, CredentialId, Principal, SystemClock, Timestamp};

use crate::allocator::IdAllocator;
use crate::credential::{CredentialRecord, MintRequest, Verification};
use crate::error::{CredentialError, SnapshotError};
use crate::ledger::{MemoryOwnershipLedger, OwnershipLedger};
use crate::notify::{Notification, NotificationSink, TracingSink};
use crate::registry::{AuthorizationRegistry, IssuerEntry};
use crate::snapshot::{self, LedgerSnapshot};
use crate::store::{CredentialStore, HolderIndex, MemoryCredentialStore};

/// State serialized behind the controller's lock.
#[derive(Debug)]
struct LedgerState {
    allocator: IdAllocator,
    registry: AuthorizationRegistry,
    store: Box<dyn CredentialStore>,
    holders: HolderIndex,
}

/// The credential lifecycle state machine.
pub struct LifecycleController {
    administrator: Principal,
    state: RwLock<LedgerState>,
    ledger: Arc<dyn OwnershipLedger>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for LifecycleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleController")
            .field("administrator", &self.administrator)
            .field("credentials", &self.state.read().store.len())
            .finish_non_exhaustive()
    }
}

// ─── Builder ─────────────────────────────────────────────────────────

/// Assembles a [`LifecycleController`] from its collaborators.
///
/// Defaults: in-memory store and ledger, [`TracingSink`], [`SystemClock`].
pub struct ControllerBuilder {
    administrator: Principal,
    store: Box<dyn CredentialStore>,
    ledger: Arc<dyn OwnershipLedger>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl ControllerBuilder {
    /// Use `store` as the credential store.
    ///
    /// [`build`](Self::build) resumes allocation past the highest identifier
    /// the store already holds and rebuilds the holder index from its
    /// records. [`restore`](Self::restore) rejects a store holding records
    /// the snapshot does not know about.
    pub fn store(mut self, store: impl CredentialStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    /// Use `ledger` as the ownership ledger.
    pub fn ledger(mut self, ledger: Arc<dyn OwnershipLedger>) -> Self {
        self.ledger = ledger;
        self
    }

    /// Deliver notifications to `sink`.
    pub fn sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Read time from `clock`.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build a controller with no authorized issuers over the configured store.
    pub fn build(self) -> LifecycleController {
        let mut existing = self.store.records();
        existing.sort_by_key(|r| r.id);
        let mut holders = HolderIndex::new();
        for record in &existing {
            holders.append(&record.holder, record.id);
        }
        let allocator = match existing.last() {
            Some(last) => {
                IdAllocator::resume(last.id.get().checked_add(1).map(CredentialId::new))
            }
            None => IdAllocator::new(),
        };
        if !existing.is_empty() {
            tracing::debug!(
                credentials = existing.len(),
                next_id = ?allocator.peek(),
                "resuming over a non-empty credential store"
            );
        }
        LifecycleController {
            administrator: self.administrator,
            state: RwLock::new(LedgerState {
                allocator,
                registry: AuthorizationRegistry::new(),
                store: self.store,
                holders,
            }),
            ledger: self.ledger,
            sink: self.sink,
            clock: self.clock,
        }
    }

    /// Build a controller pre-loaded with `snapshot`.
    ///
    /// The snapshot's administrator replaces the one given to
    /// [`LifecycleController::builder`]. The ledger is not touched: it is
    /// expected to already hold the snapshot's ownership records.
    pub fn restore(self, snapshot: LedgerSnapshot) -> Result<LifecycleController, SnapshotError> {
        let restored = snapshot::validate(snapshot)?;
        let known: HashSet<CredentialId> = restored.credentials.iter().map(|r| r.id).collect();
        if let Some(stray) = self.store.records().into_iter().find(|r| !known.contains(&r.id)) {
            return Err(SnapshotError::StoreConflict(stray.id));
        }
        let mut store = self.store;
        for record in restored.credentials {
            store.put(record);
        }
        tracing::debug!(
            administrator = %restored.administrator,
            credentials = store.len(),
            "restored lifecycle controller from snapshot"
        );
        Ok(LifecycleController {
            administrator: restored.administrator,
            state: RwLock::new(LedgerState {
                allocator: restored.allocator,
                registry: restored.registry,
                store,
                holders: restored.holders,
            }),
            ledger: self.ledger,
            sink: self.sink,
            clock: self.clock,
        })
    }
}

// ─── Controller ──────────────────────────────────────────────────────

impl LifecycleController {
    /// Start building a controller administered by `administrator`.
    pub fn builder(administrator: Principal) -> ControllerBuilder {
        ControllerBuilder {
            administrator,
            store: Box::new(MemoryCredentialStore::new()),
            ledger: Arc::new(MemoryOwnershipLedger::new()),
            sink: Arc::new(TracingSink),
            clock: Arc::new(SystemClock),
        }
    }

    /// A controller with all default collaborators.
    pub fn new(administrator: Principal) -> Self {
        Self::builder(administrator).build()
    }

    /// Restore a controller with default collaborators from `snapshot`.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self, SnapshotError> {
        Self::builder(snapshot.administrator.clone()).restore(snapshot)
    }

    /// The administrator principal.
    pub fn administrator(&self) -> &Principal {
        &self.administrator
    }

    /// The current time according to the injected clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // ── Issuer authorization ────────────────────────────────────────

    /// Authorize `issuer` to mint credentials under the institution `label`.
    ///
    /// # Errors
    ///
    /// - [`CredentialError::Forbidden`] unless `caller` is the administrator.
    /// - [`CredentialError::InvalidPrincipal`] if `issuer` is null.
    /// - [`CredentialError::AlreadyAuthorized`] if `issuer` is currently authorized.
    pub fn authorize_issuer(
        &self,
        caller: &Principal,
        issuer: &Principal,
        label: &str,
    ) -> Result<(), CredentialError> {
        self.require_administrator(caller, "authorize issuers")?;
        let mut state = self.state.write();
        let now = self.clock.now();
        state
            .registry
            .authorize(issuer, label, now)
            .map_err(|e| {
                tracing::warn!(%issuer, error = %e, "issuer authorization rejected");
                e
            })?;
        self.sink.emit(&Notification::InstitutionAuthorized {
            issuer: issuer.clone(),
            label: label.to_string(),
        });
        Ok(())
    }

    /// Withdraw `issuer`'s authorization.
    ///
    /// Credentials it already minted stay in the store untouched and start
    /// failing verification immediately.
    ///
    /// # Errors
    ///
    /// - [`CredentialError::Forbidden`] unless `caller` is the administrator.
    /// - [`CredentialError::NotAuthorized`] if `issuer` is not currently authorized.
    pub fn revoke_issuer(&self, caller: &Principal, issuer: &Principal) -> Result<(), CredentialError> {
        self.require_administrator(caller, "revoke issuers")?;
        let mut state = self.state.write();
        let now = self.clock.now();
        state
            .registry
            .revoke(issuer, now)
            .map_err(|e| {
                tracing::warn!(%issuer, error = %e, "issuer revocation rejected");
                e
            })?;
        self.sink.emit(&Notification::InstitutionRevoked {
            issuer: issuer.clone(),
        });
        Ok(())
    }

    /// Whether `issuer` may currently mint.
    pub fn is_authorized(&self, issuer: &Principal) -> bool {
        self.state.read().registry.is_authorized(issuer)
    }

    /// The institution label `issuer` was last authorized under.
    pub fn institution_label(&self, issuer: &Principal) -> Option<String> {
        self.state.read().registry.label(issuer).map(str::to_string)
    }

    /// Registry entry for `issuer`, if it was ever authorized.
    pub fn issuer(&self, issuer: &Principal) -> Option<IssuerEntry> {
        self.state.read().registry.entry(issuer).cloned()
    }

    /// Every issuer ever authorized, ordered by principal.
    pub fn issuers(&self) -> Vec<IssuerEntry> {
        self.state.read().registry.entries().cloned().collect()
    }

    // ── Mint ────────────────────────────────────────────────────────

    /// Mint a credential from `caller` to `request.holder`.
    ///
    /// Preconditions are checked in order, each with its own error:
    /// caller authorized, holder non-null, skill name non-empty, validity
    /// positive. The ownership ledger is the only step that can fail after
    /// that; it runs before any local write and before the allocator moves,
    /// so a failed mint leaves no trace.
    pub fn mint(&self, caller: &Principal, request: MintRequest) -> Result<CredentialId, CredentialError> {
        let mut state = self.state.write();

        if !state.registry.is_authorized(caller) {
            tracing::warn!(%caller, "mint rejected: caller is not an authorized issuer");
            return Err(CredentialError::NotAuthorizedIssuer(caller.clone()));
        }
        if request.holder.is_null() {
            return Err(CredentialError::InvalidHolder(request.holder));
        }
        if request.skill_name.trim().is_empty() {
            return Err(CredentialError::EmptySkillName);
        }
        let invalid_period = CredentialError::InvalidValidityPeriod {
            secs: request.validity.as_secs(),
        };
        if !request.validity.is_positive() {
            return Err(invalid_period);
        }
        let issued_at = self.clock.now();
        let expires_at = issued_at.checked_add(request.validity).ok_or(invalid_period)?;

        let id = state
            .allocator
            .peek()
            .ok_or(CredentialError::IdentifierSpaceExhausted)?;
        if state.store.exists(id) {
            tracing::error!(credential_id = %id, "allocator produced an identifier already in the store");
            return Err(CredentialError::IdentifierInUse(id));
        }
        self.ledger.assign(&request.holder, id).map_err(|e| {
            tracing::error!(credential_id = %id, holder = %request.holder, error = %e, "ownership ledger refused assignment");
            e
        })?;
        state.allocator.next();

        let record = CredentialRecord {
            id,
            skill_name: request.skill_name,
            issuer_label: request.issuer_label,
            holder: request.holder,
            issuer: caller.clone(),
            issued_at,
            expires_at,
            level: request.level,
            active: true,
            revoked_at: None,
            revocation_reason: None,
        };
        state.holders.append(&record.holder, id);
        let notification = Notification::CertificateMinted {
            id,
            holder: record.holder.clone(),
            issuer: record.issuer.clone(),
            skill_name: record.skill_name.clone(),
        };
        state.store.put(record);
        self.sink.emit(&notification);
        Ok(id)
    }

    // ── Verification ────────────────────────────────────────────────

    /// Compute live validity of credential `id`.
    ///
    /// Side-effect free. Reads the clock once.
    ///
    /// # Errors
    ///
    /// [`CredentialError::NotFound`] if no such credential exists.
    pub fn verify(&self, id: CredentialId) -> Result<Verification, CredentialError> {
        let state = self.state.read();
        let record = state.store.get(id).ok_or(CredentialError::NotFound(id))?;
        let now = self.clock.now();
        let is_valid = record.is_valid_at(now, state.registry.is_authorized(&record.issuer));
        tracing::debug!(credential_id = %id, is_valid, "verified credential");
        Ok(Verification {
            is_valid,
            record,
            checked_at: now,
        })
    }

    /// Whether credential `id` is past its expiry, regardless of the
    /// active flag or issuer authorization.
    pub fn is_expired(&self, id: CredentialId) -> Result<bool, CredentialError> {
        let state = self.state.read();
        let record = state.store.get(id).ok_or(CredentialError::NotFound(id))?;
        Ok(record.is_expired_at(self.clock.now()))
    }

    // ── Revocation ──────────────────────────────────────────────────

    /// Revoke credential `id`. One-way: there is no un-revoke.
    ///
    /// # Errors
    ///
    /// - [`CredentialError::NotFound`] if no such credential exists.
    /// - [`CredentialError::Forbidden`] unless `caller` is the credential's
    ///   issuer or the administrator.
    /// - [`CredentialError::AlreadyRevoked`] if it was already revoked.
    pub fn revoke_credential(
        &self,
        caller: &Principal,
        id: CredentialId,
        reason: &str,
    ) -> Result<(), CredentialError> {
        let mut state = self.state.write();
        let mut record = state.store.get(id).ok_or(CredentialError::NotFound(id))?;
        if *caller != record.issuer && *caller != self.administrator {
            tracing::warn!(%caller, credential_id = %id, "credential revocation forbidden");
            return Err(CredentialError::Forbidden {
                caller: caller.clone(),
                action: "revoke this credential",
            });
        }
        if !record.active {
            return Err(CredentialError::AlreadyRevoked(id));
        }
        record.active = false;
        record.revoked_at = Some(self.clock.now());
        record.revocation_reason = Some(reason.to_string());
        state.store.put(record);
        self.sink.emit(&Notification::CertificateRevoked {
            id,
            reason: reason.to_string(),
        });
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// The stored record for `id`, without computing validity.
    pub fn credential(&self, id: CredentialId) -> Result<CredentialRecord, CredentialError> {
        self.state
            .read()
            .store
            .get(id)
            .ok_or(CredentialError::NotFound(id))
    }

    /// Credentials `holder` has received, in mint order, revoked ones included.
    pub fn holder_credentials(&self, holder: &Principal) -> Vec<CredentialId> {
        self.state.read().holders.credentials_of(holder).to_vec()
    }

    /// Number of credentials ever minted.
    pub fn credential_count(&self) -> usize {
        self.state.read().store.len()
    }

    /// Current owner of credential `id` according to the ownership ledger.
    pub fn owner_of(&self, id: CredentialId) -> Option<Principal> {
        self.ledger.owner_of(id)
    }

    /// Point-in-time image of the controller's state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let state = self.state.read();
        LedgerSnapshot {
            administrator: self.administrator.clone(),
            next_credential_id: state.allocator.peek(),
            issuers: state.registry.entries().cloned().collect(),
            credentials: state.store.records(),
            holders: state.holders.entries(),
        }
    }

    fn require_administrator(&self, caller: &Principal, action: &'static str) -> Result<(), CredentialError> {
        if *caller == self.administrator {
            Ok(())
        } else {
            tracing::warn!(%caller, action, "administrator-only action rejected");
            Err(CredentialError::Forbidden {
                caller: caller.clone(),
                action,
            })
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
