//! # Lifecycle Errors
//!
//! Every failure the lifecycle controller can report. All of them are
//! precondition violations detected before any mutation, so an `Err` always
//! means "nothing happened".

use skillcert_core::{CredentialId, Principal};
use thiserror::Error;

/// Errors from issuer authorization, mint, revocation, and lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    // ── Authorization registry ──────────────────────────────────────
    /// The issuer identity is null or blank.
    #[error("invalid principal: {0:?}")]
    InvalidPrincipal(Principal),

    /// The issuer is already authorized.
    #[error("issuer {0} is already authorized")]
    AlreadyAuthorized(Principal),

    /// The issuer is not currently authorized, so it cannot be revoked.
    #[error("issuer {0} is not authorized")]
    NotAuthorized(Principal),

    // ── Mint preconditions ──────────────────────────────────────────
    /// The caller attempting to mint is not an authorized issuer.
    #[error("caller {0} is not an authorized issuer")]
    NotAuthorizedIssuer(Principal),

    /// The credential holder is null or blank.
    #[error("invalid holder: {0:?}")]
    InvalidHolder(Principal),

    /// The skill name is empty.
    #[error("skill name must not be empty")]
    EmptySkillName,

    /// The validity period is zero, or pushes expiry past the representable range.
    #[error("invalid validity period: {secs} seconds")]
    InvalidValidityPeriod {
        /// The rejected period, in seconds.
        secs: u64,
    },

    // ── Revocation / lookup ─────────────────────────────────────────
    /// No credential exists with this identifier.
    #[error("credential {0} not found")]
    NotFound(CredentialId),

    /// The caller is not permitted to perform this action.
    #[error("{caller} is not permitted to {action}")]
    Forbidden {
        /// The rejected caller.
        caller: Principal,
        /// What the caller attempted.
        action: &'static str,
    },

    /// The credential has already been revoked.
    #[error("credential {0} is already revoked")]
    AlreadyRevoked(CredentialId),

    // ── Collaborators ───────────────────────────────────────────────
    /// Every credential identifier has been handed out.
    #[error("credential identifier space exhausted")]
    IdentifierSpaceExhausted,

    /// The allocator produced an identifier the store already holds.
    #[error("credential identifier {0} is already in use")]
    IdentifierInUse(CredentialId),

    /// The ownership ledger refused the initial assignment.
    #[error("ownership ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl CredentialError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPrincipal(_) => "INVALID_PRINCIPAL",
            Self::AlreadyAuthorized(_) => "ALREADY_AUTHORIZED",
            Self::NotAuthorized(_) => "NOT_AUTHORIZED",
            Self::NotAuthorizedIssuer(_) => "NOT_AUTHORIZED_ISSUER",
            Self::InvalidHolder(_) => "INVALID_HOLDER",
            Self::EmptySkillName => "EMPTY_SKILL_NAME",
            Self::InvalidValidityPeriod { .. } => "INVALID_VALIDITY_PERIOD",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::AlreadyRevoked(_) => "ALREADY_REVOKED",
            Self::IdentifierSpaceExhausted => "IDENTIFIER_SPACE_EXHAUSTED",
            Self::IdentifierInUse(_) => "IDENTIFIER_IN_USE",
            Self::Ledger(_) => "LEDGER_ERROR",
        }
    }
}

/// Errors reported by an [`OwnershipLedger`](crate::ledger::OwnershipLedger).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The credential object already has an owner.
    #[error("credential {id} is already owned by {owner}")]
    AlreadyAssigned {
        /// The credential being assigned.
        id: CredentialId,
        /// Its existing owner.
        owner: Principal,
    },

    /// The ledger could not be reached or refused the write.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

/// Errors restoring a controller from a [`LedgerSnapshot`](crate::snapshot::LedgerSnapshot).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// The administrator principal is null.
    #[error("snapshot administrator is null")]
    NullAdministrator,

    /// An issuer appears more than once.
    #[error("issuer {0} appears more than once")]
    DuplicateIssuer(Principal),

    /// A credential identifier appears more than once.
    #[error("credential {0} appears more than once")]
    DuplicateCredential(CredentialId),

    /// A stored credential is not strictly below the allocator cursor.
    #[error("credential {id} is not below the allocator cursor {cursor:?}")]
    AllocatorBehind {
        /// The offending credential.
        id: CredentialId,
        /// The snapshot's next identifier (`None` when exhausted).
        cursor: Option<CredentialId>,
    },

    /// A credential carries the reserved identifier 0.
    #[error("credential identifier 0 is reserved")]
    ZeroCredentialId,

    /// A credential has an empty skill name.
    #[error("credential {0} has an empty skill name")]
    EmptySkillName(CredentialId),

    /// A credential's revocation fields disagree with its active flag.
    #[error("credential {0} has revocation fields inconsistent with its active flag")]
    InconsistentRevocation(CredentialId),

    /// The injected store holds a credential the snapshot does not.
    #[error("credential store already holds credential {0}, which the snapshot does not")]
    StoreConflict(CredentialId),

    /// A credential expires at or before it was issued.
    #[error("credential {0} does not expire after issuance")]
    InvalidExpiry(CredentialId),

    /// The holder index disagrees with the stored records.
    #[error("holder index inconsistent: {0}")]
    InconsistentHolderIndex(String),
}
