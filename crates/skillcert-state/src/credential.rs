//! # Credential Records
//!
//! The stored form of a minted skill credential and the result of verifying
//! one. A record's fields are fixed at mint; only the `active` flag (and the
//! revocation metadata written alongside it) ever changes, and only once.

use serde::{Deserialize, Serialize};
use skillcert_core::{CredentialId, Principal, SkillLevel, Timestamp, ValidityPeriod};

/// A minted skill credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Allocator-assigned identifier.
    pub id: CredentialId,
    /// Name of the attested skill. Never empty.
    pub skill_name: String,
    /// Display name of the issuing institution.
    pub issuer_label: String,
    /// Recipient of the credential.
    pub holder: Principal,
    /// Principal that minted the credential.
    pub issuer: Principal,
    /// Mint time.
    pub issued_at: Timestamp,
    /// End of validity. Strictly after `issued_at`.
    pub expires_at: Timestamp,
    /// Proficiency tag.
    pub level: SkillLevel,
    /// Cleared by revocation; never set again.
    pub active: bool,
    /// When the credential was revoked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<Timestamp>,
    /// Reason given at revocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_reason: Option<String>,
}

impl CredentialRecord {
    /// Whether `now` is past the end of validity.
    ///
    /// Independent of the active flag and issuer authorization.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }

    /// Live validity: active, not expired, and the issuer still authorized.
    pub fn is_valid_at(&self, now: Timestamp, issuer_authorized: bool) -> bool {
        self.active && !self.is_expired_at(now) && issuer_authorized
    }

    /// Whether two records agree on every field fixed at mint.
    pub fn same_mint_fields(&self, other: &Self) -> bool {
        self.id == other.id
            && self.skill_name == other.skill_name
            && self.issuer_label == other.issuer_label
            && self.holder == other.holder
            && self.issuer == other.issuer
            && self.issued_at == other.issued_at
            && self.expires_at == other.expires_at
            && self.level == other.level
    }
}

/// Parameters of a mint call, apart from the calling issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRequest {
    /// Recipient of the credential.
    pub holder: Principal,
    /// Name of the attested skill.
    pub skill_name: String,
    /// Display name of the issuing institution.
    pub issuer_label: String,
    /// Proficiency tag.
    #[serde(default)]
    pub level: SkillLevel,
    /// How long the credential stays valid after mint.
    pub validity: ValidityPeriod,
}

/// Outcome of a verification: the live validity verdict and the record it
/// was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    /// `active && now <= expires_at && issuer authorized`.
    pub is_valid: bool,
    /// The credential as stored.
    pub record: CredentialRecord,
    /// The instant validity was evaluated at.
    pub checked_at: Timestamp,
}
