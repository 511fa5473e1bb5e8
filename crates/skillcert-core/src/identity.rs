//! # Identity Newtypes
//!
//! `Principal` is an opaque caller identity (issuer, holder, administrator).
//! `CredentialId` is the allocator-assigned identifier of a minted credential.
//!
//! Principals are deliberately unvalidated at construction: whether an empty
//! principal is acceptable depends on the operation (it is `InvalidPrincipal`
//! for issuer authorization but `InvalidHolder` for mint), so the check lives
//! in the lifecycle layer via [`Principal::is_null`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An opaque principal identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Wrap a principal identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the null identity.
    ///
    /// Blank strings and the all-zero account address (`0x` followed only by
    /// zeros) are null.
    pub fn is_null(&self) -> bool {
        let s = self.0.trim();
        if s.is_empty() {
            return true;
        }
        match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c == '0'),
            None => false,
        }
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Principal {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of a minted credential.
///
/// Allocated in strictly increasing order starting at 1. Zero is never a
/// valid credential id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialId(u64);

impl CredentialId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for CredentialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CredentialId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<u64>() {
            Ok(0) | Err(_) => Err(ValidationError::InvalidCredentialId(s.to_string())),
            Ok(n) => Ok(Self(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_principal_is_null() {
        assert!(Principal::new("").is_null());
        assert!(Principal::new("   ").is_null());
    }

    #[test]
    fn zero_address_is_null() {
        assert!(Principal::new("0x0000000000000000000000000000000000000000").is_null());
        assert!(Principal::new("0x0").is_null());
    }

    #[test]
    fn ordinary_principals_are_not_null() {
        assert!(!Principal::new("acme-academy").is_null());
        assert!(!Principal::new("0x00000000000000000000000000000000000000a1").is_null());
        assert!(!Principal::new("0x").is_null());
    }

    #[test]
    fn principal_serializes_as_plain_string() {
        let json = serde_json::to_string(&Principal::new("alice")).unwrap();
        assert_eq!(json, "\"alice\"");
    }

    #[test]
    fn credential_id_parses_positive_integers() {
        assert_eq!("42".parse::<CredentialId>().unwrap(), CredentialId::new(42));
        assert_eq!(" 7 ".parse::<CredentialId>().unwrap().get(), 7);
    }

    #[test]
    fn credential_id_rejects_zero_and_garbage() {
        assert!("0".parse::<CredentialId>().is_err());
        assert!("-3".parse::<CredentialId>().is_err());
        assert!("abc".parse::<CredentialId>().is_err());
    }

    #[test]
    fn credential_ids_order_numerically() {
        assert!(CredentialId::new(2) < CredentialId::new(10));
    }
}
