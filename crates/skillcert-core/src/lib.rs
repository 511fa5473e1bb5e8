//! # skillcert-core: Foundational Types for the Skill Credential Registry
//!
//! Leaf crate of the workspace. Defines the domain primitives every other
//! crate speaks in, so that no bare strings or integers cross a crate
//! boundary where an identifier is meant.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `Principal`, `CredentialId`,
//!    `ValidityPeriod`: you cannot pass a holder where a credential id is
//!    expected.
//!
//! 2. **UTC-only timestamps.** `Timestamp` is UTC with seconds precision and
//!    serializes as `YYYY-MM-DDTHH:MM:SSZ`.
//!
//! 3. **Injectable time.** Validity is always computed against a [`Clock`],
//!    never against an ambient `Utc::now()` buried in business logic.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `skillcert-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod skill;
pub mod temporal;

pub use error::ValidationError;
pub use identity::{CredentialId, Principal};
pub use skill::SkillLevel;
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp, ValidityPeriod};
