//! # Credential Subcommand
//!
//! - `mint`: Mint a credential as an authorized issuer.
//! - `verify`: Live validity verdict (exit code 0 valid, 2 invalid).
//! - `expired`: Expiry check alone (exit code 0 not expired, 2 expired).
//! - `revoke`: Revoke a credential as its issuer or the administrator.
//! - `show`: Print the stored record as JSON.
//! - `holder`: List a holder's credentials in mint order.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use skillcert_core::{CredentialId, Principal, SkillLevel, SystemClock, ValidityPeriod};
use skillcert_state::MintRequest;

use crate::ledger_file::Session;

/// Arguments for the `skillcert credential` subcommand.
#[derive(Args, Debug)]
pub struct CredentialArgs {
    #[command(subcommand)]
    pub command: CredentialCommand,
}

/// Credential subcommands.
#[derive(Subcommand, Debug)]
pub enum CredentialCommand {
    /// Mint a credential to a holder.
    Mint {
        /// Recipient principal.
        #[arg(long)]
        holder: String,
        /// Name of the attested skill.
        #[arg(long)]
        skill: String,
        /// Institution display name recorded on the credential.
        #[arg(long)]
        label: String,
        /// Proficiency level (beginner, intermediate, advanced, expert, or a custom tag).
        #[arg(long, default_value = "beginner")]
        level: String,
        /// Validity period: seconds, or a number with an s/m/h/d suffix.
        #[arg(long, value_parser = parse_validity)]
        validity: ValidityPeriod,
        /// Acting issuer.
        #[arg(long = "as", env = "SKILLCERT_PRINCIPAL")]
        caller: String,
    },

    /// Check whether a credential is currently valid.
    Verify {
        /// Credential identifier.
        #[arg(long)]
        id: CredentialId,
    },

    /// Check whether a credential is past its expiry.
    Expired {
        /// Credential identifier.
        #[arg(long)]
        id: CredentialId,
    },

    /// Revoke a credential.
    Revoke {
        /// Credential identifier.
        #[arg(long)]
        id: CredentialId,
        /// Reason recorded with the revocation.
        #[arg(long, default_value = "")]
        reason: String,
        /// Acting principal (the issuer or the administrator).
        #[arg(long = "as", env = "SKILLCERT_PRINCIPAL")]
        caller: String,
    },

    /// Print a credential record as JSON.
    Show {
        /// Credential identifier.
        #[arg(long)]
        id: CredentialId,
    },

    /// List the credentials a holder has received.
    Holder {
        /// Holder principal.
        #[arg(long)]
        holder: String,
    },
}

/// Execute the credential subcommand.
pub fn run_credential(args: &CredentialArgs, state_path: &Path) -> Result<u8> {
    let session = Session::open(state_path, Arc::new(SystemClock))?;

    match &args.command {
        CredentialCommand::Mint {
            holder,
            skill,
            label,
            level,
            validity,
            caller,
        } => {
            let request = MintRequest {
                holder: Principal::new(holder.as_str()),
                skill_name: skill.clone(),
                issuer_label: label.clone(),
                level: SkillLevel::from(level.as_str()),
                validity: *validity,
            };
            cmd_mint(&session, caller, request)
        }
        CredentialCommand::Verify { id } => cmd_verify(&session, *id),
        CredentialCommand::Expired { id } => cmd_expired(&session, *id),
        CredentialCommand::Revoke { id, reason, caller } => {
            cmd_revoke(&session, caller, *id, reason)
        }
        CredentialCommand::Show { id } => cmd_show(&session, *id),
        CredentialCommand::Holder { holder } => cmd_holder(&session, holder),
    }
}

/// Parse a validity period such as `3600`, `90m`, `12h`, or `30d`.
pub fn parse_validity(raw: &str) -> Result<ValidityPeriod, String> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => (&raw[..i], c.to_ascii_lowercase()),
        _ => (raw, 's'),
    };
    let n: u64 = digits
        .parse()
        .map_err(|_| format!("invalid validity period: {raw:?}"))?;
    let multiplier = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3_600,
        'd' => 86_400,
        other => return Err(format!("unknown validity unit {other:?} (use s, m, h, or d)")),
    };
    n.checked_mul(multiplier)
        .map(ValidityPeriod::from_secs)
        .ok_or_else(|| format!("validity period too large: {raw:?}"))
}

pub(crate) fn cmd_mint(session: &Session, caller: &str, request: MintRequest) -> Result<u8> {
    let holder = request.holder.clone();
    let id = session.controller().mint(&Principal::new(caller), request)?;
    session.save()?;
    let record = session.controller().credential(id)?;
    println!(
        "OK: minted credential {id} to {holder} (expires {})",
        record.expires_at
    );
    Ok(0)
}

pub(crate) fn cmd_verify(session: &Session, id: CredentialId) -> Result<u8> {
    let v = session.controller().verify(id)?;
    let verdict = if v.is_valid { "VALID" } else { "INVALID" };
    println!("Credential {id}: {verdict}");
    println!("  Skill: {} ({})", v.record.skill_name, v.record.level);
    println!("  Holder: {}", v.record.holder);
    println!("  Issuer: {} \"{}\"", v.record.issuer, v.record.issuer_label);
    println!("  Active: {}", v.record.active);
    println!("  Expires: {}", v.record.expires_at);
    println!(
        "  Issuer authorized: {}",
        session.controller().is_authorized(&v.record.issuer)
    );
    println!("  Checked at: {}", v.checked_at);
    Ok(if v.is_valid { 0 } else { 2 })
}

pub(crate) fn cmd_expired(session: &Session, id: CredentialId) -> Result<u8> {
    let expired = session.controller().is_expired(id)?;
    println!("Credential {id}: {}", if expired { "expired" } else { "not expired" });
    Ok(if expired { 2 } else { 0 })
}

pub(crate) fn cmd_revoke(session: &Session, caller: &str, id: CredentialId, reason: &str) -> Result<u8> {
    session
        .controller()
        .revoke_credential(&Principal::new(caller), id, reason)?;
    session.save()?;
    println!("OK: revoked credential {id}");
    Ok(0)
}

fn cmd_show(session: &Session, id: CredentialId) -> Result<u8> {
    let record = session.controller().credential(id)?;
    let owner = session.controller().owner_of(id);
    let mut json = serde_json::to_value(&record)?;
    json.as_object_mut()
        .ok_or_else(|| anyhow!("credential record did not serialize as an object"))?
        .insert("owner".into(), serde_json::to_value(owner)?);
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(0)
}

fn cmd_holder(session: &Session, holder: &str) -> Result<u8> {
    let holder = Principal::new(holder);
    let ids = session.controller().holder_credentials(&holder);
    if ids.is_empty() {
        println!("No credentials for {holder}.");
        return Ok(0);
    }
    println!("Credentials for {holder} ({}):", ids.len());
    for id in ids {
        let record = session.controller().credential(id)?;
        let status = if record.active { "active" } else { "revoked" };
        println!("  [{id}] {} ({}) {status}", record.skill_name, record.level);
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillcert_core::ManualClock;

    const START: i64 = 1_767_225_600;

    struct Fixture {
        _dir: tempfile::TempDir,
        path: std::path::PathBuf,
        clock: Arc<ManualClock>,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("ledger.json");
            Session::init(&path, Principal::new("admin"), false).unwrap();
            let fixture = Self {
                _dir: dir,
                path,
                clock: Arc::new(ManualClock::at_epoch(START)),
            };
            crate::issuer::cmd_authorize(&fixture.open(), "admin", "acme", "Acme Academy")
                .unwrap();
            fixture
        }

        fn open(&self) -> Session {
            Session::open(&self.path, self.clock.clone()).unwrap()
        }
    }

    fn request(secs: u64) -> MintRequest {
        MintRequest {
            holder: Principal::new("holder"),
            skill_name: "Rust".into(),
            issuer_label: "Acme Academy".into(),
            level: SkillLevel::Advanced,
            validity: ValidityPeriod::from_secs(secs),
        }
    }

    #[test]
    fn validity_parsing() {
        assert_eq!(parse_validity("3600").unwrap().as_secs(), 3600);
        assert_eq!(parse_validity("90m").unwrap().as_secs(), 5400);
        assert_eq!(parse_validity("12H").unwrap().as_secs(), 43_200);
        assert_eq!(parse_validity("30d").unwrap().as_secs(), 2_592_000);
        assert!(parse_validity("3w").is_err());
        assert!(parse_validity("d").is_err());
        assert!(parse_validity("-5").is_err());
        assert!(parse_validity(&format!("{}d", u64::MAX)).is_err());
    }

    #[test]
    fn mint_verify_expire_across_invocations() {
        let f = Fixture::new();
        assert_eq!(cmd_mint(&f.open(), "acme", request(1000)).unwrap(), 0);
        let id = CredentialId::new(1);
        assert_eq!(cmd_verify(&f.open(), id).unwrap(), 0);
        assert_eq!(cmd_expired(&f.open(), id).unwrap(), 0);

        f.clock.advance(1001);
        assert_eq!(cmd_verify(&f.open(), id).unwrap(), 2);
        assert_eq!(cmd_expired(&f.open(), id).unwrap(), 2);
    }

    #[test]
    fn revoke_is_one_way() {
        let f = Fixture::new();
        cmd_mint(&f.open(), "acme", request(1000)).unwrap();
        let id = CredentialId::new(1);
        assert!(cmd_revoke(&f.open(), "holder", id, "mine").is_err());
        assert_eq!(cmd_revoke(&f.open(), "acme", id, "superseded").unwrap(), 0);
        assert!(cmd_revoke(&f.open(), "admin", id, "again").is_err());
        assert_eq!(cmd_verify(&f.open(), id).unwrap(), 2);

        let record = f.open().controller().credential(id).unwrap();
        assert_eq!(record.revocation_reason.as_deref(), Some("superseded"));
    }

    #[test]
    fn failed_mint_leaves_file_unchanged() {
        let f = Fixture::new();
        let before = std::fs::read_to_string(&f.path).unwrap();
        assert!(cmd_mint(&f.open(), "stranger", request(1000)).is_err());
        assert!(cmd_mint(&f.open(), "acme", request(0)).is_err());
        assert_eq!(std::fs::read_to_string(&f.path).unwrap(), before);
    }

    #[test]
    fn show_and_holder_listing() {
        let f = Fixture::new();
        cmd_mint(&f.open(), "acme", request(1000)).unwrap();
        cmd_mint(&f.open(), "acme", request(1000)).unwrap();
        assert_eq!(cmd_show(&f.open(), CredentialId::new(2)).unwrap(), 0);
        assert_eq!(cmd_holder(&f.open(), "holder").unwrap(), 0);
        assert_eq!(cmd_holder(&f.open(), "nobody").unwrap(), 0);
        assert!(cmd_show(&f.open(), CredentialId::new(9)).is_err());
        assert_eq!(
            f.open().controller().holder_credentials(&Principal::new("holder")),
            vec![CredentialId::new(1), CredentialId::new(2)]
        );
    }
}
