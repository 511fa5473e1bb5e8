//! # Issuer Subcommand
//!
//! - `authorize`: Authorize an issuer under an institution label.
//! - `revoke`: Withdraw an issuer's authorization.
//! - `list`: Show every issuer ever authorized.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Subcommand};
use skillcert_core::{Principal, SystemClock};

use crate::ledger_file::Session;

/// Arguments for the `skillcert issuer` subcommand.
#[derive(Args, Debug)]
pub struct IssuerArgs {
    #[command(subcommand)]
    pub command: IssuerCommand,
}

/// Issuer subcommands.
#[derive(Subcommand, Debug)]
pub enum IssuerCommand {
    /// Authorize a principal to mint credentials (administrator only).
    Authorize {
        /// Principal to authorize.
        #[arg(long)]
        issuer: String,
        /// Institution display name.
        #[arg(long)]
        label: String,
        /// Acting principal.
        #[arg(long = "as", env = "SKILLCERT_PRINCIPAL")]
        caller: String,
    },

    /// Revoke an issuer's authorization (administrator only).
    Revoke {
        /// Principal to revoke.
        #[arg(long)]
        issuer: String,
        /// Acting principal.
        #[arg(long = "as", env = "SKILLCERT_PRINCIPAL")]
        caller: String,
    },

    /// List every issuer ever authorized.
    List,
}

/// Execute the issuer subcommand.
pub fn run_issuer(args: &IssuerArgs, state_path: &Path) -> Result<u8> {
    let session = Session::open(state_path, Arc::new(SystemClock))?;

    match &args.command {
        IssuerCommand::Authorize {
            issuer,
            label,
            caller,
        } => cmd_authorize(&session, caller, issuer, label),
        IssuerCommand::Revoke { issuer, caller } => cmd_revoke(&session, caller, issuer),
        IssuerCommand::List => cmd_list(&session),
    }
}

pub(crate) fn cmd_authorize(session: &Session, caller: &str, issuer: &str, label: &str) -> Result<u8> {
    let issuer = Principal::new(issuer);
    session
        .controller()
        .authorize_issuer(&Principal::new(caller), &issuer, label)?;
    session.save()?;
    println!("OK: authorized issuer {issuer} as \"{label}\"");
    Ok(0)
}

pub(crate) fn cmd_revoke(session: &Session, caller: &str, issuer: &str) -> Result<u8> {
    let issuer = Principal::new(issuer);
    session
        .controller()
        .revoke_issuer(&Principal::new(caller), &issuer)?;
    session.save()?;
    println!("OK: revoked issuer {issuer}");
    Ok(0)
}

fn cmd_list(session: &Session) -> Result<u8> {
    let issuers = session.controller().issuers();
    if issuers.is_empty() {
        println!("No issuers found.");
        return Ok(0);
    }
    println!("Issuers ({}):", issuers.len());
    for entry in &issuers {
        let status = if entry.authorized { "authorized" } else { "revoked" };
        println!("  {} \"{}\": {status} (since {})", entry.issuer, entry.label, entry.authorized_at);
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillcert_core::ManualClock;

    fn session(dir: &tempfile::TempDir) -> (std::path::PathBuf, Session) {
        let path = dir.path().join("ledger.json");
        Session::init(&path, Principal::new("admin"), false).unwrap();
        let session = Session::open(&path, Arc::new(ManualClock::at_epoch(1_767_225_600))).unwrap();
        (path, session)
    }

    #[test]
    fn authorize_persists() {
        let dir = tempfile::tempdir().unwrap();
        let (path, s) = session(&dir);
        assert_eq!(cmd_authorize(&s, "admin", "acme", "Acme Academy").unwrap(), 0);

        let reopened = Session::open(&path, Arc::new(SystemClock)).unwrap();
        assert!(reopened.controller().is_authorized(&Principal::new("acme")));
    }

    #[test]
    fn non_admin_rejected_and_nothing_saved() {
        let dir = tempfile::tempdir().unwrap();
        let (path, s) = session(&dir);
        assert!(cmd_authorize(&s, "mallory", "mallory", "Evil U").is_err());

        let reopened = Session::open(&path, Arc::new(SystemClock)).unwrap();
        assert!(reopened.controller().issuers().is_empty());
    }

    #[test]
    fn revoke_requires_authorized_issuer() {
        let dir = tempfile::tempdir().unwrap();
        let (_, s) = session(&dir);
        assert!(cmd_revoke(&s, "admin", "acme").is_err());
        cmd_authorize(&s, "admin", "acme", "Acme").unwrap();
        assert_eq!(cmd_revoke(&s, "admin", "acme").unwrap(), 0);
        assert_eq!(cmd_list(&s).unwrap(), 0);
    }
}
