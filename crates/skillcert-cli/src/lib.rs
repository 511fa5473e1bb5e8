//! # skillcert-cli: CLI Tool for the Skill Credential Registry
//!
//! Provides the `skillcert` command-line interface over a JSON ledger file.
//!
//! ## Subcommands
//!
//! - `skillcert init`: Create an empty ledger file with an administrator.
//! - `skillcert issuer`: Authorize, revoke, and list issuers.
//! - `skillcert credential`: Mint, verify, check expiry, revoke, show, and
//!   list holder credentials.
//!
//! ```bash
//! skillcert init --admin registry-admin
//! skillcert issuer authorize --issuer acme --label "Acme Academy" --as registry-admin
//! skillcert credential mint --holder alice --skill Rust --label "Acme Academy" --validity 365d --as acme
//! skillcert credential verify --id 1
//! ```

pub mod credential;
pub mod issuer;
pub mod ledger_file;

use std::path::Path;

use anyhow::Result;
use clap::Args;
use skillcert_core::Principal;

use crate::ledger_file::Session;

/// Default ledger file, relative to the working directory.
pub const DEFAULT_STATE_FILE: &str = "skillcert-state.json";

/// Arguments for `skillcert init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Administrator principal for the new ledger.
    #[arg(long)]
    pub admin: String,
    /// Overwrite an existing ledger file.
    #[arg(long)]
    pub force: bool,
}

/// Execute `skillcert init`.
pub fn run_init(args: &InitArgs, state_path: &Path) -> Result<u8> {
    Session::init(state_path, Principal::new(args.admin.trim()), args.force)?;
    println!(
        "OK: initialized {} with administrator {}",
        state_path.display(),
        args.admin.trim()
    );
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_STATE_FILE);
        let args = InitArgs {
            admin: "admin".into(),
            force: false,
        };
        assert_eq!(run_init(&args, &path).unwrap(), 0);
        assert!(path.exists());
        assert!(run_init(&args, &path).is_err());
    }

    #[test]
    fn init_rejects_null_admin() {
        let dir = tempfile::tempdir().unwrap();
        let args = InitArgs {
            admin: "0x000".into(),
            force: false,
        };
        assert!(run_init(&args, &dir.path().join("x.json")).is_err());
    }
}
