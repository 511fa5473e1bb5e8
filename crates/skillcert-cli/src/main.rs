//! # skillcert CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use skillcert_cli::credential::{run_credential, CredentialArgs};
use skillcert_cli::issuer::{run_issuer, IssuerArgs};
use skillcert_cli::{run_init, InitArgs, DEFAULT_STATE_FILE};

/// Skill credential registry CLI.
///
/// Keeps issuer authorizations and skill credentials in a local JSON ledger
/// file and enforces the same lifecycle rules as the HTTP service.
#[derive(Parser, Debug)]
#[command(name = "skillcert", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the ledger file.
    #[arg(long, global = true, env = "SKILLCERT_STATE", default_value = DEFAULT_STATE_FILE)]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty ledger file.
    Init(InitArgs),

    /// Issuer authorization management.
    Issuer(IssuerArgs),

    /// Credential mint, verification, and revocation.
    Credential(CredentialArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!(state = %cli.state.display(), "skillcert CLI starting");

    let result = match cli.command {
        Commands::Init(args) => run_init(&args, &cli.state),
        Commands::Issuer(args) => run_issuer(&args, &cli.state),
        Commands::Credential(args) => run_credential(&args, &cli.state),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
