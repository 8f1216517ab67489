//! tfforge CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 4: Rejected submission (unsupported variant or malformed subnet CIDR)
//! - 5: Template error
//! - 6: Output file error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tfforge_iac::IacError;

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const REJECTED_INPUT: u8 = 4;
    pub const TEMPLATE_ERROR: u8 = 5;
    pub const OUTPUT_ERROR: u8 = 6;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "tfforge=debug" } else { "tfforge=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},tower_http=info,warn", default_level))
    });

    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args).await,
        Commands::Generate(args) => commands::generate::execute(args).await,
        Commands::Variants(args) => commands::variants::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Map an error onto an exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    match e.downcast_ref::<IacError>() {
        Some(IacError::UnsupportedProvider(_))
        | Some(IacError::UnsupportedTopology(_))
        | Some(IacError::InvalidSubnetCidr(_))
        | Some(IacError::NoSuchVariant { .. }) => ExitCodes::REJECTED_INPUT,
        Some(IacError::Template { .. }) | Some(IacError::UnresolvedPlaceholder { .. }) => {
            ExitCodes::TEMPLATE_ERROR
        }
        Some(IacError::Write { .. }) => ExitCodes::OUTPUT_ERROR,
        None if e.downcast_ref::<serde_yaml::Error>().is_some() => ExitCodes::INVALID_ARGS,
        None => ExitCodes::GENERAL_ERROR,
    }
}
