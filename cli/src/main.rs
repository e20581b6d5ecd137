//! # netdoctor Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This file serves as the main entry point for the netdoctor CLI.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to appropriate command handlers
//! - Mapping the outcome to a process exit code
//!
//! ## Exit Codes
//!
//! - `0`: Report produced and the gate (if requested) passed
//! - `1`: `--gate` was given and the gate decision is a failure
//! - `2`: The run itself failed (invalid configuration, unusable environment)
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! netdoctor --help
//!
//! # Diagnose with debug logging on stderr
//! netdoctor -vv doctor
//!
//! # Use a specific configuration file
//! netdoctor --config ./ci/netdoctor.toml doctor --gate
//! ```
//!
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (doctor, profile)
mod common; // Shared utilities (fs, ui)
mod core; // Core infrastructure (config, env, error)
mod engine; // Profile resolution, validation, host resolution, drift, report

/// Exit code for a run that failed outside of the report.
const EXIT_RUN_FAILED: i32 = 2;

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "netdoctor",
    about = "Resolve and validate the network profile of a locally-run backend",
    long_about = "Determines which network profile (loopback, lan-static, lan-dhcp, custom) applies,\n\
                  derives the backend base URL, checks the host and reports configuration drift.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Configuration file to use instead of the discovered `.netdoctor.toml`.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "d")]
    Doctor(commands::doctor::DoctorArgs),
    #[command(alias = "p")]
    Profile(commands::profile::ProfileArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let config_path = cli.config.as_deref();
    let command_result = match cli.command {
        Commands::Doctor(args) => commands::doctor::handle_doctor(args, config_path).await,
        Commands::Profile(args) => commands::profile::handle_profile(args, config_path),
    };

    // process::exit skips destructors, so flush the report explicitly.
    let _ = std::io::stdout().flush();
    match command_result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!("Command execution failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_RUN_FAILED);
        }
    }
}
