//! # netdoctor Doctor Command
//!
//! File: cli/src/commands/doctor.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `netdoctor doctor`, the full diagnostic run. It prints either a
//! human summary or, with `--json`, the complete `DiagnosticReport`.
//!
//! Exit behaviour:
//! - Without `--gate` the command exits 0 whatever the findings are.
//! - With `--gate` it exits 1 when the report has issues, or when `--strict`
//!   is set and the report has warnings.
//!
//! The report's `status` field never changes with `--strict`; only the gate
//! decision does.
//!
//! ## Usage
//!
//! ```bash
//! # Human summary
//! netdoctor doctor
//!
//! # Block a deploy script on any finding
//! NETDOCTOR_PROFILE=lan-dhcp netdoctor doctor --gate --strict
//!
//! # Machine-readable report, checking API_BASE_URL first
//! netdoctor doctor --json --base-url-var API_BASE_URL
//! ```
//!
use crate::commands::{prepare_run, TargetArgs};
use crate::common::ui;
use crate::core::error::Result;
use crate::engine::{self, resolve::SystemLookup};
use clap::Parser;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// # Doctor Arguments (`DoctorArgs`)
#[derive(Parser, Debug)]
#[command(about = "Resolve the network profile, check it and report drift")]
pub struct DoctorArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Emit the machine-readable JSON report instead of a human summary.
    #[arg(long)]
    pub json: bool,

    /// Treat warnings as gate failures. Does not change the report status.
    #[arg(long)]
    pub strict: bool,

    /// Exit non-zero when the gate decision is a failure.
    #[arg(long)]
    pub gate: bool,

    /// Upper bound on the DNS lookup, in milliseconds. Overrides config.
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,
}

/// # Handle Doctor Command (`handle_doctor`)
///
/// Runs the full pipeline and prints the report.
///
/// ## Returns
///
/// * `Result<i32>`: The process exit code derived from the gate decision.
/// * `Err`: Only for failures outside the report (bad config, unusable environment).
pub async fn handle_doctor(args: DoctorArgs, config_path: Option<&Path>) -> Result<i32> {
    info!("Handling doctor command...");
    debug!("Doctor args: {:?}", args);

    let (mut settings, env, mut request) = prepare_run(config_path, &args.target)?;
    if let Some(ms) = args.timeout_ms {
        settings.timeout = Duration::from_millis(ms);
    }
    request.strict_mode = args.strict;

    let report = engine::run_diagnostics(&env, &settings, &request, &SystemLookup).await;

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", ui::render_report(&report, args.gate));
    }

    let decision = report.gate_decision();
    let code = decision.exit_code(args.gate);
    debug!("Gate decision {:?}, exit code {}", decision, code);
    Ok(code)
}
