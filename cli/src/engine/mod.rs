//! # netdoctor Diagnostic Engine
//!
//! File: cli/src/engine/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The engine answers one question: given this environment, where is the
//! backend, and is that configuration usable? It runs as an ordered sequence
//! of stages, each appending to one `Findings` accumulator that is passed
//! along explicitly:
//!
//! 1. `profile`: environment → `NetworkProfile` (pure). Its warnings are
//!    forwarded as-is.
//! 2. `validate`: profile-specific rules → issues.
//! 3. `resolve`: host → `HostResolution`. The single `await` in the pipeline.
//!    An unresolved host becomes an issue.
//! 4. `drift`: recorded host-state vs current profile → warnings.
//! 5. `report`: findings → `DiagnosticReport` with status and gate decision.
//!
//! ## Usage
//!
//! ```rust
//! let request = DiagnosticRequest { strict_mode: true, ..Default::default() };
//! let report = engine::run_diagnostics(&env, &settings, &request, &SystemLookup).await;
//! std::process::exit(report.gate_decision().exit_code(true));
//! ```
//!
pub mod drift;
pub mod profile;
pub mod report;
pub mod resolve;
pub mod validate;

use crate::core::config::Settings;
use crate::core::env::EnvSnapshot;
use chrono::Utc;
use profile::NetworkProfile;
use report::{DiagnosticReport, Finding, Findings};
use resolve::HostLookup;
use std::path::PathBuf;
use tracing::info;

/// Per-invocation options supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticRequest {
    /// Base-URL variables checked before the configured ones.
    pub extra_base_url_vars: Vec<String>,
    pub strict_mode: bool,
    /// Directory a relative host-state path is resolved against.
    pub base_dir: Option<PathBuf>,
}

/// Runs the synchronous stages only: resolve the profile and validate it.
pub fn check_profile(
    env: &EnvSnapshot,
    settings: &Settings,
    request: &DiagnosticRequest,
) -> (NetworkProfile, Findings) {
    let profile = profile::resolve_profile(
        env,
        &settings.profile,
        &request.extra_base_url_vars,
        settings.forced_profile,
    );
    let mut findings = Findings::default();
    for warning in &profile.warnings {
        findings.warning(Finding::new(warning.as_str()));
    }
    validate::validate_profile(&profile, &mut findings);
    (profile, findings)
}

/// Runs the full pipeline and returns the finished report.
pub async fn run_diagnostics(
    env: &EnvSnapshot,
    settings: &Settings,
    request: &DiagnosticRequest,
    lookup: &dyn HostLookup,
) -> DiagnosticReport {
    let (profile, mut findings) = check_profile(env, settings, request);

    let resolution = resolve::resolve_host(lookup, &profile.host, settings.timeout).await;
    if !resolution.resolved {
        let error = resolution.error.clone().unwrap_or_default();
        findings.issue(
            Finding::new(format!("Host '{}' could not be resolved: {}", profile.host, error))
                .detail("host", profile.host.as_str())
                .detail("error", error),
        );
    }

    let state_path = match &request.base_dir {
        Some(dir) if profile.host_state_file_path.is_relative() => {
            dir.join(&profile.host_state_file_path)
        }
        _ => profile.host_state_file_path.clone(),
    };
    let state = drift::load_state(&state_path);
    drift::detect_drift(&state, &state_path, &profile, &mut findings);

    let report = DiagnosticReport::new(
        &profile,
        resolution,
        findings,
        request.strict_mode,
        Utc::now(),
    );
    info!(
        "Diagnostics finished: status={}, {} issue(s), {} warning(s)",
        report.status.as_str(),
        report.issues.len(),
        report.warnings.len()
    );
    report
}
