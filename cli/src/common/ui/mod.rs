//! # netdoctor UI Utilities Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Human-readable rendering of engine results. Functions here build a
//! `String` instead of printing, so the layout can be asserted in tests and
//! the command handlers decide where it goes (always stdout).
//!
//! Layout of a report:
//!
//! ```text
//! Profile:    lan-dhcp (requested: lan-dhcp)
//! Host:       studio.local
//! Base URL:   http://studio.local:8000
//! Resolution: dns -> 192.168.1.20
//! Status:     PASS
//!
//! Issues:
//!   (none)
//!
//! Warnings:
//!   - Host drift detected for profile 'lan-dhcp': ...
//!
//! Strict mode promoted 1 warning(s) to a gate failure.
//!
//! Gate: BLOCKED
//! ```
//!
use crate::engine::profile::NetworkProfile;
use crate::engine::report::{DiagnosticReport, Finding, Findings};

/// Renders the full diagnostic report. `gate_mode` adds the gate line.
pub fn render_report(report: &DiagnosticReport, gate_mode: bool) -> String {
    let mut out = header(
        report.profile.as_str(),
        report.requested_profile.as_deref(),
        &report.host,
        &report.base_url,
    );

    let resolution = &report.host_resolution;
    if resolution.resolved {
        let addresses: Vec<&str> = resolution.addresses.iter().map(String::as_str).collect();
        out.push_str(&format!(
            "Resolution: {} -> {}\n",
            resolution.mode.as_str(),
            addresses.join(", ")
        ));
    } else {
        out.push_str(&format!(
            "Resolution: {} -> unresolved ({})\n",
            resolution.mode.as_str(),
            resolution.error.as_deref().unwrap_or("unknown error")
        ));
    }
    out.push_str(&format!(
        "Status:     {}\n",
        report.status.as_str().to_uppercase()
    ));
    if report.strict_mode {
        out.push_str("Strict:     warnings block the gate\n");
    }

    out.push_str(&findings_section("Issues", &report.issues));
    out.push_str(&findings_section("Warnings", &report.warnings));

    if gate_mode {
        let decision = report.gate_decision();
        if decision.escalated_by_strict {
            out.push_str(&format!(
                "\nStrict mode promoted {} warning(s) to a gate failure.\n",
                report.warnings.len()
            ));
        }
        let verdict = if decision.blocked { "BLOCKED" } else { "OK" };
        out.push_str(&format!("\nGate: {}\n", verdict));
    }
    out
}

/// Renders the resolver/validator view used by `netdoctor profile`.
pub fn render_profile(profile: &NetworkProfile, findings: &Findings) -> String {
    let mut out = header(
        profile.profile.as_str(),
        profile.requested_profile.as_deref(),
        &profile.host,
        &profile.base_url,
    );
    out.push_str(&format!("Port:       {}\n", profile.port));
    out.push_str(&format!(
        "State file: {}\n",
        profile.host_state_file_path.display()
    ));
    out.push_str(&findings_section("Issues", &findings.issues));
    out.push_str(&findings_section("Warnings", &findings.warnings));
    out
}

fn header(profile: &str, requested: Option<&str>, host: &str, url: &str) -> String {
    let profile_line = match requested {
        Some(requested) => format!("Profile:    {} (requested: {})", profile, requested),
        None => format!("Profile:    {}", profile),
    };
    format!(
        "{}\nHost:       {}\nBase URL:   {}\n",
        profile_line, host, url
    )
}

fn findings_section(title: &str, findings: &[Finding]) -> String {
    let mut section = format!("\n{}:\n", title);
    if findings.is_empty() {
        section.push_str("  (none)\n");
    }
    for finding in findings {
        section.push_str(&format!("  - {}\n", finding.message));
    }
    section
}
