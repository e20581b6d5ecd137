//! # netdoctor Invariant Validator
//!
//! File: cli/src/engine/validate.rs
//! Author: Christi Mahu
//!
//! Profile-specific structural rules. Every rule runs independently, so one
//! descriptor can produce several issues.
//!
use crate::engine::profile::{is_loopback_literal, NetworkProfile, Profile};
use crate::engine::report::{Finding, Findings};
use tracing::debug;

/// Appends one issue per violated rule to `findings`.
pub fn validate_profile(profile: &NetworkProfile, findings: &mut Findings) {
    let lan = matches!(profile.profile, Profile::LanStatic | Profile::LanDhcp);

    if lan && is_loopback_literal(&profile.host) {
        findings.issue(
            Finding::new(format!(
                "Profile '{}' resolves to loopback host '{}'; LAN profiles exist to reach the backend from other machines.",
                profile.profile, profile.host
            ))
            .detail("profile", profile.profile.as_str())
            .detail("host", profile.host.as_str()),
        );
    }

    if profile.profile == Profile::LanStatic && !is_strict_ipv4(&profile.host) {
        findings.issue(
            Finding::new(format!(
                "Static IP '{}' is not a valid dotted-quad IPv4 address.",
                profile.host
            ))
            .detail("profile", profile.profile.as_str())
            .detail("host", profile.host.as_str()),
        );
    }

    debug!(
        "Validated profile '{}': {} issue(s) so far",
        profile.profile,
        findings.issues.len()
    );
}

/// Exactly four dot-separated decimal octets in 0..=255, each written the way
/// it would re-serialize (no sign, no leading zeros, no empty segments).
pub fn is_strict_ipv4(value: &str) -> bool {
    let octets: Vec<&str> = value.split('.').collect();
    octets.len() == 4
        && octets.iter().all(|octet| {
            octet.bytes().all(|b| b.is_ascii_digit())
                && matches!(octet.parse::<u8>(), Ok(n) if n.to_string() == *octet)
        })
}
