//! # netdoctor Drift Detector
//!
//! File: cli/src/engine/drift.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Compares the current profile against the host recorded by a previous run.
//! The host-state file belongs to an external writer; netdoctor only reads it.
//!
//! Loading produces a `StateLoad`, one variant per case:
//!
//! - `Missing`: no file. First run, nothing to compare, no warning.
//! - `Unreadable`: the file exists but cannot be read or does not have the
//!   expected shape. One warning; the run continues normally.
//! - `Loaded`: compared only when the recorded profile is the current one,
//!   since a different profile is expected to have a different host. A
//!   case-insensitive host mismatch produces one drift warning naming both
//!   hosts (typically a DHCP lease change).
//!
//! ## State File Format
//!
//! ```json
//! { "profile": "lan-dhcp", "host": "studio.local", "capturedAt": "2026-01-01T12:00:00Z" }
//! ```
//!
use crate::common::fs::io::{self, FileRead};
use crate::engine::profile::NetworkProfile;
use crate::engine::report::{Finding, Findings};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// The host recorded by a previous run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedHostState {
    pub profile: String,
    pub host: String,
    #[serde(default)]
    pub captured_at: Option<DateTime<Utc>>,
}

/// Result of loading the host-state file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateLoad {
    Missing,
    Unreadable(String),
    Loaded(PersistedHostState),
}

/// Reads and parses the host-state file at `path`.
pub fn load_state(path: &Path) -> StateLoad {
    match io::read_optional_file(path) {
        FileRead::Missing => StateLoad::Missing,
        FileRead::Unreadable(reason) => StateLoad::Unreadable(reason),
        FileRead::Contents(text) => match serde_json::from_str::<PersistedHostState>(&text) {
            Ok(state) => {
                debug!("Loaded host state from {}: {:?}", path.display(), state);
                StateLoad::Loaded(state)
            }
            Err(e) => StateLoad::Unreadable(e.to_string()),
        },
    }
}

/// Appends at most one warning to `findings` based on `state`.
pub fn detect_drift(
    state: &StateLoad,
    state_path: &Path,
    current: &NetworkProfile,
    findings: &mut Findings,
) {
    match state {
        StateLoad::Missing => {
            info!(
                "No host state at {}, skipping drift check",
                state_path.display()
            );
        }
        StateLoad::Unreadable(reason) => {
            warn!("Host state file unreadable: {}", reason);
            findings.warning(
                Finding::new(format!(
                    "Host state file unreadable: {}",
                    state_path.display()
                ))
                .detail("path", state_path.display().to_string())
                .detail("reason", reason.as_str()),
            );
        }
        StateLoad::Loaded(previous) => {
            if !previous.profile.eq_ignore_ascii_case(current.profile.as_str()) {
                debug!(
                    "Recorded profile '{}' differs from '{}', no drift comparison",
                    previous.profile, current.profile
                );
                return;
            }
            if previous.host.eq_ignore_ascii_case(&current.host) {
                debug!("No host drift for profile '{}'", current.profile);
                return;
            }
            warn!(
                "Host drift for '{}': '{}' -> '{}'",
                current.profile, previous.host, current.host
            );
            let mut finding = Finding::new(format!(
                "Host drift detected for profile '{}': previously '{}', now '{}'.",
                current.profile, previous.host, current.host
            ))
            .detail("profile", current.profile.as_str())
            .detail("previousHost", previous.host.as_str())
            .detail("currentHost", current.host.as_str());
            if let Some(captured_at) = previous.captured_at {
                finding = finding.detail("capturedAt", captured_at.to_rfc3339());
            }
            findings.warning(finding);
        }
    }
}
