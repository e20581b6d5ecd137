//! # netdoctor Diagnostic Report and Gate
//!
//! File: cli/src/engine/report.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Every check in the pipeline records its outcome as a `Finding` in one of
//! two ordered lists held by the `Findings` accumulator:
//!
//! - **issues** (error severity): loopback misuse on a LAN profile, an invalid
//!   static IPv4 address, an unresolved host. Any issue makes the report `fail`.
//! - **warnings** (warning severity): profile normalization fallback, an
//!   unreadable state file, host drift. Warnings never change `status`.
//!
//! The `DiagnosticReport` is the JSON-serializable result. Its `status` field
//! depends only on issues. The separate `GateDecision` adds the strict-mode
//! policy (warnings also block) and is what the CLI maps to an exit code.
//!
use crate::core::error::{NetdoctorError, Result};
use crate::engine::profile::{NetworkProfile, Profile};
use crate::engine::resolve::HostResolution;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// One captured check outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

impl Finding {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    /// Attaches one structured detail, creating the map on first use.
    pub fn detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
        self
    }
}

/// Ordered issues and warnings, passed explicitly from stage to stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Findings {
    pub issues: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl Findings {
    pub fn issue(&mut self, finding: Finding) {
        self.issues.push(finding);
    }

    pub fn warning(&mut self, finding: Finding) {
        self.warnings.push(finding);
    }
}

/// Pass/fail outcome. Derived from issues alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pass,
    Fail,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pass => "pass",
            ReportStatus::Fail => "fail",
        }
    }
}

/// Whether a gate invocation should block dependent steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    pub blocked: bool,
    /// True when only strict mode turned a passing report into a block.
    pub escalated_by_strict: bool,
}

impl GateDecision {
    /// Computes `issues > 0 || (strict && warnings > 0)`.
    pub fn evaluate(issue_count: usize, warning_count: usize, strict_mode: bool) -> Self {
        let hard_failure = issue_count > 0;
        let strict_failure = strict_mode && warning_count > 0;
        Self {
            blocked: hard_failure || strict_failure,
            escalated_by_strict: !hard_failure && strict_failure,
        }
    }

    /// Exit code for the process. A plain report run always exits 0.
    pub fn exit_code(&self, gate_mode: bool) -> i32 {
        if gate_mode && self.blocked {
            1
        } else {
            0
        }
    }
}

/// The complete diagnostic output of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    pub timestamp_utc: DateTime<Utc>,
    pub status: ReportStatus,
    pub strict_mode: bool,
    pub profile: Profile,
    pub requested_profile: Option<String>,
    pub host: String,
    pub port: u16,
    pub base_url: String,
    pub host_state_file_path: PathBuf,
    pub host_resolution: HostResolution,
    pub issues: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl DiagnosticReport {
    /// Finalizes a report. `status` is computed here from `findings.issues`
    /// and nothing else.
    pub fn new(
        profile: &NetworkProfile,
        host_resolution: HostResolution,
        findings: Findings,
        strict_mode: bool,
        timestamp_utc: DateTime<Utc>,
    ) -> Self {
        let status = if findings.issues.is_empty() {
            ReportStatus::Pass
        } else {
            ReportStatus::Fail
        };
        Self {
            timestamp_utc,
            status,
            strict_mode,
            profile: profile.profile,
            requested_profile: profile.requested_profile.clone(),
            host: profile.host.clone(),
            port: profile.port,
            base_url: profile.base_url.clone(),
            host_state_file_path: profile.host_state_file_path.clone(),
            host_resolution,
            issues: findings.issues,
            warnings: findings.warnings,
        }
    }

    pub fn gate_decision(&self) -> GateDecision {
        GateDecision::evaluate(self.issues.len(), self.warnings.len(), self.strict_mode)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| NetdoctorError::from(e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::resolve::ResolutionMode;
    use std::collections::BTreeSet;

    fn sample_profile() -> NetworkProfile {
        NetworkProfile {
            profile: Profile::LanDhcp,
            requested_profile: Some("lan-dhcp".into()),
            host: "studio.local".into(),
            port: 8000,
            base_url: "http://studio.local:8000".into(),
            warnings: vec![],
            host_state_file_path: PathBuf::from(".netdoctor/host-state.json"),
        }
    }

    fn resolved() -> HostResolution {
        HostResolution {
            mode: ResolutionMode::Dns,
            addresses: BTreeSet::from(["192.168.1.20".to_string()]),
            resolved: true,
            error: None,
        }
    }

    fn report(findings: Findings, strict: bool) -> DiagnosticReport {
        DiagnosticReport::new(&sample_profile(), resolved(), findings, strict, Utc::now())
    }

    #[test]
    fn test_warnings_only_gate_depends_on_strict() {
        let mut findings = Findings::default();
        findings.warning(Finding::new("x"));

        let lenient = report(findings.clone(), false);
        assert_eq!(lenient.status, ReportStatus::Pass);
        assert!(!lenient.gate_decision().blocked);
        assert_eq!(lenient.gate_decision().exit_code(true), 0);

        let strict = report(findings, true);
        assert_eq!(strict.status, ReportStatus::Pass);
        let decision = strict.gate_decision();
        assert!(decision.blocked);
        assert!(decision.escalated_by_strict);
        assert_ne!(decision.exit_code(true), 0);
    }

    #[test]
    fn test_issue_fails_status_and_gate() {
        let mut findings = Findings::default();
        findings.issue(Finding::new("bad host"));
        let r = report(findings, false);
        assert_eq!(r.status, ReportStatus::Fail);
        let decision = r.gate_decision();
        assert!(decision.blocked);
        assert!(!decision.escalated_by_strict);
        assert_eq!(decision.exit_code(true), 1);
    }

    #[test]
    fn test_report_mode_never_forces_non_zero() {
        let decision = GateDecision::evaluate(3, 2, true);
        assert!(decision.blocked);
        assert_eq!(decision.exit_code(false), 0);
    }

    #[test]
    fn test_clean_report_passes_gate() {
        let decision = report(Findings::default(), true).gate_decision();
        assert!(!decision.blocked);
        assert!(!decision.escalated_by_strict);
    }

    #[test]
    fn test_json_shape() {
        let mut findings = Findings::default();
        findings.warning(
            Finding::new("Host drift detected")
                .detail("previousHost", "studio.local")
                .detail("currentHost", "studio-new.local"),
        );
        let json = report(findings, true).to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["status"], "pass");
        assert_eq!(value["strictMode"], true);
        assert_eq!(value["profile"], "lan-dhcp");
        assert_eq!(value["baseUrl"], "http://studio.local:8000");
        assert_eq!(value["hostStateFilePath"], ".netdoctor/host-state.json");
        assert_eq!(value["hostResolution"]["mode"], "dns");
        assert_eq!(value["hostResolution"]["addresses"][0], "192.168.1.20");
        assert_eq!(value["hostResolution"]["error"], Value::Null);
        assert!(value["timestampUtc"].as_str().unwrap().ends_with('Z'));
        assert_eq!(value["issues"].as_array().unwrap().len(), 0);
        assert_eq!(
            value["warnings"][0]["details"]["currentHost"],
            "studio-new.local"
        );
    }

    #[test]
    fn test_finding_without_details_omits_key() {
        let json = serde_json::to_value(Finding::new("plain")).unwrap();
        assert!(json.get("details").is_none());
    }
}
