//! # netdoctor Profile Resolver
//!
//! File: cli/src/engine/profile.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Turns an environment snapshot into a canonical `NetworkProfile`: which
//! deployment topology applies, which host and port the backend lives on, and
//! the base URL dependent tooling should use.
//!
//! This stage is a pure function of its inputs. It performs no network or
//! file I/O, so every precedence rule below is unit-testable with a literal
//! `EnvSnapshot`.
//!
//! ## Precedence Rules
//!
//! **Profile.** The requested-profile variable is trimmed and matched
//! case-insensitively against `loopback`, `lan-static` and `lan-dhcp`. Unset
//! or empty selects `loopback` silently; any other value selects `loopback`
//! and records a warning naming the original value. `custom` can only be
//! forced by the caller (CLI flag or config), never requested through the
//! environment.
//!
//! **Host.**
//! - `loopback`: always `127.0.0.1`, whatever else is set.
//! - `lan-static`: the static-IP variable, verbatim. Validation happens later.
//! - `lan-dhcp` / `custom`: the hostname variable, else the default hostname.
//!
//! **Base URL.** The first non-empty value among the caller's extra variable
//! names, the configured fallbacks and finally the fixed base-URL variable
//! (de-duplicated, first occurrence wins). A value without a scheme gets
//! `http://`; trailing slashes are stripped. With no override at all the URL
//! is synthesized as `http://{host}:{port}`.
//!
use crate::core::env::EnvSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

/// The host every loopback profile resolves to.
pub const LOOPBACK_HOST: &str = "127.0.0.1";

/// Host literals recognised as loopback, compared case-insensitively.
const LOOPBACK_LITERALS: [&str; 3] = ["127.0.0.1", "localhost", "::1"];

/// Deployment topology used to locate the backend service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    Loopback,
    LanStatic,
    LanDhcp,
    Custom,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Loopback => "loopback",
            Profile::LanStatic => "lan-static",
            Profile::LanDhcp => "lan-dhcp",
            Profile::Custom => "custom",
        }
    }

    /// Matches a requested value against the profiles selectable through the
    /// environment. `custom` is deliberately absent from this set.
    fn from_requested(value: &str) -> Option<Profile> {
        match value.to_ascii_lowercase().as_str() {
            "loopback" => Some(Profile::Loopback),
            "lan-static" => Some(Profile::LanStatic),
            "lan-dhcp" => Some(Profile::LanDhcp),
            _ => None,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns `true` for `127.0.0.1`, `localhost` and `::1` (any case).
pub fn is_loopback_literal(host: &str) -> bool {
    LOOPBACK_LITERALS
        .iter()
        .any(|literal| literal.eq_ignore_ascii_case(host))
}

/// Environment variable names and fallback values the resolver works from.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSettings {
    pub profile_var: String,
    pub static_ip_var: String,
    pub hostname_var: String,
    pub port_var: String,
    /// Fixed base-URL variable, always checked last.
    pub base_url_var: String,
    pub host_state_var: String,
    /// Configured base-URL variables checked before `base_url_var`.
    pub base_url_fallbacks: Vec<String>,
    pub default_hostname: String,
    pub default_port: u16,
    pub default_host_state_file: PathBuf,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            profile_var: "NETDOCTOR_PROFILE".to_string(),
            static_ip_var: "NETDOCTOR_STATIC_IP".to_string(),
            hostname_var: "NETDOCTOR_HOSTNAME".to_string(),
            port_var: "NETDOCTOR_PORT".to_string(),
            base_url_var: "NETDOCTOR_BASE_URL".to_string(),
            host_state_var: "NETDOCTOR_HOST_STATE_FILE".to_string(),
            base_url_fallbacks: Vec::new(),
            default_hostname: "backend.local".to_string(),
            default_port: 8000,
            default_host_state_file: PathBuf::from(".netdoctor/host-state.json"),
        }
    }
}

impl ProfileSettings {
    /// Every variable name the resolver may read, for `EnvSnapshot::capture`.
    pub fn watched_variables(&self, extra_base_url_vars: &[String]) -> Vec<String> {
        let mut names = vec![
            self.profile_var.clone(),
            self.static_ip_var.clone(),
            self.hostname_var.clone(),
            self.port_var.clone(),
            self.host_state_var.clone(),
        ];
        names.extend(self.base_url_candidates(extra_base_url_vars));
        names
    }

    /// Ordered, de-duplicated base-URL variable names: caller extras, then
    /// configured fallbacks, then the fixed default.
    pub fn base_url_candidates(&self, extra_base_url_vars: &[String]) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();
        let all = extra_base_url_vars
            .iter()
            .chain(self.base_url_fallbacks.iter())
            .chain(std::iter::once(&self.base_url_var));
        for name in all {
            if !candidates.contains(name) {
                candidates.push(name.clone());
            }
        }
        candidates
    }
}

/// The canonical connection parameters for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    pub profile: Profile,
    pub requested_profile: Option<String>,
    pub host: String,
    pub port: u16,
    pub base_url: String,
    pub warnings: Vec<String>,
    pub host_state_file_path: PathBuf,
}

/// Resolves the network profile from `env`.
///
/// `extra_base_url_vars` are checked before any configured base-URL variable.
/// `forced` overrides the requested-profile variable entirely.
pub fn resolve_profile(
    env: &EnvSnapshot,
    settings: &ProfileSettings,
    extra_base_url_vars: &[String],
    forced: Option<Profile>,
) -> NetworkProfile {
    let mut warnings = Vec::new();
    let requested_profile = env.non_empty(&settings.profile_var).map(str::to_string);

    let profile = match (forced, requested_profile.as_deref()) {
        (Some(profile), _) => {
            debug!("Profile forced to '{}'", profile);
            profile
        }
        (None, None) => Profile::Loopback,
        (None, Some(raw)) => Profile::from_requested(raw).unwrap_or_else(|| {
            warn!("Unrecognized profile '{}', using loopback", raw);
            warnings.push(format!(
                "Unrecognized profile '{}' in {}; falling back to 'loopback'.",
                raw, settings.profile_var
            ));
            Profile::Loopback
        }),
    };

    let host = match profile {
        Profile::Loopback => LOOPBACK_HOST.to_string(),
        Profile::LanStatic => match env.non_empty(&settings.static_ip_var) {
            Some(ip) => ip.to_string(),
            None => {
                warnings.push(format!(
                    "{} is not set; lan-static falls back to {}.",
                    settings.static_ip_var, LOOPBACK_HOST
                ));
                LOOPBACK_HOST.to_string()
            }
        },
        Profile::LanDhcp | Profile::Custom => env
            .non_empty(&settings.hostname_var)
            .unwrap_or(&settings.default_hostname)
            .to_string(),
    };

    let port = match env.non_empty(&settings.port_var) {
        None => settings.default_port,
        Some(raw) => match parse_port(raw) {
            Some(port) => port,
            _ => {
                warnings.push(format!(
                    "Invalid port '{}' in {}; using default port {}.",
                    raw, settings.port_var, settings.default_port
                ));
                settings.default_port
            }
        },
    };

    let base_url = resolve_base_url(env, settings, extra_base_url_vars, &mut warnings)
        .unwrap_or_else(|| synthesize_base_url(&host, port));

    let host_state_file_path = env
        .non_empty(&settings.host_state_var)
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.default_host_state_file.clone());

    let resolved = NetworkProfile {
        profile,
        requested_profile,
        host,
        port,
        base_url,
        warnings,
        host_state_file_path,
    };
    debug!("Resolved network profile: {:?}", resolved);
    resolved
}

fn resolve_base_url(
    env: &EnvSnapshot,
    settings: &ProfileSettings,
    extra_base_url_vars: &[String],
    warnings: &mut Vec<String>,
) -> Option<String> {
    for name in settings.base_url_candidates(extra_base_url_vars) {
        let Some(raw) = env.non_empty(&name) else {
            continue;
        };
        match normalize_base_url(raw) {
            Some(url) => {
                debug!("Using base URL from {}: {}", name, url);
                return Some(url);
            }
            None => warnings.push(format!(
                "Ignoring base URL '{}' in {}: no host after the scheme.",
                raw, name
            )),
        }
    }
    None
}

/// Plain decimal digits only; `+80` and `0` are rejected.
fn parse_port(raw: &str) -> Option<u16> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u16>().ok().filter(|port| *port != 0)
}

/// True when the text before the first `://` is an RFC 3986 scheme.
fn has_scheme(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
        }
        _ => false,
    }
}

/// Adds `http://` when no scheme is present and strips trailing slashes.
/// Returns `None` when nothing is left after the scheme.
pub fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let with_scheme = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };
    let normalized = with_scheme.trim_end_matches('/');
    match normalized.split_once("://") {
        Some((_, rest)) if !rest.is_empty() => Some(normalized.to_string()),
        _ => None,
    }
}

/// `http://{host}:{port}`, bracketing IPv6 literals.
pub fn synthesize_base_url(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("http://[{}]:{}", host, port)
    } else {
        format!("http://{}:{}", host, port)
    }
}
