//! # netdoctor Environment Snapshot
//!
//! File: cli/src/core/env.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The diagnostic engine never reads process-wide environment variables
//! directly. Instead, the CLI captures an `EnvSnapshot` once at startup and
//! hands it to every stage as an explicit argument. Tests build snapshots from
//! literal key/value pairs, so no test ever mutates the real process
//! environment.
//!
//! ## Usage
//!
//! ```rust
//! // In the CLI wrapper
//! let env = EnvSnapshot::capture(&settings.watched_variables())?;
//!
//! // In tests
//! let env = EnvSnapshot::from_pairs([("NETDOCTOR_PROFILE", "lan-dhcp")]);
//! assert_eq!(env.get("NETDOCTOR_PROFILE"), Some("lan-dhcp"));
//! ```
//!
use crate::core::error::{NetdoctorError, Result};
use std::collections::BTreeMap;
use tracing::debug;

/// An immutable mapping of environment variable names to values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Builds a snapshot from arbitrary key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Captures the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped, unless the
    /// variable is one of `watched`, in which case the snapshot cannot be trusted
    /// and capture fails with `NetdoctorError::NonUnicodeEnv`.
    pub fn capture(watched: &[String]) -> Result<Self> {
        let mut vars = BTreeMap::new();
        for (key, value) in std::env::vars_os() {
            match (key.into_string(), value.into_string()) {
                (Ok(k), Ok(v)) => {
                    vars.insert(k, v);
                }
                (Ok(k), Err(_)) if watched.iter().any(|w| *w == k) => {
                    return Err(NetdoctorError::NonUnicodeEnv { name: k }.into());
                }
                (Ok(k), Err(_)) => debug!("Skipping non-UTF-8 value for '{}'", k),
                (Err(_), _) => debug!("Skipping environment variable with non-UTF-8 name"),
            }
        }
        debug!("Captured {} environment variables", vars.len());
        Ok(Self { vars })
    }

    /// Returns the raw value of `name`, if set.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Returns the trimmed value of `name`, treating empty or whitespace-only
    /// values as unset.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_trims_and_filters() {
        let env = EnvSnapshot::from_pairs([("A", "  value "), ("B", "   "), ("C", "")]);
        assert_eq!(env.non_empty("A"), Some("value"));
        assert_eq!(env.non_empty("B"), None);
        assert_eq!(env.non_empty("C"), None);
        assert_eq!(env.non_empty("D"), None);
        assert_eq!(env.get("B"), Some("   "));
    }

    #[test]
    fn test_capture_reads_process_environment() {
        // PATH is present in any sane test environment.
        let env = EnvSnapshot::capture(&[]).unwrap();
        assert!(env.get("PATH").is_some());
    }
}
