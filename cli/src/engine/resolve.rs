//! # netdoctor Host Resolver
//!
//! File: cli/src/engine/resolve.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Resolves the profile's host to its addresses. This is the only stage that
//! suspends.
//!
//! - Loopback literals (`127.0.0.1`, `localhost`, `::1`) short-circuit: the
//!   result is `{mode: loopback, addresses: {host}, resolved: true}` and no
//!   lookup happens.
//! - Anything else, IP literals included, goes through exactly one
//!   "resolve all records" lookup bounded by a timeout. Sending literals
//!   through the resolver keeps the lookup acting as a liveness check of the
//!   system resolver.
//!
//! Failures (timeout, not found, resolver error) are captured in the
//! `HostResolution` rather than returned as errors.
//!
//! ## Architecture
//!
//! The actual lookup sits behind the `HostLookup` trait. `SystemLookup` uses
//! `tokio::net::lookup_host`; tests provide canned implementations.
//!
use crate::engine::profile::is_loopback_literal;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeSet;
use std::net::IpAddr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How the host was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    Loopback,
    Dns,
}

impl ResolutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionMode::Loopback => "loopback",
            ResolutionMode::Dns => "dns",
        }
    }
}

/// Outcome of resolving one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostResolution {
    pub mode: ResolutionMode,
    pub addresses: BTreeSet<String>,
    pub resolved: bool,
    pub error: Option<String>,
}

impl HostResolution {
    fn loopback(host: &str) -> Self {
        Self {
            mode: ResolutionMode::Loopback,
            addresses: BTreeSet::from([host.to_string()]),
            resolved: true,
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            mode: ResolutionMode::Dns,
            addresses: BTreeSet::new(),
            resolved: false,
            error: Some(error),
        }
    }
}

/// Name resolution backend.
#[async_trait]
pub trait HostLookup: Send + Sync {
    /// Returns every address `host` resolves to.
    async fn lookup(&self, host: &str) -> std::io::Result<Vec<IpAddr>>;
}

/// Resolves through the operating system resolver via tokio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLookup;

#[async_trait]
impl HostLookup for SystemLookup {
    async fn lookup(&self, host: &str) -> std::io::Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((host, 0)).await?;
        Ok(addrs.map(|addr| addr.ip()).collect())
    }
}

/// Resolves `host`, short-circuiting for loopback literals.
///
/// The lookup is abandoned once `timeout` elapses; that counts as a failure
/// like any other.
pub async fn resolve_host(
    lookup: &dyn HostLookup,
    host: &str,
    timeout: Duration,
) -> HostResolution {
    if is_loopback_literal(host) {
        debug!("Host '{}' is a loopback literal, skipping lookup", host);
        return HostResolution::loopback(host);
    }

    debug!("Resolving '{}' (timeout {:?})", host, timeout);
    match tokio::time::timeout(timeout, lookup.lookup(host)).await {
        Ok(Ok(addrs)) if addrs.is_empty() => {
            warn!("Lookup for '{}' returned no addresses", host);
            HostResolution::failed("no addresses returned".to_string())
        }
        Ok(Ok(addrs)) => {
            let addresses: BTreeSet<String> = addrs.iter().map(IpAddr::to_string).collect();
            info!("Resolved '{}' to {:?}", host, addresses);
            HostResolution {
                mode: ResolutionMode::Dns,
                addresses,
                resolved: true,
                error: None,
            }
        }
        Ok(Err(e)) => {
            warn!("Lookup for '{}' failed: {}", host, e);
            HostResolution::failed(e.to_string())
        }
        Err(_) => {
            warn!("Lookup for '{}' timed out", host);
            HostResolution::failed(format!("lookup timed out after {} ms", timeout.as_millis()))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned lookup that counts how often it is called.
    pub(crate) struct FakeLookup {
        pub answer: std::result::Result<Vec<IpAddr>, io::ErrorKind>,
        pub delay: Option<Duration>,
        pub calls: AtomicUsize,
    }

    impl FakeLookup {
        pub(crate) fn answering(addrs: &[&str]) -> Self {
            Self {
                answer: Ok(addrs.iter().map(|a| a.parse().unwrap()).collect()),
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing(kind: io::ErrorKind) -> Self {
            Self {
                answer: Err(kind),
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl HostLookup for FakeLookup {
        async fn lookup(&self, host: &str) -> io::Result<Vec<IpAddr>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.answer {
                Ok(addrs) => Ok(addrs.clone()),
                Err(kind) => Err(io::Error::new(*kind, format!("cannot resolve {}", host))),
            }
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(3);

    #[tokio::test]
    async fn test_loopback_short_circuits() {
        let lookup = FakeLookup::failing(io::ErrorKind::Other);
        for host in ["127.0.0.1", "localhost", "::1", "LOCALHOST"] {
            let r = resolve_host(&lookup, host, TIMEOUT).await;
            assert_eq!(r.mode, ResolutionMode::Loopback);
            assert!(r.resolved);
            assert_eq!(r.addresses, BTreeSet::from([host.to_string()]));
            assert_eq!(r.error, None);
        }
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ip_literal_still_looked_up() {
        let lookup = FakeLookup::answering(&["10.0.0.5"]);
        let r = resolve_host(&lookup, "10.0.0.5", TIMEOUT).await;
        assert_eq!(r.mode, ResolutionMode::Dns);
        assert!(r.resolved);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_addresses_are_deduplicated() {
        let lookup = FakeLookup::answering(&["192.168.1.20", "fe80::1", "192.168.1.20"]);
        let r = resolve_host(&lookup, "studio.local", TIMEOUT).await;
        assert_eq!(
            r.addresses,
            BTreeSet::from(["192.168.1.20".to_string(), "fe80::1".to_string()])
        );
    }

    #[tokio::test]
    async fn test_lookup_failure_captured() {
        let lookup = FakeLookup::failing(io::ErrorKind::NotFound);
        let r = resolve_host(&lookup, "nowhere.invalid", TIMEOUT).await;
        assert_eq!(r.mode, ResolutionMode::Dns);
        assert!(!r.resolved);
        assert!(r.addresses.is_empty());
        assert!(r.error.unwrap().contains("nowhere.invalid"));
    }

    #[tokio::test]
    async fn test_empty_answer_is_failure() {
        let lookup = FakeLookup::answering(&[]);
        let r = resolve_host(&lookup, "studio.local", TIMEOUT).await;
        assert!(!r.resolved);
        assert_eq!(r.error.as_deref(), Some("no addresses returned"));
    }

    #[tokio::test]
    async fn test_timeout_is_failure() {
        let lookup = FakeLookup {
            delay: Some(Duration::from_secs(60)),
            ..FakeLookup::answering(&["10.0.0.5"])
        };
        let r = resolve_host(&lookup, "slow.local", Duration::from_millis(50)).await;
        assert!(!r.resolved);
        assert_eq!(r.error.as_deref(), Some("lookup timed out after 50 ms"));
    }

    #[tokio::test]
    async fn test_system_lookup_ip_literal() {
        // Literal addresses resolve without touching the network.
        let r = resolve_host(&SystemLookup, "10.0.0.5", TIMEOUT).await;
        assert_eq!(r.mode, ResolutionMode::Dns);
        assert!(r.resolved);
        assert_eq!(r.addresses, BTreeSet::from(["10.0.0.5".to_string()]));
    }
}
