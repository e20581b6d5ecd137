//! # netdoctor CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration test files (`doctor.rs`, `profile.rs`,
//! `main_tests.rs`). Every command built here starts from an empty
//! environment and runs inside its own temporary directory, so neither the
//! developer's shell variables nor any `.netdoctor.toml` / host-state file on
//! the machine can leak into a test.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;

/// # Get netdoctor Command (`netdoctor_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `netdoctor` binary.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn netdoctor_cmd() -> Command {
    Command::cargo_bin("netdoctor").expect("Failed to find netdoctor binary for testing")
}

/// # Isolated Command (`isolated_cmd`)
///
/// A `netdoctor` command with a cleared environment whose working directory
/// and `HOME` both point at `dir`.
pub fn isolated_cmd(dir: &Path) -> Command {
    let mut cmd = netdoctor_cmd();
    cmd.env_clear().env("HOME", dir).current_dir(dir);
    cmd
}

/// Runs the command and parses stdout as JSON.
pub fn json_stdout(cmd: &mut Command) -> (serde_json::Value, Option<i32>) {
    let output = cmd.output().expect("Failed to run netdoctor");
    let value = serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&output.stdout)
        )
    });
    (value, output.status.code())
}
