//! # netdoctor Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers that are neither engine logic (`engine::`) nor core
//! infrastructure (`core::`).
//!
//! - **`fs`**: Read-only file helpers (`read_optional_file`).
//! - **`ui`**: Human-readable rendering of reports and profiles.
//!

/// Read-only filesystem helpers.
pub mod fs;
/// Terminal rendering of diagnostic results.
pub mod ui;
