//! # netdoctor Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Filesystem helpers. netdoctor never writes files, so this is read-only.
//!
//! - **`io`**: `read_optional_file`, which separates a missing file from an
//!   unreadable one. Used by the drift detector for the host-state file.
//!

/// Contains read helpers (e.g., `read_optional_file`).
pub mod io;
