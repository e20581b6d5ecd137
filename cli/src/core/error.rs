//! # netdoctor Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used for failures that abort a
//! netdoctor run. Expected diagnostic outcomes (a loopback host on a LAN
//! profile, an unresolvable hostname, a corrupt state file) are **not** errors:
//! they are captured as `Finding`s inside the report. Only unexpected top-level
//! failures travel through this module.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `NetdoctorError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover:
//! - Configuration file errors
//! - Environment snapshot errors
//! - Filesystem errors
//! - Report rendering errors
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! return Err(NetdoctorError::Config("port must be non-zero".into()))?;
//!
//! // Add context to errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read file: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Custom error type for netdoctor.
#[derive(Error, Debug)]
pub enum NetdoctorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable '{name}' is not valid UTF-8")]
    NonUnicodeEnv { name: String },

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Failed to render report: {source}")]
    Report {
        #[from]
        source: serde_json::Error,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
