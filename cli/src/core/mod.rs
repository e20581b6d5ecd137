//! # netdoctor Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the infrastructure the diagnostic engine and the
//! command handlers share.
//!
//! ## Architecture
//!
//! - `config`: Configuration loading, merging, and validation
//! - `env`: The explicit environment snapshot passed to every engine stage
//! - `error`: Error types and error handling utilities
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::env::EnvSnapshot; // For capturing the environment
//! use crate::core::error::{NetdoctorError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod env;
pub mod error;
