//! # netdoctor Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! netdoctor only ever *reads* files it does not own (the host-state file is
//! written by another process). The helper here reads such a file and keeps
//! the three outcomes apart that callers have to treat differently:
//!
//! - **`FileRead::Missing`**: nothing at the path. Usually a first run.
//! - **`FileRead::Unreadable`**: something is there but could not be read
//!   (permissions, a directory, invalid UTF-8). Carries the reason.
//! - **`FileRead::Contents`**: the file's text.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::io::{self, FileRead};
//!
//! match io::read_optional_file(Path::new(".netdoctor/host-state.json")) {
//!     FileRead::Missing => println!("first run"),
//!     FileRead::Unreadable(reason) => println!("cannot read: {}", reason),
//!     FileRead::Contents(text) => println!("{} bytes", text.len()),
//! }
//! ```
//!
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Outcome of reading a file that may legitimately be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRead {
    Missing,
    Unreadable(String),
    Contents(String),
}

/// Reads the entire file at `path` into a string without failing the caller.
///
/// # Arguments
///
/// * `path` - The file to read.
///
/// # Returns
///
/// * `FileRead` - Never an error; I/O problems other than "not found" become
///   `FileRead::Unreadable` with the OS error text.
pub fn read_optional_file(path: &Path) -> FileRead {
    match fs::read_to_string(path) {
        Ok(content) => {
            debug!("Read {} bytes from {}", content.len(), path.display());
            FileRead::Contents(content)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("File not found: {}", path.display());
            FileRead::Missing
        }
        Err(e) => {
            debug!("Failed to read {}: {}", path.display(), e);
            FileRead::Unreadable(e.to_string())
        }
    }
}
