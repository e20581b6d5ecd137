//! # netdoctor Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the netdoctor CLI. The
//! commands are thin: they load configuration, capture the environment, call
//! into `engine::` and print the result.
//!
//! ## Commands
//!
//! - `doctor`: Full diagnostic run (profile, validation, DNS, drift) with
//!   `--json`, `--strict` and `--gate`
//! - `profile`: Resolver and validator only; no DNS lookup, no state file
//!
//! Both share `TargetArgs` and `prepare_run`, defined here.
//!
use crate::core::{
    config::{self, Settings},
    env::EnvSnapshot,
    error::Result,
};
use crate::engine::{profile::Profile, DiagnosticRequest};
use anyhow::Context;
use clap::Args;
use std::path::Path;
use tracing::debug;

/// Implements `netdoctor doctor`.
pub mod doctor;
/// Implements `netdoctor profile`.
pub mod profile;

/// Arguments that influence profile resolution, shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Extra environment variable to read the base URL from. Repeatable;
    /// checked in order before the configured ones.
    #[arg(long = "base-url-var", value_name = "NAME")]
    pub base_url_vars: Vec<String>,

    /// Force a profile instead of reading the requested-profile variable.
    /// This is the only way to select `custom`.
    #[arg(long, value_enum)]
    pub profile: Option<Profile>,
}

/// Loads settings, applies CLI overrides and captures the environment.
pub(crate) fn prepare_run(
    config_path: Option<&Path>,
    target: &TargetArgs,
) -> Result<(Settings, EnvSnapshot, DiagnosticRequest)> {
    let mut settings = config::load_config(config_path)?
        .into_settings()
        .context("Failed to load netdoctor configuration")?;
    if let Some(profile) = target.profile {
        settings.forced_profile = Some(profile);
    }

    let watched = settings.profile.watched_variables(&target.base_url_vars);
    let env = EnvSnapshot::capture(&watched).context("Failed to capture environment")?;

    let request = DiagnosticRequest {
        extra_base_url_vars: target.base_url_vars.clone(),
        strict_mode: false,
        base_dir: Some(std::env::current_dir().context("Failed to get current directory")?),
    };
    debug!("Prepared run: {:?} / {:?}", settings, request);
    Ok((settings, env, request))
}
