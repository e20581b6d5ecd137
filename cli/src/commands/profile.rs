//! # netdoctor Profile Command
//!
//! File: cli/src/commands/profile.rs
//! Author: Christi Mahu
//!
//! Implements `netdoctor profile`: resolves the profile and runs the
//! validator, without any DNS lookup or state-file read. Always exits 0.
//!
//! ```bash
//! NETDOCTOR_PROFILE=lan-static NETDOCTOR_STATIC_IP=10.0.0.5 netdoctor profile --json
//! ```
//!
use crate::commands::{prepare_run, TargetArgs};
use crate::common::ui;
use crate::core::error::{NetdoctorError, Result};
use crate::engine::{self, report::Finding};
use clap::Parser;
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Show the resolved network profile without resolving the host")]
pub struct ProfileArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Emit JSON instead of a human summary.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileOutput<'a> {
    #[serde(flatten)]
    profile: &'a engine::profile::NetworkProfile,
    issues: &'a [Finding],
}

pub fn handle_profile(args: ProfileArgs, config_path: Option<&Path>) -> Result<i32> {
    info!("Handling profile command...");
    let (settings, env, request) = prepare_run(config_path, &args.target)?;
    let (profile, findings) = engine::check_profile(&env, &settings, &request);

    if args.json {
        let output = ProfileOutput {
            profile: &profile,
            issues: &findings.issues,
        };
        let json = serde_json::to_string_pretty(&output).map_err(NetdoctorError::from)?;
        println!("{}", json);
    } else {
        print!("{}", ui::render_profile(&profile, &findings));
    }
    Ok(0)
}
