//! # netdoctor Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module loads the optional TOML configuration that tells netdoctor
//! which environment variables to read and which defaults to fall back on.
//! Nothing here is required: with no configuration files present, the
//! built-in defaults (`NETDOCTOR_*` variables, port 8000, host `backend.local`)
//! apply.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. An explicit `--config <PATH>` file, or else the project-specific
//!    `.netdoctor.toml` in the current directory or an ancestor (the search
//!    stops at the first directory containing `.git`)
//! 2. User-specific `config.toml` in the platform config directory
//! 3. Default values defined in the code
//!
//! Every field in the file structs is optional, so the merge is field-wise:
//! a project file only has to name the settings it changes.
//!
//! ## Examples
//!
//! ```toml
//! [variables]
//! profile = "BACKEND_PROFILE"
//! base_url_fallbacks = ["API_BASE_URL"]
//!
//! [defaults]
//! hostname = "studio.local"
//! port = 8080
//!
//! [resolver]
//! timeout_ms = 2000
//! ```
//!
//! ```rust
//! let settings = config::load_config(None)?.into_settings()?;
//! let env = EnvSnapshot::capture(&settings.profile.watched_variables())?;
//! ```
//!
use crate::core::error::{NetdoctorError, Result};
use crate::engine::profile::{Profile, ProfileSettings};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info, warn};

const PROJECT_CONFIG_FILENAME: &str = ".netdoctor.toml";

/// Default upper bound on the single DNS lookup.
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Represents one configuration file, as written on disk.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub variables: VariablesConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Names of the environment variables netdoctor reads.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct VariablesConfig {
    pub profile: Option<String>,
    pub static_ip: Option<String>,
    pub hostname: Option<String>,
    pub port: Option<String>,
    /// The fixed base-URL variable, always checked last.
    pub base_url: Option<String>,
    pub host_state_file: Option<String>,
    /// Extra base-URL variables checked, in order, before `base_url`.
    pub base_url_fallbacks: Option<Vec<String>>,
}

/// Values used when the corresponding variable is unset.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    pub hostname: Option<String>,
    pub port: Option<u16>,
    /// Host-state file location (can use ~). Will be expanded.
    pub host_state_file: Option<String>,
}

/// Settings for the host resolution stage.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    pub timeout_ms: Option<u64>,
    /// Forces a profile, bypassing the requested-profile variable.
    pub profile: Option<Profile>,
}

/// Fully-resolved settings used by a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub profile: ProfileSettings,
    pub timeout: Duration,
    pub forced_profile: Option<Profile>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profile: ProfileSettings::default(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            forced_profile: None,
        }
    }
}

impl Config {
    /// Applies defaults, expands paths and validates the merged configuration.
    pub fn into_settings(self) -> Result<Settings> {
        let mut profile = ProfileSettings::default();
        let vars = self.variables;
        if let Some(v) = vars.profile {
            profile.profile_var = v;
        }
        if let Some(v) = vars.static_ip {
            profile.static_ip_var = v;
        }
        if let Some(v) = vars.hostname {
            profile.hostname_var = v;
        }
        if let Some(v) = vars.port {
            profile.port_var = v;
        }
        if let Some(v) = vars.base_url {
            profile.base_url_var = v;
        }
        if let Some(v) = vars.host_state_file {
            profile.host_state_var = v;
        }
        if let Some(v) = vars.base_url_fallbacks {
            profile.base_url_fallbacks = v;
        }
        if let Some(v) = self.defaults.hostname {
            profile.default_hostname = v;
        }
        if let Some(v) = self.defaults.port {
            profile.default_port = v;
        }
        if let Some(v) = self.defaults.host_state_file {
            profile.default_host_state_file = PathBuf::from(shellexpand::tilde(&v).into_owned());
            debug!(
                "Expanded host-state path: {}",
                profile.default_host_state_file.display()
            );
        }

        let settings = Settings {
            profile,
            timeout: Duration::from_millis(self.resolver.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)),
            forced_profile: self.resolver.profile,
        };
        validate_settings(&settings).context("Configuration validation failed")?;
        Ok(settings)
    }
}

/// Loads and merges the user configuration with either `explicit` or the
/// discovered project configuration.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(anyhow!(NetdoctorError::FileSystem(format!(
                    "Config file '{}' does not exist or is not a file.",
                    path.display()
                ))));
            }
            info!("Loading configuration from: {}", path.display());
            Some(load_config_from_path(path)?)
        }
        None => load_project_config()?,
    };
    let merged = merge_configs(user_config.unwrap_or_default(), project_config);
    debug!("Merged configuration: {:?}", merged);
    Ok(merged)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "netdoctor", "netdoctor") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(path) = find_project_config_path(&current_dir) {
        info!("Loading project configuration from: {}", path.display());
        load_config_from_path(&path).map(Some)
    } else {
        debug!("No project configuration file (.netdoctor.toml) found.");
        Ok(None)
    }
}

/// Walks up from `start` looking for `.netdoctor.toml`, stopping at the
/// repository root (a directory containing `.git`).
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project = match project {
        Some(p) => p,
        None => return user,
    };
    Config {
        variables: VariablesConfig {
            profile: project.variables.profile.or(user.variables.profile),
            static_ip: project.variables.static_ip.or(user.variables.static_ip),
            hostname: project.variables.hostname.or(user.variables.hostname),
            port: project.variables.port.or(user.variables.port),
            base_url: project.variables.base_url.or(user.variables.base_url),
            host_state_file: project
                .variables
                .host_state_file
                .or(user.variables.host_state_file),
            base_url_fallbacks: project
                .variables
                .base_url_fallbacks
                .or(user.variables.base_url_fallbacks),
        },
        defaults: DefaultsConfig {
            hostname: project.defaults.hostname.or(user.defaults.hostname),
            port: project.defaults.port.or(user.defaults.port),
            host_state_file: project
                .defaults
                .host_state_file
                .or(user.defaults.host_state_file),
        },
        resolver: ResolverConfig {
            timeout_ms: project.resolver.timeout_ms.or(user.resolver.timeout_ms),
            profile: project.resolver.profile.or(user.resolver.profile),
        },
    }
}

fn validate_settings(settings: &Settings) -> Result<()> {
    let p = &settings.profile;
    let names = [
        ("variables.profile", &p.profile_var),
        ("variables.static_ip", &p.static_ip_var),
        ("variables.hostname", &p.hostname_var),
        ("variables.port", &p.port_var),
        ("variables.base_url", &p.base_url_var),
        ("variables.host_state_file", &p.host_state_var),
    ];
    for (key, value) in names {
        if value.trim().is_empty() {
            return Err(anyhow!(NetdoctorError::Config(format!(
                "'{}' cannot be empty.",
                key
            ))));
        }
    }
    if p.base_url_fallbacks.iter().any(|v| v.trim().is_empty()) {
        return Err(anyhow!(NetdoctorError::Config(
            "'variables.base_url_fallbacks' cannot contain empty names.".to_string()
        )));
    }
    if p.default_hostname.trim().is_empty() {
        return Err(anyhow!(NetdoctorError::Config(
            "'defaults.hostname' cannot be empty.".to_string()
        )));
    }
    if p.default_port == 0 {
        return Err(anyhow!(NetdoctorError::Config(
            "'defaults.port' must be between 1 and 65535.".to_string()
        )));
    }
    if settings.timeout.is_zero() {
        return Err(anyhow!(NetdoctorError::Config(
            "'resolver.timeout_ms' must be greater than zero.".to_string()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [variables]
            profile = "BACKEND_PROFILE"
            base_url_fallbacks = ["API_BASE_URL", "SERVICE_URL"]

            [defaults]
            hostname = "studio.local"
            port = 9000

            [resolver]
            timeout_ms = 1500
            profile = "custom"
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");
        assert_eq!(config.variables.profile.as_deref(), Some("BACKEND_PROFILE"));
        assert_eq!(config.defaults.port, Some(9000));
        assert_eq!(config.resolver.profile, Some(Profile::Custom));

        let settings = config.into_settings().unwrap();
        assert_eq!(settings.profile.profile_var, "BACKEND_PROFILE");
        assert_eq!(settings.profile.static_ip_var, "NETDOCTOR_STATIC_IP"); // Default
        assert_eq!(
            settings.profile.base_url_fallbacks,
            vec!["API_BASE_URL", "SERVICE_URL"]
        );
        assert_eq!(settings.profile.default_hostname, "studio.local");
        assert_eq!(settings.timeout, Duration::from_millis(1500));
        assert_eq!(settings.forced_profile, Some(Profile::Custom));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[resolver]\nretries = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_config_yields_defaults() {
        let settings = Config::default().into_settings().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_host_state_path_expansion() {
        let config = Config {
            defaults: DefaultsConfig {
                host_state_file: Some("~/state/host.json".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let settings = config.into_settings().unwrap();
        let home_dir = dirs::home_dir().unwrap();
        assert_eq!(
            settings.profile.default_host_state_file,
            home_dir.join("state/host.json")
        );
    }

    #[test]
    fn test_merge_project_overrides_user_fieldwise() {
        let user = Config {
            defaults: DefaultsConfig {
                hostname: Some("user.local".into()),
                port: Some(7000),
                ..Default::default()
            },
            ..Default::default()
        };
        let project = Config {
            defaults: DefaultsConfig {
                port: Some(9000),
                ..Default::default()
            },
            ..Default::default()
        };
        let merged = merge_configs(user, Some(project));
        assert_eq!(merged.defaults.hostname.as_deref(), Some("user.local"));
        assert_eq!(merged.defaults.port, Some(9000));
    }

    #[test]
    fn test_validate_rejects_zero_port_and_timeout() {
        let zero_port = Config {
            defaults: DefaultsConfig {
                port: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = zero_port.into_settings().unwrap_err();
        assert!(format!("{:#}", err).contains("defaults.port"));

        let zero_timeout = Config {
            resolver: ResolverConfig {
                timeout_ms: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = zero_timeout.into_settings().unwrap_err();
        assert!(format!("{:#}", err).contains("timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_empty_variable_name() {
        let config = Config {
            variables: VariablesConfig {
                hostname: Some("  ".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = config.into_settings().unwrap_err();
        assert!(format!("{:#}", err).contains("variables.hostname"));
    }

    #[test]
    fn test_find_project_config_walks_up_and_stops_at_git() {
        let temp_dir = tempdir().unwrap();
        let repo = temp_dir.path().join("repo");
        let nested = repo.join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir(repo.join(".git")).unwrap();

        assert_eq!(find_project_config_path(&nested), None);

        fs::write(repo.join(PROJECT_CONFIG_FILENAME), "").unwrap();
        assert_eq!(
            find_project_config_path(&nested),
            Some(repo.join(PROJECT_CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_load_config_explicit_missing_file() {
        let temp_dir = tempdir().unwrap();
        let result = load_config(Some(&temp_dir.path().join("nope.toml")));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("does not exist or is not a file"));
    }
}
