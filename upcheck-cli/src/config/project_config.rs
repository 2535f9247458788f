//! Project-level configuration support
//!
//! Loads configuration from `upcheck.toml` in the working directory (or an
//! explicit path), layered over the user-level
//! `~/.config/upcheck/config.toml`.
//!
//! # Configuration Format
//!
//! ```toml
//! # upcheck.toml
//!
//! [cluster]
//! url = "http://localhost:9200"
//! timeout_secs = 30
//!
//! [rules]
//! skip = ["minimum-master-nodes"]
//!
//! [defaults]
//! format = "text"
//! fail_on = "critical"
//! ```

use crate::models::Severity;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = "upcheck.toml";
pub const DEFAULT_URL: &str = "http://localhost:9200";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Written by `upcheck init`
pub const EXAMPLE_CONFIG: &str = r#"# upcheck configuration

[cluster]
# Base URL of any node in the cluster (UPCHECK_URL overrides this)
url = "http://localhost:9200"
# Timeout for each API call, in seconds
timeout_secs = 30

[rules]
# Rule ids to leave out (see `upcheck rules`)
skip = []

[defaults]
# Output format: text or json
format = "text"
# Exit with status 1 when the cluster grade reaches this level (warn, critical)
# fail_on = "critical"
"#;

/// Configuration loaded from upcheck.toml
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ProjectConfig {
    #[serde(default)]
    pub cluster: ClusterConfig,

    #[serde(default)]
    pub rules: RulesConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Where and how to reach the cluster
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ClusterConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Rule catalog adjustments
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct RulesConfig {
    /// Rule ids that are not evaluated
    #[serde(default)]
    pub skip: Vec<String>,
}

/// Default values for CLI flags
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct CliDefaults {
    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub fail_on: Option<Severity>,
}

impl ProjectConfig {
    pub fn url(&self) -> &str {
        self.cluster.url.as_deref().unwrap_or(DEFAULT_URL)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.cluster.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    /// Layer `other` over `self`: values set in `other` win, skip lists add up
    pub fn merge(&mut self, other: ProjectConfig) {
        if other.cluster.url.is_some() {
            self.cluster.url = other.cluster.url;
        }
        if other.cluster.timeout_secs.is_some() {
            self.cluster.timeout_secs = other.cluster.timeout_secs;
        }
        for id in other.rules.skip {
            if !self.rules.skip.contains(&id) {
                self.rules.skip.push(id);
            }
        }
        if other.defaults.format.is_some() {
            self.defaults.format = other.defaults.format;
        }
        if other.defaults.fail_on.is_some() {
            self.defaults.fail_on = other.defaults.fail_on;
        }
    }
}

/// Get the user config file path
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("upcheck").join("config.toml"))
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Load a config file, logging and ignoring anything unreadable
fn try_load(path: &Path) -> Option<ProjectConfig> {
    if !path.exists() {
        return None;
    }
    match load_toml_config(path) {
        Ok(config) => {
            debug!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(e) => {
            warn!("Failed to load {}: {}", path.display(), e);
            None
        }
    }
}

/// Load `upcheck.toml` from `dir`, or defaults when absent or invalid
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    try_load(&dir.join(CONFIG_FILE_NAME)).unwrap_or_else(|| {
        debug!("No project config found, using defaults");
        ProjectConfig::default()
    })
}

/// Load the effective configuration, with priority:
/// 1. `explicit` path, or `upcheck.toml` in `dir` (highest)
/// 2. User config (~/.config/upcheck/config.toml)
/// 3. Built-in defaults
pub fn load_config(dir: &Path, explicit: Option<&Path>) -> ProjectConfig {
    let mut config = ProjectConfig::default();

    if let Some(user) = user_config_path().and_then(|p| try_load(&p)) {
        config.merge(user);
    }

    let project = match explicit {
        Some(path) => {
            if !path.exists() {
                warn!("Config file {} does not exist", path.display());
            }
            try_load(path).unwrap_or_default()
        }
        None => load_project_config(dir),
    };
    config.merge(project);
    config
}
