//! Configuration module for upcheck
//!
//! This module handles:
//! - Project-level configuration (upcheck.toml)
//! - User-level configuration (~/.config/upcheck/config.toml)
//! - Rule skipping
//! - CLI defaults

mod project_config;

pub use project_config::{
    load_config, load_project_config, CliDefaults, ClusterConfig, ProjectConfig, RulesConfig,
    CONFIG_FILE_NAME, DEFAULT_TIMEOUT_SECS, DEFAULT_URL, EXAMPLE_CONFIG,
};
