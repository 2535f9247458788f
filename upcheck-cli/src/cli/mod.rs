//! CLI command definitions and handlers

mod check;
mod init;
mod rules;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate the request timeout (1-3600 seconds)
fn parse_timeout(s: &str) -> Result<u64, String> {
    let n: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("timeout must be at least 1 second".to_string())
    } else if n > 3600 {
        Err("timeout cannot exceed 3600 seconds".to_string())
    } else {
        Ok(n)
    }
}

/// upcheck - Elasticsearch 5.0 upgrade readiness checker
#[derive(Parser, Debug)]
#[command(name = "upcheck")]
#[command(
    version,
    about = "Check every node of an Elasticsearch cluster for settings that block the upgrade to 5.0",
    long_about = "upcheck reads each node's settings, JVM, OS and process facts from the \
cluster API and runs them through an ordered catalog of compatibility rules. \
Every node is graded ok, warn or critical; the cluster gets the worst node grade.\n\n\
Run without a subcommand to check the cluster at --url:\n  \
upcheck --url http://localhost:9200",
    after_help = "\
Examples:
  upcheck                                          Check http://localhost:9200
  upcheck --url http://es-1:9200 --format json     JSON output for scripting
  upcheck --fail-on critical                       Exit code 1 on critical nodes (CI mode)
  upcheck --skip-rule minimum-master-nodes         Leave a rule out
  upcheck --nodes-file info.json --stats-file stats.json   Check saved API responses
  upcheck rules                                    List the rule catalog
  upcheck init                                     Write an example upcheck.toml"
)]
pub struct Cli {
    /// Cluster base URL (default: from config, else http://localhost:9200)
    #[arg(long, global = true, env = "UPCHECK_URL")]
    pub url: Option<String>,

    /// Config file (default: ./upcheck.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format: text, json
    #[arg(long, short = 'f', value_parser = ["text", "json"])]
    pub format: Option<String>,

    /// Output file path (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Exit with code 1 if the cluster grade reaches this level
    #[arg(long, value_parser = ["warn", "critical"])]
    pub fail_on: Option<String>,

    /// Rule id to leave out (repeatable, see `upcheck rules`)
    #[arg(long = "skip-rule", value_name = "RULE")]
    pub skip_rules: Vec<String>,

    /// Request timeout in seconds (1-3600)
    #[arg(long, value_parser = parse_timeout)]
    pub timeout: Option<u64>,

    /// Saved `GET /_nodes/settings,os,process,jvm,plugins?flat_settings=true` response
    #[arg(long, requires = "stats_file")]
    pub nodes_file: Option<PathBuf>,

    /// Saved `GET /_nodes/stats/process` response
    #[arg(long, requires = "nodes_file")]
    pub stats_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write an example upcheck.toml config file
    Init {
        /// Directory to write the config into
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// List the rule catalog in evaluation order
    Rules,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Init { ref path }) => init::run(path),
        Some(Commands::Rules) => rules::run(),
        None => check::run(&cli),
    }
}
