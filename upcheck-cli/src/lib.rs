//! upcheck - upgrade readiness checker for Elasticsearch clusters
//!
//! Fetches every node's settings and runtime facts, runs them through an
//! ordered catalog of compatibility rules, and grades each node and the
//! cluster as a whole (`ok`, `warn` or `critical`).
//!
//! ```rust,ignore
//! use upcheck::client::HttpFetcher;
//! use upcheck::{run, RunOptions};
//!
//! let fetcher = HttpFetcher::new("http://localhost:9200", 30);
//! let report = run(&fetcher, &RunOptions::default())?;
//! println!("{}", report.severity);
//! ```

pub mod client;
pub mod cluster;
pub mod config;
pub mod models;
pub mod reporters;
pub mod rules;
pub mod settings;

use anyhow::{Context, Result};
use client::{fetch_cluster, Fetcher};
use cluster::ClusterEvaluator;
use models::ClusterReport;
use rules::RuleEngineBuilder;
use tracing::info;

/// Knobs for one evaluation run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Rule ids left out of the catalog
    pub skip_rules: Vec<String>,
}

/// Fetch the cluster through `fetcher` and grade every node.
pub fn run(fetcher: &dyn Fetcher, options: &RunOptions) -> Result<ClusterReport> {
    let raw = fetch_cluster(fetcher).context("Failed to fetch cluster state")?;

    let engine = RuleEngineBuilder::new()
        .skip(options.skip_rules.iter().cloned())
        .build();
    info!("Running {} rule(s)", engine.rules().len());

    let report = ClusterEvaluator::new(engine)
        .evaluate_raw(raw)
        .context("Failed to build node registry")?;
    Ok(report)
}
