//! Cluster evaluation
//!
//! Builds the node registry from the two raw API responses and grades
//! every node with the [`RuleEngine`]. Nodes are keyed by their display
//! identity (`name/host [id]`), which also fixes the reporting order.

mod node;

pub use node::{JvmInfo, JvmMem, Node, OsInfo, Plugin, ProcessInfo};

use crate::client::{FetchError, FetchResult, RawCluster, NODES_INFO_PATH, NODES_STATS_PATH};
use crate::models::{ClusterReport, NodeReport};
use crate::rules::RuleEngine;
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};

#[derive(Deserialize)]
struct NodesResponse<T> {
    nodes: BTreeMap<String, T>,
}

#[derive(Deserialize)]
struct NodeStats {
    #[serde(default)]
    process: StatsProcess,
}

#[derive(Deserialize, Default)]
struct StatsProcess {
    #[serde(default)]
    max_file_descriptors: Option<i64>,
}

fn decode<T: DeserializeOwned>(path: &str, body: Value) -> FetchResult<BTreeMap<String, T>> {
    serde_json::from_value::<NodesResponse<T>>(body)
        .map(|r| r.nodes)
        .map_err(|e| FetchError::Malformed {
            path: path.to_string(),
            message: e.to_string(),
        })
}

/// Rebuild the attribute map from `node.*` settings, for payloads that
/// carry no `attributes` object. `node.name` is not an attribute.
fn derive_attributes(node: &mut Node) {
    if !node.attributes.is_empty() {
        return;
    }
    for (key, value) in node.settings.snapshot() {
        if let Some(attr) = key.strip_prefix("node.") {
            if attr != "name" {
                node.attributes.insert(attr, value);
            }
        }
    }
}

/// Merge the two responses into nodes keyed (and sorted) by display name.
///
/// The top-level `name` setting is node metadata and is dropped from each
/// settings snapshot. A node absent from the stats response is an error;
/// a stats entry without a descriptor limit leaves the limit unknown.
pub fn build_nodes(raw: RawCluster) -> FetchResult<BTreeMap<String, Node>> {
    let infos: BTreeMap<String, Node> = decode(NODES_INFO_PATH, raw.nodes_info)?;
    let stats: BTreeMap<String, NodeStats> = decode(NODES_STATS_PATH, raw.nodes_stats)?;

    let mut nodes = BTreeMap::new();
    for (id, mut node) in infos {
        let node_stats = stats
            .get(&id)
            .ok_or_else(|| FetchError::MissingStats { node_id: id.clone() })?;
        node.id = id;
        node.settings.remove("name");
        derive_attributes(&mut node);
        node.process.max_file_descriptors = node_stats.process.max_file_descriptors;
        debug!("Registered node {}", node.display_name());
        nodes.insert(node.display_name(), node);
    }
    Ok(nodes)
}

/// Grades a whole cluster, one node at a time
pub struct ClusterEvaluator {
    engine: RuleEngine,
}

impl ClusterEvaluator {
    pub fn new(engine: RuleEngine) -> Self {
        Self { engine }
    }

    /// Evaluate every node and fold the node grades into the cluster grade.
    ///
    /// Nodes are independent, so they are evaluated in parallel; the
    /// report keeps the ascending display-name order of `nodes`.
    pub fn evaluate(&self, nodes: BTreeMap<String, Node>) -> ClusterReport {
        let reports: Vec<NodeReport> = nodes
            .into_iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(name, mut node)| self.engine.evaluate(&name, &mut node))
            .collect();

        for report in &reports {
            info!("Node `{}`: {}", report.name, report.severity);
        }

        let cluster = ClusterReport::new(reports);
        info!("Cluster: {} ({} node(s))", cluster.severity, cluster.nodes.len());
        cluster
    }

    /// Build the registry from raw responses and evaluate it
    pub fn evaluate_raw(&self, raw: RawCluster) -> FetchResult<ClusterReport> {
        Ok(self.evaluate(build_nodes(raw)?))
    }
}

impl Default for ClusterEvaluator {
    fn default() -> Self {
        Self::new(RuleEngine::with_default_rules())
    }
}
