//! `discovery.zen.minimum_master_nodes` must be configured

use crate::cluster::Node;
use crate::models::{Finding, Severity};
use crate::rules::base::{Rule, RuleInfo};

const INFO: RuleInfo = RuleInfo {
    id: "minimum-master-nodes",
    title: "Minimum Master Nodes",
    doc_url: "https://www.elastic.co/guide/en/elasticsearch/reference/master/important-settings.html#minimum_master_nodes",
    severity: Severity::Critical,
};

const MIN_MASTER_NODES_KEY: &str = "discovery.zen.minimum_master_nodes";

pub struct MinMasterNodesRule;

impl Rule for MinMasterNodesRule {
    fn info(&self) -> &RuleInfo {
        &INFO
    }

    fn check(&self, node: &mut Node) -> Finding {
        let mut messages = vec![];
        if !node.settings.contains(MIN_MASTER_NODES_KEY) {
            messages.push(format!(
                "`{MIN_MASTER_NODES_KEY}` must be set before going into production"
            ));
        }
        INFO.finding(messages)
    }
}
