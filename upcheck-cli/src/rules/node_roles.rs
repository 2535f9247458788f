//! Node roles are no longer node attributes

use crate::cluster::Node;
use crate::models::{Finding, Severity};
use crate::rules::base::{Rule, RuleInfo};

const INFO: RuleInfo = RuleInfo {
    id: "node-roles",
    title: "Node roles",
    doc_url: "https://www.elastic.co/guide/en/elasticsearch/reference/master/breaking_50_settings_changes.html#_node_types_settings",
    severity: Severity::Critical,
};

fn role_message(key: &str) -> Option<String> {
    match key {
        "data" | "master" => Some(format!(
            "`node.{key}` is reported as a node attribute; in the new version it is a role setting and is no longer exposed in `node.attributes`"
        )),
        "client" => Some(
            "`node.client: true` should be replaced with `node.data: false` and `node.master: false`"
                .to_string(),
        ),
        _ => None,
    }
}

pub struct NodeRolesRule;

impl Rule for NodeRolesRule {
    fn info(&self) -> &RuleInfo {
        &INFO
    }

    fn check(&self, node: &mut Node) -> Finding {
        INFO.check_entries(node.attributes.snapshot(), |key, _| role_message(key))
    }
}
