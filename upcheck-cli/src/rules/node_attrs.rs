//! Custom node attributes move to the `node.attr.` namespace

use crate::cluster::Node;
use crate::models::{Finding, Severity};
use crate::rules::base::{Rule, RuleInfo};
use crate::settings::strip_dot_num;

const INFO: RuleInfo = RuleInfo {
    id: "node-attributes",
    title: "Node attributes move to `attr` namespace",
    doc_url: "https://www.elastic.co/guide/en/elasticsearch/reference/master/breaking_50_settings_changes.html#_node_attribute_settings",
    severity: Severity::Critical,
};

/// Built-in `node.*` settings that show up as attributes but are not custom
const KNOWN_NODE_SETTINGS: &[&str] = &[
    "local",
    "mode",
    "client",
    "data",
    "master",
    "max_local_storage_nodes",
    "portsfile",
    "enable_lucene_segment_infos_trace",
    "name",
    "add_id_to_custom_path",
];

pub struct NodeAttributesRule;

impl Rule for NodeAttributesRule {
    fn info(&self) -> &RuleInfo {
        &INFO
    }

    fn check(&self, node: &mut Node) -> Finding {
        let settings = &mut node.settings;
        INFO.check_entries(node.attributes.snapshot(), |key, _| {
            let base = strip_dot_num(key);
            if KNOWN_NODE_SETTINGS.contains(&base) || base.starts_with("attr.") {
                return None;
            }
            settings.remove(&format!("node.{key}"));
            Some(format!(
                "`node.{base}` should be rewritten as `node.attr.{base}`"
            ))
        })
    }
}
