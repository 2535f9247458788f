//! `_non_loopback_` is no longer a valid host value

use crate::cluster::Node;
use crate::models::{Finding, Severity};
use crate::rules::base::{Rule, RuleInfo};
use crate::settings::strip_dot_num;

const INFO: RuleInfo = RuleInfo {
    id: "host-settings",
    title: "Host Settings",
    doc_url: "https://www.elastic.co/guide/en/elasticsearch/reference/master/breaking_50_settings_changes.html#_network_settings",
    severity: Severity::Critical,
};

const NON_LOOPBACK: &str = "_non_loopback_";

pub struct HostSettingsRule;

impl Rule for HostSettingsRule {
    fn info(&self) -> &RuleInfo {
        &INFO
    }

    fn check(&self, node: &mut Node) -> Finding {
        INFO.check_entries(node.settings.snapshot(), |key, value| {
            let base = strip_dot_num(key);
            if base.ends_with(".host") && value.as_str() == Some(NON_LOOPBACK) {
                return Some(format!("`{base}` no longer accepts `{NON_LOOPBACK}`"));
            }
            None
        })
    }
}
