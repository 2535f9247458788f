//! Index-level settings can no longer live in the node config

use crate::cluster::Node;
use crate::models::{Finding, Severity};
use crate::rules::base::{Rule, RuleInfo};
use crate::settings::strip_dot_num;

const INFO: RuleInfo = RuleInfo {
    id: "index-settings",
    title: "Index settings",
    doc_url: "https://www.elastic.co/guide/en/elasticsearch/reference/master/breaking_50_settings_changes.html#_index_level_settings",
    severity: Severity::Critical,
};

/// Index settings that are still accepted in the node config
const NODE_LEVEL_INDEX_SETTINGS: &[&str] =
    &["index.codec", "index.store.fs.fs_lock", "index.store.type"];

pub struct IndexSettingsRule;

impl Rule for IndexSettingsRule {
    fn info(&self) -> &RuleInfo {
        &INFO
    }

    fn check(&self, node: &mut Node) -> Finding {
        let settings = &mut node.settings;
        INFO.check_entries(settings.snapshot(), |key, _| {
            let base = strip_dot_num(key);
            if !base.starts_with("index.") || NODE_LEVEL_INDEX_SETTINGS.contains(&base) {
                return None;
            }
            settings.remove(key);
            Some(format!("`{base}` can no longer be set in the config file"))
        })
    }
}
