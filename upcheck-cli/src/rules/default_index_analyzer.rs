//! `default_index` analyzer renamed to `default`

use crate::cluster::Node;
use crate::models::{Finding, Severity};
use crate::rules::base::{Rule, RuleInfo};

const INFO: RuleInfo = RuleInfo {
    id: "default-index-analyzer",
    title: "Default Index Analyzer",
    doc_url: "https://www.elastic.co/guide/en/elasticsearch/reference/master/breaking_50_settings_changes.html#_index_level_settings",
    severity: Severity::Critical,
};

const DEFAULT_ANALYZER_PREFIX: &str = "index.analysis.analyzer.default";
const DEFAULT_INDEX_ANALYZER_PREFIX: &str = "index.analysis.analyzer.default_index";

pub struct DefaultIndexAnalyzerRule;

impl Rule for DefaultIndexAnalyzerRule {
    fn info(&self) -> &RuleInfo {
        &INFO
    }

    fn check(&self, node: &mut Node) -> Finding {
        let settings = &mut node.settings;
        INFO.check_entries(settings.snapshot(), |key, _| {
            let rest = key.strip_prefix(DEFAULT_INDEX_ANALYZER_PREFIX)?;
            let new_key = format!("{DEFAULT_ANALYZER_PREFIX}{rest}");
            settings.remove(key);
            Some(format!(
                "`{key}` can no longer be set in the config file, and has been renamed to `{new_key}`"
            ))
        })
    }
}
