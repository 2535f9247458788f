//! Script mode settings: renamed keys and boolean-only values

use crate::cluster::Node;
use crate::models::{Finding, Severity};
use crate::rules::base::{Rule, RuleInfo};
use regex::Regex;
use std::sync::OnceLock;

const INFO: RuleInfo = RuleInfo {
    id: "script-settings",
    title: "Script Settings",
    doc_url: "https://www.elastic.co/guide/en/elasticsearch/reference/master/breaking_50_settings_changes.html#_script_mode_settings",
    severity: Severity::Critical,
};

static INDEXED_PATTERN: OnceLock<Regex> = OnceLock::new();
static PYTHON_PATTERN: OnceLock<Regex> = OnceLock::new();
static JAVASCRIPT_PATTERN: OnceLock<Regex> = OnceLock::new();

fn indexed_pattern() -> &'static Regex {
    INDEXED_PATTERN.get_or_init(|| Regex::new(r"\.indexed").expect("valid regex"))
}

fn python_pattern() -> &'static Regex {
    PYTHON_PATTERN.get_or_init(|| Regex::new(r"\.py\b").expect("valid regex"))
}

fn javascript_pattern() -> &'static Regex {
    JAVASCRIPT_PATTERN.get_or_init(|| Regex::new(r"\.js\b").expect("valid regex"))
}

/// New name of a script setting. Each rename applies to the first match only.
fn renamed_script_key(key: &str) -> String {
    let key = indexed_pattern().replace(key, ".stored");
    let key = python_pattern().replace(&key, ".python");
    javascript_pattern().replace(&key, ".javascript").into_owned()
}

pub struct ScriptSettingsRule;

impl Rule for ScriptSettingsRule {
    fn info(&self) -> &RuleInfo {
        &INFO
    }

    fn check(&self, node: &mut Node) -> Finding {
        let settings = &mut node.settings;
        INFO.check_entries(settings.snapshot(), |key, value| {
            if !key.starts_with("script.") {
                return None;
            }
            let mut messages = vec![];
            let new_key = renamed_script_key(key);
            if new_key != key {
                messages.push(format!("`{key}` has been renamed to `{new_key}`"));
                settings.remove(key);
            }
            // Non-string values cannot be tested and are left alone
            if let Some(v) = value.as_str() {
                if v != "true" && v != "false" {
                    messages.push(format!("`{new_key}` only accepts `true` | `false`"));
                }
            }
            Some(messages.join("\n"))
        })
    }
}
