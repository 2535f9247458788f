//! `threadpool.*` renamed to `thread_pool.*`, with per-pool key changes

use crate::cluster::Node;
use crate::models::{Finding, Severity};
use crate::rules::base::{Rule, RuleInfo};
use regex::Regex;
use std::sync::OnceLock;

const INFO: RuleInfo = RuleInfo {
    id: "thread-pool",
    title: "Thread pool settings",
    doc_url: "https://www.elastic.co/guide/en/elasticsearch/reference/master/breaking_50_settings_changes.html#_threadpool_settings",
    severity: Severity::Critical,
};

static FIXED_POOL: OnceLock<Regex> = OnceLock::new();
static FIXED_QUEUE: OnceLock<Regex> = OnceLock::new();
static SCALING_POOL: OnceLock<Regex> = OnceLock::new();

fn fixed_pool() -> &'static Regex {
    FIXED_POOL.get_or_init(|| {
        Regex::new(r"\.(index|search|bulk|percolate|watcher)\.").expect("valid regex")
    })
}

fn fixed_queue() -> &'static Regex {
    FIXED_QUEUE.get_or_init(|| Regex::new(r"\.(capacity|queue)$").expect("valid regex"))
}

fn scaling_pool() -> &'static Regex {
    SCALING_POOL.get_or_init(|| {
        Regex::new(r"\.(snapshot|warmer|refresh|listener)\.").expect("valid regex")
    })
}

/// New name for a `threadpool*` key
fn renamed_pool_key(key: &str) -> String {
    let key = key
        .replacen("threadpool.watcher", "xpack.watcher.thread_pool", 1)
        .replacen("threadpool", "thread_pool", 1);

    if fixed_pool().is_match(&key) {
        fixed_queue().replace(&key, ".queue_size").into_owned()
    } else if scaling_pool().is_match(&key) {
        // substring replacements, first occurrence only
        key.replacen(".min", ".core", 1).replacen(".size", ".max", 1)
    } else {
        key
    }
}

pub struct ThreadPoolRule;

impl Rule for ThreadPoolRule {
    fn info(&self) -> &RuleInfo {
        &INFO
    }

    fn check(&self, node: &mut Node) -> Finding {
        let settings = &mut node.settings;
        INFO.check_entries(settings.snapshot(), |key, _| {
            if !key.starts_with("threadpool") {
                return None;
            }
            settings.remove(key);
            if key.contains("suggest") {
                return Some(format!("`{key}` has been removed"));
            }
            Some(format!(
                "`{key}` has been renamed to `{}`",
                renamed_pool_key(key)
            ))
        })
    }
}
