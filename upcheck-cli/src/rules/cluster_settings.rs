//! Cluster-wide settings catalog
//!
//! Three sweeps over a node's remaining settings, run after every
//! node-specific rule has consumed the keys it owns:
//! - `removed_settings`: settings that no longer exist
//! - `renamed_settings`: settings that moved to a new key
//! - `unknown_settings`: anything left outside the recognised namespaces
//!
//! Every flagged key is consumed.

use crate::cluster::Node;
use crate::models::{Finding, Severity};
use crate::rules::base::{Rule, RuleInfo};
use crate::settings::{strip_dot_num, Settings};

const REMOVED_INFO: RuleInfo = RuleInfo {
    id: "removed-settings",
    title: "Removed settings",
    doc_url: "https://www.elastic.co/guide/en/elasticsearch/reference/master/breaking_50_settings_changes.html",
    severity: Severity::Critical,
};

const RENAMED_INFO: RuleInfo = RuleInfo {
    id: "renamed-settings",
    title: "Renamed settings",
    doc_url: "https://www.elastic.co/guide/en/elasticsearch/reference/master/breaking_50_settings_changes.html",
    severity: Severity::Critical,
};

const UNKNOWN_INFO: RuleInfo = RuleInfo {
    id: "unknown-settings",
    title: "Unknown settings",
    doc_url: "https://www.elastic.co/guide/en/elasticsearch/reference/master/breaking_50_settings_changes.html",
    severity: Severity::Warn,
};

/// Removed settings. A trailing `.*` matches the whole namespace.
const REMOVED: &[(&str, &str)] = &[
    ("security.manager.enabled", "the security manager can no longer be disabled"),
    ("node.local", "use `transport.type: local` and `http.enabled: false` instead"),
    ("node.mode", "use `transport.type` and `http.enabled` instead"),
    ("path.plugins", "plugins are always loaded from the `plugins` directory"),
    ("discovery.zen.ping.multicast.*", "multicast discovery has been removed"),
    ("indices.recovery.concurrent_streams", "recovery streams are no longer configurable"),
    (
        "indices.recovery.concurrent_small_file_streams",
        "recovery streams are no longer configurable",
    ),
    ("indices.recovery.file_chunk_size", "recovery chunking is no longer configurable"),
    ("indices.recovery.translog_ops", "recovery chunking is no longer configurable"),
    ("indices.recovery.translog_size", "recovery chunking is no longer configurable"),
    ("indices.recovery.compress", "recovery compression follows `transport.tcp.compress`"),
    ("indices.store.throttle.type", "store throttling has been removed"),
    ("indices.store.throttle.max_bytes_per_sec", "store throttling has been removed"),
    ("indices.memory.min_shard_index_buffer_size", "the indexing buffer is shared between shards"),
    ("indices.memory.max_shard_index_buffer_size", "the indexing buffer is shared between shards"),
    ("indices.fielddata.cache.expire", "fielddata entries no longer expire"),
    ("network.tcp.blocking", "blocking I/O is no longer supported"),
    ("network.tcp.blocking_server", "blocking I/O is no longer supported"),
    ("network.tcp.blocking_client", "blocking I/O is no longer supported"),
];

const RENAMED: &[(&str, &str)] = &[
    ("bootstrap.mlockall", "bootstrap.memory_lock"),
    (
        "cluster.routing.allocation.concurrent_recoveries",
        "cluster.routing.allocation.node_concurrent_recoveries",
    ),
    ("indices.cache.query.size", "indices.requests.cache.size"),
    ("indices.cache.query.expire", "indices.requests.cache.expire"),
    ("indices.cache.filter.size", "indices.queries.cache.size"),
    ("node.add_id_to_custom_path", "node.add_lock_id_to_custom_path"),
    (
        "discovery.zen.master_election.filter_client",
        "discovery.zen.master_election.ignore_non_master_pings",
    ),
    (
        "discovery.zen.master_election.filter_data",
        "discovery.zen.master_election.ignore_non_master_pings",
    ),
    ("cloud.aws.proxy_host", "cloud.aws.proxy.host"),
    ("cloud.aws.proxy_port", "cloud.aws.proxy.port"),
];

/// Top-level namespaces understood by a stock node
const KNOWN_NAMESPACES: &[&str] = &[
    "action",
    "bootstrap",
    "cache",
    "client",
    "cloud",
    "cluster",
    "config",
    "discovery",
    "gateway",
    "http",
    "index",
    "indices",
    "logger",
    "monitor",
    "network",
    "node",
    "path",
    "pidfile",
    "plugin",
    "processors",
    "repositories",
    "resource",
    "script",
    "search",
    "security",
    "thread_pool",
    "transport",
    "tribe",
    "xpack",
];

fn removed_note(base: &str) -> Option<&'static str> {
    REMOVED.iter().find_map(|(pattern, note)| {
        let matched = match pattern.strip_suffix(".*") {
            Some(prefix) => base
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('.')),
            None => base == *pattern,
        };
        matched.then_some(*note)
    })
}

fn renamed_to(base: &str) -> Option<&'static str> {
    RENAMED
        .iter()
        .find(|(old, _)| *old == base)
        .map(|(_, new)| *new)
}

fn is_known_namespace(key: &str) -> bool {
    let root = key.split('.').next().unwrap_or(key);
    KNOWN_NAMESPACES.contains(&root)
}

pub fn removed_settings(settings: &mut Settings) -> Finding {
    REMOVED_INFO.check_entries(settings.snapshot(), |key, _| {
        let base = strip_dot_num(key);
        let note = removed_note(base)?;
        settings.remove(key);
        Some(format!("`{base}` has been removed: {note}"))
    })
}

pub fn renamed_settings(settings: &mut Settings) -> Finding {
    RENAMED_INFO.check_entries(settings.snapshot(), |key, _| {
        let base = strip_dot_num(key);
        let new_key = renamed_to(base)?;
        settings.remove(key);
        Some(format!("`{base}` has been renamed to `{new_key}`"))
    })
}

pub fn unknown_settings(settings: &mut Settings) -> Finding {
    UNKNOWN_INFO.check_entries(settings.snapshot(), |key, _| {
        if is_known_namespace(key) {
            return None;
        }
        settings.remove(key);
        Some(format!(
            "`{}` is not a recognised setting and will be rejected at startup unless a plugin registers it",
            strip_dot_num(key)
        ))
    })
}

pub struct RemovedSettingsRule;

impl Rule for RemovedSettingsRule {
    fn info(&self) -> &RuleInfo {
        &REMOVED_INFO
    }

    fn check(&self, node: &mut Node) -> Finding {
        removed_settings(&mut node.settings)
    }
}

pub struct RenamedSettingsRule;

impl Rule for RenamedSettingsRule {
    fn info(&self) -> &RuleInfo {
        &RENAMED_INFO
    }

    fn check(&self, node: &mut Node) -> Finding {
        renamed_settings(&mut node.settings)
    }
}

pub struct UnknownSettingsRule;

impl Rule for UnknownSettingsRule {
    fn info(&self) -> &RuleInfo {
        &UNKNOWN_INFO
    }

    fn check(&self, node: &mut Node) -> Finding {
        unknown_settings(&mut node.settings)
    }
}
