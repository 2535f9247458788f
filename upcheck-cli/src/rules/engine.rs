//! Per-node rule execution
//!
//! The RuleEngine runs the registered rules against one node, strictly in
//! registration order:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      RuleEngine                         │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Apply plugin exceptions (auto-managed keys)         │
//! │  2. Run each rule in catalog order                      │
//! │     (earlier rules consume keys later rules skip)       │
//! │  3. Fold finding grades into the node grade             │
//! └─────────────────────────────────────────────────────────┘
//! ```

use crate::cluster::Node;
use crate::models::NodeReport;
use crate::rules::base::Rule;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Plugin that sets `index.queries.cache.type` on its own
const SECURITY_PLUGIN: &str = "shield";
const SECURITY_MANAGED_KEY: &str = "index.queries.cache.type";

/// Drop settings that a known plugin manages itself, so they are not
/// reported as user configuration.
fn apply_plugin_exceptions(node: &mut Node) {
    if node.has_plugin(SECURITY_PLUGIN) && node.settings.remove(SECURITY_MANAGED_KEY).is_some() {
        debug!(
            "{}: ignoring `{}` managed by {}",
            node.name, SECURITY_MANAGED_KEY, SECURITY_PLUGIN
        );
    }
}

/// Evaluates an ordered rule catalog against single nodes
pub struct RuleEngine {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleEngine {
    /// Create an engine with no rules
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Engine running the full catalog
    pub fn with_default_rules() -> Self {
        RuleEngineBuilder::new().build()
    }

    /// Append a rule; it runs after every rule registered before it
    pub fn register(&mut self, rule: Arc<dyn Rule>) {
        debug!("Registering rule: {}", rule.id());
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    /// Run every rule against `node`, mutating its settings snapshot.
    ///
    /// `name` is the display identity recorded in the report.
    pub fn evaluate(&self, name: &str, node: &mut Node) -> NodeReport {
        apply_plugin_exceptions(node);

        let findings = self
            .rules
            .iter()
            .map(|rule| {
                let finding = rule.check(node);
                if !finding.is_clean() {
                    debug!(
                        "{}: {} -> {} ({} message(s))",
                        name,
                        rule.id(),
                        finding.severity,
                        finding.messages.len()
                    );
                }
                finding
            })
            .collect();
        debug!("{}: {} setting(s) left after all rules", name, node.settings.len());

        NodeReport::new(name, findings)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Builder for the RuleEngine
pub struct RuleEngineBuilder {
    rules: Vec<Arc<dyn Rule>>,
    skip: HashSet<String>,
}

impl RuleEngineBuilder {
    /// Start from the full catalog, in evaluation order
    pub fn new() -> Self {
        Self {
            rules: super::default_rules(),
            skip: HashSet::new(),
        }
    }

    /// Leave out rules by id
    pub fn skip<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Build the engine
    pub fn build(self) -> RuleEngine {
        let mut engine = RuleEngine::new();
        for rule in self.rules {
            if self.skip.contains(rule.id()) {
                debug!("Skipping rule: {}", rule.id());
                continue;
            }
            engine.register(rule);
        }
        engine
    }
}

impl Default for RuleEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::Plugin;
    use crate::models::Severity;
    use crate::rules::tests::test_node;

    #[test]
    fn test_clean_node_is_ok() {
        let engine = RuleEngine::with_default_rules();
        let mut node = test_node(&[("cluster.name", "prod"), ("path.data.0", "/data")]);
        let report = engine.evaluate("n1", &mut node);
        assert_eq!(report.severity, Severity::Ok);
        assert_eq!(report.findings.len(), engine.rules().len());
        assert_eq!(report.triggered().count(), 0);
    }

    #[test]
    fn test_findings_follow_catalog_order() {
        let engine = RuleEngine::with_default_rules();
        let report = engine.evaluate("n1", &mut test_node(&[]));
        let ids: Vec<_> = report.findings.iter().map(|f| f.rule.as_str()).collect();
        let expected: Vec<_> = engine.rules().iter().map(|r| r.id()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_earlier_rules_consume_keys() {
        let engine = RuleEngine::with_default_rules();
        let mut node = test_node(&[
            ("threadpool.search.queue", "100"),
            ("index.number_of_replicas", "1"),
        ]);
        let report = engine.evaluate("n1", &mut node);

        let triggered: Vec<_> = report.triggered().map(|f| f.rule.as_str()).collect();
        // neither key reaches the unknown-settings sweep
        assert_eq!(triggered, vec!["index-settings", "thread-pool"]);
        assert_eq!(report.severity, Severity::Critical);
    }

    #[test]
    fn test_warn_only_node() {
        let engine = RuleEngine::with_default_rules();
        let mut node = test_node(&[("marvel.agent.interval", "10s")]);
        let report = engine.evaluate("n1", &mut node);
        assert_eq!(report.severity, Severity::Warn);
    }

    #[test]
    fn test_second_pass_finds_nothing_new() {
        let engine = RuleEngine::with_default_rules();
        let mut node = test_node(&[
            ("node.rack_id", "r1"),
            ("script.indexed", "true"),
            ("index.analysis.analyzer.default_index.type", "standard"),
            ("index.refresh_interval", "5s"),
            ("threadpool.bulk.queue", "500"),
            ("threadpool.suggest.size", "1"),
            ("bootstrap.mlockall", "true"),
            ("security.manager.enabled", "false"),
            ("marvel.enabled", "true"),
        ]);
        node.attributes.insert("rack_id", "r1");
        let first = engine.evaluate("n1", &mut node);
        assert_eq!(first.severity, Severity::Critical);
        assert_eq!(node.settings.len(), 1);

        // every key is reported once, by the first rule that owns it
        let triggered: Vec<(&str, Vec<&str>)> = first
            .triggered()
            .map(|f| (f.rule.as_str(), f.messages.iter().map(String::as_str).collect()))
            .collect();
        assert_eq!(
            triggered,
            vec![
                (
                    "node-attributes",
                    vec!["`node.rack_id` should be rewritten as `node.attr.rack_id`"]
                ),
                (
                    "script-settings",
                    vec!["`script.indexed` has been renamed to `script.stored`"]
                ),
                (
                    "default-index-analyzer",
                    vec![
                        "`index.analysis.analyzer.default_index.type` can no longer be set in the config file, and has been renamed to `index.analysis.analyzer.default.type`"
                    ]
                ),
                (
                    "index-settings",
                    vec!["`index.refresh_interval` can no longer be set in the config file"]
                ),
                (
                    "thread-pool",
                    vec![
                        "`threadpool.bulk.queue` has been renamed to `thread_pool.bulk.queue_size`",
                        "`threadpool.suggest.size` has been removed"
                    ]
                ),
                (
                    "removed-settings",
                    vec!["`security.manager.enabled` has been removed: the security manager can no longer be disabled"]
                ),
                (
                    "renamed-settings",
                    vec!["`bootstrap.mlockall` has been renamed to `bootstrap.memory_lock`"]
                ),
                (
                    "unknown-settings",
                    vec!["`marvel.enabled` is not a recognised setting and will be rejected at startup unless a plugin registers it"]
                ),
            ]
        );
        let warn = first.findings.iter().find(|f| f.rule == "unknown-settings").unwrap();
        assert_eq!(warn.severity, Severity::Warn);

        // attributes are API metadata; only the settings snapshot is consumed
        node.attributes = Default::default();
        let second = engine.evaluate("n1", &mut node);
        assert_eq!(second.triggered().count(), 0);
        assert_eq!(second.severity, Severity::Ok);
    }

    #[test]
    fn test_security_plugin_managed_key_is_ignored() {
        let engine = RuleEngine::with_default_rules();

        let mut node = test_node(&[("index.queries.cache.type", "opt_out_cache")]);
        node.plugins.push(Plugin {
            name: "shield".into(),
        });
        assert_eq!(engine.evaluate("n1", &mut node).severity, Severity::Ok);

        let mut node = test_node(&[("index.queries.cache.type", "opt_out_cache")]);
        let report = engine.evaluate("n1", &mut node);
        assert_eq!(
            report.triggered().map(|f| f.rule.as_str()).collect::<Vec<_>>(),
            vec!["index-settings"]
        );
    }

    #[test]
    fn test_skipped_rules_are_not_run() {
        let engine = RuleEngineBuilder::new()
            .skip(["minimum-master-nodes", "unknown-settings"])
            .build();
        assert!(engine.rules().iter().all(|r| r.id() != "minimum-master-nodes"));

        let mut node = test_node(&[("custom.thing", "1")]);
        node.settings.remove("discovery.zen.minimum_master_nodes");
        let report = engine.evaluate("n1", &mut node);
        assert_eq!(report.severity, Severity::Ok);
        assert!(node.settings.contains("custom.thing"));
    }

    #[test]
    fn test_engine_without_rules() {
        let engine = RuleEngine::new();
        let report = engine.evaluate("n1", &mut test_node(&[("custom.thing", "1")]));
        assert!(report.findings.is_empty());
        assert_eq!(report.severity, Severity::Ok);
    }
}
