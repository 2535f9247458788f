//! Base rule trait and the generic settings walker
//!
//! This module defines the core abstractions for compatibility checks:
//! - `Rule` trait that every catalog entry implements
//! - `RuleInfo`, the static identity of a rule (id, title, docs, grade)
//! - `RuleInfo::check_entries`, which walks a flat key/value map through a
//!   matcher and folds the messages into one `Finding`

use crate::cluster::Node;
use crate::models::{Finding, Severity};
use serde_json::Value;

/// Static description of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleInfo {
    /// Stable kebab-case identifier, used by `skip_rules`
    pub id: &'static str,
    pub title: &'static str,
    pub doc_url: &'static str,
    /// Grade of the finding when the rule produces any message
    pub severity: Severity,
}

impl RuleInfo {
    /// Wrap `messages` in a finding for this rule
    pub fn finding(&self, messages: Vec<String>) -> Finding {
        Finding::new(self.id, self.title, self.severity, messages, self.doc_url)
    }

    /// Run `matcher` over every `(key, value)` entry and collect its messages.
    ///
    /// `entries` is an owned snapshot, so the matcher may freely remove keys
    /// from the settings map it closes over. A matcher returns `None` for
    /// "no issue"; empty messages are dropped. Messages keep the order in
    /// which entries were visited.
    pub fn check_entries<F>(&self, entries: Vec<(String, Value)>, mut matcher: F) -> Finding
    where
        F: FnMut(&str, &Value) -> Option<String>,
    {
        let messages = entries
            .iter()
            .filter_map(|(key, value)| matcher(key, value))
            .filter(|msg| !msg.is_empty())
            .collect();
        self.finding(messages)
    }
}

/// Trait for all per-node compatibility rules
///
/// A rule inspects one node and may consume (remove) the settings keys it
/// flags, so that broader rules later in the catalog do not flag them
/// again. Rules never insert values.
///
/// # Example Implementation
///
/// ```ignore
/// const INFO: RuleInfo = RuleInfo {
///     id: "my-rule",
///     title: "My rule",
///     doc_url: "https://example.com/docs",
///     severity: Severity::Critical,
/// };
///
/// pub struct MyRule;
///
/// impl Rule for MyRule {
///     fn info(&self) -> &RuleInfo {
///         &INFO
///     }
///
///     fn check(&self, node: &mut Node) -> Finding {
///         let entries = node.settings.snapshot();
///         INFO.check_entries(entries, |key, _| {
///             (key == "bad.key").then(|| "`bad.key` is gone".to_string())
///         })
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    fn info(&self) -> &RuleInfo;

    /// Evaluate the rule, consuming any settings keys it flags
    fn check(&self, node: &mut Node) -> Finding;

    fn id(&self) -> &'static str {
        self.info().id
    }
}
