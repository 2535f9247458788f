//! Flat node settings snapshot and key normalization
//!
//! The nodes API (with `flat_settings=true`) reports every setting as a
//! dotted key. List values are flattened with a trailing index segment
//! (`discovery.zen.ping.unicast.hosts.0`, `.1`, ...), so rules compare
//! against the normalized key produced by [`strip_dot_num`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Drop one trailing `.<digits>` segment, if present.
pub fn strip_dot_num(key: &str) -> &str {
    match key.rsplit_once('.') {
        Some((base, tail)) if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) => {
            base
        }
        _ => key,
    }
}

/// One node's settings, owned exclusively by the rules evaluating that node.
///
/// Rules remove ("consume") a key once they have flagged it so that later,
/// broader rules in the catalog do not flag it a second time. Values stay
/// as raw JSON: the API normally reports strings, anything else is treated
/// by the matchers as "no match".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(BTreeMap<String, Value>);

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// String value of `key`, `None` if absent or not a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Consume a key. Returns the removed value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Owned copy of every entry, for walking while the map is mutated
    pub fn snapshot(&self) -> Vec<(String, Value)> {
        self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_dot_num() {
        assert_eq!(strip_dot_num("node.attr.3"), "node.attr");
        assert_eq!(strip_dot_num("node.attr"), "node.attr");
        assert_eq!(strip_dot_num("network.host.12"), "network.host");
        assert_eq!(strip_dot_num("path.data.0.1"), "path.data.0");
        assert_eq!(strip_dot_num("index.v2"), "index.v2");
        assert_eq!(strip_dot_num("trailing."), "trailing.");
        assert_eq!(strip_dot_num("42"), "42");
    }

    #[test]
    fn test_get_str_ignores_non_strings() {
        let settings: Settings = [("a", json!("x")), ("b", json!(3)), ("c", json!(["y"]))]
            .into_iter()
            .collect();
        assert_eq!(settings.get_str("a"), Some("x"));
        assert_eq!(settings.get_str("b"), None);
        assert_eq!(settings.get_str("c"), None);
        assert!(settings.contains("b"));
    }

    #[test]
    fn test_snapshot_survives_removal() {
        let mut settings: Settings = [("a", "1"), ("b", "2")].into_iter().collect();
        let snapshot = settings.snapshot();
        settings.remove("a");
        assert_eq!(snapshot.len(), 2);
        assert_eq!(settings.len(), 1);
        assert!(!settings.contains("a"));
    }

    #[test]
    fn test_deserializes_flat_object() {
        let settings: Settings =
            serde_json::from_value(json!({"node.rack_id": "r1", "path.data.0": "/a"})).unwrap();
        assert_eq!(settings.get_str("node.rack_id"), Some("r1"));
        assert_eq!(settings.keys().collect::<Vec<_>>(), vec!["node.rack_id", "path.data.0"]);
    }
}
