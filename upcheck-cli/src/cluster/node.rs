//! Node records decoded from the nodes info API

use crate::settings::Settings;
use serde::{Deserialize, Serialize};

/// One cluster member, as seen by a single evaluation run.
///
/// Built from the nodes info response, with `process.max_file_descriptors`
/// merged in from the process stats response. Never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Node {
    /// Internal node id (the key of the `nodes` object)
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub host: String,
    /// Node attributes (`data`, `master`, custom `rack_id`, ...)
    #[serde(default)]
    pub attributes: Settings,
    pub settings: Settings,
    #[serde(default)]
    pub plugins: Vec<Plugin>,
    #[serde(default)]
    pub process: ProcessInfo,
    #[serde(default)]
    pub os: OsInfo,
    #[serde(default)]
    pub jvm: JvmInfo,
}

impl Node {
    /// Display and ordering identity: `name/host [id]`
    pub fn display_name(&self) -> String {
        format!("{}/{} [{}]", self.name, self.host, self.id)
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name == name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plugin {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessInfo {
    #[serde(default)]
    pub mlockall: bool,
    /// Filled in from the process stats response
    #[serde(default)]
    pub max_file_descriptors: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsInfo {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JvmInfo {
    #[serde(default)]
    pub mem: JvmMem,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JvmMem {
    #[serde(default)]
    pub heap_init_in_bytes: u64,
    #[serde(default)]
    pub heap_max_in_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_minimal_node() {
        let node: Node = serde_json::from_value(json!({
            "name": "n1",
            "host": "10.0.0.1",
            "settings": {"cluster.name": "prod"}
        }))
        .unwrap();
        assert_eq!(node.name, "n1");
        assert!(node.attributes.is_empty());
        assert!(node.plugins.is_empty());
        assert_eq!(node.jvm.mem.heap_max_in_bytes, 0);
        assert_eq!(node.process.max_file_descriptors, None);
    }

    #[test]
    fn test_decode_full_node() {
        let node: Node = serde_json::from_value(json!({
            "name": "n1",
            "host": "10.0.0.1",
            "attributes": {"rack_id": "r1", "master": "true"},
            "settings": {"bootstrap.mlockall": "true"},
            "plugins": [{"name": "shield", "version": "2.4.0"}],
            "process": {"mlockall": false, "id": 123},
            "os": {"name": "Linux", "available_processors": 8},
            "jvm": {"mem": {"heap_init_in_bytes": 1024, "heap_max_in_bytes": 2048}}
        }))
        .unwrap();
        assert!(node.has_plugin("shield"));
        assert!(!node.process.mlockall);
        assert_eq!(node.os.name.as_deref(), Some("Linux"));
        assert_eq!(node.jvm.mem.heap_init_in_bytes, 1024);
        assert_eq!(node.attributes.get_str("rack_id"), Some("r1"));
    }

    #[test]
    fn test_display_name() {
        let node = Node {
            id: "abc".into(),
            name: "n1".into(),
            host: "h1".into(),
            ..Default::default()
        };
        assert_eq!(node.display_name(), "n1/h1 [abc]");
    }

    #[test]
    fn test_missing_settings_is_an_error() {
        let result: Result<Node, _> =
            serde_json::from_value(json!({"name": "n1", "host": "h1"}));
        assert!(result.is_err());
    }
}
