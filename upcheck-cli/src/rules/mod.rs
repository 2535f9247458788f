//! Upgrade compatibility rules
//!
//! This module provides the rule framework and the fixed catalog of
//! per-node checks for settings that are removed, renamed, relocated or
//! otherwise invalid in the target version.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        RuleEngine                           │
//! │  - Holds the ordered catalog                                │
//! │  - Runs every rule against one node's settings snapshot    │
//! │  - Folds findings into the node grade                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Rule Trait                          │
//! │  - info(): id, title, documentation URL, grade              │
//! │  - check(node): produce a Finding, consuming flagged keys   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┴───────────────┐
//!              ▼                               ▼
//! ┌──────────────────────────┐   ┌──────────────────────────────┐
//! │ Node rules               │   │ Cluster settings sweeps      │
//! │ (roles, heap, scripts,   │   │ (removed, renamed, unknown)  │
//! │  thread pools, ...)      │   │                              │
//! └──────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! # Ordering
//!
//! Order is part of the contract: narrow rules run first and consume the
//! keys they flag, the broad sweeps (`index-settings`, then the cluster
//! settings catalog) only see what is left.

mod base;
mod engine;

mod default_index_analyzer;
mod file_descriptors;
mod heap_size;
mod host_settings;
mod index_settings;
mod min_master_nodes;
mod mlockall;
mod node_attrs;
mod node_roles;
mod script_settings;
mod thread_pool;

pub mod cluster_settings;

pub use base::{Rule, RuleInfo};
pub use engine::{RuleEngine, RuleEngineBuilder};

pub use cluster_settings::{
    removed_settings, renamed_settings, unknown_settings, RemovedSettingsRule,
    RenamedSettingsRule, UnknownSettingsRule,
};
pub use default_index_analyzer::DefaultIndexAnalyzerRule;
pub use file_descriptors::FileDescriptorsRule;
pub use heap_size::HeapSizeRule;
pub use host_settings::HostSettingsRule;
pub use index_settings::IndexSettingsRule;
pub use min_master_nodes::MinMasterNodesRule;
pub use mlockall::MlockallRule;
pub use node_attrs::NodeAttributesRule;
pub use node_roles::NodeRolesRule;
pub use script_settings::ScriptSettingsRule;
pub use thread_pool::ThreadPoolRule;

use std::sync::Arc;

/// The full catalog, in evaluation order
pub fn default_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(NodeRolesRule),
        Arc::new(NodeAttributesRule),
        Arc::new(HeapSizeRule),
        Arc::new(FileDescriptorsRule),
        Arc::new(MlockallRule),
        Arc::new(MinMasterNodesRule),
        Arc::new(ScriptSettingsRule),
        Arc::new(HostSettingsRule),
        Arc::new(DefaultIndexAnalyzerRule),
        Arc::new(IndexSettingsRule),
        Arc::new(ThreadPoolRule),
        Arc::new(RemovedSettingsRule),
        Arc::new(RenamedSettingsRule),
        Arc::new(UnknownSettingsRule),
    ]
}
