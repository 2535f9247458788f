//! Core data models for upcheck
//!
//! These models are shared by the rule catalog, the evaluators and the
//! reporters: the severity grade, a single rule finding, and the per-node
//! and per-cluster report built from them.

use serde::{Deserialize, Serialize};

/// Severity grade of a finding, a node or the whole cluster.
///
/// Totally ordered `Ok < Warn < Critical`. [`Severity::worse`] is the
/// join of that order and [`Severity::Ok`] is its identity, so grades can
/// be folded in any grouping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Ok,
    Warn,
    Critical,
}

impl Severity {
    /// Whichever of `self` and `other` ranks higher.
    pub fn worse(self, other: Severity) -> Severity {
        self.max(other)
    }

    /// Fold `worse` over a sequence, seeded with `Ok`.
    pub fn combine(grades: impl IntoIterator<Item = Severity>) -> Severity {
        grades.into_iter().fold(Severity::Ok, Severity::worse)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Ok => write!(f, "ok"),
            Severity::Warn => write!(f, "warn"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ok" | "green" => Ok(Severity::Ok),
            "warn" | "warning" | "yellow" => Ok(Severity::Warn),
            "critical" | "red" => Ok(Severity::Critical),
            _ => Err(anyhow::anyhow!(
                "Unknown severity '{}'. Valid severities: ok, warn, critical",
                s
            )),
        }
    }
}

/// Outcome of evaluating one rule against one node
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Finding {
    /// Stable rule identifier (e.g. `thread-pool`)
    #[serde(default)]
    pub rule: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub severity: Severity,
    /// Remediation messages, in the order the offending keys were visited
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub doc_url: String,
}

impl Finding {
    /// Build a finding whose grade follows its messages: `severity_if_any`
    /// when there is at least one message, `Ok` otherwise.
    pub fn new(
        rule: impl Into<String>,
        title: impl Into<String>,
        severity_if_any: Severity,
        messages: Vec<String>,
        doc_url: impl Into<String>,
    ) -> Self {
        let severity = if messages.is_empty() {
            Severity::Ok
        } else {
            severity_if_any
        };
        Self {
            rule: rule.into(),
            title: title.into(),
            severity,
            messages,
            doc_url: doc_url.into(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.messages.is_empty()
    }
}

/// All findings for one node, in catalog order
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NodeReport {
    /// Display identity, `name/host [node-id]`
    pub name: String,
    pub severity: Severity,
    pub findings: Vec<Finding>,
}

impl NodeReport {
    pub fn new(name: impl Into<String>, findings: Vec<Finding>) -> Self {
        let severity = Severity::combine(findings.iter().map(|f| f.severity));
        Self {
            name: name.into(),
            severity,
            findings,
        }
    }

    /// Findings that carry at least one message
    pub fn triggered(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_clean())
    }
}

/// Cluster-wide grade plus every node report, ordered by node identity
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClusterReport {
    pub severity: Severity,
    pub nodes: Vec<NodeReport>,
}

impl ClusterReport {
    pub fn new(nodes: Vec<NodeReport>) -> Self {
        let severity = Severity::combine(nodes.iter().map(|n| n.severity));
        Self { severity, nodes }
    }
}
