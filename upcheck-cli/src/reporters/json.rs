//! JSON reporter
//!
//! Outputs the full ClusterReport as pretty-printed JSON, clean findings
//! included, so every rule's outcome is visible to scripts.

use crate::models::ClusterReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &ClusterReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
