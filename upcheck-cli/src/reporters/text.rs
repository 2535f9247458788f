//! Text (terminal) reporter with colors and formatting

use crate::models::{ClusterReport, Finding, NodeReport, Severity};
use anyhow::Result;

/// Severity colors
fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "\x1b[31m", // Red
        Severity::Warn => "\x1b[33m",     // Yellow
        Severity::Ok => "\x1b[32m",       // Green
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Severity tag
fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "[C]",
        Severity::Warn => "[W]",
        Severity::Ok => "[ ]",
    }
}

/// Render report as formatted terminal output
pub fn render(report: &ClusterReport) -> Result<String> {
    let mut out = String::new();

    let grade_c = severity_color(report.severity);
    out.push_str(&format!("\n{BOLD}Elasticsearch 5.0 upgrade check{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Cluster: {grade_c}{BOLD}{}{RESET}  Nodes: {}\n\n",
        report.severity.to_string().to_uppercase(),
        report.nodes.len()
    ));

    if report.nodes.is_empty() {
        out.push_str(&format!("{DIM}No nodes reported.{RESET}\n"));
        return Ok(out);
    }

    for node in &report.nodes {
        render_node(&mut out, node);
    }

    let flagged = report.nodes.iter().filter(|n| n.severity != Severity::Ok).count();
    if flagged == 0 {
        out.push_str("All nodes are ready to upgrade.\n");
    } else {
        out.push_str(&format!(
            "{} of {} node(s) need changes before upgrading.\n",
            flagged,
            report.nodes.len()
        ));
    }

    Ok(out)
}

fn render_node(out: &mut String, node: &NodeReport) {
    let sev_c = severity_color(node.severity);
    out.push_str(&format!(
        "{BOLD}{}{RESET}  {sev_c}{}{RESET}\n",
        node.name, node.severity
    ));

    for finding in node.triggered() {
        render_finding(out, finding);
    }

    let passed = node.findings.iter().filter(|f| f.is_clean()).count();
    if passed > 0 {
        out.push_str(&format!("  {DIM}{} rule(s) passed{RESET}\n", passed));
    }
    out.push('\n');
}

fn render_finding(out: &mut String, finding: &Finding) {
    let sev_c = severity_color(finding.severity);
    out.push_str(&format!(
        "  {sev_c}{}{RESET} {BOLD}{}{RESET} {DIM}({}){RESET}\n",
        severity_tag(finding.severity),
        finding.title,
        finding.rule
    ));
    for message in &finding.messages {
        // script-settings messages may span several lines
        for line in message.lines() {
            out.push_str(&format!("      {}\n", line));
        }
    }
    if !finding.doc_url.is_empty() {
        out.push_str(&format!("      {DIM}See: {}{RESET}\n", finding.doc_url));
    }
}
