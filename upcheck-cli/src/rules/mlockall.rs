//! Requested memory lock that the process failed to obtain

use crate::cluster::Node;
use crate::models::{Finding, Severity};
use crate::rules::base::{Rule, RuleInfo};

const INFO: RuleInfo = RuleInfo {
    id: "mlockall",
    title: "Mlockall",
    doc_url: "https://www.elastic.co/guide/en/elasticsearch/reference/master/setup-configuration-memory.html",
    severity: Severity::Critical,
};

pub struct MlockallRule;

impl Rule for MlockallRule {
    fn info(&self) -> &RuleInfo {
        &INFO
    }

    fn check(&self, node: &mut Node) -> Finding {
        let mut messages = vec![];
        if node.settings.get_str("bootstrap.mlockall") == Some("true") && !node.process.mlockall {
            messages.push(
                "`bootstrap.mlockall` is set to `true` but mlockall has failed".to_string(),
            );
        }
        INFO.finding(messages)
    }
}
