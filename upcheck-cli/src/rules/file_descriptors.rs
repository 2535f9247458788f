//! Minimum open file descriptor limit

use crate::cluster::Node;
use crate::models::{Finding, Severity};
use crate::rules::base::{Rule, RuleInfo};

const INFO: RuleInfo = RuleInfo {
    id: "file-descriptors",
    title: "File Descriptors",
    doc_url: "https://www.elastic.co/guide/en/elasticsearch/reference/master/file-descriptors.html",
    severity: Severity::Critical,
};

const MAC_OS_NAME: &str = "Mac OS X";
const MAC_MIN_FILE_DESCRIPTORS: i64 = 10_240;
const MIN_FILE_DESCRIPTORS: i64 = 65_536;

fn required_file_descriptors(os_name: Option<&str>) -> i64 {
    if os_name == Some(MAC_OS_NAME) {
        MAC_MIN_FILE_DESCRIPTORS
    } else {
        MIN_FILE_DESCRIPTORS
    }
}

pub struct FileDescriptorsRule;

impl Rule for FileDescriptorsRule {
    fn info(&self) -> &RuleInfo {
        &INFO
    }

    fn check(&self, node: &mut Node) -> Finding {
        let min = required_file_descriptors(node.os.name.as_deref());
        let mut messages = vec![];
        // Unknown limit (no stats merged in) is not flagged
        if let Some(available) = node.process.max_file_descriptors {
            if available < min {
                messages.push(format!(
                    "At least `{min}` file descriptors must be available to Elasticsearch"
                ));
            }
        }
        INFO.finding(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::tests::test_node;

    fn with_fds(os: &str, fds: i64) -> Node {
        let mut node = test_node(&[]);
        node.os.name = Some(os.to_string());
        node.process.max_file_descriptors = Some(fds);
        node
    }

    #[test]
    fn test_mac_threshold() {
        let finding = FileDescriptorsRule.check(&mut with_fds("Mac OS X", 5000));
        assert_eq!(finding.severity, Severity::Critical);
        assert_eq!(
            finding.messages,
            vec!["At least `10240` file descriptors must be available to Elasticsearch"]
        );
        assert!(FileDescriptorsRule
            .check(&mut with_fds("Mac OS X", 10_240))
            .is_clean());
    }

    #[test]
    fn test_default_threshold() {
        let finding = FileDescriptorsRule.check(&mut with_fds("Linux", 5000));
        assert_eq!(
            finding.messages,
            vec!["At least `65536` file descriptors must be available to Elasticsearch"]
        );
        assert!(!FileDescriptorsRule.check(&mut with_fds("Linux", 20_000)).is_clean());
    }

    #[test]
    fn test_high_limit_is_ok_everywhere() {
        assert!(FileDescriptorsRule.check(&mut with_fds("Mac OS X", 100_000)).is_clean());
        assert!(FileDescriptorsRule.check(&mut with_fds("Linux", 100_000)).is_clean());
    }

    #[test]
    fn test_unknown_limit_is_not_flagged() {
        let mut node = test_node(&[]);
        node.process.max_file_descriptors = None;
        assert!(FileDescriptorsRule.check(&mut node).is_clean());
    }
}
