//! Min and max heap must match

use crate::cluster::Node;
use crate::models::{Finding, Severity};
use crate::rules::base::{Rule, RuleInfo};

const INFO: RuleInfo = RuleInfo {
    id: "heap-size",
    title: "Heap Size",
    doc_url: "https://www.elastic.co/guide/en/elasticsearch/reference/master/heap-size.html",
    severity: Severity::Critical,
};

/// Initial heap may exceed max heap by this factor before it is flagged
const HEAP_TOLERANCE: f64 = 1.1;

pub struct HeapSizeRule;

impl Rule for HeapSizeRule {
    fn info(&self) -> &RuleInfo {
        &INFO
    }

    fn check(&self, node: &mut Node) -> Finding {
        let mem = &node.jvm.mem;
        let mut messages = vec![];
        if mem.heap_init_in_bytes as f64 > HEAP_TOLERANCE * mem.heap_max_in_bytes as f64 {
            messages.push(
                "The min heap size (`-Xms`) and max heap size (`-Xmx`) must be set to the same value"
                    .to_string(),
            );
        }
        INFO.finding(messages)
    }
}
