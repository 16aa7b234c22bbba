//! Node-pressure-category programmatic rules (§8 seed scenario 5).

use kubediag_graph::{ObjectGraph, ObjectKind};
use kubediag_timeline::{EventKind, EventPhase, Timeline};
use kubediag_types::{CausalChain, Cause, Evidence, EvidenceSource};

use crate::rule::{Requirements, Rule};

/// Compound: the pod's node reports `NotReady` or under disk/memory
/// pressure, and the pod was `Evicted` — the node condition is the
/// root cause, eviction the symptom. Subsumes the atomic `Evicted` and
/// `NodeNotReady` signals.
pub struct NodeNotReadyEvictedRule {
    blocks: Vec<String>,
}

impl Default for NodeNotReadyEvictedRule {
    fn default() -> Self {
        NodeNotReadyEvictedRule { blocks: vec!["Evicted".to_string(), "NodeNotReady".to_string()] }
    }
}

impl Rule for NodeNotReadyEvictedRule {
    fn name(&self) -> &str {
        "NodeNotReadyEvictedRule"
    }
    fn category(&self) -> &str {
        "node-pressure"
    }
    fn priority(&self) -> i32 {
        92
    }
    fn requires(&self) -> Requirements {
        Requirements::new(vec![ObjectKind::Pod, ObjectKind::Events], vec![ObjectKind::Node])
    }
    fn blocks(&self) -> &[String] {
        &self.blocks
    }
    fn rule_confidence(&self) -> f64 {
        0.88
    }
    fn expected_evidence_count(&self) -> usize {
        2
    }

    fn matches(&self, graph: &ObjectGraph, timeline: &Timeline) -> bool {
        let node_under_pressure = ["DiskPressure", "MemoryPressure", "Ready"].iter().any(|cond_type| {
            graph
                .node_condition(cond_type)
                .map(|c| if *cond_type == "Ready" { c.status == "False" } else { c.status == "True" })
                .unwrap_or(false)
        });
        node_under_pressure && timeline.has(EventKind::NodePressure, Some(EventPhase::Failure), Some("Evicted"))
    }

    fn explain(&self, graph: &ObjectGraph, timeline: &Timeline) -> CausalChain {
        let pod = graph.pod.metadata.name.clone();
        let condition = ["DiskPressure", "MemoryPressure", "Ready"]
            .iter()
            .find_map(|t| graph.node_condition(t).map(|c| (t.to_string(), c.clone())));
        let (cond_type, snippet) = condition
            .map(|(t, c)| (t, format!("status={} reason={}", c.status, c.reason)))
            .unwrap_or_else(|| ("unknown".to_string(), String::new()));
        let evicted_snippet = timeline
            .last(EventKind::NodePressure, Some(EventPhase::Failure), Some("Evicted"))
            .map(|e| e.message.clone())
            .unwrap_or_default();
        CausalChain {
            causes: vec![Cause {
                id: format!("NodeNotReadyEvicted:{pod}"),
                kind: "NodeNotReadyEvicted".into(),
                message: format!("pod {pod} was evicted because its node reported {cond_type}"),
                evidence: vec![
                    Evidence { source: EvidenceSource::Condition, locator: format!("node.status.conditions[{cond_type}]"), snippet },
                    Evidence { source: EvidenceSource::Event, locator: "Evicted".into(), snippet: evicted_snippet },
                ],
                confidence: self.rule_confidence(),
                involved_object: pod,
            }],
            symptoms: vec![],
            contributing: vec![],
        }
    }
}
