//! Scheduling-category programmatic rules (§8 seed scenario 1).

use kubediag_graph::{ObjectGraph, ObjectKind};
use kubediag_timeline::{EventKind, EventPhase, Timeline};
use kubediag_types::{CausalChain, Cause, Evidence, EvidenceSource};

use crate::rule::{Requirements, Rule};

fn last_failed_scheduling<'a>(timeline: &'a Timeline) -> Option<&'a kubediag_timeline::NormalizedEvent> {
    timeline.last(EventKind::Scheduling, Some(EventPhase::Failure), Some("FailedScheduling"))
}

/// Generic scheduling signals this rule subsumes once it identifies the
/// specific cause — firing both would just restate the same
/// `FailedScheduling`/`Pending` facts as a separate, vaguer cause.
fn generic_scheduling_blocks() -> Vec<String> {
    vec!["FailedSchedulingGeneric".to_string(), "PodPendingUnknownCause".to_string()]
}

/// The pod's tolerations don't cover a node's taints — the scheduler
/// reports it in `FailedScheduling`'s message.
pub struct UnschedulableTaintRule {
    blocks: Vec<String>,
}

impl Default for UnschedulableTaintRule {
    fn default() -> Self {
        UnschedulableTaintRule { blocks: generic_scheduling_blocks() }
    }
}

impl Rule for UnschedulableTaintRule {
    fn name(&self) -> &str {
        "UnschedulableTaint"
    }
    fn category(&self) -> &str {
        "scheduling"
    }
    fn priority(&self) -> i32 {
        80
    }
    fn requires(&self) -> Requirements {
        Requirements::new(vec![ObjectKind::Pod, ObjectKind::Events], vec![])
    }
    fn blocks(&self) -> &[String] {
        &self.blocks
    }
    fn rule_confidence(&self) -> f64 {
        0.8
    }
    fn expected_evidence_count(&self) -> usize {
        2
    }

    fn matches(&self, _graph: &ObjectGraph, timeline: &Timeline) -> bool {
        last_failed_scheduling(timeline)
            .map(|e| e.message.to_lowercase().contains("taint"))
            .unwrap_or(false)
    }

    fn explain(&self, graph: &ObjectGraph, timeline: &Timeline) -> CausalChain {
        let event = last_failed_scheduling(timeline).expect("matches guarantees presence");
        let pod = graph.pod.metadata.name.clone();
        CausalChain {
            causes: vec![Cause {
                id: format!("UnschedulableTaint:{pod}"),
                kind: "UnschedulableTaint".into(),
                message: format!("pod {pod} cannot be scheduled: no node tolerates its taints"),
                evidence: vec![
                    Evidence {
                        source: EvidenceSource::ObjectState,
                        locator: "pod.status.phase".into(),
                        snippet: graph.pod.status.phase.clone(),
                    },
                    Evidence {
                        source: EvidenceSource::Event,
                        locator: "FailedScheduling".into(),
                        snippet: event.message.clone(),
                    },
                ],
                confidence: self.rule_confidence(),
                involved_object: pod,
            }],
            symptoms: vec![],
            contributing: vec![],
        }
    }
}

/// The scheduler reports insufficient CPU/memory/ephemeral-storage
/// capacity, not a taint mismatch.
pub struct UnschedulableResourceRule {
    blocks: Vec<String>,
}

impl Default for UnschedulableResourceRule {
    fn default() -> Self {
        UnschedulableResourceRule { blocks: generic_scheduling_blocks() }
    }
}

impl Rule for UnschedulableResourceRule {
    fn name(&self) -> &str {
        "UnschedulableResource"
    }
    fn category(&self) -> &str {
        "scheduling"
    }
    fn priority(&self) -> i32 {
        75
    }
    fn requires(&self) -> Requirements {
        Requirements::new(vec![ObjectKind::Pod, ObjectKind::Events], vec![])
    }
    fn blocks(&self) -> &[String] {
        &self.blocks
    }
    fn rule_confidence(&self) -> f64 {
        0.75
    }
    fn expected_evidence_count(&self) -> usize {
        2
    }

    fn matches(&self, _graph: &ObjectGraph, timeline: &Timeline) -> bool {
        last_failed_scheduling(timeline)
            .map(|e| {
                let m = e.message.to_lowercase();
                !m.contains("taint") && (m.contains("insufficient") || m.contains("cpu") || m.contains("memory"))
            })
            .unwrap_or(false)
    }

    fn explain(&self, graph: &ObjectGraph, timeline: &Timeline) -> CausalChain {
        let event = last_failed_scheduling(timeline).expect("matches guarantees presence");
        let pod = graph.pod.metadata.name.clone();
        CausalChain {
            causes: vec![Cause {
                id: format!("UnschedulableResource:{pod}"),
                kind: "UnschedulableResource".into(),
                message: format!("pod {pod} cannot be scheduled: no node has sufficient resources"),
                evidence: vec![
                    Evidence {
                        source: EvidenceSource::ObjectState,
                        locator: "pod.status.phase".into(),
                        snippet: graph.pod.status.phase.clone(),
                    },
                    Evidence {
                        source: EvidenceSource::Event,
                        locator: "FailedScheduling".into(),
                        snippet: event.message.clone(),
                    },
                ],
                confidence: self.rule_confidence(),
                involved_object: pod,
            }],
            symptoms: vec![],
            contributing: vec![],
        }
    }
}

/// The pod's required node affinity matches no node in the snapshot —
/// checked against the node's actual labels, not the scheduler's message.
pub struct NodeAffinityMismatchRule {
    blocks: Vec<String>,
}

impl Default for NodeAffinityMismatchRule {
    fn default() -> Self {
        NodeAffinityMismatchRule { blocks: generic_scheduling_blocks() }
    }
}

impl Rule for NodeAffinityMismatchRule {
    fn name(&self) -> &str {
        "NodeAffinityMismatch"
    }
    fn category(&self) -> &str {
        "scheduling"
    }
    fn priority(&self) -> i32 {
        60
    }
    fn requires(&self) -> Requirements {
        Requirements::new(vec![ObjectKind::Pod, ObjectKind::Events], vec![ObjectKind::Node])
    }
    fn blocks(&self) -> &[String] {
        &self.blocks
    }
    fn rule_confidence(&self) -> f64 {
        0.65
    }
    fn expected_evidence_count(&self) -> usize {
        2
    }

    fn matches(&self, graph: &ObjectGraph, timeline: &Timeline) -> bool {
        graph.required_node_affinity_satisfied() == Some(false) && last_failed_scheduling(timeline).is_some()
    }

    fn explain(&self, graph: &ObjectGraph, timeline: &Timeline) -> CausalChain {
        let event = last_failed_scheduling(timeline).expect("matches guarantees presence");
        let pod = graph.pod.metadata.name.clone();
        CausalChain {
            causes: vec![Cause {
                id: format!("NodeAffinityMismatch:{pod}"),
                kind: "NodeAffinityMismatch".into(),
                message: format!("pod {pod}'s required node affinity matches no available node"),
                evidence: vec![
                    Evidence {
                        source: EvidenceSource::ObjectState,
                        locator: "pod.spec.affinity.nodeAffinity".into(),
                        snippet: "required node affinity unsatisfied by the known node's labels".into(),
                    },
                    Evidence {
                        source: EvidenceSource::Event,
                        locator: "FailedScheduling".into(),
                        snippet: event.message.clone(),
                    },
                ],
                confidence: self.rule_confidence(),
                involved_object: pod,
            }],
            symptoms: vec![],
            contributing: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubediag_graph::raw::{
        RawAffinity, RawNode, RawNodeAffinity, RawNodeSelector, RawNodeSelectorRequirement, RawNodeSelectorTerm, RawPod,
    };
    use kubediag_timeline::{NormalizedEvent, Timeline};

    fn pod_requiring_disktype_ssd() -> RawPod {
        let mut pod = RawPod::default();
        pod.metadata.name = "db-0".into();
        pod.spec.affinity = Some(RawAffinity {
            node_affinity: Some(RawNodeAffinity {
                required_during_scheduling_ignored_during_execution: Some(RawNodeSelector {
                    node_selector_terms: vec![RawNodeSelectorTerm {
                        match_expressions: vec![RawNodeSelectorRequirement {
                            key: "disktype".into(),
                            operator: "In".into(),
                            values: vec!["ssd".into()],
                        }],
                    }],
                }),
            }),
        });
        pod
    }

    fn failed_scheduling_timeline() -> Timeline {
        Timeline::new(vec![NormalizedEvent {
            kind: EventKind::Scheduling,
            phase: EventPhase::Failure,
            reason: "FailedScheduling".into(),
            message: "0/3 nodes are available: 3 node(s) didn't match Pod's node affinity".into(),
            source: "default-scheduler".into(),
            first_seen: 0,
            last_seen: 0,
            count: 1,
            involved_object: "db-0".into(),
        }])
    }

    fn empty_graph(pod: RawPod) -> ObjectGraph {
        ObjectGraph {
            pod,
            pvcs: Default::default(),
            pvs: Default::default(),
            storage_classes: Default::default(),
            node: None,
            node_conditions: vec![],
            owner: None,
            serviceaccount: None,
            secrets: vec![],
            configmaps: vec![],
        }
    }

    #[test]
    fn does_not_match_when_node_labels_satisfy_affinity() {
        let mut graph = empty_graph(pod_requiring_disktype_ssd());
        let mut node = RawNode::default();
        node.metadata.labels.insert("disktype".into(), "ssd".into());
        graph.node = Some(node);
        let rule = NodeAffinityMismatchRule::default();
        assert!(!rule.matches(&graph, &failed_scheduling_timeline()));
    }

    #[test]
    fn matches_when_known_node_lacks_required_label() {
        let mut graph = empty_graph(pod_requiring_disktype_ssd());
        let mut node = RawNode::default();
        node.metadata.labels.insert("disktype".into(), "hdd".into());
        graph.node = Some(node);
        let rule = NodeAffinityMismatchRule::default();
        assert!(rule.matches(&graph, &failed_scheduling_timeline()));
    }

    #[test]
    fn does_not_match_without_a_scheduling_failure_event() {
        let mut graph = empty_graph(pod_requiring_disktype_ssd());
        let mut node = RawNode::default();
        node.metadata.labels.insert("disktype".into(), "hdd".into());
        graph.node = Some(node);
        let rule = NodeAffinityMismatchRule::default();
        assert!(!rule.matches(&graph, &Timeline::new(vec![])));
    }

    #[test]
    fn does_not_match_when_pod_declares_no_affinity() {
        let mut pod = RawPod::default();
        pod.metadata.name = "db-0".into();
        let graph = empty_graph(pod);
        let rule = NodeAffinityMismatchRule::default();
        assert!(!rule.matches(&graph, &failed_scheduling_timeline()));
    }
}
