//! Network-category programmatic rules.

use kubediag_graph::{ObjectGraph, ObjectKind};
use kubediag_timeline::{EventKind, EventPhase, Timeline};
use kubediag_types::{CausalChain, Cause, Evidence, EvidenceSource};

use crate::rule::{Requirements, Rule};

/// The CNI plugin failed to set up the pod's sandbox network.
pub struct PodSandboxNetworkFailureRule;

impl Rule for PodSandboxNetworkFailureRule {
    fn name(&self) -> &str {
        "PodSandboxNetworkFailure"
    }
    fn category(&self) -> &str {
        "network"
    }
    fn priority(&self) -> i32 {
        72
    }
    fn requires(&self) -> Requirements {
        Requirements::new(vec![ObjectKind::Pod, ObjectKind::Events], vec![])
    }
    fn blocks(&self) -> &[String] {
        &[]
    }
    fn rule_confidence(&self) -> f64 {
        0.7
    }
    fn expected_evidence_count(&self) -> usize {
        1
    }

    fn matches(&self, _graph: &ObjectGraph, timeline: &Timeline) -> bool {
        timeline.has(EventKind::Network, Some(EventPhase::Failure), Some("FailedCreatePodSandBox"))
    }

    fn explain(&self, graph: &ObjectGraph, timeline: &Timeline) -> CausalChain {
        let pod = graph.pod.metadata.name.clone();
        let snippet = timeline
            .last(EventKind::Network, Some(EventPhase::Failure), Some("FailedCreatePodSandBox"))
            .map(|e| e.message.clone())
            .unwrap_or_default();
        CausalChain {
            causes: vec![Cause {
                id: format!("PodSandboxNetworkFailure:{pod}"),
                kind: "PodSandboxNetworkFailure".into(),
                message: format!("pod {pod}'s sandbox network could not be created"),
                evidence: vec![Evidence { source: EvidenceSource::Event, locator: "FailedCreatePodSandBox".into(), snippet }],
                confidence: self.rule_confidence(),
                involved_object: pod,
            }],
            symptoms: vec![],
            contributing: vec![],
        }
    }
}
