//! Owner-category programmatic rules.

use kubediag_graph::{ObjectGraph, ObjectKind};
use kubediag_timeline::Timeline;
use kubediag_types::{CausalChain, Cause, Evidence, EvidenceSource};

use crate::rule::{Requirements, Rule};

/// The owning controller (ReplicaSet/Deployment/StatefulSet) reports
/// fewer ready replicas than desired — a fleet-wide problem, not one
/// specific to this pod.
pub struct OwnerReplicasNotReadyRule;

impl Rule for OwnerReplicasNotReadyRule {
    fn name(&self) -> &str {
        "OwnerReplicasNotReady"
    }
    fn category(&self) -> &str {
        "owner"
    }
    fn priority(&self) -> i32 {
        40
    }
    fn requires(&self) -> Requirements {
        Requirements::new(vec![ObjectKind::Pod, ObjectKind::Events], vec![ObjectKind::Owner])
    }
    fn blocks(&self) -> &[String] {
        &[]
    }
    fn rule_confidence(&self) -> f64 {
        0.5
    }
    fn expected_evidence_count(&self) -> usize {
        1
    }

    fn matches(&self, graph: &ObjectGraph, _timeline: &Timeline) -> bool {
        graph
            .owner
            .as_ref()
            .map(|o| o.status.replicas > 0 && o.status.ready_replicas < o.status.replicas)
            .unwrap_or(false)
    }

    fn explain(&self, graph: &ObjectGraph, _timeline: &Timeline) -> CausalChain {
        let pod = graph.pod.metadata.name.clone();
        let owner = graph.owner.as_ref().expect("matches guarantees presence");
        CausalChain {
            causes: vec![],
            symptoms: vec![],
            contributing: vec![Cause {
                id: format!("OwnerReplicasNotReady:{}", owner.metadata.name),
                kind: "OwnerReplicasNotReady".into(),
                message: format!(
                    "{} {} has {}/{} replicas ready",
                    owner.kind, owner.metadata.name, owner.status.ready_replicas, owner.status.replicas
                ),
                evidence: vec![Evidence {
                    source: EvidenceSource::ObjectState,
                    locator: "owner.status.readyReplicas".into(),
                    snippet: format!("{}/{}", owner.status.ready_replicas, owner.status.replicas),
                }],
                confidence: self.rule_confidence(),
                involved_object: pod,
            }],
        }
    }
}
