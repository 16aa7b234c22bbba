//! Probe-category programmatic rules.

use kubediag_graph::{ObjectGraph, ObjectKind};
use kubediag_timeline::{repeated_probe_failure, EventKind, EventPhase, Timeline};
use kubediag_types::{CausalChain, Cause, Evidence, EvidenceSource};

use crate::rule::{Requirements, Rule};

/// Compound: three or more `Unhealthy` probe failures anywhere on the
/// timeline — a persistent liveness/readiness problem, not a one-off
/// blip. Subsumes the atomic `Unhealthy` signal.
pub struct RepeatedProbeFailureCompound {
    blocks: Vec<String>,
}

impl Default for RepeatedProbeFailureCompound {
    fn default() -> Self {
        RepeatedProbeFailureCompound { blocks: vec!["Unhealthy".to_string()] }
    }
}

impl Rule for RepeatedProbeFailureCompound {
    fn name(&self) -> &str {
        "RepeatedProbeFailureCompound"
    }
    fn category(&self) -> &str {
        "probe"
    }
    fn priority(&self) -> i32 {
        65
    }
    fn requires(&self) -> Requirements {
        Requirements::new(vec![ObjectKind::Pod, ObjectKind::Events], vec![])
    }
    fn blocks(&self) -> &[String] {
        &self.blocks
    }
    fn rule_confidence(&self) -> f64 {
        0.7
    }
    fn expected_evidence_count(&self) -> usize {
        1
    }

    fn matches(&self, _graph: &ObjectGraph, timeline: &Timeline) -> bool {
        repeated_probe_failure(timeline, 3)
    }

    fn explain(&self, graph: &ObjectGraph, timeline: &Timeline) -> CausalChain {
        let pod = graph.pod.metadata.name.clone();
        let count = timeline.count(EventKind::Probe, Some(EventPhase::Failure), Some("Unhealthy"));
        CausalChain {
            causes: vec![Cause {
                id: format!("RepeatedProbeFailure:{pod}"),
                kind: "RepeatedProbeFailure".into(),
                message: format!("pod {pod} has failed its liveness/readiness probe {count} times"),
                evidence: vec![Evidence { source: EvidenceSource::Timeline, locator: "Unhealthy".into(), snippet: format!("{count} occurrences") }],
                confidence: self.rule_confidence(),
                involved_object: pod,
            }],
            symptoms: vec![],
            contributing: vec![],
        }
    }
}
