//! Image-category programmatic rules (§8 seed scenario 2).

use kubediag_graph::{ObjectGraph, ObjectKind};
use kubediag_timeline::{image_updated_then_crashloop, EventKind, EventPhase, Timeline};
use kubediag_types::{CausalChain, Cause, Evidence, EvidenceSource};

use crate::rule::{Requirements, Rule};

fn waiting_reason(graph: &ObjectGraph) -> Option<String> {
    graph
        .pod
        .status
        .container_statuses
        .iter()
        .find_map(|cs| cs.state.waiting.as_ref().and_then(|w| w.reason.clone()))
}

/// Compound: the container is waiting on `ImagePullBackOff` and the pod
/// declares no `imagePullSecrets` — the registry almost certainly
/// requires auth this pod was never given. Subsumes the atomic
/// `ImagePullBackOff` signal.
pub struct ImagePullSecretMissingCompound {
    blocks: Vec<String>,
}

impl Default for ImagePullSecretMissingCompound {
    fn default() -> Self {
        ImagePullSecretMissingCompound { blocks: vec!["ImagePullBackOff".to_string()] }
    }
}

impl Rule for ImagePullSecretMissingCompound {
    fn name(&self) -> &str {
        "ImagePullSecretMissingCompound"
    }
    fn category(&self) -> &str {
        "image"
    }
    fn priority(&self) -> i32 {
        90
    }
    fn requires(&self) -> Requirements {
        Requirements::new(vec![ObjectKind::Pod, ObjectKind::Events], vec![ObjectKind::ServiceAccount])
    }
    fn blocks(&self) -> &[String] {
        &self.blocks
    }
    fn rule_confidence(&self) -> f64 {
        0.85
    }
    fn expected_evidence_count(&self) -> usize {
        2
    }

    fn matches(&self, graph: &ObjectGraph, timeline: &Timeline) -> bool {
        let waiting_on_pull = waiting_reason(graph).as_deref() == Some("ImagePullBackOff");
        let no_pod_secrets = graph.pod.spec.image_pull_secrets.is_empty();
        let no_sa_secrets = graph
            .serviceaccount
            .as_ref()
            .map(|sa| sa.image_pull_secrets.is_empty())
            .unwrap_or(true);
        waiting_on_pull
            && no_pod_secrets
            && no_sa_secrets
            && timeline.has(EventKind::Image, Some(EventPhase::Failure), None)
    }

    fn explain(&self, graph: &ObjectGraph, timeline: &Timeline) -> CausalChain {
        let pod = graph.pod.metadata.name.clone();
        let event_snippet = timeline
            .last(EventKind::Image, Some(EventPhase::Failure), None)
            .map(|e| e.message.clone())
            .unwrap_or_default();
        CausalChain {
            causes: vec![Cause {
                id: format!("ImagePullSecretMissing:{pod}"),
                kind: "ImagePullSecretMissing".into(),
                message: format!("pod {pod} cannot pull its image: no imagePullSecrets on the pod or its service account"),
                evidence: vec![
                    Evidence {
                        source: EvidenceSource::ObjectState,
                        locator: "pod.spec.imagePullSecrets".into(),
                        snippet: "empty".into(),
                    },
                    Evidence { source: EvidenceSource::Event, locator: "ImagePullBackOff".into(), snippet: event_snippet },
                ],
                confidence: self.rule_confidence(),
                involved_object: pod,
            }],
            symptoms: vec![],
            contributing: vec![],
        }
    }
}

/// Compound: the image was (re)pulled and only afterward did the
/// container start crash-looping — the new image is the likely
/// trigger, not a pre-existing config problem.
pub struct ImageUpdatedThenCrashloopCompound {
    blocks: Vec<String>,
}

impl Default for ImageUpdatedThenCrashloopCompound {
    fn default() -> Self {
        ImageUpdatedThenCrashloopCompound { blocks: vec!["CrashLoopBackoff".to_string()] }
    }
}

impl Rule for ImageUpdatedThenCrashloopCompound {
    fn name(&self) -> &str {
        "ImageUpdatedThenCrashloopCompound"
    }
    fn category(&self) -> &str {
        "image"
    }
    fn priority(&self) -> i32 {
        88
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
        image_updated_then_crashloop(timeline)
    }

    fn explain(&self, graph: &ObjectGraph, timeline: &Timeline) -> CausalChain {
        let pod = graph.pod.metadata.name.clone();
        let snippet = timeline
            .last(EventKind::Lifecycle, Some(EventPhase::Failure), Some("BackOff"))
            .map(|e| e.message.clone())
            .unwrap_or_default();
        CausalChain {
            causes: vec![Cause {
                id: format!("ImageUpdatedThenCrashloop:{pod}"),
                kind: "ImageUpdatedThenCrashloop".into(),
                message: format!("pod {pod} began crash-looping immediately after a new image was pulled"),
                evidence: vec![Evidence { source: EvidenceSource::Timeline, locator: "Pulled->BackOff".into(), snippet }],
                confidence: self.rule_confidence(),
                involved_object: pod,
            }],
            symptoms: vec![],
            contributing: vec![],
        }
    }
}
