//! Admission-category programmatic rules.

use kubediag_graph::{ObjectGraph, ObjectKind};
use kubediag_timeline::{EventKind, EventPhase, Timeline};
use kubediag_types::{CausalChain, Cause, Evidence, EvidenceSource};

use crate::rule::{Requirements, Rule};

/// A validating/mutating webhook, or a security policy, denied the pod
/// at admission time.
pub struct AdmissionWebhookDeniedRule;

impl Rule for AdmissionWebhookDeniedRule {
    fn name(&self) -> &str {
        "AdmissionWebhookDenied"
    }
    fn category(&self) -> &str {
        "admission"
    }
    fn priority(&self) -> i32 {
        82
    }
    fn requires(&self) -> Requirements {
        Requirements::new(vec![ObjectKind::Pod, ObjectKind::Events], vec![])
    }
    fn blocks(&self) -> &[String] {
        &[]
    }
    fn rule_confidence(&self) -> f64 {
        0.8
    }
    fn expected_evidence_count(&self) -> usize {
        1
    }

    fn matches(&self, _graph: &ObjectGraph, timeline: &Timeline) -> bool {
        timeline.has(EventKind::Admission, Some(EventPhase::Failure), Some("FailedValidation"))
            || timeline.has(EventKind::Admission, Some(EventPhase::Failure), Some("ForbiddenBySecurityPolicy"))
    }

    fn explain(&self, graph: &ObjectGraph, timeline: &Timeline) -> CausalChain {
        let pod = graph.pod.metadata.name.clone();
        let event = timeline
            .last(EventKind::Admission, Some(EventPhase::Failure), Some("FailedValidation"))
            .or_else(|| timeline.last(EventKind::Admission, Some(EventPhase::Failure), Some("ForbiddenBySecurityPolicy")));
        let snippet = event.map(|e| e.message.clone()).unwrap_or_default();
        let locator = event.map(|e| e.reason.clone()).unwrap_or_default();
        CausalChain {
            causes: vec![Cause {
                id: format!("AdmissionWebhookDenied:{pod}"),
                kind: "AdmissionWebhookDenied".into(),
                message: format!("pod {pod} was denied at admission time"),
                evidence: vec![Evidence { source: EvidenceSource::Event, locator, snippet }],
                confidence: self.rule_confidence(),
                involved_object: pod,
            }],
            symptoms: vec![],
            contributing: vec![],
        }
    }
}

fn security_violation_locator(graph: &ObjectGraph) -> Option<&'static str> {
    if graph.pod.spec.security_context.as_ref().and_then(|sc| sc.run_as_non_root) == Some(false) {
        return Some("pod.spec.securityContext.runAsNonRoot");
    }
    graph.pod.spec.containers.iter().find_map(|c| {
        let sc = c.security_context.as_ref()?;
        if sc.privileged == Some(true) {
            Some("container.securityContext.privileged")
        } else if sc.allow_privilege_escalation == Some(true) {
            Some("container.securityContext.allowPrivilegeEscalation")
        } else {
            None
        }
    })
}

/// A container or pod-level `securityContext` violates the namespace's
/// Pod Security Standard, and the admission chain actually rejected it —
/// checked against the pod's structured security context, not the
/// rejection message's wording.
pub struct PodSecurityStandardViolationRule {
    blocks: Vec<String>,
}

impl Default for PodSecurityStandardViolationRule {
    fn default() -> Self {
        PodSecurityStandardViolationRule { blocks: vec!["AdmissionWebhookDenied".to_string()] }
    }
}

impl Rule for PodSecurityStandardViolationRule {
    fn name(&self) -> &str {
        "PodSecurityStandardViolation"
    }
    fn category(&self) -> &str {
        "admission"
    }
    fn priority(&self) -> i32 {
        58
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
        2
    }

    fn matches(&self, graph: &ObjectGraph, timeline: &Timeline) -> bool {
        security_violation_locator(graph).is_some()
            && timeline.has(EventKind::Admission, Some(EventPhase::Failure), Some("ForbiddenBySecurityPolicy"))
    }

    fn explain(&self, graph: &ObjectGraph, timeline: &Timeline) -> CausalChain {
        let locator = security_violation_locator(graph).expect("matches guarantees presence");
        let event = timeline
            .last(EventKind::Admission, Some(EventPhase::Failure), Some("ForbiddenBySecurityPolicy"))
            .expect("matches guarantees presence");
        let pod = graph.pod.metadata.name.clone();
        CausalChain {
            causes: vec![Cause {
                id: format!("PodSecurityStandardViolation:{pod}"),
                kind: "PodSecurityStandardViolation".into(),
                message: format!("pod {pod} violates the namespace's Pod Security Standard"),
                evidence: vec![
                    Evidence { source: EvidenceSource::ObjectState, locator: locator.to_string(), snippet: "violating securityContext field set".into() },
                    Evidence { source: EvidenceSource::Event, locator: "ForbiddenBySecurityPolicy".into(), snippet: event.message.clone() },
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
mod security_tests {
    use super::*;
    use kubediag_graph::raw::{RawContainer, RawPod, RawSecurityContext};
    use kubediag_timeline::NormalizedEvent;

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

    fn forbidden_timeline() -> Timeline {
        Timeline::new(vec![NormalizedEvent {
            kind: EventKind::Admission,
            phase: EventPhase::Failure,
            reason: "ForbiddenBySecurityPolicy".into(),
            message: "pods \"api-0\" is forbidden: violates PodSecurity \"restricted:latest\"".into(),
            source: "pod-security-webhook".into(),
            first_seen: 0,
            last_seen: 0,
            count: 1,
            involved_object: "api-0".into(),
        }])
    }

    #[test]
    fn matches_privileged_container_with_rejection_event() {
        let mut pod = RawPod::default();
        pod.metadata.name = "api-0".into();
        pod.spec.containers.push(RawContainer {
            name: "api".into(),
            security_context: Some(RawSecurityContext { privileged: Some(true), ..Default::default() }),
            ..Default::default()
        });
        let graph = empty_graph(pod);
        let rule = PodSecurityStandardViolationRule::default();
        assert!(rule.matches(&graph, &forbidden_timeline()));
    }

    #[test]
    fn does_not_match_privileged_container_without_rejection_event() {
        let mut pod = RawPod::default();
        pod.metadata.name = "api-0".into();
        pod.spec.containers.push(RawContainer {
            name: "api".into(),
            security_context: Some(RawSecurityContext { privileged: Some(true), ..Default::default() }),
            ..Default::default()
        });
        let graph = empty_graph(pod);
        let rule = PodSecurityStandardViolationRule::default();
        assert!(!rule.matches(&graph, &Timeline::new(vec![])));
    }

    #[test]
    fn does_not_match_benign_security_context() {
        let mut pod = RawPod::default();
        pod.metadata.name = "api-0".into();
        pod.spec.containers.push(RawContainer {
            name: "api".into(),
            security_context: Some(RawSecurityContext { privileged: Some(false), ..Default::default() }),
            ..Default::default()
        });
        let graph = empty_graph(pod);
        let rule = PodSecurityStandardViolationRule::default();
        assert!(!rule.matches(&graph, &forbidden_timeline()));
    }
}
