//! Lifecycle-category programmatic rules (§8 seed scenario 4).

use kubediag_graph::{ObjectGraph, ObjectKind};
use kubediag_timeline::{crashloop_after_config_change, rapid_restart_escalation, EventKind, EventPhase, Timeline};
use kubediag_types::{CausalChain, Cause, Evidence, EvidenceSource};

use crate::rule::{Requirements, Rule};

/// A container's last termination was `OOMKilled` with exit code 137.
/// ObjectState evidence (container status), so `expected_evidence_count`
/// is 1 but the source carries full weight (§4.5 precedence).
pub struct OomKilledRule;

impl Rule for OomKilledRule {
    fn name(&self) -> &str {
        "OOMKilled"
    }
    fn category(&self) -> &str {
        "lifecycle"
    }
    fn priority(&self) -> i32 {
        85
    }
    fn requires(&self) -> Requirements {
        Requirements::new(vec![ObjectKind::Pod, ObjectKind::Events], vec![])
    }
    fn blocks(&self) -> &[String] {
        &[]
    }
    fn rule_confidence(&self) -> f64 {
        0.9
    }
    fn expected_evidence_count(&self) -> usize {
        1
    }

    fn matches(&self, graph: &ObjectGraph, _timeline: &Timeline) -> bool {
        graph.pod.status.container_statuses.iter().any(|cs| {
            cs.last_state
                .terminated
                .as_ref()
                .map(|t| t.reason.as_deref() == Some("OOMKilled") && t.exit_code == 137)
                .unwrap_or(false)
        })
    }

    fn explain(&self, graph: &ObjectGraph, _timeline: &Timeline) -> CausalChain {
        let pod = graph.pod.metadata.name.clone();
        let container = graph
            .pod
            .status
            .container_statuses
            .iter()
            .find(|cs| cs.last_state.terminated.as_ref().map(|t| t.reason.as_deref() == Some("OOMKilled")).unwrap_or(false));
        let name = container.map(|cs| cs.name.clone()).unwrap_or_default();
        CausalChain {
            causes: vec![Cause {
                id: format!("OOMKilled:{pod}"),
                kind: "OOMKilled".into(),
                message: format!("container {name} in pod {pod} was OOMKilled (exit code 137)"),
                evidence: vec![Evidence {
                    source: EvidenceSource::ObjectState,
                    locator: format!("containerStatuses[{name}].lastState.terminated"),
                    snippet: "reason=OOMKilled exitCode=137".into(),
                }],
                confidence: self.rule_confidence(),
                involved_object: pod,
            }],
            symptoms: vec![],
            contributing: vec![],
        }
    }
}

/// The atomic crash-loop signal: a container is waiting on `CrashLoopBackOff`
/// or the timeline shows repeated `BackOff` events.
pub struct CrashLoopBackoffRule;

impl Rule for CrashLoopBackoffRule {
    fn name(&self) -> &str {
        "CrashLoopBackoff"
    }
    fn category(&self) -> &str {
        "lifecycle"
    }
    fn priority(&self) -> i32 {
        50
    }
    fn requires(&self) -> Requirements {
        Requirements::new(vec![ObjectKind::Pod, ObjectKind::Events], vec![])
    }
    fn blocks(&self) -> &[String] {
        &[]
    }
    fn rule_confidence(&self) -> f64 {
        0.65
    }
    fn expected_evidence_count(&self) -> usize {
        1
    }

    fn matches(&self, graph: &ObjectGraph, timeline: &Timeline) -> bool {
        let waiting = graph
            .pod
            .status
            .container_statuses
            .iter()
            .any(|cs| cs.state.waiting.as_ref().and_then(|w| w.reason.as_deref()) == Some("CrashLoopBackOff"));
        waiting || timeline.has(EventKind::Lifecycle, Some(EventPhase::Failure), Some("BackOff"))
    }

    fn explain(&self, graph: &ObjectGraph, timeline: &Timeline) -> CausalChain {
        let pod = graph.pod.metadata.name.clone();
        let snippet = timeline
            .last(EventKind::Lifecycle, Some(EventPhase::Failure), Some("BackOff"))
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "CrashLoopBackOff".to_string());
        CausalChain {
            causes: vec![Cause {
                id: format!("CrashLoopBackoff:{pod}"),
                kind: "CrashLoopBackoff".into(),
                message: format!("pod {pod} is repeatedly crashing and being restarted"),
                evidence: vec![Evidence { source: EvidenceSource::Event, locator: "BackOff".into(), snippet }],
                confidence: self.rule_confidence(),
                involved_object: pod,
            }],
            symptoms: vec![],
            contributing: vec![],
        }
    }
}

/// Compound: three or more `BackOff` events within a five-minute window
/// — an escalating restart loop, not an isolated crash. Subsumes the
/// atomic `CrashLoopBackoff` signal.
pub struct RapidRestartEscalationCompound {
    blocks: Vec<String>,
}

impl Default for RapidRestartEscalationCompound {
    fn default() -> Self {
        RapidRestartEscalationCompound { blocks: vec!["CrashLoopBackoff".to_string()] }
    }
}

impl Rule for RapidRestartEscalationCompound {
    fn name(&self) -> &str {
        "RapidRestartEscalationCompound"
    }
    fn category(&self) -> &str {
        "lifecycle"
    }
    fn priority(&self) -> i32 {
        78
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
        1
    }

    fn matches(&self, _graph: &ObjectGraph, timeline: &Timeline) -> bool {
        rapid_restart_escalation(timeline)
    }

    fn explain(&self, graph: &ObjectGraph, timeline: &Timeline) -> CausalChain {
        let pod = graph.pod.metadata.name.clone();
        let count = timeline.count(EventKind::Lifecycle, Some(EventPhase::Failure), Some("BackOff"));
        CausalChain {
            causes: vec![Cause {
                id: format!("RapidRestartEscalation:{pod}"),
                kind: "RapidRestartEscalation".into(),
                message: format!("pod {pod} restarted {count} times in a short window, an escalating crash loop"),
                evidence: vec![Evidence {
                    source: EvidenceSource::Timeline,
                    locator: "BackOff".into(),
                    snippet: format!("{count} occurrences within 300s"),
                }],
                confidence: self.rule_confidence(),
                involved_object: pod,
            }],
            symptoms: vec![],
            contributing: vec![],
        }
    }
}

/// Compound: the container was killed — commonly a mounted
/// ConfigMap/Secret update forcing a restart — and only afterward
/// entered a back-off loop. Subsumes the atomic `CrashLoopBackoff`
/// signal when both would otherwise fire for the same pod.
pub struct ConfigChangeCrashloopRule {
    blocks: Vec<String>,
}

impl Default for ConfigChangeCrashloopRule {
    fn default() -> Self {
        ConfigChangeCrashloopRule { blocks: vec!["CrashLoopBackoff".to_string()] }
    }
}

impl Rule for ConfigChangeCrashloopRule {
    fn name(&self) -> &str {
        "ConfigChangeCrashloop"
    }
    fn category(&self) -> &str {
        "lifecycle"
    }
    fn priority(&self) -> i32 {
        72
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

    fn matches(&self, _graph: &ObjectGraph, timeline: &Timeline) -> bool {
        crashloop_after_config_change(timeline)
    }

    fn explain(&self, graph: &ObjectGraph, timeline: &Timeline) -> CausalChain {
        let pod = graph.pod.metadata.name.clone();
        let killing_event = timeline
            .first(EventKind::Lifecycle, Some(EventPhase::Info), Some("Killing"))
            .map(|e| e.message.clone())
            .unwrap_or_default();
        let backoff_event = timeline
            .last(EventKind::Lifecycle, Some(EventPhase::Failure), Some("BackOff"))
            .map(|e| e.message.clone())
            .unwrap_or_default();
        CausalChain {
            causes: vec![Cause {
                id: format!("ConfigChangeCrashloop:{pod}"),
                kind: "ConfigChangeCrashloop".into(),
                message: format!("pod {pod} crash-loops after a container restart, likely from a mounted config or secret update"),
                evidence: vec![
                    Evidence { source: EvidenceSource::Timeline, locator: "Killing".into(), snippet: killing_event },
                    Evidence { source: EvidenceSource::Event, locator: "BackOff".into(), snippet: backoff_event },
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
mod config_change_tests {
    use super::*;
    use kubediag_graph::raw::RawPod;
    use kubediag_timeline::NormalizedEvent;

    fn pod(name: &str) -> ObjectGraph {
        let mut p = RawPod::default();
        p.metadata.name = name.into();
        ObjectGraph {
            pod: p,
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

    fn ev(kind: EventKind, phase: EventPhase, reason: &str, t: i64) -> NormalizedEvent {
        NormalizedEvent {
            kind,
            phase,
            reason: reason.to_string(),
            message: format!("{reason} at {t}"),
            source: "kubelet".into(),
            first_seen: t,
            last_seen: t,
            count: 1,
            involved_object: "worker-0".into(),
        }
    }

    #[test]
    fn matches_killing_then_backoff() {
        let timeline = Timeline::new(vec![
            ev(EventKind::Lifecycle, EventPhase::Info, "Killing", 1),
            ev(EventKind::Lifecycle, EventPhase::Failure, "BackOff", 2),
        ]);
        let rule = ConfigChangeCrashloopRule::default();
        assert!(rule.matches(&pod("worker-0"), &timeline));
    }

    #[test]
    fn does_not_match_backoff_without_prior_killing() {
        let timeline = Timeline::new(vec![ev(EventKind::Lifecycle, EventPhase::Failure, "BackOff", 1)]);
        let rule = ConfigChangeCrashloopRule::default();
        assert!(!rule.matches(&pod("worker-0"), &timeline));
    }

    #[test]
    fn does_not_match_killing_without_subsequent_backoff() {
        let timeline = Timeline::new(vec![ev(EventKind::Lifecycle, EventPhase::Info, "Killing", 1)]);
        let rule = ConfigChangeCrashloopRule::default();
        assert!(!rule.matches(&pod("worker-0"), &timeline));
    }
}
