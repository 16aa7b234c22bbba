//! Storage-category programmatic rules (§8 seed scenario 3).

use kubediag_graph::{ObjectGraph, ObjectKind};
use kubediag_timeline::{pvc_pending_then_crashloop, volume_activity_span, EventKind, EventPhase, Timeline};
use kubediag_types::{CausalChain, Cause, Evidence, EvidenceSource};

use crate::rule::{Requirements, Rule};

/// A PVC the pod references resolves to no PV, or sits in a non-Bound
/// phase.
pub struct PvcNotBoundRule;

impl Rule for PvcNotBoundRule {
    fn name(&self) -> &str {
        "PVCNotBound"
    }
    fn category(&self) -> &str {
        "storage"
    }
    fn priority(&self) -> i32 {
        70
    }
    fn requires(&self) -> Requirements {
        Requirements::new(vec![ObjectKind::Pod, ObjectKind::Events], vec![ObjectKind::Pvc, ObjectKind::Pv])
    }
    fn blocks(&self) -> &[String] {
        &[]
    }
    fn rule_confidence(&self) -> f64 {
        0.75
    }
    fn expected_evidence_count(&self) -> usize {
        1
    }

    fn matches(&self, graph: &ObjectGraph, _timeline: &Timeline) -> bool {
        let claims = graph.pod_pvc_claim_names();
        if claims.is_empty() {
            return false;
        }
        let pvcs = graph.pod_pvcs();
        pvcs.len() < claims.len() || pvcs.iter().any(|pvc| pvc.status.phase != "Bound")
    }

    fn explain(&self, graph: &ObjectGraph, _timeline: &Timeline) -> CausalChain {
        let pod = graph.pod.metadata.name.clone();
        let pvcs = graph.pod_pvcs();
        let snippet = pvcs
            .first()
            .map(|p| format!("{} phase={}", p.metadata.name, p.status.phase))
            .unwrap_or_else(|| "referenced PVC not found".to_string());
        CausalChain {
            causes: vec![Cause {
                id: format!("PVCNotBound:{pod}"),
                kind: "PVCNotBound".into(),
                message: format!("pod {pod} references a PersistentVolumeClaim that is not Bound"),
                evidence: vec![Evidence {
                    source: EvidenceSource::ObjectState,
                    locator: "pvc.status.phase".into(),
                    snippet,
                }],
                confidence: self.rule_confidence(),
                involved_object: pod,
            }],
            symptoms: vec![],
            contributing: vec![],
        }
    }
}

/// A PV is bound but declares a StorageClass name the snapshot carries
/// no matching StorageClass object for.
pub struct StorageClassMissingRule;

impl Rule for StorageClassMissingRule {
    fn name(&self) -> &str {
        "StorageClassMissing"
    }
    fn category(&self) -> &str {
        "storage"
    }
    fn priority(&self) -> i32 {
        60
    }
    fn requires(&self) -> Requirements {
        Requirements::new(vec![ObjectKind::Pod, ObjectKind::Events, ObjectKind::Pvc, ObjectKind::Pv], vec![ObjectKind::StorageClass])
    }
    fn blocks(&self) -> &[String] {
        &[]
    }
    fn rule_confidence(&self) -> f64 {
        0.6
    }
    fn expected_evidence_count(&self) -> usize {
        1
    }

    fn matches(&self, graph: &ObjectGraph, _timeline: &Timeline) -> bool {
        graph.pod_pvcs().iter().any(|pvc| {
            graph
                .pv_for_pvc(pvc)
                .map(|pv| !pv.spec.storage_class_name.is_empty() && graph.storage_class_for_pv(pv).is_none())
                .unwrap_or(false)
        })
    }

    fn explain(&self, graph: &ObjectGraph, _timeline: &Timeline) -> CausalChain {
        let pod = graph.pod.metadata.name.clone();
        let sc_name = graph
            .pod_pvcs()
            .iter()
            .filter_map(|pvc| graph.pv_for_pvc(pvc))
            .map(|pv| pv.spec.storage_class_name.clone())
            .find(|name| !name.is_empty())
            .unwrap_or_default();
        CausalChain {
            causes: vec![Cause {
                id: format!("StorageClassMissing:{pod}"),
                kind: "StorageClassMissing".into(),
                message: format!("pod {pod}'s volume references StorageClass {sc_name} which is absent from the snapshot"),
                evidence: vec![Evidence {
                    source: EvidenceSource::ObjectState,
                    locator: "pv.spec.storageClassName".into(),
                    snippet: sc_name,
                }],
                confidence: self.rule_confidence(),
                involved_object: pod,
            }],
            symptoms: vec![],
            contributing: vec![],
        }
    }
}

/// Compound: the PVC sat unresolved/pending and only afterward did the
/// container enter a back-off loop. Subsumes `CrashLoopBackoff` and
/// `PVCNotBound` when both would otherwise fire for the same pod.
pub struct PvcPendingThenCrashloopRule {
    blocks: Vec<String>,
}

impl Default for PvcPendingThenCrashloopRule {
    fn default() -> Self {
        PvcPendingThenCrashloopRule {
            blocks: vec!["CrashLoopBackoff".to_string(), "PVCNotBound".to_string()],
        }
    }
}

impl Rule for PvcPendingThenCrashloopRule {
    fn name(&self) -> &str {
        "PVCPendingThenCrashloopRule"
    }
    fn category(&self) -> &str {
        "storage"
    }
    fn priority(&self) -> i32 {
        95
    }
    fn requires(&self) -> Requirements {
        Requirements::new(vec![ObjectKind::Pod, ObjectKind::Events], vec![ObjectKind::Pvc])
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

    fn matches(&self, _graph: &ObjectGraph, timeline: &Timeline) -> bool {
        pvc_pending_then_crashloop(timeline)
    }

    fn explain(&self, graph: &ObjectGraph, timeline: &Timeline) -> CausalChain {
        let pod = graph.pod.metadata.name.clone();
        let volume_event = timeline
            .first(EventKind::Volume, Some(EventPhase::Failure), None)
            .map(|e| e.message.clone())
            .unwrap_or_default();
        let backoff_event = timeline
            .last(EventKind::Lifecycle, Some(EventPhase::Failure), Some("BackOff"))
            .map(|e| e.message.clone())
            .unwrap_or_default();
        let mut evidence = vec![
            Evidence { source: EvidenceSource::Timeline, locator: "Volume".into(), snippet: volume_event },
            Evidence { source: EvidenceSource::Event, locator: "BackOff".into(), snippet: backoff_event },
        ];
        if let Some(span) = volume_activity_span(timeline) {
            evidence.push(Evidence {
                source: EvidenceSource::Timeline,
                locator: "Volume".into(),
                snippet: format!("volume-related events spanned {span}s before the crash loop began"),
            });
        }
        CausalChain {
            causes: vec![Cause {
                id: format!("PVCPendingThenCrashloop:{pod}"),
                kind: "PVCPendingThenCrashloop".into(),
                message: format!("pod {pod} crash-loops because its volume never finished provisioning"),
                evidence,
                confidence: self.rule_confidence(),
                involved_object: pod.clone(),
            }],
            symptoms: vec![],
            contributing: vec![],
        }
    }
}
