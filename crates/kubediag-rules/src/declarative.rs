//! The declarative rule interpreter (§4.4, §9). A `RuleSpec` is parsed
//! from YAML and turned into a `DeclarativeRule`, which implements
//! `Rule` by evaluating a fixed, data-described set of predicates — it
//! never executes arbitrary code.

use crate::rule::{Requirements, Rule};
use kubediag_graph::{ObjectGraph, ObjectKind};
use kubediag_timeline::{EventKind, EventPhase, Timeline};
use kubediag_types::{Cause, CausalChain, DiagnosticError, Evidence, EvidenceSource};
use serde::Deserialize;

fn object_kind(name: &str) -> Option<ObjectKind> {
    match name {
        "pod" => Some(ObjectKind::Pod),
        "events" => Some(ObjectKind::Events),
        "pvc" => Some(ObjectKind::Pvc),
        "pv" => Some(ObjectKind::Pv),
        "storageclass" => Some(ObjectKind::StorageClass),
        "node" => Some(ObjectKind::Node),
        "owner" => Some(ObjectKind::Owner),
        "serviceaccount" => Some(ObjectKind::ServiceAccount),
        "secrets" => Some(ObjectKind::Secrets),
        "configmaps" => Some(ObjectKind::ConfigMaps),
        _ => None,
    }
}

fn event_kind(name: &str) -> Option<EventKind> {
    match name {
        "Scheduling" => Some(EventKind::Scheduling),
        "Image" => Some(EventKind::Image),
        "Volume" => Some(EventKind::Volume),
        "Probe" => Some(EventKind::Probe),
        "Network" => Some(EventKind::Network),
        "Admission" => Some(EventKind::Admission),
        "Lifecycle" => Some(EventKind::Lifecycle),
        "NodePressure" => Some(EventKind::NodePressure),
        "Owner" => Some(EventKind::Owner),
        "Generic" => Some(EventKind::Generic),
        _ => None,
    }
}

fn event_phase(name: &str) -> Option<EventPhase> {
    match name {
        "Failure" => Some(EventPhase::Failure),
        "Warning" => Some(EventPhase::Warning),
        "Info" => Some(EventPhase::Info),
        _ => None,
    }
}

fn evidence_source(name: &str) -> EvidenceSource {
    match name {
        "ObjectState" => EvidenceSource::ObjectState,
        "Condition" => EvidenceSource::Condition,
        "Timeline" => EvidenceSource::Timeline,
        _ => EvidenceSource::Event,
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum PredicateSpec {
    /// `pod.status.phase == phase`.
    PodPhaseIs { phase: String },
    /// At least one normalized event matches `kind`/`phase`/`reason`
    /// (any left unset matches anything for that field).
    EventPresent {
        kind: String,
        #[serde(default)]
        phase: Option<String>,
        #[serde(default)]
        reason: Option<String>,
    },
    /// `Timeline::count` for the given selector is at least `min_count`.
    EventCountAtLeast {
        kind: String,
        #[serde(default)]
        phase: Option<String>,
        #[serde(default)]
        reason: Option<String>,
        min_count: usize,
    },
    /// `Timeline::repeated` for `reason`.
    Repeated {
        reason: String,
        min_count: usize,
        #[serde(default)]
        within: Option<i64>,
    },
    /// A node condition of `type_` has `status`.
    NodeConditionIs { type_: String, status: String },
    /// Any container's waiting reason equals `reason`.
    ContainerWaitingReasonIs { reason: String },
    /// Any container's last-termination reason equals `reason`.
    ContainerLastTerminationReasonIs { reason: String },
    /// The pod declares no `imagePullSecrets`.
    NoImagePullSecrets,
    /// The resolved PVC for the pod has `status.phase == phase`.
    PvcPhaseIs { phase: String },
    /// The pod references a PVC claim name with no matching PVC object.
    PvcUnresolved,
    /// A PVC is bound to no PV (`spec.volumeName` empty or unresolved).
    PvcUnboundToPv,
    /// Any event's message contains `substring` (case-insensitive).
    EventMessageContains { substring: String },
}

impl PredicateSpec {
    fn eval(&self, graph: &ObjectGraph, timeline: &Timeline) -> bool {
        match self {
            PredicateSpec::PodPhaseIs { phase } => graph.pod.status.phase == *phase,
            PredicateSpec::EventPresent { kind, phase, reason } => {
                let Some(k) = event_kind(kind) else { return false };
                let p = phase.as_deref().and_then(event_phase);
                timeline.has(k, p, reason.as_deref())
            }
            PredicateSpec::EventCountAtLeast { kind, phase, reason, min_count } => {
                let Some(k) = event_kind(kind) else { return false };
                let p = phase.as_deref().and_then(event_phase);
                timeline.count(k, p, reason.as_deref()) >= *min_count
            }
            PredicateSpec::Repeated { reason, min_count, within } => {
                timeline.repeated(reason, *min_count, *within)
            }
            PredicateSpec::NodeConditionIs { type_, status } => graph
                .node_condition(type_)
                .map(|c| c.status == *status)
                .unwrap_or(false),
            PredicateSpec::ContainerWaitingReasonIs { reason } => graph
                .pod
                .status
                .container_statuses
                .iter()
                .any(|cs| cs.state.waiting.as_ref().and_then(|w| w.reason.as_deref()) == Some(reason.as_str())),
            PredicateSpec::ContainerLastTerminationReasonIs { reason } => graph
                .pod
                .status
                .container_statuses
                .iter()
                .any(|cs| cs.last_state.terminated.as_ref().and_then(|t| t.reason.as_deref()) == Some(reason.as_str())),
            PredicateSpec::NoImagePullSecrets => graph.pod.spec.image_pull_secrets.is_empty(),
            PredicateSpec::PvcPhaseIs { phase } => {
                graph.pod_pvcs().iter().any(|pvc| pvc.status.phase == *phase)
            }
            PredicateSpec::PvcUnresolved => {
                let claims = graph.pod_pvc_claim_names();
                !claims.is_empty() && graph.pod_pvcs().len() < claims.len()
            }
            PredicateSpec::PvcUnboundToPv => graph
                .pod_pvcs()
                .iter()
                .any(|pvc| graph.pv_for_pvc(pvc).is_none()),
            PredicateSpec::EventMessageContains { substring } => {
                let pattern = regex::RegexBuilder::new(&regex::escape(substring))
                    .case_insensitive(true)
                    .build()
                    .expect("escaped literal is always a valid pattern");
                timeline.events().iter().any(|e| pattern.is_match(&e.message))
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvidenceTemplate {
    pub source: String,
    pub locator: String,
    pub snippet: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CauseTemplate {
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub evidence: Vec<EvidenceTemplate>,
}

impl CauseTemplate {
    fn instantiate(&self, involved_object: &str) -> Cause {
        Cause {
            id: format!("{}:{}", self.kind, involved_object),
            kind: self.kind.clone(),
            message: self.message.replace("{involvedObject}", involved_object),
            evidence: self
                .evidence
                .iter()
                .map(|e| Evidence {
                    source: evidence_source(&e.source),
                    locator: e.locator.clone(),
                    snippet: e.snippet.replace("{involvedObject}", involved_object),
                })
                .collect(),
            confidence: self.confidence,
            involved_object: involved_object.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ChainTemplateSpec {
    #[serde(default)]
    pub causes: Vec<CauseTemplate>,
    #[serde(default)]
    pub symptoms: Vec<CauseTemplate>,
    #[serde(default)]
    pub contributing: Vec<CauseTemplate>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RequirementsSpec {
    #[serde(default)]
    pub objects: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    pub category: String,
    pub priority: i32,
    pub rule_confidence: f64,
    #[serde(default)]
    pub requires: RequirementsSpec,
    #[serde(default)]
    pub blocks: Vec<String>,
    #[serde(default)]
    pub expected_evidence_count: usize,
    pub when: Vec<PredicateSpec>,
    pub chain: ChainTemplateSpec,
}

/// Parse one or more `RuleSpec`s out of a YAML document containing a
/// top-level sequence.
pub fn parse_rule_specs(yaml: &str) -> Result<Vec<RuleSpec>, DiagnosticError> {
    serde_yaml::from_str(yaml).map_err(|e| DiagnosticError::RuleMalformed {
        rule_name: "<declarative corpus>".to_string(),
        detail: e.to_string(),
    })
}

/// A rule whose behavior is entirely described by data (§4.4, §9). The
/// `when` predicates are AND-combined; `explain` instantiates the chain
/// template against the pod's name as the sole interpolation point.
pub struct DeclarativeRule {
    spec: RuleSpec,
    requirements: Requirements,
}

impl DeclarativeRule {
    pub fn new(spec: RuleSpec) -> Result<Self, DiagnosticError> {
        let objects = spec
            .requires
            .objects
            .iter()
            .map(|s| object_kind(s).ok_or_else(|| DiagnosticError::RuleMalformed {
                rule_name: spec.name.clone(),
                detail: format!("unknown required object kind {s}"),
            }))
            .collect::<Result<Vec<_>, _>>()?;
        let optional = spec
            .requires
            .optional
            .iter()
            .map(|s| object_kind(s).ok_or_else(|| DiagnosticError::RuleMalformed {
                rule_name: spec.name.clone(),
                detail: format!("unknown optional object kind {s}"),
            }))
            .collect::<Result<Vec<_>, _>>()?;
        let requirements = Requirements::new(objects, optional);
        Ok(DeclarativeRule { spec, requirements })
    }
}

impl Rule for DeclarativeRule {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn category(&self) -> &str {
        &self.spec.category
    }

    fn priority(&self) -> i32 {
        self.spec.priority
    }

    fn requires(&self) -> Requirements {
        self.requirements.clone()
    }

    fn blocks(&self) -> &[String] {
        &self.spec.blocks
    }

    fn rule_confidence(&self) -> f64 {
        self.spec.rule_confidence
    }

    fn expected_evidence_count(&self) -> usize {
        self.spec.expected_evidence_count
    }

    fn matches(&self, graph: &ObjectGraph, timeline: &Timeline) -> bool {
        self.spec.when.iter().all(|p| p.eval(graph, timeline))
    }

    fn explain(&self, graph: &ObjectGraph, _timeline: &Timeline) -> CausalChain {
        let involved = graph.pod.metadata.name.as_str();
        CausalChain {
            causes: self.spec.chain.causes.iter().map(|c| c.instantiate(involved)).collect(),
            symptoms: self.spec.chain.symptoms.iter().map(|c| c.instantiate(involved)).collect(),
            contributing: self.spec.chain.contributing.iter().map(|c| c.instantiate(involved)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
- name: TestFailedSchedulingGeneric
  category: scheduling
  priority: 10
  rule_confidence: 0.6
  requires:
    objects: [pod, events]
  when:
    - type: EventPresent
      kind: Scheduling
      phase: Failure
      reason: FailedScheduling
  chain:
    causes:
      - kind: SchedulingFailed
        message: "pod {involvedObject} failed to schedule"
        confidence: 0.6
        evidence:
          - source: Event
            locator: FailedScheduling
            snippet: "scheduling failed for {involvedObject}"
"#;

    #[test]
    fn parses_and_matches_a_declarative_rule() {
        let specs = parse_rule_specs(SAMPLE).unwrap();
        assert_eq!(specs.len(), 1);
        let rule = DeclarativeRule::new(specs.into_iter().next().unwrap()).unwrap();
        assert_eq!(rule.name(), "TestFailedSchedulingGeneric");
        assert_eq!(rule.category(), "scheduling");
    }
}
