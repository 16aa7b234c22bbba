use kubediag_graph::{ObjectGraph, ObjectKind};
use kubediag_timeline::Timeline;
use kubediag_types::CausalChain;

/// Object-presence requirements a rule declares (§4.4). If any required
/// object is missing from the snapshot, the rule is skipped — not
/// evaluated, not counted as a non-match.
#[derive(Clone, Debug, Default)]
pub struct Requirements {
    pub objects: Vec<ObjectKind>,
    pub optional: Vec<ObjectKind>,
}

impl Requirements {
    pub fn new(objects: Vec<ObjectKind>, optional: Vec<ObjectKind>) -> Self {
        Requirements { objects, optional }
    }

    pub fn satisfied_by(&self, present: &std::collections::HashSet<ObjectKind>) -> bool {
        self.objects.iter().all(|k| present.contains(k))
    }

    /// Fraction of `optional` objects actually present, for
    /// `dataCompleteness` (§4.5).
    pub fn optional_presence_fraction(&self, present: &std::collections::HashSet<ObjectKind>) -> f64 {
        if self.optional.is_empty() {
            return 1.0;
        }
        let have = self.optional.iter().filter(|k| present.contains(k)).count();
        have as f64 / self.optional.len() as f64
    }
}

/// The capability every rule — programmatic or declarative — shares
/// (§4.4, §9: "Rules share a single capability set {matches, explain,
/// metadata}; model as an interface ... rather than inheritance
/// hierarchy").
pub trait Rule: Send + Sync {
    /// Unique rule name. The Registry rejects duplicates.
    fn name(&self) -> &str;

    /// Rule category (scheduling, storage, image, probe, network,
    /// admission, node-pressure, owner, lifecycle).
    fn category(&self) -> &str;

    /// Higher wins ties in resolution ordering.
    fn priority(&self) -> i32;

    fn requires(&self) -> Requirements;

    /// Names of rules this rule suppresses when it matches.
    fn blocks(&self) -> &[String];

    /// Baseline confidence declared by the rule, before composition.
    fn rule_confidence(&self) -> f64;

    /// How many corroborating evidences this rule expects (0..3); used
    /// to penalize `evidenceQuality` when the chain it produces falls
    /// short (§4.5).
    fn expected_evidence_count(&self) -> usize {
        0
    }

    /// Pure predicate: does this rule's signal hold for `graph`/`timeline`?
    fn matches(&self, graph: &ObjectGraph, timeline: &Timeline) -> bool;

    /// Build the causal chain. Only invoked when `matches` returned
    /// true. Must be deterministic and side-effect free.
    fn explain(&self, graph: &ObjectGraph, timeline: &Timeline) -> CausalChain;
}
