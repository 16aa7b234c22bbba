use serde::{Deserialize, Serialize};

/// Where a piece of evidence was observed. Ordering here also defines
/// evidence *quality*: `ObjectState` is the strongest signal, `Event` the
/// weakest, per the precedence invariant in §4.5 of the specification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum EvidenceSource {
    ObjectState,
    Condition,
    Timeline,
    Event,
}

impl EvidenceSource {
    /// Weight used by `evidenceQuality` composition (§4.5).
    pub fn weight(self) -> f64 {
        match self {
            EvidenceSource::ObjectState => 1.0,
            EvidenceSource::Condition => 0.9,
            EvidenceSource::Timeline => 0.75,
            EvidenceSource::Event => 0.6,
        }
    }
}

/// A record attached to a `Cause` pointing at the concrete fact that
/// supports it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub source: EvidenceSource,
    /// Field path (e.g. `pod.status.containerStatuses[0].lastState`) or
    /// event reason that the evidence was derived from.
    pub locator: String,
    pub snippet: String,
}

impl Evidence {
    /// The `(source, locator)` key evidence is deduplicated by.
    pub fn dedup_key(&self) -> (EvidenceSource, &str) {
        (self.source, self.locator.as_str())
    }
}

/// Deduplicate evidence by `(source, locator)`, preserving the order of
/// first occurrence and the object-state-first precedence established by
/// the caller's ordering of `items`.
pub fn dedup_evidence(items: impl IntoIterator<Item = Evidence>) -> Vec<Evidence> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for e in items {
        let key = (e.source, e.locator.clone());
        if seen.insert(key) {
            out.push(e);
        }
    }
    out
}
