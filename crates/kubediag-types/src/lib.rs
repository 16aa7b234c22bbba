//! Causality primitives shared across the kubediag workspace.
//!
//! `Cause` ≠ `Evidence` ≠ `CausalChain` ≠ `Explanation` — each carries a
//! distinct role in the resolution algebra; see the module docs for how
//! they compose.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod confidence;
mod error;
mod evidence;

pub use confidence::*;
pub use error::*;
pub use evidence::*;

use serde::{Deserialize, Serialize};

/// A named, evidenced claim about why the pod is in its current state.
///
/// Identity is `(kind, involved_object)`; two causes with the same identity
/// are the same fact observed by different rules and are deduplicated by
/// the resolution engine, keeping the highest evidence-quality copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cause {
    pub id: String,
    pub kind: String,
    pub message: String,
    pub evidence: Vec<Evidence>,
    pub confidence: f64,
    /// The object this cause is about, e.g. a pod or container name.
    /// Part of `Cause` identity alongside `kind`.
    pub involved_object: String,
}

impl Cause {
    pub fn identity(&self) -> (&str, &str) {
        (self.kind.as_str(), self.involved_object.as_str())
    }
}

/// A structured bundle of root causes, downstream symptoms, and
/// contributing factors produced by a single rule's `explain`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CausalChain {
    pub causes: Vec<Cause>,
    pub symptoms: Vec<Cause>,
    pub contributing: Vec<Cause>,
}

impl CausalChain {
    pub fn is_empty(&self) -> bool {
        self.causes.is_empty() && self.symptoms.is_empty() && self.contributing.is_empty()
    }
}

/// A rule that matched, carrying enough information for the resolution
/// engine to rank it against every other match and decide suppression.
///
/// `RuleMatch` values are produced, combined, and discarded within a
/// single `explain` invocation; they are never part of the serialized
/// `Explanation`.
#[derive(Clone, Debug)]
pub struct RuleMatch {
    pub rule_name: String,
    pub priority: i32,
    pub category: String,
    pub chain: CausalChain,
    pub rule_confidence: f64,
    pub blocks: Vec<String>,
}

/// A suppressed rule and the reason it did not surface in the output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuppressedRule {
    pub name: String,
    pub reason: String,
}

/// Per-rule evaluation record included in `metadata.rulesEvaluated` when
/// the `verbose` configuration knob is set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleEvalRecord {
    pub name: String,
    pub matched: bool,
    pub suppressed: bool,
    #[serde(rename = "composedConfidence")]
    pub composed_confidence: f64,
}

/// A rule that panicked during `matches`/`explain`; caught at the engine's
/// evaluation boundary and recorded here rather than propagated as a
/// `DiagnosticError` or allowed to bring down the whole invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleErrorRecord {
    pub name: String,
    pub message: String,
}

/// Metadata attached to every `Explanation`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "inputsHash")]
    pub inputs_hash: String,
    #[serde(rename = "engineVersion")]
    pub engine_version: String,
    #[serde(rename = "rulesEvaluated")]
    pub rules_evaluated: usize,
    #[serde(rename = "rulesMatched")]
    pub rules_matched: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    #[serde(rename = "ruleErrors")]
    pub rule_errors: Vec<RuleErrorRecord>,
    /// Present only when `EngineConfig::verbose` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "rulesEvaluatedDetail")]
    pub rules_evaluated_detail: Option<Vec<RuleEvalRecord>>,
}

/// The final, language-neutral output record of a single `explain`
/// invocation. Field order and key names here are part of the system
/// contract (§6 of the specification) and must not be reordered by a
/// renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub root_cause: Option<Cause>,
    pub confidence: f64,
    pub causal_chain: CausalChain,
    pub suppressed_rules: Vec<SuppressedRule>,
    pub evidence: Vec<Evidence>,
    pub suggested_next_checks: Vec<String>,
    pub metadata: Metadata,
}

impl Explanation {
    /// Round `confidence` to the three-decimal precision the contract
    /// requires before the value leaves the engine.
    pub fn finalize_confidence(mut self) -> Self {
        self.confidence = round3(self.confidence);
        self
    }
}
