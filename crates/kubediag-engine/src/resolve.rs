use crate::config::EngineConfig;
use crate::suggested_checks::{checks_for, no_signal_advisory};
use kubediag_graph::raw::RawSnapshot;
use kubediag_rules::Registry;
use kubediag_types::{
    clamp01, dedup_evidence, Cause, CausalChain, Evidence, Explanation, Metadata, RuleErrorRecord, RuleEvalRecord,
    RuleMatch, SuppressedRule, CONFLICT_PENALTY_FLOOR, CONFLICT_PENALTY_STEP, DATA_COMPLETENESS_FLOOR,
    MISSING_CORROBORATION_STEP,
};
use std::collections::{HashMap, HashSet};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, info, warn};

/// A matched rule plus the extra facts the confidence composition needs
/// that don't belong on the serialized `RuleMatch` (§4.5).
struct Evaluated {
    m: RuleMatch,
    data_completeness: f64,
    expected_evidence_count: usize,
}

/// Run the full resolution algorithm (§4.5) over a raw snapshot, producing
/// the final `Explanation`. Never panics: a rule that panics during
/// `matches`/`explain` is caught, recorded in `metadata.rule_errors`, and
/// treated as not matching.
pub fn explain(snapshot: RawSnapshot, registry: &Registry, config: &EngineConfig) -> Explanation {
    let inputs_hash = hash_snapshot(&snapshot);

    let (graph, timeline) = match kubediag_normalize::normalize(snapshot) {
        Ok(pair) => pair,
        Err(err) => {
            warn!(error = %err, "normalization failed");
            return Explanation {
                root_cause: None,
                confidence: 0.0,
                causal_chain: CausalChain::default(),
                suppressed_rules: Vec::new(),
                evidence: Vec::new(),
                suggested_next_checks: Vec::new(),
                metadata: Metadata {
                    inputs_hash,
                    engine_version: config.engine_version.clone(),
                    rules_evaluated: 0,
                    rules_matched: 0,
                    error: Some(err.to_string()),
                    rule_errors: Vec::new(),
                    rules_evaluated_detail: None,
                },
            };
        }
    };

    let present = graph.present();

    let candidates: Vec<&dyn kubediag_rules::Rule> = registry
        .rules()
        .iter()
        .map(|r| r.as_ref())
        .filter(|r| r.requires().satisfied_by(&present))
        .filter(|r| config.category_allowed(r.category()))
        .collect();

    let mut evaluated: Vec<Evaluated> = Vec::new();
    let mut rule_errors: Vec<RuleErrorRecord> = Vec::new();
    let mut eval_detail: Vec<RuleEvalRecord> = Vec::new();

    for rule in &candidates {
        let matched = match catch_unwind(AssertUnwindSafe(|| rule.matches(&graph, &timeline))) {
            Ok(result) => result,
            Err(_) => {
                warn!(rule = %rule.name(), "rule panicked during matches(), treating as not matched");
                rule_errors.push(RuleErrorRecord {
                    name: rule.name().to_string(),
                    message: "panicked during matches()".to_string(),
                });
                false
            }
        };
        debug!(rule = %rule.name(), matched, "rule evaluated");

        if !matched {
            eval_detail.push(RuleEvalRecord {
                name: rule.name().to_string(),
                matched: false,
                suppressed: false,
                composed_confidence: 0.0,
            });
            continue;
        }

        match catch_unwind(AssertUnwindSafe(|| rule.explain(&graph, &timeline))) {
            Ok(chain) => {
                evaluated.push(Evaluated {
                    m: RuleMatch {
                        rule_name: rule.name().to_string(),
                        priority: rule.priority(),
                        category: rule.category().to_string(),
                        chain,
                        rule_confidence: rule.rule_confidence(),
                        blocks: rule.blocks().to_vec(),
                    },
                    data_completeness: rule.requires().optional_presence_fraction(&present).max(DATA_COMPLETENESS_FLOOR),
                    expected_evidence_count: rule.expected_evidence_count(),
                });
            }
            Err(_) => {
                warn!(rule = %rule.name(), "rule panicked during explain(), dropping its match");
                rule_errors.push(RuleErrorRecord {
                    name: rule.name().to_string(),
                    message: "panicked during explain()".to_string(),
                });
                eval_detail.push(RuleEvalRecord {
                    name: rule.name().to_string(),
                    matched: false,
                    suppressed: false,
                    composed_confidence: 0.0,
                });
            }
        }
    }

    let matches: Vec<RuleMatch> = evaluated.iter().map(|e| e.m.clone()).collect();
    let suppressed = build_suppression_map(&matches);

    let composed: HashMap<String, f64> = evaluated
        .iter()
        .map(|e| (e.m.rule_name.clone(), compose_confidence(e, &matches, &suppressed)))
        .collect();

    for e in &evaluated {
        eval_detail.push(RuleEvalRecord {
            name: e.m.rule_name.clone(),
            matched: true,
            suppressed: suppressed.contains_key(&e.m.rule_name),
            composed_confidence: composed.get(&e.m.rule_name).copied().unwrap_or(0.0),
        });
    }

    let unsuppressed: Vec<&RuleMatch> = matches.iter().filter(|m| !suppressed.contains_key(&m.rule_name)).collect();

    let winner_name: Option<String> = unsuppressed
        .iter()
        .filter(|m| !m.chain.causes.is_empty())
        .max_by(|a, b| {
            let ca = composed.get(&a.rule_name).copied().unwrap_or(0.0);
            let cb = composed.get(&b.rule_name).copied().unwrap_or(0.0);
            ca.partial_cmp(&cb)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.priority.cmp(&b.priority))
                .then_with(|| registry_index(registry, &b.rule_name).cmp(&registry_index(registry, &a.rule_name)))
        })
        .map(|m| m.rule_name.clone());

    info!(
        evaluated = candidates.len(),
        matched = matches.len(),
        winner = winner_name.as_deref().unwrap_or("<none>"),
        "resolution complete"
    );

    let metadata_base = Metadata {
        inputs_hash,
        engine_version: config.engine_version.clone(),
        rules_evaluated: candidates.len(),
        rules_matched: matches.len(),
        error: None,
        rule_errors,
        rules_evaluated_detail: if config.verbose { Some(eval_detail) } else { None },
    };

    let suppressed_rules: Vec<SuppressedRule> = matches
        .iter()
        .filter_map(|m| {
            suppressed.get(&m.rule_name).map(|reason| SuppressedRule { name: m.rule_name.clone(), reason: reason.clone() })
        })
        .collect();

    let winner = winner_name.and_then(|name| unsuppressed.iter().find(|m| m.rule_name == name).copied());

    let Some(winner) = winner else {
        let contributing = merge_contributing(&unsuppressed, None);
        let causal_chain = CausalChain { causes: Vec::new(), symptoms: Vec::new(), contributing };
        let evidence = dedup_evidence(collect_all_evidence(&causal_chain));
        return Explanation {
            root_cause: None,
            confidence: 0.0,
            causal_chain,
            suppressed_rules,
            evidence,
            suggested_next_checks: no_signal_advisory(),
            metadata: metadata_base,
        }
        .finalize_confidence();
    };

    let mut causal_chain = winner.chain.clone();
    causal_chain.contributing = merge_contributing(&unsuppressed, Some(winner));
    let root_cause = causal_chain.causes.first().cloned();
    let confidence = composed.get(&winner.rule_name).copied().unwrap_or(0.0);

    let evidence = dedup_evidence(collect_all_evidence(&causal_chain));
    let suggested_next_checks = build_suggested_checks(&root_cause, &causal_chain.contributing);

    Explanation { root_cause, confidence, causal_chain, suppressed_rules, evidence, suggested_next_checks, metadata: metadata_base }
        .finalize_confidence()
}

fn registry_index(registry: &Registry, rule_name: &str) -> usize {
    registry.rules().iter().position(|r| r.name() == rule_name).unwrap_or(usize::MAX)
}

/// Fixed-point suppression: only a rule that is itself unsuppressed can
/// propagate its `blocks` onward (§4.5 step 5).
fn build_suppression_map(matches: &[RuleMatch]) -> HashMap<String, String> {
    let mut suppressed: HashMap<String, String> = HashMap::new();
    loop {
        let mut changed = false;
        for m in matches {
            if suppressed.contains_key(&m.rule_name) {
                continue;
            }
            for blocked in &m.blocks {
                if !suppressed.contains_key(blocked) {
                    suppressed.insert(blocked.clone(), format!("suppressed by {}", m.rule_name));
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
    suppressed
}

fn collect_all_evidence(chain: &CausalChain) -> Vec<Evidence> {
    chain
        .causes
        .iter()
        .chain(chain.symptoms.iter())
        .chain(chain.contributing.iter())
        .flat_map(|c| c.evidence.iter().cloned())
        .collect()
}

/// `composed = clamp01(ruleConfidence * evidenceQuality * dataCompleteness * conflictPenalty)` (§4.5).
fn compose_confidence(e: &Evaluated, all_matches: &[RuleMatch], suppressed: &HashMap<String, String>) -> f64 {
    let all_evidence = collect_all_evidence(&e.m.chain);
    let max_weight = all_evidence.iter().map(|ev| ev.source.weight()).fold(0.0_f64, f64::max);
    let max_weight = if all_evidence.is_empty() { 0.6 } else { max_weight };

    let missing_corroboration = e.expected_evidence_count.saturating_sub(all_evidence.len());
    let evidence_quality = (max_weight * (1.0 - MISSING_CORROBORATION_STEP * missing_corroboration as f64)).max(0.0);

    let other_unsuppressed_same_category = all_matches
        .iter()
        .filter(|m| m.rule_name != e.m.rule_name)
        .filter(|m| !suppressed.contains_key(&m.rule_name))
        .filter(|m| m.category == e.m.category)
        .count();
    let conflict_penalty = (1.0 - CONFLICT_PENALTY_STEP * other_unsuppressed_same_category as f64).max(CONFLICT_PENALTY_FLOOR);

    clamp01(e.m.rule_confidence * evidence_quality * e.data_completeness * conflict_penalty)
}

/// Merge causes from every unsuppressed match other than the winner into
/// `contributing`, deduped by `(kind, involvedObject)` identity (§4.5 step 7).
fn merge_contributing<'a>(unsuppressed: &[&'a RuleMatch], winner: Option<&'a RuleMatch>) -> Vec<Cause> {
    let mut out: Vec<Cause> = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    if let Some(winner) = winner {
        for c in winner.chain.causes.iter().chain(winner.chain.contributing.iter()) {
            seen.insert((c.kind.clone(), c.involved_object.clone()));
        }
        out.extend(winner.chain.contributing.iter().cloned());
    }
    for m in unsuppressed {
        if let Some(winner) = winner {
            if m.rule_name == winner.rule_name {
                continue;
            }
        }
        for c in m.chain.causes.iter().chain(m.chain.contributing.iter()) {
            let id = (c.kind.clone(), c.involved_object.clone());
            if seen.insert(id) {
                out.push(c.clone());
            }
        }
    }
    out
}

fn build_suggested_checks(root_cause: &Option<Cause>, contributing: &[Cause]) -> Vec<String> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    if let Some(cause) = root_cause {
        for check in checks_for(&cause.kind, &cause.involved_object) {
            if seen.insert(check.clone()) {
                out.push(check);
            }
        }
    }
    for cause in contributing {
        for check in checks_for(&cause.kind, &cause.involved_object) {
            if seen.insert(check.clone()) {
                out.push(check);
            }
        }
    }
    out
}

fn hash_snapshot(snapshot: &RawSnapshot) -> String {
    match serde_json::to_vec(snapshot) {
        Ok(bytes) => blake3::hash(&bytes).to_hex().to_string(),
        Err(_) => String::new(),
    }
}
