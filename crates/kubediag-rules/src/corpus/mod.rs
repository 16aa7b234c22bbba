//! The programmatic half of the rule corpus (§4.4, §9): rules whose
//! logic needs more than a flat AND of predicates — cross-object
//! traversal, compound temporal patterns, or suppression of an atomic
//! sibling — are hand-coded here, one module per category. The simpler
//! atomic rules live in the declarative YAML corpus (`crate::declarative_corpus`).

mod admission;
mod image;
mod lifecycle;
mod network;
mod node_pressure;
mod owner;
mod probe;
mod scheduling;
mod storage;

use crate::rule::Rule;

/// All programmatic rules, in no particular order — the `Registry`
/// sorts by `(priority desc, name asc)` at construction.
pub fn programmatic_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(scheduling::UnschedulableTaintRule),
        Box::new(scheduling::UnschedulableResourceRule),
        Box::new(scheduling::NodeAffinityMismatchRule::default()),
        Box::new(storage::PvcNotBoundRule),
        Box::new(storage::StorageClassMissingRule),
        Box::new(storage::PvcPendingThenCrashloopRule::default()),
        Box::new(image::ImagePullSecretMissingCompound::default()),
        Box::new(image::ImageUpdatedThenCrashloopCompound::default()),
        Box::new(lifecycle::OomKilledRule),
        Box::new(lifecycle::CrashLoopBackoffRule),
        Box::new(lifecycle::RapidRestartEscalationCompound::default()),
        Box::new(lifecycle::ConfigChangeCrashloopRule::default()),
        Box::new(probe::RepeatedProbeFailureCompound::default()),
        Box::new(network::PodSandboxNetworkFailureRule),
        Box::new(admission::AdmissionWebhookDeniedRule),
        Box::new(admission::PodSecurityStandardViolationRule::default()),
        Box::new(node_pressure::NodeNotReadyEvictedRule::default()),
        Box::new(owner::OwnerReplicasNotReadyRule),
    ]
}
