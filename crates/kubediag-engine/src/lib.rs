//! The Resolution Engine (§4.5): rule filtering, suppression, the
//! compositional confidence formula, winner selection, and the
//! Suggested-Checks Library.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod config;
mod resolve;
mod suggested_checks;

pub use config::EngineConfig;
pub use resolve::explain;
pub use suggested_checks::checks_for;

#[cfg(test)]
mod tests {
    use super::*;
    use kubediag_graph::raw::{RawContainer, RawContainerState, RawContainerStatus, RawEvent, RawPod, RawPodSpec, RawPodStatus, RawSnapshot, RawTerminatedState};

    fn pod_with_name(name: &str) -> RawPod {
        let mut pod = RawPod::default();
        pod.metadata.name = name.to_string();
        pod
    }

    #[test]
    fn no_signal_snapshot_yields_null_root_cause_and_zero_confidence() {
        let mut pod = pod_with_name("web-0");
        pod.status.phase = "Running".to_string();
        let snapshot = RawSnapshot {
            pod,
            events: vec![],
            pvc: None,
            pv: None,
            storageclass: None,
            node: None,
            owner: None,
            serviceaccount: None,
            secrets: None,
            configmaps: None,
        };
        let registry = kubediag_rules::default_registry().unwrap();
        let result = explain(snapshot, &registry, &EngineConfig::default());
        assert!(result.root_cause.is_none());
        assert_eq!(result.confidence, 0.0);
        assert!(!result.suggested_next_checks.is_empty());
    }

    #[test]
    fn oom_killed_snapshot_wins_with_high_confidence() {
        let mut pod = pod_with_name("api-7f9");
        pod.spec = RawPodSpec { containers: vec![RawContainer { name: "api".into(), ..Default::default() }], ..Default::default() };
        pod.status = RawPodStatus {
            phase: "Running".to_string(),
            conditions: vec![],
            container_statuses: vec![RawContainerStatus {
                name: "api".into(),
                last_state: RawContainerState {
                    terminated: Some(RawTerminatedState { exit_code: 137, reason: Some("OOMKilled".into()), message: None }),
                    ..Default::default()
                },
                ..Default::default()
            }],
        };
        let snapshot = RawSnapshot {
            pod,
            events: vec![RawEvent { reason: "BackOff".into(), r#type: "Warning".into(), ..Default::default() }],
            pvc: None,
            pv: None,
            storageclass: None,
            node: None,
            owner: None,
            serviceaccount: None,
            secrets: None,
            configmaps: None,
        };
        let registry = kubediag_rules::default_registry().unwrap();
        let result = explain(snapshot, &registry, &EngineConfig::default());
        let root_cause = result.root_cause.expect("root cause found");
        assert_eq!(root_cause.kind, "OOMKilled");
        assert!(result.confidence >= 0.85, "confidence was {}", result.confidence);
    }

    #[test]
    fn explain_is_deterministic_across_invocations() {
        let mut pod = pod_with_name("web-0");
        pod.status.phase = "Pending".to_string();
        let snapshot = RawSnapshot {
            pod,
            events: vec![RawEvent {
                reason: "FailedScheduling".into(),
                message: "0/3 nodes are available: 1 node(s) had untolerated taint".into(),
                r#type: "Warning".into(),
                ..Default::default()
            }],
            pvc: None,
            pv: None,
            storageclass: None,
            node: None,
            owner: None,
            serviceaccount: None,
            secrets: None,
            configmaps: None,
        };
        let registry = kubediag_rules::default_registry().unwrap();
        let a = explain(snapshot.clone(), &registry, &EngineConfig::default());
        let b = explain(snapshot, &registry, &EngineConfig::default());
        assert_eq!(a, b);
    }
}
