//! End-to-end seed scenarios (§8): one test per concrete case, exercising
//! `explain` through the full normalize → evaluate → compose pipeline.

use kubediag_engine::{explain, EngineConfig};
use kubediag_graph::raw::{
    OneOrMany, RawContainer, RawContainerState, RawContainerStatus, RawEvent, RawNode, RawNodeCondition,
    RawNodeStatus, RawPod, RawPodSpec, RawPodStatus, RawPvc, RawPvcSpec, RawPvcStatus, RawResourceRequirements,
    RawSnapshot, RawTerminatedState, RawWaitingState,
};
use kubediag_rules::default_registry;
use std::collections::BTreeMap;

fn snapshot(pod: RawPod, events: Vec<RawEvent>) -> RawSnapshot {
    RawSnapshot {
        pod,
        events,
        pvc: None,
        pv: None,
        storageclass: None,
        node: None,
        owner: None,
        serviceaccount: None,
        secrets: None,
        configmaps: None,
    }
}

fn named_pod(name: &str) -> RawPod {
    let mut pod = RawPod::default();
    pod.metadata.name = name.to_string();
    pod
}

fn event(reason: &str, message: &str) -> RawEvent {
    RawEvent { reason: reason.to_string(), message: message.to_string(), r#type: "Warning".to_string(), ..Default::default() }
}

#[test]
fn pending_failed_scheduling_taint_resolves_to_unschedulable_taint() {
    let mut pod = named_pod("web-0");
    pod.status.phase = "Pending".to_string();
    let input = snapshot(
        pod,
        vec![event("FailedScheduling", "0/3 nodes are available: 1 node(s) had untolerated taint")],
    );

    let registry = default_registry().unwrap();
    let result = explain(input, &registry, &EngineConfig::default());

    let root_cause = result.root_cause.expect("root cause");
    assert_eq!(root_cause.kind, "UnschedulableTaint");
    assert!(result.confidence >= 0.7, "confidence was {}", result.confidence);
    assert!(result.suggested_next_checks.iter().any(|c| c.contains("taint")));
    assert!(result.suggested_next_checks.iter().any(|c| c.contains("tolerations")));
}

#[test]
fn image_pull_backoff_with_missing_secret_resolves_to_compound_and_suppresses_atomic() {
    let mut pod = named_pod("api-7f9");
    pod.spec = RawPodSpec {
        containers: vec![RawContainer { name: "api".into(), ..Default::default() }],
        image_pull_secrets: vec![],
        ..Default::default()
    };
    pod.status = RawPodStatus {
        phase: "Pending".to_string(),
        conditions: vec![],
        container_statuses: vec![RawContainerStatus {
            name: "api".into(),
            state: RawContainerState {
                waiting: Some(RawWaitingState { reason: Some("ImagePullBackOff".into()), message: Some("pull access denied".into()) }),
                ..Default::default()
            },
            ..Default::default()
        }],
    };
    let input = snapshot(
        pod,
        vec![
            event("Failed", "Failed to pull image: pull access denied"),
            event("ImagePullBackOff", "Back-off pulling image"),
        ],
    );

    let registry = default_registry().unwrap();
    let result = explain(input, &registry, &EngineConfig::default());

    let root_cause = result.root_cause.expect("root cause");
    assert_eq!(root_cause.kind, "ImagePullSecretMissing");
    assert!(result.suppressed_rules.iter().any(|s| s.name == "ImagePullBackOff"));
}

#[test]
fn pvc_pending_then_crashloop_resolves_to_compound_and_suppresses_both_atomics() {
    let mut pod = named_pod("db-0");
    pod.spec.volumes.push(kubediag_graph::raw::RawVolume {
        name: "data".into(),
        persistent_volume_claim: Some(kubediag_graph::raw::RawPvcVolumeSource { claim_name: "data-claim".into() }),
    });
    pod.spec.containers = vec![RawContainer { name: "db".into(), ..Default::default() }];
    pod.status = RawPodStatus {
        phase: "Running".to_string(),
        conditions: vec![],
        container_statuses: vec![RawContainerStatus {
            name: "db".into(),
            restart_count: 4,
            state: RawContainerState { waiting: Some(RawWaitingState { reason: Some("CrashLoopBackOff".into()), message: None }), ..Default::default() },
            ..Default::default()
        }],
    };

    let mut pvc = RawPvc::default();
    pvc.metadata.name = "data-claim".into();
    pvc.spec = RawPvcSpec { volume_name: String::new() };
    pvc.status = RawPvcStatus { phase: "Pending".to_string() };

    let mut input = snapshot(
        pod,
        vec![
            event("ProvisioningFailed", "storage class did not provision a volume in time"),
            event("BackOff", "Back-off restarting failed container"),
        ],
    );
    input.pvc = Some(OneOrMany::One(pvc));

    let registry = default_registry().unwrap();
    let result = explain(input, &registry, &EngineConfig::default());

    let root_cause = result.root_cause.expect("root cause");
    assert_eq!(root_cause.kind, "PVCPendingThenCrashloop");
    assert!(result.suppressed_rules.iter().any(|s| s.name == "CrashLoopBackoff"));
    assert!(result.suppressed_rules.iter().any(|s| s.name == "PVCNotBound"));
}

#[test]
fn oom_killed_with_memory_limit_resolves_from_object_state_with_high_confidence() {
    let mut pod = named_pod("worker-2");
    let mut limits = BTreeMap::new();
    limits.insert("memory".to_string(), "512Mi".to_string());
    pod.spec.containers = vec![RawContainer {
        name: "worker".into(),
        resources: RawResourceRequirements { limits, requests: BTreeMap::new() },
        ..Default::default()
    }];
    pod.status = RawPodStatus {
        phase: "Running".to_string(),
        conditions: vec![],
        container_statuses: vec![RawContainerStatus {
            name: "worker".into(),
            last_state: RawContainerState {
                terminated: Some(RawTerminatedState { exit_code: 137, reason: Some("OOMKilled".into()), message: None }),
                ..Default::default()
            },
            ..Default::default()
        }],
    };
    let input = snapshot(pod, vec![]);

    let registry = default_registry().unwrap();
    let result = explain(input, &registry, &EngineConfig::default());

    let root_cause = result.root_cause.expect("root cause");
    assert_eq!(root_cause.kind, "OOMKilled");
    assert!(result.confidence >= 0.85, "confidence was {}", result.confidence);
    assert!(result
        .evidence
        .iter()
        .any(|e| e.source == kubediag_types::EvidenceSource::ObjectState));
}

#[test]
fn node_disk_pressure_with_eviction_resolves_to_compound_node_rule() {
    let pod = named_pod("cache-1");
    let mut node = RawNode::default();
    node.metadata.name = "node-7".into();
    node.status = RawNodeStatus {
        conditions: vec![RawNodeCondition { type_: "DiskPressure".into(), status: "True".into(), reason: "KubeletHasDiskPressure".into(), last_transition_time: None }],
    };

    let mut input = snapshot(pod, vec![event("Evicted", "The node was low on resource: ephemeral-storage")]);
    input.node = Some(node);

    let registry = default_registry().unwrap();
    let result = explain(input, &registry, &EngineConfig::default());

    let root_cause = result.root_cause.expect("root cause");
    assert_eq!(root_cause.kind, "NodeNotReadyEvicted");
    assert!(result
        .causal_chain
        .contributing
        .iter()
        .any(|c| c.evidence.iter().any(|e| e.locator.to_lowercase().contains("node"))));
}

#[test]
fn running_ready_pod_with_no_events_yields_no_signal() {
    let mut pod = named_pod("steady-0");
    pod.status.phase = "Running".to_string();
    pod.status.conditions = vec![kubediag_graph::raw::RawPodCondition {
        type_: "Ready".into(),
        status: "True".into(),
        reason: None,
        message: None,
    }];
    let input = snapshot(pod, vec![]);

    let registry = default_registry().unwrap();
    let result = explain(input, &registry, &EngineConfig::default());

    assert!(result.root_cause.is_none());
    assert_eq!(result.confidence, 0.0);
    assert!(!result.suggested_next_checks.is_empty());
}
