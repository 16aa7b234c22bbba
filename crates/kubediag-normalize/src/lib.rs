//! The Context Normalizer (§4.1): converts a raw snapshot into the
//! `(ObjectGraph, Timeline)` pair the Resolution Engine evaluates rules
//! against.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod events;
mod timestamp;

use kubediag_graph::raw::RawSnapshot;
use kubediag_graph::{NodeCondition, ObjectGraph};
use kubediag_timeline::Timeline;
use kubediag_types::DiagnosticError;

pub use events::normalize_events;
pub use timestamp::parse_ts;

/// Convert a raw snapshot into the normalized object graph and event
/// timeline. Fails with `InputInvalid` if the pod is structurally
/// malformed (§4.1) — a pod with no name is not a pod, regardless of
/// what else the snapshot carries.
///
/// Pure and deterministic: re-running `normalize` on the same snapshot
/// always yields an equal `(ObjectGraph, Timeline)` pair (§8 property 7).
pub fn normalize(snapshot: RawSnapshot) -> Result<(ObjectGraph, Timeline), DiagnosticError> {
    if snapshot.pod.metadata.name.is_empty() {
        return Err(DiagnosticError::InputInvalid(
            "pod.metadata.name is empty or pod is missing".to_string(),
        ));
    }

    let timeline = Timeline::new(normalize_events(&snapshot.events));

    let pvcs = snapshot
        .pvc
        .map(|o| o.into_vec())
        .unwrap_or_default()
        .into_iter()
        .map(|p| (p.metadata.name.clone(), p))
        .collect();

    let pvs = snapshot
        .pv
        .map(|o| o.into_vec())
        .unwrap_or_default()
        .into_iter()
        .map(|p| (p.metadata.name.clone(), p))
        .collect();

    let storage_classes = snapshot
        .storageclass
        .map(|o| o.into_vec())
        .unwrap_or_default()
        .into_iter()
        .map(|sc| (sc.metadata.name.clone(), sc))
        .collect();

    let node_conditions = snapshot
        .node
        .as_ref()
        .map(|n| {
            n.status
                .conditions
                .iter()
                .map(|c| NodeCondition {
                    type_: c.type_.clone(),
                    status: c.status.clone(),
                    reason: c.reason.clone(),
                    last_transition_time: c.last_transition_time.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    let graph = ObjectGraph {
        pod: snapshot.pod,
        pvcs,
        pvs,
        storage_classes,
        node: snapshot.node,
        node_conditions,
        owner: snapshot.owner,
        serviceaccount: snapshot.serviceaccount,
        secrets: snapshot.secrets.unwrap_or_default(),
        configmaps: snapshot.configmaps.unwrap_or_default(),
    };

    Ok((graph, timeline))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubediag_graph::raw::{RawEvent, RawPod};

    fn minimal_snapshot() -> RawSnapshot {
        let mut pod = RawPod::default();
        pod.metadata.name = "web-0".into();
        RawSnapshot {
            pod,
            events: vec![RawEvent { reason: "FailedScheduling".into(), ..Default::default() }],
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

    #[test]
    fn rejects_pod_without_a_name() {
        let snapshot = minimal_snapshot();
        let mut bad = snapshot.clone();
        bad.pod.metadata.name = String::new();
        assert!(matches!(normalize(bad), Err(DiagnosticError::InputInvalid(_))));
    }

    #[test]
    fn normalize_is_idempotent_on_repeated_invocation() {
        let snapshot = minimal_snapshot();
        let (g1, t1) = normalize(snapshot.clone()).unwrap();
        let (g2, t2) = normalize(snapshot).unwrap();
        assert_eq!(g1.pod.metadata.name, g2.pod.metadata.name);
        assert_eq!(t1.events(), t2.events());
    }

    #[test]
    fn legacy_flat_input_with_only_pod_and_events_normalizes_without_loss() {
        let snapshot = minimal_snapshot();
        let (graph, timeline) = normalize(snapshot).unwrap();
        assert!(graph.pvcs.is_empty());
        assert!(graph.node.is_none());
        assert_eq!(timeline.events().len(), 1);
    }
}
