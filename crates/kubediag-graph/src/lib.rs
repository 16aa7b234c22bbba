//! The normalized `ObjectGraph`: a labeled mapping from object kind to a
//! single or collection representation (§3), plus the DAG lookups
//! (pod → pvc → pv → storageclass) a rule needs to traverse it.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod raw;

use raw::{RawConfigMap, RawNode, RawOwner, RawPod, RawPv, RawPvc, RawSecret, RawServiceAccount, RawStorageClass};
use std::collections::{BTreeMap, HashSet};

/// The kinds of object a snapshot may carry. Used by `Rule::requires` to
/// declare dependencies and by the resolution engine to filter the
/// registry (§4.5 step 2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Pod,
    Events,
    Pvc,
    Pv,
    StorageClass,
    Node,
    Owner,
    ServiceAccount,
    Secrets,
    ConfigMaps,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Pod => "pod",
            ObjectKind::Events => "events",
            ObjectKind::Pvc => "pvc",
            ObjectKind::Pv => "pv",
            ObjectKind::StorageClass => "storageclass",
            ObjectKind::Node => "node",
            ObjectKind::Owner => "owner",
            ObjectKind::ServiceAccount => "serviceaccount",
            ObjectKind::Secrets => "secrets",
            ObjectKind::ConfigMaps => "configmaps",
        }
    }
}

/// A node condition derived from `node.status.conditions` (§4.1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeCondition {
    pub type_: String,
    pub status: String,
    pub reason: String,
    pub last_transition_time: Option<String>,
}

/// The normalized, immutable object graph. Construction (cross-linking,
/// `nodeConditions` derivation) is the Context Normalizer's job —
/// `kubediag-normalize` — this type only holds the result and exposes
/// lookups.
#[derive(Clone, Debug)]
pub struct ObjectGraph {
    pub pod: RawPod,
    pub pvcs: BTreeMap<String, RawPvc>,
    pub pvs: BTreeMap<String, RawPv>,
    pub storage_classes: BTreeMap<String, RawStorageClass>,
    pub node: Option<RawNode>,
    pub node_conditions: Vec<NodeCondition>,
    pub owner: Option<RawOwner>,
    pub serviceaccount: Option<RawServiceAccount>,
    pub secrets: Vec<RawSecret>,
    pub configmaps: Vec<RawConfigMap>,
}

impl ObjectGraph {
    /// Which optional object kinds are actually present. `Pod` and
    /// `Events` are always present by construction (the normalizer fails
    /// invocation otherwise).
    pub fn present(&self) -> HashSet<ObjectKind> {
        let mut set = HashSet::new();
        set.insert(ObjectKind::Pod);
        set.insert(ObjectKind::Events);
        if !self.pvcs.is_empty() {
            set.insert(ObjectKind::Pvc);
        }
        if !self.pvs.is_empty() {
            set.insert(ObjectKind::Pv);
        }
        if !self.storage_classes.is_empty() {
            set.insert(ObjectKind::StorageClass);
        }
        if self.node.is_some() {
            set.insert(ObjectKind::Node);
        }
        if self.owner.is_some() {
            set.insert(ObjectKind::Owner);
        }
        if self.serviceaccount.is_some() {
            set.insert(ObjectKind::ServiceAccount);
        }
        if !self.secrets.is_empty() {
            set.insert(ObjectKind::Secrets);
        }
        if !self.configmaps.is_empty() {
            set.insert(ObjectKind::ConfigMaps);
        }
        set
    }

    /// PVC names referenced by the pod's volumes, in spec order.
    pub fn pod_pvc_claim_names(&self) -> Vec<String> {
        self.pod
            .spec
            .volumes
            .iter()
            .filter_map(|v| v.persistent_volume_claim.as_ref())
            .map(|pvc_source| pvc_source.claim_name.clone())
            .collect()
    }

    /// The PVCs the pod actually references, resolved by name. A claim
    /// name with no matching PVC object is silently absent (evidence of
    /// an unbound/missing claim, not a normalizer error).
    pub fn pod_pvcs(&self) -> Vec<&RawPvc> {
        self.pod_pvc_claim_names()
            .iter()
            .filter_map(|name| self.pvcs.get(name))
            .collect()
    }

    /// Resolve a PVC's bound PV, if any.
    pub fn pv_for_pvc(&self, pvc: &RawPvc) -> Option<&RawPv> {
        if pvc.spec.volume_name.is_empty() {
            return None;
        }
        self.pvs.get(&pvc.spec.volume_name)
    }

    /// Resolve a PV's StorageClass, if any.
    pub fn storage_class_for_pv(&self, pv: &RawPv) -> Option<&RawStorageClass> {
        if pv.spec.storage_class_name.is_empty() {
            return None;
        }
        self.storage_classes.get(&pv.spec.storage_class_name)
    }

    pub fn node_condition(&self, type_: &str) -> Option<&NodeCondition> {
        self.node_conditions.iter().find(|c| c.type_ == type_)
    }

    pub fn container_status(&self, name: &str) -> Option<&raw::RawContainerStatus> {
        self.pod
            .status
            .container_statuses
            .iter()
            .find(|cs| cs.name == name)
    }

    /// Whether the pod's required node affinity (if any) is satisfied by
    /// the known node's labels. `None` means the pod declares no required
    /// node affinity, so the question doesn't apply.
    pub fn required_node_affinity_satisfied(&self) -> Option<bool> {
        let selector = self
            .pod
            .spec
            .affinity
            .as_ref()?
            .node_affinity
            .as_ref()?
            .required_during_scheduling_ignored_during_execution
            .as_ref()?;
        let labels = self.node.as_ref().map(|n| &n.metadata.labels);
        Some(selector.node_selector_terms.iter().any(|term| {
            term.match_expressions.iter().all(|req| {
                labels
                    .map(|l| node_selector_requirement_satisfied(req, l))
                    .unwrap_or(false)
            })
        }))
    }
}

fn node_selector_requirement_satisfied(req: &raw::RawNodeSelectorRequirement, labels: &BTreeMap<String, String>) -> bool {
    match req.operator.as_str() {
        "In" => labels.get(&req.key).map(|v| req.values.contains(v)).unwrap_or(false),
        "NotIn" => labels.get(&req.key).map(|v| !req.values.contains(v)).unwrap_or(true),
        "Exists" => labels.contains_key(&req.key),
        "DoesNotExist" => !labels.contains_key(&req.key),
        _ => false,
    }
}
