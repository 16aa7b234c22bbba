//! Raw, JSON-shaped mirrors of the Kubernetes API object slots the
//! snapshot carries (§6: "field semantics mirror the Kubernetes API
//! object shapes for those kinds; only the attributes listed in §3 are
//! consulted"). Unknown extra keys are ignored — these structs are not
//! `deny_unknown_fields`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A slot that may be populated by a single object or a keyed
/// collection of objects, per §3's ObjectGraph invariant.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(t) => vec![t],
            OneOrMany::Many(v) => v,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub owner_references: Vec<RawOwnerReference>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawOwnerReference {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub controller: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawPodCondition {
    #[serde(rename = "type", default)]
    pub type_: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawWaitingState {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawRunningState {
    #[serde(default)]
    pub started_at: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawTerminatedState {
    #[serde(default)]
    pub exit_code: i32,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawContainerState {
    #[serde(default)]
    pub waiting: Option<RawWaitingState>,
    #[serde(default)]
    pub running: Option<RawRunningState>,
    #[serde(default)]
    pub terminated: Option<RawTerminatedState>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawContainerStatus {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub restart_count: u32,
    #[serde(default)]
    pub state: RawContainerState,
    #[serde(default)]
    pub last_state: RawContainerState,
    #[serde(default)]
    pub image: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawResourceRequirements {
    #[serde(default)]
    pub limits: BTreeMap<String, String>,
    #[serde(default)]
    pub requests: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawProbe {
    #[serde(default)]
    pub initial_delay_seconds: i64,
    #[serde(default)]
    pub period_seconds: i64,
}

/// Subset of `securityContext` consulted for Pod Security Standard
/// violations (§3). Used at both container and pod scope.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawSecurityContext {
    #[serde(default)]
    pub privileged: Option<bool>,
    #[serde(default)]
    pub allow_privilege_escalation: Option<bool>,
    #[serde(default)]
    pub run_as_non_root: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawContainer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub resources: RawResourceRequirements,
    #[serde(default)]
    pub liveness_probe: Option<RawProbe>,
    #[serde(default)]
    pub readiness_probe: Option<RawProbe>,
    #[serde(default)]
    pub security_context: Option<RawSecurityContext>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawPvcVolumeSource {
    #[serde(default)]
    pub claim_name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawVolume {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub persistent_volume_claim: Option<RawPvcVolumeSource>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawToleration {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub effect: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawLocalObjectReference {
    #[serde(default)]
    pub name: String,
}

/// `key operator values`, e.g. `disktype In [ssd]` (§3: "affinity").
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawNodeSelectorRequirement {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// All `match_expressions` must hold for the term to be satisfied.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawNodeSelectorTerm {
    #[serde(default)]
    pub match_expressions: Vec<RawNodeSelectorRequirement>,
}

/// A node satisfies the selector if it satisfies any one term.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawNodeSelector {
    #[serde(default)]
    pub node_selector_terms: Vec<RawNodeSelectorTerm>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawNodeAffinity {
    #[serde(default)]
    pub required_during_scheduling_ignored_during_execution: Option<RawNodeSelector>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawAffinity {
    #[serde(default)]
    pub node_affinity: Option<RawNodeAffinity>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawPodSpec {
    #[serde(default)]
    pub containers: Vec<RawContainer>,
    #[serde(default)]
    pub volumes: Vec<RawVolume>,
    #[serde(default)]
    pub node_name: String,
    #[serde(default)]
    pub node_selector: BTreeMap<String, String>,
    #[serde(default)]
    pub affinity: Option<RawAffinity>,
    #[serde(default)]
    pub tolerations: Vec<RawToleration>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub image_pull_secrets: Vec<RawLocalObjectReference>,
    #[serde(default)]
    pub security_context: Option<RawSecurityContext>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawPodStatus {
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub conditions: Vec<RawPodCondition>,
    #[serde(default)]
    pub container_statuses: Vec<RawContainerStatus>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawPod {
    #[serde(default)]
    pub metadata: RawMetadata,
    #[serde(default)]
    pub spec: RawPodSpec,
    #[serde(default)]
    pub status: RawPodStatus,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawEventSource {
    #[serde(default)]
    pub component: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawObjectReference {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub r#type: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub source: RawEventSource,
    #[serde(default)]
    pub first_timestamp: Option<String>,
    #[serde(default)]
    pub last_timestamp: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub involved_object: RawObjectReference,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawPvcSpec {
    #[serde(default)]
    pub volume_name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawPvcStatus {
    #[serde(default)]
    pub phase: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawPvc {
    #[serde(default)]
    pub metadata: RawMetadata,
    #[serde(default)]
    pub spec: RawPvcSpec,
    #[serde(default)]
    pub status: RawPvcStatus,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawPvSpec {
    #[serde(default)]
    pub storage_class_name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawPvStatus {
    #[serde(default)]
    pub phase: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawPv {
    #[serde(default)]
    pub metadata: RawMetadata,
    #[serde(default)]
    pub spec: RawPvSpec,
    #[serde(default)]
    pub status: RawPvStatus,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawStorageClass {
    #[serde(default)]
    pub metadata: RawMetadata,
    #[serde(default)]
    pub provisioner: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawNodeCondition {
    #[serde(rename = "type", default)]
    pub type_: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub last_transition_time: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawNodeStatus {
    #[serde(default)]
    pub conditions: Vec<RawNodeCondition>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(default)]
    pub metadata: RawMetadata,
    #[serde(default)]
    pub status: RawNodeStatus,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawOwnerStatus {
    #[serde(default)]
    pub replicas: i64,
    #[serde(default)]
    pub ready_replicas: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawOwner {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: RawMetadata,
    #[serde(default)]
    pub status: RawOwnerStatus,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawServiceAccount {
    #[serde(default)]
    pub metadata: RawMetadata,
    #[serde(default)]
    pub image_pull_secrets: Vec<RawLocalObjectReference>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawSecret {
    #[serde(default)]
    pub metadata: RawMetadata,
    #[serde(default)]
    pub r#type: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawConfigMap {
    #[serde(default)]
    pub metadata: RawMetadata,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

/// The top-level input record (§6). `pod` and `events` are required;
/// everything else is optional. Loaders (see `kubediag-io`) are
/// responsible for producing exactly this shape.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub pod: RawPod,
    #[serde(default)]
    pub events: Vec<RawEvent>,
    #[serde(default)]
    pub pvc: Option<OneOrMany<RawPvc>>,
    #[serde(default)]
    pub pv: Option<OneOrMany<RawPv>>,
    #[serde(default)]
    pub storageclass: Option<OneOrMany<RawStorageClass>>,
    #[serde(default)]
    pub node: Option<RawNode>,
    #[serde(default)]
    pub owner: Option<RawOwner>,
    #[serde(default)]
    pub serviceaccount: Option<RawServiceAccount>,
    #[serde(default)]
    pub secrets: Option<Vec<RawSecret>>,
    #[serde(default)]
    pub configmaps: Option<Vec<RawConfigMap>>,
}
