use serde::{Deserialize, Serialize};

/// The semantic category a normalized event was classified into (§3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Scheduling,
    Image,
    Volume,
    Probe,
    Network,
    Admission,
    Lifecycle,
    NodePressure,
    Owner,
    Generic,
}

/// The severity a normalized event was classified into (§3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventPhase {
    Failure,
    Warning,
    Info,
}

/// A raw Kubernetes event, classified by reason string into `(kind,
/// phase)` and with timestamps coerced to unix seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    pub kind: EventKind,
    pub phase: EventPhase,
    /// The raw Kubernetes reason string, preserved verbatim.
    pub reason: String,
    pub message: String,
    pub source: String,
    pub first_seen: i64,
    pub last_seen: i64,
    pub count: u32,
    pub involved_object: String,
}
