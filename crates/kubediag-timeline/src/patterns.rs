//! Compound temporal detection primitives built on `Timeline`'s query
//! surface (§4.2). Each is a small, named predicate so rules compose
//! them instead of hand-rolling timestamp arithmetic.

use crate::event::{EventKind, EventPhase};
use crate::timeline::Timeline;

/// Three or more `BackOff` events inside a five-minute window (or, with
/// missing timestamps, three or more at all — see the conservative
/// fallback in `Timeline::repeated`).
pub fn rapid_restart_escalation(timeline: &Timeline) -> bool {
    timeline.repeated("BackOff", 3, Some(300))
}

/// At least `min_count` probe failures (`Unhealthy`) anywhere on the
/// timeline.
pub fn repeated_probe_failure(timeline: &Timeline, min_count: usize) -> bool {
    timeline.repeated("Unhealthy", min_count, None)
}

/// Three or more `FailedScheduling` events — the pod has bounced off
/// the scheduler repeatedly rather than failing once.
pub fn scheduling_flapping(timeline: &Timeline) -> bool {
    timeline.count(EventKind::Scheduling, Some(EventPhase::Failure), Some("FailedScheduling")) >= 3
}

/// How long volume-related activity has spanned the timeline: the gap
/// between the first and last `Volume`-kind event. A proxy for "how
/// long has this PVC been stuck" when no direct PVC transition
/// timestamp is available in the snapshot.
pub fn volume_activity_span(timeline: &Timeline) -> Option<i64> {
    timeline.duration_between(EventKind::Volume, EventKind::Volume)
}

/// An image was pulled and only afterward did the container enter a
/// back-off loop — suggests the new image is the trigger.
pub fn image_updated_then_crashloop(timeline: &Timeline) -> bool {
    let is_pulled = |e: &crate::event::NormalizedEvent| e.kind == EventKind::Image && e.reason == "Pulled";
    let is_backoff = |e: &crate::event::NormalizedEvent| e.kind == EventKind::Lifecycle && e.reason == "BackOff";
    let preds: Vec<&dyn Fn(&crate::event::NormalizedEvent) -> bool> = vec![&is_pulled, &is_backoff];
    timeline.pattern(&preds)
}

/// A container was killed (commonly triggered by a mounted
/// ConfigMap/Secret update) and only afterward entered a back-off loop.
pub fn crashloop_after_config_change(timeline: &Timeline) -> bool {
    let is_killing = |e: &crate::event::NormalizedEvent| e.kind == EventKind::Lifecycle && e.reason == "Killing";
    let is_backoff = |e: &crate::event::NormalizedEvent| e.kind == EventKind::Lifecycle && e.reason == "BackOff";
    let preds: Vec<&dyn Fn(&crate::event::NormalizedEvent) -> bool> = vec![&is_killing, &is_backoff];
    timeline.pattern(&preds)
}

/// Volume trouble (`ProvisioningFailed`/`FailedMount`) followed later
/// by a crash-loop signal — the storage issue preceded the symptom.
pub fn pvc_pending_then_crashloop(timeline: &Timeline) -> bool {
    let is_volume_failure = |e: &crate::event::NormalizedEvent| e.kind == EventKind::Volume && e.phase == EventPhase::Failure;
    let is_backoff = |e: &crate::event::NormalizedEvent| e.kind == EventKind::Lifecycle && e.reason == "BackOff";
    let preds: Vec<&dyn Fn(&crate::event::NormalizedEvent) -> bool> = vec![&is_volume_failure, &is_backoff];
    timeline.pattern(&preds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NormalizedEvent;

    fn ev(kind: EventKind, phase: EventPhase, reason: &str, t: i64) -> NormalizedEvent {
        NormalizedEvent {
            kind,
            phase,
            reason: reason.to_string(),
            message: String::new(),
            source: String::new(),
            first_seen: t,
            last_seen: t,
            count: 1,
            involved_object: String::new(),
        }
    }

    #[test]
    fn detects_image_then_crashloop() {
        let timeline = Timeline::new(vec![
            ev(EventKind::Image, EventPhase::Info, "Pulled", 1),
            ev(EventKind::Lifecycle, EventPhase::Failure, "BackOff", 2),
        ]);
        assert!(image_updated_then_crashloop(&timeline));
    }

    #[test]
    fn pvc_then_crashloop_requires_order() {
        let timeline = Timeline::new(vec![
            ev(EventKind::Lifecycle, EventPhase::Failure, "BackOff", 1),
            ev(EventKind::Volume, EventPhase::Failure, "ProvisioningFailed", 2),
        ]);
        assert!(!pvc_pending_then_crashloop(&timeline));
    }

    #[test]
    fn scheduling_flapping_needs_at_least_three() {
        let timeline = Timeline::new(vec![
            ev(EventKind::Scheduling, EventPhase::Failure, "FailedScheduling", 1),
            ev(EventKind::Scheduling, EventPhase::Failure, "FailedScheduling", 2),
        ]);
        assert!(!scheduling_flapping(&timeline));
    }
}
