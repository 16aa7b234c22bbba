use crate::event::{EventKind, EventPhase, NormalizedEvent};

/// The ordered, semantically tagged view over normalized events.
/// Ordering is by `last_seen` ascending; ties are broken by the stable
/// sort's preservation of input order (§3).
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    events: Vec<NormalizedEvent>,
}

impl Timeline {
    /// Build a timeline from already-normalized events, establishing
    /// the `last_seen`-ascending order the rest of the API assumes.
    pub fn new(mut events: Vec<NormalizedEvent>) -> Self {
        events.sort_by_key(|e| e.last_seen);
        Timeline { events }
    }

    pub fn events(&self) -> &[NormalizedEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn matches(e: &NormalizedEvent, kind: EventKind, phase: Option<EventPhase>, reason: Option<&str>) -> bool {
        e.kind == kind && phase.map_or(true, |p| e.phase == p) && reason.map_or(true, |r| e.reason == r)
    }

    pub fn has(&self, kind: EventKind, phase: Option<EventPhase>, reason: Option<&str>) -> bool {
        self.events.iter().any(|e| Self::matches(e, kind, phase, reason))
    }

    pub fn count(&self, kind: EventKind, phase: Option<EventPhase>, reason: Option<&str>) -> usize {
        self.events.iter().filter(|e| Self::matches(e, kind, phase, reason)).count()
    }

    pub fn first(&self, kind: EventKind, phase: Option<EventPhase>, reason: Option<&str>) -> Option<&NormalizedEvent> {
        self.events.iter().find(|e| Self::matches(e, kind, phase, reason))
    }

    pub fn last(&self, kind: EventKind, phase: Option<EventPhase>, reason: Option<&str>) -> Option<&NormalizedEvent> {
        self.events.iter().rev().find(|e| Self::matches(e, kind, phase, reason))
    }

    /// Seconds between the first occurrence of `kind_a` and the last
    /// occurrence of `kind_b`. `None` if either is absent from the
    /// timeline (§4.2).
    pub fn duration_between(&self, kind_a: EventKind, kind_b: EventKind) -> Option<i64> {
        let a = self.first(kind_a, None, None)?;
        let b = self.last(kind_b, None, None)?;
        Some(b.last_seen - a.first_seen)
    }

    /// True when at least `min_count` events with `reason` exist. If
    /// `within` (seconds) is given, requires that many events inside
    /// some `within`-second sliding window — unless any matching event
    /// has a zero timestamp, in which case the window constraint is
    /// ignored and only the count is checked (see Open Question, §9:
    /// the conservative fallback for missing-timestamp inputs).
    pub fn repeated(&self, reason: &str, min_count: usize, within: Option<i64>) -> bool {
        let timestamps: Vec<i64> = self
            .events
            .iter()
            .filter(|e| e.reason == reason)
            .map(|e| e.last_seen)
            .collect();
        if timestamps.len() < min_count {
            return false;
        }
        let Some(window) = within else {
            return true;
        };
        if timestamps.iter().any(|&t| t == 0) {
            return true;
        }
        // timestamps is already ascending because `events` is sorted by
        // last_seen and filter preserves order.
        for i in 0..=(timestamps.len() - min_count) {
            if timestamps[i + min_count - 1] - timestamps[i] <= window {
                return true;
            }
        }
        false
    }

    /// True when events matching each predicate in `predicates` appear,
    /// in order, somewhere in the timeline — not necessarily contiguous
    /// (§4.2, §9).
    pub fn pattern(&self, predicates: &[&dyn Fn(&NormalizedEvent) -> bool]) -> bool {
        let mut cursor = 0usize;
        for predicate in predicates {
            match self.events[cursor..].iter().position(|e| predicate(e)) {
                Some(offset) => cursor += offset + 1,
                None => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(kind: EventKind, phase: EventPhase, reason: &str, last_seen: i64) -> NormalizedEvent {
        NormalizedEvent {
            kind,
            phase,
            reason: reason.to_string(),
            message: String::new(),
            source: String::new(),
            first_seen: last_seen,
            last_seen,
            count: 1,
            involved_object: String::new(),
        }
    }

    #[test]
    fn orders_by_last_seen_and_is_stable_on_ties() {
        let t = Timeline::new(vec![
            ev(EventKind::Generic, EventPhase::Warning, "B", 5),
            ev(EventKind::Generic, EventPhase::Warning, "A", 5),
            ev(EventKind::Generic, EventPhase::Warning, "C", 1),
        ]);
        let reasons: Vec<&str> = t.events().iter().map(|e| e.reason.as_str()).collect();
        assert_eq!(reasons, vec!["C", "B", "A"]);
    }

    #[test]
    fn repeated_ignores_window_when_not_given() {
        let t = Timeline::new(vec![
            ev(EventKind::Lifecycle, EventPhase::Failure, "BackOff", 5),
            ev(EventKind::Lifecycle, EventPhase::Failure, "BackOff", 100),
            ev(EventKind::Lifecycle, EventPhase::Failure, "BackOff", 400),
        ]);
        assert!(t.repeated("BackOff", 3, None));
    }

    #[test]
    fn repeated_falls_back_to_count_only_when_timestamp_is_zero() {
        let t = Timeline::new(vec![
            ev(EventKind::Lifecycle, EventPhase::Failure, "BackOff", 0),
            ev(EventKind::Lifecycle, EventPhase::Failure, "BackOff", 0),
            ev(EventKind::Lifecycle, EventPhase::Failure, "BackOff", 0),
        ]);
        assert!(t.repeated("BackOff", 3, Some(10)));
    }

    #[test]
    fn repeated_window_excludes_events_too_far_apart() {
        let t = Timeline::new(vec![
            ev(EventKind::Lifecycle, EventPhase::Failure, "BackOff", 10),
            ev(EventKind::Lifecycle, EventPhase::Failure, "BackOff", 20),
            ev(EventKind::Lifecycle, EventPhase::Failure, "BackOff", 1000),
        ]);
        assert!(!t.repeated("BackOff", 3, Some(50)));
        assert!(t.repeated("BackOff", 2, Some(50)));
    }

    #[test]
    fn duration_between_uses_first_a_and_last_b() {
        let t = Timeline::new(vec![
            ev(EventKind::Volume, EventPhase::Failure, "ProvisioningFailed", 10),
            ev(EventKind::Lifecycle, EventPhase::Failure, "BackOff", 70),
        ]);
        assert_eq!(t.duration_between(EventKind::Volume, EventKind::Lifecycle), Some(60));
    }

    #[test]
    fn duration_between_is_none_when_either_side_absent() {
        let t = Timeline::new(vec![ev(EventKind::Volume, EventPhase::Failure, "ProvisioningFailed", 10)]);
        assert_eq!(t.duration_between(EventKind::Volume, EventKind::Lifecycle), None);
    }

    #[test]
    fn pattern_matches_non_contiguous_in_order() {
        let t = Timeline::new(vec![
            ev(EventKind::Image, EventPhase::Info, "Pulled", 1),
            ev(EventKind::Scheduling, EventPhase::Info, "Scheduled", 2),
            ev(EventKind::Lifecycle, EventPhase::Failure, "BackOff", 3),
        ]);
        let is_pulled = |e: &NormalizedEvent| e.reason == "Pulled";
        let is_backoff = |e: &NormalizedEvent| e.reason == "BackOff";
        let preds: Vec<&dyn Fn(&NormalizedEvent) -> bool> = vec![&is_pulled, &is_backoff];
        assert!(t.pattern(&preds));
    }

    #[test]
    fn pattern_fails_when_order_is_reversed() {
        let t = Timeline::new(vec![
            ev(EventKind::Lifecycle, EventPhase::Failure, "BackOff", 1),
            ev(EventKind::Image, EventPhase::Info, "Pulled", 2),
        ]);
        let is_pulled = |e: &NormalizedEvent| e.reason == "Pulled";
        let is_backoff = |e: &NormalizedEvent| e.reason == "BackOff";
        let preds: Vec<&dyn Fn(&NormalizedEvent) -> bool> = vec![&is_pulled, &is_backoff];
        assert!(!t.pattern(&preds));
    }
}
