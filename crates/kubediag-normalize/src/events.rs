use crate::timestamp::parse_ts;
use kubediag_graph::raw::RawEvent;
use kubediag_timeline::{classify, NormalizedEvent};

/// Classify and merge raw events into `NormalizedEvent`s. Kubernetes
/// itself aggregates identical `(reason, involvedObject)` events into
/// one record with an incrementing `count`; this merges any duplicates
/// the snapshot still carries separately, widening `first_seen`/
/// `last_seen` to the union span and summing `count` (§8 boundary
/// behavior: "duplicate events (same reason, incrementing count)").
pub fn normalize_events(raw: &[RawEvent]) -> Vec<NormalizedEvent> {
    let mut merged: Vec<NormalizedEvent> = Vec::new();

    for e in raw {
        let (kind, phase) = classify(&e.reason);
        let first_seen = parse_ts(e.first_timestamp.as_deref());
        let last_seen = parse_ts(e.last_timestamp.as_deref());
        let count = e.count.unwrap_or(1).max(1);
        let involved_object = e.involved_object.name.clone();

        if let Some(existing) = merged
            .iter_mut()
            .find(|n: &&mut NormalizedEvent| n.reason == e.reason && n.involved_object == involved_object)
        {
            existing.first_seen = existing.first_seen.min(first_seen);
            existing.last_seen = existing.last_seen.max(last_seen);
            existing.count += count;
            existing.message = e.message.clone();
            existing.source = e.source.component.clone();
        } else {
            merged.push(NormalizedEvent {
                kind,
                phase,
                reason: e.reason.clone(),
                message: e.message.clone(),
                source: e.source.component.clone(),
                first_seen,
                last_seen,
                count,
                involved_object,
            });
        }
    }

    merged
}
