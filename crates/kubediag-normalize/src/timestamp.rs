/// Parse an RFC3339 timestamp into unix seconds. A missing or
/// unparsable timestamp normalizes to `0`, per the boundary behavior in
/// §8 ("events with missing timestamps treated as firstSeen=lastSeen=0,
/// stable sort by input order").
pub fn parse_ts(raw: Option<&str>) -> i64 {
    raw.and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.timestamp())
        .unwrap_or(0)
}
