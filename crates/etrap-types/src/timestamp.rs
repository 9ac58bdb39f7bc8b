use chrono::{DateTime, Utc};

/// `YYYY-MM-DD` for `ms` milliseconds since the epoch, UTC. Used for
/// batch id dates and the by-date index.
pub fn ms_to_date(ms: i64) -> String {
    let dt = from_ms(ms);
    dt.format("%Y-%m-%d").to_string()
}

/// Canonical `YYYY-MM-DDTHH:MM:SS.mmm` form used by the canonicalizer for
/// any value recognized as a timestamp (§4.1).
pub fn ms_to_canonical_iso(ms: i64) -> String {
    let dt = from_ms(ms);
    dt.format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
}

fn from_ms(ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .unwrap_or_else(|| DateTime::<Utc>::from_timestamp(0, 0).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_date_and_iso() {
        let ms = 1_749_864_039_877;
        assert_eq!(ms_to_date(ms), "2025-06-14");
        assert_eq!(ms_to_canonical_iso(ms), "2025-06-14T01:20:39.877");
    }
}
