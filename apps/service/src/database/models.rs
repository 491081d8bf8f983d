use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Naive layout SQLite's `CURRENT_TIMESTAMP` produces, read back as UTC
const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One probe outcome, as persisted in `status_history` and served over the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Instant the probe completed
    pub timestamp: DateTime<Utc>,
    pub is_up: bool,
    /// Wall-clock duration of the probe attempt, success or not
    pub response_time_ms: i64,
    /// HTTP status received, or 0 when no response arrived
    pub status_code: i64,
}

impl StatusRecord {
    pub fn new(timestamp: DateTime<Utc>, is_up: bool, response_time_ms: i64, status_code: i64) -> Self {
        Self { timestamp, is_up, response_time_ms, status_code }
    }

    /// Copy of this record with the timestamp cut to the precision the store keeps
    pub fn truncated_to_storage(&self) -> Self {
        let mut record = self.clone();
        record.timestamp = truncate_to_millis(self.timestamp);
        record
    }
}

/// Up/total counts over a window of the log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UptimeCounts {
    pub total: u64,
    pub up: u64,
}

/// Encode a timestamp in the canonical stored form: RFC 3339, UTC,
/// milliseconds, `Z` suffix. These strings sort in time order.
pub fn encode_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Decode a stored timestamp.
///
/// Accepts the canonical RFC 3339 form and the naive `YYYY-MM-DD HH:MM:SS`
/// form that older rows (or the SQLite default) may carry.
pub fn decode_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, LEGACY_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Cutoff in the legacy naive layout, for range filters over legacy rows.
///
/// Legacy rows only carry whole seconds, so a fractional cutoff rounds up: a
/// row at `HH:MM:SS` is older than `HH:MM:SS.5`.
pub fn encode_legacy_cutoff(cutoff: DateTime<Utc>) -> String {
    let seconds = cutoff.timestamp() + i64::from(cutoff.timestamp_subsec_nanos() > 0);
    DateTime::from_timestamp(seconds, 0)
        .unwrap_or(cutoff)
        .format(LEGACY_TIMESTAMP_FORMAT)
        .to_string()
}

fn truncate_to_millis(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(timestamp.timestamp_millis()).unwrap_or(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_legacy_cutoff_rounds_up_to_whole_seconds() {
        let exact = Utc.with_ymd_and_hms(2026, 10, 14, 21, 10, 32).unwrap();
        assert_eq!(encode_legacy_cutoff(exact), "2026-10-14 21:10:32");

        let fractional = exact + chrono::Duration::milliseconds(500);
        assert_eq!(encode_legacy_cutoff(fractional), "2026-10-14 21:10:33");
    }

    #[test]
    fn test_encode_is_canonical() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 15, 8, 30, 0).unwrap();
        assert_eq!(encode_timestamp(ts), "2026-10-15T08:30:00.000Z");
    }

    #[test]
    fn test_decode_both_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 10, 15, 8, 30, 0).unwrap();
        assert_eq!(decode_timestamp("2026-10-15T08:30:00.000Z"), Some(expected));
        assert_eq!(decode_timestamp("2026-10-15 08:30:00"), Some(expected));
        assert_eq!(decode_timestamp("2026-10-15T11:30:00+03:00"), Some(expected));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(decode_timestamp("yesterday"), None);
        assert_eq!(decode_timestamp(""), None);
        assert_eq!(decode_timestamp("2026-13-45 99:00:00"), None);
    }

    #[test]
    fn test_canonical_strings_sort_in_time_order() {
        let earlier = Utc.with_ymd_and_hms(2026, 9, 30, 23, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        assert!(encode_timestamp(earlier) < encode_timestamp(later));
    }

    #[test]
    fn test_json_shape() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 15, 8, 30, 0).unwrap();
        let record = StatusRecord::new(ts, false, 10_003, 0);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["is_up"], false);
        assert_eq!(json["response_time_ms"], 10_003);
        assert_eq!(json["status_code"], 0);
        assert_eq!(json["timestamp"], "2026-10-15T08:30:00Z");
    }
}
