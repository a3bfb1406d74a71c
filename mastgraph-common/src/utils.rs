//! Time parsing and conversion helpers

use crate::error::{MastGraphError, Result};
use crate::types::Timestamp;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Unix epoch expressed as a Modified Julian Date
const MJD_UNIX_EPOCH: f64 = 40_587.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Get the current timestamp
pub fn now() -> Timestamp {
    Utc::now()
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Format just the date portion of a timestamp
pub fn format_date(timestamp: &Timestamp) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

/// Parse one time-window endpoint.
///
/// Accepts the literal "now" (wall-clock time at the call), an RFC 3339
/// date-time, a bare ISO date-time, or an ISO date (taken as midnight UTC).
pub fn parse_time_bound(input: &str) -> Result<Timestamp> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("now") {
        return Ok(now());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(MastGraphError::time_range(format!(
        "'{}' is not a recognized time (expected an ISO date, an ISO date-time, or \"now\")",
        trimmed
    )))
}

/// Convert a timestamp to a Modified Julian Date, the unit the archive's
/// `t_min`/`t_max` columns are expressed in
pub fn timestamp_to_mjd(timestamp: &Timestamp) -> f64 {
    timestamp.timestamp_millis() as f64 / 1_000.0 / SECONDS_PER_DAY + MJD_UNIX_EPOCH
}

/// Convert a Modified Julian Date back to a timestamp.
///
/// Returns `None` for values outside the representable range.
pub fn mjd_to_timestamp(mjd: f64) -> Option<Timestamp> {
    let seconds = (mjd - MJD_UNIX_EPOCH) * SECONDS_PER_DAY;
    DateTime::from_timestamp(seconds as i64, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_now() {
        let before = now();
        let parsed = parse_time_bound("now").unwrap();
        let after = now();
        assert!(parsed >= before && parsed <= after);

        // Case-insensitive sentinel
        assert!(parse_time_bound("NOW").is_ok());
    }

    #[test]
    fn test_parse_iso_date() {
        let parsed = parse_time_bound("2025-01-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_iso_datetime() {
        let parsed = parse_time_bound("2025-01-01T12:30:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 1, 1, 12, 30, 0).unwrap());

        let with_offset = parse_time_bound("2025-01-01T12:30:00+02:00").unwrap();
        assert_eq!(
            with_offset,
            Utc.with_ymd_and_hms(2025, 1, 1, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["yesterday", "2025/01/01", "", "01-01-2025"] {
            let err = parse_time_bound(input).unwrap_err();
            assert!(matches!(err, MastGraphError::TimeRange { .. }));
        }
    }

    #[test]
    fn test_mjd_round_trip() {
        // 2019-01-01T00:00:00 UTC is MJD 58484
        let ts = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let mjd = timestamp_to_mjd(&ts);
        assert!((mjd - 58_484.0).abs() < 1e-6);

        let back = mjd_to_timestamp(mjd).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn test_format_helpers() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(format_timestamp(&ts), "2025-03-14 09:26:53 UTC");
        assert_eq!(format_date(&ts), "2025-03-14");
    }
}
