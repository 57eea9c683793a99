//! Calendar-date rendering for bet timestamps.
//!
//! Every date in the export is the NZ local calendar date (DD/MM/YYYY in
//! Pacific/Auckland, DST-aware), regardless of the host machine's zone.
//! Both upstream timestamp shapes funnel through here so the statement and
//! transaction exports agree on what day a bet landed.

use chrono::{TimeZone, Utc};
use chrono_tz::Pacific::Auckland;

/// Format a split `{seconds, nanos}` timestamp as DD/MM/YYYY in NZ time.
///
/// `nanos` contributes rounded milliseconds. Absent or out-of-range input
/// renders an empty string rather than an error.
pub fn from_parts(seconds: Option<i64>, nanos: Option<i64>) -> String {
    let Some(secs) = seconds else {
        return String::new();
    };
    let extra_millis = (nanos.unwrap_or(0) as f64 / 1e6).round() as i64;
    let millis = match secs.checked_mul(1000).and_then(|m| m.checked_add(extra_millis)) {
        Some(m) => m,
        None => return String::new(),
    };
    match Utc.timestamp_millis_opt(millis).single() {
        Some(instant) => instant
            .with_timezone(&Auckland)
            .format("%d/%m/%Y")
            .to_string(),
        None => String::new(),
    }
}

/// Format a bare Unix-seconds timestamp as DD/MM/YYYY in NZ time.
pub fn from_seconds(seconds: Option<i64>) -> String {
    from_parts(seconds, None)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nz_calendar_date() {
        // 2024-01-16 00:00:00 UTC is already Jan 16 in NZDT (+13)
        assert_eq!(from_seconds(Some(1705363200)), "16/01/2024");
    }

    #[test]
    fn rolls_over_to_next_nz_day_during_daylight_time() {
        // 2024-01-15 20:30 UTC -> 2024-01-16 09:30 NZDT
        assert_eq!(from_seconds(Some(1705350600)), "16/01/2024");
    }

    #[test]
    fn rolls_over_during_standard_time() {
        // 2024-07-03 13:00 UTC -> 2024-07-04 01:00 NZST (+12)
        assert_eq!(from_seconds(Some(1720011600)), "04/07/2024");
    }

    #[test]
    fn nanos_contribute_rounded_milliseconds() {
        // just before midnight NZ time; the nanos push it over
        // 2024-01-15 10:59:59.9995 UTC -> 11:00:00 UTC -> 16/01 NZDT boundary
        let secs = 1705316399; // 2024-01-15 10:59:59 UTC (23:59:59 NZDT)
        assert_eq!(from_parts(Some(secs), Some(999_600_000)), "16/01/2024");
        assert_eq!(from_parts(Some(secs), Some(0)), "15/01/2024");
        assert_eq!(from_parts(Some(secs), None), "15/01/2024");
    }

    #[test]
    fn missing_or_invalid_input_renders_blank() {
        assert_eq!(from_parts(None, Some(5)), "");
        assert_eq!(from_seconds(None), "");
        assert_eq!(from_seconds(Some(i64::MAX)), "");
    }
}
