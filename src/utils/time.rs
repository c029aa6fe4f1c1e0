//! Timestamp parsing and window helpers

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::types::BattleTime;

/// Parse an upstream ISO-8601 timestamp such as `2024-05-01T20:15:00.123Z`.
///
/// Offsets (`Z`, `+02:00`) are kept as given. A timestamp with no offset is
/// taken to be UTC.
pub fn parse_battle_time(value: &str) -> Result<BattleTime, chrono::ParseError> {
    let value = value.trim();
    match DateTime::parse_from_rfc3339(value) {
        Ok(time) => Ok(time),
        Err(rfc_err) => NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc().fixed_offset())
            .map_err(|_| rfc_err),
    }
}

/// Oldest instant still inside a window of `days` ending at `now`
///
/// A window reaching past the representable range starts at
/// [`DateTime::<Utc>::MIN_UTC`], so it covers everything.
pub fn window_start(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    Duration::try_days(days)
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// `time` is at or after `cutoff`
pub fn is_at_or_after(time: &BattleTime, cutoff: DateTime<Utc>) -> bool {
    time.with_timezone(&Utc) >= cutoff
}

/// Sortable stamp used in backup file names
pub fn backup_stamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d_%H%M%S_%6f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_zulu_suffix() {
        let time = parse_battle_time("2024-05-01T20:15:00Z").unwrap();
        assert_eq!(time.offset().local_minus_utc(), 0);
        assert_eq!(time.to_rfc3339(), "2024-05-01T20:15:00+00:00");
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let time = parse_battle_time("2024-05-01T20:15:00.1234567Z").unwrap();
        assert_eq!(time.timestamp(), 1714594500);
    }

    #[test]
    fn test_parse_keeps_offset() {
        let time = parse_battle_time("2024-05-01T17:15:00-03:00").unwrap();
        assert_eq!(time.offset().local_minus_utc(), -3 * 3600);
        assert_eq!(time.timestamp(), 1714594500);
    }

    #[test]
    fn test_parse_naive_is_utc() {
        let time = parse_battle_time("2024-05-01T20:15:00").unwrap();
        assert_eq!(time.timestamp(), 1714594500);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_battle_time("yesterday").is_err());
        assert!(parse_battle_time("").is_err());
    }

    #[test]
    fn test_window() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let cutoff = window_start(now, 7);

        let inside = parse_battle_time("2024-05-03T12:00:00Z").unwrap();
        let outside = parse_battle_time("2024-05-03T11:59:59Z").unwrap();

        assert!(is_at_or_after(&inside, cutoff));
        assert!(!is_at_or_after(&outside, cutoff));
    }

    #[test]
    fn test_huge_window_covers_everything() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();

        assert_eq!(window_start(now, 1_000_000_000), DateTime::<Utc>::MIN_UTC);
        assert_eq!(window_start(now, i64::MAX), DateTime::<Utc>::MIN_UTC);

        let ancient = parse_battle_time("0001-01-01T00:00:00Z").unwrap();
        assert!(is_at_or_after(&ancient, window_start(now, 1_000_000_000)));
    }

    #[test]
    fn test_backup_stamp_sorts_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2024, 5, 9, 23, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap();

        assert_eq!(backup_stamp(later), "20240510_000000_000000");
        assert!(backup_stamp(earlier) < backup_stamp(later));
    }
}
