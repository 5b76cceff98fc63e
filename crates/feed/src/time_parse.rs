// ABOUTME: Timestamp parsing for Atom feed dates.
// ABOUTME: Accepts RFC 3339 first, then RFC 2822 and a few zone-less ISO forms assumed to be UTC.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Parses a feed timestamp such as `2007-06-06T19:18:20.000-07:00`.
/// Returns the instant in UTC, or None if no accepted format matches.
pub fn parse_feed_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Atom dates are RFC 3339; this covers fractional seconds and `Z`.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Compact numeric offset: "2007-06-06T19:18:20.000-0700"
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }

    // Zone-less forms (assume UTC)
    let formats_naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    for fmt in &formats_naive {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339_with_millis_and_offset() {
        let dt = parse_feed_time("2007-06-06T19:18:20.000-07:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2007, 6, 7, 2, 18, 20).unwrap());
    }

    #[test]
    fn test_rfc3339_zulu() {
        let dt = parse_feed_time("2007-06-10T17:02:32.000Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2007, 6, 10, 17, 2, 32).unwrap());
    }

    #[test]
    fn test_rfc2822() {
        let dt = parse_feed_time("Mon, 02 Jan 2006 15:04:05 -0700").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2006, 1, 2, 22, 4, 5).unwrap());
    }

    #[test]
    fn test_compact_offset() {
        let dt = parse_feed_time("2007-06-06T19:18:20.000-0700").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2007, 6, 7, 2, 18, 20).unwrap());
    }

    #[test]
    fn test_naive_assumes_utc() {
        let dt = parse_feed_time("2007-06-06T19:18:20").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2007, 6, 6, 19, 18, 20).unwrap());
    }

    #[test]
    fn test_invalid_returns_none() {
        assert!(parse_feed_time("").is_none());
        assert!(parse_feed_time("yesterday").is_none());
        assert!(parse_feed_time("2007-13-45T00:00:00Z").is_none());
    }
}
