// ABOUTME: Time offset parsing for media thumbnails.
// ABOUTME: Supports plain seconds, MM:SS, and HH:MM:SS, each with an optional fractional part.

use std::time::Duration;

/// Parses a clock-style offset such as `00:00:46.500` into a Duration.
/// Supports:
/// - Plain seconds (`46`, `46.5`)
/// - MM:SS format
/// - HH:MM:SS format
/// Returns None for empty input, negative values, minute/second fields of 60
/// or more, or totals that overflow.
pub fn parse_time_offset(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let parts: Vec<&str> = s.split(':').collect();
    match parts.len() {
        1 => parse_seconds(parts[0]),
        2 => {
            // MM:SS
            let mins: u64 = parts[0].parse().ok()?;
            let secs = parse_seconds(parts[1]).filter(|d| d.as_secs() < 60)?;
            let total = mins.checked_mul(60)?;
            Duration::from_secs(total).checked_add(secs)
        }
        3 => {
            // HH:MM:SS
            let hours: u64 = parts[0].parse().ok()?;
            let mins: u64 = parts[1].parse().ok().filter(|m| *m < 60)?;
            let secs = parse_seconds(parts[2]).filter(|d| d.as_secs() < 60)?;
            let total = hours.checked_mul(3600)?.checked_add(mins * 60)?;
            Duration::from_secs(total).checked_add(secs)
        }
        _ => None,
    }
}

fn parse_seconds(s: &str) -> Option<Duration> {
    let (whole, fraction) = match s.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (s, ""),
    };
    let secs: u64 = whole.parse().ok()?;
    if fraction.is_empty() {
        return Some(Duration::from_secs(secs));
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Keep millisecond precision.
    let millis: String = fraction.chars().chain("000".chars()).take(3).collect();
    let millis: u64 = millis.parse().ok()?;
    Duration::from_secs(secs).checked_add(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_seconds() {
        assert_eq!(parse_time_offset("46"), Some(Duration::from_secs(46)));
        assert_eq!(parse_time_offset("1.5"), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_hhmmss_with_fraction() {
        assert_eq!(
            parse_time_offset("00:00:46.500"),
            Some(Duration::from_millis(46_500))
        );
        assert_eq!(parse_time_offset("01:02:03"), Some(Duration::from_secs(3723)));
    }

    #[test]
    fn test_mmss() {
        assert_eq!(parse_time_offset("05:30"), Some(Duration::from_secs(330)));
    }

    #[test]
    fn test_invalid_returns_none() {
        assert!(parse_time_offset("").is_none());
        assert!(parse_time_offset("abc").is_none());
        assert!(parse_time_offset("00:75").is_none());
        assert!(parse_time_offset("1:2:3:4").is_none());
        assert!(parse_time_offset("1.x").is_none());
        assert!(parse_time_offset("18446744073709551615:00").is_none());
        assert!(parse_time_offset("18446744073709551615:00:00").is_none());
    }

    #[test]
    fn test_large_values_within_range() {
        assert_eq!(
            parse_time_offset("1000000:00:00"),
            Some(Duration::from_secs(3_600_000_000))
        );
    }
}
