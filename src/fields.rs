use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

pub const ALLOWED_DEVICES: [&str; 3] = ["mobile", "tablet", "desktop"];

static PATH_CHARSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/[a-zA-Z0-9/_\-.]*$").expect("path pattern compiles"));
static REFERRER_DOMAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\-.]+\.[a-zA-Z]{2,}$").expect("referrer pattern compiles"));
static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern compiles"));

// Offset-aware forms RFC 3339 parsing misses (no seconds).
const OFFSET_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M%:z"];

// Naive forms accepted after offset-aware parsing fails.
const NAIVE_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A visit path must be rooted, free of traversal sequences and limited to a
/// small URL-safe alphabet.
pub fn validate_path(path: &str, max_len: usize) -> bool {
    if path.is_empty() || path.chars().count() > max_len {
        return false;
    }

    if !path.starts_with('/') {
        return false;
    }

    if path.contains("..") || path.contains('~') {
        return false;
    }

    PATH_CHARSET.is_match(path)
}

/// Either the literal `direct` or something shaped like `host.tld`.
pub fn validate_referrer(referrer: &str, max_len: usize) -> bool {
    if referrer.is_empty() || referrer.chars().count() > max_len {
        return false;
    }

    if referrer == "direct" {
        return true;
    }

    REFERRER_DOMAIN.is_match(referrer)
}

pub fn validate_device(device: &str) -> bool {
    let device = device.to_lowercase();
    ALLOWED_DEVICES.contains(&device.as_str())
}

/// ISO-8601 timestamp, with or without an offset. A `Z` suffix means UTC.
pub fn validate_timestamp(ts: &str, max_len: usize) -> bool {
    if ts.is_empty() || ts.chars().count() > max_len {
        return false;
    }

    let ts = ts.replace('Z', "+00:00");

    if DateTime::parse_from_rfc3339(&ts).is_ok() {
        return true;
    }

    if OFFSET_TIMESTAMP_FORMATS
        .iter()
        .any(|format| DateTime::parse_from_str(&ts, format).is_ok())
    {
        return true;
    }

    if NAIVE_TIMESTAMP_FORMATS
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(&ts, format).is_ok())
    {
        return true;
    }

    NaiveDate::parse_from_str(&ts, "%Y-%m-%d").is_ok()
}

/// Strict `YYYY-MM-DD` naming a real calendar day.
pub fn validate_date(date: &str) -> bool {
    if !DATE_SHAPE.is_match(date) {
        return false;
    }

    NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_rules() {
        assert!(validate_path("/docs/intro", 500));
        assert!(validate_path("/", 500));
        assert!(validate_path("/api/v1.2/some_page-x", 500));

        assert!(!validate_path("", 500));
        assert!(!validate_path("docs/intro", 500));
        assert!(!validate_path("/a/../b", 500));
        assert!(!validate_path("/~root", 500));
        assert!(!validate_path("/docs?q=1", 500));
        assert!(!validate_path("/docs intro", 500));
        assert!(!validate_path("/docs/intro\n", 500));
        assert!(!validate_path("/héllo", 500));
    }

    #[test]
    fn path_length_is_bounded() {
        let path = format!("/{}", "a".repeat(9));
        assert!(validate_path(&path, 10));
        assert!(!validate_path(&format!("{path}a"), 10));
    }

    #[test]
    fn referrer_rules() {
        assert!(validate_referrer("direct", 200));
        assert!(validate_referrer("example.com", 200));
        assert!(validate_referrer("news.ycombinator.com", 200));
        assert!(validate_referrer("my-site.co.uk", 200));

        assert!(!validate_referrer("", 200));
        assert!(!validate_referrer("not a domain", 200));
        assert!(!validate_referrer("localhost", 200));
        assert!(!validate_referrer("example.c", 200));
        assert!(!validate_referrer("example.123", 200));
        assert!(!validate_referrer("https://example.com", 200));
        assert!(!validate_referrer("Direct", 200));
    }

    #[test]
    fn referrer_length_is_bounded() {
        let long = format!("{}.com", "a".repeat(200));
        assert!(!validate_referrer(&long, 200));
        assert!(validate_referrer(&long, 300));
    }

    #[test]
    fn device_is_case_insensitive() {
        assert!(validate_device("desktop"));
        assert!(validate_device("Desktop"));
        assert!(validate_device("MOBILE"));
        assert!(validate_device("tablet"));

        assert!(!validate_device("smarttv"));
        assert!(!validate_device(""));
        assert!(!validate_device(" desktop"));
    }

    #[test]
    fn timestamp_accepts_iso_forms() {
        assert!(validate_timestamp("2024-01-15T10:30:00Z", 30));
        assert!(validate_timestamp("2024-01-15T10:30:00.123Z", 30));
        assert!(validate_timestamp("2024-01-15T10:30:00+02:00", 30));
        assert!(validate_timestamp("2024-01-15T10:30Z", 30));
        assert!(validate_timestamp("2024-01-15T10:30+02:00", 30));
        assert!(validate_timestamp("2024-01-15 10:30-05:00", 30));
        assert!(validate_timestamp("2024-01-15T10:30:00", 30));
        assert!(validate_timestamp("2024-01-15 10:30", 30));
        assert!(validate_timestamp("2024-01-15", 30));
    }

    #[test]
    fn timestamp_rejects_garbage() {
        assert!(!validate_timestamp("", 30));
        assert!(!validate_timestamp("yesterday", 30));
        assert!(!validate_timestamp("2024-13-01T00:00:00Z", 30));
        assert!(!validate_timestamp("2024-01-15T25:00:00Z", 30));
        // 32 characters, over the default ceiling
        assert!(!validate_timestamp("2024-01-15T10:30:00.123456+00:00", 30));
    }

    #[test]
    fn date_rules() {
        assert!(validate_date("2024-01-01"));
        assert!(validate_date("2024-02-29"));

        assert!(!validate_date("2023-02-29"));
        assert!(!validate_date("2024-1-01"));
        assert!(!validate_date("2024-01-01T00:00:00"));
        assert!(!validate_date("2024-01-01\n"));
        assert!(!validate_date(""));
    }
}
