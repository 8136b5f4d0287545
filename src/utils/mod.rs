use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use sha2::{Digest, Sha256};

/// Removes HTML tags, leaving only text content.
pub fn strip_html(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let re = Regex::new(r"<[^>]+>").unwrap();
    re.replace_all(value, "").to_string()
}

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Thousands-separator formatting, e.g. 1234567 -> "1,234,567".
pub fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Parses the timestamp shapes the Mastodon API hands out: full ISO-8601
/// datetimes for `created_at`, date-only strings for `last_status_at`.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(DateTime::from_naive_utc_and_offset(parsed, Utc));
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let midnight = parsed.and_hms_opt(0, 0, 0)?;
        return Some(DateTime::from_naive_utc_and_offset(midnight, Utc));
    }
    None
}

/// Display form used on profile pages ("15 Jan 2023"). Unparseable values
/// fall back to their date prefix, absent values to "N/A".
pub fn format_date(value: Option<&str>) -> String {
    let raw = match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => raw,
        None => return "N/A".to_string(),
    };
    match parse_timestamp(raw) {
        Some(parsed) => parsed.format("%d %b %Y").to_string(),
        None => raw.chars().take(10).collect(),
    }
}

/// Truncates on a character boundary, appending an ellipsis when shortened.
pub fn truncate_chars(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max).collect();
    out.push('…');
    out
}

/// Percent-encodes a single URL path segment (RFC 3986 unreserved set kept).
pub fn percent_encode_segment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

/// Stable 0..100 bucket for a string. Uses a digest rather than the std
/// hasher so generated pages do not churn between builds or platforms.
pub fn digest_bucket(value: &str) -> u8 {
    let digest = Sha256::digest(value.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) % 100) as u8
}
