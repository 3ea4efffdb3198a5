//! UTC offset extraction from free-form timezone labels.
//!
//! Accepted forms, case-insensitive and whitespace-trimmed:
//! - a known abbreviation (`EST`, `CEST`, `AEST`, ...);
//! - `UTC` / `GMT` / `Z` alone;
//! - `UTC±H`, `UTC±HH:MM`, `GMT±HHMM`, or a bare `±H[:MM]`.

// Real-world offsets span UTC-12:00 to UTC+14:00.
const MIN_OFFSET_MINUTES: i32 = -12 * 60;
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

const ABBREVIATIONS: &[(&str, i32)] = &[
    ("HST", -600),
    ("AKST", -540),
    ("AKDT", -480),
    ("PST", -480),
    ("PDT", -420),
    ("MST", -420),
    ("MDT", -360),
    ("CST", -360),
    ("CDT", -300),
    ("EST", -300),
    ("EDT", -240),
    ("AST", -240),
    ("ADT", -180),
    ("NST", -210),
    ("NDT", -150),
    ("BRT", -180),
    ("WET", 0),
    ("BST", 60),
    ("IST", 330),
    ("CET", 60),
    ("CEST", 120),
    ("EET", 120),
    ("EEST", 180),
    ("MSK", 180),
    ("GST", 240),
    ("PKT", 300),
    ("ICT", 420),
    ("WIB", 420),
    ("SGT", 480),
    ("AWST", 480),
    ("JST", 540),
    ("KST", 540),
    ("ACST", 570),
    ("AEST", 600),
    ("AEDT", 660),
    ("NZST", 720),
    ("NZDT", 780),
];

/// Offset from UTC in minutes, or `None` when the label is unresolvable.
#[must_use]
pub fn utc_offset_minutes(label: &str) -> Option<i32> {
    let label = label.trim().to_ascii_uppercase();
    if label.is_empty() {
        return None;
    }
    if label == "Z" {
        return Some(0);
    }

    if let Some(&(_, offset)) = ABBREVIATIONS.iter().find(|(name, _)| *name == label) {
        return Some(offset);
    }

    let rest = label
        .strip_prefix("UTC")
        .or_else(|| label.strip_prefix("GMT"))
        .unwrap_or(&label)
        .trim_start();
    if rest.is_empty() {
        return Some(0);
    }

    parse_signed_offset(rest)
        .filter(|offset| (MIN_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(offset))
}

// Parse `±H`, `±HH`, `±H:MM`, `±HHMM`.
fn parse_signed_offset(raw: &str) -> Option<i32> {
    let (sign, digits) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    if !digits.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return None;
    }

    let (hours, minutes) = match digits.split_once(':') {
        Some((hours, minutes)) => (hours, minutes),
        None if digits.len() == 4 => digits.split_at(2),
        None => (digits, "0"),
    };

    if hours.is_empty() || hours.len() > 2 || minutes.is_empty() || minutes.len() > 2 {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }

    Some(sign * (hours * 60 + minutes))
}

///
/// TESTS
///
