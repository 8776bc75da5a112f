//! Type-aware value validation and canonical encodings
//!
//! All formats here are invariant: no locale, no time zone. Parsing is
//! strict (what a query may contain), formatting is lenient (what a user
//! may have typed into an editor).

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::ValueType;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("number pattern")
});

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern"));

static DATETIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{3})?$").expect("datetime pattern")
});

/// Formats tried when canonicalizing an editor value, most specific first
const LENIENT_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const LENIENT_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Validate a raw query value against a value type.
///
/// Returns the normalized value, or `None` when the value does not conform.
/// Blank input never conforms; callers decide whether that is fatal.
pub fn validate(raw: &str, value_type: ValueType) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }

    match value_type {
        ValueType::String => Some(raw.to_string()),
        ValueType::Number => is_number(raw).then(|| raw.to_string()),
        ValueType::Boolean => parse_bool(raw).map(|b| b.to_string()),
        ValueType::Date => is_date(raw).then(|| raw.to_string()),
        ValueType::DateTime => is_datetime(raw).then(|| raw.to_string()),
    }
}

/// Invariant decimal number: optional sign, digits, optional fraction and exponent
pub fn is_number(raw: &str) -> bool {
    let trimmed = raw.trim();
    NUMBER_PATTERN.is_match(trimmed)
        && trimmed.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Exactly `YYYY-MM-DD` naming a real calendar day
pub fn is_date(raw: &str) -> bool {
    DATE_PATTERN.is_match(raw) && NaiveDate::parse_from_str(raw, DATE_FORMAT).is_ok()
}

/// Exactly `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DDTHH:MM:SS.fff`
pub fn is_datetime(raw: &str) -> bool {
    let Some(caps) = DATETIME_PATTERN.captures(raw) else {
        return false;
    };
    let format = if caps.get(1).is_some() {
        "%Y-%m-%dT%H:%M:%S%.f"
    } else {
        DATETIME_FORMAT
    };
    NaiveDateTime::parse_from_str(raw, format).is_ok()
}

/// Best-effort parse of an editor value into a timestamp
fn parse_lenient(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    LENIENT_DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .or_else(|| {
            LENIENT_DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.naive_local())
                .ok()
        })
}

/// Re-emit a Date/DateTime value in canonical form.
///
/// Values that do not parse are returned unchanged. Other value types pass
/// through untouched.
pub fn canonicalize(raw: &str, value_type: ValueType) -> String {
    let format = match value_type {
        ValueType::Date => DATE_FORMAT,
        ValueType::DateTime => DATETIME_FORMAT,
        _ => return raw.to_string(),
    };

    match parse_lenient(raw) {
        Some(ts) => ts.format(format).to_string(),
        None => raw.to_string(),
    }
}
