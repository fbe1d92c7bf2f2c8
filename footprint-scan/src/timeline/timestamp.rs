// Timestamp Normalization
//
// Connectors deliver timestamps as Unix seconds, resolved instants or
// free text. Text is tried as ISO-8601 first, then against a fixed list of
// fallback formats. Naive results are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use footprint_common::RawTimestamp;
use tracing::debug;

/// Fallback formats, tried in order after ISO-8601
///
/// Day-first precedes month-first, so `01/02/2023` is 1 February.
pub const FALLBACK_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
];

/// Resolve a raw timestamp, or `None` when no format matches
pub fn parse_timestamp(raw: &RawTimestamp) -> Option<DateTime<Utc>> {
    match raw {
        RawTimestamp::Instant(instant) => Some(*instant),
        RawTimestamp::Epoch(seconds) => from_epoch(*seconds),
        RawTimestamp::Text(text) => parse_text(text),
    }
}

/// Resolve a raw timestamp, falling back to the current time
pub fn parse_timestamp_or_now(raw: &RawTimestamp) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap_or_else(|| {
        debug!("Unparseable timestamp {:?}, using current time", raw);
        Utc::now()
    })
}

fn from_epoch(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    parse_iso(text).or_else(|| {
        FALLBACK_FORMATS
            .iter()
            .find_map(|format| parse_naive(text, format))
    })
}

/// ISO-8601 with offset (`Z` or `±hh:mm`), or naive with optional fraction
fn parse_iso(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    if let Ok(instant) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(instant.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

fn parse_naive(text: &str, format: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
