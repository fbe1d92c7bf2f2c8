// Posting Volatility
//
// Coefficient of variation of the positive gaps (hours) between sibling items.
// Fewer than two items → 0.0; too little timing data → 0.5 (neutral).

use crate::timeline::parse_timestamp;
use chrono::{DateTime, Utc};
use footprint_common::ContentItem;

/// Score when timing data is insufficient
pub const NEUTRAL_VOLATILITY: f64 = 0.5;

/// Volatility of a sibling series (0.0-1.0)
///
/// Only strictly-parseable timestamps count; unparseable ones are ignored
/// rather than read as the current time.
pub fn volatility(siblings: &[ContentItem]) -> f64 {
    if siblings.len() < 2 {
        return 0.0;
    }

    let mut timestamps: Vec<DateTime<Utc>> = siblings
        .iter()
        .filter_map(|item| item.timestamp.as_ref())
        .filter_map(parse_timestamp)
        .collect();

    if timestamps.len() < 2 {
        return NEUTRAL_VOLATILITY;
    }
    timestamps.sort();

    let gaps: Vec<f64> = timestamps
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_milliseconds() as f64 / 3_600_000.0)
        .filter(|hours| *hours > 0.0)
        .collect();

    if gaps.is_empty() {
        return NEUTRAL_VOLATILITY;
    }

    let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
    if mean == 0.0 {
        return 1.0;
    }

    // Population standard deviation
    let variance = gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / gaps.len() as f64;
    (variance.sqrt() / mean).min(1.0)
}
