// Timeline Assembler - Cross-Platform Event Merge
//
// Per profile: one account_created event (earliest parseable post timestamp),
// then one event per timestamped post and comment, annotated with the risk of
// the matching assessment. Output is stably sorted by timestamp.

use super::timestamp::{parse_timestamp, parse_timestamp_or_now};
use crate::risk::{item_key, ContentKind};
use footprint_common::{
    truncate_chars, Platform, ProfileRecord, RiskAssessment, TimelineEvent, TimelineEventType,
};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Maximum characters of content kept in a timeline event
pub const EVENT_CONTENT_CHARS: usize = 200;

/// Merge profiles (grouped by platform key) and risk assessments into one timeline
pub fn build_timeline(
    profiles: &BTreeMap<String, Vec<ProfileRecord>>,
    assessments: &[RiskAssessment],
) -> Vec<TimelineEvent> {
    let risk_lookup: HashMap<&str, f64> = assessments
        .iter()
        .map(|a| {
            let key = a.url.as_deref().filter(|u| !u.is_empty()).unwrap_or(&a.id);
            (key, a.metrics.overall_risk)
        })
        .collect();

    let mut events = Vec::new();
    for (key, records) in profiles {
        let platform = Platform::from_key(key);
        for record in records {
            profile_events(key, platform, record, &risk_lookup, &mut events);
        }
    }

    events.sort_by_key(|e| e.timestamp);

    debug!("Timeline assembled: {} events", events.len());
    events
}

fn profile_events(
    platform_key: &str,
    platform: Platform,
    record: &ProfileRecord,
    risk_lookup: &HashMap<&str, f64>,
    events: &mut Vec<TimelineEvent>,
) {
    let created = record
        .posts
        .iter()
        .filter_map(|post| post.timestamp.as_ref())
        .filter_map(parse_timestamp)
        .min();

    if let Some(created) = created {
        events.push(TimelineEvent {
            timestamp: created,
            platform,
            event_type: TimelineEventType::AccountCreated,
            content: format!("Account created on {}", platform_key),
            url: Some(record.profile_url.clone()),
            risk_score: 0.0,
        });
    }

    for (kind, event_type, items) in [
        (ContentKind::Post, TimelineEventType::Post, &record.posts),
        (ContentKind::Comment, TimelineEventType::Comment, &record.comments),
    ] {
        for (index, item) in items.iter().enumerate() {
            let Some(raw) = item.timestamp.as_ref() else {
                continue;
            };

            let key = item_key(record, item, kind, index);
            let url = item
                .url
                .clone()
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| record.profile_url.clone());

            events.push(TimelineEvent {
                timestamp: parse_timestamp_or_now(raw),
                platform,
                event_type,
                content: truncate_chars(item.text(), EVENT_CONTENT_CHARS).to_string(),
                url: Some(url),
                risk_score: risk_lookup.get(key.as_str()).copied().unwrap_or(0.0),
            });
        }
    }
}
