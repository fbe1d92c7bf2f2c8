// Content Risk Scorer - Detector Fusion and Flagging
//
// overall_risk = 100 × (0.40·toxicity + 0.20·hate + 0.15·nsfw + 0.15·political + 0.10·volatility)
// Sentiment is carried in the metrics but excluded from the overall score.

use super::detectors;
use super::volatility::volatility;
use crate::timeline::parse_timestamp;
use footprint_common::{
    truncate_chars, ContentItem, Platform, ProfileRecord, RiskAssessment, RiskMetrics,
};
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::debug;

/// Maximum characters of content kept in an assessment
pub const ASSESSMENT_CONTENT_CHARS: usize = 500;

const TOXICITY_WEIGHT: f64 = 0.40;
const HATE_WEIGHT: f64 = 0.20;
const NSFW_WEIGHT: f64 = 0.15;
const POLITICAL_WEIGHT: f64 = 0.15;
const VOLATILITY_WEIGHT: f64 = 0.10;

// Flag thresholds (strictly greater than)
pub const TOXICITY_FLAG: f64 = 0.5;
pub const HATE_FLAG: f64 = 0.3;
pub const NSFW_FLAG: f64 = 0.4;
pub const POLITICAL_FLAG: f64 = 0.6;
pub const OVERALL_FLAG: f64 = 70.0;

/// Whether an item came from a profile's posts or its comments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Post,
    Comment,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Post => "post",
            ContentKind::Comment => "comment",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score one text against its sibling series
pub fn analyze_risk(text: &str, siblings: &[ContentItem]) -> RiskMetrics {
    score_with_volatility(text, volatility(siblings))
}

fn score_with_volatility(text: &str, volatility: f64) -> RiskMetrics {
    let toxicity = detectors::toxicity(text);
    let hate_speech = detectors::hate_speech(text);
    let nsfw = detectors::nsfw(text);
    let political_intensity = detectors::political_intensity(text);

    let overall_risk = 100.0
        * (TOXICITY_WEIGHT * toxicity
            + HATE_WEIGHT * hate_speech
            + NSFW_WEIGHT * nsfw
            + POLITICAL_WEIGHT * political_intensity
            + VOLATILITY_WEIGHT * volatility);

    RiskMetrics {
        toxicity,
        hate_speech,
        nsfw,
        political_intensity,
        sentiment: detectors::sentiment(text),
        volatility,
        overall_risk: overall_risk.clamp(0.0, 100.0),
    }
}

/// Threshold flags for a set of metrics
///
/// # Returns
/// `(flagged, labels)` where `flagged` is true exactly when `labels` is non-empty
pub fn should_flag(metrics: &RiskMetrics) -> (bool, Vec<String>) {
    let checks = [
        (metrics.toxicity > TOXICITY_FLAG, "High Toxicity"),
        (metrics.hate_speech > HATE_FLAG, "Hate Speech"),
        (metrics.nsfw > NSFW_FLAG, "NSFW Content"),
        (metrics.political_intensity > POLITICAL_FLAG, "High Political Intensity"),
        (metrics.overall_risk > OVERALL_FLAG, "High Overall Risk"),
    ];

    let flags: Vec<String> = checks
        .iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, label)| label.to_string())
        .collect();

    (!flags.is_empty(), flags)
}

/// Stable id for an item without a URL
///
/// First 16 hex characters of `sha256(platform|profile_url|kind|index)`.
pub fn content_id(platform: Platform, profile_url: &str, kind: ContentKind, index: usize) -> String {
    let digest = Sha256::digest(format!("{}|{}|{}|{}", platform, profile_url, kind, index));
    digest
        .iter()
        .take(8)
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

/// Lookup key for an item: its URL, else its content id
pub fn item_key(record: &ProfileRecord, item: &ContentItem, kind: ContentKind, index: usize) -> String {
    match item.url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => url.to_string(),
        None => content_id(record.platform, &record.profile_url, kind, index),
    }
}

/// Assess every post and comment on a profile
///
/// Items with no text (content or title) are skipped. Posts are scored
/// against the profile's posts, comments against its comments.
pub fn assess_profile(record: &ProfileRecord) -> Vec<RiskAssessment> {
    let mut assessments = Vec::new();

    for (kind, items) in [
        (ContentKind::Post, &record.posts),
        (ContentKind::Comment, &record.comments),
    ] {
        let series_volatility = volatility(items);

        for (index, item) in items.iter().enumerate() {
            let text = item.text();
            if text.trim().is_empty() {
                continue;
            }

            let metrics = score_with_volatility(text, series_volatility);
            let (flagged, flags) = should_flag(&metrics);

            assessments.push(RiskAssessment {
                id: item_key(record, item, kind, index),
                platform: record.platform,
                content: truncate_chars(text, ASSESSMENT_CONTENT_CHARS).to_string(),
                timestamp: item.timestamp.as_ref().and_then(parse_timestamp),
                url: item.url.clone(),
                metrics,
                flagged,
                flags,
            });
        }
    }

    debug!(
        "Assessed {} items on {} ({} flagged)",
        assessments.len(),
        record.profile_url,
        assessments.iter().filter(|a| a.flagged).count()
    );

    assessments
}

#[cfg(test)]
mod tests {
    use super::*;
    use footprint_common::RawTimestamp;

    fn item(content: &str, url: Option<&str>) -> ContentItem {
        ContentItem {
            content: content.to_string(),
            url: url.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_shouted_insult_is_flagged() {
        let metrics = analyze_risk("YOU ARE SO STUPID AND WORTHLESS!!!!", &[]);
        assert_eq!(metrics.toxicity, 1.0);

        let (flagged, flags) = should_flag(&metrics);
        assert!(flagged);
        assert!(flags.contains(&"High Toxicity".to_string()));
    }

    #[test]
    fn test_overall_excludes_sentiment() {
        let metrics = analyze_risk("I love sunny days with friends", &[]);
        assert!(metrics.sentiment > 0.0);
        assert_eq!(metrics.overall_risk, 0.0);
        assert_eq!(should_flag(&metrics), (false, vec![]));
    }

    #[test]
    fn test_overall_weighting() {
        let metrics = RiskMetrics {
            toxicity: 1.0,
            hate_speech: 1.0,
            nsfw: 1.0,
            political_intensity: 1.0,
            volatility: 1.0,
            ..Default::default()
        };
        let fused = score_with_volatility("", 1.0);
        assert!((fused.overall_risk - 10.0).abs() < 1e-9);

        let (_, flags) = should_flag(&RiskMetrics {
            overall_risk: 100.0,
            ..metrics
        });
        assert_eq!(
            flags,
            vec![
                "High Toxicity",
                "Hate Speech",
                "NSFW Content",
                "High Political Intensity",
                "High Overall Risk"
            ]
        );
    }

    #[test]
    fn test_thresholds_are_strict() {
        let at_threshold = RiskMetrics {
            toxicity: TOXICITY_FLAG,
            hate_speech: HATE_FLAG,
            nsfw: NSFW_FLAG,
            political_intensity: POLITICAL_FLAG,
            overall_risk: OVERALL_FLAG,
            ..Default::default()
        };
        assert_eq!(should_flag(&at_threshold), (false, vec![]));
    }

    #[test]
    fn test_assess_profile_ids_and_truncation() {
        let mut record = ProfileRecord::new(Platform::Reddit, "https://reddit.com/u/x", 0.8);
        record.posts = vec![
            item(&"a".repeat(600), Some("https://reddit.com/p/1")),
            item("", None),
            ContentItem {
                title: Some("title only".to_string()),
                ..Default::default()
            },
        ];
        record.comments = vec![item("no url here", None)];

        let assessments = assess_profile(&record);
        assert_eq!(assessments.len(), 3, "empty item skipped");

        assert_eq!(assessments[0].id, "https://reddit.com/p/1");
        assert_eq!(assessments[0].content.chars().count(), 500);

        assert_eq!(assessments[1].content, "title only");
        assert_eq!(
            assessments[1].id,
            content_id(Platform::Reddit, "https://reddit.com/u/x", ContentKind::Post, 2)
        );
        assert_eq!(assessments[1].id.len(), 16);

        assert_eq!(
            assessments[2].id,
            content_id(Platform::Reddit, "https://reddit.com/u/x", ContentKind::Comment, 0)
        );
        assert_ne!(assessments[1].id, assessments[2].id);

        for assessment in &assessments {
            assert_eq!(assessment.flagged, !assessment.flags.is_empty());
        }
    }

    #[test]
    fn test_assessment_timestamp_is_strict() {
        let mut record = ProfileRecord::new(Platform::Twitter, "https://twitter.com/x", 0.8);
        record.posts = vec![
            ContentItem {
                content: "dated".to_string(),
                timestamp: Some(RawTimestamp::Text("2024-03-01".to_string())),
                ..Default::default()
            },
            ContentItem {
                content: "garbled".to_string(),
                timestamp: Some(RawTimestamp::Text("sometime".to_string())),
                ..Default::default()
            },
        ];

        let assessments = assess_profile(&record);
        assert!(assessments[0].timestamp.is_some());
        assert!(assessments[1].timestamp.is_none());
        // Two items but only one parseable timestamp
        assert_eq!(assessments[0].metrics.volatility, 0.5);
    }

    #[test]
    fn test_content_id_is_deterministic() {
        let a = content_id(Platform::Github, "https://github.com/x", ContentKind::Post, 0);
        let b = content_id(Platform::Github, "https://github.com/x", ContentKind::Post, 0);
        assert_eq!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
