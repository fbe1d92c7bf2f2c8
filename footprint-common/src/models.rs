//! Data model shared by connectors, scorers and the HTTP surface
//!
//! Every entity here is built fresh per scan request. Records are mutated in two
//! passes (connector baseline confidence, then refinement) before being frozen
//! into the scan report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Platform
// ============================================================================

/// External source a profile record was collected from
///
/// Unknown platform strings deserialize to [`Platform::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Platform {
    Reddit,
    Twitter,
    Instagram,
    Tiktok,
    Youtube,
    Pinterest,
    Tumblr,
    Quora,
    Medium,
    Wordpress,
    Disqus,
    Pastebin,
    Github,
    Forums,
    Blogs,
    Archives,
    SearchResults,
    #[default]
    Other,
}

impl Platform {
    /// Wire name, also used as the grouping key in scan reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Reddit => "reddit",
            Platform::Twitter => "twitter",
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
            Platform::Youtube => "youtube",
            Platform::Pinterest => "pinterest",
            Platform::Tumblr => "tumblr",
            Platform::Quora => "quora",
            Platform::Medium => "medium",
            Platform::Wordpress => "wordpress",
            Platform::Disqus => "disqus",
            Platform::Pastebin => "pastebin",
            Platform::Github => "github",
            Platform::Forums => "forums",
            Platform::Blogs => "blogs",
            Platform::Archives => "archives",
            Platform::SearchResults => "search_results",
            Platform::Other => "other",
        }
    }

    /// Parse a platform key, mapping anything unrecognised to `Other`
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "reddit" => Platform::Reddit,
            "twitter" => Platform::Twitter,
            "instagram" => Platform::Instagram,
            "tiktok" => Platform::Tiktok,
            "youtube" => Platform::Youtube,
            "pinterest" => Platform::Pinterest,
            "tumblr" => Platform::Tumblr,
            "quora" => Platform::Quora,
            "medium" => Platform::Medium,
            "wordpress" => Platform::Wordpress,
            "disqus" => Platform::Disqus,
            "pastebin" => Platform::Pastebin,
            "github" => Platform::Github,
            "forums" => Platform::Forums,
            "blogs" => Platform::Blogs,
            "archives" => Platform::Archives,
            "search_results" => Platform::SearchResults,
            _ => Platform::Other,
        }
    }
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        Platform::from_key(&value)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Query
// ============================================================================

/// Identifying inputs for one scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryInputs {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub usernames: Vec<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl QueryInputs {
    /// Full name, if present and not blank
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// Email, if present and not blank
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }

    /// Candidate usernames that are not blank
    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.usernames
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
    }

    /// True when at least one identifying field is populated
    pub fn has_identifier(&self) -> bool {
        self.name().is_some() || self.email().is_some() || self.usernames().next().is_some()
    }
}

// ============================================================================
// Collected records
// ============================================================================

/// Raw timestamp as delivered by a connector
///
/// Connectors hand back whatever their source uses: Unix seconds, an RFC 3339
/// instant, or some other date string that is only resolved during timeline
/// assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Seconds since the Unix epoch
    Epoch(f64),
    /// Already-resolved instant
    Instant(DateTime<Utc>),
    /// Free-form text in an unknown format
    Text(String),
}

impl From<DateTime<Utc>> for RawTimestamp {
    fn from(value: DateTime<Utc>) -> Self {
        RawTimestamp::Instant(value)
    }
}

impl From<&str> for RawTimestamp {
    fn from(value: &str) -> Self {
        RawTimestamp::Text(value.to_string())
    }
}

/// One post or comment authored on a profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub timestamp: Option<RawTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement: Option<f64>,
}

impl ContentItem {
    /// Text used for scoring: the body, falling back to the title
    pub fn text(&self) -> &str {
        if !self.content.is_empty() {
            return &self.content;
        }
        self.title.as_deref().unwrap_or("")
    }
}

/// Profile observed on one external source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub platform: Platform,
    #[serde(default)]
    pub username: Option<String>,
    pub profile_url: String,
    #[serde(default, alias = "profile_name")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// Posts, most recent first
    #[serde(default)]
    pub posts: Vec<ContentItem>,
    /// Comments, most recent first
    #[serde(default)]
    pub comments: Vec<ContentItem>,
    #[serde(default)]
    pub links: Vec<String>,
    /// Identity confidence (0.0-1.0)
    #[serde(alias = "confidence_score")]
    pub confidence: f64,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ProfileRecord {
    /// Create a record with a connector-assigned baseline confidence
    pub fn new(platform: Platform, profile_url: impl Into<String>, confidence: f64) -> Self {
        Self {
            platform,
            profile_url: profile_url.into(),
            confidence: confidence.clamp(0.0, 1.0),
            ..Default::default()
        }
    }
}

/// Truncate to at most `max_chars` characters without splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ============================================================================
// Risk
// ============================================================================

/// Per-item risk dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// 0.0-1.0
    pub toxicity: f64,
    /// 0.0-1.0
    pub hate_speech: f64,
    /// 0.0-1.0
    pub nsfw: f64,
    /// 0.0-1.0
    pub political_intensity: f64,
    /// -1.0 (negative) to 1.0 (positive); reported only
    pub sentiment: f64,
    /// 0.0-1.0
    pub volatility: f64,
    /// 0.0-100.0
    pub overall_risk: f64,
}

/// Risk assessment for one post or comment
///
/// `flagged` is true exactly when `flags` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub id: String,
    pub platform: Platform,
    /// Content truncated to 500 characters
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub metrics: RiskMetrics,
    pub flagged: bool,
    pub flags: Vec<String>,
}

// ============================================================================
// Timeline
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventType {
    AccountCreated,
    Post,
    Comment,
}

/// One entry in the merged timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub timestamp: DateTime<Utc>,
    pub platform: Platform,
    #[serde(rename = "type")]
    pub event_type: TimelineEventType,
    /// Content truncated to 200 characters
    pub content: String,
    pub url: Option<String>,
    /// 0.0-100.0
    pub risk_score: f64,
}
