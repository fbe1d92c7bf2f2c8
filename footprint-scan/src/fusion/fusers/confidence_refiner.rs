// Confidence Refiner - Per-Profile Query Adjustment
//
// Second pass over a single record's confidence (the connector assigned the
// baseline). Rules run in fixed order:
//   1. Name veto/boost  (any name token missing → 0.0; else +0.2 exact / +0.1 tokens)
//   2. Username override (max with best query-username similarity)
//   3. Email boost       (+0.15 when the bio contains the query email)

use crate::fusion::extractors::username_similarity;
use crate::fusion::Confidence;
use footprint_common::{Platform, ProfileRecord, QueryInputs};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const EXACT_NAME_BOOST: f64 = 0.2;
pub const PARTIAL_NAME_BOOST: f64 = 0.1;
pub const EMAIL_BOOST: f64 = 0.15;

/// Displayed factor weights
///
/// These are presentation values, not the coefficients the refiner applies.
pub const NAME_FACTOR: f64 = 0.3;
pub const USERNAME_FACTOR: f64 = 0.2;
pub const EMAIL_FACTOR: f64 = 0.1;

/// Outcome of the name rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameCheck {
    /// Query name or display name absent
    Skipped,
    /// A name token is missing from display name + bio
    Vetoed,
    /// Full name appears verbatim in display name or bio
    Exact,
    /// Every token present, full name not verbatim
    AllTokens,
}

/// Explainability factors shown alongside a refined score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceFactors {
    pub name_match: f64,
    pub username_match: f64,
    pub email_match: f64,
    pub base_confidence: f64,
}

/// Refined confidence for one profile with its display factors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub platform: Platform,
    pub username: Option<String>,
    pub profile_url: String,
    pub score: Confidence,
    pub factors: ConfidenceFactors,
}

/// Evaluate the name rule against display name and bio
pub fn check_name(query: &QueryInputs, record: &ProfileRecord) -> NameCheck {
    let (Some(name), Some(display_name)) = (
        query.name(),
        record.display_name.as_deref().filter(|d| !d.is_empty()),
    ) else {
        return NameCheck::Skipped;
    };

    let name_lower = name.to_lowercase();
    let tokens: Vec<&str> = name_lower.split_whitespace().collect();
    if tokens.is_empty() {
        return NameCheck::Skipped;
    }

    let display_lower = display_name.to_lowercase();
    let bio_lower = record.bio.as_deref().unwrap_or("").to_lowercase();
    let combined = format!("{} {}", display_lower, bio_lower);

    if !tokens.iter().all(|token| combined.contains(token)) {
        return NameCheck::Vetoed;
    }

    if display_lower.contains(&name_lower) || bio_lower.contains(&name_lower) {
        NameCheck::Exact
    } else {
        NameCheck::AllTokens
    }
}

/// Refined confidence for a record against the query (0.0-1.0)
pub fn refine_confidence(record: &ProfileRecord, query: &QueryInputs) -> Confidence {
    let mut confidence = record.confidence;

    match check_name(query, record) {
        NameCheck::Vetoed => confidence = 0.0,
        NameCheck::Exact => confidence = (confidence + EXACT_NAME_BOOST).min(1.0),
        NameCheck::AllTokens => confidence = (confidence + PARTIAL_NAME_BOOST).min(1.0),
        NameCheck::Skipped => {}
    }

    if let Some(username) = &record.username {
        let best = query
            .usernames()
            .map(|candidate| username_similarity(candidate, username))
            .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))));
        if let Some(best) = best {
            confidence = confidence.max(best);
        }
    }

    if let (Some(email), Some(bio)) = (query.email(), record.bio.as_deref()) {
        if bio.to_lowercase().contains(&email.to_lowercase()) {
            confidence = (confidence + EMAIL_BOOST).min(1.0);
        }
    }

    confidence.clamp(0.0, 1.0)
}

/// Apply the refinement to a record in place and return its breakdown
pub fn refine_record(record: &mut ProfileRecord, query: &QueryInputs) -> ConfidenceBreakdown {
    let baseline = record.confidence;
    record.confidence = refine_confidence(record, query);

    debug!(
        "Refined {} confidence {:.3} → {:.3}",
        record.profile_url, baseline, record.confidence
    );

    let has_display_name = record
        .display_name
        .as_deref()
        .is_some_and(|d| !d.is_empty());

    ConfidenceBreakdown {
        platform: record.platform,
        username: record.username.clone(),
        profile_url: record.profile_url.clone(),
        score: record.confidence,
        factors: ConfidenceFactors {
            name_match: if query.name().is_some() && has_display_name {
                NAME_FACTOR
            } else {
                0.0
            },
            username_match: if record.username.is_some() {
                USERNAME_FACTOR
            } else {
                0.0
            },
            email_match: if query.email().is_some() {
                EMAIL_FACTOR
            } else {
                0.0
            },
            base_confidence: record.confidence,
        },
    }
}
