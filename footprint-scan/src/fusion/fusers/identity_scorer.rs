// Identity Scorer - Weighted Multi-Signal Fusion
//
// confidence = clamp(Σ weight_i × signal_i + query_boost, 0, 1)
// Weights: username 0.30, avatar 0.25, bio 0.20, stylometry 0.15, links 0.10
// Query boost: +0.10 per (query username, profile side) pair with similarity > 0.8
//
// Avatars are resolved once per scan into an `AvatarHashes` map; failed
// fetches are recorded as `None` so a broken URL is requested only once.

use crate::fusion::extractors::{
    avatar_similarity, bio_similarity, link_overlap, stylometry_similarity, username_similarity,
    AvatarHash, AvatarHasher, TextEmbedder,
};
use crate::fusion::{IdentityScore, SignalScores, SIGNAL_WEIGHTS};
use footprint_common::{ProfileRecord, QueryInputs};
use futures::future::join_all;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Boost added per query username that matches one side of the pair
pub const QUERY_BOOST: f64 = 0.10;

/// Similarity a query username must exceed to earn the boost
pub const QUERY_MATCH_THRESHOLD: f64 = 0.8;

/// Most recent posts (and, separately, comments) used for stylometry
pub const STYLOMETRY_SAMPLE: usize = 10;

/// Avatar hashes resolved for one scan, keyed by trimmed URL
///
/// `None` marks a URL whose fetch or decode failed.
pub type AvatarHashes = HashMap<String, Option<AvatarHash>>;

/// Pairwise identity scorer
///
/// Avatar resolution is the only suspending step; pairs are then scored
/// synchronously from the resolved hashes.
pub struct IdentityScorer {
    avatars: Arc<AvatarHasher>,
    embedder: Arc<dyn TextEmbedder>,
}

impl IdentityScorer {
    pub fn new(avatars: Arc<AvatarHasher>, embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { avatars, embedder }
    }

    /// Confidence that two profiles belong to the same identity
    pub async fn compute_identity_confidence(
        &self,
        profile_a: &ProfileRecord,
        profile_b: &ProfileRecord,
        query: &QueryInputs,
    ) -> IdentityScore {
        let avatars = self.resolve_avatars(&[profile_a, profile_b]).await;
        self.score_pair(profile_a, profile_b, query, &avatars)
    }

    /// Score a pair against avatar hashes resolved up front
    ///
    /// A URL missing from `avatars` counts as no hash; nothing is fetched.
    pub fn score_pair(
        &self,
        profile_a: &ProfileRecord,
        profile_b: &ProfileRecord,
        query: &QueryInputs,
        avatars: &AvatarHashes,
    ) -> IdentityScore {
        let hash_a = resolved_hash(avatars, profile_a.avatar_url.as_deref());
        let hash_b = resolved_hash(avatars, profile_b.avatar_url.as_deref());

        let username = match (&profile_a.username, &profile_b.username) {
            (Some(a), Some(b)) => username_similarity(a, b),
            _ => 0.0,
        };

        let signals = SignalScores {
            username,
            avatar: avatar_similarity(hash_a, hash_b),
            bio: bio_similarity(
                self.embedder.as_ref(),
                profile_a.bio.as_deref(),
                profile_b.bio.as_deref(),
            ),
            stylometry: stylometry_similarity(&recent_texts(profile_a), &recent_texts(profile_b)),
            links: link_overlap(&profile_a.links, &profile_b.links),
        };

        let boost = query_boost(query, profile_a, profile_b);
        let confidence = (signals.weighted(&SIGNAL_WEIGHTS) + boost).clamp(0.0, 1.0);

        debug!(
            "Identity {} ↔ {}: {:.3} (boost {:.2})",
            profile_a.profile_url, profile_b.profile_url, confidence, boost
        );

        IdentityScore {
            signals,
            query_boost: boost,
            confidence,
        }
    }

    /// Fetch every distinct avatar URL once, concurrently
    ///
    /// Failures are kept in the map as `None`, so scoring never refetches.
    pub async fn resolve_avatars(&self, profiles: &[&ProfileRecord]) -> AvatarHashes {
        let urls: BTreeSet<&str> = profiles
            .iter()
            .filter_map(|p| p.avatar_url.as_deref())
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .collect();

        let hashes = join_all(urls.iter().map(|url| self.avatars.avatar_hash(Some(*url)))).await;
        urls.into_iter().map(str::to_string).zip(hashes).collect()
    }
}

fn resolved_hash(avatars: &AvatarHashes, url: Option<&str>) -> Option<AvatarHash> {
    let url = url.map(str::trim).filter(|u| !u.is_empty())?;
    avatars.get(url).copied().flatten()
}

/// Total query-username boost for a profile pair (uncapped)
///
/// Each side is checked independently, so one query username can boost twice.
pub fn query_boost(query: &QueryInputs, profile_a: &ProfileRecord, profile_b: &ProfileRecord) -> f64 {
    let mut boost = 0.0;
    for query_username in query.usernames() {
        for profile in [profile_a, profile_b] {
            if let Some(username) = &profile.username {
                if username_similarity(query_username, username) > QUERY_MATCH_THRESHOLD {
                    boost += QUERY_BOOST;
                }
            }
        }
    }
    boost
}

/// Body text of the most recent posts and comments
fn recent_texts(profile: &ProfileRecord) -> Vec<&str> {
    profile
        .posts
        .iter()
        .take(STYLOMETRY_SAMPLE)
        .chain(profile.comments.iter().take(STYLOMETRY_SAMPLE))
        .map(|item| item.content.as_str())
        .collect()
}
