// Fusion Module - Identity Confidence
//
// Signal extractors (pairwise comparators) → fusers (identity scorer, confidence refiner)

pub mod extractors;
pub mod fusers;

use serde::{Deserialize, Serialize};

/// Identity confidence score (0.0-1.0)
pub type Confidence = f64;

/// Per-signal similarity values for one profile pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalScores {
    pub username: Confidence,
    pub avatar: Confidence,
    pub bio: Confidence,
    pub stylometry: Confidence,
    pub links: Confidence,
}

/// Fixed fusion weights (sum to 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalWeights {
    pub username: f64,
    pub avatar: f64,
    pub bio: f64,
    pub stylometry: f64,
    pub links: f64,
}

/// Weights used by the identity scorer
pub const SIGNAL_WEIGHTS: SignalWeights = SignalWeights {
    username: 0.30,
    avatar: 0.25,
    bio: 0.20,
    stylometry: 0.15,
    links: 0.10,
};

impl SignalScores {
    /// Weighted sum of the five signals
    pub fn weighted(&self, weights: &SignalWeights) -> Confidence {
        self.username * weights.username
            + self.avatar * weights.avatar
            + self.bio * weights.bio
            + self.stylometry * weights.stylometry
            + self.links * weights.links
    }
}

/// Pairwise identity score with its explanation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdentityScore {
    pub signals: SignalScores,
    /// Total query-username boost added before capping
    pub query_boost: f64,
    /// Final fused confidence (0.0-1.0)
    pub confidence: Confidence,
}
