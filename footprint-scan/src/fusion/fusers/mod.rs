// Fusers - Confidence Fusion
//
// Identity Scorer: pairwise five-signal weighted fusion
// Confidence Refiner: per-profile query adjustment of connector baselines

pub mod confidence_refiner;
pub mod identity_scorer;

pub use confidence_refiner::{
    refine_confidence, refine_record, ConfidenceBreakdown, ConfidenceFactors,
};
pub use identity_scorer::{AvatarHashes, IdentityScorer};
