// Content Risk - Detectors → Fusion → Flags
//
// Six independent detectors per item (toxicity, hate speech, nsfw,
// political intensity, sentiment, volatility) fused into a 0-100 overall risk.

pub mod detectors;
pub mod lexicons;
pub mod scorer;
pub mod volatility;

pub use scorer::{analyze_risk, assess_profile, content_id, item_key, should_flag, ContentKind};
pub use volatility::volatility;
