// Per-Text Risk Detectors
//
// Keyword-density detectors:  min(1, distinct_hits / word_count × multiplier)
// Toxicity adds +0.2 for shouting (len > 10, no lowercase) and
// +0.1 for excessive punctuation (> 3 '!' or > 5 '?').
// Sentiment is the VADER compound score and is reported only.

use super::lexicons::{Lexicon, HATE_SPEECH, NSFW, POLITICAL, TOXICITY};
use vader_sentiment::SentimentIntensityAnalyzer;

pub const SHOUTING_BONUS: f64 = 0.2;
pub const PUNCTUATION_BONUS: f64 = 0.1;
const SHOUTING_MIN_CHARS: usize = 10;
const MAX_EXCLAMATIONS: usize = 3;
const MAX_QUESTIONS: usize = 5;

/// Keyword density score for one lexicon (0.0-1.0)
pub fn lexicon_score(lexicon: &Lexicon, text: &str) -> f64 {
    let word_count = text.split_whitespace().count();
    if word_count == 0 {
        return 0.0;
    }
    let hits = lexicon.hits(&text.to_lowercase());
    (hits as f64 / word_count as f64 * lexicon.multiplier).min(1.0)
}

pub fn toxicity(text: &str) -> f64 {
    if text.split_whitespace().next().is_none() {
        return 0.0;
    }

    let mut score = lexicon_score(&TOXICITY, text);
    if is_shouting(text) {
        score = (score + SHOUTING_BONUS).min(1.0);
    }
    if excessive_punctuation(text) {
        score = (score + PUNCTUATION_BONUS).min(1.0);
    }
    score
}

pub fn hate_speech(text: &str) -> f64 {
    lexicon_score(&HATE_SPEECH, text)
}

pub fn nsfw(text: &str) -> f64 {
    lexicon_score(&NSFW, text)
}

pub fn political_intensity(text: &str) -> f64 {
    lexicon_score(&POLITICAL, text)
}

/// VADER compound polarity (-1.0 to 1.0)
pub fn sentiment(text: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }
    let analyzer = SentimentIntensityAnalyzer::new();
    analyzer
        .polarity_scores(text)
        .get("compound")
        .copied()
        .unwrap_or(0.0)
        .clamp(-1.0, 1.0)
}

/// More than ten characters, at least one uppercase letter and no lowercase
fn is_shouting(text: &str) -> bool {
    text.chars().count() > SHOUTING_MIN_CHARS
        && text.chars().any(char::is_uppercase)
        && !text.chars().any(char::is_lowercase)
}

fn excessive_punctuation(text: &str) -> bool {
    text.matches('!').count() > MAX_EXCLAMATIONS || text.matches('?').count() > MAX_QUESTIONS
}
