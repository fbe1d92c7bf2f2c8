// Stylometry Signal
//
// Writing-style fingerprint: Jaccard similarity of contiguous 3-token shingles
// over each side's concatenated, lowercased texts.

use crate::fusion::Confidence;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Tokens per shingle
pub const SHINGLE_SIZE: usize = 3;

/// Split text into word and punctuation tokens
///
/// Follows Unicode word boundaries, so `"don't stop!"` yields
/// `["don't", "stop", "!"]`.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_word_bounds()
        .filter(|token| !token.trim().is_empty())
        .collect()
}

/// Contiguous `n`-token shingles of lowercased text
pub fn shingles(text: &str, n: usize) -> HashSet<String> {
    let lowered = text.to_lowercase();
    let tokens = tokenize(&lowered);
    if n == 0 || tokens.len() < n {
        return HashSet::new();
    }

    tokens.windows(n).map(|window| window.join(" ")).collect()
}

/// Writing-style similarity of two text collections (0.0-1.0)
pub fn stylometry_similarity<S: AsRef<str>>(texts1: &[S], texts2: &[S]) -> Confidence {
    if texts1.is_empty() || texts2.is_empty() {
        return 0.0;
    }

    let combined1 = join_texts(texts1);
    let combined2 = join_texts(texts2);

    let set1 = shingles(&combined1, SHINGLE_SIZE);
    let set2 = shingles(&combined2, SHINGLE_SIZE);

    jaccard(&set1, &set2)
}

fn join_texts<S: AsRef<str>>(texts: &[S]) -> String {
    texts
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Jaccard similarity; either set empty → 0.0
pub fn jaccard<T: Eq + std::hash::Hash>(set1: &HashSet<T>, set2: &HashSet<T>) -> f64 {
    if set1.is_empty() || set2.is_empty() {
        return 0.0;
    }

    let intersection = set1.intersection(set2).count();
    let union = set1.union(set2).count();
    if union == 0 {
        return 0.0;
    }

    intersection as f64 / union as f64
}
