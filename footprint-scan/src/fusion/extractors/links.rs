// Link Signal
//
// Jaccard overlap of normalized outbound links.

use super::stylometry::jaccard;
use crate::fusion::Confidence;
use std::collections::HashSet;

/// Normalize a URL for comparison
///
/// Lowercases, strips the `http(s)://` scheme, a leading `www.` and any
/// trailing slashes.
pub fn normalize_url(url: &str) -> String {
    let lowered = url.trim().to_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);
    let without_www = without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme);
    without_www.trim_end_matches('/').to_string()
}

/// Overlap between two link lists (0.0-1.0)
pub fn link_overlap<S: AsRef<str>>(links1: &[S], links2: &[S]) -> Confidence {
    let set1 = normalized_set(links1);
    let set2 = normalized_set(links2);
    jaccard(&set1, &set2)
}

fn normalized_set<S: AsRef<str>>(links: &[S]) -> HashSet<String> {
    links
        .iter()
        .map(|l| normalize_url(l.as_ref()))
        .filter(|l| !l.is_empty())
        .collect()
}
