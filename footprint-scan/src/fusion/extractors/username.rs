// Username Signal
//
// Normalized username comparison using a Ratcliff/Obershelp matching-blocks
// ratio, with a floor of 0.8 when one handle contains the other.

use crate::fusion::Confidence;

/// Floor applied when one normalized username is a substring of the other
pub const SUBSTRING_FLOOR: Confidence = 0.8;

/// Normalize a username for comparison
///
/// Lowercases, trims, strips a leading `@` and removes every character outside
/// `[a-z0-9_]`.
pub fn normalize_username(username: &str) -> String {
    let lowered = username.trim().to_lowercase();
    let stripped = lowered.strip_prefix('@').unwrap_or(&lowered);
    stripped
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

/// Similarity of two usernames (0.0-1.0)
///
/// # Returns
/// * 0.0 if either side normalizes to empty
/// * 1.0 on exact normalized match
/// * Matching-blocks ratio otherwise, raised to at least 0.8 on containment
pub fn username_similarity(username1: &str, username2: &str) -> Confidence {
    let norm1 = normalize_username(username1);
    let norm2 = normalize_username(username2);

    if norm1.is_empty() || norm2.is_empty() {
        return 0.0;
    }

    if norm1 == norm2 {
        return 1.0;
    }

    let mut similarity = matching_ratio(&norm1, &norm2);

    if norm1.contains(&norm2) || norm2.contains(&norm1) {
        similarity = similarity.max(SUBSTRING_FLOOR);
    }

    similarity
}

/// Ratcliff/Obershelp similarity: `2 * matched / (len(a) + len(b))`
pub fn matching_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = matched_characters(&a, &b);
    2.0 * matched as f64 / total as f64
}

/// Total size of the matching blocks between `a` and `b`
///
/// Repeatedly takes the longest common block, then recurses on the unmatched
/// regions to its left and right.
fn matched_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common block in `a[alo..ahi]` and `b[blo..bhi]`
///
/// Ties resolve to the earliest start in `a`, then the earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run_lengths[j + 1] = length of the common run ending at a[i], b[j]
    let mut previous = vec![0usize; b.len() + 1];

    for i in alo..ahi {
        let mut current = vec![0usize; b.len() + 1];
        for j in blo..bhi {
            if a[i] == b[j] {
                let run = previous[j] + 1;
                current[j + 1] = run;
                if run > best_size {
                    best_i = i + 1 - run;
                    best_j = j + 1 - run;
                    best_size = run;
                }
            }
        }
        previous = current;
    }

    (best_i, best_j, best_size)
}
