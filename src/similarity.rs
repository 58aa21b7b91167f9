//! Word-level similarity scoring between short OCR text fragments.
//!
//! This is the HOT PATH of the merge engine - every incoming batch runs an
//! anchor search that scores line pairs with `is_similar`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Stripped from every token before comparison: anything outside the
/// word-character class (letters, digits, underscore).
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w]").unwrap());

/// Lowercase a fragment and strip non-word characters from each
/// whitespace-separated token. Tokens that clean down to nothing are
/// dropped, so punctuation-only noise never reaches the distance matrix.
pub fn clean_tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter_map(|word| {
            let lowered = word.to_lowercase();
            let cleaned = NON_WORD.replace_all(&lowered, "");
            if cleaned.is_empty() {
                None
            } else {
                Some(cleaned.into_owned())
            }
        })
        .collect()
}

/// Levenshtein edit distance over token sequences.
///
/// Full DP matrix in a flat Vec for cache efficiency:
/// `dp[i][j] = dp[i * (n + 1) + j]`.
#[inline]
pub fn word_edit_distance(a: &[String], b: &[String]) -> usize {
    let m = a.len();
    let n = b.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let width = n + 1;
    let mut dp = vec![0usize; (m + 1) * width];

    for i in 0..=m {
        dp[i * width] = i;
    }
    for j in 0..=n {
        dp[j] = j;
    }

    for i in 1..=m {
        let row = i * width;
        let prev = (i - 1) * width;
        for j in 1..=n {
            dp[row + j] = if a[i - 1] == b[j - 1] {
                dp[prev + (j - 1)]
            } else {
                1 + dp[prev + j]
                    .min(dp[row + (j - 1)])
                    .min(dp[prev + (j - 1)])
            };
        }
    }

    dp[m * width + n]
}

/// Similarity score in [0, 1] between two fragments.
///
/// Returns `None` when either side has no comparable tokens left after
/// cleaning - "no data" is distinct from a low score. The score is 1.0 iff
/// the cleaned token sequences are identical, otherwise
/// `1 - edit_distance / max(len_a, len_b)`, so it decreases monotonically
/// as edits accumulate relative to the longer sequence.
pub fn similarity(a: &str, b: &str) -> Option<f32> {
    let tokens_a = clean_tokens(a);
    let tokens_b = clean_tokens(b);

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return None;
    }

    // Fast path: identical cleaned sequences
    if tokens_a == tokens_b {
        return Some(1.0);
    }

    let dist = word_edit_distance(&tokens_a, &tokens_b);
    let max_len = tokens_a.len().max(tokens_b.len());

    Some(1.0 - dist as f32 / max_len as f32)
}

/// Threshold classification over [`similarity`]. Degenerate input (either
/// side empty after cleaning) is "not similar", never an error.
#[inline]
pub fn is_similar(a: &str, b: &str, threshold: f32) -> bool {
    similarity(a, b).map_or(false, |score| score >= threshold)
}
