//! Fuzzy string scoring on a 0-100 scale.
//!
//! Scores are a weighted maximum over three comparisons of the
//! pre-processed strings:
//!
//! - plain ratio: normalized Levenshtein similarity
//! - token sort: tokens sorted alphabetically, then ratio (weight 0.95)
//! - token set: shared tokens compared against shared + remaining tokens
//!   (weight 0.95)
//!
//! Naming variants that only differ in case, punctuation, word order or a
//! stray character all land well above the default cutoff.

use std::collections::BTreeSet;

const TOKEN_WEIGHT: f64 = 0.95;

/// Lowercase, map non-alphanumerics to spaces and collapse whitespace.
pub fn process(s: &str) -> String {
    let mapped: String = s
        .chars()
        .flat_map(|c| {
            let keep = c.is_alphanumeric();
            c.to_lowercase().map(move |lower| if keep { lower } else { ' ' })
        })
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Similarity of two already-processed strings in `[0, 1]`.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    strsim::normalized_levenshtein(a, b)
}

/// Ratio after sorting whitespace-separated tokens.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Ratio over the shared token set and each side's remainder.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let left: BTreeSet<&str> = a.split_whitespace().collect();
    let right: BTreeSet<&str> = b.split_whitespace().collect();

    let shared = join(left.intersection(&right).copied());
    let left_rest = join(left.difference(&right).copied());
    let right_rest = join(right.difference(&left).copied());

    let combined_left = join([shared.as_str(), left_rest.as_str()].into_iter());
    let combined_right = join([shared.as_str(), right_rest.as_str()].into_iter());

    let mut best = ratio(&combined_left, &combined_right);
    if !shared.is_empty() {
        best = best
            .max(ratio(&shared, &combined_left))
            .max(ratio(&shared, &combined_right));
    }
    best
}

/// Score `query` against `choice` on a 0-100 scale.
///
/// Either side processing down to an empty string scores 0.
pub fn score(query: &str, choice: &str) -> u8 {
    let a = process(query);
    let b = process(choice);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let best = ratio(&a, &b)
        .max(TOKEN_WEIGHT * token_sort_ratio(&a, &b))
        .max(TOKEN_WEIGHT * token_set_ratio(&a, &b));

    (best * 100.0).round().clamp(0.0, 100.0) as u8
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
