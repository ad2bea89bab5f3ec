//! Fuzzy matching utilities for catalog lookups
//!
//! A weighted-ratio scorer: a Levenshtein ratio combined with token-sort,
//! token-set and partial (substring window) ratios. Scores run from 0 to 100.

use std::collections::BTreeSet;

use strsim::levenshtein;

/// Token ratios are slightly penalized against a plain full-string ratio
const TOKEN_SCALE: f64 = 0.95;

/// Length ratio below which the strings are compared whole
const WHOLE_STRING_LEN_RATIO: f64 = 1.5;

/// Length ratio past which partial matches are heavily discounted
const LONG_PARTIAL_LEN_RATIO: f64 = 8.0;

/// Result of a fuzzy match with the matched value and score
#[derive(Debug, Clone)]
pub struct FuzzyMatch {
    pub value: String,
    /// Position of `value` in the candidate list
    pub index: usize,
    pub score: f64,
}

/// Levenshtein similarity of two whole strings, 0-100
pub fn ratio(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 100.0;
    }
    let dist = levenshtein(a, b);
    100.0 * (max_len - dist) as f64 / max_len as f64
}

/// Best ratio of the shorter string against every same-length window of the longer one
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };

    let short_len = shorter.chars().count();
    if short_len == 0 {
        return 0.0;
    }

    let long_chars: Vec<char> = longer.chars().collect();
    if short_len == long_chars.len() {
        return ratio(shorter, longer);
    }

    let mut best = 0.0_f64;
    for start in 0..=(long_chars.len() - short_len) {
        let window: String = long_chars[start..start + short_len].iter().collect();
        let score = ratio(shorter, &window);
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }
    best
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join_set(set: &BTreeSet<&str>) -> String {
    set.iter().copied().collect::<Vec<_>>().join(" ")
}

fn join_pair(head: &str, tail: &str) -> String {
    format!("{} {}", head, tail).trim().to_string()
}

/// Ratio of both strings after sorting their whitespace tokens
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Ratio built from the shared tokens plus each side's leftovers
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let sect: BTreeSet<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: BTreeSet<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: BTreeSet<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !sect.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let sect_str = join_set(&sect);
    let combined_ab = join_pair(&sect_str, &join_set(&diff_ab));
    let combined_ba = join_pair(&sect_str, &join_set(&diff_ba));

    let mut best = ratio(&combined_ab, &combined_ba);
    if !sect.is_empty() {
        best = best
            .max(ratio(&sect_str, &combined_ab))
            .max(ratio(&sect_str, &combined_ba));
    }
    best
}

/// Partial ratio over token forms; any shared token is a full match
pub fn partial_token_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.intersection(&tokens_b).next().is_some() {
        return 100.0;
    }

    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
        .max(partial_ratio(&join_set(&tokens_a), &join_set(&tokens_b)))
}

/// Weighted composite of the ratios above.
///
/// Similar-length strings use the full ratio and the token ratios; once one
/// string is 1.5x longer the partial ratios take over, scaled down the more
/// the lengths diverge. Empty input on either side scores 0.
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    let len_ratio = len_a.max(len_b) as f64 / len_a.min(len_b) as f64;
    let mut best = ratio(a, b);

    if len_ratio < WHOLE_STRING_LEN_RATIO {
        let token = token_sort_ratio(a, b).max(token_set_ratio(a, b));
        return best.max(token * TOKEN_SCALE);
    }

    let partial_scale = if len_ratio <= LONG_PARTIAL_LEN_RATIO {
        0.9
    } else {
        0.6
    };

    best = best.max(partial_ratio(a, b) * partial_scale);
    best.max(partial_token_ratio(a, b) * TOKEN_SCALE * partial_scale)
}

/// Find the best-scoring candidate at or above `cutoff`.
///
/// Ties keep the earliest candidate: a later one only wins with a strictly
/// higher score.
pub fn extract_one(query: &str, candidates: &[String], cutoff: f64) -> Option<FuzzyMatch> {
    let mut best: Option<FuzzyMatch> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let score = weighted_ratio(query, candidate);
        if score < cutoff {
            continue;
        }
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(FuzzyMatch {
                value: candidate.clone(),
                index,
                score,
            });
        }
    }

    best
}
