//! Topic ranking and weight normalization.
//!
//! Ranking orders topics heaviest-first so the most important topic claims the
//! innermost spiral slot. Normalization maps raw weights linearly onto size tiers
//! 1..=10, using the ranked list's first and last weights as the extremes.

use std::cmp::Ordering;

use crate::models::Topic;

pub const MIN_TIER: u8 = 1;
pub const MAX_TIER: u8 = 10;
/// Tier given to every topic when all weights are equal.
pub const UNIFORM_TIER: u8 = 5;
/// Tier given when the formula yields a non-number (non-finite weights).
pub const INVALID_TIER: u8 = 10;

// ────────────────────────────────────────────────────────────────────────────
// Ranking
// ────────────────────────────────────────────────────────────────────────────

/// Sorts topics in place by descending raw weight.
///
/// `sort_by` is a stable merge sort, so equal weights keep their input order.
/// Weights that cannot be compared (NaN) are treated as equal to everything.
pub fn rank_topics(topics: &mut [Topic]) {
    topics.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
}

// ────────────────────────────────────────────────────────────────────────────
// Normalization
// ────────────────────────────────────────────────────────────────────────────

/// Maps a single weight onto a tier given the highest and lowest weights.
///
/// `lo -> 1`, `hi -> 10`, intermediate values rounded half away from zero.
/// Callers handle the `hi == lo` case; here it produces a non-number and
/// therefore [`INVALID_TIER`].
pub fn tier_for_weight(weight: f64, highest: f64, lowest: f64) -> u8 {
    let scaled = ((weight - lowest) / (highest - lowest) * 9.0).round() + 1.0;
    if scaled.is_nan() {
        return INVALID_TIER;
    }
    scaled.clamp(MIN_TIER as f64, MAX_TIER as f64) as u8
}

/// Computes tiers for a ranked topic list without touching the topics.
///
/// The result is parallel to `ranked`.
pub fn compute_tiers(ranked: &[Topic]) -> Vec<u8> {
    let (Some(first), Some(last)) = (ranked.first(), ranked.last()) else {
        return Vec::new();
    };
    let (highest, lowest) = (first.weight, last.weight);

    if highest == lowest {
        return vec![UNIFORM_TIER; ranked.len()];
    }

    ranked
        .iter()
        .map(|t| tier_for_weight(t.weight, highest, lowest))
        .collect()
}

/// Writes `adjusted_weight` onto every topic of a ranked list.
pub fn annotate_tiers(ranked: &mut [Topic]) {
    let tiers = compute_tiers(ranked);
    for (topic, tier) in ranked.iter_mut().zip(tiers) {
        topic.adjusted_weight = Some(tier);
    }
}

/// Ranks then annotates, the preparation step run before every layout pass.
pub fn prepare_topics(topics: &mut [Topic]) {
    rank_topics(topics);
    annotate_tiers(topics);
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
