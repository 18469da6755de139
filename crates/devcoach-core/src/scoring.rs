use crate::rules::{
    familiarity_rules, first_match, matching_reasons, reason_rules, urgency_rules,
    DEFAULT_FAMILIARITY, DEFAULT_URGENCY,
};
use crate::types::{EnrichedItem, QueueItem};
use std::cmp::Ordering;

// ---------------------------------------------------------------------------
// Story-point tiers
// ---------------------------------------------------------------------------

/// Ascending `(threshold, tier)` pairs: the first threshold at or above the
/// story points picks the tier.
const SP_TIER_MAP: [(i64, u8); 6] = [(1, 1), (2, 2), (3, 2), (5, 3), (8, 4), (13, 5)];

/// Tier used when the size is unknown.
pub const DEFAULT_TIER: u8 = 3;
pub const MAX_TIER: u8 = 5;

/// How many items `recommend_top_three` returns at most.
pub const RECOMMENDATION_COUNT: usize = 3;

/// Map story points onto a 1-5 difficulty tier. Missing or non-positive
/// values are treated as medium.
pub fn story_points_to_tier(story_points: Option<i64>) -> u8 {
    let Some(sp) = story_points.filter(|sp| *sp > 0) else {
        return DEFAULT_TIER;
    };
    SP_TIER_MAP
        .iter()
        .find(|(threshold, _)| sp <= *threshold)
        .map(|(_, tier)| *tier)
        .unwrap_or(MAX_TIER)
}

// ---------------------------------------------------------------------------
// Confidence score
// ---------------------------------------------------------------------------

/// `(1 / tier) * familiarity_bonus * urgency_multiplier`.
///
/// Always strictly positive. Depends only on the item; the username is
/// accepted for API parity with callers that scope queues per user.
pub fn confidence_score(item: &QueueItem, _username: &str) -> f64 {
    let tier = story_points_to_tier(item.story_points);
    let familiarity = first_match(&familiarity_rules(), item, DEFAULT_FAMILIARITY);
    let urgency = first_match(&urgency_rules(), item, DEFAULT_URGENCY);
    (1.0 / f64::from(tier)) * familiarity * urgency
}

pub fn round_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}

/// Human-readable reasons for recommending `item`.
pub fn explain(item: &QueueItem) -> String {
    let mut reasons = matching_reasons(&reason_rules(), item);
    if reasons.is_empty() {
        reasons.push("good fit based on difficulty tier and queue position".to_string());
    }
    format!("Recommended because: {}.", reasons.join("; "))
}

// ---------------------------------------------------------------------------
// Sorting and recommendations
// ---------------------------------------------------------------------------

fn scored(items: &[QueueItem], username: &str) -> Vec<(f64, QueueItem)> {
    let mut pairs: Vec<(f64, QueueItem)> = items
        .iter()
        .map(|item| (confidence_score(item, username), item.clone()))
        .collect();
    // Stable: equal scores keep their queue order.
    pairs.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    pairs
}

/// Return a copy of `items` ordered by confidence score, highest first.
pub fn sort_queue(items: &[QueueItem], username: &str) -> Vec<QueueItem> {
    scored(items, username)
        .into_iter()
        .map(|(_, item)| item)
        .collect()
}

fn enrich(score: f64, item: QueueItem) -> EnrichedItem {
    let explanation = explain(&item);
    EnrichedItem {
        item,
        score: round_score(score),
        explanation,
    }
}

/// The whole queue in score order, each item carrying its score and
/// explanation.
pub fn score_queue(items: &[QueueItem], username: &str) -> Vec<EnrichedItem> {
    scored(items, username)
        .into_iter()
        .map(|(score, item)| enrich(score, item))
        .collect()
}

/// The three best-scoring items (fewer if the queue is shorter).
pub fn recommend_top_three(items: &[QueueItem], username: &str) -> Vec<EnrichedItem> {
    scored(items, username)
        .into_iter()
        .take(RECOMMENDATION_COUNT)
        .map(|(score, item)| enrich(score, item))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
