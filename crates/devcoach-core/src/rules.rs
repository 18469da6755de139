use crate::scoring::story_points_to_tier;
use crate::types::{Priority, QueueItem};

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// A fn-pointer rule yielding a fixed value when its condition holds.
pub struct Rule<T> {
    pub id: &'static str,
    pub condition: fn(&QueueItem) -> bool,
    pub value: T,
}

/// Walk `rules` in order and return the value of the first one whose
/// condition holds, or `default` when none do.
pub fn first_match<T: Copy>(rules: &[Rule<T>], item: &QueueItem, default: T) -> T {
    rules
        .iter()
        .find(|rule| (rule.condition)(item))
        .map(|rule| rule.value)
        .unwrap_or(default)
}

// ---------------------------------------------------------------------------
// ReasonRule
// ---------------------------------------------------------------------------

/// An explanation rule. Unlike [`Rule`], every matching reason is collected.
pub struct ReasonRule {
    pub id: &'static str,
    pub condition: fn(&QueueItem) -> bool,
    pub phrase: fn(&QueueItem) -> String,
}

pub fn matching_reasons(rules: &[ReasonRule], item: &QueueItem) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| (rule.condition)(item))
        .map(|rule| (rule.phrase)(item))
        .collect()
}

// ---------------------------------------------------------------------------
// Condition helpers
// ---------------------------------------------------------------------------

fn commented(item: &QueueItem) -> bool {
    item.user_commented
}

fn assigned(item: &QueueItem) -> bool {
    item.is_assigned_to_user
}

fn urgent(item: &QueueItem) -> bool {
    item.priority.is_urgent()
}

fn high(item: &QueueItem) -> bool {
    item.priority == Priority::High
}

fn awaiting_review(item: &QueueItem) -> bool {
    item.awaiting_review_from_user
}

fn small_scope(item: &QueueItem) -> bool {
    item.story_points.is_some() && story_points_to_tier(item.story_points) <= 2
}

fn large_scope(item: &QueueItem) -> bool {
    item.story_points.is_some() && story_points_to_tier(item.story_points) >= 4
}

fn story_points(item: &QueueItem) -> i64 {
    item.story_points.unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Default tables (priority-ordered)
// ---------------------------------------------------------------------------

pub const DEFAULT_FAMILIARITY: f64 = 1.0;
pub const DEFAULT_URGENCY: f64 = 1.0;

/// Prior comments beat assignment: a comment means the user already holds
/// the context.
pub fn familiarity_rules() -> Vec<Rule<f64>> {
    vec![
        Rule {
            id: "user_commented",
            condition: commented,
            value: 1.5,
        },
        Rule {
            id: "assigned_to_user",
            condition: assigned,
            value: 1.3,
        },
    ]
}

/// Explicit priority labels are checked before the implicit review request.
pub fn urgency_rules() -> Vec<Rule<f64>> {
    vec![
        Rule {
            id: "critical_or_blocker",
            condition: urgent,
            value: 2.0,
        },
        Rule {
            id: "high_priority",
            condition: high,
            value: 1.5,
        },
        Rule {
            id: "awaiting_review",
            condition: awaiting_review,
            value: 1.3,
        },
    ]
}

pub fn reason_rules() -> Vec<ReasonRule> {
    vec![
        ReasonRule {
            id: "critical_or_blocker",
            condition: urgent,
            phrase: |_| "marked as critical/blocker".to_string(),
        },
        ReasonRule {
            id: "high_priority",
            condition: high,
            phrase: |_| "high priority".to_string(),
        },
        ReasonRule {
            id: "awaiting_review",
            condition: awaiting_review,
            phrase: |_| "your review has been requested".to_string(),
        },
        ReasonRule {
            id: "assigned_to_user",
            condition: assigned,
            phrase: |_| "assigned to you".to_string(),
        },
        ReasonRule {
            id: "user_commented",
            condition: commented,
            phrase: |_| "you have prior context from a comment".to_string(),
        },
        ReasonRule {
            id: "small_scope",
            condition: small_scope,
            phrase: |item| {
                format!(
                    "small scope ({} SP — good for a focused session)",
                    story_points(item)
                )
            },
        },
        ReasonRule {
            id: "large_scope",
            condition: large_scope,
            phrase: |item| format!("larger scope ({} SP — plan accordingly)", story_points(item)),
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
